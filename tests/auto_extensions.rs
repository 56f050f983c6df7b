//! Process-wide registration. Kept in a single test so the steps run in order
//! inside this test binary's process.

use rusqlite::Connection;
use sqlite_autoload::{SimdFlags, register_auto_extensions};

fn uuid_available(conn: &Connection) -> bool {
    conn.query_row("SELECT uuid()", [], |row| row.get::<_, String>(0))
        .is_ok()
}

fn vec_available(conn: &Connection) -> bool {
    conn.query_row("SELECT vec_version()", [], |row| row.get::<_, String>(0))
        .is_ok()
}

#[test]
fn test_auto_extension_lifecycle() {
    sqlite_autoload::init_tracing();

    let before = Connection::open_in_memory().unwrap();
    assert!(!uuid_available(&before));
    assert!(!vec_available(&before));

    register_auto_extensions();

    // Already-open connections are not retrofitted.
    assert!(!uuid_available(&before));
    assert!(!vec_available(&before));

    let after = Connection::open_in_memory().unwrap();
    let (id, version): (String, String) = after
        .query_row("SELECT uuid(), vec_version()", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .unwrap();
    assert_eq!(id.len(), 36);
    assert!(version.starts_with('v'));

    let roundtrip: String = after
        .query_row("SELECT uuid_str(uuid_blob(?1))", [&id], |row| row.get(0))
        .unwrap();
    assert_eq!(roundtrip, id);

    // A second registration is tolerated.
    register_auto_extensions();
    sqlite_autoload::try_register_auto_extensions().unwrap();
    let again = Connection::open_in_memory().unwrap();
    assert!(uuid_available(&again));
    assert!(vec_available(&again));

    assert!(SimdFlags::COMPILED.verify_cpu_support().is_ok());
}
