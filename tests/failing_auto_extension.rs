//! An auto-extension that reports failure makes every later open fail with its
//! message. Runs in its own test binary: the failing entry point stays registered
//! for the rest of the process.

use std::os::raw::{c_char, c_int};

use rusqlite::{Connection, ffi};
use sqlite_autoload::extension::write_error_message;
use sqlite_autoload::register_entry_point;

const FAILURE_MESSAGE: &str = "initializer refused this connection";

#[allow(unsafe_code)]
unsafe extern "C" fn failing_init(
    _db: *mut ffi::sqlite3,
    pz_err_msg: *mut *mut c_char,
    _p_api: *const ffi::sqlite3_api_routines,
) -> c_int {
    // SAFETY: `pz_err_msg` is the error slot SQLite passed in.
    unsafe { write_error_message(pz_err_msg, FAILURE_MESSAGE) };
    ffi::SQLITE_ERROR
}

#[test]
fn test_failing_entry_point_fails_open_with_message() {
    let before = Connection::open_in_memory().unwrap();

    register_entry_point("failing", failing_init).unwrap();

    let err = Connection::open_in_memory().unwrap_err();
    assert!(
        err.to_string().contains(FAILURE_MESSAGE),
        "unexpected error: {err}"
    );

    // Connections opened earlier keep working.
    let one: i64 = before.query_row("SELECT 1", [], |row| row.get(0)).unwrap();
    assert_eq!(one, 1);
}
