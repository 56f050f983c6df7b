//! UUID SQL functions.
//!
//! Same surface as `SQLite`'s `uuid` extension:
//! - `uuid()` returns a new random (v4) UUID as text;
//! - `uuid_str(X)` renders X as canonical lowercase text;
//! - `uuid_blob(X)` renders X as a 16-byte blob.
//!
//! X is accepted as a 16-byte blob or as text (hyphenated, simple, braced or URN).
//! Anything else yields NULL.

use std::os::raw::{c_char, c_int};

use ::uuid::Uuid;
use rusqlite::functions::{Context, FunctionFlags};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, ffi};

use super::write_error_message;

/// Install the UUID functions on `conn`.
///
/// # Errors
/// Returns an error if `SQLite` rejects a function registration.
pub fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    let volatile = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_INNOCUOUS;
    let deterministic = volatile | FunctionFlags::SQLITE_DETERMINISTIC;

    conn.create_scalar_function("uuid", 0, volatile, |_ctx| {
        Ok(Uuid::new_v4().hyphenated().to_string())
    })?;
    conn.create_scalar_function("uuid_str", 1, deterministic, |ctx| {
        Ok(uuid_argument(ctx).map(|uuid| uuid.hyphenated().to_string()))
    })?;
    conn.create_scalar_function("uuid_blob", 1, deterministic, |ctx| {
        Ok(uuid_argument(ctx).map(|uuid| uuid.as_bytes().to_vec()))
    })?;

    #[cfg(feature = "uuid_v7")]
    conn.create_scalar_function("uuid7", 0, volatile, |_ctx| {
        Ok(Uuid::now_v7().hyphenated().to_string())
    })?;

    Ok(())
}

fn uuid_argument(ctx: &Context<'_>) -> Option<Uuid> {
    parse_value(ctx.get_raw(0))
}

/// Interpret an SQL value as a UUID.
#[must_use]
pub fn parse_value(value: ValueRef<'_>) -> Option<Uuid> {
    match value {
        ValueRef::Blob(bytes) => Uuid::from_slice(bytes).ok(),
        ValueRef::Text(text) => std::str::from_utf8(text)
            .ok()
            .and_then(|s| Uuid::try_parse(s).ok()),
        ValueRef::Null | ValueRef::Integer(_) | ValueRef::Real(_) => None,
    }
}

/// Extension entry point for the UUID functions.
///
/// # Safety
/// Must only be called by `SQLite` with a live connection handle, as done for
/// auto-extensions and `sqlite3_load_extension`.
#[allow(unsafe_code)]
pub unsafe extern "C" fn sqlite3_uuid_init(
    db: *mut ffi::sqlite3,
    pz_err_msg: *mut *mut c_char,
    _p_api: *const ffi::sqlite3_api_routines,
) -> c_int {
    // SAFETY: `db` is the connection SQLite is opening; the borrowed wrapper does
    // not close it on drop.
    let result = unsafe { Connection::from_handle(db) }.and_then(|conn| register_functions(&conn));
    match result {
        Ok(()) => ffi::SQLITE_OK,
        Err(err) => {
            tracing::debug!(error = %err, "uuid extension failed to initialize");
            // SAFETY: `pz_err_msg` is the error slot SQLite passed in.
            unsafe { write_error_message(pz_err_msg, &err.to_string()) };
            ffi::SQLITE_ERROR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "a0eebc99-9c0b-4ef8-bb6d-6bb9bd380a11";

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        register_functions(&conn).unwrap();
        conn
    }

    fn text(conn: &Connection, sql: &str) -> Option<String> {
        conn.query_row(sql, [], |row| row.get(0)).unwrap()
    }

    #[test]
    fn test_uuid_generates_v4_text() {
        let conn = conn();
        let first = text(&conn, "SELECT uuid()").unwrap();
        let second = text(&conn, "SELECT uuid()").unwrap();

        assert_ne!(first, second);
        let parsed = Uuid::parse_str(&first).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
        assert_eq!(first, first.to_lowercase());
        assert_eq!(first.len(), 36);
    }

    #[test]
    fn test_uuid_str_accepts_text_forms() {
        let conn = conn();
        for input in [
            "A0EEBC99-9C0B-4EF8-BB6D-6BB9BD380A11",
            "a0eebc999c0b4ef8bb6d6bb9bd380a11",
            "{a0eebc99-9c0b-4ef8-bb6d-6bb9bd380a11}",
            "urn:uuid:a0eebc99-9c0b-4ef8-bb6d-6bb9bd380a11",
        ] {
            let rendered = text(&conn, &format!("SELECT uuid_str('{input}')"));
            assert_eq!(rendered.as_deref(), Some(SAMPLE), "input {input}");
        }
    }

    #[test]
    fn test_uuid_blob_and_back() {
        let conn = conn();
        let blob: Vec<u8> = conn
            .query_row("SELECT uuid_blob(?1)", [SAMPLE], |row| row.get(0))
            .unwrap();
        assert_eq!(blob, Uuid::parse_str(SAMPLE).unwrap().as_bytes().to_vec());

        let rendered: String = conn
            .query_row("SELECT uuid_str(?1)", [&blob], |row| row.get(0))
            .unwrap();
        assert_eq!(rendered, SAMPLE);
    }

    #[test]
    fn test_invalid_inputs_yield_null() {
        let conn = conn();
        for input in ["NULL", "42", "4.2", "x'0102'", "'not a uuid'", "'a0eebc99'"] {
            assert_eq!(text(&conn, &format!("SELECT uuid_str({input})")), None);
            let blob: Option<Vec<u8>> = conn
                .query_row(&format!("SELECT uuid_blob({input})"), [], |row| row.get(0))
                .unwrap();
            assert_eq!(blob, None, "input {input}");
        }
    }

    #[test]
    fn test_parse_value_variants() {
        let uuid = Uuid::parse_str(SAMPLE).unwrap();
        assert_eq!(parse_value(ValueRef::Blob(uuid.as_bytes())), Some(uuid));
        assert_eq!(parse_value(ValueRef::Text(SAMPLE.as_bytes())), Some(uuid));
        assert_eq!(parse_value(ValueRef::Blob(&[0u8; 15])), None);
        assert_eq!(parse_value(ValueRef::Integer(7)), None);
        assert_eq!(parse_value(ValueRef::Null), None);
    }

    #[cfg(feature = "uuid_v7")]
    #[test]
    fn test_uuid7_is_time_ordered() {
        let conn = conn();
        let id = text(&conn, "SELECT uuid7()").unwrap();
        assert_eq!(Uuid::parse_str(&id).unwrap().get_version_num(), 7);
    }
}
