//! sqlite-vec extension loader.
//!
//! `build.rs` compiles sqlite-vec with the resolved SIMD defines and links it in;
//! this module wraps its `sqlite3_vec_init` entry point so the SIMD paths compiled
//! into this build are checked against the running CPU before the extension
//! installs itself on a connection.

use std::os::raw::{c_char, c_int};
use std::ptr;

use rusqlite::{Connection, ffi};

use super::{ConnectionInitializer, ExtensionEntryPoint, take_error_message, write_error_message};
use crate::errors::{AutoloadError, AutoloadResult};
use crate::simd::SimdFlags;

#[allow(unsafe_code)]
unsafe extern "C" {
    fn sqlite3_vec_init(
        db: *mut ffi::sqlite3,
        pz_err_msg: *mut *mut c_char,
        p_api: *const ffi::sqlite3_api_routines,
    ) -> c_int;
}

/// The raw sqlite-vec entry point, without the CPU check.
#[must_use]
pub const fn sqlite_vec_entry_point() -> ExtensionEntryPoint {
    sqlite3_vec_init
}

/// Extension entry point for sqlite-vec, preceded by the CPU check.
///
/// # Safety
/// Must only be called by `SQLite` with a live connection handle.
#[allow(unsafe_code)]
pub unsafe extern "C" fn sqlite3_vec_autoload_init(
    db: *mut ffi::sqlite3,
    pz_err_msg: *mut *mut c_char,
    p_api: *const ffi::sqlite3_api_routines,
) -> c_int {
    if let Err(err) = SimdFlags::COMPILED.verify_cpu_support() {
        tracing::error!(error = %err, "refusing to load sqlite-vec");
        // SAFETY: `pz_err_msg` is the error slot SQLite passed in.
        unsafe { write_error_message(pz_err_msg, &err.to_string()) };
        return ffi::SQLITE_ERROR;
    }
    // SAFETY: arguments are forwarded unchanged from SQLite.
    unsafe { sqlite_vec_entry_point()(db, pz_err_msg, p_api) }
}

/// Initializer installing sqlite-vec on a connection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct VecInitializer {
    verify_cpu_features: bool,
}

impl Default for VecInitializer {
    fn default() -> Self {
        Self::new()
    }
}

impl VecInitializer {
    /// Initializer that checks the CPU first.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            verify_cpu_features: true,
        }
    }

    /// Initializer that trusts the build flags without checking the CPU.
    #[must_use]
    pub const fn without_cpu_check() -> Self {
        Self {
            verify_cpu_features: false,
        }
    }

    /// Whether the CPU is checked before loading.
    #[must_use]
    pub const fn verifies_cpu_features(&self) -> bool {
        self.verify_cpu_features
    }
}

impl ConnectionInitializer for VecInitializer {
    fn name(&self) -> &str {
        "vec"
    }

    #[allow(unsafe_code)]
    fn initialize(&self, conn: &Connection) -> AutoloadResult<()> {
        if self.verify_cpu_features {
            SimdFlags::COMPILED.verify_cpu_support()?;
        }

        let mut err_msg: *mut c_char = ptr::null_mut();
        // SAFETY: the handle stays valid for the borrow of `conn`; sqlite-vec is
        // compiled into the same SQLite library and ignores the API table.
        let (code, message) = unsafe {
            let code = sqlite_vec_entry_point()(conn.handle(), &mut err_msg, ptr::null());
            (code, take_error_message(err_msg))
        };

        if code == ffi::SQLITE_OK {
            Ok(())
        } else {
            Err(AutoloadError::EntryPoint {
                code,
                message: message.unwrap_or_else(|| "sqlite3_vec_init failed".to_string()),
            })
        }
    }
}
