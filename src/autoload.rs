//! Process-wide auto-extension registration.
//!
//! Registering hands an entry point to `sqlite3_auto_extension`; `SQLite` then runs
//! it on every connection opened afterwards, in registration order. Connections
//! that are already open are not affected, and nothing here unregisters.

use std::os::raw::c_int;

use rusqlite::ffi;
use tracing::{error, info};

use crate::config::AutoloadConfig;
use crate::errors::{AutoloadError, AutoloadResult};
use crate::extension::{Extension, ExtensionEntryPoint};
use crate::simd::SimdFlags;

#[allow(unsafe_code)]
fn auto_extension(entry_point: ExtensionEntryPoint) -> c_int {
    // SAFETY: sqlite3_auto_extension only records the pointer; every entry point
    // passed here has the initializer signature SQLite expects.
    unsafe { ffi::sqlite3_auto_extension(Some(entry_point)) }
}

/// Register a custom initializer, named `name` in errors, for every connection
/// opened from now on.
///
/// The initializer reports failure by returning a non-OK status, optionally with a
/// message written through [`crate::extension::write_error_message`]; that fails
/// the open of each later connection.
///
/// # Errors
/// Returns [`AutoloadError::Registration`] if `SQLite` rejects the entry point.
pub fn register_entry_point(
    name: &'static str,
    entry_point: ExtensionEntryPoint,
) -> AutoloadResult<()> {
    let code = auto_extension(entry_point);
    if code == ffi::SQLITE_OK {
        Ok(())
    } else {
        Err(AutoloadError::Registration {
            extension: name,
            code,
        })
    }
}

/// Register one extension for every connection opened from now on.
///
/// # Errors
/// Returns [`AutoloadError::Registration`] if `SQLite` rejects the entry point.
pub fn register_extension(extension: Extension) -> AutoloadResult<()> {
    register_entry_point(extension.as_str(), extension.entry_point())
}

/// Register several extensions, in order, stopping at the first rejection.
///
/// # Errors
/// Returns [`AutoloadError::Registration`] if `SQLite` rejects an entry point.
pub fn register_extensions(extensions: &[Extension]) -> AutoloadResult<()> {
    for extension in extensions {
        register_extension(*extension)?;
    }
    info!(
        extensions = ?extensions.iter().copied().map(Extension::as_str).collect::<Vec<_>>(),
        simd = ?SimdFlags::COMPILED.enabled_names(),
        "sqlite auto-extensions registered"
    );
    Ok(())
}

/// Register the UUID and sqlite-vec extensions, surfacing engine failures.
///
/// # Errors
/// Returns [`AutoloadError::Registration`] if `SQLite` rejects an entry point.
pub fn try_register_auto_extensions() -> AutoloadResult<()> {
    register_extensions(Extension::ALL)
}

/// Register the UUID and sqlite-vec extensions for every connection opened from now on.
///
/// Call once during startup, before opening connections that need the extensions.
/// Repeat calls are tolerated: `SQLite` ignores entry points it already holds.
/// Engine failures are logged, not returned.
pub fn register_auto_extensions() {
    let mut failed = false;
    for extension in Extension::ALL {
        if let Err(err) = register_extension(*extension) {
            error!(error = %err, "sqlite auto-extension registration failed");
            failed = true;
        }
    }
    if !failed {
        info!(
            simd = ?SimdFlags::COMPILED.enabled_names(),
            "sqlite auto-extensions registered"
        );
    }
}

/// Register the extensions listed in `config`, in configuration order.
///
/// # Errors
/// Returns an error if the configuration is invalid or `SQLite` rejects an entry point.
pub fn register_configured(config: &AutoloadConfig) -> AutoloadResult<()> {
    config.validate()?;
    for extension in &config.extensions {
        register_entry_point(
            extension.as_str(),
            extension.entry_point_with(config.verify_cpu_features),
        )?;
    }
    info!(
        extensions = ?config.extensions,
        verify_cpu_features = config.verify_cpu_features,
        "sqlite auto-extensions registered from config"
    );
    Ok(())
}
