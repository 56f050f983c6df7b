//! The extensions this crate knows how to load, and the glue shared by their
//! C-ABI entry points.

pub mod uuid;
pub mod vec;

use std::ffi::CStr;
use std::fmt;
use std::os::raw::{c_char, c_int};
use std::str::FromStr;

use rusqlite::Connection;
use rusqlite::ffi::{self, sqlite3, sqlite3_api_routines};
use serde::{Deserialize, Serialize};

use crate::errors::AutoloadResult;

pub use self::uuid::sqlite3_uuid_init;
pub use self::vec::{VecInitializer, sqlite3_vec_autoload_init};

/// Signature `SQLite` requires of an extension initializer.
pub type ExtensionEntryPoint =
    unsafe extern "C" fn(*mut sqlite3, *mut *mut c_char, *const sqlite3_api_routines) -> c_int;

/// Something that can install functionality onto a single connection.
pub trait ConnectionInitializer: Send + Sync {
    /// Stable name, used in logs and errors.
    fn name(&self) -> &str;

    /// Install onto `conn`.
    ///
    /// # Errors
    /// Returns an error if the connection could not be set up.
    fn initialize(&self, conn: &Connection) -> AutoloadResult<()>;
}

/// A bundled extension.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extension {
    /// `uuid()`, `uuid_str(X)` and `uuid_blob(X)`.
    Uuid,
    /// sqlite-vec: `vec0` virtual tables and vector distance functions.
    Vec,
}

impl Extension {
    /// All extensions, in registration order.
    pub const ALL: &'static [Self] = &[Self::Uuid, Self::Vec];

    /// Stable string identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uuid => "uuid",
            Self::Vec => "vec",
        }
    }

    /// Entry point handed to the engine for this extension.
    ///
    /// The vector entry point checks the CPU against [`crate::SimdFlags::COMPILED`]
    /// before delegating to sqlite-vec.
    #[must_use]
    pub const fn entry_point(self) -> ExtensionEntryPoint {
        self.entry_point_with(true)
    }

    /// Entry point, optionally skipping the vector extension's CPU check.
    #[must_use]
    pub const fn entry_point_with(self, verify_cpu_features: bool) -> ExtensionEntryPoint {
        match self {
            Self::Uuid => sqlite3_uuid_init,
            Self::Vec if verify_cpu_features => sqlite3_vec_autoload_init,
            Self::Vec => vec::sqlite_vec_entry_point(),
        }
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown extension name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExtensionParseError {
    value: String,
}

impl ExtensionParseError {
    /// The raw value that failed parsing.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ExtensionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid extension: {}", self.value)
    }
}

impl std::error::Error for ExtensionParseError {}

impl FromStr for Extension {
    type Err = ExtensionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.eq_ignore_ascii_case("uuid") {
            Ok(Self::Uuid)
        } else if raw.eq_ignore_ascii_case("vec") || raw.eq_ignore_ascii_case("sqlite-vec") {
            Ok(Self::Vec)
        } else {
            Err(ExtensionParseError {
                value: raw.to_string(),
            })
        }
    }
}

impl ConnectionInitializer for Extension {
    fn name(&self) -> &str {
        self.as_str()
    }

    fn initialize(&self, conn: &Connection) -> AutoloadResult<()> {
        match self {
            Self::Uuid => Ok(uuid::register_functions(conn)?),
            Self::Vec => VecInitializer::new().initialize(conn),
        }
    }
}

/// Store `message` in the engine's error slot, in memory the engine can free.
///
/// For use inside a custom initializer before it returns a non-OK status.
///
/// # Safety
/// `slot` must be null or valid for writing one pointer.
#[allow(unsafe_code)]
pub unsafe fn write_error_message(slot: *mut *mut c_char, message: &str) {
    if slot.is_null() {
        return;
    }
    let bytes = message.as_bytes();
    let Ok(size) = c_int::try_from(bytes.len() + 1) else {
        return;
    };
    // SAFETY: the buffer comes from sqlite3_malloc with room for the message and its
    // NUL terminator; SQLite releases it with sqlite3_free once it has read it.
    unsafe {
        let buf = ffi::sqlite3_malloc(size).cast::<u8>();
        if buf.is_null() {
            return;
        }
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf, bytes.len());
        *buf.add(bytes.len()) = 0;
        *slot = buf.cast::<c_char>();
    }
}

/// Take ownership of a message an entry point wrote, freeing the engine buffer.
///
/// # Safety
/// `message` must be null or a NUL-terminated string allocated by `SQLite`.
#[allow(unsafe_code)]
pub(crate) unsafe fn take_error_message(message: *mut c_char) -> Option<String> {
    if message.is_null() {
        return None;
    }
    // SAFETY: guaranteed by the caller; the buffer is not used after sqlite3_free.
    unsafe {
        let text = CStr::from_ptr(message).to_string_lossy().into_owned();
        ffi::sqlite3_free(message.cast());
        Some(text)
    }
}
