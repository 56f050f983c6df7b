//! Error types for extension registration and connection setup.

use thiserror::Error;

/// Autoload error type.
#[derive(Debug, Error)]
pub enum AutoloadError {
    /// `SQLite` error raised through rusqlite.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// The engine rejected an auto-extension registration.
    #[error("failed to register auto-extension `{extension}` (sqlite code {code})")]
    Registration {
        /// Extension name.
        extension: &'static str,
        /// Status code returned by `sqlite3_auto_extension`.
        code: i32,
    },
    /// An extension entry point reported a failure.
    #[error("extension entry point failed (sqlite code {code}): {message}")]
    EntryPoint {
        /// Status code returned by the entry point.
        code: i32,
        /// Message written by the entry point, if any.
        message: String,
    },
    /// An initializer failed while setting up a connection.
    #[error("extension `{extension}` failed to initialize connection: {source}")]
    ExtensionInit {
        /// Initializer name.
        extension: String,
        /// Underlying failure.
        #[source]
        source: Box<AutoloadError>,
    },
    /// The running CPU lacks a SIMD feature this build was compiled with.
    #[error("cpu does not support the `{feature}` code path compiled into sqlite-vec")]
    UnsupportedCpu {
        /// Missing feature.
        feature: &'static str,
    },
    /// Invalid configuration or unsupported values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result alias for autoload operations.
pub type AutoloadResult<T> = Result<T, AutoloadError>;
