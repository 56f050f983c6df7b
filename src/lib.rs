//! Auto-loading of the UUID and sqlite-vec extensions into every `SQLite` connection.
//!
//! Two ways in:
//! - [`register_auto_extensions`] hands both entry points to `sqlite3_auto_extension`
//!   once at startup; every connection opened afterwards, by any code in the process,
//!   carries `uuid()`/`uuid_str()`/`uuid_blob()` and the sqlite-vec functions.
//! - [`ConnectionFactory`] applies an explicit [`ExtensionRegistry`] to the
//!   connections it opens, leaving process-wide state untouched.
//!
//! The SIMD code paths of the vector extension are picked at build time, see [`simd`].

// Discipline stricte : unsafe limité aux points d'entrée FFI.
#![deny(warnings)]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(dead_code)]
#![deny(non_camel_case_types)]
#![deny(unused_imports)]
#![deny(unused_variables)]
#![deny(unused_must_use)]
#![deny(non_snake_case)]
#![deny(non_upper_case_globals)]
#![deny(nonstandard_style)]
#![forbid(unsafe_op_in_unsafe_fn)]
// Clippy
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::print_stdout)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(clippy::missing_const_for_fn)]
#![deny(clippy::unwrap_in_result)]
#![deny(clippy::module_inception)]
#![deny(clippy::redundant_clone)]
#![deny(clippy::shadow_unrelated)]
#![deny(clippy::too_many_arguments)]
#![deny(clippy::cognitive_complexity)]
#![deny(overflowing_literals)]
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::float_cmp,
        clippy::shadow_unrelated
    )
)]

/// Process-wide registration through `sqlite3_auto_extension`.
pub mod autoload;
/// Autoload configuration.
pub mod config;
/// Connection factory.
pub mod connection;
/// Error types.
pub mod errors;
/// Bundled extensions and their entry points.
pub mod extension;
/// Tracing setup.
pub mod logging;
/// Per-instance extension registry.
pub mod registry;
/// Build-time SIMD flag selection.
pub mod simd;

pub use autoload::{
    register_auto_extensions, register_configured, register_entry_point, register_extension,
    register_extensions, try_register_auto_extensions,
};
pub use config::AutoloadConfig;
pub use connection::ConnectionFactory;
pub use errors::{AutoloadError, AutoloadResult};
pub use extension::{ConnectionInitializer, Extension, ExtensionEntryPoint, VecInitializer};
pub use logging::{init_tracing, init_tracing_from_config, init_tracing_with_filter};
pub use registry::ExtensionRegistry;
pub use simd::SimdFlags;
