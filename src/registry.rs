//! Explicit, per-instance extension registry.
//!
//! Mirrors the engine's process-wide auto-extension list without touching it:
//! initializers run in registration order on every connection the registry is
//! applied to, duplicates run once per entry, and the first failure aborts.

use std::fmt;
use std::sync::Arc;

use rusqlite::Connection;
use tracing::debug;

use crate::config::AutoloadConfig;
use crate::errors::{AutoloadError, AutoloadResult};
use crate::extension::{ConnectionInitializer, Extension, VecInitializer};

/// Ordered list of connection initializers.
#[derive(Clone, Default)]
pub struct ExtensionRegistry {
    entries: Vec<Arc<dyn ConnectionInitializer>>,
}

impl ExtensionRegistry {
    /// Empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registry holding every bundled extension, in [`Extension::ALL`] order.
    #[must_use]
    pub fn with_default_extensions() -> Self {
        let mut registry = Self::new();
        for extension in Extension::ALL {
            registry.register(*extension);
        }
        registry
    }

    /// Registry holding the configured extensions, in configuration order.
    #[must_use]
    pub fn from_config(config: &AutoloadConfig) -> Self {
        let mut registry = Self::new();
        for extension in &config.extensions {
            match extension {
                Extension::Vec if !config.verify_cpu_features => {
                    registry.register(VecInitializer::without_cpu_check());
                }
                other => {
                    registry.register(*other);
                }
            }
        }
        registry
    }

    /// Append an initializer. Registering the same initializer twice is allowed.
    pub fn register<I>(&mut self, initializer: I) -> &mut Self
    where
        I: ConnectionInitializer + 'static,
    {
        self.entries.push(Arc::new(initializer));
        self
    }

    /// Append an already shared initializer.
    pub fn register_shared(&mut self, initializer: Arc<dyn ConnectionInitializer>) -> &mut Self {
        self.entries.push(initializer);
        self
    }

    /// Number of registered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry names, in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.name()).collect()
    }

    /// Run every initializer on `conn`, in registration order.
    ///
    /// # Errors
    /// Returns [`AutoloadError::ExtensionInit`] for the first initializer that fails;
    /// later initializers are not run.
    pub fn apply(&self, conn: &Connection) -> AutoloadResult<()> {
        for entry in &self.entries {
            debug!(extension = entry.name(), "initializing connection");
            entry
                .initialize(conn)
                .map_err(|source| AutoloadError::ExtensionInit {
                    extension: entry.name().to_string(),
                    source: Box::new(source),
                })?;
        }
        Ok(())
    }
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionRegistry")
            .field("entries", &self.names())
            .finish()
    }
}
