//! Connection factory applying an [`ExtensionRegistry`] to every connection it opens.

use std::path::Path;

use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use crate::config::AutoloadConfig;
use crate::errors::AutoloadResult;
use crate::registry::ExtensionRegistry;

/// Opens connections with a fixed set of extensions installed.
#[derive(Clone, Debug, Default)]
pub struct ConnectionFactory {
    registry: ExtensionRegistry,
}

impl ConnectionFactory {
    /// Factory applying `registry` to every opened connection.
    #[must_use]
    pub const fn new(registry: ExtensionRegistry) -> Self {
        Self { registry }
    }

    /// Factory applying the configured extensions.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn from_config(config: &AutoloadConfig) -> AutoloadResult<Self> {
        config.validate()?;
        Ok(Self::new(ExtensionRegistry::from_config(config)))
    }

    /// The registry applied on open.
    #[must_use]
    pub const fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    /// Open a database file.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or an extension fails to
    /// initialize on it.
    pub fn open<P: AsRef<Path>>(&self, path: P) -> AutoloadResult<Connection> {
        let conn = Connection::open(path.as_ref())?;
        self.prepare(conn)
    }

    /// Open a database file with explicit open flags.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or an extension fails to
    /// initialize on it.
    pub fn open_with_flags<P: AsRef<Path>>(
        &self,
        path: P,
        flags: OpenFlags,
    ) -> AutoloadResult<Connection> {
        let conn = Connection::open_with_flags(path.as_ref(), flags)?;
        self.prepare(conn)
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    /// Returns an error if an extension fails to initialize on the connection.
    pub fn open_in_memory(&self) -> AutoloadResult<Connection> {
        let conn = Connection::open_in_memory()?;
        self.prepare(conn)
    }

    fn prepare(&self, conn: Connection) -> AutoloadResult<Connection> {
        self.registry.apply(&conn)?;
        debug!(extensions = ?self.registry.names(), "connection ready");
        Ok(conn)
    }
}
