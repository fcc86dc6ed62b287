/*!
 * Database connection management.
 *
 * This module builds the connection descriptor from configuration, opens the
 * SQLite connection and provides async-safe access patterns using tokio's
 * spawn_blocking.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::{Connection, OpenFlags};
use std::fmt;
use std::sync::{Arc, Mutex};
use url::{Url, form_urlencoded};

use crate::app_config::DatabaseConfig;
use crate::errors::DatabaseError;

/// Database name that opens a private in-memory database
pub const IN_MEMORY: &str = ":memory:";

/// Driver identifiers this build can open
const SQLITE_DRIVERS: [&str; 2] = ["sqlite", "sqlite3"];

/// Connection URL assembled from the configuration values
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionDescriptor {
    url: Url,
}

impl ConnectionDescriptor {
    /// Build `{driver}://{user}:{password}@{host}/{database}?schema={schema}`
    pub fn from_config(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let invalid = |message: String| DatabaseError::ConnectionFailed {
            database: config.database.clone(),
            message,
        };

        // SQLite ignores the host, so one that is not a valid URL host is recorded percent-encoded
        let mut url = Url::parse(&format!("{}://{}/", config.driver, config.host))
            .or_else(|_| {
                let encoded: String = form_urlencoded::byte_serialize(config.host.as_bytes()).collect();
                Url::parse(&format!("{}://{}/", config.driver, encoded))
            })
            .map_err(|e| invalid(format!("invalid connection descriptor: {}", e)))?;

        if !config.username.is_empty() {
            url.set_username(&config.username)
                .map_err(|_| invalid("credentials require a host".to_string()))?;
        }
        if !config.password.is_empty() {
            url.set_password(Some(&config.password))
                .map_err(|_| invalid("credentials require a host".to_string()))?;
        }

        url.path_segments_mut()
            .map_err(|_| invalid("descriptor cannot carry a database name".to_string()))?
            .pop_if_empty()
            .push(&config.database);
        url.query_pairs_mut().append_pair("schema", &config.schema);

        Ok(Self { url })
    }

    /// Driver identifier (the URL scheme)
    pub fn driver(&self) -> &str {
        self.url.scheme()
    }

    /// Full descriptor, including the password
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl fmt::Display for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut redacted = self.url.clone();
        if redacted.password().is_some() {
            let _ = redacted.set_password(Some("***"));
        }
        write!(f, "{}", redacted)
    }
}

/// Database connection wrapper with thread-safe access
pub struct DatabaseConnection {
    /// Descriptor the connection was opened from
    descriptor: ConnectionDescriptor,
    /// Thread-safe connection wrapped in Arc<Mutex>
    connection: Arc<Mutex<Connection>>,
}

impl DatabaseConnection {
    /// Open the database described by the configuration.
    ///
    /// Existing database files are opened read-write without the create flag,
    /// so a wrong path fails here instead of producing an empty database.
    pub fn open(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let driver = config.driver.to_lowercase();
        if !SQLITE_DRIVERS.contains(&driver.as_str()) {
            return Err(DatabaseError::UnsupportedDriver(config.driver.clone()));
        }

        let descriptor = ConnectionDescriptor::from_config(config)?;
        info!("Opening database at: {}", descriptor);

        if !config.username.is_empty() || !config.password.is_empty() {
            debug!("SQLite does not use credentials; ignoring username and password");
        }

        let conn = if config.database == IN_MEMORY {
            Connection::open_in_memory()
        } else {
            Connection::open_with_flags(
                &config.database,
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
        }
        .map_err(|e| DatabaseError::ConnectionFailed {
            database: config.database.clone(),
            message: e.to_string(),
        })?;

        Ok(Self {
            descriptor,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self, DatabaseError> {
        debug!("Creating in-memory database");

        Self::open(&DatabaseConfig {
            database: IN_MEMORY.to_string(),
            ..DatabaseConfig::default()
        })
    }

    /// Descriptor the connection was opened from
    pub fn descriptor(&self) -> &ConnectionDescriptor {
        &self.descriptor
    }

    /// Execute a database operation with the connection
    ///
    /// This method acquires the mutex lock and executes the provided closure
    /// with access to the connection. For async contexts, use `execute_async`.
    pub fn execute<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .connection
            .lock()
            .map_err(|e| anyhow::anyhow!("Failed to acquire database lock: {}", e))?;

        f(&conn)
    }

    /// Execute a database operation asynchronously using spawn_blocking
    ///
    /// This is the preferred method for async contexts as it prevents
    /// blocking the async runtime.
    pub async fn execute_async<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.connection.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| anyhow::anyhow!("Failed to acquire database lock: {}", e))?;

            f(&conn)
        })
        .await
        .context("Database task panicked")?
    }

    /// Close the connection, reporting any error from the driver.
    ///
    /// Dropping the connection also closes it; this variant lets the caller log
    /// a failed close.
    pub fn close(self) -> Result<()> {
        let mutex = Arc::try_unwrap(self.connection)
            .map_err(|_| anyhow::anyhow!("Database connection is still shared"))?;
        let conn = mutex
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Database lock poisoned: {}", e))?;

        conn.close()
            .map_err(|(_, e)| anyhow::anyhow!("Failed to close database: {}", e))?;

        debug!("Database connection closed");
        Ok(())
    }
}

impl fmt::Debug for DatabaseConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConnection")
            .field("descriptor", &self.descriptor.to_string())
            .finish()
    }
}
