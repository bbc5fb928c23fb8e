//! Helpers for tests that need a live PostgreSQL.
//!
//! The database comes from `TEST_DATABASE_URL`. When it is unset, [`TestDatabase::from_env`]
//! returns `None` and callers skip.

use crate::connection::{connect, ConnectionError};
use crate::executor::{JunctionError, MayPostgresExecutor};
use crate::relation::{create_join_table, JoinTable, RelationStore};
use may_postgres::Client;

pub const TEST_DATABASE_URL: &str = "TEST_DATABASE_URL";

pub struct TestDatabase {
    url: String,
    client: Option<Client>,
}

impl TestDatabase {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: None,
        }
    }

    pub fn from_env() -> Option<Self> {
        match std::env::var(TEST_DATABASE_URL) {
            Ok(url) if !url.trim().is_empty() => Some(Self::new(url)),
            _ => {
                log::warn!("{TEST_DATABASE_URL} is not set; skipping database test");
                None
            }
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Connects on first use; later calls share the same client.
    pub fn connect(&mut self) -> Result<&Client, ConnectionError> {
        if self.client.is_none() {
            self.client = Some(connect(&self.url)?);
        }
        self.client
            .as_ref()
            .ok_or_else(|| ConnectionError::Other("client missing after connect".to_string()))
    }

    /// Shares the test client for single statements; transactions dial their own connection.
    pub fn executor(&mut self) -> Result<MayPostgresExecutor, ConnectionError> {
        let client = self.connect()?.clone();
        Ok(MayPostgresExecutor::new(client).with_connection_string(self.url.clone()))
    }

    pub fn store(&mut self) -> Result<RelationStore<MayPostgresExecutor>, ConnectionError> {
        Ok(RelationStore::new(self.executor()?))
    }

    /// Creates each table (and its pair index) if missing.
    pub fn create_join_tables(&mut self, tables: &[JoinTable]) -> Result<(), JunctionError> {
        let executor = self
            .executor()
            .map_err(|e| JunctionError::Other(format!("Connection error: {e}")))?;
        for table in tables {
            create_join_table(&executor, table)?;
        }
        Ok(())
    }
}
