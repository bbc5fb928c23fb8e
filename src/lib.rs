//! # Junction
//!
//! Coroutine-native persistence for many-to-many join tables on PostgreSQL, using the `may`
//! runtime through `may_postgres`.
//!
//! Entities implement [`Relatable`]; a [`JoinTable`] names the table and its two columns; the
//! relation engine adds, removes, replaces and clears associations. Replacing an owner's set
//! runs inside a single transaction, so readers see either the old set or the new one.
//!
//! ```no_run
//! use junction::entity::{Project, User};
//! use junction::{DatabaseConfig, RelationStore};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = RelationStore::connect(&DatabaseConfig::load()?)?;
//! let mut project = Project::new("p-1");
//!
//! project.set_users(&store, &[User::new("u-1"), User::new("u-2")])?;
//! assert_eq!(project.users, vec!["u-1".to_string(), "u-2".to_string()]);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connection;
pub mod entity;
pub mod executor;
#[cfg(feature = "tracing")]
pub mod logging;
pub mod metrics;
pub mod relatable;
pub mod relation;
pub mod transaction;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
#[cfg(test)]
mod tests_cfg;

pub use config::DatabaseConfig;
pub use connection::{connect, connect_with_config, ConnectionError};
pub use executor::{JunctionError, JunctionExecutor, MayPostgresExecutor};
pub use relatable::Relatable;
pub use relation::{
    add_relation, clear_relations, create_join_table, list_relations, remove_relation,
    set_relations, set_relations_with_isolation, Association, JoinTable, RelationStore,
};
pub use transaction::{
    IsolationLevel, Transaction, TransactionError, TransactionHandle, TransactionalExecutor,
};
