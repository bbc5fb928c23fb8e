//! Relation engine for many-to-many join tables.
//!
//! Four mutations associate two [`Relatable`] entities through a named join table:
//! - [`add_relation`]: insert one pair unless it exists (idempotent)
//! - [`remove_relation`]: delete one exact pair (idempotent)
//! - [`set_relations`]: replace an owner's whole association set inside one transaction
//! - [`clear_relations`]: delete every pair for an owner (idempotent)
//!
//! [`list_relations`] returns the raw association rows for an owner. Resolving the other side
//! into entities is left to callers.
//!
//! Add, remove and clear are a single statement each. A set opens a transaction, deletes the
//! owner's rows, inserts the replacement rows and commits; any failure rolls the whole
//! transaction back before the error is returned, so an error always means "nothing changed".
//! Concurrent sets for the same owner are decided by the store's isolation level. At the
//! default `READ COMMITTED`, two overlapping sets with disjoint lists can both commit and leave
//! their union. At `SERIALIZABLE` (see [`RelationStore::with_isolation_level`]) one of them is
//! aborted with the store's serialization error, so the survivor is always a whole set.

pub mod schema;
pub mod statement;

pub use schema::{create_join_table, join_table_index_statement, join_table_statement};

use crate::executor::{JunctionError, JunctionExecutor};
use crate::relatable::Relatable;
use crate::transaction::{IsolationLevel, TransactionHandle, TransactionalExecutor};
use may_postgres::types::ToSql;
use std::collections::HashSet;
use std::fmt;

#[cfg(feature = "tracing")]
use crate::metrics::tracing_helpers;
#[cfg(feature = "metrics")]
use crate::metrics::METRICS;

/// A join table: its name and the two identifier columns it holds.
///
/// Built with a `const fn` so every table the engine touches is a compile-time constant.
///
/// # Example
///
/// ```
/// use junction::JoinTable;
///
/// const FLAVORS_HYPERVISORS: JoinTable =
///     JoinTable::new("flavors_hypervisors", "flavor_id", "hypervisor_id");
///
/// assert_eq!(FLAVORS_HYPERVISORS.other_column("flavor_id"), Some("hypervisor_id"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JoinTable {
    name: &'static str,
    left: &'static str,
    right: &'static str,
}

impl JoinTable {
    pub const fn new(name: &'static str, left: &'static str, right: &'static str) -> Self {
        Self { name, left, right }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn columns(&self) -> (&'static str, &'static str) {
        (self.left, self.right)
    }

    pub fn has_column(&self, column: &str) -> bool {
        column == self.left || column == self.right
    }

    /// The column opposite `column`, or `None` if `column` is not part of this table.
    pub fn other_column(&self, column: &str) -> Option<&'static str> {
        if column == self.left {
            Some(self.right)
        } else if column == self.right {
            Some(self.left)
        } else {
            None
        }
    }
}

impl fmt::Display for JoinTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", self.name, self.left, self.right)
    }
}

/// One row of a join table, read from the owner's side.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Association {
    pub relation: &'static str,
    pub owner_id: String,
    pub related_id: String,
}

/// Associates `a` with `b` in `table`. Adding an existing pair is a no-op.
///
/// The guard and the insert are one statement. When two adds of the same pair race past the
/// guard, the pair index turns the loser's insert into a no-op through `ON CONFLICT DO NOTHING`,
/// so neither caller sees an error.
///
/// # Errors
///
/// Returns the store error unmodified.
pub fn add_relation<E, A, B>(executor: &E, table: &JoinTable, a: &A, b: &B) -> Result<(), JunctionError>
where
    E: JunctionExecutor + ?Sized,
    A: Relatable + ?Sized,
    B: Relatable + ?Sized,
{
    #[cfg(feature = "tracing")]
    let _span = tracing_helpers::relation_span("add", table.name()).entered();
    #[cfg(feature = "metrics")]
    METRICS.record_relation_op("add", table.name());
    debug_assert_columns(table, &[a.owner_column(), b.owner_column()]);

    let sql = statement::insert_pair(table, a.owner_column(), b.owner_column());
    executor.execute(&sql, &[&a.identity(), &b.identity()])?;
    Ok(())
}

/// Removes the exact pair `(a, b)` from `table`. Removing a missing pair is a no-op.
///
/// # Errors
///
/// Returns the store error unmodified.
pub fn remove_relation<E, A, B>(
    executor: &E,
    table: &JoinTable,
    a: &A,
    b: &B,
) -> Result<(), JunctionError>
where
    E: JunctionExecutor + ?Sized,
    A: Relatable + ?Sized,
    B: Relatable + ?Sized,
{
    #[cfg(feature = "tracing")]
    let _span = tracing_helpers::relation_span("remove", table.name()).entered();
    #[cfg(feature = "metrics")]
    METRICS.record_relation_op("remove", table.name());
    debug_assert_columns(table, &[a.owner_column(), b.owner_column()]);

    let sql = statement::delete_pair(table, a.owner_column(), b.owner_column());
    executor.execute(&sql, &[&a.identity(), &b.identity()])?;
    Ok(())
}

/// Removes every association `owner` has in `table`.
///
/// # Errors
///
/// Returns the store error unmodified.
pub fn clear_relations<E, O>(executor: &E, table: &JoinTable, owner: &O) -> Result<(), JunctionError>
where
    E: JunctionExecutor + ?Sized,
    O: Relatable + ?Sized,
{
    #[cfg(feature = "tracing")]
    let _span = tracing_helpers::relation_span("clear", table.name()).entered();
    #[cfg(feature = "metrics")]
    METRICS.record_relation_op("clear", table.name());
    debug_assert_columns(table, &[owner.owner_column()]);

    let sql = statement::delete_owner(table, owner.owner_column());
    executor.execute(&sql, &[&owner.identity()])?;
    Ok(())
}

/// [`set_relations_with_isolation`] at `READ COMMITTED`.
///
/// # Errors
///
/// See [`set_relations_with_isolation`].
pub fn set_relations<E, O, R>(
    executor: &E,
    table: &JoinTable,
    owner: &O,
    related: &[R],
) -> Result<(), JunctionError>
where
    E: TransactionalExecutor + ?Sized,
    O: Relatable + ?Sized,
    R: Relatable,
{
    set_relations_with_isolation(executor, table, owner, related, IsolationLevel::ReadCommitted)
}

/// Makes `related` the complete association set of `owner` in `table`.
///
/// An empty `related` behaves exactly like [`clear_relations`]. Otherwise every entry must
/// report the same `owner_column()`; repeated identifiers are collapsed, keeping the first.
/// The owner's rows are deleted and the replacement rows inserted inside one transaction
/// opened at `isolation_level`.
///
/// # Errors
///
/// - `JunctionError::MixedRelatedColumns` if the related entries disagree on their column;
///   nothing is sent to the store.
/// - Any store error. The transaction has been rolled back by the time it is returned.
pub fn set_relations_with_isolation<E, O, R>(
    executor: &E,
    table: &JoinTable,
    owner: &O,
    related: &[R],
    isolation_level: IsolationLevel,
) -> Result<(), JunctionError>
where
    E: TransactionalExecutor + ?Sized,
    O: Relatable + ?Sized,
    R: Relatable,
{
    let Some(first) = related.first() else {
        return clear_relations(executor, table, owner);
    };

    #[cfg(feature = "tracing")]
    let _span = tracing_helpers::relation_span("set", table.name()).entered();
    #[cfg(feature = "metrics")]
    METRICS.record_relation_op("set", table.name());

    let related_column = first.owner_column();
    if let Some(other) = related.iter().find(|r| r.owner_column() != related_column) {
        return Err(JunctionError::MixedRelatedColumns {
            expected: related_column.to_string(),
            found: other.owner_column().to_string(),
        });
    }
    debug_assert_columns(table, &[owner.owner_column(), related_column]);

    let related_ids = distinct_identities(related);
    let transaction = executor.begin_with_isolation(isolation_level)?;

    match replace_owner_rows(&transaction, table, owner, related_column, &related_ids) {
        Ok(()) => transaction.commit().map_err(JunctionError::from),
        Err(err) => {
            #[cfg(feature = "metrics")]
            METRICS.record_rollback(table.name());
            if let Err(rollback_err) = transaction.rollback() {
                log::error!("rollback of {} replacement failed: {rollback_err}", table.name());
            }
            Err(err)
        }
    }
}

/// Association rows in `table` whose owner column holds `owner`'s identity, ordered by the
/// related identifier.
///
/// # Errors
///
/// Returns `JunctionError::QueryError` if `owner`'s column is not part of `table`, otherwise
/// the store error unmodified.
pub fn list_relations<E, O>(
    executor: &E,
    table: &JoinTable,
    owner: &O,
) -> Result<Vec<Association>, JunctionError>
where
    E: JunctionExecutor + ?Sized,
    O: Relatable + ?Sized,
{
    let owner_column = owner.owner_column();
    let related_column = table.other_column(owner_column).ok_or_else(|| {
        JunctionError::QueryError(format!("column '{owner_column}' is not part of {table}"))
    })?;

    let sql = statement::select_owner(table, owner_column, related_column);
    let rows = executor.query_all(&sql, &[&owner.identity()])?;

    rows.iter()
        .map(|row| {
            let owner_id: String = row
                .try_get(0)
                .map_err(|e| JunctionError::ParseError(format!("{owner_column}: {e}")))?;
            let related_id: String = row
                .try_get(1)
                .map_err(|e| JunctionError::ParseError(format!("{related_column}: {e}")))?;
            Ok(Association {
                relation: table.name(),
                owner_id,
                related_id,
            })
        })
        .collect()
}

fn replace_owner_rows<E, O>(
    executor: &E,
    table: &JoinTable,
    owner: &O,
    related_column: &'static str,
    related_ids: &[&str],
) -> Result<(), JunctionError>
where
    E: JunctionExecutor + ?Sized,
    O: Relatable + ?Sized,
{
    let owner_column = owner.owner_column();
    let owner_id = owner.identity();

    executor.execute(&statement::delete_owner(table, owner_column), &[&owner_id])?;

    for chunk in related_ids.chunks(statement::MAX_ROWS_PER_INSERT) {
        let sql = statement::insert_many(table, owner_column, related_column, chunk.len());
        let mut params: Vec<&dyn ToSql> = Vec::with_capacity(chunk.len() + 1);
        params.push(&owner_id);
        for id in chunk {
            params.push(id);
        }
        executor.execute(&sql, &params)?;
    }
    Ok(())
}

fn distinct_identities<R: Relatable>(related: &[R]) -> Vec<&str> {
    let mut seen = HashSet::with_capacity(related.len());
    related
        .iter()
        .map(Relatable::identity)
        .filter(|id| seen.insert(*id))
        .collect()
}

fn debug_assert_columns(table: &JoinTable, columns: &[&str]) {
    for column in columns {
        debug_assert!(
            table.has_column(column),
            "column '{column}' is not part of join table {table}"
        );
    }
}

/// An executor paired with the isolation level used for association set replacement.
///
/// # Example
///
/// ```no_run
/// use junction::entity::{Hypervisor, IpRange, HYPERVISORS_IPRANGES};
/// use junction::{DatabaseConfig, RelationStore};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = RelationStore::connect(&DatabaseConfig::load()?)?;
/// let hypervisor = Hypervisor::new("hv-1");
///
/// store.add(&HYPERVISORS_IPRANGES, &hypervisor, &IpRange::new("ip-1"))?;
/// store.set(
///     &HYPERVISORS_IPRANGES,
///     &hypervisor,
///     &[IpRange::new("ip-1"), IpRange::new("ip-2")],
/// )?;
/// # Ok(())
/// # }
/// ```
pub struct RelationStore<E> {
    executor: E,
    set_isolation_level: IsolationLevel,
}

impl<E> RelationStore<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            set_isolation_level: IsolationLevel::ReadCommitted,
        }
    }

    pub fn with_isolation_level(mut self, isolation_level: IsolationLevel) -> Self {
        self.set_isolation_level = isolation_level;
        self
    }

    pub fn isolation_level(&self) -> IsolationLevel {
        self.set_isolation_level
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn into_executor(self) -> E {
        self.executor
    }
}

impl RelationStore<crate::executor::MayPostgresExecutor> {
    /// Connects with `config` and adopts its `set_isolation_level`.
    ///
    /// Each set replacement opens its own connection, so the store can be shared between
    /// coroutines without one caller's statements landing in another caller's transaction.
    pub fn connect(
        config: &crate::config::DatabaseConfig,
    ) -> Result<Self, crate::connection::ConnectionError> {
        config.validate()?;
        let dsn = config.data_source_name()?;
        let executor = crate::executor::MayPostgresExecutor::connect(&dsn)?;
        Ok(Self::new(executor).with_isolation_level(config.set_isolation_level))
    }
}

impl<E: TransactionalExecutor> RelationStore<E> {
    /// See [`add_relation`].
    pub fn add<A, B>(&self, table: &JoinTable, a: &A, b: &B) -> Result<(), JunctionError>
    where
        A: Relatable + ?Sized,
        B: Relatable + ?Sized,
    {
        add_relation(&self.executor, table, a, b)
    }

    /// See [`remove_relation`].
    pub fn remove<A, B>(&self, table: &JoinTable, a: &A, b: &B) -> Result<(), JunctionError>
    where
        A: Relatable + ?Sized,
        B: Relatable + ?Sized,
    {
        remove_relation(&self.executor, table, a, b)
    }

    /// See [`set_relations_with_isolation`]; uses this store's isolation level.
    pub fn set<O, R>(&self, table: &JoinTable, owner: &O, related: &[R]) -> Result<(), JunctionError>
    where
        O: Relatable + ?Sized,
        R: Relatable,
    {
        set_relations_with_isolation(&self.executor, table, owner, related, self.set_isolation_level)
    }

    /// See [`clear_relations`].
    pub fn clear<O>(&self, table: &JoinTable, owner: &O) -> Result<(), JunctionError>
    where
        O: Relatable + ?Sized,
    {
        clear_relations(&self.executor, table, owner)
    }

    /// See [`list_relations`].
    pub fn list<O>(&self, table: &JoinTable, owner: &O) -> Result<Vec<Association>, JunctionError>
    where
        O: Relatable + ?Sized,
    {
        list_relations(&self.executor, table, owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Hypervisor, IpRange, Network, Project, User, HYPERVISORS_IPRANGES, PROJECTS_USERS};
    use crate::tests_cfg::RecordingExecutor;

    #[test]
    fn test_join_table_columns() {
        assert_eq!(PROJECTS_USERS.name(), "projects_users");
        assert_eq!(PROJECTS_USERS.columns(), ("project_id", "user_id"));
        assert!(PROJECTS_USERS.has_column("user_id"));
        assert!(!PROJECTS_USERS.has_column("permission_id"));
        assert_eq!(PROJECTS_USERS.other_column("project_id"), Some("user_id"));
        assert_eq!(PROJECTS_USERS.other_column("user_id"), Some("project_id"));
        assert_eq!(PROJECTS_USERS.other_column("network_id"), None);
        assert_eq!(PROJECTS_USERS.to_string(), "projects_users(project_id, user_id)");
    }

    #[test]
    fn test_add_binds_identities_in_argument_order() {
        let executor = RecordingExecutor::new();
        add_relation(&executor, &HYPERVISORS_IPRANGES, &Hypervisor::new("hv-1"), &IpRange::new("ip-1"))
            .expect("add should succeed");

        let log = executor.statements();
        assert_eq!(log.len(), 1);
        assert!(log[0].sql.starts_with(
            "INSERT INTO \"hypervisors_ipranges\" (\"hypervisor_id\", \"iprange_id\")"
        ));
        assert!(log[0].sql.contains("WHERE NOT EXISTS"));
        assert!(log[0].sql.ends_with("ON CONFLICT DO NOTHING"));
        assert_eq!(log[0].params, vec!["hv-1", "ip-1"]);
    }

    #[test]
    fn test_swapped_arguments_target_swapped_columns() {
        let executor = RecordingExecutor::new();
        let hv = Hypervisor::new("hv-1");
        let ip = IpRange::new("ip-1");

        add_relation(&executor, &HYPERVISORS_IPRANGES, &hv, &ip).expect("add");
        add_relation(&executor, &HYPERVISORS_IPRANGES, &ip, &hv).expect("reverse add");

        let log = executor.statements();
        assert_ne!(log[0].sql, log[1].sql);
        assert!(log[1].sql.contains("(\"iprange_id\", \"hypervisor_id\")"));
        assert_eq!(log[1].params, vec!["ip-1", "hv-1"]);
    }

    #[test]
    fn test_remove_matches_both_columns() {
        let executor = RecordingExecutor::new();
        remove_relation(&executor, &PROJECTS_USERS, &Project::new("p-1"), &User::new("u-1"))
            .expect("remove should succeed");

        let log = executor.statements();
        assert_eq!(
            log[0].sql,
            "DELETE FROM \"projects_users\" WHERE \"project_id\" = $1 AND \"user_id\" = $2"
        );
        assert_eq!(log[0].params, vec!["p-1", "u-1"]);
    }

    #[test]
    fn test_clear_deletes_by_owner_only() {
        let executor = RecordingExecutor::new();
        clear_relations(&executor, &PROJECTS_USERS, &Project::new("p-1")).expect("clear");

        let log = executor.statements();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].sql, "DELETE FROM \"projects_users\" WHERE \"project_id\" = $1");
        assert_eq!(log[0].params, vec!["p-1"]);
    }

    #[test]
    fn test_store_errors_are_returned_unmodified() {
        let executor = RecordingExecutor::failing_on("INSERT");
        let err = add_relation(&executor, &PROJECTS_USERS, &Project::new("p-1"), &User::new("u-1"))
            .unwrap_err();
        assert!(matches!(err, JunctionError::QueryError(ref msg) if msg == "injected failure"));
    }

    #[test]
    fn test_set_replaces_inside_one_transaction() {
        let executor = RecordingExecutor::new();
        let hv = Hypervisor::new("hv-1");

        set_relations(
            &executor,
            &HYPERVISORS_IPRANGES,
            &hv,
            &[IpRange::new("ip-1"), IpRange::new("ip-2")],
        )
        .expect("set should succeed");

        let log = executor.statements();
        let sql: Vec<&str> = log.iter().map(|s| s.sql.as_str()).collect();
        assert_eq!(
            sql,
            vec![
                "BEGIN ISOLATION LEVEL READ COMMITTED",
                "DELETE FROM \"hypervisors_ipranges\" WHERE \"hypervisor_id\" = $1",
                "INSERT INTO \"hypervisors_ipranges\" (\"hypervisor_id\", \"iprange_id\") VALUES ($1, $2), ($1, $3)",
                "COMMIT",
            ]
        );
        assert_eq!(log[1].params, vec!["hv-1"]);
        assert_eq!(log[2].params, vec!["hv-1", "ip-1", "ip-2"]);
    }

    #[test]
    fn test_empty_set_is_a_clear_without_transaction() {
        let executor = RecordingExecutor::new();
        let related: [IpRange; 0] = [];

        set_relations(&executor, &HYPERVISORS_IPRANGES, &Hypervisor::new("hv-1"), &related)
            .expect("empty set should succeed");

        let log = executor.statements();
        assert_eq!(log.len(), 1);
        assert_eq!(
            log[0].sql,
            statement::delete_owner(&HYPERVISORS_IPRANGES, "hypervisor_id")
        );
    }

    #[test]
    fn test_set_rolls_back_when_insert_fails() {
        let executor = RecordingExecutor::failing_on("INSERT");

        let err = set_relations(
            &executor,
            &PROJECTS_USERS,
            &Project::new("p-1"),
            &[User::new("u-1"), User::new("u-2")],
        )
        .unwrap_err();

        assert!(matches!(err, JunctionError::QueryError(_)));
        let sql: Vec<String> = executor.statements().into_iter().map(|s| s.sql).collect();
        assert_eq!(sql.first().map(String::as_str), Some("BEGIN ISOLATION LEVEL READ COMMITTED"));
        assert_eq!(sql.last().map(String::as_str), Some("ROLLBACK"));
        assert!(!sql.iter().any(|s| s == "COMMIT"));
    }

    #[test]
    fn test_set_reports_failed_commit_once() {
        let executor = RecordingExecutor::failing_on("COMMIT");

        let err = set_relations(
            &executor,
            &PROJECTS_USERS,
            &Project::new("p-1"),
            &[User::new("u-1")],
        )
        .unwrap_err();

        assert!(matches!(err, JunctionError::Other(ref msg) if msg.contains("injected failure")));
        let sql: Vec<String> = executor.statements().into_iter().map(|s| s.sql).collect();
        assert_eq!(sql.iter().filter(|s| s.as_str() == "COMMIT").count(), 1);
        assert_eq!(sql.last().map(String::as_str), Some("COMMIT"));
    }

    #[test]
    fn test_set_rolls_back_when_delete_fails() {
        let executor = RecordingExecutor::failing_on("DELETE");

        let result = set_relations(&executor, &PROJECTS_USERS, &Project::new("p-1"), &[User::new("u-1")]);

        assert!(result.is_err());
        let sql: Vec<String> = executor.statements().into_iter().map(|s| s.sql).collect();
        assert!(!sql.iter().any(|s| s.starts_with("INSERT")));
        assert_eq!(sql.last().map(String::as_str), Some("ROLLBACK"));
    }

    #[test]
    fn test_set_rejects_mixed_related_columns_before_touching_store() {
        let executor = RecordingExecutor::new();
        let user = User::new("u-1");
        let network = Network::new("n-1");
        let related: [&dyn Relatable; 2] = [&user, &network];

        let err = set_relations(&executor, &PROJECTS_USERS, &Project::new("p-1"), &related).unwrap_err();

        match err {
            JunctionError::MixedRelatedColumns { expected, found } => {
                assert_eq!(expected, "user_id");
                assert_eq!(found, "network_id");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(executor.statements().is_empty());
    }

    #[test]
    fn test_set_collapses_duplicate_identities() {
        let executor = RecordingExecutor::new();

        set_relations(
            &executor,
            &PROJECTS_USERS,
            &Project::new("p-1"),
            &[User::new("u-2"), User::new("u-1"), User::new("u-2")],
        )
        .expect("set should succeed");

        let insert = executor
            .statements()
            .into_iter()
            .find(|s| s.sql.starts_with("INSERT"))
            .expect("insert statement");
        assert_eq!(insert.params, vec!["p-1", "u-2", "u-1"]);
    }

    #[test]
    fn test_set_splits_large_sets_into_batches() {
        let executor = RecordingExecutor::new();
        let users: Vec<User> = (0..statement::MAX_ROWS_PER_INSERT + 5)
            .map(|i| User::new(format!("u-{i}")))
            .collect();

        set_relations(&executor, &PROJECTS_USERS, &Project::new("p-1"), &users).expect("set");

        let inserts: Vec<_> = executor
            .statements()
            .into_iter()
            .filter(|s| s.sql.starts_with("INSERT"))
            .collect();
        assert_eq!(inserts.len(), 2);
        assert_eq!(inserts[0].params.len(), statement::MAX_ROWS_PER_INSERT + 1);
        assert_eq!(inserts[1].params, vec!["p-1", "u-1000", "u-1001", "u-1002", "u-1003", "u-1004"]);
    }

    #[test]
    fn test_store_isolation_level_reaches_begin() {
        let store = RelationStore::new(RecordingExecutor::new())
            .with_isolation_level(IsolationLevel::Serializable);

        store
            .set(&PROJECTS_USERS, &Project::new("p-1"), &[User::new("u-1")])
            .expect("set");

        let log = store.executor().statements();
        assert_eq!(log[0].sql, "BEGIN ISOLATION LEVEL SERIALIZABLE");
    }

    #[test]
    fn test_list_rejects_foreign_owner_column() {
        let executor = RecordingExecutor::new();
        let err = list_relations(&executor, &PROJECTS_USERS, &Network::new("n-1")).unwrap_err();
        assert!(err.to_string().contains("network_id"));
        assert!(executor.statements().is_empty());
    }

    #[test]
    fn test_list_selects_by_owner() {
        let executor = RecordingExecutor::new();
        let rows = list_relations(&executor, &PROJECTS_USERS, &User::new("u-1")).expect("list");

        assert!(rows.is_empty());
        let log = executor.statements();
        assert_eq!(
            log[0].sql,
            "SELECT \"user_id\", \"project_id\" FROM \"projects_users\" WHERE \"user_id\" = $1 ORDER BY \"project_id\""
        );
        assert_eq!(log[0].params, vec!["u-1"]);
    }
}
