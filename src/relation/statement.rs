//! Statement text for join-table operations.
//!
//! Table and column names come from `JoinTable` constants and `Relatable::owner_column`, both
//! fixed at compile time, so they are templated into the text. Identifier values never are:
//! every value is a `$n` placeholder.

use super::JoinTable;

/// Rows per multi-row `INSERT`, keeping each statement far below PostgreSQL's bind limit.
pub const MAX_ROWS_PER_INSERT: usize = 1000;

/// Double-quotes an identifier, doubling embedded quotes.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Inserts the pair `($1, $2)` unless that exact pair is already present.
///
/// `ON CONFLICT DO NOTHING` covers a concurrent insert of the same pair that committed after
/// the guard was evaluated.
pub fn insert_pair(table: &JoinTable, first_column: &str, second_column: &str) -> String {
    let table = quote_ident(table.name());
    let first = quote_ident(first_column);
    let second = quote_ident(second_column);
    format!(
        "INSERT INTO {table} ({first}, {second}) \
         SELECT $1, $2 \
         WHERE NOT EXISTS (SELECT 1 FROM {table} WHERE {first} = $1 AND {second} = $2) \
         ON CONFLICT DO NOTHING"
    )
}

/// Deletes the pair `($1, $2)`.
pub fn delete_pair(table: &JoinTable, first_column: &str, second_column: &str) -> String {
    format!(
        "DELETE FROM {} WHERE {} = $1 AND {} = $2",
        quote_ident(table.name()),
        quote_ident(first_column),
        quote_ident(second_column)
    )
}

/// Deletes every row whose owner column equals `$1`.
pub fn delete_owner(table: &JoinTable, owner_column: &str) -> String {
    format!(
        "DELETE FROM {} WHERE {} = $1",
        quote_ident(table.name()),
        quote_ident(owner_column)
    )
}

/// Inserts `rows` pairs; `$1` is the owner and `$2..=$rows+1` the related identifiers.
pub fn insert_many(
    table: &JoinTable,
    owner_column: &str,
    related_column: &str,
    rows: usize,
) -> String {
    let values = (0..rows)
        .map(|i| format!("($1, ${})", i + 2))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}, {}) VALUES {values}",
        quote_ident(table.name()),
        quote_ident(owner_column),
        quote_ident(related_column)
    )
}

/// Selects `(owner, related)` rows for owner `$1`, ordered by the related identifier.
pub fn select_owner(table: &JoinTable, owner_column: &str, related_column: &str) -> String {
    let owner = quote_ident(owner_column);
    let related = quote_ident(related_column);
    format!(
        "SELECT {owner}, {related} FROM {} WHERE {owner} = $1 ORDER BY {related}",
        quote_ident(table.name())
    )
}
