//! DDL for join tables.

use super::JoinTable;
use crate::executor::{JunctionError, JunctionExecutor};
use sea_query::{
    ColumnDef, Expr, Index, IndexCreateStatement, PostgresQueryBuilder, Table,
    TableCreateStatement,
};

/// `CREATE TABLE IF NOT EXISTS` for `table`: two `TEXT NOT NULL` columns and nothing else.
pub fn join_table_statement(table: &JoinTable) -> TableCreateStatement {
    let (left, right) = table.columns();
    Table::create()
        .table(table.name())
        .if_not_exists()
        .col(ColumnDef::new(left).text().not_null())
        .col(ColumnDef::new(right).text().not_null())
        .to_owned()
}

/// Unique index over the column pair; the pair is the identity of an association row.
pub fn join_table_index_statement(table: &JoinTable) -> IndexCreateStatement {
    let (left, right) = table.columns();
    Index::create()
        .if_not_exists()
        .name(format!("uq_{}_pair", table.name()))
        .table(table.name())
        .col(Expr::col(left))
        .col(Expr::col(right))
        .unique()
        .to_owned()
}

/// Creates `table` and its pair index if they do not exist yet.
pub fn create_join_table<E>(executor: &E, table: &JoinTable) -> Result<(), JunctionError>
where
    E: JunctionExecutor + ?Sized,
{
    let table_sql = join_table_statement(table).build(PostgresQueryBuilder);
    executor.execute(&table_sql, &[])?;

    let index_sql = join_table_index_statement(table).build(PostgresQueryBuilder);
    executor.execute(&index_sql, &[])?;

    Ok(())
}
