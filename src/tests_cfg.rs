//! Test Configuration
//!
//! An in-memory executor that records every statement with its bound parameters and can
//! reject statements by prefix, so engine tests run without a database.

use crate::executor::{JunctionError, JunctionExecutor};
use crate::transaction::{IsolationLevel, TransactionError, TransactionHandle, TransactionalExecutor};
use bytes::BytesMut;
use may_postgres::types::{ToSql, Type};
use may_postgres::Row;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Recorded {
    pub sql: String,
    pub params: Vec<String>,
}

#[derive(Clone, Default)]
pub(crate) struct RecordingExecutor {
    log: Rc<RefCell<Vec<Recorded>>>,
    fail_prefix: Option<&'static str>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Statements starting with `prefix` are recorded, then rejected.
    pub fn failing_on(prefix: &'static str) -> Self {
        Self {
            fail_prefix: Some(prefix),
            ..Self::default()
        }
    }

    pub fn statements(&self) -> Vec<Recorded> {
        self.log.borrow().clone()
    }

    fn record(&self, sql: &str, params: &[&dyn ToSql]) -> Result<(), JunctionError> {
        self.log.borrow_mut().push(Recorded {
            sql: sql.to_string(),
            params: params.iter().map(|p| decode_text(*p)).collect(),
        });
        match self.fail_prefix {
            Some(prefix) if sql.starts_with(prefix) => {
                Err(JunctionError::QueryError("injected failure".to_string()))
            }
            _ => Ok(()),
        }
    }
}

fn decode_text(param: &dyn ToSql) -> String {
    let mut buf = BytesMut::new();
    match param.to_sql_checked(&Type::TEXT, &mut buf) {
        Ok(_) => String::from_utf8_lossy(&buf).into_owned(),
        Err(e) => format!("<unencodable: {e}>"),
    }
}

impl JunctionExecutor for RecordingExecutor {
    fn execute(&self, query: &str, params: &[&dyn ToSql]) -> Result<u64, JunctionError> {
        self.record(query, params)?;
        Ok(1)
    }

    fn query_one(&self, query: &str, params: &[&dyn ToSql]) -> Result<Row, JunctionError> {
        self.record(query, params)?;
        Err(JunctionError::QueryError("query returned no rows".to_string()))
    }

    fn query_all(&self, query: &str, params: &[&dyn ToSql]) -> Result<Vec<Row>, JunctionError> {
        self.record(query, params)?;
        Ok(Vec::new())
    }
}

pub(crate) struct RecordingTransaction {
    inner: RecordingExecutor,
}

impl JunctionExecutor for RecordingTransaction {
    fn execute(&self, query: &str, params: &[&dyn ToSql]) -> Result<u64, JunctionError> {
        self.inner.execute(query, params)
    }

    fn query_one(&self, query: &str, params: &[&dyn ToSql]) -> Result<Row, JunctionError> {
        self.inner.query_one(query, params)
    }

    fn query_all(&self, query: &str, params: &[&dyn ToSql]) -> Result<Vec<Row>, JunctionError> {
        self.inner.query_all(query, params)
    }
}

impl TransactionHandle for RecordingTransaction {
    fn commit(self) -> Result<(), TransactionError> {
        self.inner
            .record("COMMIT", &[])
            .map_err(|e| TransactionError::Other(e.to_string()))
    }

    fn rollback(self) -> Result<(), TransactionError> {
        self.inner
            .record("ROLLBACK", &[])
            .map_err(|e| TransactionError::Other(e.to_string()))
    }
}

impl TransactionalExecutor for RecordingExecutor {
    type Transaction = RecordingTransaction;

    fn begin_with_isolation(
        &self,
        isolation_level: IsolationLevel,
    ) -> Result<RecordingTransaction, TransactionError> {
        self.record(&isolation_level.begin_statement(), &[])
            .map_err(|e| TransactionError::Other(e.to_string()))?;
        Ok(RecordingTransaction {
            inner: self.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_text_parameters() {
        let executor = RecordingExecutor::new();
        executor
            .execute("SELECT $1, $2", &[&"hv-1", &"ip-1".to_string()])
            .expect("execute");

        assert_eq!(
            executor.statements(),
            vec![Recorded {
                sql: "SELECT $1, $2".to_string(),
                params: vec!["hv-1".to_string(), "ip-1".to_string()],
            }]
        );
    }

    #[test]
    fn test_failing_prefix_still_records() {
        let executor = RecordingExecutor::failing_on("BEGIN");
        let result = executor.begin_with_isolation(IsolationLevel::RepeatableRead);

        assert!(result.is_err());
        assert_eq!(executor.statements()[0].sql, "BEGIN ISOLATION LEVEL REPEATABLE READ");
    }
}
