//! `Executor` Module
//!
//! Provides the `Executor` trait: the narrow "run this SQL" service the mapping
//! layer talks to. Connections, pooling, command timeouts and transactions all
//! live behind it. A transaction is simply another `Executor` passed to the
//! record access operations in place of a plain connection.

use crate::query::Statement;
use crate::row::Row;
use std::fmt;

/// `Executor` error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    /// Could not reach the store
    Connection(String),
    /// The store rejected or failed the statement (syntax, constraint, timeout)
    Query(String),
    /// A result could not be read back (e.g. non-numeric scalar)
    Parse(String),
    /// The executor does not implement this entry point
    Unsupported(String),
    /// Other execution errors
    Other(String),
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecError::Connection(s) => write!(f, "Connection error: {s}"),
            ExecError::Query(s) => write!(f, "Query error: {s}"),
            ExecError::Parse(s) => write!(f, "Parse error: {s}"),
            ExecError::Unsupported(s) => write!(f, "Unsupported by executor: {s}"),
            ExecError::Other(s) => write!(f, "Execution error: {s}"),
        }
    }
}

impl std::error::Error for ExecError {}

/// Trait for executing generated SQL
///
/// # Examples
///
/// ```no_run
/// use mooring::{ExecError, Executor, Row};
///
/// struct Noop;
///
/// impl Executor for Noop {
///     fn execute_scalar(&self, _sql: &str) -> Result<i64, ExecError> { Ok(0) }
///     fn execute_non_query(&self, _sql: &str) -> Result<u64, ExecError> { Ok(0) }
///     fn execute_query(&self, _sql: &str) -> Result<Vec<Row>, ExecError> { Ok(Vec::new()) }
/// }
/// ```
pub trait Executor {
    /// Execute a statement and return the first column of the first row as an integer
    ///
    /// Used for insert-then-fetch-identity. A `NULL` scalar should be reported as `0`.
    fn execute_scalar(&self, sql: &str) -> Result<i64, ExecError>;

    /// Execute a statement and return the number of rows affected
    fn execute_non_query(&self, sql: &str) -> Result<u64, ExecError>;

    /// Execute a query and return all rows
    fn execute_query(&self, sql: &str) -> Result<Vec<Row>, ExecError>;

    /// Parameterized variant of [`Executor::execute_scalar`]
    ///
    /// Placeholders are `@p1..@pN`, bound in order from `statement.params`.
    fn execute_scalar_with(&self, statement: &Statement) -> Result<i64, ExecError> {
        let _ = statement;
        Err(ExecError::Unsupported("parameterized scalar execution".to_string()))
    }

    /// Parameterized variant of [`Executor::execute_non_query`]
    fn execute_non_query_with(&self, statement: &Statement) -> Result<u64, ExecError> {
        let _ = statement;
        Err(ExecError::Unsupported("parameterized non-query execution".to_string()))
    }
}

impl<E: Executor + ?Sized> Executor for &E {
    fn execute_scalar(&self, sql: &str) -> Result<i64, ExecError> {
        (**self).execute_scalar(sql)
    }

    fn execute_non_query(&self, sql: &str) -> Result<u64, ExecError> {
        (**self).execute_non_query(sql)
    }

    fn execute_query(&self, sql: &str) -> Result<Vec<Row>, ExecError> {
        (**self).execute_query(sql)
    }

    fn execute_scalar_with(&self, statement: &Statement) -> Result<i64, ExecError> {
        (**self).execute_scalar_with(statement)
    }

    fn execute_non_query_with(&self, statement: &Statement) -> Result<u64, ExecError> {
        (**self).execute_non_query_with(statement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Literal;

    impl Executor for Literal {
        fn execute_scalar(&self, _sql: &str) -> Result<i64, ExecError> {
            Ok(1)
        }
        fn execute_non_query(&self, _sql: &str) -> Result<u64, ExecError> {
            Ok(1)
        }
        fn execute_query(&self, _sql: &str) -> Result<Vec<Row>, ExecError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_exec_error_display() {
        assert!(ExecError::Query("bad".into()).to_string().contains("Query error"));
        assert!(ExecError::Connection("down".into()).to_string().contains("Connection error"));
        assert!(ExecError::Parse("x".into()).to_string().contains("Parse error"));
        assert!(ExecError::Other("x".into()).to_string().contains("Execution error"));
    }

    #[test]
    fn test_parameterized_defaults_are_unsupported() {
        let stmt = Statement::default();
        assert!(matches!(Literal.execute_scalar_with(&stmt), Err(ExecError::Unsupported(_))));
        assert!(matches!(Literal.execute_non_query_with(&stmt), Err(ExecError::Unsupported(_))));
    }

    #[test]
    fn test_reference_forwards() {
        let exec = &Literal;
        assert_eq!(exec.execute_scalar("SELECT 1").unwrap(), 1);
        let dynamic: &dyn Executor = &Literal;
        assert_eq!((&dynamic).execute_non_query("x").unwrap(), 1);
    }
}
