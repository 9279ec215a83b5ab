//! A scripted in-memory [`Executor`] for tests.
//!
//! `ScriptedExecutor` records every statement it is handed and answers from
//! per-entry-point response queues. An empty queue answers with a neutral result
//! (`0`, `0` rows affected, no rows).

use crate::executor::{ExecError, Executor};
use crate::query::Statement;
use crate::row::Row;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct Script {
    scalars: VecDeque<Result<i64, ExecError>>,
    non_queries: VecDeque<Result<u64, ExecError>>,
    queries: VecDeque<Result<Vec<Row>, ExecError>>,
    sql: Vec<String>,
    statements: Vec<Statement>,
}

/// Records SQL and replays queued responses
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    script: Mutex<Script>,
    parameterized: bool,
}

impl ScriptedExecutor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An executor that also accepts parameterized statements
    #[must_use]
    pub fn parameterized() -> Self {
        Self {
            parameterized: true,
            ..Self::default()
        }
    }

    fn with_script<T>(&self, f: impl FnOnce(&mut Script) -> T) -> T {
        let mut guard = match self.script.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }

    #[must_use]
    pub fn with_scalar(self, result: Result<i64, ExecError>) -> Self {
        self.with_script(|s| s.scalars.push_back(result));
        self
    }

    #[must_use]
    pub fn with_non_query(self, result: Result<u64, ExecError>) -> Self {
        self.with_script(|s| s.non_queries.push_back(result));
        self
    }

    #[must_use]
    pub fn with_rows(self, rows: Vec<Row>) -> Self {
        self.with_script(|s| s.queries.push_back(Ok(rows)));
        self
    }

    #[must_use]
    pub fn with_query_error(self, error: ExecError) -> Self {
        self.with_script(|s| s.queries.push_back(Err(error)));
        self
    }

    /// Literal SQL received so far, in order
    #[must_use]
    pub fn executed(&self) -> Vec<String> {
        self.with_script(|s| s.sql.clone())
    }

    /// The most recent literal SQL
    #[must_use]
    pub fn last_sql(&self) -> Option<String> {
        self.with_script(|s| s.sql.last().cloned())
    }

    /// Parameterized statements received so far, in order
    #[must_use]
    pub fn statements(&self) -> Vec<Statement> {
        self.with_script(|s| s.statements.clone())
    }

    fn unsupported(&self, what: &str) -> Option<ExecError> {
        (!self.parameterized).then(|| ExecError::Unsupported(what.to_string()))
    }
}

impl Executor for ScriptedExecutor {
    fn execute_scalar(&self, sql: &str) -> Result<i64, ExecError> {
        self.with_script(|s| {
            s.sql.push(sql.to_string());
            s.scalars.pop_front().unwrap_or(Ok(0))
        })
    }

    fn execute_non_query(&self, sql: &str) -> Result<u64, ExecError> {
        self.with_script(|s| {
            s.sql.push(sql.to_string());
            s.non_queries.pop_front().unwrap_or(Ok(0))
        })
    }

    fn execute_query(&self, sql: &str) -> Result<Vec<Row>, ExecError> {
        self.with_script(|s| {
            s.sql.push(sql.to_string());
            s.queries.pop_front().unwrap_or_else(|| Ok(Vec::new()))
        })
    }

    fn execute_scalar_with(&self, statement: &Statement) -> Result<i64, ExecError> {
        if let Some(err) = self.unsupported("parameterized scalar execution") {
            return Err(err);
        }
        self.with_script(|s| {
            s.statements.push(statement.clone());
            s.scalars.pop_front().unwrap_or(Ok(0))
        })
    }

    fn execute_non_query_with(&self, statement: &Statement) -> Result<u64, ExecError> {
        if let Some(err) = self.unsupported("parameterized non-query execution") {
            return Err(err);
        }
        self.with_script(|s| {
            s.statements.push(statement.clone());
            s.non_queries.pop_front().unwrap_or(Ok(0))
        })
    }
}
