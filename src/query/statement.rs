//! SQL text plus bound parameters.

use crate::value::Value;
use std::fmt;

/// Statement family, used for logging and metric labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Insert,
    Update,
    Delete,
    Select,
}

impl StatementKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StatementKind::Insert => "insert",
            StatementKind::Update => "update",
            StatementKind::Delete => "delete",
            StatementKind::Select => "select",
        }
    }
}

/// A parameterized statement
///
/// Placeholders are `@p1..@pN`; `params[i]` binds to `@p{i + 1}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    #[must_use]
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Placeholder text for the 1-based parameter `ordinal`
    #[must_use]
    pub fn placeholder(ordinal: usize) -> String {
        format!("@p{ordinal}")
    }

    /// Bind `value` and return its placeholder
    pub(crate) fn bind(&mut self, value: Value) -> String {
        self.params.push(value);
        Self::placeholder(self.params.len())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)?;
        if !self.params.is_empty() {
            write!(f, " -- {} param(s)", self.params.len())?;
        }
        Ok(())
    }
}
