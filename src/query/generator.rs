//! SQL text synthesis for one entity type.
//!
//! Identifiers are bracket-quoted; the table name is emitted as-is. Values are
//! embedded as literals (see [`crate::value::literal`]) unless one of the
//! `*_statement` builders is used, which bind `@p1..@pN` parameters instead.

use super::reference::{join_clauses, ReferenceColumn};
use super::statement::{Statement, StatementKind};
use crate::classify::{classify, AttributeDescriptor, Classification, Role};
use crate::config::MappingConfig;
use crate::error::MappingError;
use crate::record::Record;
use crate::value::{clamp_value, to_literal, Value};
use std::marker::PhantomData;
use std::sync::Arc;

/// Builds statements for entities of type `R`
///
/// # Example
///
/// ```no_run
/// use mooring::{MappingConfig, Record, SqlGenerator};
///
/// #[derive(Debug, Default, Record)]
/// struct Customer {
///     id_Customer: i32,
///     Name: String,
/// }
///
/// let config = MappingConfig::default();
/// let sql = SqlGenerator::<Customer>::new(&config).select("", "Name")?;
/// assert_eq!(sql, "SELECT Customer.[id_Customer], Customer.[Name] FROM Customer ORDER BY Name");
/// # Ok::<(), mooring::MappingError>(())
/// ```
pub struct SqlGenerator<'c, R> {
    classification: Arc<Classification>,
    config: &'c MappingConfig,
    _record: PhantomData<fn() -> R>,
}

impl<'c, R: Record> SqlGenerator<'c, R> {
    #[must_use]
    pub fn new(config: &'c MappingConfig) -> Self {
        Self {
            classification: classify::<R>(),
            config,
            _record: PhantomData,
        }
    }

    #[must_use]
    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    fn table(&self) -> &'static str {
        self.classification.table()
    }

    fn value_of(&self, record: &R, attr: &AttributeDescriptor) -> Result<Value, MappingError> {
        record
            .get(attr.name)
            .ok_or_else(|| MappingError::unknown_attribute(self.classification.entity(), attr.name))
    }

    fn literal_of(&self, record: &R, attr: &AttributeDescriptor) -> Result<String, MappingError> {
        to_literal(attr.name, &self.value_of(record, attr)?, self.config)
    }

    fn pk_predicate(&self, pk: &AttributeDescriptor, rhs: &str) -> String {
        format!("{}.[{}] = {}", self.table(), pk.name, rhs)
    }

    fn insert_sql(&self, columns: &[&AttributeDescriptor], values: &[String]) -> String {
        let mut sql = if columns.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", self.table())
        } else {
            let names: Vec<String> = columns.iter().map(|a| format!("[{}]", a.name)).collect();
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                self.table(),
                names.join(", "),
                values.join(", ")
            )
        };
        if self.classification.has_identity_key() {
            sql.push_str("; ");
            sql.push_str(&self.config.identity_query);
        }
        sql
    }

    fn set_columns(&self) -> Result<Vec<&AttributeDescriptor>, MappingError> {
        let columns: Vec<_> = self.classification.data_without_pk_or_refs().collect();
        if columns.is_empty() {
            return Err(MappingError::Classification {
                entity: self.classification.entity().to_string(),
                reason: "no persisted attribute besides the primary key to update".to_string(),
            });
        }
        Ok(columns)
    }

    /// `INSERT INTO <t> ([c1], ...) VALUES (<l1>, ...)`, plus the identity query
    /// when the key is store-generated
    pub fn insert(&self, record: &R) -> Result<String, MappingError> {
        let columns = self.classification.insert_columns();
        let values = columns
            .iter()
            .map(|attr| self.literal_of(record, attr))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(log_sql(StatementKind::Insert, self.insert_sql(&columns, &values)))
    }

    /// `UPDATE <t> SET [c] = <l>, ... WHERE <t>.[<pk>] = <pk>`
    pub fn update(&self, record: &R) -> Result<String, MappingError> {
        let pk = self.classification.require_primary_key()?;
        let assignments = self
            .set_columns()?
            .into_iter()
            .map(|attr| Ok(format!("[{}] = {}", attr.name, self.literal_of(record, attr)?)))
            .collect::<Result<Vec<_>, MappingError>>()?;
        let sql = format!(
            "UPDATE {} SET {} WHERE {}",
            self.table(),
            assignments.join(", "),
            self.pk_predicate(pk, &self.literal_of(record, pk)?)
        );
        Ok(log_sql(StatementKind::Update, sql))
    }

    /// `DELETE FROM <t> WHERE <t>.[<pk>] = <pk>`
    pub fn delete(&self, record: &R) -> Result<String, MappingError> {
        let pk = self.classification.require_primary_key()?;
        let sql = format!(
            "DELETE FROM {} WHERE {}",
            self.table(),
            self.pk_predicate(pk, &self.literal_of(record, pk)?)
        );
        Ok(log_sql(StatementKind::Delete, sql))
    }

    /// `SELECT <list> FROM <t> [joins] [WHERE w] [ORDER BY o]`
    ///
    /// `where_clause` and `order_by` are clause bodies without the keyword,
    /// embedded verbatim; an empty body omits the clause.
    pub fn select(&self, where_clause: &str, order_by: &str) -> Result<String, MappingError> {
        let mut sql = self.select_from()?;
        if !where_clause.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(where_clause);
        }
        if !order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(order_by);
        }
        Ok(log_sql(StatementKind::Select, sql))
    }

    /// Same list and joins as [`select`](Self::select), pinned to one key
    pub fn select_by_primary_key(&self, id: &Value) -> Result<String, MappingError> {
        let pk = self.classification.require_primary_key()?;
        let sql = format!(
            "{} WHERE {}",
            self.select_from()?,
            self.pk_predicate(pk, &to_literal(pk.name, id, self.config)?)
        );
        Ok(log_sql(StatementKind::Select, sql))
    }

    /// Comma-separated select list in declaration order
    pub fn select_list(&self) -> Result<String, MappingError> {
        let table = self.table();
        let fragments = self
            .classification
            .data()
            .map(|attr| match attr.role {
                Role::Reference => Ok(ReferenceColumn::decode(attr.name)?.select_fragment()),
                _ => Ok(format!("{table}.[{}]", attr.name)),
            })
            .collect::<Result<Vec<_>, MappingError>>()?;
        Ok(fragments.join(", "))
    }

    fn select_from(&self) -> Result<String, MappingError> {
        let mut sql = format!("SELECT {} FROM {}", self.select_list()?, self.table());
        for join in join_clauses(&self.classification)? {
            sql.push(' ');
            sql.push_str(&join);
        }
        Ok(sql)
    }

    /// Parameterized [`insert`](Self::insert), same column order
    pub fn insert_statement(&self, record: &R) -> Result<Statement, MappingError> {
        let columns = self.classification.insert_columns();
        let mut stmt = Statement::default();
        let placeholders = columns
            .iter()
            .map(|attr| Ok(stmt.bind(self.param_of(record, attr)?)))
            .collect::<Result<Vec<_>, MappingError>>()?;
        stmt.sql = self.insert_sql(&columns, &placeholders);
        Ok(log_statement(StatementKind::Insert, stmt))
    }

    /// Parameterized [`update`](Self::update); the key binds last
    pub fn update_statement(&self, record: &R) -> Result<Statement, MappingError> {
        let pk = self.classification.require_primary_key()?;
        let mut stmt = Statement::default();
        let assignments = self
            .set_columns()?
            .into_iter()
            .map(|attr| Ok(format!("[{}] = {}", attr.name, stmt.bind(self.param_of(record, attr)?))))
            .collect::<Result<Vec<_>, MappingError>>()?;
        let key = stmt.bind(self.param_of(record, pk)?);
        stmt.sql = format!(
            "UPDATE {} SET {} WHERE {}",
            self.table(),
            assignments.join(", "),
            self.pk_predicate(pk, &key)
        );
        Ok(log_statement(StatementKind::Update, stmt))
    }

    /// Parameterized [`delete`](Self::delete)
    pub fn delete_statement(&self, record: &R) -> Result<Statement, MappingError> {
        let pk = self.classification.require_primary_key()?;
        let mut stmt = Statement::default();
        let key = stmt.bind(self.param_of(record, pk)?);
        stmt.sql = format!("DELETE FROM {} WHERE {}", self.table(), self.pk_predicate(pk, &key));
        Ok(log_statement(StatementKind::Delete, stmt))
    }

    fn param_of(&self, record: &R, attr: &AttributeDescriptor) -> Result<Value, MappingError> {
        Ok(clamp_value(&self.value_of(record, attr)?, self.config))
    }
}

fn log_sql(kind: StatementKind, sql: String) -> String {
    log::debug!(target: "mooring::sql", "{}: {}", kind.as_str(), sql);
    sql
}

fn log_statement(kind: StatementKind, stmt: Statement) -> Statement {
    log::debug!(target: "mooring::sql", "{}: {}", kind.as_str(), stmt);
    stmt
}
