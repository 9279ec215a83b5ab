//! Result-returning record operations.
//!
//! Each function issues exactly one executor round trip. The `*_traced` variants
//! also hand back the statement text they issued so the facade can report it.

use crate::classify::{classify, Classification};
use crate::config::MappingConfig;
use crate::error::{MappingError, Operation};
use crate::executor::Executor;
use crate::query::{SqlGenerator, StatementKind};
use crate::record::Record;
use crate::row::Row;
use crate::value::{stored_to_typed, ColumnType, Value};

#[cfg(feature = "metrics")]
use crate::metrics::METRICS;

fn issued_statement(kind: StatementKind) {
    #[cfg(feature = "metrics")]
    METRICS.record_statement(kind);
    #[cfg(not(feature = "metrics"))]
    let _ = kind;
}

/// Insert `record`
///
/// For an identity key the generated key is written back into the record and
/// returned. A non-positive identity stores `config.invalid_key_sentinel` in the
/// key and fails with [`MappingError::NoIdentityReturned`]. A caller-supplied key
/// returns `Ok(None)` once at least one row was written.
pub fn insert<R: Record, E: Executor + ?Sized>(
    db: &E,
    record: &mut R,
    config: &MappingConfig,
) -> Result<Option<i64>, MappingError> {
    insert_traced(db, record, config, &mut None, &mut false)
}

/// `key_assigned` is set once a key value, generated or sentinel, was stored in `record`
pub(crate) fn insert_traced<R: Record, E: Executor + ?Sized>(
    db: &E,
    record: &mut R,
    config: &MappingConfig,
    issued: &mut Option<String>,
    key_assigned: &mut bool,
) -> Result<Option<i64>, MappingError> {
    let generator = SqlGenerator::<R>::new(config);
    let classification = generator.classification();
    let identity = classification.has_identity_key();
    let pk = if identity {
        Some(classification.require_primary_key()?)
    } else {
        None
    };

    let outcome = if config.parameterize_writes {
        let stmt = generator.insert_statement(record)?;
        *issued = Some(stmt.sql.clone());
        issued_statement(StatementKind::Insert);
        if identity {
            db.execute_scalar_with(&stmt)?
        } else {
            affected(db.execute_non_query_with(&stmt)?)
        }
    } else {
        let sql = generator.insert(record)?;
        *issued = Some(sql.clone());
        issued_statement(StatementKind::Insert);
        if identity {
            db.execute_scalar(&sql)?
        } else {
            affected(db.execute_non_query(&sql)?)
        }
    };

    let Some(pk) = pk else {
        return if outcome > 0 {
            Ok(None)
        } else {
            Err(MappingError::ZeroRowsAffected {
                operation: Operation::Add,
            })
        };
    };

    if outcome > 0 {
        assign_key(record, pk.name, pk.column_type, outcome)?;
        *key_assigned = true;
        return Ok(Some(outcome));
    }

    if assign_key(record, pk.name, pk.column_type, config.invalid_key_sentinel).is_ok() {
        *key_assigned = true;
    } else {
        log::warn!(
            "{}.{} cannot hold the invalid key sentinel {}",
            classification.entity(),
            pk.name,
            config.invalid_key_sentinel
        );
    }
    Err(MappingError::NoIdentityReturned {
        entity: classification.entity().to_string(),
        returned: outcome,
    })
}

fn affected(rows: u64) -> i64 {
    i64::try_from(rows).unwrap_or(i64::MAX)
}

fn assign_key<R: Record>(
    record: &mut R,
    name: &str,
    column_type: ColumnType,
    key: i64,
) -> Result<(), MappingError> {
    let value = Value::integer(column_type, i128::from(key))
        .ok_or_else(|| MappingError::type_mismatch(name, column_type, ColumnType::BigInt))?;
    record.set(name, value)
}

/// Update `record` by primary key; zero affected rows is an error
pub fn update<R: Record, E: Executor + ?Sized>(
    db: &E,
    record: &R,
    config: &MappingConfig,
) -> Result<u64, MappingError> {
    update_traced(db, record, config, &mut None)
}

pub(crate) fn update_traced<R: Record, E: Executor + ?Sized>(
    db: &E,
    record: &R,
    config: &MappingConfig,
    issued: &mut Option<String>,
) -> Result<u64, MappingError> {
    let generator = SqlGenerator::<R>::new(config);
    let rows = if config.parameterize_writes {
        let stmt = generator.update_statement(record)?;
        *issued = Some(stmt.sql.clone());
        issued_statement(StatementKind::Update);
        db.execute_non_query_with(&stmt)?
    } else {
        let sql = generator.update(record)?;
        *issued = Some(sql.clone());
        issued_statement(StatementKind::Update);
        db.execute_non_query(&sql)?
    };
    require_rows(rows, Operation::Update)
}

/// Delete `record` by primary key; zero affected rows is an error
///
/// Related rows are left alone.
pub fn delete<R: Record, E: Executor + ?Sized>(
    db: &E,
    record: &R,
    config: &MappingConfig,
) -> Result<u64, MappingError> {
    delete_traced(db, record, config, &mut None)
}

pub(crate) fn delete_traced<R: Record, E: Executor + ?Sized>(
    db: &E,
    record: &R,
    config: &MappingConfig,
    issued: &mut Option<String>,
) -> Result<u64, MappingError> {
    let generator = SqlGenerator::<R>::new(config);
    let rows = if config.parameterize_writes {
        let stmt = generator.delete_statement(record)?;
        *issued = Some(stmt.sql.clone());
        issued_statement(StatementKind::Delete);
        db.execute_non_query_with(&stmt)?
    } else {
        let sql = generator.delete(record)?;
        *issued = Some(sql.clone());
        issued_statement(StatementKind::Delete);
        db.execute_non_query(&sql)?
    };
    require_rows(rows, Operation::Delete)
}

fn require_rows(rows: u64, operation: Operation) -> Result<u64, MappingError> {
    if rows == 0 {
        Err(MappingError::ZeroRowsAffected { operation })
    } else {
        Ok(rows)
    }
}

/// Select and hydrate; zero matching rows is an empty vec
pub fn select<R: Record, E: Executor + ?Sized>(
    db: &E,
    where_clause: &str,
    order_by: &str,
    config: &MappingConfig,
) -> Result<Vec<R>, MappingError> {
    select_traced(db, where_clause, order_by, config, &mut None)
}

pub(crate) fn select_traced<R: Record, E: Executor + ?Sized>(
    db: &E,
    where_clause: &str,
    order_by: &str,
    config: &MappingConfig,
    issued: &mut Option<String>,
) -> Result<Vec<R>, MappingError> {
    let sql = SqlGenerator::<R>::new(config).select(where_clause, order_by)?;
    *issued = Some(sql.clone());
    issued_statement(StatementKind::Select);
    let rows = db.execute_query(&sql)?;
    hydrate_all(&rows, config)
}

/// Select one record by key; `Ok(None)` when nothing matches
pub fn find_by_primary_key<R: Record, E: Executor + ?Sized>(
    db: &E,
    id: impl Into<Value>,
    config: &MappingConfig,
) -> Result<Option<R>, MappingError> {
    find_by_primary_key_traced(db, &id.into(), config, &mut None)
}

pub(crate) fn find_by_primary_key_traced<R: Record, E: Executor + ?Sized>(
    db: &E,
    id: &Value,
    config: &MappingConfig,
    issued: &mut Option<String>,
) -> Result<Option<R>, MappingError> {
    let sql = SqlGenerator::<R>::new(config).select_by_primary_key(id)?;
    *issued = Some(sql.clone());
    issued_statement(StatementKind::Select);
    let rows = db.execute_query(&sql)?;
    Ok(hydrate_all(&rows, config)?.into_iter().next())
}

fn hydrate_all<R: Record>(rows: &[Row], config: &MappingConfig) -> Result<Vec<R>, MappingError> {
    let classification = classify::<R>();
    let records = rows
        .iter()
        .map(|row| {
            let mut record = R::default();
            populate_with(&classification, &mut record, row, config)?;
            Ok(record)
        })
        .collect::<Result<Vec<R>, MappingError>>()?;

    #[cfg(feature = "metrics")]
    METRICS.record_rows_hydrated(records.len());

    Ok(records)
}

/// A fresh `R` hydrated from `row`
pub fn hydrate<R: Record>(row: &Row, config: &MappingConfig) -> Result<R, MappingError> {
    let mut record = R::default();
    populate(&mut record, row, config)?;
    Ok(record)
}

/// Assign every key and data column of `record` from the same-named field of `row`
///
/// Reference and cargo attributes are left untouched.
pub fn populate<R: Record>(record: &mut R, row: &Row, config: &MappingConfig) -> Result<(), MappingError> {
    populate_with(&classify::<R>(), record, row, config)
}

fn populate_with<R: Record>(
    classification: &Classification,
    record: &mut R,
    row: &Row,
    config: &MappingConfig,
) -> Result<(), MappingError> {
    // Convert everything before touching the record so a bad row leaves it unchanged
    let values = classification
        .data_without_refs()
        .map(|attr| {
            let raw = row.get(attr.name).ok_or_else(|| MappingError::MissingColumn {
                attribute: attr.name.to_string(),
            })?;
            Ok((attr.name, stored_to_typed(raw, attr, config)?))
        })
        .collect::<Result<Vec<(&str, Value)>, MappingError>>()?;

    for (name, value) in values {
        record.set(name, value)?;
    }
    Ok(())
}
