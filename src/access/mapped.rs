//! `Mapped<R>`: an entity paired with its last failure and change observers.
//!
//! The facade never returns errors from record operations. Each operation
//! reports success as `bool` (or an empty result), and the cause of the most
//! recent failure stays available through [`Mapped::last_error`] until the
//! next operation starts.

use super::crud;
use crate::classify::classify;
use crate::config::MappingConfig;
use crate::error::{MappingError, Operation};
use crate::executor::Executor;
use crate::record::Record;
use crate::row::Row;
use crate::value::Value;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

#[cfg(feature = "metrics")]
use crate::metrics::METRICS;
#[cfg(feature = "tracing")]
use crate::metrics::tracing_helpers;

/// The most recent failure of a [`Mapped`] operation
#[derive(Debug, Clone, PartialEq)]
pub struct LastError {
    pub operation: Operation,
    pub entity: &'static str,
    /// SQL handed to the executor, if generation got that far
    pub statement: Option<String>,
    pub error: MappingError,
}

impl fmt::Display for LastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} failed: {}", self.operation, self.entity, self.error)?;
        if let Some(statement) = &self.statement {
            write!(f, " [statement: {statement}]")?;
        }
        Ok(())
    }
}

type Observer = Box<dyn FnMut(&str)>;

/// A record plus the bookkeeping of the record access facade
///
/// # Example
///
/// ```no_run
/// use mooring::{Mapped, Record};
/// use mooring::test_helpers::ScriptedExecutor;
///
/// #[derive(Debug, Default, Record)]
/// struct Customer {
///     id_Customer: i32,
///     Name: String,
/// }
///
/// let db = ScriptedExecutor::new().with_scalar(Ok(42));
/// let mut customer = Mapped::new(Customer { Name: "Ada".into(), ..Default::default() });
/// assert!(customer.add_record(&db));
/// assert_eq!(customer.id_Customer, 42);
/// ```
pub struct Mapped<R: Record> {
    record: R,
    last_error: Option<LastError>,
    observers: Vec<Observer>,
    config: Arc<MappingConfig>,
}

impl<R: Record> Mapped<R> {
    /// Wrap `record` using the process-wide configuration
    pub fn new(record: R) -> Self {
        Self::with_config(record, MappingConfig::shared())
    }

    pub fn with_config(record: R, config: Arc<MappingConfig>) -> Self {
        Self {
            record,
            last_error: None,
            observers: Vec::new(),
            config,
        }
    }

    pub fn record(&self) -> &R {
        &self.record
    }

    pub fn record_mut(&mut self) -> &mut R {
        &mut self.record
    }

    pub fn into_inner(self) -> R {
        self.record
    }

    pub fn config(&self) -> &MappingConfig {
        &self.config
    }

    /// Cause of the most recent failure; cleared when the next operation starts
    pub fn last_error(&self) -> Option<&LastError> {
        self.last_error.as_ref()
    }

    /// Register a callback invoked with the attribute name on every change
    /// made through [`set_attribute`](Self::set_attribute) or key assignment
    pub fn on_change(&mut self, observer: impl FnMut(&str) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn notify(&mut self, attribute: &str) {
        for observer in &mut self.observers {
            observer(attribute);
        }
    }

    /// Assign an attribute by name (any case) and notify observers
    pub fn set_attribute(&mut self, name: &str, value: impl Into<Value>) -> Result<(), MappingError> {
        let classification = classify::<R>();
        let attr = classification
            .attribute_by_name(name)
            .ok_or_else(|| MappingError::unknown_attribute(classification.entity(), name))?;
        if !attr.is_data() {
            return Err(MappingError::ReadOnlyAttribute {
                attribute: attr.name.to_string(),
            });
        }
        self.record.set(attr.name, value.into())?;
        self.notify(attr.name);
        Ok(())
    }

    fn run<T>(
        &mut self,
        operation: Operation,
        f: impl FnOnce(&mut R, &MappingConfig, &mut Option<String>) -> Result<T, MappingError>,
    ) -> Option<T> {
        self.last_error = None;

        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::operation_span(R::type_name(), operation).entered();
        #[cfg(feature = "metrics")]
        let start = std::time::Instant::now();

        let mut issued = None;
        let result = f(&mut self.record, self.config.as_ref(), &mut issued);

        #[cfg(feature = "metrics")]
        METRICS.record_duration(operation, start.elapsed());

        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.fail(operation, issued, error);
                None
            }
        }
    }

    fn fail(&mut self, operation: Operation, statement: Option<String>, error: MappingError) {
        let failure = LastError {
            operation,
            entity: R::type_name(),
            statement,
            error,
        };
        log::warn!("{failure}");
        #[cfg(feature = "metrics")]
        METRICS.record_failure(operation);
        self.last_error = Some(failure);
    }

    /// Insert the record; on an identity key the new key is written back
    ///
    /// When the store returns no usable identity the key is set to the configured
    /// sentinel and the operation fails.
    pub fn add_record<E: Executor + ?Sized>(&mut self, db: &E) -> bool {
        let mut key_assigned = false;
        let outcome = self.run(Operation::Add, |record, config, issued| {
            crud::insert_traced(db, record, config, issued, &mut key_assigned)
        });

        if key_assigned {
            if let Some(pk) = classify::<R>().primary_key() {
                self.notify(pk.name);
            }
        }

        outcome.is_some()
    }

    /// Update the stored row with this record's key; zero affected rows fails
    pub fn update_record<E: Executor + ?Sized>(&mut self, db: &E) -> bool {
        self.run(Operation::Update, |record, config, issued| {
            crud::update_traced(db, record, config, issued)
        })
        .is_some()
    }

    /// Delete the stored row with this record's key; zero affected rows fails
    pub fn delete_record<E: Executor + ?Sized>(&mut self, db: &E) -> bool {
        self.run(Operation::Delete, |record, config, issued| {
            crud::delete_traced(db, record, config, issued)
        })
        .is_some()
    }

    /// Every row of the table, optionally ordered
    pub fn select_all<E: Executor + ?Sized>(&mut self, db: &E, order_by: &str) -> Vec<R> {
        self.select_where_order_by(db, "", order_by)
    }

    /// Rows matching `where_clause`, ordered by `order_by`; empty clauses are omitted
    ///
    /// An empty vec with no [`last_error`](Self::last_error) means nothing matched.
    pub fn select_where_order_by<E: Executor + ?Sized>(
        &mut self,
        db: &E,
        where_clause: &str,
        order_by: &str,
    ) -> Vec<R> {
        self.run(Operation::Select, |_, config, issued| {
            crud::select_traced(db, where_clause, order_by, config, issued)
        })
        .unwrap_or_default()
    }

    /// The row with primary key `id`, if any
    pub fn select_by_primary_key<E: Executor + ?Sized>(
        &mut self,
        db: &E,
        id: impl Into<Value>,
    ) -> Option<R> {
        let id = id.into();
        self.run(Operation::Select, |_, config, issued| {
            crud::find_by_primary_key_traced(db, &id, config, issued)
        })
        .flatten()
    }

    /// Overwrite this record's keys and data columns from `row`
    pub fn populate(&mut self, row: &Row) -> bool {
        self.run(Operation::Populate, |record, config, _| {
            crud::populate(record, row, config)
        })
        .is_some()
    }
}

impl<R: Record + Default> Default for Mapped<R> {
    fn default() -> Self {
        Self::new(R::default())
    }
}

impl<R: Record> Deref for Mapped<R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.record
    }
}

impl<R: Record> DerefMut for Mapped<R> {
    fn deref_mut(&mut self) -> &mut R {
        &mut self.record
    }
}

impl<R: Record + fmt::Debug> fmt::Debug for Mapped<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapped")
            .field("record", &self.record)
            .field("last_error", &self.last_error)
            .field("observers", &self.observers.len())
            .finish()
    }
}
