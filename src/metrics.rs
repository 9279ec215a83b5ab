//! Metrics and tracing instrumentation for record access.
//!
//! With the `metrics` feature, counters and a duration histogram are registered on
//! the `opentelemetry` global meter `"mooring"`; the application installs whatever
//! meter provider and exporter it wants. With the `tracing` feature (default), each
//! facade operation runs inside an `info` span.

#[cfg(feature = "metrics")]
pub use self::otel::{MooringMetrics, METRICS};

#[cfg(feature = "metrics")]
mod otel {
    use crate::error::Operation;
    use crate::query::StatementKind;
    use once_cell::sync::Lazy;
    use opentelemetry::{
        global,
        metrics::{Counter, Histogram},
        KeyValue,
    };
    use std::time::Duration;

    pub static METRICS: Lazy<MooringMetrics> = Lazy::new(MooringMetrics::init);

    pub struct MooringMetrics {
        pub statements_total: Counter<u64>,
        pub operation_failures_total: Counter<u64>,
        pub rows_hydrated_total: Counter<u64>,
        pub operation_duration: Histogram<f64>,
    }

    impl MooringMetrics {
        pub fn init() -> Self {
            let meter = global::meter("mooring");

            let statements_total = meter
                .u64_counter("mooring_statements_total")
                .with_description("Statements handed to an executor")
                .build();

            let operation_failures_total = meter
                .u64_counter("mooring_operation_failures_total")
                .with_description("Record operations that reported failure")
                .build();

            let rows_hydrated_total = meter
                .u64_counter("mooring_rows_hydrated_total")
                .with_description("Result rows hydrated into entities")
                .build();

            let operation_duration = meter
                .f64_histogram("mooring_operation_duration_seconds")
                .with_description("Duration of record operations, executor round trip included")
                .build();

            Self {
                statements_total,
                operation_failures_total,
                rows_hydrated_total,
                operation_duration,
            }
        }

        pub fn record_statement(&self, kind: StatementKind) {
            self.statements_total
                .add(1, &[KeyValue::new("kind", kind.as_str())]);
        }

        pub fn record_failure(&self, operation: Operation) {
            self.operation_failures_total
                .add(1, &[KeyValue::new("operation", operation.as_str())]);
        }

        pub fn record_rows_hydrated(&self, rows: usize) {
            self.rows_hydrated_total.add(rows as u64, &[]);
        }

        pub fn record_duration(&self, operation: Operation, elapsed: Duration) {
            self.operation_duration.record(
                elapsed.as_secs_f64(),
                &[KeyValue::new("operation", operation.as_str())],
            );
        }
    }
}

#[cfg(feature = "tracing")]
pub mod tracing_helpers {
    use crate::error::Operation;
    use tracing::{info_span, Span};

    /// Span wrapping one facade operation
    pub fn operation_span(entity: &str, operation: Operation) -> Span {
        info_span!(
            "mooring.operation",
            entity = entity,
            operation = operation.as_str()
        )
    }
}
