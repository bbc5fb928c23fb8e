//! Statement and relation metrics, plus the span helpers used across the crate.

#[cfg(feature = "metrics")]
pub use self::prometheus_metrics::{JunctionMetrics, METRICS};

#[cfg(feature = "metrics")]
mod prometheus_metrics {
    use once_cell::sync::Lazy;
    use opentelemetry::{
        metrics::{Counter, Histogram, MeterProvider as _},
        KeyValue,
    };
    use opentelemetry_sdk::metrics::SdkMeterProvider;
    use prometheus::{Encoder, Registry, TextEncoder};
    use std::time::Duration;

    pub static METRICS: Lazy<JunctionMetrics> = Lazy::new(JunctionMetrics::init);

    pub struct JunctionMetrics {
        registry: Registry,
        _provider: SdkMeterProvider,
        pub queries_total: Counter<u64>,
        pub query_errors_total: Counter<u64>,
        pub query_duration: Histogram<f64>,
        pub connection_wait_duration: Histogram<f64>,
        pub relation_ops_total: Counter<u64>,
        pub relation_rollbacks_total: Counter<u64>,
    }

    impl JunctionMetrics {
        pub fn init() -> Self {
            let registry = Registry::new();
            let exporter = opentelemetry_prometheus::exporter()
                .with_registry(registry.clone())
                .build()
                .expect("failed to build prometheus exporter");
            let provider = SdkMeterProvider::builder().with_reader(exporter).build();
            let meter = provider.meter("junction");

            let queries_total = meter
                .u64_counter("junction_queries_total")
                .with_description("Total statements executed")
                .build();

            let query_errors_total = meter
                .u64_counter("junction_query_errors_total")
                .with_description("Statements rejected by the store")
                .build();

            let query_duration = meter
                .f64_histogram("junction_query_duration_seconds")
                .with_description("Duration of statements")
                .build();

            let connection_wait_duration = meter
                .f64_histogram("junction_connection_wait_seconds")
                .with_description("Time spent establishing connections")
                .build();

            let relation_ops_total = meter
                .u64_counter("junction_relation_operations_total")
                .with_description("Relation operations by kind")
                .build();

            let relation_rollbacks_total = meter
                .u64_counter("junction_relation_rollbacks_total")
                .with_description("Association set replacements rolled back")
                .build();

            Self {
                registry,
                _provider: provider,
                queries_total,
                query_errors_total,
                query_duration,
                connection_wait_duration,
                relation_ops_total,
                relation_rollbacks_total,
            }
        }

        pub fn record_query_duration(&self, elapsed: Duration) {
            self.queries_total.add(1, &[]);
            self.query_duration.record(elapsed.as_secs_f64(), &[]);
        }

        pub fn record_query_error(&self) {
            self.query_errors_total.add(1, &[]);
        }

        pub fn record_connection_wait(&self, elapsed: Duration) {
            self.connection_wait_duration
                .record(elapsed.as_secs_f64(), &[]);
        }

        pub fn record_relation_op(&self, operation: &'static str, relation: &'static str) {
            self.relation_ops_total.add(
                1,
                &[
                    KeyValue::new("operation", operation),
                    KeyValue::new("relation", relation),
                ],
            );
        }

        pub fn record_rollback(&self, relation: &'static str) {
            self.relation_rollbacks_total
                .add(1, &[KeyValue::new("relation", relation)]);
        }

        /// Prometheus text exposition of everything recorded so far.
        pub fn render(&self) -> Result<String, prometheus::Error> {
            let mut buffer = Vec::new();
            TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
            Ok(String::from_utf8_lossy(&buffer).into_owned())
        }
    }
}

#[cfg(feature = "tracing")]
pub mod tracing_helpers {
    use crate::transaction::IsolationLevel;
    use tracing::Span;

    pub fn execute_query_span(query: &str) -> Span {
        tracing::debug_span!("junction.execute", db.statement = query)
    }

    pub fn acquire_connection_span() -> Span {
        tracing::debug_span!("junction.connect")
    }

    pub fn begin_transaction_span(isolation_level: IsolationLevel) -> Span {
        tracing::debug_span!("junction.begin", isolation = isolation_level.to_sql())
    }

    pub fn commit_transaction_span() -> Span {
        tracing::debug_span!("junction.commit")
    }

    pub fn rollback_transaction_span() -> Span {
        tracing::debug_span!("junction.rollback")
    }

    pub fn relation_span(operation: &'static str, relation: &'static str) -> Span {
        tracing::info_span!("junction.relation", operation, relation)
    }
}
