//! Metrics collection.

use metrics::{counter, histogram};
use std::time::Duration;

/// Metric names used throughout the application.
#[derive(Debug, Clone, Copy)]
pub struct MetricsCollector {
    /// Store operations, labeled by operation and status
    pub store_operations_total: &'static str,
    /// Store operation latency
    pub store_operation_duration: &'static str,
    /// Activity events appended, labeled by kind
    pub events_appended_total: &'static str,
    /// Malformed rows quarantined during parsing, labeled by table
    pub rows_quarantined_total: &'static str,
    /// Aggregation runs, labeled by window
    pub aggregations_total: &'static str,
    /// Aggregation latency
    pub aggregation_duration: &'static str,
    /// Events covered by the last aggregation
    pub aggregation_event_count: &'static str,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self {
            store_operations_total: "campaign_board_store_operations_total",
            store_operation_duration: "campaign_board_store_operation_duration_seconds",
            events_appended_total: "campaign_board_events_appended_total",
            rows_quarantined_total: "campaign_board_rows_quarantined_total",
            aggregations_total: "campaign_board_aggregations_total",
            aggregation_duration: "campaign_board_aggregation_duration_seconds",
            aggregation_event_count: "campaign_board_aggregation_event_count",
        }
    }
}

impl MetricsCollector {
    /// Record one store operation.
    pub fn record_store_operation(&self, operation: &str, table: &str, duration: Duration, success: bool) {
        let status = if success { "success" } else { "error" };
        counter!(
            self.store_operations_total,
            "operation" => operation.to_string(),
            "table" => table.to_string(),
            "status" => status
        )
        .increment(1);
        histogram!(self.store_operation_duration, "operation" => operation.to_string())
            .record(duration.as_secs_f64());
    }

    /// Record one appended activity event.
    pub fn record_event_appended(&self, kind: &str) {
        counter!(self.events_appended_total, "kind" => kind.to_string()).increment(1);
    }

    /// Record quarantined rows for a table.
    pub fn record_rows_quarantined(&self, table: &str, count: usize) {
        if count > 0 {
            counter!(self.rows_quarantined_total, "table" => table.to_string()).increment(count as u64);
        }
    }

    /// Record one aggregation run.
    pub fn record_aggregation(&self, window: &str, duration: Duration, events: usize) {
        counter!(self.aggregations_total, "window" => window.to_string()).increment(1);
        histogram!(self.aggregation_duration, "window" => window.to_string())
            .record(duration.as_secs_f64());
        histogram!(self.aggregation_event_count).record(events as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names_are_namespaced() {
        let collector = MetricsCollector::default();
        assert!(collector.store_operations_total.starts_with("campaign_board_"));
        assert!(collector.events_appended_total.starts_with("campaign_board_"));
    }

    #[test]
    fn test_recording_without_recorder_is_a_noop() {
        let collector = MetricsCollector::default();
        collector.record_event_appended("action");
        collector.record_rows_quarantined("Logs", 2);
        collector.record_aggregation("today", Duration::from_millis(5), 10);
    }
}
