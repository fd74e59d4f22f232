//! Client-side request and execution counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Metrics collector shared by all clones of a client.
#[derive(Debug, Default)]
pub struct ClientMetrics {
    /// Total HTTP requests sent
    pub requests_total: AtomicU64,
    /// Requests answered with a 2xx status
    pub requests_success: AtomicU64,
    /// Requests that failed (network or non-2xx)
    pub requests_failed: AtomicU64,
    /// Calls to `execute_function`
    pub executions_total: AtomicU64,
    /// Executions the server accepted for background processing
    pub executions_background: AtomicU64,
    /// Function instance status polls
    pub status_polls: AtomicU64,
    /// Function instances destroyed after a terminal state
    pub instances_destroyed: AtomicU64,
    /// Cleanup calls that failed and were ignored
    pub cleanup_failures: AtomicU64,
    /// Executions ended by the caller's cancellation token
    pub executions_canceled: AtomicU64,
}

impl ClientMetrics {
    /// Create a new metrics collector.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_requests(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_success(&self) {
        self.requests_success.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_failed(&self) {
        self.requests_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_executions(&self) {
        self.executions_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_background(&self) {
        self.executions_background.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_status_polls(&self) {
        self.status_polls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_destroyed(&self) {
        self.instances_destroyed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_cleanup_failures(&self) {
        self.cleanup_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_canceled(&self) {
        self.executions_canceled.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            requests_success: self.requests_success.load(Ordering::Relaxed),
            requests_failed: self.requests_failed.load(Ordering::Relaxed),
            executions_total: self.executions_total.load(Ordering::Relaxed),
            executions_background: self.executions_background.load(Ordering::Relaxed),
            status_polls: self.status_polls.load(Ordering::Relaxed),
            instances_destroyed: self.instances_destroyed.load(Ordering::Relaxed),
            cleanup_failures: self.cleanup_failures.load(Ordering::Relaxed),
            executions_canceled: self.executions_canceled.load(Ordering::Relaxed),
        }
    }

    /// Export metrics in Prometheus text format.
    pub fn to_prometheus(&self) -> String {
        let s = self.snapshot();
        format!(
            r#"# HELP claviz_client_requests_total Total number of requests
# TYPE claviz_client_requests_total counter
claviz_client_requests_total {}

# HELP claviz_client_requests_success Successful requests
# TYPE claviz_client_requests_success counter
claviz_client_requests_success {}

# HELP claviz_client_requests_failed Failed requests
# TYPE claviz_client_requests_failed counter
claviz_client_requests_failed {}

# HELP claviz_client_executions_total Function executions requested
# TYPE claviz_client_executions_total counter
claviz_client_executions_total {}

# HELP claviz_client_executions_background Executions processed in background
# TYPE claviz_client_executions_background counter
claviz_client_executions_background {}

# HELP claviz_client_status_polls Function instance status polls
# TYPE claviz_client_status_polls counter
claviz_client_status_polls {}

# HELP claviz_client_instances_destroyed Function instances destroyed
# TYPE claviz_client_instances_destroyed counter
claviz_client_instances_destroyed {}

# HELP claviz_client_cleanup_failures Failed function instance cleanups
# TYPE claviz_client_cleanup_failures counter
claviz_client_cleanup_failures {}

# HELP claviz_client_executions_canceled Canceled function executions
# TYPE claviz_client_executions_canceled counter
claviz_client_executions_canceled {}
"#,
            s.requests_total,
            s.requests_success,
            s.requests_failed,
            s.executions_total,
            s.executions_background,
            s.status_polls,
            s.instances_destroyed,
            s.cleanup_failures,
            s.executions_canceled
        )
    }
}

/// Metrics snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub requests_success: u64,
    pub requests_failed: u64,
    pub executions_total: u64,
    pub executions_background: u64,
    pub status_polls: u64,
    pub instances_destroyed: u64,
    pub cleanup_failures: u64,
    pub executions_canceled: u64,
}
