/// Metrics and telemetry for the creator rights registry
///
/// Provides Prometheus-compatible metrics for monitoring:
/// - Invitation and credit mutations
/// - Creator population by rights status
/// - Alert generation
/// - Background job execution
/// - Rejected operations

use crate::{
    error::{RegistryError, RegistryResult},
    rights::RightsStatus,
};
use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge, register_int_gauge_vec,
    Encoder, HistogramVec, IntCounterVec, IntGauge, IntGaugeVec, TextEncoder,
};

lazy_static! {
    // ========== Registry Metrics ==========

    /// Invitation operations by action
    pub static ref INVITATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "invitations_total",
        "Total number of invitation operations",
        &["action"]
    )
    .unwrap();

    /// Credit operations by action and target kind
    pub static ref CREDITS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "credits_total",
        "Total number of credit operations",
        &["action", "target"]
    )
    .unwrap();

    /// Registered creators
    pub static ref CREATORS_TOTAL: IntGauge = register_int_gauge!(
        "creators_total",
        "Number of registered creators"
    )
    .unwrap();

    /// Creators by last derived rights status
    pub static ref CREATORS_BY_STATUS: IntGaugeVec = register_int_gauge_vec!(
        "creators_by_status",
        "Number of creators per rights status",
        &["status"]
    )
    .unwrap();

    /// Alerts produced by sweeps, by severity
    pub static ref RIGHTS_ALERTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "rights_alerts_total",
        "Total number of creator rights alerts generated",
        &["severity"]
    )
    .unwrap();

    // ========== Background Job Metrics ==========

    /// Background job executions by job type and status
    pub static ref BACKGROUND_JOBS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "background_jobs_total",
        "Total number of background job executions",
        &["job_type", "status"]
    )
    .unwrap();

    /// Background job duration in seconds
    pub static ref BACKGROUND_JOB_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "background_job_duration_seconds",
        "Background job execution time in seconds",
        &["job_type"],
        vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]
    )
    .unwrap();

    // ========== Error Metrics ==========

    /// Rejected operations by error code and operation
    pub static ref REGISTRY_ERRORS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "registry_errors_total",
        "Total number of rejected registry operations",
        &["error_type", "operation"]
    )
    .unwrap();
}

/// Render metrics in Prometheus text format
pub fn render_metrics() -> RegistryResult<String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| RegistryError::Internal(format!("Failed to encode metrics: {}", e)))?;
    String::from_utf8(buffer)
        .map_err(|e| RegistryError::Internal(format!("Metrics are not valid UTF-8: {}", e)))
}

/// Record an invitation operation
pub fn record_invitation(action: &str) {
    INVITATIONS_TOTAL.with_label_values(&[action]).inc();
}

/// Record a credit operation
pub fn record_credit(action: &str, target: &str) {
    CREDITS_TOTAL.with_label_values(&[action, target]).inc();
}

/// Set the creator population gauges
pub fn set_creator_counts(total: usize, by_status: &[(RightsStatus, usize)]) {
    CREATORS_TOTAL.set(total as i64);
    for (status, count) in by_status {
        CREATORS_BY_STATUS
            .with_label_values(&[status.as_str()])
            .set(*count as i64);
    }
}

/// Record a generated alert
pub fn record_alert(severity: &str) {
    RIGHTS_ALERTS_TOTAL.with_label_values(&[severity]).inc();
}

/// Record a background job execution
pub fn record_background_job(job_type: &str, status: &str, duration: f64) {
    BACKGROUND_JOBS_TOTAL
        .with_label_values(&[job_type, status])
        .inc();
    BACKGROUND_JOB_DURATION_SECONDS
        .with_label_values(&[job_type])
        .observe(duration);
}

/// Record a rejected operation
pub fn record_error(error_type: &str, operation: &str) {
    REGISTRY_ERRORS_TOTAL
        .with_label_values(&[error_type, operation])
        .inc();
}
