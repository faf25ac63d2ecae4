use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};
use tracing::info;

use crate::metrics;

pub mod tasks;

/// Job scheduler for background tasks
pub struct JobScheduler {
    context: Arc<crate::context::AppContext>,
}

impl JobScheduler {
    pub fn new(context: Arc<crate::context::AppContext>) -> Self {
        Self { context }
    }

    /// Start all background jobs
    pub fn start(self: Arc<Self>) -> Vec<JoinHandle<()>> {
        info!("Starting background job scheduler");

        let handles = vec![
            tokio::spawn(Self::rights_refresh_job(Arc::clone(&self))),
            tokio::spawn(Self::alert_sweep_job(Arc::clone(&self))),
        ];

        info!("Background jobs started");
        handles
    }

    /// Re-derive rights status for every creator
    async fn rights_refresh_job(scheduler: Arc<Self>) {
        let period = scheduler.context.config.jobs.rights_check_interval;
        let mut interval = interval(Duration::from_secs(period));

        loop {
            interval.tick().await;
            let started = Instant::now();

            let refresh = tasks::refresh_rights(&scheduler.context).await;
            metrics::record_background_job(
                "rights_refresh",
                "success",
                started.elapsed().as_secs_f64(),
            );
            if refresh.changed > 0 {
                info!(
                    "Rights refresh: {} of {} creators changed status",
                    refresh.changed, refresh.checked
                );
            }
        }
    }

    /// Generate and report rights alerts
    async fn alert_sweep_job(scheduler: Arc<Self>) {
        let period = scheduler.context.config.jobs.alert_sweep_interval;
        let mut interval = interval(Duration::from_secs(period));

        loop {
            interval.tick().await;
            let started = Instant::now();
            info!("Running creator rights alert sweep");

            let summary = tasks::sweep_alerts(&scheduler.context).await;
            metrics::record_background_job(
                "alert_sweep",
                "success",
                started.elapsed().as_secs_f64(),
            );
            if summary.critical + summary.urgent > 0 {
                info!(
                    "Alert sweep: {} critical, {} urgent",
                    summary.critical, summary.urgent
                );
            } else {
                info!("Alert sweep: no creator rights need attention");
            }
        }
    }
}
