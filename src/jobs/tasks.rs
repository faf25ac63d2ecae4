/// Background task implementations
use crate::{
    alerts::{AlertSeverity, RightsAlert},
    context::AppContext,
    metrics,
    registry::RightsRefresh,
};
use tracing::warn;

/// Result of one alert sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertSummary {
    pub critical: usize,
    pub urgent: usize,
    pub alerts: Vec<RightsAlert>,
}

/// Recompute derived rights status and publish the population gauges
pub async fn refresh_rights(ctx: &AppContext) -> RightsRefresh {
    let refresh = ctx.registry.check_expiring_rights().await;

    let counts = ctx.registry.status_counts().await;
    metrics::set_creator_counts(refresh.checked, &counts);

    refresh
}

/// Generate rights alerts and log the critical ones
pub async fn sweep_alerts(ctx: &AppContext) -> AlertSummary {
    let alerts = ctx.registry.generate_creator_rights_alerts().await;

    let mut critical = 0;
    let mut urgent = 0;
    for alert in &alerts {
        metrics::record_alert(alert.severity.as_str());
        match alert.severity {
            AlertSeverity::Critical => {
                critical += 1;
                warn!(creator_id = %alert.creator_id, alert_id = %alert.id, "{}", alert.description);
            }
            AlertSeverity::Urgent => urgent += 1,
        }
    }

    AlertSummary {
        critical,
        urgent,
        alerts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::ManualClock,
        config::RegistryConfig,
        creator::NewCreator,
        rights::RightsStatus,
    };
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use std::sync::Arc;

    fn creator(email: &str, valid_through: NaiveDate) -> NewCreator {
        NewCreator {
            full_name: email.split('@').next().unwrap_or_default().to_string(),
            email: email.to_string(),
            creator_type: Default::default(),
            valid_from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            valid_through,
            contact_information: None,
            notes: None,
            avatar_url: None,
        }
    }

    #[tokio::test]
    async fn test_refresh_and_sweep() {
        let now = Utc.with_ymd_and_hms(2026, 7, 1, 6, 0, 0).unwrap();
        let clock = ManualClock::new(now);
        let ctx = AppContext::with_clock(RegistryConfig::default(), Arc::new(clock.clone())).unwrap();
        let today = now.date_naive();

        ctx.registry
            .create_creator(creator("late@example.com", today - Duration::days(2)))
            .await
            .unwrap();
        ctx.registry
            .create_creator(creator("soon@example.com", today + Duration::days(12)))
            .await
            .unwrap();
        ctx.registry
            .create_creator(creator("fine@example.com", today + Duration::days(200)))
            .await
            .unwrap();

        let refresh = refresh_rights(&ctx).await;
        assert_eq!(refresh.checked, 3);
        assert_eq!(refresh.changed, 0);
        assert_eq!(ctx.registry.get_expired_creators().await.len(), 1);

        let summary = sweep_alerts(&ctx).await;
        assert_eq!(summary.critical, 1);
        assert_eq!(summary.urgent, 1);
        assert_eq!(summary.alerts.len(), 2);

        // A week later the "soon" creator is still urgent; refresh flips nothing new
        clock.advance(Duration::days(7));
        let refresh = refresh_rights(&ctx).await;
        assert_eq!(refresh.changed, 0);
        let counts = ctx.registry.status_counts().await;
        assert!(counts.contains(&(RightsStatus::ExpiringSoon, 1)));
    }

    #[tokio::test]
    async fn test_empty_registry_sweeps_cleanly() {
        let ctx = AppContext::new(RegistryConfig::default()).unwrap();

        let refresh = refresh_rights(&ctx).await;
        assert_eq!(refresh, RightsRefresh { checked: 0, changed: 0 });

        let summary = sweep_alerts(&ctx).await;
        assert_eq!(
            summary,
            AlertSummary {
                critical: 0,
                urgent: 0,
                alerts: Vec::new(),
            }
        );
    }
}
