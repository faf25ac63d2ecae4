/// Rights status refresh and alerting
use super::{CreatorRegistry, RegistryState};
use crate::{
    alerts::{generate_alerts, RightsAlert},
    creator::Creator,
    events::RegistryEvent,
    rights::RightsStatus,
};
use chrono::{DateTime, Utc};
use tracing::info;

/// Outcome of one `check_expiring_rights` pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RightsRefresh {
    pub checked: usize,
    pub changed: usize,
}

impl RegistryState {
    pub(crate) fn refresh_rights(&mut self, now: DateTime<Utc>) -> RightsRefresh {
        let checked = self.creators.len();
        let changed = self
            .creators
            .iter_mut()
            .map(|c| c.refresh_status(now))
            .filter(|changed| *changed)
            .count();
        RightsRefresh { checked, changed }
    }

    fn with_status(&self, status: RightsStatus) -> Vec<Creator> {
        self.creators
            .iter()
            .filter(|c| c.rights_status == status)
            .cloned()
            .collect()
    }

    pub(crate) fn status_counts(&self) -> Vec<(RightsStatus, usize)> {
        RightsStatus::ALL
            .iter()
            .map(|status| {
                let count = self
                    .creators
                    .iter()
                    .filter(|c| c.rights_status == *status)
                    .count();
                (*status, count)
            })
            .collect()
    }
}

impl CreatorRegistry {
    /// Recompute `rights_status` and `risk_level` for every creator against now
    pub async fn check_expiring_rights(&self) -> RightsRefresh {
        self.simulate_latency().await;
        let now = self.now();

        let refresh = self.state.write().await.refresh_rights(now);

        if refresh.changed > 0 {
            info!(
                checked = refresh.checked,
                changed = refresh.changed,
                "Creator rights statuses changed"
            );
        }
        self.publish(RegistryEvent::RightsRefreshed {
            checked: refresh.checked,
            changed: refresh.changed,
        });

        refresh
    }

    /// Creators whose last derived status is "Expiring Soon"
    pub async fn get_expiring_creators(&self) -> Vec<Creator> {
        self.simulate_latency().await;
        self.state.read().await.with_status(RightsStatus::ExpiringSoon)
    }

    /// Creators whose last derived status is "Expired"
    pub async fn get_expired_creators(&self) -> Vec<Creator> {
        self.simulate_latency().await;
        self.state.read().await.with_status(RightsStatus::Expired)
    }

    /// Alerts for lapsed and lapsing rights, computed from the stored dates.
    /// Read-only; repeated calls at the same instant give the same alerts.
    pub async fn generate_creator_rights_alerts(&self) -> Vec<RightsAlert> {
        self.simulate_latency().await;
        let now = self.now();
        generate_alerts(&self.state.read().await.creators, now)
    }

    /// Creator count per last derived status
    pub async fn status_counts(&self) -> Vec<(RightsStatus, usize)> {
        self.state.read().await.status_counts()
    }
}
