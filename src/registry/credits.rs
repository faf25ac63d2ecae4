/// Credit workflow
///
/// A credit and its creator's linkage counter are written under the same
/// guard. Counters are a cache of the credit collection and never go
/// below zero.
use super::{observe, CreatorRegistry, RegistryState};
use crate::{
    creator::Creator,
    credit::{CreatorCredit, CreditTarget},
    error::{RegistryError, RegistryResult},
    events::RegistryEvent,
    metrics,
};
use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

fn adjust_counter(creator: &mut Creator, target: &CreditTarget, added: u32, removed: u32) {
    let counter = match target {
        CreditTarget::Asset { .. } => &mut creator.linked_assets_count,
        CreditTarget::Project { .. } => &mut creator.linked_projects_count,
    };
    *counter = counter.saturating_add(added).saturating_sub(removed);
}

impl RegistryState {
    pub(crate) fn add_credit(
        &mut self,
        creator_id: &str,
        target: CreditTarget,
        role: Option<String>,
        credited_by: &str,
        now: DateTime<Utc>,
    ) -> RegistryResult<CreatorCredit> {
        if target.id().trim().is_empty() {
            return Err(RegistryError::Validation(format!("{} id is required", target.kind())));
        }

        let creator = self
            .creator(creator_id)
            .ok_or_else(|| RegistryError::NotFound(format!("Creator {} not found", creator_id)))?;

        if self.credits.iter().any(|c| c.matches(creator_id, &target)) {
            return Err(RegistryError::Conflict(format!(
                "{} is already credited on {}",
                creator.full_name, target
            )));
        }

        let credit = CreatorCredit {
            id: Uuid::new_v4().to_string(),
            creator_id: creator_id.to_string(),
            target,
            role: role
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
            credited_at: now,
            credited_by: credited_by.to_string(),
        };

        let creator = self
            .creator_mut(creator_id)
            .ok_or_else(|| RegistryError::NotFound(format!("Creator {} not found", creator_id)))?;
        adjust_counter(creator, &credit.target, 1, 0);
        self.credits.push(credit.clone());

        Ok(credit)
    }

    /// Drop every credit for the exact (creator, target) pair; returns how many went
    pub(crate) fn remove_credits(&mut self, creator_id: &str, target: &CreditTarget) -> usize {
        let before = self.credits.len();
        self.credits.retain(|c| !c.matches(creator_id, target));
        let removed = before - self.credits.len();

        if let Some(creator) = self.creator_mut(creator_id) {
            let removed = u32::try_from(removed).unwrap_or(u32::MAX);
            adjust_counter(creator, target, 0, removed);
        }

        removed
    }

    /// Distinct creators credited on `target`, in credit order
    pub(crate) fn creators_for(&self, target: &CreditTarget) -> Vec<Creator> {
        let mut creators: Vec<Creator> = Vec::new();
        for credit in self.credits.iter().filter(|c| &c.target == target) {
            if creators.iter().any(|c| c.id == credit.creator_id) {
                continue;
            }
            if let Some(creator) = self.creator(&credit.creator_id) {
                creators.push(creator.clone());
            }
        }
        creators
    }

    pub(crate) fn credits_for_creator(&self, creator_id: &str) -> impl Iterator<Item = &CreatorCredit> {
        let creator_id = creator_id.to_string();
        self.credits.iter().filter(move |c| c.creator_id == creator_id)
    }

    /// Recompute linkage counters from the credit collection and compare
    pub(crate) fn counts_consistent(&self) -> bool {
        self.creators.iter().all(|creator| {
            let (assets, projects) = self.credits_for_creator(&creator.id).fold(
                (0u32, 0u32),
                |(assets, projects), credit| match credit.target {
                    CreditTarget::Asset { .. } => (assets + 1, projects),
                    CreditTarget::Project { .. } => (assets, projects + 1),
                },
            );
            creator.linked_assets_count == assets && creator.linked_projects_count == projects
        })
    }
}

impl CreatorRegistry {
    async fn credit(
        &self,
        operation: &'static str,
        creator_id: &str,
        target: CreditTarget,
        role: Option<String>,
    ) -> RegistryResult<CreatorCredit> {
        self.simulate_latency().await;
        let now = self.now();

        let credit = {
            let mut state = self.state.write().await;
            observe(
                operation,
                state.add_credit(creator_id, target, role, &self.settings.operator, now),
            )?
        };

        info!(
            creator_id,
            credit_id = %credit.id,
            role = credit.role.as_deref().unwrap_or("-"),
            "Credited creator on {}",
            credit.target
        );
        metrics::record_credit("added", credit.target.kind());
        self.publish(RegistryEvent::CreditAdded {
            creator_id: credit.creator_id.clone(),
            target: credit.target.clone(),
            role: credit.role.clone(),
        });

        Ok(credit)
    }

    async fn uncredit(&self, creator_id: &str, target: CreditTarget) -> RegistryResult<usize> {
        self.simulate_latency().await;

        let removed = self.state.write().await.remove_credits(creator_id, &target);

        if removed == 0 {
            debug!(creator_id, "No credit on {} to remove", target);
            return Ok(0);
        }

        info!(creator_id, removed, "Removed credit on {}", target);
        metrics::record_credit("removed", target.kind());
        self.publish(RegistryEvent::CreditRemoved {
            creator_id: creator_id.to_string(),
            target,
            removed,
        });

        Ok(removed)
    }

    /// Credit a creator on an asset. Fails if the pair is already credited.
    pub async fn credit_creator_to_asset(
        &self,
        creator_id: &str,
        asset_id: &str,
        role: Option<String>,
    ) -> RegistryResult<CreatorCredit> {
        self.credit("credit_creator_to_asset", creator_id, CreditTarget::asset(asset_id), role)
            .await
    }

    /// Credit a creator on a project. Fails if the pair is already credited.
    pub async fn credit_creator_to_project(
        &self,
        creator_id: &str,
        project_id: &str,
        role: Option<String>,
    ) -> RegistryResult<CreatorCredit> {
        self.credit(
            "credit_creator_to_project",
            creator_id,
            CreditTarget::project(project_id),
            role,
        )
        .await
    }

    /// Remove the asset credit for this pair. Missing pairs are a successful no-op.
    pub async fn remove_asset_credit(&self, creator_id: &str, asset_id: &str) -> RegistryResult<usize> {
        self.uncredit(creator_id, CreditTarget::asset(asset_id)).await
    }

    /// Remove the project credit for this pair. Missing pairs are a successful no-op.
    pub async fn remove_project_credit(
        &self,
        creator_id: &str,
        project_id: &str,
    ) -> RegistryResult<usize> {
        self.uncredit(creator_id, CreditTarget::project(project_id)).await
    }

    pub async fn get_creators_by_asset(&self, asset_id: &str) -> Vec<Creator> {
        self.simulate_latency().await;
        self.state.read().await.creators_for(&CreditTarget::asset(asset_id))
    }

    pub async fn get_creators_by_project(&self, project_id: &str) -> Vec<Creator> {
        self.simulate_latency().await;
        self.state.read().await.creators_for(&CreditTarget::project(project_id))
    }

    pub async fn get_assets_by_creator(&self, creator_id: &str) -> Vec<String> {
        self.simulate_latency().await;
        self.state
            .read()
            .await
            .credits_for_creator(creator_id)
            .filter_map(|c| c.target.asset_id().map(str::to_string))
            .collect()
    }

    pub async fn get_projects_by_creator(&self, creator_id: &str) -> Vec<String> {
        self.simulate_latency().await;
        self.state
            .read()
            .await
            .credits_for_creator(creator_id)
            .filter_map(|c| c.target.project_id().map(str::to_string))
            .collect()
    }

    /// Every credit held by a creator, asset and project alike
    pub async fn get_all_credits_by_creator(&self, creator_id: &str) -> Vec<CreatorCredit> {
        self.simulate_latency().await;
        self.state
            .read()
            .await
            .credits_for_creator(creator_id)
            .cloned()
            .collect()
    }

    /// Whether every creator's counters match its credits
    pub async fn counts_consistent(&self) -> bool {
        self.state.read().await.counts_consistent()
    }
}
