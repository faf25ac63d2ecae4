/// Creator Rights Registry
///
/// Owns the creator, invitation and credit collections. All state lives
/// behind one `RwLock`: every check-then-write sequence (duplicate
/// invitation, duplicate credit, credit plus counter) runs under a single
/// write guard, so readers never observe a credit without its counter.
///
/// State transitions are synchronous methods on `RegistryState`; the async
/// `CreatorRegistry` methods add latency simulation, logging, metrics and
/// event publication around them.

mod creators;
mod credits;
mod invitations;
mod rights;

pub use rights::RightsRefresh;

use crate::{
    clock::{Clock, SystemClock},
    config::RegistrySettings,
    creator::{format_creator_rights_id, Creator},
    credit::CreatorCredit,
    error::RegistryResult,
    events::RegistryEvent,
    invitation::CreatorInvitation,
    metrics,
};
use chrono::{DateTime, Datelike, Utc};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, warn};

/// In-memory registry collections
#[derive(Debug, Default)]
pub(crate) struct RegistryState {
    pub(crate) creators: Vec<Creator>,
    pub(crate) invitations: Vec<CreatorInvitation>,
    pub(crate) credits: Vec<CreatorCredit>,
    rights_sequence: u64,
}

impl RegistryState {
    pub(crate) fn creator(&self, id: &str) -> Option<&Creator> {
        self.creators.iter().find(|c| c.id == id)
    }

    pub(crate) fn creator_mut(&mut self, id: &str) -> Option<&mut Creator> {
        self.creators.iter_mut().find(|c| c.id == id)
    }

    pub(crate) fn creator_by_email(&self, email: &str) -> Option<&Creator> {
        let email = normalize_email(email);
        self.creators.iter().find(|c| c.email == email)
    }

    pub(crate) fn email_exists(&self, email: &str) -> bool {
        self.creator_by_email(email).is_some()
    }

    /// Next `CR-<year>-<seq>` code; the sequence never repeats
    fn next_creator_rights_id(&mut self, now: DateTime<Utc>) -> String {
        self.rights_sequence += 1;
        format_creator_rights_id(now.year(), self.rights_sequence)
    }
}

/// Emails are compared trimmed and case-insensitively
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Creator rights registry service
#[derive(Clone)]
pub struct CreatorRegistry {
    state: Arc<RwLock<RegistryState>>,
    clock: Arc<dyn Clock>,
    settings: RegistrySettings,
    events: broadcast::Sender<RegistryEvent>,
}

impl CreatorRegistry {
    /// Create a registry on the system clock
    pub fn new(settings: RegistrySettings) -> Self {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    /// Create a registry with an explicit time source
    pub fn with_clock(settings: RegistrySettings, clock: Arc<dyn Clock>) -> Self {
        let (events, _) = broadcast::channel(settings.event_buffer.max(1));
        Self {
            state: Arc::new(RwLock::new(RegistryState::default())),
            clock,
            settings,
            events,
        }
    }

    /// Receive an event for every successful mutation from now on
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.events.subscribe()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn operator(&self) -> &str {
        &self.settings.operator
    }

    fn publish(&self, event: RegistryEvent) {
        debug!(event = event.kind(), "{}", event.message());
        // No subscribers is not an error
        let _ = self.events.send(event);
    }

    async fn simulate_latency(&self) {
        let latency = self.settings.simulated_latency();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }
}

/// Log and count a rejected operation, passing the result through
fn observe<T>(operation: &'static str, result: RegistryResult<T>) -> RegistryResult<T> {
    if let Err(ref e) = result {
        warn!(operation, error = %e, "Registry operation rejected");
        metrics::record_error(e.code(), operation);
    }
    result
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::{clock::ManualClock, creator::NewCreator};
    use chrono::{Duration, NaiveDate, TimeZone};

    pub(crate) fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap()
    }

    pub(crate) fn registry() -> (CreatorRegistry, ManualClock) {
        let clock = ManualClock::new(fixed_now());
        let registry =
            CreatorRegistry::with_clock(RegistrySettings::default(), Arc::new(clock.clone()));
        (registry, clock)
    }

    pub(crate) fn new_creator(name: &str, email: &str, days_left: i64) -> NewCreator {
        NewCreator {
            full_name: name.to_string(),
            email: email.to_string(),
            creator_type: Default::default(),
            valid_from: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            valid_through: fixed_now().date_naive() + Duration::days(days_left),
            contact_information: None,
            notes: None,
            avatar_url: None,
        }
    }
}
