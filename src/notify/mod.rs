/// Confirmation delivery
///
/// The registry only publishes events. A `Notifier` decides how a
/// confirmation reaches the user; the forwarder bridges the two.
use crate::{error::RegistryResult, events::RegistryEvent};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Display-ready confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub event: RegistryEvent,
}

impl From<RegistryEvent> for Notification {
    fn from(event: RegistryEvent) -> Self {
        Self {
            title: event.title().to_string(),
            message: event.message(),
            event,
        }
    }
}

/// Sink for confirmations
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> RegistryResult<()>;
}

/// Writes confirmations to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, notification: &Notification) -> RegistryResult<()> {
        info!(
            event = notification.event.kind(),
            "{}: {}",
            notification.title,
            notification.message
        );
        Ok(())
    }
}

/// Keeps confirmations in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<Notification> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn notify(&self, notification: &Notification) -> RegistryResult<()> {
        self.sent.lock().await.push(notification.clone());
        Ok(())
    }
}

/// Deliver every event from `events` to `notifier` until the channel closes
pub fn spawn_forwarder(
    mut events: broadcast::Receiver<RegistryEvent>,
    notifier: Arc<dyn Notifier>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    let notification = Notification::from(event);
                    if let Err(e) = notifier.notify(&notification).await {
                        error!("Failed to deliver notification: {}", e);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Notification forwarder lagged, {} events dropped", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::SystemClock, config::RegistrySettings, invitation::InviteCreatorForm,
        registry::CreatorRegistry,
    };

    #[tokio::test]
    async fn test_forwarder_delivers_confirmations() {
        let registry = CreatorRegistry::with_clock(RegistrySettings::default(), Arc::new(SystemClock));
        let notifier = MemoryNotifier::new();
        let handle = spawn_forwarder(registry.subscribe(), Arc::new(notifier.clone()));

        let invitation = registry
            .invite_creator(InviteCreatorForm::new("alice@example.com", "Alice"))
            .await
            .unwrap();
        registry.revoke_invitation(&invitation.id).await.unwrap();

        // Dropping the last sender closes the channel and ends the forwarder
        drop(registry);
        handle.await.unwrap();

        let sent = notifier.sent().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].title, "Invitation sent");
        assert_eq!(sent[0].message, "Invitation sent to alice@example.com");
        assert_eq!(sent[1].title, "Invitation revoked");
    }

    #[tokio::test]
    async fn test_failed_mutation_sends_nothing() {
        let registry = CreatorRegistry::with_clock(RegistrySettings::default(), Arc::new(SystemClock));
        let notifier = MemoryNotifier::new();
        let handle = spawn_forwarder(registry.subscribe(), Arc::new(notifier.clone()));

        assert!(registry
            .invite_creator(InviteCreatorForm::new("bad-email", "Nobody"))
            .await
            .is_err());

        drop(registry);
        handle.await.unwrap();
        assert!(notifier.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_tracing_notifier_accepts_everything() {
        let notification = Notification::from(RegistryEvent::RightsRefreshed {
            checked: 2,
            changed: 0,
        });
        assert!(TracingNotifier.notify(&notification).await.is_ok());
    }
}
