/// Event type definitions for the registry
///
/// One event is published after every successful mutation. Presentation
/// layers turn them into confirmations; the registry never notifies directly.
use crate::credit::CreditTarget;
use serde::{Deserialize, Serialize};

/// Registry mutation event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RegistryEvent {
    #[serde(rename_all = "camelCase")]
    InvitationSent { invitation_id: String, email: String },
    #[serde(rename_all = "camelCase")]
    InvitationResent { invitation_id: String, email: String },
    #[serde(rename_all = "camelCase")]
    InvitationRevoked { invitation_id: String, email: String },
    #[serde(rename_all = "camelCase")]
    InvitationAccepted { invitation_id: String, creator_id: String },
    #[serde(rename_all = "camelCase")]
    CreatorCreated { creator_id: String, full_name: String },
    #[serde(rename_all = "camelCase")]
    CreatorUpdated { creator_id: String, full_name: String },
    #[serde(rename_all = "camelCase")]
    CreditAdded {
        creator_id: String,
        target: CreditTarget,
        role: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    CreditRemoved {
        creator_id: String,
        target: CreditTarget,
        removed: usize,
    },
    #[serde(rename_all = "camelCase")]
    RightsRefreshed { checked: usize, changed: usize },
}

impl RegistryEvent {
    /// Short label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            RegistryEvent::InvitationSent { .. } => "invitation_sent",
            RegistryEvent::InvitationResent { .. } => "invitation_resent",
            RegistryEvent::InvitationRevoked { .. } => "invitation_revoked",
            RegistryEvent::InvitationAccepted { .. } => "invitation_accepted",
            RegistryEvent::CreatorCreated { .. } => "creator_created",
            RegistryEvent::CreatorUpdated { .. } => "creator_updated",
            RegistryEvent::CreditAdded { .. } => "credit_added",
            RegistryEvent::CreditRemoved { .. } => "credit_removed",
            RegistryEvent::RightsRefreshed { .. } => "rights_refreshed",
        }
    }

    /// Confirmation title
    pub fn title(&self) -> &'static str {
        match self {
            RegistryEvent::InvitationSent { .. } => "Invitation sent",
            RegistryEvent::InvitationResent { .. } => "Invitation resent",
            RegistryEvent::InvitationRevoked { .. } => "Invitation revoked",
            RegistryEvent::InvitationAccepted { .. } => "Invitation accepted",
            RegistryEvent::CreatorCreated { .. } => "Creator added",
            RegistryEvent::CreatorUpdated { .. } => "Creator updated",
            RegistryEvent::CreditAdded { .. } => "Creator credited",
            RegistryEvent::CreditRemoved { .. } => "Credit removed",
            RegistryEvent::RightsRefreshed { .. } => "Rights refreshed",
        }
    }

    /// Display-ready confirmation message
    pub fn message(&self) -> String {
        match self {
            RegistryEvent::InvitationSent { email, .. } => {
                format!("Invitation sent to {}", email)
            }
            RegistryEvent::InvitationResent { email, .. } => {
                format!("Invitation resent to {}", email)
            }
            RegistryEvent::InvitationRevoked { email, .. } => {
                format!("Invitation for {} has been revoked", email)
            }
            RegistryEvent::InvitationAccepted { creator_id, .. } => {
                format!("Invitation accepted; creator {} registered", creator_id)
            }
            RegistryEvent::CreatorCreated { full_name, .. } => {
                format!("{} has been added to the registry", full_name)
            }
            RegistryEvent::CreatorUpdated { full_name, .. } => {
                format!("{}'s profile has been updated", full_name)
            }
            RegistryEvent::CreditAdded { target, role, .. } => match role {
                Some(role) => format!("Creator credited on {} as {}", target, role),
                None => format!("Creator credited on {}", target),
            },
            RegistryEvent::CreditRemoved { target, .. } => {
                format!("Credit removed from {}", target)
            }
            RegistryEvent::RightsRefreshed { checked, changed } => {
                format!("Checked {} creators, {} status changes", checked, changed)
            }
        }
    }
}
