/// Creator invitations
///
/// Invitations are time-boxed offers that let a prospective creator
/// self-register through an opaque token.
use crate::creator::CreatorType;
use chrono::{DateTime, Duration, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};

/// Invitations lapse this many days after creation (or last resend)
pub const INVITATION_TTL_DAYS: i64 = 7;

const TOKEN_LENGTH: usize = 32;

/// Invitation state
///
/// `Expired` is never stored; it is reported by
/// [`CreatorInvitation::effective_status`] for pending invitations whose
/// `expires_at` has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Expired,
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "pending",
            InvitationStatus::Accepted => "accepted",
            InvitationStatus::Expired => "expired",
        }
    }
}

/// Invitation record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorInvitation {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_type: Option<CreatorType>,
    pub token: String,
    pub status: InvitationStatus,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub invited_by: String,
}

impl CreatorInvitation {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn effective_status(&self, now: DateTime<Utc>) -> InvitationStatus {
        match self.status {
            InvitationStatus::Pending if self.is_expired(now) => InvitationStatus::Expired,
            status => status,
        }
    }

    /// Pending and not yet lapsed
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.effective_status(now) == InvitationStatus::Pending
    }
}

/// Invite request submitted by an administrator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteCreatorForm {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub creator_type: Option<CreatorType>,
}

impl InviteCreatorForm {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            creator_type: None,
        }
    }

    pub fn with_creator_type(mut self, creator_type: CreatorType) -> Self {
        self.creator_type = Some(creator_type);
        self
    }
}

/// Generate an unguessable invitation token
pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

pub fn expiry_from(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(INVITATION_TTL_DAYS)
}
