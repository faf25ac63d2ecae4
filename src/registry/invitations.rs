/// Invitation workflow: invite, resend, revoke, accept
use super::{normalize_email, observe, CreatorRegistry, RegistryState};
use crate::{
    creator::{Creator, CreatorProfile, NewCreator, RegistrationSource},
    error::{RegistryError, RegistryResult},
    events::RegistryEvent,
    invitation::{
        expiry_from, generate_token, CreatorInvitation, InvitationStatus, InviteCreatorForm,
    },
    metrics,
    rights::is_valid_email,
};
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

pub(super) fn pending_conflict(email: &str) -> RegistryError {
    RegistryError::Conflict(format!("{} already has a pending invitation", email))
}

impl RegistryState {
    /// True iff an unexpired pending invitation exists for `email`
    pub(crate) fn has_open_invitation(&self, email: &str, now: DateTime<Utc>) -> bool {
        let email = normalize_email(email);
        self.invitations
            .iter()
            .any(|inv| inv.email == email && inv.is_open(now))
    }

    fn unique_token(&self) -> String {
        loop {
            let token = generate_token();
            if !self.invitations.iter().any(|inv| inv.token == token) {
                return token;
            }
        }
    }

    pub(crate) fn create_invitation(
        &mut self,
        form: InviteCreatorForm,
        invited_by: &str,
        now: DateTime<Utc>,
    ) -> RegistryResult<CreatorInvitation> {
        let email = normalize_email(&form.email);
        if !is_valid_email(&email) {
            return Err(RegistryError::Validation("Invalid email format".to_string()));
        }

        let name = form.name.trim().to_string();
        if name.is_empty() {
            return Err(RegistryError::Validation("Name is required".to_string()));
        }

        if self.has_open_invitation(&email, now) {
            return Err(pending_conflict(&email));
        }

        if self.email_exists(&email) {
            return Err(RegistryError::Conflict(format!(
                "A creator account already exists for {}",
                email
            )));
        }

        let invitation = CreatorInvitation {
            id: Uuid::new_v4().to_string(),
            email,
            name,
            creator_type: form.creator_type,
            token: self.unique_token(),
            status: InvitationStatus::Pending,
            expires_at: expiry_from(now),
            created_at: now,
            invited_by: invited_by.to_string(),
        };

        self.invitations.push(invitation.clone());
        Ok(invitation)
    }

    pub(crate) fn refresh_invitation(
        &mut self,
        id: &str,
        now: DateTime<Utc>,
    ) -> RegistryResult<CreatorInvitation> {
        let invitation = self
            .invitations
            .iter()
            .find(|inv| inv.id == id)
            .ok_or_else(|| RegistryError::NotFound(format!("Invitation {} not found", id)))?;

        if invitation.status != InvitationStatus::Pending {
            return Err(RegistryError::Conflict(
                "Can only resend pending invitations".to_string(),
            ));
        }

        // A lapsed invitation must not be revived next to a newer open one
        let email = invitation.email.clone();
        if self
            .invitations
            .iter()
            .any(|inv| inv.id != id && inv.email == email && inv.is_open(now))
        {
            return Err(pending_conflict(&email));
        }

        let invitation = self
            .invitations
            .iter_mut()
            .find(|inv| inv.id == id)
            .ok_or_else(|| RegistryError::NotFound(format!("Invitation {} not found", id)))?;
        invitation.expires_at = expiry_from(now);
        Ok(invitation.clone())
    }

    pub(crate) fn remove_invitation(&mut self, id: &str) -> Option<CreatorInvitation> {
        let index = self.invitations.iter().position(|inv| inv.id == id)?;
        Some(self.invitations.remove(index))
    }

    /// Effective status of the most recent invitation sent to `email`
    pub(crate) fn invitation_status(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> Option<InvitationStatus> {
        let email = normalize_email(email);
        self.invitations
            .iter()
            .filter(|inv| inv.email == email)
            .max_by_key(|inv| inv.created_at)
            .map(|inv| inv.effective_status(now))
    }

    pub(crate) fn invitation_by_token(&self, token: &str) -> Option<&CreatorInvitation> {
        self.invitations.iter().find(|inv| inv.token == token)
    }

    pub(crate) fn accept(
        &mut self,
        token: &str,
        profile: CreatorProfile,
        now: DateTime<Utc>,
    ) -> RegistryResult<(CreatorInvitation, Creator)> {
        let invitation = self
            .invitation_by_token(token)
            .ok_or_else(|| RegistryError::NotFound("Invitation not found".to_string()))?;

        if invitation.status == InvitationStatus::Accepted {
            return Err(RegistryError::Conflict(
                "Invitation has already been accepted".to_string(),
            ));
        }
        if invitation.is_expired(now) {
            return Err(RegistryError::Validation("Invitation has expired".to_string()));
        }

        let new = NewCreator {
            full_name: invitation.name.clone(),
            email: invitation.email.clone(),
            creator_type: profile
                .creator_type
                .or(invitation.creator_type)
                .unwrap_or_default(),
            valid_from: profile.valid_from,
            valid_through: profile.valid_through,
            contact_information: profile.contact_information,
            notes: profile.notes,
            avatar_url: None,
        };
        let invitation_id = invitation.id.clone();

        // Creator first: if it fails the invitation stays pending
        let creator = self.insert_creator(new, RegistrationSource::Invited, now)?;

        let invitation = self
            .invitations
            .iter_mut()
            .find(|inv| inv.id == invitation_id)
            .ok_or_else(|| RegistryError::Internal("Invitation vanished during accept".to_string()))?;
        invitation.status = InvitationStatus::Accepted;

        Ok((invitation.clone(), creator))
    }
}

impl CreatorRegistry {
    /// Send a new invitation valid for seven days
    pub async fn invite_creator(&self, form: InviteCreatorForm) -> RegistryResult<CreatorInvitation> {
        self.simulate_latency().await;
        let now = self.now();

        let invitation = {
            let mut state = self.state.write().await;
            observe(
                "invite_creator",
                state.create_invitation(form, &self.settings.operator, now),
            )?
        };

        info!(
            invitation_id = %invitation.id,
            expires_at = %invitation.expires_at,
            "Invited creator {}",
            invitation.email
        );
        metrics::record_invitation("sent");
        self.publish(RegistryEvent::InvitationSent {
            invitation_id: invitation.id.clone(),
            email: invitation.email.clone(),
        });

        Ok(invitation)
    }

    /// Push a pending invitation's expiry out by another seven days; the token is kept
    pub async fn resend_invitation(&self, id: &str) -> RegistryResult<CreatorInvitation> {
        self.simulate_latency().await;
        let now = self.now();

        let invitation = {
            let mut state = self.state.write().await;
            observe("resend_invitation", state.refresh_invitation(id, now))?
        };

        info!(invitation_id = %invitation.id, "Resent invitation to {}", invitation.email);
        metrics::record_invitation("resent");
        self.publish(RegistryEvent::InvitationResent {
            invitation_id: invitation.id.clone(),
            email: invitation.email.clone(),
        });

        Ok(invitation)
    }

    /// Remove an invitation. Unknown ids are a no-op and return `None`.
    pub async fn revoke_invitation(&self, id: &str) -> RegistryResult<Option<CreatorInvitation>> {
        self.simulate_latency().await;

        let removed = self.state.write().await.remove_invitation(id);

        if let Some(ref invitation) = removed {
            info!(invitation_id = %invitation.id, "Revoked invitation for {}", invitation.email);
            metrics::record_invitation("revoked");
            self.publish(RegistryEvent::InvitationRevoked {
                invitation_id: invitation.id.clone(),
                email: invitation.email.clone(),
            });
        }

        Ok(removed)
    }

    /// Turn a pending invitation into a creator record
    pub async fn accept_invitation(
        &self,
        token: &str,
        profile: CreatorProfile,
    ) -> RegistryResult<Creator> {
        self.simulate_latency().await;
        let now = self.now();

        let (invitation, creator) = {
            let mut state = self.state.write().await;
            observe("accept_invitation", state.accept(token, profile, now))?
        };

        info!(
            invitation_id = %invitation.id,
            creator_id = %creator.id,
            "Invitation accepted by {}",
            creator.email
        );
        metrics::record_invitation("accepted");
        self.publish(RegistryEvent::InvitationAccepted {
            invitation_id: invitation.id,
            creator_id: creator.id.clone(),
        });

        Ok(creator)
    }

    pub async fn get_invitation_status(&self, email: &str) -> Option<InvitationStatus> {
        self.simulate_latency().await;
        let now = self.now();
        self.state.read().await.invitation_status(email, now)
    }

    /// Resolve the invitation an invitee token refers to
    pub async fn get_creator_by_token(&self, token: &str) -> Option<CreatorInvitation> {
        self.simulate_latency().await;
        self.state.read().await.invitation_by_token(token).cloned()
    }

    pub async fn check_duplicate_invitation(&self, email: &str) -> bool {
        let now = self.now();
        self.state.read().await.has_open_invitation(email, now)
    }

    pub async fn check_email_exists(&self, email: &str) -> bool {
        self.state.read().await.email_exists(email)
    }

    /// All invitations, oldest first
    pub async fn list_invitations(&self) -> Vec<CreatorInvitation> {
        self.simulate_latency().await;
        self.state.read().await.invitations.clone()
    }
}
