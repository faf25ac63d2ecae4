/// Creator lifecycle: admin-direct creation, profile edits, attachments
use super::{
    invitations::pending_conflict, normalize_email, observe, CreatorRegistry, RegistryState,
};
use crate::{
    creator::{
        validate_rights_window, Creator, CreatorUpdate, NewCreator, ReferenceMaterial,
        RegistrationSource,
    },
    error::{RegistryError, RegistryResult},
    events::RegistryEvent,
    rights::{calculate_creator_risk_level, calculate_rights_status, is_valid_email},
};
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

fn not_found(id: &str) -> RegistryError {
    RegistryError::NotFound(format!("Creator {} not found", id))
}

impl RegistryState {
    pub(crate) fn insert_creator(
        &mut self,
        new: NewCreator,
        source: RegistrationSource,
        now: DateTime<Utc>,
    ) -> RegistryResult<Creator> {
        let full_name = new.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(RegistryError::Validation("Full name is required".to_string()));
        }

        let email = normalize_email(&new.email);
        if !is_valid_email(&email) {
            return Err(RegistryError::Validation("Invalid email format".to_string()));
        }

        validate_rights_window(new.valid_from, new.valid_through)?;

        if self.email_exists(&email) {
            return Err(RegistryError::Conflict(format!(
                "A creator account already exists for {}",
                email
            )));
        }

        // An accepted invitation is the one open invitation for this email
        if source != RegistrationSource::Invited && self.has_open_invitation(&email, now) {
            return Err(pending_conflict(&email));
        }

        let creator = Creator {
            id: Uuid::new_v4().to_string(),
            creator_rights_id: self.next_creator_rights_id(now),
            full_name,
            email,
            creator_type: new.creator_type,
            registration_source: source,
            contact_information: new.contact_information,
            notes: new.notes,
            valid_from: new.valid_from,
            valid_through: new.valid_through,
            rights_status: calculate_rights_status(new.valid_through, now),
            risk_level: calculate_creator_risk_level(new.valid_through, now),
            linked_assets_count: 0,
            linked_projects_count: 0,
            reference_materials: Vec::new(),
            rights_agreement_url: None,
            rights_agreement_file_name: None,
            avatar_url: new.avatar_url,
            last_verified: None,
            created_at: now,
        };

        self.creators.push(creator.clone());
        Ok(creator)
    }

    pub(crate) fn update_creator(
        &mut self,
        id: &str,
        update: CreatorUpdate,
        now: DateTime<Utc>,
    ) -> RegistryResult<Creator> {
        let current = self.creator(id).ok_or_else(|| not_found(id))?;

        // Validate everything before touching the record
        let full_name = match update.full_name {
            Some(name) if name.trim().is_empty() => {
                return Err(RegistryError::Validation("Full name is required".to_string()));
            }
            Some(name) => name.trim().to_string(),
            None => current.full_name.clone(),
        };

        let email = match update.email {
            Some(email) => {
                let email = normalize_email(&email);
                if !is_valid_email(&email) {
                    return Err(RegistryError::Validation("Invalid email format".to_string()));
                }
                if email != current.email && self.email_exists(&email) {
                    return Err(RegistryError::Conflict(format!(
                        "A creator account already exists for {}",
                        email
                    )));
                }
                if email != current.email && self.has_open_invitation(&email, now) {
                    return Err(pending_conflict(&email));
                }
                email
            }
            None => current.email.clone(),
        };

        let valid_from = update.valid_from.unwrap_or(current.valid_from);
        let valid_through = update.valid_through.unwrap_or(current.valid_through);
        validate_rights_window(valid_from, valid_through)?;

        let creator = self.creator_mut(id).ok_or_else(|| not_found(id))?;
        creator.full_name = full_name;
        creator.email = email;
        creator.valid_from = valid_from;
        creator.valid_through = valid_through;
        if let Some(creator_type) = update.creator_type {
            creator.creator_type = creator_type;
        }
        if update.contact_information.is_some() {
            creator.contact_information = update.contact_information;
        }
        if update.notes.is_some() {
            creator.notes = update.notes;
        }
        if update.avatar_url.is_some() {
            creator.avatar_url = update.avatar_url;
        }
        creator.refresh_status(now);

        Ok(creator.clone())
    }

    fn edit_creator<F>(&mut self, id: &str, edit: F) -> RegistryResult<Creator>
    where
        F: FnOnce(&mut Creator) -> RegistryResult<()>,
    {
        let creator = self.creator_mut(id).ok_or_else(|| not_found(id))?;
        edit(creator)?;
        Ok(creator.clone())
    }
}

impl CreatorRegistry {
    /// Create a creator directly, bypassing the invitation flow
    pub async fn create_creator(&self, new: NewCreator) -> RegistryResult<Creator> {
        self.simulate_latency().await;
        let now = self.now();

        let creator = {
            let mut state = self.state.write().await;
            observe(
                "create_creator",
                state.insert_creator(new, RegistrationSource::SelfRegistered, now),
            )?
        };

        info!(
            creator_id = %creator.id,
            rights_id = %creator.creator_rights_id,
            "Created creator {}",
            creator.full_name
        );
        self.publish(RegistryEvent::CreatorCreated {
            creator_id: creator.id.clone(),
            full_name: creator.full_name.clone(),
        });

        Ok(creator)
    }

    pub async fn get_creator(&self, id: &str) -> Option<Creator> {
        self.simulate_latency().await;
        self.state.read().await.creator(id).cloned()
    }

    pub async fn get_creator_by_email(&self, email: &str) -> Option<Creator> {
        self.simulate_latency().await;
        self.state.read().await.creator_by_email(email).cloned()
    }

    /// All creators in registration order
    pub async fn list_creators(&self) -> Vec<Creator> {
        self.simulate_latency().await;
        self.state.read().await.creators.clone()
    }

    /// Apply a partial profile edit; derived status is recomputed
    pub async fn update_creator_profile(
        &self,
        id: &str,
        update: CreatorUpdate,
    ) -> RegistryResult<Creator> {
        self.simulate_latency().await;
        if update.is_empty() {
            return observe(
                "update_creator_profile",
                Err(RegistryError::Validation("No changes supplied".to_string())),
            );
        }

        let now = self.now();
        let creator = {
            let mut state = self.state.write().await;
            observe("update_creator_profile", state.update_creator(id, update, now))?
        };

        info!(creator_id = %creator.id, "Updated creator profile");
        self.publish(RegistryEvent::CreatorUpdated {
            creator_id: creator.id.clone(),
            full_name: creator.full_name.clone(),
        });

        Ok(creator)
    }

    /// Attach a reference file; the material id is assigned here
    pub async fn add_reference_material(
        &self,
        creator_id: &str,
        file_name: &str,
        url: &str,
        description: Option<String>,
    ) -> RegistryResult<Creator> {
        self.simulate_latency().await;
        let now = self.now();

        let result = if file_name.trim().is_empty() || url.trim().is_empty() {
            Err(RegistryError::Validation(
                "Reference material needs a file name and URL".to_string(),
            ))
        } else {
            let material = ReferenceMaterial {
                id: Uuid::new_v4().to_string(),
                file_name: file_name.trim().to_string(),
                url: url.trim().to_string(),
                description,
                uploaded_at: now,
            };
            let mut state = self.state.write().await;
            state.edit_creator(creator_id, |c| {
                c.reference_materials.push(material);
                Ok(())
            })
        };
        let creator = observe("add_reference_material", result)?;

        info!(creator_id, file_name, "Attached reference material");
        self.publish(RegistryEvent::CreatorUpdated {
            creator_id: creator.id.clone(),
            full_name: creator.full_name.clone(),
        });

        Ok(creator)
    }

    pub async fn remove_reference_material(
        &self,
        creator_id: &str,
        material_id: &str,
    ) -> RegistryResult<Creator> {
        self.simulate_latency().await;

        let creator = {
            let mut state = self.state.write().await;
            observe(
                "remove_reference_material",
                state.edit_creator(creator_id, |c| {
                    let before = c.reference_materials.len();
                    c.reference_materials.retain(|m| m.id != material_id);
                    if c.reference_materials.len() == before {
                        return Err(RegistryError::NotFound(format!(
                            "Reference material {} not found",
                            material_id
                        )));
                    }
                    Ok(())
                }),
            )?
        };

        self.publish(RegistryEvent::CreatorUpdated {
            creator_id: creator.id.clone(),
            full_name: creator.full_name.clone(),
        });

        Ok(creator)
    }

    /// Record the signed rights agreement file
    pub async fn set_rights_agreement(
        &self,
        creator_id: &str,
        url: &str,
        file_name: &str,
    ) -> RegistryResult<Creator> {
        self.simulate_latency().await;

        let result = if url.trim().is_empty() {
            Err(RegistryError::Validation("Agreement URL is required".to_string()))
        } else {
            let mut state = self.state.write().await;
            state.edit_creator(creator_id, |c| {
                c.rights_agreement_url = Some(url.trim().to_string());
                c.rights_agreement_file_name = Some(file_name.trim().to_string());
                Ok(())
            })
        };
        let creator = observe("set_rights_agreement", result)?;

        self.publish(RegistryEvent::CreatorUpdated {
            creator_id: creator.id.clone(),
            full_name: creator.full_name.clone(),
        });

        Ok(creator)
    }

    /// Stamp `last_verified` with the current time
    pub async fn mark_verified(&self, creator_id: &str) -> RegistryResult<Creator> {
        self.simulate_latency().await;
        let now = self.now();

        let creator = {
            let mut state = self.state.write().await;
            observe(
                "mark_verified",
                state.edit_creator(creator_id, |c| {
                    c.last_verified = Some(now);
                    Ok(())
                }),
            )?
        };

        self.publish(RegistryEvent::CreatorUpdated {
            creator_id: creator.id.clone(),
            full_name: creator.full_name.clone(),
        });

        Ok(creator)
    }

    /// Number of registered creators
    pub async fn creator_count(&self) -> usize {
        self.state.read().await.creators.len()
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{fixed_now, new_creator, registry};
    use super::*;
    use crate::{
        creator::CreatorProfile,
        invitation::InviteCreatorForm,
        rights::{RightsStatus, RiskLevel},
    };
    use chrono::{Duration, NaiveDate};

    #[tokio::test]
    async fn test_create_creator_assigns_identity() {
        let (registry, _) = registry();

        let first = registry
            .create_creator(new_creator("Maya Chen", " Maya@Example.com ", 90))
            .await
            .unwrap();
        let second = registry
            .create_creator(new_creator("Leo Park", "leo@example.com", 90))
            .await
            .unwrap();

        assert_eq!(first.email, "maya@example.com");
        assert_eq!(first.creator_rights_id, "CR-2026-00001");
        assert_eq!(second.creator_rights_id, "CR-2026-00002");
        assert_ne!(first.id, second.id);
        assert_eq!(first.rights_status, RightsStatus::Authorized);
        assert_eq!(first.registration_source, RegistrationSource::SelfRegistered);
        assert_eq!(registry.creator_count().await, 2);
    }

    #[tokio::test]
    async fn test_create_creator_rejects_duplicate_email() {
        let (registry, _) = registry();
        registry
            .create_creator(new_creator("Maya Chen", "maya@example.com", 90))
            .await
            .unwrap();

        let err = registry
            .create_creator(new_creator("Other", "MAYA@example.com", 90))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Conflict(_)));
        assert!(err.to_string().contains("already exists"));
        assert_eq!(registry.list_creators().await.len(), 1);
    }

    #[tokio::test]
    async fn test_create_creator_validates_input() {
        let (registry, _) = registry();

        let err = registry
            .create_creator(new_creator("Maya", "not-an-email", 90))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid email format"));

        let err = registry
            .create_creator(new_creator("  ", "maya@example.com", 90))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Validation(_)));

        let mut backwards = new_creator("Maya", "maya@example.com", 90);
        backwards.valid_from = backwards.valid_through;
        assert!(registry.create_creator(backwards).await.is_err());

        assert!(registry.list_creators().await.is_empty());
    }

    #[tokio::test]
    async fn test_profile_update_rederives_status() {
        let (registry, _) = registry();
        let creator = registry
            .create_creator(new_creator("Maya Chen", "maya@example.com", 90))
            .await
            .unwrap();

        let updated = registry
            .update_creator_profile(
                &creator.id,
                CreatorUpdate {
                    valid_through: Some(fixed_now().date_naive() + Duration::days(5)),
                    notes: Some("Renewal pending".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.rights_status, RightsStatus::ExpiringSoon);
        assert_eq!(updated.risk_level, RiskLevel::Medium);
        assert_eq!(updated.notes.as_deref(), Some("Renewal pending"));
        assert_eq!(updated.creator_rights_id, creator.creator_rights_id);
    }

    #[tokio::test]
    async fn test_profile_update_keeps_state_on_error() {
        let (registry, _) = registry();
        let maya = registry
            .create_creator(new_creator("Maya Chen", "maya@example.com", 90))
            .await
            .unwrap();
        registry
            .create_creator(new_creator("Leo Park", "leo@example.com", 90))
            .await
            .unwrap();

        let err = registry
            .update_creator_profile(
                &maya.id,
                CreatorUpdate {
                    full_name: Some("Maya C.".into()),
                    email: Some("leo@example.com".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Conflict(_)));

        let err = registry
            .update_creator_profile(
                &maya.id,
                CreatorUpdate {
                    valid_from: Some(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Validation(_)));

        assert_eq!(registry.get_creator(&maya.id).await.unwrap(), maya);
    }

    #[tokio::test]
    async fn test_update_unknown_creator() {
        let (registry, _) = registry();
        let err = registry
            .update_creator_profile(
                "missing",
                CreatorUpdate {
                    notes: Some("x".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));

        let err = registry
            .update_creator_profile("missing", CreatorUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Validation(_)));
    }

    #[tokio::test]
    async fn test_attachments_and_verification() {
        let (registry, clock) = registry();
        let creator = registry
            .create_creator(new_creator("Maya Chen", "maya@example.com", 90))
            .await
            .unwrap();

        let with_file = registry
            .add_reference_material(&creator.id, "headshot.png", "https://files/headshot.png", None)
            .await
            .unwrap();
        assert_eq!(with_file.reference_materials.len(), 1);
        let material_id = with_file.reference_materials[0].id.clone();

        let signed = registry
            .set_rights_agreement(&creator.id, "https://files/agreement.pdf", "agreement.pdf")
            .await
            .unwrap();
        assert_eq!(signed.rights_agreement_file_name.as_deref(), Some("agreement.pdf"));

        clock.advance(Duration::hours(2));
        let verified = registry.mark_verified(&creator.id).await.unwrap();
        assert_eq!(verified.last_verified, Some(fixed_now() + Duration::hours(2)));

        let cleared = registry
            .remove_reference_material(&creator.id, &material_id)
            .await
            .unwrap();
        assert!(cleared.reference_materials.is_empty());

        let err = registry
            .remove_reference_material(&creator.id, &material_id)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_lookup_by_email_is_case_insensitive() {
        let (registry, _) = registry();
        let creator = registry
            .create_creator(new_creator("Maya Chen", "maya@example.com", 90))
            .await
            .unwrap();

        let found = registry.get_creator_by_email("MAYA@EXAMPLE.COM").await.unwrap();
        assert_eq!(found.id, creator.id);
        assert!(registry.get_creator_by_email("nobody@example.com").await.is_none());
    }

    #[tokio::test]
    async fn test_create_creator_rejects_invited_email() {
        let (registry, clock) = registry();
        let invitation = registry
            .invite_creator(InviteCreatorForm::new("bob@example.com", "Bob Ade"))
            .await
            .unwrap();

        let err = registry
            .create_creator(new_creator("Bob Ade", "Bob@example.com", 90))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Conflict(ref m) if m.contains("pending invitation")));
        assert_eq!(registry.creator_count().await, 0);

        // The invitation is still usable
        let profile = CreatorProfile {
            creator_type: None,
            valid_from: fixed_now().date_naive(),
            valid_through: fixed_now().date_naive() + Duration::days(90),
            contact_information: None,
            notes: None,
        };
        registry.accept_invitation(&invitation.token, profile).await.unwrap();

        // A lapsed invitation no longer reserves its email
        registry
            .invite_creator(InviteCreatorForm::new("eve@example.com", "Eve"))
            .await
            .unwrap();
        clock.advance(Duration::days(8));
        registry
            .create_creator(new_creator("Eve", "eve@example.com", 90))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_rejects_invited_email() {
        let (registry, _) = registry();
        let maya = registry
            .create_creator(new_creator("Maya Chen", "maya@example.com", 90))
            .await
            .unwrap();
        registry
            .invite_creator(InviteCreatorForm::new("bob@example.com", "Bob Ade"))
            .await
            .unwrap();

        let update = CreatorUpdate {
            email: Some("bob@example.com".to_string()),
            ..Default::default()
        };
        let err = registry
            .update_creator_profile(&maya.id, update)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Conflict(ref m) if m.contains("pending invitation")));
        assert_eq!(
            registry.get_creator(&maya.id).await.unwrap().email,
            "maya@example.com"
        );

        // Keeping the current email is unaffected
        let update = CreatorUpdate {
            email: Some("MAYA@example.com".to_string()),
            notes: Some("renewal pending".to_string()),
            ..Default::default()
        };
        registry.update_creator_profile(&maya.id, update).await.unwrap();
    }
}
