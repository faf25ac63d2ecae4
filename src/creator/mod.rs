/// Creator records
///
/// A creator is a real person, character or brand mascot whose likeness
/// usage is tracked against a rights window (`valid_from`..`valid_through`).
use crate::{
    error::{RegistryError, RegistryResult},
    rights::{calculate_creator_risk_level, calculate_rights_status, RightsStatus, RiskLevel},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Kind of creator whose rights are tracked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreatorType {
    #[default]
    #[serde(rename = "Real Person")]
    RealPerson,
    Character,
    #[serde(rename = "Brand Mascot")]
    BrandMascot,
}

impl CreatorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreatorType::RealPerson => "Real Person",
            CreatorType::Character => "Character",
            CreatorType::BrandMascot => "Brand Mascot",
        }
    }

    pub fn from_str(s: &str) -> RegistryResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "real person" | "real_person" | "person" => Ok(CreatorType::RealPerson),
            "character" => Ok(CreatorType::Character),
            "brand mascot" | "brand_mascot" | "mascot" => Ok(CreatorType::BrandMascot),
            _ => Err(RegistryError::Validation(format!("Invalid creator type: {}", s))),
        }
    }
}

/// How the creator record came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegistrationSource {
    Invited,
    SelfRegistered,
}

/// Supporting file attached to a creator (photo release, voice sample, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceMaterial {
    pub id: String,
    pub file_name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

/// Registered creator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    pub id: String,
    pub creator_rights_id: String,
    pub full_name: String,
    pub email: String,
    pub creator_type: CreatorType,
    pub registration_source: RegistrationSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_information: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub valid_from: NaiveDate,
    pub valid_through: NaiveDate,
    pub rights_status: RightsStatus,
    pub risk_level: RiskLevel,
    pub linked_assets_count: u32,
    pub linked_projects_count: u32,
    pub reference_materials: Vec<ReferenceMaterial>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rights_agreement_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rights_agreement_file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_verified: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Creator {
    /// Recompute `rights_status` and `risk_level` from `valid_through`.
    /// Returns true if either field changed.
    pub fn refresh_status(&mut self, now: DateTime<Utc>) -> bool {
        let status = calculate_rights_status(self.valid_through, now);
        let risk = calculate_creator_risk_level(self.valid_through, now);
        let changed = status != self.rights_status || risk != self.risk_level;
        self.rights_status = status;
        self.risk_level = risk;
        changed
    }

    /// Status as of `now`, without touching the stored field
    pub fn status_at(&self, now: DateTime<Utc>) -> RightsStatus {
        calculate_rights_status(self.valid_through, now)
    }
}

/// Admin-direct creator creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCreator {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub creator_type: CreatorType,
    pub valid_from: NaiveDate,
    pub valid_through: NaiveDate,
    #[serde(default)]
    pub contact_information: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Details an invitee supplies when accepting an invitation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorProfile {
    #[serde(default)]
    pub creator_type: Option<CreatorType>,
    pub valid_from: NaiveDate,
    pub valid_through: NaiveDate,
    #[serde(default)]
    pub contact_information: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial profile edit; `None` leaves a field untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub creator_type: Option<CreatorType>,
    pub contact_information: Option<String>,
    pub notes: Option<String>,
    pub valid_from: Option<NaiveDate>,
    pub valid_through: Option<NaiveDate>,
    pub avatar_url: Option<String>,
}

impl CreatorUpdate {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.email.is_none()
            && self.creator_type.is_none()
            && self.contact_information.is_none()
            && self.notes.is_none()
            && self.valid_from.is_none()
            && self.valid_through.is_none()
            && self.avatar_url.is_none()
    }
}

/// Rights window invariant: `valid_from` strictly before `valid_through`
pub fn validate_rights_window(valid_from: NaiveDate, valid_through: NaiveDate) -> RegistryResult<()> {
    if valid_from >= valid_through {
        return Err(RegistryError::Validation(format!(
            "Rights window must start before it ends ({} is not before {})",
            valid_from, valid_through
        )));
    }
    Ok(())
}

/// Human-facing registry code, e.g. `CR-2026-00042`
pub fn format_creator_rights_id(year: i32, sequence: u64) -> String {
    format!("CR-{}-{:05}", year, sequence)
}
