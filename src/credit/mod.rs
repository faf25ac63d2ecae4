/// Creator credits
///
/// A credit attributes a creator to exactly one asset or one project.
/// Asset and project ids are opaque references into an external catalog.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a credit points at
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CreditTarget {
    Asset {
        #[serde(rename = "assetId")]
        asset_id: String,
    },
    Project {
        #[serde(rename = "projectId")]
        project_id: String,
    },
}

impl CreditTarget {
    pub fn asset(asset_id: impl Into<String>) -> Self {
        CreditTarget::Asset {
            asset_id: asset_id.into(),
        }
    }

    pub fn project(project_id: impl Into<String>) -> Self {
        CreditTarget::Project {
            project_id: project_id.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CreditTarget::Asset { .. } => "asset",
            CreditTarget::Project { .. } => "project",
        }
    }

    pub fn id(&self) -> &str {
        match self {
            CreditTarget::Asset { asset_id } => asset_id,
            CreditTarget::Project { project_id } => project_id,
        }
    }

    pub fn asset_id(&self) -> Option<&str> {
        match self {
            CreditTarget::Asset { asset_id } => Some(asset_id),
            CreditTarget::Project { .. } => None,
        }
    }

    pub fn project_id(&self) -> Option<&str> {
        match self {
            CreditTarget::Project { project_id } => Some(project_id),
            CreditTarget::Asset { .. } => None,
        }
    }
}

impl fmt::Display for CreditTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.id())
    }
}

/// Credit record linking a creator to an asset or project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorCredit {
    pub id: String,
    pub creator_id: String,
    #[serde(flatten)]
    pub target: CreditTarget,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub credited_at: DateTime<Utc>,
    pub credited_by: String,
}

impl CreatorCredit {
    pub fn matches(&self, creator_id: &str, target: &CreditTarget) -> bool {
        self.creator_id == creator_id && &self.target == target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_target_accessors() {
        let asset = CreditTarget::asset("A1");
        assert_eq!(asset.kind(), "asset");
        assert_eq!(asset.asset_id(), Some("A1"));
        assert_eq!(asset.project_id(), None);
        assert_eq!(asset.to_string(), "asset A1");

        let project = CreditTarget::project("P9");
        assert_eq!(project.project_id(), Some("P9"));
        assert_eq!(project.asset_id(), None);
    }

    #[test]
    fn test_same_id_different_kind_is_distinct() {
        assert_ne!(CreditTarget::asset("X"), CreditTarget::project("X"));
    }

    #[test]
    fn test_credit_serializes_tagged() {
        let credit = CreatorCredit {
            id: "cr-1".into(),
            creator_id: "c-1".into(),
            target: CreditTarget::asset("A1"),
            role: Some("Voice Actor".into()),
            credited_at: Utc.with_ymd_and_hms(2026, 2, 2, 0, 0, 0).unwrap(),
            credited_by: "admin".into(),
        };

        let json = serde_json::to_value(&credit).unwrap();
        assert_eq!(json["kind"], "asset");
        assert_eq!(json["assetId"], "A1");
        assert_eq!(json["creatorId"], "c-1");
        assert!(json.get("projectId").is_none());

        let back: CreatorCredit = serde_json::from_value(json).unwrap();
        assert_eq!(back, credit);
    }
}
