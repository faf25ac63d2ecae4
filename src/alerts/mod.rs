/// Creator rights alerts
///
/// Alerts are computed on demand and never stored; ids are stable per
/// creator and alert kind so consumers can de-duplicate across sweeps.
use crate::{
    creator::Creator,
    rights::{days_until_expiration, plural_days, EXPIRING_SOON_WINDOW_DAYS},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const ALERT_CATEGORY: &str = "creator-rights";

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AlertSeverity {
    Urgent,
    Critical,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Urgent => "Urgent",
            AlertSeverity::Critical => "Critical",
        }
    }
}

/// Alert about a creator's lapsed or lapsing rights
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RightsAlert {
    pub id: String,
    pub title: String,
    pub description: String,
    pub severity: AlertSeverity,
    pub category: String,
    pub creator_id: String,
    pub due_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub resolved: bool,
}

/// Build the alert for one creator, if its rights warrant one
pub fn alert_for(creator: &Creator, now: DateTime<Utc>) -> Option<RightsAlert> {
    let days = days_until_expiration(creator.valid_through, now);

    let (kind, severity, title, description) = if days <= 0 {
        let overdue = -days;
        let when = if overdue == 0 {
            format!("today ({} overdue)", plural_days(0))
        } else {
            format!("{} ago", plural_days(overdue))
        };
        (
            "expired",
            AlertSeverity::Critical,
            format!("Rights expired: {}", creator.full_name),
            format!(
                "Rights for {} ({}) expired {}. Usage must stop until the agreement is renewed.",
                creator.full_name, creator.creator_rights_id, when
            ),
        )
    } else if days <= EXPIRING_SOON_WINDOW_DAYS {
        (
            "expiring",
            AlertSeverity::Urgent,
            format!("Rights expiring: {}", creator.full_name),
            format!(
                "Rights for {} ({}) expire in {}.",
                creator.full_name,
                creator.creator_rights_id,
                plural_days(days)
            ),
        )
    } else {
        return None;
    };

    Some(RightsAlert {
        id: format!("{}-{}-{}", ALERT_CATEGORY, kind, creator.id),
        title,
        description,
        severity,
        category: ALERT_CATEGORY.to_string(),
        creator_id: creator.id.clone(),
        due_date: creator.valid_through,
        created_at: now,
        resolved: false,
    })
}

/// Alerts for every creator whose rights have lapsed or lapse within the window
pub fn generate_alerts<'a, I>(creators: I, now: DateTime<Utc>) -> Vec<RightsAlert>
where
    I: IntoIterator<Item = &'a Creator>,
{
    creators
        .into_iter()
        .filter_map(|creator| alert_for(creator, now))
        .collect()
}
