/// Rights status derivation
///
/// Pure functions of a creator's `valid_through` date and the current time.
/// Everything here works at day granularity: a right that ends today is
/// already treated as expired.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

/// Rights inside this many days of `valid_through` are "Expiring Soon"
pub const EXPIRING_SOON_WINDOW_DAYS: i64 = 30;

/// Derived authorization state of a creator's rights window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RightsStatus {
    Authorized,
    #[serde(rename = "Expiring Soon")]
    ExpiringSoon,
    Expired,
}

impl RightsStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RightsStatus::Authorized => "Authorized",
            RightsStatus::ExpiringSoon => "Expiring Soon",
            RightsStatus::Expired => "Expired",
        }
    }

    pub const ALL: [RightsStatus; 3] = [
        RightsStatus::Authorized,
        RightsStatus::ExpiringSoon,
        RightsStatus::Expired,
    ];
}

/// Risk level attached to a creator, driven by how close expiration is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

/// Whole days from today until `valid_through`; zero or negative once lapsed
pub fn days_until_expiration(valid_through: NaiveDate, now: DateTime<Utc>) -> i64 {
    (valid_through - now.date_naive()).num_days()
}

pub fn calculate_rights_status(valid_through: NaiveDate, now: DateTime<Utc>) -> RightsStatus {
    let days = days_until_expiration(valid_through, now);
    if days <= 0 {
        RightsStatus::Expired
    } else if days <= EXPIRING_SOON_WINDOW_DAYS {
        RightsStatus::ExpiringSoon
    } else {
        RightsStatus::Authorized
    }
}

pub fn calculate_creator_risk_level(valid_through: NaiveDate, now: DateTime<Utc>) -> RiskLevel {
    match calculate_rights_status(valid_through, now) {
        RightsStatus::Expired => RiskLevel::High,
        RightsStatus::ExpiringSoon => RiskLevel::Medium,
        RightsStatus::Authorized => RiskLevel::Low,
    }
}

/// Email format check used by every operation that accepts an address
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    let has_dotted_domain = email
        .rsplit_once('@')
        .map(|(_, domain)| domain.contains('.'))
        .unwrap_or(false);

    has_dotted_domain && email.validate_email()
}

/// "1 day", "10 days"
pub(crate) fn plural_days(days: i64) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", days)
    }
}
