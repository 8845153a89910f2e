use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::waitlistmodel::WaitlistEntry;

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct JoinWaitlistDto {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    /// Referrer's farcaster_id, carried over from the landing page's `?ref=`
    /// query parameter. Absent or empty means an organic signup.
    #[serde(rename = "referralSource")]
    pub referral_source: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterEntryDto {
    pub id: String,
    pub email: String,
    pub fid: String,
    pub username: String,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    #[serde(rename = "referralSource")]
    pub referral_source: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl FilterEntryDto {
    pub fn filter_entry(entry: &WaitlistEntry) -> Self {
        FilterEntryDto {
            id: entry.id.to_string(),
            email: entry.email.to_owned(),
            fid: entry.farcaster_id.to_owned(),
            username: entry.farcaster_username.to_owned(),
            display_name: entry.farcaster_display_name.clone(),
            referral_source: entry.referral_source.clone(),
            created_at: entry.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EntryData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<FilterEntryDto>,

    #[serde(rename = "referralCount", skip_serializing_if = "Option::is_none")]
    pub referral_count: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JoinWaitlistResponseDto {
    pub status: String,
    pub message: String,
    pub data: EntryData,
}

/// Derived per read; never stored. Points are a fixed multiple of the
/// referral count.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub fid: String,
    pub username: String,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    #[serde(rename = "referralCount")]
    pub referral_count: i64,
    pub points: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeaderboardResponseDto {
    pub status: String,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub results: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReferralCountResponseDto {
    pub status: String,
    pub fid: String,
    #[serde(rename = "referralCount")]
    pub referral_count: i64,
    pub points: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReferralLinkResponseDto {
    pub status: String,
    #[serde(rename = "referralLink")]
    pub referral_link: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WaitlistCountResponseDto {
    pub status: String,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_waitlist_requires_a_valid_email() {
        let dto = JoinWaitlistDto {
            email: "not-an-email".to_string(),
            referral_source: None,
        };
        assert!(dto.validate().is_err());

        let dto = JoinWaitlistDto {
            email: "a@x.com".to_string(),
            referral_source: Some("1".to_string()),
        };
        assert!(dto.validate().is_ok());
    }
}
