use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row per signup. Rows are written once and never updated or deleted;
/// display attributes are denormalized at signup time and not re-synced.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone, PartialEq)]
pub struct WaitlistEntry {
    pub id: uuid::Uuid,
    pub email: String,
    pub farcaster_id: String,
    pub farcaster_username: String,
    pub farcaster_display_name: Option<String>,
    /// farcaster_id of the entry that caused this signup; NULL for organic
    /// signups. Not a foreign key: a referral link can be followed before
    /// the referrer's own signup is visible.
    pub referral_source: Option<String>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}
