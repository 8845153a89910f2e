use serde::{Deserialize, Serialize};
use validator::Validate;

/// Identity attributes forwarded by the sign-in relay once the Farcaster
/// handshake has succeeded.
#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreateSessionDto {
    #[validate(length(min = 1, message = "Farcaster id is required"))]
    pub fid: String,

    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponseDto {
    pub status: String,
    pub token: String,
}
