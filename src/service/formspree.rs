use reqwest::StatusCode;
use serde::Serialize;

use crate::models::identitymodel::FarcasterIdentity;
use crate::service::error::ServiceError;

/// Form-backend variant of the waitlist store. Submissions are plain form
/// posts; the service keeps the inbox, we keep no rows and can offer no
/// dedup beyond what it does itself.
#[derive(Debug, Clone)]
pub struct FormspreeClient {
    http: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Serialize)]
struct FormFields<'a> {
    email: &'a str,
    farcaster_id: &'a str,
    farcaster_username: &'a str,
    farcaster_display_name: Option<&'a str>,
    referral_source: Option<&'a str>,
}

impl FormspreeClient {
    pub fn new(endpoint: String) -> Self {
        FormspreeClient {
            http: reqwest::Client::new(),
            endpoint,
        }
    }

    pub async fn submit_entry(
        &self,
        email: &str,
        identity: &FarcasterIdentity,
        referral_source: Option<&str>,
    ) -> Result<(), ServiceError> {
        let fields = FormFields {
            email,
            farcaster_id: &identity.fid,
            farcaster_username: &identity.username,
            farcaster_display_name: identity.display_name.as_deref(),
            referral_source,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .form(&fields)
            .send()
            .await
            .map_err(|err| ServiceError::Unknown(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Err(ServiceError::PermissionDenied)
        } else {
            Err(ServiceError::Unknown(format!(
                "form backend returned {}",
                status
            )))
        }
    }
}
