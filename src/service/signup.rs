use crate::config::Config;
use crate::db::WaitlistExt;
use crate::models::{identitymodel::FarcasterIdentity, waitlistmodel::WaitlistEntry};
use crate::service::error::ServiceError;
use crate::service::formspree::FormspreeClient;

/// Where signups land, picked once at startup. The hosted table is the
/// default; the form-backend variant trades server-side dedup away for a
/// zero-schema deployment.
#[derive(Clone)]
pub enum WaitlistBackend {
    Database,
    Formspree(FormspreeClient),
}

impl WaitlistBackend {
    pub fn from_config(config: &Config) -> Self {
        match config.waitlist_backend.as_str() {
            "formspree" => WaitlistBackend::Formspree(FormspreeClient::new(
                config.formspree_endpoint.clone(),
            )),
            _ => WaitlistBackend::Database,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignupReceipt {
    pub entry: Option<WaitlistEntry>,
    /// The signer's own referral count, looked up only for organic signups
    /// (someone joining through another's link isn't shown their own tally).
    pub referral_count: Option<i64>,
}

/// Submit a signup against the waitlist table.
///
/// The email existence check is a fast path for a friendly error; two
/// concurrent submissions can both pass it, and then the table's unique
/// constraint decides. Either way the caller sees `DuplicateEmail`.
pub async fn submit<S>(
    store: &S,
    identity: Option<&FarcasterIdentity>,
    email: &str,
    referral_source: Option<&str>,
) -> Result<SignupReceipt, ServiceError>
where
    S: WaitlistExt + Sync,
{
    let identity = identity.ok_or(ServiceError::NotAuthenticated)?;
    let referral_source = normalize_referral(identity, referral_source)?;

    if store
        .email_exists(email)
        .await
        .map_err(ServiceError::from_store_error)?
    {
        return Err(ServiceError::DuplicateEmail);
    }

    let entry = store
        .save_entry(email, identity, referral_source)
        .await
        .map_err(ServiceError::from_store_error)?;

    let referral_count = if referral_source.is_none() {
        match store.count_by_referrer(&identity.fid).await {
            Ok(count) => Some(count),
            Err(err) => {
                // The row is already in; a failed count lookup only costs
                // the success screen its tally.
                tracing::warn!("referral count lookup failed after signup: {}", err);
                None
            }
        }
    } else {
        None
    };

    Ok(SignupReceipt {
        entry: Some(entry),
        referral_count,
    })
}

/// Submit a signup through the form backend. Same preconditions as
/// [`submit`], but the service offers no existence check or insert receipt.
pub async fn submit_form(
    client: &FormspreeClient,
    identity: Option<&FarcasterIdentity>,
    email: &str,
    referral_source: Option<&str>,
) -> Result<SignupReceipt, ServiceError> {
    let identity = identity.ok_or(ServiceError::NotAuthenticated)?;
    let referral_source = normalize_referral(identity, referral_source)?;

    client.submit_entry(email, identity, referral_source).await?;

    Ok(SignupReceipt {
        entry: None,
        referral_count: None,
    })
}

// Hidden form fields arrive as empty strings; both empty and absent mean an
// organic signup. Pointing a referral at yourself is rejected outright.
fn normalize_referral<'a>(
    identity: &FarcasterIdentity,
    referral_source: Option<&'a str>,
) -> Result<Option<&'a str>, ServiceError> {
    let referral_source = referral_source.filter(|source| !source.is_empty());

    if referral_source == Some(identity.fid.as_str()) {
        return Err(ServiceError::Validation(
            "You cannot join through your own referral link".to_string(),
        ));
    }

    Ok(referral_source)
}
