use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::identitymodel::FarcasterIdentity;

/// Session claims carry the verified identity so request handling never has
/// to call back out to the identity provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub username: String,
    pub display_name: Option<String>,
    pub iat: usize,
    pub exp: usize,
}

pub fn create_token(
    identity: &FarcasterIdentity,
    secret: &[u8],
    expires_in_minutes: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    if identity.fid.is_empty() {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidSubject.into());
    }

    let now = Utc::now();
    let claims = TokenClaims {
        sub: identity.fid.clone(),
        username: identity.username.clone(),
        display_name: identity.display_name.clone(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::minutes(expires_in_minutes)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
}

pub fn decode_token<T: Into<String>>(
    token: T,
    secret: &[u8],
) -> Result<FarcasterIdentity, jsonwebtoken::errors::Error> {
    let decoded = decode::<TokenClaims>(
        &token.into(),
        &DecodingKey::from_secret(secret),
        &Validation::new(Algorithm::HS256),
    )?;

    Ok(FarcasterIdentity {
        fid: decoded.claims.sub,
        username: decoded.claims.username,
        display_name: decoded.claims.display_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> FarcasterIdentity {
        FarcasterIdentity {
            fid: "3621".to_string(),
            username: "horsefacts".to_string(),
            display_name: Some("horsefacts".to_string()),
        }
    }

    #[test]
    fn token_round_trip_preserves_identity() {
        let secret = b"my-secret-key";
        let token = create_token(&identity(), secret, 60).unwrap();
        let decoded = decode_token(token, secret).unwrap();

        assert_eq!(decoded, identity());
    }

    #[test]
    fn token_with_wrong_secret_is_rejected() {
        let token = create_token(&identity(), b"my-secret-key", 60).unwrap();
        let decoded = decode_token(token, b"another-secret");

        assert!(decoded.is_err());
    }

    #[test]
    fn empty_fid_is_rejected() {
        let identity = FarcasterIdentity {
            fid: "".to_string(),
            username: "nobody".to_string(),
            display_name: None,
        };

        assert!(create_token(&identity, b"my-secret-key", 60).is_err());
    }
}
