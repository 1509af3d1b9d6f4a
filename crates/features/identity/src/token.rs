use crate::error::{IdentityError, IdentityErrorExt};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use thesis_kernel::domain::config::JwtConfig;
use thesis_kernel::prelude::Role;
use thesis_kernel::timeline;

/// Bearer token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User key.
    pub sub: String,
    pub role: Role,
    pub iss: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies HS256 tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: Option<String>,
    ttl_seconds: i64,
    leeway_seconds: u64,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Result<Self, IdentityError> {
        if config.secret.trim().is_empty() {
            return Err(IdentityError::Config {
                message: "JWT secret must not be empty".into(),
                context: Some("security.jwt.secret".into()),
            });
        }
        let ttl_seconds = i64::try_from(config.ttl_seconds).map_err(|_| IdentityError::Config {
            message: "JWT ttl is out of range".into(),
            context: Some("security.jwt.ttl_seconds".into()),
        })?;

        Ok(Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            ttl_seconds,
            leeway_seconds: config.clock_skew_seconds,
        })
    }

    /// Signs a token for `user_id` valid for the configured ttl.
    pub fn issue(&self, user_id: &str, role: Role) -> Result<String, IdentityError> {
        let iat = timeline::now().timestamp();
        let claims = Claims {
            sub: user_id.to_owned(),
            role,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat,
            exp: iat + self.ttl_seconds,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .context("Encoding bearer token")
    }

    /// Checks signature, issuer, audience (when configured) and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, IdentityError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.leeway = self.leeway_seconds;
        match &self.audience {
            Some(audience) => {
                validation.set_audience(&[audience]);
                validation.set_required_spec_claims(&["exp", "iss", "aud"]);
            },
            None => validation.validate_aud = false,
        }

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .context("Verifying bearer token")
    }
}
