//! JWT service for token issuance and verification
//!
//! Tokens are compact JWS strings signed with HS256 and carry the claims
//! `sub` (username), `id` (numeric user id) and `exp` (seconds since the Unix
//! epoch). They are not persisted anywhere and there is no revocation: a token
//! stays valid until `exp`, whatever happens to the account in the meantime.

use chrono::Duration;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Deserializer, Serialize, de};
use std::{collections::HashSet, sync::Arc};
use tracing::debug;

use crate::{
    clock::{Clock, SystemClock},
    config::JwtConfig,
    error::{AuthError, AuthResult},
    models::Identity,
};

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Username
    pub sub: String,
    /// User ID
    pub id: i64,
    /// Expiration time. Fractional NumericDate values from other issuers are
    /// floored on the way in.
    #[serde(deserialize_with = "numeric_date")]
    pub exp: i64,
}

fn numeric_date<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumericDate {
        Seconds(i64),
        Fractional(f64),
    }

    match NumericDate::deserialize(deserializer)? {
        NumericDate::Seconds(secs) => Ok(secs),
        NumericDate::Fractional(secs)
            if secs.is_finite() && secs >= i64::MIN as f64 && secs < i64::MAX as f64 =>
        {
            Ok(secs.floor() as i64)
        }
        NumericDate::Fractional(secs) => Err(de::Error::custom(format!(
            "exp {} is not a representable timestamp",
            secs
        ))),
    }
}

/// Token issuer and verifier
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    /// Initialize a token service backed by the wall clock
    pub fn new(config: &JwtConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &JwtConfig, clock: Arc<dyn Clock>) -> Self {
        // Expiry is checked against the injected clock in `verify`, so the
        // library only checks the signature and algorithm.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims = HashSet::new();

        Self {
            encoding_key: EncodingKey::from_secret(&config.secret),
            decoding_key: DecodingKey::from_secret(&config.secret),
            validation,
            default_ttl: config.access_token_expiry,
            clock,
        }
    }

    /// Issue a signed token for an authenticated user.
    ///
    /// `ttl` defaults to the configured access token expiry. A negative `ttl`
    /// yields a token that is already expired.
    pub fn issue(&self, username: &str, user_id: i64, ttl: Option<Duration>) -> AuthResult<String> {
        let expires_at = self
            .clock
            .now()
            .checked_add_signed(ttl.unwrap_or(self.default_ttl))
            .ok_or(AuthError::ExpiryOutOfRange)?;

        let claims = Claims {
            sub: username.to_string(),
            id: user_id,
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(AuthError::Encoding)
    }

    /// Verify a token and return the identity it was issued for
    pub fn verify(&self, token: &str) -> AuthResult<Identity> {
        let claims = self.decode_claims(token)?;

        if claims.exp <= self.clock.now().timestamp() {
            debug!("Rejecting expired token for user {}", claims.sub);
            return Err(AuthError::Expired);
        }

        Ok(Identity {
            username: claims.sub,
            user_id: claims.id,
        })
    }

    fn decode_claims(&self, token: &str) -> AuthResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::Json(_) | ErrorKind::Utf8(_) => AuthError::MalformedClaims,
                _ => AuthError::InvalidSignature,
            })
    }

    /// Get the default token expiry
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }
}
