//! HS256 bearer credentials.
//!
//! Verification is a pure function of the token, the secret and the clock.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use wayfare_application::{CredentialIssuer, CredentialVerifier, IssuedCredential, SubjectClaim};
use wayfare_core::{AppError, AppResult, AuthFailure};
use wayfare_domain::{User, UserId};

/// Minimum accepted signing secret length in bytes.
pub const MIN_SECRET_LENGTH: usize = 32;

/// Longest accepted credential lifetime in minutes.
pub const MAX_TTL_MINUTES: i64 = 365 * 24 * 60;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
    iss: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
}

/// Signs and verifies HS256 JWT bearer credentials.
#[derive(Clone)]
pub struct JwtCredentialService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl: Duration,
}

impl JwtCredentialService {
    /// Creates a service for the shared secret.
    ///
    /// Rejects secrets shorter than [`MIN_SECRET_LENGTH`] bytes and
    /// lifetimes outside `(0, MAX_TTL_MINUTES]`.
    pub fn new(secret: &str, issuer: impl Into<String>, ttl: Duration) -> AppResult<Self> {
        if secret.len() < MIN_SECRET_LENGTH {
            return Err(AppError::Validation(format!(
                "JWT secret must be at least {MIN_SECRET_LENGTH} bytes"
            )));
        }

        if ttl <= Duration::zero() {
            return Err(AppError::Validation(
                "credential lifetime must be positive".to_owned(),
            ));
        }

        if ttl > Duration::minutes(MAX_TTL_MINUTES) {
            return Err(AppError::Validation(format!(
                "credential lifetime must be at most {MAX_TTL_MINUTES} minutes"
            )));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.into(),
            ttl,
        })
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iat", "iss", "sub"]);
        validation.leeway = 0;
        validation
    }

    fn sign(&self, claims: &Claims) -> AppResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|error| AppError::Internal(format!("failed to sign credential: {error}")))
    }
}

fn timestamp(value: i64) -> Result<DateTime<Utc>, AuthFailure> {
    DateTime::<Utc>::from_timestamp(value, 0).ok_or(AuthFailure::InvalidCredential)
}

impl CredentialVerifier for JwtCredentialService {
    fn verify(&self, credential: &str) -> Result<SubjectClaim, AuthFailure> {
        let data = decode::<Claims>(credential, &self.decoding_key, &self.validation())
            .map_err(|_| AuthFailure::InvalidCredential)?;
        let claims = data.claims;

        let subject = claims
            .sub
            .parse::<UserId>()
            .map_err(|_| AuthFailure::InvalidCredential)?;

        Ok(SubjectClaim {
            subject,
            issued_at: timestamp(claims.iat)?,
            expires_at: timestamp(claims.exp)?,
            advisory_role: claims.role,
        })
    }
}

impl CredentialIssuer for JwtCredentialService {
    fn issue(&self, user: &User) -> AppResult<IssuedCredential> {
        let issued_at = Utc::now();
        let expires_at = issued_at.checked_add_signed(self.ttl).ok_or_else(|| {
            AppError::Internal("credential expiry is out of range".to_owned())
        })?;
        let role = Some(user.primary_role().to_owned()).filter(|role| !role.is_empty());

        let token = self.sign(&Claims {
            sub: user.id().to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.issuer.clone(),
            role,
        })?;

        Ok(IssuedCredential { token, expires_at })
    }
}
