//! Argon2id implementation of the password hashing port.
//!
//! Defaults follow the OWASP Password Storage cheat sheet:
//! m=19456 KiB, t=2, p=1.

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};

use wayfare_application::PasswordHasher as PasswordHasherPort;
use wayfare_core::{AppError, AppResult};

const MEMORY_COST_KIB: u32 = 19_456;
const TIME_COST: u32 = 2;
const PARALLELISM: u32 = 1;

/// Argon2id password hasher producing PHC strings.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Creates a hasher with the recommended cost parameters.
    pub fn new() -> AppResult<Self> {
        Self::with_cost(MEMORY_COST_KIB, TIME_COST, PARALLELISM)
    }

    /// Creates a hasher with explicit cost parameters.
    pub fn with_cost(memory_kib: u32, iterations: u32, parallelism: u32) -> AppResult<Self> {
        let params = Params::new(memory_kib, iterations, parallelism, None).map_err(|error| {
            AppError::Internal(format!("invalid argon2 parameters: {error}"))
        })?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl PasswordHasherPort for Argon2PasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|error| AppError::Internal(format!("failed to hash password: {error}")))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        let stored = PasswordHash::new(hash).map_err(|error| {
            AppError::Internal(format!("stored password hash is invalid: {error}"))
        })?;

        match self.argon2.verify_password(password.as_bytes(), &stored) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(error) => Err(AppError::Internal(format!(
                "password verification failed: {error}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_hasher() -> Argon2PasswordHasher {
        Argon2PasswordHasher::with_cost(1024, 1, 1).unwrap_or_else(|_| panic!("test"))
    }

    #[test]
    fn recommended_parameters_are_accepted() {
        assert!(Argon2PasswordHasher::new().is_ok());
    }

    #[test]
    fn hash_is_argon2id_phc_string() -> AppResult<()> {
        let hash = cheap_hasher().hash_password("correct horse battery")?;
        assert!(hash.starts_with("$argon2id$"));
        Ok(())
    }

    #[test]
    fn matching_password_verifies() -> AppResult<()> {
        let hasher = cheap_hasher();
        let hash = hasher.hash_password("correct horse battery")?;
        assert!(hasher.verify_password("correct horse battery", &hash)?);
        Ok(())
    }

    #[test]
    fn different_password_does_not_verify() -> AppResult<()> {
        let hasher = cheap_hasher();
        let hash = hasher.hash_password("correct horse battery")?;
        assert!(!hasher.verify_password("wrong horse battery", &hash)?);
        Ok(())
    }

    #[test]
    fn malformed_stored_hash_is_internal_error() {
        let result = cheap_hasher().verify_password("anything", "plaintext");
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
