use argon2::password_hash::{PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHash, Version};
use rand_core::OsRng;
use tracing::instrument;

use crate::errors::ApiError;

#[derive(Debug, Clone, Default)]
pub struct CryptoService;

impl CryptoService {
    pub fn new() -> Self {
        Self
    }

    fn argon2() -> Result<Argon2<'static>, ApiError> {
        let params = Params::new(
            32_768, // 32 MB
            3,      // iterations
            1,      // parallelism
            None,
        )
        .map_err(|e| ApiError::Crypto(format!("Failed to create Argon2 params: {e}")))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    #[instrument(skip(self, password))]
    pub fn hash_password(&self, password: &str) -> Result<String, ApiError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Self::argon2()?;

        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| ApiError::Crypto(format!("Failed to hash password: {e}")))?
            .to_string();

        Ok(hash)
    }

    #[instrument(skip(self, password, hash))]
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, ApiError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| ApiError::Crypto(format!("Invalid password hash format: {e}")))?;

        let argon2 = Self::argon2()?;

        match argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(_) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(ApiError::Crypto(format!("Password verification failed: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrip() {
        let crypto = CryptoService::new();
        let hash = crypto.hash_password("correct horse battery").unwrap();

        assert_ne!(hash, "correct horse battery");
        assert!(crypto.verify_password("correct horse battery", &hash).unwrap());
        assert!(!crypto.verify_password("wrong password", &hash).unwrap());
    }

    #[test]
    fn rejects_malformed_hash() {
        let crypto = CryptoService::new();
        assert!(crypto.verify_password("anything", "not-a-phc-string").is_err());
    }
}
