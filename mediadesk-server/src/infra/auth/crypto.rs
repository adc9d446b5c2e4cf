use argon2::{
    Algorithm, Argon2, Params, ParamsBuilder, Version,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, Salt,
        SaltString,
    },
};
use rand::{TryRngCore, rngs::OsRng};
use thiserror::Error;

/// Argon2id hashing for the configured admin logins.
///
/// Hashes are self-describing PHC strings, so verification uses whatever
/// parameters the stored hash was created with; the parameters held here only
/// matter for [`hash_password`](Self::hash_password).
#[derive(Debug)]
pub struct PasswordCrypto {
    argon2: Argon2<'static>,
}

#[derive(Debug, Error)]
pub enum PasswordCryptoError {
    #[error("invalid Argon2 parameters: {0}")]
    InvalidArgon2Params(String),
    #[error("password hashing error: {0}")]
    PasswordHash(String),
}

impl From<PasswordHashError> for PasswordCryptoError {
    fn from(err: PasswordHashError) -> Self {
        PasswordCryptoError::PasswordHash(err.to_string())
    }
}

impl PasswordCrypto {
    const DEFAULT_MEMORY_KIB: u32 = 64 * 1024;
    const DEFAULT_ITERATIONS: u32 = 3;
    const DEFAULT_PARALLELISM: u32 = 1;
    const SALT_LENGTH: usize = Salt::RECOMMENDED_LENGTH;

    pub fn new() -> Result<Self, PasswordCryptoError> {
        Self::with_params(
            ParamsBuilder::new()
                .m_cost(Self::DEFAULT_MEMORY_KIB)
                .t_cost(Self::DEFAULT_ITERATIONS)
                .p_cost(Self::DEFAULT_PARALLELISM)
                .output_len(32)
                .build()
                .map_err(|err| PasswordCryptoError::InvalidArgon2Params(err.to_string()))?,
        )
    }

    /// Caller-chosen parameters, e.g. cheap ones in tests.
    pub fn with_params(params: Params) -> Result<Self, PasswordCryptoError> {
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::default(), params),
        })
    }

    pub fn hash_password(&self, password: &str) -> Result<String, PasswordCryptoError> {
        let mut salt_bytes = [0u8; Self::SALT_LENGTH];
        OsRng
            .try_fill_bytes(&mut salt_bytes)
            .map_err(|err| PasswordCryptoError::PasswordHash(err.to_string()))?;
        let salt = SaltString::encode_b64(&salt_bytes)?;
        Ok(self
            .argon2
            .hash_password(password.as_bytes(), &salt)?
            .to_string())
    }

    /// `Ok(false)` for a wrong password, `Err` for an unparsable hash.
    pub fn verify_password(
        &self,
        password: &str,
        password_hash: &str,
    ) -> Result<bool, PasswordCryptoError> {
        let parsed = PasswordHash::new(password_hash)?;
        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
pub(crate) fn test_crypto() -> PasswordCrypto {
    let params = ParamsBuilder::new()
        .m_cost(Params::MIN_M_COST.max(8))
        .t_cost(1)
        .p_cost(1)
        .build()
        .unwrap();
    PasswordCrypto::with_params(params).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_and_verifies() {
        let crypto = test_crypto();
        let hash = crypto.hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(crypto.verify_password("correct horse", &hash).unwrap());
        assert!(!crypto.verify_password("battery staple", &hash).unwrap());
    }

    #[test]
    fn garbage_hash_is_an_error() {
        let crypto = test_crypto();
        assert!(crypto.verify_password("x", "not-a-phc-string").is_err());
    }
}
