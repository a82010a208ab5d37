use argon2::{
    Algorithm, Argon2, Params, PasswordHash as EncodedHash, PasswordVerifier, Version,
    password_hash::{self, PasswordHasher as _, SaltString, rand_core},
};
use secrecy::{ExposeSecret, Secret};

use credentials_core::{HashingError, Password, PasswordHash, PasswordHasher};

/// Argon2id hashing, run on the blocking pool.
#[derive(Debug, Clone)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self {
            params: Params::new(15000, 2, 1, None).unwrap_or_default(),
        }
    }

    pub fn with_params(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, HashingError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| HashingError::Hash(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    #[tracing::instrument(name = "Computing password hash", skip_all)]
    async fn hash(&self, password: &Password) -> Result<PasswordHash, HashingError> {
        let current_span: tracing::Span = tracing::Span::current();
        let hasher = self.argon2();
        let password = password.clone();

        tokio::task::spawn_blocking(move || {
            current_span.in_scope(move || {
                let salt: SaltString = SaltString::generate(rand_core::OsRng);
                hasher
                    .hash_password(password.as_ref().expose_secret().as_bytes(), &salt)
                    .map(|h| PasswordHash::new(Secret::new(h.to_string())))
                    .map_err(|e| HashingError::Hash(e.to_string()))
            })
        })
        .await
        .map_err(|e| HashingError::Hash(e.to_string()))?
    }

    #[tracing::instrument(name = "Verify password hash", skip_all)]
    async fn verify(
        &self,
        password: &Password,
        hash: &PasswordHash,
    ) -> Result<bool, HashingError> {
        let current_span: tracing::Span = tracing::Span::current();
        let verifier = self.argon2();
        let password = password.clone();
        let hash = hash.clone();

        tokio::task::spawn_blocking(move || {
            current_span.in_scope(move || {
                let expected = EncodedHash::new(hash.as_ref().expose_secret())
                    .map_err(|e| HashingError::InvalidHash(e.to_string()))?;

                match verifier.verify_password(password.as_ref().expose_secret().as_bytes(), &expected) {
                    Ok(()) => Ok(true),
                    Err(password_hash::Error::Password) => Ok(false),
                    Err(e) => Err(HashingError::InvalidHash(e.to_string())),
                }
            })
        })
        .await
        .map_err(|e| HashingError::Hash(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn password(raw: &str) -> Password {
        Password::parse(Secret::new(raw.to_string())).unwrap()
    }

    #[tokio::test]
    async fn verifies_only_the_original_password() {
        let hasher = Argon2PasswordHasher::new();
        let hash = hasher.hash(&password("correct horse")).await.unwrap();

        assert!(hasher.verify(&password("correct horse"), &hash).await.unwrap());
        assert!(!hasher.verify(&password("battery staple"), &hash).await.unwrap());
    }

    #[tokio::test]
    async fn garbage_hash_is_an_error() {
        let hasher = Argon2PasswordHasher::new();
        let hash = PasswordHash::new(Secret::new("not-a-phc-string".to_string()));

        assert!(matches!(
            hasher.verify(&password("secret"), &hash).await,
            Err(HashingError::InvalidHash(_))
        ));
    }
}
