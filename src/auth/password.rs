use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::config::SecurityConfig;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("invalid hashing parameters: {0}")]
    Params(String),

    #[error("hashing failed: {0}")]
    Hash(String),

    #[error("hashing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Argon2id hashing. Work runs on the blocking pool so request tasks stay responsive.
#[derive(Debug, Clone)]
pub struct Passwords {
    params: Params,
    /// Hash checked when the account does not exist, built on first use
    absent: Arc<OnceCell<String>>,
}

impl Passwords {
    pub fn new(memory_kib: u32, iterations: u32) -> Result<Self, PasswordError> {
        let params = Params::new(memory_kib, iterations, 1, None)
            .map_err(|e| PasswordError::Params(e.to_string()))?;
        Ok(Self {
            params,
            absent: Arc::new(OnceCell::new()),
        })
    }

    pub fn from_config(config: &SecurityConfig) -> Result<Self, PasswordError> {
        Self::new(config.hash_memory_kib, config.hash_iterations)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash into a PHC string with a fresh random salt
    pub async fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let argon2 = self.argon2();
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| PasswordError::Hash(e.to_string()))
        })
        .await?
    }

    /// Check a password against a stored PHC string. The cost parameters come
    /// from the stored hash; an unparsable hash never verifies.
    pub async fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        let password = password.to_owned();
        let stored_hash = stored_hash.to_owned();

        tokio::task::spawn_blocking(move || {
            let parsed = match PasswordHash::new(&stored_hash) {
                Ok(parsed) => parsed,
                Err(_) => return false,
            };
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .await
        .map_err(PasswordError::from)
    }

    /// Verification for a username with no account. Costs the same as
    /// [`Passwords::verify`] at the configured parameters and never succeeds.
    pub async fn verify_absent(&self, password: &str) -> Result<bool, PasswordError> {
        let hash = self
            .absent
            .get_or_try_init(|| self.hash("absent-account"))
            .await?;
        self.verify(password, hash).await?;
        Ok(false)
    }

    #[cfg(test)]
    pub(crate) fn absent_hash_built(&self) -> bool {
        self.absent.initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> Passwords {
        Passwords::new(1024, 1).unwrap()
    }

    #[tokio::test]
    async fn hash_then_verify() {
        let passwords = cheap();
        let hash = passwords.hash("admin123").await.unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(passwords.verify("admin123", &hash).await.unwrap());
        assert!(!passwords.verify("admin124", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn same_password_gets_distinct_salts() {
        let passwords = cheap();
        let a = passwords.hash("secret").await.unwrap();
        let b = passwords.hash("secret").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn garbage_hash_never_verifies() {
        assert!(!cheap().verify("x", "not-a-phc-string").await.unwrap());
    }

    #[tokio::test]
    async fn absent_account_never_verifies() {
        let passwords = cheap();
        assert!(!passwords.absent_hash_built());

        assert!(!passwords.verify_absent("absent-account").await.unwrap());
        assert!(!passwords.verify_absent("anything").await.unwrap());
        assert!(passwords.absent_hash_built());
    }

    #[tokio::test]
    async fn clones_share_the_absent_hash() {
        let passwords = cheap();
        let clone = passwords.clone();
        clone.verify_absent("x").await.unwrap();
        assert!(passwords.absent_hash_built());
    }

    #[test]
    fn rejects_impossible_params() {
        assert!(matches!(Passwords::new(1, 1), Err(PasswordError::Params(_))));
    }
}
