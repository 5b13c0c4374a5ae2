use crate::core::error::{AppError, Result};

/// Lowest and highest work factors bcrypt accepts
const MIN_COST: u32 = 4;
const MAX_COST: u32 = 31;

/// bcrypt password hashing. Work runs on the blocking pool so logins never
/// stall the async workers.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(MIN_COST, MAX_COST),
        }
    }

    pub async fn hash(&self, password: &str) -> Result<String> {
        let password = password.to_string();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    /// Check `password` against a stored hash. Malformed hashes never match.
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let password = password.to_string();
        let hash = hash.to_string();

        let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?;

        match outcome {
            Ok(matched) => Ok(matched),
            Err(e) => {
                tracing::warn!("Stored password hash is unusable: {}", e);
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_then_verify() {
        let hasher = PasswordHasher::new(MIN_COST);
        let stored = hasher.hash("secret1").await.unwrap();

        assert!(stored.starts_with("$2"));
        assert!(hasher.verify("secret1", &stored).await.unwrap());
        assert!(!hasher.verify("secret2", &stored).await.unwrap());
    }

    #[tokio::test]
    async fn test_salts_differ() {
        let hasher = PasswordHasher::new(MIN_COST);
        assert_ne!(
            hasher.hash("same").await.unwrap(),
            hasher.hash("same").await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_verify_uses_stored_cost() {
        let stored = PasswordHasher::new(MIN_COST).hash("secret1").await.unwrap();
        assert!(PasswordHasher::new(6).verify("secret1", &stored).await.unwrap());
    }

    #[test]
    fn test_cost_is_clamped() {
        assert_eq!(PasswordHasher::new(0).cost, MIN_COST);
        assert_eq!(PasswordHasher::new(99).cost, MAX_COST);
    }

    #[tokio::test]
    async fn test_malformed_hashes_never_match() {
        let hasher = PasswordHasher::new(MIN_COST);
        for stored in ["", "secret1", "$2b$04$short", "pbkdf2_sha256$10$00$00"] {
            assert!(
                !hasher.verify("secret1", stored).await.unwrap(),
                "{} should not match",
                stored
            );
        }
    }
}
