//! bcrypt hashing, run off the async executor

use bcrypt::{hash, verify, DEFAULT_COST};
use tokio::task;

use super::AuthError;

/// Hash a plaintext password with the default bcrypt cost
pub async fn hash_password(password: String) -> Result<String, AuthError> {
    task::spawn_blocking(move || hash(password, DEFAULT_COST))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Check a plaintext password against a stored bcrypt hash
///
/// A malformed stored hash counts as a mismatch.
pub async fn verify_password(password: String, password_hash: String) -> Result<bool, AuthError> {
    let outcome = task::spawn_blocking(move || verify(password, &password_hash))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?;

    match outcome {
        Ok(matches) => Ok(matches),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash could not be parsed");
            Ok(false)
        }
    }
}
