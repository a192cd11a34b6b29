/*
 * Responsibility
 * - login entry point: (email, password) -> signed token
 * - 失敗は常に同一の InvalidCredentials (identity enumeration 対策)
 */
use tracing::warn;

use crate::error::AppError;
use crate::services::auth::password;
use crate::services::auth::store::CredentialStore;
use crate::services::auth::token::TokenCodec;

// Argon2 hash of an unguessable throwaway value. Verified against when the
// identity does not exist so both failure paths cost one hash comparison.
const DECOY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$uJv2jUMDTnEmyFrjJiHu8g$N1Cogz1tSMSOo2bliV9qxA04cFDXm7ZGdVtDdw7hAFU";

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
}

/// Authenticate a caller and mint a bearer token.
///
/// Mutates nothing. Unknown identity and wrong password return the same
/// error; the database outage case is the only distinguishable failure.
pub async fn authenticate(
    store: &dyn CredentialStore,
    tokens: &TokenCodec,
    email: &str,
    secret: &str,
) -> Result<IssuedToken, AppError> {
    let credential = store.resolve(email).await.map_err(|e| {
        warn!(error = %e, "credential store unavailable during login");
        AppError::Upstream
    })?;

    let Some(credential) = credential else {
        // Burn a comparison so a missing identity is not observably faster.
        let _ = password::verify_password(DECOY_HASH, secret);
        return Err(AppError::InvalidCredentials);
    };

    if !password::verify_password(&credential.password_hash, secret) {
        return Err(AppError::InvalidCredentials);
    }

    let access_token = tokens
        .issue(email, credential.role)
        .map_err(|_| AppError::Internal)?;

    Ok(IssuedToken {
        access_token,
        token_type: "Bearer",
        expires_in: tokens.ttl_seconds(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;
    use crate::api::v1::extractors::Role;
    use crate::repos::error::RepoError;
    use crate::services::auth::store::StoredCredential;

    struct MemoryStore(HashMap<String, StoredCredential>);

    #[async_trait]
    impl CredentialStore for MemoryStore {
        async fn resolve(&self, identity: &str) -> Result<Option<StoredCredential>, RepoError> {
            Ok(self.0.get(identity).cloned())
        }
    }

    fn store_with(email: &str, password: &str, role: Role) -> MemoryStore {
        let mut map = HashMap::new();
        map.insert(
            email.to_string(),
            StoredCredential {
                password_hash: password::hash_password(password).unwrap(),
                role,
            },
        );
        MemoryStore(map)
    }

    #[tokio::test]
    async fn login_returns_verifying_token() {
        let store = store_with("real@x.com", "secret123", Role::Owner);
        let tokens = TokenCodec::new("test-secret", 7200);

        let issued = authenticate(&store, &tokens, "real@x.com", "secret123")
            .await
            .unwrap();

        assert_eq!(issued.token_type, "Bearer");
        assert_eq!(issued.expires_in, 7200);
        let claims = tokens.verify(&issued.access_token).unwrap();
        assert_eq!(claims.sub, "real@x.com");
        assert_eq!(claims.role, Role::Owner);
    }

    #[tokio::test]
    async fn unknown_identity_and_wrong_password_are_indistinguishable() {
        let store = store_with("real@x.com", "secret123", Role::Client);
        let tokens = TokenCodec::new("test-secret", 7200);

        let unknown = authenticate(&store, &tokens, "nonexistent@x.com", "anything")
            .await
            .unwrap_err();
        let wrong = authenticate(&store, &tokens, "real@x.com", "wrongpassword")
            .await
            .unwrap_err();

        assert!(matches!(unknown, AppError::InvalidCredentials));
        assert!(matches!(wrong, AppError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }
}
