/*
 * Responsibility
 * - CredentialStore の Postgres 実装 (users テーブルを引く)
 */
use async_trait::async_trait;
use sqlx::PgPool;

use crate::api::v1::extractors::Role;
use crate::repos::error::RepoError;
use crate::repos::user_repo;
use crate::services::auth::store::{CredentialStore, StoredCredential};

pub struct PgCredentialStore {
    db: PgPool,
}

impl PgCredentialStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn resolve(&self, identity: &str) -> Result<Option<StoredCredential>, RepoError> {
        let Some(user) = user_repo::find_by_email(&self.db, identity).await? else {
            return Ok(None);
        };

        let role: Role = user
            .role
            .parse()
            .map_err(|_| RepoError::Corrupt("users.role"))?;

        Ok(Some(StoredCredential {
            password_hash: user.password_hash,
            role,
        }))
    }
}
