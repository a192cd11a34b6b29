/*
 * Responsibility
 * - 認証が依存する credential store の契約
 * - 実装は repos 側 (Postgres) とテスト用インメモリの 2 系統
 */
use async_trait::async_trait;

use crate::api::v1::extractors::Role;
use crate::repos::error::RepoError;

/// What the store knows about one identity.
#[derive(Debug, Clone)]
pub struct StoredCredential {
    pub password_hash: String,
    pub role: Role,
}

/// Resolves a login identity (email) to its stored credential.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn resolve(&self, identity: &str) -> Result<Option<StoredCredential>, RepoError>;
}
