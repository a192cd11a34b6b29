/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use sqlx::PgPool;

use crate::services::auth::store::CredentialStore;
use crate::services::auth::token::TokenCodec;
use crate::services::authz::owner::OwnerLookup;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub tokens: TokenCodec,
    pub credentials: Arc<dyn CredentialStore>,
    pub owners: Arc<dyn OwnerLookup>,
    pub bearer_prefix: Arc<str>,
}

impl AppState {
    pub fn new(
        db: PgPool,
        tokens: TokenCodec,
        credentials: Arc<dyn CredentialStore>,
        owners: Arc<dyn OwnerLookup>,
        bearer_prefix: &str,
    ) -> Self {
        Self {
            db,
            tokens,
            credentials,
            owners,
            bearer_prefix: Arc::from(bearer_prefix),
        }
    }
}
