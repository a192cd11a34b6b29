/*
 * Responsibility
 * - OwnerLookup の Postgres 実装
 * - ResourceKind ごとの id -> owner identity 解決を repo 関数へ振り分ける
 */
use async_trait::async_trait;
use sqlx::PgPool;

use crate::repos::error::RepoError;
use crate::repos::{dish_repo, restaurant_repo, user_repo};
use crate::services::authz::owner::{OwnerLookup, ResourceKind};

pub struct PgOwnerLookup {
    db: PgPool,
}

impl PgOwnerLookup {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OwnerLookup for PgOwnerLookup {
    async fn owner_of(&self, kind: ResourceKind, id: i64) -> Result<Option<String>, RepoError> {
        match kind {
            // A user "owns" their own record.
            ResourceKind::User => user_repo::email_of(&self.db, id).await,
            ResourceKind::Restaurant => restaurant_repo::owner_email(&self.db, id).await,
            ResourceKind::Dish => dish_repo::owner_email(&self.db, id).await,
        }
    }
}
