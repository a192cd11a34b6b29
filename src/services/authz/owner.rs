/*
 * Responsibility
 * - OwnerGate が依存する resource -> owner 解決の契約
 * - 実装は repos 側 (Postgres) とテスト用インメモリの 2 系統
 */
use async_trait::async_trait;

use crate::repos::error::RepoError;

/// Which lookup resolves a route id to an owner identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    User,
    Restaurant,
    Dish,
}

impl ResourceKind {
    /// Path parameter carrying the gated id for this kind.
    pub fn route_param(self) -> &'static str {
        match self {
            ResourceKind::User => "user_id",
            ResourceKind::Restaurant => "restaurant_id",
            ResourceKind::Dish => "dish_id",
        }
    }
}

/// Resolves "who owns resource `id` of `kind`".
///
/// `Ok(None)` covers both a missing resource and a resource with no owner
/// assigned yet; the evaluator denies either way, so callers need not tell
/// them apart.
#[async_trait]
pub trait OwnerLookup: Send + Sync {
    async fn owner_of(&self, kind: ResourceKind, id: i64) -> Result<Option<String>, RepoError>;
}
