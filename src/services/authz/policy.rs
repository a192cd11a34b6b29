/*
 * Responsibility
 * - matched route ごとのアクセス判定 (policy evaluator)
 * - role check は pure、ownership check のみ lookup collaborator を呼ぶ
 *
 * Notes
 * - ADMIN はすべての gated policy を無条件で通過する
 * - resource が存在しない / owner 未割当は常に deny (absence is never permissive)
 * - ownership は token が運んできた identity と owner の完全一致。DB から
 *   principal を引き直さない
 */
use crate::api::v1::extractors::{Principal, Role};
use crate::error::AppError;
use crate::services::authz::owner::{OwnerLookup, ResourceKind};

/// Declarative rule bound to a route. Exactly one policy applies per
/// (method, path) pair; the route table owns that mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    Public,
    AuthenticatedOnly,
    RoleGate(Role),
    OwnerGate {
        resource: ResourceKind,
        required_role: Option<Role>,
    },
}

impl AccessPolicy {
    /// Path parameter the guard must extract for this policy, if any.
    pub fn route_param(&self) -> Option<&'static str> {
        match self {
            AccessPolicy::OwnerGate { resource, .. } => Some(resource.route_param()),
            _ => None,
        }
    }

    /// Decide whether `principal` may proceed.
    ///
    /// `resource_id` is the id extracted from the matched route; it is only
    /// consulted for `OwnerGate`. The single possible I/O is the owner
    /// lookup, reached only after the cheap role checks pass.
    pub async fn evaluate(
        &self,
        principal: Option<&Principal>,
        resource_id: Option<i64>,
        owners: &dyn OwnerLookup,
    ) -> Result<(), AppError> {
        match self {
            AccessPolicy::Public => Ok(()),

            AccessPolicy::AuthenticatedOnly => match principal {
                Some(_) => Ok(()),
                None => Err(AppError::Unauthenticated),
            },

            AccessPolicy::RoleGate(role) => {
                let p = principal.ok_or(AppError::Unauthenticated)?;
                if p.is_admin() || p.role == *role {
                    Ok(())
                } else {
                    Err(AppError::Forbidden)
                }
            }

            AccessPolicy::OwnerGate {
                resource,
                required_role,
            } => {
                let p = principal.ok_or(AppError::Unauthenticated)?;

                if p.is_admin() {
                    return Ok(());
                }

                // Fail fast before any I/O; ineligible roles learn nothing
                // about whether the resource exists.
                if let Some(required) = required_role {
                    if p.role != *required {
                        return Err(AppError::Forbidden);
                    }
                }

                // A gated route without its id param is a wiring bug, not a
                // client error.
                let id = resource_id.ok_or(AppError::Internal)?;

                match owners.owner_of(*resource, id).await? {
                    Some(owner) if owner == p.identity => Ok(()),
                    // Missing resource or no owner assigned yet: deny.
                    _ => Err(AppError::Forbidden),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;
    use crate::repos::error::RepoError;

    /// (kind, id) -> owner identity; `None` value = resource exists but is
    /// ownerless.
    struct MemoryOwners(HashMap<(ResourceKind, i64), Option<String>>);

    impl MemoryOwners {
        fn new() -> Self {
            Self(HashMap::new())
        }

        fn with(mut self, kind: ResourceKind, id: i64, owner: Option<&str>) -> Self {
            self.0.insert((kind, id), owner.map(str::to_string));
            self
        }
    }

    #[async_trait]
    impl OwnerLookup for MemoryOwners {
        async fn owner_of(&self, kind: ResourceKind, id: i64) -> Result<Option<String>, RepoError> {
            Ok(self.0.get(&(kind, id)).cloned().flatten())
        }
    }

    /// Lookup that fails the test if consulted at all.
    struct NoLookup;

    #[async_trait]
    impl OwnerLookup for NoLookup {
        async fn owner_of(
            &self,
            _kind: ResourceKind,
            _id: i64,
        ) -> Result<Option<String>, RepoError> {
            panic!("owner lookup must not run for this policy outcome");
        }
    }

    fn owner_gate(resource: ResourceKind, required_role: Option<Role>) -> AccessPolicy {
        AccessPolicy::OwnerGate {
            resource,
            required_role,
        }
    }

    #[tokio::test]
    async fn public_allows_anonymous() {
        let policy = AccessPolicy::Public;
        assert!(policy.evaluate(None, None, &NoLookup).await.is_ok());
    }

    #[tokio::test]
    async fn authenticated_only_rejects_anonymous() {
        let policy = AccessPolicy::AuthenticatedOnly;
        let err = policy.evaluate(None, None, &NoLookup).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated));

        let p = Principal::new("a@x.com", Role::Client);
        assert!(policy.evaluate(Some(&p), None, &NoLookup).await.is_ok());
    }

    #[tokio::test]
    async fn role_gate_admits_admin_and_exact_role() {
        let policy = AccessPolicy::RoleGate(Role::Owner);

        let admin = Principal::new("root@x.com", Role::Admin);
        let owner = Principal::new("o@x.com", Role::Owner);
        let client = Principal::new("c@x.com", Role::Client);

        assert!(policy.evaluate(Some(&admin), None, &NoLookup).await.is_ok());
        assert!(policy.evaluate(Some(&owner), None, &NoLookup).await.is_ok());
        assert!(matches!(
            policy.evaluate(Some(&client), None, &NoLookup).await,
            Err(AppError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn owner_gate_admin_bypasses_without_lookup() {
        let policy = owner_gate(ResourceKind::Restaurant, Some(Role::Owner));
        let admin = Principal::new("root@x.com", Role::Admin);

        // NoLookup panics if touched: the bypass must short-circuit.
        assert!(
            policy
                .evaluate(Some(&admin), Some(7), &NoLookup)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn owner_gate_required_role_fails_before_lookup() {
        let policy = owner_gate(ResourceKind::Restaurant, Some(Role::Owner));
        let client = Principal::new("c@x.com", Role::Client);

        let err = policy
            .evaluate(Some(&client), Some(7), &NoLookup)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[tokio::test]
    async fn owner_gate_matches_and_mismatches_identity() {
        let owners = MemoryOwners::new()
            .with(ResourceKind::Restaurant, 7, Some("a@x.com"))
            .with(ResourceKind::Restaurant, 8, Some("b@x.com"));
        let policy = owner_gate(ResourceKind::Restaurant, Some(Role::Owner));
        let p = Principal::new("a@x.com", Role::Owner);

        assert!(policy.evaluate(Some(&p), Some(7), &owners).await.is_ok());
        assert!(matches!(
            policy.evaluate(Some(&p), Some(8), &owners).await,
            Err(AppError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn ownerless_resource_denies_every_non_admin() {
        // Restaurant 9 exists but nobody owns it yet; principal does own
        // restaurant 7, which must not help here.
        let owners = MemoryOwners::new()
            .with(ResourceKind::Restaurant, 7, Some("a@x.com"))
            .with(ResourceKind::Restaurant, 9, None);
        let policy = owner_gate(ResourceKind::Restaurant, Some(Role::Owner));
        let p = Principal::new("a@x.com", Role::Owner);

        assert!(matches!(
            policy.evaluate(Some(&p), Some(9), &owners).await,
            Err(AppError::Forbidden)
        ));

        let admin = Principal::new("root@x.com", Role::Admin);
        assert!(policy.evaluate(Some(&admin), Some(9), &owners).await.is_ok());
    }

    #[tokio::test]
    async fn missing_resource_denies() {
        let owners = MemoryOwners::new();
        let policy = owner_gate(ResourceKind::Dish, Some(Role::Owner));
        let p = Principal::new("a@x.com", Role::Owner);

        assert!(matches!(
            policy.evaluate(Some(&p), Some(404), &owners).await,
            Err(AppError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn owner_gate_without_required_role_checks_identity_only() {
        let owners = MemoryOwners::new().with(ResourceKind::User, 3, Some("c@x.com"));
        let policy = owner_gate(ResourceKind::User, None);
        let client = Principal::new("c@x.com", Role::Client);

        assert!(
            policy
                .evaluate(Some(&client), Some(3), &owners)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn owner_gate_rejects_anonymous() {
        let policy = owner_gate(ResourceKind::User, None);
        let err = policy.evaluate(None, Some(3), &NoLookup).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated));
    }
}
