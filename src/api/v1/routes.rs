/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - route ごとの AccessPolicy 一覧表 (policy_for) もここに置く。
 *   routing と policy の対応が一画面で追えるようにする
 */
use axum::{
    Router,
    http::Method,
    routing::{delete, get, post, put},
};

use crate::api::v1::extractors::Role;
use crate::api::v1::handlers::{
    auth::login,
    dishes::{create_dish, delete_dish, get_dish, list_dishes, update_dish},
    health::health,
    restaurants::{
        create_restaurant, get_restaurant, list_restaurants, remove_restaurant, update_restaurant,
    },
    subscriptions::{
        get_subscription, list_by_restaurant, list_by_user, rate, subscribe, unsubscribe,
    },
    users::{demote_user, get_user, list_owners, promote_user, register, update_user},
};
use crate::middleware::auth::guard;
use crate::services::authz::owner::ResourceKind;
use crate::services::authz::policy::AccessPolicy;
use crate::state::AppState;

/// Mount point; the policy guard strips it before consulting the table.
pub const NEST: &str = "/api/v1";

pub fn router(state: AppState) -> Router<AppState> {
    let routes = Router::new()
        .route("/health", get(health))
        .route("/users/register", post(register))
        .route("/users/authenticate", post(login))
        .route("/users/owners", get(list_owners))
        .route("/users/{user_id}", get(get_user).put(update_user))
        .route(
            "/users/promote/{user_id}/restaurant/{restaurant_id}",
            put(promote_user),
        )
        .route("/users/demote/{user_id}", put(demote_user))
        .route("/restaurants", get(list_restaurants).post(create_restaurant))
        .route(
            "/restaurants/{restaurant_id}",
            get(get_restaurant)
                .put(update_restaurant)
                .delete(remove_restaurant),
        )
        .route("/dishes/{dish_id}", get(get_dish).put(update_dish).delete(delete_dish))
        .route(
            "/dishes/restaurant/{restaurant_id}",
            get(list_dishes).post(create_dish),
        )
        .route("/subscriptions/user/{user_id}", get(list_by_user))
        .route(
            "/subscriptions/restaurant/{restaurant_id}",
            get(list_by_restaurant),
        )
        .route(
            "/subscriptions/user/{user_id}/restaurant/{restaurant_id}",
            get(get_subscription)
                .post(subscribe)
                .put(rate)
                .delete(unsubscribe),
        );

    guard::apply(routes, state)
}

/// Access policy per (method, matched route).
///
/// Anything not listed requires a login; new routes therefore default to the
/// safe side rather than to public.
pub fn policy_for(method: &Method, route: &str) -> AccessPolicy {
    use AccessPolicy::{AuthenticatedOnly, Public, RoleGate};

    let owner_gate = |resource, required_role| AccessPolicy::OwnerGate {
        resource,
        required_role,
    };

    match (method.as_str(), route) {
        ("GET", "/health") => Public,
        ("POST", "/users/register") => Public,
        ("POST", "/users/authenticate") => Public,

        ("PUT", "/users/{user_id}") => owner_gate(ResourceKind::User, None),
        ("PUT", "/users/promote/{user_id}/restaurant/{restaurant_id}") => RoleGate(Role::Admin),
        ("PUT", "/users/demote/{user_id}") => RoleGate(Role::Admin),

        ("GET", "/restaurants") => Public,
        ("GET", "/restaurants/{restaurant_id}") => Public,
        ("PUT", "/restaurants/{restaurant_id}") => {
            owner_gate(ResourceKind::Restaurant, Some(Role::Owner))
        }
        ("DELETE", "/restaurants/{restaurant_id}") => RoleGate(Role::Admin),

        ("GET", "/dishes/{dish_id}") => Public,
        ("GET", "/dishes/restaurant/{restaurant_id}") => Public,
        ("POST", "/dishes/restaurant/{restaurant_id}") => {
            owner_gate(ResourceKind::Restaurant, Some(Role::Owner))
        }
        ("PUT" | "DELETE", "/dishes/{dish_id}") => owner_gate(ResourceKind::Dish, Some(Role::Owner)),

        ("GET", "/subscriptions/user/{user_id}") => Public,
        ("GET", "/subscriptions/restaurant/{restaurant_id}") => Public,
        ("GET", "/subscriptions/user/{user_id}/restaurant/{restaurant_id}") => Public,
        ("POST" | "PUT" | "DELETE", "/subscriptions/user/{user_id}/restaurant/{restaurant_id}") => {
            owner_gate(ResourceKind::User, None)
        }

        // GET /users/{user_id}, /users/owners, POST /restaurants, and anything
        // added later without an entry here.
        _ => AuthenticatedOnly,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_login_are_public() {
        assert_eq!(
            policy_for(&Method::POST, "/users/register"),
            AccessPolicy::Public
        );
        assert_eq!(
            policy_for(&Method::POST, "/users/authenticate"),
            AccessPolicy::Public
        );
    }

    #[test]
    fn reads_are_public_but_user_reads_require_login() {
        assert_eq!(
            policy_for(&Method::GET, "/restaurants/{restaurant_id}"),
            AccessPolicy::Public
        );
        assert_eq!(
            policy_for(&Method::GET, "/users/{user_id}"),
            AccessPolicy::AuthenticatedOnly
        );
    }

    #[test]
    fn admin_routes_are_role_gated() {
        assert_eq!(
            policy_for(&Method::PUT, "/users/demote/{user_id}"),
            AccessPolicy::RoleGate(Role::Admin)
        );
        assert_eq!(
            policy_for(&Method::DELETE, "/restaurants/{restaurant_id}"),
            AccessPolicy::RoleGate(Role::Admin)
        );
    }

    #[test]
    fn mutations_are_owner_gated() {
        assert_eq!(
            policy_for(&Method::PUT, "/restaurants/{restaurant_id}"),
            AccessPolicy::OwnerGate {
                resource: ResourceKind::Restaurant,
                required_role: Some(Role::Owner),
            }
        );
        assert_eq!(
            policy_for(&Method::DELETE, "/dishes/{dish_id}"),
            AccessPolicy::OwnerGate {
                resource: ResourceKind::Dish,
                required_role: Some(Role::Owner),
            }
        );
        assert_eq!(
            policy_for(&Method::PUT, "/users/{user_id}"),
            AccessPolicy::OwnerGate {
                resource: ResourceKind::User,
                required_role: None,
            }
        );
    }

    #[test]
    fn unlisted_routes_default_to_authenticated() {
        assert_eq!(
            policy_for(&Method::POST, "/some/new/route"),
            AccessPolicy::AuthenticatedOnly
        );
    }
}
