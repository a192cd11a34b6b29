//! route 単位の policy guard
//!
//! - v1 router 全体に `route_layer` として適用する (routing 後に走るので
//!   MatchedPath / path params が読める)
//! - どの route にどの policy が効くかは routes::policy_for の一覧表が持つ
//! - 判定本体は services::authz::policy::AccessPolicy::evaluate

use axum::{
    Router,
    body::Body,
    extract::{MatchedPath, RawPathParams, State},
    http::Request,
    middleware::{Next, from_fn_with_state},
    response::Response,
};

use crate::api::v1::extractors::Principal;
use crate::api::v1::routes;
use crate::error::AppError;
use crate::state::AppState;

/// Enforce the route policy table on every route of `router`.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.route_layer(from_fn_with_state(state, policy_middleware))
}

async fn policy_middleware(
    State(state): State<AppState>,
    matched: MatchedPath,
    params: RawPathParams,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // MatchedPath carries the nest prefix when the router is mounted.
    let route = matched
        .as_str()
        .strip_prefix(routes::NEST)
        .unwrap_or(matched.as_str());

    let policy = routes::policy_for(req.method(), route);
    let principal = req.extensions().get::<Principal>();

    let resource_id = match policy.route_param() {
        Some(name) => Some(gated_id(&params, name)?),
        None => None,
    };

    policy
        .evaluate(principal, resource_id, state.owners.as_ref())
        .await?;

    Ok(next.run(req).await)
}

fn gated_id(params: &RawPathParams, name: &str) -> Result<i64, AppError> {
    let raw = params
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        // A gated route that does not declare the param is a wiring bug.
        .ok_or(AppError::Internal)?;

    raw.parse::<i64>()
        .map_err(|_| AppError::bad_request("invalid id"))
}
