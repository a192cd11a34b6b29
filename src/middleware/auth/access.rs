//! Bearer token 検証 → Principal を extensions に入れる
//!
//! - ヘッダなし / "Bearer " で始まらない場合は anonymous のまま通す
//!   (public route が token なしで届くようにするため)
//! - token が付いていて検証に失敗した場合は hard reject。anonymous への
//!   フォールバックはしない (壊れた token と「token なし」は別物)
//! - ここでは I/O をしない。署名検証はインメモリ計算のみ

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::Principal;
use crate::error::AppError;
use crate::state::AppState;

/// `/api/v1/*` に認証を掛けるための middleware を適用する。
///
/// 例：
/// ```ignore
/// let v1 = api::v1::routes::router(state.clone());
/// let v1 = middleware::auth::access::apply(v1, state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix(state.bearer_prefix.as_ref()));

    let Some(token) = bearer else {
        // Anonymous. Protected routes reject it downstream in the policy guard.
        return Ok(next.run(req).await);
    };

    let claims = match state.tokens.verify(token) {
        Ok(claims) => claims,
        Err(err) => {
            // Operators get the sub-reason; the client only a generic 401.
            tracing::warn!(error = %err, "bearer token rejected");
            return Err(AppError::Unauthenticated);
        }
    };

    // middleware → extractor への受け渡し
    req.extensions_mut()
        .insert(Principal::new(claims.sub, claims.role));

    Ok(next.run(req).await)
}
