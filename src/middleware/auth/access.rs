//! Auth Gate: credential → identity provider → AuthCtx を extensions に入れる
//!
//! Per request:
//! Start → CredentialExtracted → ProviderVerifying → Authorized | Rejected
//!
//! - credential が無ければ provider は呼ばない (MissingToken)
//! - provider 呼び出しは 1 回だけ。retry しない
//! - 成功時のみ AuthCtx を載せる

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    Router,
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderValue, Request},
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::api::extractors::AuthCtx;
use crate::middleware::auth::{AuthError, Credential, extract_credential};
use crate::services::auth::VerifyError;
use crate::state::AppState;

/// Gate every route registered on `router` so far.
///
/// `route_layer` keeps the gate off unmatched paths, so the fallback stays public.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

/// Gate only the handlers on `method_router`.
///
/// For paths that mix public and protected methods: other methods on the path
/// keep their own behavior, and unsupported ones still answer 405.
pub fn gate(method_router: MethodRouter<AppState>, state: AppState) -> MethodRouter<AppState> {
    method_router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let started = Instant::now();
    let path = req.uri().path().to_string();
    let client_ip = client_ip(&req);

    let credential = extract_credential(req.headers(), req.uri(), state.session_cookie_name());

    match authenticate(&state, credential).await {
        Ok(auth_ctx) => {
            tracing::info!(
                user_id = %auth_ctx.user_id,
                path = %path,
                client_ip = %client_ip,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "authentication successful"
            );

            // middleware → extractor への受け渡し
            req.extensions_mut().insert(auth_ctx);
            Ok(next.run(req).await)
        }
        Err(err) => {
            tracing::warn!(
                reason = err.kind(),
                path = %path,
                client_ip = %client_ip,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "authentication failed"
            );
            Err(err)
        }
    }
}

async fn authenticate(
    state: &AppState,
    credential: Option<Credential>,
) -> Result<AuthCtx, AuthError> {
    let credential = credential.ok_or(AuthError::MissingToken)?;

    // The provider expects a regular Authorization header value.
    let authorization = HeaderValue::from_bytes(&credential.value).map_err(|err| {
        tracing::error!(
            error = %err,
            source = credential.source.as_str(),
            "credential cannot be adapted into an authorization header"
        );
        AuthError::InternalError
    })?;

    let claims = state
        .identity()
        .verify_credential(&authorization)
        .await
        .map_err(|err| match err {
            VerifyError::Rejected(reason) => {
                tracing::debug!(
                    reason = %reason,
                    source = credential.source.as_str(),
                    "credential rejected by identity provider"
                );
                AuthError::InvalidToken
            }
            VerifyError::Unavailable(reason) => {
                tracing::error!(reason = %reason, "identity provider unavailable");
                AuthError::InternalError
            }
        })?;

    if claims.banned {
        tracing::debug!(user_id = %claims.sub, "banned subject");
        return Err(AuthError::InsufficientPermissions);
    }

    Ok(AuthCtx::new(claims))
}

fn client_ip(req: &Request<Body>) -> String {
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    req.headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
