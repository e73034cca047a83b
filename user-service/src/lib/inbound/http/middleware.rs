use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::domain::token::AuthenticationError;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;
use crate::user::ports::UserRepository;

/// Message for every rejected token, whatever the failure kind.
pub const INVALID_TOKEN: &str = "Invalid or expired token";

/// Extension type to store the authenticated principal in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub user: User,
}

/// Middleware that authenticates the bearer token and adds the user to request extensions
pub async fn authenticate<UR>(
    State(state): State<AppState<UR>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response>
where
    UR: UserRepository,
{
    // Owned copy: the request must not stay borrowed across the await
    let token = extract_token_from_header(&req)?.to_owned();

    let user = state
        .token_authenticator
        .authenticate(&token)
        .await
        .map_err(rejection)?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id: user.id,
        user,
    });

    Ok(next.run(req).await)
}

fn rejection(err: AuthenticationError) -> Response {
    if !err.is_authentication_failure() {
        tracing::error!(kind = err.kind(), error = %err, "Token authentication failed");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "error": "Authentication is temporarily unavailable"
            })),
        )
            .into_response();
    }

    tracing::warn!(kind = err.kind(), error = %err, "Token rejected");
    unauthorized(INVALID_TOKEN)
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": message
        })),
    )
        .into_response()
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| unauthorized("Invalid Authorization header"))?;

    auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        unauthorized("Invalid Authorization header format. Expected: Bearer <token>")
    })
}
