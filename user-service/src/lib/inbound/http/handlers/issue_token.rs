use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use crate::domain::token::Credentials;
use crate::domain::token::IssuedToken;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;
use crate::user::ports::UserRepository;

/// Exchange credentials for a token.
///
/// Answers with the bare `{"token": ...}` envelope rather than the usual
/// response body.
pub async fn issue_token<UR>(
    State(state): State<AppState<UR>>,
    Json(body): Json<IssueTokenRequest>,
) -> Result<Json<IssuedToken>, ApiError>
where
    UR: UserRepository,
{
    let credentials = body.into_credentials();

    state
        .token_issuer
        .generate_token(&credentials)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::warn!(user_id = %credentials.user_id, kind = e.kind(), "Token request rejected");
            ApiError::from(e)
        })
}

/// HTTP request body for a login (raw JSON)
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueTokenRequest {
    user_id: i64,
    #[serde(default)]
    password: Option<String>,
}

impl IssueTokenRequest {
    fn into_credentials(self) -> Credentials {
        Credentials::new(UserId(self.user_id), self.password)
    }
}
