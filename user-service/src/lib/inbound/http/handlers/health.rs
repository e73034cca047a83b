use axum::extract::State;
use axum::http::StatusCode;

use super::ApiSuccess;
use crate::domain::health::HealthStatus;
use crate::inbound::http::router::AppState;
use crate::user::ports::UserRepository;

/// Run the user service health check on demand.
pub async fn health<UR>(State(state): State<AppState<UR>>) -> ApiSuccess<HealthStatus>
where
    UR: UserRepository,
{
    let status = state.health_check.check().await;

    let code = if status.is_healthy() {
        StatusCode::OK
    } else {
        tracing::warn!(message = %status.message(), "Health check failed");
        StatusCode::SERVICE_UNAVAILABLE
    };

    ApiSuccess::new(code, status)
}
