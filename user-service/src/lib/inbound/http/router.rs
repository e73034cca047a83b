use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_user::create_user;
use super::handlers::delete_user::delete_user;
use super::handlers::get_user::get_user;
use super::handlers::health::health;
use super::handlers::issue_token::issue_token;
use super::middleware::authenticate as auth_middleware;
use crate::domain::health::UserHealthCheck;
use crate::domain::token::TokenAuthenticator;
use crate::domain::token::TokenIssuer;
use crate::domain::user::service::UserService;
use crate::registry::RegistryError;
use crate::registry::ServiceRegistry;
use crate::user::ports::UserRepository;

pub struct AppState<UR>
where
    UR: UserRepository,
{
    pub user_service: Arc<UserService<UR>>,
    pub token_issuer: Arc<TokenIssuer<UR>>,
    pub token_authenticator: Arc<TokenAuthenticator<UR>>,
    pub health_check: Arc<UserHealthCheck<UserService<UR>>>,
}

impl<UR> AppState<UR>
where
    UR: UserRepository,
{
    /// Resolve the handler dependencies from the service registry.
    ///
    /// # Errors
    /// * `ServiceNotFound` - A required service was never registered
    pub fn from_registry(registry: &ServiceRegistry) -> Result<Self, RegistryError> {
        Ok(Self {
            user_service: registry.get_service()?,
            token_issuer: registry.get_service()?,
            token_authenticator: registry.get_service()?,
            health_check: registry.get_service()?,
        })
    }
}

// Derived Clone would require UR: Clone
impl<UR> Clone for AppState<UR>
where
    UR: UserRepository,
{
    fn clone(&self) -> Self {
        Self {
            user_service: Arc::clone(&self.user_service),
            token_issuer: Arc::clone(&self.token_issuer),
            token_authenticator: Arc::clone(&self.token_authenticator),
            health_check: Arc::clone(&self.health_check),
        }
    }
}

pub fn create_router<UR>(state: AppState<UR>) -> Router
where
    UR: UserRepository,
{
    let public_routes = Router::new()
        .route("/health", get(health::<UR>))
        .route("/api/token", post(issue_token::<UR>))
        .route("/api/users", post(create_user::<UR>));

    let protected_routes = Router::new()
        .route(
            "/api/users/:user_id",
            get(get_user::<UR>).delete(delete_user::<UR>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<UR>,
        ));

    // Headers are left out of the span: they carry bearer tokens
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use auth::PasswordHasher;
    use auth::SystemClock;
    use axum::http::header;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use super::*;
    use crate::bootstrap::build_registry;
    use crate::config::Config;
    use crate::config::HealthCheckConfig;
    use crate::config::JwtConfig;
    use crate::config::ReferenceUserConfig;
    use crate::config::ServerConfig;
    use crate::outbound::repositories::InMemoryUserRepository;

    fn router() -> Router {
        let config = Config {
            server: ServerConfig { http_port: 0 },
            database: None,
            jwt: JwtConfig {
                secret: "router-test-secret".to_string(),
                expiration_hours: 1,
            },
            health_check: HealthCheckConfig {
                interval_secs: 60,
                reference_user: ReferenceUserConfig {
                    id: 1,
                    first_name: "John".to_string(),
                    last_name: "Doe".to_string(),
                    phone: "+41 79 555 00 11".to_string(),
                    email: "john.doe@sportchef.ch".to_string(),
                    password: None,
                },
            },
        };

        let mut user = config.health_check.reference_user.to_user().unwrap();
        user.password_hash = Some(PasswordHasher::new().hash("secret").unwrap());
        let repository = Arc::new(InMemoryUserRepository::with_users([user]));

        let registry = build_registry(&config, repository, Arc::new(SystemClock)).unwrap();
        create_router(AppState::<InMemoryUserRepository>::from_registry(&registry).unwrap())
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_json(response: Response<Body>) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_from_registry_requires_all_services() {
        let registry = ServiceRegistry::new();

        let result = AppState::<InMemoryUserRepository>::from_registry(&registry);

        assert!(matches!(result, Err(RegistryError::ServiceNotFound(_))));
    }

    #[tokio::test]
    async fn test_login_then_fetch_user() {
        let app = router();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/token",
                serde_json::json!({ "userId": 1, "password": "secret" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let token = read_json(response).await["token"]
            .as_str()
            .unwrap()
            .to_string();

        let request = Request::builder()
            .uri("/api/users/1")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await["data"]["lastName"], "Doe");
    }

    #[tokio::test]
    async fn test_rejects_non_bearer_authorization() {
        let request = Request::builder()
            .uri("/api/users/1")
            .header(header::AUTHORIZATION, "Basic am9objpzZWNyZXQ=")
            .body(Body::empty())
            .unwrap();

        let response = router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_rejects_garbage_token() {
        let request = Request::builder()
            .uri("/api/users/1")
            .header(header::AUTHORIZATION, "Bearer not.a.token")
            .body(Body::empty())
            .unwrap();

        let response = router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(read_json(response).await["error"], "Invalid or expired token");
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await["data"]["status"], "healthy");
    }
}
