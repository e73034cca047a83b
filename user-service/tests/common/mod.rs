use std::sync::Arc;

use auth::ManualClock;
use auth::PasswordHasher;
use auth::TokenCodec;
use chrono::TimeZone;
use chrono::Utc;
use user_service::bootstrap::build_registry;
use user_service::config::Config;
use user_service::config::HealthCheckConfig;
use user_service::config::JwtConfig;
use user_service::config::ReferenceUserConfig;
use user_service::config::ServerConfig;
use user_service::domain::user::models::EmailAddress;
use user_service::domain::user::models::User;
use user_service::domain::user::models::UserId;
use user_service::inbound::http::router::create_router;
use user_service::inbound::http::router::AppState;
use user_service::outbound::repositories::InMemoryUserRepository;

pub const JWT_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-64-bytes-long-for-hs512";
pub const PASSWORD: &str = "secret";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub clock: Arc<ManualClock>,
    pub codec: TokenCodec,
    pub repository: InMemoryUserRepository,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp.
    ///
    /// The directory starts with user 1 (password `secret`, also the health
    /// reference user) and user 2 (no password).
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let config = test_config(port);

        let mut reference_user = config.health_check.reference_user.to_user().unwrap();
        reference_user.password_hash = Some(PasswordHasher::new().hash(PASSWORD).unwrap());

        let repository =
            InMemoryUserRepository::with_users([reference_user, user_without_password()]);

        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        ));

        let registry = build_registry(&config, Arc::new(repository.clone()), clock.clone())
            .expect("Failed to build service registry");
        let state = AppState::<InMemoryUserRepository>::from_registry(&registry)
            .expect("Failed to resolve application state");

        let router = create_router(state);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            clock,
            codec: TokenCodec::new(JWT_SECRET.as_bytes()),
            repository,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Log in and return the raw token string.
    pub async fn login(&self, user_id: i64, password: &str) -> String {
        let response = self
            .post("/api/token")
            .json(&serde_json::json!({ "userId": user_id, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["token"]
            .as_str()
            .expect("Missing token in response")
            .to_string()
    }
}

fn test_config(port: u16) -> Config {
    Config {
        server: ServerConfig { http_port: port },
        database: None,
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
            expiration_hours: 24,
        },
        health_check: HealthCheckConfig {
            interval_secs: 60,
            reference_user: ReferenceUserConfig {
                id: 1,
                first_name: "John".to_string(),
                last_name: "Doe".to_string(),
                phone: "+41 79 555 00 11".to_string(),
                email: "john.doe@sportchef.ch".to_string(),
                password: Some(PASSWORD.to_string()),
            },
        },
    }
}

fn user_without_password() -> User {
    User {
        id: UserId(2),
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        phone: "+41 79 555 00 22".to_string(),
        email: EmailAddress::new("jane.doe@sportchef.ch".to_string()).unwrap(),
        password_hash: None,
    }
}
