use std::sync::Arc;

use auth::Clock;
use auth::PasswordHasher;
use auth::SystemClock;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use user_service::bootstrap::build_registry;
use user_service::config::Config;
use user_service::config::DatabaseConfig;
use user_service::domain::health::UserHealthCheck;
use user_service::domain::user::service::UserService;
use user_service::inbound::http::router::create_router;
use user_service::inbound::http::router::AppState;
use user_service::outbound::repositories::InMemoryUserRepository;
use user_service::outbound::repositories::PostgresUserRepository;
use user_service::user::ports::UserRepository;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "user_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "user-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;
    let directory = match config.database {
        Some(_) => "postgresql",
        None => "memory",
    };

    tracing::info!(
        http_port = config.server.http_port,
        directory,
        token_lifetime_hours = config.jwt.expiration_hours,
        health_interval_secs = config.health_check.interval_secs,
        "Configuration loaded"
    );

    match config.database.clone() {
        Some(database) => {
            let repository = postgres_repository(&database).await?;
            run(config, Arc::new(repository)).await
        }
        None => {
            let repository = seeded_memory_repository(&config)?;
            run(config, Arc::new(repository)).await
        }
    }
}

async fn postgres_repository(
    database: &DatabaseConfig,
) -> Result<PostgresUserRepository, anyhow::Error> {
    let pg_pool = PgPoolOptions::new()
        .max_connections(database.max_connections)
        .connect(&database.url)
        .await?;
    tracing::info!(
        max_connections = database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    Ok(PostgresUserRepository::new(pg_pool))
}

/// In-memory directory holding the health check's reference user.
fn seeded_memory_repository(config: &Config) -> Result<InMemoryUserRepository, anyhow::Error> {
    let reference = &config.health_check.reference_user;

    let mut user = reference.to_user()?;
    user.password_hash = reference
        .password
        .as_deref()
        .map(|password| PasswordHasher::new().hash(password))
        .transpose()?;

    tracing::info!(
        user_id = %user.id,
        can_authenticate = user.can_authenticate(),
        "In-memory directory seeded with reference user"
    );

    Ok(InMemoryUserRepository::with_users([user]))
}

async fn run<UR>(config: Config, repository: Arc<UR>) -> Result<(), anyhow::Error>
where
    UR: UserRepository,
{
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let registry = build_registry(&config, repository, clock)?;

    let health_check = registry.get_service::<UserHealthCheck<UserService<UR>>>()?;
    let health_task = health_check.spawn_periodic(config.health_check.interval());
    tracing::info!(
        interval_secs = config.health_check.interval_secs,
        "Periodic health check started"
    );

    let http_application = create_router(AppState::<UR>::from_registry(&registry)?);

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let result = axum::serve(http_listener, http_application).await;
    health_task.abort();

    match result {
        Ok(()) => tracing::info!("Server exited successfully"),
        Err(e) => {
            tracing::error!(error = %e, "Server error");
            return Err(e.into());
        }
    }

    Ok(())
}
