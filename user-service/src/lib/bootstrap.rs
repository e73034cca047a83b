use std::sync::Arc;

use auth::Clock;
use auth::TokenCodec;

use crate::config::Config;
use crate::domain::health::UserHealthCheck;
use crate::domain::token::TokenAuthenticator;
use crate::domain::token::TokenIssuer;
use crate::domain::user::service::UserService;
use crate::registry::ServiceRegistry;
use crate::user::ports::UserRepository;

/// Build every service of the process around a user directory.
///
/// The issuer and the authenticator resolve the directory through the
/// registry, the way every other consumer does.
///
/// # Errors
/// * Registry wiring failures
/// * Invalid reference user in the health check configuration
pub fn build_registry<UR>(
    config: &Config,
    repository: Arc<UR>,
    clock: Arc<dyn Clock>,
) -> anyhow::Result<ServiceRegistry>
where
    UR: UserRepository,
{
    let mut registry = ServiceRegistry::new();

    registry.register(Some(repository))?;
    registry.register(Some(Arc::new(TokenCodec::new(config.jwt.secret.as_bytes()))))?;

    let repository = registry.get_service::<UR>()?;
    let codec = registry.get_service::<TokenCodec>()?;

    let user_service = Arc::new(UserService::new(Arc::clone(&repository)));
    registry.register(Some(Arc::clone(&user_service)))?;

    registry.register(Some(Arc::new(TokenIssuer::new(
        Arc::clone(&repository),
        Arc::clone(&codec),
        Arc::clone(&clock),
        config.jwt.lifetime(),
    ))))?;

    registry.register(Some(Arc::new(TokenAuthenticator::new(
        repository,
        codec,
        clock,
    ))))?;

    let reference_user = config.health_check.reference_user.to_user()?;
    registry.register(Some(Arc::new(UserHealthCheck::new(
        user_service,
        reference_user,
    ))))?;

    tracing::debug!(services = registry.len(), "Service registry built");

    Ok(registry)
}
