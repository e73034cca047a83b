use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use super::models::HealthStatus;
use crate::domain::user::models::User;
use crate::user::errors::UserError;
use crate::user::ports::UserServicePort;

pub const HEALTHY_MESSAGE: &str = "UserService is fine.";
pub const REFERENCE_MISMATCH_MESSAGE: &str =
    "UserService has problems returning the correct reference user!";

/// Watchdog that reads a known reference user and compares it to the
/// expected profile.
pub struct UserHealthCheck<US>
where
    US: UserServicePort,
{
    user_service: Arc<US>,
    reference_user: User,
}

impl<US> UserHealthCheck<US>
where
    US: UserServicePort,
{
    pub fn new(user_service: Arc<US>, reference_user: User) -> Self {
        Self {
            user_service,
            reference_user,
        }
    }

    pub fn reference_user(&self) -> &User {
        &self.reference_user
    }

    /// Run the probe once. Never fails: every problem becomes `Unhealthy`.
    pub async fn check(&self) -> HealthStatus {
        match self.user_service.get_user(&self.reference_user.id).await {
            Ok(user) if user.same_profile(&self.reference_user) => {
                HealthStatus::Healthy(HEALTHY_MESSAGE.to_string())
            }
            Ok(_) | Err(UserError::NotFound(_)) => {
                HealthStatus::Unhealthy(REFERENCE_MISMATCH_MESSAGE.to_string())
            }
            Err(e) => HealthStatus::Unhealthy(format!("UserService is unavailable: {}", e)),
        }
    }

    /// Run the probe every `period` on a background task and log each result.
    ///
    /// The first probe runs immediately.
    pub fn spawn_periodic(self: Arc<Self>, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                match self.check().await {
                    HealthStatus::Healthy(message) => {
                        tracing::debug!(check = "user_service", message = %message, "Health check passed");
                    }
                    HealthStatus::Unhealthy(message) => {
                        tracing::warn!(check = "user_service", message = %message, "Health check failed");
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::*;

    use super::*;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::UserId;
    use crate::domain::user::service::UserService;
    use crate::user::ports::mocks::MockTestUserRepository;

    fn reference() -> User {
        User {
            id: UserId(1),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            phone: "+41 79 555 00 11".to_string(),
            email: EmailAddress::new("john.doe@sportchef.ch".to_string()).unwrap(),
            password_hash: None,
        }
    }

    fn health_check(
        repository: MockTestUserRepository,
    ) -> UserHealthCheck<UserService<MockTestUserRepository>> {
        let user_service = Arc::new(UserService::new(Arc::new(repository)));
        UserHealthCheck::new(user_service, reference())
    }

    #[tokio::test]
    async fn test_healthy_when_reference_user_matches() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_id()
            .with(eq(UserId(1)))
            .times(1)
            .returning(|_| {
                let mut stored = reference();
                stored.password_hash = Some("$argon2id$whatever".to_string());
                Ok(Some(stored))
            });

        let status = health_check(repository).check().await;

        assert_eq!(status, HealthStatus::Healthy(HEALTHY_MESSAGE.to_string()));
    }

    #[tokio::test]
    async fn test_unhealthy_when_reference_user_differs() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_find_by_id().returning(|_| {
            let mut stored = reference();
            stored.last_name = "Smith".to_string();
            Ok(Some(stored))
        });

        let status = health_check(repository).check().await;

        assert_eq!(
            status,
            HealthStatus::Unhealthy(REFERENCE_MISMATCH_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn test_unhealthy_when_reference_user_missing() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_find_by_id().returning(|_| Ok(None));

        let status = health_check(repository).check().await;

        assert_eq!(
            status,
            HealthStatus::Unhealthy(REFERENCE_MISMATCH_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn test_unhealthy_when_directory_fails() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_id()
            .returning(|_| Err(UserError::DatabaseError("connection refused".to_string())));

        let status = health_check(repository).check().await;

        assert!(!status.is_healthy());
        assert!(status.message().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_periodic_check_keeps_running() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_id()
            .returning(|_| Ok(Some(reference())));

        let handle = Arc::new(health_check(repository)).spawn_periodic(Duration::from_millis(5));

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(!handle.is_finished());

        handle.abort();
    }
}
