use serde::Serialize;

/// Outcome of a single health probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy(String),
    Unhealthy(String),
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy(_))
    }

    pub fn message(&self) -> &str {
        match self {
            HealthStatus::Healthy(message) | HealthStatus::Unhealthy(message) => message,
        }
    }
}
