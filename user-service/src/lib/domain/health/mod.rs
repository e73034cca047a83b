pub mod check;
pub mod models;

pub use check::UserHealthCheck;
pub use models::HealthStatus;
