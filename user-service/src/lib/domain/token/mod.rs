pub mod authenticator;
pub mod errors;
pub mod issuer;
pub mod models;

pub use authenticator::TokenAuthenticator;
pub use errors::AuthenticationError;
pub use issuer::TokenIssuer;
pub use models::Credentials;
pub use models::IssuedToken;
