pub mod digest;
pub mod errors;
pub mod hasher;

pub use digest::constant_time_eq;
pub use errors::PasswordError;
pub use hasher::PasswordHasher;
