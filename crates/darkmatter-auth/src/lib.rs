//! darkmatter-auth — Identity gateway for Dark Matter.
//!
//! Authentication itself is delegated to an external identity provider
//! (Firebase Identity Toolkit). This crate wraps the three provider calls,
//! turns provider error codes into user-facing categories and flips the
//! session's authentication flag on login.

pub mod classification;
pub mod gateway;
pub mod provider;

pub use classification::{ProviderErrorCode, ResetFailure, SignUpFailure};
pub use gateway::IdentityGateway;
pub use provider::{AuthError, Credentials, FirebaseProvider, IdentityProvider, UnconfiguredProvider};
