//! Identity gateway: the three auth operations as seen by the UI.
//!
//! Every operation ends in a `Notice`. Only `login` touches session state.

use std::sync::Arc;

use darkmatter_common::{Notice, SessionState};
use tracing::{info, warn};

use crate::classification::{ResetFailure, SignUpFailure};
use crate::provider::{Credentials, IdentityProvider};

pub const LOGIN_SUCCESS: &str = "Successfully logged in!";
pub const LOGIN_FAILURE: &str = "Invalid email or password";
pub const SIGN_UP_SUCCESS: &str = "Successfully created account! Try login";
pub const RESET_SUCCESS: &str = "Email sent!";

#[derive(Clone)]
pub struct IdentityGateway {
    provider: Arc<dyn IdentityProvider>,
}

impl IdentityGateway {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// Signs in and records the outcome on `state`.
    ///
    /// Failures are not distinguished for the user; the cause is only logged.
    pub async fn login(&self, state: &mut SessionState, credentials: &Credentials) -> Notice {
        match self.provider.sign_in(credentials).await {
            Ok(()) => {
                info!("login succeeded");
                state.record_login(true);
                Notice::success(LOGIN_SUCCESS)
            }
            Err(e) => {
                warn!(error = %e, "login failed");
                state.record_login(false);
                Notice::warning(LOGIN_FAILURE)
            }
        }
    }

    /// Creates an account. Never authenticates the session.
    pub async fn sign_up(&self, credentials: &Credentials) -> Notice {
        match self.provider.create_account(credentials).await {
            Ok(()) => {
                info!("account created");
                Notice::success(SIGN_UP_SUCCESS)
            }
            Err(e) => {
                let failure = SignUpFailure::classify(&e);
                warn!(error = %e, ?failure, "sign-up failed");
                failure.notice()
            }
        }
    }

    pub async fn send_password_reset(&self, email: &str) -> Notice {
        match self.provider.send_password_reset(email).await {
            Ok(()) => {
                info!("password reset email sent");
                Notice::success(RESET_SUCCESS)
            }
            Err(e) => {
                let failure = ResetFailure::classify(&e);
                warn!(error = %e, ?failure, "password reset failed");
                failure.notice()
            }
        }
    }

    pub fn logout(&self, state: &mut SessionState) {
        state.logout();
    }
}
