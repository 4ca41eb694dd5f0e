//! Authentication flag of one browser session.

/// Whether the owning browser session has passed the identity gate.
///
/// Starts unauthenticated. Only a successful login may set the flag;
/// logout and failed logins clear it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionState {
    authenticated: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Records the outcome of a login attempt.
    pub fn record_login(&mut self, succeeded: bool) {
        self.authenticated = succeeded;
    }

    pub fn logout(&mut self) {
        self.authenticated = false;
    }
}
