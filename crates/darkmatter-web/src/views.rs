//! View routing: which screen a client may see for its authentication state.

use darkmatter_common::SessionState;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated,
}

impl From<&SessionState> for AuthState {
    fn from(state: &SessionState) -> Self {
        if state.is_authenticated() {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Login,
    SignUp,
    ForgotPassword,
    Home,
    FoldSequence,
}

impl View {
    pub const AUTH_MENU: [View; 3] = [View::Login, View::SignUp, View::ForgotPassword];
    pub const MAIN_MENU: [View; 2] = [View::Home, View::FoldSequence];

    pub fn path(self) -> &'static str {
        match self {
            View::Login          => "/login",
            View::SignUp         => "/signup",
            View::ForgotPassword => "/forgot-password",
            View::Home           => "/",
            View::FoldSequence   => "/fold",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            View::Login          => "Login",
            View::SignUp         => "Sign Up",
            View::ForgotPassword => "Forgot password",
            View::Home           => "Home",
            View::FoldSequence   => "Fold Sequence",
        }
    }

    /// The authentication state in which this view is reachable.
    pub fn requires(self) -> AuthState {
        match self {
            View::Login | View::SignUp | View::ForgotPassword => AuthState::Unauthenticated,
            View::Home | View::FoldSequence => AuthState::Authenticated,
        }
    }

    pub fn default_for(state: AuthState) -> View {
        match state {
            AuthState::Unauthenticated => View::Login,
            AuthState::Authenticated => View::Home,
        }
    }
}

/// The view to show for `requested`: itself when reachable, else the state's default.
pub fn resolve(state: AuthState, requested: View) -> View {
    if requested.requires() == state {
        requested
    } else {
        View::default_for(state)
    }
}

/// Menu entries for the sidebar of `current`.
#[derive(Debug, Serialize)]
pub struct MenuEntry {
    pub title: &'static str,
    pub path: &'static str,
    pub active: bool,
}

pub fn menu(current: View) -> Vec<MenuEntry> {
    let entries = match current.requires() {
        AuthState::Unauthenticated => &View::AUTH_MENU[..],
        AuthState::Authenticated => &View::MAIN_MENU[..],
    };
    entries
        .iter()
        .map(|v| MenuEntry { title: v.title(), path: v.path(), active: *v == current })
        .collect()
}
