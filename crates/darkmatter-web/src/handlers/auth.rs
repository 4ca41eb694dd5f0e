//! Login, sign-up, password reset and logout.

use axum::{extract::State, response::Response, Form};
use darkmatter_auth::Credentials;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::WebError;
use crate::handlers::{guard, redirect, render_page};
use crate::session::ClientSession;
use crate::state::SharedState;
use crate::views::View;

#[derive(Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct ResetForm {
    #[serde(default)]
    pub email: String,
}

/// Refills the email field after a submission.
#[derive(Serialize, Default)]
struct EmailField {
    email: String,
}

async fn auth_page(state: SharedState, mut session: ClientSession, view: View) -> Result<Response, WebError> {
    if let Some(redirect) = guard(&session, view) {
        return Ok(redirect);
    }
    render_page(&state, &mut session, view, Vec::new(), EmailField::default())
}

pub async fn login_page(State(state): State<SharedState>, session: ClientSession) -> Result<Response, WebError> {
    auth_page(state, session, View::Login).await
}

pub async fn signup_page(State(state): State<SharedState>, session: ClientSession) -> Result<Response, WebError> {
    auth_page(state, session, View::SignUp).await
}

pub async fn forgot_password_page(State(state): State<SharedState>, session: ClientSession) -> Result<Response, WebError> {
    auth_page(state, session, View::ForgotPassword).await
}

/// On success the notice is carried to the home page.
pub async fn login_submit(
    State(state): State<SharedState>,
    mut session: ClientSession,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, WebError> {
    if let Some(redirect) = guard(&session, View::Login) {
        return Ok(redirect);
    }
    let credentials = Credentials::new(form.email, form.password);
    let notice = state.identity.login(&mut session.auth, &credentials).await;

    if session.auth.is_authenticated() {
        session.flash.push(notice);
        return Ok(redirect(&session, View::Home));
    }
    render_page(&state, &mut session, View::Login, vec![notice], EmailField { email: credentials.email })
}

pub async fn signup_submit(
    State(state): State<SharedState>,
    mut session: ClientSession,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, WebError> {
    if let Some(redirect) = guard(&session, View::SignUp) {
        return Ok(redirect);
    }
    let credentials = Credentials::new(form.email, form.password);
    let notice = state.identity.sign_up(&credentials).await;
    render_page(&state, &mut session, View::SignUp, vec![notice], EmailField { email: credentials.email })
}

pub async fn forgot_password_submit(
    State(state): State<SharedState>,
    mut session: ClientSession,
    Form(form): Form<ResetForm>,
) -> Result<Response, WebError> {
    if let Some(redirect) = guard(&session, View::ForgotPassword) {
        return Ok(redirect);
    }
    let notice = state.identity.send_password_reset(&form.email).await;
    render_page(&state, &mut session, View::ForgotPassword, vec![notice], EmailField { email: form.email })
}

pub async fn logout(State(state): State<SharedState>, mut session: ClientSession) -> Response {
    state.identity.logout(&mut session.auth);
    session.current = None;
    info!(session = %session.id, "logged out");
    redirect(&session, View::Login)
}
