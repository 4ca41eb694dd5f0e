//! HTTP handlers for all web routes.

pub mod auth;
pub mod fold;
pub mod home;
pub mod system;

use axum::response::{IntoResponse, Redirect, Response};
use darkmatter_common::Notice;
use serde::Serialize;

use crate::error::WebError;
use crate::session::ClientSession;
use crate::state::AppState;
use crate::views::{menu, resolve, AuthState, MenuEntry, View};

/// Context shared by every page, with the page's own fields flattened in.
#[derive(Serialize)]
struct Page<T: Serialize> {
    title: &'static str,
    menu: Vec<MenuEntry>,
    notices: Vec<Notice>,
    authenticated: bool,
    #[serde(flatten)]
    body: T,
}

/// Redirect to the state's default screen when `requested` is not reachable.
pub(crate) fn guard(session: &ClientSession, requested: View) -> Option<Response> {
    let resolved = resolve(AuthState::from(&session.auth), requested);
    (resolved != requested).then(|| redirect(session, resolved))
}

pub(crate) fn redirect(session: &ClientSession, to: View) -> Response {
    (session.jar(), Redirect::to(to.path())).into_response()
}

/// Render `view` with pending flash notices followed by `notices`.
pub(crate) fn render_page<T: Serialize>(
    state: &AppState,
    session: &mut ClientSession,
    view: View,
    notices: Vec<Notice>,
    body: T,
) -> Result<Response, WebError> {
    let mut all = session.take_flash();
    all.extend(notices);
    let page = Page {
        title: view.title(),
        menu: menu(view),
        notices: all,
        authenticated: session.auth.is_authenticated(),
        body,
    };
    let html = state.templates.render(template_for(view), page)?;
    Ok((session.jar(), html).into_response())
}

fn template_for(view: View) -> &'static str {
    match view {
        View::Login          => "login.html",
        View::SignUp         => "signup.html",
        View::ForgotPassword => "forgot_password.html",
        View::Home           => "home.html",
        View::FoldSequence   => "fold.html",
    }
}
