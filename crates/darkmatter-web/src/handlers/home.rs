use axum::{extract::State, response::Response};
use serde::Serialize;

use crate::error::WebError;
use crate::handlers::{guard, render_page};
use crate::session::ClientSession;
use crate::state::SharedState;
use crate::views::View;

#[derive(Serialize)]
struct Static {}

pub async fn home(State(state): State<SharedState>, mut session: ClientSession) -> Result<Response, WebError> {
    if let Some(redirect) = guard(&session, View::Home) {
        return Ok(redirect);
    }
    render_page(&state, &mut session, View::Home, Vec::new(), Static {})
}
