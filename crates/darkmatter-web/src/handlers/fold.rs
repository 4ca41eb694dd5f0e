//! Fold Sequence page: sequence form, prediction, viewer and PDB download.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form,
};
use darkmatter_common::Notice;
use darkmatter_fold::ExamplePreset;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::WebError;
use crate::handlers::{guard, render_page};
use crate::render::{content_disposition, ResultView, VIEWER_SCRIPT};
use crate::session::ClientSession;
use crate::state::{AppState, SharedState};
use crate::views::View;

#[derive(Deserialize)]
pub struct FoldQuery {
    pub example: Option<String>,
}

#[derive(Deserialize)]
pub struct SequenceSubmission {
    #[serde(default)]
    pub sequence: String,
}

#[derive(Serialize)]
struct PresetOption {
    key: &'static str,
    label: &'static str,
    selected: bool,
}

#[derive(Serialize)]
struct FoldBody {
    sequence: String,
    presets: Vec<PresetOption>,
    preset_chosen: bool,
    result: Option<ResultView>,
    viewer_script: &'static str,
}

fn render_fold(state: &AppState, session: &mut ClientSession, notices: Vec<Notice>) -> Result<Response, WebError> {
    let result = match &session.current {
        Some(current) => Some(ResultView::new(current, &state.viewer)?),
        None => None,
    };
    let selected = session.form.preset();
    let body = FoldBody {
        sequence: session.form.text().to_string(),
        presets: ExamplePreset::ALL
            .into_iter()
            .map(|p| PresetOption { key: p.key(), label: p.label(), selected: selected == Some(p) })
            .collect(),
        preset_chosen: selected.is_some(),
        result,
        viewer_script: VIEWER_SCRIPT,
    };
    render_page(state, session, View::FoldSequence, notices, body)
}

pub async fn fold_page(
    State(state): State<SharedState>,
    mut session: ClientSession,
    Query(query): Query<FoldQuery>,
) -> Result<Response, WebError> {
    if let Some(redirect) = guard(&session, View::FoldSequence) {
        return Ok(redirect);
    }
    if let Some(preset) = query.example.as_deref().and_then(ExamplePreset::from_key) {
        session.form.select_preset(preset);
    }
    render_fold(&state, &mut session, Vec::new())
}

/// Runs one prediction. The previous result is replaced on success and
/// cleared on failure.
pub async fn fold_submit(
    State(state): State<SharedState>,
    mut session: ClientSession,
    Form(form): Form<SequenceSubmission>,
) -> Result<Response, WebError> {
    if let Some(redirect) = guard(&session, View::FoldSequence) {
        return Ok(redirect);
    }
    session.form.edit(form.sequence);

    let key = session.scratch_key();
    let sequence = session.form.submission().to_string();
    let notices = match state.pipeline.predict(&key, &sequence).await {
        Ok(result) => {
            info!(session = %session.id, plddt = result.mean_confidence, "prediction ready");
            session.current = Some(result);
            Vec::new()
        }
        Err(e) => {
            warn!(session = %session.id, error = %e, "prediction failed");
            session.current = None;
            e.notices()
        }
    };
    render_fold(&state, &mut session, notices)
}

/// The current prediction as a file, byte-identical to the scratch copy.
pub async fn download(session: ClientSession) -> Response {
    if let Some(redirect) = guard(&session, View::FoldSequence) {
        return redirect;
    }
    match &session.current {
        Some(current) => (
            session.jar(),
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                (header::CONTENT_DISPOSITION, content_disposition()),
            ],
            current.raw_structure_payload.clone(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, session.jar(), "No prediction to download").into_response(),
    }
}
