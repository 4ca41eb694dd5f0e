//! Result rendering: the 3Dmol.js viewer configuration and the prediction summary.

use darkmatter_fold::PredictionResult;
use serde::Serialize;

use crate::error::WebError;

pub const PLDDT_EXPLANATION: &str =
    "plDDT is a per-residue estimate of the confidence in prediction on a scale from 0-100.";
pub const DOWNLOAD_FILENAME: &str = "predicted.pdb";
pub const VIEWER_SCRIPT: &str = "https://3Dmol.org/build/3Dmol-min.js";

/// Settings handed to the client-side viewer.
#[derive(Debug, Clone, Serialize)]
pub struct ViewerConfig {
    pub style: &'static str,
    pub color: &'static str,
    pub background: &'static str,
    pub zoom_factor: f64,
    pub zoom_ms: u32,
    pub spin: bool,
    pub width: u32,
    pub height: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            style: "cartoon",
            color: "spectrum",
            background: "white",
            zoom_factor: 2.0,
            zoom_ms: 800,
            spin: true,
            width: 800,
            height: 500,
        }
    }
}

/// Everything the fold template needs to show one prediction.
#[derive(Debug, Serialize)]
pub struct ResultView {
    pub viewer_json: String,
    pub payload_json: String,
    pub plddt: String,
    pub explanation: &'static str,
    pub download_name: &'static str,
    pub width: u32,
    pub height: u32,
}

impl ResultView {
    pub fn new(result: &PredictionResult, viewer: &ViewerConfig) -> Result<Self, WebError> {
        Ok(Self {
            viewer_json: script_json(viewer)?,
            payload_json: script_json(&result.raw_structure_payload)?,
            plddt: format_plddt(result.mean_confidence),
            explanation: PLDDT_EXPLANATION,
            download_name: DOWNLOAD_FILENAME,
            width: viewer.width,
            height: viewer.height,
        })
    }
}

/// Serialize for embedding inside a `<script>` element.
pub fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String, WebError> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// The mean is already rounded to 4 decimals. Whole values keep one decimal
/// place, so 25 prints as `25.0`.
pub fn format_plddt(value: f64) -> String {
    format!("{:?}", value)
}

pub fn content_disposition() -> String {
    format!("attachment; filename=\"{}\"", DOWNLOAD_FILENAME)
}
