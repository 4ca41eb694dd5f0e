//! Orchestrator for one prediction: fold → scratch file → parse → mean plDDT.

use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::client::{FoldError, StructurePredictor};
use crate::pdb::{round_to, Structure};
use crate::scratch::ScratchSpace;

/// Outcome of a successful submission. Only the latest one is kept per session.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResult {
    pub raw_structure_payload: String,
    /// Mean per-residue plDDT, rounded to 4 decimals.
    pub mean_confidence: f64,
    pub residue_count: usize,
    pub scratch_path: PathBuf,
}

#[derive(Clone)]
pub struct PredictionPipeline {
    predictor: Arc<dyn StructurePredictor>,
    scratch: ScratchSpace,
}

impl PredictionPipeline {
    pub fn new(predictor: Arc<dyn StructurePredictor>, scratch: ScratchSpace) -> Self {
        Self { predictor, scratch }
    }

    pub fn scratch(&self) -> &ScratchSpace {
        &self.scratch
    }

    /// Run one submission. The sequence is forwarded verbatim.
    ///
    /// The payload is written to the scratch file of `scratch_key` and read
    /// back through the parser; a file without models aborts the submission.
    #[instrument(skip(self, sequence), fields(residues = sequence.len()))]
    pub async fn predict(&self, scratch_key: &str, sequence: &str) -> Result<PredictionResult, FoldError> {
        let payload = self.predictor.fold(sequence).await?;
        let path = self.scratch.write(scratch_key, &payload).await.map_err(FoldError::Scratch)?;

        let summary = Structure::read(&path)?.confidence(1)?;
        let residues = summary.residue_count();
        let mean_confidence = round_to(summary.mean_confidence(), 4);

        info!(residues, mean_confidence, "prediction parsed");
        Ok(PredictionResult {
            raw_structure_payload: payload,
            mean_confidence,
            residue_count: residues,
            scratch_path: path,
        })
    }
}
