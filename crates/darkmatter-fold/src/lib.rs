//! Dark Matter Fold - structure prediction for a single amino-acid sequence.
//!
//! This crate handles the folding half of Dark Matter:
//! 1. Collecting the sequence (default text and example presets)
//! 2. Posting it to the ESMFold API
//! 3. Writing the returned PDB text to a per-session scratch file
//! 4. Parsing the scratch file and averaging per-residue plDDT

pub mod client;
pub mod form;
pub mod pdb;
pub mod pipeline;
pub mod retry;
pub mod scratch;

pub use client::{EsmFoldClient, FoldError, StructurePredictor};
pub use form::{ExamplePreset, SequenceForm, DEFAULT_SEQUENCE};
pub use pdb::{ConfidenceSummary, Structure, StructureError};
pub use pipeline::{PredictionPipeline, PredictionResult};
pub use retry::RetryPolicy;
pub use scratch::ScratchSpace;
