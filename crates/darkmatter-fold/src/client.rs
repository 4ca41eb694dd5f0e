//! ESMFold API client.
//!
//! Endpoint: POST https://api.esmatlas.com/foldSequence/v1/pdb/
//!   body:     the raw sequence, sent as application/x-www-form-urlencoded
//!   response: PDB text with plDDT in the B-factor column

use async_trait::async_trait;
use darkmatter_common::{DarkMatterError, Notice, SandboxClient};
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::pdb::StructureError;
use crate::retry::{is_retryable_status, RetryPolicy};

#[derive(Debug, Error)]
pub enum FoldError {
    #[error("folding request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Sandbox(#[from] DarkMatterError),

    #[error("folding response is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    #[error("failed to write scratch file: {0}")]
    Scratch(#[source] std::io::Error),

    #[error(transparent)]
    Structure(#[from] StructureError),
}

impl FoldError {
    /// What the user sees when a submission is aborted.
    ///
    /// A structure file that fails to parse is reported like one without
    /// models; the parser detail only goes to the log.
    pub fn notices(&self) -> Vec<Notice> {
        match self {
            FoldError::Structure(_) => vec![
                Notice::error(StructureError::NoModels(1).to_string()),
                Notice::warning("Try another sequence!"),
            ],
            _ => vec![Notice::error("Unexpected error. Try later.")],
        }
    }
}

/// Something that turns a sequence into structure-file text.
#[async_trait]
pub trait StructurePredictor: Send + Sync {
    async fn fold(&self, sequence: &str) -> Result<String, FoldError>;
}

pub struct EsmFoldClient {
    client: SandboxClient,
    endpoint: String,
    retry: RetryPolicy,
}

impl EsmFoldClient {
    pub fn new(client: SandboxClient, endpoint: impl Into<String>, retry: RetryPolicy) -> Self {
        Self { client, endpoint: endpoint.into(), retry }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send_once(&self, sequence: &str) -> Result<reqwest::Response, FoldError> {
        let resp = self
            .client
            .post(&self.endpoint)?
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(sequence.to_owned())
            .send()
            .await?;
        Ok(resp)
    }
}

#[async_trait]
impl StructurePredictor for EsmFoldClient {
    /// Posts the sequence verbatim and returns the decoded response body.
    ///
    /// Transport errors, 429 and 5xx are retried per the policy. Any other
    /// status is final and its body is returned as-is; the structure parser
    /// decides whether it holds a model.
    #[instrument(skip(self, sequence), fields(residues = sequence.len()))]
    async fn fold(&self, sequence: &str) -> Result<String, FoldError> {
        let mut retries = 0;
        loop {
            match self.send_once(sequence).await {
                Ok(resp) if is_retryable_status(resp.status()) && self.retry.should_retry(retries) => {
                    let delay = self.retry.backoff(retries);
                    warn!(status = resp.status().as_u16(), ?delay, "ESMFold busy, retrying");
                    drop(resp);
                    tokio::time::sleep(delay).await;
                    retries += 1;
                }
                Ok(resp) => {
                    let status = resp.status();
                    if !status.is_success() {
                        warn!(status = status.as_u16(), "ESMFold returned an error status");
                    }
                    let bytes = resp.bytes().await?;
                    let text = String::from_utf8(bytes.to_vec())?;
                    info!(status = status.as_u16(), bytes = text.len(), retries, "ESMFold responded");
                    return Ok(text);
                }
                Err(FoldError::Http(e)) if self.retry.should_retry(retries) => {
                    let delay = self.retry.backoff(retries);
                    warn!(error = %e, ?delay, "ESMFold request failed, retrying");
                    tokio::time::sleep(delay).await;
                    retries += 1;
                }
                Err(e) => {
                    debug!(error = %e, "ESMFold request failed");
                    return Err(e);
                }
            }
        }
    }
}
