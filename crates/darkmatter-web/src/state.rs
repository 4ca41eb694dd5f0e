//! Shared application state for the web server.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use darkmatter_auth::{FirebaseProvider, IdentityGateway, IdentityProvider, UnconfiguredProvider};
use darkmatter_common::SandboxClient;
use darkmatter_config::Config;
use darkmatter_fold::{EsmFoldClient, PredictionPipeline, RetryPolicy, ScratchSpace};
use tracing::{info, warn};

use crate::render::ViewerConfig;
use crate::session::SessionStore;
use crate::templates::Templates;

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub identity: IdentityGateway,
    pub pipeline: PredictionPipeline,
    pub sessions: SessionStore,
    pub templates: Templates,
    pub viewer: ViewerConfig,
    pub started_at: DateTime<Utc>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(identity: IdentityGateway, pipeline: PredictionPipeline, session_idle: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            identity,
            pipeline,
            sessions: SessionStore::new(session_idle),
            templates: Templates::new()?,
            viewer: ViewerConfig::default(),
            started_at: Utc::now(),
        })
    }

    /// Wire the live identity provider and folding client from configuration.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let Config { server, identity, folding, scratch } = config;

        let provider: Arc<dyn IdentityProvider> = match identity.api_key {
            Some(key) => {
                let mut client = SandboxClient::new()?;
                client.allow_url(&identity.base_url)?;
                info!(base_url = %identity.base_url, "using Firebase identity provider");
                Arc::new(FirebaseProvider::new(identity.base_url, key, client))
            }
            None => {
                warn!("identity provider not configured; every sign-in will fail");
                Arc::new(UnconfiguredProvider)
            }
        };

        let mut fold_client = SandboxClient::with_timeout(folding.timeout())?;
        fold_client.allow_url(&folding.endpoint)?;
        let retry = RetryPolicy::new(folding.max_retries, folding.initial_backoff());
        let predictor = EsmFoldClient::new(fold_client, folding.endpoint, retry);
        info!(endpoint = %predictor.endpoint(), scratch = %scratch.dir.display(), "folding client ready");

        let pipeline = PredictionPipeline::new(Arc::new(predictor), ScratchSpace::new(&scratch.dir));
        Self::new(IdentityGateway::new(provider), pipeline, server.session_idle())
    }
}
