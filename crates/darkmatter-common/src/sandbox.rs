use reqwest::{Client, ClientBuilder};
use std::collections::HashSet;
use std::time::Duration;
use tracing::warn;
use url::Url;
use crate::error::DarkMatterError;

/// Default per-request timeout for outbound calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A Sandbox-capped HTTP Client that only allows requests to approved domains.
/// Every outbound call of the server (identity provider, folding API) goes through it.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl SandboxClient {
    /// Creates a new SandboxClient with the default allowlist and timeout.
    pub fn new() -> Result<Self, DarkMatterError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Creates a new SandboxClient whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, DarkMatterError> {
        let mut allowlist = HashSet::new();
        // Default Dark Matter allowlist
        let domains = vec![
            "api.esmatlas.com",               // ESMFold
            "identitytoolkit.googleapis.com", // Firebase Auth
            "localhost",                      // Local development
            "127.0.0.1",                      // Localhost alt
        ];

        for d in domains {
            allowlist.insert(d.to_string());
        }

        let client = ClientBuilder::new()
            .timeout(timeout)
            .build()
            .map_err(|e| DarkMatterError::Client(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, allowlist })
    }

    /// Appends an exact hostname to the allowlist.
    pub fn allow_domain(&mut self, domain: &str) {
        self.allowlist.insert(domain.to_string());
    }

    /// Appends the host of `url` to the allowlist. Used for configured endpoints.
    pub fn allow_url(&mut self, url: &str) -> Result<(), DarkMatterError> {
        let parsed = Url::parse(url)
            .map_err(|e| DarkMatterError::Security(format!("Invalid URL {}: {}", url, e)))?;
        match parsed.host_str() {
            Some(host) => {
                self.allow_domain(host);
                Ok(())
            }
            None => Err(DarkMatterError::Security(format!("URL has no host: {}", url))),
        }
    }

    /// Validates if a URL is permitted under the current sandbox policy.
    pub fn is_allowed(&self, url: &str) -> bool {
        if let Ok(parsed) = Url::parse(url) {
            if let Some(host) = parsed.host_str() {
                // Check exact match or if it's a subdomain of an allowed domain
                for allowed in &self.allowlist {
                    if host == allowed || host.ends_with(&format!(".{}", allowed)) {
                        return true;
                    }
                }
            }
        }
        false
    }

    fn check(&self, url: &str) -> Result<(), DarkMatterError> {
        if !self.is_allowed(url) {
            // Only the host is reported; query strings may hold API keys.
            let host = Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_owned));
            let host = host.as_deref().unwrap_or("<invalid>");
            warn!(host, "blocked outbound request to non-allowlisted host");
            return Err(DarkMatterError::Security(format!(
                "Network capabilities capped: domain not in allowlist: {}",
                host
            )));
        }
        Ok(())
    }

    /// Exposes the inner `reqwest::Client` builder pattern safely for POST requests.
    pub fn post(&self, url: &str) -> Result<reqwest::RequestBuilder, DarkMatterError> {
        self.check(url)?;
        Ok(self.client.post(url))
    }
}
