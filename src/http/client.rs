//! HTTP client wrapper with per-request timeout and request tracking

use crate::error::Result;
use crate::models::{ProbeOutcome, ScanConfig};
use reqwest::Client;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP client wrapper with request counting.
///
/// `probe` never returns an error: every transport failure is folded into
/// the returned [`ProbeOutcome`] so one bad request cannot take down a
/// worker.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    request_count: Arc<AtomicU64>,
}

impl HttpClient {
    /// Creates a new HttpClient from scan configuration
    pub fn from_config(config: &ScanConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            });

        if config.insecure {
            // Insecure by choice: accepts self-signed and otherwise invalid
            // certificates on the scanned target.
            warn!("TLS certificate verification disabled (--insecure)");
            builder = builder.danger_accept_invalid_certs(true);
        }

        Ok(Self {
            client: builder.build()?,
            request_count: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Sends a single GET request and normalizes the result.
    ///
    /// One attempt per call, no retries. Connect, DNS, TLS and timeout
    /// failures all surface as an outcome carrying only the error
    /// description.
    pub async fn probe(&self, url: &str) -> ProbeOutcome {
        self.request_count.fetch_add(1, Ordering::Relaxed);

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("GET {url} failed: {e}");
                return ProbeOutcome::failed(e.to_string());
            }
        };

        let status = response.status().as_u16();
        match response.text().await {
            Ok(body) => {
                debug!("GET {url} -> {status}");
                ProbeOutcome::response(status, body)
            }
            Err(e) => {
                warn!("reading body from {url} failed: {e}");
                ProbeOutcome::failed(e.to_string())
            }
        }
    }

    /// Returns the total number of requests made
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }
}
