//! Outbound probes for site-level network checks
//!
//! Only idempotent GETs with a bounded timeout. A timeout, a transport error,
//! a non-2xx status or an HTML page where data was expected all read as
//! "not found"; nothing here is retried.

use crossbeam_channel::bounded;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_USER_AGENT: &str = concat!("sitegrade/", env!("CARGO_PKG_VERSION"));

/// Errors from a single probe attempt
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("Failed to read body of {url}: {message}")]
    Body { url: String, message: String },
}

/// A fetched response, body already read
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl FetchResponse {
    pub fn ok(url: impl Into<String>, content_type: &str, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: 200,
            content_type: Some(content_type.to_string()),
            body: body.into(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether this is an HTML document (often a soft-404 page)
    pub fn looks_like_html(&self) -> bool {
        if self
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("html"))
        {
            return true;
        }
        let head: String = self
            .body
            .trim_start_matches('\u{feff}')
            .trim_start()
            .chars()
            .take(256)
            .collect::<String>()
            .to_ascii_lowercase();
        head.starts_with("<!doctype html") || head.starts_with("<html") || head.contains("<html")
    }
}

/// GET seam used by network executors
pub trait Fetcher: Send + Sync {
    fn get(&self, url: &str) -> Result<FetchResponse, FetchError>;
}

/// Blocking HTTP fetcher via ureq (no tokio needed)
pub struct HttpFetcher {
    agent: ureq::Agent,
    user_agent: String,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: impl Into<String>) -> Self {
        let agent = ureq::config::Config::builder()
            .http_status_as_error(false) // status codes are scoring signals, not errors
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self {
            agent,
            user_agent: user_agent.into(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_TIMEOUT, DEFAULT_USER_AGENT)
    }
}

impl Fetcher for HttpFetcher {
    fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let response = self
            .agent
            .get(url)
            .header("User-Agent", &self.user_agent)
            .call()
            .map_err(|e| match e {
                ureq::Error::Timeout(_) => FetchError::Timeout {
                    url: url.to_string(),
                },
                other => FetchError::Transport {
                    url: url.to_string(),
                    message: other.to_string(),
                },
            })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .into_body()
            .read_to_string()
            .map_err(|e| FetchError::Body {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(FetchResponse {
            url: url.to_string(),
            status,
            content_type,
            body,
        })
    }
}

/// Canned responses keyed by URL; anything else fails like a refused connection
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    responses: HashMap<String, FetchResponse>,
}

impl StaticFetcher {
    /// A fetcher for which every request fails
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn with(mut self, response: FetchResponse) -> Self {
        self.responses.insert(response.url.clone(), response);
        self
    }
}

impl Fetcher for StaticFetcher {
    fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Transport {
                url: url.to_string(),
                message: "connection refused".to_string(),
            })
    }
}

/// Probe all `urls` concurrently and return the first response `accept` approves.
///
/// Remaining probes are left to finish on their own (bounded by the fetcher's
/// timeout); their results are ignored.
pub fn first_success<F>(fetcher: &Arc<dyn Fetcher>, urls: &[String], accept: F) -> Option<FetchResponse>
where
    F: Fn(&FetchResponse) -> bool + Send + Sync + 'static,
{
    if urls.is_empty() {
        return None;
    }

    let (tx, rx) = bounded::<Option<FetchResponse>>(urls.len());
    let accept = Arc::new(accept);
    let mut spawned = 0usize;

    for url in urls {
        let tx = tx.clone();
        let fetcher = Arc::clone(fetcher);
        let accept = Arc::clone(&accept);
        let url = url.clone();
        let handle = std::thread::Builder::new()
            .name("sitegrade-probe".to_string())
            .spawn(move || {
                let outcome = match fetcher.get(&url) {
                    Ok(resp) if accept(&resp) => Some(resp),
                    Ok(resp) => {
                        debug!("Probe {} rejected (HTTP {})", url, resp.status);
                        None
                    }
                    Err(e) => {
                        debug!("Probe failed: {}", e);
                        None
                    }
                };
                // Receiver may be gone once a winner was found
                let _ = tx.send(outcome);
            });
        match handle {
            Ok(_) => spawned += 1,
            Err(e) => warn!("Failed to spawn probe thread: {}", e),
        }
    }
    drop(tx);

    rx.iter().take(spawned).flatten().next()
}
