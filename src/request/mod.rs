// Remote reads: timeouts, errors and the shared failure handler

mod resource;

pub use resource::{AssetResource, HttpAssetResource, HttpMapResource, MapResource, MapSettings};

use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::{error, warn};

/// Failure of a remote read
#[derive(Debug, Clone, PartialEq)]
pub enum RequestError {
    /// No response within the timeout boundary (milliseconds)
    Timeout(u64),
    /// Non-success HTTP status
    Status(u16),
    Transport(String),
    Decode(String),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Timeout(ms) => write!(f, "request timed out after {}ms", ms),
            RequestError::Status(code) => write!(f, "request failed with status {}", code),
            RequestError::Transport(e) => write!(f, "request failed: {}", e),
            RequestError::Decode(e) => write!(f, "invalid response body: {}", e),
        }
    }
}

impl std::error::Error for RequestError {}

impl From<reqwest::Error> for RequestError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RequestError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            RequestError::Status(status.as_u16())
        } else {
            RequestError::Transport(e.to_string())
        }
    }
}

/// Shared handler every presenter delegates read failures to
pub trait RequestErrorHandler: Send + Sync {
    fn handle(&self, error: &RequestError);
}

/// Reports request failures through `tracing`
#[derive(Debug, Default, Clone)]
pub struct TracingErrorHandler;

impl RequestErrorHandler for TracingErrorHandler {
    fn handle(&self, error: &RequestError) {
        match error {
            RequestError::Timeout(_) => warn!(error = %error, "Remote request timed out"),
            _ => error!(error = %error, "Remote request failed"),
        }
    }
}

/// Run a remote read with a timeout boundary.
///
/// Returns [`RequestError::Timeout`] if `request` doesn't complete within
/// `timeout_ms` milliseconds; the request future is dropped in that case.
pub async fn execute<T, F>(request: F, timeout_ms: u64) -> Result<T, RequestError>
where
    F: Future<Output = Result<T, RequestError>>,
{
    match tokio::time::timeout(Duration::from_millis(timeout_ms), request).await {
        Ok(result) => result,
        Err(_) => Err(RequestError::Timeout(timeout_ms)),
    }
}
