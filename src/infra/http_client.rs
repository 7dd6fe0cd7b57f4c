//! HTTP client factory with consistent timeout configuration.
//!
//! Provider clients should be built here rather than constructing
//! `reqwest::Client` directly.

use reqwest::Client;
use std::time::Duration;

/// Default connect timeout (TCP handshake + TLS).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Build an HTTP client with the default connect timeout and an optional
/// total request timeout.
///
/// The mirror imposes no request timeout of its own; callers that need one
/// pass it in (see `PROVIDER_TIMEOUT_SECS`).
pub fn try_build_client(request_timeout: Option<Duration>) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder().connect_timeout(DEFAULT_CONNECT_TIMEOUT);
    if let Some(timeout) = request_timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}
