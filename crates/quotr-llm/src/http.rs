//! Shared HTTP client construction for consistent timeout and TLS configuration.

use std::time::Duration;

/// Build the HTTP client used by remote providers.
///
/// `request_timeout` bounds the whole request; connects are bounded separately
/// so an unreachable host fails fast.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialised.
pub fn build_client(request_timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(30).min(request_timeout))
        .timeout(request_timeout)
        .user_agent(concat!("quotr/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
}
