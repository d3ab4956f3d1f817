use crate::config::PROVIDER_TIMEOUT;

/// Preconfigured HTTP client for calls against the provider.
///
/// The timeout bounds every token-info fetch and token refresh; a
/// hanging provider call fails the authentication attempt instead of
/// blocking the request indefinitely.
pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(PROVIDER_TIMEOUT)
        .build()
        .expect("Failed to create reqwest client")
}
