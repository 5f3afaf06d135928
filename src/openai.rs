//! OpenAI client configuration with sensible defaults.

use crate::error::{Result, TalkRagError};
use async_openai::error::{ApiError, OpenAIError};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for OpenAI API requests (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create an OpenAI client for the given key and optional base URL.
pub fn create_client(api_key: &str, base_url: Option<&str>) -> Result<Client<OpenAIConfig>> {
    create_client_with_timeout(api_key, base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}

/// Create an OpenAI client with a custom timeout.
///
/// `base_url` points the client at an OpenAI-compatible proxy instead of
/// the public API.
pub fn create_client_with_timeout(
    api_key: &str,
    base_url: Option<&str>,
    timeout: Duration,
) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| TalkRagError::Config(format!("Failed to create HTTP client: {}", e)))?;

    let mut config = OpenAIConfig::new().with_api_key(api_key);
    if let Some(base) = base_url {
        config = config.with_api_base(base.trim_end_matches('/'));
    }

    Ok(Client::with_config(config).with_http_client(http_client))
}

/// Convert a client error, keeping whether a retry could help.
///
/// The client already retries plain rate limits on its own; what reaches
/// here is either a server-side failure or a rejection of the request.
pub fn api_error(context: &str, err: OpenAIError) -> TalkRagError {
    let transient = match &err {
        OpenAIError::Reqwest(e) => e.is_timeout() || e.is_connect(),
        OpenAIError::ApiError(api) => is_transient_api_error(api),
        // Gateways answer 5xx with HTML that is not an error object.
        OpenAIError::JSONDeserialize(_) => true,
        _ => false,
    };
    TalkRagError::OpenAI {
        message: format!("{}: {}", context, err),
        transient,
    }
}

fn is_transient_api_error(api: &ApiError) -> bool {
    const TRANSIENT: [&str; 3] = ["server_error", "rate_limit_exceeded", "service_unavailable"];
    let listed = |field: &Option<String>| {
        field
            .as_deref()
            .is_some_and(|value| TRANSIENT.contains(&value))
    };
    listed(&api.r#type) || listed(&api.code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(kind: Option<&str>, code: Option<&str>) -> OpenAIError {
        OpenAIError::ApiError(ApiError {
            message: "failed".to_string(),
            r#type: kind.map(str::to_string),
            param: None,
            code: code.map(str::to_string),
        })
    }

    #[test]
    fn test_rejections_are_not_transient() {
        let rejected = api(Some("invalid_request_error"), Some("invalid_api_key"));
        let err = api_error("embedding", rejected);
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("invalid_api_key"));

        let err = api_error("embedding", api(Some("insufficient_quota"), None));
        assert!(!err.is_retryable());

        let err = api_error("embedding", OpenAIError::InvalidArgument("bad".to_string()));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_server_errors_are_transient() {
        assert!(api_error("chat", api(Some("server_error"), None)).is_retryable());
        assert!(api_error("chat", api(None, Some("rate_limit_exceeded"))).is_retryable());
    }

    #[test]
    fn test_client_accepts_proxy_base() {
        assert!(create_client("sk-test", Some("http://localhost:4000/v1/")).is_ok());
    }
}
