//! Point-of-interest provider error types.

/// Errors from a point-of-interest search provider.
#[derive(Debug, thiserror::Error)]
pub enum PlacesError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider rejected our credentials or user agent
    #[error("unauthorized: provider rejected the request")]
    Unauthorized,

    /// Rate limited by the provider
    #[error("rate limited by place search provider")]
    RateLimited,

    /// Provider returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Provider could not be set up (bad fixture, bad header value)
    #[error("not configured: {0}")]
    NotConfigured(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PlacesError::Api {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "API error 500: Internal Server Error");

        let err = PlacesError::Json {
            message: "expected value".into(),
        };
        assert!(err.to_string().contains("expected value"));

        assert_eq!(
            PlacesError::RateLimited.to_string(),
            "rate limited by place search provider"
        );
    }
}
