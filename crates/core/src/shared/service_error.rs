use thiserror::Error;

/// Failure talking to one of the remote REST services.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("invalid request URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}: {body}")]
    Status { url: String, status: u16, body: String },
    #[error("unexpected response body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{url} returned continuation marker {marker:?} again")]
    RepeatedMarker { url: String, marker: String },
}

impl ServiceError {
    /// HTTP status of a non-success response, if that is what failed.
    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether repeating the same request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ServiceError::Transport { .. } => true,
            ServiceError::Status { status, .. } => {
                matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn status(code: u16) -> ServiceError {
        ServiceError::Status {
            url: "https://example.test/x".to_string(),
            status: code,
            body: "{}".to_string(),
        }
    }

    #[rstest]
    #[case::too_many_requests(429, true)]
    #[case::service_unavailable(503, true)]
    #[case::internal(500, true)]
    #[case::unauthorized(401, false)]
    #[case::not_found(404, false)]
    #[case::bad_request(400, false)]
    fn test_transient_statuses(#[case] code: u16, #[case] expected: bool) {
        assert_eq!(status(code).is_transient(), expected);
    }

    #[test]
    fn test_status_accessor() {
        assert_eq!(status(404).status(), Some(404));
        let decode = ServiceError::Decode {
            url: String::new(),
            source: serde_json::from_str::<u32>("x").unwrap_err(),
        };
        assert_eq!(decode.status(), None);
        assert!(!decode.is_transient());
    }

    #[test]
    fn test_status_message_carries_body() {
        let err = ServiceError::Status {
            url: "https://example.test/persongroups/g".to_string(),
            status: 401,
            body: r#"{"error":{"code":"Unspecified"}}"#.to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("401"));
        assert!(message.contains("Unspecified"));
    }
}
