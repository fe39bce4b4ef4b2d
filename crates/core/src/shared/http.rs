use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::shared::constants::REQUEST_TIMEOUT;
use crate::shared::service_error::ServiceError;

pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Query parameters whose values are credentials and must never be logged.
const SECRET_QUERY_KEYS: &[&str] = &["sig", "subscription-key", "accessToken"];

/// Blocking HTTP client shared by the REST adapters.
///
/// Attaches the subscription key header when one is configured, logs every
/// outgoing request URL, and turns non-success statuses into
/// [`ServiceError::Status`] with the response body attached.
pub struct ServiceClient {
    http: Client,
    api_key: Option<String>,
}

impl ServiceClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ServiceError> {
        Self::build(Some(api_key.into()))
    }

    /// Client for endpoints authenticated in the URL itself (SAS tokens).
    pub fn anonymous() -> Result<Self, ServiceError> {
        Self::build(None)
    }

    fn build(api_key: Option<String>) -> Result<Self, ServiceError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ServiceError::Client)?;
        Ok(Self { http, api_key })
    }

    /// Sends a request without a body and returns the raw response text.
    pub fn send(&self, method: Method, url: &str) -> Result<String, ServiceError> {
        let request = self.request(method, url);
        self.execute(request, url)
    }

    /// Sends a JSON body and returns the raw response text.
    pub fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: &B,
    ) -> Result<String, ServiceError> {
        let request = self.request(method, url).json(body);
        self.execute(request, url)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        log::info!("{method} {}", redact_url(url));
        let request = self.http.request(method, url);
        match &self.api_key {
            Some(key) => request.header(SUBSCRIPTION_KEY_HEADER, key),
            None => request,
        }
    }

    fn execute(&self, request: RequestBuilder, url: &str) -> Result<String, ServiceError> {
        // reqwest's Display repeats the full URL, SAS signature included.
        let transport = |source: reqwest::Error| ServiceError::Transport {
            url: redact_url(url),
            source: source.without_url(),
        };
        let response = request.send().map_err(transport)?;
        let status = response.status();
        let body = response.text().map_err(transport)?;
        if !status.is_success() {
            return Err(ServiceError::Status {
                url: redact_url(url),
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

/// Parses a JSON response body into its typed representation.
pub fn decode<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, ServiceError> {
    serde_json::from_str(body).map_err(|source| ServiceError::Decode {
        url: redact_url(url),
        source,
    })
}

/// Replaces credential-bearing query values with `REDACTED`.
///
/// Unparseable input is returned unchanged.
pub fn redact_url(url: &str) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_string();
    };
    let has_secret = parsed
        .query_pairs()
        .any(|(k, _)| SECRET_QUERY_KEYS.contains(&k.as_ref()));
    if !has_secret {
        return url.to_string();
    }
    let pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(k, v)| {
            if SECRET_QUERY_KEYS.contains(&k.as_ref()) {
                (k.into_owned(), "REDACTED".to_string())
            } else {
                (k.into_owned(), v.into_owned())
            }
        })
        .collect();
    parsed.query_pairs_mut().clear().extend_pairs(pairs);
    parsed.to_string()
}
