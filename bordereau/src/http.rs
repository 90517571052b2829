//! HTTP client abstraction for testability
//!
//! The pipeline is synchronous: every feature query and map request is a
//! blocking call on the request thread, so only a blocking client is provided.

use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Errors produced by an [`HttpClient`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HttpError {
    /// The client itself could not be built
    #[error("Failed to create HTTP client: {0}")]
    Client(String),

    /// Connection, DNS or timeout failure
    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// Server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// The response body could not be read
    #[error("Failed to read response from {url}: {message}")]
    Body { url: String, message: String },
}

/// A response body together with its declared content type.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// Value of the `Content-Type` header, if any
    pub content_type: Option<String>,
    /// Raw response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a response with the given content type and body.
    pub fn new(content_type: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            content_type: Some(content_type.into()),
            body,
        }
    }

    /// Returns true when the declared content type contains `needle`.
    pub fn content_type_contains(&self, needle: &str) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.to_ascii_lowercase().contains(needle))
            .unwrap_or(false)
    }
}

/// Trait for synchronous HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request.
    ///
    /// # Arguments
    ///
    /// * `url` - The fully built request URL
    ///
    /// # Returns
    ///
    /// The response body and content type, or an error for transport
    /// failures and non-success statuses.
    fn get(&self, url: &str) -> Result<HttpResponse, HttpError>;
}

/// Default User-Agent string for HTTP requests.
const DEFAULT_USER_AGENT: &str = concat!("bordereau/", env!("CARGO_PKG_VERSION"));

/// Default timeout applied when the configuration does not override it.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Real HTTP client implementation using blocking reqwest.
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a new ReqwestClient with the default timeout.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a new ReqwestClient with custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, HttpError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|e| HttpError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        trace!(url = url, "HTTP GET request starting");

        let response = match self.client.get(url).send() {
            Ok(resp) => {
                debug!(
                    url = url,
                    status = resp.status().as_u16(),
                    "HTTP response received"
                );
                resp
            }
            Err(e) => {
                warn!(
                    url = url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(HttpError::Request {
                    url: url.to_string(),
                    message: e.to_string(),
                });
            }
        };

        if !response.status().is_success() {
            return Err(HttpError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.bytes().map_err(|e| HttpError::Body {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        trace!(url = url, bytes = body.len(), "HTTP response body read");

        Ok(HttpResponse {
            content_type,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock HTTP client for testing.
    ///
    /// Responses are chosen by the first route whose key is contained in the
    /// requested URL; unmatched URLs fail like an unreachable host. Every
    /// requested URL is recorded.
    #[derive(Default)]
    pub struct MockHttpClient {
        routes: Vec<(String, Result<HttpResponse, HttpError>)>,
        calls: Mutex<Vec<String>>,
    }

    impl MockHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        /// Adds a route answering any URL that contains `key`.
        pub fn route(mut self, key: &str, response: Result<HttpResponse, HttpError>) -> Self {
            self.routes.push((key.to_string(), response));
            self
        }

        /// All URLs requested so far.
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        /// Number of requested URLs containing `key`.
        pub fn calls_to(&self, key: &str) -> usize {
            self.calls().iter().filter(|url| url.contains(key)).count()
        }
    }

    impl HttpClient for MockHttpClient {
        fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
            self.calls.lock().unwrap().push(url.to_string());
            self.routes
                .iter()
                .find(|(key, _)| url.contains(key.as_str()))
                .map(|(_, response)| response.clone())
                .unwrap_or_else(|| {
                    Err(HttpError::Request {
                        url: url.to_string(),
                        message: "connection refused".to_string(),
                    })
                })
        }
    }

    #[test]
    fn test_mock_client_routes_by_substring() {
        let mock = MockHttpClient::new().route(
            "wfs",
            Ok(HttpResponse::new("application/json", vec![1, 2, 3])),
        );

        let result = mock.get("http://example.com/wfs?REQUEST=GetFeature");
        assert_eq!(result.unwrap().body, vec![1, 2, 3]);
        assert_eq!(mock.calls_to("wfs"), 1);
    }

    #[test]
    fn test_mock_client_unmatched_is_unreachable() {
        let mock = MockHttpClient::new();

        let result = mock.get("http://example.com/wms");
        assert!(matches!(result, Err(HttpError::Request { .. })));
        assert_eq!(mock.calls().len(), 1);
    }

    #[test]
    fn test_content_type_contains_is_case_insensitive() {
        let response = HttpResponse::new("Application/VND.OGC.SE_XML", vec![]);
        assert!(response.content_type_contains("vnd.ogc.se_xml"));

        let untyped = HttpResponse {
            content_type: None,
            body: vec![],
        };
        assert!(!untyped.content_type_contains("xml"));
    }

    #[test]
    fn test_status_error_display() {
        let err = HttpError::Status {
            url: "http://example.com".to_string(),
            status: 503,
        };
        assert_eq!(err.to_string(), "HTTP 503 from http://example.com");
    }

    #[test]
    fn test_reqwest_client_builds() {
        assert!(ReqwestClient::with_timeout(5).is_ok());
    }
}
