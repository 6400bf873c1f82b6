//! HTTP invoker implementation using reqwest.
//!
//! Sends the single request a test describes and hands the raw response
//! back to the test method. Nothing is retried.

use std::collections::HashMap;
use std::time::Instant;

use alt_application::ports::{HttpInvoker, InvokeError, RequestBody, RequestOptions};
use alt_domain::{ApiResponse, HttpMethod};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use tracing::debug;

const USER_AGENT: &str = concat!("alt/", env!("CARGO_PKG_VERSION"));

/// [`HttpInvoker`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestInvoker {
    client: Client,
}

impl ReqwestInvoker {
    /// Creates an invoker with default settings.
    ///
    /// Follows up to 10 redirects and verifies TLS certificates. No request
    /// timeout is set beyond the client's defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new() -> Result<Self, InvokeError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| InvokeError::Transport(e.to_string()))?;

        Ok(Self { client })
    }

    /// Creates an invoker with a custom reqwest client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Options => Method::OPTIONS,
        }
    }

    fn build_body(
        builder: reqwest::RequestBuilder,
        body: &RequestBody,
    ) -> Result<reqwest::RequestBuilder, InvokeError> {
        match body {
            RequestBody::None => Ok(builder),
            RequestBody::Json(value) => Ok(builder.json(value)),
            RequestBody::Form(fields) => {
                let encoded =
                    serde_urlencoded::to_string(fields).map_err(|e| InvokeError::InvalidOption {
                        key: "form".to_string(),
                        reason: e.to_string(),
                    })?;
                Ok(builder
                    .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(encoded))
            }
        }
    }

    fn map_error(error: &reqwest::Error) -> InvokeError {
        let target = error
            .url()
            .map_or_else(|| "unknown url".to_string(), ToString::to_string);

        if error.is_connect() {
            return InvokeError::Transport(format!("could not connect to {target}: {error}"));
        }
        if error.is_timeout() {
            return InvokeError::Transport(format!("request to {target} timed out"));
        }
        if error.is_redirect() {
            return InvokeError::Transport(format!("too many redirects from {target}"));
        }
        InvokeError::Transport(error.to_string())
    }
}

#[async_trait]
impl HttpInvoker for ReqwestInvoker {
    async fn invoke(&self, options: &RequestOptions) -> Result<ApiResponse, InvokeError> {
        if !options.silent {
            debug!("Sending {} to url: {}", options.method, options.url);
        }

        let start = Instant::now();

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(options.method), options.url.clone());
        for (name, value) in &options.headers {
            builder = builder.header(name, value);
        }
        builder = Self::build_body(builder, &options.body)?;

        let response = builder.send().await.map_err(|e| Self::map_error(&e))?;
        let status = response.status().as_u16();

        if !options.silent {
            debug!("Received response code: {status}");
        }

        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| InvokeError::Transport(format!("failed to read body: {e}")))?
            .to_vec();

        Ok(ApiResponse::new(status, headers, body, start.elapsed()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_to_reqwest_method() {
        assert_eq!(ReqwestInvoker::to_reqwest_method(HttpMethod::Get), Method::GET);
        assert_eq!(ReqwestInvoker::to_reqwest_method(HttpMethod::Post), Method::POST);
        assert_eq!(ReqwestInvoker::to_reqwest_method(HttpMethod::Patch), Method::PATCH);
        assert_eq!(
            ReqwestInvoker::to_reqwest_method(HttpMethod::Options),
            Method::OPTIONS
        );
    }

    #[test]
    fn test_client_creation() {
        assert!(ReqwestInvoker::new().is_ok());
    }

    #[test]
    fn test_form_body_is_url_encoded() {
        let client = Client::new();
        let builder = client.post("https://example.com");
        let body = RequestBody::Form(vec![
            ("name".to_string(), "a b".to_string()),
            ("id".to_string(), "7".to_string()),
        ]);
        let request = ReqwestInvoker::build_body(builder, &body)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(
            request.headers()[CONTENT_TYPE],
            "application/x-www-form-urlencoded"
        );
        let bytes = request.body().unwrap().as_bytes().unwrap();
        assert_eq!(bytes, b"name=a+b&id=7");
    }

    #[test]
    fn test_json_body() {
        let client = Client::new();
        let builder = client.post("https://example.com");
        let body = RequestBody::Json(json!({"key1": "value1"}));
        let request = ReqwestInvoker::build_body(builder, &body)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.headers()[CONTENT_TYPE], "application/json");
        let bytes = request.body().unwrap().as_bytes().unwrap();
        assert_eq!(bytes, br#"{"key1":"value1"}"#);
    }
}
