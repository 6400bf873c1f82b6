//! HTTP invoker port
//!
//! Turns a test's named arguments into one HTTP request. The request is
//! validated here so no adapter ever sees an incomplete one.

use std::collections::BTreeMap;

use alt_domain::{ApiResponse, DataSet, DomainError, HttpMethod};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::args::{TestArgs, is_truthy};
use crate::template::render_value;

/// Errors from building or sending a request.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// Both `json` and `form` were given.
    #[error("cannot specify both json and form parameters")]
    ConflictingBody,

    /// Neither `url` nor `baseurl` + `endpoint` was given.
    #[error("invalid test arguments: must specify {{url}} or {{baseurl, endpoint}}")]
    MissingUrl,

    /// No `method` was given.
    #[error("invalid test arguments: must specify {{method}}")]
    MissingMethod,

    /// `method` names an unsupported HTTP method.
    #[error(transparent)]
    UnsupportedMethod(#[from] DomainError),

    /// The URL could not be parsed or joined.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL as given.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// An option had the wrong shape.
    #[error("invalid '{key}' option: {reason}")]
    InvalidOption {
        /// Option name.
        key: String,
        /// What was wrong.
        reason: String,
    },

    /// The HTTP client failed to send or read.
    #[error("request failed: {0}")]
    Transport(String),
}

/// Request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    /// No body.
    #[default]
    None,
    /// JSON-encoded body.
    Json(Value),
    /// Form-encoded body, in key order.
    Form(Vec<(String, String)>),
}

/// A fully validated request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute request URL.
    pub url: Url,
    /// Request headers.
    pub headers: BTreeMap<String, String>,
    /// Request body.
    pub body: RequestBody,
    /// Suppresses request/response logging.
    pub silent: bool,
}

impl RequestOptions {
    /// Builds request options from test arguments.
    ///
    /// # Errors
    ///
    /// See [`RequestOptions::from_data_set`].
    pub fn from_args(args: &TestArgs) -> Result<Self, InvokeError> {
        Self::from_data_set(args.values())
    }

    /// Builds request options from named values.
    ///
    /// Recognized keys: `method`, `url` or `baseurl` + `endpoint`,
    /// `headers`, `json`, `form`, `api_key`, `silent`. Other keys are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Fails when both `json` and `form` are present, when no URL can be
    /// formed, when `method` is missing or unknown, or when an option has
    /// the wrong shape.
    pub fn from_data_set(values: &DataSet) -> Result<Self, InvokeError> {
        let mut headers = string_map(values.get("headers"), "headers")?;
        if let Some(api_key) = values.get("api_key").filter(|v| !v.is_null()) {
            headers.retain(|name, _| !name.eq_ignore_ascii_case("authorization"));
            headers.insert("Authorization".to_string(), render_value(api_key));
        }

        let json = values.get("json").filter(|v| !v.is_null());
        let form = values.get("form").filter(|v| !v.is_null());
        let body = match (json, form) {
            (Some(_), Some(_)) => return Err(InvokeError::ConflictingBody),
            (Some(json), None) => RequestBody::Json(json.clone()),
            (None, Some(_)) => RequestBody::Form(string_map(form, "form")?.into_iter().collect()),
            (None, None) => RequestBody::None,
        };

        let url = resolve_url(values)?;

        let method = values
            .get("method")
            .filter(|v| !v.is_null())
            .ok_or(InvokeError::MissingMethod)?;
        let method = render_value(method).parse::<HttpMethod>()?;

        let silent = values.get("silent").is_some_and(is_truthy);

        Ok(Self {
            method,
            url,
            headers,
            body,
            silent,
        })
    }
}

/// Port for sending a single request.
///
/// Implementations perform a real network call; failures surface as
/// [`InvokeError::Transport`] and are never retried.
#[async_trait]
pub trait HttpInvoker: Send + Sync {
    /// Sends the request and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or the response
    /// cannot be read.
    async fn invoke(&self, options: &RequestOptions) -> Result<ApiResponse, InvokeError>;
}

/// Builds a request from test arguments and sends it.
///
/// # Errors
///
/// Returns option errors before any network call, then transport errors.
pub async fn request(
    invoker: &dyn HttpInvoker,
    args: &TestArgs,
) -> Result<ApiResponse, InvokeError> {
    let options = RequestOptions::from_args(args)?;
    invoker.invoke(&options).await
}

fn resolve_url(values: &DataSet) -> Result<Url, InvokeError> {
    if let Some(url) = values.get("url").filter(|v| !v.is_null()) {
        let url = render_value(url);
        return Url::parse(&url).map_err(|e| InvokeError::InvalidUrl {
            reason: e.to_string(),
            url,
        });
    }

    let baseurl = values.get("baseurl").filter(|v| !v.is_null());
    let endpoint = values.get("endpoint").filter(|v| !v.is_null());
    let (Some(baseurl), Some(endpoint)) = (baseurl, endpoint) else {
        return Err(InvokeError::MissingUrl);
    };

    let baseurl = render_value(baseurl);
    let endpoint = render_value(endpoint);
    Url::parse(&baseurl)
        .and_then(|base| base.join(&endpoint))
        .map_err(|e| InvokeError::InvalidUrl {
            url: format!("{baseurl} + {endpoint}"),
            reason: e.to_string(),
        })
}

fn string_map(value: Option<&Value>, key: &str) -> Result<BTreeMap<String, String>, InvokeError> {
    match value {
        None | Some(Value::Null) => Ok(BTreeMap::new()),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(name, value)| match value {
                Value::Array(_) | Value::Object(_) => Err(InvokeError::InvalidOption {
                    key: key.to_string(),
                    reason: format!("value of '{name}' must be a scalar"),
                }),
                scalar => Ok((name.clone(), render_value(scalar))),
            })
            .collect(),
        Some(_) => Err(InvokeError::InvalidOption {
            key: key.to_string(),
            reason: "expected a mapping".to_string(),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_full_url() {
        let values = DataSet::new()
            .with("method", "get")
            .with("url", "http://localhost/api/controller");
        let options = RequestOptions::from_data_set(&values).unwrap();
        assert_eq!(options.method, HttpMethod::Get);
        assert_eq!(options.url.as_str(), "http://localhost/api/controller");
        assert_eq!(options.body, RequestBody::None);
        assert!(options.headers.is_empty());
        assert!(!options.silent);
    }

    #[test]
    fn test_base_and_endpoint_join() {
        let values = DataSet::new()
            .with("method", "GET")
            .with("baseurl", "http://x.com/")
            .with("endpoint", "api/7");
        let options = RequestOptions::from_data_set(&values).unwrap();
        assert_eq!(options.url.as_str(), "http://x.com/api/7");

        // RFC 3986 join: a base without trailing slash drops its last segment.
        let values = DataSet::new()
            .with("method", "GET")
            .with("baseurl", "http://x.com/v1")
            .with("endpoint", "users");
        let options = RequestOptions::from_data_set(&values).unwrap();
        assert_eq!(options.url.as_str(), "http://x.com/users");
    }

    #[test]
    fn test_api_key_sets_authorization() {
        let values = DataSet::new()
            .with("method", "POST")
            .with("url", "http://x.com/")
            .with("headers", json!({"authorization": "old", "X-Trace": 5}))
            .with("api_key", "ey123");
        let options = RequestOptions::from_data_set(&values).unwrap();
        assert_eq!(options.headers.get("Authorization").unwrap(), "ey123");
        assert_eq!(options.headers.get("X-Trace").unwrap(), "5");
        assert!(!options.headers.contains_key("authorization"));
    }

    #[test]
    fn test_json_and_form_bodies() {
        let values = DataSet::new()
            .with("method", "POST")
            .with("url", "http://x.com/")
            .with("json", json!({"key1": "value1"}));
        let options = RequestOptions::from_data_set(&values).unwrap();
        assert_eq!(options.body, RequestBody::Json(json!({"key1": "value1"})));

        let values = DataSet::new()
            .with("method", "POST")
            .with("url", "http://x.com/")
            .with("form", json!({"b": 2, "a": "1"}));
        let options = RequestOptions::from_data_set(&values).unwrap();
        assert_eq!(
            options.body,
            RequestBody::Form(vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
            ])
        );
    }

    #[test]
    fn test_conflicting_body() {
        let values = DataSet::new()
            .with("method", "POST")
            .with("url", "http://x.com/")
            .with("json", json!({}))
            .with("form", json!({}));
        assert!(matches!(
            RequestOptions::from_data_set(&values),
            Err(InvokeError::ConflictingBody)
        ));
    }

    #[test]
    fn test_missing_url() {
        let values = DataSet::new()
            .with("method", "GET")
            .with("baseurl", "http://x.com/");
        assert!(matches!(
            RequestOptions::from_data_set(&values),
            Err(InvokeError::MissingUrl)
        ));
    }

    #[test]
    fn test_missing_method() {
        let values = DataSet::new().with("url", "http://x.com/");
        assert!(matches!(
            RequestOptions::from_data_set(&values),
            Err(InvokeError::MissingMethod)
        ));
    }

    #[test]
    fn test_unsupported_method_and_bad_url() {
        let values = DataSet::new()
            .with("method", "BREW")
            .with("url", "http://x.com/");
        assert!(matches!(
            RequestOptions::from_data_set(&values),
            Err(InvokeError::UnsupportedMethod(_))
        ));

        let values = DataSet::new().with("method", "GET").with("url", "not a url");
        assert!(matches!(
            RequestOptions::from_data_set(&values),
            Err(InvokeError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_silent_and_bad_headers() {
        let values = DataSet::new()
            .with("method", "GET")
            .with("url", "http://x.com/")
            .with("silent", true);
        assert!(RequestOptions::from_data_set(&values).unwrap().silent);

        let values = DataSet::new()
            .with("method", "GET")
            .with("url", "http://x.com/")
            .with("headers", "Accept: */*");
        assert!(matches!(
            RequestOptions::from_data_set(&values),
            Err(InvokeError::InvalidOption { key, .. }) if key == "headers"
        ));
    }
}
