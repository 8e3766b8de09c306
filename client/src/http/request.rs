use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use tracing::debug;

use crate::constants::http::AUTH_TOKEN_HEADER;
use crate::errors::{ApiError, ErrorSource};
use crate::models::Pagination;

#[derive(Debug)]
pub(crate) enum RequestBody {
    Empty,
    Json(Value),
    Form(Vec<(String, String)>),
}

/// A single call against the Arc API, built before anything is sent
#[derive(Debug)]
pub(crate) struct ApiRequest {
    method: Method,
    url: Url,
    body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            body: RequestBody::Empty,
        }
    }

    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.url.query_pairs_mut().append_pair(key, value);
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn form(mut self, pairs: Vec<(String, String)>) -> Self {
        self.body = RequestBody::Form(pairs);
        self
    }

    /// `(GET) /api/v1/agents?q=&page=0`, the same shape the server uses in error documents
    pub fn pointer(&self) -> String {
        match self.url.query() {
            Some(query) => format!("({}) {}?{}", self.method, self.url.path(), query),
            None => format!("({}) {}", self.method, self.url.path()),
        }
    }
}

/// A successful (2xx) response with its body already read
#[derive(Debug)]
pub(crate) struct ApiResponse {
    pointer: String,
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl ApiResponse {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::from_headers(&self.headers)
    }

    /// Decode the body as YAML when the server says so, JSON otherwise
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, RequestError> {
        let decoded = if self.is_yaml() {
            serde_yaml::from_str(&self.body).map_err(|e| e.to_string())
        } else {
            serde_json::from_str(&self.body).map_err(|e| e.to_string())
        };

        decoded.map_err(|reason| RequestError {
            pointer: self.pointer.clone(),
            kind: RequestErrorKind::Decode { reason },
        })
    }

    pub fn into_text(self) -> String {
        self.body
    }

    fn is_yaml(&self) -> bool {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("yaml"))
    }
}

/// Why a call did not produce a usable result
#[derive(Debug)]
pub(crate) enum RequestErrorKind {
    /// A required parameter was empty; nothing was sent
    MissingParameter { field: &'static str },

    /// A parameter cannot be used as a URL path segment; nothing was sent
    InvalidSegment { field: &'static str, value: String },

    /// Connection, TLS or timeout failure
    Transport(reqwest::Error),

    /// The server answered with a non-success status
    Status { status: StatusCode, body: String },

    /// The request body could not be serialized; nothing was sent
    Encode { reason: String },

    /// The body did not match the expected shape
    Decode { reason: String },
}

#[derive(Debug)]
pub(crate) struct RequestError {
    pointer: String,
    kind: RequestErrorKind,
}

impl RequestError {
    pub fn missing(field: &'static str) -> Self {
        Self {
            pointer: String::new(),
            kind: RequestErrorKind::MissingParameter { field },
        }
    }

    pub fn invalid_segment(field: &'static str, value: &str) -> Self {
        Self {
            pointer: String::new(),
            kind: RequestErrorKind::InvalidSegment {
                field,
                value: value.to_string(),
            },
        }
    }

    pub fn encode(reason: String) -> Self {
        Self {
            pointer: String::new(),
            kind: RequestErrorKind::Encode { reason },
        }
    }

    pub fn pointer(&self) -> &str {
        &self.pointer
    }

    fn http_status(&self) -> Option<StatusCode> {
        match &self.kind {
            RequestErrorKind::Status { status, .. } => Some(*status),
            RequestErrorKind::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Error document for strict operations. A JSON error object sent by the
    /// server is passed through untouched; anything else gets a synthetic one
    /// echoing `parameter`.
    pub fn into_api_error(self, parameter: Value) -> ApiError {
        if let RequestErrorKind::Status { body, .. } = &self.kind {
            if is_error_document(body) {
                return ApiError::from_json(body.clone());
            }
        }

        ApiError::synthetic(
            self.http_status(),
            &self.to_string(),
            &format!("{:?}", self.kind),
            ErrorSource {
                pointer: self.pointer,
                parameter,
            },
        )
    }
}

fn is_error_document(body: &str) -> bool {
    serde_json::from_str::<Value>(body)
        .map(|v| v.is_object())
        .unwrap_or(false)
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            RequestErrorKind::MissingParameter { field } => {
                write!(f, "Parameter {} missing or empty", field)
            }
            RequestErrorKind::InvalidSegment { field, value } => {
                write!(f, "Parameter {} '{}' is not a valid path segment", field, value)
            }
            RequestErrorKind::Transport(e) if e.is_timeout() => {
                write!(f, "Request timed out: {}", e)
            }
            RequestErrorKind::Transport(e) => write!(f, "Request failed: {}", e),
            RequestErrorKind::Status { status, body } if body.is_empty() => {
                write!(f, "Server returned {}", status)
            }
            RequestErrorKind::Status { status, body } => {
                write!(f, "Server returned {}: {}", status, body)
            }
            RequestErrorKind::Encode { reason } => {
                write!(f, "Failed to encode request: {}", reason)
            }
            RequestErrorKind::Decode { reason } => {
                write!(f, "Failed to decode response: {}", reason)
            }
        }
    }
}

impl std::error::Error for RequestError {}

/// Send one request with the auth token and read the whole body
pub(crate) async fn send(
    http: &Client,
    token: &str,
    request: ApiRequest,
) -> Result<ApiResponse, RequestError> {
    let pointer = request.pointer();
    debug!("Arc request {}", pointer);

    let transport = |e: reqwest::Error| RequestError {
        pointer: pointer.clone(),
        kind: RequestErrorKind::Transport(e),
    };

    let builder = http
        .request(request.method, request.url)
        .header(AUTH_TOKEN_HEADER, token);

    let builder = match request.body {
        RequestBody::Empty => builder,
        RequestBody::Json(body) => builder.json(&body),
        RequestBody::Form(pairs) => builder.form(&pairs),
    };

    let response = builder.send().await.map_err(transport)?;
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.text().await.map_err(transport)?;

    if !status.is_success() {
        debug!("Arc request {} failed with status {}", pointer, status);
        return Err(RequestError {
            pointer,
            kind: RequestErrorKind::Status { status, body },
        });
    }

    Ok(ApiResponse {
        pointer,
        status,
        headers,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn pointer_includes_method_path_and_query() {
        let request = ApiRequest::new(Method::GET, url("https://arc-app/api/v1/agents"))
            .query("q", "")
            .query("page", "0");

        assert_eq!(request.pointer(), "(GET) /api/v1/agents?q=&page=0");
    }

    #[test]
    fn pointer_without_query() {
        let request = ApiRequest::new(Method::DELETE, url("https://arc-app/api/v1/agents/darwin"));
        assert_eq!(request.pointer(), "(DELETE) /api/v1/agents/darwin");
    }

    #[test]
    fn server_error_document_passes_through() {
        let body = r#"{"id":"abc","status":"Not Found","code":404,"title":"Agent not found.","detail":"x"}"#;
        let err = RequestError {
            pointer: "(GET) /api/v1/agents/nope".to_string(),
            kind: RequestErrorKind::Status {
                status: StatusCode::NOT_FOUND,
                body: body.to_string(),
            },
        };

        let api_error = err.into_api_error(json!({}));
        assert_eq!(api_error.json_data(), body);
        assert_eq!(api_error.id(), Some("abc"));
        assert_eq!(api_error.code(), Some(404));
    }

    #[test]
    fn plain_text_error_body_becomes_synthetic() {
        let err = RequestError {
            pointer: "(GET) /api/v1/jobs".to_string(),
            kind: RequestErrorKind::Status {
                status: StatusCode::BAD_GATEWAY,
                body: "<html>upstream down</html>".to_string(),
            },
        };

        let api_error = err.into_api_error(json!({"token": "***"}));
        assert_eq!(api_error.code(), Some(502));
        assert_eq!(api_error.status(), Some("Bad Gateway"));
        assert_eq!(
            api_error.title(),
            Some("Server returned 502 Bad Gateway: <html>upstream down</html>")
        );
        assert!(api_error.detail().unwrap().contains("&lt;html&gt;"));
        assert_eq!(api_error.source(), r#"(GET) /api/v1/jobs - {"token":"***"}"#);
    }

    #[test]
    fn missing_parameter_has_no_pointer() {
        let api_error = RequestError::missing("agent_id").into_api_error(json!({"agent_id": ""}));

        assert_eq!(api_error.code(), Some(0));
        assert_eq!(api_error.title(), Some("Parameter agent_id missing or empty"));
        assert_eq!(api_error.source(), r#" - {"agent_id":""}"#);
    }
}
