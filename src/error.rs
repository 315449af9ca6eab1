use crate::models::ApiErrorPayload;
use reqwest::StatusCode;
use reqwest::header::InvalidHeaderValue;
use thiserror::Error;

/// Everything the request layer can fail with.
///
/// `Display` is the message a user should see. For `Request` that is whatever
/// the backend said (see [`failure_message`]), for `Network` it is deliberately
/// generic; the transport error is still reachable through `source()` for logs.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Request { status: StatusCode, message: String },

    #[error("Network error occurred")]
    Network(#[source] reqwest::Error),

    #[error("Invalid response body: {0}")]
    InvalidBody(#[source] serde_json::Error),

    #[error("Could not encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),
}

impl ApiError {
    /// Builds the error for a non-2xx response from its raw body.
    pub fn from_failure(status: StatusCode, body: &str) -> Self {
        ApiError::Request {
            status,
            message: failure_message(status, body),
        }
    }

    /// HTTP status of a failed response, if the backend answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A failed response body, parsed once and shared by every strategy.
struct FailureBody<'a> {
    text: &'a str,
    is_json: bool,
    payload: Option<ApiErrorPayload>,
}

impl<'a> FailureBody<'a> {
    fn parse(text: &'a str) -> Self {
        match serde_json::from_str::<serde_json::Value>(text) {
            Ok(value) => Self {
                text,
                is_json: true,
                payload: Some(ApiErrorPayload {
                    error: string_field(&value, "error"),
                    message: string_field(&value, "message"),
                }),
            },
            Err(_) => Self {
                text,
                is_json: false,
                payload: None,
            },
        }
    }
}

// Fields are read independently; a non-string value counts as absent.
fn string_field(value: &serde_json::Value, name: &str) -> Option<String> {
    value
        .get(name)
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
}

type Strategy = fn(&FailureBody<'_>) -> Option<String>;

/// Tried top to bottom; the first `Some` wins.
const MESSAGE_STRATEGIES: [Strategy; 3] = [json_error_field, json_message_field, plain_text];

fn json_error_field(body: &FailureBody<'_>) -> Option<String> {
    non_empty(body.payload.as_ref()?.error.as_deref())
}

fn json_message_field(body: &FailureBody<'_>) -> Option<String> {
    non_empty(body.payload.as_ref()?.message.as_deref())
}

// Only for bodies that aren't JSON at all. `{"foo": 1}` gets the generic message.
fn plain_text(body: &FailureBody<'_>) -> Option<String> {
    if body.is_json {
        return None;
    }
    non_empty(Some(body.text))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|s| !s.is_empty()).map(str::to_owned)
}

/// Picks the most helpful message out of a failed response body.
///
/// Order: JSON `error` field, JSON `message` field, the raw text (non-JSON
/// bodies only), and finally `Request failed with status N`.
pub fn failure_message(status: StatusCode, body: &str) -> String {
    let body = FailureBody::parse(body);
    MESSAGE_STRATEGIES
        .iter()
        .find_map(|strategy| strategy(&body))
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()))
}
