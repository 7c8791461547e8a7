//! Transport-neutral handler results and their HTTP translation.
//!
//! Handlers decide *what* happens (render a view, redirect, or answer with a
//! status); turning a view into markup is left to whatever sits in front of
//! this service, so rendered views travel as JSON documents.

use axum::{
    http::{header::SET_COOKIE, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ErrorResponse;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    #[serde(rename = "view")]
    pub name: &'static str,
    pub attributes: Map<String, Value>,
}

impl View {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attributes: Map::new(),
        }
    }

    /// Adds an attribute; values that fail to serialize are skipped.
    pub fn with(mut self, key: &str, value: impl Serialize) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.attributes.insert(key.to_string(), value);
            }
            Err(err) => tracing::warn!(key, error = %err, "Dropping unserializable view attribute"),
        }
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Render(View),
    Redirect(&'static str),
    Status(StatusCode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub outcome: Outcome,
    /// Complete `Set-Cookie` header value, when the session cookie changes.
    pub set_cookie: Option<String>,
}

impl Reply {
    pub fn render(view: View) -> Self {
        Self {
            outcome: Outcome::Render(view),
            set_cookie: None,
        }
    }

    pub fn redirect(path: &'static str) -> Self {
        Self {
            outcome: Outcome::Redirect(path),
            set_cookie: None,
        }
    }

    pub fn status(code: StatusCode) -> Self {
        Self {
            outcome: Outcome::Status(code),
            set_cookie: None,
        }
    }

    pub fn with_cookie(mut self, cookie: String) -> Self {
        self.set_cookie = Some(cookie);
        self
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let mut response = match self.outcome {
            Outcome::Render(view) => (StatusCode::OK, Json(view)).into_response(),
            Outcome::Redirect(path) => Redirect::to(path).into_response(),
            Outcome::Status(code) => (code, Json(status_body(code))).into_response(),
        };
        if let Some(cookie) = self.set_cookie {
            match HeaderValue::from_str(&cookie) {
                Ok(value) => {
                    response.headers_mut().append(SET_COOKIE, value);
                }
                Err(err) => tracing::error!(error = %err, "Invalid Set-Cookie header value"),
            }
        }
        response
    }
}

fn status_body(code: StatusCode) -> ErrorResponse {
    ErrorResponse {
        error: code.canonical_reason().unwrap_or("Error").to_string(),
        code: code
            .canonical_reason()
            .unwrap_or("ERROR")
            .to_ascii_uppercase()
            .replace(' ', "_"),
    }
}
