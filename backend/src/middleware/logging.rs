use axum::{
    body::{to_bytes, Body, Bytes},
    http::{header::CONTENT_LENGTH, Request, StatusCode},
    middleware::Next,
    response::Response,
    Error as AxumError,
};
use std::time::Instant;

use crate::middleware::request_id::RequestId;

const MAX_BUFFERED_BODY_BYTES: usize = 64 * 1024;
const MAX_LOGGED_BODY_BYTES: usize = 512;

struct RequestSummary {
    method: String,
    path: String,
    request_id: Option<String>,
}

/// Logs every 4xx/5xx response with a short body preview. The body is
/// buffered and forwarded unchanged. Query strings are left out since login
/// forms may be submitted through them by misbehaving clients.
pub async fn log_error_responses(req: Request<Body>, next: Next) -> Response {
    let summary = RequestSummary {
        method: req.method().to_string(),
        path: req.uri().path().to_string(),
        request_id: req.extensions().get::<RequestId>().map(|id| id.0.clone()),
    };
    let start = Instant::now();

    let response = next.run(req).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let latency_ms = start.elapsed().as_millis() as u64;
    let (mut parts, body) = response.into_parts();
    match buffer_body(body).await {
        Ok((bytes, preview)) => {
            log_error_event(status, &summary, latency_ms, &preview, None);
            Response::from_parts(parts, Body::from(bytes))
        }
        Err(err) => {
            parts.headers.remove(CONTENT_LENGTH);
            log_error_event(status, &summary, latency_ms, "", Some(err));
            Response::from_parts(parts, Body::empty())
        }
    }
}

async fn buffer_body(body: Body) -> Result<(Bytes, String), AxumError> {
    let bytes = to_bytes(body, MAX_BUFFERED_BODY_BYTES).await?;
    Ok((bytes.clone(), preview(&bytes)))
}

fn preview(bytes: &Bytes) -> String {
    if bytes.len() > MAX_LOGGED_BODY_BYTES {
        format!(
            "{}... (truncated, {} bytes total)",
            String::from_utf8_lossy(&bytes[..MAX_LOGGED_BODY_BYTES]),
            bytes.len()
        )
    } else {
        String::from_utf8_lossy(bytes).to_string()
    }
}

fn log_error_event(
    status: StatusCode,
    summary: &RequestSummary,
    latency_ms: u64,
    body_preview: &str,
    body_error: Option<AxumError>,
) {
    let status = status.as_u16();
    let method = summary.method.as_str();
    let path = summary.path.as_str();
    let request_id = summary.request_id.as_deref();
    let body_error = body_error.map(|err| err.to_string());

    if status >= 500 {
        tracing::error!(
            status,
            method,
            path,
            request_id,
            latency_ms,
            body = body_preview,
            body_error = body_error.as_deref(),
            "Request completed with error status"
        );
    } else {
        tracing::warn!(
            status,
            method,
            path,
            request_id,
            latency_ms,
            body = body_preview,
            body_error = body_error.as_deref(),
            "Request completed with error status"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_long_bodies() {
        let long = Bytes::from(vec![b'a'; MAX_LOGGED_BODY_BYTES + 10]);
        let text = preview(&long);
        assert!(text.ends_with(&format!("(truncated, {} bytes total)", MAX_LOGGED_BODY_BYTES + 10)));

        let short = Bytes::from_static(b"{\"code\":\"NOT_FOUND\"}");
        assert_eq!(preview(&short), "{\"code\":\"NOT_FOUND\"}");
    }
}
