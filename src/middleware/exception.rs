use std::any::Any;
use std::panic::AssertUnwindSafe;

use axum::{
    body::to_bytes,
    extract::Request,
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures::FutureExt;

use crate::error::{message_response, DomainError, ErrorReport};

/// Largest framework error body read back when normalizing a response.
const MAX_ERROR_BODY: usize = 16 * 1024;

/// Outermost stage: turns every failure into the `{"message"}` envelope and
/// logs it once.
pub async fn exception_handler(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(payload) => {
            let err = DomainError::internal(anyhow::anyhow!("handler panicked: {}", panic_message(&*payload)));
            err.into_response()
        }
    };

    if let Some(report) = response.extensions().get::<ErrorReport>() {
        log_report(report, &method, &path);
        return response;
    }

    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    normalize(response, &method, &path).await
}

/// Rewrite an error response that did not come from a [`DomainError`].
async fn normalize(response: Response, method: &Method, path: &str) -> Response {
    let status = response.status();

    if status.is_server_error() {
        let err = DomainError::internal(anyhow::anyhow!("unclassified {status} response"));
        let response = err.into_response();
        if let Some(report) = response.extensions().get::<ErrorReport>() {
            log_report(report, method, path);
        }
        return response;
    }

    let body = to_bytes(response.into_body(), MAX_ERROR_BODY).await.unwrap_or_default();
    let text = String::from_utf8_lossy(&body).trim().to_string();
    let message = if text.is_empty() {
        status.canonical_reason().unwrap_or("Request failed").to_string()
    } else {
        text
    };

    tracing::warn!(
        status = status.as_u16(),
        method = %method,
        path = %path,
        message = %message,
        "request rejected"
    );

    message_response(status, message)
}

fn log_report(report: &ErrorReport, method: &Method, path: &str) {
    let detail = report.detail.as_deref().unwrap_or("");
    if report.status.is_server_error() {
        tracing::error!(
            kind = report.kind,
            status = report.status.as_u16(),
            method = %method,
            path = %path,
            detail,
            "request failed"
        );
    } else {
        tracing::warn!(
            kind = report.kind,
            status = report.status.as_u16(),
            method = %method,
            path = %path,
            detail,
            "request failed"
        );
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}
