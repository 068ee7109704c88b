//! Argument validation stage.
//!
//! Checks that every required field is present and non-empty before the
//! handler runs. Body sources are buffered under the route's
//! [`DefaultBodyLimit`](axum::extract::DefaultBodyLimit) and handed on
//! unchanged.

use axum::{
    body::{Body, Bytes},
    extract::{FromRequest, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::Response,
};
use serde_json::Value;

use crate::error::DomainError;

/// Where an endpoint's arguments live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgSource {
    Query,
    Form,
    Json,
}

#[derive(Debug, Clone)]
pub struct RequiredArgs {
    source: ArgSource,
    names: &'static [&'static str],
}

impl RequiredArgs {
    pub fn query(names: &'static [&'static str]) -> Self {
        Self::new(ArgSource::Query, names)
    }

    pub fn form(names: &'static [&'static str]) -> Self {
        Self::new(ArgSource::Form, names)
    }

    pub fn json(names: &'static [&'static str]) -> Self {
        Self::new(ArgSource::Json, names)
    }

    fn new(source: ArgSource, names: &'static [&'static str]) -> Self {
        Self { source, names }
    }

    pub fn source(&self) -> ArgSource {
        self.source
    }

    /// First required name `present` rejects.
    fn first_missing(&self, present: impl Fn(&str) -> bool) -> Option<&'static str> {
        self.names.iter().copied().find(|&name| !present(name))
    }
}

pub async fn required_args(
    State(args): State<RequiredArgs>,
    request: Request,
    next: Next,
) -> Result<Response, DomainError> {
    let request = match args.source {
        ArgSource::Query => {
            let fields = form_fields(request.uri().query().unwrap_or_default().as_bytes());
            check(&args, |name| has_value(&fields, name))?;
            request
        }
        ArgSource::Form => {
            let (parts, bytes) = buffer(request).await?;
            let fields = form_fields(&bytes);
            check(&args, |name| has_value(&fields, name))?;
            Request::from_parts(parts, Body::from(bytes))
        }
        ArgSource::Json => {
            let (parts, bytes) = buffer(request).await?;
            let value: Value = serde_json::from_slice(&bytes)
                .map_err(|_| DomainError::validation("Request body must be a JSON object"))?;
            let object = value
                .as_object()
                .ok_or_else(|| DomainError::validation("Request body must be a JSON object"))?;
            check(&args, |name| match object.get(name) {
                None | Some(Value::Null) => false,
                Some(Value::String(s)) => !s.is_empty(),
                Some(_) => true,
            })?;
            Request::from_parts(parts, Body::from(bytes))
        }
    };

    Ok(next.run(request).await)
}

async fn buffer(request: Request) -> Result<(Parts, Bytes), DomainError> {
    let (parts, body) = request.into_parts();
    // the body limit travels as a request extension
    let mut inner = Request::new(body);
    *inner.extensions_mut() = parts.extensions.clone();

    let bytes = Bytes::from_request(inner, &()).await.map_err(|rejection| {
        tracing::debug!(error = %rejection, "request body rejected");
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            DomainError::PayloadTooLarge("Request body is too large".to_string())
        } else {
            DomainError::validation("Request body could not be read")
        }
    })?;
    Ok((parts, bytes))
}

fn check(args: &RequiredArgs, present: impl Fn(&str) -> bool) -> Result<(), DomainError> {
    match args.first_missing(present) {
        Some(name) => Err(DomainError::missing_argument(name)),
        None => Ok(()),
    }
}

fn form_fields(input: &[u8]) -> Vec<(String, String)> {
    url::form_urlencoded::parse(input).into_owned().collect()
}

fn has_value(fields: &[(String, String)], name: &str) -> bool {
    fields.iter().any(|(k, v)| k == name && !v.is_empty())
}
