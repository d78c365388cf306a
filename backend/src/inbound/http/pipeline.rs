//! Request pipeline shared by every route.
//!
//! A [`RequestContext`] is created per request and passed by value through
//! the steps a route needs, in order: timeout, body decode, path extraction.
//! Each step either returns the augmented context or an [`Error`] that unwinds
//! straight to the translator. The terminal handler turns the context into a
//! [`Reply`], which is consumed exactly once when actix emits it.

use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

use actix_web::body::BoxBody;
use actix_web::http::StatusCode;
use actix_web::http::header::{CONTENT_TYPE, HeaderValue};
use actix_web::web::{BytesMut, Payload};
use actix_web::{HttpRequest, HttpResponse, Responder};
use futures_util::StreamExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, error, warn};

use crate::domain::{Error, ErrorReason};

use super::error::fallback_response;

/// Largest request body the decode step will buffer.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

pub(crate) const BODY_UNREADABLE_MESSAGE: &str = "Request body could not be read";
pub(crate) const BODY_NOT_JSON_MESSAGE: &str = "Request body did not contain valid JSON";
pub(crate) const BODY_MISSHAPEN_MESSAGE: &str =
    "Required body is not present or incorrectly structured";
pub(crate) const PATH_MISSING_MESSAGE: &str = "Required dynamic path part not present";
pub(crate) const DEADLINE_MESSAGE: &str = "Request processing exceeded the allotted time";

/// Per-request state threaded through the pipeline.
///
/// `B` is the decoded body; it is `()` until [`RequestContext::decode_json`]
/// runs.
#[derive(Debug)]
pub struct RequestContext<B = ()> {
    deadline: Option<Instant>,
    body: B,
    path: BTreeMap<&'static str, String>,
}

impl Default for RequestContext<()> {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestContext<()> {
    /// Fresh context with no deadline, body or path parameters.
    pub fn new() -> Self {
        Self {
            deadline: None,
            body: (),
            path: BTreeMap::new(),
        }
    }
}

impl<B> RequestContext<B> {
    /// Timeout step: bound everything run through [`Self::within_deadline`].
    ///
    /// An earlier, tighter deadline is kept.
    ///
    /// A timeout too large to express as an instant leaves the deadline as it
    /// was.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        let Some(candidate) = Instant::now().checked_add(timeout) else {
            warn!(timeout_ms, "request timeout out of range; deadline unchanged");
            return self;
        };
        self.deadline = Some(match self.deadline {
            Some(existing) if existing < candidate => existing,
            _ => candidate,
        });
        debug!(timeout_ms, "request deadline set");
        self
    }

    /// Body-decode step: read the whole payload and parse it as `T`.
    ///
    /// Unreadable or syntactically invalid bodies fail with
    /// `BODY_DECODE_FAILED`; valid JSON of the wrong shape fails with
    /// `INVALID_JSON_BODY`.
    pub async fn decode_json<T>(self, payload: Payload) -> Result<RequestContext<T>, Error>
    where
        T: DeserializeOwned,
    {
        let bytes = self.within_deadline(read_body(payload)).await??;
        let body = serde_json::from_slice::<T>(&bytes).map_err(|err| {
            warn!(error = %err, target_type = std::any::type_name::<T>(), "body decode failed");
            match err.classify() {
                Category::Data => {
                    Error::invalid_request(ErrorReason::InvalidJsonBody, BODY_MISSHAPEN_MESSAGE)
                }
                Category::Io | Category::Syntax | Category::Eof => {
                    Error::invalid_request(ErrorReason::BodyDecodeFailed, BODY_NOT_JSON_MESSAGE)
                }
            }
        })?;
        debug!(target_type = std::any::type_name::<T>(), "body decoded");
        Ok(RequestContext {
            deadline: self.deadline,
            body,
            path: self.path,
        })
    }

    /// Path-parameter step: require every name in `names` to be present and
    /// non-empty in the matched route.
    pub fn extract_path(
        mut self,
        req: &HttpRequest,
        names: &[&'static str],
    ) -> Result<Self, Error> {
        for name in names {
            match req.match_info().get(name).filter(|value| !value.is_empty()) {
                Some(value) => {
                    debug!(parameter = name, value, "path parameter found");
                    self.path.insert(*name, value.to_owned());
                }
                None => {
                    warn!(parameter = name, "path parameter missing");
                    return Err(Error::not_found(
                        ErrorReason::PathParameterNotPresent,
                        PATH_MISSING_MESSAGE,
                    ));
                }
            }
        }
        Ok(self)
    }

    /// Decoded body.
    pub fn body(&self) -> &B {
        &self.body
    }

    /// Value of an extracted path parameter.
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path.get(name).map(String::as_str)
    }

    /// Run `fut` under the context deadline, failing with 503 once it passes.
    pub async fn within_deadline<F>(&self, fut: F) -> Result<F::Output, Error>
    where
        F: Future,
    {
        match self.deadline {
            Some(deadline) => timeout_at(deadline, fut).await.map_err(|_| {
                warn!("request deadline elapsed");
                Error::service_unavailable(ErrorReason::ProcessingRequestFailed, DEADLINE_MESSAGE)
            }),
            None => Ok(fut.await),
        }
    }

    /// Terminal step: record the response status and body.
    ///
    /// Consumes the context so no further step can run for this request.
    pub fn reply<T>(self, status: StatusCode, body: &T) -> Reply
    where
        T: Serialize,
    {
        Reply {
            status,
            body: serde_json::to_vec(body),
        }
    }
}

async fn read_body(mut payload: Payload) -> Result<BytesMut, Error> {
    let mut buffer = BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|err| {
            warn!(error = %err, "request body read failed");
            Error::invalid_request(ErrorReason::BodyDecodeFailed, BODY_UNREADABLE_MESSAGE)
        })?;
        if buffer.len() + chunk.len() > MAX_BODY_BYTES {
            warn!(limit = MAX_BODY_BYTES, "request body exceeds limit");
            return Err(Error::invalid_request(
                ErrorReason::BodyDecodeFailed,
                BODY_UNREADABLE_MESSAGE,
            ));
        }
        buffer.extend_from_slice(&chunk);
    }
    Ok(buffer)
}

/// Response emission step: a status and an already-encoded JSON body.
pub struct Reply {
    status: StatusCode,
    body: Result<Vec<u8>, serde_json::Error>,
}

impl Reply {
    /// Status this reply will be emitted with.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl Responder for Reply {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        match self.body {
            Ok(body) => {
                debug!(status = self.status.as_u16(), "emitting response");
                HttpResponse::build(self.status)
                    .insert_header((CONTENT_TYPE, HeaderValue::from_static("application/json")))
                    .body(body)
            }
            Err(err) => {
                error!(error = %err, "response body serialisation failed");
                fallback_response()
            }
        }
    }
}
