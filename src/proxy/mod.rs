//! Core HTTP request forwarding handler.
//!
//! The [`forward_handler`] function is the Axum fallback that receives
//! every request, stamps its JSON body with the device identifier and
//! relays it to the upstream. Submodules handle body mutation
//! ([`body`]), upstream URL construction ([`routing`]) and header
//! propagation ([`headers`]).
//!
//! **Partial delivery:** the upstream response body is streamed to the
//! caller as it arrives. Once status and headers are sent, a failure
//! while streaming cannot be turned into an error response; it is logged
//! and the caller's connection is aborted with whatever bytes were
//! already flushed.

pub mod body;
pub mod headers;
pub mod routing;

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};

use crate::error::ForwardError;
use crate::server::AppState;

pub async fn forward_handler(State(state): State<Arc<AppState>>, req: Request) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    match forward(&state, req).await {
        Ok(response) => response,
        Err(e) => {
            if e.status() == StatusCode::BAD_REQUEST {
                tracing::warn!(method = %method, path = %path, error = %e, "rejected request");
            } else {
                tracing::error!(method = %method, path = %path, error = %e, "forwarding failed");
            }
            e.into_response()
        }
    }
}

async fn forward(state: &AppState, req: Request) -> Result<Response, ForwardError> {
    let (parts, inbound) = req.into_parts();

    // No size cap: the whole body is buffered before it is decoded.
    let raw = inbound
        .collect()
        .await
        .map_err(ForwardError::BodyRead)?
        .to_bytes();

    let mutated = body::inject_creator_id(&raw, state.device_id.as_str())?;

    let target = routing::target_url(&state.upstream, parts.uri.path());
    tracing::debug!(
        method = %parts.method,
        path = %parts.uri.path(),
        target_url = %target,
        "forwarding request"
    );

    let outbound_headers =
        headers::build_upstream_headers(&parts.headers, state.device_id.header_value(), mutated.len());

    let mut upstream_req = hyper::Request::builder()
        .method(parts.method)
        .uri(target.as_str())
        .body(Full::new(Bytes::from(mutated)))
        .map_err(ForwardError::RequestConstruction)?;
    *upstream_req.headers_mut() = outbound_headers;

    let response = state
        .http_client
        .request(upstream_req)
        .await
        .map_err(ForwardError::UpstreamUnreachable)?;

    let (mut resp_parts, upstream_body) = response.into_parts();
    headers::relay_response_headers(&mut resp_parts.headers);

    tracing::debug!(
        target_url = %target,
        status = resp_parts.status.as_u16(),
        "upstream responded"
    );

    // The upstream body is dropped, and its connection released, when the
    // relayed stream finishes or is abandoned.
    let span = tracing::Span::current();
    let relayed = upstream_body.map_err(move |e| {
        span.in_scope(|| tracing::warn!(error = %e, "upstream body interrupted"));
        e
    });

    Ok(Response::from_parts(resp_parts, Body::new(relayed)))
}
