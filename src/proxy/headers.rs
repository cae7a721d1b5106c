//! Header propagation between caller and upstream.
//!
//! [`build_upstream_headers`] copies every inbound header value, then
//! sets `X-Device-ID` and recomputes `Content-Length` for the mutated
//! body. The overrides run after the copy so a stale inherited
//! `Content-Length` can never reach the upstream.
//! [`relay_response_headers`] prepares upstream response headers for the
//! caller.

use axum::http::{header, HeaderMap, HeaderName, HeaderValue};

pub static X_DEVICE_ID: HeaderName = HeaderName::from_static("x-device-id");

/// Inbound headers the HTTP layer consumes rather than forwards. `Host`
/// is derived from the target URL by the client and the mutated body is
/// always sent with an explicit length.
fn is_forwarded(name: &HeaderName) -> bool {
    name != header::HOST && name != header::TRANSFER_ENCODING
}

pub fn build_upstream_headers(
    original: &HeaderMap,
    device_id: &HeaderValue,
    body_len: usize,
) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(original.len() + 2);

    // HeaderMap iterates every value of a multi-valued key, in order.
    for (name, value) in original {
        if !is_forwarded(name) {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }

    headers.insert(X_DEVICE_ID.clone(), device_id.clone());
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(body_len));

    headers
}

/// Drop `Transfer-Encoding` from an upstream response; the listener picks
/// the framing for the relayed stream. Everything else passes through.
pub fn relay_response_headers(headers: &mut HeaderMap) {
    headers.remove(header::TRANSFER_ENCODING);
}
