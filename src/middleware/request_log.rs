//! Request/response logging.
//!
//! Two layers cooperate, stacked by [`request_logging`]:
//!
//! - [`RequestLogLayer`] (outer) assigns the correlation id, stores the
//!   [`RequestRecord`] in the request extensions and attaches a
//!   `Completion` guard to the response body. The guard emits
//!   `request completed` when the body is dropped, which happens once the
//!   last frame is handed to the connection, the stream fails or the
//!   caller goes away. Duration therefore covers the relayed body.
//! - A [`TraceLayer`] (inner) opens the `request` span from the stored
//!   record and emits `request started`.
//!
//! Response bodies are never buffered; frames pass through as the inner
//! service produces them.

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use axum::body::{Body, Bytes, HttpBody};
use axum::extract::ConnectInfo;
use axum::http::{header, HeaderMap, Request, Response, StatusCode};
use axum::BoxError;
use http_body_util::BodyExt;
use tower::layer::util::{Identity, Stack};
use tower::{Layer, Service, ServiceBuilder};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{MakeSpan, OnRequest, OnResponse, TraceLayer};
use tracing::Span;

/// The span and `request started` half of the request log.
pub type RequestTraceLayer = TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    RequestSpan,
    LogStarted,
    LogResponseHead,
    (),
    (),
    (),
>;

/// Full request logging stack: correlation id and completion outside,
/// tracing span and start record inside.
#[must_use]
pub fn request_logging() -> ServiceBuilder<Stack<RequestTraceLayer, Stack<RequestLogLayer, Identity>>>
{
    ServiceBuilder::new()
        .layer(RequestLogLayer::new())
        .layer(trace_layer())
}

#[must_use]
pub fn trace_layer() -> RequestTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(RequestSpan)
        .on_request(LogStarted)
        .on_response(LogResponseHead)
        .on_body_chunk(())
        .on_eos(())
        .on_failure(())
}

/// Request context captured when a request arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRecord {
    pub request_id: String,
    pub method: String,
    pub path: String,
    pub query: String,
    pub remote_addr: String,
    pub user_agent: String,
    pub referer: String,
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

impl RequestRecord {
    /// Capture the request context and assign a new correlation id.
    pub fn capture<B>(req: &Request<B>) -> Self {
        let remote_addr = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.to_string())
            .unwrap_or_default();

        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            method: req.method().to_string(),
            path: req.uri().path().to_string(),
            query: req.uri().query().unwrap_or_default().to_string(),
            remote_addr,
            user_agent: header_str(req.headers(), header::USER_AGENT),
            referer: header_str(req.headers(), header::REFERER),
        }
    }

    pub fn started(&self) {
        tracing::info!(
            request_id = %self.request_id,
            method = %self.method,
            path = %self.path,
            query = %self.query,
            remote_addr = %self.remote_addr,
            user_agent = %self.user_agent,
            referer = %self.referer,
            "request started"
        );
    }

    pub fn completed(&self, status: StatusCode, duration: Duration, body_bytes: u64) {
        tracing::info!(
            request_id = %self.request_id,
            method = %self.method,
            path = %self.path,
            status = status.as_u16(),
            body_bytes,
            duration_ms = duration.as_secs_f64() * 1000.0,
            duration_human = %format!("{duration:?}"),
            "request completed"
        );
    }
}

/// Opens the `request` span from the [`RequestRecord`] stored by
/// [`RequestLog`]. Without one, the span carries no correlation id.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, req: &Request<B>) -> Span {
        match req.extensions().get::<RequestRecord>() {
            Some(record) => tracing::info_span!(
                "request",
                request_id = %record.request_id,
                method = %record.method,
                path = %record.path
            ),
            None => tracing::info_span!(
                "request",
                request_id = tracing::field::Empty,
                method = %req.method(),
                path = %req.uri().path()
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogStarted;

impl<B> OnRequest<B> for LogStarted {
    fn on_request(&mut self, req: &Request<B>, _span: &Span) {
        if let Some(record) = req.extensions().get::<RequestRecord>() {
            record.started();
        }
    }
}

/// Time to response head; the body may still be streaming.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogResponseHead;

impl<B> OnResponse<B> for LogResponseHead {
    fn on_response(self, response: &Response<B>, latency: Duration, _span: &Span) {
        tracing::debug!(
            status = response.status().as_u16(),
            latency_ms = latency.as_secs_f64() * 1000.0,
            "response head ready"
        );
    }
}

/// Emits `request completed` when dropped together with the response body.
#[derive(Debug)]
struct Completion {
    record: RequestRecord,
    status: StatusCode,
    start: Instant,
    body_bytes: u64,
}

impl Drop for Completion {
    fn drop(&mut self) {
        self.record
            .completed(self.status, self.start.elapsed(), self.body_bytes);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestLogLayer;

impl RequestLogLayer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for RequestLogLayer {
    type Service = RequestLog<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLog { inner }
    }
}

#[derive(Debug, Clone)]
pub struct RequestLog<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequestLog<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + 'static,
    S::Future: Send + 'static,
    S::Error: std::fmt::Display + 'static,
    ReqBody: 'static,
    ResBody: HttpBody<Data = Bytes> + Send + 'static,
    ResBody::Error: Into<BoxError>,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let record = RequestRecord::capture(&req);
        req.extensions_mut().insert(record.clone());
        let start = Instant::now();
        let inner = self.inner.call(req);

        Box::pin(async move {
            match inner.await {
                Ok(response) => {
                    let mut completion = Completion {
                        record,
                        status: response.status(),
                        start,
                        body_bytes: 0,
                    };
                    Ok(response.map(|body| {
                        Body::new(body.map_frame(move |frame| {
                            if let Some(data) = frame.data_ref() {
                                completion.body_bytes += data.len() as u64;
                            }
                            frame
                        }))
                    }))
                }
                // Errors belong to the inner service; only note that no status was produced.
                Err(e) => {
                    tracing::warn!(
                        request_id = %record.request_id,
                        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                        error = %e,
                        "request failed without a response"
                    );
                    Err(e)
                }
            }
        })
    }
}
