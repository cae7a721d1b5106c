//! Shared helpers: a recording stub upstream and a proxy bound to it.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{AppendHeaders, IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Map, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use chain_proxy::identity::DeviceId;
use chain_proxy::server::{self, AppState};

pub const DEVICE_ID: &str = "3f2b8c1e-9d4a-4e6f-b7a1-0c5d2e8f9a13";

/// Stub upstream that counts hits and echoes what it received as JSON.
///
/// `/created` answers 201 with `X-Foo: bar`, `/cookies` answers with two
/// `Set-Cookie` values; everything else is echoed.
pub struct StubUpstream {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl StubUpstream {
    pub async fn spawn() -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = Router::new()
            .fallback(echo)
            .with_state(Arc::clone(&hits));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { addr, hits }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn echo(
    State(hits): State<Arc<AtomicUsize>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    hits.fetch_add(1, Ordering::SeqCst);

    match uri.path() {
        "/created" => {
            return (
                StatusCode::CREATED,
                [("x-foo", "bar"), ("content-type", "application/json")],
                r#"{"ok":true}"#,
            )
                .into_response();
        }
        "/cookies" => {
            return (
                AppendHeaders([(header::SET_COOKIE, "a=1"), (header::SET_COOKIE, "b=2")]),
                "cookies",
            )
                .into_response();
        }
        _ => {}
    }

    let mut seen = Map::new();
    for name in headers.keys() {
        let values: Vec<String> = headers
            .get_all(name)
            .iter()
            .map(|v| v.to_str().unwrap_or_default().to_string())
            .collect();
        seen.insert(name.to_string(), json!(values));
    }

    Json(json!({
        "method": method.as_str(),
        "path": uri.path(),
        "query": uri.query(),
        "headers": seen,
        "body_len": body.len(),
        "body": serde_json::from_slice::<Value>(&body).unwrap_or(Value::Null),
    }))
    .into_response()
}

/// Start the proxy on an ephemeral port, forwarding to `upstream`.
pub async fn spawn_proxy(upstream: String) -> SocketAddr {
    let device_id = DeviceId::parse(DEVICE_ID, "test").unwrap();
    let state = Arc::new(AppState::new(upstream, device_id));
    let router = server::build_router(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    addr
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// How a [`spawn_scripted_upstream`] answers its single request.
#[derive(Debug, Clone, Copy)]
pub struct Script {
    /// Value of the `content-length` response header.
    pub declared_len: usize,
    /// Body bytes sent right after the head.
    pub first: &'static [u8],
    pub pause: Duration,
    /// Sent after the pause; `None` hangs up instead.
    pub rest: Option<&'static [u8]>,
}

/// Raw TCP upstream that answers one request according to `script`.
pub async fn spawn_scripted_upstream(script: Script) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.unwrap();
        read_request_head(&mut sock).await;

        let head = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: text/plain\r\ncontent-length: {}\r\n\r\n",
            script.declared_len
        );
        let _ = sock.write_all(head.as_bytes()).await;
        let _ = sock.write_all(script.first).await;
        let _ = sock.flush().await;

        tokio::time::sleep(script.pause).await;
        if let Some(rest) = script.rest {
            let _ = sock.write_all(rest).await;
            let _ = sock.flush().await;
        }
    });
    addr
}

/// Raw TCP upstream that accepts connections, reads the request and never answers.
pub async fn spawn_silent_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((mut sock, _)) = listener.accept().await {
            read_request_head(&mut sock).await;
            held.push(sock);
        }
    });
    addr
}

async fn read_request_head(sock: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match sock.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
}
