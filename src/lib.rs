//! chain-proxy is a local forwarding proxy that stamps every request with
//! this device's identity.
//!
//! It accepts any HTTP request, requires a JSON object body, sets
//! `creator_id` in that body to the device identifier, strips a leading
//! `/api` from the path and forwards the request to the configured
//! upstream with an `X-Device-ID` header. The upstream status, headers
//! and body are relayed back unchanged.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, init, validate, device-id).
//! - [`config`] -- Configuration model, file loading and validation.
//! - [`error`] -- Startup and per-request error types using `thiserror`.
//! - [`identity`] -- Device identifier resolution and verification.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`middleware`] -- Request logging layer with per-request correlation ids.
//! - [`proxy`] -- Core forwarding: body mutation, path rewrite, header
//!   propagation and response relay.
//! - [`server`] -- Axum router composition, shared state, HTTP client, and
//!   graceful shutdown.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML config file support _(enabled by default)_ |
//! | `json` | JSON config file support |
//! | `toml` | TOML config file support |

// Library surface exists for the binary and integration tests only.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod identity;
pub mod logging;
pub mod middleware;
pub mod proxy;
pub mod server;
