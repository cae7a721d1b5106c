//! Tower middleware layers.
//!
//! [`request_logging`] wraps any HTTP service and emits a started and a
//! completed record for every request, joined by a fresh correlation id.

pub mod request_log;

pub use request_log::{request_logging, RequestLog, RequestLogLayer, RequestRecord};
