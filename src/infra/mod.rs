//! Infrastructure adapters: the HTTP client, export-key handling, and the
//! tracing bootstrap.

pub mod api;
pub mod key;
pub mod telemetry;
