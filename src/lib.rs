//! Export client library: the document model, the HTML renderer, the API
//! client, and the export flow. The binary in `main.rs` is a thin dispatcher
//! over these services.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
