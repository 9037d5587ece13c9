//! Observability for billdesk.
//!
//! This crate provides:
//! - `init` / `LoggingConfig` - Global `tracing` subscriber setup
//! - `LogLevel` / `LogFormat` - Config-file friendly logging knobs
//! - `LoggingConsumer` - An invoice consumer that records totals as log events

mod consumer;
mod logging;

pub use consumer::*;
pub use logging::*;
