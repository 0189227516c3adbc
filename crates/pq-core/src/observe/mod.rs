//! # Observability
//!
//! Structured logging via `tracing`. The numeric stages do not log; the
//! [`crate::analyzer::PowerQualityAnalyzer`] facade emits `debug`/`trace`
//! events inside a span per analysis, which show up once a subscriber is
//! installed with [`init_logging`].
//!
//! ```rust,ignore
//! use pq_core::observe::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development());
//! ```

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
