//! Structured logging with request context.
//!
//! Provides a log prefix carrying request_id, platform and tab so the
//! lines of one check/capture can be correlated, and a fingerprint helper
//! so credentials never reach the log output.

pub mod structured;

pub use structured::*;
