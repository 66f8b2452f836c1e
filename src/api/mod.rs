//! Attio REST API access.
//!
//! - `models` - person records and write payloads as they appear on the wire
//! - `error` - the API error taxonomy
//! - `transport` - the HTTP seam and its reqwest implementation
//! - `client` - authenticated create/update/query/self calls

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::*;
pub use error::*;
pub use models::*;
pub use transport::*;
