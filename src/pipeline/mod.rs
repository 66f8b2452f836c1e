//! Request pipeline.
//!
//! Turns popup and content-script messages into CRM lookups and writes:
//! - Request context
//! - Person upsert
//! - Display-name reconciliation
//! - Background handlers and message dispatch

pub mod context;
pub mod handlers;
pub mod host;
pub mod message;
pub mod reconcile;
pub mod results;
pub mod upsert;

pub use context::*;
pub use handlers::*;
pub use host::*;
pub use message::*;
pub use reconcile::*;
pub use results::*;
pub use upsert::*;
