//! Record search.
//!
//! Builds the attribute-dependent query filter and looks up the first
//! person matching a deduplication value.

pub mod filter;
pub mod find;

pub use filter::*;
pub use find::*;
