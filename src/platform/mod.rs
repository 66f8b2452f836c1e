//! Platform classification.
//!
//! Determines which supported platform a page belongs to and which CRM
//! attribute deduplicates people captured from it:
//! - LinkedIn -> `linkedin` (profile URL)
//! - X/Twitter -> `twitter` (handle)
//! - Reddit -> `name` (no dedicated CRM field)

pub mod detect;
pub mod matching;

pub use detect::*;
pub use matching::*;
