//! Scraped profile data.
//!
//! `ProfileData` is produced by the per-platform page scrapers outside this
//! crate; here it is only modelled and checked for usability.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::*;
