//! Durable extension state.
//!
//! A small key-value seam standing in for the extension's local storage,
//! plus typed accessors for the two keys the core uses: the API key and
//! the last successful sync time.

pub mod credential;
pub mod kv;

pub use credential::*;
pub use kv::*;
