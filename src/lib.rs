//! Attio capture core - person capture from social profile pages
//!
//! This crate holds the logic behind an "Add to Attio" browser extension:
//! deciding whether a page is a supported profile, finding the matching
//! person in the Attio CRM, and creating or updating it without duplicates.
//! Page scraping and browser UI stay outside and are reached through
//! `pipeline::ExtensionHost`.
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `platform` - URL classification and deduplication attribute choice
//! - `profile` - Scraped profile model and usability checks
//! - `api` - Attio REST transport, client and error taxonomy
//! - `search` - Attribute-dependent query filters and person lookup
//! - `pipeline` - Upsert, name reconciliation, handlers and messages
//! - `storage` - Key-value state and credential accessors
//! - `config` - Endpoint configuration
//! - `logging` - Structured logging with request context

pub mod api;
pub mod config;
pub mod logging;
pub mod pipeline;
pub mod platform;
pub mod profile;
pub mod search;
pub mod storage;

pub use api::{AttioApiError, AttioClient, ErrorKind, HttpTransport, Transport};
pub use config::AttioConfig;
pub use pipeline::{Background, BadgeState, ExtensionHost, Message, Response};
pub use platform::{detect_platform, MatchingAttribute, Platform};
pub use profile::ProfileData;

/// Initialize the process-wide logger.
///
/// Safe to call more than once; only the first call installs a logger.
/// `RUST_LOG` still overrides the default `info` level.
pub fn init_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_millis()
        .try_init();
}
