//! Display-name reconciliation for an existing record.
//!
//! Records may have been seeded with a handle as their name before a real
//! name was ever scraped. A stored name is only trusted when it contains a
//! space; otherwise the freshly scraped name wins. Single-word legal names
//! and two-word handles are misjudged by this heuristic.

use crate::api::models::PersonRecord;
use crate::logging::structured::LogContext;
use crate::profile::models::ProfileData;

/// Name shown when neither the record nor the scrape has one.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Name to surface for an existing record.
pub fn resolve_display_name(
    existing: &PersonRecord,
    profile: &ProfileData,
    ctx: &LogContext,
) -> String {
    let stored = existing.stored_name();
    let scraped = profile.display_name();

    let resolved = match stored {
        Some(name) if looks_like_full_name(name) => name,
        _ => scraped.or(stored).unwrap_or(UNKNOWN_NAME),
    };

    log::debug!(
        "{} NAME_RESOLVED stored={:?} scraped={:?} resolved={:?}",
        ctx,
        stored,
        scraped,
        resolved
    );

    resolved.to_string()
}

fn looks_like_full_name(name: &str) -> bool {
    name.contains(' ')
}
