//! Person upsert.
//!
//! Query-then-create/update. The API's own matching-attribute upsert only
//! accepts unique attributes and `linkedin` is not unique on People, so the
//! search runs first and the write branches on its result.
//!
//! Not atomic: two concurrent upserts for the same person can both miss
//! and both create.

use serde::Serialize;

use crate::api::client::AttioClient;
use crate::api::error::AttioApiError;
use crate::api::models::{PersonRecord, ValuesInput};
use crate::api::transport::Transport;
use crate::logging::structured::LogContext;
use crate::platform::detect::Platform;
use crate::platform::matching::{search_value_for, MatchingAttribute};
use crate::profile::models::ProfileData;
use crate::search::find::find_person;

/// Which write the upsert performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertAction {
    Created,
    Updated,
}

/// Result of an upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertOutcome {
    pub action: UpsertAction,
    pub record: PersonRecord,
}

/// Create or update the person described by `profile`.
///
/// Every scraped attribute is written on both branches, so an update can
/// fill in a previously sparse record. When the platform's search field is
/// missing no search is made and a new record is created. A profile with
/// nothing to write is refused before any request.
pub fn upsert_person<T: Transport>(
    client: &AttioClient<T>,
    credential: &str,
    profile: &ProfileData,
    attribute: MatchingAttribute,
    platform: Platform,
    ctx: &LogContext,
) -> Result<UpsertOutcome, AttioApiError> {
    let search_value = search_value_for(platform, profile);
    let values = ValuesInput::from_profile(profile);

    if values.is_empty() {
        log::warn!("{} UPSERT_REFUSED reason=empty_values platform={}", ctx, platform);
        return Err(AttioApiError::EmptyRecord);
    }

    log::info!(
        "{} UPSERT_START platform={} attribute={} has_search_value={}",
        ctx,
        platform,
        attribute,
        search_value.is_some()
    );

    let existing = match search_value {
        Some(value) => find_person(client, credential, attribute.as_str(), value, ctx)?,
        None => None,
    };

    let outcome = match existing {
        Some(person) => {
            let record_id = person.record_id().ok_or_else(|| {
                AttioApiError::Decode("matched record has no record_id".to_string())
            })?;
            log::info!("{} UPSERT_UPDATE record_id={}", ctx, record_id);
            UpsertOutcome {
                action: UpsertAction::Updated,
                record: client.update_person(credential, record_id, &values, ctx)?,
            }
        }
        None => {
            log::info!("{} UPSERT_CREATE", ctx);
            UpsertOutcome {
                action: UpsertAction::Created,
                record: client.create_person(credential, &values, ctx)?,
            }
        }
    };

    log::info!(
        "{} UPSERT_COMPLETE action={:?} record_id={:?}",
        ctx,
        outcome.action,
        outcome.record.record_id()
    );

    Ok(outcome)
}
