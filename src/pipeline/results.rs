//! Handler results as sent back to the popup.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::models::RecordResponse;
use crate::platform::detect::Platform;
use crate::profile::models::ProfileData;

use super::host::BadgeState;

/// Existing person surfaced by a check.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonSummary {
    pub id: String,
    pub name: String,
    pub attio_url: Option<String>,
}

/// Outcome of `checkPerson`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person: Option<PersonSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_data: Option<ProfileData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckResult {
    pub fn failed(error: &str) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::default()
        }
    }

    pub fn absent(profile: ProfileData) -> Self {
        Self {
            profile_data: Some(profile),
            ..Self::default()
        }
    }
}

/// Outcome of `captureProfile`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<RecordResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CaptureResult {
    pub fn failed(error: &str) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::default()
        }
    }
}

/// Outcome of `refreshBadge`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeResult {
    pub success: bool,
    pub badge: BadgeState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
}

/// Outcome of `connect`, `disconnect` and rejected messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AckResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AckResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Outcome of `status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResult {
    pub authenticated: bool,
    /// Epoch milliseconds on the wire, as stored.
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub last_sync: Option<DateTime<Utc>>,
}
