//! The browser-side collaborator.
//!
//! Page scraping, toast rendering and icon painting live outside this
//! crate. The handlers reach them through `ExtensionHost`.

use serde::{Deserialize, Serialize};

use crate::profile::models::ProfileData;

/// Toolbar badge decision for a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeState {
    /// The person on the page is already in the CRM.
    Exists,
    /// The page is a supported profile that can be captured.
    Capturable,
    /// Not a supported profile page.
    Clear,
}

/// In-page confirmation after a capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub success: bool,
    pub message: String,
}

impl Feedback {
    pub fn success(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }

    pub fn failure(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
        }
    }
}

/// The host could not reach the tab or its content script.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct HostError(String);

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Extension surface the handlers drive.
pub trait ExtensionHost: Send + Sync {
    /// Scrape the profile shown in `tab_id`.
    fn extract_profile(&self, tab_id: i64) -> Result<ProfileData, HostError>;

    fn show_feedback(&self, tab_id: i64, feedback: &Feedback) -> Result<(), HostError>;

    fn set_badge(&self, tab_id: i64, state: BadgeState) -> Result<(), HostError>;
}
