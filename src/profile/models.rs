//! Normalized profile scrape result.

use serde::{Deserialize, Serialize};

/// Profile data extracted from a supported platform's page.
///
/// When `error` is set every other field must be ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileData {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reddit_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProfileData {
    /// A failed extraction carrying only the scraper's message.
    pub fn failed(error: &str) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::default()
        }
    }

    /// Name to record: the scraped full name, else the first username-like
    /// field.
    pub fn display_name(&self) -> Option<&str> {
        non_empty(self.full_name.as_deref()).or_else(|| self.username_fallback())
    }

    /// First username-like field present, used when no display name was found.
    pub fn username_fallback(&self) -> Option<&str> {
        [&self.username, &self.twitter_handle, &self.reddit_username]
            .into_iter()
            .find_map(|field| non_empty(field.as_deref()))
    }
}

/// Treat empty strings the same as absent values.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
