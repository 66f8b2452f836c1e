//! Matching-attribute resolution.
//!
//! Maps a platform to the CRM attribute used as its deduplication key and
//! to the profile field holding the search value.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::platform::detect::Platform;
use crate::profile::models::{non_empty, ProfileData};

/// CRM person attribute slug used for deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchingAttribute {
    Linkedin,
    Twitter,
    Name,
}

impl MatchingAttribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchingAttribute::Linkedin => "linkedin",
            MatchingAttribute::Twitter => "twitter",
            MatchingAttribute::Name => "name",
        }
    }
}

impl fmt::Display for MatchingAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CRM attribute that deduplicates people captured from `platform`.
pub fn attribute_for(platform: Platform) -> MatchingAttribute {
    match platform {
        Platform::Linkedin => MatchingAttribute::Linkedin,
        Platform::Twitter => MatchingAttribute::Twitter,
        Platform::Reddit => MatchingAttribute::Name,
    }
}

/// Value to search the matching attribute for.
///
/// `None` means the profile cannot be searched, not that nobody matches.
pub fn search_value_for(platform: Platform, profile: &ProfileData) -> Option<&str> {
    match platform {
        Platform::Linkedin => non_empty(profile.linkedin_url.as_deref()),
        Platform::Twitter => non_empty(profile.twitter_handle.as_deref()),
        Platform::Reddit => profile.display_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_table() {
        assert_eq!(attribute_for(Platform::Linkedin).as_str(), "linkedin");
        assert_eq!(attribute_for(Platform::Twitter).as_str(), "twitter");
        assert_eq!(attribute_for(Platform::Reddit).as_str(), "name");
    }

    #[test]
    fn test_reddit_searches_by_name() {
        let profile = ProfileData {
            full_name: Some("Jane Doe".to_string()),
            reddit_username: Some("janedoe".to_string()),
            ..ProfileData::default()
        };
        assert_eq!(search_value_for(Platform::Reddit, &profile), Some("Jane Doe"));
    }

    #[test]
    fn test_reddit_falls_back_to_username() {
        let profile = ProfileData {
            username: Some("spez".to_string()),
            reddit_username: Some("spez".to_string()),
            ..ProfileData::default()
        };
        assert_eq!(search_value_for(Platform::Reddit, &profile), Some("spez"));
        assert_eq!(search_value_for(Platform::Reddit, &ProfileData::default()), None);
    }

    #[test]
    fn test_missing_field_is_unsearchable() {
        let profile = ProfileData {
            full_name: Some("Jane Doe".to_string()),
            linkedin_url: None,
            ..ProfileData::default()
        };
        assert_eq!(search_value_for(Platform::Linkedin, &profile), None);
        assert_eq!(search_value_for(Platform::Twitter, &profile), None);
    }

    #[test]
    fn test_empty_field_is_unsearchable() {
        let profile = ProfileData {
            twitter_handle: Some(String::new()),
            ..ProfileData::default()
        };
        assert_eq!(search_value_for(Platform::Twitter, &profile), None);
    }

    #[test]
    fn test_platform_specific_fields() {
        let profile = ProfileData {
            full_name: Some("John Doe".to_string()),
            linkedin_url: Some("https://linkedin.com/in/johndoe".to_string()),
            twitter_handle: Some("johndoe".to_string()),
            ..ProfileData::default()
        };
        assert_eq!(
            search_value_for(Platform::Linkedin, &profile),
            Some("https://linkedin.com/in/johndoe")
        );
        assert_eq!(search_value_for(Platform::Twitter, &profile), Some("johndoe"));
    }
}
