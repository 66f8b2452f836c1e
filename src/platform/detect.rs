//! Platform detection from a page URL.
//!
//! Classifies a URL as a LinkedIn, X/Twitter or Reddit profile page.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// LinkedIn member profile: /in/<slug>
    static ref LINKEDIN_PROFILE: Regex =
        Regex::new(r"^https://(www\.)?linkedin\.com/in/[^/]+").unwrap();

    /// X/Twitter profile: exactly one path segment, optional trailing slash
    static ref TWITTER_PROFILE: Regex =
        Regex::new(r"^https://(www\.)?(twitter|x)\.com/[^/]+/?$").unwrap();

    /// Reddit user page: /user/<name>
    static ref REDDIT_PROFILE: Regex =
        Regex::new(r"^https://(www\.)?reddit\.com/user/[^/]+").unwrap();

    /// First path segment of an X/Twitter URL.
    static ref TWITTER_FIRST_SEGMENT: Regex =
        Regex::new(r"(?:twitter|x)\.com/([^/?]+)").unwrap();
}

/// First path segments on X/Twitter that are app chrome, not profiles.
pub const TWITTER_NON_PROFILE_PATHS: &[&str] = &[
    "home",
    "explore",
    "notifications",
    "messages",
    "settings",
    "i",
    "search",
];

/// A supported social platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linkedin,
    Twitter,
    Reddit,
}

impl Platform {
    /// All platforms, in detection order.
    pub const ALL: [Platform; 3] = [Platform::Linkedin, Platform::Twitter, Platform::Reddit];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linkedin => "linkedin",
            Platform::Twitter => "twitter",
            Platform::Reddit => "reddit",
        }
    }

    /// Human-facing name shown by the popup.
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Linkedin => "LinkedIn",
            Platform::Twitter => "X (Twitter)",
            Platform::Reddit => "Reddit",
        }
    }

    fn profile_pattern(&self) -> &'static Regex {
        match self {
            Platform::Linkedin => &LINKEDIN_PROFILE,
            Platform::Twitter => &TWITTER_PROFILE,
            Platform::Reddit => &REDDIT_PROFILE,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linkedin" => Ok(Platform::Linkedin),
            "twitter" => Ok(Platform::Twitter),
            "reddit" => Ok(Platform::Reddit),
            other => Err(format!("unsupported platform: {}", other)),
        }
    }
}

/// Detect which platform profile a URL points at.
///
/// Returns `None` for empty input, non-profile pages, and X/Twitter
/// chrome paths such as `/home` or `/settings`.
pub fn detect_platform(url: &str) -> Option<Platform> {
    if url.is_empty() {
        return None;
    }

    let platform = Platform::ALL
        .into_iter()
        .find(|p| p.profile_pattern().is_match(url))?;

    if platform == Platform::Twitter && is_twitter_chrome(url) {
        log::debug!("PLATFORM_SKIPPED reason=twitter_non_profile url={}", url);
        return None;
    }

    Some(platform)
}

fn is_twitter_chrome(url: &str) -> bool {
    TWITTER_FIRST_SEGMENT
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|segment| {
            let segment = segment.as_str().to_lowercase();
            TWITTER_NON_PROFILE_PATHS.contains(&segment.as_str())
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_linkedin_profiles() {
        assert_eq!(
            detect_platform("https://www.linkedin.com/in/john-doe"),
            Some(Platform::Linkedin)
        );
        assert_eq!(
            detect_platform("https://linkedin.com/in/john-doe-123abc/"),
            Some(Platform::Linkedin)
        );
        assert_eq!(detect_platform("https://www.linkedin.com/company/attio"), None);
        assert_eq!(detect_platform("https://www.linkedin.com/feed"), None);
    }

    #[test]
    fn test_twitter_profiles() {
        assert_eq!(detect_platform("https://x.com/johndoe"), Some(Platform::Twitter));
        assert_eq!(detect_platform("https://x.com/johndoe/"), Some(Platform::Twitter));
        assert_eq!(
            detect_platform("https://www.twitter.com/johndoe"),
            Some(Platform::Twitter)
        );
        assert_eq!(detect_platform("https://twitter.com/johndoe/status/123"), None);
    }

    #[test]
    fn test_twitter_denylist() {
        for path in ["home", "explore", "notifications", "messages", "settings", "i", "search"] {
            assert_eq!(detect_platform(&format!("https://x.com/{}", path)), None, "{}", path);
        }
        assert_eq!(detect_platform("https://x.com/HOME"), None);
        assert_eq!(detect_platform("https://twitter.com/Explore/"), None);
    }

    #[test]
    fn test_reddit_profiles() {
        assert_eq!(
            detect_platform("https://www.reddit.com/user/johndoe"),
            Some(Platform::Reddit)
        );
        assert_eq!(
            detect_platform("https://reddit.com/user/johndoe/comments"),
            Some(Platform::Reddit)
        );
        assert_eq!(detect_platform("https://www.reddit.com/r/programming"), None);
    }

    #[test]
    fn test_unsupported_urls() {
        assert_eq!(detect_platform(""), None);
        assert_eq!(detect_platform("not a url"), None);
        assert_eq!(detect_platform("http://x.com/johndoe"), None);
        assert_eq!(detect_platform("https://github.com/johndoe"), None);
    }

    #[test]
    fn test_platform_round_trip_names() {
        for platform in Platform::ALL {
            assert_eq!(platform.as_str().parse::<Platform>(), Ok(platform));
        }
        assert!("facebook".parse::<Platform>().is_err());
        assert_eq!(Platform::Twitter.display_name(), "X (Twitter)");
        assert_eq!(
            serde_json::to_string(&Platform::Linkedin).unwrap(),
            r#""linkedin""#
        );
    }

    proptest! {
        #[test]
        fn prop_twitter_handles_detected(handle in "[a-zA-Z0-9_]{1,15}") {
            let expected = if TWITTER_NON_PROFILE_PATHS.contains(&handle.to_lowercase().as_str()) {
                None
            } else {
                Some(Platform::Twitter)
            };
            prop_assert_eq!(detect_platform(&format!("https://x.com/{}", handle)), expected);
        }

        #[test]
        fn prop_linkedin_slugs_detected(slug in "[a-z0-9-]{1,30}") {
            prop_assert_eq!(
                detect_platform(&format!("https://www.linkedin.com/in/{}", slug)),
                Some(Platform::Linkedin)
            );
        }

        #[test]
        fn prop_detect_never_panics(url in ".*") {
            let _ = detect_platform(&url);
        }
    }
}
