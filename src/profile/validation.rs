//! Usability checks for scraped profiles.

use super::models::ProfileData;

/// Message used when the scraper returned neither a name nor a username.
pub const MISSING_IDENTITY_MESSAGE: &str =
    "Could not find profile information. Make sure you are on a profile page.";

/// Reason a scraped profile cannot be sent to the CRM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileRejection {
    /// The scraper reported a failure.
    Extraction(String),
    /// No display name and no username to fall back on.
    MissingIdentity,
}

impl ProfileRejection {
    pub fn message(&self) -> &str {
        match self {
            ProfileRejection::Extraction(message) => message,
            ProfileRejection::MissingIdentity => MISSING_IDENTITY_MESSAGE,
        }
    }
}

/// Check that a profile is usable for search and upsert.
pub fn validate_profile(profile: &ProfileData) -> Result<(), ProfileRejection> {
    if let Some(error) = &profile.error {
        return Err(ProfileRejection::Extraction(error.clone()));
    }

    if profile.display_name().is_none() {
        return Err(ProfileRejection::MissingIdentity);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_rejects_profile() {
        let mut profile = ProfileData::failed("Please navigate to a user profile page.");
        profile.full_name = Some("Ignored Name".to_string());

        let rejection = validate_profile(&profile).unwrap_err();
        assert_eq!(rejection.message(), "Please navigate to a user profile page.");
    }

    #[test]
    fn test_name_or_username_required() {
        assert_eq!(
            validate_profile(&ProfileData::default()),
            Err(ProfileRejection::MissingIdentity)
        );

        let with_handle = ProfileData {
            twitter_handle: Some("jdoe".to_string()),
            ..ProfileData::default()
        };
        assert!(validate_profile(&with_handle).is_ok());

        let with_name = ProfileData {
            full_name: Some("John Doe".to_string()),
            ..ProfileData::default()
        };
        assert!(validate_profile(&with_name).is_ok());
    }
}
