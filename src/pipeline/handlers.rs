//! Background request handlers.
//!
//! One method per popup or content-script request. Handlers never return
//! `Err`: every failure is folded into the result the caller renders.

use crate::api::client::AttioClient;
use crate::api::error::AttioApiError;
use crate::api::models::RecordResponse;
use crate::api::transport::{HttpTransport, Transport, TransportError};
use crate::config::AttioConfig;
use crate::logging::structured::{credential_fingerprint, LogContext};
use crate::platform::detect::{detect_platform, Platform};
use crate::platform::matching::{attribute_for, search_value_for};
use crate::profile::models::ProfileData;
use crate::profile::validation::validate_profile;
use crate::search::find::find_person;
use crate::storage::credential::CredentialStore;
use crate::storage::kv::KeyValueStore;

use super::context::RequestContext;
use super::host::{BadgeState, ExtensionHost, Feedback};
use super::reconcile::resolve_display_name;
use super::results::{
    AckResult, BadgeResult, CaptureResult, CheckResult, PersonSummary, StatusResult,
};
use super::upsert::upsert_person;

pub const NOT_AUTHENTICATED_CHECK: &str = "Not authenticated.";
pub const CONTENT_SCRIPT_NOT_READY: &str = "Content script not ready. Please refresh the page.";
pub const CHECK_EXTRACTION_FAILED: &str = "Failed to extract profile";
pub const CAPTURE_EXTRACTION_FAILED: &str = "Failed to extract profile data.";
pub const CAPTURE_ADDED: &str = "Added to Attio!";
pub const CAPTURE_UPDATED: &str = "Updated in Attio!";
pub const INVALID_API_KEY: &str = "Invalid API key. Please check and try again.";

/// The extension's background service.
pub struct Background<T: Transport, S: KeyValueStore, H: ExtensionHost> {
    client: AttioClient<T>,
    credentials: CredentialStore<S>,
    host: H,
    config: AttioConfig,
}

impl<T: Transport, S: KeyValueStore, H: ExtensionHost> Background<T, S, H> {
    pub fn new(client: AttioClient<T>, store: S, host: H, config: AttioConfig) -> Self {
        Self {
            client,
            credentials: CredentialStore::new(store),
            host,
            config,
        }
    }

    pub fn client(&self) -> &AttioClient<T> {
        &self.client
    }

    pub fn credentials(&self) -> &CredentialStore<S> {
        &self.credentials
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Is the person on `tab_id` already in the CRM?
    pub fn check_person(&self, platform: Platform, tab_id: i64) -> CheckResult {
        let req = RequestContext::for_tab(Some(platform), tab_id);
        let ctx = req.log_context();
        log::info!("{} CHECK_START", ctx);

        let api_key = match self.api_key(&ctx) {
            Some(key) => key,
            None => {
                log::info!("{} CHECK_UNAUTHENTICATED", ctx);
                return CheckResult::failed(NOT_AUTHENTICATED_CHECK);
            }
        };

        let profile = match self.host.extract_profile(tab_id) {
            Ok(profile) => profile,
            Err(e) => {
                log::warn!("{} CHECK_HOST_UNREACHABLE error={}", ctx, e);
                return CheckResult::failed(CONTENT_SCRIPT_NOT_READY);
            }
        };

        if let Err(rejection) = validate_profile(&profile) {
            log::info!("{} CHECK_PROFILE_REJECTED reason={}", ctx, rejection.message());
            let message = match rejection.message() {
                "" => CHECK_EXTRACTION_FAILED,
                message => message,
            };
            return CheckResult::failed(message);
        }

        let attribute = attribute_for(platform);
        let value = match search_value_for(platform, &profile) {
            Some(value) => value.to_string(),
            None => {
                log::info!("{} CHECK_NO_SEARCH_VALUE attribute={}", ctx, attribute);
                return CheckResult::absent(profile);
            }
        };

        let existing = match find_person(&self.client, &api_key, attribute.as_str(), &value, &ctx) {
            Ok(existing) => existing,
            Err(e) => {
                log::warn!("{} CHECK_FAILED kind={:?} error={}", ctx, e.kind(), e);
                return CheckResult::failed(&e.to_string());
            }
        };

        match existing {
            Some(person) => {
                let record_id = person.record_id().unwrap_or_default().to_string();
                let attio_url = self.record_url(&api_key, &record_id, &ctx);
                let name = resolve_display_name(&person, &profile, &ctx);

                log::info!(
                    "{} CHECK_COMPLETE exists=true record_id={} has_url={}",
                    ctx,
                    record_id,
                    attio_url.is_some()
                );
                self.push_badge(tab_id, BadgeState::Exists, &ctx);

                CheckResult {
                    exists: true,
                    person: Some(PersonSummary {
                        id: record_id,
                        name,
                        attio_url,
                    }),
                    profile_data: Some(profile),
                    error: None,
                }
            }
            None => {
                log::info!("{} CHECK_COMPLETE exists=false", ctx);
                self.push_badge(tab_id, BadgeState::Capturable, &ctx);
                CheckResult::absent(profile)
            }
        }
    }

    /// Create or update the person on `tab_id`.
    pub fn capture_profile(&self, platform: Platform, tab_id: i64, is_update: bool) -> CaptureResult {
        let req = RequestContext::for_tab(Some(platform), tab_id);
        let ctx = req.log_context();
        log::info!("{} CAPTURE_START is_update={}", ctx, is_update);

        let api_key = match self.api_key(&ctx) {
            Some(key) => key,
            None => {
                log::info!("{} CAPTURE_UNAUTHENTICATED", ctx);
                return CaptureResult::failed(&AttioApiError::Unauthenticated.to_string());
            }
        };

        let profile = match self.host.extract_profile(tab_id) {
            Ok(profile) => profile,
            Err(e) => {
                log::warn!("{} CAPTURE_HOST_UNREACHABLE error={}", ctx, e);
                return self.capture_failed(tab_id, &e.to_string(), &ctx);
            }
        };

        if let Err(rejection) = validate_profile(&profile) {
            log::info!("{} CAPTURE_PROFILE_REJECTED reason={}", ctx, rejection.message());
            let message = match rejection.message() {
                "" => CAPTURE_EXTRACTION_FAILED,
                message => message,
            };
            return CaptureResult::failed(message);
        }

        let attribute = attribute_for(platform);
        let outcome = match upsert_person(&self.client, &api_key, &profile, attribute, platform, &ctx) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::warn!("{} CAPTURE_FAILED kind={:?} error={}", ctx, e.kind(), e);
                return self.capture_failed(tab_id, &e.to_string(), &ctx);
            }
        };

        if let Err(e) = self.credentials.update_last_sync() {
            log::warn!("{} LAST_SYNC_WRITE_FAILED error={}", ctx, e);
        }

        let attio_url = outcome
            .record
            .record_id()
            .and_then(|record_id| self.record_url(&api_key, record_id, &ctx));

        self.push_badge(tab_id, BadgeState::Exists, &ctx);

        let message = if is_update { CAPTURE_UPDATED } else { CAPTURE_ADDED };
        if let Err(e) = self.host.show_feedback(tab_id, &Feedback::success(message)) {
            log::debug!("{} FEEDBACK_FAILED error={}", ctx, e);
        }

        log::info!(
            "{} CAPTURE_COMPLETE action={:?} record_id={:?}",
            ctx,
            outcome.action,
            outcome.record.record_id()
        );

        CaptureResult {
            success: true,
            data: Some(RecordResponse {
                data: outcome.record,
            }),
            attio_url,
            error: None,
        }
    }

    /// Decide and push the toolbar badge for a tab that navigated to `url`.
    pub fn refresh_badge(&self, tab_id: i64, url: &str) -> BadgeResult {
        let platform = detect_platform(url);
        let req = RequestContext::for_tab(platform, tab_id);
        let ctx = req.log_context();

        let badge = match platform {
            Some(platform) => self.badge_for(platform, tab_id, &ctx),
            None => BadgeState::Clear,
        };

        log::debug!("{} BADGE_DECIDED state={:?}", ctx, badge);
        self.push_badge(tab_id, badge, &ctx);

        BadgeResult {
            success: true,
            badge,
            platform,
        }
    }

    /// Validate `api_key` against the API and store it if it works.
    pub fn connect(&self, api_key: &str) -> AckResult {
        let req = RequestContext::new();
        let ctx = req.log_context();
        let api_key = api_key.trim();

        if api_key.is_empty() || !self.client.validate_credential(api_key, &ctx) {
            log::info!("{} CONNECT_REJECTED key={}", ctx, credential_fingerprint(api_key));
            return AckResult::failed(INVALID_API_KEY);
        }

        match self.credentials.set_api_key(api_key) {
            Ok(()) => {
                log::info!("{} CONNECTED key={}", ctx, credential_fingerprint(api_key));
                AckResult::ok()
            }
            Err(e) => {
                log::error!("{} CREDENTIAL_WRITE_FAILED error={}", ctx, e);
                AckResult::failed(e.to_string())
            }
        }
    }

    /// Forget the stored credential.
    pub fn disconnect(&self) -> AckResult {
        let req = RequestContext::new();
        let ctx = req.log_context();

        match self.credentials.clear_api_key() {
            Ok(()) => {
                log::info!("{} DISCONNECTED", ctx);
                AckResult::ok()
            }
            Err(e) => {
                log::error!("{} CREDENTIAL_CLEAR_FAILED error={}", ctx, e);
                AckResult::failed(e.to_string())
            }
        }
    }

    pub fn status(&self) -> StatusResult {
        let req = RequestContext::new();
        let ctx = req.log_context();

        let authenticated = self.api_key(&ctx).is_some();
        let last_sync = self.credentials.last_sync().unwrap_or_else(|e| {
            log::warn!("{} LAST_SYNC_READ_FAILED error={}", ctx, e);
            None
        });

        StatusResult {
            authenticated,
            last_sync,
        }
    }

    fn badge_for(&self, platform: Platform, tab_id: i64, ctx: &LogContext) -> BadgeState {
        let api_key = match self.api_key(ctx) {
            Some(key) => key,
            None => return BadgeState::Capturable,
        };

        let profile: ProfileData = match self.host.extract_profile(tab_id) {
            Ok(profile) => profile,
            Err(e) => {
                log::debug!("{} BADGE_HOST_UNREACHABLE error={}", ctx, e);
                return BadgeState::Capturable;
            }
        };
        if profile.error.is_some() {
            return BadgeState::Capturable;
        }

        let attribute = attribute_for(platform);
        let value = match search_value_for(platform, &profile) {
            Some(value) => value,
            None => return BadgeState::Capturable,
        };

        match find_person(&self.client, &api_key, attribute.as_str(), value, ctx) {
            Ok(Some(_)) => BadgeState::Exists,
            Ok(None) => BadgeState::Capturable,
            Err(e) => {
                log::debug!("{} BADGE_SEARCH_FAILED error={}", ctx, e);
                BadgeState::Capturable
            }
        }
    }

    fn capture_failed(&self, tab_id: i64, message: &str, ctx: &LogContext) -> CaptureResult {
        if let Err(e) = self.host.show_feedback(tab_id, &Feedback::failure(message)) {
            log::debug!("{} FEEDBACK_FAILED error={}", ctx, e);
        }
        CaptureResult::failed(message)
    }

    fn push_badge(&self, tab_id: i64, state: BadgeState, ctx: &LogContext) {
        if let Err(e) = self.host.set_badge(tab_id, state) {
            log::debug!("{} BADGE_UPDATE_FAILED state={:?} error={}", ctx, state, e);
        }
    }

    /// Stored key, or `None` when absent or unreadable.
    fn api_key(&self, ctx: &LogContext) -> Option<String> {
        self.credentials.api_key().unwrap_or_else(|e| {
            log::error!("{} CREDENTIAL_READ_FAILED error={}", ctx, e);
            None
        })
    }

    fn record_url(&self, api_key: &str, record_id: &str, ctx: &LogContext) -> Option<String> {
        if record_id.is_empty() {
            log::debug!("{} RECORD_URL_SKIPPED reason=no_record_id", ctx);
            return None;
        }
        self.client
            .workspace_slug(api_key, ctx)
            .map(|slug| self.config.record_url(&slug, record_id))
    }
}

impl<S: KeyValueStore, H: ExtensionHost> Background<HttpTransport, S, H> {
    /// Background talking to the configured Attio endpoint over HTTP.
    pub fn from_config(config: AttioConfig, store: S, host: H) -> Result<Self, TransportError> {
        let transport = HttpTransport::new(&config)?;
        log::info!(
            "BACKGROUND_READY api_base={} app_base={}",
            config.api_base,
            config.app_base
        );
        Ok(Self::new(AttioClient::new(transport), store, host, config))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use parking_lot::Mutex;

    use crate::pipeline::host::{BadgeState, ExtensionHost, Feedback, HostError};
    use crate::profile::models::ProfileData;

    /// Host double that serves a fixed profile and records what it is told.
    #[derive(Default)]
    pub struct RecordingHost {
        pub profile: Option<ProfileData>,
        pub badges: Mutex<Vec<(i64, BadgeState)>>,
        pub feedback: Mutex<Vec<(i64, Feedback)>>,
    }

    impl RecordingHost {
        pub fn serving(profile: ProfileData) -> Self {
            Self {
                profile: Some(profile),
                ..Self::default()
            }
        }

        pub fn unreachable() -> Self {
            Self::default()
        }

        pub fn last_badge(&self) -> Option<BadgeState> {
            self.badges.lock().last().map(|(_, state)| *state)
        }
    }

    impl ExtensionHost for RecordingHost {
        fn extract_profile(&self, _tab_id: i64) -> Result<ProfileData, HostError> {
            self.profile
                .clone()
                .ok_or_else(|| HostError::new("Could not establish connection. Receiving end does not exist."))
        }

        fn show_feedback(&self, tab_id: i64, feedback: &Feedback) -> Result<(), HostError> {
            self.feedback.lock().push((tab_id, feedback.clone()));
            Ok(())
        }

        fn set_badge(&self, tab_id: i64, state: BadgeState) -> Result<(), HostError> {
            self.badges.lock().push((tab_id, state));
            Ok(())
        }
    }
}
