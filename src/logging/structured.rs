//! Structured logging utilities.
//!
//! Every log line emitted by a handler starts with the `LogContext` of the
//! request it belongs to, followed by an event token and key=value pairs.

use std::fmt;

use sha2::{Digest, Sha256};

/// Number of hex characters kept from a credential digest.
const FINGERPRINT_LEN: usize = 8;

/// Logging context for a single inbound request.
#[derive(Debug, Clone)]
pub struct LogContext {
    pub request_id: String,
    pub platform: Option<String>,
    pub tab_id: Option<i64>,
}

impl LogContext {
    pub fn new(request_id: &str) -> Self {
        Self {
            request_id: request_id.to_string(),
            platform: None,
            tab_id: None,
        }
    }

    pub fn with_platform(&self, platform: &str) -> Self {
        Self {
            platform: Some(platform.to_string()),
            ..self.clone()
        }
    }

    pub fn with_tab(&self, tab_id: i64) -> Self {
        Self {
            tab_id: Some(tab_id),
            ..self.clone()
        }
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[req={}]", self.request_id)?;
        if let Some(platform) = &self.platform {
            write!(f, " [platform={}]", platform)?;
        }
        if let Some(tab_id) = self.tab_id {
            write!(f, " [tab={}]", tab_id)?;
        }
        Ok(())
    }
}

/// Short, stable identifier for a credential that is safe to log.
pub fn credential_fingerprint(credential: &str) -> String {
    let digest = Sha256::digest(credential.as_bytes());
    let mut encoded = hex::encode(digest);
    encoded.truncate(FINGERPRINT_LEN);
    encoded
}
