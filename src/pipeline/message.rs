//! Runtime messages.
//!
//! Popup and content scripts talk to the background in JSON objects tagged
//! by `action`. Unlike a silent listener, a message that does not parse is
//! answered with an explicit failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::transport::Transport;
use crate::platform::detect::Platform;
use crate::storage::kv::KeyValueStore;

use super::handlers::Background;
use super::host::ExtensionHost;
use super::results::{AckResult, BadgeResult, CaptureResult, CheckResult, StatusResult};

/// Inbound request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Message {
    CheckPerson {
        platform: Platform,
        #[serde(rename = "tabId")]
        tab_id: i64,
    },
    CaptureProfile {
        platform: Platform,
        #[serde(rename = "tabId")]
        tab_id: i64,
        #[serde(rename = "isUpdate", default)]
        is_update: bool,
    },
    RefreshBadge {
        #[serde(rename = "tabId")]
        tab_id: i64,
        url: String,
    },
    Connect {
        #[serde(rename = "apiKey")]
        api_key: String,
    },
    Disconnect,
    Status,
}

impl Message {
    pub fn action(&self) -> &'static str {
        match self {
            Message::CheckPerson { .. } => "checkPerson",
            Message::CaptureProfile { .. } => "captureProfile",
            Message::RefreshBadge { .. } => "refreshBadge",
            Message::Connect { .. } => "connect",
            Message::Disconnect => "disconnect",
            Message::Status => "status",
        }
    }
}

const ACTIONS: &[&str] = &[
    "checkPerson",
    "captureProfile",
    "refreshBadge",
    "connect",
    "disconnect",
    "status",
];

/// Why an inbound message was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageError {
    #[error("not a JSON object: {0}")]
    NotJson(String),
    #[error("missing action")]
    MissingAction,
    #[error("unknown action '{0}'")]
    UnknownAction(String),
    #[error("malformed '{action}' message: {reason}")]
    Malformed { action: String, reason: String },
}

/// Parse a raw runtime message.
pub fn parse_message(raw: &str) -> Result<Message, MessageError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| MessageError::NotJson(e.to_string()))?;
    if !value.is_object() {
        return Err(MessageError::NotJson("expected an object".to_string()));
    }

    let action = match value.get("action").and_then(Value::as_str) {
        Some(action) => action.to_string(),
        None => return Err(MessageError::MissingAction),
    };
    if !ACTIONS.contains(&action.as_str()) {
        return Err(MessageError::UnknownAction(action));
    }

    serde_json::from_value(value).map_err(|e| MessageError::Malformed {
        action,
        reason: e.to_string(),
    })
}

/// Outbound reply, serialised as the bare result object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Check(CheckResult),
    Capture(CaptureResult),
    Badge(BadgeResult),
    Ack(AckResult),
    Status(StatusResult),
}

impl<T: Transport, S: KeyValueStore, H: ExtensionHost> Background<T, S, H> {
    /// Dispatch a parsed message.
    pub fn handle(&self, message: Message) -> Response {
        log::debug!("MESSAGE_RECEIVED action={}", message.action());

        match message {
            Message::CheckPerson { platform, tab_id } => {
                Response::Check(self.check_person(platform, tab_id))
            }
            Message::CaptureProfile {
                platform,
                tab_id,
                is_update,
            } => Response::Capture(self.capture_profile(platform, tab_id, is_update)),
            Message::RefreshBadge { tab_id, url } => Response::Badge(self.refresh_badge(tab_id, &url)),
            Message::Connect { api_key } => Response::Ack(self.connect(&api_key)),
            Message::Disconnect => Response::Ack(self.disconnect()),
            Message::Status => Response::Status(self.status()),
        }
    }

    /// Parse, dispatch and serialise one raw message.
    pub fn handle_json(&self, raw: &str) -> String {
        let response = match parse_message(raw) {
            Ok(message) => self.handle(message),
            Err(e) => {
                log::warn!("MESSAGE_REJECTED error={}", e);
                Response::Ack(AckResult::failed(format!("Invalid message: {}", e)))
            }
        };

        serde_json::to_string(&response).unwrap_or_else(|e| {
            log::error!("RESPONSE_ENCODE_FAILED error={}", e);
            r#"{"success":false,"error":"Internal error."}"#.to_string()
        })
    }
}
