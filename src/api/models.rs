//! Attio person record models.
//!
//! Records are owned by the CRM; these types only live for one
//! request/response cycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::profile::models::{non_empty, ProfileData};

/// Identifier triple of a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordId {
    #[serde(default)]
    pub record_id: String,
    #[serde(default)]
    pub object_id: String,
    #[serde(default)]
    pub workspace_id: String,
}

/// One entry of the `name` attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NameValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// One entry of a text or URL attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextValue {
    #[serde(default)]
    pub value: Option<String>,
}

/// Attribute values of a person, keyed by attribute slug.
///
/// Attributes this crate does not write are kept untouched in `other`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordValues {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<NameValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub linkedin: Vec<TextValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub twitter: Vec<TextValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<TextValue>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// A person record as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonRecord {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default)]
    pub values: RecordValues,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl PersonRecord {
    pub fn record_id(&self) -> Option<&str> {
        non_empty(Some(self.id.record_id.as_str()))
    }

    /// Stored full name, falling back to the first name.
    pub fn stored_name(&self) -> Option<&str> {
        let name = self.values.name.first()?;
        non_empty(name.full_name.as_deref()).or_else(|| non_empty(name.first_name.as_deref()))
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Envelope of create/update responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordResponse {
    pub data: PersonRecord,
}

/// Envelope of query responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub data: Vec<PersonRecord>,
}

/// `full_name` entry of a write payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FullNameInput {
    pub full_name: String,
}

/// `value` entry of a write payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextInput {
    pub value: String,
}

/// Values written on create or update.
///
/// Absent profile fields are omitted entirely, so an update leaves the
/// corresponding stored values untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValuesInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Vec<FullNameInput>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<Vec<TextInput>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<Vec<TextInput>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Vec<TextInput>>,
}

impl ValuesInput {
    pub fn from_profile(profile: &ProfileData) -> Self {
        let text = |field: &Option<String>| {
            non_empty(field.as_deref()).map(|v| vec![TextInput { value: v.to_string() }])
        };

        Self {
            name: profile.display_name().map(|n| {
                vec![FullNameInput {
                    full_name: n.to_string(),
                }]
            }),
            linkedin: text(&profile.linkedin_url),
            twitter: text(&profile.twitter_handle),
            description: text(&profile.description),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.linkedin.is_none()
            && self.twitter.is_none()
            && self.description.is_none()
    }

    /// Slugs of the attributes this payload writes.
    pub fn attribute_slugs(&self) -> Vec<&'static str> {
        let mut slugs = Vec::new();
        if self.name.is_some() {
            slugs.push("name");
        }
        if self.linkedin.is_some() {
            slugs.push("linkedin");
        }
        if self.twitter.is_some() {
            slugs.push("twitter");
        }
        if self.description.is_some() {
            slugs.push("description");
        }
        slugs
    }
}

/// Body of create and update requests: `{"data": {"values": ...}}`.
#[derive(Debug, Serialize)]
pub struct RecordWriteBody<'a> {
    pub data: RecordWriteData<'a>,
}

#[derive(Debug, Serialize)]
pub struct RecordWriteData<'a> {
    pub values: &'a ValuesInput,
}

impl<'a> RecordWriteBody<'a> {
    pub fn new(values: &'a ValuesInput) -> Self {
        Self {
            data: RecordWriteData { values },
        }
    }
}

/// Response of `GET /self`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelfResponse {
    #[serde(default)]
    pub data: Option<SelfData>,
    #[serde(default)]
    pub workspace_slug: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelfData {
    #[serde(default)]
    pub workspace: Option<WorkspaceInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkspaceInfo {
    #[serde(default)]
    pub slug: Option<String>,
}

impl SelfResponse {
    pub fn workspace_slug(&self) -> Option<&str> {
        let nested = self
            .data
            .as_ref()
            .and_then(|d| d.workspace.as_ref())
            .and_then(|w| non_empty(w.slug.as_deref()));
        nested.or_else(|| non_empty(self.workspace_slug.as_deref()))
    }
}
