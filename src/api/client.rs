//! Authenticated Attio API calls.
//!
//! - `create_person` - `POST /objects/people/records`
//! - `update_person` - `PATCH /objects/people/records/{id}`
//! - `query_people` - `POST /objects/people/records/query`
//! - `workspace_slug` / `validate_credential` - `GET /self`

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::logging::structured::{credential_fingerprint, LogContext};

use super::error::AttioApiError;
use super::models::{PersonRecord, QueryResponse, RecordResponse, RecordWriteBody, SelfResponse, ValuesInput};
use super::transport::{ApiRequest, ApiResponse, Method, Transport};

pub const PEOPLE_RECORDS_PATH: &str = "/objects/people/records";
pub const PEOPLE_QUERY_PATH: &str = "/objects/people/records/query";
pub const SELF_PATH: &str = "/self";

/// Attio client over any transport.
pub struct AttioClient<T: Transport> {
    transport: T,
}

impl<T: Transport> AttioClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Create a person record.
    pub fn create_person(
        &self,
        credential: &str,
        values: &ValuesInput,
        ctx: &LogContext,
    ) -> Result<PersonRecord, AttioApiError> {
        log::info!(
            "{} PERSON_CREATE attributes={:?}",
            ctx,
            values.attribute_slugs()
        );

        let request = ApiRequest::new(Method::Post, PEOPLE_RECORDS_PATH, credential)
            .with_body(write_body(values)?);
        let response = self.send(&request, ctx)?;
        decode::<RecordResponse>(&response).map(|r| r.data)
    }

    /// Update a person record; attributes absent from `values` are untouched.
    pub fn update_person(
        &self,
        credential: &str,
        record_id: &str,
        values: &ValuesInput,
        ctx: &LogContext,
    ) -> Result<PersonRecord, AttioApiError> {
        log::info!(
            "{} PERSON_UPDATE record_id={} attributes={:?}",
            ctx,
            record_id,
            values.attribute_slugs()
        );

        let path = format!("{}/{}", PEOPLE_RECORDS_PATH, record_id);
        let request =
            ApiRequest::new(Method::Patch, path, credential).with_body(write_body(values)?);
        let response = self.send(&request, ctx)?;
        decode::<RecordResponse>(&response).map(|r| r.data)
    }

    /// Run a record query.
    ///
    /// Every non-2xx answer, 404 included, becomes `AttioApiError::Search`;
    /// deciding what a 404 means is left to the caller.
    pub fn query_people(
        &self,
        credential: &str,
        body: Value,
        ctx: &LogContext,
    ) -> Result<Vec<PersonRecord>, AttioApiError> {
        let request = ApiRequest::new(Method::Post, PEOPLE_QUERY_PATH, credential).with_body(body);
        let response = self.transport.send(&request)?;

        log::debug!("{} QUERY_RESPONSE status={}", ctx, response.status);

        if !response.is_success() {
            let err = AttioApiError::search_failure(&response);
            log::debug!(
                "{} QUERY_FAILED status={} body={}",
                ctx,
                response.status,
                response.body
            );
            return Err(err);
        }

        let result = decode::<QueryResponse>(&response)?;
        log::debug!("{} QUERY_RESULT count={}", ctx, result.data.len());
        Ok(result.data)
    }

    /// Workspace slug of the credential's workspace.
    ///
    /// Only used for deep links, so every failure degrades to `None`.
    pub fn workspace_slug(&self, credential: &str, ctx: &LogContext) -> Option<String> {
        let request = ApiRequest::new(Method::Get, SELF_PATH, credential);

        match self.transport.send(&request) {
            Ok(response) if response.is_success() => {
                let slug = decode::<SelfResponse>(&response)
                    .ok()
                    .and_then(|s| s.workspace_slug().map(|slug| slug.to_string()));
                log::debug!("{} WORKSPACE_SLUG slug={:?}", ctx, slug);
                slug
            }
            Ok(response) => {
                log::debug!("{} WORKSPACE_SLUG_FAILED status={}", ctx, response.status);
                None
            }
            Err(e) => {
                log::debug!("{} WORKSPACE_SLUG_FAILED error={}", ctx, e);
                None
            }
        }
    }

    /// Whether the credential authenticates. Never errors.
    pub fn validate_credential(&self, credential: &str, ctx: &LogContext) -> bool {
        let request = ApiRequest::new(Method::Get, SELF_PATH, credential);
        let valid = matches!(self.transport.send(&request), Ok(response) if response.is_success());

        log::info!(
            "{} CREDENTIAL_VALIDATED key={} valid={}",
            ctx,
            credential_fingerprint(credential),
            valid
        );
        valid
    }

    fn send(&self, request: &ApiRequest, ctx: &LogContext) -> Result<ApiResponse, AttioApiError> {
        let response = self.transport.send(request).map_err(|e| {
            log::warn!(
                "{} API_TRANSPORT_FAILED method={} path={} error={}",
                ctx,
                request.method,
                request.path,
                e
            );
            AttioApiError::from(e)
        })?;

        if !response.is_success() {
            let err = AttioApiError::from_response(&response);
            log::warn!(
                "{} API_ERROR method={} path={} status={} kind={:?}",
                ctx,
                request.method,
                request.path,
                response.status,
                err.kind()
            );
            return Err(err);
        }

        Ok(response)
    }
}

fn write_body(values: &ValuesInput) -> Result<Value, AttioApiError> {
    serde_json::to_value(RecordWriteBody::new(values))
        .map_err(|e| AttioApiError::Decode(format!("failed to encode values: {}", e)))
}

fn decode<D: DeserializeOwned>(response: &ApiResponse) -> Result<D, AttioApiError> {
    serde_json::from_str(&response.body).map_err(|e| AttioApiError::Decode(e.to_string()))
}
