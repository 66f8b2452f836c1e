//! Person lookup by deduplication attribute.

use crate::api::client::AttioClient;
use crate::api::error::{AttioApiError, ErrorKind};
use crate::api::models::PersonRecord;
use crate::api::transport::Transport;
use crate::logging::structured::LogContext;

use super::filter::{build_query, SearchFilter};

/// Find the first person whose `attribute` matches `value`.
///
/// A 404 is the same as no rows and yields `Ok(None)`. With several
/// matches the API's first row wins.
pub fn find_person<T: Transport>(
    client: &AttioClient<T>,
    credential: &str,
    attribute: &str,
    value: &str,
    ctx: &LogContext,
) -> Result<Option<PersonRecord>, AttioApiError> {
    let filter = SearchFilter::for_attribute(attribute, value);

    log::debug!(
        "{} SEARCH_START attribute={} operand={:?} filter={}",
        ctx,
        attribute,
        filter.operand(),
        filter.to_json()
    );

    let rows = match client.query_people(credential, build_query(attribute, &filter), ctx) {
        Ok(rows) => rows,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            log::debug!("{} SEARCH_NOT_FOUND status=404", ctx);
            return Ok(None);
        }
        Err(err) => {
            log::warn!("{} SEARCH_FAILED attribute={} error={}", ctx, attribute, err);
            return Err(err);
        }
    };

    let found = rows.into_iter().next();
    log::info!(
        "{} SEARCH_COMPLETE attribute={} found={}",
        ctx,
        attribute,
        found.is_some()
    );
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::testing::ScriptedTransport;
    use serde_json::json;

    fn ctx() -> LogContext {
        LogContext::new("test-req")
    }

    #[test]
    fn test_returns_first_row() {
        let client = AttioClient::new(ScriptedTransport::new().respond(
            200,
            json!({"data": [
                {"id": {"record_id": "123"}, "values": {"name": [{"full_name": "John Doe"}]}},
                {"id": {"record_id": "456"}}
            ]}),
        ));

        let found = find_person(&client, "key", "linkedin", "https://linkedin.com/in/johndoe", &ctx())
            .unwrap()
            .unwrap();
        assert_eq!(found.record_id(), Some("123"));
        assert_eq!(found.stored_name(), Some("John Doe"));

        let body = client.transport().requests()[0].body.clone().unwrap();
        assert_eq!(
            body,
            json!({"filter": {"linkedin": {"value": {"$contains": "johndoe"}}}, "limit": 1})
        );
    }

    #[test]
    fn test_no_rows_is_none() {
        let client = AttioClient::new(ScriptedTransport::new().respond(200, json!({"data": []})));
        let found = find_person(&client, "key", "twitter", "nobody", &ctx()).unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_404_is_none() {
        let client = AttioClient::new(ScriptedTransport::new().respond(404, json!({})));
        let found = find_person(&client, "key", "linkedin", "https://linkedin.com/in/test", &ctx())
            .unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_other_failures_propagate() {
        let client = AttioClient::new(
            ScriptedTransport::new()
                .respond(500, json!({"message": "database unavailable"}))
                .respond(401, json!({})),
        );

        let err = find_person(&client, "key", "name", "Jane Doe", &ctx()).unwrap_err();
        assert_eq!(err.status_code(), Some(500));
        assert_eq!(err.to_string(), "Search failed: database unavailable");

        let err = find_person(&client, "bad-key", "name", "Jane Doe", &ctx()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidCredential);
    }
}
