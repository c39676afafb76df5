//! HTTP client for the hosted backend's function API.
//!
//! Reads call `POST {url}/api/query`, writes call `POST {url}/api/mutation`,
//! and the deployment reports its build at `GET {url}/version`.

use std::time::Duration;

use chrono::DateTime;
use pulse_config::BackendConfig;
use pulse_core::entities::Record;
use pulse_core::ids::RecordId;
use pulse_core::patch::RecordPatch;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreError;
use crate::http::{read_reply, read_text};
use crate::source::{RecordReader, RecordWriter};

#[derive(Debug, Serialize)]
struct FunctionCall<'a, A> {
    path: &'a str,
    args: A,
    format: &'static str,
}

#[derive(Debug, Serialize)]
struct NoArgs {}

/// A table row as the backend stores it.
#[derive(Debug, Deserialize)]
struct RecordDocument {
    #[serde(rename = "_id")]
    id: String,
    /// Milliseconds since the Unix epoch.
    #[serde(rename = "_creationTime")]
    creation_time: f64,
    name: String,
    value: f64,
    #[serde(default)]
    description: Option<String>,
}

impl TryFrom<RecordDocument> for Record {
    type Error = StoreError;

    #[allow(clippy::cast_possible_truncation)]
    fn try_from(doc: RecordDocument) -> Result<Self, Self::Error> {
        let created_at = DateTime::from_timestamp_millis(doc.creation_time.round() as i64)
            .ok_or_else(|| {
                StoreError::Parse(format!(
                    "record {} has out-of-range _creationTime {}",
                    doc.id, doc.creation_time
                ))
            })?;
        Ok(Self {
            id: RecordId::from(doc.id),
            name: doc.name,
            value: doc.value,
            description: doc.description,
            created_at,
        })
    }
}

/// Decode the list query's return value into records, keeping backend order.
fn decode_records(value: Value) -> Result<Vec<Record>, StoreError> {
    let docs: Vec<RecordDocument> = serde_json::from_value(value)
        .map_err(|e| StoreError::Parse(format!("record list: {e}")))?;
    docs.into_iter().map(Record::try_from).collect()
}

/// Decode the mutation's return value. A mutation that returns nothing is
/// treated as having patched the requested id.
fn decode_patched_id(value: Value, requested: &RecordId) -> Result<RecordId, StoreError> {
    match value {
        Value::String(id) => Ok(RecordId::from(id)),
        Value::Null => Ok(requested.clone()),
        other => Err(StoreError::Parse(format!(
            "expected record id from mutation, got {other}"
        ))),
    }
}

/// Client bound to one backend deployment.
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    list_function: String,
    update_function: String,
}

impl BackendClient {
    /// Build a client from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the backend URL is missing or invalid,
    /// or [`StoreError::Http`] if the HTTP client cannot be constructed.
    pub fn new(config: &BackendConfig) -> Result<Self, StoreError> {
        let base_url = config.endpoint()?.to_string();
        let http = reqwest::Client::builder()
            .user_agent(concat!("pulse/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.request_timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            http,
            base_url,
            list_function: config.list_function.clone(),
            update_function: config.update_function.clone(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run the list query and return every record in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport failure, a backend-reported
    /// function error, or an undecodable reply.
    pub async fn list_records(&self) -> Result<Vec<Record>, StoreError> {
        let call = FunctionCall {
            path: &self.list_function,
            args: NoArgs {},
            format: "json",
        };
        let resp = self
            .http
            .post(format!("{}/api/query", self.base_url))
            .json(&call)
            .send()
            .await?;
        decode_records(read_reply(resp).await?)
    }

    /// Run the update mutation for one record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Function`] carrying the backend's reason when
    /// the mutation itself fails, or another [`StoreError`] on transport or
    /// decoding failure.
    pub async fn update_record(&self, patch: &RecordPatch) -> Result<RecordId, StoreError> {
        let call = FunctionCall {
            path: &self.update_function,
            args: patch,
            format: "json",
        };
        let resp = self
            .http
            .post(format!("{}/api/mutation", self.base_url))
            .json(&call)
            .send()
            .await?;
        let id = decode_patched_id(read_reply(resp).await?, &patch.id)?;
        tracing::debug!(%id, "backend applied patch");
        Ok(id)
    }

    /// Fetch the deployment's version string.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend is unreachable or not yet serving.
    pub async fn version(&self) -> Result<String, StoreError> {
        let resp = self
            .http
            .get(format!("{}/version", self.base_url))
            .send()
            .await?;
        read_text(resp).await
    }
}

impl RecordReader for BackendClient {
    async fn list(&self) -> Result<Vec<Record>, StoreError> {
        self.list_records().await
    }
}

impl RecordWriter for BackendClient {
    async fn patch(&self, patch: RecordPatch) -> Result<RecordId, StoreError> {
        self.update_record(&patch).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn new_requires_configured_url() {
        let err = BackendClient::new(&BackendConfig::default()).err().unwrap();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn new_normalizes_base_url() {
        let config = BackendConfig {
            url: "http://127.0.0.1:3210/".into(),
            ..Default::default()
        };
        let client = BackendClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:3210");
    }

    #[test]
    fn list_call_body_has_empty_args() {
        let call = FunctionCall {
            path: "records:list",
            args: NoArgs {},
            format: "json",
        };
        assert_eq!(
            serde_json::to_value(&call).unwrap(),
            json!({"path": "records:list", "args": {}, "format": "json"})
        );
    }

    #[test]
    fn update_call_body_carries_id_name_value() {
        let patch = RecordPatch::new(RecordId::from("abc123"), "Updated Name", 250.0);
        let call = FunctionCall {
            path: "records:update",
            args: &patch,
            format: "json",
        };
        assert_eq!(
            serde_json::to_value(&call).unwrap(),
            json!({
                "path": "records:update",
                "args": {"id": "abc123", "name": "Updated Name", "value": 250.0},
                "format": "json"
            })
        );
    }

    #[test]
    fn documents_decode_in_order_with_optional_description() {
        let value = json!([
            {
                "_id": "a1",
                "_creationTime": 1_736_933_400_000.0_f64,
                "name": "Alpha",
                "value": 100,
                "description": "first"
            },
            {
                "_id": "b2",
                "_creationTime": 1_736_933_401_500.4_f64,
                "name": "Beta",
                "value": 2.5
            }
        ]);
        let records = decode_records(value).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id.as_str(), "a1");
        assert_eq!(records[0].value, 100.0);
        assert_eq!(records[0].description.as_deref(), Some("first"));
        assert_eq!(
            records[0].created_at,
            Utc.timestamp_millis_opt(1_736_933_400_000).unwrap()
        );
        assert_eq!(records[1].description, None);
        assert_eq!(
            records[1].created_at,
            Utc.timestamp_millis_opt(1_736_933_401_500).unwrap()
        );
    }

    #[test]
    fn document_missing_value_is_parse_error() {
        let value = json!([{"_id": "a1", "_creationTime": 0.0, "name": "Alpha"}]);
        assert!(matches!(decode_records(value), Err(StoreError::Parse(_))));
    }

    #[test]
    fn patched_id_prefers_backend_answer() {
        let requested = RecordId::from("abc123");
        assert_eq!(
            decode_patched_id(json!("abc123"), &requested).unwrap(),
            requested
        );
        assert_eq!(decode_patched_id(Value::Null, &requested).unwrap(), requested);
        assert!(decode_patched_id(json!(42), &requested).is_err());
    }
}
