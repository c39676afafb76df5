//! Function-call envelope decoding.
//!
//! The backend wraps every query and mutation result in a tagged envelope:
//! `{"status": "success", "value": ...}` or
//! `{"status": "error", "errorMessage": ...}`. Function failures may arrive
//! with a 2xx or a 4xx/5xx status, so the envelope is inspected before the
//! status code.

use serde::Deserialize;
use serde_json::Value;

use crate::error::StoreError;

#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum FunctionReply {
    Success {
        #[serde(default)]
        value: Value,
    },
    Error {
        #[serde(rename = "errorMessage")]
        error_message: String,
    },
}

/// Turn a status code and raw body into the function's return value.
pub(crate) fn decode_reply(status: u16, body: &str) -> Result<Value, StoreError> {
    let ok = (200..300).contains(&status);
    match (serde_json::from_str::<FunctionReply>(body), ok) {
        (Ok(FunctionReply::Error { error_message }), _) => Err(StoreError::Function(error_message)),
        (Ok(FunctionReply::Success { value }), true) => Ok(value),
        (Err(e), true) => Err(StoreError::Parse(format!("unexpected reply envelope: {e}"))),
        (_, false) => Err(StoreError::Api {
            status,
            message: body.trim().to_string(),
        }),
    }
}

/// Read a response body and decode it as a function reply.
pub(crate) async fn read_reply(resp: reqwest::Response) -> Result<Value, StoreError> {
    let status = resp.status().as_u16();
    let body = resp.text().await?;
    decode_reply(status, &body)
}

/// Read a plain-text response, mapping non-success statuses to [`StoreError::Api`].
pub(crate) async fn read_text(resp: reqwest::Response) -> Result<String, StoreError> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(StoreError::Api {
            status: status.as_u16(),
            message: body.trim().to_string(),
        });
    }
    Ok(body.trim().to_string())
}
