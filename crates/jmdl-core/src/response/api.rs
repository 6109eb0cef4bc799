//! Encrypted API responses.

use once_cell::unsync::OnceCell;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{RawResponse, ResponseError};
use crate::envelope::{self, EnvelopeDecodeError};

/// An API response whose `data` field carries an envelope keyed by `key_ts`.
///
/// The decoded plaintext is memoized on first access. The cell is not `Sync`;
/// share a response across threads only after the first decode.
#[derive(Debug)]
pub struct ApiResponse {
    raw: RawResponse,
    key_ts: String,
    decoded: OnceCell<String>,
}

impl ApiResponse {
    pub fn wrap(raw: RawResponse, key_ts: impl Into<String>) -> Self {
        Self {
            raw,
            key_ts: key_ts.into(),
            decoded: OnceCell::new(),
        }
    }

    pub fn raw(&self) -> &RawResponse {
        &self.raw
    }

    pub fn key_ts(&self) -> &str {
        &self.key_ts
    }

    pub fn is_success(&self) -> bool {
        self.raw.is_success()
    }

    /// The outer JSON document, unencrypted.
    pub fn json(&self) -> Result<Value, ResponseError> {
        serde_json::from_slice(&self.raw.body).map_err(|source| ResponseError::Json {
            url: self.raw.url.clone(),
            source,
        })
    }

    /// Base64 ciphertext from the outer document's `data` field.
    pub fn encoded_data(&self) -> Result<String, ResponseError> {
        match self.json()?.get("data") {
            Some(Value::String(data)) => Ok(data.clone()),
            _ => Err(ResponseError::MissingData {
                url: self.raw.url.clone(),
            }),
        }
    }

    /// Decrypted payload text; decoded once, then served from the cache.
    pub fn decoded(&self) -> Result<&str, ResponseError> {
        self.decoded_using(envelope::decode)
    }

    pub(crate) fn decoded_using<F>(&self, decode: F) -> Result<&str, ResponseError>
    where
        F: FnOnce(&str, &str) -> Result<String, EnvelopeDecodeError>,
    {
        self.raw.require_success()?;
        let text = self.decoded.get_or_try_init(|| {
            let encoded = self.encoded_data()?;
            decode(&encoded, &self.key_ts).map_err(ResponseError::from)
        })?;
        Ok(text.as_str())
    }

    /// Decoded payload parsed as JSON.
    pub fn res_data(&self) -> Result<Value, ResponseError> {
        self.res_data_as()
    }

    /// Decoded payload deserialized into `T`.
    pub fn res_data_as<T: DeserializeOwned>(&self) -> Result<T, ResponseError> {
        let text = self.decoded()?;
        serde_json::from_str(text).map_err(|source| ResponseError::Json {
            url: self.raw.url.clone(),
            source,
        })
    }
}
