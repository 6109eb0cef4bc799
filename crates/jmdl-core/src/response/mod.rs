//! Response model over raw transport results.
//!
//! [`ApiResponse`] decodes the encrypted envelope lazily and at most once;
//! [`ImageResponse`] decides how image bytes reach disk.

mod api;
mod image;

pub use api::ApiResponse;
pub use image::{plan_transfer, ImageResponse, TransferPlan};

use crate::envelope::{EnvelopeDecodeError, EnvelopeUnavailableError};

/// A transport result as produced by a [`crate::client::Postman`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status_code: u16,
    pub body: Vec<u8>,
    pub url: String,
}

impl RawResponse {
    pub fn new(status_code: u16, body: impl Into<Vec<u8>>, url: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
            url: url.into(),
        }
    }

    /// Status 200 with a non-empty body.
    pub fn is_success(&self) -> bool {
        self.status_code == 200 && !self.body.is_empty()
    }

    /// Fails with every unmet success condition named.
    pub fn require_success(&self) -> Result<(), EnvelopeUnavailableError> {
        if self.is_success() {
            return Ok(());
        }
        Err(EnvelopeUnavailableError {
            url: self.url.clone(),
            status: (self.status_code != 200).then_some(self.status_code),
            empty_body: self.body.is_empty(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    #[error(transparent)]
    Unavailable(#[from] EnvelopeUnavailableError),
    #[error(transparent)]
    Decode(#[from] EnvelopeDecodeError),
    #[error("response from {url} is not valid JSON: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("response from {url} has no string `data` field")]
    MissingData { url: String },
    #[error("image codec failed for {url}: {cause:#}")]
    Codec { url: String, cause: anyhow::Error },
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
