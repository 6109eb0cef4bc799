//! Envelope error types.

use std::fmt;

/// Stage of envelope decoding that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStage {
    Base64,
    BlockAlignment,
    Decrypt,
    Utf8,
}

impl fmt::Display for DecodeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DecodeStage::Base64 => "base64",
            DecodeStage::BlockAlignment => "block alignment",
            DecodeStage::Decrypt => "decrypt",
            DecodeStage::Utf8 => "utf-8",
        };
        f.write_str(name)
    }
}

/// Malformed ciphertext, key material, or plaintext encoding. Never retried here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("envelope decode failed at {stage} stage: {detail}")]
pub struct EnvelopeDecodeError {
    pub stage: DecodeStage,
    pub detail: String,
}

impl EnvelopeDecodeError {
    pub(crate) fn new(stage: DecodeStage, detail: impl fmt::Display) -> Self {
        Self {
            stage,
            detail: detail.to_string(),
        }
    }
}

/// The underlying response was not successful, so no payload can be read.
///
/// Reports the status mismatch and the empty body together when both apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeUnavailableError {
    pub url: String,
    /// Set when the HTTP status was not 200.
    pub status: Option<u16>,
    pub empty_body: bool,
}

impl fmt::Display for EnvelopeUnavailableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request failed: [{}]", self.url)?;
        if let Some(status) = self.status {
            write!(f, ", http status={}", status)?;
        }
        if self.empty_body {
            write!(f, ", response body is empty")?;
        }
        Ok(())
    }
}

impl std::error::Error for EnvelopeUnavailableError {}
