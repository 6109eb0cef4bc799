//! Image responses and the decision of how their bytes reach disk.

use std::fs;
use std::path::Path;

use super::{RawResponse, ResponseError};
use crate::codec::ImageCodec;
use crate::envelope::EnvelopeUnavailableError;
use crate::naming::{is_gif, suffix_not_equal, suffix_of};

/// How an image response is written to its target path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferPlan {
    /// Bytes are written unchanged.
    RawCopy,
    /// Bytes are re-encoded into the target path's container.
    Reencode { target_suffix: String },
    /// Bytes are descrambled by the codec.
    Descramble { scramble_id: u64 },
}

/// Decides how to transfer `img_url` to `target`.
///
/// URLs ending in `.gif` are always copied raw, even when decoding is requested.
pub fn plan_transfer(img_url: &str, target: &str, scramble_id: u64, decode_image: bool) -> TransferPlan {
    if is_gif(img_url) {
        TransferPlan::RawCopy
    } else if !decode_image {
        if suffix_not_equal(img_url, target) {
            TransferPlan::Reencode {
                target_suffix: suffix_of(target),
            }
        } else {
            TransferPlan::RawCopy
        }
    } else {
        TransferPlan::Descramble { scramble_id }
    }
}

#[derive(Debug, Clone)]
pub struct ImageResponse {
    raw: RawResponse,
}

impl ImageResponse {
    pub fn new(raw: RawResponse) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &RawResponse {
        &self.raw
    }

    pub fn url(&self) -> &str {
        &self.raw.url
    }

    pub fn content(&self) -> &[u8] {
        &self.raw.body
    }

    pub fn is_success(&self) -> bool {
        self.raw.is_success()
    }

    pub fn require_success(&self) -> Result<(), EnvelopeUnavailableError> {
        self.raw.require_success()
    }

    /// Writes the image to `path` per [`plan_transfer`] and returns the plan taken.
    ///
    /// `img_url` overrides the response URL when the request was redirected.
    pub fn transfer_to(
        &self,
        path: &Path,
        scramble_id: u64,
        decode_image: bool,
        img_url: Option<&str>,
        codec: &dyn ImageCodec,
    ) -> Result<TransferPlan, ResponseError> {
        self.require_success()?;

        let img_url = img_url.unwrap_or(&self.raw.url);
        let target = path.to_string_lossy();
        let plan = plan_transfer(img_url, &target, scramble_id, decode_image);

        let codec_err = |cause| ResponseError::Codec {
            url: img_url.to_string(),
            cause,
        };
        let bytes = match &plan {
            TransferPlan::RawCopy => None,
            TransferPlan::Reencode { target_suffix } => {
                Some(codec.reencode(self.content(), target_suffix).map_err(codec_err)?)
            }
            TransferPlan::Descramble { scramble_id } => {
                Some(codec.descramble(*scramble_id, self.content()).map_err(codec_err)?)
            }
        };

        fs::write(path, bytes.as_deref().unwrap_or(self.content())).map_err(|source| {
            ResponseError::Write {
                path: path.display().to_string(),
                source,
            }
        })?;

        tracing::debug!(url = img_url, path = %path.display(), ?plan, "image saved");
        Ok(plan)
    }
}
