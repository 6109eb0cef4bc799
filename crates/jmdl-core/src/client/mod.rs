//! Catalog client bound to a transport.

mod transport;

pub use transport::{ClientEnv, DomainDiscovery, Postman, PostmanFactory, PostmanRequest};

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::codec::ImageCodec;
use crate::entity::Image;
use crate::response::{ApiResponse, ImageResponse, TransferPlan};

/// Header carrying the envelope timestamp on API requests.
pub const KEY_TS_HEADER: &str = "tokenparam";

/// Backend style the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientImpl {
    /// Website pages.
    Html,
    /// Mobile API with encrypted envelopes.
    Api,
}

impl FromStr for ClientImpl {
    type Err = UnknownClientImpl;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "html" => Ok(ClientImpl::Html),
            "api" => Ok(ClientImpl::Api),
            other => Err(UnknownClientImpl(other.to_string())),
        }
    }
}

impl fmt::Display for ClientImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ClientImpl::Html => "html",
            ClientImpl::Api => "api",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown client impl `{0}` (expected `html` or `api`)")]
pub struct UnknownClientImpl(pub String);

pub struct JmClient {
    kind: ClientImpl,
    postman: Arc<dyn Postman>,
    retry_times: u32,
    domains: Vec<String>,
}

impl JmClient {
    pub fn new(kind: ClientImpl, postman: Arc<dyn Postman>, retry_times: u32, domains: Vec<String>) -> Self {
        Self {
            kind,
            postman,
            retry_times,
            domains,
        }
    }

    pub fn kind(&self) -> ClientImpl {
        self.kind
    }

    pub fn retry_times(&self) -> u32 {
        self.retry_times
    }

    /// Fallback domains, in the order they should be tried.
    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    pub fn postman(&self) -> &Arc<dyn Postman> {
        &self.postman
    }

    pub fn of_api_url(&self, api_path: &str, domain: &str) -> String {
        format!("https://{}/{}", domain.trim_end_matches('/'), api_path.trim_start_matches('/'))
    }

    pub fn get_image(&self, img_url: &str) -> Result<ImageResponse> {
        let raw = self
            .postman
            .send(&PostmanRequest::get(img_url))
            .with_context(|| format!("GET image {img_url}"))?;
        Ok(ImageResponse::new(raw))
    }

    /// Requests `api_path` on the first domain and wraps the envelope response.
    pub fn get_api(&self, api_path: &str, key_ts: &str) -> Result<ApiResponse> {
        let domain = self
            .domains
            .first()
            .with_context(|| format!("no domain configured for {api_path}"))?;
        let url = self.of_api_url(api_path, domain);
        let request = PostmanRequest::get(&url).header(KEY_TS_HEADER, key_ts);
        let raw = self
            .postman
            .send(&request)
            .with_context(|| format!("GET api {url}"))?;
        Ok(ApiResponse::wrap(raw, key_ts))
    }

    /// Fetches an image and saves it to `save_path`.
    ///
    /// Gifs are saved untouched; everything else goes through the transfer plan.
    pub fn download_image(
        &self,
        img_url: &str,
        save_path: &Path,
        scramble_id: u64,
        decode_image: bool,
        codec: &dyn ImageCodec,
    ) -> Result<TransferPlan> {
        let resp = self.get_image(img_url)?;
        resp.require_success()?;

        let plan = resp.transfer_to(save_path, scramble_id, decode_image, Some(img_url), codec)?;
        Ok(plan)
    }

    pub fn download_by_image(
        &self,
        image: &Image,
        save_path: &Path,
        decode_image: bool,
        codec: &dyn ImageCodec,
    ) -> Result<TransferPlan> {
        self.download_image(&image.url, save_path, image.scramble_id, decode_image, codec)
    }
}

impl fmt::Debug for JmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JmClient")
            .field("kind", &self.kind)
            .field("retry_times", &self.retry_times)
            .field("domains", &self.domains)
            .finish_non_exhaustive()
    }
}
