//! In-memory CDN and codec used by the integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use jmdl_core::client::{ClientImpl, JmClient, Postman, PostmanRequest};
use jmdl_core::codec::ImageCodec;
use jmdl_core::entity::{Album, Photo};
use jmdl_core::response::RawResponse;

/// Serves every image URL with its own URL as the body; URLs containing
/// `missing` answer 404.
#[derive(Default)]
pub struct FakeCdn {
    pub requests: AtomicUsize,
}

impl Postman for FakeCdn {
    fn send(&self, request: &PostmanRequest) -> anyhow::Result<RawResponse> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if request.url.contains("missing") {
            return Ok(RawResponse::new(404, Vec::new(), request.url.clone()));
        }
        Ok(RawResponse::new(200, request.url.clone(), request.url.clone()))
    }
}

/// Prefixes the bytes so tests can tell which transform ran.
pub struct TaggingCodec;

impl ImageCodec for TaggingCodec {
    fn descramble(&self, scramble_id: u64, source: &[u8]) -> anyhow::Result<Vec<u8>> {
        let mut out = format!("descrambled:{}:", scramble_id).into_bytes();
        out.extend_from_slice(source);
        Ok(out)
    }

    fn reencode(&self, source: &[u8], target_suffix: &str) -> anyhow::Result<Vec<u8>> {
        let mut out = format!("reencoded{}:", target_suffix).into_bytes();
        out.extend_from_slice(source);
        Ok(out)
    }
}

pub fn client(cdn: Arc<FakeCdn>) -> JmClient {
    JmClient::new(ClientImpl::Api, cdn, 1, vec!["api.example.com".to_string()])
}

/// Chapter 1 of album 350234 with the given image filenames.
pub fn photo(filenames: &[&str]) -> Photo {
    let mut album = Album::new("350234", "Sample Album");
    album.authors.push("someone".to_string());

    let mut photo = Photo::new("350235", "Chapter 1", 1).with_album(Arc::new(album));
    photo.scramble_id = 220980;
    photo.with_image_urls(
        filenames
            .iter()
            .map(|name| format!("https://cdn.example.com/media/photos/350235/{}", name)),
    )
}
