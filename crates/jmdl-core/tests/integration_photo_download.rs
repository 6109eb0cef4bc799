//! Integration test: resolves paths through an option file's dir rule and
//! downloads a photo's images from an in-memory CDN into a temp directory.

mod common;

use std::fs;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use jmdl_core::advice::OptionAdvice;
use jmdl_core::downloader::{download_photo, DownloadReport};
use jmdl_core::entity::Photo;
use jmdl_core::option::{JmOption, OptionContext};
use serde_json::json;
use tempfile::tempdir;

use common::catalog::{self, FakeCdn, TaggingCodec};

fn option_in(base_dir: &Path, decode: bool, cache: bool) -> JmOption {
    let ctx = Arc::new(OptionContext::new(base_dir));
    let tree = json!({
        "dir_rule": { "rule": "Bd_Aid_Pindex", "base_dir": "${workspace}/downloads" },
        "download": {
            "cache": cache,
            "image": { "decode": decode },
            "threading": { "batch_count": 2 }
        }
    });
    JmOption::construct(&tree, &ctx).unwrap()
}

#[test]
fn photo_images_land_in_rule_directory() {
    let ws = tempdir().unwrap();
    let option = option_in(ws.path(), true, false);
    let cdn = Arc::new(FakeCdn::default());
    let client = catalog::client(Arc::clone(&cdn));
    let photo = catalog::photo(&["00001.webp", "00002.webp", "00003.gif"]);

    let report = download_photo(&option, &client, &TaggingCodec, &photo);
    assert_eq!(
        report,
        DownloadReport {
            downloaded: 3,
            skipped: 0,
            failed: 0
        }
    );

    let dir = ws.path().join("downloads").join("350234").join("1");
    let first = fs::read_to_string(dir.join("00001.webp")).unwrap();
    assert!(first.starts_with("descrambled:220980:"));
    assert!(first.ends_with("/00001.webp"));

    let gif = fs::read_to_string(dir.join("00003.gif")).unwrap();
    assert_eq!(gif, "https://cdn.example.com/media/photos/350235/00003.gif");
    assert_eq!(cdn.requests.load(Ordering::SeqCst), 3);
}

#[test]
fn cached_images_are_not_fetched_again() {
    let ws = tempdir().unwrap();
    let option = option_in(ws.path(), false, true);
    let cdn = Arc::new(FakeCdn::default());
    let client = catalog::client(Arc::clone(&cdn));
    let photo = catalog::photo(&["00001.webp", "00002.webp"]);

    let first = download_photo(&option, &client, &TaggingCodec, &photo);
    assert_eq!(first.downloaded, 2);

    let second = download_photo(&option, &client, &TaggingCodec, &photo);
    assert_eq!(second.skipped, 2);
    assert_eq!(second.downloaded, 0);
    assert_eq!(cdn.requests.load(Ordering::SeqCst), 2);
}

#[test]
fn failed_images_are_counted_not_fatal() {
    let ws = tempdir().unwrap();
    let option = option_in(ws.path(), false, false);
    let client = catalog::client(Arc::new(FakeCdn::default()));
    let photo = catalog::photo(&["00001.webp", "missing.webp", "00003.webp"]);

    let report = download_photo(&option, &client, &TaggingCodec, &photo);
    assert_eq!(report.downloaded, 2);
    assert_eq!(report.failed, 1);

    let dir = ws.path().join("downloads").join("350234").join("1");
    assert!(!dir.join("missing.webp").exists());
}

#[test]
fn configured_suffix_reencodes() {
    let ws = tempdir().unwrap();
    let ctx = Arc::new(OptionContext::new(ws.path()));
    let tree = json!({
        "dir_rule": { "rule": "Bd_Pid", "base_dir": "${workspace}" },
        "download": { "image": { "decode": false, "suffix": "png" } }
    });
    let option = JmOption::construct(&tree, &ctx).unwrap();
    let client = catalog::client(Arc::new(FakeCdn::default()));
    let photo = catalog::photo(&["00001.webp"]);

    let report = download_photo(&option, &client, &TaggingCodec, &photo);
    assert_eq!(report.downloaded, 1);

    let saved = fs::read_to_string(ws.path().join("350235").join("00001.png")).unwrap();
    assert!(saved.starts_with("reencoded.png:"));
}

struct FlatLayout(String);

impl OptionAdvice for FlatLayout {
    fn decide_image_filepath(&self, _option: &JmOption, photo: &Photo, index: usize) -> Option<String> {
        Some(format!("{}/{}-{}{}", self.0, photo.id, index, photo[index].suffix))
    }
}

#[test]
fn filepath_advice_redirects_downloads() {
    let ws = tempdir().unwrap();
    let flat = tempdir().unwrap();
    let option = option_in(ws.path(), false, false);
    option.register_advice([
        Arc::new(FlatLayout(flat.path().display().to_string())) as Arc<dyn OptionAdvice>
    ]);
    let client = catalog::client(Arc::new(FakeCdn::default()));
    let photo = catalog::photo(&["00001.webp", "00002.webp"]);

    let report = download_photo(&option, &client, &TaggingCodec, &photo);
    assert_eq!(report.downloaded, 2);
    assert!(flat.path().join("350235-0.webp").exists());
    assert!(flat.path().join("350235-1.webp").exists());
    assert!(!ws.path().join("downloads").exists());
}
