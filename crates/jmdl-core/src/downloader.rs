//! Photo downloader.
//!
//! Resolves every image's path through the option, then fetches the images
//! with a pool of `download.threading.batch_count` workers pulling from a
//! shared queue.

use anyhow::Result;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::mpsc;

use crate::client::JmClient;
use crate::codec::ImageCodec;
use crate::entity::Photo;
use crate::option::JmOption;
use crate::response::TransferPlan;

/// Outcome counts for one photo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadReport {
    pub downloaded: usize,
    /// Images whose target file already existed while `download.cache` was on.
    pub skipped: usize,
    pub failed: usize,
}

enum ImageOutcome {
    Downloaded(TransferPlan),
    Skipped,
}

fn download_one_image(
    option: &JmOption,
    client: &JmClient,
    codec: &dyn ImageCodec,
    photo: &Photo,
    index: usize,
) -> Result<ImageOutcome> {
    let path = option.decide_image_filepath(photo, index)?;
    let path = Path::new(&path);

    if option.download_cache() && path.exists() {
        return Ok(ImageOutcome::Skipped);
    }

    let image = &photo[index];
    let plan = client.download_by_image(image, path, option.download_image_decode(), codec)?;
    Ok(ImageOutcome::Downloaded(plan))
}

/// Downloads all images of `photo`. Per-image failures are logged and counted,
/// not returned.
pub fn download_photo(
    option: &JmOption,
    client: &JmClient,
    codec: &dyn ImageCodec,
    photo: &Photo,
) -> DownloadReport {
    let count = photo.len();
    let mut report = DownloadReport::default();
    if count == 0 {
        return report;
    }

    let work: Mutex<VecDeque<usize>> = Mutex::new((0..count).collect());
    let num_workers = option.download_threading_batch_count().min(count);
    let (tx, rx) = mpsc::channel();

    std::thread::scope(|s| {
        for _ in 0..num_workers {
            let tx = tx.clone();
            let work = &work;
            s.spawn(move || loop {
                let Some(index) = work.lock().pop_front() else {
                    break;
                };
                let res = download_one_image(option, client, codec, photo, index);
                if tx.send((index, res)).is_err() {
                    break;
                }
            });
        }
        drop(tx);

        for (index, res) in rx {
            match res {
                Ok(ImageOutcome::Downloaded(plan)) => {
                    report.downloaded += 1;
                    tracing::debug!(photo = %photo.id, index, ?plan, "image downloaded");
                }
                Ok(ImageOutcome::Skipped) => report.skipped += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(photo = %photo.id, index, "image download failed: {:#}", e);
                }
            }
        }
    });

    tracing::info!(
        photo = %photo.id,
        downloaded = report.downloaded,
        skipped = report.skipped,
        failed = report.failed,
        "photo download finished"
    );
    report
}
