//! Media file transfer.

use std::path::Path;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::api::InstagramApi;
use crate::error::{Error, Result};
use crate::output::create_download_bar;

/// Minimum file size to show progress bar (20 MB).
const PROGRESS_THRESHOLD: u64 = 20 * 1024 * 1024;

/// Transfers one remote media URL into a local file.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Write the body of `url` to `dest`, returning the number of bytes written.
    ///
    /// Network failures, non-2xx responses and write errors are all reported
    /// as [`Error::Download`] or [`Error::Io`].
    async fn fetch(&self, url: &str, dest: &Path) -> Result<u64>;

    /// Whether transfers should draw a progress bar for large bodies.
    fn show_progress(&self) -> bool {
        false
    }
}

#[async_trait]
impl MediaFetcher for InstagramApi {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<u64> {
        let response = self.download_file(url).await?;

        let content_length = response.content_length();
        let show_progress = self.show_progress()
            && content_length.map(|l| l > PROGRESS_THRESHOLD).unwrap_or(false);

        let progress = show_progress.then(|| create_download_bar(content_length.unwrap_or(0)));

        // Stream to file
        let mut file = File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::Download(format!("Stream error: {}", e)))?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;

            if let Some(ref pb) = progress {
                pb.set_position(downloaded);
            }
        }

        file.flush().await?;

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        Ok(downloaded)
    }

    fn show_progress(&self) -> bool {
        self.shows_downloads()
    }
}
