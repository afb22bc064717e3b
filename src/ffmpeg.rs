use crate::prelude::*;
use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// Boundary to the external media engine. The real implementation shells out
/// to `ffmpeg`/`ffprobe`; tests substitute a mock that records arguments.
#[async_trait]
pub(crate) trait Ffmpeg: fmt::Debug + Send + Sync {
    /// Invoke the ffmpeg process with the given arguments.
    async fn run(&self, args: Vec<String>) -> Result<Vec<u8>>;

    /// Total duration of the media file at `path`.
    async fn probe_duration(&self, path: &Utf8Path) -> Result<Duration>;
}

#[derive(Debug)]
pub(crate) struct FfmpegProcess;

#[async_trait]
impl Ffmpeg for FfmpegProcess {
    async fn run(&self, args: Vec<String>) -> Result<Vec<u8>> {
        crate::util::cmd::ffmpeg(args).await
    }

    async fn probe_duration(&self, path: &Utf8Path) -> Result<Duration> {
        crate::util::cmd::media_duration(path).await
    }
}
