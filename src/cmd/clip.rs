use super::Cmd;
use crate::clip::{ClipJob, TrimMode, TrimSelection};
use crate::config::Config;
use crate::display;
use crate::ffmpeg::{Ffmpeg, FfmpegProcess};
use crate::prelude::*;
use crate::util::duration::DurationExt as _;
use crate::util::input::{self, BoundsErrors};
use crate::watchlist::{store, Flag};
use crate::youtube::{Privacy, YoutubeUploader};
use async_trait::async_trait;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;

/// Trim a tracked clip and optionally upload it to YouTube
///
/// Without flags this is a fully interactive session: pick a video, pick a
/// trim mode and time bounds, review the job, cut. `--begin`/`--end` skip the
/// time prompts entirely; which of the two is present decides the trim mode
/// (begin only: keep from there to the end, end only: keep up to there, both:
/// keep the interval).
#[derive(Parser, Debug)]
pub(crate) struct Clip {
    /// Path to the source video. Skips the interactive selection; the file
    /// doesn't have to be on the watchlist.
    #[clap(long)]
    input: Option<Utf8PathBuf>,

    /// The time the clip starts at, e.g. `30`, `1:30` or `0:01:30.5`
    #[clap(long, value_parser = crate::util::duration::parse)]
    begin: Option<Duration>,

    /// The time the clip ends at
    #[clap(long, value_parser = crate::util::duration::parse)]
    end: Option<Duration>,

    /// Title of the uploaded video
    #[clap(long)]
    title: Option<String>,

    /// Description of the uploaded video
    #[clap(long)]
    description: Option<String>,

    /// Privacy level of the uploaded video
    #[clap(long, value_enum)]
    privacy: Option<Privacy>,

    /// Encoder thread count
    #[clap(long)]
    threads: Option<u32>,

    /// Output file name (defaults to an epoch-millis timestamp)
    #[clap(long)]
    output: Option<String>,

    /// Upload without asking for confirmation
    #[clap(long)]
    upload: bool,
}

#[async_trait]
impl Cmd for Clip {
    async fn run(self, config: Config) -> Result {
        let mut watchlist = store::load_or_default(&config.watchlist).await?;

        let source = match &self.input {
            Some(input) => input.clone(),
            None => {
                // Fold in anything recorded since the last scan, so fresh
                // clips are selectable right away
                super::merge_scanned(&mut watchlist, &config.video_dir).await?;
                super::select_file(&watchlist, "Enter the video number to clip: ").await?
            }
        };

        let ffmpeg: Arc<dyn Ffmpeg> = Arc::new(FfmpegProcess);

        let trim = self.trim_selection(&source, ffmpeg.as_ref(), &config).await?;

        let title = match &self.title {
            Some(title) => title.clone(),
            None => input::prompt_text("Clip title: ", &config.title).await?,
        };

        let description = match &self.description {
            Some(description) => description.clone(),
            None => input::prompt_text("Clip description: ", &config.description).await?,
        };

        let privacy = match self.privacy {
            Some(privacy) => privacy,
            None => prompt_privacy(config.privacy).await?,
        };

        let threads = match self.threads {
            Some(threads) => threads,
            None => {
                input::prompt_bounded(
                    "Encoder threads: ",
                    1,
                    128,
                    Some(config.threads),
                    &BoundsErrors::default(),
                )
                .await?
            }
        };

        let job = ClipJob::builder()
            .title(title)
            .description(description)
            .privacy(privacy)
            .threads(threads)
            .fps(config.fps)
            .source(source.clone())
            .clips_dir(config.clips_dir.clone())
            .and_file_name(self.output.clone())
            .trim(trim)
            .ffmpeg(ffmpeg)
            .build()?;

        info!("\n{job}");

        fs::create_dir_all(&config.clips_dir).await?;
        job.write_file().await?;

        if input::confirm("Upload the clip to YouTube?", self.upload).await? {
            let uploader = YoutubeUploader::new(config.access_token()?);

            match job.upload(&uploader).await {
                Ok(id) => {
                    info!("🎉 Uploaded! Video id: {}", display::bold(&id));

                    if watchlist.contains(&source) {
                        watchlist.set_flag(&source, Flag::Uploaded, true)?;
                    }
                }
                // The status code and response body are in the error chain;
                // re-run the upload by hand if it was transient
                Err(err) => error!("Upload failed!\n{err:?}"),
            }
        }

        store::save(&watchlist, &config.watchlist).await
    }
}

impl Clip {
    async fn trim_selection(
        &self,
        source: &Utf8Path,
        ffmpeg: &dyn Ffmpeg,
        config: &Config,
    ) -> Result<TrimSelection> {
        // Flags short-circuit the prompts
        if self.begin.is_some() || self.end.is_some() {
            return match (self.begin, self.end) {
                (Some(begin), Some(end)) => {
                    TrimSelection::new(TrimMode::Interval, None, Some((begin, end)))
                }
                (Some(begin), None) => TrimSelection::new(TrimMode::Start, Some(begin), None),
                (None, end) => TrimSelection::new(TrimMode::End, end, None),
            };
        }

        let duration = ffmpeg.probe_duration(source).await?.to_secs_f64();

        let mode = prompt_trim_mode(config.trim_mode).await?;

        match mode {
            TrimMode::Start | TrimMode::End => {
                let message = match mode {
                    TrimMode::Start => "Clip from (seconds): ",
                    _ => "Clip up to (seconds): ",
                };

                let time_from: f64 =
                    input::prompt_bounded(message, 0.0, duration, None, &BoundsErrors::default())
                        .await?;

                TrimSelection::new(mode, Some(Duration::from_secs_f64(time_from)), None)
            }
            TrimMode::Interval => {
                let (begin, end): (f64, f64) =
                    input::prompt_interval("Clip interval (seconds): ", 0.0, duration).await?;

                TrimSelection::new(
                    mode,
                    None,
                    Some((Duration::from_secs_f64(begin), Duration::from_secs_f64(end))),
                )
            }
        }
    }
}

async fn prompt_trim_mode(default: TrimMode) -> Result<TrimMode> {
    let options = [
        ("s", "keep from a start point to the end"),
        ("e", "keep from the start up to an end point"),
        ("i", "keep an interval"),
    ];

    let default_key = match default {
        TrimMode::Start => "s",
        TrimMode::End => "e",
        TrimMode::Interval => "i",
    };

    let value =
        input::prompt_choice("Select a trim mode: ", None, &options, Some(default_key)).await?;

    Ok(match value {
        "s" => TrimMode::Start,
        "e" => TrimMode::End,
        _ => TrimMode::Interval,
    })
}

async fn prompt_privacy(default: Privacy) -> Result<Privacy> {
    let options = [("p", "public"), ("u", "unlisted"), ("r", "private")];

    let default_key = match default {
        Privacy::Public => "p",
        Privacy::Unlisted => "u",
        Privacy::Private => "r",
    };

    let value = input::prompt_choice(
        "Select a privacy status: ",
        Some("Who will be able to see the uploaded clip."),
        &options,
        Some(default_key),
    )
    .await?;

    Ok(match value {
        "p" => Privacy::Public,
        "u" => Privacy::Unlisted,
        _ => Privacy::Private,
    })
}
