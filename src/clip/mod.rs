#[cfg(test)]
pub(crate) mod testing;

use crate::display;
use crate::ffmpeg::Ffmpeg;
use crate::prelude::*;
use crate::util::duration::DurationExt as _;
use crate::util::iter;
use crate::youtube::{Privacy, UploadRequest, Uploader};
use anyhow::ensure;
use buildstructor::buildstructor;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Which time-selection strategy cuts the subclip.
#[derive(strum::Display, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub(crate) enum TrimMode {
    Start,
    End,
    Interval,
}

/// Validated trim parameters. `Start` keeps `[t, end-of-source)`, `End` keeps
/// `[0, t)`, `Interval` keeps `[a, b)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum TrimSelection {
    FromPoint(Duration),
    UpToPoint(Duration),
    Between(Duration, Duration),
}

impl TrimSelection {
    /// Fails when the mode's required parameter is absent or malformed.
    pub(crate) fn new(
        mode: TrimMode,
        time_from: Option<Duration>,
        interval: Option<(Duration, Duration)>,
    ) -> Result<Self> {
        match mode {
            TrimMode::Start | TrimMode::End => {
                let time_from = time_from.with_context(|| {
                    format!("Invalid clip (no time offset given for `{mode}` mode)")
                })?;

                Ok(match mode {
                    TrimMode::Start => Self::FromPoint(time_from),
                    _ => Self::UpToPoint(time_from),
                })
            }
            TrimMode::Interval => {
                let (begin, end) =
                    interval.context("Invalid clip (no interval given for `interval` mode)")?;

                ensure!(
                    begin <= end,
                    "Invalid clip (interval `{} {}` is not ascending)",
                    begin.to_secs_f64(),
                    end.to_secs_f64(),
                );

                Ok(Self::Between(begin, end))
            }
        }
    }
}

impl fmt::Display for TrimSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FromPoint(begin) => write!(f, "from {}s to the end", begin.to_secs_f64()),
            Self::UpToPoint(end) => write!(f, "from the start up to {}s", end.to_secs_f64()),
            Self::Between(begin, end) => {
                write!(f, "from {}s to {}s", begin.to_secs_f64(), end.to_secs_f64())
            }
        }
    }
}

/// One trim-and-publish request, built once per session from validated input.
#[derive(Debug)]
pub(crate) struct ClipJob {
    title: String,
    description: String,
    privacy: Privacy,
    threads: u32,
    fps: u32,
    source: Utf8PathBuf,
    output: Utf8PathBuf,
    trim: TrimSelection,
    ffmpeg: Arc<dyn Ffmpeg>,
}

#[buildstructor]
impl ClipJob {
    #[builder]
    pub(crate) fn new(
        title: String,
        description: String,
        privacy: Privacy,
        threads: u32,
        fps: u32,
        source: Utf8PathBuf,
        clips_dir: Utf8PathBuf,
        file_name: Option<String>,
        trim: TrimSelection,
        ffmpeg: Option<Arc<dyn Ffmpeg>>,
    ) -> Result<Self> {
        ensure!(threads > 0, "Invalid clip (zero encoder threads)");

        // Epoch millis keep default names unique across sessions without
        // asking the user for one.
        let file_name =
            file_name.unwrap_or_else(|| chrono::Utc::now().timestamp_millis().to_string());

        let mut output = clips_dir.join(file_name);
        if output.extension().is_none() {
            output.set_extension(source.extension().unwrap_or(crate::fs::VIDEO_EXTENSION));
        }

        Ok(Self {
            title,
            description,
            privacy,
            threads,
            fps,
            source,
            output,
            trim,
            ffmpeg: ffmpeg.unwrap_or_else(|| Arc::new(crate::ffmpeg::FfmpegProcess)),
        })
    }
}

impl ClipJob {
    #[instrument(name = "clip", skip_all, fields(source = %self.source))]
    pub(crate) async fn write_file(&self) -> Result {
        let start = std::time::Instant::now();

        info!("Cutting the clip ({})...", self.trim);

        self.ffmpeg.run(self.ffmpeg_args()).await?;

        let size = fs::metadata(&self.output).await?.len();
        let out_file = nu_ansi_term::Color::Magenta.bold().paint(self.output.as_str());

        info!(
            "🔥 Saved output at {out_file} ({size} in {elapsed})",
            size = display::bold_human_size(size),
            elapsed = display::elapsed(start),
        );

        Ok(())
    }

    pub(crate) async fn upload(&self, uploader: &dyn Uploader) -> Result<String> {
        let request = UploadRequest {
            title: &self.title,
            description: &self.description,
            privacy: self.privacy,
            file: &self.output,
        };

        uploader.upload(&request).await
    }

    fn ffmpeg_args(&self) -> Vec<String> {
        let bounds = match self.trim {
            TrimSelection::FromPoint(begin) => vec![("-ss", begin)],
            TrimSelection::UpToPoint(end) => vec![("-to", end)],
            TrimSelection::Between(begin, end) => vec![("-ss", begin), ("-to", end)],
        };

        iter::strs(["-y", "-i", self.source.as_str()])
            .chain(
                bounds
                    .into_iter()
                    .flat_map(|(name, bound)| [name.to_owned(), bound.to_secs_f64().to_string()]),
            )
            .chain(iter::strs(["-r"]))
            .chain([self.fps.to_string()])
            .chain(iter::strs(["-threads"]))
            .chain([self.threads.to_string()])
            .chain([self.output.to_string()])
            .collect()
    }
}

impl fmt::Display for ClipJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [
            ("Title", self.title.clone()),
            ("Description", self.description.escape_default().to_string()),
            ("Privacy Status", self.privacy.to_string()),
            ("Num. Threads", self.threads.to_string()),
            ("File Name", self.output.to_string()),
            ("Trim", self.trim.to_string()),
        ];

        let rows = rows
            .into_iter()
            .map(|(preference, value)| vec![preference.to_owned(), value])
            .collect_vec();

        f.write_str(&display::table(&["Preference", "Value"], &rows))
    }
}

#[cfg(test)]
mod tests {
    use super::testing::SharedMockFfmpeg;
    use super::*;
    use expect_test::{expect, Expect};

    #[test]
    fn trim_selection_validation() {
        let secs = Duration::from_secs;

        // A mode without its required parameter is a construction error
        TrimSelection::new(TrimMode::Interval, None, None).unwrap_err();
        TrimSelection::new(TrimMode::Start, None, None).unwrap_err();
        TrimSelection::new(TrimMode::End, None, Some((secs(1), secs(2)))).unwrap_err();

        // Descending intervals are malformed
        TrimSelection::new(TrimMode::Interval, None, Some((secs(5), secs(2)))).unwrap_err();

        let selection = TrimSelection::new(TrimMode::Start, Some(secs(30)), None).unwrap();
        assert_eq!(selection, TrimSelection::FromPoint(secs(30)));

        let selection = TrimSelection::new(TrimMode::End, Some(secs(30)), None).unwrap();
        assert_eq!(selection, TrimSelection::UpToPoint(secs(30)));

        let selection =
            TrimSelection::new(TrimMode::Interval, None, Some((secs(2), secs(5)))).unwrap();
        assert_eq!(selection, TrimSelection::Between(secs(2), secs(5)));
    }

    fn job(trim: TrimSelection, file_name: Option<&str>) -> ClipJob {
        ClipJob::builder()
            .title("title")
            .description("description")
            .privacy(Privacy::Unlisted)
            .threads(4)
            .fps(60)
            .source(Utf8PathBuf::from("videos/source.mp4"))
            .clips_dir(Utf8PathBuf::from("clips"))
            .and_file_name(file_name.map(ToOwned::to_owned))
            .trim(trim)
            .ffmpeg(SharedMockFfmpeg::new(Duration::from_secs(60)))
            .build()
            .unwrap()
    }

    fn assert_args(trim: TrimSelection, expected: Expect) {
        let args = job(trim, Some("out")).ffmpeg_args().join(" ");
        expected.assert_eq(&args);
    }

    #[test]
    fn ffmpeg_args_per_mode() {
        assert_args(
            TrimSelection::FromPoint(Duration::from_secs_f64(1.5)),
            expect!["-y -i videos/source.mp4 -ss 1.5 -r 60 -threads 4 clips/out.mp4"],
        );
        assert_args(
            TrimSelection::UpToPoint(Duration::from_secs(90)),
            expect!["-y -i videos/source.mp4 -to 90 -r 60 -threads 4 clips/out.mp4"],
        );
        assert_args(
            TrimSelection::Between(Duration::from_secs(2), Duration::from_secs(5)),
            expect!["-y -i videos/source.mp4 -ss 2 -to 5 -r 60 -threads 4 clips/out.mp4"],
        );
    }

    #[test]
    fn default_output_name_is_epoch_millis() {
        let job = job(TrimSelection::FromPoint(Duration::from_secs(1)), None);

        let output = &job.output;
        assert_eq!(output.extension(), Some("mp4"));
        assert_eq!(output.parent(), Some(Utf8Path::new("clips")));

        // The stem is a millisecond timestamp
        assert!(lazy_regex::regex_is_match!(
            r"^\d{13}$",
            output.file_stem().unwrap()
        ));
    }

    #[test]
    fn zero_threads_is_a_construction_error() {
        ClipJob::builder()
            .title("title")
            .description("")
            .privacy(Privacy::Private)
            .threads(0)
            .fps(60)
            .source(Utf8PathBuf::from("source.mp4"))
            .clips_dir(Utf8PathBuf::from("clips"))
            .trim(TrimSelection::FromPoint(Duration::from_secs(1)))
            .ffmpeg(SharedMockFfmpeg::new(Duration::from_secs(60)))
            .build()
            .unwrap_err();
    }

    #[test_log::test(tokio::test)]
    async fn write_file_drives_the_engine_once() {
        let dir = tempfile::tempdir().unwrap();
        let clips_dir = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();

        let mock = SharedMockFfmpeg::new(Duration::from_secs(60));

        let job = ClipJob::builder()
            .title("title")
            .description("")
            .privacy(Privacy::Unlisted)
            .threads(2)
            .fps(30)
            .source(Utf8PathBuf::from("source.mp4"))
            .clips_dir(clips_dir.clone())
            .file_name("cut".to_owned())
            .trim(TrimSelection::UpToPoint(Duration::from_secs(3)))
            .ffmpeg(mock.clone())
            .build()
            .unwrap();

        job.write_file().await.unwrap();

        assert!(clips_dir.join("cut.mp4").exists());

        drop(job);
        let log = mock.unwrap().args_log;
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].last().unwrap(), clips_dir.join("cut.mp4").as_str());
    }

    #[test]
    fn preference_table_lists_the_trim() {
        let rendered = job(
            TrimSelection::Between(Duration::from_secs(2), Duration::from_secs(5)),
            Some("out"),
        )
        .to_string();

        assert!(rendered.contains("from 2s to 5s"));
        assert!(rendered.contains("clips/out.mp4"));
    }
}
