use crate::clip::TrimMode;
use crate::prelude::*;
use crate::youtube::Privacy;
use serde::Deserialize;

pub(crate) const DEFAULT_PATH: &str = "clipshelf.toml";

/// Process-wide defaults, read from `clipshelf.toml` in the working directory
/// (or the `--config` override). An absent default file means built-in
/// defaults; a file that exists but doesn't parse is fatal.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    /// Default title for uploaded clips.
    pub(crate) title: String,
    /// Default description for uploaded clips.
    pub(crate) description: String,
    /// Default privacy level for uploaded clips.
    pub(crate) privacy: Privacy,
    /// Default encoder thread count.
    pub(crate) threads: u32,
    /// Frame rate the trimmed clip is written at.
    pub(crate) fps: u32,
    /// Trim mode offered as the default in the interactive session.
    pub(crate) trim_mode: TrimMode,
    /// Root folder scanned for recorded videos.
    pub(crate) video_dir: Utf8PathBuf,
    /// Folder trimmed clips are written to.
    pub(crate) clips_dir: Utf8PathBuf,
    /// Path of the watchlist ledger file.
    pub(crate) watchlist: Utf8PathBuf,
    pub(crate) youtube: YoutubeConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct YoutubeConfig {
    /// Bearer token for the upload API. Falls back to the
    /// `YOUTUBE_ACCESS_TOKEN` env var when unset.
    pub(crate) access_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Game clip".to_owned(),
            description: String::new(),
            privacy: Privacy::Unlisted,
            threads: default_threads(),
            fps: 60,
            trim_mode: TrimMode::Interval,
            video_dir: "videos".into(),
            clips_dir: "clips".into(),
            watchlist: "watchlist.txt".into(),
            youtube: YoutubeConfig::default(),
        }
    }
}

impl Config {
    pub(crate) async fn load(path: Option<&Utf8Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (path, true),
            None => (Utf8Path::new(DEFAULT_PATH), false),
        };

        if !required && !path.try_exists()? {
            debug!("No config file at `{path}`, using the built-in defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read the config file `{path}`"))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse the config file `{path}`"))
    }

    /// Token for the upload protocol: config first, env var second.
    pub(crate) fn access_token(&self) -> Result<String> {
        if let Some(token) = &self.youtube.access_token {
            return Ok(token.clone());
        }

        std::env::var("YOUTUBE_ACCESS_TOKEN").context(
            "No YouTube access token. Set `youtube.access_token` in the config file \
            or the `YOUTUBE_ACCESS_TOKEN` env var",
        )
    }
}

fn default_threads() -> u32 {
    std::thread::available_parallelism()
        .map(|threads| threads.get() as u32)
        .unwrap_or(1)
}
