mod clip;
mod delete;
mod list;
mod mark;
mod preview;
mod scan;

use crate::config::Config;
use crate::display;
use crate::prelude::*;
use crate::util::input::{self, BoundsErrors};
use crate::watchlist::{TrackedFile, Watchlist};
use async_trait::async_trait;

pub(crate) use clip::Clip;
pub(crate) use delete::Delete;
pub(crate) use list::List;
pub(crate) use mark::Mark;
pub(crate) use preview::Preview;
pub(crate) use scan::Scan;

#[async_trait]
pub(crate) trait Cmd {
    async fn run(self, config: Config) -> Result;
}

/// Folds freshly scanned videos into the watchlist. Returns how many were
/// new; everything already tracked is left untouched.
pub(crate) async fn merge_scanned(watchlist: &mut Watchlist, video_dir: &Utf8Path) -> Result<usize> {
    let videos = crate::fs::scan_videos(video_dir).await?;

    let mut added = 0;
    for video in videos {
        if watchlist.contains(&video.path) {
            continue;
        }

        debug!("Tracking {} at {}", video.file_name, video.path);
        watchlist.add(TrackedFile::new(video.path));
        added += 1;
    }

    Ok(added)
}

/// Renders the numbered candidate listing and reads a selection. Only
/// nonmissing entries are offered, so deleted or moved files can't be picked.
pub(crate) async fn select_file(watchlist: &Watchlist, message: &str) -> Result<Utf8PathBuf> {
    let candidates = watchlist.nonmissing().collect_vec();

    if candidates.is_empty() {
        bail!("No videos on the watchlist. Run `clipshelf scan` first");
    }

    let rows = candidates
        .iter()
        .enumerate()
        .map(|(index, file)| {
            vec![
                (index + 1).to_string(),
                file.rel_path().to_string(),
                display::yes_no(file.ignored()),
                display::yes_no(file.archived()),
                display::yes_no(file.uploaded()),
            ]
        })
        .collect_vec();

    let header = ["#", "Filepath", "Ignored", "Archived", "Uploaded"];
    info!("\n{}", display::table(&header, &rows));

    let index: usize =
        input::prompt_bounded(message, 1, candidates.len(), None, &BoundsErrors::default())
            .await?;

    Ok(candidates[index - 1].path().to_owned())
}
