use super::Cmd;
use crate::config::Config;
use crate::prelude::*;
use crate::watchlist::store;
use async_trait::async_trait;
use clap::Parser;

/// Scan the video folder and add newly discovered clips to the watchlist
///
/// Looks at the folder itself and one level of subfolders, since recording
/// software tends to group clips by game.
#[derive(Parser, Debug)]
pub(crate) struct Scan;

#[async_trait]
impl Cmd for Scan {
    async fn run(self, config: Config) -> Result {
        let mut watchlist = store::load_or_default(&config.watchlist).await?;

        let added = super::merge_scanned(&mut watchlist, &config.video_dir).await?;

        info!(
            "{added} new videos added to the watchlist ({} tracked in total)",
            watchlist.len()
        );

        store::save(&watchlist, &config.watchlist).await
    }
}
