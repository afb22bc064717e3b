use super::Cmd;
use crate::config::Config;
use crate::display;
use crate::prelude::*;
use crate::watchlist::store;
use async_trait::async_trait;
use clap::Parser;

/// Open a tracked video in the OS-native viewer
#[derive(Parser, Debug)]
pub(crate) struct Preview;

#[async_trait]
impl Cmd for Preview {
    async fn run(self, config: Config) -> Result {
        let watchlist = store::load_or_default(&config.watchlist).await?;

        let path = super::select_file(&watchlist, "Enter the video number to preview: ").await?;

        if let Some(file) = watchlist.get(&path) {
            info!("Opening {}...", display::bold(&file.file_name()));
        }

        if let Err(err) = crate::fs::preview_video(&path).await {
            error!("Failed to preview the video!\n{err:?}");
        }

        Ok(())
    }
}
