use super::Cmd;
use crate::config::Config;
use crate::prelude::*;
use crate::util::input;
use crate::watchlist::store;
use async_trait::async_trait;
use clap::Parser;

/// Delete a tracked video from disk and drop it from the watchlist
#[derive(Parser, Debug)]
pub(crate) struct Delete {
    /// Skip the confirmation prompt
    #[clap(long)]
    yes: bool,
}

#[async_trait]
impl Cmd for Delete {
    async fn run(self, config: Config) -> Result {
        let mut watchlist = store::load_or_default(&config.watchlist).await?;

        let path = super::select_file(&watchlist, "Enter the video number to delete: ").await?;

        if !input::confirm(&format!("About to delete `{path}`."), self.yes).await? {
            info!("Aborted, nothing was deleted.");
            return Ok(());
        }

        info!("Deleting video: {path}");

        // Filesystem first. A failed delete must leave the ledger entry
        // untouched, so removal only happens after the file is gone.
        if let Err(err) = fs::remove_file(&path).await {
            error!("There was a problem deleting the video!\n{err:?}");
            return Ok(());
        }

        watchlist.remove(&path)?;

        info!("Successfully deleted the video.");

        store::save(&watchlist, &config.watchlist).await
    }
}
