use super::Cmd;
use crate::config::Config;
use crate::prelude::*;
use crate::watchlist::{store, Flag};
use async_trait::async_trait;
use clap::Parser;

/// Set or clear a lifecycle flag on a tracked video
#[derive(Parser, Debug)]
pub(crate) struct Mark {
    /// Flag to change
    #[clap(value_enum)]
    flag: Flag,

    /// Clear the flag instead of setting it
    #[clap(long)]
    clear: bool,
}

#[async_trait]
impl Cmd for Mark {
    async fn run(self, config: Config) -> Result {
        let mut watchlist = store::load_or_default(&config.watchlist).await?;

        let path = super::select_file(&watchlist, "Enter the video number to mark: ").await?;

        if let Some(file) = watchlist.get(&path) {
            info!("\n{file}");
        }

        let value = !self.clear;
        let changed = watchlist.set_flag(&path, self.flag, value)?;

        let state = match value {
            true => "set",
            false => "cleared",
        };

        match changed {
            true => info!("The `{}` flag is now {state} on `{path}`", self.flag),
            false => info!("The `{}` flag was already {state} on `{path}`", self.flag),
        }

        store::save(&watchlist, &config.watchlist).await
    }
}
