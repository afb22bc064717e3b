use super::Cmd;
use crate::config::Config;
use crate::prelude::*;
use crate::watchlist::store;
use async_trait::async_trait;
use clap::Parser;

/// Print the watchlist with per-file flags and the aggregate counters
#[derive(Parser, Debug)]
pub(crate) struct List;

#[async_trait]
impl Cmd for List {
    async fn run(self, config: Config) -> Result {
        let watchlist = store::load_or_default(&config.watchlist).await?;

        if watchlist.is_empty() {
            info!("The watchlist is empty. Run `clipshelf scan` first");
            return Ok(());
        }

        info!("\n{watchlist}");

        Ok(())
    }
}
