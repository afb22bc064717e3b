mod clip;
mod cmd;
mod config;
mod display;
mod ffmpeg;
mod fs;
mod prelude;
mod util;
mod watchlist;
mod youtube;

use clap::Parser;
use cmd::Cmd;
use config::Config;

/// A tool that shepherds locally recorded game clips: scan them into a
/// watchlist, trim the good ones with ffmpeg and push them to YouTube
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Path to the config file (by default `clipshelf.toml` is picked up
    /// from the working directory when present)
    #[clap(long, global = true)]
    config: Option<camino::Utf8PathBuf>,

    #[clap(subcommand)]
    cmd: Subcommand,
}

#[derive(clap::Subcommand, Debug)]
enum Subcommand {
    Scan(cmd::Scan),
    List(cmd::List),
    Clip(cmd::Clip),
    Mark(cmd::Mark),
    Delete(cmd::Delete),
    Preview(cmd::Preview),
}

pub async fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::load(args.config.as_deref()).await?;

    match args.cmd {
        Subcommand::Scan(cmd) => cmd.run(config).await,
        Subcommand::List(cmd) => cmd.run(config).await,
        Subcommand::Clip(cmd) => cmd.run(config).await,
        Subcommand::Mark(cmd) => cmd.run(config).await,
        Subcommand::Delete(cmd) => cmd.run(config).await,
        Subcommand::Preview(cmd) => cmd.run(config).await,
    }
}
