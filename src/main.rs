mod app;
mod commands;
mod config;
mod logging;
mod query;
mod store;
mod swapi;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "datapad")]
#[command(about = "A favorites reading list over the Star Wars API")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/datapad/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Keep state in memory and log to stderr, nothing is written to disk
  #[arg(long)]
  ephemeral: bool,

  #[command(subcommand)]
  command: app::Command,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let _log_guard = logging::init(args.ephemeral);

  // Load configuration
  let config = config::Config::load(args.config.as_deref())?;

  let app = app::App::new(&config, args.ephemeral)?;
  app.run(args.command).await?;

  Ok(())
}
