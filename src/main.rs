use anyhow::Result;
use clap::{CommandFactory, Parser};

use nuketrack::config::Config;
use nuketrack::logging;
use nuketrack::NukeTracker;

#[derive(Parser)]
#[command(name = "nuketrack")]
#[command(about = "Rolling 30-day NUKE penalty ledger and per-user reports for glftpd sites")]
#[command(version)]
struct Cli {
    /// `update` to prune the store and ingest new NUKE events, or a username
    /// to report on
    target: Option<String>,

    /// Output the user report in JSON format
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Warning: falling back to default configuration: {}", e);
        Config::default()
    });
    logging::init_logging(&config.logging);

    match cli.target.as_deref() {
        Some("update") => {
            NukeTracker::new(config).run_update();
        }
        Some(username) => {
            NukeTracker::new(config).run_report(username, cli.json);
        }
        None => {
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
