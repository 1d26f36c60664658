// crates/highreel-cli/src/main.rs
//
// Entry point. Logging goes to stderr so stdout stays clean for reports.

mod app;
mod cli;
mod helpers;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use highreel_core::helpers::time::TimeSpec;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG if set, otherwise pick defaults from the verbose flag.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "highreel_cli=debug,highreel_media=trace".to_string()
        } else {
            "highreel_cli=info,highreel_media=warn".to_string()
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Inspect { file, duration, json } => app::inspect(&file, duration, json),
        Commands::Play { file, duration, step, from, until, width } => {
            let range = match (from, until) {
                (Some(from), Some(until)) => Some((TimeSpec::from(from), TimeSpec::from(until))),
                _ => None,
            };
            app::play(app::PlayOptions { file: &file, duration, step, range, width })
        }
        Commands::Time { specs } => app::time(&specs),
    }
}
