// crates/highreel-cli/src/cli.rs
//
// Argument surface for the `highreel` binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "highreel")]
#[command(author, version, about = "Inspect highlight timelines and simulate playback over them")]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize a highlight file and show the resulting segments
    Inspect {
        /// Range array or backend highlights payload (JSON)
        #[arg(required = true)]
        file: PathBuf,

        /// Video duration in seconds; enables bar geometry
        #[arg(short, long)]
        duration: Option<f64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Play a simulated video over the highlights and print segment changes
    Play {
        /// Range array or backend highlights payload (JSON)
        #[arg(required = true)]
        file: PathBuf,

        /// Video duration in seconds
        #[arg(short, long)]
        duration: f64,

        /// Clock step per tick, in seconds
        #[arg(long, default_value = "0.25")]
        step: f64,

        /// Start of a bounded range to play (s, m:s or h:m:s)
        #[arg(long, requires = "until")]
        from: Option<String>,

        /// End of the bounded range; playback pauses here
        #[arg(long, requires = "from")]
        until: Option<String>,

        /// Width of the printed highlight bar, in characters
        #[arg(long, default_value = "60")]
        width: usize,
    },

    /// Convert time specs to seconds and display form
    Time {
        /// Values like 42, 1:30 or 1:02:03
        #[arg(required = true)]
        specs: Vec<String>,
    },
}
