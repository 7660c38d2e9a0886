use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `emogames` - Emotion-conditioned LLM agents in economic games.
#[derive(Parser, Debug)]
#[command(name = "emogames")]
#[command(version = "0.1.0")]
#[command(
    about = "Run repeated matrix games and money division games between LLM and scripted agents.",
    long_about = None
)]
pub struct Cli {
    /// Config file to use instead of ~/.emogames/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Play the configured repeated matrix game
    Table {
        /// Run every model against every emotion in [table_sweep]
        #[arg(long)]
        sweep: bool,

        /// Only print the planned configurations
        #[arg(long, requires = "sweep")]
        dry_run: bool,
    },

    /// Play the configured dictator or ultimatum game
    Division {
        /// Run both phases of [division_sweep]
        #[arg(long)]
        sweep: bool,

        /// Only print the planned configurations
        #[arg(long, requires = "sweep")]
        dry_run: bool,
    },

    /// Aggregate finished runs into pivot tables
    Analyze {
        #[command(subcommand)]
        analyze_command: AnalyzeCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum AnalyzeCommands {
    /// Cooperation rate of agent 1 per model and emotion
    Table {
        /// Directory holding the run directories
        log_root: PathBuf,

        /// Only runs whose directory name starts with this prefix
        #[arg(long, default_value = "prisoner_dilemma")]
        prefix: String,

        /// Move counted as cooperation (defaults to naming.move1)
        #[arg(long)]
        cooperative_move: Option<char>,

        /// Write the pivot table as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Kept share of proposers and accept rate of responders
    Division {
        log_root: PathBuf,

        /// Write the pivot tables as CSV; responders go to `<stem>_responder.csv`
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
