use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "psdwatcher",
    author,
    version,
    about = "You can watch the change log of psd file using git.",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Add PSD file at watch list.
    Add {
        /// The PSD file name.
        psd_file: PathBuf,
    },

    /// Start watching.
    Run {
        /// Write out log to other file.
        #[arg(short = 'o', value_name = "LOG_FILE")]
        log_file: Option<PathBuf>,

        /// Don't output log to the console.
        #[arg(long = "no-output-log")]
        no_output_log: bool,

        /// Write out development log.
        #[arg(long)]
        dev: bool,
    },

    /// Show the files that was contained watch-list.
    List,
}
