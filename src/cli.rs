use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::tidy::{FileFormat, FolderFormat};

#[derive(Parser)]
#[command(name = "tidylibrary")]
#[command(about = "Tidy an audiobook library into a consistent folder and file naming scheme")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase output verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a library and show the changes needed to tidy it
    Scan {
        /// Library root (uses config default if not specified)
        path: Option<PathBuf>,

        /// Folder layout (uses config default if not specified)
        #[arg(long, value_enum)]
        folder_format: Option<FolderFormat>,

        /// Audio file naming (uses config default if not specified)
        #[arg(long, value_enum)]
        file_format: Option<FileFormat>,

        /// Print the full scan result as JSON
        #[arg(long)]
        json: bool,

        /// Save the plans to a file for a later `apply --plan`
        #[arg(long)]
        save: Option<PathBuf>,

        /// Show the resulting tree instead of the numbered change list
        #[arg(long)]
        tree: bool,
    },

    /// Apply planned changes to a library
    Apply {
        /// Library root to scan when no plan file is given (uses config default if not specified)
        path: Option<PathBuf>,

        /// Plan file written by `scan --save`
        #[arg(long)]
        plan: Option<PathBuf>,

        /// Only apply these plan numbers, as shown by `scan`
        #[arg(long, value_delimiter = ',')]
        only: Option<Vec<usize>>,

        /// Folder layout when scanning (uses config default if not specified)
        #[arg(long, value_enum)]
        folder_format: Option<FolderFormat>,

        /// Audio file naming when scanning (uses config default if not specified)
        #[arg(long, value_enum)]
        file_format: Option<FileFormat>,

        /// Actually move files (default: dry-run)
        #[arg(long)]
        no_dry_run: bool,
    },

    /// Check whether a path looks like a library
    Check {
        /// Directory to check
        path: PathBuf,
    },

    /// List available folder and file formats
    Formats,

    /// Create a config file with the default naming scheme
    Init {
        /// Library root to store as the default
        #[arg(long)]
        library: Option<PathBuf>,

        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}
