use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan for missing translation keys and sync them to catalog files
    Sync {
        /// Process all missing keys without per-key selection
        #[arg(long)]
        auto: bool,

        /// Enable automatic translation of missing keys
        #[arg(long)]
        translate: bool,

        /// Translation provider to use (dummy, libretranslate, mymemory)
        #[arg(long)]
        service: Option<String>,

        /// Source language code override
        #[arg(long)]
        source: Option<String>,

        /// Comma-separated target language codes
        #[arg(long)]
        targets: Option<String>,

        /// Show what would be done without making changes
        #[arg(long)]
        dry_run: bool,

        /// Show translation coverage statistics and exit
        #[arg(long)]
        stats: bool,

        /// Catalog format override (flat, scoped)
        #[arg(long)]
        format: Option<String>,
    },

    /// Create empty catalog files for a list of locales
    Init {
        /// Comma-separated locale codes to initialize
        #[arg(long)]
        locales: Option<String>,

        /// Overwrite existing catalog files
        #[arg(long)]
        force: bool,
    },
}
