//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// GreenChoice CLI.
#[derive(Parser)]
#[command(name = "greenchoice")]
#[command(about = "Find more sustainable versions of a product across shopping sites")]
#[command(version)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search every configured site for the product and rank the results
    Compare {
        /// Product title
        #[arg(long)]
        title: String,

        /// Breadcrumb trail, e.g. "Women > Ethnic Wear > Kurtis"
        #[arg(long, default_value = "")]
        breadcrumb: String,

        /// Product description
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Show the local classification and search queries (no network)
    Query {
        /// Product title
        #[arg(long)]
        title: String,

        /// Breadcrumb trail
        #[arg(long, default_value = "")]
        breadcrumb: String,
    },

    /// Open a product page and report the best choice shown on it
    Best {
        /// Product page URL
        #[arg(long)]
        url: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
