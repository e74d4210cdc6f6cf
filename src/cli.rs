use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sindplast-registry")]
#[command(version, about = "Migrate SINDPLAST company and member exports into the registry database")]
pub struct Cli {
    /// Config file (default: config.toml in the user config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database path (overrides the config file)
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// Schema name the tables live under (overrides the config file)
    #[arg(short, long, global = true)]
    pub schema: Option<String>,

    /// Show migration progress in a full-screen terminal view
    #[arg(long, global = true)]
    pub tui: bool,

    /// Debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Migrate the company export (all-or-nothing)
    MigrateCompanies {
        /// Company export (overrides the config file)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Migrate the member export (each member committed on its own)
    MigrateMembers {
        /// Member export (overrides the config file)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Company export used to resolve member companies
        #[arg(long)]
        companies: Option<PathBuf>,
    },

    /// Migrate companies, then members
    Migrate {
        /// Company export (overrides the config file)
        #[arg(long)]
        companies: Option<PathBuf>,

        /// Member export (overrides the config file)
        #[arg(long)]
        members: Option<PathBuf>,
    },

    /// Create the registry tables if they do not exist
    InitDb,

    /// List the registry tables
    ListTables,

    /// Inspect or delete stored companies
    Companies {
        #[command(subcommand)]
        action: RecordAction,
    },

    /// Inspect or delete stored members
    Members {
        #[command(subcommand)]
        action: RecordAction,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum RecordAction {
    /// Print every record as JSON
    List,

    /// Print one record as JSON
    Show { id: i64 },

    /// Delete one record
    Delete { id: i64 },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
