//! Command-Line Interface
//!
//! Clap definitions for the operator surface. Parsing only; the handlers
//! live in `commands`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use ledgerlens_core::DuplicateResolution;

#[derive(Debug, Parser)]
#[command(
    name = "ledgerlens",
    version,
    about = "Operator client for the Ledgerlens invoice verification service"
)]
pub struct Cli {
    /// Print machine-readable JSON instead of formatted text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in to the verification service
    Login {
        #[arg(long)]
        email: String,
        /// Password (falls back to $LEDGERLENS_PASSWORD)
        #[arg(long, env = "LEDGERLENS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an operator account
    Register {
        #[arg(long)]
        email: String,
        /// Password (falls back to $LEDGERLENS_PASSWORD)
        #[arg(long, env = "LEDGERLENS_PASSWORD", hide_env_values = true)]
        password: String,
        /// Display name for the account
        #[arg(long)]
        name: String,
    },
    /// End the current session
    Logout,
    /// Show the signed-in operator
    Whoami,
    /// Submit an invoice document (PDF, PNG, or JPEG) for verification
    Upload {
        /// Path to the document
        path: PathBuf,
        /// Analyze immediately after a successful upload
        #[arg(long, conflicts_with = "no_analyze")]
        analyze: bool,
        /// Skip analysis after upload, even if configured otherwise
        #[arg(long)]
        no_analyze: bool,
        /// What to do when the service reports a duplicate
        #[arg(long, value_enum, default_value = "cancel")]
        on_duplicate: DuplicateChoice,
        /// Ask the service to re-verify content it has seen before
        #[arg(long)]
        force_recheck: bool,
    },
    /// Run analysis for a stored invoice and show the trust report
    Analyze {
        /// Server-assigned invoice identifier
        invoice_id: i64,
    },
    /// List previously uploaded invoices
    Invoices,
    /// Inspect or change the client configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the current configuration
    Show,
    /// Update configuration values
    Set {
        /// Base URL of the verification service API
        #[arg(long)]
        api_base_url: Option<String>,
        /// Request timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Jump straight into analysis after a successful upload
        #[arg(long)]
        auto_analyze: Option<bool>,
    },
}

/// Duplicate handling choices as exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DuplicateChoice {
    /// Inspect the previously processed invoice
    ViewPrevious,
    /// Resubmit the same file with a forced recheck
    Recheck,
    /// Discard the pending upload
    Cancel,
}

impl From<DuplicateChoice> for DuplicateResolution {
    fn from(choice: DuplicateChoice) -> Self {
        match choice {
            DuplicateChoice::ViewPrevious => Self::ViewPrevious,
            DuplicateChoice::Recheck => Self::Recheck,
            DuplicateChoice::Cancel => Self::Cancel,
        }
    }
}
