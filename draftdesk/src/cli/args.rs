//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Draftdesk - draft, compare and copy AI replies to citizen requests
#[derive(Parser, Debug)]
#[command(name = "draftdesk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the assistant API
    #[arg(long, env = "DRAFTDESK_BACKEND_URL", global = true)]
    pub backend_url: Option<String>,

    /// Bearer token from the web client login
    #[arg(long, env = "DRAFTDESK_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Config file (default: ~/.draftdesk/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Neither restore nor save the local session cache
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Do not write finalized drafts to the system clipboard
    #[arg(long, global = true)]
    pub no_clipboard: bool,

    /// Print session state as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate another AI draft for the current request
    Generate {
        /// The incoming citizen request ("-" reads stdin)
        #[arg(short, long)]
        request: String,

        /// Your own reply draft for the model to polish ("-" reads stdin)
        #[arg(short, long)]
        draft: String,

        /// Model to generate with (see `draftdesk models`)
        #[arg(short, long)]
        model: Option<String>,

        /// Citizen name used in the salutation
        #[arg(long)]
        citizen_name: Option<String>,

        /// Sampling temperature
        #[arg(long)]
        temperature: Option<f64>,

        /// Nucleus sampling threshold
        #[arg(long)]
        top_p: Option<f64>,

        /// Repetition penalty
        #[arg(long)]
        repetition_penalty: Option<f64>,
    },

    /// Show the drafts of the current request
    Status,

    /// Select a draft and copy it, closing the request
    Copy {
        /// Position (1 = main draft) or draft id prefix; defaults to the main draft
        selector: Option<String>,
    },

    /// Discard the current drafts and start a new request
    New,

    /// List models offered by the backend
    Models,
}
