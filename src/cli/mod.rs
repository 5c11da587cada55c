pub mod commands;
pub mod context;
pub mod output;
pub mod table_printer;

use clap::{Args, Parser, Subcommand};

/// See who did what, when, across your services.
#[derive(Parser, Debug)]
#[command(name = "oversee-view", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode: only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to alternative config file
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the audit log as a paginated table
    Logs(LogsArgs),

    /// List the columns the audit table can show
    Columns,
}

#[derive(Args, Debug)]
pub struct LogsArgs {
    /// Query service endpoint
    #[arg(long, env = "OVERSEE_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Answer queries from a JSON response file instead of the network
    #[arg(long)]
    pub fixture: Option<String>,

    /// Rows per page
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Page to show (1-based)
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Comma-separated column keys, in display order
    #[arg(long, value_delimiter = ',')]
    pub columns: Option<Vec<String>>,

    /// Only entries from this service
    #[arg(long)]
    pub service: Option<String>,

    /// Only entries with this operation
    #[arg(long)]
    pub operation: Option<String>,

    /// Only entries performed by this actor
    #[arg(long)]
    pub actor_id: Option<String>,

    /// Only entries performed by this kind of actor (user, service, ...)
    #[arg(long)]
    pub actor_type: Option<String>,

    /// Show timestamps as UTC dates
    #[arg(long)]
    pub human_timestamps: bool,

    /// Page through the table interactively (n, p, r, q)
    #[arg(short, long)]
    pub interactive: bool,
}
