use clap::{Args, Subcommand};

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show every record (Display View)
    View(ViewArgs),
    /// Patch one record's name and value (Update Form)
    Update(UpdateArgs),
    /// Check backend configuration and reachability
    Status(StatusArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ViewArgs {
    /// Keep running and re-render on every change until Ctrl-C
    #[arg(short, long)]
    pub watch: bool,
}

#[derive(Debug, Clone, Args)]
pub struct UpdateArgs {
    /// Record identifier
    #[arg(long)]
    pub id: String,

    /// New name (defaults to the record's current name)
    #[arg(long)]
    pub name: Option<String>,

    /// New value (defaults to the record's current value)
    #[arg(long, allow_hyphen_values = true)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct StatusArgs {
    /// Poll /version once per second for up to SECS until the backend answers
    #[arg(long, value_name = "SECS")]
    pub wait: Option<u64>,
}
