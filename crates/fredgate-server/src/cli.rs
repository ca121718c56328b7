use clap::{Args, Parser, Subcommand};

/// fredgate: quota-gated gateway to FRED economic time series.
#[derive(Debug, Parser)]
#[command(name = "fredgate", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP server.
    Serve,
    /// Provision and inspect API keys (out-of-band of the request path).
    Keys(KeysArgs),
}

#[derive(Debug, Args)]
pub struct KeysArgs {
    #[command(subcommand)]
    pub command: KeysCommand,
}

#[derive(Debug, Subcommand)]
pub enum KeysCommand {
    /// Create a new API key record with a request limit.
    Add {
        /// The opaque key value a developer will present.
        key: String,
        /// Maximum number of successful charges for this key.
        #[arg(long)]
        limit: u32,
    },
    /// List provisioned keys with their quota state.
    List,
}
