use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "gas-fee-tracker", version, about = "Lowest gas fee finder for a contract's recent transactions")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch recent transactions and report the lowest gas fee
    Analyze {
        /// Contract address, overrides CONTRACT_ADDRESS
        #[arg(long)]
        address: Option<String>,
        /// Override MAX_TRANSACTIONS_TO_SCAN
        #[arg(long)]
        max_transactions: Option<u32>,
        /// Print the full result, chart series included, as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Run the HTTP API server
    Serve {
        /// Override bind address, e.g. 0.0.0.0:8080
        #[arg(long)]
        addr: Option<String>,
    },
}
