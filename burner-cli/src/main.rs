mod tui;

use clap::{Parser, Subcommand};
use usethrow::Chain;

#[derive(Parser)]
#[command(name = "usethrow-cli")]
#[command(about = "Terminal UI for short-lived burner wallets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the Terminal User Interface
    Tui {
        /// Starting network (mainnet, sepolia, holesky); defaults to config
        #[arg(long)]
        chain: Option<Chain>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Tui { chain } => tui::run_tui(chain).await,
    }
}
