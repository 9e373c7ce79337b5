mod app;
mod balance;
mod config;
mod error;
mod exchanges;
mod math;
mod report;
mod retry;
mod session;
mod wallet;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::error::SwapError;

#[derive(Parser, Debug)]
#[command(version, about = "Single-pool Raydium V4 swap CLI for Solana")]
struct Args {
    /// Path to the config file
    #[arg(long, default_value = "Config.toml")]
    config: String,

    /// RPC endpoint URL (overrides config)
    #[arg(long)]
    rpc_url: Option<String>,

    /// Path to keypair file (overrides config)
    #[arg(long)]
    keypair: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute a swap against the configured pool
    Swap {
        /// Trade size in whole units of the input asset
        amount: f64,
        /// Direction: 0 = sell the target token, 1 = buy it with SOL
        direction: u8,
        /// Target token mint, must match the configured target
        mint: String,
        /// Slippage tolerance as a fraction
        #[arg(default_value_t = math::DEFAULT_SLIPPAGE)]
        slippage: f64,
    },
    /// Print the current pool price as JSON
    Price,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    if let Err(err) = run(args).await {
        eprintln!("Swap failed: {err:#}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let mut cfg = config::Config::from_file(&args.config)?;

    // CLI args take priority over the config file.
    if let Some(rpc_url) = args.rpc_url {
        cfg.rpc.url = rpc_url;
    }
    if let Some(keypair) = args.keypair {
        cfg.wallet.keypair = keypair;
    }

    match args.command {
        Command::Swap {
            amount,
            direction,
            mint,
            slippage,
        } => {
            let is_buy = match direction {
                0 => false,
                1 => true,
                other => {
                    return Err(SwapError::Config(format!(
                        "direction must be 0 (sell) or 1 (buy), got {}",
                        other
                    ))
                    .into())
                }
            };
            let outcome = app::run_swap(&cfg, amount, is_buy, &mint, slippage).await?;
            println!("{}", outcome.transaction_id);
            println!("{}", outcome.to_json()?);
        }
        Command::Price => {
            let report = app::run_price(&cfg).await?;
            println!("{}", report.to_json()?);
        }
    }

    Ok(())
}
