//! Auction Agent CLI
//!
//! Command-line interface for agent-driven NFT auctions. Every action runs
//! through the same tools an agent runtime would call, so the printed
//! reports are exactly what a model would see.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use auction_agent_core::config::LoggingSettings;
use auction_agent_core::{AgentConfig, JsonRpcWallet};
use auction_agent_toolkit::{
    Toolkit, BID_ERROR_PREFIX, DEPLOY_ERROR_PREFIX, FINALIZE_ERROR_PREFIX, MINT_ERROR_PREFIX,
    START_AUCTION_ERROR_PREFIX,
};
use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::{json, Value};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Auction Agent CLI
#[derive(Parser, Debug)]
#[command(
    name = "auction-agent",
    version = env!("CARGO_PKG_VERSION"),
    about = "Start, bid on and finalize on-chain NFT auctions",
    long_about = "Drive an on-chain NFT auction contract through a JSON-RPC wallet: \
                 start auctions, place bids, finalize them, and mint tokens. \
                 The same tools can be exported for an agent runtime."
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path [default: user config directory]
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// JSON-RPC endpoint, overriding the configuration file
    #[arg(long, global = true, env = "AUCTION_AGENT_RPC_URL")]
    rpc_url: Option<String>,

    /// Sending account, overriding the configuration file
    #[arg(long, global = true, env = "AUCTION_AGENT_FROM")]
    from: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

/// Main CLI commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Auction operations
    #[command(subcommand, alias = "a")]
    Auction(AuctionCommands),

    /// NFT operations
    #[command(subcommand)]
    Nft(NftCommands),

    /// Agent tool definitions and direct calls
    #[command(subcommand, alias = "t")]
    Tools(ToolCommands),

    /// Configuration management
    #[command(subcommand, alias = "cfg")]
    Config(ConfigCommands),

    /// Show current version
    Version,
}

/// Auction subcommands
#[derive(Subcommand, Debug)]
enum AuctionCommands {
    /// Start an auction for a token
    Start {
        /// NFT contract address
        #[arg(long)]
        nft_contract: String,

        /// Token ID to auction
        #[arg(long)]
        token_id: u64,

        /// Starting price in ETH
        #[arg(long)]
        starting_price: f64,

        /// Auction duration in seconds
        #[arg(long, default_value_t = 86_400)]
        duration: u64,
    },

    /// Bid on a token
    Bid {
        /// Token ID to bid on
        #[arg(long)]
        token_id: u64,

        /// Bid amount in ETH
        #[arg(long)]
        amount: f64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Finalize an auction
    Finalize {
        /// Token ID of the auction
        #[arg(long)]
        token_id: u64,
    },
}

/// NFT subcommands
#[derive(Subcommand, Debug)]
enum NftCommands {
    /// Deploy an ERC-721 collection from the configured bytecode
    Deploy {
        /// Collection name
        #[arg(long)]
        name: String,

        /// Collection symbol
        #[arg(long)]
        symbol: String,

        /// Base URI for token metadata
        #[arg(long, default_value = "")]
        base_uri: String,
    },

    /// Mint one token from an ERC-721 contract
    Mint {
        /// ERC-721 contract address
        #[arg(long)]
        contract: String,

        /// Receiving address
        #[arg(long)]
        to: String,
    },
}

/// Tool subcommands
#[derive(Subcommand, Debug)]
enum ToolCommands {
    /// List tool definitions
    List {
        /// Print function-calling specs as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Call a tool with JSON arguments
    Call {
        /// Tool name
        name: String,

        /// Arguments object, e.g. '{"token_id": 1}'
        args: String,
    },
}

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Write a default configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Show the effective configuration
    Show {
        /// Show as JSON instead of YAML
        #[arg(short, long)]
        json: bool,
    },
}

/// Initialize logging based on verbosity and configured level
fn init_logging(verbose: bool, configured: Level) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { configured };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;
    Ok(())
}

fn config_path(cli: &Cli) -> PathBuf {
    match &cli.config {
        Some(path) => PathBuf::from(shellexpand::tilde(path).into_owned()),
        None => AgentConfig::default_path(),
    }
}

/// Load the configuration file, falling back to defaults, then apply flags
fn load_config(cli: &Cli, path: &Path) -> Result<AgentConfig> {
    let mut config = if path.exists() {
        AgentConfig::from_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?
    } else {
        AgentConfig::default()
    };

    if let Some(rpc_url) = &cli.rpc_url {
        config.network.rpc_url = rpc_url.clone();
    }
    if let Some(from) = &cli.from {
        config.network.from_address = Some(from.clone());
    }

    config.validate()?;
    Ok(config)
}

fn build_toolkit(config: &AgentConfig) -> Result<Toolkit> {
    let wallet = Arc::new(JsonRpcWallet::new(&config.network)?);
    Ok(Toolkit::new(wallet, config)?)
}

/// Call a tool while a spinner runs, print its report, and map error
/// reports to a failing exit code
async fn run_tool(toolkit: &Toolkit, name: &str, args: Value) -> Result<ExitCode> {
    debug!(tool = name, %args, "calling tool");

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(format!("Running {}...", name));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let output = toolkit.call(name, args).await;
    spinner.finish_and_clear();

    let output = output?;
    let failed = [
        START_AUCTION_ERROR_PREFIX,
        BID_ERROR_PREFIX,
        FINALIZE_ERROR_PREFIX,
        DEPLOY_ERROR_PREFIX,
        MINT_ERROR_PREFIX,
    ]
    .iter()
    .any(|prefix| output.starts_with(prefix));
    if failed {
        eprintln!("{}", output);
        return Ok(ExitCode::FAILURE);
    }
    println!("{}", output);
    Ok(ExitCode::SUCCESS)
}

/// Main entry point
#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let path = config_path(&cli);

    // Init must work even when the existing file no longer loads
    if let Commands::Config(ConfigCommands::Init { force }) = &cli.command {
        init_logging(cli.verbose, LoggingSettings::default().level.to_tracing_level())?;
        return init_config(&path, *force);
    }

    let config = load_config(&cli, &path)?;
    init_logging(cli.verbose, config.logging.level.to_tracing_level())?;

    debug!("Auction Agent CLI v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Auction(cmd) => handle_auction_command(cmd, &config).await,
        Commands::Nft(cmd) => handle_nft_command(cmd, &config).await,
        Commands::Tools(cmd) => handle_tool_command(cmd, &config).await,
        Commands::Config(cmd) => handle_config_command(cmd, &config, &path),
        Commands::Version => {
            println!("Auction Agent CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Core library: {}", auction_agent_core::VERSION);
            println!("Toolkit library: {}", auction_agent_toolkit::VERSION);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Handle auction commands
async fn handle_auction_command(cmd: AuctionCommands, config: &AgentConfig) -> Result<ExitCode> {
    let toolkit = build_toolkit(config)?;
    match cmd {
        AuctionCommands::Start {
            nft_contract,
            token_id,
            starting_price,
            duration,
        } => {
            info!(token_id, "starting auction");
            let args = json!({
                "nft_contract_address": nft_contract,
                "token_id": token_id,
                "starting_price": starting_price,
                "duration": duration,
            });
            run_tool(&toolkit, "start_nft_auction", args).await
        }
        AuctionCommands::Bid {
            token_id,
            amount,
            yes,
        } => {
            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!(
                        "Send {} ETH to bid on token ID {}?",
                        amount, token_id
                    ))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    info!("bid cancelled");
                    return Ok(ExitCode::SUCCESS);
                }
            }
            let args = json!({"token_id": token_id, "bid_amount": amount});
            run_tool(&toolkit, "bid_on_nft", args).await
        }
        AuctionCommands::Finalize { token_id } => {
            run_tool(&toolkit, "finalize_nft_auction", json!({"token_id": token_id})).await
        }
    }
}

/// Handle NFT commands
async fn handle_nft_command(cmd: NftCommands, config: &AgentConfig) -> Result<ExitCode> {
    let toolkit = build_toolkit(config)?;
    match cmd {
        NftCommands::Deploy {
            name,
            symbol,
            base_uri,
        } => {
            info!(%name, %symbol, "deploying collection");
            let args = json!({"name": name, "symbol": symbol, "base_uri": base_uri});
            run_tool(&toolkit, "deploy_nft", args).await
        }
        NftCommands::Mint { contract, to } => {
            let args = json!({"contract_address": contract, "destination": to});
            run_tool(&toolkit, "mint_nft", args).await
        }
    }
}

/// Handle tool commands
async fn handle_tool_command(cmd: ToolCommands, config: &AgentConfig) -> Result<ExitCode> {
    let toolkit = build_toolkit(config)?;
    match cmd {
        ToolCommands::List { json } => {
            if json {
                let specs = Value::Array(toolkit.function_specs());
                println!("{}", serde_json::to_string_pretty(&specs)?);
            } else {
                for definition in toolkit.definitions() {
                    let summary = definition.description.lines().next().unwrap_or_default();
                    println!("{:<22} {}", definition.name, summary);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        ToolCommands::Call { name, args } => {
            let args: Value = serde_json::from_str(&args).context("arguments must be JSON")?;
            run_tool(&toolkit, &name, args).await
        }
    }
}

/// Write the default configuration, refusing to overwrite without `force`
fn init_config(path: &Path, force: bool) -> Result<ExitCode> {
    if path.exists() && !force {
        bail!(
            "configuration already exists at {} (use --force to overwrite)",
            path.display()
        );
    }
    AgentConfig::default().save_to_file(path)?;
    println!("Configuration written to {}", path.display());
    Ok(ExitCode::SUCCESS)
}

/// Handle configuration commands
fn handle_config_command(
    cmd: ConfigCommands,
    config: &AgentConfig,
    path: &Path,
) -> Result<ExitCode> {
    match cmd {
        ConfigCommands::Init { force } => return init_config(path, force),
        ConfigCommands::Show { json } => {
            if json {
                println!("{}", config.to_json()?);
            } else {
                print!("{}", config.to_yaml()?);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
