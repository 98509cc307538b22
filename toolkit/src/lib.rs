//! Auction Agent Toolkit
//!
//! Agent-callable tools over the auction and NFT actions of
//! `auction-agent-core`. A tool never raises: successes are rendered as a
//! short report with the transaction hash and explorer link, failures as a
//! fixed per-tool prefix followed by the error message.
//!
//! # Tools
//!
//! - `start_nft_auction`: Start an auction for a token at a starting price
//! - `bid_on_nft`: Bid on a token, paying the bid amount in ETH
//! - `finalize_nft_auction`: Close an auction and hand the token to the winner
//! - `deploy_nft`: Deploy an ERC-721 collection (needs `nft.collection_bytecode`)
//! - `mint_nft`: Mint one token from an ERC-721 contract
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use auction_agent_core::{AgentConfig, JsonRpcWallet};
//! use auction_agent_toolkit::prelude::*;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let config = AgentConfig::default();
//!     let wallet = Arc::new(JsonRpcWallet::new(&config.network)?);
//!     let toolkit = Toolkit::new(wallet, &config)?;
//!
//!     // Hand these to the model
//!     let _specs = toolkit.function_specs();
//!
//!     let reply = toolkit
//!         .call("bid_on_nft", json!({"token_id": 1, "bid_amount": 0.5}))
//!         .await?;
//!     println!("{}", reply);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

pub mod error;
pub mod tool;
pub mod toolkit;
pub mod tools;

// Re-exports for convenience
pub use error::{Result, ToolkitError};
pub use tool::{parse_args, Tool, ToolDefinition};
pub use toolkit::Toolkit;
pub use tools::{
    BidOnNftTool, DeployNftTool, FinalizeNftAuctionTool, MintNftTool, StartNftAuctionTool,
    BID_ERROR_PREFIX, DEPLOY_ERROR_PREFIX, FINALIZE_ERROR_PREFIX, MINT_ERROR_PREFIX,
    START_AUCTION_ERROR_PREFIX,
};

/// Prelude module for easy importing of common types
pub mod prelude {
    pub use super::{
        BidOnNftTool, DeployNftTool, FinalizeNftAuctionTool, MintNftTool, Result,
        StartNftAuctionTool, Tool, ToolDefinition, Toolkit, ToolkitError,
    };
}

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Library name
pub const NAME: &str = "auction-agent-toolkit";
