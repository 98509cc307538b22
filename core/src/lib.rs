//! Auction Agent Core Library
//!
//! This library lets an autonomous agent drive an on-chain NFT auction:
//! start an auction for a token, bid on it, and finalize it, plus deploy an
//! ERC-721 collection and mint tokens from one. Signing and submission are delegated to a
//! [`WalletCapability`]; this crate validates inputs, converts ETH amounts to
//! wei, marshals arguments against a static ABI, submits, and waits.
//!
//! # Features
//!
//! - **Typed Requests**: Agent parameters validate into typed requests before
//!   anything is submitted
//! - **Exact Unit Conversion**: ETH to wei without binary rounding noise
//! - **Static ABI**: Auction and ERC-721 ABIs, encoded with `alloy-dyn-abi`
//! - **Pluggable Wallets**: Any capability implementing [`WalletCapability`];
//!   a JSON-RPC implementation is included
//! - **Metrics** (feature `metrics`): Prometheus counters per method and outcome
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use auction_agent_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let config = AgentConfig::builder()
//!         .with_rpc_url("http://127.0.0.1:8545")
//!         .build();
//!
//!     let wallet = Arc::new(JsonRpcWallet::new(&config.network)?);
//!     let auctions = AuctionActions::new(wallet, &config.auction)?;
//!
//!     let bid = BidParams { token_id: 1, bid_amount: 0.5 }.validate()?;
//!     let settled = auctions.bid(&bid).await?;
//!     println!("Bid placed: {}", settled.transaction_hash);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

pub mod abi;
pub mod auction;
pub mod config;
pub mod dispatch;
pub mod error;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod nft;
pub mod rpc;
pub mod types;
pub mod units;
pub mod wallet;

// Re-exports for convenience
pub use auction::AuctionActions;
pub use config::{AgentConfig, NftSettings};
pub use dispatch::Dispatcher;
pub use error::{Error, Result};
pub use nft::NftActions;
pub use rpc::JsonRpcWallet;
pub use types::{
    AbiValue, AuctionRequest, BidParams, BidRequest, ContractDeployment, ContractInvocation,
    ContractMethod, DeployNftParams, DeployRequest, FinalizeAuctionParams, FinalizeRequest,
    MintNftParams, MintRequest, SettledInvocation, StartAuctionParams,
};
pub use units::{eth_to_wei, wei_to_eth_string};
pub use wallet::{PendingInvocation, WalletCapability};

#[cfg(feature = "metrics")]
pub use metrics::InvocationMetrics;

/// Prelude module for easy importing of common types
pub mod prelude {
    pub use super::{
        AgentConfig, AuctionActions, AuctionRequest, BidParams, BidRequest, ContractDeployment,
        ContractInvocation, ContractMethod, DeployNftParams, DeployRequest, Error,
        FinalizeAuctionParams, FinalizeRequest, JsonRpcWallet, MintNftParams, MintRequest,
        NftActions, PendingInvocation, Result, SettledInvocation, StartAuctionParams,
        WalletCapability,
    };

    pub use alloy_primitives::{Address, U256};
}

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Library name
pub const NAME: &str = "auction-agent-core";
