//! Contract action adapter for the NFT auction contract
//!
//! Each action turns a validated request into a `createAuction`, `bid` or
//! `finalizeAuction` invocation against the configured auction contract,
//! submits it and waits for settlement. The adapter keeps no state between
//! calls: auction lifecycle rules (open, bid, finalized) are enforced by the
//! contract alone, so finalizing twice submits twice.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use auction_agent_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let config = AgentConfig::default();
//!     let wallet = Arc::new(JsonRpcWallet::new(&config.network)?);
//!     let auctions = AuctionActions::new(wallet, &config.auction)?;
//!
//!     let request = StartAuctionParams {
//!         nft_contract_address: "0x036CbD53842c5426634e7929541eC2318f3dCF7e".to_string(),
//!         token_id: 1,
//!         starting_price: 0.1,
//!         duration: 86_400,
//!     }
//!     .validate()?;
//!
//!     let settled = auctions.start_auction(&request).await?;
//!     println!("Auction created: {}", settled.transaction_link);
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use alloy_primitives::Address;
use tracing::{info, instrument};

use crate::abi::auction_abi;
use crate::config::AuctionSettings;
use crate::dispatch::Dispatcher;
use crate::error::{Error, Result};
use crate::types::{
    parse_address, AuctionRequest, BidRequest, ContractInvocation, ContractMethod,
    FinalizeRequest, SettledInvocation,
};
use crate::units::wei_to_eth_string;
use crate::wallet::WalletCapability;

/// Auction actions bound to one auction contract
#[derive(Clone)]
pub struct AuctionActions {
    dispatcher: Dispatcher,
    contract: Address,
}

impl AuctionActions {
    /// Create the adapter for the configured auction contract
    pub fn new(wallet: Arc<dyn WalletCapability>, settings: &AuctionSettings) -> Result<Self> {
        Self::with_dispatcher(Dispatcher::new(wallet), settings)
    }

    /// Create the adapter over an existing dispatcher
    pub fn with_dispatcher(dispatcher: Dispatcher, settings: &AuctionSettings) -> Result<Self> {
        let contract = parse_address(&settings.contract_address)
            .map_err(|e| Error::config(format!("auction.contract_address: {}", e)))?;
        Ok(Self {
            dispatcher,
            contract,
        })
    }

    /// Address of the auction contract
    pub fn contract_address(&self) -> Address {
        self.contract
    }

    /// Put a token up for auction
    #[instrument(skip_all, fields(token_id = request.token_id))]
    pub async fn start_auction(&self, request: &AuctionRequest) -> Result<SettledInvocation> {
        info!(
            nft_contract = %request.nft_contract,
            starting_price_eth = %wei_to_eth_string(request.starting_price_wei),
            duration_seconds = request.duration_seconds,
            "creating auction"
        );

        let invocation = self
            .invocation(ContractMethod::CreateAuction)?
            .with_argument("nftContract", request.nft_contract)
            .with_argument("tokenId", request.token_id)
            .with_argument("startingPrice", request.starting_price_wei)
            .with_argument("duration", request.duration_seconds);

        self.dispatcher.submit(invocation).await
    }

    /// Bid on an open auction, transferring the bid value
    #[instrument(skip_all, fields(token_id = request.token_id))]
    pub async fn bid(&self, request: &BidRequest) -> Result<SettledInvocation> {
        info!(
            bid_eth = %wei_to_eth_string(request.bid_value_wei),
            "placing bid"
        );

        let invocation = self
            .invocation(ContractMethod::Bid)?
            .with_argument("tokenId", request.token_id)
            .with_value(request.bid_value_wei);

        self.dispatcher.submit(invocation).await
    }

    /// Close an auction and hand the token to the highest bidder
    #[instrument(skip_all, fields(token_id = request.token_id))]
    pub async fn finalize_auction(&self, request: &FinalizeRequest) -> Result<SettledInvocation> {
        info!("finalizing auction");

        let invocation = self
            .invocation(ContractMethod::FinalizeAuction)?
            .with_argument("tokenId", request.token_id);

        self.dispatcher.submit(invocation).await
    }

    fn invocation(&self, method: ContractMethod) -> Result<ContractInvocation> {
        Ok(ContractInvocation::new(self.contract, method, auction_abi()?))
    }
}
