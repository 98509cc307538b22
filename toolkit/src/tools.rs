//! Auction and NFT tools
//!
//! Each tool parses its JSON arguments, validates them into a typed request,
//! runs the matching action and renders the outcome for the agent. Any
//! failure along the way, including malformed arguments, is rendered as the
//! tool's fixed error prefix followed by the error message.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use auction_agent_core::{
    AuctionActions, BidParams, DeployNftParams, Error, FinalizeAuctionParams, MintNftParams,
    NftActions, Result, SettledInvocation, StartAuctionParams,
};

use crate::tool::{parse_args, Tool, ToolDefinition};

/// Prefix of every `start_nft_auction` failure
pub const START_AUCTION_ERROR_PREFIX: &str = "Error creating auction: ";
/// Prefix of every `bid_on_nft` failure
pub const BID_ERROR_PREFIX: &str = "Error placing bid: ";
/// Prefix of every `finalize_nft_auction` failure
pub const FINALIZE_ERROR_PREFIX: &str = "Error finalizing auction: ";
/// Prefix of every `deploy_nft` failure
pub const DEPLOY_ERROR_PREFIX: &str = "Error deploying NFT: ";
/// Prefix of every `mint_nft` failure
pub const MINT_ERROR_PREFIX: &str = "Error minting NFT: ";

const START_NFT_AUCTION_PROMPT: &str = "\
This tool starts an NFT auction using an existing NFT smart contract.
It takes the contract address of the NFT, the token ID of the NFT, the starting price, and the duration of the auction as inputs.
The auction will run on-chain, and the highest bidder will win the NFT.";

fn render(result: Result<String>, error_prefix: &str) -> String {
    match result {
        Ok(text) => text,
        Err(err) => {
            debug!(error = %err, "tool call failed");
            format!("{}{}", error_prefix, err)
        }
    }
}

/// ETH amount as shown to the agent; whole amounts keep one decimal
fn format_eth(amount: f64) -> String {
    if amount.is_finite() && amount.fract() == 0.0 {
        format!("{:.1} ETH", amount)
    } else {
        format!("{} ETH", amount)
    }
}

fn transaction_lines(settled: &SettledInvocation) -> String {
    format!(
        "Transaction hash: {}\nTransaction link: {}",
        settled.transaction_hash, settled.transaction_link
    )
}

/// Starts an auction on the configured auction contract
pub struct StartNftAuctionTool {
    auctions: AuctionActions,
}

impl StartNftAuctionTool {
    /// Create the tool
    pub fn new(auctions: AuctionActions) -> Self {
        Self { auctions }
    }

    async fn run(&self, args: Value) -> Result<String> {
        let params: StartAuctionParams = parse_args(args)?;
        let request = params.validate()?;
        let settled = self.auctions.start_auction(&request).await?;

        Ok(format!(
            "Auction created successfully for token ID {}.\n\
             NFT Contract: {}\n\
             Starting price: {}\n\
             Duration: {} seconds\n\
             {}",
            params.token_id,
            params.nft_contract_address,
            format_eth(params.starting_price),
            params.duration,
            transaction_lines(&settled)
        ))
    }
}

#[async_trait]
impl Tool for StartNftAuctionTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "start_nft_auction".to_string(),
            description: START_NFT_AUCTION_PROMPT.to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "nft_contract_address": {
                        "type": "string",
                        "description": "The contract address of the NFT, e.g., `0x123abc...`",
                        "examples": ["0x036CbD53842c5426634e7929541eC2318f3dCF7e"]
                    },
                    "token_id": {
                        "type": "integer",
                        "minimum": 0,
                        "description": "The ID of the NFT token to auction, e.g., `1`",
                        "examples": [1]
                    },
                    "starting_price": {
                        "type": "number",
                        "minimum": 0,
                        "description": "The starting price of the auction in ETH, e.g., `0.1`",
                        "examples": [0.1]
                    },
                    "duration": {
                        "type": "integer",
                        "minimum": 1,
                        "description": "The duration of the auction in seconds, e.g., `86400` for 1 day",
                        "examples": [86400]
                    }
                },
                "required": ["nft_contract_address", "token_id", "starting_price", "duration"]
            }),
        }
    }

    async fn call(&self, args: Value) -> String {
        render(self.run(args).await, START_AUCTION_ERROR_PREFIX)
    }
}

/// Places a bid, transferring the bid amount to the auction contract
pub struct BidOnNftTool {
    auctions: AuctionActions,
}

impl BidOnNftTool {
    /// Create the tool
    pub fn new(auctions: AuctionActions) -> Self {
        Self { auctions }
    }

    async fn run(&self, args: Value) -> Result<String> {
        let params: BidParams = parse_args(args)?;
        let request = params.validate()?;
        let settled = self.auctions.bid(&request).await?;

        Ok(format!(
            "Bid placed on token ID {} with amount {}.\n{}",
            params.token_id,
            format_eth(params.bid_amount),
            transaction_lines(&settled)
        ))
    }
}

#[async_trait]
impl Tool for BidOnNftTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "bid_on_nft".to_string(),
            description: "Place a bid on an NFT auction.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "token_id": {
                        "type": "integer",
                        "minimum": 0,
                        "description": "The ID of the NFT token to bid on, e.g., `1`",
                        "examples": [1]
                    },
                    "bid_amount": {
                        "type": "number",
                        "minimum": 0,
                        "description": "The amount of ETH to bid, e.g., `0.5`",
                        "examples": [0.5]
                    }
                },
                "required": ["token_id", "bid_amount"]
            }),
        }
    }

    async fn call(&self, args: Value) -> String {
        render(self.run(args).await, BID_ERROR_PREFIX)
    }
}

/// Finalizes an auction, transferring the token to the highest bidder
pub struct FinalizeNftAuctionTool {
    auctions: AuctionActions,
}

impl FinalizeNftAuctionTool {
    /// Create the tool
    pub fn new(auctions: AuctionActions) -> Self {
        Self { auctions }
    }

    async fn run(&self, args: Value) -> Result<String> {
        let params: FinalizeAuctionParams = parse_args(args)?;
        let request = params.validate()?;
        let settled = self.auctions.finalize_auction(&request).await?;

        Ok(format!(
            "Auction finalized for token ID {}.\n{}",
            params.token_id,
            transaction_lines(&settled)
        ))
    }
}

#[async_trait]
impl Tool for FinalizeNftAuctionTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "finalize_nft_auction".to_string(),
            description: "Finalize an NFT auction and transfer the token to the highest bidder."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "token_id": {
                        "type": "integer",
                        "minimum": 0,
                        "description": "The ID of the NFT token for the auction to finalize, e.g., `1`",
                        "examples": [1]
                    }
                },
                "required": ["token_id"]
            }),
        }
    }

    async fn call(&self, args: Value) -> String {
        render(self.run(args).await, FINALIZE_ERROR_PREFIX)
    }
}

/// Deploys a new ERC-721 collection
pub struct DeployNftTool {
    nfts: NftActions,
}

impl DeployNftTool {
    /// Create the tool
    pub fn new(nfts: NftActions) -> Self {
        Self { nfts }
    }

    async fn run(&self, args: Value) -> Result<String> {
        let params: DeployNftParams = parse_args(args)?;
        let request = params.validate()?;
        let settled = self.nfts.deploy(&request).await?;
        let address = settled.contract_address.ok_or_else(|| {
            Error::rpc(format!(
                "Receipt for {} carries no contract address",
                settled.transaction_hash
            ))
        })?;

        Ok(format!(
            "Deployed NFT Collection {} to address {}.\n{}",
            request.name,
            address,
            transaction_lines(&settled)
        ))
    }
}

#[async_trait]
impl Tool for DeployNftTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "deploy_nft".to_string(),
            description: "Deploy an ERC-721 NFT contract with a given name, symbol, and base URI."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "The name of the NFT collection, e.g., `MyNFT`",
                        "examples": ["MyNFT"]
                    },
                    "symbol": {
                        "type": "string",
                        "description": "The symbol of the NFT collection, e.g., `MNFT`",
                        "examples": ["MNFT"]
                    },
                    "base_uri": {
                        "type": "string",
                        "description": "The base URI for the NFT metadata, e.g., `https://example.com/nft/`",
                        "examples": ["https://example.com/nft/"]
                    }
                },
                "required": ["name", "symbol", "base_uri"]
            }),
        }
    }

    async fn call(&self, args: Value) -> String {
        render(self.run(args).await, DEPLOY_ERROR_PREFIX)
    }
}

/// Mints one token from an existing ERC-721 contract
pub struct MintNftTool {
    nfts: NftActions,
}

impl MintNftTool {
    /// Create the tool
    pub fn new(nfts: NftActions) -> Self {
        Self { nfts }
    }

    async fn run(&self, args: Value) -> Result<String> {
        let params: MintNftParams = parse_args(args)?;
        let request = params.validate()?;
        let settled = self.nfts.mint(&request).await?;

        Ok(format!(
            "Minted NFT from contract {} to address {}.\n{}",
            params.contract_address,
            params.destination,
            transaction_lines(&settled)
        ))
    }
}

#[async_trait]
impl Tool for MintNftTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "mint_nft".to_string(),
            description: "Mint an NFT from an existing ERC-721 contract.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "contract_address": {
                        "type": "string",
                        "description": "The contract address of the NFT (ERC-721) to mint, e.g. `0x036CbD53842c5426634e7929541eC2318f3dCF7e`"
                    },
                    "destination": {
                        "type": "string",
                        "description": "The destination address that will receive the NFT onchain, e.g. `0x036CbD53842c5426634e7929541eC2318f3dCF7e`"
                    }
                },
                "required": ["contract_address", "destination"]
            }),
        }
    }

    async fn call(&self, args: Value) -> String {
        render(self.run(args).await, MINT_ERROR_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use auction_agent_core::config::{AuctionSettings, NftSettings};
    use auction_agent_core::wallet::testing::{StubWallet, STUB_DEPLOYED_ADDRESS};
    use auction_agent_core::ContractMethod;

    const NFT: &str = "0x036CbD53842c5426634e7929541eC2318f3dCF7e";

    fn auctions(wallet: std::sync::Arc<StubWallet>) -> AuctionActions {
        AuctionActions::new(wallet, &AuctionSettings::default()).unwrap()
    }

    fn nfts(wallet: std::sync::Arc<StubWallet>, bytecode: Option<&str>) -> NftActions {
        let settings = NftSettings {
            collection_bytecode: bytecode.map(str::to_string),
        };
        NftActions::new(wallet, &settings).unwrap()
    }

    #[tokio::test]
    async fn test_start_auction_success_text() {
        let wallet = StubWallet::settling("0xabc", "link");
        let tool = StartNftAuctionTool::new(auctions(wallet.clone()));

        let output = tool
            .call(json!({
                "nft_contract_address": NFT,
                "token_id": 1,
                "starting_price": 0.1,
                "duration": 86400
            }))
            .await;

        assert!(output.starts_with("Auction created successfully"));
        for expected in ["token ID 1", "0.1 ETH", "86400 seconds", "0xabc", "link", NFT] {
            assert!(output.contains(expected), "missing {:?} in {:?}", expected, output);
        }
        assert_eq!(wallet.recorded()[0].method, ContractMethod::CreateAuction);
    }

    #[tokio::test]
    async fn test_whole_eth_amounts_keep_a_decimal() {
        let wallet = StubWallet::settling("0xabc", "link");
        let start = StartNftAuctionTool::new(auctions(wallet.clone()))
            .call(json!({
                "nft_contract_address": NFT,
                "token_id": 3,
                "starting_price": 1.0,
                "duration": 60
            }))
            .await;
        assert!(start.contains("Starting price: 1.0 ETH\n"), "{:?}", start);

        let bid = BidOnNftTool::new(auctions(wallet))
            .call(json!({"token_id": 3, "bid_amount": 2}))
            .await;
        assert!(bid.starts_with("Bid placed on token ID 3 with amount 2.0 ETH."), "{:?}", bid);

        assert_eq!(format_eth(0.1), "0.1 ETH");
        assert_eq!(format_eth(0.0), "0.0 ETH");
        assert_eq!(format_eth(1.25), "1.25 ETH");
    }

    #[tokio::test]
    async fn test_bid_attaches_wei_value() {
        let wallet = StubWallet::settling("0xbid", "link");
        let tool = BidOnNftTool::new(auctions(wallet.clone()));

        let output = tool.call(json!({"token_id": 1, "bid_amount": 0.5})).await;
        assert_eq!(
            output,
            "Bid placed on token ID 1 with amount 0.5 ETH.\nTransaction hash: 0xbid\nTransaction link: link"
        );
        assert_eq!(
            wallet.recorded()[0].value_wei,
            Some(U256::from(500_000_000_000_000_000u64))
        );
    }

    #[tokio::test]
    async fn test_submission_failures_use_prefixes() {
        let wallet = StubWallet::failing_submit("execution reverted: auction not active");

        let start = StartNftAuctionTool::new(auctions(wallet.clone()))
            .call(json!({
                "nft_contract_address": NFT,
                "token_id": 1,
                "starting_price": 0.1,
                "duration": 60
            }))
            .await;
        let bid = BidOnNftTool::new(auctions(wallet.clone()))
            .call(json!({"token_id": 1, "bid_amount": 0.5}))
            .await;
        let finalize = FinalizeNftAuctionTool::new(auctions(wallet.clone()))
            .call(json!({"token_id": 1}))
            .await;

        for (output, prefix) in [
            (start, START_AUCTION_ERROR_PREFIX),
            (bid, BID_ERROR_PREFIX),
            (finalize, FINALIZE_ERROR_PREFIX),
        ] {
            assert!(output.starts_with(prefix), "{:?}", output);
            assert!(output.contains("execution reverted: auction not active"));
        }
    }

    #[tokio::test]
    async fn test_invalid_arguments_never_reach_wallet() {
        let wallet = StubWallet::settling("0xabc", "link");
        let tool = StartNftAuctionTool::new(auctions(wallet.clone()));

        let zero_duration = tool
            .call(json!({
                "nft_contract_address": NFT,
                "token_id": 1,
                "starting_price": 0.1,
                "duration": 0
            }))
            .await;
        assert!(zero_duration.starts_with("Error creating auction: Validation error"));

        let missing = tool.call(json!({"token_id": 1})).await;
        assert!(missing.starts_with(START_AUCTION_ERROR_PREFIX));

        let bid = BidOnNftTool::new(auctions(wallet.clone()))
            .call(json!({"token_id": 1, "bid_amount": -1.0}))
            .await;
        assert!(bid.starts_with("Error placing bid: Invalid amount"));

        assert!(wallet.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_finalize_twice_yields_two_successes() {
        let wallet = StubWallet::settling("0xfin", "link");
        let tool = FinalizeNftAuctionTool::new(auctions(wallet.clone()));

        let first = tool.call(json!({"token_id": 2})).await;
        let second = tool.call(json!({"token_id": 2})).await;

        assert_eq!(first, second);
        assert!(first.starts_with("Auction finalized for token ID 2."));
        assert_eq!(wallet.recorded().len(), 2);
    }

    #[tokio::test]
    async fn test_mint_tool() {
        let wallet = StubWallet::settling("0xmint", "link");
        let tool = MintNftTool::new(nfts(wallet.clone(), None));

        let output = tool
            .call(json!({
                "contract_address": NFT,
                "destination": "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
            }))
            .await;
        assert!(output.starts_with("Minted NFT from contract"));
        assert!(output.contains("0xmint"));

        let bad = tool
            .call(json!({"contract_address": NFT, "destination": "alice"}))
            .await;
        assert!(bad.starts_with("Error minting NFT: Invalid address"));
    }

    #[tokio::test]
    async fn test_deploy_tool() {
        let wallet = StubWallet::settling("0xdeploy", "https://explorer/tx/0xdeploy");
        let tool = DeployNftTool::new(nfts(wallet.clone(), Some("0x6080")));

        let output = tool
            .call(json!({
                "name": "MyNFT",
                "symbol": "MNFT",
                "base_uri": "https://example.com/nft/"
            }))
            .await;
        assert_eq!(
            output,
            format!(
                "Deployed NFT Collection MyNFT to address {}.\n\
                 Transaction hash: 0xdeploy\n\
                 Transaction link: https://explorer/tx/0xdeploy",
                STUB_DEPLOYED_ADDRESS
            )
        );
        assert_eq!(wallet.deployments().len(), 1);

        let blank = tool
            .call(json!({"name": " ", "symbol": "MNFT", "base_uri": ""}))
            .await;
        assert!(blank.starts_with("Error deploying NFT: Validation error"));
        assert_eq!(wallet.deployments().len(), 1);
    }

    #[tokio::test]
    async fn test_deploy_tool_without_bytecode() {
        let wallet = StubWallet::settling("0xdeploy", "link");
        let output = DeployNftTool::new(nfts(wallet.clone(), None))
            .call(json!({"name": "MyNFT", "symbol": "MNFT", "base_uri": ""}))
            .await;
        assert!(output.starts_with("Error deploying NFT: Operation not supported"));
        assert!(wallet.deployments().is_empty());
    }

    #[test]
    fn test_schemas_require_every_field() {
        let wallet = StubWallet::settling("0x", "");
        let definition = StartNftAuctionTool::new(auctions(wallet)).definition();
        let required = definition.parameters["required"].as_array().unwrap();
        assert_eq!(required.len(), 4);
        assert!(definition.description.contains("highest bidder"));
    }
}
