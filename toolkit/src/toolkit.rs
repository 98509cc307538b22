//! Tool registry
//!
//! [`Toolkit`] owns the registered tools, exposes their definitions to an
//! agent runtime, and dispatches calls by name.

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, instrument};

use auction_agent_core::{AgentConfig, AuctionActions, NftActions, WalletCapability};

use crate::error::{Result, ToolkitError};
use crate::tool::{Tool, ToolDefinition};
use crate::tools::{
    BidOnNftTool, DeployNftTool, FinalizeNftAuctionTool, MintNftTool, StartNftAuctionTool,
};

/// A tool and the name it was registered under
#[derive(Clone)]
struct Entry {
    name: String,
    tool: Arc<dyn Tool>,
}

/// A named collection of tools
#[derive(Clone, Default)]
pub struct Toolkit {
    tools: Vec<Entry>,
}

impl std::fmt::Debug for Toolkit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toolkit").field("tools", &self.names()).finish()
    }
}

impl Toolkit {
    /// Build the auction and NFT tools over a wallet capability
    pub fn new(wallet: Arc<dyn WalletCapability>, config: &AgentConfig) -> Result<Self> {
        let auctions = AuctionActions::new(wallet.clone(), &config.auction)?;
        let nfts = NftActions::new(wallet, &config.nft)?;
        Self::from_actions(auctions, nfts)
    }

    /// Build the auction and NFT tools over existing actions
    pub fn from_actions(auctions: AuctionActions, nfts: NftActions) -> Result<Self> {
        let mut toolkit = Self::empty();
        toolkit.register(Arc::new(StartNftAuctionTool::new(auctions.clone())))?;
        toolkit.register(Arc::new(BidOnNftTool::new(auctions.clone())))?;
        toolkit.register(Arc::new(FinalizeNftAuctionTool::new(auctions)))?;
        toolkit.register(Arc::new(DeployNftTool::new(nfts.clone())))?;
        toolkit.register(Arc::new(MintNftTool::new(nfts)))?;

        info!(tools = toolkit.tools.len(), "toolkit ready");
        Ok(toolkit)
    }

    /// A toolkit with no tools
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register a tool; names must be unique
    ///
    /// The name is taken from the definition once, here.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let name = tool.definition().name;
        if self.tool(&name).is_some() {
            return Err(ToolkitError::DuplicateTool(name));
        }
        self.tools.push(Entry { name, tool });
        Ok(())
    }

    /// Registered tool names, in registration order
    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|entry| entry.name.clone()).collect()
    }

    /// Definitions of every registered tool
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|entry| entry.tool.definition()).collect()
    }

    /// Definitions in function-calling shape
    pub fn function_specs(&self) -> Vec<Value> {
        self.tools
            .iter()
            .map(|entry| entry.tool.definition().to_function_spec())
            .collect()
    }

    /// Look up a tool by name
    pub fn tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.tool.clone())
    }

    /// Call a tool by name
    ///
    /// Only an unknown name is an error; the tool's own failures come back
    /// as its prefixed message.
    #[instrument(skip(self, args))]
    pub async fn call(&self, name: &str, args: Value) -> Result<String> {
        let tool = self
            .tool(name)
            .ok_or_else(|| ToolkitError::UnknownTool(name.to_string()))?;
        Ok(tool.call(args).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use auction_agent_core::wallet::testing::StubWallet;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn toolkit(wallet: Arc<StubWallet>) -> Toolkit {
        Toolkit::new(wallet, &AgentConfig::default()).unwrap()
    }

    #[test]
    fn test_registers_all_tools() {
        let toolkit = toolkit(StubWallet::settling("0x", ""));
        assert_eq!(
            toolkit.names(),
            vec![
                "start_nft_auction",
                "bid_on_nft",
                "finalize_nft_auction",
                "deploy_nft",
                "mint_nft"
            ]
        );

        let specs = toolkit.function_specs();
        assert_eq!(specs.len(), 5);
        assert_eq!(specs[1]["function"]["name"], "bid_on_nft");
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let wallet = StubWallet::settling("0x", "");
        let mut toolkit = toolkit(wallet.clone());
        let auctions =
            AuctionActions::new(wallet, &AgentConfig::default().auction).unwrap();

        let err = toolkit
            .register(Arc::new(BidOnNftTool::new(auctions)))
            .unwrap_err();
        assert!(matches!(err, ToolkitError::DuplicateTool(ref name) if name == "bid_on_nft"));
    }

    #[tokio::test]
    async fn test_call_by_name() {
        let wallet = StubWallet::settling("0xabc", "https://explorer/tx/0xabc");
        let toolkit = toolkit(wallet.clone());

        let output = toolkit
            .call("finalize_nft_auction", json!({"token_id": 7}))
            .await
            .unwrap();
        assert_eq!(
            output,
            "Auction finalized for token ID 7.\n\
             Transaction hash: 0xabc\n\
             Transaction link: https://explorer/tx/0xabc"
        );
        assert_eq!(
            wallet.recorded()[0].contract_address,
            AgentConfig::default()
                .auction
                .contract_address
                .parse::<alloy_primitives::Address>()
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let toolkit = toolkit(StubWallet::settling("0x", ""));
        let err = toolkit.call("transfer_nft", json!({})).await.unwrap_err();
        assert!(err.is_unknown_tool());
        assert_eq!(err.to_string(), "Unknown tool: transfer_nft");
    }

    #[tokio::test]
    async fn test_tool_failure_is_not_a_toolkit_error() {
        let toolkit = toolkit(StubWallet::failing_submit("insufficient funds"));
        let output = toolkit
            .call("bid_on_nft", json!({"token_id": 1, "bid_amount": 0.5}))
            .await
            .unwrap();
        assert!(output.starts_with("Error placing bid: "));
        assert!(output.ends_with("insufficient funds"));
    }

    /// Counts how often its definition is built
    struct CountingTool {
        definitions: AtomicUsize,
    }

    #[async_trait]
    impl Tool for CountingTool {
        fn definition(&self) -> ToolDefinition {
            self.definitions.fetch_add(1, Ordering::SeqCst);
            ToolDefinition {
                name: "echo".to_string(),
                description: "Echo the arguments back.".to_string(),
                parameters: json!({"type": "object"}),
            }
        }

        async fn call(&self, args: Value) -> String {
            args.to_string()
        }
    }

    #[tokio::test]
    async fn test_lookup_uses_registered_name() {
        let tool = Arc::new(CountingTool {
            definitions: AtomicUsize::new(0),
        });
        let mut toolkit = Toolkit::empty();
        toolkit.register(tool.clone()).unwrap();
        assert_eq!(tool.definitions.load(Ordering::SeqCst), 1);

        let output = toolkit.call("echo", json!({"a": 1})).await.unwrap();
        assert_eq!(output, r#"{"a":1}"#);
        assert!(toolkit.tool("echo").is_some());
        assert_eq!(toolkit.names(), vec!["echo"]);
        assert_eq!(tool.definitions.load(Ordering::SeqCst), 1);
    }
}
