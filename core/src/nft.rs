//! ERC-721 collection deployment and mint actions

use std::sync::Arc;

use alloy_primitives::U256;
use tracing::{info, instrument};

use crate::abi::{erc721_collection_abi, erc721_mint_abi};
use crate::config::NftSettings;
use crate::dispatch::Dispatcher;
use crate::error::{Error, Result};
use crate::types::{
    ContractDeployment, ContractInvocation, ContractMethod, DeployRequest, MintRequest,
    SettledInvocation,
};
use crate::wallet::WalletCapability;

/// NFT actions against arbitrary ERC-721 contracts
#[derive(Clone)]
pub struct NftActions {
    dispatcher: Dispatcher,
    collection_bytecode: Option<Arc<[u8]>>,
}

impl NftActions {
    /// Create NFT actions over a wallet capability
    pub fn new(wallet: Arc<dyn WalletCapability>, settings: &NftSettings) -> Result<Self> {
        Self::with_dispatcher(Dispatcher::new(wallet), settings)
    }

    /// Create NFT actions over an existing dispatcher
    pub fn with_dispatcher(dispatcher: Dispatcher, settings: &NftSettings) -> Result<Self> {
        Ok(Self {
            dispatcher,
            collection_bytecode: settings.collection_bytecode()?.map(Arc::from),
        })
    }

    /// Whether collection deployments are configured
    pub fn can_deploy(&self) -> bool {
        self.collection_bytecode.is_some()
    }

    /// Deploy a new ERC-721 collection
    ///
    /// The settled invocation always carries the created contract address.
    #[instrument(skip_all, fields(name = %request.name, symbol = %request.symbol))]
    pub async fn deploy(&self, request: &DeployRequest) -> Result<SettledInvocation> {
        let bytecode = self.collection_bytecode.as_deref().ok_or_else(|| {
            Error::NotSupported(
                "no ERC-721 collection bytecode configured; set nft.collection_bytecode"
                    .to_string(),
            )
        })?;
        info!(base_uri = %request.base_uri, "deploying NFT collection");

        let deployment = ContractDeployment::new(bytecode.to_vec(), erc721_collection_abi()?)
            .with_argument("name", request.name.as_str())
            .with_argument("symbol", request.symbol.as_str())
            .with_argument("baseURI", request.base_uri.as_str());

        let settled = self.dispatcher.deploy(deployment).await?;
        if settled.contract_address.is_none() {
            return Err(Error::rpc(format!(
                "Receipt for {} carries no contract address",
                settled.transaction_hash
            )));
        }
        Ok(settled)
    }

    /// Mint one token to `destination`
    #[instrument(skip_all, fields(contract = %request.contract))]
    pub async fn mint(&self, request: &MintRequest) -> Result<SettledInvocation> {
        info!(destination = %request.destination, "minting NFT");

        let invocation =
            ContractInvocation::new(request.contract, ContractMethod::Mint, erc721_mint_abi()?)
                .with_argument("to", request.destination)
                .with_argument("quantity", U256::from(1u64));

        self.dispatcher.submit(invocation).await
    }
}
