//! Core data types for the auction agent
//!
//! Agent-facing parameter structs mirror the JSON arguments a tool receives.
//! Each one validates into a typed request carrying parsed addresses and wei
//! amounts, so nothing malformed reaches the wallet capability. The adapter
//! turns requests into [`ContractInvocation`]s or [`ContractDeployment`]s; a
//! capability settles them into a [`SettledInvocation`].

use std::collections::BTreeMap;

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Address, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::abi::{self, Function, JsonAbi};
use crate::error::{Error, Result};
use crate::units::eth_to_wei;

/// Contract methods the adapter can invoke
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ContractMethod {
    /// `createAuction(address,uint256,uint256,uint256)`
    CreateAuction,
    /// `bid(uint256)`, payable
    Bid,
    /// `finalizeAuction(uint256)`
    FinalizeAuction,
    /// ERC-721 `mint(address,uint256)`
    Mint,
}

impl ContractMethod {
    /// Method name as it appears in the ABI
    pub fn abi_name(&self) -> &'static str {
        match self {
            ContractMethod::CreateAuction => "createAuction",
            ContractMethod::Bid => "bid",
            ContractMethod::FinalizeAuction => "finalizeAuction",
            ContractMethod::Mint => "mint",
        }
    }
}

impl std::fmt::Display for ContractMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.abi_name())
    }
}

/// A typed ABI argument
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum AbiValue {
    /// 20-byte account or contract address
    Address(Address),
    /// Unsigned 256-bit integer
    Uint(U256),
    /// UTF-8 string
    String(String),
}

impl AbiValue {
    /// Solidity type name of the value
    pub fn type_name(&self) -> &'static str {
        match self {
            AbiValue::Address(_) => "address",
            AbiValue::Uint(_) => "uint256",
            AbiValue::String(_) => "string",
        }
    }

    /// The value in `alloy-dyn-abi` form
    pub fn to_sol_value(&self) -> DynSolValue {
        match self {
            AbiValue::Address(address) => DynSolValue::Address(*address),
            AbiValue::Uint(number) => DynSolValue::Uint(*number, 256),
            AbiValue::String(text) => DynSolValue::String(text.clone()),
        }
    }
}

impl From<Address> for AbiValue {
    fn from(address: Address) -> Self {
        AbiValue::Address(address)
    }
}

impl From<U256> for AbiValue {
    fn from(value: U256) -> Self {
        AbiValue::Uint(value)
    }
}

impl From<u64> for AbiValue {
    fn from(value: u64) -> Self {
        AbiValue::Uint(U256::from(value))
    }
}

impl From<&str> for AbiValue {
    fn from(value: &str) -> Self {
        AbiValue::String(value.to_string())
    }
}

impl From<String> for AbiValue {
    fn from(value: String) -> Self {
        AbiValue::String(value)
    }
}

/// Parse a hex address, reporting the offending input on failure
pub fn parse_address(input: &str) -> Result<Address> {
    input
        .trim()
        .parse::<Address>()
        .map_err(|e| Error::InvalidAddress(format!("'{}': {}", input, e)))
}

/// Arguments for starting an auction, as supplied by an agent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StartAuctionParams {
    /// Address of the NFT (ERC-721) contract
    pub nft_contract_address: String,
    /// Token to auction
    pub token_id: u64,
    /// Starting price in ETH
    pub starting_price: f64,
    /// Auction duration in seconds
    pub duration: u64,
}

/// Arguments for placing a bid
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BidParams {
    /// Token being auctioned
    pub token_id: u64,
    /// Bid amount in ETH
    pub bid_amount: f64,
}

/// Arguments for finalizing an auction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FinalizeAuctionParams {
    /// Token whose auction is finalized
    pub token_id: u64,
}

/// Arguments for minting an NFT
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MintNftParams {
    /// ERC-721 contract to mint from
    pub contract_address: String,
    /// Address receiving the token
    pub destination: String,
}

/// Arguments for deploying an ERC-721 collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeployNftParams {
    /// Collection name
    pub name: String,
    /// Collection symbol
    pub symbol: String,
    /// Base URI for token metadata
    pub base_uri: String,
}

/// Validated request to create an auction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuctionRequest {
    /// NFT contract holding the token
    pub nft_contract: Address,
    /// Token to auction
    pub token_id: u64,
    /// Starting price in wei
    pub starting_price_wei: U256,
    /// Auction duration in seconds, always positive
    pub duration_seconds: u64,
}

/// Validated bid request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidRequest {
    /// Token being auctioned
    pub token_id: u64,
    /// Value transferred with the bid
    pub bid_value_wei: U256,
}

/// Validated finalize request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizeRequest {
    /// Token whose auction is finalized
    pub token_id: u64,
}

/// Validated collection deployment request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployRequest {
    /// Collection name, never blank
    pub name: String,
    /// Collection symbol, never blank
    pub symbol: String,
    /// Base URI for token metadata
    pub base_uri: String,
}

/// Validated mint request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintRequest {
    /// ERC-721 contract to mint from
    pub contract: Address,
    /// Address receiving the token
    pub destination: Address,
}

impl StartAuctionParams {
    /// Validate into an [`AuctionRequest`]
    pub fn validate(&self) -> Result<AuctionRequest> {
        let nft_contract = parse_address(&self.nft_contract_address)?;
        if self.duration == 0 {
            return Err(Error::validation("Auction duration must be greater than zero"));
        }
        let starting_price_wei = eth_to_wei(self.starting_price)?;

        Ok(AuctionRequest {
            nft_contract,
            token_id: self.token_id,
            starting_price_wei,
            duration_seconds: self.duration,
        })
    }
}

impl BidParams {
    /// Validate into a [`BidRequest`]
    pub fn validate(&self) -> Result<BidRequest> {
        Ok(BidRequest {
            token_id: self.token_id,
            bid_value_wei: eth_to_wei(self.bid_amount)?,
        })
    }
}

impl FinalizeAuctionParams {
    /// Validate into a [`FinalizeRequest`]
    pub fn validate(&self) -> Result<FinalizeRequest> {
        Ok(FinalizeRequest {
            token_id: self.token_id,
        })
    }
}

impl MintNftParams {
    /// Validate into a [`MintRequest`]
    pub fn validate(&self) -> Result<MintRequest> {
        Ok(MintRequest {
            contract: parse_address(&self.contract_address)?,
            destination: parse_address(&self.destination)?,
        })
    }
}

impl DeployNftParams {
    /// Validate into a [`DeployRequest`]
    pub fn validate(&self) -> Result<DeployRequest> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::validation("Collection name must not be empty"));
        }
        let symbol = self.symbol.trim();
        if symbol.is_empty() {
            return Err(Error::validation("Collection symbol must not be empty"));
        }

        Ok(DeployRequest {
            name: name.to_string(),
            symbol: symbol.to_string(),
            base_uri: self.base_uri.trim().to_string(),
        })
    }
}

/// A request to execute one method on one contract
#[derive(Debug, Clone)]
pub struct ContractInvocation {
    /// Correlation id for logs
    pub id: Uuid,
    /// Target contract
    pub contract_address: Address,
    /// Method to call
    pub method: ContractMethod,
    /// Arguments by ABI parameter name
    pub arguments: BTreeMap<String, AbiValue>,
    /// ABI describing the target contract
    pub abi: &'static JsonAbi,
    /// Value transferred with the call
    pub value_wei: Option<U256>,
    /// When the invocation was built
    pub created_at: DateTime<Utc>,
}

impl ContractInvocation {
    /// Create an invocation with no arguments and no value
    pub fn new(contract_address: Address, method: ContractMethod, abi: &'static JsonAbi) -> Self {
        Self {
            id: Uuid::new_v4(),
            contract_address,
            method,
            arguments: BTreeMap::new(),
            abi,
            value_wei: None,
            created_at: Utc::now(),
        }
    }

    /// Add a named argument
    pub fn with_argument(mut self, name: impl Into<String>, value: impl Into<AbiValue>) -> Self {
        self.arguments.insert(name.into(), value.into());
        self
    }

    /// Attach value to the call
    pub fn with_value(mut self, value_wei: U256) -> Self {
        self.value_wei = Some(value_wei);
        self
    }

    /// The ABI function this invocation targets
    pub fn function(&self) -> Result<&'static Function> {
        abi::function(self.abi, self.method.abi_name())
    }

    /// Encode the call data, checking value against the function's mutability
    pub fn calldata(&self) -> Result<Vec<u8>> {
        let function = self.function()?;
        if let Some(value) = self.value_wei {
            if !value.is_zero() && !abi::is_payable(function) {
                return Err(Error::abi(format!(
                    "{} is not payable but {} wei was attached",
                    function.signature(),
                    value
                )));
            }
        }
        abi::encode_call(function, &self.arguments)
    }
}

/// A request to create a contract from creation bytecode
#[derive(Debug, Clone)]
pub struct ContractDeployment {
    /// Correlation id for logs
    pub id: Uuid,
    /// Creation bytecode, without constructor arguments
    pub bytecode: Vec<u8>,
    /// Constructor arguments by ABI parameter name
    pub arguments: BTreeMap<String, AbiValue>,
    /// ABI declaring the constructor
    pub abi: &'static JsonAbi,
    /// When the deployment was built
    pub created_at: DateTime<Utc>,
}

impl ContractDeployment {
    /// Create a deployment with no constructor arguments
    pub fn new(bytecode: Vec<u8>, abi: &'static JsonAbi) -> Self {
        Self {
            id: Uuid::new_v4(),
            bytecode,
            arguments: BTreeMap::new(),
            abi,
            created_at: Utc::now(),
        }
    }

    /// Add a named constructor argument
    pub fn with_argument(mut self, name: impl Into<String>, value: impl Into<AbiValue>) -> Self {
        self.arguments.insert(name.into(), value.into());
        self
    }

    /// Bytecode followed by the encoded constructor arguments
    pub fn creation_data(&self) -> Result<Vec<u8>> {
        if self.bytecode.is_empty() {
            return Err(Error::abi("Creation bytecode is empty"));
        }
        let encoded = abi::encode_constructor(abi::constructor(self.abi)?, &self.arguments)?;
        let mut data = Vec::with_capacity(self.bytecode.len() + encoded.len());
        data.extend_from_slice(&self.bytecode);
        data.extend_from_slice(&encoded);
        Ok(data)
    }
}

/// A submitted invocation that has settled on chain
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SettledInvocation {
    /// Transaction hash
    pub transaction_hash: String,
    /// Block explorer link for the transaction
    pub transaction_link: String,
    /// Address of the contract the transaction created, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<Address>,
    /// When settlement was observed
    pub settled_at: DateTime<Utc>,
}

impl SettledInvocation {
    /// Create a settled invocation observed now
    pub fn new(transaction_hash: impl Into<String>, transaction_link: impl Into<String>) -> Self {
        Self {
            transaction_hash: transaction_hash.into(),
            transaction_link: transaction_link.into(),
            contract_address: None,
            settled_at: Utc::now(),
        }
    }

    /// Record the address of a created contract
    pub fn with_contract_address(mut self, address: Address) -> Self {
        self.contract_address = Some(address);
        self
    }
}
