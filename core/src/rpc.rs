//! JSON-RPC backed wallet capability
//!
//! [`JsonRpcWallet`] submits invocations and deployments with
//! `eth_sendTransaction`, leaving signing to the node (an unlocked
//! development account, or a signing proxy in front of a remote node).
//! Before the first send the node's `eth_chainId` must match
//! `network.chain_id`; a zero setting skips the check. Pending transactions
//! are settled by polling `eth_getTransactionReceipt`.
//!
//! # Example
//!
//! ```no_run
//! use auction_agent_core::config::NetworkSettings;
//! use auction_agent_core::rpc::JsonRpcWallet;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut settings = NetworkSettings::default();
//!     settings.rpc_url = "http://127.0.0.1:8545".to_string();
//!
//!     let wallet = JsonRpcWallet::new(&settings)?;
//!     println!("Chain id: {}", wallet.chain_id().await?);
//!     println!("Sender: {}", wallet.sender().await?);
//!     Ok(())
//! }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

use crate::config::NetworkSettings;
use crate::error::{Error, Result};
use crate::types::{parse_address, ContractDeployment, ContractInvocation, SettledInvocation};
use crate::wallet::{PendingInvocation, WalletCapability};

/// JSON-RPC response envelope
#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

/// JSON-RPC error object
#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// The subset of a transaction receipt the wallet inspects
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    /// Transaction hash
    pub transaction_hash: String,
    /// Block the transaction was included in
    #[serde(default)]
    pub block_number: Option<String>,
    /// `0x1` on success, `0x0` on revert
    #[serde(default)]
    pub status: Option<String>,
    /// Gas consumed
    #[serde(default)]
    pub gas_used: Option<String>,
    /// Address of the created contract, for contract creations
    #[serde(default)]
    pub contract_address: Option<String>,
}

impl TransactionReceipt {
    /// Execution outcome, `None` when the node does not report status
    pub fn succeeded(&self) -> Option<bool> {
        match self.status.as_deref() {
            Some("0x1") | Some("0x01") => Some(true),
            Some("0x0") | Some("0x00") => Some(false),
            _ => None,
        }
    }

    /// Whether the receipt belongs to a mined block
    pub fn is_mined(&self) -> bool {
        self.block_number.is_some()
    }
}

struct RpcInner {
    client: reqwest::Client,
    settings: NetworkSettings,
    from: Option<Address>,
    next_id: AtomicU64,
    chain_verified: OnceCell<()>,
}

/// Wallet capability talking to an Ethereum JSON-RPC endpoint
#[derive(Clone)]
pub struct JsonRpcWallet {
    inner: Arc<RpcInner>,
}

impl JsonRpcWallet {
    /// Create a wallet for the configured endpoint
    pub fn new(settings: &NetworkSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()?;
        let from = settings
            .from_address
            .as_deref()
            .map(parse_address)
            .transpose()?;

        Ok(Self {
            inner: Arc::new(RpcInner {
                client,
                settings: settings.clone(),
                from,
                next_id: AtomicU64::new(1),
                chain_verified: OnceCell::new(),
            }),
        })
    }

    /// Network settings in use
    pub fn settings(&self) -> &NetworkSettings {
        &self.inner.settings
    }

    /// Send one JSON-RPC request and return its `result`
    #[instrument(skip(self, params))]
    pub async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let response = self
            .inner
            .client
            .post(&self.inner.settings.rpc_url)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::network(format!(
                "{} returned HTTP {}: {}",
                method, status, text
            )));
        }

        let envelope: RpcResponse = response.json().await?;
        into_result(method, envelope)
    }

    /// Account transactions are sent from
    pub async fn sender(&self) -> Result<Address> {
        if let Some(from) = self.inner.from {
            return Ok(from);
        }

        let accounts: Vec<String> =
            serde_json::from_value(self.request("eth_accounts", json!([])).await?)?;
        let first = accounts
            .first()
            .ok_or_else(|| Error::config("Node exposes no accounts; set network.from_address"))?;
        parse_address(first)
    }

    /// Chain id reported by the node
    pub async fn chain_id(&self) -> Result<u64> {
        let value = self.request("eth_chainId", json!([])).await?;
        let quantity = value
            .as_str()
            .ok_or_else(|| Error::rpc("eth_chainId returned a non-string result"))?;
        parse_quantity(quantity)
    }

    /// Check once that the node serves the configured chain
    pub async fn ensure_chain(&self) -> Result<()> {
        let expected = self.inner.settings.chain_id;
        if expected == 0 {
            return Ok(());
        }
        self.inner
            .chain_verified
            .get_or_try_init(|| async {
                let served = self.chain_id().await?;
                if served != expected {
                    return Err(Error::config(format!(
                        "{} serves chain {} but network.chain_id is {}",
                        self.inner.settings.rpc_url, served, expected
                    )));
                }
                debug!(chain_id = served, "chain id verified");
                Ok(())
            })
            .await?;
        Ok(())
    }

    async fn send_transaction(&self, transaction: Value) -> Result<Box<dyn PendingInvocation>> {
        let value = self
            .request("eth_sendTransaction", json!([transaction]))
            .await?;
        let hash = value
            .as_str()
            .ok_or_else(|| Error::rpc("eth_sendTransaction returned a non-string hash"))?
            .to_string();

        info!(tx_hash = %hash, "transaction submitted");
        Ok(Box::new(PendingTransaction {
            wallet: self.clone(),
            hash,
        }))
    }

    /// Receipt for a transaction, `None` while it is pending
    pub async fn transaction_receipt(&self, hash: &str) -> Result<Option<TransactionReceipt>> {
        let value = self
            .request("eth_getTransactionReceipt", json!([hash]))
            .await?;
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(value)?))
    }

    async fn poll_receipt(&self, hash: &str) -> Result<TransactionReceipt> {
        let interval = self.inner.settings.poll_interval();
        loop {
            match self.transaction_receipt(hash).await? {
                Some(receipt) if receipt.is_mined() => return Ok(receipt),
                _ => {
                    debug!(tx_hash = %hash, "receipt not available yet");
                    tokio::time::sleep(interval).await;
                }
            }
        }
    }
}

#[async_trait]
impl WalletCapability for JsonRpcWallet {
    #[instrument(
        skip(self, invocation),
        fields(invocation_id = %invocation.id, method = %invocation.method)
    )]
    async fn invoke_contract(
        &self,
        invocation: &ContractInvocation,
    ) -> Result<Box<dyn PendingInvocation>> {
        self.ensure_chain().await?;
        let from = self.sender().await?;
        let transaction = build_transaction(from, self.inner.settings.chain_id, invocation)?;
        self.send_transaction(transaction).await
    }

    #[instrument(skip(self, deployment), fields(deployment_id = %deployment.id))]
    async fn deploy_contract(
        &self,
        deployment: &ContractDeployment,
    ) -> Result<Box<dyn PendingInvocation>> {
        self.ensure_chain().await?;
        let from = self.sender().await?;
        let transaction =
            build_deployment_transaction(from, self.inner.settings.chain_id, deployment)?;
        self.send_transaction(transaction).await
    }
}

/// A transaction submitted through [`JsonRpcWallet`]
pub struct PendingTransaction {
    wallet: JsonRpcWallet,
    hash: String,
}

#[async_trait]
impl PendingInvocation for PendingTransaction {
    fn transaction_hash(&self) -> &str {
        &self.hash
    }

    #[instrument(skip_all)]
    async fn wait(&mut self) -> Result<SettledInvocation> {
        let settings = self.wallet.settings();
        debug!(tx_hash = %self.hash, "waiting for receipt");

        // A zero bound waits indefinitely
        let receipt = if settings.confirmation_timeout_seconds == 0 {
            self.wallet.poll_receipt(&self.hash).await?
        } else {
            tokio::time::timeout(
                settings.confirmation_timeout(),
                self.wallet.poll_receipt(&self.hash),
            )
            .await
            .map_err(|_| {
                Error::timeout(format!(
                    "No receipt for {} after {} seconds",
                    self.hash, settings.confirmation_timeout_seconds
                ))
            })??
        };

        match receipt.succeeded() {
            Some(false) => return Err(Error::Reverted(self.hash.clone())),
            None => warn!("receipt carries no status field, assuming success"),
            Some(true) => {}
        }

        let settled = SettledInvocation::new(
            self.hash.clone(),
            settings.transaction_link(&self.hash),
        );
        match receipt.contract_address.as_deref() {
            Some(created) => Ok(settled.with_contract_address(parse_address(created)?)),
            None => Ok(settled),
        }
    }
}

/// Transaction object for `eth_sendTransaction`
///
/// A zero `chain_id` leaves the field out and lets the node choose.
pub fn build_transaction(
    from: Address,
    chain_id: u64,
    invocation: &ContractInvocation,
) -> Result<Value> {
    let calldata = invocation.calldata()?;
    let mut transaction = json!({
        "from": from.to_string(),
        "to": invocation.contract_address.to_string(),
        "data": format!("0x{}", hex::encode(calldata)),
    });
    if let Some(value) = invocation.value_wei {
        transaction["value"] = Value::String(to_quantity(value));
    }
    set_chain_id(&mut transaction, chain_id);
    Ok(transaction)
}

/// Contract creation object for `eth_sendTransaction`; it carries no `to`
pub fn build_deployment_transaction(
    from: Address,
    chain_id: u64,
    deployment: &ContractDeployment,
) -> Result<Value> {
    let mut transaction = json!({
        "from": from.to_string(),
        "data": format!("0x{}", hex::encode(deployment.creation_data()?)),
    });
    set_chain_id(&mut transaction, chain_id);
    Ok(transaction)
}

fn set_chain_id(transaction: &mut Value, chain_id: u64) {
    if chain_id != 0 {
        transaction["chainId"] = Value::String(to_quantity(U256::from(chain_id)));
    }
}

/// Encode a value as a JSON-RPC quantity (minimal hex, `0x0` for zero)
pub fn to_quantity(value: U256) -> String {
    let encoded = hex::encode(value.to_be_bytes::<32>());
    let trimmed = encoded.trim_start_matches('0');
    if trimmed.is_empty() {
        "0x0".to_string()
    } else {
        format!("0x{}", trimmed)
    }
}

/// Decode a JSON-RPC quantity that fits in 64 bits
pub fn parse_quantity(quantity: &str) -> Result<u64> {
    let digits = quantity.strip_prefix("0x").unwrap_or(quantity);
    u64::from_str_radix(digits, 16)
        .map_err(|e| Error::rpc(format!("Invalid quantity '{}': {}", quantity, e)))
}

fn into_result(method: &str, envelope: RpcResponse) -> Result<Value> {
    if let Some(error) = envelope.error {
        debug!(method, code = error.code, "node returned an error object");
        return Err(Error::Rejected {
            code: error.code,
            message: error.message,
        });
    }
    Ok(envelope.result.unwrap_or(Value::Null))
}
