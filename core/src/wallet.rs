//! Wallet capability abstraction
//!
//! The adapter never signs or submits anything itself. It hands a
//! [`ContractInvocation`] to a [`WalletCapability`], gets back a
//! [`PendingInvocation`], and waits on it. Production code plugs in
//! [`crate::rpc::JsonRpcWallet`]; tests plug in stubs.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use auction_agent_core::{AgentConfig, JsonRpcWallet, WalletCapability};
//!
//! let config = AgentConfig::default();
//! let wallet: Arc<dyn WalletCapability> = Arc::new(JsonRpcWallet::new(&config.network)?);
//! # Ok::<(), auction_agent_core::Error>(())
//! ```

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::types::{ContractDeployment, ContractInvocation, SettledInvocation};

/// An account able to submit contract invocations
#[async_trait]
pub trait WalletCapability: Send + Sync {
    /// Submit an invocation and return a handle to its pending transaction
    async fn invoke_contract(
        &self,
        invocation: &ContractInvocation,
    ) -> Result<Box<dyn PendingInvocation>>;

    /// Submit a contract creation; capabilities that cannot deploy keep the default
    async fn deploy_contract(
        &self,
        deployment: &ContractDeployment,
    ) -> Result<Box<dyn PendingInvocation>> {
        Err(Error::NotSupported(format!(
            "this wallet cannot deploy contracts (deployment {})",
            deployment.id
        )))
    }
}

/// A submitted invocation that has not been observed to settle yet
#[async_trait]
pub trait PendingInvocation: Send {
    /// Hash of the submitted transaction
    fn transaction_hash(&self) -> &str;

    /// Wait until the invocation settles
    async fn wait(&mut self) -> Result<SettledInvocation>;
}

/// Stub capability for tests, enabled in dependents with the `test-util` feature
#[cfg(any(test, feature = "test-util"))]
pub mod testing {
    use std::sync::{Arc, Mutex};

    use alloy_primitives::Address;

    use super::*;

    /// Address reported for contracts created through [`StubWallet`]
    pub const STUB_DEPLOYED_ADDRESS: Address = Address::new([0x42; 20]);

    enum Behavior {
        Settle { hash: String, link: String },
        FailSubmit(String),
        FailWait(String),
    }

    /// Records every invocation and deployment and answers with a fixed outcome
    pub struct StubWallet {
        behavior: Behavior,
        invocations: Mutex<Vec<ContractInvocation>>,
        deployments: Mutex<Vec<ContractDeployment>>,
    }

    impl StubWallet {
        fn with(behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                invocations: Mutex::new(Vec::new()),
                deployments: Mutex::new(Vec::new()),
            })
        }

        /// Every submission settles with `hash` and `link`
        pub fn settling(hash: &str, link: &str) -> Arc<Self> {
            Self::with(Behavior::Settle {
                hash: hash.to_string(),
                link: link.to_string(),
            })
        }

        /// Every submission fails with a network error carrying `message`
        pub fn failing_submit(message: &str) -> Arc<Self> {
            Self::with(Behavior::FailSubmit(message.to_string()))
        }

        /// Every submission is accepted, then reverts with `message`
        pub fn failing_wait(message: &str) -> Arc<Self> {
            Self::with(Behavior::FailWait(message.to_string()))
        }

        /// Invocations received so far
        pub fn recorded(&self) -> Vec<ContractInvocation> {
            self.invocations
                .lock()
                .map(|recorded| recorded.clone())
                .unwrap_or_default()
        }

        /// Deployments received so far
        pub fn deployments(&self) -> Vec<ContractDeployment> {
            self.deployments
                .lock()
                .map(|recorded| recorded.clone())
                .unwrap_or_default()
        }

        fn pending(&self, deploys: bool) -> Result<Box<dyn PendingInvocation>> {
            match &self.behavior {
                Behavior::Settle { hash, link } => Ok(Box::new(StubPending {
                    hash: hash.clone(),
                    link: link.clone(),
                    deployed: deploys.then_some(STUB_DEPLOYED_ADDRESS),
                    failure: None,
                })),
                Behavior::FailSubmit(message) => Err(Error::network(message.clone())),
                Behavior::FailWait(message) => Ok(Box::new(StubPending {
                    hash: "0xdead".to_string(),
                    link: String::new(),
                    deployed: None,
                    failure: Some(message.clone()),
                })),
            }
        }
    }

    struct StubPending {
        hash: String,
        link: String,
        deployed: Option<Address>,
        failure: Option<String>,
    }

    #[async_trait]
    impl WalletCapability for StubWallet {
        async fn invoke_contract(
            &self,
            invocation: &ContractInvocation,
        ) -> Result<Box<dyn PendingInvocation>> {
            if let Ok(mut recorded) = self.invocations.lock() {
                recorded.push(invocation.clone());
            }
            self.pending(false)
        }

        async fn deploy_contract(
            &self,
            deployment: &ContractDeployment,
        ) -> Result<Box<dyn PendingInvocation>> {
            if let Ok(mut recorded) = self.deployments.lock() {
                recorded.push(deployment.clone());
            }
            self.pending(true)
        }
    }

    #[async_trait]
    impl PendingInvocation for StubPending {
        fn transaction_hash(&self) -> &str {
            &self.hash
        }

        async fn wait(&mut self) -> Result<SettledInvocation> {
            if let Some(message) = &self.failure {
                return Err(Error::Reverted(message.clone()));
            }
            let settled = SettledInvocation::new(self.hash.clone(), self.link.clone());
            Ok(match self.deployed {
                Some(address) => settled.with_contract_address(address),
                None => settled,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::erc721_collection_abi;

    struct CallOnlyWallet;

    #[async_trait]
    impl WalletCapability for CallOnlyWallet {
        async fn invoke_contract(
            &self,
            _invocation: &ContractInvocation,
        ) -> Result<Box<dyn PendingInvocation>> {
            Err(Error::network("unused"))
        }
    }

    #[tokio::test]
    async fn test_deploy_unsupported_by_default() -> Result<()> {
        let deployment = ContractDeployment::new(vec![0x00], erc721_collection_abi()?);
        let result = CallOnlyWallet.deploy_contract(&deployment).await;
        assert!(matches!(result, Err(Error::NotSupported(_))));
        Ok(())
    }
}
