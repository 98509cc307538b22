//! Submission of invocations through a wallet capability
//!
//! [`Dispatcher`] is the single path from a built [`ContractInvocation`] or
//! [`ContractDeployment`] to a settled transaction. It submits, waits, and logs the outcome. Failures are
//! returned unchanged after being classified in the log as transient or
//! terminal; nothing is retried here.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, instrument, warn};

#[cfg(feature = "metrics")]
use crate::metrics::InvocationMetrics;

use crate::error::Result;
use crate::types::{ContractDeployment, ContractInvocation, SettledInvocation};
use crate::wallet::WalletCapability;

/// Metrics label for contract creations
pub const DEPLOY_LABEL: &str = "deploy";

/// Submits invocations and waits for them to settle
#[derive(Clone)]
pub struct Dispatcher {
    wallet: Arc<dyn WalletCapability>,
    #[cfg(feature = "metrics")]
    metrics: Option<InvocationMetrics>,
}

impl Dispatcher {
    /// Create a dispatcher over a wallet capability
    pub fn new(wallet: Arc<dyn WalletCapability>) -> Self {
        Self {
            wallet,
            #[cfg(feature = "metrics")]
            metrics: None,
        }
    }

    /// Record invocation metrics
    #[cfg(feature = "metrics")]
    pub fn with_metrics(mut self, metrics: InvocationMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Submit an invocation and wait for it to settle
    #[instrument(
        skip_all,
        fields(
            invocation_id = %invocation.id,
            method = %invocation.method,
            contract = %invocation.contract_address
        )
    )]
    pub async fn submit(&self, invocation: ContractInvocation) -> Result<SettledInvocation> {
        let started = Instant::now();
        let outcome = async {
            let mut pending = self.wallet.invoke_contract(&invocation).await?;
            debug!(tx_hash = %pending.transaction_hash(), "waiting for settlement");
            pending.wait().await
        }
        .await;

        self.finish(invocation.method.abi_name(), started.elapsed(), outcome)
    }

    /// Submit a contract creation and wait for it to settle
    #[instrument(skip_all, fields(deployment_id = %deployment.id))]
    pub async fn deploy(&self, deployment: ContractDeployment) -> Result<SettledInvocation> {
        let started = Instant::now();
        let outcome = async {
            let mut pending = self.wallet.deploy_contract(&deployment).await?;
            debug!(tx_hash = %pending.transaction_hash(), "waiting for deployment");
            pending.wait().await
        }
        .await;

        self.finish(DEPLOY_LABEL, started.elapsed(), outcome)
    }

    fn finish(
        &self,
        label: &str,
        elapsed: Duration,
        outcome: Result<SettledInvocation>,
    ) -> Result<SettledInvocation> {
        match &outcome {
            Ok(settled) => info!(
                tx_hash = %settled.transaction_hash,
                elapsed_ms = elapsed.as_millis() as u64,
                "invocation settled"
            ),
            Err(err) if err.is_recoverable() => warn!(
                retryable = true,
                error = %err,
                "invocation failed with a transient error"
            ),
            Err(err) => error!(
                retryable = false,
                error = %err,
                "invocation failed"
            ),
        }

        self.record_metrics(label, outcome.is_ok(), elapsed);
        outcome
    }

    #[cfg(feature = "metrics")]
    fn record_metrics(&self, label: &str, succeeded: bool, elapsed: Duration) {
        if let Some(metrics) = &self.metrics {
            metrics.record(label, succeeded, elapsed);
        }
    }

    #[cfg(not(feature = "metrics"))]
    fn record_metrics(&self, _label: &str, _succeeded: bool, _elapsed: Duration) {}
}
