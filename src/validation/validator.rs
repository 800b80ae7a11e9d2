use super::checks::{check_status, check_tip, check_version, CheckOutcome};
use super::reconcile::Reconciliation;
use crate::{
    chain::{ChainClient, ChainError, MinipoolReader},
    ratelimit::{FixedInterval, RateLimiter, Unlimited},
    high_balance_threshold, MinipoolField, PreflightError, PreflightSummary, ValidationRequest,
};
use ethers::types::Address;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

pub struct PreflightValidator<C> {
    client: C,
    limiter: Arc<dyn RateLimiter>,
}

/// Pacing and abort signal for a single run
struct RunContext<'a> {
    limiter: &'a dyn RateLimiter,
    cancel: &'a CancellationToken,
}

impl<C: ChainClient> PreflightValidator<C> {
    /// Creates a validator with a fallback rate limiter
    ///
    /// `limiter` paces runs whose request has `rate_limit_ms == 0`; a non-zero
    /// `rate_limit_ms` always wins for that run.
    pub fn new(client: C, limiter: Arc<dyn RateLimiter>) -> Self {
        Self { client, limiter }
    }

    /// Validator paced only by each request's `rate_limit_ms`
    pub fn unpaced(client: C) -> Self {
        Self::new(client, Arc::new(Unlimited))
    }

    /// Validate a request before the arbitrage flow runs
    ///
    /// Minipools are checked one at a time, in order. The first failing
    /// minipool aborts the run. On success the resolved node address is
    /// written to `request.node_address`; on failure the request is left
    /// untouched.
    #[instrument(name = "verify_inputs", skip_all, fields(minipools = request.minipools.len()))]
    pub async fn validate(
        &self,
        request: &mut ValidationRequest,
        cancel: &CancellationToken,
    ) -> Result<PreflightSummary, PreflightError> {
        check_tip(request.tip_override.as_ref())?;

        let fixed;
        let limiter: &dyn RateLimiter = if request.rate_limit_ms > 0 {
            fixed = FixedInterval::from_millis(request.rate_limit_ms);
            &fixed
        } else {
            self.limiter.as_ref()
        };
        let run = RunContext { limiter, cancel };

        let mut state = Reconciliation::new(request.node_address);
        debug!("Owner mode {:?}, rate limit {}ms", state.mode(), request.rate_limit_ms);

        for &pool in &request.minipools {
            state = self.check_minipool(pool, state, &run).await?;
        }

        request.node_address = state.accepted();
        info!(
            "Pre-flight validation passed for {} minipools, node address {:?}",
            request.minipools.len(),
            state.accepted()
        );

        Ok(PreflightSummary {
            node_address: state.accepted(),
            mode: state.mode(),
            minipools_checked: request.minipools.len(),
        })
    }

    /// Run every check on one minipool and return the updated reconciliation
    async fn check_minipool(
        &self,
        pool: Address,
        mut state: Reconciliation,
        run: &RunContext<'_>,
    ) -> Result<Reconciliation, PreflightError> {
        let minipool = CheckOutcome::hard(self.client.bind_minipool(pool), |source| {
            PreflightError::Binding { pool, source }
        })
        .resolve_hard(pool)?;

        // 1. Delegate version
        let version = self
            .read_field(pool, MinipoolField::Version, run, minipool.version())
            .await
            .resolve_hard(pool)?;
        debug!(minipool = ?pool, version, "minipool version");
        check_version(pool, version)?;

        // 2. Lifecycle status
        let status = self
            .read_field(pool, MinipoolField::Status, run, minipool.status())
            .await
            .resolve_hard(pool)?;
        debug!(minipool = ?pool, status, "minipool status");
        check_status(pool, status)?;

        // 3. Node address, only when discovering
        let mut observed = None;
        if state.reads_every_owner() {
            let node_address = self
                .read_field(pool, MinipoolField::NodeAddress, run, minipool.node_address())
                .await
                .resolve_hard(pool)?;
            debug!(minipool = ?pool, node_address = ?node_address, "minipool node address");
            state = state.observe(pool, node_address)?;
            observed = Some(node_address);
        }

        // 4. Balance is advisory: a failed read skips the high balance check
        let balance = match self.read(run, self.client.balance_of(pool)).await {
            Ok(result) => CheckOutcome::soft(result, MinipoolField::Balance),
            Err(cancelled) => CheckOutcome::HardFail(cancelled),
        };
        let Some(balance) = balance.resolve(pool)? else {
            return Ok(state);
        };
        debug!(minipool = ?pool, %balance, "minipool balance");

        // 5. Over-threshold minipools can only be finalized by their node operator
        if balance > high_balance_threshold() {
            let node_address = match observed {
                Some(node_address) => node_address,
                None => self
                    .read_field(pool, MinipoolField::NodeAddress, run, minipool.node_address())
                    .await
                    .resolve_hard(pool)?,
            };
            state = state.confirm_high_balance(pool, node_address, balance)?;
        }

        Ok(state)
    }

    /// Read a minipool field whose failure aborts the run
    async fn read_field<T, F>(
        &self,
        pool: Address,
        field: MinipoolField,
        run: &RunContext<'_>,
        call: F,
    ) -> CheckOutcome<T>
    where
        F: Future<Output = Result<T, ChainError>>,
    {
        match self.read(run, call).await {
            Ok(result) => CheckOutcome::hard(result, |source| PreflightError::ReadFailed {
                pool,
                field,
                source,
            }),
            Err(cancelled) => CheckOutcome::HardFail(cancelled),
        }
    }

    /// Issue one remote read, then pause if it succeeded
    ///
    /// The outer error is cancellation only; the inner result is the read itself.
    async fn read<T, F>(
        &self,
        run: &RunContext<'_>,
        call: F,
    ) -> Result<Result<T, ChainError>, PreflightError>
    where
        F: Future<Output = Result<T, ChainError>>,
    {
        if run.cancel.is_cancelled() {
            return Err(PreflightError::Cancelled);
        }

        let result = tokio::select! {
            biased;
            _ = run.cancel.cancelled() => return Err(PreflightError::Cancelled),
            result = call => result,
        };

        if result.is_ok() {
            tokio::select! {
                biased;
                _ = run.cancel.cancelled() => return Err(PreflightError::Cancelled),
                _ = run.limiter.pause() => {}
            }
        }

        Ok(result)
    }
}
