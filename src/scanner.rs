use crate::classifier::{classify, TxContext};
use crate::config::{ChainConfig, ConfigProvider};
use crate::dedup::ScannedBlocks;
use crate::rpc::{RpcClient, RPC_INTERVAL};
use crate::sink::EventSink;
use alloy::consensus::Transaction as _;
use alloy::consensus::TxReceipt as _;
use alloy::rpc::types::{Block, Transaction, TransactionReceipt};
use anyhow::{bail, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// One scan engine instance, bound to a single chain. The two chain scanners
/// share nothing but the sink's store.
#[derive(Clone)]
pub struct Scanner {
    name: &'static str,
    client: RpcClient,
    config: Arc<ConfigProvider>,
    sink: EventSink,
    scan_receipt: bool,
    start_height: i64,
    end_height: u64,
    stable_height: u64,
    job_count: u64,
    process_block_timeout: Duration,
    chain_id: u64,
}

impl Scanner {
    pub fn new(
        name: &'static str,
        chain: &ChainConfig,
        client: RpcClient,
        config: Arc<ConfigProvider>,
        sink: EventSink,
    ) -> Self {
        Scanner {
            name,
            client,
            config,
            sink,
            scan_receipt: chain.scan_receipt,
            start_height: chain.start_height,
            end_height: chain.end_height,
            stable_height: chain.stable_height,
            job_count: chain.job_count,
            process_block_timeout: chain.block_timeout(),
            chain_id: 0,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        self.chain_id = self.client.loop_get_chain_id().await;
        info!(
            "[{}] scanner ready: gateway {} chain id {} start {} end {} stable {} jobs {} timeout {:?}",
            self.name,
            self.client.gateway(),
            self.chain_id,
            self.start_height,
            self.end_height,
            self.stable_height,
            self.job_count,
            self.process_block_timeout,
        );

        let window_end = if self.end_height > 0 {
            self.end_height
        } else {
            self.client.loop_get_latest_height().await
        };

        if self.start_height != 0 {
            let start = resolve_start_height(self.start_height, window_end);
            self.do_scan_range_job(start, window_end).await?;
        }
        if self.end_height == 0 {
            self.scan_loop(window_end).await;
        }
        Ok(())
    }

    /// Partitions [start, end) across the configured workers. Waits for them
    /// only when the window is bounded; against a live tip they run
    /// concurrently with the tail loop.
    async fn do_scan_range_job(&self, start: u64, end: u64) -> Result<()> {
        info!(
            "[{}] start scan range job from {start} to {end} with {} jobs",
            self.name, self.job_count
        );
        if self.job_count == 0 {
            bail!("zero count jobs specified");
        }
        if start >= end {
            bail!("wrong scan range [{start}, {end})");
        }

        let mut workers = JoinSet::new();
        for (index, (from, to)) in partition_range(start, end, self.job_count)
            .into_iter()
            .enumerate()
        {
            let scanner = self.clone();
            let job = index as u64 + 1;
            workers.spawn(async move { scanner.scan_range(job, from, to).await });
        }
        if self.end_height != 0 {
            while workers.join_next().await.is_some() {}
        } else {
            workers.detach_all();
        }
        Ok(())
    }

    async fn scan_range(&self, job: u64, from: u64, to: u64) {
        info!("[{}][{job}] scan range from {from} to {to}", self.name);
        for height in from..to {
            // Historical replay is explicit; range blocks bypass the cache.
            self.scan_block(job, height, None).await;
        }
        info!("[{}][{job}] scan range finished from {from} to {to}", self.name);
    }

    /// Follows the chain tip forever, rewinding `stable_height` blocks every
    /// pass so reorged-in transactions are re-observed.
    async fn scan_loop(&self, mut from: u64) {
        let stable = self.stable_height;
        let mut cache = ScannedBlocks::default();
        info!("[{}] start scan loop from {from} with stable height {stable}", self.name);
        loop {
            let latest = self.client.loop_get_latest_height().await;
            for height in from..=latest {
                self.scan_block(0, height, Some(&mut cache)).await;
            }
            if from + stable < latest {
                from = latest - stable;
            }
            sleep(RPC_INTERVAL).await;
        }
    }

    async fn scan_block(&self, job: u64, height: u64, cache: Option<&mut ScannedBlocks>) {
        let block = match self.client.get_block(height).await {
            Ok(block) => block,
            Err(e) => {
                warn!("[{}][{job}] get block {height} failed: {e}", self.name);
                return;
            }
        };
        let block_hash = block.header.hash;
        if let Some(cache) = &cache {
            if cache.is_scanned(&block_hash) {
                return;
            }
        }

        let txs = block.transactions.as_transactions().unwrap_or(&[]);
        info!(
            "[{}][{job}] scan block {height} hash {block_hash:?} with {} txs",
            self.name,
            txs.len()
        );

        let deadline = Instant::now() + self.process_block_timeout;
        let mut completed = true;
        for (index, tx) in txs.iter().enumerate() {
            if Instant::now() >= deadline {
                warn!(
                    "[{}][{job}] scan block {height} timed out, {} of {} txs abandoned",
                    self.name,
                    txs.len() - index,
                    txs.len()
                );
                completed = false;
                break;
            }
            debug!("[{}][{job}] scan tx {index} in block {height}", self.name);
            self.scan_transaction(tx, &block).await;
        }
        // Only a full scan earns the dedup entry; an abandoned block must be
        // revisited on the next pass.
        if completed {
            if let Some(cache) = cache {
                cache.add(block_hash);
            }
        }
    }

    async fn scan_transaction(&self, tx: &Transaction, block: &Block) {
        let Some(to) = tx.to() else {
            return; // contract creation
        };
        let ctx = TxContext {
            hash: *tx.inner.tx_hash(),
            from: tx.inner.signer(),
            to,
            value: tx.value(),
            input: tx.input().clone(),
            block_number: block.header.number,
            block_time: block.header.timestamp,
        };

        let mut receipt: Option<TransactionReceipt> = None;
        if self.scan_receipt {
            match self.client.get_receipt(ctx.hash).await {
                Ok(r) => receipt = Some(r),
                Err(e) => {
                    warn!("[{}] get receipt for tx {:?} failed: {e}", self.name, ctx.hash);
                    return;
                }
            }
        }

        // Receipt fetched at most once for dispatcher-indirected tokens, but
        // never leaked into the evidence of tokens that read call-data.
        let mut lazy_receipt: Option<TransactionReceipt> = None;

        let snapshot = self.config.snapshot();
        for token in &snapshot.tokens {
            let receipt_for_token = if receipt.is_some() {
                receipt.as_ref()
            } else if token.call_by_contract.is_some() {
                if lazy_receipt.is_none() {
                    match self.client.get_receipt(ctx.hash).await {
                        Ok(r) => lazy_receipt = Some(r),
                        Err(e) => {
                            warn!(
                                "[{}] get receipt for tx {:?} failed: {e}",
                                self.name, ctx.hash
                            );
                            continue;
                        }
                    }
                }
                lazy_receipt.as_ref()
            } else {
                None
            };
            let logs = receipt_for_token.map(|r| r.inner.logs());

            let classification = classify(&ctx, logs, token);
            if let Some(error) = classification.error {
                debug!("[{}] verify tx {:?} failed: {error}", self.name, ctx.hash);
            }
            match (classification.kind, classification.event) {
                (Some(kind), Some(event)) => self.sink.publish(kind, token, &event),
                _ => {
                    if let Some(error) = classification.error {
                        if !error.is_mundane() {
                            warn!(
                                "[{}] verify swap error for tx {:?}: {error}",
                                self.name, ctx.hash
                            );
                        }
                    }
                }
            }
        }
    }
}

/// Effective start of the range phase: positive heights are absolute,
/// negative ones count back from the window end.
pub(crate) fn resolve_start_height(start_height: i64, window_end: u64) -> u64 {
    if start_height > 0 {
        start_height as u64
    } else {
        window_end.saturating_sub(start_height.unsigned_abs())
    }
}

/// Contiguous equal-width sub-ranges of [start, end); the final one absorbs
/// the remainder. Collapses to a single job when the width rounds to zero.
pub(crate) fn partition_range(start: u64, end: u64, jobs: u64) -> Vec<(u64, u64)> {
    let count = end - start;
    let mut jobs = jobs;
    let mut step = count / jobs;
    if step == 0 {
        jobs = 1;
        step = count;
    }
    (0..jobs)
        .map(|i| {
            let from = start + i * step;
            let to = if i + 1 == jobs { end } else { start + (i + 1) * step };
            (from, to)
        })
        .collect()
}
