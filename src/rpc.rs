use alloy::providers::fillers::FillProvider;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{Block, BlockNumberOrTag, TransactionReceipt};
use alloy_primitives::B256;
use anyhow::{anyhow, Result};
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tokio_retry::strategy::FixedInterval;
use tokio_retry::Retry;
use tracing::{info, warn};

type AlloyFullProvider = FillProvider<
    alloy::providers::fillers::JoinFill<
        alloy::providers::Identity,
        alloy::providers::fillers::JoinFill<
            alloy::providers::fillers::GasFiller,
            alloy::providers::fillers::JoinFill<
                alloy::providers::fillers::BlobGasFiller,
                alloy::providers::fillers::JoinFill<
                    alloy::providers::fillers::NonceFiller,
                    alloy::providers::fillers::ChainIdFiller,
                >,
            >,
        >,
    >,
    alloy::providers::RootProvider,
>;

/// Pause between RPC attempts and between tail-loop passes.
pub const RPC_INTERVAL: Duration = Duration::from_secs(1);

/// Attempts for block and receipt fetches before giving the height up for
/// this pass.
pub const RPC_RETRY_COUNT: usize = 5;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120); // 2 minutes timeout per request

/// Marker some gateway proxies embed in their read-timeout errors; callers
/// tuning backoff can match on it. The retry loops here treat timeouts and
/// transport failures alike.
pub const HTTP_TIMEOUT_KEYWORD: &str = "Client.Timeout exceeded while awaiting headers";

/// Thin gateway client. Block and receipt fetches retry a bounded number of
/// times and surface the last error; height and chain-id polls retry until
/// the gateway answers.
#[derive(Clone)]
pub struct RpcClient {
    provider: AlloyFullProvider,
    gateway: String,
}

impl RpcClient {
    pub fn new(gateway: &str) -> Result<Self> {
        let url = gateway
            .parse()
            .map_err(|_| anyhow!("Invalid RPC gateway URL: {}", gateway))?;
        let provider: AlloyFullProvider = ProviderBuilder::new().connect_http(url);

        Ok(RpcClient {
            provider,
            gateway: gateway.to_string(),
        })
    }

    pub fn gateway(&self) -> &str {
        &self.gateway
    }

    fn retry_strategy(&self) -> impl Iterator<Item = Duration> {
        FixedInterval::new(RPC_INTERVAL).take(RPC_RETRY_COUNT - 1)
    }

    /// Latest block height, retried until success.
    pub async fn loop_get_latest_height(&self) -> u64 {
        loop {
            match timeout(REQUEST_TIMEOUT, self.provider.get_block_number()).await {
                Ok(Ok(height)) => return height,
                Ok(Err(e)) => {
                    warn!("Get latest block number failed on {}: {e}", self.gateway)
                }
                Err(_) => warn!(
                    "Get latest block number timed out after {}s on {}",
                    REQUEST_TIMEOUT.as_secs(),
                    self.gateway
                ),
            }
            sleep(RPC_INTERVAL).await;
        }
    }

    /// The chain id from `eth_chainId`, retried until success.
    pub async fn loop_get_chain_id(&self) -> u64 {
        loop {
            match timeout(REQUEST_TIMEOUT, self.provider.get_chain_id()).await {
                Ok(Ok(chain_id)) => {
                    info!("Connected to {} with chain id {chain_id}", self.gateway);
                    return chain_id;
                }
                Ok(Err(e)) => warn!("Get chain id failed on {}: {e}", self.gateway),
                Err(_) => warn!(
                    "Get chain id timed out after {}s on {}",
                    REQUEST_TIMEOUT.as_secs(),
                    self.gateway
                ),
            }
            sleep(RPC_INTERVAL).await;
        }
    }

    /// Block with full transaction bodies.
    pub async fn get_block(&self, height: u64) -> Result<Block> {
        let client = self.clone();
        Retry::spawn(self.retry_strategy(), move || {
            let client = client.clone();
            async move {
                let request = client
                    .provider
                    .get_block_by_number(BlockNumberOrTag::Number(height))
                    .full();
                match timeout(REQUEST_TIMEOUT, request).await {
                    Ok(Ok(Some(block))) => Ok(block),
                    Ok(Ok(None)) => Err(anyhow!("block {height} not found")),
                    Ok(Err(e)) => {
                        warn!("Get block {height} failed on {}: {e}", client.gateway);
                        Err(anyhow!("{e}"))
                    }
                    Err(_) => Err(anyhow!(
                        "get block {height} timed out after {}s",
                        REQUEST_TIMEOUT.as_secs()
                    )),
                }
            }
        })
        .await
    }

    pub async fn get_receipt(&self, tx_hash: B256) -> Result<TransactionReceipt> {
        let client = self.clone();
        Retry::spawn(self.retry_strategy(), move || {
            let client = client.clone();
            async move {
                match timeout(REQUEST_TIMEOUT, client.provider.get_transaction_receipt(tx_hash))
                    .await
                {
                    Ok(Ok(Some(receipt))) => Ok(receipt),
                    Ok(Ok(None)) => Err(anyhow!("receipt for tx {tx_hash:?} not found")),
                    Ok(Err(e)) => {
                        warn!(
                            "Get receipt for tx {tx_hash:?} failed on {}: {e}",
                            client.gateway
                        );
                        Err(anyhow!("{e}"))
                    }
                    Err(_) => Err(anyhow!(
                        "get receipt for tx {tx_hash:?} timed out after {}s",
                        REQUEST_TIMEOUT.as_secs()
                    )),
                }
            }
        })
        .await
    }
}
