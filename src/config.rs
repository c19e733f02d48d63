use alloy_primitives::Address;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::{Duration, SystemTime};
use tracing::{info, warn};

/// How often the reload watcher polls the config file for changes.
pub const CONFIG_RELOAD_INTERVAL: Duration = Duration::from_secs(10);

/// Top-level scan configuration, loaded from the TOML file named by
/// `start --config`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    pub src: ChainConfig,
    pub dst: ChainConfig,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default)]
    pub tokens: Vec<TokenConfig>,
}

fn default_database_url() -> String {
    "bridge-accounting.db".to_string()
}

/// Per-chain driver settings. Fixed at startup; only the token list is
/// hot-reloadable.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    pub gateway: String,

    /// Force receipt-log evidence for every classification on this chain.
    #[serde(default)]
    pub scan_receipt: bool,

    /// 0 skips the historical range phase; positive is an absolute height;
    /// negative is relative to the window end.
    #[serde(default = "default_start_height")]
    pub start_height: i64,

    /// 0 means follow the chain tip forever.
    #[serde(default)]
    pub end_height: u64,

    /// Tail rewind depth; the last `stable_height` blocks are re-observed
    /// every pass.
    #[serde(default)]
    pub stable_height: u64,

    #[serde(default = "default_job_count")]
    pub job_count: u64,

    /// Budget for scanning one block's transactions, in seconds.
    #[serde(default = "default_process_block_timeout")]
    pub process_block_timeout: u64,
}

fn default_start_height() -> i64 {
    -200
}

fn default_job_count() -> u64 {
    1
}

fn default_process_block_timeout() -> u64 {
    300
}

impl ChainConfig {
    pub fn block_timeout(&self) -> Duration {
        Duration::from_secs(self.process_block_timeout)
    }
}

/// One bridged token. Read-only to the scan engine; reloads publish a whole
/// new snapshot instead of mutating entries in place.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    /// Token contract on this chain; absent for the native coin.
    #[serde(default)]
    pub token_address: Option<Address>,

    /// Bridge-controlled account: deposits flow to it, mints and redemptions
    /// flow from it.
    pub deposit_address: Address,

    /// Dispatcher contract when the bridge call is indirected; forces
    /// receipt-log evidence for this token.
    #[serde(default)]
    pub call_by_contract: Option<Address>,

    /// Source-chain token (Deposit/Redeemed) vs destination-chain token
    /// (Mint/Burn).
    #[serde(default)]
    pub is_src_token: bool,

    pub decimals: u8,
}

impl TokenConfig {
    pub fn is_native_token(&self) -> bool {
        self.token_address.is_none()
    }

    /// The address compared against `tx.to`: the dispatcher when calls are
    /// indirected, otherwise the token contract itself.
    pub fn effective_contract(&self) -> Option<Address> {
        self.call_by_contract.or(self.token_address)
    }
}

impl ScanConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: ScanConfig = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (name, chain) in [("src", &self.src), ("dst", &self.dst)] {
            if chain.gateway.is_empty() {
                bail!("{name}: gateway must be set");
            }
            if chain.job_count == 0 {
                bail!("{name}: job_count must be at least 1");
            }
        }
        for token in &self.tokens {
            if token.is_native_token() && token.call_by_contract.is_some() {
                bail!(
                    "token with deposit address {:?}: call_by_contract requires a token contract",
                    token.deposit_address
                );
            }
        }
        Ok(())
    }
}

/// Owns the current config snapshot and republishes it when the file on disk
/// changes. Scanners read tokens through `snapshot()` on every transaction,
/// so a reload takes effect without restarting them.
pub struct ConfigProvider {
    path: PathBuf,
    current: RwLock<Arc<ScanConfig>>,
}

impl ConfigProvider {
    pub fn load(path: impl Into<PathBuf>) -> Result<Arc<Self>> {
        let path = path.into();
        let config = ScanConfig::load(&path)?;
        Ok(Arc::new(Self {
            path,
            current: RwLock::new(Arc::new(config)),
        }))
    }

    pub fn snapshot(&self) -> Arc<ScanConfig> {
        self.current.read().expect("config lock poisoned").clone()
    }

    /// Polls the config file and swaps in a fresh snapshot when its mtime
    /// moves. A snapshot that fails to parse or validate is discarded and the
    /// previous one stays live.
    pub fn spawn_reload_watcher(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut last_modified = self.modified_time();
            loop {
                tokio::time::sleep(CONFIG_RELOAD_INTERVAL).await;
                let modified = self.modified_time();
                if modified == last_modified {
                    continue;
                }
                last_modified = modified;
                match ScanConfig::load(&self.path) {
                    Ok(config) => {
                        *self.current.write().expect("config lock poisoned") = Arc::new(config);
                        info!("Reloaded scan config from {}", self.path.display());
                    }
                    Err(e) => {
                        warn!("Config reload failed, keeping previous snapshot: {e:#}");
                    }
                }
            }
        })
    }

    fn modified_time(&self) -> Option<SystemTime> {
        std::fs::metadata(&self.path).and_then(|m| m.modified()).ok()
    }
}
