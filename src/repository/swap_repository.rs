use super::database::Database;
use super::models::SwapRecord;
use crate::config::TokenConfig;
use rusqlite::{params, ErrorCode};
use thiserror::Error;

/// Substring every duplicate-insert error carries. The legacy mongo backend
/// spelled the full error "mgoError: Item is duplicate"; sinks fronting a
/// foreign store match on this keyword instead of the typed variant.
pub const DUPLICATE_KEYWORD: &str = "Item is duplicate";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Item is duplicate")]
    Duplicate,
    #[error(transparent)]
    Backend(#[from] rusqlite::Error),
}

impl StoreError {
    /// True for the typed duplicate as well as any backend error that only
    /// speaks the legacy keyword.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, StoreError::Duplicate) || self.to_string().contains(DUPLICATE_KEYWORD)
    }
}

/// Write side of the persistence contract. Implementations must be safe for
/// concurrent calls and unique on (tx_hash, event_type); a duplicate insert
/// must fail with an error for which `is_duplicate()` holds.
pub trait SwapStore: Send + Sync {
    fn add_deposit(&self, token: &TokenConfig, record: &SwapRecord) -> Result<(), StoreError>;
    fn add_mint(&self, token: &TokenConfig, record: &SwapRecord) -> Result<(), StoreError>;
    fn add_burn(&self, token: &TokenConfig, record: &SwapRecord) -> Result<(), StoreError>;
    fn add_redeemed(&self, token: &TokenConfig, record: &SwapRecord) -> Result<(), StoreError>;
}

pub struct SwapRepository {
    db: Database,
}

impl SwapRepository {
    const INSERT_EVENT: &'static str = "INSERT INTO swap_events (
            tx_hash, event_type, token_address, block_number,
            block_time, amount, normalized_amount, user_address
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn insert(&self, record: &SwapRecord) -> Result<(), StoreError> {
        let conn = self.db.conn();
        conn.execute(
            Self::INSERT_EVENT,
            params![
                format!("{:?}", record.tx_hash),
                record.kind.as_str(),
                record.token_address.map(|address| format!("{address:?}")),
                record.block_number,
                record.block_time,
                record.amount,
                record.normalized_amount,
                format!("{:?}", record.user),
            ],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(failure, _)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                StoreError::Duplicate
            }
            other => StoreError::Backend(other),
        })?;
        Ok(())
    }
}

impl SwapStore for SwapRepository {
    fn add_deposit(&self, _token: &TokenConfig, record: &SwapRecord) -> Result<(), StoreError> {
        self.insert(record)
    }

    fn add_mint(&self, _token: &TokenConfig, record: &SwapRecord) -> Result<(), StoreError> {
        self.insert(record)
    }

    fn add_burn(&self, _token: &TokenConfig, record: &SwapRecord) -> Result<(), StoreError> {
        self.insert(record)
    }

    fn add_redeemed(&self, _token: &TokenConfig, record: &SwapRecord) -> Result<(), StoreError> {
        self.insert(record)
    }
}
