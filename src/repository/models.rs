use crate::events::SwapKind;
use alloy_primitives::{Address, B256};

/// One persisted swap event row, amounts normalized for the accounting
/// reader.
#[derive(Debug, Clone)]
pub struct SwapRecord {
    pub tx_hash: B256,
    pub kind: SwapKind,
    /// Token contract; None for the chain's native coin.
    pub token_address: Option<Address>,
    pub block_number: u64,
    pub block_time: u64,
    /// Base-unit amount as a decimal string.
    pub amount: String,
    /// Amount divided by 10^decimals, arbitrary precision.
    pub normalized_amount: String,
    pub user: Address,
}
