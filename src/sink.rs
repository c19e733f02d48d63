use crate::config::TokenConfig;
use crate::events::{SwapEvent, SwapKind};
use crate::repository::{SwapRecord, SwapStore};
use alloy_primitives::utils::format_units;
use alloy_primitives::U256;
use std::sync::Arc;
use tracing::{debug, warn};

/// Adapter between the classifier and the persistence contract.
#[derive(Clone)]
pub struct EventSink {
    store: Arc<dyn SwapStore>,
}

impl EventSink {
    pub fn new(store: Arc<dyn SwapStore>) -> Self {
        Self { store }
    }

    /// Persists one classified event. A duplicate insert counts as success:
    /// range overlap, the tail's stable-height rewind and cache eviction all
    /// re-deliver transactions, and the store's uniqueness on
    /// (tx_hash, event_type) is the authoritative dedup. Other store errors
    /// are logged and dropped; the next pass re-observes the tx.
    pub fn publish(&self, kind: SwapKind, token: &TokenConfig, event: &SwapEvent) {
        let record = to_record(kind, token, event);
        let result = match kind {
            SwapKind::Deposit => self.store.add_deposit(token, &record),
            SwapKind::Mint => self.store.add_mint(token, &record),
            SwapKind::Burn => self.store.add_burn(token, &record),
            SwapKind::Redeemed => self.store.add_redeemed(token, &record),
        };
        match result {
            Ok(()) => debug!("Recorded {kind} event for tx {:?}", event.tx_hash),
            Err(e) if e.is_duplicate() => {
                debug!("{kind} event for tx {:?} already recorded", event.tx_hash)
            }
            Err(e) => warn!("Add {kind} event failed for tx {:?}: {e}", event.tx_hash),
        }
    }
}

fn to_record(kind: SwapKind, token: &TokenConfig, event: &SwapEvent) -> SwapRecord {
    SwapRecord {
        tx_hash: event.tx_hash,
        kind,
        token_address: token.token_address,
        block_number: event.block_number,
        block_time: event.block_time,
        amount: event.amount.to_string(),
        normalized_amount: normalize_amount(event.amount, token.decimals),
        user: event.user,
    }
}

/// Base-unit amount scaled down by the token's decimals, arbitrary precision.
pub fn normalize_amount(amount: U256, decimals: u8) -> String {
    format_units(amount, decimals).unwrap_or_else(|_| amount.to_string())
}
