use std::fmt;

use alloy_primitives::{b256, Address, B256, U256};

// Deposit and Redeemed entry points (plain ERC20 moves into/out of the
// deposit address).
pub const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb]; // transfer(address,uint256)
pub const TRANSFER_FROM_SELECTOR: [u8; 4] = [0x23, 0xb8, 0x72, 0xdd]; // transferFrom(address,address,uint256)

// Mint entry point on the destination chain.
pub const SWAPIN_SELECTOR: [u8; 4] = [0xec, 0x12, 0x6c, 0x77]; // Swapin(bytes32,address,uint256)

// Burn entry points; the string variant carries BTC-like addresses.
pub const ADDRESS_SWAPOUT_SELECTOR: [u8; 4] = [0x62, 0x8d, 0x6c, 0xba]; // Swapout(uint256,address)
pub const STRING_SWAPOUT_SELECTOR: [u8; 4] = [0xad, 0x54, 0x05, 0x6d]; // Swapout(uint256,string)

/// ERC20 Transfer, matched for Deposit and Redeemed receipts.
pub const TRANSFER_TOPIC: B256 =
    b256!("ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef");

/// LogSwapin, matched for Mint receipts.
pub const SWAPIN_TOPIC: B256 =
    b256!("05d0634fe981be85c22e2942a880821b70095d84e152c3ea3c17a4e4250d9d61");

/// LogSwapout variants, matched for Burn receipts.
pub const ADDRESS_SWAPOUT_TOPIC: B256 =
    b256!("6b616089d04950dc06c45c6dd787d657980543f89651aec47924752c7d16c888");
pub const STRING_SWAPOUT_TOPIC: B256 =
    b256!("9c92ad817e5474d30a4378deface765150479363a897b0590fbb12ae9d89396b");

/// The four bridge event kinds a transaction can be classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapKind {
    Deposit,
    Mint,
    Burn,
    Redeemed,
}

impl SwapKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapKind::Deposit => "Deposit",
            SwapKind::Mint => "Mint",
            SwapKind::Burn => "Burn",
            SwapKind::Redeemed => "Redeemed",
        }
    }
}

impl fmt::Display for SwapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observed bridge event, as assembled by the classifier.
///
/// `block_time` is the header time of `block_number`. `amount` is in base
/// units; the sink normalizes it against the token's decimals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapEvent {
    pub tx_hash: B256,
    pub block_number: u64,
    pub block_time: u64,
    pub amount: U256,
    pub user: Address,
}

/// The 32-byte word at `offset`, right-padded with zeros when the input is
/// short. Truncated call-data must not panic the scanner.
pub fn word_at(input: &[u8], offset: usize) -> [u8; 32] {
    let mut word = [0u8; 32];
    let start = offset.min(input.len());
    let end = (offset + 32).min(input.len());
    word[..end - start].copy_from_slice(&input[start..end]);
    word
}

/// The address packed into the low 20 bytes of an ABI word or log topic.
pub fn address_from_word(word: &[u8; 32]) -> Address {
    Address::from_slice(&word[12..])
}

pub fn u256_from_word(word: &[u8; 32]) -> U256 {
    U256::from_be_bytes(*word)
}
