use crate::config::TokenConfig;
use crate::events::{
    address_from_word, u256_from_word, word_at, SwapEvent, SwapKind, ADDRESS_SWAPOUT_SELECTOR,
    ADDRESS_SWAPOUT_TOPIC, STRING_SWAPOUT_SELECTOR, STRING_SWAPOUT_TOPIC, SWAPIN_SELECTOR,
    SWAPIN_TOPIC, TRANSFER_FROM_SELECTOR, TRANSFER_SELECTOR, TRANSFER_TOPIC,
};
use alloy::rpc::types::Log;
use alloy_primitives::{Address, Bytes, B256, U256};
use thiserror::Error;

/// Verification failures raised while matching a transaction against one
/// token. Most are carried alongside the assembled event and persisted
/// anyway; only a wrong receiver suppresses the event entirely.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum VerifyError {
    #[error("tx input shorter than a function selector")]
    WrongInput,
    #[error("tx function selector mismatch")]
    FuncHashMismatch,
    #[error("tx receiver is not the deposit address")]
    WrongReceiver,
    #[error("log emitted by an unexpected contract")]
    WrongContract,
    #[error("no deposit log found in receipt")]
    DepositLogNotFound,
    #[error("no swapout log found in receipt")]
    SwapoutLogNotFound,
    #[error("transaction not found")]
    TxNotFound,
}

impl VerifyError {
    /// Mundane kinds occur on every unrelated transfer; anything else is
    /// worth a second log line.
    pub fn is_mundane(&self) -> bool {
        matches!(
            self,
            VerifyError::FuncHashMismatch
                | VerifyError::WrongReceiver
                | VerifyError::WrongContract
                | VerifyError::TxNotFound
        )
    }
}

/// The transaction view the classifier consumes, assembled by the scanner
/// from the block body. `from` is the EIP-155 recovered sender. Contract
/// creations (`to == null`) are dropped before this point.
#[derive(Debug, Clone)]
pub struct TxContext {
    pub hash: B256,
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub input: Bytes,
    pub block_number: u64,
    pub block_time: u64,
}

impl TxContext {
    fn event(&self, amount: U256, user: Address) -> SwapEvent {
        SwapEvent {
            tx_hash: self.hash,
            block_number: self.block_number,
            block_time: self.block_time,
            amount,
            user,
        }
    }

    fn empty_event(&self) -> SwapEvent {
        self.event(U256::ZERO, Address::ZERO)
    }
}

/// Outcome of classifying one (tx, token) pair. `kind == None` means the
/// transaction is not a bridge event for this token.
#[derive(Debug, Clone)]
pub struct Classification {
    pub kind: Option<SwapKind>,
    pub event: Option<SwapEvent>,
    pub error: Option<VerifyError>,
}

impl Classification {
    fn null() -> Self {
        Self {
            kind: None,
            event: None,
            error: None,
        }
    }

    fn suppressed(error: VerifyError) -> Self {
        Self {
            kind: None,
            event: None,
            error: Some(error),
        }
    }

    fn found(kind: SwapKind, event: SwapEvent, error: Option<VerifyError>) -> Self {
        Self {
            kind: Some(kind),
            event: Some(event),
            error,
        }
    }
}

/// Decides which bridge event, if any, `tx` represents for `token`.
///
/// Evidence is the call-data when `logs` is `None` and the receipt logs
/// otherwise; the scanner supplies logs when the chain-wide receipt flag or
/// the token's dispatcher indirection calls for them.
pub fn classify(tx: &TxContext, logs: Option<&[Log]>, token: &TokenConfig) -> Classification {
    let deposit_address = token.deposit_address;

    if token.is_src_token {
        // Source chain: Deposit or Redeemed.
        if token.is_native_token() {
            if tx.to == deposit_address {
                return Classification::found(SwapKind::Deposit, tx.event(tx.value, tx.from), None);
            }
            if tx.from == deposit_address {
                return Classification::found(SwapKind::Redeemed, tx.event(tx.value, tx.to), None);
            }
            return Classification::null();
        }

        let Some(contract) = token.effective_contract() else {
            return Classification::null();
        };
        if tx.to != contract {
            return Classification::null();
        }

        if tx.from != deposit_address {
            let (event, error) = verify_erc20_deposit(tx, logs, token);
            if error == Some(VerifyError::WrongReceiver) {
                return Classification::suppressed(VerifyError::WrongReceiver);
            }
            return Classification::found(SwapKind::Deposit, event, error);
        }
        let (event, error) = verify_erc20_redeem(tx, logs, token);
        return Classification::found(SwapKind::Redeemed, event, error);
    }

    // Destination chain: Mint from the deposit address, Burn from anyone else.
    let Some(contract) = token.effective_contract() else {
        return Classification::null();
    };
    if tx.to != contract {
        return Classification::null();
    }

    if tx.from == deposit_address {
        let (event, error) = verify_mint(tx, logs, token);
        return Classification::found(SwapKind::Mint, event, error);
    }
    let (event, error) = verify_swapout(tx, logs, token);
    if error == Some(VerifyError::WrongReceiver) {
        return Classification::suppressed(VerifyError::WrongReceiver);
    }
    Classification::found(SwapKind::Burn, event, error)
}

fn verify_erc20_deposit(
    tx: &TxContext,
    logs: Option<&[Log]>,
    token: &TokenConfig,
) -> (SwapEvent, Option<VerifyError>) {
    let mut event = tx.empty_event();
    let error = match logs {
        None => parse_erc20_deposit_input(tx, token.deposit_address, &mut event),
        Some(logs) => parse_erc20_deposit_logs(logs, token, &mut event),
    };
    (event, error)
}

fn verify_erc20_redeem(
    tx: &TxContext,
    logs: Option<&[Log]>,
    token: &TokenConfig,
) -> (SwapEvent, Option<VerifyError>) {
    let mut event = tx.empty_event();
    let error = match logs {
        None => parse_erc20_redeem_input(tx, &mut event),
        Some(logs) => parse_erc20_redeem_logs(logs, token, &mut event),
    };
    (event, error)
}

fn verify_mint(
    tx: &TxContext,
    logs: Option<&[Log]>,
    token: &TokenConfig,
) -> (SwapEvent, Option<VerifyError>) {
    let mut event = tx.empty_event();
    let error = match logs {
        None => parse_mint_input(tx, &mut event),
        Some(logs) => parse_mint_logs(logs, token, &mut event),
    };
    (event, error)
}

fn verify_swapout(
    tx: &TxContext,
    logs: Option<&[Log]>,
    token: &TokenConfig,
) -> (SwapEvent, Option<VerifyError>) {
    let mut event = tx.empty_event();
    // The burner signed the tx; the call arguments only name the redemption
    // target on the other chain.
    event.user = tx.from;
    let error = match logs {
        None => parse_swapout_input(tx, &mut event),
        Some(logs) => parse_swapout_logs(logs, token, &mut event),
    };
    (event, error)
}

fn parse_erc20_deposit_input(
    tx: &TxContext,
    deposit_address: Address,
    event: &mut SwapEvent,
) -> Option<VerifyError> {
    let input = tx.input.as_ref();
    if input.len() < 4 {
        return Some(VerifyError::WrongInput);
    }
    let (receiver, amount, sender) = if input[..4] == TRANSFER_SELECTOR {
        (
            address_from_word(&word_at(input, 4)),
            u256_from_word(&word_at(input, 36)),
            tx.from,
        )
    } else if input[..4] == TRANSFER_FROM_SELECTOR {
        (
            address_from_word(&word_at(input, 36)),
            u256_from_word(&word_at(input, 68)),
            address_from_word(&word_at(input, 4)),
        )
    } else {
        return Some(VerifyError::FuncHashMismatch);
    };
    if receiver != deposit_address {
        return Some(VerifyError::WrongReceiver);
    }
    event.amount = amount;
    event.user = sender;
    None
}

fn parse_erc20_deposit_logs(
    logs: &[Log],
    token: &TokenConfig,
    event: &mut SwapEvent,
) -> Option<VerifyError> {
    let Some(token_address) = token.token_address else {
        return Some(VerifyError::DepositLogNotFound);
    };
    for log in logs {
        if log.removed || log.address() != token_address {
            continue;
        }
        let topics = log.topics();
        if topics.len() != 3 || log.data().data.is_empty() {
            continue;
        }
        if topics[0] != TRANSFER_TOPIC {
            continue;
        }
        let receiver = address_from_word(&topics[2].0);
        if receiver != token.deposit_address {
            return Some(VerifyError::WrongReceiver);
        }
        event.amount = u256_from_word(&word_at(log.data().data.as_ref(), 0));
        event.user = address_from_word(&topics[1].0);
        return None;
    }
    Some(VerifyError::DepositLogNotFound)
}

fn parse_erc20_redeem_input(tx: &TxContext, event: &mut SwapEvent) -> Option<VerifyError> {
    let input = tx.input.as_ref();
    if input.len() < 4 {
        return Some(VerifyError::WrongInput);
    }
    // Same selectors as a deposit, but the decoded receiver IS the user and
    // is not matched against the deposit address.
    let (receiver, amount) = if input[..4] == TRANSFER_SELECTOR {
        (
            address_from_word(&word_at(input, 4)),
            u256_from_word(&word_at(input, 36)),
        )
    } else if input[..4] == TRANSFER_FROM_SELECTOR {
        (
            address_from_word(&word_at(input, 36)),
            u256_from_word(&word_at(input, 68)),
        )
    } else {
        return Some(VerifyError::FuncHashMismatch);
    };
    event.user = receiver;
    event.amount = amount;
    None
}

fn parse_erc20_redeem_logs(
    logs: &[Log],
    token: &TokenConfig,
    event: &mut SwapEvent,
) -> Option<VerifyError> {
    let Some(token_address) = token.token_address else {
        return Some(VerifyError::DepositLogNotFound);
    };
    for log in logs {
        if log.removed || log.address() != token_address {
            continue;
        }
        let topics = log.topics();
        if topics.len() != 3 || log.data().data.is_empty() {
            continue;
        }
        if topics[0] != TRANSFER_TOPIC {
            continue;
        }
        event.user = address_from_word(&topics[2].0);
        event.amount = u256_from_word(&word_at(log.data().data.as_ref(), 0));
        return None;
    }
    Some(VerifyError::DepositLogNotFound)
}

fn parse_mint_input(tx: &TxContext, event: &mut SwapEvent) -> Option<VerifyError> {
    let input = tx.input.as_ref();
    if input.len() < 4 {
        return Some(VerifyError::WrongInput);
    }
    if input[..4] != SWAPIN_SELECTOR {
        return Some(VerifyError::FuncHashMismatch);
    }
    // Swapin(bytes32 txhash, address account, uint256 amount)
    event.user = address_from_word(&word_at(input, 36));
    event.amount = u256_from_word(&word_at(input, 68));
    None
}

fn parse_mint_logs(logs: &[Log], token: &TokenConfig, event: &mut SwapEvent) -> Option<VerifyError> {
    let Some(token_address) = token.token_address else {
        return Some(VerifyError::SwapoutLogNotFound);
    };
    for log in logs {
        if log.removed || log.address() != token_address {
            continue;
        }
        let topics = log.topics();
        if topics.len() != 2 || log.data().data.is_empty() {
            continue;
        }
        if topics[0] != SWAPIN_TOPIC {
            continue;
        }
        event.amount = u256_from_word(&word_at(log.data().data.as_ref(), 0));
        return None;
    }
    Some(VerifyError::SwapoutLogNotFound)
}

fn parse_swapout_input(tx: &TxContext, event: &mut SwapEvent) -> Option<VerifyError> {
    let input = tx.input.as_ref();
    if input.len() < 4 {
        return Some(VerifyError::WrongInput);
    }
    if input[..4] != ADDRESS_SWAPOUT_SELECTOR && input[..4] != STRING_SWAPOUT_SELECTOR {
        return Some(VerifyError::FuncHashMismatch);
    }
    // Swapout(uint256 amount, ...): both variants lead with the amount.
    event.amount = u256_from_word(&word_at(input, 4));
    None
}

fn parse_swapout_logs(
    logs: &[Log],
    token: &TokenConfig,
    event: &mut SwapEvent,
) -> Option<VerifyError> {
    let Some(token_address) = token.token_address else {
        return Some(VerifyError::SwapoutLogNotFound);
    };
    for log in logs {
        if log.removed || log.address() != token_address {
            continue;
        }
        let topics = log.topics();
        if topics.len() != 2 || log.data().data.is_empty() {
            continue;
        }
        if topics[0] == ADDRESS_SWAPOUT_TOPIC || topics[0] == STRING_SWAPOUT_TOPIC {
            event.amount = u256_from_word(&word_at(log.data().data.as_ref(), 0));
            return None;
        }
    }
    Some(VerifyError::SwapoutLogNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEPOSIT: Address = Address::repeat_byte(0x01);
    const USER: Address = Address::repeat_byte(0x02);
    const TOKEN: Address = Address::repeat_byte(0x03);
    const DISPATCHER: Address = Address::repeat_byte(0x04);

    fn native_src_token() -> TokenConfig {
        TokenConfig {
            token_address: None,
            deposit_address: DEPOSIT,
            call_by_contract: None,
            is_src_token: true,
            decimals: 18,
        }
    }

    fn erc20_src_token() -> TokenConfig {
        TokenConfig {
            token_address: Some(TOKEN),
            deposit_address: DEPOSIT,
            call_by_contract: None,
            is_src_token: true,
            decimals: 18,
        }
    }

    fn dst_token() -> TokenConfig {
        TokenConfig {
            token_address: Some(TOKEN),
            deposit_address: DEPOSIT,
            call_by_contract: None,
            is_src_token: false,
            decimals: 18,
        }
    }

    fn tx(from: Address, to: Address, value: u64, input: Vec<u8>) -> TxContext {
        TxContext {
            hash: B256::repeat_byte(0xaa),
            from,
            to,
            value: U256::from(value),
            input: Bytes::from(input),
            block_number: 42,
            block_time: 1_700_000_000,
        }
    }

    fn pad_address(address: Address) -> [u8; 32] {
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(address.as_slice());
        word
    }

    fn pad_amount(amount: u64) -> [u8; 32] {
        U256::from(amount).to_be_bytes::<32>()
    }

    fn transfer_input(receiver: Address, amount: u64) -> Vec<u8> {
        let mut input = TRANSFER_SELECTOR.to_vec();
        input.extend_from_slice(&pad_address(receiver));
        input.extend_from_slice(&pad_amount(amount));
        input
    }

    fn transfer_from_input(sender: Address, receiver: Address, amount: u64) -> Vec<u8> {
        let mut input = TRANSFER_FROM_SELECTOR.to_vec();
        input.extend_from_slice(&pad_address(sender));
        input.extend_from_slice(&pad_address(receiver));
        input.extend_from_slice(&pad_amount(amount));
        input
    }

    fn log(emitter: Address, topics: Vec<B256>, data: Vec<u8>) -> Log {
        Log {
            inner: alloy_primitives::Log::new_unchecked(emitter, topics, Bytes::from(data)),
            ..Default::default()
        }
    }

    fn transfer_log(emitter: Address, from: Address, to: Address, amount: u64) -> Log {
        log(
            emitter,
            vec![
                TRANSFER_TOPIC,
                B256::from(pad_address(from)),
                B256::from(pad_address(to)),
            ],
            pad_amount(amount).to_vec(),
        )
    }

    #[test]
    fn native_deposit() {
        let token = native_src_token();
        let tx = tx(USER, DEPOSIT, 1_000_000_000_000_000_000, vec![]);
        let result = classify(&tx, None, &token);
        assert_eq!(result.kind, Some(SwapKind::Deposit));
        assert_eq!(result.error, None);
        let event = result.event.unwrap();
        assert_eq!(event.amount, U256::from(1_000_000_000_000_000_000u64));
        assert_eq!(event.user, USER);
        assert_eq!(event.block_number, 42);
        assert_eq!(event.block_time, 1_700_000_000);
    }

    #[test]
    fn native_redeemed() {
        let token = native_src_token();
        let tx = tx(DEPOSIT, USER, 500_000_000_000_000_000, vec![]);
        let result = classify(&tx, None, &token);
        assert_eq!(result.kind, Some(SwapKind::Redeemed));
        let event = result.event.unwrap();
        assert_eq!(event.amount, U256::from(500_000_000_000_000_000u64));
        assert_eq!(event.user, USER);
    }

    #[test]
    fn native_unrelated_tx_is_null() {
        let token = native_src_token();
        let other = Address::repeat_byte(0x77);
        let result = classify(&tx(USER, other, 1, vec![]), None, &token);
        assert_eq!(result.kind, None);
        assert_eq!(result.error, None);
    }

    #[test]
    fn erc20_deposit_via_transfer_input() {
        let token = erc20_src_token();
        let tx = tx(USER, TOKEN, 0, transfer_input(DEPOSIT, 100));
        let result = classify(&tx, None, &token);
        assert_eq!(result.kind, Some(SwapKind::Deposit));
        assert_eq!(result.error, None);
        let event = result.event.unwrap();
        assert_eq!(event.amount, U256::from(100));
        assert_eq!(event.user, USER);
    }

    #[test]
    fn erc20_deposit_via_transfer_from_input() {
        let token = erc20_src_token();
        let sender = Address::repeat_byte(0x55);
        let tx = tx(USER, TOKEN, 0, transfer_from_input(sender, DEPOSIT, 250));
        let result = classify(&tx, None, &token);
        assert_eq!(result.kind, Some(SwapKind::Deposit));
        let event = result.event.unwrap();
        assert_eq!(event.amount, U256::from(250));
        assert_eq!(event.user, sender);
    }

    #[test]
    fn erc20_deposit_wrong_receiver_is_suppressed() {
        let token = erc20_src_token();
        let stranger = Address::repeat_byte(0x66);
        let tx = tx(USER, TOKEN, 0, transfer_input(stranger, 100));
        let result = classify(&tx, None, &token);
        assert_eq!(result.kind, None);
        assert_eq!(result.event, None);
        assert_eq!(result.error, Some(VerifyError::WrongReceiver));
    }

    #[test]
    fn erc20_deposit_short_input_still_classified() {
        // Anything shorter than a selector is recorded best-effort with the
        // verification error attached.
        let token = erc20_src_token();
        let result = classify(&tx(USER, TOKEN, 0, vec![0xa9]), None, &token);
        assert_eq!(result.kind, Some(SwapKind::Deposit));
        assert_eq!(result.error, Some(VerifyError::WrongInput));
        let event = result.event.unwrap();
        assert_eq!(event.amount, U256::ZERO);
    }

    #[test]
    fn erc20_deposit_selector_mismatch_still_classified() {
        let token = erc20_src_token();
        let result = classify(&tx(USER, TOKEN, 0, vec![0xde, 0xad, 0xbe, 0xef]), None, &token);
        assert_eq!(result.kind, Some(SwapKind::Deposit));
        assert_eq!(result.error, Some(VerifyError::FuncHashMismatch));
    }

    #[test]
    fn erc20_deposit_via_receipt_log() {
        let token = erc20_src_token();
        let tx = tx(USER, TOKEN, 0, vec![]);
        let logs = vec![transfer_log(TOKEN, USER, DEPOSIT, 777)];
        let result = classify(&tx, Some(&logs), &token);
        assert_eq!(result.kind, Some(SwapKind::Deposit));
        assert_eq!(result.error, None);
        let event = result.event.unwrap();
        assert_eq!(event.amount, U256::from(777));
        assert_eq!(event.user, USER);
    }

    #[test]
    fn erc20_deposit_log_wrong_receiver_is_suppressed() {
        let token = erc20_src_token();
        let stranger = Address::repeat_byte(0x66);
        let tx = tx(USER, TOKEN, 0, vec![]);
        let logs = vec![transfer_log(TOKEN, USER, stranger, 777)];
        let result = classify(&tx, Some(&logs), &token);
        assert_eq!(result.kind, None);
        assert_eq!(result.error, Some(VerifyError::WrongReceiver));
    }

    #[test]
    fn erc20_deposit_log_not_found() {
        let token = erc20_src_token();
        let tx = tx(USER, TOKEN, 0, vec![]);
        // Foreign emitter, removed log, wrong topic count: all skipped.
        let foreign = transfer_log(Address::repeat_byte(0x99), USER, DEPOSIT, 1);
        let mut removed = transfer_log(TOKEN, USER, DEPOSIT, 1);
        removed.removed = true;
        let two_topics = log(TOKEN, vec![TRANSFER_TOPIC, B256::ZERO], pad_amount(1).to_vec());
        let logs = vec![foreign, removed, two_topics];
        let result = classify(&tx, Some(&logs), &token);
        assert_eq!(result.kind, Some(SwapKind::Deposit));
        assert_eq!(result.error, Some(VerifyError::DepositLogNotFound));
    }

    #[test]
    fn erc20_redeemed_via_input_records_receiver_as_user() {
        let token = erc20_src_token();
        let receiver = Address::repeat_byte(0x42);
        let tx = tx(DEPOSIT, TOKEN, 0, transfer_input(receiver, 900));
        let result = classify(&tx, None, &token);
        assert_eq!(result.kind, Some(SwapKind::Redeemed));
        assert_eq!(result.error, None);
        let event = result.event.unwrap();
        assert_eq!(event.user, receiver);
        assert_eq!(event.amount, U256::from(900));
    }

    #[test]
    fn erc20_redeemed_via_receipt_log_succeeds_on_match() {
        let token = erc20_src_token();
        let receiver = Address::repeat_byte(0x42);
        let tx = tx(DEPOSIT, TOKEN, 0, vec![]);
        let logs = vec![transfer_log(TOKEN, DEPOSIT, receiver, 900)];
        let result = classify(&tx, Some(&logs), &token);
        assert_eq!(result.kind, Some(SwapKind::Redeemed));
        assert_eq!(result.error, None);
        let event = result.event.unwrap();
        assert_eq!(event.user, receiver);
        assert_eq!(event.amount, U256::from(900));
    }

    #[test]
    fn mint_via_swapin_input() {
        let token = dst_token();
        let mut input = SWAPIN_SELECTOR.to_vec();
        input.extend_from_slice(&[0x11; 32]); // source tx hash
        input.extend_from_slice(&pad_address(USER));
        input.extend_from_slice(&pad_amount(3_000));
        let tx = tx(DEPOSIT, TOKEN, 0, input);
        let result = classify(&tx, None, &token);
        assert_eq!(result.kind, Some(SwapKind::Mint));
        assert_eq!(result.error, None);
        let event = result.event.unwrap();
        assert_eq!(event.user, USER);
        assert_eq!(event.amount, U256::from(3_000));
    }

    #[test]
    fn mint_via_receipt_log() {
        let token = dst_token();
        let tx = tx(DEPOSIT, TOKEN, 0, vec![]);
        let logs = vec![log(
            TOKEN,
            vec![SWAPIN_TOPIC, B256::repeat_byte(0x11)],
            pad_amount(3_000).to_vec(),
        )];
        let result = classify(&tx, Some(&logs), &token);
        assert_eq!(result.kind, Some(SwapKind::Mint));
        assert_eq!(result.error, None);
        assert_eq!(result.event.unwrap().amount, U256::from(3_000));
    }

    #[test]
    fn burn_via_string_swapout_input() {
        let token = dst_token();
        let mut input = STRING_SWAPOUT_SELECTOR.to_vec();
        input.extend_from_slice(&pad_amount(5_000));
        let tx = tx(USER, TOKEN, 0, input);
        let result = classify(&tx, None, &token);
        assert_eq!(result.kind, Some(SwapKind::Burn));
        assert_eq!(result.error, None);
        let event = result.event.unwrap();
        assert_eq!(event.user, USER);
        assert_eq!(event.amount, U256::from(5_000));
    }

    #[test]
    fn burn_via_address_swapout_log() {
        let token = dst_token();
        let tx = tx(USER, TOKEN, 0, vec![]);
        let logs = vec![log(
            TOKEN,
            vec![ADDRESS_SWAPOUT_TOPIC, B256::from(pad_address(USER))],
            pad_amount(5_000).to_vec(),
        )];
        let result = classify(&tx, Some(&logs), &token);
        assert_eq!(result.kind, Some(SwapKind::Burn));
        assert_eq!(result.error, None);
        let event = result.event.unwrap();
        assert_eq!(event.user, USER);
        assert_eq!(event.amount, U256::from(5_000));
    }

    #[test]
    fn burn_wrong_selector_still_classified() {
        let token = dst_token();
        let tx = tx(USER, TOKEN, 0, vec![0xde, 0xad, 0xbe, 0xef]);
        let result = classify(&tx, None, &token);
        assert_eq!(result.kind, Some(SwapKind::Burn));
        assert_eq!(result.error, Some(VerifyError::FuncHashMismatch));
    }

    #[test]
    fn dispatcher_token_matches_on_call_by_contract() {
        let mut token = erc20_src_token();
        token.call_by_contract = Some(DISPATCHER);
        // A call straight to the token contract no longer matches...
        let direct = tx(USER, TOKEN, 0, vec![]);
        assert_eq!(classify(&direct, None, &token).kind, None);
        // ...and a dispatcher call is verified against the receipt logs.
        let indirect = tx(USER, DISPATCHER, 0, vec![]);
        let logs = vec![transfer_log(TOKEN, USER, DEPOSIT, 123)];
        let result = classify(&indirect, Some(&logs), &token);
        assert_eq!(result.kind, Some(SwapKind::Deposit));
        assert_eq!(result.event.unwrap().amount, U256::from(123));
    }

    #[test]
    fn dst_tx_to_other_contract_is_null() {
        let token = dst_token();
        let result = classify(&tx(USER, Address::repeat_byte(0x99), 0, vec![]), None, &token);
        assert_eq!(result.kind, None);
        assert_eq!(result.error, None);
    }
}
