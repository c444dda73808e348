//! Program-derived addresses.
//!
//! Every account this crate refers to besides the market itself and the traders' wallets is
//! derived from seeds under the order book program. Derivation is a pure function: independent
//! callers agree on a vault, seat or queue address without sharing any state.
use solana_program::pubkey::{Pubkey, PubkeyError, MAX_SEEDS};

use crate::error::{ClientError, ClientResult};

pub const MARKET_SEED_PREFIX: &[u8] = b"phoenix";
pub const MARKET_SEED: &[u8] = b"market";
pub const VAULT_SEED: &[u8] = b"vault";
pub const SEAT_SEED: &[u8] = b"seat";
pub const EVENT_QUEUE_SEED: &[u8] = b"event_queue";
pub const BIDS_SEED: &[u8] = b"bids";
pub const ASKS_SEED: &[u8] = b"asks";
pub const LOG_AUTHORITY_SEED: &[u8] = b"log";

/// Finds the address owned by `owner` for the given seeds.
///
/// The nonce is appended as a final one-byte seed and tried from 255 down to 0; the first
/// candidate that does not lie on the ed25519 curve wins. Fails with
/// [`ClientError::NoValidAddress`] if all 256 candidates are on the curve.
pub fn derive_program_address(seeds: &[&[u8]], owner: &Pubkey) -> ClientResult<(Pubkey, u8)> {
    if seeds.len() >= MAX_SEEDS {
        return Err(ClientError::InvalidSeeds(format!(
            "{} seeds given, at most {} fit alongside the nonce",
            seeds.len(),
            MAX_SEEDS - 1
        )));
    }
    for nonce in (0..=u8::MAX).rev() {
        let nonce_seed = [nonce];
        let mut seeds_with_nonce = seeds.to_vec();
        seeds_with_nonce.push(&nonce_seed[..]);
        match Pubkey::create_program_address(&seeds_with_nonce, owner) {
            Ok(address) => return Ok((address, nonce)),
            // On the curve, try the next nonce
            Err(PubkeyError::InvalidSeeds) => {}
            Err(e) => return Err(ClientError::InvalidSeeds(e.to_string())),
        }
    }
    Err(ClientError::NoValidAddress)
}

/// The market address for a base/quote pair.
pub fn get_market_address(
    program_id: &Pubkey,
    base_mint: &Pubkey,
    quote_mint: &Pubkey,
) -> ClientResult<(Pubkey, u8)> {
    derive_program_address(
        &[
            MARKET_SEED_PREFIX,
            MARKET_SEED,
            base_mint.as_ref(),
            quote_mint.as_ref(),
        ],
        program_id,
    )
}

pub fn get_vault_address(
    program_id: &Pubkey,
    market: &Pubkey,
    mint: &Pubkey,
) -> ClientResult<(Pubkey, u8)> {
    derive_program_address(&[VAULT_SEED, market.as_ref(), mint.as_ref()], program_id)
}

pub fn get_seat_address(
    program_id: &Pubkey,
    market: &Pubkey,
    trader: &Pubkey,
) -> ClientResult<(Pubkey, u8)> {
    derive_program_address(&[SEAT_SEED, market.as_ref(), trader.as_ref()], program_id)
}

pub fn get_event_queue_address(program_id: &Pubkey, market: &Pubkey) -> ClientResult<(Pubkey, u8)> {
    derive_program_address(&[EVENT_QUEUE_SEED, market.as_ref()], program_id)
}

pub fn get_bids_address(program_id: &Pubkey, market: &Pubkey) -> ClientResult<(Pubkey, u8)> {
    derive_program_address(&[BIDS_SEED, market.as_ref()], program_id)
}

pub fn get_asks_address(program_id: &Pubkey, market: &Pubkey) -> ClientResult<(Pubkey, u8)> {
    derive_program_address(&[ASKS_SEED, market.as_ref()], program_id)
}

/// The program's event log authority, passed read-only to every instruction.
pub fn get_log_authority(program_id: &Pubkey) -> ClientResult<Pubkey> {
    derive_program_address(&[LOG_AUTHORITY_SEED], program_id).map(|(address, _)| address)
}

/// The derived accounts of one market.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketAddresses {
    pub market: Pubkey,
    pub base_vault: Pubkey,
    pub quote_vault: Pubkey,
    pub event_queue: Pubkey,
    pub bids: Pubkey,
    pub asks: Pubkey,
}

impl MarketAddresses {
    pub fn derive(
        program_id: &Pubkey,
        market: &Pubkey,
        base_mint: &Pubkey,
        quote_mint: &Pubkey,
    ) -> ClientResult<Self> {
        Ok(Self {
            market: *market,
            base_vault: get_vault_address(program_id, market, base_mint)?.0,
            quote_vault: get_vault_address(program_id, market, quote_mint)?.0,
            event_queue: get_event_queue_address(program_id, market)?.0,
            bids: get_bids_address(program_id, market)?.0,
            asks: get_asks_address(program_id, market)?.0,
        })
    }
}
