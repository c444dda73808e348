//! Create a new market.
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{instruction::AccountMeta, pubkey::Pubkey, system_program};

use crate::{
    error::{ClientError, ClientResult},
    quantization::MarketGranularity,
    state::market_header::MarketSizeParams,
    utils::{assert, InstructionAccounts, Payload},
};

/// Taker fees are capped at 100%.
pub const MAX_TAKER_FEE_BPS: u16 = 10_000;

#[derive(BorshDeserialize, BorshSerialize, Debug, Clone, Copy, PartialEq, Eq)]
/**
The required arguments for an initialize_market instruction.

The field order is the wire order.
*/
pub struct Params {
    /// Bid and ask capacities and the number of seats.
    pub market_size_params: MarketSizeParams,
    pub num_quote_lots_per_quote_unit: u64,
    pub tick_size_in_quote_lots_per_base_unit: u64,
    pub num_base_lots_per_base_unit: u64,
    pub taker_fee_bps: u16,
    pub fee_collector: Pubkey,
    /// Scale factor for tokens whose base unit is worth very little. Absent means 1.
    pub raw_base_units_per_base_unit: Option<u32>,
}

impl Payload for Params {
    // 3x8 capacities, 3x8 granularity, 2 fee, 32 collector, 1 option flag
    const MIN_LEN: usize = 91;

    fn payload_len(&self) -> usize {
        match self.raw_base_units_per_base_unit {
            Some(_) => Self::MIN_LEN + 4,
            None => Self::MIN_LEN,
        }
    }
}

impl Params {
    pub fn granularity(&self) -> ClientResult<MarketGranularity> {
        MarketGranularity::new(
            self.tick_size_in_quote_lots_per_base_unit,
            self.num_quote_lots_per_quote_unit,
            self.num_base_lots_per_base_unit,
        )
        .map(|g| {
            g.with_raw_base_units_per_base_unit(self.raw_base_units_per_base_unit.unwrap_or(1))
        })
    }

    /// Checks the constraints the program enforces on market creation.
    pub fn validate(&self) -> ClientResult {
        self.granularity()?.validate()?;
        assert(
            self.tick_size_in_quote_lots_per_base_unit % self.num_base_lots_per_base_unit == 0,
            ClientError::config(format!(
                "tick size {} is not a multiple of base lots per unit {}",
                self.tick_size_in_quote_lots_per_base_unit, self.num_base_lots_per_base_unit
            )),
        )?;
        assert(
            self.taker_fee_bps <= MAX_TAKER_FEE_BPS,
            ClientError::config(format!(
                "taker fee of {} bps exceeds {}",
                self.taker_fee_bps, MAX_TAKER_FEE_BPS
            )),
        )?;
        assert(
            self.market_size_params.is_supported(),
            ClientError::config(format!(
                "unsupported market size {:?}",
                self.market_size_params
            )),
        )
    }
}

/// The required accounts for an initialize_market instruction.
pub struct Accounts<'a> {
    pub market: &'a Pubkey,
    pub market_creator: &'a Pubkey,
    pub base_mint: &'a Pubkey,
    pub quote_mint: &'a Pubkey,
    pub base_vault: &'a Pubkey,
    pub quote_vault: &'a Pubkey,
}

impl InstructionAccounts for Accounts<'_> {
    fn get_accounts_vec(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(*self.market, false),
            AccountMeta::new(*self.market_creator, true),
            AccountMeta::new_readonly(*self.base_mint, false),
            AccountMeta::new_readonly(*self.quote_mint, false),
            AccountMeta::new(*self.base_vault, false),
            AccountMeta::new(*self.quote_vault, false),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(spl_token::ID, false),
        ]
    }
}
