//! Move tokens from the trader's wallets into the market vaults, credited to the trader's seat.
//!
//! The seat must exist and be approved before the deposit lands.
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{instruction::AccountMeta, pubkey::Pubkey};

use crate::{
    error::{ClientError, ClientResult},
    quantization::MarketGranularity,
    utils::{assert, InstructionAccounts, Payload},
};

#[derive(BorshDeserialize, BorshSerialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
    pub quote_lots_to_deposit: u64,
    pub base_lots_to_deposit: u64,
}

impl Payload for Params {
    const MIN_LEN: usize = 16;
}

impl Params {
    /// Converts quote units and raw base units into lots, rounding down. A zero amount on either
    /// side deposits nothing on that side.
    pub fn from_units(
        granularity: &MarketGranularity,
        quote_units: f64,
        raw_base_units: f64,
    ) -> ClientResult<Self> {
        let quote_lots_to_deposit = if quote_units == 0.0 {
            0
        } else {
            granularity.quote_units_to_quote_lots(quote_units)?
        };
        let base_lots_to_deposit = if raw_base_units == 0.0 {
            0
        } else {
            granularity.raw_base_units_to_base_lots_rounded_down(raw_base_units)?
        };
        let params = Self {
            quote_lots_to_deposit,
            base_lots_to_deposit,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> ClientResult {
        assert(
            self.quote_lots_to_deposit > 0 || self.base_lots_to_deposit > 0,
            ClientError::InvalidQuantity {
                field: "lots_to_deposit",
                value: 0.0,
            },
        )
    }
}

/// The required accounts for a deposit_funds instruction.
pub struct Accounts<'a> {
    pub market: &'a Pubkey,
    pub trader: &'a Pubkey,
    pub seat: &'a Pubkey,
    pub base_account: &'a Pubkey,
    pub quote_account: &'a Pubkey,
    pub base_vault: &'a Pubkey,
    pub quote_vault: &'a Pubkey,
}

impl InstructionAccounts for Accounts<'_> {
    fn get_accounts_vec(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(*self.market, false),
            AccountMeta::new_readonly(*self.trader, true),
            AccountMeta::new(*self.seat, false),
            AccountMeta::new(*self.base_account, false),
            AccountMeta::new(*self.quote_account, false),
            AccountMeta::new(*self.base_vault, false),
            AccountMeta::new(*self.quote_vault, false),
            AccountMeta::new_readonly(spl_token::ID, false),
        ]
    }
}
