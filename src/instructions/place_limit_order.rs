//! Post a limit order that settles against funds already deposited on the trader's seat.
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{instruction::AccountMeta, pubkey::Pubkey};

use crate::{
    error::{ClientError, ClientResult},
    quantization::MarketGranularity,
    state::Side,
    utils::{assert, InstructionAccounts, Payload},
};

#[derive(BorshDeserialize, BorshSerialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
    pub side: Side,
    pub price_in_ticks: u64,
    pub num_base_lots: u64,
    /// Caller-chosen, echoed back in fills and used to cancel or replace the order.
    pub client_order_id: u64,
    pub use_only_deposited_funds: bool,
}

impl Payload for Params {
    const MIN_LEN: usize = 26;
}

impl Params {
    /// Quantizes a human-scale order onto the market's grid.
    ///
    /// `size` is in raw base units; see
    /// [`MarketGranularity::raw_base_units_to_base_lots_rounded_down`].
    pub fn from_float(
        granularity: &MarketGranularity,
        side: Side,
        price: f64,
        size: f64,
        client_order_id: u64,
        use_only_deposited_funds: bool,
    ) -> ClientResult<Self> {
        let params = Self {
            side,
            price_in_ticks: granularity.float_price_to_ticks(price)?,
            num_base_lots: granularity.raw_base_units_to_base_lots_rounded_down(size)?,
            client_order_id,
            use_only_deposited_funds,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> ClientResult {
        assert(
            self.price_in_ticks > 0,
            ClientError::InvalidQuantity {
                field: "price_in_ticks",
                value: 0.0,
            },
        )?;
        assert(
            self.num_base_lots > 0,
            ClientError::InvalidQuantity {
                field: "num_base_lots",
                value: 0.0,
            },
        )
    }
}

/// The required accounts for a place_limit_order_with_free_funds instruction.
pub struct Accounts<'a> {
    pub market: &'a Pubkey,
    pub trader: &'a Pubkey,
    pub seat: &'a Pubkey,
}

impl InstructionAccounts for Accounts<'_> {
    fn get_accounts_vec(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(*self.market, false),
            AccountMeta::new_readonly(*self.trader, true),
            AccountMeta::new(*self.seat, false),
        ]
    }
}
