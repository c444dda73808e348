//! Move a market to a new lifecycle status.
//!
//! The program is the authority on which jumps are legal; see [`crate::lifecycle`] for planning
//! the intermediate steps.
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{instruction::AccountMeta, pubkey::Pubkey};

use crate::{
    state::MarketStatus,
    utils::{InstructionAccounts, Payload},
};

#[derive(BorshDeserialize, BorshSerialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
    pub market_status: MarketStatus,
}

impl Payload for Params {
    const MIN_LEN: usize = 1;
}

/// The required accounts for a change_market_status instruction.
pub struct Accounts<'a> {
    pub market: &'a Pubkey,
    pub market_authority: &'a Pubkey,
}

impl InstructionAccounts for Accounts<'_> {
    fn get_accounts_vec(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(*self.market, false),
            AccountMeta::new_readonly(*self.market_authority, true),
        ]
    }
}
