//! Cancel every resting order owned by the signing trader. There is no payload.
use solana_program::{instruction::AccountMeta, pubkey::Pubkey};

use crate::utils::InstructionAccounts;

/// The required accounts for a cancel_all_orders instruction.
pub struct Accounts<'a> {
    pub market: &'a Pubkey,
    pub trader: &'a Pubkey,
}

impl InstructionAccounts for Accounts<'_> {
    fn get_accounts_vec(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(*self.market, false),
            AccountMeta::new_readonly(*self.trader, true),
        ]
    }
}
