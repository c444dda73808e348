//! Reclaim the rent of a closed market. There is no payload.
use solana_program::{instruction::AccountMeta, pubkey::Pubkey, system_program};

use crate::utils::InstructionAccounts;

/// The required accounts for a close_market instruction.
pub struct Accounts<'a> {
    pub market: &'a Pubkey,
    /// Signs and receives the reclaimed lamports.
    pub market_authority: &'a Pubkey,
}

impl InstructionAccounts for Accounts<'_> {
    fn get_accounts_vec(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(*self.market, false),
            AccountMeta::new(*self.market_authority, true),
            AccountMeta::new_readonly(system_program::ID, false),
        ]
    }
}
