//! Ask for a seat on a market. The seat starts out `NotApproved` until the market authority
//! changes its status.
use solana_program::{instruction::AccountMeta, pubkey::Pubkey, system_program};

use crate::utils::InstructionAccounts;

/// The required accounts for a request_seat instruction.
pub struct Accounts<'a> {
    pub market: &'a Pubkey,
    /// Pays for the seat account and becomes its trader.
    pub payer: &'a Pubkey,
    pub seat: &'a Pubkey,
}

impl InstructionAccounts for Accounts<'_> {
    fn get_accounts_vec(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(*self.market, false),
            AccountMeta::new(*self.payer, true),
            AccountMeta::new(*self.seat, false),
            AccountMeta::new_readonly(system_program::ID, false),
        ]
    }
}
