//! Approve, revoke or retire a trader's seat.
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{instruction::AccountMeta, pubkey::Pubkey};

use crate::{
    state::SeatApprovalStatus,
    utils::{InstructionAccounts, Payload},
};

#[derive(BorshDeserialize, BorshSerialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
    pub approval_status: SeatApprovalStatus,
}

impl Payload for Params {
    const MIN_LEN: usize = 1;
}

/// The required accounts for a change_seat_status instruction.
pub struct Accounts<'a> {
    pub market: &'a Pubkey,
    pub market_authority: &'a Pubkey,
    pub seat: &'a Pubkey,
}

impl InstructionAccounts for Accounts<'_> {
    fn get_accounts_vec(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(*self.market, false),
            AccountMeta::new_readonly(*self.market_authority, true),
            AccountMeta::new(*self.seat, false),
        ]
    }
}
