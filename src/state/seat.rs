use bytemuck::{Pod, Zeroable};
use solana_program::pubkey::Pubkey;
use std::mem::size_of;

use crate::{
    error::{ClientError, ClientResult},
    state::SeatApprovalStatus,
};

/// A trader's authorization record on one market.
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
#[repr(C)]
pub struct Seat {
    pub discriminant: u64,
    pub market: Pubkey,
    pub trader: Pubkey,
    pub approval_status: u64,
    _padding: [u64; 6],
}

impl Seat {
    pub const LEN: usize = size_of::<Self>();

    pub fn new(market: Pubkey, trader: Pubkey, approval_status: SeatApprovalStatus) -> Self {
        Self {
            discriminant: 0,
            market,
            trader,
            approval_status: u8::from(approval_status) as u64,
            _padding: [0; 6],
        }
    }

    pub fn load(account_data: &[u8]) -> ClientResult<Self> {
        if account_data.len() < Self::LEN {
            return Err(ClientError::config(format!(
                "seat account holds {} bytes, expected {}",
                account_data.len(),
                Self::LEN
            )));
        }
        bytemuck::try_pod_read_unaligned(&account_data[..Self::LEN])
            .map_err(|e| ClientError::config(format!("unreadable seat: {e:?}")))
    }

    pub fn approval_status(&self) -> ClientResult<SeatApprovalStatus> {
        u8::try_from(self.approval_status)
            .ok()
            .and_then(|code| SeatApprovalStatus::try_from(code).ok())
            .ok_or_else(|| {
                ClientError::config(format!(
                    "unknown seat approval status {}",
                    self.approval_status
                ))
            })
    }
}
