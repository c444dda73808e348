//! The market header is the fixed-size prefix of a market account. Only the fields this crate
//! reads are interpreted; the rest are kept so the layout stays byte-exact.
use borsh::{BorshDeserialize, BorshSerialize};
use bytemuck::{Pod, Zeroable};
use solana_program::pubkey::Pubkey;
use std::mem::size_of;

use crate::{
    error::{ClientError, ClientResult},
    quantization::MarketGranularity,
    state::MarketStatus,
};

/// Order book and seat capacities of a market.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable, BorshDeserialize, BorshSerialize,
)]
#[repr(C)]
pub struct MarketSizeParams {
    pub bids_size: u64,
    pub asks_size: u64,
    pub num_seats: u64,
}

impl MarketSizeParams {
    /// Size configurations the program allocates markets for.
    pub const SUPPORTED: [MarketSizeParams; 4] = [
        MarketSizeParams::new(512, 512, 128),
        MarketSizeParams::new(1024, 1024, 128),
        MarketSizeParams::new(2048, 2048, 128),
        MarketSizeParams::new(4096, 4096, 128),
    ];

    pub const fn new(bids_size: u64, asks_size: u64, num_seats: u64) -> Self {
        Self {
            bids_size,
            asks_size,
            num_seats,
        }
    }

    pub fn is_supported(&self) -> bool {
        Self::SUPPORTED.contains(self)
    }
}

#[derive(Debug, Clone, Copy, Pod, Zeroable)]
#[repr(C)]
pub struct TokenParams {
    pub decimals: u32,
    pub vault_bump: u32,
    pub mint_key: Pubkey,
    pub vault_key: Pubkey,
}

#[derive(Debug, Clone, Copy, Pod, Zeroable)]
#[repr(C)]
pub struct MarketHeader {
    pub discriminant: u64,
    pub status: u64,
    pub market_size_params: MarketSizeParams,
    pub base_params: TokenParams,
    /// Base atoms per base lot
    pub base_lot_size: u64,
    pub quote_params: TokenParams,
    /// Quote atoms per quote lot
    pub quote_lot_size: u64,
    pub tick_size_in_quote_atoms_per_base_unit: u64,
    pub authority: Pubkey,
    pub fee_recipient: Pubkey,
    pub market_sequence_number: u64,
    pub successor: Pubkey,
    pub raw_base_units_per_base_unit: u32,
    pub _padding1: u32,
    pub _padding2: [u64; 32],
}

impl MarketHeader {
    /// Expected size in bytes of MarketHeader
    pub const LEN: usize = size_of::<Self>();

    /// Reads the header from the start of a market account's data. The data does not need to be
    /// aligned.
    pub fn load(account_data: &[u8]) -> ClientResult<Self> {
        if account_data.len() < Self::LEN {
            return Err(ClientError::config(format!(
                "market account holds {} bytes, the header needs {}",
                account_data.len(),
                Self::LEN
            )));
        }
        bytemuck::try_pod_read_unaligned(&account_data[..Self::LEN])
            .map_err(|e| ClientError::config(format!("unreadable market header: {e:?}")))
    }

    pub fn status(&self) -> ClientResult<MarketStatus> {
        u8::try_from(self.status)
            .ok()
            .and_then(|code| MarketStatus::try_from(code).ok())
            .ok_or_else(|| ClientError::config(format!("unknown market status {}", self.status)))
    }

    /// Recovers the lot and tick granularity from the atom-denominated fields.
    pub fn granularity(&self) -> ClientResult<MarketGranularity> {
        let atoms_per_unit = |decimals: u32| {
            10u64
                .checked_pow(decimals)
                .ok_or_else(|| ClientError::config(format!("token decimals {decimals} too large")))
        };
        if self.base_lot_size == 0 || self.quote_lot_size == 0 {
            return Err(ClientError::config("market header has a zero lot size"));
        }
        let raw_base_units_per_base_unit = self.raw_base_units_per_base_unit.max(1);
        let base_atoms_per_base_unit = atoms_per_unit(self.base_params.decimals)?
            .checked_mul(raw_base_units_per_base_unit as u64)
            .ok_or(ClientError::Overflow {
                field: "base_atoms_per_base_unit",
            })?;
        let lots = |atoms: u64, lot_size: u64, field: &str| {
            if atoms % lot_size != 0 {
                return Err(ClientError::config(format!(
                    "{field} of {atoms} atoms is not a multiple of the lot size {lot_size}"
                )));
            }
            Ok(atoms / lot_size)
        };
        MarketGranularity::new(
            lots(
                self.tick_size_in_quote_atoms_per_base_unit,
                self.quote_lot_size,
                "tick size",
            )?,
            lots(
                atoms_per_unit(self.quote_params.decimals)?,
                self.quote_lot_size,
                "quote unit",
            )?,
            lots(base_atoms_per_base_unit, self.base_lot_size, "base unit")?,
        )
        .map(|g| g.with_raw_base_units_per_base_unit(raw_base_units_per_base_unit))
    }
}
