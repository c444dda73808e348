//! Closed enumerations for the status and side codes carried on the wire, and read-only views of
//! the program accounts this crate needs to inspect.
use std::fmt;

use borsh::{BorshDeserialize, BorshSerialize};
use enumflags2::BitFlags;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::instruction::Operation;

#[allow(missing_docs)]
pub mod market_header;
#[allow(missing_docs)]
pub mod seat;

pub use market_header::MarketHeader;
pub use seat::Seat;

/// The lifecycle status of a market.
///
/// The one-byte wire code is the declaration order and is a protocol fact.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, IntoPrimitive, TryFromPrimitive,
)]
#[repr(u8)]
pub enum MarketStatus {
    Uninitialized = 0,
    /// Orders post and match.
    Active = 1,
    /// Orders post but taker matching is suppressed.
    PostOnly = 2,
    /// No new trading actions.
    Paused = 3,
    Closed = 4,
    Tombstoned = 5,
}

impl MarketStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, MarketStatus::Closed | MarketStatus::Tombstoned)
    }

    /// The operations the program accepts while the market sits in this status.
    pub fn permitted_operations(self) -> BitFlags<Operation> {
        use Operation::*;
        match self {
            MarketStatus::Uninitialized => InitializeMarket | ChangeMarketStatus,
            MarketStatus::Active | MarketStatus::PostOnly => {
                ChangeMarketStatus
                    | ChangeSeatStatus
                    | RequestSeat
                    | DepositFunds
                    | PlaceLimitOrder
                    | CancelAllOrders
            }
            MarketStatus::Paused => ChangeMarketStatus | ChangeSeatStatus | CancelAllOrders,
            MarketStatus::Closed => ChangeSeatStatus | CancelAllOrders | CloseMarket,
            MarketStatus::Tombstoned => BitFlags::empty(),
        }
    }

    pub fn permits(self, operation: Operation) -> bool {
        self.permitted_operations().contains(operation)
    }
}

impl fmt::Display for MarketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum SeatApprovalStatus {
    NotApproved = 0,
    Approved = 1,
    Retired = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Side {
    Bid = 0,
    Ask = 1,
}

// Serialized as the one-byte wire code rather than the declaration index
macro_rules! impl_borsh_wire_code {
    ($t:ty) => {
        impl BorshSerialize for $t {
            fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
                u8::from(*self).serialize(writer)
            }
        }

        impl BorshDeserialize for $t {
            fn deserialize_reader<R: std::io::Read>(reader: &mut R) -> std::io::Result<Self> {
                let code = u8::deserialize_reader(reader)?;
                <$t>::try_from(code).map_err(|_| {
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        format!("invalid {} code {}", stringify!($t), code),
                    )
                })
            }
        }
    };
}

impl_borsh_wire_code!(MarketStatus);
impl_borsh_wire_code!(SeatApprovalStatus);
impl_borsh_wire_code!(Side);
