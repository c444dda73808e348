use enumflags2::{bitflags, BitFlags};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};
use solana_program::instruction::Instruction;

use crate::{
    config::ProgramConfig,
    error::{ClientError, ClientResult},
    utils::{assert, build_instruction, decode_payload, encode_payload, InstructionAccounts},
};

pub use crate::instructions::{
    cancel_all_orders, change_market_status, change_seat_status, deposit_funds,
    close_market, initialize_market, place_limit_order, request_seat,
};

/// The operations this crate can encode.
#[bitflags]
#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    InitializeMarket = 1 << 0,
    ChangeMarketStatus = 1 << 1,
    ChangeSeatStatus = 1 << 2,
    RequestSeat = 1 << 3,
    DepositFunds = 1 << 4,
    PlaceLimitOrder = 1 << 5,
    CancelAllOrders = 1 << 6,
    CloseMarket = 1 << 7,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::InitializeMarket => "InitializeMarket",
            Operation::ChangeMarketStatus => "ChangeMarketStatus",
            Operation::ChangeSeatStatus => "ChangeSeatStatus",
            Operation::RequestSeat => "RequestSeat",
            Operation::DepositFunds => "DepositFunds",
            Operation::PlaceLimitOrder => "PlaceLimitOrderWithFreeFunds",
            Operation::CancelAllOrders => "CancelAllOrders",
            Operation::CloseMarket => "CloseMarket",
        }
    }

    /// The discriminator the program documents for this operation, if any.
    pub fn fixed_discriminator(self) -> Option<u8> {
        let d = match self {
            Operation::InitializeMarket => FixedDiscriminator::InitializeMarket,
            Operation::ChangeMarketStatus => FixedDiscriminator::ChangeMarketStatus,
            Operation::ChangeSeatStatus => FixedDiscriminator::ChangeSeatStatus,
            Operation::CancelAllOrders => FixedDiscriminator::CancelAllOrders,
            _ => return None,
        };
        Some(d as u8)
    }
}

/// Discriminators that are protocol facts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
#[repr(u8)]
pub enum FixedDiscriminator {
    CancelAllOrders = 6,
    InitializeMarket = 100,
    ChangeMarketStatus = 103,
    ChangeSeatStatus = 104,
}

impl FixedDiscriminator {
    pub fn operation(self) -> Operation {
        match self {
            FixedDiscriminator::CancelAllOrders => Operation::CancelAllOrders,
            FixedDiscriminator::InitializeMarket => Operation::InitializeMarket,
            FixedDiscriminator::ChangeMarketStatus => Operation::ChangeMarketStatus,
            FixedDiscriminator::ChangeSeatStatus => Operation::ChangeSeatStatus,
        }
    }
}

/// Discriminators for operations the program does not document, supplied from the live protocol.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscriminatorTable {
    #[serde(default)]
    pub place_limit_order_with_free_funds: Option<u8>,
    #[serde(default)]
    pub deposit_funds: Option<u8>,
    #[serde(default)]
    pub request_seat: Option<u8>,
    #[serde(default)]
    pub close_market: Option<u8>,
}

impl DiscriminatorTable {
    fn configured(&self, operation: Operation) -> Option<u8> {
        match operation {
            Operation::PlaceLimitOrder => self.place_limit_order_with_free_funds,
            Operation::DepositFunds => self.deposit_funds,
            Operation::RequestSeat => self.request_seat,
            Operation::CloseMarket => self.close_market,
            _ => None,
        }
    }

    pub fn resolve(&self, operation: Operation) -> ClientResult<u8> {
        operation
            .fixed_discriminator()
            .or_else(|| self.configured(operation))
            .ok_or(ClientError::MissingDiscriminator {
                operation: operation.name(),
            })
    }

    /// Maps a discriminator back onto its operation.
    pub fn operation_for(&self, discriminator: u8) -> ClientResult<Operation> {
        if let Some(fixed) = FixedDiscriminator::from_u8(discriminator) {
            return Ok(fixed.operation());
        }
        BitFlags::<Operation>::all()
            .iter()
            .find(|op| self.configured(*op) == Some(discriminator))
            .ok_or(ClientError::UnknownDiscriminator(discriminator))
    }

    /// Fails if two operations would share a discriminator.
    pub fn validate(&self) -> ClientResult {
        let mut seen: Vec<(u8, Operation)> = Vec::new();
        for op in BitFlags::<Operation>::all().iter() {
            let Some(d) = op.fixed_discriminator().or_else(|| self.configured(op)) else {
                continue;
            };
            if let Some((_, other)) = seen.iter().find(|(s, _)| *s == d) {
                return Err(ClientError::config(format!(
                    "discriminator {} is assigned to both {} and {}",
                    d,
                    other.name(),
                    op.name()
                )));
            }
            seen.push((d, op));
        }
        Ok(())
    }
}

/// A decoded instruction payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhoenixInstruction {
    /// Create a market.
    ///
    /// Required accounts
    ///
    /// | index | writable | signer | description                  |
    /// |-------|----------|--------|------------------------------|
    /// | 0     | ❌       | ❌     | The order book program       |
    /// | 1     | ❌       | ❌     | The log authority            |
    /// | 2     | ✅       | ❌     | The market account           |
    /// | 3     | ✅       | ✅     | The market creator           |
    /// | 4     | ❌       | ❌     | The base mint                |
    /// | 5     | ❌       | ❌     | The quote mint               |
    /// | 6     | ✅       | ❌     | The base vault               |
    /// | 7     | ✅       | ❌     | The quote vault              |
    /// | 8     | ❌       | ❌     | The system program           |
    /// | 9     | ❌       | ❌     | The token program            |
    InitializeMarket(initialize_market::Params),
    /// Set the market status.
    ///
    /// Required accounts
    ///
    /// | index | writable | signer | description             |
    /// |-------|----------|--------|-------------------------|
    /// | 0     | ❌       | ❌     | The order book program  |
    /// | 1     | ❌       | ❌     | The log authority       |
    /// | 2     | ✅       | ❌     | The market account      |
    /// | 3     | ❌       | ✅     | The market authority    |
    ChangeMarketStatus(change_market_status::Params),
    /// Set a seat's approval status.
    ///
    /// Required accounts
    ///
    /// | index | writable | signer | description             |
    /// |-------|----------|--------|-------------------------|
    /// | 0     | ❌       | ❌     | The order book program  |
    /// | 1     | ❌       | ❌     | The log authority       |
    /// | 2     | ✅       | ❌     | The market account      |
    /// | 3     | ❌       | ✅     | The market authority    |
    /// | 4     | ✅       | ❌     | The seat account        |
    ChangeSeatStatus(change_seat_status::Params),
    /// Create a seat for the payer.
    ///
    /// Required accounts
    ///
    /// | index | writable | signer | description             |
    /// |-------|----------|--------|-------------------------|
    /// | 0     | ❌       | ❌     | The order book program  |
    /// | 1     | ❌       | ❌     | The log authority       |
    /// | 2     | ✅       | ❌     | The market account      |
    /// | 3     | ✅       | ✅     | The payer               |
    /// | 4     | ✅       | ❌     | The seat account        |
    /// | 5     | ❌       | ❌     | The system program      |
    RequestSeat,
    /// Deposit tokens into the market vaults.
    ///
    /// Required accounts
    ///
    /// | index | writable | signer | description                   |
    /// |-------|----------|--------|-------------------------------|
    /// | 0     | ❌       | ❌     | The order book program        |
    /// | 1     | ❌       | ❌     | The log authority             |
    /// | 2     | ✅       | ❌     | The market account            |
    /// | 3     | ❌       | ✅     | The trader                    |
    /// | 4     | ✅       | ❌     | The seat account              |
    /// | 5     | ✅       | ❌     | The trader's base account     |
    /// | 6     | ✅       | ❌     | The trader's quote account    |
    /// | 7     | ✅       | ❌     | The base vault                |
    /// | 8     | ✅       | ❌     | The quote vault               |
    /// | 9     | ❌       | ❌     | The token program             |
    DepositFunds(deposit_funds::Params),
    /// Post a limit order against deposited funds.
    ///
    /// Required accounts
    ///
    /// | index | writable | signer | description             |
    /// |-------|----------|--------|-------------------------|
    /// | 0     | ❌       | ❌     | The order book program  |
    /// | 1     | ❌       | ❌     | The log authority       |
    /// | 2     | ✅       | ❌     | The market account      |
    /// | 3     | ❌       | ✅     | The trader              |
    /// | 4     | ✅       | ❌     | The seat account        |
    PlaceLimitOrderWithFreeFunds(place_limit_order::Params),
    /// Cancel all of the signer's resting orders.
    ///
    /// Required accounts
    ///
    /// | index | writable | signer | description             |
    /// |-------|----------|--------|-------------------------|
    /// | 0     | ❌       | ❌     | The order book program  |
    /// | 1     | ❌       | ❌     | The log authority       |
    /// | 2     | ✅       | ❌     | The market account      |
    /// | 3     | ❌       | ✅     | The trader              |
    CancelAllOrders,
    /// Reclaim the rent of a closed market.
    ///
    /// Required accounts
    ///
    /// | index | writable | signer | description             |
    /// |-------|----------|--------|-------------------------|
    /// | 0     | ❌       | ❌     | The order book program  |
    /// | 1     | ❌       | ❌     | The log authority       |
    /// | 2     | ✅       | ❌     | The market account      |
    /// | 3     | ✅       | ✅     | The market authority    |
    /// | 4     | ❌       | ❌     | The system program      |
    CloseMarket,
}

impl PhoenixInstruction {
    pub fn operation(&self) -> Operation {
        match self {
            PhoenixInstruction::InitializeMarket(_) => Operation::InitializeMarket,
            PhoenixInstruction::ChangeMarketStatus(_) => Operation::ChangeMarketStatus,
            PhoenixInstruction::ChangeSeatStatus(_) => Operation::ChangeSeatStatus,
            PhoenixInstruction::RequestSeat => Operation::RequestSeat,
            PhoenixInstruction::DepositFunds(_) => Operation::DepositFunds,
            PhoenixInstruction::PlaceLimitOrderWithFreeFunds(_) => Operation::PlaceLimitOrder,
            PhoenixInstruction::CancelAllOrders => Operation::CancelAllOrders,
            PhoenixInstruction::CloseMarket => Operation::CloseMarket,
        }
    }

    /// The discriminator byte followed by the little-endian payload.
    pub fn encode(&self, table: &DiscriminatorTable) -> ClientResult<Vec<u8>> {
        let operation = self.operation();
        let name = operation.name();
        let discriminator = table.resolve(operation)?;
        let mut data = vec![discriminator];
        match self {
            PhoenixInstruction::InitializeMarket(p) => {
                encode_payload(name, discriminator, p, &mut data)?
            }
            PhoenixInstruction::ChangeMarketStatus(p) => {
                encode_payload(name, discriminator, p, &mut data)?
            }
            PhoenixInstruction::ChangeSeatStatus(p) => {
                encode_payload(name, discriminator, p, &mut data)?
            }
            PhoenixInstruction::DepositFunds(p) => {
                encode_payload(name, discriminator, p, &mut data)?
            }
            PhoenixInstruction::PlaceLimitOrderWithFreeFunds(p) => {
                encode_payload(name, discriminator, p, &mut data)?
            }
            PhoenixInstruction::RequestSeat
            | PhoenixInstruction::CancelAllOrders
            | PhoenixInstruction::CloseMarket => {}
        }
        Ok(data)
    }

    pub fn decode(data: &[u8], table: &DiscriminatorTable) -> ClientResult<Self> {
        let (&discriminator, payload) =
            data.split_first().ok_or_else(|| ClientError::InvalidPayload {
                operation: "instruction",
                reason: "no discriminator byte".to_string(),
            })?;
        let operation = table.operation_for(discriminator)?;
        let name = operation.name();
        let instruction = match operation {
            Operation::InitializeMarket => PhoenixInstruction::InitializeMarket(decode_payload(
                name,
                discriminator,
                payload,
            )?),
            Operation::ChangeMarketStatus => PhoenixInstruction::ChangeMarketStatus(
                decode_payload(name, discriminator, payload)?,
            ),
            Operation::ChangeSeatStatus => {
                PhoenixInstruction::ChangeSeatStatus(decode_payload(name, discriminator, payload)?)
            }
            Operation::DepositFunds => {
                PhoenixInstruction::DepositFunds(decode_payload(name, discriminator, payload)?)
            }
            Operation::PlaceLimitOrder => PhoenixInstruction::PlaceLimitOrderWithFreeFunds(
                decode_payload(name, discriminator, payload)?,
            ),
            Operation::RequestSeat | Operation::CancelAllOrders | Operation::CloseMarket => {
                assert(
                    payload.is_empty(),
                    ClientError::PayloadSize {
                        operation: name,
                        discriminator,
                        expected: 0,
                        actual: payload.len(),
                    },
                )?;
                match operation {
                    Operation::RequestSeat => PhoenixInstruction::RequestSeat,
                    Operation::CloseMarket => PhoenixInstruction::CloseMarket,
                    _ => PhoenixInstruction::CancelAllOrders,
                }
            }
        };
        Ok(instruction)
    }

    pub fn into_instruction(
        self,
        config: &ProgramConfig,
        accounts: &dyn InstructionAccounts,
    ) -> ClientResult<Instruction> {
        let data = self.encode(&config.discriminators)?;
        build_instruction(&config.program_id, accounts, data)
    }
}

/// Create a market. The parameters are checked against the program's constraints first.
pub fn initialize_market(
    config: &ProgramConfig,
    accounts: initialize_market::Accounts,
    params: initialize_market::Params,
) -> ClientResult<Instruction> {
    params.validate()?;
    PhoenixInstruction::InitializeMarket(params).into_instruction(config, &accounts)
}

/// Set the market status. Whether the jump is legal is decided by the program; use
/// [`crate::lifecycle::plan_transition`] to produce the intermediate steps.
pub fn change_market_status(
    config: &ProgramConfig,
    accounts: change_market_status::Accounts,
    params: change_market_status::Params,
) -> ClientResult<Instruction> {
    PhoenixInstruction::ChangeMarketStatus(params).into_instruction(config, &accounts)
}

pub fn change_seat_status(
    config: &ProgramConfig,
    accounts: change_seat_status::Accounts,
    params: change_seat_status::Params,
) -> ClientResult<Instruction> {
    PhoenixInstruction::ChangeSeatStatus(params).into_instruction(config, &accounts)
}

pub fn request_seat(
    config: &ProgramConfig,
    accounts: request_seat::Accounts,
) -> ClientResult<Instruction> {
    PhoenixInstruction::RequestSeat.into_instruction(config, &accounts)
}

/// Deposit funds onto the trader's seat. The seat must already be approved.
pub fn deposit_funds(
    config: &ProgramConfig,
    accounts: deposit_funds::Accounts,
    params: deposit_funds::Params,
) -> ClientResult<Instruction> {
    params.validate()?;
    PhoenixInstruction::DepositFunds(params).into_instruction(config, &accounts)
}

/// Post a limit order settled from deposited funds. The funds must be deposited and confirmed
/// before this lands.
pub fn place_limit_order_with_free_funds(
    config: &ProgramConfig,
    accounts: place_limit_order::Accounts,
    params: place_limit_order::Params,
) -> ClientResult<Instruction> {
    params.validate()?;
    PhoenixInstruction::PlaceLimitOrderWithFreeFunds(params).into_instruction(config, &accounts)
}

pub fn cancel_all_orders(
    config: &ProgramConfig,
    accounts: cancel_all_orders::Accounts,
) -> ClientResult<Instruction> {
    PhoenixInstruction::CancelAllOrders.into_instruction(config, &accounts)
}

/// Reclaim the rent of a market that has reached `Closed`.
pub fn close_market(
    config: &ProgramConfig,
    accounts: close_market::Accounts,
) -> ClientResult<Instruction> {
    PhoenixInstruction::CloseMarket.into_instruction(config, &accounts)
}
