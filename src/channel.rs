//! The seam to the external submission channel.
//!
//! Implementations own transport, signing, retries and timeouts. Errors reported by the program
//! must come back as [`ClientError::ExternalRejection`] carrying the program logs verbatim.
use solana_program::instruction::Instruction;
use solana_sdk::signature::Signature;

use crate::{
    error::{ClientError, ClientResult},
    instruction::DiscriminatorTable,
};

/// Dry-runs transactions without committing them.
pub trait Simulator {
    /// Simulates the instructions as a single transaction.
    fn simulate(&self, instructions: &[Instruction]) -> ClientResult;
}

/// Commits transactions.
pub trait Submitter: Simulator {
    /// Sends the instructions as a single transaction and waits for confirmation.
    fn submit_and_confirm(&self, instructions: &[Instruction]) -> ClientResult<Signature>;
}

impl<T: Simulator + ?Sized> Simulator for &T {
    fn simulate(&self, instructions: &[Instruction]) -> ClientResult {
        (**self).simulate(instructions)
    }
}

impl<T: Submitter + ?Sized> Submitter for &T {
    fn submit_and_confirm(&self, instructions: &[Instruction]) -> ClientResult<Signature> {
        (**self).submit_and_confirm(instructions)
    }
}

/// Builds the rejection an implementation reports when the program fails an instruction.
///
/// The operation is named after the first instruction's discriminator.
pub fn rejection(
    instructions: &[Instruction],
    table: &DiscriminatorTable,
    message: impl Into<String>,
    logs: Vec<String>,
) -> ClientError {
    let discriminator = instructions.first().and_then(|ix| ix.data.first().copied());
    ClientError::ExternalRejection {
        operation: match discriminator.map(|d| (d, table.operation_for(d))) {
            Some((_, Ok(operation))) => operation.name().to_string(),
            Some((d, Err(_))) => format!("instruction {d}"),
            None => "transaction".to_string(),
        },
        discriminator,
        message: message.into(),
        logs,
    }
}
