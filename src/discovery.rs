//! Empirical discovery of undocumented discriminators.
//!
//! A probe simulates a fully formed instruction once per candidate byte and keeps the first one
//! the program accepts. It only ever simulates: the harness takes a [`Simulator`], which has no
//! way to commit a transaction. Acceptance says nothing about what the discriminator does.
use solana_program::{
    instruction::{AccountMeta, Instruction},
    msg,
    pubkey::Pubkey,
};

use crate::{
    channel::Simulator,
    error::{ClientError, ClientResult},
    utils::{build_instruction, InstructionAccounts},
};

/// Everything about an instruction except its discriminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionShape {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub payload: Vec<u8>,
}

impl InstructionShape {
    /// A shape using the standard account prefix of the program id and log authority.
    pub fn new(
        program_id: &Pubkey,
        accounts: &dyn InstructionAccounts,
        payload: Vec<u8>,
    ) -> ClientResult<Self> {
        let Instruction {
            program_id,
            accounts,
            data,
        } = build_instruction(program_id, accounts, payload)?;
        Ok(Self {
            program_id,
            accounts,
            payload: data,
        })
    }

    pub fn with_discriminator(&self, discriminator: u8) -> Instruction {
        let mut data = Vec::with_capacity(1 + self.payload.len());
        data.push(discriminator);
        data.extend_from_slice(&self.payload);
        Instruction {
            program_id: self.program_id,
            accounts: self.accounts.clone(),
            data,
        }
    }
}

/// The ranges historically swept when looking for trading and funding instructions.
pub fn default_candidates() -> Vec<u8> {
    (0..20).chain(100..116).chain(200..206).chain(250..=255).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedCandidate {
    pub discriminator: u8,
    pub message: String,
    pub logs: Vec<String>,
}

/// The outcome of a probe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeReport {
    pub accepted: Option<u8>,
    /// Candidates the program rejected, in probing order.
    pub rejected: Vec<RejectedCandidate>,
}

/// Returns the first candidate whose simulation reports no program error.
pub fn probe<S, I>(simulator: &S, candidates: I, shape: &InstructionShape) -> ClientResult<u8>
where
    S: Simulator + ?Sized,
    I: IntoIterator<Item = u8>,
{
    probe_with_report(simulator, candidates, shape)?
        .accepted
        .ok_or(ClientError::NotFound)
}

/// Like [`probe`], also returning every rejection seen on the way.
///
/// Failures that are not program rejections, such as a broken connection, stop the probe.
pub fn probe_with_report<S, I>(
    simulator: &S,
    candidates: I,
    shape: &InstructionShape,
) -> ClientResult<ProbeReport>
where
    S: Simulator + ?Sized,
    I: IntoIterator<Item = u8>,
{
    let mut report = ProbeReport::default();
    for discriminator in candidates {
        match simulator.simulate(&[shape.with_discriminator(discriminator)]) {
            Ok(()) => {
                msg!("Discriminator {} accepted", discriminator);
                report.accepted = Some(discriminator);
                break;
            }
            Err(ClientError::ExternalRejection { message, logs, .. }) => {
                msg!("Discriminator {} rejected: {}", discriminator, message);
                report.rejected.push(RejectedCandidate {
                    discriminator,
                    message,
                    logs,
                });
            }
            Err(e) => return Err(e),
        }
    }
    Ok(report)
}
