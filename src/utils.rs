use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use crate::{
    error::{ClientError, ClientResult},
    pda::get_log_authority,
};

/// The operation-specific account list of an instruction.
///
/// Every instruction starts with the program id and the log authority, both read-only; these are
/// added by [`build_instruction`]. Implementors return the remaining accounts in wire order.
pub trait InstructionAccounts {
    fn get_accounts_vec(&self) -> Vec<AccountMeta>;
}

/// A fixed-layout instruction payload.
pub trait Payload: BorshSerialize + BorshDeserialize {
    /// The shortest valid encoding.
    const MIN_LEN: usize;

    /// The exact encoded length of this value.
    fn payload_len(&self) -> usize {
        Self::MIN_LEN
    }
}

pub fn assert(statement: bool, err: ClientError) -> ClientResult {
    if !statement {
        Err(err)
    } else {
        Ok(())
    }
}

pub(crate) fn build_instruction(
    program_id: &Pubkey,
    accounts: &dyn InstructionAccounts,
    data: Vec<u8>,
) -> ClientResult<Instruction> {
    let mut metas = vec![
        AccountMeta::new_readonly(*program_id, false),
        AccountMeta::new_readonly(get_log_authority(program_id)?, false),
    ];
    metas.extend(accounts.get_accounts_vec());
    Ok(Instruction {
        program_id: *program_id,
        accounts: metas,
        data,
    })
}

pub(crate) fn encode_payload<P: Payload>(
    operation: &'static str,
    discriminator: u8,
    params: &P,
    data: &mut Vec<u8>,
) -> ClientResult {
    let start = data.len();
    params
        .serialize(data)
        .map_err(|e| ClientError::InvalidPayload {
            operation,
            reason: e.to_string(),
        })?;
    let written = data.len() - start;
    assert(
        written == params.payload_len(),
        ClientError::PayloadSize {
            operation,
            discriminator,
            expected: params.payload_len(),
            actual: written,
        },
    )
}

pub(crate) fn decode_payload<P: Payload>(
    operation: &'static str,
    discriminator: u8,
    payload: &[u8],
) -> ClientResult<P> {
    let size_error = |expected| ClientError::PayloadSize {
        operation,
        discriminator,
        expected,
        actual: payload.len(),
    };
    if payload.len() < P::MIN_LEN {
        return Err(size_error(P::MIN_LEN));
    }
    let mut remaining = payload;
    let params = P::deserialize(&mut remaining).map_err(|e| ClientError::InvalidPayload {
        operation,
        reason: e.to_string(),
    })?;
    assert(remaining.is_empty(), size_error(params.payload_len()))?;
    Ok(params)
}
