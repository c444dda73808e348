use num_derive::FromPrimitive;
use solana_program::program_error::ProgramError;
use thiserror::Error;

pub type ClientResult<T = ()> = Result<T, ClientError>;

/// The failure classes a caller can branch on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
pub enum ErrorKind {
    Configuration,
    Quantization,
    Derivation,
    Encoding,
    ExternalRejection,
    SequencingViolation,
    NotFound,
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Missing discriminator for {operation}: it must be supplied by the live protocol")]
    MissingDiscriminator { operation: &'static str },
    #[error("Invalid quantity for {field}: {value}")]
    InvalidQuantity { field: &'static str, value: f64 },
    #[error("{field} exceeds the market's 64-bit capacity")]
    Overflow { field: &'static str },
    #[error("No off-curve address exists for the provided seeds")]
    NoValidAddress,
    #[error("Seeds rejected by the address derivation: {0}")]
    InvalidSeeds(String),
    #[error("{operation} (discriminator {discriminator}) payload is {actual} bytes, expected {expected}")]
    PayloadSize {
        operation: &'static str,
        discriminator: u8,
        expected: usize,
        actual: usize,
    },
    #[error("{operation} payload is malformed: {reason}")]
    InvalidPayload {
        operation: &'static str,
        reason: String,
    },
    #[error("Unknown discriminator {0}")]
    UnknownDiscriminator(u8),
    #[error("{operation} rejected by the program: {message}")]
    ExternalRejection {
        operation: String,
        discriminator: Option<u8>,
        message: String,
        logs: Vec<String>,
    },
    #[error("{operation} is not allowed: {reason}")]
    SequencingViolation {
        operation: &'static str,
        reason: String,
    },
    #[error("Market status change interrupted at {reached}: {source}")]
    TransitionInterrupted {
        /// The last status confirmed on chain.
        reached: crate::state::MarketStatus,
        #[source]
        source: Box<ClientError>,
    },
    #[error("No candidate discriminator simulated without a program error")]
    NotFound,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Configuration(_) | ClientError::MissingDiscriminator { .. } => {
                ErrorKind::Configuration
            }
            ClientError::InvalidQuantity { .. } | ClientError::Overflow { .. } => {
                ErrorKind::Quantization
            }
            ClientError::NoValidAddress | ClientError::InvalidSeeds(_) => ErrorKind::Derivation,
            ClientError::PayloadSize { .. }
            | ClientError::InvalidPayload { .. }
            | ClientError::UnknownDiscriminator(_) => ErrorKind::Encoding,
            ClientError::ExternalRejection { .. } => ErrorKind::ExternalRejection,
            ClientError::SequencingViolation { .. } => ErrorKind::SequencingViolation,
            ClientError::TransitionInterrupted { source, .. } => source.kind(),
            ClientError::NotFound => ErrorKind::NotFound,
        }
    }

    pub(crate) fn config<S: Into<String>>(reason: S) -> Self {
        ClientError::Configuration(reason.into())
    }
}

impl From<ClientError> for ProgramError {
    fn from(e: ClientError) -> Self {
        ProgramError::Custom(e.kind() as u32)
    }
}
