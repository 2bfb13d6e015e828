// UOS Raffle - Errors
use solana_program::program_error::ProgramError;
use thiserror::Error;

/// Errors that may be returned by the raffle core.
///
/// Every variant aborts the transaction it was raised in.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RaffleError {
    /// Creation or resize parameters were rejected
    #[error("Invalid raffle parameters")]
    InvalidParameters,

    /// Raffle id does not exist
    #[error("Raffle id does not exist")]
    NotFound,

    /// Raffle already has a winner
    #[error("This raffle already has a winner")]
    AlreadyResolved,

    /// Every seat has been allocated
    #[error("Max seats allocated")]
    SeatsExhausted,

    /// Deposit is lower than the seat price or in another currency
    #[error("Quantity received is lower than seat price for this raffle")]
    InsufficientDeposit,

    /// Draw requested before the raffle can be resolved
    #[error("Seats are not allocated yet")]
    NotReady,

    /// Payout split does not add up
    #[error("Payout split violates the pooled funds invariant")]
    ArithmeticInvariantViolation,

    /// Drawn seat index has no seat record
    #[error("Drawn seat does not exist")]
    InternalInconsistency,

    /// Signer is not the configured operator
    #[error("Only the raffle operator can perform this action")]
    Unauthorized,

    /// Deposit memo does not carry a raffle id
    #[error("Deposit memo is not a raffle id")]
    InvalidMemo,

    /// Instruction data could not be decoded
    #[error("Invalid instruction data")]
    InvalidInstruction,

    /// Store already holds a record under this key
    #[error("Record already exists")]
    RecordExists,

    /// Store holds no record under this key
    #[error("Record does not exist")]
    RecordMissing,

    /// Stored bytes do not unpack into a record
    #[error("Stored record data is invalid")]
    InvalidRecordData,
}

impl From<RaffleError> for ProgramError {
    fn from(e: RaffleError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl From<ProgramError> for RaffleError {
    fn from(e: ProgramError) -> Self {
        match e {
            ProgramError::InvalidInstructionData => RaffleError::InvalidInstruction,
            _ => RaffleError::InvalidRecordData,
        }
    }
}
