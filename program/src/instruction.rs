// UOS Raffle - Instructions
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use crate::{error::RaffleError, state::Asset};

/// Operator instructions. Every variant must be signed by the operator.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum RaffleInstruction {
    /// Create a new raffle
    ///
    /// Returns the new raffle id.
    CreateRaffle {
        /// Seats on sale, at least 2
        seat_capacity: u32,
        /// Price per seat in the accepted currency
        seat_price: Asset,
        /// Commission in basis points
        commission_bps: u16,
        /// Receiver of the commission
        commission_payee: Pubkey,
        /// Only allow the draw once every seat is sold
        require_full_allocation: bool,
    },

    /// Increase the number of seats of an open raffle
    UpdateSeats {
        raffle_id: u64,
        /// Must be strictly greater than the current capacity
        new_capacity: u32,
    },

    /// Pick the winner and request both payouts
    Draw { raffle_id: u64 },

    /// Delete an open raffle without refunding its seats
    Invalidate { raffle_id: u64 },
}

impl RaffleInstruction {
    /// Unpacks a byte buffer into a RaffleInstruction
    pub fn unpack(input: &[u8]) -> Result<Self, RaffleError> {
        Self::try_from_slice(input).map_err(|_| RaffleError::InvalidInstruction)
    }

    /// Packs a RaffleInstruction into a byte buffer
    pub fn pack(&self) -> Result<Vec<u8>, RaffleError> {
        self.try_to_vec()
            .map_err(|_| RaffleError::InvalidInstruction)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateRaffle { .. } => "Create Raffle",
            Self::UpdateSeats { .. } => "Update Seats",
            Self::Draw { .. } => "Draw",
            Self::Invalidate { .. } => "Invalidate",
        }
    }
}

/// Create create_raffle instruction data
pub fn create_raffle(
    seat_capacity: u32,
    seat_price: Asset,
    commission_bps: u16,
    commission_payee: &Pubkey,
    require_full_allocation: bool,
) -> Result<Vec<u8>, RaffleError> {
    RaffleInstruction::CreateRaffle {
        seat_capacity,
        seat_price,
        commission_bps,
        commission_payee: *commission_payee,
        require_full_allocation,
    }
    .pack()
}

/// Create update_seats instruction data
pub fn update_seats(raffle_id: u64, new_capacity: u32) -> Result<Vec<u8>, RaffleError> {
    RaffleInstruction::UpdateSeats {
        raffle_id,
        new_capacity,
    }
    .pack()
}

/// Create draw instruction data
pub fn draw(raffle_id: u64) -> Result<Vec<u8>, RaffleError> {
    RaffleInstruction::Draw { raffle_id }.pack()
}

/// Create invalidate instruction data
pub fn invalidate(raffle_id: u64) -> Result<Vec<u8>, RaffleError> {
    RaffleInstruction::Invalidate { raffle_id }.pack()
}
