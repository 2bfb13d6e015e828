// UOS Raffle - Seat allocator
use solana_program::msg;

use crate::{
    config::RaffleSettings,
    error::RaffleError,
    ledger::DepositNotice,
    state::SeatRecord,
    store::{load_raffle, save_raffle, RecordStore, Scope},
};

/// What a deposit notice turned into
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepositOutcome {
    /// Not addressed to the pool, or no memo; nothing was written
    Ignored,
    /// A seat was sold
    Allocated { raffle_id: u64, seat_id: u64 },
}

/// Reads the raffle id out of a deposit memo.
///
/// Surrounding whitespace is tolerated; anything else that is not a decimal
/// `u64` is rejected rather than read as raffle zero.
pub fn parse_memo(memo: &str) -> Result<u64, RaffleError> {
    memo.trim().parse::<u64>().map_err(|_| {
        msg!("Deposit memo {:?} is not a raffle id", memo);
        RaffleError::InvalidMemo
    })
}

/// Turns an inbound deposit into a seat
pub fn allocate<S: RecordStore + ?Sized>(
    store: &mut S,
    settings: &RaffleSettings,
    notice: &DepositNotice,
) -> Result<DepositOutcome, RaffleError> {
    if notice.recipient != settings.pool || notice.memo.is_empty() {
        return Ok(DepositOutcome::Ignored);
    }

    let raffle_id = parse_memo(&notice.memo)?;
    let mut raffle = load_raffle(store, raffle_id)?;

    if raffle.winner.is_resolved() {
        msg!("Raffle {} already has a winner", raffle_id);
        return Err(RaffleError::AlreadyResolved);
    }
    if raffle.is_full() {
        msg!("Raffle {} has every seat allocated", raffle_id);
        return Err(RaffleError::SeatsExhausted);
    }
    if notice.amount.symbol != raffle.seat_price.symbol
        || notice.amount.amount < raffle.seat_price.amount
    {
        msg!(
            "Deposit of {} does not cover seat price {}",
            notice.amount,
            raffle.seat_price
        );
        return Err(RaffleError::InsufficientDeposit);
    }

    // Overpayment stays in the pool with the rest of the deposit
    raffle.pooled_funds = raffle
        .pooled_funds
        .checked_add(&notice.amount)
        .ok_or(RaffleError::ArithmeticInvariantViolation)?;
    raffle.allocated_seats = raffle
        .allocated_seats
        .checked_add(1)
        .ok_or(RaffleError::ArithmeticInvariantViolation)?;

    let scope = Scope::Seats(raffle_id);
    let seat = SeatRecord {
        id: store.next_key(scope),
        holder: notice.sender,
    };
    store.create(scope, seat.id, seat.to_bytes())?;
    save_raffle(store, &raffle)?;

    msg!(
        "Seat {} of raffle {} allocated to {} ({}/{})",
        seat.id,
        raffle_id,
        seat.holder,
        raffle.allocated_seats,
        raffle.seat_capacity
    );
    Ok(DepositOutcome::Allocated {
        raffle_id,
        seat_id: seat.id,
    })
}
