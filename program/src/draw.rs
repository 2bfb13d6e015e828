// UOS Raffle - Draw engine
use solana_program::{msg, program_pack::Pack, pubkey::Pubkey};

use crate::{
    config::{RaffleSettings, BASIS_POINTS},
    error::RaffleError,
    ledger::Outbox,
    randomness::RandomnessSource,
    state::{Asset, SeatRecord, Winner},
    store::{load_raffle, save_raffle, RecordStore, Scope},
};

/// How the pooled funds are divided at draw time
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PayoutSplit {
    /// Paid to the raffle's commission payee
    pub commission: Asset,
    /// Retained by the platform
    pub platform_fee: Asset,
    /// Paid to the winning seat holder
    pub winner_pot: Asset,
}

/// Result of a committed draw
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawOutcome {
    pub raffle_id: u64,
    pub seat_id: u64,
    pub winner: Pubkey,
    pub split: PayoutSplit,
}

/// `floor(amount * bps / 10000)`
pub fn basis_point_share(amount: u64, bps: u16) -> Result<u64, RaffleError> {
    let share = (amount as u128) * (bps as u128) / (BASIS_POINTS as u128);
    u64::try_from(share).map_err(|_| RaffleError::ArithmeticInvariantViolation)
}

/// Splits `pooled` into commission, platform fee and winner pot.
///
/// The three parts always sum to `pooled`; the pot absorbs the rounding.
pub fn split_pool(
    pooled: &Asset,
    commission_bps: u16,
    platform_fee_bps: u16,
) -> Result<PayoutSplit, RaffleError> {
    let commission = basis_point_share(pooled.amount, commission_bps)?;
    let platform_fee = basis_point_share(pooled.amount, platform_fee_bps)?;
    let winner_pot = pooled
        .amount
        .checked_sub(commission)
        .and_then(|rest| rest.checked_sub(platform_fee))
        .ok_or_else(|| {
            msg!(
                "Commission {} plus platform fee {} exceed pooled {}",
                commission,
                platform_fee,
                pooled.amount
            );
            RaffleError::ArithmeticInvariantViolation
        })?;

    Ok(PayoutSplit {
        commission: Asset::new(commission, pooled.symbol),
        platform_fee: Asset::new(platform_fee, pooled.symbol),
        winner_pot: Asset::new(winner_pot, pooled.symbol),
    })
}

/// Picks a winning seat, queues both payouts and resolves the raffle
pub fn draw<S, R>(
    store: &mut S,
    settings: &RaffleSettings,
    rng: &mut R,
    outbox: &mut Outbox,
    raffle_id: u64,
) -> Result<DrawOutcome, RaffleError>
where
    S: RecordStore + ?Sized,
    R: RandomnessSource + ?Sized,
{
    let mut raffle = load_raffle(store, raffle_id)?;

    if raffle.winner.is_resolved() {
        msg!("Raffle {} already has a winner", raffle_id);
        return Err(RaffleError::AlreadyResolved);
    }
    if raffle.require_full_allocation && raffle.allocated_seats != raffle.seat_capacity {
        msg!(
            "Seats are not fully allocated yet ({}/{})",
            raffle.allocated_seats,
            raffle.seat_capacity
        );
        return Err(RaffleError::NotReady);
    }
    if raffle.allocated_seats == 0 {
        msg!("Raffle {} has no seats to draw from", raffle_id);
        return Err(RaffleError::NotReady);
    }

    let split = split_pool(
        &raffle.pooled_funds,
        raffle.commission_bps,
        settings.platform_fee_bps,
    )?;

    outbox.push(
        raffle.commission_payee,
        split.commission,
        format!("raffle {} commission shares", raffle_id),
    );

    let index = rng.next_in_range(raffle.allocated_seats as u64);
    // Seats are resolved by purchase order, not by key
    let (seat_key, data) = store
        .nth(Scope::Seats(raffle_id), index)
        .ok_or_else(|| {
            msg!("Drawn seat index {} does not exist", index);
            RaffleError::InternalInconsistency
        })?;
    let seat = SeatRecord::unpack(&data)?;
    if seat.id != seat_key {
        msg!("Seat record {} is stored under key {}", seat.id, seat_key);
        return Err(RaffleError::InternalInconsistency);
    }

    outbox.push(
        seat.holder,
        split.winner_pot,
        format!("raffle {} winner shares", raffle_id),
    );

    raffle.winner = Winner::Resolved(seat.holder);
    save_raffle(store, &raffle)?;

    msg!(
        "Raffle {} drawn: seat {} won by {}, pot={}, commission={}, fee={}",
        raffle_id,
        seat.id,
        seat.holder,
        split.winner_pot,
        split.commission,
        split.platform_fee
    );
    Ok(DrawOutcome {
        raffle_id,
        seat_id: seat.id,
        winner: seat.holder,
        split,
    })
}
