// UOS Raffle - Raffle registry
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{msg, pubkey::Pubkey};

use crate::{
    config::{RaffleSettings, BASIS_POINTS},
    error::RaffleError,
    state::{Asset, RaffleRecord, Winner},
    store::{load_raffle, save_raffle, RecordStore, Scope},
};

/// Minimum seats a raffle can be created with
pub const MIN_SEAT_CAPACITY: u32 = 2;

/// Terms of a new raffle
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct CreateRaffle {
    pub seat_capacity: u32,
    pub seat_price: Asset,
    /// Commission in basis points, at least `min_commission_bps`
    pub commission_bps: u16,
    pub commission_payee: Pubkey,
    pub require_full_allocation: bool,
}

/// Stores a new raffle and returns its id
pub fn create<S: RecordStore + ?Sized>(
    store: &mut S,
    settings: &RaffleSettings,
    terms: &CreateRaffle,
) -> Result<u64, RaffleError> {
    if terms.seat_capacity < MIN_SEAT_CAPACITY {
        msg!("A minimum of {} seats are required", MIN_SEAT_CAPACITY);
        return Err(RaffleError::InvalidParameters);
    }
    if terms.seat_price.symbol != settings.accepted_symbol {
        msg!("Seat price must be in {}", settings.accepted_symbol);
        return Err(RaffleError::InvalidParameters);
    }
    if terms.seat_price.amount == 0 {
        msg!("Seat price must be greater than zero");
        return Err(RaffleError::InvalidParameters);
    }
    if terms.commission_bps < settings.min_commission_bps {
        msg!(
            "Commission basis points should be at least {}",
            settings.min_commission_bps
        );
        return Err(RaffleError::InvalidParameters);
    }
    if terms.commission_bps as u32 + settings.platform_fee_bps as u32 > BASIS_POINTS as u32 {
        msg!("Commission plus platform fee cannot exceed 100%");
        return Err(RaffleError::InvalidParameters);
    }

    // Zero marks an absent raffle and is never issued
    let id = match store.next_key(Scope::Raffles) {
        0 => 1,
        key => key,
    };

    let raffle = RaffleRecord {
        id,
        seat_capacity: terms.seat_capacity,
        allocated_seats: 0,
        seat_price: terms.seat_price,
        require_full_allocation: terms.require_full_allocation,
        commission_bps: terms.commission_bps,
        commission_payee: terms.commission_payee,
        pooled_funds: Asset::zero(settings.accepted_symbol),
        winner: Winner::Unresolved,
    };
    store.create(Scope::Raffles, id, raffle.to_bytes())?;

    msg!(
        "Raffle {} created: seats={}, price={}, commission={}bp",
        id,
        raffle.seat_capacity,
        raffle.seat_price,
        raffle.commission_bps
    );
    Ok(id)
}

/// Grows a raffle's seat capacity
pub fn resize<S: RecordStore + ?Sized>(
    store: &mut S,
    raffle_id: u64,
    new_capacity: u32,
) -> Result<(), RaffleError> {
    let mut raffle = load_raffle(store, raffle_id)?;

    if raffle.winner.is_resolved() {
        msg!("Raffle {} already has a winner", raffle_id);
        return Err(RaffleError::AlreadyResolved);
    }
    // Shrinking could strand seats that were already sold
    if new_capacity <= raffle.seat_capacity {
        msg!(
            "The new number of seats cannot be lower or equal to {}",
            raffle.seat_capacity
        );
        return Err(RaffleError::InvalidParameters);
    }

    raffle.seat_capacity = new_capacity;
    save_raffle(store, &raffle)?;

    msg!("Raffle {} capacity updated to {}", raffle_id, new_capacity);
    Ok(())
}

/// Deletes an unresolved raffle. Seats and pooled funds stay where they are.
pub fn invalidate<S: RecordStore + ?Sized>(
    store: &mut S,
    raffle_id: u64,
) -> Result<(), RaffleError> {
    let raffle = load_raffle(store, raffle_id)?;

    if raffle.winner.is_resolved() {
        msg!("Cannot invalidate a raffle with a winner");
        return Err(RaffleError::AlreadyResolved);
    }
    if raffle.allocated_seats > 0 {
        msg!(
            "Raffle {} invalidated with {} seats sold; {} stays locked",
            raffle_id,
            raffle.allocated_seats,
            raffle.pooled_funds
        );
    }

    store.erase(Scope::Raffles, raffle_id)?;

    msg!("Raffle {} invalidated", raffle_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{state::Symbol, store::MemoryStore};

    fn settings() -> RaffleSettings {
        RaffleSettings::new(Pubkey::new_unique(), Pubkey::new_unique())
    }

    fn terms(settings: &RaffleSettings) -> CreateRaffle {
        CreateRaffle {
            seat_capacity: 2,
            seat_price: Asset::new(100_000_000, settings.accepted_symbol),
            commission_bps: 300,
            commission_payee: Pubkey::new_unique(),
            require_full_allocation: false,
        }
    }

    #[test]
    fn first_raffle_gets_id_one() {
        let settings = settings();
        let mut store = MemoryStore::new();
        assert_eq!(create(&mut store, &settings, &terms(&settings)), Ok(1));
        assert_eq!(create(&mut store, &settings, &terms(&settings)), Ok(2));

        let raffle = load_raffle(&store, 1).unwrap();
        assert_eq!(raffle.allocated_seats, 0);
        assert_eq!(raffle.pooled_funds, Asset::zero(settings.accepted_symbol));
        assert_eq!(raffle.winner, Winner::Unresolved);
    }

    #[test]
    fn create_validates_terms() {
        let settings = settings();
        let mut store = MemoryStore::new();

        let one_seat = CreateRaffle {
            seat_capacity: 1,
            ..terms(&settings)
        };
        let foreign = CreateRaffle {
            seat_price: Asset::new(1, Symbol::new("EOS", 4).unwrap()),
            ..terms(&settings)
        };
        let cheap_commission = CreateRaffle {
            commission_bps: 250,
            ..terms(&settings)
        };
        let free = CreateRaffle {
            seat_price: Asset::zero(settings.accepted_symbol),
            ..terms(&settings)
        };
        let greedy = CreateRaffle {
            commission_bps: 9_800,
            ..terms(&settings)
        };

        for bad in [one_seat, foreign, cheap_commission, free, greedy] {
            assert_eq!(
                create(&mut store, &settings, &bad),
                Err(RaffleError::InvalidParameters)
            );
        }
        assert_eq!(store.len(Scope::Raffles), 0);

        let boundary = CreateRaffle {
            commission_bps: 251,
            ..terms(&settings)
        };
        assert!(create(&mut store, &settings, &boundary).is_ok());
    }

    #[test]
    fn resize_only_grows() {
        let settings = settings();
        let mut store = MemoryStore::new();
        let id = create(&mut store, &settings, &terms(&settings)).unwrap();

        assert_eq!(resize(&mut store, id, 2), Err(RaffleError::InvalidParameters));
        assert_eq!(resize(&mut store, id, 1), Err(RaffleError::InvalidParameters));
        assert_eq!(resize(&mut store, 99, 5), Err(RaffleError::NotFound));
        assert_eq!(resize(&mut store, id, 3), Ok(()));
        assert_eq!(load_raffle(&store, id).unwrap().seat_capacity, 3);
    }

    #[test]
    fn invalidate_removes_record() {
        let settings = settings();
        let mut store = MemoryStore::new();
        let id = create(&mut store, &settings, &terms(&settings)).unwrap();

        assert_eq!(invalidate(&mut store, id), Ok(()));
        assert_eq!(load_raffle(&store, id), Err(RaffleError::NotFound));
        assert_eq!(invalidate(&mut store, id), Err(RaffleError::NotFound));

        // ids are not recycled after invalidation
        assert_eq!(create(&mut store, &settings, &terms(&settings)), Ok(2));
    }

    #[test]
    fn resolved_raffle_is_frozen() {
        let settings = settings();
        let mut store = MemoryStore::new();
        let id = create(&mut store, &settings, &terms(&settings)).unwrap();
        let mut raffle = load_raffle(&store, id).unwrap();
        raffle.winner = Winner::Resolved(Pubkey::new_unique());
        save_raffle(&mut store, &raffle).unwrap();

        assert_eq!(resize(&mut store, id, 10), Err(RaffleError::AlreadyResolved));
        assert_eq!(invalidate(&mut store, id), Err(RaffleError::AlreadyResolved));
        assert!(load_raffle(&store, id).is_ok());
    }
}
