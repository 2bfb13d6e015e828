// UOS Raffle - Instruction Processor
use solana_program::{msg, pubkey::Pubkey};

use crate::{
    allocator::{self, DepositOutcome},
    config::RaffleSettings,
    draw::{self, DrawOutcome},
    error::RaffleError,
    instruction::RaffleInstruction,
    ledger::{DepositNotice, LedgerGateway, Outbox},
    randomness::RandomnessSource,
    registry::{self, CreateRaffle},
    state::{RaffleRecord, SeatRecord},
    store::{load_raffle, load_seats, RecordStore},
};

/// Result of a committed operator instruction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessOutcome {
    Created { raffle_id: u64 },
    SeatsUpdated,
    Drawn(DrawOutcome),
    Invalidated,
}

/// Runs every raffle operation as one transaction against the store.
///
/// A failing operation leaves no writes behind and requests no transfers;
/// transfers of a successful one reach the ledger only after commit.
pub struct Processor<S, R, L> {
    settings: RaffleSettings,
    store: S,
    rng: R,
    ledger: L,
    outbox: Outbox,
}

impl<S, R, L> Processor<S, R, L>
where
    S: RecordStore,
    R: RandomnessSource,
    L: LedgerGateway,
{
    pub fn new(settings: RaffleSettings, store: S, rng: R, ledger: L) -> Result<Self, RaffleError> {
        settings.validate()?;
        Ok(Self {
            settings,
            store,
            rng,
            ledger,
            outbox: Outbox::new(),
        })
    }

    /// Decodes and runs an operator instruction
    pub fn process(
        &mut self,
        signer: &Pubkey,
        instruction_data: &[u8],
    ) -> Result<ProcessOutcome, RaffleError> {
        let instruction = RaffleInstruction::unpack(instruction_data).map_err(|e| {
            msg!("Raffle error: {}", e);
            e
        })?;
        self.execute(signer, instruction)
    }

    pub fn execute(
        &mut self,
        signer: &Pubkey,
        instruction: RaffleInstruction,
    ) -> Result<ProcessOutcome, RaffleError> {
        msg!("Instruction: {}", instruction.name());

        if *signer != self.settings.operator {
            msg!("Only the operator can sign {}", instruction.name());
            return Err(RaffleError::Unauthorized);
        }

        match instruction {
            RaffleInstruction::CreateRaffle {
                seat_capacity,
                seat_price,
                commission_bps,
                commission_payee,
                require_full_allocation,
            } => {
                let terms = CreateRaffle {
                    seat_capacity,
                    seat_price,
                    commission_bps,
                    commission_payee,
                    require_full_allocation,
                };
                self.transact(|store, settings, _, _| registry::create(store, settings, &terms))
                    .map(|raffle_id| ProcessOutcome::Created { raffle_id })
            }
            RaffleInstruction::UpdateSeats {
                raffle_id,
                new_capacity,
            } => self
                .transact(|store, _, _, _| registry::resize(store, raffle_id, new_capacity))
                .map(|_| ProcessOutcome::SeatsUpdated),
            RaffleInstruction::Draw { raffle_id } => self
                .transact(|store, settings, rng, outbox| {
                    draw::draw(store, settings, rng, outbox, raffle_id)
                })
                .map(ProcessOutcome::Drawn),
            RaffleInstruction::Invalidate { raffle_id } => self
                .transact(|store, _, _, _| registry::invalidate(store, raffle_id))
                .map(|_| ProcessOutcome::Invalidated),
        }
    }

    /// Handles a deposit delivered by the ledger; no operator signature needed
    pub fn on_deposit(&mut self, notice: &DepositNotice) -> Result<DepositOutcome, RaffleError> {
        self.transact(|store, settings, _, _| allocator::allocate(store, settings, notice))
    }

    fn transact<T, F>(&mut self, op: F) -> Result<T, RaffleError>
    where
        F: FnOnce(&mut S, &RaffleSettings, &mut R, &mut Outbox) -> Result<T, RaffleError>,
    {
        self.store.begin();
        match op(&mut self.store, &self.settings, &mut self.rng, &mut self.outbox) {
            Ok(value) => {
                self.store.commit();
                self.outbox.flush(&mut self.ledger);
                Ok(value)
            }
            Err(e) => {
                self.store.rollback();
                self.outbox.discard();
                msg!("Raffle error: {}", e);
                Err(e)
            }
        }
    }

    pub fn raffle(&self, raffle_id: u64) -> Result<RaffleRecord, RaffleError> {
        load_raffle(&self.store, raffle_id)
    }

    /// Seats sold for a raffle, in purchase order
    pub fn seats(&self, raffle_id: u64) -> Result<Vec<SeatRecord>, RaffleError> {
        load_seats(&self.store, raffle_id)
    }

    pub fn settings(&self) -> &RaffleSettings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }
}
