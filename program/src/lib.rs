// UOS Raffle
// A deposit-funded raffle: deposits buy seats, the operator draws a winner

// Core modules
pub mod config;
pub mod error;
pub mod instruction;
pub mod processor;
pub mod state;
pub mod store;

// Raffle lifecycle
pub mod allocator;
pub mod draw;
pub mod registry;

// External collaborators
pub mod ledger;
pub mod randomness;

pub use crate::{
    allocator::DepositOutcome,
    config::RaffleSettings,
    draw::{DrawOutcome, PayoutSplit},
    error::RaffleError,
    ledger::{DepositNotice, LedgerGateway, PendingTransfer, RecordingLedger},
    processor::{ProcessOutcome, Processor},
    randomness::{RandomnessSource, SeededRandomness},
    state::{Asset, RaffleRecord, SeatRecord, Symbol, Winner},
    store::{MemoryStore, RecordStore, Scope},
};
