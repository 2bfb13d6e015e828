// UOS Raffle - Ledger gateway
use solana_program::{msg, pubkey::Pubkey};

use crate::state::Asset;

/// Outbound value movement requested by the core.
///
/// A request, not a settlement: the core never observes whether the ledger
/// honors it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingTransfer {
    pub to: Pubkey,
    pub quantity: Asset,
    pub memo: String,
}

/// Inbound deposit delivered by the ledger
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepositNotice {
    pub sender: Pubkey,
    pub recipient: Pubkey,
    pub amount: Asset,
    pub memo: String,
}

/// Executes value transfers on behalf of the core
pub trait LedgerGateway {
    fn request_transfer(&mut self, transfer: PendingTransfer);
}

/// Transfers queued by an operation that has not committed yet
#[derive(Debug, Default)]
pub struct Outbox {
    queued: Vec<PendingTransfer>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a transfer; zero quantities are dropped
    pub fn push(&mut self, to: Pubkey, quantity: Asset, memo: String) {
        if quantity.amount == 0 {
            msg!("Skipping zero transfer to {}", to);
            return;
        }
        self.queued.push(PendingTransfer { to, quantity, memo });
    }

    pub fn queued(&self) -> &[PendingTransfer] {
        &self.queued
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    /// Hands every queued transfer to the gateway
    pub fn flush<L: LedgerGateway + ?Sized>(&mut self, ledger: &mut L) {
        for transfer in self.queued.drain(..) {
            msg!("Requesting transfer of {} to {}", transfer.quantity, transfer.to);
            ledger.request_transfer(transfer);
        }
    }

    pub fn discard(&mut self) {
        self.queued.clear();
    }
}

/// Gateway that only remembers what it was asked to send
#[derive(Debug, Default)]
pub struct RecordingLedger {
    pub requested: Vec<PendingTransfer>,
}

impl RecordingLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerGateway for RecordingLedger {
    fn request_transfer(&mut self, transfer: PendingTransfer) {
        self.requested.push(transfer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Symbol;

    #[test]
    fn flush_moves_queue_to_ledger() {
        let symbol = Symbol::new("UOS", 8).unwrap();
        let payee = Pubkey::new_unique();
        let mut outbox = Outbox::new();
        outbox.push(payee, Asset::new(5, symbol), "first".to_string());
        outbox.push(payee, Asset::zero(symbol), "empty".to_string());
        assert_eq!(outbox.queued().len(), 1);

        let mut ledger = RecordingLedger::new();
        outbox.flush(&mut ledger);
        assert!(outbox.is_empty());
        assert_eq!(ledger.requested.len(), 1);
        assert_eq!(ledger.requested[0].memo, "first");
    }

    #[test]
    fn discard_drops_queue() {
        let symbol = Symbol::new("UOS", 8).unwrap();
        let mut outbox = Outbox::new();
        outbox.push(Pubkey::new_unique(), Asset::new(5, symbol), "x".to_string());
        outbox.discard();
        let mut ledger = RecordingLedger::new();
        outbox.flush(&mut ledger);
        assert!(ledger.requested.is_empty());
    }
}
