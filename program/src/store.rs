// UOS Raffle - Record Store
use solana_program::program_pack::Pack;
use std::collections::{BTreeMap, HashMap};

use crate::{
    error::RaffleError,
    state::{RaffleRecord, SeatRecord},
};

/// Keyed collection a record lives in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    /// Global raffle definitions, keyed by raffle id
    Raffles,
    /// Seats sold for one raffle, keyed by sequential seat id
    Seats(u64),
}

/// Durable keyed-record store.
///
/// Writes made between `begin` and `commit` become visible immediately to
/// reads, and are all undone by `rollback`.
pub trait RecordStore {
    fn find(&self, scope: Scope, key: u64) -> Option<Vec<u8>>;

    /// Next unused key in the scope. Keys are never handed out twice, even
    /// after the record holding them is erased.
    fn next_key(&self, scope: Scope) -> u64;

    /// Inserts a new record; fails with `RecordExists` if the key is taken
    fn create(&mut self, scope: Scope, key: u64, data: Vec<u8>) -> Result<(), RaffleError>;

    /// Replaces an existing record; fails with `RecordMissing` if absent
    fn modify(&mut self, scope: Scope, key: u64, data: Vec<u8>) -> Result<(), RaffleError>;

    /// Removes an existing record; fails with `RecordMissing` if absent
    fn erase(&mut self, scope: Scope, key: u64) -> Result<(), RaffleError>;

    /// Number of records in the scope
    fn len(&self, scope: Scope) -> u64;

    /// The `index`-th live record of the scope in insertion order
    fn nth(&self, scope: Scope, index: u64) -> Option<(u64, Vec<u8>)>;

    fn begin(&mut self);
    fn commit(&mut self);
    fn rollback(&mut self);
}

#[derive(Debug, Default, Clone)]
struct Table {
    rows: BTreeMap<u64, Vec<u8>>,
    /// Keys of live rows in insertion order
    order: Vec<u64>,
    next_key: u64,
}

#[derive(Debug, Clone)]
enum Undo {
    Created {
        scope: Scope,
        key: u64,
        previous_next_key: u64,
    },
    Modified {
        scope: Scope,
        key: u64,
        previous: Vec<u8>,
    },
    Erased {
        scope: Scope,
        key: u64,
        previous: Vec<u8>,
        position: usize,
    },
}

/// In-memory `RecordStore` with an undo journal per transaction
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    tables: HashMap<Scope, Table>,
    journal: Option<Vec<Undo>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_transaction(&self) -> bool {
        self.journal.is_some()
    }

    fn record(&mut self, undo: Undo) {
        if let Some(journal) = self.journal.as_mut() {
            journal.push(undo);
        }
    }

    fn undo(&mut self, undo: Undo) {
        match undo {
            Undo::Created {
                scope,
                key,
                previous_next_key,
            } => {
                if let Some(table) = self.tables.get_mut(&scope) {
                    table.rows.remove(&key);
                    table.order.retain(|k| *k != key);
                    table.next_key = previous_next_key;
                }
            }
            Undo::Modified {
                scope,
                key,
                previous,
            } => {
                let table = self.tables.entry(scope).or_default();
                table.rows.insert(key, previous);
            }
            Undo::Erased {
                scope,
                key,
                previous,
                position,
            } => {
                let table = self.tables.entry(scope).or_default();
                table.rows.insert(key, previous);
                let position = position.min(table.order.len());
                table.order.insert(position, key);
            }
        }
    }
}

impl RecordStore for MemoryStore {
    fn find(&self, scope: Scope, key: u64) -> Option<Vec<u8>> {
        self.tables.get(&scope)?.rows.get(&key).cloned()
    }

    fn next_key(&self, scope: Scope) -> u64 {
        self.tables.get(&scope).map_or(0, |table| table.next_key)
    }

    fn create(&mut self, scope: Scope, key: u64, data: Vec<u8>) -> Result<(), RaffleError> {
        let table = self.tables.entry(scope).or_default();
        if table.rows.contains_key(&key) {
            return Err(RaffleError::RecordExists);
        }
        let previous_next_key = table.next_key;
        table.rows.insert(key, data);
        table.order.push(key);
        if key >= table.next_key {
            table.next_key = key.saturating_add(1);
        }
        self.record(Undo::Created {
            scope,
            key,
            previous_next_key,
        });
        Ok(())
    }

    fn modify(&mut self, scope: Scope, key: u64, data: Vec<u8>) -> Result<(), RaffleError> {
        let row = self
            .tables
            .get_mut(&scope)
            .and_then(|table| table.rows.get_mut(&key))
            .ok_or(RaffleError::RecordMissing)?;
        let previous = std::mem::replace(row, data);
        self.record(Undo::Modified {
            scope,
            key,
            previous,
        });
        Ok(())
    }

    fn erase(&mut self, scope: Scope, key: u64) -> Result<(), RaffleError> {
        let table = self
            .tables
            .get_mut(&scope)
            .ok_or(RaffleError::RecordMissing)?;
        let previous = table.rows.remove(&key).ok_or(RaffleError::RecordMissing)?;
        let position = table
            .order
            .iter()
            .position(|k| *k == key)
            .ok_or(RaffleError::InternalInconsistency)?;
        table.order.remove(position);
        self.record(Undo::Erased {
            scope,
            key,
            previous,
            position,
        });
        Ok(())
    }

    fn len(&self, scope: Scope) -> u64 {
        self.tables
            .get(&scope)
            .map_or(0, |table| table.order.len() as u64)
    }

    fn nth(&self, scope: Scope, index: u64) -> Option<(u64, Vec<u8>)> {
        let table = self.tables.get(&scope)?;
        let index = usize::try_from(index).ok()?;
        let key = *table.order.get(index)?;
        table.rows.get(&key).map(|data| (key, data.clone()))
    }

    fn begin(&mut self) {
        if self.journal.is_none() {
            self.journal = Some(Vec::new());
        }
    }

    fn commit(&mut self) {
        self.journal = None;
    }

    fn rollback(&mut self) {
        if let Some(journal) = self.journal.take() {
            for undo in journal.into_iter().rev() {
                self.undo(undo);
            }
        }
    }
}

/// Loads a raffle definition; `NotFound` if absent
pub fn load_raffle<S: RecordStore + ?Sized>(
    store: &S,
    raffle_id: u64,
) -> Result<RaffleRecord, RaffleError> {
    let data = store
        .find(Scope::Raffles, raffle_id)
        .ok_or(RaffleError::NotFound)?;
    Ok(RaffleRecord::unpack(&data)?)
}

pub fn save_raffle<S: RecordStore + ?Sized>(
    store: &mut S,
    raffle: &RaffleRecord,
) -> Result<(), RaffleError> {
    store.modify(Scope::Raffles, raffle.id, raffle.to_bytes())
}

/// Every seat sold for a raffle, in purchase order
pub fn load_seats<S: RecordStore + ?Sized>(
    store: &S,
    raffle_id: u64,
) -> Result<Vec<SeatRecord>, RaffleError> {
    let scope = Scope::Seats(raffle_id);
    (0..store.len(scope))
        .map(|index| {
            let (_, data) = store
                .nth(scope, index)
                .ok_or(RaffleError::InternalInconsistency)?;
            Ok(SeatRecord::unpack(&data)?)
        })
        .collect()
}
