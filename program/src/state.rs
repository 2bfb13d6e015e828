// UOS Raffle - State
use arrayref::{array_mut_ref, array_ref, array_refs, mut_array_refs};
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    program_error::ProgramError,
    program_pack::{IsInitialized, Pack, Sealed},
    pubkey::Pubkey,
};
use std::fmt;

use crate::error::RaffleError;

/// Maximum number of characters in a symbol code
pub const MAX_SYMBOL_CODE_LEN: usize = 7;
/// Maximum number of decimals a symbol can carry
pub const MAX_SYMBOL_PRECISION: u8 = 18;
/// `8,UOS`, the default raffle currency
pub const UOS_SYMBOL: Symbol = Symbol {
    precision: 8,
    code: *b"UOS\0\0\0\0",
};

/// Currency symbol: a precision plus an uppercase code of up to 7 letters.
///
/// Packs into a single `u64`, precision in the low byte and the code in the
/// following bytes.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Symbol {
    precision: u8,
    code: [u8; MAX_SYMBOL_CODE_LEN],
}

impl Symbol {
    pub fn new(code: &str, precision: u8) -> Result<Self, RaffleError> {
        let bytes = code.as_bytes();
        if bytes.is_empty()
            || bytes.len() > MAX_SYMBOL_CODE_LEN
            || precision > MAX_SYMBOL_PRECISION
            || !bytes.iter().all(u8::is_ascii_uppercase)
        {
            return Err(RaffleError::InvalidParameters);
        }
        let mut padded = [0u8; MAX_SYMBOL_CODE_LEN];
        padded[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            precision,
            code: padded,
        })
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn code(&self) -> &str {
        let len = self
            .code
            .iter()
            .position(|b| *b == 0)
            .unwrap_or(MAX_SYMBOL_CODE_LEN);
        std::str::from_utf8(&self.code[..len]).unwrap_or_default()
    }

    /// True when the code is 1..=7 uppercase letters followed only by padding
    pub fn is_valid(&self) -> bool {
        let len = self
            .code
            .iter()
            .position(|b| *b == 0)
            .unwrap_or(MAX_SYMBOL_CODE_LEN);
        len > 0
            && self.precision <= MAX_SYMBOL_PRECISION
            && self.code[..len].iter().all(u8::is_ascii_uppercase)
            && self.code[len..].iter().all(|b| *b == 0)
    }

    pub fn to_raw(&self) -> u64 {
        let mut bytes = [0u8; 8];
        bytes[0] = self.precision;
        bytes[1..].copy_from_slice(&self.code);
        u64::from_le_bytes(bytes)
    }

    pub fn from_raw(raw: u64) -> Result<Self, ProgramError> {
        let bytes = raw.to_le_bytes();
        let mut code = [0u8; MAX_SYMBOL_CODE_LEN];
        code.copy_from_slice(&bytes[1..]);
        let symbol = Self {
            precision: bytes[0],
            code,
        };
        if !symbol.is_valid() {
            return Err(ProgramError::InvalidAccountData);
        }
        Ok(symbol)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.precision, self.code())
    }
}

/// An amount of a single currency, in the symbol's smallest unit
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Asset {
    pub amount: u64,
    pub symbol: Symbol,
}

impl Asset {
    pub const LEN: usize = 16;

    pub fn new(amount: u64, symbol: Symbol) -> Self {
        Self { amount, symbol }
    }

    pub fn zero(symbol: Symbol) -> Self {
        Self { amount: 0, symbol }
    }

    /// Sum of two assets; `None` on a symbol mismatch or overflow
    pub fn checked_add(&self, other: &Asset) -> Option<Asset> {
        if self.symbol != other.symbol {
            return None;
        }
        let amount = self.amount.checked_add(other.amount)?;
        Some(Asset::new(amount, self.symbol))
    }

    fn unpack(src: &[u8; Asset::LEN]) -> Result<Self, ProgramError> {
        let (amount, symbol) = array_refs![src, 8, 8];
        Ok(Asset {
            amount: u64::from_le_bytes(*amount),
            symbol: Symbol::from_raw(u64::from_le_bytes(*symbol))?,
        })
    }

    fn pack(&self, dst: &mut [u8; Asset::LEN]) {
        let (amount_dst, symbol_dst) = mut_array_refs![dst, 8, 8];
        *amount_dst = self.amount.to_le_bytes();
        *symbol_dst = self.symbol.to_raw().to_le_bytes();
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = self.symbol.precision() as u32;
        if precision == 0 {
            return write!(f, "{} {}", self.amount, self.symbol.code());
        }
        let unit = 10u128.pow(precision);
        let amount = self.amount as u128;
        write!(
            f,
            "{}.{:0width$} {}",
            amount / unit,
            amount % unit,
            self.symbol.code(),
            width = precision as usize
        )
    }
}

/// Outcome of a raffle's draw
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Winner {
    /// No draw has happened yet
    Unresolved,
    /// Drawn; the payload is the winning seat holder
    Resolved(Pubkey),
}

impl Winner {
    pub const LEN: usize = 1 + 32;

    pub fn is_resolved(&self) -> bool {
        matches!(self, Winner::Resolved(_))
    }

    pub fn holder(&self) -> Option<&Pubkey> {
        match self {
            Winner::Unresolved => None,
            Winner::Resolved(holder) => Some(holder),
        }
    }

    fn unpack(src: &[u8; Winner::LEN]) -> Result<Self, ProgramError> {
        let (tag, holder) = array_refs![src, 1, 32];
        match tag[0] {
            0 => Ok(Winner::Unresolved),
            1 => Ok(Winner::Resolved(Pubkey::new_from_array(*holder))),
            _ => Err(ProgramError::InvalidAccountData),
        }
    }

    fn pack(&self, dst: &mut [u8; Winner::LEN]) {
        let (tag_dst, holder_dst) = mut_array_refs![dst, 1, 32];
        match self {
            Winner::Unresolved => {
                tag_dst[0] = 0;
                *holder_dst = [0u8; 32];
            }
            Winner::Resolved(holder) => {
                tag_dst[0] = 1;
                holder_dst.copy_from_slice(holder.as_ref());
            }
        }
    }
}

/// Raffle definition, one per raffle id
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RaffleRecord {
    /// Raffle id, never zero for a stored record
    pub id: u64,
    /// Total seats on sale
    pub seat_capacity: u32,
    /// Seats sold so far
    pub allocated_seats: u32,
    /// Price of one seat
    pub seat_price: Asset,
    /// Block the draw until every seat is sold
    pub require_full_allocation: bool,
    /// Commission in basis points (1 = 0.01%)
    pub commission_bps: u16,
    /// Receiver of the commission share
    pub commission_payee: Pubkey,
    /// Sum of every accepted deposit
    pub pooled_funds: Asset,
    pub winner: Winner,
}

impl RaffleRecord {
    pub fn is_full(&self) -> bool {
        self.allocated_seats >= self.seat_capacity
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = vec![0u8; Self::LEN];
        self.pack_into_slice(&mut buf);
        buf
    }
}

/// A purchased seat, scoped to one raffle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeatRecord {
    /// Sequential key within the raffle's seat scope
    pub id: u64,
    /// Depositor who bought the seat
    pub holder: Pubkey,
}

impl SeatRecord {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = vec![0u8; Self::LEN];
        self.pack_into_slice(&mut buf);
        buf
    }
}

impl Sealed for RaffleRecord {}
impl Sealed for SeatRecord {}

impl IsInitialized for RaffleRecord {
    fn is_initialized(&self) -> bool {
        self.id != 0
    }
}

impl IsInitialized for SeatRecord {
    fn is_initialized(&self) -> bool {
        self.holder != Pubkey::default()
    }
}

impl Pack for RaffleRecord {
    const LEN: usize = 8 + 4 + 4 + Asset::LEN + 1 + 2 + 32 + Asset::LEN + Winner::LEN;

    fn unpack_from_slice(src: &[u8]) -> Result<Self, ProgramError> {
        let src = array_ref![src, 0, RaffleRecord::LEN];
        let (
            id,
            seat_capacity,
            allocated_seats,
            seat_price,
            require_full_allocation,
            commission_bps,
            commission_payee,
            pooled_funds,
            winner,
        ) = array_refs![src, 8, 4, 4, 16, 1, 2, 32, 16, 33];

        Ok(RaffleRecord {
            id: u64::from_le_bytes(*id),
            seat_capacity: u32::from_le_bytes(*seat_capacity),
            allocated_seats: u32::from_le_bytes(*allocated_seats),
            seat_price: Asset::unpack(seat_price)?,
            require_full_allocation: require_full_allocation[0] != 0,
            commission_bps: u16::from_le_bytes(*commission_bps),
            commission_payee: Pubkey::new_from_array(*commission_payee),
            pooled_funds: Asset::unpack(pooled_funds)?,
            winner: Winner::unpack(winner)?,
        })
    }

    fn pack_into_slice(&self, dst: &mut [u8]) {
        let dst = array_mut_ref![dst, 0, RaffleRecord::LEN];
        let (
            id_dst,
            seat_capacity_dst,
            allocated_seats_dst,
            seat_price_dst,
            require_full_allocation_dst,
            commission_bps_dst,
            commission_payee_dst,
            pooled_funds_dst,
            winner_dst,
        ) = mut_array_refs![dst, 8, 4, 4, 16, 1, 2, 32, 16, 33];

        *id_dst = self.id.to_le_bytes();
        *seat_capacity_dst = self.seat_capacity.to_le_bytes();
        *allocated_seats_dst = self.allocated_seats.to_le_bytes();
        self.seat_price.pack(seat_price_dst);
        require_full_allocation_dst[0] = self.require_full_allocation as u8;
        *commission_bps_dst = self.commission_bps.to_le_bytes();
        commission_payee_dst.copy_from_slice(self.commission_payee.as_ref());
        self.pooled_funds.pack(pooled_funds_dst);
        self.winner.pack(winner_dst);
    }
}

impl Pack for SeatRecord {
    const LEN: usize = 8 + 32;

    fn unpack_from_slice(src: &[u8]) -> Result<Self, ProgramError> {
        let src = array_ref![src, 0, SeatRecord::LEN];
        let (id, holder) = array_refs![src, 8, 32];

        Ok(SeatRecord {
            id: u64::from_le_bytes(*id),
            holder: Pubkey::new_from_array(*holder),
        })
    }

    fn pack_into_slice(&self, dst: &mut [u8]) {
        let dst = array_mut_ref![dst, 0, SeatRecord::LEN];
        let (id_dst, holder_dst) = mut_array_refs![dst, 8, 32];

        *id_dst = self.id.to_le_bytes();
        holder_dst.copy_from_slice(self.holder.as_ref());
    }
}
