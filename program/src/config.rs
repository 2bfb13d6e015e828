// UOS Raffle - Settings
use solana_program::{msg, pubkey::Pubkey};

use crate::{
    error::RaffleError,
    state::{Symbol, UOS_SYMBOL},
};

/// Basis point denominator (10000 = 100%)
pub const BASIS_POINTS: u16 = 10_000;
/// Share of the pooled funds kept by the platform, in basis points
pub const DEFAULT_PLATFORM_FEE_BPS: u16 = 250;
/// Lowest commission a raffle may be created with
pub const DEFAULT_MIN_COMMISSION_BPS: u16 = 251;

/// Deployment settings, fixed for the lifetime of a processor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RaffleSettings {
    /// Only signer allowed to create, resize, draw and invalidate
    pub operator: Pubkey,
    /// This system's own ledger identity; deposits must be addressed to it
    pub pool: Pubkey,
    /// The one currency raffles are priced and funded in
    pub accepted_symbol: Symbol,
    pub platform_fee_bps: u16,
    pub min_commission_bps: u16,
}

impl RaffleSettings {
    /// Settings with the default fee schedule and `8,UOS` currency
    pub fn new(operator: Pubkey, pool: Pubkey) -> Self {
        Self {
            operator,
            pool,
            accepted_symbol: UOS_SYMBOL,
            platform_fee_bps: DEFAULT_PLATFORM_FEE_BPS,
            min_commission_bps: DEFAULT_MIN_COMMISSION_BPS,
        }
    }

    pub fn validate(&self) -> Result<(), RaffleError> {
        if self.platform_fee_bps > BASIS_POINTS {
            msg!("Platform fee cannot exceed {} basis points", BASIS_POINTS);
            return Err(RaffleError::InvalidParameters);
        }
        // Any raffle accepted at the minimum commission must leave a non-negative pot
        let floor = self.min_commission_bps as u32 + self.platform_fee_bps as u32;
        if floor > BASIS_POINTS as u32 {
            msg!("Minimum commission plus platform fee exceeds 100%");
            return Err(RaffleError::InvalidParameters);
        }
        if !self.accepted_symbol.is_valid() {
            msg!("Accepted symbol is invalid");
            return Err(RaffleError::InvalidParameters);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fee_schedule() {
        let settings = RaffleSettings::new(Pubkey::new_unique(), Pubkey::new_unique());
        assert_eq!(settings.platform_fee_bps, 250);
        assert_eq!(settings.min_commission_bps, 251);
        assert_eq!(settings.accepted_symbol.to_string(), "8,UOS");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn rejects_fee_schedules_above_one_hundred_percent() {
        let mut settings = RaffleSettings::new(Pubkey::new_unique(), Pubkey::new_unique());
        settings.platform_fee_bps = 10_001;
        assert_eq!(settings.validate(), Err(RaffleError::InvalidParameters));

        settings.platform_fee_bps = 5_000;
        settings.min_commission_bps = 5_001;
        assert_eq!(settings.validate(), Err(RaffleError::InvalidParameters));

        settings.min_commission_bps = 5_000;
        assert!(settings.validate().is_ok());
    }
}
