//! Lock classes and the bonus they earn.
//!
//! A deposit's reward share and (optionally) its voting weight are computed
//! from its *weighted* principal: `principal + principal * bonus / SCALE`.
//! The bonus is additive on top of the principal, never a replacement
//! multiplier.

use soroban_sdk::{contracttype, Env};

use crate::{math, ContractError};

const DAY: u64 = 86_400;

/// Commitment tier chosen when a deposit is opened.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum LockClass {
    Short = 0,
    Medium = 1,
    Long = 2,
}

impl LockClass {
    /// Converts the raw value accepted at the contract boundary. Anything
    /// outside the three known tiers is an `InvalidLock` error.
    pub fn from_u32(raw: u32) -> Result<Self, ContractError> {
        match raw {
            0 => Ok(LockClass::Short),
            1 => Ok(LockClass::Medium),
            2 => Ok(LockClass::Long),
            _ => Err(ContractError::InvalidLock),
        }
    }
}

/// Duration (seconds) and bonus (scaled by `SCALE`) of one lock class.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockTerms {
    pub duration: u64,
    pub bonus: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockPolicy {
    pub short: LockTerms,
    pub medium: LockTerms,
    pub long: LockTerms,
}

impl Default for LockPolicy {
    /// 30 / 60 / 90 days with +0% / +25% / +50% bonus.
    fn default() -> Self {
        Self {
            short: LockTerms {
                duration: 30 * DAY,
                bonus: 0,
            },
            medium: LockTerms {
                duration: 60 * DAY,
                bonus: math::SCALE / 4,
            },
            long: LockTerms {
                duration: 90 * DAY,
                bonus: math::SCALE / 2,
            },
        }
    }
}

impl LockPolicy {
    pub fn classify(&self, class: LockClass) -> &LockTerms {
        match class {
            LockClass::Short => &self.short,
            LockClass::Medium => &self.medium,
            LockClass::Long => &self.long,
        }
    }

    pub fn set_terms(&mut self, class: LockClass, terms: LockTerms) {
        match class {
            LockClass::Short => self.short = terms,
            LockClass::Medium => self.medium = terms,
            LockClass::Long => self.long = terms,
        }
    }

    /// `principal + principal * bonus / SCALE`, truncating.
    pub fn weighted(
        &self,
        env: &Env,
        principal: i128,
        class: LockClass,
    ) -> Result<i128, ContractError> {
        let bonus = self.classify(class).bonus;
        let extra = math::mul_div(env, principal, bonus, math::SCALE)?;
        principal
            .checked_add(extra)
            .ok_or(ContractError::ArithmeticOverflow)
    }
}

/// Rejects terms that would make a tier meaningless or let weight shrink.
pub fn validate_terms(terms: &LockTerms) -> Result<(), ContractError> {
    if terms.duration == 0 || terms.bonus < 0 {
        return Err(ContractError::InvalidLock);
    }
    Ok(())
}
