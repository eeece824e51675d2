//! Fixed-point helpers. Every division truncates toward zero and every
//! product is checked.

use soroban_sdk::{Env, I256};

use crate::ContractError;

/// Fixed-point scale used for the accumulator, lock bonuses and voting-unit
/// conversion rates.
pub const SCALE: i128 = 1_000_000_000_000_000_000;

pub fn mul(a: i128, b: i128) -> Result<i128, ContractError> {
    a.checked_mul(b).ok_or(ContractError::ArithmeticOverflow)
}

pub fn add(a: i128, b: i128) -> Result<i128, ContractError> {
    a.checked_add(b).ok_or(ContractError::ArithmeticOverflow)
}

pub fn sub(a: i128, b: i128) -> Result<i128, ContractError> {
    a.checked_sub(b).ok_or(ContractError::ArithmeticOverflow)
}

/// `a * b / denom`. A zero denominator yields zero.
///
/// Products that do not fit in `i128` are carried in a host `I256`; only a
/// quotient outside `i128` is an error.
pub fn mul_div(env: &Env, a: i128, b: i128, denom: i128) -> Result<i128, ContractError> {
    if denom == 0 {
        return Ok(0);
    }
    if let Some(product) = a.checked_mul(b) {
        return Ok(product / denom);
    }
    I256::from_i128(env, a)
        .mul(&I256::from_i128(env, b))
        .div(&I256::from_i128(env, denom))
        .to_i128()
        .ok_or(ContractError::ArithmeticOverflow)
}
