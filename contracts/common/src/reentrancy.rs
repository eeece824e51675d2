use soroban_sdk::{symbol_short, Env, Symbol};

use crate::CommonError;

const ENTERED: Symbol = symbol_short!("ENTERED");

/// Single-flight guard for mutating entry points.
///
/// `enter` sets a flag in instance storage and fails with `Reentrant` if it
/// is already set. The flag is cleared when the guard is dropped, so every
/// return path, `?` included, releases it.
pub struct ReentrancyGuard<'a> {
    env: &'a Env,
}

impl<'a> ReentrancyGuard<'a> {
    pub fn enter(env: &'a Env) -> Result<Self, CommonError> {
        if is_entered(env) {
            return Err(CommonError::Reentrant);
        }
        env.storage().instance().set(&ENTERED, &true);
        Ok(Self { env })
    }
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        self.env.storage().instance().remove(&ENTERED);
    }
}

pub fn is_entered(env: &Env) -> bool {
    env.storage().instance().get(&ENTERED).unwrap_or(false)
}
