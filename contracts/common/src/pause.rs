use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::admin_tiers::{self, AdminTier};
use crate::CommonError;

// ── Types ─────────────────────────────────────────────────────

/// Scope of a circuit breaker.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PauseScope {
    /// Halts every gated entry point.
    Global,
    /// Halts a single entry point, named by its function symbol.
    Function(Symbol),
}

// ── Storage Keys ─────────────────────────────────────────────

fn global_pause_key() -> Symbol {
    symbol_short!("P_GLOB")
}

fn function_pause_key(func: &Symbol) -> (Symbol, Symbol) {
    (symbol_short!("P_FUNC"), func.clone())
}

// ── Queries ──────────────────────────────────────────────────

pub fn is_paused(env: &Env, scope: &PauseScope) -> bool {
    match scope {
        PauseScope::Global => env
            .storage()
            .instance()
            .get(&global_pause_key())
            .unwrap_or(false),
        PauseScope::Function(func) => env
            .storage()
            .instance()
            .get(&function_pause_key(func))
            .unwrap_or(false),
    }
}

/// Fails with `Paused` if either the global breaker or the breaker for
/// `func` is engaged.
pub fn require_not_paused(env: &Env, func: &Symbol) -> Result<(), CommonError> {
    if is_paused(env, &PauseScope::Global)
        || is_paused(env, &PauseScope::Function(func.clone()))
    {
        return Err(CommonError::Paused);
    }
    Ok(())
}

// ── Mutations ────────────────────────────────────────────────

/// Engages or releases the breaker for `scope`. Requires at least
/// `OperatorAdmin`.
pub fn set_paused(
    env: &Env,
    caller: &Address,
    scope: &PauseScope,
    paused: bool,
) -> Result<(), CommonError> {
    admin_tiers::require_tier(env, caller, &AdminTier::OperatorAdmin)?;

    match scope {
        PauseScope::Global => {
            env.storage().instance().set(&global_pause_key(), &paused);
        }
        PauseScope::Function(func) => {
            env.storage()
                .instance()
                .set(&function_pause_key(func), &paused);
        }
    }
    Ok(())
}
