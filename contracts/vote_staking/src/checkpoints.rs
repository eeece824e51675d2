//! Voting-power checkpoints.
//!
//! Each delegate owns a `Vec<Checkpoint>` ordered by strictly increasing
//! ledger sequence. The last entry is the delegate's current power; past
//! power is answered by binary search.

use common::admin_tiers::{TTL_EXTEND_TO, TTL_THRESHOLD};
use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

use crate::ContractError;

const CHECKPOINTS: Symbol = symbol_short!("CKPTS");
const HISTORY_FLOOR: Symbol = symbol_short!("CK_FLOOR");

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Checkpoint {
    pub ledger: u32,
    pub votes: i128,
}

fn checkpoints_key(delegate: &Address) -> (Symbol, Address) {
    (CHECKPOINTS, delegate.clone())
}

fn floor_key(delegate: &Address) -> (Symbol, Address) {
    (HISTORY_FLOOR, delegate.clone())
}

pub fn load(env: &Env, delegate: &Address) -> Vec<Checkpoint> {
    env.storage()
        .persistent()
        .get(&checkpoints_key(delegate))
        .unwrap_or(Vec::new(env))
}

fn store(env: &Env, delegate: &Address, checkpoints: &Vec<Checkpoint>) {
    let key = checkpoints_key(delegate);
    env.storage().persistent().set(&key, checkpoints);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Oldest ledger that can still be answered for `delegate`.
pub fn history_floor(env: &Env, delegate: &Address) -> u32 {
    env.storage()
        .persistent()
        .get(&floor_key(delegate))
        .unwrap_or(0)
}

pub fn latest(env: &Env, delegate: &Address) -> i128 {
    let checkpoints = load(env, delegate);
    match checkpoints.last() {
        Some(cp) => cp.votes,
        None => 0,
    }
}

/// Records `votes` as the delegate's power at the current ledger.
/// Repeated pushes within one ledger overwrite each other.
pub fn push(env: &Env, delegate: &Address, votes: i128) {
    let ledger = env.ledger().sequence();
    let mut checkpoints = load(env, delegate);
    let entry = Checkpoint { ledger, votes };
    match checkpoints.last() {
        Some(last) if last.ledger == ledger => {
            checkpoints.set(checkpoints.len() - 1, entry);
        }
        _ => checkpoints.push_back(entry),
    }
    store(env, delegate, &checkpoints);
}

/// Position of the latest checkpoint with `ledger <= query`, if any.
pub fn search(checkpoints: &Vec<Checkpoint>, query: u32) -> Option<u32> {
    let mut lo = 0u32;
    let mut hi = checkpoints.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        match checkpoints.get(mid) {
            Some(cp) if cp.ledger <= query => lo = mid + 1,
            _ => hi = mid,
        }
    }
    if lo == 0 {
        None
    } else {
        Some(lo - 1)
    }
}

fn votes_at(checkpoints: &Vec<Checkpoint>, query: u32) -> i128 {
    search(checkpoints, query)
        .and_then(|pos| checkpoints.get(pos))
        .map(|cp| cp.votes)
        .unwrap_or(0)
}

/// Power of `delegate` as of ledger `query`; zero if never credited by then.
pub fn find(env: &Env, delegate: &Address, query: u32) -> Result<i128, ContractError> {
    if query < history_floor(env, delegate) {
        return Err(ContractError::TrackingPeriodExpired);
    }
    Ok(votes_at(&load(env, delegate), query))
}

/// Same answer as [`find`], and afterwards discards history that no query at
/// or after `horizon` can reach: every checkpoint older than the one that
/// answers `horizon` itself.
pub fn find_and_clear(
    env: &Env,
    delegate: &Address,
    query: u32,
    horizon: u32,
) -> Result<i128, ContractError> {
    let floor = history_floor(env, delegate);
    if query < horizon || query < floor {
        return Err(ContractError::TrackingPeriodExpired);
    }

    let checkpoints = load(env, delegate);
    let votes = votes_at(&checkpoints, query);

    if let Some(keep_from) = search(&checkpoints, horizon) {
        if keep_from > 0 {
            store(env, delegate, &checkpoints.slice(keep_from..));
        }
    }
    if horizon > floor {
        let key = floor_key(delegate);
        env.storage().persistent().set(&key, &horizon);
        env.storage()
            .persistent()
            .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }

    Ok(votes)
}
