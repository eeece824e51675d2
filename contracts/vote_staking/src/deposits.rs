//! Per-account deposit ledger.
//!
//! Deposits live in a `Vec<Deposit>` per account and are addressed by their
//! position. An exited deposit keeps its slot with `principal == 0`, so ids
//! handed out earlier never shift.

use common::admin_tiers::{TTL_EXTEND_TO, TTL_THRESHOLD};
use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

use crate::delegation::VotingUnit;
use crate::lock::{LockClass, LockPolicy};
use crate::rewards::RewardState;
use crate::{math, ContractError};

/// Upper bound on deposits per account; bounds `exit_all` and `claim_all`.
pub const MAX_DEPOSITS: u32 = 32;

const DEPOSITS: Symbol = symbol_short!("DEPOSITS");

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Deposit {
    pub lock_class: LockClass,
    pub unlock_time: u64,
    pub principal: i128,
    /// Accumulator value at the last settlement of this deposit.
    pub reward_debt: i128,
}

/// Amounts released from one deposit by a withdrawal.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Release {
    pub principal: i128,
    pub reward: i128,
    pub weighted: i128,
    pub votes: i128,
}

impl Release {
    pub fn absorb(&mut self, other: &Release) -> Result<(), ContractError> {
        self.principal = math::add(self.principal, other.principal)?;
        self.reward = math::add(self.reward, other.reward)?;
        self.weighted = math::add(self.weighted, other.weighted)?;
        self.votes = math::add(self.votes, other.votes)?;
        Ok(())
    }
}

fn deposits_key(account: &Address) -> (Symbol, Address) {
    (DEPOSITS, account.clone())
}

pub fn load(env: &Env, account: &Address) -> Vec<Deposit> {
    env.storage()
        .persistent()
        .get(&deposits_key(account))
        .unwrap_or(Vec::new(env))
}

pub fn store(env: &Env, account: &Address, deposits: &Vec<Deposit>) {
    let key = deposits_key(account);
    env.storage().persistent().set(&key, deposits);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn get(deposits: &Vec<Deposit>, id: u32) -> Result<Deposit, ContractError> {
    deposits.get(id).ok_or(ContractError::DepositNotFound)
}

/// Reward owed to `deposit` at the accumulator in `state`.
pub fn pending(
    env: &Env,
    state: &RewardState,
    policy: &LockPolicy,
    deposit: &Deposit,
) -> Result<i128, ContractError> {
    if deposit.principal == 0 {
        return Ok(0);
    }
    let weighted = policy.weighted(env, deposit.principal, deposit.lock_class)?;
    state.pending(env, weighted, deposit.reward_debt)
}

/// Settles the deposit's reward and takes up to `amount` of its principal.
///
/// A request above the remaining principal is clamped to it. Weight and
/// voting units removed are computed as `before - after`, so a deposit that
/// is fully drained removes exactly what it once added.
pub fn release(
    env: &Env,
    state: &RewardState,
    policy: &LockPolicy,
    unit: &VotingUnit,
    deposit: &mut Deposit,
    amount: i128,
    now: u64,
) -> Result<Release, ContractError> {
    if deposit.principal <= 0 {
        return Err(ContractError::EmptyDeposit);
    }
    if now < deposit.unlock_time {
        return Err(ContractError::Locked);
    }

    let class = deposit.lock_class;
    let before = deposit.principal;
    let taken = amount.min(before);
    let after = before - taken;

    let weighted_before = policy.weighted(env, before, class)?;
    let weighted_after = policy.weighted(env, after, class)?;
    let reward = state.pending(env, weighted_before, deposit.reward_debt)?;
    let votes = math::sub(
        unit.units(env, policy, before, class)?,
        unit.units(env, policy, after, class)?,
    )?;

    deposit.principal = after;
    deposit.reward_debt = state.reward_per_weighted_unit;

    Ok(Release {
        principal: taken,
        reward,
        weighted: weighted_before - weighted_after,
        votes,
    })
}
