//! Account → delegate bindings.
//!
//! An account's first deposit fixes its delegate. Later deposits must name
//! the same delegate; only `change` moves the account's weight elsewhere,
//! and it moves all of it at once.

use common::admin_tiers::{TTL_EXTEND_TO, TTL_THRESHOLD};
use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::lock::{LockClass, LockPolicy};
use crate::{checkpoints, events, math, ContractError};

const DELEGATION: Symbol = symbol_short!("DELEG");

/// Unit in which deposits are credited to a delegate.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VotingUnit {
    /// One vote per staked token.
    Principal,
    /// `principal * rate / SCALE`, e.g. LP shares priced in governance tokens.
    Converted(i128),
    /// Bonus-weighted principal, the same unit rewards are shared in.
    Weighted,
}

impl VotingUnit {
    pub fn validate(&self) -> Result<(), ContractError> {
        match self {
            VotingUnit::Converted(rate) if *rate <= 0 => Err(ContractError::InvalidVotingUnit),
            _ => Ok(()),
        }
    }

    pub fn units(
        &self,
        env: &Env,
        policy: &LockPolicy,
        principal: i128,
        class: LockClass,
    ) -> Result<i128, ContractError> {
        match self {
            VotingUnit::Principal => Ok(principal),
            VotingUnit::Converted(rate) => math::mul_div(env, principal, *rate, math::SCALE),
            VotingUnit::Weighted => policy.weighted(env, principal, class),
        }
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Delegation {
    pub delegate: Address,
    /// Voting units this account currently contributes to `delegate`.
    pub votes: i128,
}

fn delegation_key(account: &Address) -> (Symbol, Address) {
    (DELEGATION, account.clone())
}

pub fn get(env: &Env, account: &Address) -> Option<Delegation> {
    env.storage().persistent().get(&delegation_key(account))
}

fn store(env: &Env, account: &Address, record: &Delegation) {
    let key = delegation_key(account);
    env.storage().persistent().set(&key, record);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Rejects the ledger contract itself as a delegate. Votes parked there
/// could never be cast.
pub fn validate_delegate(env: &Env, delegate: &Address) -> Result<(), ContractError> {
    if *delegate == env.current_contract_address() {
        return Err(ContractError::InvalidDelegate);
    }
    Ok(())
}

/// Fails if `account` is already bound to a delegate other than `delegate`.
pub fn require_consistent(
    env: &Env,
    account: &Address,
    delegate: &Address,
) -> Result<(), ContractError> {
    match get(env, account) {
        Some(record) if record.delegate != *delegate => {
            Err(ContractError::InvalidDelegationAddress)
        }
        _ => Ok(()),
    }
}

fn adjust_delegate(env: &Env, delegate: &Address, delta: i128) -> Result<(), ContractError> {
    let previous = checkpoints::latest(env, delegate);
    let next = math::add(previous, delta)?;
    if next < 0 {
        return Err(ContractError::ArithmeticOverflow);
    }
    checkpoints::push(env, delegate, next);
    events::publish_delegate_votes_changed(env, delegate.clone(), previous, next);
    Ok(())
}

pub fn credit(
    env: &Env,
    account: &Address,
    units: i128,
    delegate: &Address,
) -> Result<(), ContractError> {
    require_consistent(env, account, delegate)?;
    let mut record = get(env, account).unwrap_or(Delegation {
        delegate: delegate.clone(),
        votes: 0,
    });
    record.votes = math::add(record.votes, units)?;
    store(env, account, &record);
    if units != 0 {
        adjust_delegate(env, delegate, units)?;
    }
    Ok(())
}

pub fn debit(env: &Env, account: &Address, units: i128) -> Result<(), ContractError> {
    let Some(mut record) = get(env, account) else {
        return Ok(());
    };
    let removed = units.min(record.votes);
    if removed <= 0 {
        return Ok(());
    }
    record.votes -= removed;
    store(env, account, &record);
    adjust_delegate(env, &record.delegate, -removed)
}

/// Moves the account's whole contribution to `new_delegate`. Returns the
/// previous delegate, if the account had one.
pub fn change(
    env: &Env,
    account: &Address,
    new_delegate: &Address,
) -> Result<Option<Address>, ContractError> {
    validate_delegate(env, new_delegate)?;
    let Some(mut record) = get(env, account) else {
        store(
            env,
            account,
            &Delegation {
                delegate: new_delegate.clone(),
                votes: 0,
            },
        );
        return Ok(None);
    };

    let previous = record.delegate.clone();
    if previous == *new_delegate {
        return Ok(Some(previous));
    }
    if record.votes > 0 {
        adjust_delegate(env, &previous, -record.votes)?;
        adjust_delegate(env, new_delegate, record.votes)?;
    }
    record.delegate = new_delegate.clone();
    store(env, account, &record);
    Ok(Some(previous))
}
