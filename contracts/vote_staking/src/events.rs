#![allow(deprecated)] // events().publish migration tracked separately

use common::PauseScope;
use soroban_sdk::{symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the ledger is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub stake_token: Address,
    pub reward_token: Address,
    pub rewards_duration: u64,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositOpenedEvent {
    pub account: Address,
    pub deposit_id: u32,
    pub amount: i128,
    pub weighted: i128,
    pub lock_class: u32,
    pub unlock_time: u64,
    pub delegate: Address,
    pub timestamp: u64,
}

/// Fired per deposit touched by `withdraw`, `exit` or `exit_all`.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub account: Address,
    pub deposit_id: u32,
    pub amount: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardPaidEvent {
    pub account: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired by `notify_reward_amount`. `queued` is true when the pool was
/// empty and the period will start on the next deposit.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardPeriodUpdatedEvent {
    pub reward: i128,
    pub reward_rate: i128,
    pub period_finish: u64,
    pub queued: bool,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardPeriodActivatedEvent {
    pub reward_rate: i128,
    pub period_finish: u64,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DelegationChangedEvent {
    pub account: Address,
    pub from_delegate: Option<Address>,
    pub to_delegate: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DelegateVotesChangedEvent {
    pub delegate: Address,
    pub previous: i128,
    pub current: i128,
    pub ledger: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokensRecoveredEvent {
    pub token: Address,
    pub amount: i128,
    pub to: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PauseChangedEvent {
    pub caller: Address,
    pub scope: PauseScope,
    pub paused: bool,
    pub timestamp: u64,
}

/// Fired when an admin tier is granted or removed. `tier` is the granted
/// tier's rank, or 0 on removal.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminChangedEvent {
    pub caller: Address,
    pub target: Address,
    pub tier: u32,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    admin: Address,
    stake_token: Address,
    reward_token: Address,
    rewards_duration: u64,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin,
            stake_token,
            reward_token,
            rewards_duration,
            timestamp: env.ledger().timestamp(),
        },
    );
}

#[allow(clippy::too_many_arguments)]
pub fn publish_deposit_opened(
    env: &Env,
    account: Address,
    deposit_id: u32,
    amount: i128,
    weighted: i128,
    lock_class: u32,
    unlock_time: u64,
    delegate: Address,
) {
    env.events().publish(
        (symbol_short!("OPENED"), account.clone()),
        DepositOpenedEvent {
            account,
            deposit_id,
            amount,
            weighted,
            lock_class,
            unlock_time,
            delegate,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdrawn(env: &Env, account: Address, deposit_id: u32, amount: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAWN"), account.clone()),
        WithdrawnEvent {
            account,
            deposit_id,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_paid(env: &Env, account: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("RWD_PAID"), account.clone()),
        RewardPaidEvent {
            account,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_period_updated(
    env: &Env,
    reward: i128,
    reward_rate: i128,
    period_finish: u64,
    queued: bool,
) {
    env.events().publish(
        (symbol_short!("RWD_UPD"),),
        RewardPeriodUpdatedEvent {
            reward,
            reward_rate,
            period_finish,
            queued,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_period_activated(env: &Env, reward_rate: i128, period_finish: u64) {
    env.events().publish(
        (symbol_short!("RWD_ACT"),),
        RewardPeriodActivatedEvent {
            reward_rate,
            period_finish,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_delegation_changed(
    env: &Env,
    account: Address,
    from_delegate: Option<Address>,
    to_delegate: Address,
) {
    env.events().publish(
        (symbol_short!("DELEG_CHG"), account.clone()),
        DelegationChangedEvent {
            account,
            from_delegate,
            to_delegate,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_delegate_votes_changed(env: &Env, delegate: Address, previous: i128, current: i128) {
    env.events().publish(
        (symbol_short!("VOTES_CHG"), delegate.clone()),
        DelegateVotesChangedEvent {
            delegate,
            previous,
            current,
            ledger: env.ledger().sequence(),
        },
    );
}

pub fn publish_tokens_recovered(env: &Env, token: Address, amount: i128, to: Address) {
    env.events().publish(
        (symbol_short!("RECOVERED"), token.clone()),
        TokensRecoveredEvent {
            token,
            amount,
            to,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pause_changed(env: &Env, caller: Address, scope: PauseScope, paused: bool) {
    env.events().publish(
        (symbol_short!("PAUSE"), caller.clone()),
        PauseChangedEvent {
            caller,
            scope,
            paused,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_admin_changed(env: &Env, caller: Address, target: Address, tier: u32) {
    env.events().publish(
        (symbol_short!("ADM_CHG"), target.clone()),
        AdminChangedEvent {
            caller,
            target,
            tier,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_duration_set(env: &Env, rewards_duration: u64) {
    env.events().publish(
        (symbol_short!("DUR_SET"),),
        (rewards_duration, env.ledger().timestamp()),
    );
}

pub fn publish_lock_terms_set(env: &Env, lock_class: u32, duration: u64, bonus: i128) {
    env.events().publish(
        (symbol_short!("LOCK_SET"),),
        (lock_class, duration, bonus, env.ledger().timestamp()),
    );
}

pub fn publish_governance_set(env: &Env, governance: Address) {
    env.events().publish(
        (symbol_short!("GOV_SET"),),
        (governance, env.ledger().timestamp()),
    );
}
