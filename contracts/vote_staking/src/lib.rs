#![no_std]

//! Lock-bonus staking ledger with governance checkpoints.
//!
//! Accounts open deposits in one of three lock classes. Each deposit earns a
//! share of a continuously emitted reward in proportion to its bonus-weighted
//! principal, and credits voting units to the delegate its account is bound
//! to. Voting power is checkpointed per ledger so governance can query any
//! past ledger.

pub mod checkpoints;
pub mod delegation;
pub mod deposits;
pub mod events;
pub mod lock;
pub mod math;
pub mod rewards;
pub mod transfer;

use common::admin_tiers::{self, AdminTier};
use common::{pause, CommonError, PauseScope, ReentrancyGuard};
use soroban_sdk::{contract, contractimpl, contracttype, symbol_short, Address, Env, Symbol, Vec};

use checkpoints::Checkpoint;
use delegation::{Delegation, VotingUnit};
use deposits::{Deposit, Release, MAX_DEPOSITS};
use lock::{LockClass, LockPolicy, LockTerms};
use rewards::{NotifyOutcome, RewardState};

// ── Storage key constants ────────────────────────────────────────────────────

const ADMIN: Symbol = symbol_short!("ADMIN");
const CONFIG: Symbol = symbol_short!("CONFIG");
const LOCK_POLICY: Symbol = symbol_short!("LOCK_POL");
const GOVERNANCE: Symbol = symbol_short!("GOV");

// Pause scopes of the principal-mutating entry points.
const FN_OPEN: Symbol = symbol_short!("open");
const FN_WITHDRAW: Symbol = symbol_short!("withdraw");
const FN_EXIT: Symbol = symbol_short!("exit");
const FN_EXIT_ALL: Symbol = symbol_short!("exit_all");

// ── Contract errors ──────────────────────────────────────────────────────────

/// Codes 1–49 mirror [`CommonError`]; 100+ are ledger specific, grouped by
/// validation (10x), ledger state (12x), economic guards (14x) and
/// infrastructure (16x).
#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 10,
    Paused = 40,
    Reentrant = 41,

    InvalidAmount = 100,
    InvalidLock = 101,
    InvalidDelegate = 102,
    TooManyDeposits = 103,
    DepositNotFound = 104,
    InvalidDuration = 105,
    InvalidVotingUnit = 106,

    Locked = 120,
    EmptyDeposit = 121,
    RewardsPeriodActive = 122,
    TrackingPeriodExpired = 123,
    InvalidDelegationAddress = 124,
    StakesOutstanding = 125,

    RewardTooHigh = 140,
    InsufficientSurplus = 141,

    TransferFailed = 160,
    ArithmeticOverflow = 161,
}

impl From<CommonError> for ContractError {
    fn from(err: CommonError) -> Self {
        match err {
            CommonError::NotInitialized => ContractError::NotInitialized,
            CommonError::AlreadyInitialized => ContractError::AlreadyInitialized,
            CommonError::AccessDenied => ContractError::Unauthorized,
            CommonError::Paused => ContractError::Paused,
            CommonError::Reentrant => ContractError::Reentrant,
        }
    }
}

// ── Public-facing types ──────────────────────────────────────────────────────

/// Fixed at `initialize`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakingConfig {
    pub stake_token: Address,
    pub reward_token: Address,
    pub voting_unit: VotingUnit,
}

/// Totals paid out by `exit` / `exit_all`.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExitSummary {
    pub principal: i128,
    pub reward: i128,
    pub deposits: u32,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct VoteStakingContract;

#[contractimpl]
impl VoteStakingContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the ledger.
    ///
    /// * `stake_token`      – token locked in deposits.
    /// * `reward_token`     – token distributed as reward; may equal
    ///                        `stake_token`.
    /// * `rewards_duration` – seconds over which each notified reward is
    ///                        emitted.
    /// * `voting_unit`      – how principal converts into voting units.
    pub fn initialize(
        env: Env,
        admin: Address,
        stake_token: Address,
        reward_token: Address,
        rewards_duration: u64,
        voting_unit: VotingUnit,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&CONFIG) {
            return Err(ContractError::AlreadyInitialized);
        }
        if rewards_duration == 0 {
            return Err(ContractError::InvalidDuration);
        }
        voting_unit.validate()?;

        let now = env.ledger().timestamp();
        let config = StakingConfig {
            stake_token: stake_token.clone(),
            reward_token: reward_token.clone(),
            voting_unit,
        };

        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&CONFIG, &config);
        env.storage()
            .instance()
            .set(&LOCK_POLICY, &LockPolicy::default());
        rewards::store(&env, &RewardState::new(rewards_duration, now));

        admin_tiers::set_super_admin(&env, &admin);

        events::publish_initialized(&env, admin, stake_token, reward_token, rewards_duration);

        Ok(())
    }

    // ── Deposits ────────────────────────────────────────────────────────────

    /// Lock `amount` stake tokens in a new deposit of class `lock_class`
    /// (0 = Short, 1 = Medium, 2 = Long) and credit its voting units to
    /// `delegate`. Returns the new deposit id.
    ///
    /// The first deposit binds the account to `delegate`; later deposits
    /// naming another delegate fail with `InvalidDelegationAddress`.
    pub fn open(
        env: Env,
        account: Address,
        amount: i128,
        delegate: Address,
        lock_class: u32,
    ) -> Result<u32, ContractError> {
        account.require_auth();
        let _guard = ReentrancyGuard::enter(&env)?;
        let config = Self::load_config(&env)?;

        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }
        let class = LockClass::from_u32(lock_class)?;
        delegation::validate_delegate(&env, &delegate)?;
        let mut ledger = deposits::load(&env, &account);
        if ledger.len() >= MAX_DEPOSITS {
            return Err(ContractError::TooManyDeposits);
        }

        pause::require_not_paused(&env, &FN_OPEN)?;
        delegation::require_consistent(&env, &account, &delegate)?;

        let policy = Self::load_policy(&env)?;
        let now = env.ledger().timestamp();

        // 1. Flush the accumulator before the pool weight changes.
        let mut state = rewards::load(&env)?;
        state.accrue(&env, now)?;

        // 2. Append the deposit.
        let weighted = policy.weighted(&env, amount, class)?;
        let unlock_time = now
            .checked_add(policy.classify(class).duration)
            .ok_or(ContractError::ArithmeticOverflow)?;
        ledger.push_back(Deposit {
            lock_class: class,
            unlock_time,
            principal: amount,
            reward_debt: state.reward_per_weighted_unit,
        });
        let deposit_id = ledger.len() - 1;
        deposits::store(&env, &account, &ledger);

        // 3. Grow the pool, starting a queued reward period if one waits.
        state.total_principal = math::add(state.total_principal, amount)?;
        state.total_weighted = math::add(state.total_weighted, weighted)?;
        if let Some((rate, finish)) = state.activate_queued(now)? {
            events::publish_reward_period_activated(&env, rate, finish);
        }
        rewards::store(&env, &state);

        // 4. Voting power.
        let votes = config.voting_unit.units(&env, &policy, amount, class)?;
        delegation::credit(&env, &account, votes, &delegate)?;

        // 5. Pull the tokens.
        transfer::pull(&env, &config.stake_token, &account, amount)?;

        events::publish_deposit_opened(
            &env,
            account,
            deposit_id,
            amount,
            weighted,
            lock_class,
            unlock_time,
            delegate,
        );

        Ok(deposit_id)
    }

    /// Withdraw up to `amount` from an unlocked deposit, paying its pending
    /// reward. A request above the deposit's principal is clamped to it.
    /// Returns the principal withdrawn.
    pub fn withdraw(
        env: Env,
        account: Address,
        deposit_id: u32,
        amount: i128,
    ) -> Result<i128, ContractError> {
        account.require_auth();
        let _guard = ReentrancyGuard::enter(&env)?;
        Self::load_config(&env)?;

        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }
        let summary = Self::release_deposit(&env, &account, deposit_id, amount, &FN_WITHDRAW)?;
        Ok(summary.principal)
    }

    /// Withdraw a deposit's whole remaining principal and pay its reward.
    pub fn exit(env: Env, account: Address, deposit_id: u32) -> Result<ExitSummary, ContractError> {
        account.require_auth();
        let _guard = ReentrancyGuard::enter(&env)?;
        Self::load_config(&env)?;

        Self::release_deposit(&env, &account, deposit_id, i128::MAX, &FN_EXIT)
    }

    /// Exit every unlocked, non-empty deposit of `account` in one pass.
    ///
    /// Locked and already-empty deposits are skipped. Principal and reward
    /// are each paid with a single transfer for the whole batch.
    pub fn exit_all(env: Env, account: Address) -> Result<ExitSummary, ContractError> {
        account.require_auth();
        let _guard = ReentrancyGuard::enter(&env)?;
        let config = Self::load_config(&env)?;
        pause::require_not_paused(&env, &FN_EXIT_ALL)?;

        let policy = Self::load_policy(&env)?;
        let now = env.ledger().timestamp();
        let mut state = rewards::load(&env)?;
        state.accrue(&env, now)?;

        let mut ledger = deposits::load(&env, &account);
        let mut total = Release::default();
        let mut count = 0u32;
        for id in 0..ledger.len() {
            let Some(mut deposit) = ledger.get(id) else {
                continue;
            };
            if deposit.principal <= 0 || now < deposit.unlock_time {
                continue;
            }
            let released = deposits::release(
                &env,
                &state,
                &policy,
                &config.voting_unit,
                &mut deposit,
                i128::MAX,
                now,
            )?;
            ledger.set(id, deposit);
            total.absorb(&released)?;
            count += 1;
            events::publish_withdrawn(&env, account.clone(), id, released.principal);
        }

        if count == 0 {
            return Ok(ExitSummary::default());
        }

        deposits::store(&env, &account, &ledger);
        Self::shrink_pool(&mut state, &total)?;
        rewards::store(&env, &state);
        delegation::debit(&env, &account, total.votes)?;
        Self::pay(&env, &config, &account, total.principal, total.reward)?;

        Ok(ExitSummary {
            principal: total.principal,
            reward: total.reward,
            deposits: count,
        })
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Pay the pending reward of one deposit without touching principal.
    /// Nothing pending is a no-op returning 0.
    pub fn claim(env: Env, account: Address, deposit_id: u32) -> Result<i128, ContractError> {
        account.require_auth();
        let _guard = ReentrancyGuard::enter(&env)?;
        let config = Self::load_config(&env)?;

        let mut ledger = deposits::load(&env, &account);
        let mut deposit = deposits::get(&ledger, deposit_id)?;

        let policy = Self::load_policy(&env)?;
        let mut state = rewards::load(&env)?;
        state.accrue(&env, env.ledger().timestamp())?;

        let reward = deposits::pending(&env, &state, &policy, &deposit)?;
        if reward <= 0 {
            return Ok(0);
        }

        deposit.reward_debt = state.reward_per_weighted_unit;
        ledger.set(deposit_id, deposit);
        deposits::store(&env, &account, &ledger);

        state.pay_out(reward);
        rewards::store(&env, &state);

        Self::pay(&env, &config, &account, 0, reward)?;
        Ok(reward)
    }

    /// Pay the pending reward of every deposit of `account`, locked ones
    /// included, in one transfer.
    pub fn claim_all(env: Env, account: Address) -> Result<i128, ContractError> {
        account.require_auth();
        let _guard = ReentrancyGuard::enter(&env)?;
        let config = Self::load_config(&env)?;

        let policy = Self::load_policy(&env)?;
        let mut state = rewards::load(&env)?;
        state.accrue(&env, env.ledger().timestamp())?;

        let mut ledger = deposits::load(&env, &account);
        let mut reward = 0i128;
        for id in 0..ledger.len() {
            let Some(mut deposit) = ledger.get(id) else {
                continue;
            };
            let owed = deposits::pending(&env, &state, &policy, &deposit)?;
            if owed <= 0 {
                continue;
            }
            deposit.reward_debt = state.reward_per_weighted_unit;
            ledger.set(id, deposit);
            reward = math::add(reward, owed)?;
        }

        if reward <= 0 {
            return Ok(0);
        }

        deposits::store(&env, &account, &ledger);
        state.pay_out(reward);
        rewards::store(&env, &state);

        Self::pay(&env, &config, &account, 0, reward)?;
        Ok(reward)
    }

    /// Fund a reward period with `reward` tokens already held by the ledger.
    ///
    /// A running period's unemitted remainder is blended into the new rate.
    /// If nothing is staked the reward is queued and the period starts with
    /// the next deposit. Requires at least `Distributor` tier.
    pub fn notify_reward_amount(
        env: Env,
        caller: Address,
        reward: i128,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        let _guard = ReentrancyGuard::enter(&env)?;
        let config = Self::load_config(&env)?;

        if reward <= 0 {
            return Err(ContractError::InvalidAmount);
        }
        admin_tiers::require_tier(&env, &caller, &AdminTier::Distributor)?;

        let now = env.ledger().timestamp();
        let mut state = rewards::load(&env)?;
        state.accrue(&env, now)?;

        let mut available = transfer::balance(&env, &config.reward_token)?;
        if config.reward_token == config.stake_token {
            available = math::sub(available, state.total_principal)?;
        }
        available = math::sub(available, state.unclaimed_reserve)?;

        match state.notify(&env, now, reward, available)? {
            NotifyOutcome::Started {
                reward_rate,
                period_finish,
            } => events::publish_reward_period_updated(
                &env,
                reward,
                reward_rate,
                period_finish,
                false,
            ),
            NotifyOutcome::Queued { .. } => {
                events::publish_reward_period_updated(&env, reward, 0, now, true)
            }
        }
        rewards::store(&env, &state);

        Ok(())
    }

    // ── Delegation ──────────────────────────────────────────────────────────

    /// Move all of `account`'s voting units to `new_delegate`.
    pub fn change_delegation(
        env: Env,
        account: Address,
        new_delegate: Address,
    ) -> Result<(), ContractError> {
        account.require_auth();
        let _guard = ReentrancyGuard::enter(&env)?;
        Self::load_config(&env)?;

        let mut state = rewards::load(&env)?;
        state.accrue(&env, env.ledger().timestamp())?;
        rewards::store(&env, &state);

        let previous = delegation::change(&env, &account, &new_delegate)?;
        if previous.as_ref() != Some(&new_delegate) {
            events::publish_delegation_changed(&env, account, previous, new_delegate);
        }
        Ok(())
    }

    /// Current voting power of `delegate`.
    pub fn get_votes(env: Env, delegate: Address) -> i128 {
        checkpoints::latest(&env, &delegate)
    }

    /// Voting power of `delegate` as of ledger sequence `ledger`.
    pub fn get_past_votes(env: Env, delegate: Address, ledger: u32) -> Result<i128, ContractError> {
        checkpoints::find(&env, &delegate, ledger)
    }

    /// Governance-only lookup that also prunes checkpoints no query at or
    /// after `horizon` can reach.
    pub fn get_past_votes_and_clear(
        env: Env,
        caller: Address,
        delegate: Address,
        ledger: u32,
        horizon: u32,
    ) -> Result<i128, ContractError> {
        caller.require_auth();
        let _guard = ReentrancyGuard::enter(&env)?;
        Self::load_config(&env)?;

        if ledger < horizon {
            return Err(ContractError::TrackingPeriodExpired);
        }
        let governance: Option<Address> = env.storage().instance().get(&GOVERNANCE);
        if governance.as_ref() != Some(&caller) {
            return Err(ContractError::Unauthorized);
        }
        checkpoints::find_and_clear(&env, &delegate, ledger, horizon)
    }

    pub fn num_checkpoints(env: Env, delegate: Address) -> u32 {
        checkpoints::load(&env, &delegate).len()
    }

    pub fn checkpoint(env: Env, delegate: Address, pos: u32) -> Option<Checkpoint> {
        checkpoints::load(&env, &delegate).get(pos)
    }

    pub fn get_delegation(env: Env, account: Address) -> Option<Delegation> {
        delegation::get(&env, &account)
    }

    // ── View functions ───────────────────────────────────────────────────────

    pub fn get_deposits(env: Env, account: Address) -> Vec<Deposit> {
        deposits::load(&env, &account)
    }

    pub fn get_deposit(env: Env, account: Address, deposit_id: u32) -> Result<Deposit, ContractError> {
        deposits::get(&deposits::load(&env, &account), deposit_id)
    }

    pub fn deposit_count(env: Env, account: Address) -> u32 {
        deposits::load(&env, &account).len()
    }

    /// Reward claimable from one deposit right now.
    pub fn pending_reward(
        env: Env,
        account: Address,
        deposit_id: u32,
    ) -> Result<i128, ContractError> {
        let deposit = deposits::get(&deposits::load(&env, &account), deposit_id)?;
        let state = rewards::load(&env)?.as_of(&env, env.ledger().timestamp())?;
        deposits::pending(&env, &state, &Self::load_policy(&env)?, &deposit)
    }

    /// Reward claimable from all of `account`'s deposits right now.
    pub fn pending_rewards(env: Env, account: Address) -> Result<i128, ContractError> {
        let state = rewards::load(&env)?.as_of(&env, env.ledger().timestamp())?;
        let policy = Self::load_policy(&env)?;
        let mut total = 0i128;
        for deposit in deposits::load(&env, &account).iter() {
            total = math::add(total, deposits::pending(&env, &state, &policy, &deposit)?)?;
        }
        Ok(total)
    }

    /// Accrual state recomputed as of the current ledger time.
    pub fn get_reward_state(env: Env) -> Result<RewardState, ContractError> {
        rewards::load(&env)?.as_of(&env, env.ledger().timestamp())
    }

    pub fn reward_per_weighted_unit(env: Env) -> Result<i128, ContractError> {
        Ok(Self::get_reward_state(env)?.reward_per_weighted_unit)
    }

    pub fn get_total_staked(env: Env) -> Result<i128, ContractError> {
        Ok(rewards::load(&env)?.total_principal)
    }

    pub fn get_total_weighted(env: Env) -> Result<i128, ContractError> {
        Ok(rewards::load(&env)?.total_weighted)
    }

    pub fn get_config(env: Env) -> Result<StakingConfig, ContractError> {
        Self::load_config(&env)
    }

    pub fn get_lock_terms(env: Env, lock_class: u32) -> Result<LockTerms, ContractError> {
        let class = LockClass::from_u32(lock_class)?;
        Ok(Self::load_policy(&env)?.classify(class).clone())
    }

    /// `amount` plus the bonus of `lock_class` under the current policy.
    pub fn weighted_amount(env: Env, amount: i128, lock_class: u32) -> Result<i128, ContractError> {
        let class = LockClass::from_u32(lock_class)?;
        Self::load_policy(&env)?.weighted(&env, amount, class)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&CONFIG)
    }

    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)
    }

    pub fn get_governance(env: Env) -> Option<Address> {
        env.storage().instance().get(&GOVERNANCE)
    }

    pub fn is_paused(env: Env, scope: PauseScope) -> bool {
        pause::is_paused(&env, &scope)
    }

    // ── Admin functions ──────────────────────────────────────────────────────

    /// Change the length of future reward periods. Rejected while a period
    /// is still running. Requires `SuperAdmin`.
    pub fn set_rewards_duration(
        env: Env,
        caller: Address,
        duration: u64,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        Self::load_config(&env)?;

        let now = env.ledger().timestamp();
        let mut state = rewards::load(&env)?;
        state.accrue(&env, now)?;
        state.set_duration(now, duration)?;
        admin_tiers::require_tier(&env, &caller, &AdminTier::SuperAdmin)?;
        rewards::store(&env, &state);

        events::publish_duration_set(&env, duration);
        Ok(())
    }

    /// Replace the terms of one lock class for future deposits.
    ///
    /// The bonus feeds the weight of every existing deposit of the class, so
    /// changing it is rejected while anything is staked. Durations may change
    /// at any time; existing unlock times are kept. Requires `SuperAdmin`.
    pub fn set_lock_terms(
        env: Env,
        caller: Address,
        lock_class: u32,
        duration: u64,
        bonus: i128,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        Self::load_config(&env)?;

        let class = LockClass::from_u32(lock_class)?;
        let terms = LockTerms { duration, bonus };
        lock::validate_terms(&terms)?;

        let mut policy = Self::load_policy(&env)?;
        let state = rewards::load(&env)?;
        if policy.classify(class).bonus != bonus && state.total_principal > 0 {
            return Err(ContractError::StakesOutstanding);
        }
        admin_tiers::require_tier(&env, &caller, &AdminTier::SuperAdmin)?;

        policy.set_terms(class, terms);
        env.storage().instance().set(&LOCK_POLICY, &policy);

        events::publish_lock_terms_set(&env, lock_class, duration, bonus);
        Ok(())
    }

    /// Name the governance module allowed to prune checkpoints.
    /// Requires `SuperAdmin`.
    pub fn set_governance(env: Env, caller: Address, governance: Address) -> Result<(), ContractError> {
        caller.require_auth();
        Self::load_config(&env)?;
        admin_tiers::require_tier(&env, &caller, &AdminTier::SuperAdmin)?;

        env.storage().instance().set(&GOVERNANCE, &governance);
        events::publish_governance_set(&env, governance);
        Ok(())
    }

    /// Send stray tokens held by the ledger to `to`.
    ///
    /// Staked principal and reward the ledger is committed to pay can never
    /// be recovered. Requires `SuperAdmin`.
    pub fn recover_tokens(
        env: Env,
        caller: Address,
        token: Address,
        amount: i128,
        to: Address,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        let _guard = ReentrancyGuard::enter(&env)?;
        let config = Self::load_config(&env)?;

        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }
        admin_tiers::require_tier(&env, &caller, &AdminTier::SuperAdmin)?;

        let now = env.ledger().timestamp();
        let mut state = rewards::load(&env)?;
        state.accrue(&env, now)?;

        let mut reserved = 0i128;
        if token == config.stake_token {
            reserved = math::add(reserved, state.total_principal)?;
        }
        if token == config.reward_token {
            reserved = math::add(reserved, state.committed(now)?)?;
        }
        let balance = transfer::balance(&env, &token)?;
        if amount > math::sub(balance, reserved)? {
            return Err(ContractError::InsufficientSurplus);
        }

        rewards::store(&env, &state);
        transfer::push(&env, &token, &to, amount)?;

        events::publish_tokens_recovered(&env, token, amount, to);
        Ok(())
    }

    /// Engage a circuit breaker. Requires at least `OperatorAdmin`.
    pub fn pause(env: Env, caller: Address, scope: PauseScope) -> Result<(), ContractError> {
        caller.require_auth();
        Self::load_config(&env)?;
        pause::set_paused(&env, &caller, &scope, true)?;
        events::publish_pause_changed(&env, caller, scope, true);
        Ok(())
    }

    /// Release a circuit breaker. Requires at least `OperatorAdmin`.
    pub fn resume(env: Env, caller: Address, scope: PauseScope) -> Result<(), ContractError> {
        caller.require_auth();
        Self::load_config(&env)?;
        pause::set_paused(&env, &caller, &scope, false)?;
        events::publish_pause_changed(&env, caller, scope, false);
        Ok(())
    }

    // ── Admin tier management ────────────────────────────────────────────────

    /// Assigns `tier` to `target`. Only a `SuperAdmin` may call this.
    pub fn promote_admin(
        env: Env,
        caller: Address,
        target: Address,
        tier: AdminTier,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        Self::load_config(&env)?;
        admin_tiers::promote_admin(&env, &caller, &target, tier.clone())?;
        events::publish_admin_changed(&env, caller, target, tier.rank());
        Ok(())
    }

    /// Removes `target`'s tier. Only a `SuperAdmin` may call this.
    pub fn demote_admin(env: Env, caller: Address, target: Address) -> Result<(), ContractError> {
        caller.require_auth();
        Self::load_config(&env)?;
        admin_tiers::demote_admin(&env, &caller, &target)?;
        events::publish_admin_changed(&env, caller, target, 0);
        Ok(())
    }

    pub fn get_admin_tier(env: Env, admin: Address) -> Option<AdminTier> {
        admin_tiers::get_admin_tier(&env, &admin)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn load_config(env: &Env) -> Result<StakingConfig, ContractError> {
        let config = env
            .storage()
            .instance()
            .get(&CONFIG)
            .ok_or(ContractError::NotInitialized)?;
        env.storage()
            .instance()
            .extend_ttl(admin_tiers::TTL_THRESHOLD, admin_tiers::TTL_EXTEND_TO);
        Ok(config)
    }

    fn load_policy(env: &Env) -> Result<LockPolicy, ContractError> {
        env.storage()
            .instance()
            .get(&LOCK_POLICY)
            .ok_or(ContractError::NotInitialized)
    }

    /// Shared body of `withdraw` and `exit`.
    fn release_deposit(
        env: &Env,
        account: &Address,
        deposit_id: u32,
        amount: i128,
        func: &Symbol,
    ) -> Result<ExitSummary, ContractError> {
        let config = Self::load_config(env)?;
        let mut ledger = deposits::load(env, account);
        let mut deposit = deposits::get(&ledger, deposit_id)?;
        pause::require_not_paused(env, func)?;

        let policy = Self::load_policy(env)?;
        let now = env.ledger().timestamp();
        let mut state = rewards::load(env)?;
        state.accrue(env, now)?;

        let released = deposits::release(
            env,
            &state,
            &policy,
            &config.voting_unit,
            &mut deposit,
            amount,
            now,
        )?;
        ledger.set(deposit_id, deposit);
        deposits::store(env, account, &ledger);

        Self::shrink_pool(&mut state, &released)?;
        rewards::store(env, &state);

        delegation::debit(env, account, released.votes)?;
        Self::pay(env, &config, account, released.principal, released.reward)?;

        events::publish_withdrawn(env, account.clone(), deposit_id, released.principal);

        Ok(ExitSummary {
            principal: released.principal,
            reward: released.reward,
            deposits: 1,
        })
    }

    fn shrink_pool(state: &mut RewardState, released: &Release) -> Result<(), ContractError> {
        state.total_principal = math::sub(state.total_principal, released.principal)?;
        state.total_weighted = math::sub(state.total_weighted, released.weighted)?;
        state.pay_out(released.reward);
        Ok(())
    }

    /// Sends principal and reward, merging them into one transfer when both
    /// are the same token.
    fn pay(
        env: &Env,
        config: &StakingConfig,
        to: &Address,
        principal: i128,
        reward: i128,
    ) -> Result<(), ContractError> {
        if config.stake_token == config.reward_token {
            transfer::push(env, &config.stake_token, to, math::add(principal, reward)?)?;
        } else {
            transfer::push(env, &config.stake_token, to, principal)?;
            transfer::push(env, &config.reward_token, to, reward)?;
        }
        if reward > 0 {
            events::publish_reward_paid(env, to.clone(), reward);
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_admin_tiers;
