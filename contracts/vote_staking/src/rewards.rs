//! Reward accrual engine.
//!
//! A single [`RewardState`] lives in instance storage. Every mutation that
//! reads or changes `total_weighted` first calls [`RewardState::accrue`] so
//! elapsed time is credited to the weight that was staked during it.

use soroban_sdk::{contracttype, symbol_short, Env, Symbol};

use crate::{math, ContractError};

const REWARD_STATE: Symbol = symbol_short!("RWD_ST");

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardState {
    /// Reward per weighted unit, scaled by `SCALE`. Never decreases.
    pub reward_per_weighted_unit: i128,
    pub last_update_time: u64,
    pub period_finish: u64,
    /// Reward tokens emitted per second across all deposits.
    pub reward_rate: i128,
    pub rewards_duration: u64,
    pub total_principal: i128,
    pub total_weighted: i128,
    /// Reward accrued to depositors but not yet paid out.
    pub unclaimed_reserve: i128,
    /// Reward notified while nothing was staked; starts on the next open.
    pub queued_reward: i128,
}

/// What `notify` did with the funded amount.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NotifyOutcome {
    Started { reward_rate: i128, period_finish: u64 },
    Queued { queued_reward: i128 },
}

impl RewardState {
    pub fn new(rewards_duration: u64, now: u64) -> Self {
        Self {
            reward_per_weighted_unit: 0,
            last_update_time: now,
            period_finish: now,
            reward_rate: 0,
            rewards_duration,
            total_principal: 0,
            total_weighted: 0,
            unclaimed_reserve: 0,
            queued_reward: 0,
        }
    }

    pub fn last_time_applicable(&self, now: u64) -> u64 {
        now.min(self.period_finish)
    }

    pub fn is_period_active(&self, now: u64) -> bool {
        now < self.period_finish
    }

    /// Accrual preamble: credit the time since `last_update_time` to the
    /// current total weight.
    pub fn accrue(&mut self, env: &Env, now: u64) -> Result<(), ContractError> {
        let last = self.last_time_applicable(now);
        if last <= self.last_update_time {
            return Ok(());
        }
        let elapsed = (last - self.last_update_time) as i128;
        if self.total_weighted > 0 {
            let emitted = math::mul(elapsed, self.reward_rate)?;
            let delta = math::mul_div(env, emitted, math::SCALE, self.total_weighted)?;
            self.reward_per_weighted_unit = math::add(self.reward_per_weighted_unit, delta)?;
            self.unclaimed_reserve = math::add(self.unclaimed_reserve, emitted)?;
        }
        self.last_update_time = last;
        Ok(())
    }

    /// Copy of this state accrued up to `now`, for read-only queries.
    pub fn as_of(&self, env: &Env, now: u64) -> Result<Self, ContractError> {
        let mut state = self.clone();
        state.accrue(env, now)?;
        Ok(state)
    }

    /// Reward owed to a position of `weighted` units whose debt is
    /// `reward_debt`. Assumes `accrue` already ran.
    pub fn pending(
        &self,
        env: &Env,
        weighted: i128,
        reward_debt: i128,
    ) -> Result<i128, ContractError> {
        let delta = math::sub(self.reward_per_weighted_unit, reward_debt)?;
        math::mul_div(env, weighted, delta, math::SCALE)
    }

    /// Books a payout against the reserve.
    pub fn pay_out(&mut self, amount: i128) {
        self.unclaimed_reserve = self.unclaimed_reserve.saturating_sub(amount).max(0);
    }

    /// Starts, extends, or queues a reward period funded with `reward`.
    ///
    /// `available` is the reward-token balance not already owed to anyone:
    /// balance minus accrued-but-unpaid reward (and minus staked principal
    /// when stake and reward token coincide). The new emission must be
    /// payable from it over one full duration.
    pub fn notify(
        &mut self,
        env: &Env,
        now: u64,
        reward: i128,
        available: i128,
    ) -> Result<NotifyOutcome, ContractError> {
        self.accrue(env, now)?;
        let duration = self.rewards_duration as i128;
        let leftover = if self.is_period_active(now) {
            math::mul((self.period_finish - now) as i128, self.reward_rate)?
        } else {
            0
        };

        if self.total_principal == 0 {
            let queued = math::add(math::add(self.queued_reward, reward)?, leftover)?;
            if queued / duration > available / duration {
                return Err(ContractError::RewardTooHigh);
            }
            self.queued_reward = queued;
            self.reward_rate = 0;
            self.period_finish = now;
            self.last_update_time = now;
            return Ok(NotifyOutcome::Queued {
                queued_reward: queued,
            });
        }

        let rate = math::add(reward, leftover)? / duration;
        if rate > available / duration {
            return Err(ContractError::RewardTooHigh);
        }
        let finish = self.finish_from(now)?;
        self.reward_rate = rate;
        self.last_update_time = now;
        self.period_finish = finish;
        Ok(NotifyOutcome::Started {
            reward_rate: rate,
            period_finish: self.period_finish,
        })
    }

    /// Turns a queued reward into a running period. Called right after the
    /// first deposit lands in an empty pool.
    pub fn activate_queued(&mut self, now: u64) -> Result<Option<(i128, u64)>, ContractError> {
        if self.queued_reward <= 0 || self.total_weighted == 0 {
            return Ok(None);
        }
        let finish = self.finish_from(now)?;
        self.reward_rate = self.queued_reward / self.rewards_duration as i128;
        self.queued_reward = 0;
        self.last_update_time = now;
        self.period_finish = finish;
        Ok(Some((self.reward_rate, self.period_finish)))
    }

    fn finish_from(&self, now: u64) -> Result<u64, ContractError> {
        now.checked_add(self.rewards_duration)
            .ok_or(ContractError::ArithmeticOverflow)
    }

    pub fn set_duration(&mut self, now: u64, duration: u64) -> Result<(), ContractError> {
        if duration == 0 {
            return Err(ContractError::InvalidDuration);
        }
        if self.is_period_active(now) {
            return Err(ContractError::RewardsPeriodActive);
        }
        self.rewards_duration = duration;
        Ok(())
    }

    /// Reward tokens the ledger is already bound to pay: accrued but unpaid,
    /// queued, and the unemitted remainder of the running period.
    pub fn committed(&self, now: u64) -> Result<i128, ContractError> {
        let remaining = if self.is_period_active(now) {
            let from = now.max(self.last_update_time);
            math::mul((self.period_finish - from) as i128, self.reward_rate)?
        } else {
            0
        };
        math::add(
            math::add(self.unclaimed_reserve, self.queued_reward)?,
            remaining,
        )
    }
}

// ── Storage ───────────────────────────────────────────────────────────────────

pub fn load(env: &Env) -> Result<RewardState, ContractError> {
    env.storage()
        .instance()
        .get(&REWARD_STATE)
        .ok_or(ContractError::NotInitialized)
}

pub fn store(env: &Env, state: &RewardState) {
    env.storage().instance().set(&REWARD_STATE, state);
}
