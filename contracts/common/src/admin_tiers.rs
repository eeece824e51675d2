use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::CommonError;

// ── Storage Keys ─────────────────────────────────────────────────────────────

const ADMIN_TIER_PREFIX: Symbol = symbol_short!("ADM_TIER");
const SUPER_ADMIN: Symbol = symbol_short!("S_ADMIN");

pub const TTL_THRESHOLD: u32 = 5184000;
pub const TTL_EXTEND_TO: u32 = 10368000;

// ── Admin Tier Enum ──────────────────────────────────────────────────────────

/// Role ladder guarding the ledger's admin surface.
///
/// - `SuperAdmin`    – The owner: recovers stray tokens, changes the reward
///                     duration and lock terms, names the governance module,
///                     and promotes/demotes other admins.
/// - `Distributor`   – Funds reward periods via `notify_reward_amount`.
/// - `OperatorAdmin` – Can only pause and resume principal-mutating entry
///                     points.
///
/// Each tier also holds every permission of the tiers below it.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum AdminTier {
    OperatorAdmin = 1,
    Distributor = 2,
    SuperAdmin = 3,
}

impl AdminTier {
    pub fn rank(&self) -> u32 {
        match self {
            AdminTier::OperatorAdmin => 1,
            AdminTier::Distributor => 2,
            AdminTier::SuperAdmin => 3,
        }
    }

    /// Returns true if this tier is at least as high as `min_tier`.
    pub fn has_at_least(&self, min_tier: &AdminTier) -> bool {
        self.rank() >= min_tier.rank()
    }
}

// ── Storage Helpers ──────────────────────────────────────────────────────────

fn admin_tier_key(admin: &Address) -> (Symbol, Address) {
    (ADMIN_TIER_PREFIX, admin.clone())
}

fn extend_ttl(env: &Env, key: &(Symbol, Address)) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

// ── Core Functions ───────────────────────────────────────────────────────────

/// Assigns an admin tier to the given address.
/// Callers must verify authorization beforehand.
pub fn set_admin_tier(env: &Env, admin: &Address, tier: AdminTier) {
    let key = admin_tier_key(admin);
    env.storage().persistent().set(&key, &tier);
    extend_ttl(env, &key);
}

pub fn get_admin_tier(env: &Env, admin: &Address) -> Option<AdminTier> {
    let key = admin_tier_key(admin);
    let tier: Option<AdminTier> = env.storage().persistent().get(&key);
    if tier.is_some() {
        extend_ttl(env, &key);
    }
    tier
}

pub fn remove_admin_tier(env: &Env, admin: &Address) {
    env.storage().persistent().remove(&admin_tier_key(admin));
}

/// Guard: fails with `AccessDenied` unless `caller` holds at least `min_tier`.
pub fn require_tier(env: &Env, caller: &Address, min_tier: &AdminTier) -> Result<(), CommonError> {
    match get_admin_tier(env, caller) {
        Some(tier) if tier.has_at_least(min_tier) => Ok(()),
        _ => Err(CommonError::AccessDenied),
    }
}

// ── SuperAdmin Registry ──────────────────────────────────────────────────────

/// Records the bootstrap owner and assigns it the SuperAdmin tier.
pub fn set_super_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&SUPER_ADMIN, admin);
    set_admin_tier(env, admin, AdminTier::SuperAdmin);
}

pub fn get_super_admin(env: &Env) -> Option<Address> {
    env.storage().instance().get(&SUPER_ADMIN)
}

// ── Promote / Demote ─────────────────────────────────────────────────────────

/// Assigns `tier` to `target`. Only a `SuperAdmin` may call this; the caller
/// must already have been authenticated via `require_auth()`.
pub fn promote_admin(
    env: &Env,
    caller: &Address,
    target: &Address,
    tier: AdminTier,
) -> Result<(), CommonError> {
    require_tier(env, caller, &AdminTier::SuperAdmin)?;
    set_admin_tier(env, target, tier);
    Ok(())
}

/// Removes `target`'s tier. The bootstrap owner cannot be demoted, so the
/// ledger always keeps one SuperAdmin.
pub fn demote_admin(env: &Env, caller: &Address, target: &Address) -> Result<(), CommonError> {
    require_tier(env, caller, &AdminTier::SuperAdmin)?;
    if get_super_admin(env).as_ref() == Some(target) {
        return Err(CommonError::AccessDenied);
    }
    remove_admin_tier(env, target);
    Ok(())
}
