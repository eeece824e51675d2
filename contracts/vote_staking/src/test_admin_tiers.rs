extern crate std;

use common::{AdminTier, PauseScope};
use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events as _},
    token::StellarAssetClient,
    Address, IntoVal, TryIntoVal, Val, Vec,
};

use crate::math::SCALE;
use crate::test::{setup, LONG, MEDIUM, SHORT};
use crate::events::AdminChangedEvent;
use crate::ContractError;

/// Converts the SDK's XDR-backed event list into `(contract, topics, data)` tuples.
fn all_events(env: &soroban_sdk::Env) -> Vec<(Address, Vec<Val>, Val)> {
    use soroban_sdk::xdr::{ContractEventBody, ScAddress};
    use soroban_sdk::TryFromVal;
    let mut out = Vec::new(env);
    for e in env.events().all().events() {
        let ContractEventBody::V0(body) = &e.body;
        let contract = Address::try_from_val(
            env,
            &ScAddress::Contract(e.contract_id.clone().unwrap()),
        )
        .unwrap();
        let mut topics = Vec::new(env);
        for t in body.topics.iter() {
            topics.push_back(Val::try_from_val(env, t).unwrap());
        }
        let data = Val::try_from_val(env, &body.data).unwrap();
        out.push_back((contract, topics, data));
    }
    out
}

// ── Tier management ──────────────────────────────────────────────────────────

#[test]
fn test_initialize_grants_super_admin() {
    let h = setup();
    assert_eq!(
        h.client.get_admin_tier(&h.admin),
        Some(AdminTier::SuperAdmin)
    );
}

#[test]
fn test_promote_and_demote() {
    let h = setup();
    let operator = Address::generate(&h.env);

    h.client
        .promote_admin(&h.admin, &operator, &AdminTier::OperatorAdmin);
    assert_eq!(
        h.client.get_admin_tier(&operator),
        Some(AdminTier::OperatorAdmin)
    );

    h.client.demote_admin(&h.admin, &operator);
    assert_eq!(h.client.get_admin_tier(&operator), None);
}

#[test]
fn test_admin_change_event_carries_tier_rank() {
    let h = setup();
    let operator = Address::generate(&h.env);

    h.client
        .promote_admin(&h.admin, &operator, &AdminTier::Distributor);
    let events: Vec<(Address, Vec<Val>, Val)> = all_events(&h.env);
    let event = events.last().unwrap();
    assert_eq!(
        event.1,
        (symbol_short!("ADM_CHG"), operator.clone()).into_val(&h.env)
    );
    let payload: AdminChangedEvent = event.2.try_into_val(&h.env).unwrap();
    assert_eq!(payload.tier, AdminTier::Distributor.rank());
    assert_eq!(payload.caller, h.admin);

    h.client.demote_admin(&h.admin, &operator);
    let events: Vec<(Address, Vec<Val>, Val)> = all_events(&h.env);
    let payload: AdminChangedEvent = events.last().unwrap().2.try_into_val(&h.env).unwrap();
    assert_eq!(payload.target, operator);
    assert_eq!(payload.tier, 0);
}

#[test]
fn test_only_super_admin_manages_tiers() {
    let h = setup();
    let operator = Address::generate(&h.env);
    let target = Address::generate(&h.env);
    h.client
        .promote_admin(&h.admin, &operator, &AdminTier::OperatorAdmin);

    match h
        .client
        .try_promote_admin(&operator, &target, &AdminTier::Distributor)
    {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    match h.client.try_demote_admin(&operator, &h.admin) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    assert_eq!(h.client.get_admin_tier(&target), None);
}

#[test]
fn test_bootstrap_super_admin_cannot_be_demoted() {
    let h = setup();
    let second = Address::generate(&h.env);
    h.client
        .promote_admin(&h.admin, &second, &AdminTier::SuperAdmin);

    match h.client.try_demote_admin(&second, &h.admin) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    assert_eq!(
        h.client.get_admin_tier(&h.admin),
        Some(AdminTier::SuperAdmin)
    );
}

// ── Pause ────────────────────────────────────────────────────────────────────

#[test]
fn test_global_pause_blocks_principal_movement_but_not_claims() {
    let h = setup();
    let alice = h.user(1_000);
    let d = Address::generate(&h.env);
    let operator = Address::generate(&h.env);
    h.client
        .promote_admin(&h.admin, &operator, &AdminTier::OperatorAdmin);

    h.client.open(&alice, &100, &d, &SHORT);
    h.fund(1_000);
    h.at(50);

    h.client.pause(&operator, &PauseScope::Global);
    assert!(h.client.is_paused(&PauseScope::Global));

    match h.client.try_open(&alice, &100, &d, &SHORT) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Paused),
        _ => unreachable!("Expected Paused error"),
    }
    match h.client.try_withdraw(&alice, &0, &10) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Paused),
        _ => unreachable!("Expected Paused error"),
    }
    match h.client.try_exit(&alice, &0) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Paused),
        _ => unreachable!("Expected Paused error"),
    }
    match h.client.try_exit_all(&alice) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Paused),
        _ => unreachable!("Expected Paused error"),
    }

    assert_eq!(h.client.claim(&alice, &0), 500);

    h.client.resume(&operator, &PauseScope::Global);
    assert!(!h.client.is_paused(&PauseScope::Global));
    assert_eq!(h.client.exit(&alice, &0).principal, 100);
}

#[test]
fn test_function_pause_is_scoped() {
    let h = setup();
    let alice = h.user(1_000);
    let d = Address::generate(&h.env);
    let scope = PauseScope::Function(symbol_short!("open"));

    h.client.open(&alice, &100, &d, &SHORT);
    h.client.pause(&h.admin, &scope);
    assert!(h.client.is_paused(&scope));
    assert!(!h.client.is_paused(&PauseScope::Global));

    match h.client.try_open(&alice, &100, &d, &SHORT) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Paused),
        _ => unreachable!("Expected Paused error"),
    }

    h.at(30);
    assert_eq!(h.client.withdraw(&alice, &0, &100), 100);

    h.client.resume(&h.admin, &scope);
    h.client.open(&alice, &100, &d, &SHORT);
    assert_eq!(h.client.deposit_count(&alice), 2);
}

#[test]
fn test_pause_requires_operator() {
    let h = setup();
    let stranger = Address::generate(&h.env);
    match h.client.try_pause(&stranger, &PauseScope::Global) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    assert!(!h.client.is_paused(&PauseScope::Global));
}

// ── Lock terms ───────────────────────────────────────────────────────────────

#[test]
fn test_lock_terms_readable_and_weighted_amount() {
    let h = setup();
    let terms = h.client.get_lock_terms(&LONG);
    assert_eq!(terms.duration, 90);
    assert_eq!(terms.bonus, SCALE / 2);
    assert_eq!(h.client.weighted_amount(&1_000, &MEDIUM), 1_250);

    match h.client.try_get_lock_terms(&9) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidLock),
        _ => unreachable!("Expected InvalidLock error"),
    }
}

#[test]
fn test_lock_bonus_frozen_while_staked() {
    let h = setup();
    let alice = h.user(100);
    let d = Address::generate(&h.env);
    h.client.open(&alice, &100, &d, &SHORT);

    match h.client.try_set_lock_terms(&h.admin, &MEDIUM, &60, &SCALE) {
        Err(Ok(e)) => assert_eq!(e, ContractError::StakesOutstanding),
        _ => unreachable!("Expected StakesOutstanding error"),
    }

    // Duration alone may change; the open deposit keeps its unlock time.
    h.client.set_lock_terms(&h.admin, &SHORT, &500, &0);
    assert_eq!(h.client.get_lock_terms(&SHORT).duration, 500);
    assert_eq!(h.client.get_deposit(&alice, &0).unlock_time, 30);

    h.at(30);
    h.client.exit(&alice, &0);
    h.client.set_lock_terms(&h.admin, &MEDIUM, &60, &SCALE);
    assert_eq!(h.client.weighted_amount(&100, &MEDIUM), 200);
}

#[test]
fn test_lock_terms_validation_and_auth() {
    let h = setup();
    let stranger = Address::generate(&h.env);

    match h.client.try_set_lock_terms(&h.admin, &SHORT, &0, &0) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidLock),
        _ => unreachable!("Expected InvalidLock error"),
    }
    match h.client.try_set_lock_terms(&h.admin, &SHORT, &10, &-1) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidLock),
        _ => unreachable!("Expected InvalidLock error"),
    }
    match h.client.try_set_lock_terms(&stranger, &SHORT, &10, &0) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
}

// ── Governance ───────────────────────────────────────────────────────────────

#[test]
fn test_set_governance_requires_super_admin() {
    let h = setup();
    let operator = Address::generate(&h.env);
    let governance = Address::generate(&h.env);
    h.client
        .promote_admin(&h.admin, &operator, &AdminTier::OperatorAdmin);

    assert_eq!(h.client.get_governance(), None);
    match h.client.try_set_governance(&operator, &governance) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    h.client.set_governance(&h.admin, &governance);
    assert_eq!(h.client.get_governance(), Some(governance));
}

// ── Token recovery ───────────────────────────────────────────────────────────

#[test]
fn test_recover_foreign_token() {
    let h = setup();
    let to = Address::generate(&h.env);
    let stray = h
        .env
        .register_stellar_asset_contract_v2(Address::generate(&h.env))
        .address();
    StellarAssetClient::new(&h.env, &stray).mint(&h.contract_id, &77);

    h.client.recover_tokens(&h.admin, &stray, &77, &to);
    assert_eq!(
        soroban_sdk::token::Client::new(&h.env, &stray).balance(&to),
        77
    );
}

#[test]
fn test_recover_never_touches_principal_or_committed_reward() {
    let h = setup();
    let alice = h.user(500);
    let d = Address::generate(&h.env);
    let to = Address::generate(&h.env);

    h.client.open(&alice, &500, &d, &SHORT);
    h.fund(1_000);

    // Stray stake tokens on top of principal.
    StellarAssetClient::new(&h.env, &h.stake_token).mint(&h.contract_id, &20);
    match h.client.try_recover_tokens(&h.admin, &h.stake_token, &21, &to) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InsufficientSurplus),
        _ => unreachable!("Expected InsufficientSurplus error"),
    }
    h.client.recover_tokens(&h.admin, &h.stake_token, &20, &to);
    assert_eq!(h.stake_balance(&to), 20);
    assert_eq!(h.stake_balance(&h.contract_id), 500);

    // Mid-period the whole funded reward is committed.
    h.at(40);
    match h.client.try_recover_tokens(&h.admin, &h.reward_token, &1, &to) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InsufficientSurplus),
        _ => unreachable!("Expected InsufficientSurplus error"),
    }

    StellarAssetClient::new(&h.env, &h.reward_token).mint(&h.contract_id, &5);
    h.client.recover_tokens(&h.admin, &h.reward_token, &5, &to);
    assert_eq!(h.reward_balance(&to), 5);

    h.at(100);
    assert_eq!(h.client.exit(&alice, &0).reward, 1_000);
}

#[test]
fn test_recover_requires_super_admin() {
    let h = setup();
    let operator = Address::generate(&h.env);
    h.client
        .promote_admin(&h.admin, &operator, &AdminTier::OperatorAdmin);
    StellarAssetClient::new(&h.env, &h.reward_token).mint(&h.contract_id, &10);

    match h
        .client
        .try_recover_tokens(&operator, &h.reward_token, &10, &operator)
    {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    match h
        .client
        .try_recover_tokens(&h.admin, &h.reward_token, &0, &operator)
    {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidAmount),
        _ => unreachable!("Expected InvalidAmount error"),
    }
}
