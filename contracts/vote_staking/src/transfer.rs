//! Token collaborator calls.
//!
//! Transfers go through `try_transfer` so a token that traps and a token
//! that reports an error both surface as `TransferFailed`, which rolls the
//! whole invocation back.

use soroban_sdk::{token, Address, Env};

use crate::ContractError;

pub fn pull(env: &Env, token: &Address, from: &Address, amount: i128) -> Result<(), ContractError> {
    send(env, token, from, &env.current_contract_address(), amount)
}

pub fn push(env: &Env, token: &Address, to: &Address, amount: i128) -> Result<(), ContractError> {
    send(env, token, &env.current_contract_address(), to, amount)
}

fn send(
    env: &Env,
    token: &Address,
    from: &Address,
    to: &Address,
    amount: i128,
) -> Result<(), ContractError> {
    if amount <= 0 {
        return Ok(());
    }
    match token::TokenClient::new(env, token).try_transfer(from, to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(ContractError::TransferFailed),
    }
}

pub fn balance(env: &Env, token: &Address) -> Result<i128, ContractError> {
    match token::TokenClient::new(env, token).try_balance(&env.current_contract_address()) {
        Ok(Ok(balance)) => Ok(balance),
        _ => Err(ContractError::TransferFailed),
    }
}
