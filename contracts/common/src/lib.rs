//! Shared building blocks for the vote-staking contracts.
//!
//! This crate provides:
//! - [`CommonError`]: error codes shared by every contract in the workspace.
//! - [`admin_tiers`]: the Operator / Distributor / SuperAdmin role ladder.
//! - [`pause`]: global and per-function circuit breaker.
//! - [`reentrancy`]: single-flight guard released on drop.
//!
//! Contract-specific errors start at code **100** so they never collide with
//! the shared set.

#![no_std]

use soroban_sdk::contracterror;

pub mod admin_tiers;
pub mod pause;
pub mod reentrancy;

pub use admin_tiers::AdminTier;
pub use pause::PauseScope;
pub use reentrancy::ReentrancyGuard;

/// Error codes shared by every contract in the workspace.
///
/// # Code ranges
/// | Range   | Purpose                        |
/// |---------|--------------------------------|
/// | 1 – 9   | Lifecycle / initialisation     |
/// | 10 – 19 | Authorisation                  |
/// | 40 – 49 | Contract state                 |
/// | 100+    | Reserved for contract-specific |
#[contracterror]
#[derive(Clone, Debug, Eq, PartialEq, Copy)]
#[repr(u32)]
pub enum CommonError {
    /// The contract has not been initialised yet.
    NotInitialized = 1,

    /// `initialize` was called more than once.
    AlreadyInitialized = 2,

    /// The caller lacks the tier required for the operation.
    AccessDenied = 10,

    /// The requested scope is paused.
    Paused = 40,

    /// A mutating entry point was entered while another was still running.
    Reentrant = 41,
}
