//! # Types
//!
//! Shared data structures used across all modules of the fee injector.
//!
//! ## Config / Cycle split
//!
//! Controller state is stored as separate instance entries:
//!
//! - [`InjectorConfig`] — roles, collector, period. Written at `init` and by
//!   the role-management entry points only.
//! - [`CycleState`] — phase flag, release cursor and counter. Written by
//!   `perform_release` only.
//!
//! ## Duty cycle
//!
//! ```text
//!            first-half release (any time, balance > 0)
//!  AwaitingFirstHalf ─────────────────────────────► AwaitingSecondHalf
//!          ▲                                                │
//!          └────────────────────────────────────────────────┘
//!            second-half release (now >= cursor + period, balance > 0)
//! ```
//!
//! There is no terminal state.

use soroban_sdk::{contracttype, Address, Vec};

/// Which tranche the controller is waiting to release.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    /// Next release moves `floor(B / 2)` of every positive balance.
    AwaitingFirstHalf,
    /// Next release moves everything left, once the period has elapsed.
    AwaitingSecondHalf,
}

impl Phase {
    pub fn from_flag(first_half_pending: bool) -> Self {
        if first_half_pending {
            Phase::AwaitingFirstHalf
        } else {
            Phase::AwaitingSecondHalf
        }
    }
}

/// Why `check_ready` answered the way it did.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReadyReason {
    /// A release may be performed now.
    Ready,
    /// No tracked asset holds a positive balance.
    NoBalance,
    /// Second half pending and the period has not elapsed yet.
    CoolingDown,
    /// The administrator paused releases.
    Paused,
}

/// Role and destination configuration.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InjectorConfig {
    pub admin: Address,
    pub operator: Address,
    /// Fixed downstream recipient. Never rewritten after `init`.
    pub collector: Address,
    /// Seconds between a first-half release and second-half eligibility.
    pub period: u64,
    /// Whether the collector is asked to checkpoint after each release.
    pub notify_collector: bool,
}

/// Duty-cycle state. Only `perform_release` writes it.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CycleState {
    pub first_half_pending: bool,
    pub last_release_cursor: u64,
    pub release_count: u64,
}

impl CycleState {
    pub fn new(created_at: u64) -> Self {
        CycleState {
            first_half_pending: true,
            last_release_cursor: created_at,
            release_count: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        Phase::from_flag(self.first_half_pending)
    }
}

/// Balance currently held by the controller for one asset.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssetBalance {
    pub asset: Address,
    pub balance: i128,
}

/// Amount moved to the collector for one asset during a release.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssetTransfer {
    pub asset: Address,
    pub amount: i128,
}

/// Outcome of a successful `perform_release`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReleaseReport {
    /// Zero-based index of this release.
    pub index: u64,
    /// The tranche that was executed.
    pub phase: Phase,
    pub transfers: Vec<AssetTransfer>,
    /// New value of `last_release_cursor`.
    pub released_at: u64,
    /// `false` when notification is disabled or the collector call failed.
    pub notified: bool,
}
