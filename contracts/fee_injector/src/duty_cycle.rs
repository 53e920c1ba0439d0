//! # Duty cycle
//!
//! The readiness predicate and the phase/cursor transition, written as pure
//! functions of `(state, now, balances)` so entry points read the ledger
//! clock exactly once and tests can drive any instant directly.
//!
//! Readiness, in order of precedence:
//!
//! 1. paused → `Paused`
//! 2. second half pending and `now < cursor + period` → `CoolingDown`
//! 3. no tracked asset with a positive balance → `NoBalance`
//! 4. otherwise → `Ready`
//!
//! Time never gates the first half.

use soroban_sdk::Vec;

use crate::assets;
use crate::types::{AssetBalance, CycleState, Phase, ReadyReason};

/// Earliest instant at which the pending tranche is time-eligible.
pub fn eligible_at(cycle: &CycleState, period: u64) -> u64 {
    match cycle.phase() {
        Phase::AwaitingFirstHalf => cycle.last_release_cursor,
        Phase::AwaitingSecondHalf => cycle.last_release_cursor.saturating_add(period),
    }
}

pub fn evaluate(
    cycle: &CycleState,
    period: u64,
    now: u64,
    paused: bool,
    balances: &Vec<AssetBalance>,
) -> ReadyReason {
    if paused {
        return ReadyReason::Paused;
    }
    if !cycle.first_half_pending && now < eligible_at(cycle, period) {
        return ReadyReason::CoolingDown;
    }
    if !assets::any_positive(balances) {
        return ReadyReason::NoBalance;
    }
    ReadyReason::Ready
}

/// State after a successful release at `now`.
pub fn advance(cycle: &CycleState, now: u64) -> CycleState {
    CycleState {
        first_half_pending: !cycle.first_half_pending,
        last_release_cursor: cycle.last_release_cursor.max(now),
        release_count: cycle.release_count + 1,
    }
}
