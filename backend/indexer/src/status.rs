//! Cycle status derived from the indexed release history.
//!
//! Release `n` (zero-based) is a first half when `n` is even: the contract
//! starts in the first-half phase and every successful release flips it.

use serde::Serialize;

use crate::events::EventRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingPhase {
    FirstHalf,
    SecondHalf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleStatus {
    pub release_count: u64,
    pub pending: PendingPhase,
    pub last_release_at: Option<i64>,
    pub next_eligible_at: Option<i64>,
    /// Whether the cool-down has elapsed at `now`. Balances are not known
    /// to the indexer, so this is necessary but not sufficient for readiness.
    pub time_eligible: bool,
}

impl CycleStatus {
    /// Build the status from the latest `released` event (if any) at `now`.
    pub fn derive(latest_release: Option<&EventRecord>, now: i64) -> Self {
        let Some(ev) = latest_release else {
            return CycleStatus {
                release_count: 0,
                pending: PendingPhase::FirstHalf,
                last_release_at: None,
                next_eligible_at: None,
                time_eligible: true,
            };
        };

        let index: u64 = ev
            .release_index
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        let release_count = index + 1;
        let pending = if release_count % 2 == 0 {
            PendingPhase::FirstHalf
        } else {
            PendingPhase::SecondHalf
        };

        CycleStatus {
            release_count,
            pending,
            last_release_at: Some(ev.timestamp),
            next_eligible_at: ev.next_eligible_at,
            time_eligible: ev.next_eligible_at.map_or(true, |t| now >= t),
        }
    }
}
