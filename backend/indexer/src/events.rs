//! Canonical event types emitted by the fee injector contract.
//!
//! These mirror the Soroban contract events defined in
//! `contracts/fee_injector/src/events.rs`.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the injector contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Contract configured (`init` topic).
    Initialized,
    /// A tranche was released to the collector (`released` topic).
    Released,
    /// The collector refused the post-release checkpoint (`notify_f` topic).
    NotifyFailed,
    /// Tracked-asset set replaced (`assets` topic).
    AssetsUpdated,
    /// Operator replaced (`operator` topic).
    OperatorChanged,
    /// Administration handed over (`admin` topic).
    AdminTransferred,
    /// Releases paused (`paused` topic).
    Paused,
    /// Releases resumed (`unpaused` topic).
    Unpaused,
    /// Stray untracked balance recovered (`swept` topic).
    Swept,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "init" => Self::Initialized,
            "released" => Self::Released,
            "notify_f" => Self::NotifyFailed,
            "assets" => Self::AssetsUpdated,
            "operator" => Self::OperatorChanged,
            "admin" => Self::AdminTransferred,
            "paused" => Self::Paused,
            "unpaused" => Self::Unpaused,
            "swept" => Self::Swept,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initialized => "initialized",
            Self::Released => "released",
            Self::NotifyFailed => "notify_failed",
            Self::AssetsUpdated => "assets_updated",
            Self::OperatorChanged => "operator_changed",
            Self::AdminTransferred => "admin_transferred",
            Self::Paused => "paused",
            Self::Unpaused => "unpaused",
            Self::Swept => "swept",
            Self::Unknown => "unknown",
        }
    }

    /// Whether the second topic carries a release index.
    pub fn is_indexed_by_release(&self) -> bool {
        matches!(self, Self::Released | Self::NotifyFailed)
    }
}

/// A fully decoded injector event, ready to be stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InjectorEvent {
    pub event_type: String,
    pub release_index: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    /// Event-specific payload kept as JSON (transfers, asset lists, phase).
    pub detail: Option<String>,
    pub next_eligible_at: Option<i64>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_type: String,
    pub release_index: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub detail: Option<String>,
    pub next_eligible_at: Option<i64>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}
