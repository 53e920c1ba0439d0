//! # Events
//!
//! Every state change publishes one event. Topics lead with a short symbol
//! that the off-chain indexer keys on.
//!
//! | Topic                 | Data              |
//! |-----------------------|-------------------|
//! | `("init", admin)`     | [`Initialized`]   |
//! | `("released", index)` | [`ReleaseExecuted`] |
//! | `("notify_f", index)` | [`NotifyFailed`]  |
//! | `("assets",)`         | [`AssetsUpdated`] |
//! | `("operator",)`       | [`RoleChanged`]   |
//! | `("admin",)`          | [`RoleChanged`]   |
//! | `("paused",)`         | caller `Address`  |
//! | `("unpaused",)`       | caller `Address`  |
//! | `("swept", asset)`    | [`Swept`]         |

use soroban_sdk::{contracttype, symbol_short, Address, Env, Vec};

use crate::types::{AssetTransfer, Phase};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Initialized {
    pub admin: Address,
    pub operator: Address,
    pub collector: Address,
    pub assets: Vec<Address>,
    pub period: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReleaseExecuted {
    pub index: u64,
    pub phase: Phase,
    pub operator: Address,
    pub transfers: Vec<AssetTransfer>,
    pub released_at: u64,
    /// When the next tranche becomes time-eligible.
    pub next_eligible_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NotifyFailed {
    pub index: u64,
    pub collector: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssetsUpdated {
    pub admin: Address,
    pub assets: Vec<Address>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoleChanged {
    pub previous: Address,
    pub current: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Swept {
    pub asset: Address,
    pub recipient: Address,
    pub amount: i128,
}

pub fn initialized(env: &Env, data: Initialized) {
    env.events()
        .publish((symbol_short!("init"), data.admin.clone()), data);
}

pub fn released(env: &Env, data: ReleaseExecuted) {
    env.events()
        .publish((symbol_short!("released"), data.index), data);
}

pub fn notify_failed(env: &Env, index: u64, collector: Address) {
    env.events().publish(
        (symbol_short!("notify_f"), index),
        NotifyFailed { index, collector },
    );
}

pub fn assets_updated(env: &Env, admin: Address, assets: Vec<Address>) {
    env.events()
        .publish((symbol_short!("assets"),), AssetsUpdated { admin, assets });
}

pub fn operator_changed(env: &Env, previous: Address, current: Address) {
    env.events()
        .publish((symbol_short!("operator"),), RoleChanged { previous, current });
}

pub fn admin_transferred(env: &Env, previous: Address, current: Address) {
    env.events()
        .publish((symbol_short!("admin"),), RoleChanged { previous, current });
}

pub fn paused(env: &Env, by: Address) {
    env.events().publish((symbol_short!("paused"),), by);
}

pub fn unpaused(env: &Env, by: Address) {
    env.events().publish((symbol_short!("unpaused"),), by);
}

pub fn swept(env: &Env, data: Swept) {
    env.events()
        .publish((symbol_short!("swept"), data.asset.clone()), data);
}
