//! # Storage
//!
//! Typed helpers over Soroban instance storage. The controller is a
//! singleton, so every entry lives as long as the contract instance.
//!
//! | Key       | Type             | Description                              |
//! |-----------|------------------|------------------------------------------|
//! | `Config`  | `InjectorConfig` | Roles, collector, period, notify flag    |
//! | `Assets`  | `Vec<Address>`   | Ordered tracked-asset set                |
//! | `Cycle`   | `CycleState`     | Phase flag, release cursor, counter      |
//! | `Paused`  | `bool`           | Release kill switch                      |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.

use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::types::{CycleState, InjectorConfig};
use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Config,
    Assets,
    Cycle,
    Paused,
}

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

// ── Config ───────────────────────────────────────────────────────────

pub fn load_config(env: &Env) -> Result<InjectorConfig, Error> {
    let config = env
        .storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)?;
    bump_instance(env);
    Ok(config)
}

pub fn save_config(env: &Env, config: &InjectorConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    bump_instance(env);
}

// ── Tracked assets ───────────────────────────────────────────────────

pub fn load_assets(env: &Env) -> Vec<Address> {
    let assets = env
        .storage()
        .instance()
        .get(&DataKey::Assets)
        .unwrap_or_else(|| Vec::new(env));
    bump_instance(env);
    assets
}

pub fn save_assets(env: &Env, assets: &Vec<Address>) {
    env.storage().instance().set(&DataKey::Assets, assets);
    bump_instance(env);
}

// ── Duty cycle ───────────────────────────────────────────────────────

pub fn load_cycle(env: &Env) -> Result<CycleState, Error> {
    let cycle = env
        .storage()
        .instance()
        .get(&DataKey::Cycle)
        .ok_or(Error::NotInitialized)?;
    bump_instance(env);
    Ok(cycle)
}

pub fn save_cycle(env: &Env, cycle: &CycleState) {
    env.storage().instance().set(&DataKey::Cycle, cycle);
    bump_instance(env);
}

// ── Pause flag ───────────────────────────────────────────────────────

pub fn is_paused(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Paused)
        .unwrap_or(false)
}

pub fn set_paused(env: &Env, paused: bool) {
    env.storage().instance().set(&DataKey::Paused, &paused);
    bump_instance(env);
}
