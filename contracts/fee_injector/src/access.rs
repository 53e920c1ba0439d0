//! # Access control
//!
//! Two distinguished identities guard the controller:
//!
//! | Role          | May                                                      |
//! |---------------|----------------------------------------------------------|
//! | Administrator | replace tracked assets, set operator, transfer admin, pause, sweep |
//! | Operator      | trigger `perform_release`                                |
//!
//! Every `require_*` helper first demands the caller's signature, then
//! compares against the stored identity. Checks run before any mutation.

use soroban_sdk::{Address, Env};

use crate::storage;
use crate::types::InjectorConfig;
use crate::Error;

pub fn is_administrator(config: &InjectorConfig, who: &Address) -> bool {
    config.admin == *who
}

pub fn is_operator(config: &InjectorConfig, who: &Address) -> bool {
    config.operator == *who
}

/// Authenticate `caller` and ensure it is the administrator.
pub fn require_admin(env: &Env, caller: &Address) -> Result<InjectorConfig, Error> {
    caller.require_auth();
    let config = storage::load_config(env)?;
    if !is_administrator(&config, caller) {
        return Err(Error::Unauthorized);
    }
    Ok(config)
}

/// Authenticate `caller` and ensure it is the operator.
pub fn require_operator(env: &Env, caller: &Address) -> Result<InjectorConfig, Error> {
    caller.require_auth();
    let config = storage::load_config(env)?;
    if !is_operator(&config, caller) {
        return Err(Error::Unauthorized);
    }
    Ok(config)
}

/// Replace the operator. Returns the previous one.
pub fn set_operator(
    env: &Env,
    caller: &Address,
    new_operator: &Address,
) -> Result<Address, Error> {
    let mut config = require_admin(env, caller)?;
    let previous = core::mem::replace(&mut config.operator, new_operator.clone());
    storage::save_config(env, &config);
    Ok(previous)
}

/// Hand administration to `new_admin`. The caller loses the role immediately.
pub fn transfer_administration(
    env: &Env,
    caller: &Address,
    new_admin: &Address,
) -> Result<Address, Error> {
    let mut config = require_admin(env, caller)?;
    let previous = core::mem::replace(&mut config.admin, new_admin.clone());
    storage::save_config(env, &config);
    Ok(previous)
}
