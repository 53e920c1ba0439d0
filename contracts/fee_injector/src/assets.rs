//! Tracked-asset registry and balance reads.

use soroban_sdk::{token, Address, Env, Vec};

use crate::types::AssetBalance;
use crate::Error;

/// Upper bound on the tracked set; every release touches each entry.
pub const MAX_TRACKED_ASSETS: u32 = 32;

/// Reject duplicate or oversized asset lists.
pub fn validate(assets: &Vec<Address>) -> Result<(), Error> {
    if assets.len() > MAX_TRACKED_ASSETS {
        return Err(Error::InvalidConfiguration);
    }
    for i in 0..assets.len() {
        let a = assets.get_unchecked(i);
        for j in (i + 1)..assets.len() {
            if assets.get_unchecked(j) == a {
                return Err(Error::InvalidConfiguration);
            }
        }
    }
    Ok(())
}

/// Amount of `asset` held by this contract.
pub fn balance_of(env: &Env, asset: &Address) -> i128 {
    token::Client::new(env, asset).balance(&env.current_contract_address())
}

/// Snapshot of every tracked balance, in tracked order.
pub fn snapshot(env: &Env, assets: &Vec<Address>) -> Vec<AssetBalance> {
    let mut out = Vec::new(env);
    for asset in assets.iter() {
        let balance = balance_of(env, &asset);
        out.push_back(AssetBalance { asset, balance });
    }
    out
}

pub fn any_positive(balances: &Vec<AssetBalance>) -> bool {
    balances.iter().any(|b| b.balance > 0)
}
