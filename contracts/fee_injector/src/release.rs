//! Release executor: per-asset tranche amounts and the transfers to the
//! collector.

use soroban_sdk::{token, Address, Env, Vec};

use crate::types::{AssetBalance, AssetTransfer, Phase};

/// Amount to move for one asset holding `balance` in `phase`.
///
/// First half moves `floor(balance / 2)`, leaving `ceil(balance / 2)` held;
/// second half moves everything, sweeping any rounding remainder.
/// Non-positive balances move nothing.
pub fn tranche(phase: Phase, balance: i128) -> i128 {
    if balance <= 0 {
        return 0;
    }
    match phase {
        Phase::AwaitingFirstHalf => balance / 2,
        Phase::AwaitingSecondHalf => balance,
    }
}

/// Build the transfer list for a release. Assets whose tranche is zero are
/// skipped; order follows `balances`.
pub fn plan(env: &Env, phase: Phase, balances: &Vec<AssetBalance>) -> Vec<AssetTransfer> {
    let mut transfers = Vec::new(env);
    for entry in balances.iter() {
        let amount = tranche(phase, entry.balance);
        if amount > 0 {
            transfers.push_back(AssetTransfer {
                asset: entry.asset,
                amount,
            });
        }
    }
    transfers
}

/// Move every planned amount from this contract to `collector`.
pub fn execute(env: &Env, collector: &Address, transfers: &Vec<AssetTransfer>) {
    let from = env.current_contract_address();
    for t in transfers.iter() {
        token::Client::new(env, &t.asset).transfer(&from, collector, &t.amount);
    }
}
