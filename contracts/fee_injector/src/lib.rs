//! # Fee Injector Contract
//!
//! Accumulates balances of a fixed set of tokens and releases them to a
//! single downstream collector in two equal tranches separated by a minimum
//! cool-down, so one large deposit cannot be captured by whichever
//! distribution epoch happens to be open when it lands.
//!
//! | Phase        | Entry Point(s)                                            |
//! |--------------|-----------------------------------------------------------|
//! | Bootstrap    | [`FeeInjector::init`]                                     |
//! | Duty cycle   | [`FeeInjector::check_ready`], [`FeeInjector::perform_release`] |
//! | Role admin   | `set_operator`, `transfer_administration`                 |
//! | Assets       | `set_tracked_assets`, `get_tracked_assets`, `balance_of`, `get_balances` |
//! | Safety       | `pause`, `unpause`, `sweep`                               |
//! | Queries      | `phase`, `is_first_half_pending`, `last_release_cursor`, `next_eligible_at`, ... |
//!
//! ## Architecture
//!
//! Authorization lives in [`access`], storage in [`storage`], the readiness
//! predicate and phase transition in [`duty_cycle`], tranche arithmetic and
//! transfers in [`release`], the collector checkpoint in [`notifier`].
//! This file only wires them together and emits events.
//!
//! A Soroban invocation is atomic: a release that fails at any step leaves
//! no trace, and two operators racing for the same window see exactly one
//! success, the other re-evaluating the predicate against committed state
//! and failing with [`Error::NotReady`].

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, Address, Env, Vec};

pub mod access;
mod assets;
pub mod duty_cycle;
pub mod events;
mod notifier;
pub mod release;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;
#[cfg(test)]
mod test_halving;

pub use assets::MAX_TRACKED_ASSETS;
pub use notifier::{Collector, CollectorClient};
pub use types::{
    AssetBalance, AssetTransfer, CycleState, InjectorConfig, Phase, ReadyReason, ReleaseReport,
};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized   = 1,
    NotInitialized       = 2,
    Unauthorized         = 3,
    NotReady             = 4,
    InvalidConfiguration = 5,
    TrackedAsset         = 6,
    NothingToSweep       = 7,
}

#[contract]
pub struct FeeInjector;

#[contractimpl]
impl FeeInjector {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Configure the controller. Callable once; `admin` must sign.
    ///
    /// The release cursor starts at the current ledger time and the first
    /// half is pending, so the first funded release is eligible at once.
    pub fn init(
        env: Env,
        admin: Address,
        operator: Address,
        collector: Address,
        assets: Vec<Address>,
        period: u64,
        notify_collector: bool,
    ) -> Result<(), Error> {
        if storage::is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }
        admin.require_auth();
        assets::validate(&assets)?;

        storage::save_config(
            &env,
            &InjectorConfig {
                admin: admin.clone(),
                operator: operator.clone(),
                collector: collector.clone(),
                period,
                notify_collector,
            },
        );
        storage::save_assets(&env, &assets);
        storage::save_cycle(&env, &CycleState::new(env.ledger().timestamp()));
        storage::set_paused(&env, false);

        events::initialized(
            &env,
            events::Initialized {
                admin,
                operator,
                collector,
                assets,
                period,
            },
        );
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Duty cycle
    // ─────────────────────────────────────────────────────────

    /// Whether a release may be performed right now, and why.
    ///
    /// Read-only and unauthenticated.
    pub fn check_ready(env: Env) -> Result<(bool, ReadyReason), Error> {
        let config = storage::load_config(&env)?;
        let cycle = storage::load_cycle(&env)?;
        let balances = assets::snapshot(&env, &storage::load_assets(&env));
        let reason = duty_cycle::evaluate(
            &cycle,
            config.period,
            env.ledger().timestamp(),
            storage::is_paused(&env),
            &balances,
        );
        Ok((reason == ReadyReason::Ready, reason))
    }

    /// Release the pending tranche to the collector.
    ///
    /// - `caller` must be the operator, else `Unauthorized`.
    /// - The readiness predicate is re-evaluated here; if false, `NotReady`.
    /// - First half moves `floor(B / 2)` of each positive balance, second
    ///   half moves everything left.
    /// - Phase flips and the cursor moves to now before any transfer.
    /// - The collector checkpoint (if enabled) is best-effort.
    pub fn perform_release(env: Env, caller: Address) -> Result<ReleaseReport, Error> {
        let config = access::require_operator(&env, &caller)?;
        let cycle = storage::load_cycle(&env)?;
        let tracked = storage::load_assets(&env);
        let balances = assets::snapshot(&env, &tracked);
        let now = env.ledger().timestamp();

        let reason = duty_cycle::evaluate(
            &cycle,
            config.period,
            now,
            storage::is_paused(&env),
            &balances,
        );
        if reason != ReadyReason::Ready {
            return Err(Error::NotReady);
        }

        let phase = cycle.phase();
        let transfers = release::plan(&env, phase, &balances);
        let next = duty_cycle::advance(&cycle, now);
        storage::save_cycle(&env, &next);

        release::execute(&env, &config.collector, &transfers);

        let notified = if config.notify_collector {
            let ok = notifier::notify(&env, &config.collector, &tracked);
            if !ok {
                events::notify_failed(&env, cycle.release_count, config.collector.clone());
            }
            ok
        } else {
            false
        };

        events::released(
            &env,
            events::ReleaseExecuted {
                index: cycle.release_count,
                phase,
                operator: caller,
                transfers: transfers.clone(),
                released_at: next.last_release_cursor,
                next_eligible_at: duty_cycle::eligible_at(&next, config.period),
            },
        );

        Ok(ReleaseReport {
            index: cycle.release_count,
            phase,
            transfers,
            released_at: next.last_release_cursor,
            notified,
        })
    }

    // ─────────────────────────────────────────────────────────
    // Role management
    // ─────────────────────────────────────────────────────────

    /// Replace the operator. Administrator only.
    pub fn set_operator(env: Env, caller: Address, new_operator: Address) -> Result<(), Error> {
        let previous = access::set_operator(&env, &caller, &new_operator)?;
        events::operator_changed(&env, previous, new_operator);
        Ok(())
    }

    /// Hand administration to `new_admin`. Administrator only; the caller
    /// loses the role immediately.
    pub fn transfer_administration(
        env: Env,
        caller: Address,
        new_admin: Address,
    ) -> Result<(), Error> {
        let previous = access::transfer_administration(&env, &caller, &new_admin)?;
        events::admin_transferred(&env, previous, new_admin);
        Ok(())
    }

    pub fn is_administrator(env: Env, who: Address) -> Result<bool, Error> {
        Ok(access::is_administrator(&storage::load_config(&env)?, &who))
    }

    pub fn is_operator(env: Env, who: Address) -> Result<bool, Error> {
        Ok(access::is_operator(&storage::load_config(&env)?, &who))
    }

    pub fn administrator(env: Env) -> Result<Address, Error> {
        Ok(storage::load_config(&env)?.admin)
    }

    pub fn operator(env: Env) -> Result<Address, Error> {
        Ok(storage::load_config(&env)?.operator)
    }

    pub fn collector(env: Env) -> Result<Address, Error> {
        Ok(storage::load_config(&env)?.collector)
    }

    // ─────────────────────────────────────────────────────────
    // Tracked assets
    // ─────────────────────────────────────────────────────────

    /// Replace the whole tracked-asset set. Administrator only.
    ///
    /// Duplicates or more than [`MAX_TRACKED_ASSETS`] entries fail with
    /// `InvalidConfiguration`. Mid-cycle changes take effect at the next
    /// release: a newly added asset is paid in full if that release is a
    /// second half.
    pub fn set_tracked_assets(env: Env, caller: Address, assets: Vec<Address>) -> Result<(), Error> {
        access::require_admin(&env, &caller)?;
        assets::validate(&assets)?;
        storage::save_assets(&env, &assets);
        events::assets_updated(&env, caller, assets);
        Ok(())
    }

    pub fn get_tracked_assets(env: Env) -> Vec<Address> {
        storage::load_assets(&env)
    }

    /// Amount of `asset` currently held by the controller.
    pub fn balance_of(env: Env, asset: Address) -> i128 {
        assets::balance_of(&env, &asset)
    }

    /// Held balance of every tracked asset, in tracked order.
    pub fn get_balances(env: Env) -> Vec<AssetBalance> {
        assets::snapshot(&env, &storage::load_assets(&env))
    }

    // ─────────────────────────────────────────────────────────
    // Safety
    // ─────────────────────────────────────────────────────────

    /// Stop releases. Phase and cursor are left untouched.
    pub fn pause(env: Env, caller: Address) -> Result<(), Error> {
        access::require_admin(&env, &caller)?;
        storage::set_paused(&env, true);
        events::paused(&env, caller);
        Ok(())
    }

    pub fn unpause(env: Env, caller: Address) -> Result<(), Error> {
        access::require_admin(&env, &caller)?;
        storage::set_paused(&env, false);
        events::unpaused(&env, caller);
        Ok(())
    }

    /// Send the full balance of an untracked `asset` to `recipient`.
    ///
    /// Tracked assets are refused so the tranche invariants hold.
    pub fn sweep(env: Env, caller: Address, asset: Address, recipient: Address) -> Result<i128, Error> {
        access::require_admin(&env, &caller)?;
        if storage::load_assets(&env).contains(&asset) {
            return Err(Error::TrackedAsset);
        }
        let amount = assets::balance_of(&env, &asset);
        if amount <= 0 {
            return Err(Error::NothingToSweep);
        }
        release::execute(
            &env,
            &recipient,
            &soroban_sdk::vec![
                &env,
                AssetTransfer {
                    asset: asset.clone(),
                    amount
                }
            ],
        );
        events::swept(
            &env,
            events::Swept {
                asset,
                recipient,
                amount,
            },
        );
        Ok(amount)
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn phase(env: Env) -> Result<Phase, Error> {
        Ok(storage::load_cycle(&env)?.phase())
    }

    pub fn is_first_half_pending(env: Env) -> Result<bool, Error> {
        Ok(storage::load_cycle(&env)?.first_half_pending)
    }

    pub fn last_release_cursor(env: Env) -> Result<u64, Error> {
        Ok(storage::load_cycle(&env)?.last_release_cursor)
    }

    pub fn release_count(env: Env) -> Result<u64, Error> {
        Ok(storage::load_cycle(&env)?.release_count)
    }

    pub fn period(env: Env) -> Result<u64, Error> {
        Ok(storage::load_config(&env)?.period)
    }

    /// Earliest ledger time at which the pending tranche is time-eligible.
    pub fn next_eligible_at(env: Env) -> Result<u64, Error> {
        let config = storage::load_config(&env)?;
        let cycle = storage::load_cycle(&env)?;
        Ok(duty_cycle::eligible_at(&cycle, config.period))
    }

    pub fn is_paused(env: Env) -> bool {
        storage::is_paused(&env)
    }
}
