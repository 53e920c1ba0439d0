//! Best-effort checkpoint call into the collector after a release.
//!
//! The call goes through the generated `try_` client, so a collector that
//! is paused, missing the entry point, or erroring cannot unwind the
//! release that has already been applied.

use soroban_sdk::{contractclient, log, Address, Env, Vec};

/// Entry point the downstream collector exposes for re-reading balances.
#[allow(dead_code)]
#[contractclient(name = "CollectorClient")]
pub trait Collector {
    fn checkpoint_tokens(env: Env, tokens: Vec<Address>);
}

/// Returns `true` when the collector accepted the checkpoint.
pub fn notify(env: &Env, collector: &Address, assets: &Vec<Address>) -> bool {
    match CollectorClient::new(env, collector).try_checkpoint_tokens(assets) {
        Ok(Ok(())) => true,
        Ok(Err(_)) | Err(_) => {
            log!(env, "collector checkpoint failed", collector.clone());
            false
        }
    }
}
