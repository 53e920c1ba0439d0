//! Long-running background task that polls the Soroban RPC and writes
//! decoded injector events to the database.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use sqlx::SqlitePool;
use tracing::{error, info};

use crate::config::Config;
use crate::db;
use crate::rpc;

pub struct IndexerState {
    pub pool: SqlitePool,
    pub config: Config,
    pub client: Client,
}

/// Where the next poll starts.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Position {
    ledger: u32,
    cursor: Option<String>,
}

/// Run the indexer loop forever; spawn it as a background [`tokio`] task.
pub async fn run(state: Arc<IndexerState>) {
    info!("Indexer starting — contract: {}", state.config.contract_id);

    let (saved_ledger, saved_cursor) = db::load_cursor(&state.pool).await.unwrap_or((0, None));
    let mut position = Position {
        ledger: if saved_ledger > 0 {
            saved_ledger as u32
        } else {
            state.config.start_ledger
        },
        cursor: saved_cursor,
    };

    info!("Resuming from ledger {}", position.ledger);

    loop {
        match poll_once(&state, &position).await {
            Ok(next) => position = next,
            Err(e) => error!("Indexer poll error: {e}"),
        }

        tokio::time::sleep(Duration::from_secs(state.config.poll_interval_secs)).await;
    }
}

/// Perform a single poll iteration and persist where to resume.
async fn poll_once(state: &IndexerState, position: &Position) -> crate::errors::Result<Position> {
    let config = &state.config;
    let page = rpc::fetch_events(
        &state.client,
        &config.rpc_url,
        &config.contract_id,
        position.ledger,
        position.cursor.as_deref(),
        config.events_per_page,
    )
    .await?;

    if !page.events.is_empty() {
        let decoded = rpc::decode_events(&page.events, &config.contract_id);
        let inserted = db::insert_events(&state.pool, &decoded).await?;
        info!(
            "Polled {} raw events → {} new records stored",
            page.events.len(),
            inserted
        );
    }

    let next = advance(position, page.latest_ledger, page.cursor);
    db::save_cursor(&state.pool, next.ledger as i64, next.cursor.as_deref()).await?;
    Ok(next)
}

/// The ledger never moves backwards; the RPC cursor, when present, keeps
/// paging within the current range.
fn advance(position: &Position, latest_ledger: Option<u64>, cursor: Option<String>) -> Position {
    let ledger = latest_ledger
        .map(|l| (l as u32).max(position.ledger))
        .unwrap_or(position.ledger);
    Position { ledger, cursor }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_moves_to_latest_ledger() {
        let p = Position { ledger: 100, cursor: None };
        let next = advance(&p, Some(250), Some("c1".to_string()));
        assert_eq!(next, Position { ledger: 250, cursor: Some("c1".to_string()) });
    }

    #[test]
    fn advance_never_goes_backwards() {
        let p = Position { ledger: 300, cursor: Some("c0".to_string()) };
        assert_eq!(advance(&p, Some(200), None).ledger, 300);
        assert_eq!(advance(&p, None, None).ledger, 300);
    }
}
