//! Database layer — migrations, queries, and cursor management.

use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::info;

use crate::errors::Result;
use crate::events::{EventKind, EventRecord, InjectorEvent};

const SELECT_COLUMNS: &str = "SELECT id, event_type, release_index, actor, amount, detail, \
     next_eligible_at, ledger, timestamp, contract_id, tx_hash, created_at FROM events";

/// Establish a SQLite connection pool and run pending migrations.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool> {
    connect(database_url, 5).await
}

async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(&url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied successfully");
    Ok(pool)
}

// ─────────────────────────────────────────────────────────
// Cursor helpers
// ─────────────────────────────────────────────────────────

/// Last-seen ledger and pagination cursor. `(0, None)` before the first poll.
pub async fn load_cursor(pool: &SqlitePool) -> Result<(i64, Option<String>)> {
    let row: Option<(i64, Option<String>)> =
        sqlx::query_as("SELECT last_ledger, last_cursor FROM indexer_cursor WHERE id = 1")
            .fetch_optional(pool)
            .await?;
    Ok(row.unwrap_or((0, None)))
}

/// Persist the last-seen ledger (and optionally a pagination cursor string).
pub async fn save_cursor(
    pool: &SqlitePool,
    last_ledger: i64,
    last_cursor: Option<&str>,
) -> Result<()> {
    sqlx::query("UPDATE indexer_cursor SET last_ledger = ?1, last_cursor = ?2 WHERE id = 1")
        .bind(last_ledger)
        .bind(last_cursor)
        .execute(pool)
        .await?;
    Ok(())
}

// ─────────────────────────────────────────────────────────
// Event writes
// ─────────────────────────────────────────────────────────

/// Persist a batch of decoded events in one transaction. Re-delivered
/// events hit the dedupe index and are ignored. Returns rows inserted.
pub async fn insert_events(pool: &SqlitePool, events: &[InjectorEvent]) -> Result<usize> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;
    for ev in events {
        let rows_affected = sqlx::query(
            r#"
            INSERT OR IGNORE INTO events
                (event_type, release_index, actor, amount, detail, next_eligible_at,
                 ledger, timestamp, contract_id, tx_hash)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&ev.event_type)
        .bind(&ev.release_index)
        .bind(&ev.actor)
        .bind(&ev.amount)
        .bind(&ev.detail)
        .bind(ev.next_eligible_at)
        .bind(ev.ledger)
        .bind(ev.timestamp)
        .bind(&ev.contract_id)
        .bind(&ev.tx_hash)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        count += rows_affected as usize;
    }
    tx.commit().await?;
    Ok(count)
}

// ─────────────────────────────────────────────────────────
// Event reads
// ─────────────────────────────────────────────────────────

/// Fetch all events, ordered by ledger ascending.
pub async fn get_all_events(pool: &SqlitePool) -> Result<Vec<EventRecord>> {
    let sql = format!("{SELECT_COLUMNS} ORDER BY ledger ASC, id ASC");
    Ok(sqlx::query_as::<_, EventRecord>(&sql).fetch_all(pool).await?)
}

/// Fetch `released` events only, oldest first.
pub async fn get_release_events(pool: &SqlitePool) -> Result<Vec<EventRecord>> {
    let sql = format!("{SELECT_COLUMNS} WHERE event_type = ?1 ORDER BY ledger ASC, id ASC");
    Ok(sqlx::query_as::<_, EventRecord>(&sql)
        .bind(EventKind::Released.as_str())
        .fetch_all(pool)
        .await?)
}

/// Fetch every event tagged with one release index (the release itself and
/// any notify failure).
pub async fn get_events_for_release(
    pool: &SqlitePool,
    release_index: &str,
) -> Result<Vec<EventRecord>> {
    let sql = format!("{SELECT_COLUMNS} WHERE release_index = ?1 ORDER BY ledger ASC, id ASC");
    Ok(sqlx::query_as::<_, EventRecord>(&sql)
        .bind(release_index)
        .fetch_all(pool)
        .await?)
}

/// Most recent `released` event, if any.
pub async fn get_latest_release(pool: &SqlitePool) -> Result<Option<EventRecord>> {
    let sql = format!(
        "{SELECT_COLUMNS} WHERE event_type = ?1 \
         ORDER BY CAST(release_index AS INTEGER) DESC, ledger DESC LIMIT 1"
    );
    Ok(sqlx::query_as::<_, EventRecord>(&sql)
        .bind(EventKind::Released.as_str())
        .fetch_optional(pool)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_pool() -> SqlitePool {
        // One connection: every in-memory connection is its own database.
        connect("sqlite::memory:", 1).await.unwrap()
    }

    fn release(index: u64, ledger: i64, tx: &str) -> InjectorEvent {
        InjectorEvent {
            event_type: EventKind::Released.as_str().to_string(),
            release_index: Some(index.to_string()),
            actor: Some("GKEEPER".to_string()),
            amount: None,
            detail: None,
            next_eligible_at: Some(1_000 + ledger),
            ledger,
            timestamp: ledger * 5,
            contract_id: "C1".to_string(),
            tx_hash: Some(tx.to_string()),
        }
    }

    #[tokio::test]
    async fn cursor_starts_at_zero_and_persists() {
        let pool = memory_pool().await;
        assert_eq!(load_cursor(&pool).await.unwrap(), (0, None));
        save_cursor(&pool, 42, Some("page-2")).await.unwrap();
        assert_eq!(
            load_cursor(&pool).await.unwrap(),
            (42, Some("page-2".to_string()))
        );
    }

    #[tokio::test]
    async fn duplicate_events_are_ignored() {
        let pool = memory_pool().await;
        let batch = vec![release(0, 10, "TX0"), release(1, 20, "TX1")];
        assert_eq!(insert_events(&pool, &batch).await.unwrap(), 2);
        assert_eq!(insert_events(&pool, &batch).await.unwrap(), 0);

        let mut untagged = release(0, 30, "TX2");
        untagged.event_type = EventKind::Paused.as_str().to_string();
        untagged.release_index = None;
        untagged.tx_hash = None;
        assert_eq!(insert_events(&pool, &[untagged.clone()]).await.unwrap(), 1);
        assert_eq!(insert_events(&pool, &[untagged]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn release_queries() {
        let pool = memory_pool().await;
        let mut failed = release(1, 20, "TX1");
        failed.event_type = EventKind::NotifyFailed.as_str().to_string();
        let batch = vec![release(0, 10, "TX0"), release(1, 20, "TX1"), failed];
        insert_events(&pool, &batch).await.unwrap();

        assert_eq!(get_all_events(&pool).await.unwrap().len(), 3);
        assert_eq!(get_release_events(&pool).await.unwrap().len(), 2);
        assert_eq!(get_events_for_release(&pool, "1").await.unwrap().len(), 2);

        let latest = get_latest_release(&pool).await.unwrap().unwrap();
        assert_eq!(latest.release_index.as_deref(), Some("1"));
        assert_eq!(latest.next_eligible_at, Some(1_020));
    }
}
