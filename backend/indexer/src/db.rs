//! Database layer — migrations, queries, and cursor management.

use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::info;

use crate::errors::Result;
use crate::events::{EventRecord, LedgerEvent};

const EVENT_COLUMNS: &str = "id, event_id, event_type, unit_id, request_id, actor, counterparty, \
     blood_type, quantity, unit_ids, detail, ledger, timestamp, contract_id, tx_hash, created_at";

/// Establish a SQLite connection pool and run pending migrations.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool> {
    let (url, max_connections) = connection_settings(database_url);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(&url)
        .await?;

    migrate(&pool).await?;
    Ok(pool)
}

/// Normalise `database_url` and pick the pool size for it. An in-memory
/// database lives only as long as its connection, so it gets exactly one.
fn connection_settings(database_url: &str) -> (String, u32) {
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };

    if url.contains(":memory:") {
        return (url, 1);
    }
    // Create the file if it doesn't exist yet.
    if url.contains('?') {
        (url, 5)
    } else {
        (format!("{url}?mode=rwc"), 5)
    }
}

pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied successfully");
    Ok(())
}

// ─────────────────────────────────────────────────────────
// Cursor helpers
// ─────────────────────────────────────────────────────────

/// Read the persisted cursor: the last-seen ledger (`0` when nothing was
/// indexed yet) and the optional mid-ledger pagination cursor.
pub async fn load_cursor(pool: &SqlitePool) -> Result<(i64, Option<String>)> {
    let row: Option<(i64, Option<String>)> =
        sqlx::query_as("SELECT last_ledger, last_cursor FROM indexer_cursor WHERE id = 1")
            .fetch_optional(pool)
            .await?;
    Ok(row.unwrap_or((0, None)))
}

/// Persist the last-seen ledger and pagination cursor.
pub async fn save_cursor(
    pool: &SqlitePool,
    last_ledger: i64,
    last_cursor: Option<&str>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO indexer_cursor (id, last_ledger, last_cursor) VALUES (1, ?1, ?2)
        ON CONFLICT (id) DO UPDATE SET last_ledger = ?1, last_cursor = ?2
        "#,
    )
    .bind(last_ledger)
    .bind(last_cursor)
    .execute(pool)
    .await?;
    Ok(())
}

// ─────────────────────────────────────────────────────────
// Event writes
// ─────────────────────────────────────────────────────────

/// Persist a batch of decoded events in one transaction. Events whose
/// `event_id` is already stored are ignored, so re-polling a page is harmless.
///
/// Returns the number of newly stored rows.
pub async fn insert_events(pool: &SqlitePool, events: &[LedgerEvent]) -> Result<usize> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;
    for ev in events {
        let rows_affected = sqlx::query(
            r#"
            INSERT OR IGNORE INTO events
                (event_id, event_type, unit_id, request_id, actor, counterparty,
                 blood_type, quantity, unit_ids, detail, ledger, timestamp, contract_id, tx_hash)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
        )
        .bind(&ev.event_id)
        .bind(&ev.event_type)
        .bind(&ev.unit_id)
        .bind(&ev.request_id)
        .bind(&ev.actor)
        .bind(&ev.counterparty)
        .bind(&ev.blood_type)
        .bind(ev.quantity)
        .bind(&ev.unit_ids)
        .bind(&ev.detail)
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

/// Custody history of a unit: its donation and use events plus every
/// approval that moved it.
pub async fn get_events_for_unit(pool: &SqlitePool, unit_id: &str) -> Result<Vec<EventRecord>> {
    let sql = format!(
        r#"
        SELECT {EVENT_COLUMNS}
        FROM   events
        WHERE  unit_id = ?1
           OR  (',' || unit_ids || ',') LIKE ('%,' || ?1 || ',%')
        ORDER  BY ledger ASC, id ASC
        "#
    );
    let rows = sqlx::query_as::<_, EventRecord>(&sql)
        .bind(unit_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Lifecycle of a single request, ordered by ledger ascending.
pub async fn get_events_for_request(
    pool: &SqlitePool,
    request_id: &str,
) -> Result<Vec<EventRecord>> {
    let sql = format!(
        r#"
        SELECT {EVENT_COLUMNS}
        FROM   events
        WHERE  request_id = ?1
        ORDER  BY ledger ASC, id ASC
        "#
    );
    let rows = sqlx::query_as::<_, EventRecord>(&sql)
        .bind(request_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Every event in which `address` acted or was the counterparty.
pub async fn get_events_for_address(
    pool: &SqlitePool,
    address: &str,
) -> Result<Vec<EventRecord>> {
    let sql = format!(
        r#"
        SELECT {EVENT_COLUMNS}
        FROM   events
        WHERE  actor = ?1 OR counterparty = ?1
        ORDER  BY ledger ASC, id ASC
        "#
    );
    let rows = sqlx::query_as::<_, EventRecord>(&sql)
        .bind(address)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Fetch all events, ordered by ledger ascending.
pub async fn get_all_events(pool: &SqlitePool) -> Result<Vec<EventRecord>> {
    let sql = format!(
        r#"
        SELECT {EVENT_COLUMNS}
        FROM   events
        ORDER  BY ledger ASC, id ASC
        "#
    );
    let rows = sqlx::query_as::<_, EventRecord>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}
