//! Long-running background task that polls the Soroban RPC and writes
//! decoded ledger events to the database.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::Config;
use crate::db;
use crate::errors::Result;
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

/// Run the poll loop until `shutdown` is cancelled.
pub async fn run(state: Arc<IndexerState>, shutdown: CancellationToken) {
    info!("Indexer starting — contract: {}", state.config.contract_id);

    let mut position = match db::load_cursor(&state.pool).await {
        Ok((last_ledger, cursor)) if last_ledger > 0 => Position {
            ledger: last_ledger as u32,
            cursor,
        },
        Ok(_) => Position {
            ledger: state.config.start_ledger,
            cursor: None,
        },
        Err(e) => {
            error!("Could not load cursor, starting from configured ledger: {e}");
            Position {
                ledger: state.config.start_ledger,
                cursor: None,
            }
        }
    };

    info!("Resuming from ledger {}", position.ledger);

    let interval = Duration::from_secs(state.config.poll_interval_secs);
    loop {
        let polled = tokio::select! {
            _ = shutdown.cancelled() => break,
            polled = poll_once(&state, &position) => polled,
        };
        match polled {
            Ok(next) => position = next,
            Err(e) => error!("Indexer poll error: {e}"),
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }

    info!("Indexer stopped at ledger {}", position.ledger);
}

/// Perform a single poll iteration and return the position for the next one.
async fn poll_once(state: &IndexerState, position: &Position) -> Result<Position> {
    let page = rpc::fetch_events(
        &state.client,
        &state.config.rpc_url,
        &state.config.contract_id,
        position.ledger,
        position.cursor.as_deref(),
        state.config.events_per_page,
    )
    .await?;

    if !page.events.is_empty() {
        let decoded = rpc::decode_events(&page.events, &state.config.contract_id);
        let inserted = db::insert_events(&state.pool, &decoded).await?;
        info!(
            "Polled {} raw events → {} new records stored",
            page.events.len(),
            inserted
        );
    }

    let next = advance(position, page.latest_ledger, page.cursor);

    // Persist so restarts are deterministic.
    db::save_cursor(&state.pool, next.ledger as i64, next.cursor.as_deref()).await?;

    Ok(next)
}

/// The ledger never moves backwards. A returned cursor continues pagination
/// from where this page ended; without one the next poll starts from the
/// latest ledger the RPC reported.
fn advance(position: &Position, latest_ledger: Option<u64>, cursor: Option<String>) -> Position {
    let ledger = latest_ledger
        .map(|l| (l as u32).max(position.ledger))
        .unwrap_or(position.ledger);
    Position { ledger, cursor }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ledger: u32, cursor: Option<&str>) -> Position {
        Position {
            ledger,
            cursor: cursor.map(String::from),
        }
    }

    #[test]
    fn advances_to_latest_ledger() {
        let next = advance(&at(100, None), Some(150), None);
        assert_eq!(next, at(150, None));
    }

    #[test]
    fn never_moves_backwards() {
        let next = advance(&at(100, None), Some(90), None);
        assert_eq!(next.ledger, 100);

        let next = advance(&at(100, None), None, None);
        assert_eq!(next.ledger, 100);
    }

    #[test]
    fn keeps_returned_cursor() {
        let next = advance(&at(100, Some("old")), Some(120), Some("new".to_string()));
        assert_eq!(next, at(120, Some("new")));
    }
}
