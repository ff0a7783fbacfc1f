//! Soroban RPC client — polls `getEvents` and decodes blood ledger events.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the RPC returns a soft error or
//!   rate-limit response, up to [`MAX_BACKOFF_SECS`] seconds.
//! * Transient network errors (connection reset, timeout) are retried silently.
//! * JSON-RPC codes `-32600` / `-32601` are hard failures and surface as
//!   [`IndexerError::Rpc`].

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{EventKind, LedgerEvent};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcError {
    fn is_hard(&self) -> bool {
        self.code == -32600 || self.code == -32601
    }
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RawEvent {
    /// Topic list, one JSON-encoded ScVal per entry
    pub topic: Vec<String>,
    /// Event data, decoded by the RPC into JSON
    pub value: Value,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub id: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
    #[serde(rename = "inSuccessfulContractCall")]
    pub in_successful_contract_call: Option<bool>,
}

/// One page of `getEvents` output.
#[derive(Debug)]
pub struct EventPage {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    pub latest_ledger: Option<u64>,
}

// ─────────────────────────────────────────────────────────
// Back-off
// ─────────────────────────────────────────────────────────

#[derive(Debug)]
struct Backoff {
    secs: u64,
}

impl Backoff {
    fn new() -> Self {
        Self {
            secs: INITIAL_BACKOFF_SECS,
        }
    }

    /// Current delay; doubles the next one, capped at [`MAX_BACKOFF_SECS`].
    fn next_delay(&mut self) -> Duration {
        let delay = Duration::from_secs(self.secs);
        self.secs = (self.secs * 2).min(MAX_BACKOFF_SECS);
        delay
    }

    async fn wait(&mut self, reason: &str) {
        let delay = self.next_delay();
        warn!("{reason} (will retry in {}s)", delay.as_secs());
        tokio::time::sleep(delay).await;
    }
}

// ─────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────

/// Fetch a page of events from the RPC.
///
/// * `start_ledger` — the ledger sequence to scan from (inclusive); ignored
///   when `cursor` is set.
/// * `cursor`       — optional opaque pagination cursor from a previous response.
/// * `limit`        — maximum number of events to return.
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_id: &str,
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Result<EventPage> {
    let mut backoff = Backoff::new();
    let body = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "getEvents",
        "params": build_params(contract_id, start_ledger, cursor, limit),
    });

    loop {
        let resp = match client.post(rpc_url).json(&body).send().await {
            Ok(resp) => resp,
            Err(e) => {
                backoff.wait(&format!("RPC request failed: {e}")).await;
                continue;
            }
        };

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            backoff.wait("Rate-limited by RPC").await;
            continue;
        }

        let rpc: RpcResponse = resp.json().await?;

        if let Some(err) = rpc.error {
            if err.is_hard() {
                return Err(IndexerError::Rpc {
                    code: err.code,
                    message: err.message,
                });
            }
            backoff
                .wait(&format!("RPC soft error {}: {}", err.code, err.message))
                .await;
            continue;
        }

        let result = rpc.result.ok_or_else(|| {
            IndexerError::EventParse("Empty result from getEvents".to_string())
        })?;

        debug!(
            "Fetched {} events (latest_ledger={:?})",
            result.events.len(),
            result.latest_ledger
        );

        return Ok(EventPage {
            events: result.events,
            cursor: result.cursor,
            latest_ledger: result.latest_ledger,
        });
    }
}

fn build_params(contract_id: &str, start_ledger: u32, cursor: Option<&str>, limit: u32) -> Value {
    let mut params = json!({
        "filters": [
            {
                "type": "contract",
                "contractIds": [contract_id]
            }
        ],
        "pagination": {
            "limit": limit
        }
    });

    match cursor {
        Some(cur) => params["pagination"]["cursor"] = json!(cur),
        None => params["startLedger"] = json!(start_ledger),
    }

    params
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode a page of raw RPC events into [`LedgerEvent`]s.
///
/// Events from failed contract calls are dropped; the contract rolled their
/// effects back.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<LedgerEvent> {
    raw.iter()
        .filter(|e| e.in_successful_contract_call.unwrap_or(true))
        .filter_map(|e| decode_single(e, contract_id))
        .collect()
}

fn decode_single(raw: &RawEvent, contract_id: &str) -> Option<LedgerEvent> {
    let topics: Vec<Value> = raw.topic.iter().map(|t| parse_topic(t)).collect();
    let kind = EventKind::from_topic(&scalar(topics.first()?)?);

    let ledger = raw.ledger.unwrap_or(0) as i64;
    let timestamp = raw
        .ledger_closed_at
        .as_deref()
        .and_then(parse_iso_to_unix)
        .unwrap_or(0);
    let tx_hash = raw.tx_hash.clone();

    let mut event = LedgerEvent {
        event_id: raw.id.clone().unwrap_or_else(|| {
            format!(
                "{ledger}-{}-{}",
                tx_hash.as_deref().unwrap_or("notx"),
                raw.topic.join("|")
            )
        }),
        event_type: kind.as_str().to_string(),
        ledger,
        timestamp,
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash,
        ..LedgerEvent::default()
    };

    let subject = topics.get(1).and_then(scalar);
    let data = &raw.value;

    match kind {
        EventKind::DonationRecorded => {
            event.unit_id = subject;
            event.actor = field(data, &["blood_bank"]);
            event.counterparty = field(data, &["donor"]);
            event.blood_type = field(data, &["blood_type"]);
            event.quantity = field(data, &["quantity"]).and_then(|q| q.parse().ok());
        }
        EventKind::UnitUsed => {
            event.unit_id = subject;
            event.actor = field(data, &["owner"]);
        }
        EventKind::RequestCreated => {
            event.request_id = subject;
            event.actor = field(data, &["hospital"]);
            event.counterparty = field(data, &["blood_bank"]);
            event.blood_type = field(data, &["blood_type"]);
            event.quantity = field(data, &["quantity"]).and_then(|q| q.parse().ok());
        }
        EventKind::RequestApproved => {
            event.request_id = subject;
            event.actor = field(data, &["blood_bank"]);
            event.counterparty = field(data, &["hospital"]);
            event.unit_ids = find(data, "unit_ids").and_then(id_list);
        }
        EventKind::RequestRejected => {
            event.request_id = subject;
            event.actor = field(data, &["blood_bank"]);
        }
        EventKind::RoleSet => {
            // Topics: (role_set, target, role); data is the granting caller.
            event.counterparty = subject;
            event.detail = topics.get(2).and_then(scalar);
            event.actor = scalar(data);
        }
        EventKind::BadgeEarned => {
            event.actor = subject;
            event.detail = field(data, &["badge"]);
        }
        EventKind::Unknown => {}
    }

    Some(event)
}

/// Topics arrive either as JSON-encoded ScVals or as bare strings.
fn parse_topic(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Reduce an ScVal-shaped JSON value to a plain string.
///
/// Handles bare strings and numbers, `{"type":…,"value":…}` wrappers, and
/// enum variants encoded as a vector whose first element is the variant name.
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(map) => map.get("value").and_then(scalar),
        Value::Array(items) => items.first().and_then(scalar),
        Value::Null => None,
    }
}

/// First of `keys` present in the event data (searched recursively), as a string.
fn field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| find(value, key).and_then(scalar))
}

fn find<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map
            .get(key)
            .or_else(|| map.values().find_map(|v| find(v, key))),
        Value::Array(items) => items.iter().find_map(|v| find(v, key)),
        _ => None,
    }
}

/// Render a vector of ids as `"1,2,3"`.
fn id_list(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => {
            let ids: Vec<String> = items.iter().filter_map(scalar).collect();
            Some(ids.join(","))
        }
        Value::Object(map) => map.get("value").and_then(id_list),
        _ => scalar(value),
    }
}

/// Parse an ISO-8601 timestamp string into a Unix epoch (seconds).
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
