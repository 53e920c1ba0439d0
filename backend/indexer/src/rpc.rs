//! Soroban RPC client — polls `getEvents` and decodes fee injector events.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the RPC returns an error or rate-limit
//!   response, up to [`MAX_BACKOFF_SECS`] seconds.
//! * Transient network errors (connection reset, timeout) are retried silently.
//! * JSON-RPC codes -32600 / -32601 are treated as hard failures.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{EventKind, InjectorEvent};

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

/// One event as returned by `getEvents` with `xdrFormat: "json"`.
///
/// Topics and value arrive as tagged ScVal JSON (`{"symbol":"released"}`,
/// `{"u64":"3"}`, `{"map":[{"key":..,"val":..}]}`). The base64 `topic` /
/// `value` fields are not requested and are ignored if present.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    #[serde(default)]
    pub topic_json: Vec<Value>,
    #[serde(default)]
    pub value_json: Value,
    pub contract_id: Option<String>,
    pub tx_hash: Option<String>,
    pub ledger: Option<u64>,
    pub ledger_closed_at: Option<String>,
    pub in_successful_contract_call: Option<bool>,
}

/// One page of events plus where to resume.
#[derive(Debug)]
pub struct EventPage {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    pub latest_ledger: Option<u64>,
}

// ─────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────

/// Fetch a page of events for `contract_id` from the RPC, retrying soft
/// failures with back-off.
///
/// * `start_ledger` — the ledger sequence to scan from (inclusive); ignored
///   when `cursor` is present.
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
    let mut backoff = INITIAL_BACKOFF_SECS;
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
                warn!("RPC request failed (will retry in {backoff}s): {e}");
                backoff = back_off(backoff).await;
                continue;
            }
        };

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("Rate-limited by RPC (will retry in {backoff}s)");
            backoff = back_off(backoff).await;
            continue;
        }

        let parsed: RpcResponse = resp.json().await?;

        if let Some(err) = parsed.error {
            if err.is_hard() {
                return Err(IndexerError::Rpc(format!(
                    "RPC hard error {}: {}",
                    err.code, err.message
                )));
            }
            warn!(
                "RPC soft error (will retry in {backoff}s): {} {}",
                err.code, err.message
            );
            backoff = back_off(backoff).await;
            continue;
        }

        let result = parsed.result.ok_or_else(|| {
            IndexerError::Rpc("Empty result from getEvents".to_string())
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

/// Sleep for `current` seconds and return the next, doubled, delay.
async fn back_off(current: u64) -> u64 {
    tokio::time::sleep(Duration::from_secs(current)).await;
    next_backoff(current)
}

fn next_backoff(current: u64) -> u64 {
    (current * 2).min(MAX_BACKOFF_SECS)
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
        },
        "xdrFormat": "json"
    });

    if let Some(cur) = cursor {
        params["pagination"]["cursor"] = json!(cur);
    } else {
        params["startLedger"] = json!(start_ledger);
    }

    params
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Fields pulled out of an event's data blob.
#[derive(Debug, Default, PartialEq)]
struct Decoded {
    actor: Option<String>,
    amount: Option<String>,
    detail: Option<Value>,
    next_eligible_at: Option<i64>,
}

/// Decode a list of raw RPC events into [`InjectorEvent`]s. Events from
/// failed contract calls are dropped.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<InjectorEvent> {
    raw.iter()
        .filter(|e| e.in_successful_contract_call.unwrap_or(true))
        .filter_map(|e| decode_single(e, contract_id))
        .collect()
}

fn decode_single(raw: &RawEvent, contract_id: &str) -> Option<InjectorEvent> {
    let kind = EventKind::from_topic(&scalar_text(&untag(raw.topic_json.first()?)));

    let ledger = raw.ledger.unwrap_or(0) as i64;
    let timestamp = raw
        .ledger_closed_at
        .as_deref()
        .and_then(parse_iso_to_unix)
        .unwrap_or(0);

    let release_index = if kind.is_indexed_by_release() {
        raw.topic_json.get(1).map(|t| scalar_text(&untag(t)))
    } else {
        None
    };

    let decoded = decode_data(&untag(&raw.value_json), &kind);

    Some(InjectorEvent {
        event_type: kind.as_str().to_string(),
        release_index,
        actor: decoded.actor,
        amount: decoded.amount,
        detail: decoded.detail.map(|v| v.to_string()),
        next_eligible_at: decoded.next_eligible_at,
        ledger,
        timestamp,
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash: raw.tx_hash.clone(),
    })
}

/// Pull apart the untagged event data.
fn decode_data(value: &Value, kind: &EventKind) -> Decoded {
    match kind {
        EventKind::Initialized => Decoded {
            actor: extract_field(value, &["admin"]),
            detail: Some(pick(value, &["operator", "collector", "assets", "period"])),
            ..Decoded::default()
        },
        EventKind::Released => Decoded {
            actor: extract_field(value, &["operator"]),
            detail: Some(pick(value, &["phase", "transfers", "released_at"])),
            next_eligible_at: extract_field(value, &["next_eligible_at"])
                .and_then(|s| s.parse().ok()),
            ..Decoded::default()
        },
        EventKind::NotifyFailed => Decoded {
            actor: extract_field(value, &["collector"]),
            ..Decoded::default()
        },
        EventKind::AssetsUpdated => Decoded {
            actor: extract_field(value, &["admin"]),
            detail: value.get("assets").cloned(),
            ..Decoded::default()
        },
        EventKind::OperatorChanged | EventKind::AdminTransferred => Decoded {
            actor: extract_field(value, &["current"]),
            detail: Some(pick(value, &["previous"])),
            ..Decoded::default()
        },
        EventKind::Paused | EventKind::Unpaused => Decoded {
            actor: value
                .as_str()
                .map(String::from)
                .or_else(|| extract_field(value, &["address"])),
            ..Decoded::default()
        },
        EventKind::Swept => Decoded {
            actor: extract_field(value, &["recipient"]),
            amount: extract_field(value, &["amount"]),
            detail: Some(pick(value, &["asset"])),
            ..Decoded::default()
        },
        EventKind::Unknown => Decoded::default(),
    }
}

fn extract_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Sub-object holding only `keys` that are present.
fn pick(value: &Value, keys: &[&str]) -> Value {
    let mut out = serde_json::Map::new();
    for key in keys {
        if let Some(v) = value.get(key) {
            out.insert((*key).to_string(), v.clone());
        }
    }
    Value::Object(out)
}

/// Strip ScVal type tags, turning contract structs (symbol-keyed maps) into
/// JSON objects and vectors into arrays. Scalars keep their RPC rendering,
/// so 64- and 128-bit integers stay strings.
fn untag(scval: &Value) -> Value {
    let tagged = scval
        .as_object()
        .filter(|o| o.len() == 1)
        .and_then(|o| o.iter().next());
    let Some((tag, inner)) = tagged else {
        return match scval {
            Value::String(s) if s == "void" => Value::Null,
            other => other.clone(),
        };
    };

    match tag.as_str() {
        "vec" => Value::Array(
            inner
                .as_array()
                .map(|items| items.iter().map(untag).collect())
                .unwrap_or_default(),
        ),
        "map" => {
            let mut out = serde_json::Map::new();
            for entry in inner.as_array().into_iter().flatten() {
                if let (Some(k), Some(v)) = (entry.get("key"), entry.get("val")) {
                    out.insert(scalar_text(&untag(k)), untag(v));
                }
            }
            Value::Object(out)
        }
        _ => inner.clone(),
    }
}

/// Render an untagged scalar (symbol, address, integer) as text.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
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
