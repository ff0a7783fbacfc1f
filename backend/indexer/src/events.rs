//! Canonical event types emitted by the blood ledger contract.
//!
//! These mirror the Soroban contract events defined in
//! `contracts/blood_ledger/src/events.rs`.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the blood ledger contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A bank recorded a donation and minted a unit (`donation` topic).
    DonationRecorded,
    /// A custodian consumed a unit (`used` topic).
    UnitUsed,
    /// A hospital opened a request (`req_new` topic).
    RequestCreated,
    /// A bank fulfilled a request and transferred units (`approved` topic).
    RequestApproved,
    /// A bank declined a request (`rejected` topic).
    RequestRejected,
    /// A role was granted (`role_set` topic).
    RoleSet,
    /// A donor reached a new badge tier (`badge` topic).
    BadgeEarned,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "donation" => Self::DonationRecorded,
            "used" => Self::UnitUsed,
            "req_new" => Self::RequestCreated,
            "approved" => Self::RequestApproved,
            "rejected" => Self::RequestRejected,
            "role_set" => Self::RoleSet,
            "badge" => Self::BadgeEarned,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DonationRecorded => "donation_recorded",
            Self::UnitUsed => "unit_used",
            Self::RequestCreated => "request_created",
            Self::RequestApproved => "request_approved",
            Self::RequestRejected => "request_rejected",
            Self::RoleSet => "role_set",
            Self::BadgeEarned => "badge_earned",
            Self::Unknown => "unknown",
        }
    }
}

/// A fully decoded ledger event, ready to be stored in the database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// RPC event id; unique per emitted event.
    pub event_id: String,
    pub event_type: String,
    pub unit_id: Option<String>,
    pub request_id: Option<String>,
    /// Principal that performed the action.
    pub actor: Option<String>,
    /// The other principal involved (donor, hospital, bank, role target).
    pub counterparty: Option<String>,
    pub blood_type: Option<String>,
    pub quantity: Option<i64>,
    /// Comma-separated unit ids moved by an approval.
    pub unit_ids: Option<String>,
    /// Role name for `role_set`, badge name for `badge_earned`.
    pub detail: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// An event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_id: String,
    pub event_type: String,
    pub unit_id: Option<String>,
    pub request_id: Option<String>,
    pub actor: Option<String>,
    pub counterparty: Option<String>,
    pub blood_type: Option<String>,
    pub quantity: Option<i64>,
    pub unit_ids: Option<String>,
    pub detail: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}
