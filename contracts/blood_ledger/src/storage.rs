//! # Storage
//!
//! Provides typed helpers over Soroban's two storage tiers used by the ledger:
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key              | Type      | Description                        |
//! |------------------|-----------|------------------------------------|
//! | `UnitCount`      | `u64`     | Highest unit ID allocated so far   |
//! | `RequestCount`   | `u64`     | Highest request ID allocated so far|
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                | Type                 | Description                    |
//! |--------------------|----------------------|--------------------------------|
//! | `UnitRec(id)`      | `UnitRecord`         | Immutable donation facts       |
//! | `UnitCust(id)`     | `UnitCustody`        | Current owner and status       |
//! | `Request(id)`      | `Request`            | Hospital request               |
//! | `Rewards(addr)`    | `DonorRewardAccount` | Donor points and badges        |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.
//!
//! Role assignments live under their own key type in [`crate::rbac`].

use soroban_sdk::{contracttype, Address, Env};

use crate::types::{BloodUnit, DonorRewardAccount, Request, UnitCustody, UnitRecord};

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
pub(crate) const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub(crate) const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

/// All ledger storage keys except role assignments.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Unit ID counter (Instance).
    UnitCount,
    /// Request ID counter (Instance).
    RequestCount,
    /// Immutable unit record keyed by ID (Persistent).
    UnitRec(u64),
    /// Mutable unit custody keyed by ID (Persistent).
    UnitCust(u64),
    /// Request keyed by ID (Persistent).
    Request(u64),
    /// Reward account keyed by donor (Persistent).
    Rewards(Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

/// Extend instance storage TTL if it falls below the threshold.
pub(crate) fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn next_id(env: &Env, key: &DataKey) -> u64 {
    bump_instance(env);
    let current: u64 = env.storage().instance().get(key).unwrap_or(0);
    let next = current + 1;
    env.storage().instance().set(key, &next);
    next
}

/// Reads, increments, and stores the unit counter.
/// Returns the ID for the new unit; the first unit gets ID 1.
pub fn next_unit_id(env: &Env) -> u64 {
    next_id(env, &DataKey::UnitCount)
}

/// Reads, increments, and stores the request counter.
/// Returns the ID for the new request; the first request gets ID 1.
pub fn next_request_id(env: &Env) -> u64 {
    next_id(env, &DataKey::RequestCount)
}

/// Number of units recorded so far (equal to the highest unit ID).
pub fn unit_count(env: &Env) -> u64 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::UnitCount)
        .unwrap_or(0)
}

/// Number of requests opened so far (equal to the highest request ID).
pub fn request_count(env: &Env) -> u64 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::RequestCount)
        .unwrap_or(0)
}

// ── Persistent Storage Helpers ───────────────────────────────────────

/// Extend the TTL for a persistent storage key.
fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Save both the immutable record and initial custody for a new unit.
pub fn save_unit(env: &Env, unit: &BloodUnit) {
    let record_key = DataKey::UnitRec(unit.id);

    let record = UnitRecord {
        id: unit.id,
        donor: unit.donor.clone(),
        blood_type: unit.blood_type.clone(),
        quantity: unit.quantity,
        document_hash: unit.document_hash.clone(),
        collected_at: unit.collected_at,
        created_at: unit.created_at,
    };

    let custody = UnitCustody {
        current_owner: unit.current_owner.clone(),
        status: unit.status,
    };

    env.storage().persistent().set(&record_key, &record);
    bump_persistent(env, &record_key);
    save_unit_custody(env, unit.id, &custody);
}

/// Load the full `BloodUnit` by combining record and custody.
/// Returns `None` if the ID was never allocated.
pub fn load_unit(env: &Env, id: u64) -> Option<BloodUnit> {
    let record = load_unit_record(env, id)?;
    let custody = load_unit_custody(env, id)?;
    Some(BloodUnit {
        id: record.id,
        donor: record.donor,
        blood_type: record.blood_type,
        quantity: record.quantity,
        document_hash: record.document_hash,
        collected_at: record.collected_at,
        created_at: record.created_at,
        current_owner: custody.current_owner,
        status: custody.status,
    })
}

/// Load only the immutable unit record.
pub fn load_unit_record(env: &Env, id: u64) -> Option<UnitRecord> {
    let key = DataKey::UnitRec(id);
    let record: Option<UnitRecord> = env.storage().persistent().get(&key);
    if record.is_some() {
        bump_persistent(env, &key);
    }
    record
}

/// Load only the mutable custody state.
pub fn load_unit_custody(env: &Env, id: u64) -> Option<UnitCustody> {
    let key = DataKey::UnitCust(id);
    let custody: Option<UnitCustody> = env.storage().persistent().get(&key);
    if custody.is_some() {
        bump_persistent(env, &key);
    }
    custody
}

/// Save only the custody entry (transfers and use).
pub fn save_unit_custody(env: &Env, id: u64, custody: &UnitCustody) {
    let key = DataKey::UnitCust(id);
    env.storage().persistent().set(&key, custody);
    bump_persistent(env, &key);
}

pub fn load_request(env: &Env, id: u64) -> Option<Request> {
    let key = DataKey::Request(id);
    let request: Option<Request> = env.storage().persistent().get(&key);
    if request.is_some() {
        bump_persistent(env, &key);
    }
    request
}

pub fn save_request(env: &Env, request: &Request) {
    let key = DataKey::Request(request.id);
    env.storage().persistent().set(&key, request);
    bump_persistent(env, &key);
}

/// Load a donor's reward account, or `None` if the donor was never credited.
pub fn load_rewards(env: &Env, donor: &Address) -> Option<DonorRewardAccount> {
    let key = DataKey::Rewards(donor.clone());
    let account: Option<DonorRewardAccount> = env.storage().persistent().get(&key);
    if account.is_some() {
        bump_persistent(env, &key);
    }
    account
}

pub fn save_rewards(env: &Env, account: &DonorRewardAccount) {
    let key = DataKey::Rewards(account.donor.clone());
    env.storage().persistent().set(&key, account);
    bump_persistent(env, &key);
}
