//! # Events
//!
//! Notifications consumed by the off-chain indexer. None of them are read
//! back by the contract.
//!
//! | Topic                          | Data                 |
//! |--------------------------------|----------------------|
//! | `("donation", unit_id)`        | [`DonationRecorded`] |
//! | `("used", unit_id)`            | [`UnitUsed`]         |
//! | `("req_new", request_id)`      | [`RequestCreated`]   |
//! | `("approved", request_id)`     | [`RequestApproved`]  |
//! | `("rejected", request_id)`     | [`RequestRejected`]  |
//! | `("role_set", target, role)`   | caller `Address`     |
//! | `("badge", donor)`             | [`BadgeEarned`]      |

use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Vec};

use crate::rbac::Role;
use crate::types::Badge;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DonationRecorded {
    pub unit_id: u64,
    pub donor: Address,
    pub blood_bank: Address,
    pub blood_type: String,
    pub quantity: u32,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnitUsed {
    pub unit_id: u64,
    pub owner: Address,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RequestCreated {
    pub request_id: u64,
    pub hospital: Address,
    pub blood_bank: Address,
    pub blood_type: String,
    pub quantity: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RequestApproved {
    pub request_id: u64,
    pub hospital: Address,
    pub blood_bank: Address,
    pub unit_ids: Vec<u64>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RequestRejected {
    pub request_id: u64,
    pub blood_bank: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BadgeEarned {
    pub donor: Address,
    pub badge: Badge,
    pub points: u64,
}

pub fn emit_donation_recorded(env: &Env, data: DonationRecorded) {
    env.events()
        .publish((symbol_short!("donation"), data.unit_id), data);
}

pub fn emit_unit_used(env: &Env, unit_id: u64, owner: Address) {
    let data = UnitUsed {
        unit_id,
        owner,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish((symbol_short!("used"), unit_id), data);
}

pub fn emit_request_created(env: &Env, data: RequestCreated) {
    env.events()
        .publish((symbol_short!("req_new"), data.request_id), data);
}

pub fn emit_request_approved(env: &Env, data: RequestApproved) {
    env.events()
        .publish((symbol_short!("approved"), data.request_id), data);
}

pub fn emit_request_rejected(env: &Env, request_id: u64, blood_bank: Address) {
    let data = RequestRejected {
        request_id,
        blood_bank,
    };
    env.events()
        .publish((symbol_short!("rejected"), request_id), data);
}

pub fn emit_role_set(env: &Env, target: Address, role: Role, caller: Address) {
    env.events()
        .publish((symbol_short!("role_set"), target, role), caller);
}

pub fn emit_badge_earned(env: &Env, donor: Address, badge: Badge, points: u64) {
    let data = BadgeEarned {
        donor: donor.clone(),
        badge,
        points,
    };
    env.events().publish((symbol_short!("badge"), donor), data);
}
