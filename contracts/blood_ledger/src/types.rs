//! # Types
//!
//! Shared data structures used across all modules of the blood ledger.
//!
//! ## Design decisions
//!
//! ### Record / Custody split
//!
//! A `BloodUnit` is internally stored as two separate ledger entries:
//!
//! - [`UnitRecord`] — the donation facts, written once at recording; never mutated.
//! - [`UnitCustody`] — current owner and usage status, written on transfer and on use.
//!
//! The public API exposes the reconstructed [`BloodUnit`] struct for convenience.
//!
//! ### Status as a Finite-State Machine
//!
//! [`UnitStatus`] and [`RequestStatus`] enforce forward-only lifecycles:
//!
//! ```text
//! Unit:     Available ──► Used
//!
//! Request:  Pending ──► Approved
//!               └─────► Rejected
//! ```
//!
//! Both expose `can_transition_to`, the single table every state change
//! is checked against.

use soroban_sdk::{contracttype, Address, Env, String, Vec};

/// The eight recognised ABO/Rh blood groups.
pub const BLOOD_TYPES: [&str; 8] = ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

/// Returns `true` if `blood_type` is one of [`BLOOD_TYPES`].
pub fn is_valid_blood_type(env: &Env, blood_type: &String) -> bool {
    BLOOD_TYPES
        .iter()
        .any(|known| *blood_type == String::from_str(env, known))
}

/// Usage status of a physical blood unit.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UnitStatus {
    /// In custody and available for transfer or use.
    Available,
    /// Consumed by its custodian. Terminal.
    Used,
}

impl UnitStatus {
    pub fn can_transition_to(self, next: UnitStatus) -> bool {
        matches!((self, next), (UnitStatus::Available, UnitStatus::Used))
    }
}

/// Lifecycle status of a hospital request.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RequestStatus {
    /// Awaiting a decision from the addressed blood bank.
    Pending,
    /// Fulfilled; the assigned units now belong to the hospital.
    Approved,
    /// Declined by the blood bank. No custody change.
    Rejected,
}

impl RequestStatus {
    pub fn can_transition_to(self, next: RequestStatus) -> bool {
        matches!(
            (self, next),
            (RequestStatus::Pending, RequestStatus::Approved)
                | (RequestStatus::Pending, RequestStatus::Rejected)
        )
    }
}

/// Immutable donation facts, written once when the unit is recorded.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnitRecord {
    pub id: u64,
    pub donor: Address,
    pub blood_type: String,
    pub quantity: u32,
    pub document_hash: String,
    pub collected_at: u64,
    pub created_at: u64,
}

/// Mutable custody state, updated on request approval and on use.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnitCustody {
    pub current_owner: Address,
    pub status: UnitStatus,
}

/// Full on-chain representation of a blood unit.
///
/// Used as the public API return type; reconstructed internally from
/// the split `UnitRecord` + `UnitCustody` storage entries.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BloodUnit {
    /// Unique identifier (auto-incremented from 1).
    pub id: u64,
    /// Address of the donor the unit was collected from.
    pub donor: Address,
    /// One of [`BLOOD_TYPES`].
    pub blood_type: String,
    /// Units of blood, typically 1.
    pub quantity: u32,
    /// Content address of the off-chain evidentiary document. Never interpreted.
    pub document_hash: String,
    /// Collection time as reported by the recording bank.
    pub collected_at: u64,
    /// Ledger timestamp at which the donation was recorded.
    pub created_at: u64,
    /// Principal currently accountable for the unit.
    pub current_owner: Address,
    /// Usage status.
    pub status: UnitStatus,
}

impl BloodUnit {
    pub fn is_used(&self) -> bool {
        self.status == UnitStatus::Used
    }
}

/// A hospital's ask for `quantity` units of `blood_type` from `blood_bank`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Request {
    pub id: u64,
    pub hospital: Address,
    pub blood_bank: Address,
    pub blood_type: String,
    pub quantity: u32,
    pub status: RequestStatus,
    /// Empty until the request is approved, then exactly `quantity` long.
    pub assigned_unit_ids: Vec<u64>,
    pub created_at: u64,
}

/// Donor recognition tiers, ordered from lowest to highest threshold.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub enum Badge {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

/// Points and badges accrued by a donor.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DonorRewardAccount {
    pub donor: Address,
    pub points: u64,
    pub donations: u32,
    pub badges: Vec<Badge>,
}

impl DonorRewardAccount {
    pub fn empty(env: &Env, donor: Address) -> Self {
        DonorRewardAccount {
            donor,
            points: 0,
            donations: 0,
            badges: Vec::new(env),
        }
    }

    pub fn has_badge(&self, badge: Badge) -> bool {
        self.badges.iter().any(|held| held == badge)
    }
}
