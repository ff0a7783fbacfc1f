//! # Blood Ledger Contract
//!
//! Custody ledger for physical blood units shared by administrators, donors,
//! blood banks and hospitals. It exposes the single Soroban contract
//! `BloodLedger` whose entry points cover the full unit lifecycle:
//!
//! | Phase        | Entry Point(s)                                        |
//! |--------------|-------------------------------------------------------|
//! | Bootstrap    | [`BloodLedger::init`]                                 |
//! | Role admin   | `grant_role`                                          |
//! | Donation     | [`BloodLedger::record_donation`]                      |
//! | Requests     | `create_request`, `approve_request`, `reject_request` |
//! | Consumption  | [`BloodLedger::mark_as_used`]                         |
//! | Queries      | `get_blood_unit`, `get_request`, `get_donor_rewards`, `get_donor_account`, `has_role`, `unit_count`, `request_count` |
//!
//! ## Architecture
//!
//! Authorization is delegated to [`rbac`], custody to [`ledger`], the
//! request state machine to [`requests`] and point accrual to [`rewards`].
//! Storage access is fully delegated to `storage`. This file contains only
//! the public entry points.
//!
//! Every fallible entry point returns `Result<_, Error>` and checks all of
//! its preconditions before its first write.

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, Address, Env, String, Vec};

pub mod events;
pub mod ledger;
pub mod rbac;
pub mod requests;
pub mod rewards;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;
#[cfg(test)]
mod test_rewards;

pub use rbac::Role;
pub use types::{
    Badge, BloodUnit, DonorRewardAccount, Request, RequestStatus, UnitStatus, BLOOD_TYPES,
};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// Missing role, or wrong principal for a state-bound operation.
    Unauthorized = 1,
    /// Unknown blood type, zero quantity, empty document hash, or a
    /// counterparty that does not hold the expected role.
    InvalidInput = 2,
    NotFound = 3,
    /// Request is no longer Pending.
    InvalidState = 4,
    QuantityMismatch = 5,
    /// A named unit is unknown, not owned by the caller, used, of the wrong
    /// blood type, or listed twice.
    UnitNotAvailable = 6,
    AlreadyUsed = 7,
    AlreadyInitialized = 8,
}

#[contract]
pub struct BloodLedger;

#[contractimpl]
impl BloodLedger {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Initialise the contract and install the first Admin.
    ///
    /// Must be called exactly once immediately after deployment.
    /// Subsequent calls fail with `Error::AlreadyInitialized`.
    pub fn init(env: Env, admin: Address) -> Result<(), Error> {
        admin.require_auth();
        rbac::init_admin(&env, &admin)
    }

    // ─────────────────────────────────────────────────────────
    // Role management
    // ─────────────────────────────────────────────────────────

    /// Grant `role` to `target`.
    ///
    /// - `caller` must hold `Admin`.
    /// - Granting an already-held role succeeds without effect.
    pub fn grant_role(env: Env, caller: Address, role: Role, target: Address) -> Result<(), Error> {
        caller.require_auth();
        rbac::grant_role(&env, &caller, role, &target)
    }

    /// Return `true` if `target` holds `role`.
    pub fn has_role(env: Env, role: Role, target: Address) -> bool {
        rbac::has_role(&env, &target, role)
    }

    // ─────────────────────────────────────────────────────────
    // Unit ledger
    // ─────────────────────────────────────────────────────────

    /// Record a donation collected by `bank`. The bank becomes the unit's
    /// first custodian and the donor is credited reward points.
    ///
    /// `bank` must hold `BloodBank`. Returns the new unit ID.
    pub fn record_donation(
        env: Env,
        bank: Address,
        donor: Address,
        blood_type: String,
        quantity: u32,
        document_hash: String,
        collected_at: u64,
    ) -> Result<u64, Error> {
        bank.require_auth();
        ledger::record_donation(
            &env,
            &bank,
            donor,
            blood_type,
            quantity,
            document_hash,
            collected_at,
        )
    }

    /// Mark a unit as consumed. Irreversible.
    ///
    /// `caller` must be the unit's current owner.
    pub fn mark_as_used(env: Env, caller: Address, unit_id: u64) -> Result<(), Error> {
        caller.require_auth();
        ledger::mark_as_used(&env, &caller, unit_id)
    }

    /// Retrieve a unit by its ID.
    pub fn get_blood_unit(env: Env, unit_id: u64) -> Result<BloodUnit, Error> {
        ledger::get_blood_unit(&env, unit_id)
    }

    /// Number of units recorded so far.
    pub fn unit_count(env: Env) -> u64 {
        storage::unit_count(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Requests
    // ─────────────────────────────────────────────────────────

    /// Ask `blood_bank` for `quantity` units of `blood_type`.
    ///
    /// `hospital` must hold `Hospital`. Returns the new request ID.
    pub fn create_request(
        env: Env,
        hospital: Address,
        blood_bank: Address,
        blood_type: String,
        quantity: u32,
    ) -> Result<u64, Error> {
        hospital.require_auth();
        requests::create_request(&env, &hospital, blood_bank, blood_type, quantity)
    }

    /// Approve a Pending request by transferring exactly `quantity` of the
    /// caller's available units to the requesting hospital.
    ///
    /// Either every unit moves and the request becomes Approved, or nothing
    /// changes.
    pub fn approve_request(
        env: Env,
        caller: Address,
        request_id: u64,
        unit_ids: Vec<u64>,
    ) -> Result<(), Error> {
        caller.require_auth();
        requests::approve_request(&env, &caller, request_id, unit_ids)
    }

    /// Reject a Pending request addressed to the caller.
    pub fn reject_request(env: Env, caller: Address, request_id: u64) -> Result<(), Error> {
        caller.require_auth();
        requests::reject_request(&env, &caller, request_id)
    }

    /// Retrieve a request by its ID.
    pub fn get_request(env: Env, request_id: u64) -> Result<Request, Error> {
        requests::get_request(&env, request_id)
    }

    /// Number of requests opened so far.
    pub fn request_count(env: Env) -> u64 {
        storage::request_count(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Rewards
    // ─────────────────────────────────────────────────────────

    /// Points accrued by `donor`; zero if they never donated.
    pub fn get_donor_rewards(env: Env, donor: Address) -> u64 {
        rewards::donor_account(&env, &donor).points
    }

    /// Full reward account (points, donation count, badges) for `donor`.
    pub fn get_donor_account(env: Env, donor: Address) -> DonorRewardAccount {
        rewards::donor_account(&env, &donor)
    }
}
