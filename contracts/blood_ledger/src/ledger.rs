//! # Blood unit ledger
//!
//! Mints a unit for every recorded donation and owns the authoritative
//! custody fields. Ownership changes only through [`crate::requests`];
//! the only other custody write is the one-way `Available → Used`
//! transition in [`mark_as_used`].

use soroban_sdk::{Address, Env, String};

use crate::events::{self, DonationRecorded};
use crate::rbac::{require_role, Role};
use crate::rewards::{self, POINTS_PER_DONATION};
use crate::storage::{load_unit, load_unit_custody, next_unit_id, save_unit, save_unit_custody};
use crate::types::{is_valid_blood_type, BloodUnit, UnitStatus};
use crate::Error;

/// Record a donation collected by `bank` from `donor` and credit the donor.
///
/// Returns the new unit ID.
pub fn record_donation(
    env: &Env,
    bank: &Address,
    donor: Address,
    blood_type: String,
    quantity: u32,
    document_hash: String,
    collected_at: u64,
) -> Result<u64, Error> {
    require_role(env, bank, Role::BloodBank)?;

    if quantity == 0 || document_hash.len() == 0 || !is_valid_blood_type(env, &blood_type) {
        return Err(Error::InvalidInput);
    }

    let id = next_unit_id(env);
    let created_at = env.ledger().timestamp();

    let unit = BloodUnit {
        id,
        donor: donor.clone(),
        blood_type: blood_type.clone(),
        quantity,
        document_hash,
        collected_at,
        created_at,
        current_owner: bank.clone(),
        status: UnitStatus::Available,
    };
    save_unit(env, &unit);

    rewards::credit_donation(env, &donor, POINTS_PER_DONATION);

    events::emit_donation_recorded(
        env,
        DonationRecorded {
            unit_id: id,
            donor,
            blood_bank: bank.clone(),
            blood_type,
            quantity,
            timestamp: created_at,
        },
    );

    Ok(id)
}

/// Mark a unit as consumed. Only its current custodian may do so, and only once.
pub fn mark_as_used(env: &Env, caller: &Address, unit_id: u64) -> Result<(), Error> {
    let mut custody = load_unit_custody(env, unit_id).ok_or(Error::NotFound)?;

    if custody.current_owner != *caller {
        return Err(Error::Unauthorized);
    }
    if !custody.status.can_transition_to(UnitStatus::Used) {
        return Err(Error::AlreadyUsed);
    }

    custody.status = UnitStatus::Used;
    save_unit_custody(env, unit_id, &custody);

    events::emit_unit_used(env, unit_id, caller.clone());
    Ok(())
}

pub fn get_blood_unit(env: &Env, unit_id: u64) -> Result<BloodUnit, Error> {
    load_unit(env, unit_id).ok_or(Error::NotFound)
}
