//! # Request workflow
//!
//! A hospital asks a specific blood bank for `quantity` units of one blood
//! type. The bank either approves by naming exactly that many of its own
//! available units, or rejects. Both outcomes are terminal.
//!
//! Approval is validate-then-commit: every named unit is checked before the
//! first custody entry is written, so a failing call leaves no trace.

use soroban_sdk::{Address, Env, String, Vec};

use crate::events::{self, RequestApproved, RequestCreated};
use crate::rbac::{has_role, require_role, Role};
use crate::storage::{
    load_request, load_unit_custody, load_unit_record, next_request_id, save_request,
    save_unit_custody,
};
use crate::types::{is_valid_blood_type, Request, RequestStatus, UnitCustody, UnitStatus};
use crate::Error;

/// Open a Pending request from `hospital` to `blood_bank`. Returns the request ID.
pub fn create_request(
    env: &Env,
    hospital: &Address,
    blood_bank: Address,
    blood_type: String,
    quantity: u32,
) -> Result<u64, Error> {
    require_role(env, hospital, Role::Hospital)?;

    if quantity == 0
        || !is_valid_blood_type(env, &blood_type)
        || !has_role(env, &blood_bank, Role::BloodBank)
    {
        return Err(Error::InvalidInput);
    }

    let id = next_request_id(env);
    let request = Request {
        id,
        hospital: hospital.clone(),
        blood_bank: blood_bank.clone(),
        blood_type: blood_type.clone(),
        quantity,
        status: RequestStatus::Pending,
        assigned_unit_ids: Vec::new(env),
        created_at: env.ledger().timestamp(),
    };
    save_request(env, &request);

    events::emit_request_created(
        env,
        RequestCreated {
            request_id: id,
            hospital: hospital.clone(),
            blood_bank,
            blood_type,
            quantity,
        },
    );

    Ok(id)
}

/// Fulfil a Pending request by handing `unit_ids` over to the hospital.
pub fn approve_request(
    env: &Env,
    caller: &Address,
    request_id: u64,
    unit_ids: Vec<u64>,
) -> Result<(), Error> {
    let mut request = load_addressed_request(env, caller, request_id)?;

    if !request.status.can_transition_to(RequestStatus::Approved) {
        return Err(Error::InvalidState);
    }
    if unit_ids.len() != request.quantity {
        return Err(Error::QuantityMismatch);
    }

    // Validate every unit before writing anything.
    for (i, unit_id) in unit_ids.iter().enumerate() {
        if unit_ids.iter().skip(i + 1).any(|other| other == unit_id) {
            return Err(Error::UnitNotAvailable);
        }

        let record = load_unit_record(env, unit_id).ok_or(Error::UnitNotAvailable)?;
        let custody = load_unit_custody(env, unit_id).ok_or(Error::UnitNotAvailable)?;

        if custody.current_owner != *caller
            || custody.status != UnitStatus::Available
            || record.blood_type != request.blood_type
        {
            return Err(Error::UnitNotAvailable);
        }
    }

    // Commit.
    for unit_id in unit_ids.iter() {
        save_unit_custody(
            env,
            unit_id,
            &UnitCustody {
                current_owner: request.hospital.clone(),
                status: UnitStatus::Available,
            },
        );
    }

    request.assigned_unit_ids = unit_ids.clone();
    request.status = RequestStatus::Approved;
    save_request(env, &request);

    events::emit_request_approved(
        env,
        RequestApproved {
            request_id,
            hospital: request.hospital,
            blood_bank: request.blood_bank,
            unit_ids,
        },
    );

    Ok(())
}

/// Decline a Pending request. Custody is untouched.
pub fn reject_request(env: &Env, caller: &Address, request_id: u64) -> Result<(), Error> {
    let mut request = load_addressed_request(env, caller, request_id)?;

    if !request.status.can_transition_to(RequestStatus::Rejected) {
        return Err(Error::InvalidState);
    }

    request.status = RequestStatus::Rejected;
    save_request(env, &request);

    events::emit_request_rejected(env, request_id, caller.clone());
    Ok(())
}

pub fn get_request(env: &Env, request_id: u64) -> Result<Request, Error> {
    load_request(env, request_id).ok_or(Error::NotFound)
}

/// Load a request that `caller` is entitled to decide on: the caller must be
/// a blood bank and must be the bank the request was addressed to.
fn load_addressed_request(env: &Env, caller: &Address, request_id: u64) -> Result<Request, Error> {
    require_role(env, caller, Role::BloodBank)?;

    let request = load_request(env, request_id).ok_or(Error::NotFound)?;
    if request.blood_bank != *caller {
        return Err(Error::Unauthorized);
    }
    Ok(request)
}
