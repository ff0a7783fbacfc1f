//! # Role-Based Access Control
//!
//! Every principal may hold any subset of the four ledger roles. Each
//! `(Address, Role)` pair is an independent persistent entry, so a blood bank
//! that is also a donor simply holds two entries.
//!
//! Grants are append-only: there is no revocation entry point. The first
//! `Admin` is installed by [`init_admin`]; afterwards only an `Admin` may
//! grant roles.
//!
//! Every mutating entry point calls [`require_role`] before touching state.

use soroban_sdk::{contracttype, Address, Env};

use crate::events;
use crate::storage::{bump_instance, PERSISTENT_BUMP_AMOUNT, PERSISTENT_LIFETIME_THRESHOLD};
use crate::Error;

/// The four actor roles of the ledger.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    Admin,
    Donor,
    BloodBank,
    Hospital,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
enum RbacKey {
    /// Set once by `init_admin` (Instance).
    Initialized,
    /// Role membership flag (Persistent).
    Member(Address, Role),
}

/// Install `admin` as the first Admin. Fails if the contract was already
/// initialised.
pub fn init_admin(env: &Env, admin: &Address) -> Result<(), Error> {
    let storage = env.storage().instance();
    if storage.has(&RbacKey::Initialized) {
        return Err(Error::AlreadyInitialized);
    }
    storage.set(&RbacKey::Initialized, &true);
    bump_instance(env);

    set_member(env, admin, Role::Admin);
    events::emit_role_set(env, admin.clone(), Role::Admin, admin.clone());
    Ok(())
}

/// Grant `role` to `target`. `caller` must hold `Admin`.
///
/// Granting a role the target already holds is a no-op.
pub fn grant_role(env: &Env, caller: &Address, role: Role, target: &Address) -> Result<(), Error> {
    require_role(env, caller, Role::Admin)?;

    if has_role(env, target, role) {
        return Ok(());
    }

    set_member(env, target, role);
    events::emit_role_set(env, target.clone(), role, caller.clone());
    Ok(())
}

/// Return `true` if `address` holds `role`.
pub fn has_role(env: &Env, address: &Address, role: Role) -> bool {
    let key = RbacKey::Member(address.clone(), role);
    let held = env.storage().persistent().get(&key).unwrap_or(false);
    if held {
        env.storage().persistent().extend_ttl(
            &key,
            PERSISTENT_LIFETIME_THRESHOLD,
            PERSISTENT_BUMP_AMOUNT,
        );
    }
    held
}

/// Fail with `Unauthorized` unless `address` holds `role`.
pub fn require_role(env: &Env, address: &Address, role: Role) -> Result<(), Error> {
    if has_role(env, address, role) {
        Ok(())
    } else {
        Err(Error::Unauthorized)
    }
}

fn set_member(env: &Env, address: &Address, role: Role) {
    let key = RbacKey::Member(address.clone(), role);
    env.storage().persistent().set(&key, &true);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}
