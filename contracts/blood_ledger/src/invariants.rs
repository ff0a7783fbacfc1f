#![allow(dead_code)]

extern crate std;

use crate::types::{BloodUnit, DonorRewardAccount, Request, RequestStatus, UnitStatus};

/// INV-1: Unit IDs are sequential starting from 1.
pub fn assert_sequential_unit_ids(units: &[BloodUnit]) {
    for (i, unit) in units.iter().enumerate() {
        assert_eq!(
            unit.id,
            i as u64 + 1,
            "INV-1 violated: expected unit id {}, got {}",
            i + 1,
            unit.id
        );
    }
}

/// INV-2: Request IDs are sequential starting from 1.
pub fn assert_sequential_request_ids(requests: &[Request]) {
    for (i, request) in requests.iter().enumerate() {
        assert_eq!(
            request.id,
            i as u64 + 1,
            "INV-2 violated: expected request id {}, got {}",
            i + 1,
            request.id
        );
    }
}

/// INV-3: A request carries exactly `quantity` assigned units when Approved,
/// and none otherwise.
pub fn assert_assignment_matches_status(request: &Request) {
    match request.status {
        RequestStatus::Approved => assert_eq!(
            request.assigned_unit_ids.len(),
            request.quantity,
            "INV-3 violated: approved request {} has {} units for quantity {}",
            request.id,
            request.assigned_unit_ids.len(),
            request.quantity
        ),
        RequestStatus::Pending | RequestStatus::Rejected => assert!(
            request.assigned_unit_ids.is_empty(),
            "INV-3 violated: request {} in {:?} has assigned units",
            request.id,
            request.status
        ),
    }
}

/// INV-4: Quantities are always positive.
pub fn assert_quantity_positive(quantity: u32) {
    assert!(quantity > 0, "INV-4 violated: zero quantity");
}

/// INV-5: Request status transitions. Only:
///   Pending -> Approved | Rejected
///   Approved -> (none)
///   Rejected -> (none)
/// Staying in the same status is always allowed.
pub fn assert_valid_request_transition(from: &RequestStatus, to: &RequestStatus) {
    let valid = from == to || from.can_transition_to(*to);
    assert!(
        valid,
        "INV-5 violated: invalid request transition from {:?} to {:?}",
        from, to
    );
}

/// INV-6: Once a unit is Used it stays Used.
pub fn assert_used_is_terminal(before: &BloodUnit, after: &BloodUnit) {
    if before.status == UnitStatus::Used {
        assert_eq!(
            after.status,
            UnitStatus::Used,
            "INV-6 violated: unit {} left the Used state",
            before.id
        );
    }
}

/// INV-7: Donation facts never change after recording.
pub fn assert_unit_immutable_fields(original: &BloodUnit, current: &BloodUnit) {
    assert_eq!(original.id, current.id, "INV-7 violated: unit id changed");
    assert_eq!(
        original.donor, current.donor,
        "INV-7 violated: unit donor changed"
    );
    assert_eq!(
        original.blood_type, current.blood_type,
        "INV-7 violated: unit blood_type changed"
    );
    assert_eq!(
        original.quantity, current.quantity,
        "INV-7 violated: unit quantity changed"
    );
    assert_eq!(
        original.document_hash, current.document_hash,
        "INV-7 violated: unit document_hash changed"
    );
    assert_eq!(
        original.collected_at, current.collected_at,
        "INV-7 violated: unit collected_at changed"
    );
    assert_eq!(
        original.created_at, current.created_at,
        "INV-7 violated: unit created_at changed"
    );
}

/// INV-8: Points never decrease and held badges are never removed.
pub fn assert_rewards_monotonic(before: &DonorRewardAccount, after: &DonorRewardAccount) {
    assert!(
        after.points >= before.points,
        "INV-8 violated: points decreased from {} to {}",
        before.points,
        after.points
    );
    for badge in before.badges.iter() {
        assert!(
            after.has_badge(badge),
            "INV-8 violated: badge {:?} was removed",
            badge
        );
    }
}

/// Run all stateless request invariants.
pub fn assert_all_request_invariants(request: &Request) {
    assert_quantity_positive(request.quantity);
    assert_assignment_matches_status(request);
}

/// Run all stateless unit invariants.
pub fn assert_all_unit_invariants(unit: &BloodUnit) {
    assert_quantity_positive(unit.quantity);
    assert!(unit.id > 0, "INV-1 violated: unit id 0 allocated");
}
