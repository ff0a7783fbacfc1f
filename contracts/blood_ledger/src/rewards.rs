//! # Donor rewards
//!
//! Every recorded donation credits the donor a fixed [`POINTS_PER_DONATION`].
//! Badges are derived from the running point total against [`BADGE_TIERS`]
//! and, once earned, are never taken away.
//!
//! ```text
//! Bronze   ≥   100
//! Silver   ≥   250
//! Gold     ≥   500
//! Platinum ≥ 1_000
//! Diamond  ≥ 2_500
//! ```

use soroban_sdk::{Address, Env};

use crate::events;
use crate::storage::{load_rewards, save_rewards};
use crate::types::{Badge, DonorRewardAccount};

/// Points credited for each recorded donation, independent of quantity.
pub const POINTS_PER_DONATION: u64 = 100;

/// Badge thresholds in ascending order.
pub const BADGE_TIERS: [(Badge, u64); 5] = [
    (Badge::Bronze, 100),
    (Badge::Silver, 250),
    (Badge::Gold, 500),
    (Badge::Platinum, 1_000),
    (Badge::Diamond, 2_500),
];

/// All badges whose threshold is met by `points`, lowest tier first.
pub fn badges_for(points: u64) -> impl Iterator<Item = Badge> {
    BADGE_TIERS
        .into_iter()
        .filter(move |(_, threshold)| points >= *threshold)
        .map(|(badge, _)| badge)
}

/// Credit `earned` points to `donor` and award any newly reached badges.
///
/// Only called from `record_donation`, after every precondition of the
/// donation has passed.
pub fn credit_donation(env: &Env, donor: &Address, earned: u64) -> DonorRewardAccount {
    let mut account =
        load_rewards(env, donor).unwrap_or_else(|| DonorRewardAccount::empty(env, donor.clone()));

    account.points = account.points.saturating_add(earned);
    account.donations = account.donations.saturating_add(1);

    for badge in badges_for(account.points) {
        if !account.has_badge(badge) {
            account.badges.push_back(badge);
            events::emit_badge_earned(env, donor.clone(), badge, account.points);
        }
    }

    save_rewards(env, &account);
    account
}

/// The donor's account, or an empty one if they were never credited.
pub fn donor_account(env: &Env, donor: &Address) -> DonorRewardAccount {
    load_rewards(env, donor).unwrap_or_else(|| DonorRewardAccount::empty(env, donor.clone()))
}

// ── Unit tests ──────────────────────────────────────────────────────────────
// Tier evaluation only; the ledger-level crediting is covered in test_rewards.rs.

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use std::vec::Vec;

    #[test]
    fn no_badges_below_first_threshold() {
        assert_eq!(badges_for(0).count(), 0);
        assert_eq!(badges_for(99).count(), 0);
    }

    #[test]
    fn threshold_is_inclusive() {
        let earned: Vec<Badge> = badges_for(100).collect();
        assert_eq!(earned, [Badge::Bronze]);
    }

    #[test]
    fn badges_accumulate_in_tier_order() {
        let earned: Vec<Badge> = badges_for(1_000).collect();
        assert_eq!(
            earned,
            [Badge::Bronze, Badge::Silver, Badge::Gold, Badge::Platinum]
        );
    }

    #[test]
    fn all_badges_at_top_tier() {
        assert_eq!(badges_for(u64::MAX).count(), BADGE_TIERS.len());
    }

    #[test]
    fn tiers_are_strictly_ascending() {
        for pair in BADGE_TIERS.windows(2) {
            assert!(pair[0].1 < pair[1].1);
            assert!(pair[0].0 < pair[1].0);
        }
    }
}
