extern crate std;

use soroban_sdk::{testutils::Address as _, vec, Address};

use crate::invariants::assert_rewards_monotonic;
use crate::rewards::{BADGE_TIERS, POINTS_PER_DONATION};
use crate::test::{donate, setup_with_actors};
use crate::Badge;

#[test]
fn test_unknown_donor_has_empty_account() {
    let (env, client, _a) = setup_with_actors();
    let stranger = Address::generate(&env);

    assert_eq!(client.get_donor_rewards(&stranger), 0);

    let account = client.get_donor_account(&stranger);
    assert_eq!(account.donor, stranger);
    assert_eq!(account.points, 0);
    assert_eq!(account.donations, 0);
    assert!(account.badges.is_empty());
}

#[test]
fn test_each_donation_credits_fixed_points() {
    let (env, client, a) = setup_with_actors();

    for n in 1..=3u64 {
        let before = client.get_donor_rewards(&a.donor);
        donate(&env, &client, &a.bank, &a.donor, "A+");
        let after = client.get_donor_rewards(&a.donor);
        assert_eq!(after - before, POINTS_PER_DONATION);
        assert_eq!(after, n * POINTS_PER_DONATION);
    }

    assert_eq!(client.get_donor_account(&a.donor).donations, 3);
}

#[test]
fn test_points_ignore_quantity() {
    let (env, client, a) = setup_with_actors();

    client.record_donation(
        &a.bank,
        &a.donor,
        &crate::test::blood(&env, "O-"),
        &4,
        &crate::test::doc(&env),
        &crate::test::NOW,
    );

    assert_eq!(client.get_donor_rewards(&a.donor), POINTS_PER_DONATION);
}

#[test]
fn test_donor_role_not_required_for_credit() {
    let (env, client, a) = setup_with_actors();
    let walk_in = Address::generate(&env);

    donate(&env, &client, &a.bank, &walk_in, "B+");

    assert_eq!(client.get_donor_rewards(&walk_in), POINTS_PER_DONATION);
}

#[test]
fn test_badges_follow_tier_table() {
    let (env, client, a) = setup_with_actors();

    let mut previous = client.get_donor_account(&a.donor);
    let top_threshold = BADGE_TIERS[BADGE_TIERS.len() - 1].1;
    let donations_needed = top_threshold / POINTS_PER_DONATION;

    for _ in 0..donations_needed {
        donate(&env, &client, &a.bank, &a.donor, "O+");
        let current = client.get_donor_account(&a.donor);
        assert_rewards_monotonic(&previous, &current);

        for (badge, threshold) in BADGE_TIERS {
            assert_eq!(current.has_badge(badge), current.points >= threshold);
        }
        previous = current;
    }

    assert_eq!(
        previous.badges,
        vec![
            &env,
            Badge::Bronze,
            Badge::Silver,
            Badge::Gold,
            Badge::Platinum,
            Badge::Diamond
        ]
    );
}

#[test]
fn test_rewards_are_per_donor() {
    let (env, client, a) = setup_with_actors();
    let other = Address::generate(&env);

    donate(&env, &client, &a.bank, &a.donor, "O+");
    donate(&env, &client, &a.bank, &a.donor, "O+");
    donate(&env, &client, &a.bank, &other, "O+");

    assert_eq!(client.get_donor_rewards(&a.donor), 2 * POINTS_PER_DONATION);
    assert_eq!(client.get_donor_rewards(&other), POINTS_PER_DONATION);
    assert_eq!(client.get_donor_account(&other).badges, vec![&env, Badge::Bronze]);
}
