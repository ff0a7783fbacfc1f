extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events},
    vec, Address, IntoVal, TryIntoVal, Val, Vec,
};

use crate::events::{
    BadgeEarned, DonationRecorded, RequestApproved, RequestCreated, RequestRejected, UnitUsed,
};
use crate::test::{blood, donate, doc, setup, setup_with_actors, NOW};
use crate::{Badge, Role};

#[test]
fn test_donation_recorded_event() {
    let (env, client, a) = setup_with_actors();

    let unit_id = client.record_donation(&a.bank, &a.donor, &blood(&env, "O+"), &1, &doc(&env), &NOW);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    // Topic: (symbol_short!("donation"), unit_id)
    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("donation").into_val(&env),
        unit_id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: DonationRecorded = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        DonationRecorded {
            unit_id,
            donor: a.donor.clone(),
            blood_bank: a.bank.clone(),
            blood_type: blood(&env, "O+"),
            quantity: 1,
            timestamp: NOW,
        }
    );
}

#[test]
fn test_unit_used_event() {
    let (env, client, a) = setup_with_actors();
    let unit_id = donate(&env, &client, &a.bank, &a.donor, "B-");

    client.mark_as_used(&a.bank, &unit_id);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("used").into_val(&env),
        unit_id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: UnitUsed = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        UnitUsed {
            unit_id,
            owner: a.bank.clone(),
            timestamp: NOW,
        }
    );
}

#[test]
fn test_request_created_event() {
    let (env, client, a) = setup_with_actors();

    let request_id = client.create_request(&a.hospital, &a.bank, &blood(&env, "A-"), &2);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    let expected_topics = vec![
        &env,
        symbol_short!("req_new").into_val(&env),
        request_id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: RequestCreated = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        RequestCreated {
            request_id,
            hospital: a.hospital.clone(),
            blood_bank: a.bank.clone(),
            blood_type: blood(&env, "A-"),
            quantity: 2,
        }
    );
}

#[test]
fn test_request_approved_event() {
    let (env, client, a) = setup_with_actors();
    let u1 = donate(&env, &client, &a.bank, &a.donor, "AB+");
    let u2 = donate(&env, &client, &a.bank, &a.donor, "AB+");
    let request_id = client.create_request(&a.hospital, &a.bank, &blood(&env, "AB+"), &2);

    client.approve_request(&a.bank, &request_id, &vec![&env, u1, u2]);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("approved").into_val(&env),
        request_id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: RequestApproved = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        RequestApproved {
            request_id,
            hospital: a.hospital.clone(),
            blood_bank: a.bank.clone(),
            unit_ids: vec![&env, u1, u2],
        }
    );
}

#[test]
fn test_request_rejected_event() {
    let (env, client, a) = setup_with_actors();
    let request_id = client.create_request(&a.hospital, &a.bank, &blood(&env, "O-"), &1);

    client.reject_request(&a.bank, &request_id);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    let expected_topics = vec![
        &env,
        symbol_short!("rejected").into_val(&env),
        request_id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: RequestRejected = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        RequestRejected {
            request_id,
            blood_bank: a.bank.clone(),
        }
    );
}

#[test]
fn test_role_set_event() {
    let (env, client) = setup();
    let admin = Address::generate(&env);
    let hospital = Address::generate(&env);
    client.init(&admin);

    client.grant_role(&admin, &Role::Hospital, &hospital);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    let expected_topics = vec![
        &env,
        symbol_short!("role_set").into_val(&env),
        hospital.into_val(&env),
        Role::Hospital.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let caller: Address = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(caller, admin);
}

#[test]
fn test_badge_earned_event() {
    let (env, client, a) = setup_with_actors();

    donate(&env, &client, &a.bank, &a.donor, "O+");

    let badge_topics: Vec<Val> = vec![
        &env,
        symbol_short!("badge").into_val(&env),
        a.donor.into_val(&env),
    ];
    let badge_event = env
        .events()
        .all()
        .iter()
        .find(|event| event.1 == badge_topics)
        .expect("No badge event found");

    let event_data: BadgeEarned = badge_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        BadgeEarned {
            donor: a.donor.clone(),
            badge: Badge::Bronze,
            points: crate::rewards::POINTS_PER_DONATION,
        }
    );
}
