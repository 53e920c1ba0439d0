extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events},
    vec, Address, Env, IntoVal, TryIntoVal, Val, Vec,
};

use crate::events::{AssetsUpdated, Initialized, NotifyFailed, ReleaseExecuted, RoleChanged, Swept};
use crate::test::{create_token, setup, setup_with_collector, RejectingCollector, GENESIS, PERIOD};
use crate::{AssetTransfer, Phase};

/// Data of the most recent event `contract` published under `topics`.
fn find_event(env: &Env, contract: &Address, topics: Vec<Val>) -> Option<Val> {
    let mut found = None;
    for (addr, t, data) in env.events().all().iter() {
        if addr == *contract && t == topics {
            found = Some(data);
        }
    }
    found
}

#[test]
fn test_initialized_event() {
    let s = setup();
    let events = s.env.events().all();
    let last_event = events.last().expect("No events found");

    assert_eq!(last_event.0, s.client.address);
    let expected_topics = vec![
        &s.env,
        symbol_short!("init").into_val(&s.env),
        s.admin.into_val(&s.env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let data: Initialized = last_event.2.try_into_val(&s.env).unwrap();
    assert_eq!(
        data,
        Initialized {
            admin: s.admin.clone(),
            operator: s.operator.clone(),
            collector: s.collector.clone(),
            assets: vec![&s.env, s.x.address.clone(), s.y.address.clone()],
            period: PERIOD,
        }
    );
}

#[test]
fn test_release_events_carry_next_eligible_time() {
    let s = setup();
    s.deposit(&s.x, 50_000);
    s.client.perform_release(&s.operator);

    let topics = vec![
        &s.env,
        symbol_short!("released").into_val(&s.env),
        0u64.into_val(&s.env),
    ];
    let raw = find_event(&s.env, &s.client.address, topics).expect("released event missing");
    let data: ReleaseExecuted = raw.try_into_val(&s.env).unwrap();
    assert_eq!(
        data,
        ReleaseExecuted {
            index: 0,
            phase: Phase::AwaitingFirstHalf,
            operator: s.operator.clone(),
            transfers: vec![
                &s.env,
                AssetTransfer {
                    asset: s.x.address.clone(),
                    amount: 25_000,
                }
            ],
            released_at: GENESIS,
            next_eligible_at: GENESIS + PERIOD,
        }
    );

    s.warp(GENESIS + PERIOD);
    s.client.perform_release(&s.operator);
    let topics = vec![
        &s.env,
        symbol_short!("released").into_val(&s.env),
        1u64.into_val(&s.env),
    ];
    let raw = find_event(&s.env, &s.client.address, topics).expect("second release missing");
    let data: ReleaseExecuted = raw.try_into_val(&s.env).unwrap();
    assert_eq!(data.phase, Phase::AwaitingSecondHalf);
    // Back in the first half: time no longer gates.
    assert_eq!(data.next_eligible_at, GENESIS + PERIOD);
}

#[test]
fn test_notify_failed_event() {
    let s = setup_with_collector(|env| env.register(RejectingCollector, ()));
    s.deposit(&s.y, 10);
    s.client.perform_release(&s.operator);

    let topics = vec![
        &s.env,
        symbol_short!("notify_f").into_val(&s.env),
        0u64.into_val(&s.env),
    ];
    let raw = find_event(&s.env, &s.client.address, topics).expect("notify_f event missing");
    let data: NotifyFailed = raw.try_into_val(&s.env).unwrap();
    assert_eq!(
        data,
        NotifyFailed {
            index: 0,
            collector: s.collector.clone(),
        }
    );
}

#[test]
fn test_assets_updated_event() {
    let s = setup();
    let list = vec![&s.env, s.y.address.clone()];
    s.client.set_tracked_assets(&s.admin, &list);

    let topics = vec![&s.env, symbol_short!("assets").into_val(&s.env)];
    let raw = find_event(&s.env, &s.client.address, topics).expect("assets event missing");
    let data: AssetsUpdated = raw.try_into_val(&s.env).unwrap();
    assert_eq!(
        data,
        AssetsUpdated {
            admin: s.admin.clone(),
            assets: list,
        }
    );
}

#[test]
fn test_role_events() {
    let s = setup();
    let new_operator = Address::generate(&s.env);
    s.client.set_operator(&s.admin, &new_operator);
    let raw = find_event(
        &s.env,
        &s.client.address,
        vec![&s.env, symbol_short!("operator").into_val(&s.env)],
    )
    .expect("operator event missing");
    let data: RoleChanged = raw.try_into_val(&s.env).unwrap();
    assert_eq!(
        data,
        RoleChanged {
            previous: s.operator.clone(),
            current: new_operator,
        }
    );

    let new_admin = Address::generate(&s.env);
    s.client.transfer_administration(&s.admin, &new_admin);
    let raw = find_event(
        &s.env,
        &s.client.address,
        vec![&s.env, symbol_short!("admin").into_val(&s.env)],
    )
    .expect("admin event missing");
    let data: RoleChanged = raw.try_into_val(&s.env).unwrap();
    assert_eq!(data.previous, s.admin);
    assert_eq!(data.current, new_admin);
}

#[test]
fn test_pause_events() {
    let s = setup();
    s.client.pause(&s.admin);
    let raw = find_event(
        &s.env,
        &s.client.address,
        vec![&s.env, symbol_short!("paused").into_val(&s.env)],
    )
    .expect("paused event missing");
    let by: Address = raw.try_into_val(&s.env).unwrap();
    assert_eq!(by, s.admin);

    s.client.unpause(&s.admin);
    assert!(find_event(
        &s.env,
        &s.client.address,
        vec![&s.env, symbol_short!("unpaused").into_val(&s.env)],
    )
    .is_some());
}

#[test]
fn test_swept_event() {
    let s = setup();
    let stray = create_token(&s.env, &Address::generate(&s.env));
    s.deposit(&stray, 42);
    let to = Address::generate(&s.env);
    s.client.sweep(&s.admin, &stray.address, &to);

    let raw = find_event(
        &s.env,
        &s.client.address,
        vec![
            &s.env,
            symbol_short!("swept").into_val(&s.env),
            stray.address.into_val(&s.env),
        ],
    )
    .expect("swept event missing");
    let data: Swept = raw.try_into_val(&s.env).unwrap();
    assert_eq!(
        data,
        Swept {
            asset: stray.address.clone(),
            recipient: to,
            amount: 42,
        }
    );
}
