extern crate std;

use soroban_sdk::{testutils::Address as _, Address};

use crate::invariants::{
    assert_conserved, assert_cursor_monotonic, assert_fully_drained, assert_halved,
    assert_phase_flipped,
};
use crate::test::{create_token, setup, PERIOD};

/// Deterministic spread of balances: small odd/even values, values around
/// powers of two, and large ledger-scale amounts.
fn sample_balances() -> std::vec::Vec<i128> {
    let mut out = std::vec![1, 2, 3, 5, 7, 10, 99, 100, 101, 50_000, 99_999];
    for shift in [8u32, 16, 32, 63, 96] {
        let p = 1i128 << shift;
        out.extend_from_slice(&[p - 1, p, p + 1]);
    }
    out.push(50_000 * 10i128.pow(18));
    out
}

#[test]
fn test_every_balance_halves_then_drains() {
    for b in sample_balances() {
        let s = setup();
        s.deposit(&s.x, b);

        let report = s.client.perform_release(&s.operator);
        let moved = if report.transfers.is_empty() {
            0
        } else {
            report.transfers.get_unchecked(0).amount
        };
        assert_eq!(moved, b / 2, "first half of {b}");
        assert_halved(b, s.held(&s.x));
        assert_conserved(b, s.held(&s.x), moved);

        let remaining = s.held(&s.x);
        s.warp(s.client.next_eligible_at());
        let report = s.client.perform_release(&s.operator);
        assert_eq!(report.transfers.get_unchecked(0).amount, remaining);
        assert_fully_drained(s.held(&s.x));
        assert_eq!(s.received(&s.x), b);
    }
}

#[test]
fn test_phase_strictly_alternates_over_many_cycles() {
    let s = setup();
    let mut flag = s.client.is_first_half_pending();
    let mut cursor = s.client.last_release_cursor();

    for round in 0..6u64 {
        s.deposit(&s.x, 1_000 + round as i128);
        s.deposit(&s.y, 3);

        // Not yet eligible on a second half: nothing moves.
        if !flag {
            let _ = s.client.try_perform_release(&s.operator);
            assert_eq!(s.client.is_first_half_pending(), flag);
            s.warp(cursor + PERIOD);
        }

        s.client.perform_release(&s.operator);
        let next_flag = s.client.is_first_half_pending();
        let next_cursor = s.client.last_release_cursor();
        assert_phase_flipped(flag, next_flag);
        assert_cursor_monotonic(cursor, next_cursor);
        assert_eq!(s.client.release_count(), round + 1);

        flag = next_flag;
        cursor = next_cursor;
    }
}

#[test]
fn test_many_assets_released_together() {
    let s = setup();
    let admin = Address::generate(&s.env);
    let mut tokens = std::vec::Vec::new();
    let mut list = soroban_sdk::Vec::new(&s.env);
    for i in 0..8i128 {
        let t = create_token(&s.env, &admin);
        s.deposit(&t, 1_000 * (i + 1) + i);
        list.push_back(t.address.clone());
        tokens.push(t);
    }
    s.client.set_tracked_assets(&s.admin, &list);

    s.client.perform_release(&s.operator);
    for (i, t) in tokens.iter().enumerate() {
        let b = 1_000 * (i as i128 + 1) + i as i128;
        assert_halved(b, s.held(t));
    }

    s.warp(s.client.next_eligible_at());
    s.client.perform_release(&s.operator);
    for t in tokens.iter() {
        assert_fully_drained(s.held(t));
    }
}
