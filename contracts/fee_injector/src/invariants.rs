#![allow(dead_code)]

extern crate std;

use crate::FeeInjectorClient;

/// INV-1: after a first-half release the held balance is `ceil(before / 2)`.
pub fn assert_halved(before: i128, after: i128) {
    assert_eq!(
        after,
        before - before / 2,
        "INV-1 violated: held {} after first half of {}",
        after,
        before
    );
}

/// INV-2: after the second half nothing of a tracked asset is left.
pub fn assert_fully_drained(held: i128) {
    assert_eq!(held, 0, "INV-2 violated: {} left after second half", held);
}

/// INV-3: a successful release flips the phase flag exactly once.
pub fn assert_phase_flipped(before: bool, after: bool) {
    assert_ne!(
        before, after,
        "INV-3 violated: phase flag stayed {} across a release",
        before
    );
}

/// INV-4: the release cursor never moves backwards.
pub fn assert_cursor_monotonic(before: u64, after: u64) {
    assert!(
        after >= before,
        "INV-4 violated: cursor went from {} to {}",
        before,
        after
    );
}

/// INV-5: a release moves exactly what the controller stopped holding.
pub fn assert_conserved(held_before: i128, held_after: i128, moved: i128) {
    assert_eq!(
        held_before - held_after,
        moved,
        "INV-5 violated: held {} -> {} but {} moved",
        held_before,
        held_after,
        moved
    );
}

/// INV-6: a failed call leaves phase, cursor and counter untouched.
pub fn assert_state_unchanged(
    client: &FeeInjectorClient,
    first_half_pending: bool,
    cursor: u64,
    release_count: u64,
) {
    assert_eq!(
        client.is_first_half_pending(),
        first_half_pending,
        "INV-6 violated: phase flag changed"
    );
    assert_eq!(
        client.last_release_cursor(),
        cursor,
        "INV-6 violated: cursor changed"
    );
    assert_eq!(
        client.release_count(),
        release_count,
        "INV-6 violated: release count changed"
    );
}
