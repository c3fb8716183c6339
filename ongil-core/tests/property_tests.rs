//! Property tests for the interaction core.
//!
//! Uses proptest to verify:
//! 1. Snap idempotence: snapping an already snapped value changes nothing
//! 2. Clamp containment: clamp and parse never leave `[min, max]`
//! 3. Ordering: every change a slider emits during arbitrary drags has low <= high
//! 4. Formatting round-trip: separators are purely cosmetic

use ongil_core::numeric::{clamp, format_with_thousands_separator, parse_digits, snap};
use ongil_core::{Domain, DualRangeSlider, PointerId, RangePair, Track};
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

/// Integer-valued domains whose max lies on the step grid.
fn arb_domain() -> impl Strategy<Value = Domain> {
    (-10_000i32..10_000, 1i32..5_000, 0i32..200).prop_map(|(min, step, steps)| {
        let min = f64::from(min);
        let step = f64::from(step);
        Domain::new(min, min + step * f64::from(steps), step).expect("generated domain is valid")
    })
}

#[derive(Debug, Clone)]
enum Gesture {
    Down(u64, f64),
    Move(u64, f64),
    Up(u64),
    Cancel(u64),
    Frame,
}

fn arb_gesture() -> impl Strategy<Value = Gesture> {
    let x = -50.0..650.0_f64;
    let pointer = 0u64..3;
    prop_oneof![
        (pointer.clone(), x.clone()).prop_map(|(p, x)| Gesture::Down(p, x)),
        (pointer.clone(), x).prop_map(|(p, x)| Gesture::Move(p, x)),
        pointer.clone().prop_map(Gesture::Up),
        pointer.prop_map(Gesture::Cancel),
        Just(Gesture::Frame),
    ]
}

fn assert_ordered_on_grid(pair: RangePair, domain: &Domain) -> Result<(), TestCaseError> {
    prop_assert!(pair.low() <= pair.high(), "low {} > high {}", pair.low(), pair.high());
    prop_assert!(domain.contains(pair.low()));
    prop_assert!(domain.contains(pair.high()));
    prop_assert_eq!(domain.snap(pair.low()), pair.low());
    prop_assert_eq!(domain.snap(pair.high()), pair.high());
    Ok(())
}

// ── 1. Snap Idempotence ──────────────────────────────────────────────

proptest! {
    #[test]
    fn snap_is_idempotent(domain in arb_domain(), v in -200_000.0..200_000.0_f64) {
        let once = snap(v, domain.step(), domain.min(), domain.max());
        let twice = snap(once, domain.step(), domain.min(), domain.max());
        prop_assert_eq!(once, twice);
    }
}

// ── 2. Clamp Containment ─────────────────────────────────────────────

proptest! {
    #[test]
    fn clamp_stays_in_bounds(domain in arb_domain(), v in proptest::num::f64::ANY) {
        let c = clamp(v, domain.min(), domain.max());
        prop_assert!(c >= domain.min() && c <= domain.max());
    }

    #[test]
    fn parsed_text_stays_in_bounds(domain in arb_domain(), text in "[0-9]{0,400}") {
        if let Some(v) = domain.parse(&text) {
            prop_assert!(domain.contains(v));
        } else {
            prop_assert!(text.is_empty());
        }
    }
}

// ── 3. Low <= High Over Arbitrary Drags ──────────────────────────────

proptest! {
    #[test]
    fn drags_never_invert(
        domain in arb_domain(),
        start in (0.0..1.0_f64, 0.0..1.0_f64),
        gestures in prop::collection::vec(arb_gesture(), 1..60),
        single in any::<bool>(),
    ) {
        let initial = RangePair::sorted(
            domain.value_at_fraction(start.0),
            domain.value_at_fraction(start.1),
        );
        let mut slider = DualRangeSlider::new(domain, initial).single_value(single);
        slider.set_track(Track::new(0.0, 600.0));

        for g in gestures {
            let emitted = match g {
                Gesture::Down(p, x) => {
                    slider.pointer_down(PointerId(p), x);
                    None
                }
                Gesture::Move(p, x) => {
                    slider.pointer_move(PointerId(p), x);
                    None
                }
                Gesture::Up(p) => slider.pointer_up(PointerId(p)),
                Gesture::Cancel(p) => slider.pointer_cancel(PointerId(p)),
                Gesture::Frame => slider.on_frame(),
            };
            if let Some(pair) = emitted {
                assert_ordered_on_grid(pair, &domain)?;
                if single {
                    prop_assert_eq!(pair.low(), pair.high());
                }
            }
            prop_assert!(slider.low() <= slider.high());
        }
    }

    #[test]
    fn nudges_never_invert(
        domain in arb_domain(),
        steps in prop::collection::vec((any::<bool>(), -20i32..20), 1..40),
    ) {
        let mut slider = DualRangeSlider::new(domain, RangePair::sorted(domain.min(), domain.max()));
        for (low, n) in steps {
            let handle = if low { ongil_core::Handle::Low } else { ongil_core::Handle::High };
            slider.nudge(handle, n);
            if let Some(pair) = slider.on_frame() {
                assert_ordered_on_grid(pair, &domain)?;
            }
        }
    }
}

// ── 4. Formatting Round-Trip ─────────────────────────────────────────

proptest! {
    #[test]
    fn separators_round_trip(digits in "[0-9]{0,24}") {
        let formatted = format_with_thousands_separator(&digits);
        prop_assert_eq!(parse_digits(&formatted), digits);
    }

    #[test]
    fn separator_groups_are_three_wide(digits in "[1-9][0-9]{0,17}") {
        let formatted = format_with_thousands_separator(&digits);
        let groups: Vec<&str> = formatted.split(',').collect();
        prop_assert!(!groups[0].is_empty() && groups[0].len() <= 3);
        for g in &groups[1..] {
            prop_assert_eq!(g.len(), 3);
        }
    }
}
