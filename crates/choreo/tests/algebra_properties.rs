#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::float_cmp)]

use choreo::{
    add_duration, max_duration, scale_duration, Animation, DurationSpan, Options, RepeatPolicy,
    Seconds,
};
use proptest::prelude::*;

/// Durations on a quarter-second grid so sums stay exact.
fn finite() -> impl Strategy<Value = Seconds> {
    (0u32..40_000).prop_map(|quarters| Seconds::new(quarters as f64 / 4.0))
}

fn duration() -> impl Strategy<Value = Seconds> {
    prop_oneof![4 => finite(), 1 => Just(Seconds::INFINITE)]
}

/// A wait lasting a whole number of quarter seconds.
fn wait() -> impl Strategy<Value = Animation> {
    (1u32..400).prop_map(|quarters| Animation::wait(quarters as f64 / 4.0))
}

// =============================================================================
// Duration algebra
// =============================================================================

proptest! {
    #[test]
    fn infinity_absorbs(x in finite(), k in 0.25f64..100.0) {
        prop_assert_eq!(max_duration(Seconds::INFINITE, x), Seconds::INFINITE);
        prop_assert_eq!(max_duration(x, Seconds::INFINITE), Seconds::INFINITE);
        prop_assert_eq!(add_duration(Seconds::INFINITE, x), Seconds::INFINITE);
        prop_assert_eq!(add_duration(x, Seconds::INFINITE), Seconds::INFINITE);
        prop_assert_eq!(scale_duration(Seconds::INFINITE, k), Seconds::INFINITE);
    }

    #[test]
    fn max_and_add_commute(a in duration(), b in duration()) {
        prop_assert_eq!(max_duration(a, b), max_duration(b, a));
        prop_assert_eq!(add_duration(a, b), add_duration(b, a));
    }

    #[test]
    fn max_and_add_associate(a in duration(), b in duration(), c in duration()) {
        prop_assert_eq!(
            max_duration(max_duration(a, b), c),
            max_duration(a, max_duration(b, c))
        );
        prop_assert_eq!(
            add_duration(add_duration(a, b), c),
            add_duration(a, add_duration(b, c))
        );
    }

    #[test]
    fn zero_is_identity(a in duration()) {
        prop_assert_eq!(max_duration(a, Seconds::ZERO), a);
        prop_assert_eq!(add_duration(a, Seconds::ZERO), a);
    }

    #[test]
    fn finite_arithmetic_matches_f64(a in finite(), b in finite()) {
        prop_assert_eq!(add_duration(a, b).as_f64(), a.as_f64() + b.as_f64());
        prop_assert_eq!(max_duration(a, b).as_f64(), a.as_f64().max(b.as_f64()));
        prop_assert_eq!(scale_duration(a, 2.0).as_f64(), a.as_f64() * 2.0);
    }

    #[test]
    fn construction_never_yields_nan(raw in prop::num::f64::ANY) {
        let secs = Seconds::new(raw);
        prop_assert!(secs.is_infinite() || secs.as_f64() >= 0.0);
        prop_assert!(!secs.to_engine().is_nan());
    }
}

// =============================================================================
// Composite laws
// =============================================================================

proptest! {
    #[test]
    fn autoreverse_doubles(inner in wait()) {
        let once = Animation::autoreverse(&inner);
        let twice = Animation::autoreverse(&once);
        prop_assert_eq!(once.base_duration(), scale_duration(inner.base_duration(), 2.0));
        prop_assert_eq!(twice.base_duration(), scale_duration(inner.base_duration(), 4.0));
        prop_assert_eq!(once.accumulated_duration(), scale_duration(inner.accumulated_duration(), 2.0));
    }

    #[test]
    fn repeat_multiplies_accumulated(inner in wait(), count in 0u32..20) {
        let repeated = Animation::repeat(&inner, Some(count));
        prop_assert_eq!(repeated.base_duration(), inner.base_duration());
        prop_assert_eq!(
            repeated.accumulated_duration(),
            scale_duration(inner.base_duration(), count as f64 + 1.0)
        );
        prop_assert!(Animation::repeat(&inner, None).accumulated_duration().is_infinite());
    }

    #[test]
    fn sequence_sums_and_offsets(children in prop::collection::vec(wait(), 0..8)) {
        let seq = Animation::sequence(&children, DurationSpan::Automatic, &Options::default())
            .expect("finite children are always reachable");

        let expected: Seconds = children.iter().map(Animation::base_duration).sum();
        prop_assert_eq!(seq.base_duration(), expected);

        let mut offset = Seconds::ZERO;
        for (copy, original) in seq.children().iter().zip(&children) {
            prop_assert_eq!(copy.begin_time(), offset);
            offset = add_duration(offset, original.base_duration());
        }
    }

    #[test]
    fn group_takes_maximum(children in prop::collection::vec(wait(), 0..8)) {
        let group = Animation::group(&children, DurationSpan::Automatic, &Options::default());
        let expected = children
            .iter()
            .map(Animation::base_duration)
            .fold(Seconds::ZERO, max_duration);
        prop_assert_eq!(group.base_duration(), expected);
        prop_assert!(group.children().iter().all(|c| c.begin_time() == Seconds::ZERO));
    }

    #[test]
    fn group_is_order_independent(children in prop::collection::vec(wait(), 1..8)) {
        let forward = Animation::group(&children, DurationSpan::Automatic, &Options::default());
        let backward = Animation::group(children.iter().rev(), DurationSpan::Automatic, &Options::default());
        prop_assert_eq!(forward.base_duration(), backward.base_duration());
        prop_assert_eq!(forward.accumulated_duration(), backward.accumulated_duration());
    }

    #[test]
    fn repeat_option_never_shrinks_base(inner in wait(), count in 0u32..10) {
        let options = Options::default().with_repeat(RepeatPolicy::Count(count));
        let group = Animation::group([&inner], DurationSpan::Automatic, &options);
        prop_assert_eq!(group.base_duration(), inner.base_duration());
        prop_assert!(group.accumulated_duration() >= group.base_duration());
    }

    #[test]
    fn construction_is_pure(children in prop::collection::vec(wait(), 0..6)) {
        let a = Animation::sequence(&children, DurationSpan::Automatic, &Options::default());
        let b = Animation::sequence(&children, DurationSpan::Automatic, &Options::default());
        prop_assert_eq!(a, b);
    }
}
