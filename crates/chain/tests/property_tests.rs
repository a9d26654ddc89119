//! Property-based tests for hardfork activation.
//!
//! These tests use proptest to verify:
//! - Activation is monotonic in the reference time
//! - Every entry point returns the same answer for the same operation
//! - Gated operations flip exactly at their hardfork's threshold

use opfork_chain::{
    activation_group, ActivationGroup, ActivationSchedule, Hardfork, HardforkVisitor,
};
use opfork_protocol::{dispatch_tag, Operation, OperationKind, OperationTag, TimePointSec};
use proptest::prelude::*;

fn any_kind() -> impl Strategy<Value = OperationKind> {
    proptest::sample::select(OperationKind::ALL)
}

fn any_schedule() -> impl Strategy<Value = ActivationSchedule> {
    proptest::array::uniform9(any::<u32>()).prop_map(|secs| {
        Hardfork::ALL.into_iter().zip(secs).fold(
            ActivationSchedule::uniform(TimePointSec::MIN),
            |schedule, (hardfork, secs)| {
                schedule.with_threshold(hardfork, TimePointSec::from_secs(secs))
            },
        )
    })
}

proptest! {
    #[test]
    fn test_activation_is_monotonic(
        schedule in any_schedule(),
        kind in any_kind(),
        a in any::<u32>(),
        b in any::<u32>(),
    ) {
        let (early, late) = if a <= b { (a, b) } else { (b, a) };
        let early = HardforkVisitor::with_schedule(&schedule, TimePointSec::from_secs(early));
        let late = HardforkVisitor::with_schedule(&schedule, TimePointSec::from_secs(late));
        if early.visit_kind(kind) {
            prop_assert!(late.visit_kind(kind));
        }
    }

    #[test]
    fn test_entry_points_agree(
        schedule in any_schedule(),
        kind in any_kind(),
        now in any::<u32>(),
    ) {
        let visitor = HardforkVisitor::with_schedule(&schedule, TimePointSec::from_secs(now));
        let expected = visitor.visit_kind(kind);
        let op = Operation::default_for(kind);
        let mut adaptor = visitor;

        prop_assert_eq!(visitor.visit_tag(kind.tag()), Ok(expected));
        prop_assert_eq!(visitor.visit_operation(&op), expected);
        prop_assert_eq!(dispatch_tag(kind.tag(), &mut adaptor), Ok(expected));
        prop_assert_eq!(visitor.ensure_permitted(&op).is_ok(), expected);
    }

    #[test]
    fn test_gated_result_is_threshold_comparison(
        schedule in any_schedule(),
        kind in any_kind(),
        now in any::<u32>(),
    ) {
        let now = TimePointSec::from_secs(now);
        let visitor = HardforkVisitor::with_schedule(&schedule, now);
        let expected = match activation_group(kind) {
            ActivationGroup::AlwaysOn => true,
            ActivationGroup::Gated(hardfork) => now >= schedule.threshold(hardfork),
        };
        prop_assert_eq!(visitor.visit_kind(kind), expected);
    }

    #[test]
    fn test_unknown_tags_always_error(tag in (OperationKind::COUNT as OperationTag)..) {
        let visitor = HardforkVisitor::new(TimePointSec::MAXIMUM);
        prop_assert!(visitor.visit_tag(tag).is_err());
    }
}
