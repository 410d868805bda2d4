//! Property-based tests for the pure navigation core.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::HashSet;
use stepflow::core::{
    project, reduce, FieldOwnership, HistoryLedger, NavEvent, NavState, NavigationStatus, Step,
    StepId, StepSet, Values,
};

const IDS: [&str; 6] = ["a", "b", "c", "d", "e", "f"];

#[derive(Clone, Debug)]
enum LedgerOp {
    Append(usize),
    Truncate(usize),
}

prop_compose! {
    fn arbitrary_id()(index in 0..IDS.len()) -> StepId {
        StepId::new(IDS[index])
    }
}

fn arbitrary_op() -> impl Strategy<Value = LedgerOp> {
    prop_oneof![
        (0..IDS.len()).prop_map(LedgerOp::Append),
        (0..IDS.len()).prop_map(LedgerOp::Truncate),
    ]
}

/// Values where each known field is either absent or a small integer.
fn arbitrary_values() -> impl Strategy<Value = Values> {
    prop::collection::vec(prop::option::of(0..3i64), IDS.len()).prop_map(|slots| {
        slots
            .into_iter()
            .zip(IDS)
            .filter_map(|(slot, id)| slot.map(|n| (format!("field_{id}"), json!(n))))
            .collect()
    })
}

fn ownership() -> FieldOwnership {
    let mut ownership = FieldOwnership::new();
    for id in IDS {
        ownership.register_field(format!("field_{id}"), id);
    }
    ownership
}

fn is_unique(ids: &[StepId]) -> bool {
    let distinct: HashSet<&StepId> = ids.iter().collect();
    distinct.len() == ids.len()
}

proptest! {
    #[test]
    fn ledger_stays_unique_and_keeps_its_start(
        start in arbitrary_id(),
        ops in prop::collection::vec(arbitrary_op(), 0..40),
    ) {
        let mut ledger = HistoryLedger::new(start.clone());

        for op in ops {
            let before = ledger.as_slice().to_vec();
            match op {
                LedgerOp::Append(index) => {
                    let id = StepId::new(IDS[index]);
                    let appended = ledger.append(id.clone());
                    prop_assert_eq!(appended, !before.contains(&id));
                    if appended {
                        prop_assert_eq!(ledger.current(), &id);
                    } else {
                        prop_assert_eq!(ledger.as_slice(), &before[..]);
                    }
                }
                LedgerOp::Truncate(index) => {
                    let id = StepId::new(IDS[index]);
                    ledger.truncate_at(&id);
                    // Truncation only ever keeps a prefix.
                    prop_assert!(before.starts_with(ledger.as_slice()));
                }
            }

            prop_assert!(is_unique(ledger.as_slice()));
            prop_assert_eq!(ledger.first(), &start);
        }
    }

    #[test]
    fn truncate_makes_target_current(
        seed in prop::collection::vec(arbitrary_id(), 1..8),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut ledger = HistoryLedger::seeded(seed).unwrap();
        let target = pick.get(ledger.as_slice()).clone();
        let position = ledger.position(&target).unwrap();

        prop_assert!(ledger.truncate_at(&target));
        prop_assert_eq!(ledger.current(), &target);
        prop_assert_eq!(ledger.len(), position + 1);
    }

    #[test]
    fn active_steps_preserve_declaration_order(values in arbitrary_values()) {
        let set = StepSet::new(IDS.iter().map(|id| {
            let field = format!("field_{id}");
            Step::when(*id, move |values: &Values| values.get(&field) != Some(&json!(0)))
        }));

        let active = set.filter_active(&values);
        let positions: Vec<usize> = active
            .iter()
            .map(|id| set.position(id).unwrap())
            .collect();

        prop_assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        for step in set.steps() {
            prop_assert_eq!(active.contains(step.id()), step.is_active(&values));
        }
    }

    #[test]
    fn projection_only_keeps_walked_fields(
        values in arbitrary_values(),
        seed in prop::collection::vec(arbitrary_id(), 1..6),
    ) {
        let history = HistoryLedger::seeded(seed).unwrap();
        let ownership = ownership();
        let answers = project(&values, history.as_slice(), &ownership);

        for (name, value) in &answers {
            prop_assert_eq!(values.get(name), Some(value));
            let owner = ownership.owner(name).unwrap();
            prop_assert!(history.contains(owner));
        }
        for (name, value) in &values {
            let owned_by_walked = ownership.owner(name).is_some_and(|owner| history.contains(owner));
            prop_assert_eq!(answers.get(name) == Some(value), owned_by_walked);
        }
    }

    #[test]
    fn stale_timer_never_touches_state(
        seed in prop::collection::vec(arbitrary_id(), 1..4),
        stale in 0u64..100,
    ) {
        let history = HistoryLedger::seeded(seed).unwrap();
        let mut state = NavState::new(history, Default::default());
        state.status = NavigationStatus::Transitioning;
        state.generation = 100;

        let next = reduce(&state, NavEvent::TransitionElapsed { generation: stale });
        prop_assert_eq!(next, state);
    }

    #[test]
    fn ledger_serialization_roundtrip(seed in prop::collection::vec(arbitrary_id(), 1..8)) {
        let ledger = HistoryLedger::seeded(seed).unwrap();
        let json = serde_json::to_value(&ledger).unwrap();

        prop_assert!(matches!(json, Value::Array(_)));
        let restored: HistoryLedger = serde_json::from_value(json).unwrap();
        prop_assert_eq!(restored, ledger);
    }
}
