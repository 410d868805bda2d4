//! Macros for ergonomic step declarations.

/// Declare an ordered list of [`Step`](crate::core::Step)s.
///
/// A bare id declares an always-active step. `if <predicate>` makes the
/// step conditional on the form values, and `=> <bool>` pins its activation.
///
/// # Example
///
/// ```
/// use stepflow::core::StepSet;
/// use stepflow::steps;
/// use serde_json::{json, Map};
///
/// let set = StepSet::new(steps![
///     "account",
///     "company" if |values| values.get("kind") == Some(&json!("business")),
///     "beta" => false,
///     "review",
/// ]);
///
/// let active = set.filter_active(&Map::new());
/// assert_eq!(active.len(), 2);
/// ```
#[macro_export]
macro_rules! steps {
    (
        $(
            $id:literal
            $(if $predicate:expr)?
            $(=> $active:expr)?
        ),* $(,)?
    ) => {
        vec![
            $(
                $crate::core::Step::new($id)
                    $(.with_activation($crate::core::ActivationRule::when($predicate)))?
                    $(.with_activation($crate::core::ActivationRule::from($active)))?
            ),*
        ]
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{ActivationRule, StepId, Values};
    use serde_json::json;

    #[test]
    fn steps_macro_keeps_declaration_order() {
        let steps = steps!["a", "b", "c"];
        let ids: Vec<&StepId> = steps.iter().map(|step| step.id()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn steps_macro_supports_predicates_and_flags() {
        let steps = steps![
            "always",
            "gated" if |values: &Values| values.contains_key("unlock"),
            "off" => false,
        ];

        assert!(matches!(steps[0].activation(), ActivationRule::Always));
        assert!(matches!(steps[1].activation(), ActivationRule::Predicate(_)));
        assert!(matches!(steps[2].activation(), ActivationRule::Never));

        let mut values = Values::new();
        assert!(!steps[1].is_active(&values));
        values.insert("unlock".into(), json!(true));
        assert!(steps[1].is_active(&values));
    }

    #[test]
    fn steps_macro_accepts_empty_list() {
        let steps: Vec<crate::core::Step> = steps![];
        assert!(steps.is_empty());
    }
}
