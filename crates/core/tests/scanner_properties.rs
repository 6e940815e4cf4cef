//! Property-based tests for the definition scanner using proptest.
//!
//! Properties verified:
//! - Selection keeps exactly the functions with a firehose trigger, in order
//! - Validation fails iff some firehose trigger lacks a stream name

use fhsync_core::{
    FirehoseTrigger, FunctionSpec, ServiceDefinition, Trigger, select_triggered_functions,
    validate,
};
use proptest::prelude::*;

/// Generated trigger shape.
#[derive(Debug, Clone)]
enum GenTrigger {
    /// An unmanaged event kind.
    Other,
    /// A firehose trigger; `None` leaves `deliveryStreamName` out entirely.
    Firehose(Option<String>),
}

impl GenTrigger {
    const fn is_firehose(&self) -> bool {
        matches!(self, Self::Firehose(_))
    }

    fn lacks_stream_name(&self) -> bool {
        match self {
            Self::Firehose(name) => name.as_deref().is_none_or(str::is_empty),
            Self::Other => false,
        }
    }

    fn to_trigger(&self) -> Trigger {
        match self {
            Self::Other => Trigger::other("http"),
            Self::Firehose(None) => Trigger::Firehose(FirehoseTrigger::default()),
            Self::Firehose(Some(name)) => Trigger::Firehose(FirehoseTrigger::new(name.clone())),
        }
    }
}

fn arb_trigger() -> impl Strategy<Value = GenTrigger> {
    prop_oneof![
        Just(GenTrigger::Other),
        Just(GenTrigger::Firehose(None)),
        Just(GenTrigger::Firehose(Some(String::new()))),
        Just(GenTrigger::Firehose(Some("  ".to_owned()))),
        "[a-z]{1,8}".prop_map(|name| GenTrigger::Firehose(Some(name))),
    ]
}

fn arb_functions() -> impl Strategy<Value = Vec<Vec<GenTrigger>>> {
    prop::collection::vec(prop::collection::vec(arb_trigger(), 0..4), 0..8)
}

fn build_definition(functions: &[Vec<GenTrigger>]) -> ServiceDefinition {
    functions
        .iter()
        .enumerate()
        .fold(ServiceDefinition::new("svc", "dev"), |definition, (index, triggers)| {
            let identifier = format!("fn{index}");
            let spec = triggers.iter().fold(
                FunctionSpec::new(identifier.clone(), format!("svc-dev-{identifier}")),
                |spec, trigger| spec.with_trigger(trigger.to_trigger()),
            );
            definition.with_function(spec)
        })
}

proptest! {
    /// Property: the scanner returns exactly the functions with at least one
    /// firehose trigger, in definition order.
    #[test]
    fn prop_selection_matches_firehose_functions(functions in arb_functions()) {
        let definition = build_definition(&functions);

        let expected: Vec<String> = functions
            .iter()
            .enumerate()
            .filter(|(_, triggers)| triggers.iter().any(GenTrigger::is_firehose))
            .map(|(index, _)| format!("fn{index}"))
            .collect();

        let selected: Vec<String> = select_triggered_functions(&definition)
            .iter()
            .map(|t| t.function.identifier.clone())
            .collect();

        prop_assert_eq!(selected, expected);
    }

    /// Property: each selected function keeps exactly its firehose triggers.
    #[test]
    fn prop_selection_keeps_trigger_counts(functions in arb_functions()) {
        let definition = build_definition(&functions);

        let expected: Vec<usize> = functions
            .iter()
            .map(|triggers| triggers.iter().filter(|t| t.is_firehose()).count())
            .filter(|count| *count > 0)
            .collect();

        let counts: Vec<usize> = select_triggered_functions(&definition)
            .iter()
            .map(|t| t.triggers.len())
            .collect();

        prop_assert_eq!(counts, expected);
    }

    /// Property: validation fails iff some firehose trigger has an absent or
    /// empty stream name.
    #[test]
    fn prop_validation_fails_iff_stream_name_missing(functions in arb_functions()) {
        let definition = build_definition(&functions);

        let has_missing = functions
            .iter()
            .flatten()
            .any(GenTrigger::lacks_stream_name);

        prop_assert_eq!(validate(&definition).is_err(), has_missing);
    }
}
