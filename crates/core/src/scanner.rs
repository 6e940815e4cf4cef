//! Definition scanner: selects the functions that carry firehose triggers.

use itertools::Itertools;
use tracing::{debug, warn};

use crate::definition::{FirehoseTrigger, FunctionSpec, ServiceDefinition};
use crate::error::ConfigurationError;

/// A function with at least one firehose trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggeredFunction<'a> {
    pub function: &'a FunctionSpec,
    /// Never empty.
    pub triggers: Vec<&'a FirehoseTrigger>,
}

/// A firehose trigger whose delivery stream name has been checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedTrigger<'a> {
    pub delivery_stream_name: &'a str,
    pub trigger: &'a FirehoseTrigger,
}

/// A triggered function that passed validation; input to reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFunction<'a> {
    pub function: &'a FunctionSpec,
    pub triggers: Vec<ValidatedTrigger<'a>>,
}

/// Select every function with at least one firehose trigger.
///
/// Function order and per-function trigger order follow the definition.
#[must_use]
pub fn select_triggered_functions(definition: &ServiceDefinition) -> Vec<TriggeredFunction<'_>> {
    definition
        .functions()
        .filter_map(|function| {
            let triggers = function.firehose_triggers().collect_vec();
            (!triggers.is_empty()).then_some(TriggeredFunction { function, triggers })
        })
        .collect()
}

/// Check every firehose trigger for a delivery stream name.
///
/// Pure: no remote state is touched, so a bad trigger anywhere stops the run
/// before reconciliation begins.
///
/// # Errors
///
/// Returns [`ConfigurationError::MissingDeliveryStreamName`] for the first
/// function (in definition order) with a trigger whose stream name is absent
/// or empty.
pub fn validate(
    definition: &ServiceDefinition,
) -> Result<Vec<ValidatedFunction<'_>>, ConfigurationError> {
    let selected = select_triggered_functions(definition);

    debug!(
        functions = %selected.iter().map(|t| t.function.identifier.as_str()).join(", "),
        "Validating firehose triggers"
    );

    selected
        .into_iter()
        .map(validate_function)
        .collect::<Result<Vec<_>, _>>()
        .inspect_err(|e| warn!(function = e.function(), error = %e, "Validation failed"))
}

fn validate_function(selected: TriggeredFunction<'_>) -> Result<ValidatedFunction<'_>, ConfigurationError> {
    let function = selected.function;
    let triggers = selected
        .triggers
        .into_iter()
        .map(|trigger| {
            trigger
                .delivery_stream_name()
                .map(|delivery_stream_name| ValidatedTrigger {
                    delivery_stream_name,
                    trigger,
                })
                .ok_or_else(|| {
                    ConfigurationError::missing_delivery_stream_name(&function.identifier)
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ValidatedFunction { function, triggers })
}

/// Number of triggers across all validated functions.
#[must_use]
pub fn trigger_count(functions: &[ValidatedFunction<'_>]) -> usize {
    functions.iter().map(|f| f.triggers.len()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::Trigger;

    fn definition() -> ServiceDefinition {
        ServiceDefinition::new("service", "env")
            .with_function(
                FunctionSpec::new("func1", "service-env-func1").with_trigger(Trigger::other("foo")),
            )
            .with_function(
                FunctionSpec::new("func2", "service-env-func2").with_trigger(Trigger::Firehose(
                    FirehoseTrigger::new("my-stream")
                        .with_number_of_retries("1")
                        .with_buffer_size_in_mbs("2")
                        .with_buffer_interval_in_seconds("900"),
                )),
            )
    }

    #[test]
    fn test_select_skips_functions_without_firehose() {
        let definition = definition();
        let selected = select_triggered_functions(&definition);

        assert_eq!(selected.len(), 1);
        assert_eq!(
            selected.first().map(|t| t.function.identifier.as_str()),
            Some("func2")
        );
    }

    #[test]
    fn test_select_preserves_order_and_filters_triggers() {
        let definition = ServiceDefinition::new("svc", "dev")
            .with_function(
                FunctionSpec::new("z", "svc-dev-z")
                    .with_trigger(Trigger::Firehose(FirehoseTrigger::new("s1")))
                    .with_trigger(Trigger::other("http"))
                    .with_trigger(Trigger::Firehose(FirehoseTrigger::new("s2"))),
            )
            .with_function(FunctionSpec::new("a", "svc-dev-a"))
            .with_function(
                FunctionSpec::new("m", "svc-dev-m")
                    .with_trigger(Trigger::Firehose(FirehoseTrigger::new("s3"))),
            );

        let selected = select_triggered_functions(&definition);
        let ids = selected.iter().map(|t| t.function.identifier.as_str()).collect_vec();
        assert_eq!(ids, vec!["z", "m"]);

        let streams = selected
            .first()
            .map(|t| t.triggers.iter().filter_map(|tr| tr.delivery_stream_name()).collect_vec())
            .unwrap_or_default();
        assert_eq!(streams, vec!["s1", "s2"]);
    }

    #[test]
    fn test_validate_accepts_valid_definition() -> Result<(), ConfigurationError> {
        let definition = definition();
        let validated = validate(&definition)?;

        assert_eq!(validated.len(), 1);
        assert_eq!(trigger_count(&validated), 1);
        let stream = validated
            .first()
            .and_then(|f| f.triggers.first())
            .map(|t| t.delivery_stream_name);
        assert_eq!(stream, Some("my-stream"));
        Ok(())
    }

    #[test]
    fn test_validate_rejects_missing_stream_name() {
        let definition = ServiceDefinition::new("service", "env").with_function(
            FunctionSpec::new("func2", "service-env-func2")
                .with_trigger(Trigger::Firehose(FirehoseTrigger::default().with_number_of_retries("1"))),
        );

        let result = validate(&definition);
        assert_eq!(
            result.err(),
            Some(ConfigurationError::missing_delivery_stream_name("func2"))
        );
    }

    #[test]
    fn test_validate_rejects_empty_stream_name() {
        let definition = ServiceDefinition::new("service", "env").with_function(
            FunctionSpec::new("func3", "service-env-func3")
                .with_trigger(Trigger::Firehose(FirehoseTrigger::new("ok")))
                .with_trigger(Trigger::Firehose(FirehoseTrigger::new(""))),
        );

        let result = validate(&definition);
        assert_eq!(result.err().map(|e| e.function().to_owned()), Some("func3".to_owned()));
    }

    #[test]
    fn test_validate_accepts_whitespace_stream_name() -> Result<(), ConfigurationError> {
        let definition = ServiceDefinition::new("service", "env").with_function(
            FunctionSpec::new("f", "service-env-f")
                .with_trigger(Trigger::Firehose(FirehoseTrigger::new("  "))),
        );

        let validated = validate(&definition)?;
        let stream = validated
            .first()
            .and_then(|f| f.triggers.first())
            .map(|t| t.delivery_stream_name);
        assert_eq!(stream, Some("  "));
        Ok(())
    }

    #[test]
    fn test_validate_reports_first_offender_in_order() {
        let definition = ServiceDefinition::new("svc", "dev")
            .with_function(
                FunctionSpec::new("good", "svc-dev-good")
                    .with_trigger(Trigger::Firehose(FirehoseTrigger::new("s"))),
            )
            .with_function(
                FunctionSpec::new("bad1", "svc-dev-bad1")
                    .with_trigger(Trigger::Firehose(FirehoseTrigger::default())),
            )
            .with_function(
                FunctionSpec::new("bad2", "svc-dev-bad2")
                    .with_trigger(Trigger::Firehose(FirehoseTrigger::default())),
            );

        let result = validate(&definition);
        assert_eq!(result.err().map(|e| e.function().to_owned()), Some("bad1".to_owned()));
    }

    #[test]
    fn test_non_firehose_triggers_are_never_validated() -> Result<(), ConfigurationError> {
        let definition = ServiceDefinition::new("svc", "dev")
            .with_function(FunctionSpec::new("f", "svc-dev-f").with_trigger(Trigger::other("sqs")));

        let validated = validate(&definition)?;
        assert!(validated.is_empty());
        Ok(())
    }
}
