//! Service definition model and loader.
//!
//! A service definition is the already-declared shape of a deployment:
//! functions keyed by identifier, each with an ordered list of event
//! triggers. Trigger kinds are decided here, at load time, so the scanner
//! only ever matches on [`Trigger`] variants.
//!
//! Function order is document order and is preserved end to end.

use std::fmt;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use tracing::debug;

use crate::error::{Error, Result};

/// Stage used when neither the caller nor the definition names one.
pub const DEFAULT_STAGE: &str = "dev";

/// Event key that marks a Kinesis Firehose trigger.
pub const FIREHOSE_KIND: &str = "firehose";

/// Optional processor tuning keys a firehose trigger may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TuningKey {
    NumberOfRetries,
    BufferSizeInMBs,
    BufferIntervalInSeconds,
}

impl TuningKey {
    /// All keys, in the order they are forwarded to the processor.
    pub const ALL: [Self; 3] = [
        Self::NumberOfRetries,
        Self::BufferSizeInMBs,
        Self::BufferIntervalInSeconds,
    ];

    /// Key as written in the service definition.
    #[must_use]
    pub const fn definition_key(self) -> &'static str {
        match self {
            Self::NumberOfRetries => "numberOfRetries",
            Self::BufferSizeInMBs => "bufferSizeInMBs",
            Self::BufferIntervalInSeconds => "bufferIntervalInSeconds",
        }
    }
}

impl fmt::Display for TuningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.definition_key())
    }
}

/// Body of a `firehose` event.
///
/// `delivery_stream_name` stays optional here so validation can name the
/// offending function instead of failing the whole parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FirehoseTrigger {
    #[serde(rename = "deliveryStreamName", default, deserialize_with = "scalar::deserialize")]
    pub delivery_stream_name: Option<String>,

    #[serde(rename = "numberOfRetries", default, deserialize_with = "scalar::deserialize")]
    pub number_of_retries: Option<String>,

    #[serde(rename = "bufferSizeInMBs", default, deserialize_with = "scalar::deserialize")]
    pub buffer_size_in_mbs: Option<String>,

    #[serde(
        rename = "bufferIntervalInSeconds",
        default,
        deserialize_with = "scalar::deserialize"
    )]
    pub buffer_interval_in_seconds: Option<String>,
}

impl FirehoseTrigger {
    /// Create a trigger targeting the given delivery stream.
    pub fn new(delivery_stream_name: impl Into<String>) -> Self {
        Self {
            delivery_stream_name: Some(delivery_stream_name.into()),
            ..Self::default()
        }
    }

    /// Set the processor retry count.
    #[must_use]
    pub fn with_number_of_retries(mut self, value: impl Into<String>) -> Self {
        self.number_of_retries = Some(value.into());
        self
    }

    /// Set the processor buffer size.
    #[must_use]
    pub fn with_buffer_size_in_mbs(mut self, value: impl Into<String>) -> Self {
        self.buffer_size_in_mbs = Some(value.into());
        self
    }

    /// Set the processor buffer interval.
    #[must_use]
    pub fn with_buffer_interval_in_seconds(mut self, value: impl Into<String>) -> Self {
        self.buffer_interval_in_seconds = Some(value.into());
        self
    }

    /// Delivery stream name, if present and non-empty.
    #[must_use]
    pub fn delivery_stream_name(&self) -> Option<&str> {
        self.delivery_stream_name
            .as_deref()
            .filter(|name| !name.is_empty())
    }

    /// Value of a single tuning key.
    #[must_use]
    pub fn tuning_value(&self, key: TuningKey) -> Option<&str> {
        match key {
            TuningKey::NumberOfRetries => self.number_of_retries.as_deref(),
            TuningKey::BufferSizeInMBs => self.buffer_size_in_mbs.as_deref(),
            TuningKey::BufferIntervalInSeconds => self.buffer_interval_in_seconds.as_deref(),
        }
    }

    /// Present tuning values in [`TuningKey::ALL`] order.
    pub fn tuning(&self) -> impl Iterator<Item = (TuningKey, &str)> + '_ {
        TuningKey::ALL
            .into_iter()
            .filter_map(|key| self.tuning_value(key).map(|value| (key, value)))
    }
}

/// One event entry on a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    Firehose(FirehoseTrigger),
    /// Any event source this tool does not manage.
    Other { kind: String },
}

impl Trigger {
    /// Create a trigger of an unmanaged kind.
    pub fn other(kind: impl Into<String>) -> Self {
        Self::Other { kind: kind.into() }
    }

    /// Event key of this trigger.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Firehose(_) => FIREHOSE_KIND,
            Self::Other { kind } => kind,
        }
    }

    #[must_use]
    pub const fn as_firehose(&self) -> Option<&FirehoseTrigger> {
        match self {
            Self::Firehose(trigger) => Some(trigger),
            Self::Other { .. } => None,
        }
    }

    fn from_bare_kind(kind: &str) -> Self {
        if kind == FIREHOSE_KIND {
            Self::Firehose(FirehoseTrigger::default())
        } else {
            Self::other(kind)
        }
    }
}

impl<'de> Deserialize<'de> for Trigger {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(TriggerVisitor)
    }
}

struct TriggerVisitor;

impl<'de> Visitor<'de> for TriggerVisitor {
    type Value = Trigger;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an event name or a single-key event mapping")
    }

    fn visit_str<E: de::Error>(self, kind: &str) -> std::result::Result<Trigger, E> {
        Ok(Trigger::from_bare_kind(kind))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Trigger, A::Error> {
        let kind: String = map
            .next_key()?
            .ok_or_else(|| <A::Error as de::Error>::invalid_length(0, &self))?;

        let trigger = if kind == FIREHOSE_KIND {
            // `- firehose:` with no body parses as null
            Trigger::Firehose(map.next_value::<Option<FirehoseTrigger>>()?.unwrap_or_default())
        } else {
            map.next_value::<IgnoredAny>()?;
            Trigger::Other { kind }
        };

        if let Some(extra) = map.next_key::<String>()? {
            return Err(de::Error::custom(format!(
                "event entry must have exactly one key, found '{}' and '{extra}'",
                trigger.kind()
            )));
        }

        Ok(trigger)
    }
}

/// A deployable function and its declared triggers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSpec {
    /// Key of the function in the definition.
    pub identifier: String,
    /// Deployed name used to look the function up remotely.
    pub resource_name: String,
    pub triggers: Vec<Trigger>,
}

impl FunctionSpec {
    /// Create a function without triggers.
    pub fn new(identifier: impl Into<String>, resource_name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            resource_name: resource_name.into(),
            triggers: Vec::new(),
        }
    }

    /// Append a trigger.
    #[must_use]
    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.triggers.push(trigger);
        self
    }

    /// Firehose triggers in declaration order.
    pub fn firehose_triggers(&self) -> impl Iterator<Item = &FirehoseTrigger> {
        self.triggers.iter().filter_map(Trigger::as_firehose)
    }
}

/// The full service definition, read-only to this crate's consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDefinition {
    service: String,
    stage: String,
    functions: IndexMap<String, FunctionSpec>,
}

impl ServiceDefinition {
    /// Create an empty definition.
    pub fn new(service: impl Into<String>, stage: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            stage: stage.into(),
            functions: IndexMap::new(),
        }
    }

    /// Add a function, replacing any previous one with the same identifier.
    #[must_use]
    pub fn with_function(mut self, function: FunctionSpec) -> Self {
        self.functions.insert(function.identifier.clone(), function);
        self
    }

    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    #[must_use]
    pub fn stage(&self) -> &str {
        &self.stage
    }

    /// Functions in definition order.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionSpec> {
        self.functions.values()
    }

    #[must_use]
    pub fn function(&self, identifier: &str) -> Option<&FunctionSpec> {
        self.functions.get(identifier)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Parse a YAML service definition.
    ///
    /// `stage` overrides `provider.stage`; when both are absent the stage is
    /// [`DEFAULT_STAGE`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::YamlParseFailed`] for malformed documents and
    /// [`Error::InvalidDefinition`] for an empty service name.
    pub fn from_yaml_str(text: &str, stage: Option<&str>) -> Result<Self> {
        let raw: RawService =
            serde_yaml::from_str(text).map_err(|e| Error::yaml_parse_failed(e.to_string()))?;
        Self::from_raw(raw, stage)
    }

    /// Parse a JSON service definition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::JsonParseFailed`] for malformed documents and
    /// [`Error::InvalidDefinition`] for an empty service name.
    pub fn from_json_str(text: &str, stage: Option<&str>) -> Result<Self> {
        let raw: RawService =
            serde_json::from_str(text).map_err(|e| Error::json_parse_failed(e.to_string()))?;
        Self::from_raw(raw, stage)
    }

    /// Load a definition from disk. `.json` files are parsed as JSON,
    /// everything else as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileReadFailed`] if the file cannot be read, or any
    /// parse error from the matching format.
    pub fn from_path(path: &Path, stage: Option<&str>) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::file_read_failed(path, e.to_string()))?;

        let definition = if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&text, stage)?
        } else {
            Self::from_yaml_str(&text, stage)?
        };

        debug!(
            path = %path.display(),
            service = %definition.service,
            stage = %definition.stage,
            functions = definition.len(),
            "Loaded service definition"
        );

        Ok(definition)
    }

    fn from_raw(raw: RawService, stage: Option<&str>) -> Result<Self> {
        let service = raw.service.into_name();
        if service.trim().is_empty() {
            return Err(Error::invalid_definition("service name must not be empty"));
        }

        let stage = stage
            .map(str::to_owned)
            .or_else(|| raw.provider.and_then(|p| p.stage))
            .unwrap_or_else(|| DEFAULT_STAGE.to_owned());

        let functions = raw
            .functions
            .unwrap_or_default()
            .into_iter()
            .map(|(identifier, function)| {
                let resource_name = function
                    .name
                    .unwrap_or_else(|| format!("{service}-{stage}-{identifier}"));
                let spec = FunctionSpec {
                    identifier: identifier.clone(),
                    resource_name,
                    triggers: function.events.unwrap_or_default(),
                };
                (identifier, spec)
            })
            .collect();

        Ok(Self {
            service,
            stage,
            functions,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawService {
    service: RawServiceName,
    #[serde(default)]
    provider: Option<RawProvider>,
    #[serde(default)]
    functions: Option<IndexMap<String, RawFunction>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawServiceName {
    Name(String),
    Detailed { name: String },
}

impl RawServiceName {
    fn into_name(self) -> String {
        match self {
            Self::Name(name) | Self::Detailed { name } => name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawProvider {
    #[serde(default)]
    stage: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawFunction {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    events: Option<Vec<Trigger>>,
}

/// Tuning values are opaque strings, but YAML authors write `900`, not `"900"`.
mod scalar {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
        Flag(bool),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        Option::<Scalar>::deserialize(deserializer).map(|value| {
            value.map(|scalar| match scalar {
                Scalar::Text(text) => text,
                Scalar::Unsigned(n) => n.to_string(),
                Scalar::Signed(n) => n.to_string(),
                Scalar::Float(n) => n.to_string(),
                Scalar::Flag(b) => b.to_string(),
            })
        })
    }
}
