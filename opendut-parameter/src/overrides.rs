//! Current-value overrides for a tree of parameters, read from openDuT's layered configuration.
//!
//! Overrides live in a table of the configuration, `[parameters]` by default, which mirrors the
//! structure of a [`CompoundParameter`]:
//!
//! ```toml
//! [parameters]
//! camera = "top"
//!
//! [parameters.sampling]
//! samples = 32
//! ```
//!
//! Values are converted to the type of the target parameter's default value. Integers are widened
//! to floats, arrays of three numbers become vectors or colors and tables become compounds. Any
//! other mismatch, such as a float for an integer parameter or a number for a string parameter,
//! fails with [`OverrideError::Conversion`]. Applied overrides are assigned without validation.
//!
//! Configuration keys are lowercased when loaded. Parameters are therefore matched ignoring case,
//! but the member names of a compound value are taken from the configuration as they are, that is
//! in lowercase: an override `frameRange = 1` of a compound-valued parameter yields the member
//! `framerange`.

use std::collections::BTreeMap;

use config::{Config, ConfigError, FileFormat, ValueKind};
use tracing::{debug, warn};

use opendut_util::settings;

use crate::compound::{ChildParameter, CompoundParameter};
use crate::error::OverrideError;
use crate::value::{CompoundData, Value, ValueType};

pub const DEFAULT_TABLE: &str = "parameters";

#[derive(Clone, Debug, Default)]
pub struct ParameterOverrides {
    entries: BTreeMap<String, config::Value>,
}

/// Outcome of [`ParameterOverrides::apply`], listing dot-separated parameter paths.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppliedOverrides {
    pub applied: Vec<String>,
    pub unknown: Vec<String>,
}

impl ParameterOverrides {

    /// Reads the overrides stored in `table`. A missing table yields no overrides.
    pub fn from_config(config: &Config, table: &str) -> Result<Self, OverrideError> {
        match config.get_table(table) {
            Ok(entries) => Ok(Self {
                entries: entries.into_iter().collect(),
            }),
            Err(ConfigError::NotFound(_)) => {
                debug!("No parameter overrides found in table '{table}'.");
                Ok(Self::default())
            }
            Err(cause) => Err(OverrideError::Read {
                table: table.to_owned(),
                source: Box::new(cause),
            }),
        }
    }

    /// Loads the configuration of the application `name` and reads the overrides from its
    /// `[parameters]` table. See [`settings::load_config`] for the sources taken into account.
    pub fn load(name: &str, defaults: &str) -> Result<Self, OverrideError> {
        let loaded = settings::load_config(name, defaults, FileFormat::Toml, Config::default())?;
        debug!("Loaded parameter overrides for '{name}' from: {:?}", loaded.config_files_used);
        Self::from_config(&loaded.config, DEFAULT_TABLE)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Assigns the overrides to the matching parameters of `target`.
    ///
    /// Parameter names are matched case-insensitively, since configuration keys are lowercased.
    /// Overrides which match no parameter are skipped and reported as unknown.
    pub fn apply(&self, target: &mut CompoundParameter) -> Result<AppliedOverrides, OverrideError> {
        let mut outcome = AppliedOverrides::default();
        apply_table(self.entries.iter(), target, "", &mut outcome)?;
        Ok(outcome)
    }
}

fn apply_table<'a>(
    entries: impl Iterator<Item = (&'a String, &'a config::Value)>,
    target: &mut CompoundParameter,
    prefix: &str,
    outcome: &mut AppliedOverrides,
) -> Result<(), OverrideError> {

    for (key, value) in entries {
        let child = target.iter_mut()
            .find(|child| child.name().as_str().eq_ignore_ascii_case(key));

        let name = child.as_ref().map_or(key.as_str(), |child| child.name().as_str());
        let path = if prefix.is_empty() {
            name.to_owned()
        } else {
            format!("{prefix}.{name}")
        };

        match child {
            None => {
                warn!("Ignoring override for unknown parameter '{path}'.");
                outcome.unknown.push(path);
            }
            Some(ChildParameter::Compound(compound)) => {
                let ValueKind::Table(entries) = &value.kind else {
                    return Err(OverrideError::Conversion { reason: unexpected("a table", value), path });
                };
                let entries = entries.iter().collect::<BTreeMap<_, _>>();
                apply_table(entries.into_iter(), compound, &path, outcome)?;
            }
            Some(ChildParameter::Parameter(parameter)) => {
                let converted = match convert(value, parameter.default_value().value_type()) {
                    Ok(converted) => converted,
                    Err(reason) => return Err(OverrideError::Conversion { path, reason }),
                };
                debug!("Overriding parameter '{path}' with {converted:?}.");
                parameter.set_value(converted);
                outcome.applied.push(path);
            }
        }
    }
    Ok(())
}

fn convert(value: &config::Value, target: ValueType) -> Result<Value, String> {
    let converted = match target {
        ValueType::Bool => Value::Bool(boolean(value)?),
        ValueType::Int => Value::Int(integer(value)?),
        ValueType::Float => Value::Float(float(value)?),
        ValueType::String => Value::String(string(value)?),
        ValueType::Vector3 => Value::Vector3(triple(value)?),
        ValueType::Color3 => Value::Color3(triple(value)?),
        ValueType::IntVector => Value::IntVector(elements(value, integer)?),
        ValueType::FloatVector => Value::FloatVector(elements(value, float)?),
        ValueType::StringVector => Value::StringVector(elements(value, string)?),
        ValueType::Compound => match &value.kind {
            ValueKind::Table(_) => infer(value)?,
            _ => return Err(unexpected("a table", value)),
        },
    };
    Ok(converted)
}

fn describe(kind: &ValueKind) -> &'static str {
    match kind {
        ValueKind::Nil => "nothing",
        ValueKind::Boolean(_) => "a boolean",
        ValueKind::I64(_) | ValueKind::I128(_) | ValueKind::U64(_) | ValueKind::U128(_) => "an integer",
        ValueKind::Float(_) => "a float",
        ValueKind::String(_) => "a string",
        ValueKind::Table(_) => "a table",
        ValueKind::Array(_) => "an array",
    }
}

fn unexpected(expected: &str, value: &config::Value) -> String {
    format!("Expected {expected}, got {}.", describe(&value.kind))
}

fn out_of_range(value: impl std::fmt::Display) -> String {
    format!("Integer {value} does not fit into 64 bits.")
}

fn boolean(value: &config::Value) -> Result<bool, String> {
    match &value.kind {
        ValueKind::Boolean(value) => Ok(*value),
        _ => Err(unexpected("a boolean", value)),
    }
}

fn integer(value: &config::Value) -> Result<i64, String> {
    match &value.kind {
        ValueKind::I64(value) => Ok(*value),
        ValueKind::I128(value) => i64::try_from(*value).map_err(|_| out_of_range(value)),
        ValueKind::U64(value) => i64::try_from(*value).map_err(|_| out_of_range(value)),
        ValueKind::U128(value) => i64::try_from(*value).map_err(|_| out_of_range(value)),
        _ => Err(unexpected("an integer", value)),
    }
}

/// Integers are widened.
fn float(value: &config::Value) -> Result<f64, String> {
    match &value.kind {
        ValueKind::Float(value) => Ok(*value),
        ValueKind::I64(_) | ValueKind::I128(_) | ValueKind::U64(_) | ValueKind::U128(_) => {
            integer(value).map(|value| value as f64)
        }
        _ => Err(unexpected("a number", value)),
    }
}

fn string(value: &config::Value) -> Result<String, String> {
    match &value.kind {
        ValueKind::String(value) => Ok(Clone::clone(value)),
        _ => Err(unexpected("a string", value)),
    }
}

fn elements<T>(value: &config::Value, element: fn(&config::Value) -> Result<T, String>) -> Result<Vec<T>, String> {
    match &value.kind {
        ValueKind::Array(values) => values.iter().map(element).collect(),
        _ => Err(unexpected("an array", value)),
    }
}

fn triple(value: &config::Value) -> Result<[f64; 3], String> {
    let components = elements(value, float)?;
    <[f64; 3]>::try_from(components)
        .map_err(|components| format!("Expected 3 components, got {}.", components.len()))
}

/// Converts a value of a compound member, whose type is only known from the configuration.
fn infer(value: &config::Value) -> Result<Value, String> {
    let inferred = match &value.kind {
        ValueKind::Nil => return Err(String::from("Value is empty.")),
        ValueKind::Boolean(value) => Value::Bool(*value),
        ValueKind::I64(_) | ValueKind::I128(_) | ValueKind::U64(_) | ValueKind::U128(_) => Value::Int(integer(value)?),
        ValueKind::Float(value) => Value::Float(*value),
        ValueKind::String(value) => Value::String(Clone::clone(value)),
        ValueKind::Table(members) => Value::Compound(members.iter()
            .map(|(key, value)| infer(value).map(|value| (Clone::clone(key), value)))
            .collect::<Result<CompoundData, _>>()?),
        ValueKind::Array(values) => infer_array(values)?,
    };
    Ok(inferred)
}

fn infer_array(values: &[config::Value]) -> Result<Value, String> {
    let all_ints = values.iter().all(|value| matches!(value.kind, ValueKind::I64(_)));
    let all_numbers = values.iter().all(|value| matches!(value.kind, ValueKind::I64(_) | ValueKind::Float(_)));

    let inferred = if all_ints {
        Value::IntVector(values.iter().map(integer).collect::<Result<_, _>>()?)
    } else if all_numbers {
        Value::FloatVector(values.iter().map(float).collect::<Result<_, _>>()?)
    } else {
        Value::StringVector(values.iter().map(string).collect::<Result<_, _>>()?)
    };
    Ok(inferred)
}
