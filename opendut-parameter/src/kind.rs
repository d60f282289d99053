//! Kind-specific validation rules.
//!
//! Every [`Parameter`](crate::Parameter) carries a [`ParameterKind`]. The base parameter only
//! enforces its preset policy and hands every other check to [`ParameterKind::check`].

use std::fmt::Display;
use std::ops::Not;

use crate::value::{Value, ValueType};

#[derive(Clone, Debug, Default, PartialEq)]
pub enum ParameterKind {
    /// Accepts any value.
    #[default]
    Any,
    Bool,
    Int(NumericRange<i64>),
    Float(NumericRange<f64>),
    String {
        /// Maximum number of characters.
        max_length: Option<usize>,
    },
    /// A string restricted to a fixed set of variants.
    Enum {
        variants: Vec<String>,
    },
    Vector3,
    Color3,
    IntVector,
    FloatVector,
    StringVector,
    Compound,
}

/// Inclusive bounds for numeric parameters. Absent bounds are not checked.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NumericRange<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T> NumericRange<T> {

    pub fn unbounded() -> Self {
        Self { min: None, max: None }
    }

    pub fn between(min: T, max: T) -> Self {
        Self { min: Some(min), max: Some(max) }
    }

    pub fn at_least(min: T) -> Self {
        Self { min: Some(min), max: None }
    }

    pub fn at_most(max: T) -> Self {
        Self { min: None, max: Some(max) }
    }
}

impl<T: PartialOrd + Display + Copy> NumericRange<T> {

    fn check(&self, value: T) -> Result<(), String> {
        if let Some(min) = self.min {
            if value < min {
                return Err(format!("Value {value} is less than the minimum of {min}."));
            }
        }
        if let Some(max) = self.max {
            if value > max {
                return Err(format!("Value {value} is greater than the maximum of {max}."));
            }
        }
        Ok(())
    }

    fn configuration_error(&self) -> Option<String> {
        match (self.min, self.max) {
            (Some(min), Some(max)) if (min <= max).not() => {
                Some(format!("Minimum {min} is not less than or equal to maximum {max}."))
            }
            _ => None,
        }
    }
}

impl ParameterKind {

    pub fn string() -> Self {
        ParameterKind::String { max_length: None }
    }

    pub fn enumeration<V: Into<String>>(variants: impl IntoIterator<Item = V>) -> Self {
        ParameterKind::Enum {
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }

    /// The value type this kind requires, or `None` for [`ParameterKind::Any`].
    pub fn expected_type(&self) -> Option<ValueType> {
        match self {
            ParameterKind::Any => None,
            ParameterKind::Bool => Some(ValueType::Bool),
            ParameterKind::Int(_) => Some(ValueType::Int),
            ParameterKind::Float(_) => Some(ValueType::Float),
            ParameterKind::String { .. } => Some(ValueType::String),
            ParameterKind::Enum { .. } => Some(ValueType::String),
            ParameterKind::Vector3 => Some(ValueType::Vector3),
            ParameterKind::Color3 => Some(ValueType::Color3),
            ParameterKind::IntVector => Some(ValueType::IntVector),
            ParameterKind::FloatVector => Some(ValueType::FloatVector),
            ParameterKind::StringVector => Some(ValueType::StringVector),
            ParameterKind::Compound => Some(ValueType::Compound),
        }
    }

    /// Checks a value against this kind. The error is a human-readable reason.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        if let Some(expected) = self.expected_type() {
            let actual = value.value_type();
            if actual != expected {
                return Err(type_mismatch_reason(expected, actual));
            }
        }

        match (self, value) {
            (ParameterKind::Int(range), Value::Int(value)) => range.check(*value),
            (ParameterKind::Float(range), Value::Float(value)) => {
                if value.is_nan() {
                    return Err(String::from("Value is not a number."));
                }
                range.check(*value)
            }
            (ParameterKind::String { max_length: Some(max_length) }, Value::String(value)) => {
                let length = value.chars().count();
                if length > *max_length {
                    Err(format!("Value '{value}' is too long. Expected at most {max_length} characters, got {length}."))
                } else {
                    Ok(())
                }
            }
            (ParameterKind::Enum { variants }, Value::String(value)) => {
                if variants.iter().any(|variant| variant == value) {
                    Ok(())
                } else {
                    Err(format!("Value '{value}' is not one of: {}.", variants.join(", ")))
                }
            }
            _ => Ok(()),
        }
    }

    /// Describes why no value could ever satisfy this kind, if that is the case.
    pub(crate) fn configuration_error(&self) -> Option<String> {
        match self {
            ParameterKind::Int(range) => range.configuration_error(),
            ParameterKind::Float(range) => range.configuration_error(),
            ParameterKind::Enum { variants } if variants.is_empty() => {
                Some(String::from("An enum parameter requires at least one variant."))
            }
            _ => None,
        }
    }
}

pub(crate) fn type_mismatch_reason(expected: ValueType, actual: ValueType) -> String {
    format!("Expected a value of type '{expected}', got '{actual}'.")
}
