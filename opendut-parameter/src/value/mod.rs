use std::fmt;

use crate::ShortName;

mod compound;
pub use compound::CompoundData;

/// A value held by a parameter.
///
/// Values are plain data: cloning produces an independent deep copy and equality is structural.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Vector3([f64; 3]),
    Color3([f64; 3]),
    IntVector(Vec<i64>),
    FloatVector(Vec<f64>),
    StringVector(Vec<String>),
    Compound(CompoundData),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    Bool,
    Int,
    Float,
    String,
    Vector3,
    Color3,
    IntVector,
    FloatVector,
    StringVector,
    Compound,
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::String(_) => ValueType::String,
            Value::Vector3(_) => ValueType::Vector3,
            Value::Color3(_) => ValueType::Color3,
            Value::IntVector(_) => ValueType::IntVector,
            Value::FloatVector(_) => ValueType::FloatVector,
            Value::StringVector(_) => ValueType::StringVector,
            Value::Compound(_) => ValueType::Compound,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&CompoundData> {
        match self {
            Value::Compound(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_compound_mut(&mut self) -> Option<&mut CompoundData> {
        match self {
            Value::Compound(value) => Some(value),
            _ => None,
        }
    }

    /// Whether a NaN occurs anywhere in the value. Such a value is not equal to itself.
    pub fn contains_nan(&self) -> bool {
        match self {
            Value::Float(value) => value.is_nan(),
            Value::Vector3(components) | Value::Color3(components) => components.iter().any(|component| component.is_nan()),
            Value::FloatVector(values) => values.iter().any(|value| value.is_nan()),
            Value::Compound(members) => members.iter().any(|(_, value)| value.contains_nan()),
            Value::Bool(_) | Value::Int(_) | Value::String(_) | Value::IntVector(_) | Value::StringVector(_) => false,
        }
    }
}

impl ShortName for ValueType {
    fn short_name(&self) -> &'static str {
        match self {
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::String => "string",
            ValueType::Vector3 => "vector3",
            ValueType::Color3 => "color3",
            ValueType::IntVector => "int-vector",
            ValueType::FloatVector => "float-vector",
            ValueType::StringVector => "string-vector",
            ValueType::Compound => "compound",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<i64>> for Value {
    fn from(value: Vec<i64>) -> Self {
        Value::IntVector(value)
    }
}

impl From<Vec<f64>> for Value {
    fn from(value: Vec<f64>) -> Self {
        Value::FloatVector(value)
    }
}

impl From<Vec<String>> for Value {
    fn from(value: Vec<String>) -> Self {
        Value::StringVector(value)
    }
}

impl From<CompoundData> for Value {
    fn from(value: CompoundData) -> Self {
        Value::Compound(value)
    }
}
