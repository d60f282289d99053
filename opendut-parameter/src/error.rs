use config::ConfigError;
use opendut_util::settings::LoadError;

use crate::name::InvalidParameterNameError;

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
#[error("Parameter '{parameter}' is invalid: {reason}")]
pub struct ValidationError {
    pub parameter: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }
}

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum LookupError {
    #[error("Parameter '{parameter}' has no preset named '{preset}'.")]
    PresetNotFound { parameter: String, preset: String },
    #[error("Parameter '{parameter}' has no child parameter named '{child}'.")]
    ChildNotFound { parameter: String, child: String },
}

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Illegal parameter name: {0}")]
    IllegalName(#[from] InvalidParameterNameError),
    #[error("Parameter '{parameter}' only accepts presets, but no presets were given.")]
    PresetsOnlyWithoutPresets { parameter: String },
    #[error("Default value of parameter '{parameter}' is invalid: {reason}")]
    InvalidDefault { parameter: String, reason: String },
    #[error("Kind of parameter '{parameter}' can never be satisfied: {reason}")]
    InvalidKind { parameter: String, reason: String },
    #[error("Preset '{preset}' of parameter '{parameter}' contains NaN and can never be selected, since the parameter only accepts presets.")]
    UnmatchablePreset { parameter: String, preset: String },
    #[error("Parameter '{parameter}' already has a child parameter named '{child}'.")]
    DuplicateChild { parameter: String, child: String },
}

#[derive(thiserror::Error, Debug)]
pub enum OverrideError {
    #[error("Failed to load parameter overrides: {0}")]
    Load(#[from] LoadError),
    #[error("Failed to read parameter overrides from table '{table}'.")]
    Read { table: String, #[source] source: Box<ConfigError> },
    #[error("Override for parameter '{path}' could not be converted: {reason}")]
    Conversion { path: String, reason: String },
}
