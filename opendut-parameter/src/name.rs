use std::fmt::{Display, Formatter};
use std::ops::Not;

/// A `ParameterName` is an identifier for a parameter.
///
/// # Examples
/// ```
/// use opendut_parameter::ParameterName;
///
/// let parameter_name = ParameterName::try_from("motion_blur").expect("Valid parameter name");
/// ```
///
/// # Invariants
///
/// **Must not be empty:**
/// ```should_panic
/// # use opendut_parameter::ParameterName;
/// ParameterName::try_from("").unwrap();
/// ```
///
/// **Must only contain legal characters:**
/// ```should_panic
/// # use opendut_parameter::ParameterName;
/// ParameterName::try_from("motion blur").unwrap();
/// ```
/// See [`ALLOWED_CHARACTERS`] for all allowed characters.
///
/// [`ALLOWED_CHARACTERS`]: ParameterName::ALLOWED_CHARACTERS
///
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParameterName {
    value: String
}

impl ParameterName {
    pub const ALLOWED_CHARACTERS: &'static str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_-";

    pub fn as_str(&self) -> &str {
        self.value.as_str()
    }
}

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum InvalidParameterNameError {
    #[error("Parameter name must not be empty.")]
    Empty,
    #[error("Parameter name '{value}' contains the illegal character '{character}'.")]
    IllegalCharacter { value: String, character: char },
}

impl PartialEq<str> for ParameterName {
    fn eq(&self, other: &str) -> bool {
        self.value.eq(other)
    }
}

impl PartialEq<&str> for ParameterName {
    fn eq(&self, other: &&str) -> bool {
        self.value.eq(other)
    }
}

impl TryFrom<String> for ParameterName {
    type Error = InvalidParameterNameError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(InvalidParameterNameError::Empty);
        }
        if let Some(character) = value.chars().find(|char| Self::ALLOWED_CHARACTERS.contains(*char).not()) {
            return Err(InvalidParameterNameError::IllegalCharacter { value, character });
        }
        Ok(Self { value })
    }
}

impl TryFrom<&str> for ParameterName {
    type Error = InvalidParameterNameError;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_from(value.to_owned())
    }
}

impl From<ParameterName> for String {
    fn from(value: ParameterName) -> Self {
        value.value
    }
}

impl From<&ParameterName> for String {
    fn from(value: &ParameterName) -> Self {
        Clone::clone(&value.value)
    }
}

impl Display for ParameterName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}
