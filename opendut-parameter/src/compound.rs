use std::slice::{Iter, IterMut};

use tracing::debug;

use crate::error::{ConfigurationError, LookupError, ValidationError};
use crate::kind::type_mismatch_reason;
use crate::name::ParameterName;
use crate::parameter::Parameter;
use crate::user_data::UserData;
use crate::value::{CompoundData, Value, ValueType};

/// A parameter made up of named child parameters.
///
/// The value of a `CompoundParameter` is a [`Value::Compound`] holding one member per child, in
/// which nested compound parameters contribute nested compound values.
#[derive(Debug)]
pub struct CompoundParameter {
    name: ParameterName,
    description: String,
    children: Vec<ChildParameter>,
    user_data: UserData,
}

#[derive(Debug)]
pub enum ChildParameter {
    Parameter(Parameter),
    Compound(CompoundParameter),
}

/// A failed check, located by the dot-separated path of the offending child.
struct Invalid {
    path: String,
    reason: String,
}

impl Invalid {
    fn here(reason: String) -> Self {
        Self { path: String::new(), reason }
    }

    fn within(self, name: &ParameterName) -> Self {
        let path = if self.path.is_empty() {
            String::from(name)
        } else {
            format!("{name}.{}", self.path)
        };
        Self { path, reason: self.reason }
    }

    fn into_reason(self) -> String {
        if self.path.is_empty() {
            self.reason
        } else {
            format!("{}: {}", self.path, self.reason)
        }
    }
}

impl CompoundParameter {

    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Result<Self, ConfigurationError> {
        Ok(Self {
            name: ParameterName::try_from(name.into())?,
            description: description.into(),
            children: Vec::new(),
            user_data: UserData::new(),
        })
    }

    pub fn with_user_data(mut self, user_data: UserData) -> Self {
        self.user_data = user_data;
        self
    }

    pub fn with_parameters<C>(mut self, children: impl IntoIterator<Item = C>) -> Result<Self, ConfigurationError>
    where
        C: Into<ChildParameter>,
    {
        for child in children {
            self.add_parameter(child)?;
        }
        Ok(self)
    }

    pub fn name(&self) -> &ParameterName {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn add_parameter(&mut self, child: impl Into<ChildParameter>) -> Result<(), ConfigurationError> {
        let child = child.into();
        if self.parameter(child.name().as_str()).is_some() {
            return Err(ConfigurationError::DuplicateChild {
                parameter: String::from(&self.name),
                child: String::from(child.name()),
            });
        }
        self.children.push(child);
        Ok(())
    }

    pub fn remove_parameter(&mut self, name: &str) -> Result<ChildParameter, LookupError> {
        let index = self.children.iter()
            .position(|child| child.name() == name)
            .ok_or_else(|| LookupError::ChildNotFound {
                parameter: String::from(&self.name),
                child: name.to_owned(),
            })?;
        Ok(self.children.remove(index))
    }

    pub fn parameter(&self, name: &str) -> Option<&ChildParameter> {
        self.children.iter().find(|child| child.name() == name)
    }

    pub fn parameter_mut(&mut self, name: &str) -> Option<&mut ChildParameter> {
        self.children.iter_mut().find(|child| child.name() == name)
    }

    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|child| child.name().as_str())
    }

    pub fn iter(&self) -> Iter<'_, ChildParameter> {
        self.children.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, ChildParameter> {
        self.children.iter_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn default_value(&self) -> Value {
        Value::Compound(self.children.iter()
            .map(|child| (String::from(child.name()), child.default_value()))
            .collect())
    }

    pub fn get_value(&self) -> Value {
        Value::Compound(self.children.iter()
            .map(|child| (String::from(child.name()), child.get_value()))
            .collect())
    }

    pub fn get_validated_value(&self) -> Result<Value, ValidationError> {
        self.validate()?;
        Ok(self.get_value())
    }

    /// Routes each member of a compound value to the child of the same name.
    ///
    /// Children without a matching member keep their value. Members which match no child are
    /// ignored. Values are not validated, but members addressing a nested compound parameter must
    /// be compounds themselves. This is checked before anything is assigned, so a failed call
    /// leaves every child unchanged.
    pub fn set_value(&mut self, value: Value) -> Result<(), ValidationError> {
        let members = match value {
            Value::Compound(members) => members,
            other => {
                let reason = type_mismatch_reason(ValueType::Compound, other.value_type());
                return Err(ValidationError::new(&self.name, reason));
            }
        };
        self.check_shape(&members)
            .map_err(|invalid| ValidationError::new(&self.name, invalid.into_reason()))?;
        self.assign(members);
        Ok(())
    }

    /// Validates the current value of every child, stopping at the first failure.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.check_current()
            .map_err(|invalid| ValidationError::new(&self.name, invalid.into_reason()))
    }

    pub fn validate_value(&self, value: &Value) -> Result<(), ValidationError> {
        let (valid, reason) = self.value_valid(value);
        if valid {
            Ok(())
        } else {
            Err(ValidationError::new(&self.name, reason))
        }
    }

    /// Returns `(true, "")` if `value` is valid, otherwise `false` and the reason.
    ///
    /// A valid value is a compound with exactly one valid member per child.
    pub fn value_valid(&self, value: &Value) -> (bool, String) {
        match self.check(value) {
            Ok(()) => (true, String::new()),
            Err(invalid) => (false, invalid.into_reason()),
        }
    }

    /// Returns a handle to the shared user data. No copy is made.
    pub fn user_data(&self) -> UserData {
        Clone::clone(&self.user_data)
    }

    fn check(&self, value: &Value) -> Result<(), Invalid> {
        let members = value.as_compound()
            .ok_or_else(|| Invalid::here(type_mismatch_reason(ValueType::Compound, value.value_type())))?;

        for child in &self.children {
            let member = members.get(child.name().as_str())
                .ok_or_else(|| Invalid::here(format!("Member '{}' is missing.", child.name())))?;
            child.check(member)?;
        }

        if let Some(unknown) = members.keys().find(|member| self.parameter(member).is_none()) {
            return Err(Invalid::here(format!("Member '{unknown}' matches no child parameter.")));
        }
        Ok(())
    }

    fn check_shape(&self, members: &CompoundData) -> Result<(), Invalid> {
        for (member, value) in members {
            if let Some(ChildParameter::Compound(compound)) = self.parameter(member) {
                let checked = match value.as_compound() {
                    Some(nested) => compound.check_shape(nested),
                    None => Err(Invalid::here(type_mismatch_reason(ValueType::Compound, value.value_type()))),
                };
                checked.map_err(|invalid| invalid.within(compound.name()))?;
            }
        }
        Ok(())
    }

    fn assign(&mut self, members: CompoundData) {
        for (member, value) in members {
            match self.parameter_mut(&member) {
                Some(ChildParameter::Parameter(parameter)) => parameter.set_value(value),
                Some(ChildParameter::Compound(compound)) => {
                    if let Value::Compound(nested) = value {
                        compound.assign(nested);
                    }
                }
                None => debug!("Ignoring member '{member}', which matches no child of parameter '{}'.", self.name),
            }
        }
    }

    fn check_current(&self) -> Result<(), Invalid> {
        self.children.iter()
            .try_for_each(ChildParameter::check_current)
    }
}

impl ChildParameter {

    pub fn name(&self) -> &ParameterName {
        match self {
            ChildParameter::Parameter(parameter) => parameter.name(),
            ChildParameter::Compound(compound) => compound.name(),
        }
    }

    pub fn description(&self) -> &str {
        match self {
            ChildParameter::Parameter(parameter) => parameter.description(),
            ChildParameter::Compound(compound) => compound.description(),
        }
    }

    pub fn default_value(&self) -> Value {
        match self {
            ChildParameter::Parameter(parameter) => parameter.default_value(),
            ChildParameter::Compound(compound) => compound.default_value(),
        }
    }

    pub fn get_value(&self) -> Value {
        match self {
            ChildParameter::Parameter(parameter) => parameter.get_value(),
            ChildParameter::Compound(compound) => compound.get_value(),
        }
    }

    pub fn set_value(&mut self, value: Value) -> Result<(), ValidationError> {
        match self {
            ChildParameter::Parameter(parameter) => {
                parameter.set_value(value);
                Ok(())
            }
            ChildParameter::Compound(compound) => compound.set_value(value),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            ChildParameter::Parameter(parameter) => parameter.validate(),
            ChildParameter::Compound(compound) => compound.validate(),
        }
    }

    pub fn user_data(&self) -> UserData {
        match self {
            ChildParameter::Parameter(parameter) => parameter.user_data(),
            ChildParameter::Compound(compound) => compound.user_data(),
        }
    }

    pub fn as_parameter(&self) -> Option<&Parameter> {
        match self {
            ChildParameter::Parameter(parameter) => Some(parameter),
            ChildParameter::Compound(_) => None,
        }
    }

    pub fn as_parameter_mut(&mut self) -> Option<&mut Parameter> {
        match self {
            ChildParameter::Parameter(parameter) => Some(parameter),
            ChildParameter::Compound(_) => None,
        }
    }

    pub fn as_compound(&self) -> Option<&CompoundParameter> {
        match self {
            ChildParameter::Parameter(_) => None,
            ChildParameter::Compound(compound) => Some(compound),
        }
    }

    pub fn as_compound_mut(&mut self) -> Option<&mut CompoundParameter> {
        match self {
            ChildParameter::Parameter(_) => None,
            ChildParameter::Compound(compound) => Some(compound),
        }
    }

    fn check(&self, value: &Value) -> Result<(), Invalid> {
        let checked = match self {
            ChildParameter::Parameter(parameter) => parameter.check(value).map_err(Invalid::here),
            ChildParameter::Compound(compound) => compound.check(value),
        };
        checked.map_err(|invalid| invalid.within(self.name()))
    }

    fn check_current(&self) -> Result<(), Invalid> {
        let checked = match self {
            ChildParameter::Parameter(parameter) => parameter.check_current().map_err(Invalid::here),
            ChildParameter::Compound(compound) => compound.check_current(),
        };
        checked.map_err(|invalid| invalid.within(self.name()))
    }
}

impl From<Parameter> for ChildParameter {
    fn from(value: Parameter) -> Self {
        ChildParameter::Parameter(value)
    }
}

impl From<CompoundParameter> for ChildParameter {
    fn from(value: CompoundParameter) -> Self {
        ChildParameter::Compound(value)
    }
}

impl From<&CompoundParameter> for CompoundData {
    fn from(value: &CompoundParameter) -> Self {
        value.iter()
            .map(|child| (String::from(child.name()), child.get_value()))
            .collect()
    }
}
