use tracing::{debug, trace};

use crate::error::{ConfigurationError, LookupError, ValidationError};
use crate::kind::ParameterKind;
use crate::name::ParameterName;
use crate::presets::Presets;
use crate::user_data::UserData;
use crate::value::Value;

const NOT_AN_ALLOWED_PRESET: &str = "Value is not an allowed preset value.";

/// Optional settings for constructing a [`Parameter`].
///
/// ```
/// use opendut_parameter::{ParameterKind, ParameterOptions, Presets};
///
/// let options = ParameterOptions {
///     kind: ParameterKind::enumeration(["linear", "srgb"]),
///     presets: Presets::from_iter([("Linear", "linear"), ("sRGB", "srgb")]),
///     presets_only: true,
///     ..Default::default()
/// };
/// ```
#[derive(Clone, Debug, Default)]
pub struct ParameterOptions {
    /// Kind-specific validation. Defaults to [`ParameterKind::Any`].
    pub kind: ParameterKind,
    /// Defaults to no presets.
    pub presets: Presets,
    /// Restricts valid values to the presets. Defaults to `false`.
    pub presets_only: bool,
    /// Defaults to a new, empty container.
    pub user_data: UserData,
}

/// A named, documented and validated value slot.
///
/// All value reads hand out independent copies. Assigning a value does not validate it, use
/// [`Parameter::validate`] or [`Parameter::get_validated_value`] once all related parameters are set.
#[derive(Debug)]
pub struct Parameter {
    name: ParameterName,
    description: String,
    default_value: Value,
    current_value: Value,
    presets: Presets,
    presets_only: bool,
    kind: ParameterKind,
    user_data: UserData,
}

impl Parameter {

    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        default_value: impl Into<Value>,
        options: ParameterOptions,
    ) -> Result<Self, ConfigurationError> {
        let name = ParameterName::try_from(name.into())?;
        let default_value = default_value.into();
        let ParameterOptions { kind, presets, presets_only, user_data } = options;

        if presets_only && presets.is_empty() {
            return Err(ConfigurationError::PresetsOnlyWithoutPresets { parameter: name.into() });
        }
        if presets_only {
            if let Some(preset) = presets.iter().find(|preset| preset.value.contains_nan()) {
                return Err(ConfigurationError::UnmatchablePreset { parameter: name.into(), preset: Clone::clone(&preset.name) });
            }
        }
        if let Some(reason) = kind.configuration_error() {
            return Err(ConfigurationError::InvalidKind { parameter: name.into(), reason });
        }
        if let Err(reason) = kind.check(&default_value) {
            return Err(ConfigurationError::InvalidDefault { parameter: name.into(), reason });
        }

        Ok(Self {
            name,
            description: description.into(),
            current_value: Clone::clone(&default_value),
            default_value,
            presets,
            presets_only,
            kind,
            user_data,
        })
    }

    pub fn name(&self) -> &ParameterName {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn presets_only(&self) -> bool {
        self.presets_only
    }

    pub fn kind(&self) -> &ParameterKind {
        &self.kind
    }

    pub fn default_value(&self) -> Value {
        Clone::clone(&self.default_value)
    }

    /// Returns a copy of the current value, which may not have been validated.
    pub fn get_value(&self) -> Value {
        Clone::clone(&self.current_value)
    }

    pub fn get_validated_value(&self) -> Result<Value, ValidationError> {
        self.validate()?;
        Ok(self.get_value())
    }

    /// Name of the first preset whose value equals the current value.
    pub fn get_current_preset_name(&self) -> Option<&str> {
        self.presets.name_of(&self.current_value)
    }

    pub fn set_value(&mut self, value: impl Into<Value>) {
        let value = value.into();
        debug!("Setting value of parameter '{}' to {value:?}.", self.name);
        self.current_value = value;
    }

    pub fn set_value_from_preset(&mut self, preset: &str) -> Result<(), LookupError> {
        let value = self.presets.get(preset)
            .cloned()
            .ok_or_else(|| LookupError::PresetNotFound {
                parameter: String::from(&self.name),
                preset: preset.to_owned(),
            })?;
        debug!("Selecting preset '{preset}' of parameter '{}'.", self.name);
        self.current_value = value;
        Ok(())
    }

    /// Assigns the value and validates it afterwards.
    ///
    /// **Note:** The value stays assigned when validation fails.
    pub fn set_validated_value(&mut self, value: impl Into<Value>) -> Result<(), ValidationError> {
        self.set_value(value);
        self.validate()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_value(&self.current_value)
    }

    /// Checks whether `value` would be accepted, without assigning it.
    pub fn validate_value(&self, value: &Value) -> Result<(), ValidationError> {
        let (valid, reason) = self.value_valid(value);
        if valid {
            Ok(())
        } else {
            trace!("Value {value:?} rejected by parameter '{}': {reason}", self.name);
            Err(ValidationError::new(&self.name, reason))
        }
    }

    /// Returns `(true, "")` if `value` is valid, otherwise `false` and the reason.
    pub fn value_valid(&self, value: &Value) -> (bool, String) {
        match self.check(value) {
            Ok(()) => (true, String::new()),
            Err(reason) => (false, reason),
        }
    }

    pub fn current_value_valid(&self) -> (bool, String) {
        self.value_valid(&self.current_value)
    }

    pub(crate) fn check(&self, value: &Value) -> Result<(), String> {
        if self.presets_only && !self.presets.contains_value(value) {
            return Err(String::from(NOT_AN_ALLOWED_PRESET));
        }
        self.kind.check(value)
    }

    pub(crate) fn check_current(&self) -> Result<(), String> {
        self.check(&self.current_value)
    }

    /// Returns a copy of the presets in insertion order.
    pub fn get_presets(&self) -> Presets {
        Clone::clone(&self.presets)
    }

    /// Replaces all presets.
    ///
    /// Unlike construction, this does not reject an empty set or presets containing NaN when the
    /// parameter only accepts presets. Every value then fails validation, since NaN equals nothing.
    pub fn set_presets(&mut self, presets: Presets) {
        self.presets = presets;
    }

    pub fn preset_names(&self) -> Vec<String> {
        self.presets.names().map(ToOwned::to_owned).collect()
    }

    pub fn preset_values(&self) -> Vec<Value> {
        self.presets.values().cloned().collect()
    }

    /// Returns a handle to the shared user data. No copy is made.
    pub fn user_data(&self) -> UserData {
        Clone::clone(&self.user_data)
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::{fixture, rstest};

    use crate::kind::NumericRange;
    use crate::value::CompoundData;
    use crate::name::InvalidParameterNameError;

    use super::*;

    #[fixture]
    fn quality() -> Parameter {
        Parameter::new(
            "quality",
            "Render quality.",
            1,
            ParameterOptions {
                presets: Presets::from_iter([("low", 1), ("high", 10)]),
                presets_only: true,
                ..Default::default()
            },
        ).expect("Valid parameter")
    }

    #[fixture]
    fn samples() -> Parameter {
        Parameter::new(
            "samples",
            "Samples per pixel.",
            4,
            ParameterOptions {
                kind: ParameterKind::Int(NumericRange::between(1, 64)),
                presets: Presets::from_iter([("preview", 1), ("final", 16)]),
                ..Default::default()
            },
        ).expect("Valid parameter")
    }

    #[rstest]
    fn should_start_with_the_default_value(samples: Parameter) {
        assert_that!(samples.get_value(), eq(samples.default_value()));
        assert_that!(samples.get_value(), eq(Value::Int(4)));
        assert_that!(samples.name().as_str(), eq("samples"));
        assert_that!(samples.description(), eq("Samples per pixel."));
        assert_that!(samples.presets_only(), eq(false));
    }

    #[test]
    fn should_hand_out_independent_copies() -> anyhow::Result<()> {
        let default = CompoundData::from_iter([("width", 1920), ("height", 1080)]);
        let mut testee = Parameter::new("resolution", "", default.clone(), ParameterOptions::default())?;

        let mut value = testee.get_value();
        value.as_compound_mut().expect("Compound").insert("width", 1);
        let mut default_value = testee.default_value();
        default_value.as_compound_mut().expect("Compound").insert("height", 1);
        let mut validated_value = testee.get_validated_value()?;
        validated_value.as_compound_mut().expect("Compound").insert("depth", 1);

        assert_that!(testee.get_value(), eq(Value::Compound(default.clone())));
        assert_that!(testee.default_value(), eq(Value::Compound(default.clone())));

        let mut assigned = default.clone();
        assigned.insert("width", 1280);
        testee.set_value(assigned.clone());
        assigned.insert("width", 640);

        let value = testee.get_value();
        assert_that!(value.as_compound().and_then(|data| data.get("width")), some(eq(&Value::Int(1280))));
        Ok(())
    }

    #[rstest]
    fn should_return_the_assigned_value(mut samples: Parameter) {
        samples.set_value(100);

        assert_that!(samples.get_value(), eq(Value::Int(100)));
    }

    #[rstest]
    fn should_not_validate_when_setting_a_value(mut samples: Parameter) {
        samples.set_value("not a number");

        assert_that!(samples.get_value(), eq(Value::from("not a number")));
        assert_that!(samples.validate(), err(anything()));
    }

    #[rstest]
    fn should_reject_values_which_are_not_presets(mut quality: Parameter) {
        quality.set_value(5);

        assert_that!(
            quality.validate(),
            err(eq(ValidationError::new("quality", "Value is not an allowed preset value.")))
        );
    }

    #[rstest]
    fn should_accept_a_preset_selected_by_name(mut quality: Parameter) -> anyhow::Result<()> {
        quality.set_value_from_preset("low")?;

        assert_that!(quality.validate(), ok(eq(())));
        assert_that!(quality.get_validated_value(), ok(eq(Value::Int(1))));
        Ok(())
    }

    #[rstest]
    fn should_fail_to_select_an_unknown_preset(mut quality: Parameter) {
        quality.set_value(10);

        let result = quality.set_value_from_preset("missing-preset-name");

        assert_that!(result, err(eq(LookupError::PresetNotFound {
            parameter: String::from("quality"),
            preset: String::from("missing-preset-name"),
        })));
        assert_that!(quality.get_value(), eq(Value::Int(10)));
    }

    #[rstest]
    fn should_name_the_current_preset(mut quality: Parameter) {
        quality.set_value(10);
        assert_that!(quality.get_current_preset_name(), some(eq("high")));

        quality.set_value(7);
        assert_that!(quality.get_current_preset_name(), none());
    }

    #[test]
    fn should_reject_presets_only_without_presets() {
        let result = Parameter::new(
            "mode",
            "",
            "fast",
            ParameterOptions {
                presets_only: true,
                ..Default::default()
            },
        );

        assert_that!(result.map(|_| ()), err(eq(ConfigurationError::PresetsOnlyWithoutPresets { parameter: String::from("mode") })));
    }

    #[test]
    fn should_reject_a_nan_preset_when_only_presets_are_accepted() {
        let result = Parameter::new(
            "exposure",
            "",
            1.0,
            ParameterOptions {
                presets: Presets::from_iter([("neutral", 1.0), ("unset", f64::NAN)]),
                presets_only: true,
                ..Default::default()
            },
        );

        assert_that!(result.map(|_| ()), err(eq(ConfigurationError::UnmatchablePreset {
            parameter: String::from("exposure"),
            preset: String::from("unset"),
        })));
    }

    #[test]
    fn should_allow_a_nan_preset_when_other_values_are_accepted() {
        let result = Parameter::new(
            "exposure",
            "",
            1.0,
            ParameterOptions {
                presets: Presets::from_iter([("neutral", 1.0), ("unset", f64::NAN)]),
                ..Default::default()
            },
        );

        assert_that!(result.map(|_| ()), ok(eq(())));
    }

    #[test]
    fn should_reject_an_illegal_name() {
        let result = Parameter::new("", "", 1, ParameterOptions::default());

        assert_that!(result.map(|_| ()), err(eq(ConfigurationError::IllegalName(InvalidParameterNameError::Empty))));
    }

    #[test]
    fn should_reject_a_default_value_which_does_not_satisfy_the_kind() {
        let result = Parameter::new(
            "gamma",
            "",
            "2.2",
            ParameterOptions {
                kind: ParameterKind::Float(NumericRange::unbounded()),
                ..Default::default()
            },
        );

        assert_that!(result.map(|_| ()), err(eq(ConfigurationError::InvalidDefault {
            parameter: String::from("gamma"),
            reason: String::from("Expected a value of type 'float', got 'string'."),
        })));
    }

    #[test]
    fn should_reject_an_unsatisfiable_kind() {
        let result = Parameter::new(
            "threads",
            "",
            4,
            ParameterOptions {
                kind: ParameterKind::Int(NumericRange::between(8, 1)),
                ..Default::default()
            },
        );

        assert_that!(result.map(|_| ()), err(anything()));
    }

    #[rstest]
    #[case(Value::Int(16), true)]
    #[case(Value::Int(64), true)]
    #[case(Value::Int(0), false)]
    #[case(Value::Int(65), false)]
    #[case(Value::Float(16.0), false)]
    fn should_agree_between_value_valid_and_validate(samples: Parameter, #[case] value: Value, #[case] expected: bool) {
        let (valid, reason) = samples.value_valid(&value);

        assert_that!(valid, eq(expected));
        assert_that!(samples.validate_value(&value).is_ok(), eq(expected));
        assert_that!(reason.is_empty(), eq(expected));
    }

    #[rstest]
    fn should_validate_external_values_without_assigning_them(samples: Parameter) {
        assert_that!(samples.validate_value(&Value::Int(1000)), err(anything()));
        assert_that!(samples.get_value(), eq(Value::Int(4)));
    }

    #[test]
    fn should_check_presets_before_the_kind() -> anyhow::Result<()> {
        let testee = Parameter::new(
            "level",
            "",
            2,
            ParameterOptions {
                kind: ParameterKind::Int(NumericRange::at_most(5)),
                presets: Presets::from_iter([("default", 2), ("extreme", 9)]),
                presets_only: true,
                ..Default::default()
            },
        )?;

        assert_that!(testee.value_valid(&Value::Int(3)).1, eq("Value is not an allowed preset value."));
        assert_that!(testee.value_valid(&Value::Int(9)).1, eq("Value 9 is greater than the maximum of 5."));
        Ok(())
    }

    #[rstest]
    fn should_keep_an_invalid_value_after_failed_validated_set(mut samples: Parameter) {
        let result = samples.set_validated_value(1000);

        assert_that!(result, err(anything()));
        assert_that!(samples.get_value(), eq(Value::Int(1000)));
        assert_that!(samples.current_value_valid().0, eq(false));
    }

    #[rstest]
    fn should_set_a_validated_value(mut samples: Parameter) {
        assert_that!(samples.set_validated_value(32), ok(eq(())));
        assert_that!(samples.current_value_valid(), eq((true, String::new())));
    }

    #[rstest]
    fn should_replace_presets_wholesale(mut samples: Parameter) {
        samples.set_presets(Presets::from_iter([("c", 3), ("a", 1), ("b", 2)]));

        assert_that!(samples.preset_names(), elements_are![eq("c"), eq("a"), eq("b")]);
        assert_that!(samples.preset_values(), elements_are![eq(Value::Int(3)), eq(Value::Int(1)), eq(Value::Int(2))]);
        assert_that!(samples.get_presets().contains_name("preview"), eq(false));

        let presets = samples.get_presets();
        let pairs = presets.iter()
            .map(|preset| (preset.name.clone(), preset.value.clone()))
            .collect::<Vec<_>>();
        let parallel = samples.preset_names().into_iter()
            .zip(samples.preset_values())
            .collect::<Vec<_>>();
        assert_that!(pairs, eq(parallel));
    }

    #[rstest]
    fn should_share_user_data(samples: Parameter) {
        samples.user_data().borrow_mut().insert("ui:label", "Samples");

        let user_data = samples.user_data();
        let label = user_data.borrow().get("ui:label").cloned();
        assert_that!(label, some(eq(Value::from("Samples"))));
        assert_that!(user_data.ptr_eq(&samples.user_data()), eq(true));
    }

    #[test]
    fn should_store_supplied_user_data() -> anyhow::Result<()> {
        let user_data = UserData::from(CompoundData::from_iter([("maya:node", "transform1")]));

        let testee = Parameter::new(
            "target",
            "",
            "",
            ParameterOptions {
                user_data: user_data.clone(),
                ..Default::default()
            },
        )?;
        user_data.borrow_mut().insert("maya:plug", "tx");

        assert_that!(testee.user_data().snapshot().len(), eq(2));
        Ok(())
    }
}
