//! Named, documented and validated value slots for describing the inputs of an operation.
//!
//! A [`Parameter`] owns a default value, an ordered set of named presets, a current value and a
//! bag of user data. Assigning a value and validating it are separate steps, so that several
//! related parameters can be set before any of them is checked.
//!
//! ```
//! use opendut_parameter::{Parameter, ParameterKind, ParameterOptions, Presets, Value};
//! use opendut_parameter::kind::NumericRange;
//!
//! let mut samples = Parameter::new(
//!     "samples",
//!     "Number of samples per pixel.",
//!     4,
//!     ParameterOptions {
//!         kind: ParameterKind::Int(NumericRange::between(1, 64)),
//!         presets: Presets::from_iter([("low", 1), ("high", 16)]),
//!         ..Default::default()
//!     },
//! ).expect("Valid parameter");
//!
//! samples.set_value_from_preset("high").expect("Known preset");
//! assert_eq!(samples.get_validated_value().expect("Valid value"), Value::Int(16));
//! assert_eq!(samples.get_current_preset_name(), Some("high"));
//! ```

pub mod compound;
pub mod error;
pub mod kind;
pub mod name;
pub mod overrides;
pub mod parameter;
pub mod presets;
pub mod user_data;
pub mod value;

pub use compound::{ChildParameter, CompoundParameter};
pub use error::{ConfigurationError, LookupError, OverrideError, ValidationError};
pub use kind::ParameterKind;
pub use name::ParameterName;
pub use overrides::{AppliedOverrides, ParameterOverrides};
pub use parameter::{Parameter, ParameterOptions};
pub use presets::Presets;
pub use user_data::UserData;
pub use value::{CompoundData, Value, ValueType};

pub trait ShortName {
    fn short_name(&self) -> &'static str;

    fn short_names_joined(elements: &[impl ShortName]) -> String {
        elements.iter()
            .map(|element| element.short_name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
