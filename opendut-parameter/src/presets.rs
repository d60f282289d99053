use std::slice::Iter;
use std::vec::IntoIter;

use crate::value::Value;

/// Named shortcut values of a parameter.
///
/// Presets keep the order in which they were inserted. Names are unique: inserting a name a second
/// time replaces the value and keeps the original position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Presets {
    presets: Vec<Preset>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Preset {
    pub name: String,
    pub value: Value,
}

impl Presets {

    pub fn new() -> Self {
        Default::default()
    }

    /// Inserts a preset, returning the value previously registered under `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let name = name.into();
        let value = value.into();
        match self.presets.iter_mut().find(|preset| preset.name == name) {
            Some(preset) => Some(std::mem::replace(&mut preset.value, value)),
            None => {
                self.presets.push(Preset { name, value });
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.presets.iter()
            .find(|preset| preset.name == name)
            .map(|preset| &preset.value)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn contains_value(&self, value: &Value) -> bool {
        self.name_of(value).is_some()
    }

    /// Returns the name of the first preset whose value equals `value`.
    pub fn name_of(&self, value: &Value) -> Option<&str> {
        self.presets.iter()
            .find(|preset| preset.value == *value)
            .map(|preset| preset.name.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.iter().map(|preset| preset.name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.presets.iter().map(|preset| &preset.value)
    }

    pub fn iter(&self) -> Iter<'_, Preset> {
        self.presets.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }
}

impl<N: Into<String>, V: Into<Value>> FromIterator<(N, V)> for Presets {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut presets = Presets::new();
        for (name, value) in iter {
            presets.insert(name, value);
        }
        presets
    }
}

impl IntoIterator for Presets {
    type Item = Preset;
    type IntoIter = IntoIter<Preset>;

    fn into_iter(self) -> IntoIter<Preset> {
        self.presets.into_iter()
    }
}

impl<'a> IntoIterator for &'a Presets {
    type Item = &'a Preset;
    type IntoIter = Iter<'a, Preset>;

    fn into_iter(self) -> Iter<'a, Preset> {
        self.presets.iter()
    }
}
