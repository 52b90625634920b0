//! Ordered parameter collection with case-insensitive lookup.

use hashbrown::HashMap;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::param::{ParamValue, Parameter};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Parameter>", into = "Vec<Parameter>")]
pub struct ParameterSet {
    parameters: Vec<Parameter>,
    index: HashMap<String, usize>,
}

impl From<Vec<Parameter>> for ParameterSet {
    fn from(parameters: Vec<Parameter>) -> Self {
        let mut set = ParameterSet::default();
        for p in parameters {
            set.insert(p);
        }
        set
    }
}

impl From<ParameterSet> for Vec<Parameter> {
    fn from(set: ParameterSet) -> Self {
        set.parameters
    }
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a parameter (names compare case-insensitively).
    pub fn insert(&mut self, parameter: Parameter) {
        let key = parameter.name.to_lowercase();
        match self.index.get(&key) {
            Some(&i) => self.parameters[i] = parameter,
            None => {
                self.index.insert(key, self.parameters.len());
                self.parameters.push(parameter);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.index
            .get(&name.to_lowercase())
            .map(|&i| &self.parameters[i])
    }

    fn value_or_warn(&self, name: &str) -> Option<ParamValue> {
        match self.get(name) {
            Some(p) => Some(p.get()),
            None => {
                warn!("parameter '{name}' does not exist in this set");
                None
            }
        }
    }

    pub fn get_float(&self, name: &str) -> f32 {
        match self.value_or_warn(name) {
            Some(ParamValue::Float(v)) => v,
            Some(other) => {
                warn!("parameter '{name}' is {:?}, not a float", other.param_type());
                0.0
            }
            None => 0.0,
        }
    }

    pub fn get_int(&self, name: &str) -> i32 {
        match self.value_or_warn(name) {
            Some(ParamValue::Int(v)) => v,
            Some(other) => {
                warn!("parameter '{name}' is {:?}, not an int", other.param_type());
                0
            }
            None => 0,
        }
    }

    pub fn get_bool(&self, name: &str) -> bool {
        match self.value_or_warn(name) {
            Some(ParamValue::Bool(v)) => v,
            Some(other) => {
                warn!("parameter '{name}' is {:?}, not a bool", other.param_type());
                false
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParameterSet {
        ParameterSet::from(vec![
            Parameter::from_value("Speed", ParamValue::Float(2.5)),
            Parameter::from_value("Grounded", ParamValue::Bool(true)),
            Parameter::from_value("Combo", ParamValue::Int(3)),
        ])
    }

    #[test]
    fn lookup_ignores_case() {
        let set = sample();
        assert_eq!(set.get_float("speed"), 2.5);
        assert!(set.get_bool("GROUNDED"));
        assert_eq!(set.get_int("combo"), 3);
    }

    #[test]
    fn missing_and_mismatched_yield_zero() {
        let set = sample();
        assert_eq!(set.get_float("nope"), 0.0);
        assert_eq!(set.get_int("speed"), 0);
        assert!(!set.get_bool("combo"));
    }

    #[test]
    fn insert_replaces_same_name() {
        let mut set = sample();
        set.insert(Parameter::from_value("SPEED", ParamValue::Float(9.0)));
        assert_eq!(set.len(), 3);
        assert_eq!(set.get_float("Speed"), 9.0);
    }
}
