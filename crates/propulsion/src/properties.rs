//! Named, externally observable values published by engines.

use std::collections::BTreeMap;

/// Sink for named simulation properties.
pub trait PropertyRegistry {
    fn set_property(&mut self, name: &str, value: f64);
}

/// In-memory property tree keyed by slash-separated path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyTree {
    values: BTreeMap<String, f64>,
}

impl PropertyTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl PropertyRegistry for PropertyTree {
    fn set_property(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_string(), value);
    }
}

/// Build `base[index]`, e.g. `propulsion/engine[2]`.
pub fn indexed_property_name(base: &str, index: usize) -> String {
    format!("{base}[{index}]")
}
