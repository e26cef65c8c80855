//! Category registry: category key -> validated `MeasureCategory`

use std::collections::HashMap;
use tracing::debug;

use crate::catalogue::{builtin_catalogue, parse_catalogue, CategorySpec};
use crate::{ConversionError, MeasureCategory, UnitDefinition, UnitSystem};

/// Read-only lookup of every category in a catalogue.
///
/// Built once, validated eagerly, then shared (typically behind an `Arc`).
/// Nothing mutates it after construction, so concurrent readers need no
/// locking.
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    categories: HashMap<String, MeasureCategory>,
    order: Vec<String>,
}

impl CategoryRegistry {
    /// Build from catalogue specs, rejecting the first invalid entry
    pub fn from_catalogue(specs: Vec<CategorySpec>) -> Result<Self, ConversionError> {
        let mut registry = CategoryRegistry::default();

        for spec in &specs {
            if registry.categories.contains_key(&spec.key) {
                return Err(ConversionError::invalid(&spec.key, "category key defined twice"));
            }
            let category = spec.build()?;
            registry.order.push(spec.key.clone());
            registry.categories.insert(spec.key.clone(), category);
        }

        debug!(
            categories = registry.order.len(),
            units = registry.unit_count(),
            "category registry built"
        );
        Ok(registry)
    }

    /// Registry over the catalogue that ships with the crate
    pub fn builtin() -> Result<Self, ConversionError> {
        Self::from_catalogue(builtin_catalogue())
    }

    /// Registry over a JSON catalogue document
    pub fn from_json_str(json: &str) -> Result<Self, ConversionError> {
        Self::from_catalogue(parse_catalogue(json)?)
    }

    pub fn lookup(&self, key: &str) -> Result<&MeasureCategory, ConversionError> {
        self.categories
            .get(key)
            .ok_or_else(|| ConversionError::UnknownCategory(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.categories.contains_key(key)
    }

    /// Units of one system, or of every system flattened METRIC first
    pub fn list_units(&self, key: &str, system: Option<UnitSystem>) -> Result<Vec<&UnitDefinition>, ConversionError> {
        Ok(self.lookup(key)?.units(system))
    }

    /// Resolve a symbol inside a category
    pub fn lookup_unit(&self, key: &str, symbol: &str) -> Result<(UnitSystem, &UnitDefinition), ConversionError> {
        self.lookup(key)?
            .resolve(symbol)
            .ok_or_else(|| ConversionError::UnknownUnit {
                category: key.to_string(),
                unit: symbol.to_string(),
            })
    }

    /// Category keys in catalogue order
    pub fn categories(&self) -> Vec<&str> {
        self.order.iter().map(|k| k.as_str()).collect()
    }

    /// Categories in catalogue order
    pub fn iter(&self) -> impl Iterator<Item = &MeasureCategory> {
        self.order.iter().filter_map(|k| self.categories.get(k))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn unit_count(&self) -> usize {
        self.categories.values().map(|c| c.unit_count()).sum()
    }

    /// Shorthand for [`crate::convert`] against this registry
    pub fn convert(&self, key: &str, from: &str, to: &str, value: f64) -> Result<f64, ConversionError> {
        crate::engine::convert(self, key, from, to, value)
    }
}
