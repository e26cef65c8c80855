//! Catalogue supply: the nested category -> systems -> units structure
//!
//! The shape mirrors the JSON catalogues dashboards ship:
//!
//! ```json
//! [{
//!   "key": "density",
//!   "systems": {
//!     "METRIC":   { "ratio": 0.062428, "units": { "kg/m³": { "name": "unit.kilogram-per-cubic-meter", "to_anchor": 1 } } },
//!     "IMPERIAL": { "ratio": 16.0185,  "units": { "lb/ft³": { "name": "unit.pound-per-cubic-foot", "to_anchor": 1 } } }
//!   }
//! }]
//! ```
//!
//! Unit order inside a table is kept as written.

mod builtin;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use serde::{Serialize, Deserialize};

use crate::{ConversionError, MeasureCategory, Transform, UnitDefinition, UnitSystem, UnitSystemTable};

pub use builtin::builtin_catalogue;

/// One unit as written in a catalogue (the symbol is the map key)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSpec {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub to_anchor: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
}

/// One system table as written in a catalogue
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
    #[serde(with = "ordered_units")]
    pub units: Vec<(String, UnitSpec)>,
}

/// One category as written in a catalogue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySpec {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
    pub systems: BTreeMap<UnitSystem, SystemSpec>,
}

impl SystemSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ratio(mut self, ratio: f64) -> Self {
        self.ratio = Some(ratio);
        self
    }

    pub fn unit(mut self, symbol: &str, name: &str, tags: &[&str], to_anchor: f64) -> Self {
        self.units.push((symbol.to_string(), UnitSpec {
            name: name.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            to_anchor,
            transform: None,
        }));
        self
    }

    pub fn transformed(mut self, symbol: &str, name: &str, tags: &[&str], transform: Transform) -> Self {
        self.units.push((symbol.to_string(), UnitSpec {
            name: name.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            to_anchor: 1.0,
            transform: Some(transform),
        }));
        self
    }

    fn build(&self, key: &str, system: UnitSystem) -> Result<UnitSystemTable, ConversionError> {
        let mut table = UnitSystemTable::new(system);
        table.ratio = self.ratio;
        for (symbol, spec) in &self.units {
            if table.contains(symbol) {
                return Err(ConversionError::invalid(key, format!("unit '{}' listed twice in {}", symbol, system)));
            }
            table.units.push(UnitDefinition {
                symbol: symbol.clone(),
                name: spec.name.clone(),
                tags: spec.tags.clone(),
                to_anchor: spec.to_anchor,
                transform: spec.transform,
            });
        }
        Ok(table)
    }
}

impl CategorySpec {
    pub fn new(key: &str) -> Self {
        CategorySpec { key: key.to_string(), ratio: None, systems: BTreeMap::new() }
    }

    pub fn ratio(mut self, ratio: f64) -> Self {
        self.ratio = Some(ratio);
        self
    }

    pub fn metric(self, spec: SystemSpec) -> Self {
        self.system(UnitSystem::Metric, spec)
    }

    pub fn imperial(self, spec: SystemSpec) -> Self {
        self.system(UnitSystem::Imperial, spec)
    }

    pub fn system(mut self, system: UnitSystem, spec: SystemSpec) -> Self {
        self.systems.insert(system, spec);
        self
    }

    /// Validate and turn into an immutable category
    pub fn build(&self) -> Result<MeasureCategory, ConversionError> {
        let tables = self.systems.iter()
            .map(|(system, spec)| spec.build(&self.key, *system))
            .collect::<Result<Vec<_>, _>>()?;
        MeasureCategory::new(&self.key, self.ratio, tables)
    }
}

/// Parse a JSON catalogue (an array of categories)
pub fn parse_catalogue(json: &str) -> Result<Vec<CategorySpec>, ConversionError> {
    serde_json::from_str(json).map_err(|e| ConversionError::Catalogue(e.to_string()))
}

/// Read and parse a JSON catalogue file
pub fn load_catalogue_file(path: impl AsRef<Path>) -> Result<Vec<CategorySpec>, ConversionError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| ConversionError::Catalogue(format!("{}: {}", path.display(), e)))?;
    parse_catalogue(&content)
}

/// Overlay categories replace base categories with the same key; new keys
/// are appended. Base order is kept.
pub fn merge_catalogues(base: Vec<CategorySpec>, overlay: Vec<CategorySpec>) -> Vec<CategorySpec> {
    let mut merged = base;
    for spec in overlay {
        match merged.iter_mut().find(|c| c.key == spec.key) {
            Some(existing) => *existing = spec,
            None => merged.push(spec),
        }
    }
    merged
}

/// (De)serialize `Vec<(symbol, UnitSpec)>` as a JSON object without losing
/// document order.
mod ordered_units {
    use std::fmt;
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};

    use super::UnitSpec;

    pub fn serialize<S: Serializer>(units: &[(String, UnitSpec)], serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(units.len()))?;
        for (symbol, spec) in units {
            map.serialize_entry(symbol, spec)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<(String, UnitSpec)>, D::Error> {
        struct UnitsVisitor;

        impl<'de> Visitor<'de> for UnitsVisitor {
            type Value = Vec<(String, UnitSpec)>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of unit symbol to unit definition")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut units = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((symbol, spec)) = access.next_entry::<String, UnitSpec>()? {
                    units.push((symbol, spec));
                }
                Ok(units)
            }
        }

        deserializer.deserialize_map(UnitsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DENSITY_JSON: &str = r#"[{
        "key": "density",
        "systems": {
            "METRIC": {
                "ratio": 0.062428,
                "units": {
                    "kg/m³": { "name": "unit.kilogram-per-cubic-meter", "tags": ["density"], "to_anchor": 1 },
                    "g/cm³": { "name": "unit.gram-per-cubic-centimeter", "to_anchor": 1000 }
                }
            },
            "IMPERIAL": {
                "ratio": 16.0185,
                "units": {
                    "lb/ft³": { "name": "unit.pound-per-cubic-foot", "to_anchor": 1 }
                }
            }
        }
    }]"#;

    #[test]
    fn test_parse_keeps_unit_order() {
        let specs = parse_catalogue(DENSITY_JSON).unwrap();
        assert_eq!(specs.len(), 1);
        let metric = &specs[0].systems[&UnitSystem::Metric];
        let symbols: Vec<&str> = metric.units.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(symbols, vec!["kg/m³", "g/cm³"]);
        assert_eq!(metric.ratio, Some(0.062428));
    }

    #[test]
    fn test_build_category() {
        let specs = parse_catalogue(DENSITY_JSON).unwrap();
        let category = specs[0].build().unwrap();
        assert_eq!(category.key(), "density");
        assert_eq!(category.unit_count(), 3);
    }

    #[test]
    fn test_transform_in_json() {
        let json = r#"[{
            "key": "fuel-efficiency",
            "systems": { "METRIC": { "units": {
                "km/L": { "name": "unit.kilometer-per-liter", "to_anchor": 1 },
                "L/100km": { "name": "unit.liter-per-100-km", "to_anchor": 1,
                             "transform": { "kind": "reciprocal", "numerator": 100 } }
            } } }
        }]"#;
        let category = parse_catalogue(json).unwrap()[0].build().unwrap();
        let (_, unit) = category.resolve("L/100km").unwrap();
        assert!(!unit.is_linear());
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_catalogue("{ not json").unwrap_err();
        assert!(matches!(err, ConversionError::Catalogue(_)));

        let err = parse_catalogue(r#"[{"key": "x", "systems": {"METRIC": {"units": {"u": {"name": "n"}}}}}]"#).unwrap_err();
        assert!(err.to_string().contains("to_anchor"));
    }

    #[test]
    fn test_unknown_system_name_rejected() {
        let err = parse_catalogue(r#"[{"key": "x", "systems": {"NAUTICAL": {"units": {}}}}]"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_duplicate_symbol_in_table() {
        let spec = CategorySpec::new("mass").metric(
            SystemSpec::new()
                .unit("kg", "unit.kilogram", &[], 1.0)
                .unit("kg", "unit.kilogram", &[], 1.0),
        );
        assert!(spec.build().is_err());
    }

    #[test]
    fn test_serialize_round_trips_shape() {
        let specs = parse_catalogue(DENSITY_JSON).unwrap();
        let json = serde_json::to_value(&specs).unwrap();
        assert_eq!(json[0]["systems"]["IMPERIAL"]["ratio"], 16.0185);
        assert!(json[0]["systems"]["METRIC"]["units"]["kg/m³"].is_object());
    }

    #[test]
    fn test_merge_replaces_and_appends() {
        let base = vec![
            CategorySpec::new("mass").metric(SystemSpec::new().unit("kg", "unit.kilogram", &[], 1.0)),
            CategorySpec::new("time").metric(SystemSpec::new().unit("s", "unit.second", &[], 1.0)),
        ];
        let overlay = vec![
            CategorySpec::new("time").metric(SystemSpec::new().unit("min", "unit.minute", &[], 1.0)),
            CategorySpec::new("ppm").metric(SystemSpec::new().unit("ppm", "unit.ppm", &[], 1.0)),
        ];
        let merged = merge_catalogues(base, overlay);
        let keys: Vec<&str> = merged.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["mass", "time", "ppm"]);
        assert_eq!(merged[1].systems[&UnitSystem::Metric].units[0].0, "min");
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_catalogue_file("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("not/here.json"));
    }
}
