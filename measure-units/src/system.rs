//! Unit systems and their tables

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};

use crate::UnitDefinition;

/// Closed set of unit systems a category may define
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UnitSystem {
    Metric,
    Imperial,
}

impl UnitSystem {
    pub const ALL: [UnitSystem; 2] = [UnitSystem::Metric, UnitSystem::Imperial];

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "METRIC",
            UnitSystem::Imperial => "IMPERIAL",
        }
    }

    /// The other member of the closed set
    pub fn counterpart(&self) -> UnitSystem {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "METRIC" | "SI" => Ok(UnitSystem::Metric),
            "IMPERIAL" | "US" => Ok(UnitSystem::Imperial),
            other => Err(format!("unknown unit system '{}', expected METRIC or IMPERIAL", other)),
        }
    }
}

/// Units of one system within a category, all relative to one anchor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSystemTable {
    pub system: UnitSystem,
    /// Factor from this table's anchor quantity to the other table's anchor quantity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
    /// Units in catalogue order; symbols are unique
    pub units: Vec<UnitDefinition>,
}

impl UnitSystemTable {
    pub fn new(system: UnitSystem) -> Self {
        UnitSystemTable { system, ratio: None, units: Vec::new() }
    }

    pub fn with_ratio(mut self, ratio: f64) -> Self {
        self.ratio = Some(ratio);
        self
    }

    pub fn with_unit(mut self, unit: UnitDefinition) -> Self {
        self.units.push(unit);
        self
    }

    pub fn get(&self, symbol: &str) -> Option<&UnitDefinition> {
        self.units.iter().find(|u| u.symbol == symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.get(symbol).is_some()
    }

    /// First unit with factor 1 and no transform
    pub fn anchor(&self) -> Option<&UnitDefinition> {
        self.units.iter().find(|u| u.is_anchor())
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.units.iter().map(|u| u.symbol.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_system() {
        assert_eq!("metric".parse::<UnitSystem>(), Ok(UnitSystem::Metric));
        assert_eq!(" IMPERIAL ".parse::<UnitSystem>(), Ok(UnitSystem::Imperial));
        assert!("nautical".parse::<UnitSystem>().is_err());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&UnitSystem::Metric).unwrap(), "\"METRIC\"");
        let s: UnitSystem = serde_json::from_str("\"IMPERIAL\"").unwrap();
        assert_eq!(s, UnitSystem::Imperial);
    }

    #[test]
    fn test_table_lookup_and_anchor() {
        let table = UnitSystemTable::new(UnitSystem::Imperial)
            .with_ratio(16.0185)
            .with_unit(UnitDefinition::new("oz/in³", "unit.ounce-per-cubic-inch", &[], 108.0))
            .with_unit(UnitDefinition::new("lb/ft³", "unit.pound-per-cubic-foot", &[], 1.0));

        assert!(table.contains("oz/in³"));
        assert!(table.get("kg/m³").is_none());
        assert_eq!(table.anchor().map(|u| u.symbol.as_str()), Some("lb/ft³"));
        assert_eq!(table.symbols().collect::<Vec<_>>(), vec!["oz/in³", "lb/ft³"]);
    }

    #[test]
    fn test_counterpart() {
        assert_eq!(UnitSystem::Metric.counterpart(), UnitSystem::Imperial);
        assert_eq!(UnitSystem::Imperial.counterpart(), UnitSystem::Metric);
    }
}
