//! Measure categories: one physical quantity with its unit systems

use std::collections::HashMap;
use std::fmt;
use serde::Serialize;
use tracing::warn;

use crate::{ConversionError, UnitDefinition, UnitSystem, UnitSystemTable};

/// Relative disagreement tolerated between two stated ratios before warning
const RATIO_DRIFT_TOLERANCE: f64 = 1e-3;

/// Where a cross-system factor came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioSource {
    /// `ratio` stated on the source table
    SourceTable,
    /// reciprocal of the `ratio` stated on the target table
    InvertedTargetTable,
    /// category-level `ratio` (METRIC -> IMPERIAL)
    Category,
    /// reciprocal of the category-level `ratio`
    InvertedCategory,
}

impl fmt::Display for RatioSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RatioSource::SourceTable => "source table",
            RatioSource::InvertedTargetTable => "inverted target table",
            RatioSource::Category => "category",
            RatioSource::InvertedCategory => "inverted category",
        };
        f.write_str(s)
    }
}

/// Factor converting one system's anchor quantity into another's
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedRatio {
    pub factor: f64,
    pub source: RatioSource,
}

/// A physical quantity (e.g. "torque") and its unit system tables.
///
/// Immutable once built; [`MeasureCategory::new`] validates the whole
/// definition and resolves the cross-system factors up front.
#[derive(Debug, Clone)]
pub struct MeasureCategory {
    key: String,
    ratio: Option<f64>,
    systems: Vec<UnitSystemTable>,
    index: HashMap<String, (UnitSystem, usize)>,
    ratios: HashMap<(UnitSystem, UnitSystem), ResolvedRatio>,
}

impl MeasureCategory {
    pub fn new(
        key: &str,
        ratio: Option<f64>,
        mut systems: Vec<UnitSystemTable>,
    ) -> Result<Self, ConversionError> {
        if key.trim().is_empty() {
            return Err(ConversionError::invalid(key, "category key must not be empty"));
        }
        if systems.is_empty() {
            return Err(ConversionError::invalid(key, "category defines no unit system"));
        }
        if let Some(r) = ratio {
            check_ratio(key, "category ratio", r)?;
        }

        systems.sort_by_key(|t| t.system);

        let mut index = HashMap::new();
        for (pos, table) in systems.iter().enumerate() {
            if pos > 0 && systems[pos - 1].system == table.system {
                return Err(ConversionError::invalid(key, format!("system {} defined twice", table.system)));
            }
            if table.units.is_empty() {
                return Err(ConversionError::invalid(key, format!("system {} has no units", table.system)));
            }
            if let Some(r) = table.ratio {
                check_ratio(key, &format!("{} ratio", table.system), r)?;
            }
            for (unit_pos, unit) in table.units.iter().enumerate() {
                check_unit(key, unit)?;
                if let Some((other, _)) = index.insert(unit.symbol.clone(), (table.system, unit_pos)) {
                    return Err(ConversionError::invalid(key, format!(
                        "unit '{}' defined twice ({} and {})", unit.symbol, other, table.system
                    )));
                }
            }
        }

        let ratios = resolve_ratios(key, ratio, &systems);

        Ok(MeasureCategory {
            key: key.to_string(),
            ratio,
            systems,
            index,
            ratios,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Category-level ratio as stated in the catalogue
    pub fn ratio(&self) -> Option<f64> {
        self.ratio
    }

    /// Tables ordered METRIC first
    pub fn systems(&self) -> &[UnitSystemTable] {
        &self.systems
    }

    pub fn system_names(&self) -> Vec<UnitSystem> {
        self.systems.iter().map(|t| t.system).collect()
    }

    pub fn table(&self, system: UnitSystem) -> Option<&UnitSystemTable> {
        self.systems.iter().find(|t| t.system == system)
    }

    /// Resolve a symbol to its system and definition
    pub fn resolve(&self, symbol: &str) -> Option<(UnitSystem, &UnitDefinition)> {
        let (system, pos) = *self.index.get(symbol)?;
        let table = self.table(system)?;
        table.units.get(pos).map(|u| (system, u))
    }

    /// Factor converting `from`'s anchor quantity into `to`'s, if one is known
    pub fn cross_ratio(&self, from: UnitSystem, to: UnitSystem) -> Option<ResolvedRatio> {
        self.ratios.get(&(from, to)).copied()
    }

    /// All units; one system or every system flattened in order
    pub fn units(&self, system: Option<UnitSystem>) -> Vec<&UnitDefinition> {
        self.units_with_system(system).into_iter().map(|(_, u)| u).collect()
    }

    /// Like `units`, with each definition paired with the system it belongs to
    pub fn units_with_system(&self, system: Option<UnitSystem>) -> Vec<(UnitSystem, &UnitDefinition)> {
        self.systems.iter()
            .filter(|t| system.map_or(true, |s| s == t.system))
            .flat_map(|t| t.units.iter().map(move |u| (t.system, u)))
            .collect()
    }

    pub fn unit_count(&self) -> usize {
        self.index.len()
    }
}

fn check_ratio(key: &str, what: &str, ratio: f64) -> Result<(), ConversionError> {
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(ConversionError::invalid(key, format!("{} must be finite and positive, got {}", what, ratio)));
    }
    Ok(())
}

fn check_unit(key: &str, unit: &UnitDefinition) -> Result<(), ConversionError> {
    if unit.symbol.trim().is_empty() {
        return Err(ConversionError::invalid(key, "unit symbol must not be empty"));
    }
    if !unit.to_anchor.is_finite() || unit.to_anchor <= 0.0 {
        return Err(ConversionError::invalid(key, format!(
            "unit '{}': to_anchor must be finite and positive, got {}", unit.symbol, unit.to_anchor
        )));
    }
    if let Some(problem) = unit.transform.as_ref().and_then(|t| t.invertibility_problem()) {
        return Err(ConversionError::invalid(key, format!("unit '{}': {}", unit.symbol, problem)));
    }
    Ok(())
}

/// One factor per ordered pair of systems: the source table's own ratio,
/// else the inverted target ratio, else the category ratio.
fn resolve_ratios(
    key: &str,
    category_ratio: Option<f64>,
    systems: &[UnitSystemTable],
) -> HashMap<(UnitSystem, UnitSystem), ResolvedRatio> {
    let mut ratios = HashMap::new();

    for source in systems {
        for target in systems.iter().filter(|t| t.system != source.system) {
            let resolved = if let Some(r) = source.ratio {
                Some(ResolvedRatio { factor: r, source: RatioSource::SourceTable })
            } else if let Some(r) = target.ratio {
                Some(ResolvedRatio { factor: 1.0 / r, source: RatioSource::InvertedTargetTable })
            } else {
                category_ratio.map(|r| match source.system {
                    UnitSystem::Metric => ResolvedRatio { factor: r, source: RatioSource::Category },
                    UnitSystem::Imperial => ResolvedRatio { factor: 1.0 / r, source: RatioSource::InvertedCategory },
                })
            };

            if let Some(resolved) = resolved {
                ratios.insert((source.system, target.system), resolved);
            }
        }
    }

    if let (Some(m), Some(i)) = (
        systems.iter().find(|t| t.system == UnitSystem::Metric).and_then(|t| t.ratio),
        systems.iter().find(|t| t.system == UnitSystem::Imperial).and_then(|t| t.ratio),
    ) {
        let drift = (m * i - 1.0).abs();
        if drift > RATIO_DRIFT_TOLERANCE {
            warn!(category = key, metric_ratio = m, imperial_ratio = i, drift,
                "stated ratios are not reciprocal; each direction uses its source table's ratio");
        }
    }

    ratios
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Transform;

    fn density() -> MeasureCategory {
        MeasureCategory::new("density", None, vec![
            UnitSystemTable::new(UnitSystem::Imperial)
                .with_ratio(16.0185)
                .with_unit(UnitDefinition::new("lb/ft³", "unit.pound-per-cubic-foot", &[], 1.0)),
            UnitSystemTable::new(UnitSystem::Metric)
                .with_ratio(0.062428)
                .with_unit(UnitDefinition::new("kg/m³", "unit.kilogram-per-cubic-meter", &[], 1.0))
                .with_unit(UnitDefinition::new("g/cm³", "unit.gram-per-cubic-centimeter", &[], 1000.0)),
        ]).unwrap()
    }

    #[test]
    fn test_systems_sorted_metric_first() {
        let cat = density();
        assert_eq!(cat.system_names(), vec![UnitSystem::Metric, UnitSystem::Imperial]);
        assert_eq!(cat.unit_count(), 3);
    }

    #[test]
    fn test_resolve() {
        let cat = density();
        let (system, unit) = cat.resolve("g/cm³").unwrap();
        assert_eq!(system, UnitSystem::Metric);
        assert_eq!(unit.to_anchor, 1000.0);
        assert!(cat.resolve("oz").is_none());
    }

    #[test]
    fn test_each_direction_uses_its_source_ratio() {
        let cat = density();
        let forward = cat.cross_ratio(UnitSystem::Metric, UnitSystem::Imperial).unwrap();
        let backward = cat.cross_ratio(UnitSystem::Imperial, UnitSystem::Metric).unwrap();
        assert_eq!(forward, ResolvedRatio { factor: 0.062428, source: RatioSource::SourceTable });
        assert_eq!(backward, ResolvedRatio { factor: 16.0185, source: RatioSource::SourceTable });
    }

    #[test]
    fn test_missing_forward_ratio_inverts_target() {
        let cat = MeasureCategory::new("length", None, vec![
            UnitSystemTable::new(UnitSystem::Metric)
                .with_unit(UnitDefinition::new("m", "unit.meter", &[], 1.0)),
            UnitSystemTable::new(UnitSystem::Imperial)
                .with_ratio(0.3048)
                .with_unit(UnitDefinition::new("ft", "unit.foot", &[], 1.0)),
        ]).unwrap();
        let r = cat.cross_ratio(UnitSystem::Metric, UnitSystem::Imperial).unwrap();
        assert_eq!(r.source, RatioSource::InvertedTargetTable);
        assert!((r.factor - 1.0 / 0.3048).abs() < 1e-12);
    }

    #[test]
    fn test_category_ratio_fallback() {
        let cat = MeasureCategory::new("illuminance", Some(0.092903), vec![
            UnitSystemTable::new(UnitSystem::Metric)
                .with_unit(UnitDefinition::new("lx", "unit.lux", &[], 1.0)),
            UnitSystemTable::new(UnitSystem::Imperial)
                .with_unit(UnitDefinition::new("fc", "unit.foot-candle", &[], 1.0)),
        ]).unwrap();
        assert_eq!(cat.cross_ratio(UnitSystem::Metric, UnitSystem::Imperial).unwrap().source, RatioSource::Category);
        let back = cat.cross_ratio(UnitSystem::Imperial, UnitSystem::Metric).unwrap();
        assert_eq!(back.source, RatioSource::InvertedCategory);
        assert!((back.factor - 1.0 / 0.092903).abs() < 1e-9);
    }

    #[test]
    fn test_no_ratio_at_all() {
        let cat = MeasureCategory::new("torque", None, vec![
            UnitSystemTable::new(UnitSystem::Metric)
                .with_unit(UnitDefinition::new("Nm", "unit.newton-meter", &[], 1.0)),
            UnitSystemTable::new(UnitSystem::Imperial)
                .with_unit(UnitDefinition::new("lbf·ft", "unit.pound-force-foot", &[], 1.0)),
        ]).unwrap();
        assert!(cat.cross_ratio(UnitSystem::Metric, UnitSystem::Imperial).is_none());
    }

    #[test]
    fn test_units_listing() {
        let cat = density();
        assert_eq!(cat.units(None).len(), 3);
        let imperial: Vec<&str> = cat.units(Some(UnitSystem::Imperial)).iter().map(|u| u.symbol.as_str()).collect();
        assert_eq!(imperial, vec!["lb/ft³"]);
    }

    #[test]
    fn test_units_with_system() {
        let cat = density();
        let all: Vec<(UnitSystem, &str)> = cat.units_with_system(None).iter()
            .map(|(s, u)| (*s, u.symbol.as_str()))
            .collect();
        assert_eq!(all, vec![
            (UnitSystem::Metric, "kg/m³"),
            (UnitSystem::Metric, "g/cm³"),
            (UnitSystem::Imperial, "lb/ft³"),
        ]);
        assert_eq!(cat.units_with_system(Some(UnitSystem::Imperial)).len(), 1);
    }

    #[test]
    fn test_rejects_non_positive_to_anchor() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = MeasureCategory::new("mass", None, vec![
                UnitSystemTable::new(UnitSystem::Metric)
                    .with_unit(UnitDefinition::new("kg", "unit.kilogram", &[], bad)),
            ]).unwrap_err();
            assert!(matches!(err, ConversionError::InvalidCatalogueEntry { .. }));
        }
    }

    #[test]
    fn test_rejects_duplicate_symbol_across_systems() {
        let err = MeasureCategory::new("volume", None, vec![
            UnitSystemTable::new(UnitSystem::Metric)
                .with_unit(UnitDefinition::new("gal", "unit.gallon", &[], 1.0)),
            UnitSystemTable::new(UnitSystem::Imperial)
                .with_unit(UnitDefinition::new("gal", "unit.gallon", &[], 1.0)),
        ]).unwrap_err();
        assert!(err.to_string().contains("defined twice"));
    }

    #[test]
    fn test_rejects_duplicate_system() {
        let err = MeasureCategory::new("mass", None, vec![
            UnitSystemTable::new(UnitSystem::Metric).with_unit(UnitDefinition::new("kg", "unit.kilogram", &[], 1.0)),
            UnitSystemTable::new(UnitSystem::Metric).with_unit(UnitDefinition::new("g", "unit.gram", &[], 0.001)),
        ]).unwrap_err();
        assert!(err.to_string().contains("METRIC defined twice"));
    }

    #[test]
    fn test_rejects_empty_definitions() {
        assert!(MeasureCategory::new("", None, vec![]).is_err());
        assert!(MeasureCategory::new("mass", None, vec![]).is_err());
        assert!(MeasureCategory::new("mass", None, vec![UnitSystemTable::new(UnitSystem::Metric)]).is_err());
    }

    #[test]
    fn test_rejects_blank_symbol() {
        for blank in ["", "   "] {
            let err = MeasureCategory::new("mass", None, vec![
                UnitSystemTable::new(UnitSystem::Metric)
                    .with_unit(UnitDefinition::new("kg", "unit.kilogram", &[], 1.0))
                    .with_unit(UnitDefinition::new(blank, "unit.blank", &[], 2.0)),
            ]).unwrap_err();
            assert_eq!(err, ConversionError::InvalidCatalogueEntry {
                category: "mass".into(),
                detail: "unit symbol must not be empty".into(),
            });
        }
    }

    #[test]
    fn test_rejects_bad_ratio_and_transform() {
        let bad_ratio = MeasureCategory::new("mass", None, vec![
            UnitSystemTable::new(UnitSystem::Metric)
                .with_ratio(-2.0)
                .with_unit(UnitDefinition::new("kg", "unit.kilogram", &[], 1.0)),
        ]);
        assert!(bad_ratio.is_err());

        let bad_transform = MeasureCategory::new("fuel-efficiency", None, vec![
            UnitSystemTable::new(UnitSystem::Metric)
                .with_unit(UnitDefinition::new("L/100km", "unit.liter-per-100-km", &[], 1.0)
                    .with_transform(Transform::reciprocal(0.0))),
        ]);
        assert!(bad_transform.is_err());
    }
}
