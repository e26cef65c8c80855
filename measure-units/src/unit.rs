//! Unit definitions and non-linear transforms

use std::fmt;
use serde::{Serialize, Deserialize};

/// A non-linear mapping from a unit's native representation into the anchor
/// domain of its system table.
///
/// Every variant carries its inverse so the engine can convert *out of* the
/// anchor domain without guessing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transform {
    /// `anchor = numerator / value` (e.g. L/100km against km/L). Self-inverse.
    Reciprocal { numerator: f64 },
    /// `anchor = value * scale + offset` (e.g. °F against °C).
    Affine { scale: f64, offset: f64 },
    /// Arbitrary pair of functions supplied in code. Not representable in JSON.
    #[serde(skip)]
    Custom(CustomTransform),
}

/// Forward/inverse function pair for transforms built in code
#[derive(Clone, Copy)]
pub struct CustomTransform {
    pub name: &'static str,
    pub forward: fn(f64) -> f64,
    pub inverse: fn(f64) -> f64,
}

impl fmt::Debug for CustomTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomTransform").field("name", &self.name).finish()
    }
}

impl Transform {
    pub fn reciprocal(numerator: f64) -> Self {
        Transform::Reciprocal { numerator }
    }

    pub fn affine(scale: f64, offset: f64) -> Self {
        Transform::Affine { scale, offset }
    }

    pub fn custom(name: &'static str, forward: fn(f64) -> f64, inverse: fn(f64) -> f64) -> Self {
        Transform::Custom(CustomTransform { name, forward, inverse })
    }

    /// Native value -> anchor domain
    pub fn forward(&self, value: f64) -> f64 {
        match self {
            Transform::Reciprocal { numerator } => numerator / value,
            Transform::Affine { scale, offset } => value * scale + offset,
            Transform::Custom(c) => (c.forward)(value),
        }
    }

    /// Anchor domain -> native value
    pub fn inverse(&self, anchor: f64) -> f64 {
        match self {
            Transform::Reciprocal { numerator } => numerator / anchor,
            Transform::Affine { scale, offset } => (anchor - offset) / scale,
            Transform::Custom(c) => (c.inverse)(anchor),
        }
    }

    /// Reason this transform cannot be inverted, if any
    pub(crate) fn invertibility_problem(&self) -> Option<String> {
        match self {
            Transform::Reciprocal { numerator } if *numerator == 0.0 || !numerator.is_finite() => {
                Some(format!("reciprocal numerator must be finite and non-zero, got {}", numerator))
            }
            Transform::Affine { scale, offset } if *scale == 0.0 || !scale.is_finite() || !offset.is_finite() => {
                Some(format!("affine transform needs a finite non-zero scale and finite offset, got scale={} offset={}", scale, offset))
            }
            _ => None,
        }
    }

    /// Short label for listings
    pub fn label(&self) -> String {
        match self {
            Transform::Reciprocal { numerator } => format!("{} / x", numerator),
            Transform::Affine { scale, offset } => format!("x * {} + {}", scale, offset),
            Transform::Custom(c) => c.name.to_string(),
        }
    }
}

/// One unit of a system table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitDefinition {
    /// Unit symbol, unique within its table (e.g. "kg/m³")
    pub symbol: String,
    /// Opaque key of the localized label (e.g. "unit.kilogram-per-cubic-meter")
    pub name: String,
    /// Search keywords
    #[serde(default)]
    pub tags: Vec<String>,
    /// Linear factor from this unit to the table's anchor unit
    pub to_anchor: f64,
    /// Non-linear override of `to_anchor`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
}

impl UnitDefinition {
    pub fn new(symbol: &str, name: &str, tags: &[&str], to_anchor: f64) -> Self {
        UnitDefinition {
            symbol: symbol.to_string(),
            name: name.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            to_anchor,
            transform: None,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Linear units scale by `to_anchor` only
    pub fn is_linear(&self) -> bool {
        self.transform.is_none()
    }

    /// Anchor unit of its table: factor 1 and no transform
    pub fn is_anchor(&self) -> bool {
        self.is_linear() && self.to_anchor == 1.0
    }

    /// Native value -> anchor domain
    pub fn to_anchor_value(&self, value: f64) -> f64 {
        match &self.transform {
            Some(t) => t.forward(value),
            None => value * self.to_anchor,
        }
    }

    /// Anchor domain -> native value
    pub fn from_anchor_value(&self, anchor: f64) -> f64 {
        match &self.transform {
            Some(t) => t.inverse(anchor),
            None => anchor / self.to_anchor,
        }
    }
}

impl fmt::Display for UnitDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn liters_per_100km() -> UnitDefinition {
        UnitDefinition::new("L/100km", "unit.liter-per-100-km", &["fuel"], 1.0)
            .with_transform(Transform::reciprocal(100.0))
    }

    fn fahrenheit() -> UnitDefinition {
        UnitDefinition::new("°F", "unit.fahrenheit", &["temperature"], 1.0)
            .with_transform(Transform::affine(5.0 / 9.0, -160.0 / 9.0))
    }

    #[test]
    fn test_linear_scaling() {
        let km = UnitDefinition::new("km", "unit.kilometer", &[], 1000.0);
        assert_eq!(km.to_anchor_value(5.0), 5000.0);
        assert_eq!(km.from_anchor_value(5000.0), 5.0);
        assert!(km.is_linear());
        assert!(!km.is_anchor());
    }

    #[test]
    fn test_transform_overrides_to_anchor() {
        let unit = UnitDefinition::new("L/100km", "unit.liter-per-100-km", &[], 42.0)
            .with_transform(Transform::reciprocal(100.0));
        assert_eq!(unit.to_anchor_value(20.0), 5.0);
    }

    #[test]
    fn test_reciprocal_round_trip() {
        let unit = liters_per_100km();
        assert_eq!(unit.to_anchor_value(5.0), 20.0);
        assert_eq!(unit.from_anchor_value(20.0), 5.0);
    }

    #[test]
    fn test_affine_inverse() {
        let unit = fahrenheit();
        assert!((unit.to_anchor_value(212.0) - 100.0).abs() < 1e-9);
        assert!((unit.from_anchor_value(100.0) - 212.0).abs() < 1e-9);
        assert!((unit.from_anchor_value(0.0) - 32.0).abs() < 1e-9);
    }

    #[test]
    fn test_custom_transform() {
        fn to_db(x: f64) -> f64 { 10f64.powf(x / 10.0) }
        fn from_db(x: f64) -> f64 { 10.0 * x.log10() }
        let t = Transform::custom("decibel", to_db, from_db);
        assert!((t.forward(30.0) - 1000.0).abs() < 1e-9);
        assert!((t.inverse(1000.0) - 30.0).abs() < 1e-9);
        assert_eq!(t.label(), "decibel");
    }

    #[test]
    fn test_invertibility() {
        assert!(Transform::reciprocal(0.0).invertibility_problem().is_some());
        assert!(Transform::affine(0.0, 1.0).invertibility_problem().is_some());
        assert!(Transform::affine(f64::NAN, 1.0).invertibility_problem().is_some());
        assert!(Transform::affine(1.8, 32.0).invertibility_problem().is_none());
    }

    #[test]
    fn test_deserialize_unit() {
        let json = r#"{
            "symbol": "L/100km",
            "name": "unit.liter-per-100-km",
            "tags": ["fuel consumption"],
            "to_anchor": 1,
            "transform": { "kind": "reciprocal", "numerator": 100 }
        }"#;
        let unit: UnitDefinition = serde_json::from_str(json).unwrap();
        assert!(!unit.is_linear());
        assert_eq!(unit.to_anchor_value(4.0), 25.0);
    }
}
