//! Conversion engine
//!
//! Pure functions over a [`CategoryRegistry`]. A conversion normalizes the
//! value into its own system's anchor domain, crosses into the target
//! system's anchor domain when the systems differ, then leaves the anchor
//! domain through the target unit. Results are never rounded here.

use tracing::trace;

use crate::{CategoryRegistry, ConversionError, MeasureCategory, ResolvedRatio, UnitDefinition, UnitSystem};

/// Convert `value` from one unit to another within a category
pub fn convert(
    registry: &CategoryRegistry,
    category: &str,
    from: &str,
    to: &str,
    value: f64,
) -> Result<f64, ConversionError> {
    let plan = plan(registry.lookup(category)?, from, to)?;
    let result = plan.apply(value);
    trace!(category, from, to, value, result, "converted");
    Ok(result)
}

/// Both ends of a conversion resolved, plus the cross-system factor if any
#[derive(Debug, Clone, Copy)]
pub struct ConversionPlan<'a> {
    pub from_system: UnitSystem,
    pub from: &'a UnitDefinition,
    pub to_system: UnitSystem,
    pub to: &'a UnitDefinition,
    /// `None` for same-system conversions
    pub ratio: Option<ResolvedRatio>,
}

impl ConversionPlan<'_> {
    pub fn is_identity(&self) -> bool {
        self.from.symbol == self.to.symbol
    }

    pub fn apply(&self, value: f64) -> f64 {
        if self.is_identity() {
            return value;
        }
        let mut anchor = self.from.to_anchor_value(value);
        if let Some(ratio) = self.ratio {
            anchor *= ratio.factor;
        }
        self.to.from_anchor_value(anchor)
    }
}

/// Resolve a conversion without performing it
pub fn plan<'a>(category: &'a MeasureCategory, from: &str, to: &str) -> Result<ConversionPlan<'a>, ConversionError> {
    let (from_system, from_unit) = resolve(category, from)?;
    let (to_system, to_unit) = resolve(category, to)?;

    let ratio = if from_system == to_system {
        None
    } else {
        let ratio = category.cross_ratio(from_system, to_system).ok_or_else(|| {
            ConversionError::CrossSystemUnsupported {
                category: category.key().to_string(),
                from: from.to_string(),
                to: to.to_string(),
                from_system,
                to_system,
            }
        })?;
        Some(ratio)
    };

    Ok(ConversionPlan {
        from_system,
        from: from_unit,
        to_system,
        to: to_unit,
        ratio,
    })
}

fn resolve<'a>(category: &'a MeasureCategory, symbol: &str) -> Result<(UnitSystem, &'a UnitDefinition), ConversionError> {
    category.resolve(symbol).ok_or_else(|| ConversionError::UnknownUnit {
        category: category.key().to_string(),
        unit: symbol.to_string(),
    })
}

/// Anchor unit of one system of a category, if the table has one
pub fn anchor_unit<'a>(
    registry: &'a CategoryRegistry,
    category: &str,
    system: UnitSystem,
) -> Result<Option<&'a UnitDefinition>, ConversionError> {
    let cat = registry.lookup(category)?;
    let table = cat.table(system).ok_or_else(|| ConversionError::UnknownSystem {
        category: category.to_string(),
        system,
    })?;
    Ok(table.anchor())
}

/// Convert into the anchor unit of `system`.
///
/// Tables without an anchor fall back to their first linear unit, then to
/// their first unit.
pub fn convert_to_system(
    registry: &CategoryRegistry,
    category: &str,
    from: &str,
    system: UnitSystem,
    value: f64,
) -> Result<(String, f64), ConversionError> {
    let cat = registry.lookup(category)?;
    let table = cat.table(system).ok_or_else(|| ConversionError::UnknownSystem {
        category: category.to_string(),
        system,
    })?;
    let target = table.anchor()
        .or_else(|| table.units.iter().find(|u| u.is_linear()))
        .or_else(|| table.units.first())
        .ok_or_else(|| ConversionError::UnknownSystem { category: category.to_string(), system })?;

    let result = plan(cat, from, &target.symbol)?.apply(value);
    Ok((target.symbol.clone(), result))
}

/// Pick the linear unit of `from`'s system in which `value` reads best.
///
/// Returns `from` and the value unchanged when no other unit scores higher.
/// Transformed sources (L/100km, K) are always returned as they are.
pub fn best_unit(
    registry: &CategoryRegistry,
    category: &str,
    from: &str,
    value: f64,
) -> Result<(String, f64), ConversionError> {
    let cat = registry.lookup(category)?;
    let (system, from_unit) = resolve(cat, from)?;

    let mut best = (from_unit.symbol.clone(), value);
    if !from_unit.is_linear() {
        return Ok(best);
    }
    let mut best_score = score_value(value);

    for candidate in cat.units(Some(system)).into_iter().filter(|u| u.is_linear()) {
        if candidate.symbol == from_unit.symbol {
            continue;
        }
        let converted = plan(cat, from, &candidate.symbol)?.apply(value);
        let score = score_value(converted);
        if score > best_score {
            best_score = score;
            best = (candidate.symbol.clone(), converted);
        }
    }

    Ok(best)
}

/// Score a magnitude for display (1-1000 is ideal)
fn score_value(v: f64) -> f64 {
    let abs_val = v.abs();
    if abs_val == 0.0 {
        return 1.0;
    }
    if !abs_val.is_finite() {
        return 0.0;
    }

    if (1.0..=1000.0).contains(&abs_val) {
        100.0 - (abs_val.log10() - 1.5).abs() * 10.0
    } else if (0.001..1.0).contains(&abs_val) {
        50.0 - abs_val.log10().abs() * 5.0
    } else if abs_val > 1000.0 && abs_val <= 1_000_000.0 {
        50.0 - (abs_val.log10() - 3.0) * 5.0
    } else {
        10.0
    }
}
