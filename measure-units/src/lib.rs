//! Measure Units - Category-based unit conversion
//!
//! Units are grouped into measure categories (density, torque, fuel
//! efficiency, ...). Each category holds one table per unit system
//! (METRIC, IMPERIAL), every table anchored on one unit. Converting
//! normalizes into the anchor domain, crosses systems through the
//! category's stated ratios, and leaves through the target unit.
//!
//! Non-linear units (L/100km, °F) carry a [`Transform`] with an explicit
//! inverse.
//!
//! ```ignore
//! let registry = CategoryRegistry::builtin()?;
//! let lb_ft3 = registry.convert("density", "kg/m³", "lb/ft³", 1000.0)?; // ≈ 62.428
//! ```

mod error;
mod unit;
mod system;
mod category;
mod registry;
mod engine;
mod parse;
mod helpers;
mod functions;
pub mod catalogue;

pub use error::ConversionError;
pub use unit::{Transform, CustomTransform, UnitDefinition};
pub use system::{UnitSystem, UnitSystemTable};
pub use category::{MeasureCategory, RatioSource, ResolvedRatio};
pub use catalogue::{CategorySpec, SystemSpec, UnitSpec, builtin_catalogue, parse_catalogue, load_catalogue_file, merge_catalogues};
pub use registry::CategoryRegistry;
pub use engine::{convert, plan, anchor_unit, convert_to_system, best_unit, ConversionPlan};
pub use parse::{parse_conversion, parse_quantity};

use std::sync::Arc;
use measure_plugin::PluginRegistry;

/// Load unit functions into registry, all sharing one category registry
pub fn load_units_library(registry: PluginRegistry, units: Arc<CategoryRegistry>) -> PluginRegistry {
    registry
        // Conversion (5 functions)
        .with_function(functions::Convert::new(units.clone()))
        .with_function(functions::InUnits::new(units.clone()))
        .with_function(functions::ConvertQuantity::new(units.clone()))
        .with_function(functions::ConvertToSystem::new(units.clone()))
        .with_function(functions::BestUnit::new(units.clone()))

        // Catalogue inspection (3 functions)
        .with_function(functions::ListCategories::new(units.clone()))
        .with_function(functions::ListUnits::new(units.clone()))
        .with_function(functions::UnitInfo::new(units))

        // Quantity strings (2 functions)
        .with_function(functions::ExtractValue)
        .with_function(functions::ExtractUnit)
}
