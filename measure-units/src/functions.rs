//! Unit conversion functions
//!
//! Every function holds the shared registry and reports failures as
//! `Value::Error`, never by panicking.

use std::sync::Arc;
use measure_plugin::prelude::*;

use crate::engine;
use crate::helpers::*;
use crate::parse::{parse_conversion, parse_quantity};
use crate::CategoryRegistry;

// ============ convert ============

pub struct Convert {
    registry: Arc<CategoryRegistry>,
}

impl Convert {
    pub fn new(registry: Arc<CategoryRegistry>) -> Self {
        Self { registry }
    }

    fn eval(&self, args: &[Value], ctx: &EvalContext) -> Result<Value, MeasureError> {
        check_arg_count(args, "convert", 4)?;
        let value = extract_number(&args[0], "convert", "value")?;
        let category = extract_text(&args[1], "convert", "category")?;
        let from = extract_text(&args[2], "convert", "from_unit")?;
        let to = extract_text(&args[3], "convert", "to_unit")?;

        let result = engine::convert(&self.registry, category, from, to, value)?;
        Ok(ctx.number(result))
    }
}

static CONVERT_ARGS: [ArgMeta; 4] = [
    ArgMeta::required("value", "Number", "Value to convert"),
    ArgMeta::required("category", "Text", "Measure category (e.g., \"density\")"),
    ArgMeta::required("from_unit", "Text", "Source unit symbol (e.g., \"kg/m³\")"),
    ArgMeta::required("to_unit", "Text", "Target unit symbol (e.g., \"lb/ft³\")"),
];

static CONVERT_EXAMPLES: [&str; 3] = [
    "convert(1000, \"density\", \"kg/m³\", \"lb/ft³\") → 62.428",
    "convert(20, \"fuel-efficiency\", \"km/L\", \"L/100km\") → 5",
    "convert(212, \"temperature\", \"°F\", \"°C\") → 100",
];

static CONVERT_RELATED: [&str; 3] = ["in_units", "convert_quantity", "convert_to_system"];

impl FunctionPlugin for Convert {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "convert",
            description: "Convert a value between two units of a category",
            usage: "convert(value, category, from_unit, to_unit)",
            args: &CONVERT_ARGS,
            returns: "Number",
            examples: &CONVERT_EXAMPLES,
            category: "units",
            related: &CONVERT_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        self.eval(args, ctx).unwrap_or_else(Value::Error)
    }
}

// ============ in_units ============

pub struct InUnits {
    registry: Arc<CategoryRegistry>,
}

impl InUnits {
    pub fn new(registry: Arc<CategoryRegistry>) -> Self {
        Self { registry }
    }

    fn eval(&self, args: &[Value], ctx: &EvalContext) -> Result<Value, MeasureError> {
        check_arg_count(args, "in_units", 3)?;
        let value = extract_number(&args[0], "in_units", "value")?;
        let category = extract_text(&args[1], "in_units", "category")?;
        let spec = extract_text(&args[2], "in_units", "conversion")?;

        let (from, to) = parse_conversion(spec)?;
        let result = engine::convert(&self.registry, category, &from, &to, value)?;
        Ok(ctx.number(result))
    }
}

static IN_UNITS_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("value", "Number", "Value to convert"),
    ArgMeta::required("category", "Text", "Measure category"),
    ArgMeta::required("conversion", "Text", "Conversion spec (e.g., \"km/L -> L/100km\")"),
];

static IN_UNITS_EXAMPLES: [&str; 2] = [
    "in_units(20, \"fuel-efficiency\", \"km/L -> L/100km\") → 5",
    "in_units(5, \"length\", \"km to mi\") → 3.107",
];

static IN_UNITS_RELATED: [&str; 1] = ["convert"];

impl FunctionPlugin for InUnits {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "in_units",
            description: "Convert using a conversion spec like \"from -> to\"",
            usage: "in_units(value, category, \"from -> to\")",
            args: &IN_UNITS_ARGS,
            returns: "Number",
            examples: &IN_UNITS_EXAMPLES,
            category: "units",
            related: &IN_UNITS_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        self.eval(args, ctx).unwrap_or_else(Value::Error)
    }
}

// ============ convert_quantity ============

pub struct ConvertQuantity {
    registry: Arc<CategoryRegistry>,
}

impl ConvertQuantity {
    pub fn new(registry: Arc<CategoryRegistry>) -> Self {
        Self { registry }
    }

    fn eval(&self, args: &[Value], ctx: &EvalContext) -> Result<Value, MeasureError> {
        check_arg_count(args, "convert_quantity", 3)?;
        let category = extract_text(&args[0], "convert_quantity", "category")?;
        let quantity = extract_text(&args[1], "convert_quantity", "quantity")?;
        let to = extract_text(&args[2], "convert_quantity", "to_unit")?;

        let (value, from) = parse_quantity(quantity)?;
        let result = engine::convert(&self.registry, category, &from, to, value)?;
        Ok(quantity_value(to, ctx.number(result)))
    }
}

static CONVERT_QUANTITY_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("category", "Text", "Measure category"),
    ArgMeta::required("quantity", "Text", "Quantity string (e.g., \"1000 kg/m³\")"),
    ArgMeta::required("to_unit", "Text", "Target unit symbol"),
];

static CONVERT_QUANTITY_EXAMPLES: [&str; 1] = [
    "convert_quantity(\"density\", \"1000 kg/m³\", \"lb/ft³\") → {unit: \"lb/ft³\", value: 62.428}",
];

static CONVERT_QUANTITY_RELATED: [&str; 3] = ["convert", "extract_value", "extract_unit"];

impl FunctionPlugin for ConvertQuantity {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "convert_quantity",
            description: "Convert a quantity string such as \"1000 kg/m³\" to another unit",
            usage: "convert_quantity(category, quantity, to_unit)",
            args: &CONVERT_QUANTITY_ARGS,
            returns: "Object",
            examples: &CONVERT_QUANTITY_EXAMPLES,
            category: "units",
            related: &CONVERT_QUANTITY_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        self.eval(args, ctx).unwrap_or_else(Value::Error)
    }
}

// ============ convert_to_system ============

pub struct ConvertToSystem {
    registry: Arc<CategoryRegistry>,
}

impl ConvertToSystem {
    pub fn new(registry: Arc<CategoryRegistry>) -> Self {
        Self { registry }
    }

    fn eval(&self, args: &[Value], ctx: &EvalContext) -> Result<Value, MeasureError> {
        check_arg_count(args, "convert_to_system", 4)?;
        let value = extract_number(&args[0], "convert_to_system", "value")?;
        let category = extract_text(&args[1], "convert_to_system", "category")?;
        let from = extract_text(&args[2], "convert_to_system", "from_unit")?;
        let system = extract_system(&args[3], "convert_to_system", "system")?;

        let (unit, result) = engine::convert_to_system(&self.registry, category, from, system, value)?;
        Ok(quantity_value(&unit, ctx.number(result)))
    }
}

static CONVERT_TO_SYSTEM_ARGS: [ArgMeta; 4] = [
    ArgMeta::required("value", "Number", "Value to convert"),
    ArgMeta::required("category", "Text", "Measure category"),
    ArgMeta::required("from_unit", "Text", "Source unit symbol"),
    ArgMeta::required("system", "Text", "Target system: METRIC or IMPERIAL"),
];

static CONVERT_TO_SYSTEM_EXAMPLES: [&str; 1] = [
    "convert_to_system(1, \"length\", \"km\", \"IMPERIAL\") → {unit: \"ft\", value: 3280.84}",
];

static CONVERT_TO_SYSTEM_RELATED: [&str; 2] = ["convert", "best_unit"];

impl FunctionPlugin for ConvertToSystem {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "convert_to_system",
            description: "Convert a value to the anchor unit of a unit system",
            usage: "convert_to_system(value, category, from_unit, system)",
            args: &CONVERT_TO_SYSTEM_ARGS,
            returns: "Object",
            examples: &CONVERT_TO_SYSTEM_EXAMPLES,
            category: "units",
            related: &CONVERT_TO_SYSTEM_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        self.eval(args, ctx).unwrap_or_else(Value::Error)
    }
}

// ============ best_unit ============

pub struct BestUnit {
    registry: Arc<CategoryRegistry>,
}

impl BestUnit {
    pub fn new(registry: Arc<CategoryRegistry>) -> Self {
        Self { registry }
    }

    fn eval(&self, args: &[Value], ctx: &EvalContext) -> Result<Value, MeasureError> {
        check_arg_count(args, "best_unit", 3)?;
        let value = extract_number(&args[0], "best_unit", "value")?;
        let category = extract_text(&args[1], "best_unit", "category")?;
        let from = extract_text(&args[2], "best_unit", "from_unit")?;

        let (unit, result) = engine::best_unit(&self.registry, category, from, value)?;
        Ok(quantity_value(&unit, ctx.number(result)))
    }
}

static BEST_UNIT_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("value", "Number", "Value to express"),
    ArgMeta::required("category", "Text", "Measure category"),
    ArgMeta::required("from_unit", "Text", "Unit the value is in"),
];

static BEST_UNIT_EXAMPLES: [&str; 2] = [
    "best_unit(25000, \"length\", \"m\") → {unit: \"km\", value: 25}",
    "best_unit(0.0042, \"mass\", \"kg\") → {unit: \"g\", value: 4.2}",
];

static BEST_UNIT_RELATED: [&str; 2] = ["convert", "convert_to_system"];

impl FunctionPlugin for BestUnit {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "best_unit",
            description: "Re-express a value in the most readable unit of the same system",
            usage: "best_unit(value, category, from_unit)",
            args: &BEST_UNIT_ARGS,
            returns: "Object",
            examples: &BEST_UNIT_EXAMPLES,
            category: "units",
            related: &BEST_UNIT_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        self.eval(args, ctx).unwrap_or_else(Value::Error)
    }
}

// ============ list_categories ============

pub struct ListCategories {
    registry: Arc<CategoryRegistry>,
}

impl ListCategories {
    pub fn new(registry: Arc<CategoryRegistry>) -> Self {
        Self { registry }
    }
}

static LIST_CATEGORIES_ARGS: [ArgMeta; 0] = [];
static LIST_CATEGORIES_EXAMPLES: [&str; 1] = ["list_categories() → [{key: \"acceleration\", ...}, ...]"];
static LIST_CATEGORIES_RELATED: [&str; 1] = ["list_units"];

impl FunctionPlugin for ListCategories {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "list_categories",
            description: "List registered measure categories with their systems",
            usage: "list_categories()",
            args: &LIST_CATEGORIES_ARGS,
            returns: "List",
            examples: &LIST_CATEGORIES_EXAMPLES,
            category: "units",
            related: &LIST_CATEGORIES_RELATED,
        }
    }

    fn call(&self, _args: &[Value], _ctx: &EvalContext) -> Value {
        Value::List(self.registry.iter().map(category_to_value).collect())
    }
}

// ============ list_units ============

pub struct ListUnits {
    registry: Arc<CategoryRegistry>,
}

impl ListUnits {
    pub fn new(registry: Arc<CategoryRegistry>) -> Self {
        Self { registry }
    }

    fn eval(&self, args: &[Value]) -> Result<Value, MeasureError> {
        check_arg_count(args, "list_units", 1)?;
        let category = extract_text(&args[0], "list_units", "category")?;
        let system = extract_optional_system(args, 1, "list_units", "system")?;

        let units = self.registry.lookup(category)?
            .units_with_system(system)
            .into_iter()
            .map(|(sys, u)| unit_to_value(sys, u))
            .collect();
        Ok(Value::List(units))
    }
}

static LIST_UNITS_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("category", "Text", "Measure category"),
    ArgMeta::optional("system", "Text", "Restrict to METRIC or IMPERIAL", "all systems"),
];

static LIST_UNITS_EXAMPLES: [&str; 2] = [
    "list_units(\"torque\")",
    "list_units(\"density\", \"IMPERIAL\")",
];

static LIST_UNITS_RELATED: [&str; 2] = ["list_categories", "unit_info"];

impl FunctionPlugin for ListUnits {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "list_units",
            description: "List the units of a category, optionally of one system",
            usage: "list_units(category, [system])",
            args: &LIST_UNITS_ARGS,
            returns: "List",
            examples: &LIST_UNITS_EXAMPLES,
            category: "units",
            related: &LIST_UNITS_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        self.eval(args).unwrap_or_else(Value::Error)
    }
}

// ============ unit_info ============

pub struct UnitInfo {
    registry: Arc<CategoryRegistry>,
}

impl UnitInfo {
    pub fn new(registry: Arc<CategoryRegistry>) -> Self {
        Self { registry }
    }

    fn eval(&self, args: &[Value]) -> Result<Value, MeasureError> {
        check_arg_count(args, "unit_info", 2)?;
        let category = extract_text(&args[0], "unit_info", "category")?;
        let symbol = extract_text(&args[1], "unit_info", "unit")?;

        let cat = self.registry.lookup(category)?;
        let (system, unit) = self.registry.lookup_unit(category, symbol)?;

        let mut info = unit_fields(system, unit);
        info.insert("category".to_string(), Value::from(cat.key()));
        if let Some(anchor) = cat.table(system).and_then(|t| t.anchor()) {
            info.insert("anchor_unit".to_string(), Value::from(anchor.symbol.as_str()));
        }
        if let Some(ratio) = cat.cross_ratio(system, system.counterpart()) {
            info.insert("cross_ratio".to_string(), Value::object([
                ("to", Value::from(system.counterpart().as_str())),
                ("factor", Value::Number(ratio.factor)),
                ("source", Value::from(ratio.source.to_string())),
            ]));
        }
        Ok(Value::Object(info))
    }
}

static UNIT_INFO_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("category", "Text", "Measure category"),
    ArgMeta::required("unit", "Text", "Unit symbol"),
];

static UNIT_INFO_EXAMPLES: [&str; 1] = ["unit_info(\"fuel-efficiency\", \"L/100km\")"];

static UNIT_INFO_RELATED: [&str; 1] = ["list_units"];

impl FunctionPlugin for UnitInfo {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "unit_info",
            description: "Describe one unit: system, factor, transform and cross-system ratio",
            usage: "unit_info(category, unit)",
            args: &UNIT_INFO_ARGS,
            returns: "Object",
            examples: &UNIT_INFO_EXAMPLES,
            category: "units",
            related: &UNIT_INFO_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        self.eval(args).unwrap_or_else(Value::Error)
    }
}

// ============ extract_value / extract_unit ============

pub struct ExtractValue;

static EXTRACT_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("quantity", "Text", "Quantity string (e.g., \"1000 kg/m³\")"),
];

static EXTRACT_VALUE_EXAMPLES: [&str; 1] = ["extract_value(\"1000 kg/m³\") → 1000"];
static EXTRACT_UNIT_EXAMPLES: [&str; 1] = ["extract_unit(\"1000 kg/m³\") → \"kg/m³\""];
static EXTRACT_RELATED: [&str; 3] = ["extract_value", "extract_unit", "convert_quantity"];

impl FunctionPlugin for ExtractValue {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "extract_value",
            description: "Numeric part of a quantity string",
            usage: "extract_value(quantity)",
            args: &EXTRACT_ARGS,
            returns: "Number",
            examples: &EXTRACT_VALUE_EXAMPLES,
            category: "units",
            related: &EXTRACT_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let parsed = check_arg_count(args, "extract_value", 1)
            .and_then(|_| extract_text(&args[0], "extract_value", "quantity"))
            .and_then(|q| parse_quantity(q).map_err(MeasureError::from));
        match parsed {
            Ok((value, _)) => Value::Number(value),
            Err(e) => Value::Error(e),
        }
    }
}

pub struct ExtractUnit;

impl FunctionPlugin for ExtractUnit {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "extract_unit",
            description: "Unit symbol of a quantity string",
            usage: "extract_unit(quantity)",
            args: &EXTRACT_ARGS,
            returns: "Text",
            examples: &EXTRACT_UNIT_EXAMPLES,
            category: "units",
            related: &EXTRACT_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let parsed = check_arg_count(args, "extract_unit", 1)
            .and_then(|_| extract_text(&args[0], "extract_unit", "quantity"))
            .and_then(|q| parse_quantity(q).map_err(MeasureError::from));
        match parsed {
            Ok((_, unit)) => Value::Text(unit),
            Err(e) => Value::Error(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_units_library;

    fn registry() -> PluginRegistry {
        let units = Arc::new(CategoryRegistry::builtin().unwrap());
        load_units_library(PluginRegistry::new(), units)
    }

    fn call(name: &str, args: Vec<Value>) -> Value {
        registry().call_function(name, &args, &EvalContext::new())
    }

    fn text(s: &str) -> Value {
        Value::from(s)
    }

    #[test]
    fn test_all_functions_registered() {
        let r = registry();
        assert_eq!(r.function_count(), 10);
        for name in ["convert", "in_units", "convert_quantity", "convert_to_system", "best_unit",
                     "list_categories", "list_units", "unit_info", "extract_value", "extract_unit"] {
            assert!(r.get_function(name).is_some(), "{} missing", name);
            assert_eq!(r.get_function(name).unwrap().meta().category, "units");
        }
    }

    #[test]
    fn test_convert() {
        let result = call("convert", vec![Value::Number(20.0), text("fuel-efficiency"), text("km/L"), text("L/100km")]);
        assert_eq!(result, Value::Number(5.0));
    }

    #[test]
    fn test_convert_applies_precision() {
        let r = registry();
        let ctx = EvalContext::new().with_precision(Some(2));
        let result = r.call_function("convert",
            &[Value::Number(1000.0), text("density"), text("kg/m³"), text("oz/in³")], &ctx);
        assert_eq!(result, Value::Number(0.58));
    }

    #[test]
    fn test_convert_errors() {
        let result = call("convert", vec![Value::Number(1.0), text("torque"), text("Nm"), text("no-such-unit")]);
        assert!(result.as_error().unwrap().is(codes::UNKNOWN_UNIT));

        let result = call("convert", vec![Value::Number(1.0), text("no-such-category"), text("a"), text("b")]);
        assert!(result.as_error().unwrap().is(codes::UNKNOWN_CATEGORY));

        let result = call("convert", vec![Value::Number(1.0), text("torque")]);
        assert!(result.as_error().unwrap().is(codes::ARG_COUNT));

        let result = call("convert", vec![text("1"), text("torque"), text("Nm"), text("kNm")]);
        assert!(result.as_error().unwrap().is(codes::ARG_TYPE));
    }

    #[test]
    fn test_in_units() {
        let result = call("in_units", vec![Value::Number(5.0), text("fuel-efficiency"), text("L/100km -> km/L")]);
        assert_eq!(result, Value::Number(20.0));

        let result = call("in_units", vec![Value::Number(5.0), text("fuel-efficiency"), text("L/100km")]);
        assert!(result.as_error().unwrap().is(codes::PARSE_ERROR));
    }

    #[test]
    fn test_convert_quantity() {
        let result = call("convert_quantity", vec![text("density"), text("1000 kg/m³"), text("lb/ft³")]);
        assert_eq!(result.get("unit").as_text(), Some("lb/ft³"));
        let value = result.get("value").as_number().unwrap();
        assert!((value - 62.428).abs() < 1e-9);
    }

    #[test]
    fn test_convert_to_system() {
        let result = call("convert_to_system", vec![Value::Number(1.0), text("torque"), text("kNm"), text("imperial")]);
        assert_eq!(result.get("unit").as_text(), Some("lbf·ft"));
        assert!((result.get("value").as_number().unwrap() - 737.562).abs() < 1e-9);

        let result = call("convert_to_system", vec![Value::Number(1.0), text("torque"), text("kNm"), text("nautical")]);
        assert!(result.as_error().unwrap().is(codes::ARG_TYPE));
    }

    #[test]
    fn test_best_unit() {
        let result = call("best_unit", vec![Value::Number(25_000.0), text("length"), text("m")]);
        assert_eq!(result.get("unit").as_text(), Some("km"));
        assert_eq!(result.get("value").as_number(), Some(25.0));
    }

    #[test]
    fn test_list_categories() {
        let result = call("list_categories", vec![]);
        let list = result.as_list().unwrap();
        assert!(list.len() >= 24);
        let density = list.iter().find(|c| c.get("key").as_text() == Some("density")).unwrap();
        assert_eq!(density.get("systems").as_list().unwrap().len(), 2);
    }

    #[test]
    fn test_list_units() {
        let all = call("list_units", vec![text("fuel-efficiency")]);
        assert_eq!(all.as_list().unwrap().len(), 5);
        let imperial = all.as_list().unwrap().iter()
            .filter(|u| u.get("system").as_text() == Some("IMPERIAL"))
            .count();
        assert_eq!(imperial, 3);

        let metric = call("list_units", vec![text("fuel-efficiency"), text("METRIC")]);
        let symbols: Vec<&str> = metric.as_list().unwrap().iter()
            .filter_map(|u| match u {
                Value::Object(o) => o.get("symbol").and_then(|s| s.as_text()),
                _ => None,
            })
            .collect();
        assert_eq!(symbols, vec!["km/L", "L/100km"]);
    }

    #[test]
    fn test_unit_info() {
        let info = call("unit_info", vec![text("fuel-efficiency"), text("L/100km")]);
        assert_eq!(info.get("system").as_text(), Some("METRIC"));
        assert_eq!(info.get("anchor_unit").as_text(), Some("km/L"));
        assert_eq!(info.get("transform").as_text(), Some("100 / x"));
        assert_eq!(info.get("cross_ratio").get("factor").as_number(), Some(2.352145));

        let info = call("unit_info", vec![text("fuel-efficiency"), text("mpg-us")]);
        assert!(info.as_error().unwrap().is(codes::UNKNOWN_UNIT));
    }

    #[test]
    fn test_extract() {
        assert_eq!(call("extract_value", vec![text("1000 kg/m³")]), Value::Number(1000.0));
        assert_eq!(call("extract_unit", vec![text("1000 kg/m³")]), text("kg/m³"));
        assert!(call("extract_unit", vec![text("kg/m³")]).as_error().unwrap().is(codes::PARSE_ERROR));
        assert!(call("extract_value", vec![]).as_error().unwrap().is(codes::ARG_COUNT));
    }

    #[test]
    fn test_help_lists_units_functions() {
        let r = registry();
        let list = r.list_functions(Some("units"));
        assert_eq!(list.as_list().unwrap().len(), 10);
        let help = r.help(Some("convert"));
        assert_eq!(help.get("usage").as_text(), Some("convert(value, category, from_unit, to_unit)"));
    }
}
