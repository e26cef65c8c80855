//! Argument extraction and value shaping shared by the unit functions

use std::collections::BTreeMap;
use measure_core::{MeasureError, Value};

use crate::{MeasureCategory, UnitDefinition, UnitSystem};

/// Fail with ARG_COUNT unless at least `expected` arguments were passed
pub fn check_arg_count(args: &[Value], func: &str, expected: usize) -> Result<(), MeasureError> {
    if args.len() < expected {
        return Err(MeasureError::arg_count(func, expected, args.len()));
    }
    Ok(())
}

/// Extract a Number from a Value, returning error context
pub fn extract_number(value: &Value, func: &str, arg: &str) -> Result<f64, MeasureError> {
    match value {
        Value::Number(n) => Ok(*n),
        Value::Error(e) => Err(e.clone()),
        other => Err(MeasureError::arg_type(func, arg, "Number", other.type_name())),
    }
}

/// Extract a Text string from a Value
pub fn extract_text<'a>(value: &'a Value, func: &str, arg: &str) -> Result<&'a str, MeasureError> {
    match value {
        Value::Text(s) => Ok(s),
        Value::Error(e) => Err(e.clone()),
        other => Err(MeasureError::arg_type(func, arg, "Text", other.type_name())),
    }
}

/// Extract a unit system name ("METRIC", "imperial", "SI", ...)
pub fn extract_system(value: &Value, func: &str, arg: &str) -> Result<UnitSystem, MeasureError> {
    extract_text(value, func, arg)?
        .parse::<UnitSystem>()
        .map_err(|e| MeasureError::arg_type(func, arg, "METRIC|IMPERIAL", &e))
}

/// Optional unit system argument; missing or null means "all systems"
pub fn extract_optional_system(args: &[Value], index: usize, func: &str, arg: &str) -> Result<Option<UnitSystem>, MeasureError> {
    match args.get(index) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => extract_system(v, func, arg).map(Some),
    }
}

/// `{unit, value}` pair returned by functions that pick the target unit
pub fn quantity_value(unit: &str, value: Value) -> Value {
    Value::object([("unit", Value::from(unit)), ("value", value)])
}

/// Catalogue view of one unit
pub fn unit_to_value(system: UnitSystem, unit: &UnitDefinition) -> Value {
    Value::Object(unit_fields(system, unit))
}

/// Fields of [`unit_to_value`], for callers that add their own
pub fn unit_fields(system: UnitSystem, unit: &UnitDefinition) -> BTreeMap<String, Value> {
    let mut fields = BTreeMap::new();
    fields.insert("symbol".to_string(), Value::from(unit.symbol.as_str()));
    fields.insert("name".to_string(), Value::from(unit.name.as_str()));
    fields.insert("system".to_string(), Value::from(system.as_str()));
    fields.insert("tags".to_string(), Value::List(unit.tags.iter().map(|t| Value::from(t.as_str())).collect()));
    fields.insert("to_anchor".to_string(), Value::Number(unit.to_anchor));
    fields.insert("anchor".to_string(), Value::Bool(unit.is_anchor()));
    if let Some(t) = &unit.transform {
        fields.insert("transform".to_string(), Value::from(t.label()));
    }
    fields
}

/// Catalogue view of one category (without units)
pub fn category_to_value(category: &MeasureCategory) -> Value {
    Value::object([
        ("key", Value::from(category.key())),
        ("systems", Value::List(category.system_names().iter().map(|s| Value::from(s.as_str())).collect())),
        ("units", Value::Number(category.unit_count() as f64)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use measure_core::codes;

    #[test]
    fn test_extract_number() {
        assert_eq!(extract_number(&Value::Number(2.0), "f", "x").unwrap(), 2.0);
        let err = extract_number(&Value::from("2"), "f", "x").unwrap_err();
        assert!(err.is(codes::ARG_TYPE));
    }

    #[test]
    fn test_errors_propagate() {
        let inner = MeasureError::not_found("upstream");
        let err = extract_text(&Value::Error(inner.clone()), "f", "x").unwrap_err();
        assert_eq!(err, inner);
    }

    #[test]
    fn test_extract_system() {
        assert_eq!(extract_system(&Value::from("imperial"), "f", "s").unwrap(), UnitSystem::Imperial);
        assert!(extract_system(&Value::from("nautical"), "f", "s").unwrap_err().is(codes::ARG_TYPE));
        assert_eq!(extract_optional_system(&[], 0, "f", "s").unwrap(), None);
        assert_eq!(extract_optional_system(&[Value::Null], 0, "f", "s").unwrap(), None);
    }

    #[test]
    fn test_arg_count() {
        assert!(check_arg_count(&[Value::Null], "f", 2).unwrap_err().is(codes::ARG_COUNT));
        assert!(check_arg_count(&[Value::Null, Value::Null], "f", 2).is_ok());
    }
}
