//! Measure Core - Fundamental types
//!
//! This crate provides the core types shared by the Measure workspace:
//! - `Value`: Runtime values (numbers, text, objects, errors)
//! - `MeasureError`: Structured errors for tool and LLM consumption

mod value;
mod error;

pub use value::Value;
pub use error::{MeasureError, Severity, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Value, MeasureError, Severity};
    pub use crate::error::codes;
}

#[cfg(test)]
mod tests {
    use super::*;

    mod value_tests {
        use super::*;

        #[test]
        fn test_accessors() {
            let v = Value::Number(62.428);
            assert_eq!(v.as_number(), Some(62.428));
            assert!(v.as_text().is_none());
            assert_eq!(v.type_name(), "Number");
        }

        #[test]
        fn test_object_get() {
            let obj = Value::object([("symbol", Value::from("kg/m³")), ("to_anchor", Value::from(1.0))]);
            assert_eq!(obj.get("symbol").as_text(), Some("kg/m³"));
            assert!(obj.get("missing").is_error());
            assert!(Value::Null.get("x").is_error());
        }

        #[test]
        fn test_error_propagates_through_get() {
            let err = Value::Error(MeasureError::not_found("nope"));
            match err.get("field") {
                Value::Error(e) => assert!(e.is(codes::NOT_FOUND)),
                other => panic!("expected error, got {:?}", other),
            }
        }

        #[test]
        fn test_to_json() {
            let v = Value::object([
                ("value", Value::from(5.0)),
                ("unit", Value::from("L/100km")),
                ("tags", Value::List(vec![Value::from("fuel")])),
            ]);
            assert_eq!(v.to_json(), serde_json::json!({"value": 5.0, "unit": "L/100km", "tags": ["fuel"]}));
        }

        #[test]
        fn test_non_finite_numbers_become_text() {
            assert_eq!(Value::Number(f64::INFINITY).to_json(), serde_json::json!("inf"));
        }

        #[test]
        fn test_error_to_json() {
            let v = Value::Error(MeasureError::new(codes::UNKNOWN_UNIT, "Unknown unit: x"));
            let json = v.to_json();
            assert_eq!(json["_error"]["code"], "UNKNOWN_UNIT");
        }

        #[test]
        fn test_display() {
            assert_eq!(Value::Number(5.0).to_string(), "5");
            assert_eq!(Value::List(vec![Value::from("a"), Value::from(true)]).to_string(), "[a, true]");
            assert_eq!(Value::Error(MeasureError::not_found("x")).to_string(), "#ERROR: NOT_FOUND");
        }
    }
}
