//! Conversion and catalogue errors

use measure_core::{codes, MeasureError, Severity};
use thiserror::Error;

use crate::UnitSystem;

/// Everything the registry and the conversion engine can report.
///
/// All variants are deterministic caller or catalogue errors; none of them
/// is worth retrying.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("unknown measure category: {0}")]
    UnknownCategory(String),

    #[error("unknown unit '{unit}' in category '{category}'")]
    UnknownUnit { category: String, unit: String },

    #[error("category '{category}' has no {system} units")]
    UnknownSystem { category: String, system: UnitSystem },

    #[error("cannot convert '{from}' ({from_system}) to '{to}' ({to_system}) in category '{category}': no ratio links the two systems")]
    CrossSystemUnsupported {
        category: String,
        from: String,
        to: String,
        from_system: UnitSystem,
        to_system: UnitSystem,
    },

    #[error("invalid catalogue entry in '{category}': {detail}")]
    InvalidCatalogueEntry { category: String, detail: String },

    #[error("cannot parse '{input}': {detail}")]
    Parse { input: String, detail: String },

    #[error("catalogue could not be read: {0}")]
    Catalogue(String),
}

impl ConversionError {
    pub(crate) fn invalid(category: &str, detail: impl Into<String>) -> Self {
        ConversionError::InvalidCatalogueEntry {
            category: category.to_string(),
            detail: detail.into(),
        }
    }

    pub(crate) fn parse(input: &str, detail: impl Into<String>) -> Self {
        ConversionError::Parse {
            input: input.to_string(),
            detail: detail.into(),
        }
    }

    /// Machine-readable code shared with `MeasureError`
    pub fn code(&self) -> &'static str {
        match self {
            ConversionError::UnknownCategory(_) => codes::UNKNOWN_CATEGORY,
            ConversionError::UnknownUnit { .. } => codes::UNKNOWN_UNIT,
            ConversionError::UnknownSystem { .. } => codes::UNKNOWN_SYSTEM,
            ConversionError::CrossSystemUnsupported { .. } => codes::CROSS_SYSTEM_UNSUPPORTED,
            ConversionError::InvalidCatalogueEntry { .. } | ConversionError::Catalogue(_) => {
                codes::INVALID_CATALOGUE_ENTRY
            }
            ConversionError::Parse { .. } => codes::PARSE_ERROR,
        }
    }
}

impl From<ConversionError> for MeasureError {
    fn from(err: ConversionError) -> Self {
        if let ConversionError::Parse { .. } = err {
            return MeasureError::parse_error(err.to_string());
        }
        let base = MeasureError::new(err.code(), err.to_string());
        match err {
            ConversionError::UnknownCategory(_) => {
                base.with_suggestion("Use list_categories() to see the registered categories")
            }
            ConversionError::UnknownUnit { category, .. } => {
                base.with_suggestion(format!("Use list_units('{}') to see the available units", category))
            }
            ConversionError::UnknownSystem { category, .. } => {
                base.with_suggestion(format!("Use list_units('{}') to see which systems it defines", category))
            }
            ConversionError::CrossSystemUnsupported { .. } => {
                base.with_suggestion("Pick a target unit from the same unit system")
            }
            ConversionError::InvalidCatalogueEntry { .. } | ConversionError::Catalogue(_) => {
                base.with_severity(Severity::Fatal)
            }
            ConversionError::Parse { .. } => base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(ConversionError::UnknownCategory("x".into()).code(), "UNKNOWN_CATEGORY");
        assert_eq!(ConversionError::invalid("torque", "bad").code(), "INVALID_CATALOGUE_ENTRY");
        assert_eq!(ConversionError::parse("abc", "no number").code(), "PARSE_ERROR");
    }

    #[test]
    fn test_into_measure_error() {
        let err: MeasureError = ConversionError::UnknownUnit {
            category: "torque".into(),
            unit: "no-such-unit".into(),
        }.into();
        assert!(err.is(codes::UNKNOWN_UNIT));
        assert!(err.message.contains("no-such-unit"));
        assert!(err.suggestion.unwrap().contains("list_units('torque')"));
    }

    #[test]
    fn test_parse_error_carries_format_hint() {
        let err: MeasureError = ConversionError::parse("5..kg", "malformed number").into();
        assert!(err.is(codes::PARSE_ERROR));
        assert!(err.message.contains("'5..kg'"));
        assert!(err.suggestion.unwrap().contains("<number> <unit>"));
    }

    #[test]
    fn test_catalogue_errors_are_fatal() {
        let err: MeasureError = ConversionError::invalid("density", "to_anchor must be positive").into();
        assert_eq!(err.severity, Severity::Fatal);
    }

    #[test]
    fn test_cross_system_message() {
        let err = ConversionError::CrossSystemUnsupported {
            category: "torque".into(),
            from: "Nm".into(),
            to: "lbf·ft".into(),
            from_system: UnitSystem::Metric,
            to_system: UnitSystem::Imperial,
        };
        assert!(err.to_string().contains("METRIC"));
        assert!(err.to_string().contains("IMPERIAL"));
    }
}
