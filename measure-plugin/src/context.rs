//! Evaluation Context

use measure_core::Value;

/// Evaluation context passed to plugins
#[derive(Debug, Clone, Default)]
pub struct EvalContext {
    /// Decimal places numeric results are rounded to before they leave a
    /// plugin. `None` returns full double precision.
    pub precision: Option<u32>,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_precision(mut self, precision: Option<u32>) -> Self {
        self.precision = precision;
        self
    }

    /// Round a number for presentation according to `precision`
    pub fn present(&self, n: f64) -> f64 {
        match self.precision {
            Some(p) if n.is_finite() => {
                let factor = 10f64.powi(p.min(15) as i32);
                let rounded = (n * factor).round() / factor;
                // n * factor may overflow for huge magnitudes
                if rounded.is_finite() { rounded } else { n }
            }
            _ => n,
        }
    }

    /// Wrap a number as a `Value`, applying `present`
    pub fn number(&self, n: f64) -> Value {
        Value::Number(self.present(n))
    }
}
