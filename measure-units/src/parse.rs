//! Parsing of quantity strings ("1000 kg/m³") and conversion specs ("kg/m³ -> lb/ft³")
//!
//! Only splitting happens here; whether a symbol exists is decided by the
//! registry of the category it is used with.

use crate::ConversionError;

const SEPARATORS: [&str; 4] = ["->", "→", " to ", " in "];

/// Split a conversion spec like "kg->lb", "°F → °C" or "km to mi"
pub fn parse_conversion(s: &str) -> Result<(String, String), ConversionError> {
    let separator = SEPARATORS.iter()
        .find(|sep| s.contains(*sep))
        .ok_or_else(|| ConversionError::parse(s, "expected 'unit1->unit2'"))?;

    let parts: Vec<&str> = s.split(separator).map(str::trim).collect();
    match parts.as_slice() {
        [from, to] if !from.is_empty() && !to.is_empty() => Ok((from.to_string(), to.to_string())),
        _ => Err(ConversionError::parse(s, "expected exactly one source and one target unit")),
    }
}

/// Split a quantity string like "5 m", "-40°F" or "1.2e3 kg/m³"
pub fn parse_quantity(s: &str) -> Result<(f64, String), ConversionError> {
    let s = s.trim();

    // Longest prefix that reads as a number; an exponent needs digits after it
    let mut split_pos = 0;
    for (i, c) in s.char_indices() {
        if c.is_whitespace() {
            break;
        }
        let end = i + c.len_utf8();
        let is_number_char = c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E');
        if !is_number_char {
            break;
        }
        if s[..end].parse::<f64>().is_ok() {
            split_pos = end;
        }
    }

    if split_pos == 0 {
        return Err(ConversionError::parse(s, "no number found"));
    }

    let value: f64 = s[..split_pos]
        .parse()
        .map_err(|_| ConversionError::parse(s, "invalid number"))?;
    let unit = s[split_pos..].trim();
    if unit.is_empty() {
        return Err(ConversionError::parse(s, "missing unit"));
    }
    if unit.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '.' | '-' | '+')) {
        return Err(ConversionError::parse(s, "malformed number"));
    }

    Ok((value, unit.to_string()))
}
