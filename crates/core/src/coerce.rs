//! Loose-value coercion rules for raw provider payloads.
//!
//! The provider's bulk export is loosely typed: numbers arrive as numbers,
//! numeric strings, formatted strings ("2,500,000"), empty strings, or are
//! missing entirely. These helpers define the single set of coercion rules
//! every normalized field goes through.

use serde_json::Value;

/// Years outside this exclusive range are treated as data entry noise.
pub const MIN_YEAR: f64 = 1900.0;
pub const MAX_YEAR: f64 = 3000.0;

/// Coerce a raw value to a number.
///
/// Null, a missing value, and the empty string all mean "absent" — never
/// zero. Numeric strings are parsed after stripping `$`, commas, and
/// whitespace. Anything else is absent.
pub fn to_num(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s
                .trim()
                .chars()
                .filter(|c| *c != ',' && *c != '$')
                .collect();
            if cleaned.is_empty() {
                return None;
            }
            cleaned.parse::<f64>().ok()
        }
        _ => None,
    }
}

/// Coerce a raw value to a plausible year.
///
/// Applies [`to_num`], then accepts only values strictly between 1900 and
/// 3000. Out-of-range years are absent, not clamped.
pub fn to_year(value: Option<&Value>) -> Option<i32> {
    let n = to_num(value)?;
    if n > MIN_YEAR && n < MAX_YEAR {
        Some(n as i32)
    } else {
        None
    }
}

/// Coerce a raw value to a boolean.
///
/// The provider expresses truth three ways: the string `"Y"`, the string
/// `"True"`, or a JSON `true`. Everything else — including `"N"`, null,
/// and absence — is false.
pub fn truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "Y" || s == "True",
        _ => false,
    }
}

/// Coerce a raw value to a non-empty trimmed string.
pub fn to_str(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
