use serde::{Deserialize, Serialize};
use std::fmt;

/// Cell texts read as missing. Matched against the cell exactly as written.
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A single cell. `Missing` serializes as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    #[default]
    Missing,
}

/// Outcome of numeric coercion. Primitives treat `NotANumber` exactly like `Missing`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coerced {
    Number(f64),
    Missing,
    NotANumber,
}

impl Coerced {
    pub fn number(self) -> Option<f64> {
        match self {
            Coerced::Number(n) => Some(n),
            Coerced::Missing | Coerced::NotANumber => None,
        }
    }
}

/// Hashable identity of a non-missing value.
///
/// Integral floats collapse onto `Int` so that `1` and `1.0` compare equal,
/// while strings stay distinct from numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKey {
    Int(i64),
    Float(u64),
    Text(String),
}

impl Value {
    /// Types a raw cell read from a file: NA tokens become `Missing`, then
    /// integers, then floats, falling back to a string.
    ///
    /// Surrounding whitespace is ignored when reading a number. Text cells
    /// are kept verbatim, so `"Active "` stays distinct from `"Active"`.
    pub fn parse_cell(raw: &str) -> Self {
        if NA_TOKENS.contains(&raw) {
            return Value::Missing;
        }
        let trimmed = raw.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return Value::Int(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return Value::Float(f);
        }
        Value::Str(raw.to_string())
    }

    /// NaN floats are missing, the same as an empty cell.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Float(f) => f.is_nan(),
            Value::Int(_) | Value::Str(_) => false,
        }
    }

    pub fn coerce(&self) -> Coerced {
        match self {
            Value::Missing => Coerced::Missing,
            Value::Int(i) => Coerced::Number(*i as f64),
            Value::Float(f) if f.is_nan() => Coerced::Missing,
            Value::Float(f) => Coerced::Number(*f),
            Value::Str(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Coerced::Missing;
                }
                match trimmed.parse::<f64>() {
                    Ok(f) if f.is_nan() => Coerced::Missing,
                    Ok(f) => Coerced::Number(f),
                    Err(_) => Coerced::NotANumber,
                }
            }
        }
    }

    pub fn key(&self) -> Option<ValueKey> {
        match self {
            Value::Missing => None,
            Value::Int(i) => Some(ValueKey::Int(*i)),
            Value::Float(f) if f.is_nan() => None,
            Value::Float(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                    Some(ValueKey::Int(*f as i64))
                } else {
                    Some(ValueKey::Float(f.to_bits()))
                }
            }
            Value::Str(s) => Some(ValueKey::Text(s.clone())),
        }
    }

    /// Text written back to a CSV cell. Floats keep their decimal point so
    /// they read back as floats.
    pub fn to_cell(&self) -> String {
        match self {
            Value::Missing => String::new(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) if f.is_nan() => String::new(),
            Value::Float(f) => format!("{:?}", f),
            Value::Str(s) => s.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => write!(f, "null"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell_types() {
        assert_eq!(Value::parse_cell("42"), Value::Int(42));
        assert_eq!(Value::parse_cell(" -100.0 "), Value::Float(-100.0));
        assert_eq!(Value::parse_cell("Active"), Value::Str("Active".to_string()));
        assert_eq!(Value::parse_cell(""), Value::Missing);
        assert_eq!(Value::parse_cell("NaN"), Value::Missing);
        assert_eq!(Value::parse_cell("None"), Value::Missing);
    }

    #[test]
    fn test_parse_cell_keeps_text_verbatim() {
        assert_eq!(Value::parse_cell("Active "), Value::from("Active "));
        assert_eq!(Value::parse_cell(" USD"), Value::from(" USD"));
        assert_eq!(Value::parse_cell("  "), Value::from("  "));
        assert_eq!(Value::parse_cell(" 7 "), Value::Int(7));
    }

    #[test]
    fn test_parse_cell_na_tokens() {
        for token in ["n/a", "#N/A", "<NA>", "#NA", "-NaN", "-nan", "#N/A N/A", "1.#IND", "1.#QNAN", "-1.#IND", "-1.#QNAN"] {
            assert_eq!(Value::parse_cell(token), Value::Missing, "{}", token);
        }
        assert_eq!(Value::parse_cell("na"), Value::from("na"));
    }

    #[test]
    fn test_coerce_numeric_string() {
        assert_eq!(Value::from("12.5").coerce(), Coerced::Number(12.5));
        assert_eq!(Value::from(" 3 ").coerce(), Coerced::Number(3.0));
    }

    #[test]
    fn test_coerce_not_a_number() {
        let coerced = Value::from("invalid").coerce();
        assert_eq!(coerced, Coerced::NotANumber);
        assert_eq!(coerced.number(), None);
    }

    #[test]
    fn test_coerce_missing() {
        assert_eq!(Value::Missing.coerce(), Coerced::Missing);
        assert_eq!(Value::Float(f64::NAN).coerce(), Coerced::Missing);
        assert_eq!(Value::from("").coerce(), Coerced::Missing);
    }

    #[test]
    fn test_integral_float_matches_int_key() {
        assert_eq!(Value::Float(999.0).key(), Value::Int(999).key());
        assert_ne!(Value::Float(999.5).key(), Value::Int(999).key());
    }

    #[test]
    fn test_string_never_matches_number_key() {
        assert_ne!(Value::from("1").key(), Value::Int(1).key());
    }

    #[test]
    fn test_nan_is_missing() {
        assert!(Value::Float(f64::NAN).is_missing());
        assert!(Value::Float(f64::NAN).key().is_none());
        assert!(!Value::Float(0.0).is_missing());
    }

    #[test]
    fn test_to_cell_keeps_float_marker() {
        assert_eq!(Value::Float(50.0).to_cell(), "50.0");
        assert_eq!(Value::parse_cell(&Value::Float(50.0).to_cell()), Value::Float(50.0));
        assert_eq!(Value::Missing.to_cell(), "");
    }

    #[test]
    fn test_serialize_untagged() {
        let json = serde_json::to_string(&vec![
            Value::Int(1),
            Value::Float(2.5),
            Value::from("x"),
            Value::Missing,
        ])
        .unwrap();
        assert_eq!(json, r#"[1,2.5,"x",null]"#);
    }

    #[test]
    fn test_deserialize_untagged() {
        let values: Vec<Value> = serde_yaml::from_str("[0, 1, \"0\", 1.5, null]").unwrap();
        assert_eq!(
            values,
            vec![
                Value::Int(0),
                Value::Int(1),
                Value::from("0"),
                Value::Float(1.5),
                Value::Missing,
            ]
        );
    }
}
