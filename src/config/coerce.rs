//! String-to-field coercion.
//!
//! The set of supported field types is closed: strings, integers of every
//! width, booleans, floats, `Vec<String>` and [`Duration`]. Anything else is
//! rejected with [`CoerceError::UnsupportedType`].

use std::num::{ParseFloatError, ParseIntError};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use super::duration::{parse_duration, DurationError};
use super::field::{FieldKind, FieldValue};

/// Failure to convert a raw string into a field's type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CoerceError {
    #[error("invalid duration value '{value}': {source}")]
    InvalidDuration {
        value: String,
        source: DurationError,
    },

    #[error("invalid integer value '{value}': {source}")]
    InvalidInteger {
        value: String,
        source: ParseIntError,
    },

    #[error("invalid boolean value '{0}'")]
    InvalidBoolean(String),

    #[error("invalid float value '{value}': {source}")]
    InvalidFloat {
        value: String,
        source: ParseFloatError,
    },

    #[error("unsupported field type: {0}")]
    UnsupportedType(&'static str),
}

/// Parses a boolean, case-insensitively.
///
/// `true`, `1`, `yes`, `on` and `t` are true; `false`, `0`, `no`, `off`, `f`
/// and the empty string are false.
pub fn parse_bool(value: &str) -> Result<bool, CoerceError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "t" => Ok(true),
        "false" | "0" | "no" | "off" | "f" | "" => Ok(false),
        _ => Err(CoerceError::InvalidBoolean(value.to_string())),
    }
}

/// Splits a comma-separated list, trimming each element and dropping empty ones.
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Converts `raw` into the field's type and stores it.
///
/// The field is left unchanged when conversion fails.
pub fn assign(field: &mut dyn FieldValue, raw: &str) -> Result<(), CoerceError> {
    let kind = FieldKind::of(&*field);
    // Through `*field`, so the blanket impl is not picked for the reference itself.
    let type_name = (*field).type_name();
    let slot = field.as_any_mut();

    let assigned = match kind {
        FieldKind::Duration => set::<Duration>(slot, || {
            parse_duration(raw).map_err(|source| CoerceError::InvalidDuration {
                value: raw.to_string(),
                source,
            })
        }),
        FieldKind::String => set::<String>(slot, || Ok(raw.to_string())),
        FieldKind::Int => assign_int(slot, raw),
        FieldKind::Bool => set::<bool>(slot, || parse_bool(raw)),
        FieldKind::Float => assign_float(slot, raw),
        FieldKind::StringList => set::<Vec<String>>(slot, || Ok(parse_list(raw))),
        FieldKind::Unsupported => None,
    };

    assigned.unwrap_or(Err(CoerceError::UnsupportedType(type_name)))
}

/// Stores the parsed value if `slot` holds a `T`; `None` otherwise.
fn set<T: 'static>(
    slot: &mut dyn std::any::Any,
    parse: impl FnOnce() -> Result<T, CoerceError>,
) -> Option<Result<(), CoerceError>> {
    let slot = slot.downcast_mut::<T>()?;
    Some(parse().map(|value| *slot = value))
}

fn parse_int<T: FromStr<Err = ParseIntError>>(raw: &str) -> Result<T, CoerceError> {
    raw.parse().map_err(|source| CoerceError::InvalidInteger {
        value: raw.to_string(),
        source,
    })
}

fn parse_float<T: FromStr<Err = ParseFloatError>>(raw: &str) -> Result<T, CoerceError> {
    raw.parse().map_err(|source| CoerceError::InvalidFloat {
        value: raw.to_string(),
        source,
    })
}

macro_rules! assign_first_match {
    ($slot:ident, $raw:ident, $parse:ident, $($ty:ty),+ $(,)?) => {
        None
            $(.or_else(|| set::<$ty>(&mut *$slot, || $parse::<$ty>($raw))))+
    };
}

fn assign_int(slot: &mut dyn std::any::Any, raw: &str) -> Option<Result<(), CoerceError>> {
    assign_first_match!(
        slot, raw, parse_int, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize
    )
}

fn assign_float(slot: &mut dyn std::any::Any, raw: &str) -> Option<Result<(), CoerceError>> {
    assign_first_match!(slot, raw, parse_float, f32, f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_true_values() {
        for value in ["1", "true", "On", "YES", "T", "t", "TRUE"] {
            assert_eq!(parse_bool(value), Ok(true), "{value}");
        }
    }

    #[test]
    fn test_parse_bool_false_values() {
        for value in ["0", "false", "Off", "NO", "", "F"] {
            assert_eq!(parse_bool(value), Ok(false), "{value}");
        }
    }

    #[test]
    fn test_parse_bool_rejects_other_values() {
        assert_eq!(
            parse_bool("maybe"),
            Err(CoerceError::InvalidBoolean("maybe".into()))
        );
        assert!(parse_bool(" true").is_err());
    }

    #[test]
    fn test_parse_list_trims_and_drops_empty() {
        assert_eq!(parse_list("localhost, 127.0.0.1 "), vec!["localhost", "127.0.0.1"]);
        assert_eq!(parse_list("a,,b, ,c"), vec!["a", "b", "c"]);
        assert_eq!(parse_list("single"), vec!["single"]);
        assert!(parse_list("").is_empty());
        assert!(parse_list(" , ").is_empty());
    }

    #[test]
    fn test_parse_list_inverts_join() {
        let hosts = vec!["db1".to_string(), "db 2".to_string(), "db3".to_string()];
        assert_eq!(parse_list(&hosts.join(",")), hosts);
    }

    #[test]
    fn test_assign_string_verbatim() {
        let mut value = String::from("old");
        assign(&mut value, "  spaced  ").unwrap();
        assert_eq!(value, "  spaced  ");
    }

    #[test]
    fn test_assign_integers_of_each_width() {
        let mut small = 0_i8;
        let mut port = 0_u16;
        let mut big = 0_i64;
        assign(&mut small, "-12").unwrap();
        assign(&mut port, "8080").unwrap();
        assign(&mut big, "+9000000000").unwrap();
        assert_eq!((small, port, big), (-12, 8080, 9_000_000_000));
    }

    #[test]
    fn test_assign_integer_overflow_fails() {
        let mut value = 7_i8;
        let err = assign(&mut value, "300").unwrap_err();
        assert!(matches!(err, CoerceError::InvalidInteger { ref value, .. } if value == "300"));
        assert_eq!(value, 7);

        let mut unsigned = 0_u32;
        assert!(assign(&mut unsigned, "-1").is_err());
    }

    #[test]
    fn test_assign_integer_rejects_text() {
        let mut value = 0_i32;
        let err = assign(&mut value, "abc").unwrap_err();
        assert!(err.to_string().starts_with("invalid integer value 'abc'"));
    }

    #[test]
    fn test_assign_float() {
        let mut value = 0.0_f64;
        assign(&mut value, "1.25").unwrap();
        assert_eq!(value, 1.25);

        let mut narrow = 0.0_f32;
        assign(&mut narrow, "2.5").unwrap();
        assert_eq!(narrow, 2.5);

        assert!(matches!(
            assign(&mut value, "pi"),
            Err(CoerceError::InvalidFloat { .. })
        ));
    }

    #[test]
    fn test_assign_bool() {
        let mut value = false;
        assign(&mut value, "yes").unwrap();
        assert!(value);
    }

    #[test]
    fn test_assign_duration() {
        let mut value = Duration::ZERO;
        assign(&mut value, "30s").unwrap();
        assert_eq!(value, Duration::from_secs(30));
        assign(&mut value, "5m").unwrap();
        assert_eq!(value, Duration::from_secs(300));

        let err = assign(&mut value, "abc").unwrap_err();
        assert!(matches!(err, CoerceError::InvalidDuration { ref value, .. } if value == "abc"));
        assert!(err.to_string().contains("'abc'"));
    }

    #[test]
    fn test_assign_list() {
        let mut value = vec!["stale".to_string()];
        assign(&mut value, "").unwrap();
        assert!(value.is_empty());
    }

    #[test]
    fn test_assign_unsupported_type_ignores_value() {
        let mut value = (0.0_f64, 0.0_f64);
        for raw in ["100", "", "1,2"] {
            let err = assign(&mut value, raw).unwrap_err();
            assert_eq!(err, CoerceError::UnsupportedType("(f64, f64)"));
            assert_eq!(err.to_string(), "unsupported field type: (f64, f64)");
        }
    }
}
