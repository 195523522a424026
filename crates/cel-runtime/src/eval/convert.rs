//! Type conversions between value kinds.
//!
//! `convert_to_type` implements the conversion functions of the standard
//! library (`int(x)`, `string(x)`, ...). Conversions between kinds with no
//! defined path yield a no-such-overload error value; paths that exist but
//! fail for the given input (parse errors, range violations) yield a
//! conversion or overflow error.

use super::error::EvalError;
use super::time;
use super::value::{Duration, Timestamp, Value};

/// Convert a value to the named target type.
pub fn convert_to_type(value: &Value, target: &str) -> Value {
    match target {
        "type" => Value::Type(value.type_value()),
        "bool" => to_bool(value),
        "int" => to_int(value),
        "uint" => to_uint(value),
        "double" => to_double(value),
        "string" => to_string(value),
        "bytes" => to_bytes(value),
        "google.protobuf.Timestamp" | "timestamp" => to_timestamp(value),
        "google.protobuf.Duration" | "duration" => to_duration(value),
        _ => unsupported(value, target),
    }
}

fn unsupported(value: &Value, target: &str) -> Value {
    Value::error(EvalError::no_such_overload_for(
        target,
        &[value.type_name().as_ref()],
    ))
}

fn conversion_error(value: &Value, target: &str) -> Value {
    Value::error(EvalError::type_conversion(
        value.type_name().as_ref(),
        target,
    ))
}

fn to_bool(value: &Value) -> Value {
    match value {
        Value::Bool(_) => value.clone(),
        Value::String(s) => match s.as_ref() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => conversion_error(value, "bool"),
        },
        _ => unsupported(value, "bool"),
    }
}

fn to_int(value: &Value) -> Value {
    match value {
        Value::Int(_) => value.clone(),
        Value::UInt(u) => {
            if *u <= i64::MAX as u64 {
                Value::Int(*u as i64)
            } else {
                Value::error(EvalError::int_overflow())
            }
        }
        Value::Double(d) => double_to_int(*d),
        Value::String(s) => match s.parse::<i64>() {
            Ok(i) => Value::Int(i),
            Err(_) => conversion_error(value, "int"),
        },
        Value::Timestamp(ts) => Value::Int(ts.seconds),
        Value::Duration(d) => match i64::try_from(d.to_nanos()) {
            Ok(nanos) => Value::Int(nanos),
            Err(_) => Value::error(EvalError::int_overflow()),
        },
        _ => unsupported(value, "int"),
    }
}

// Truncates toward zero; out-of-range and NaN inputs error.
fn double_to_int(d: f64) -> Value {
    if d.is_nan() {
        return Value::error(EvalError::int_overflow());
    }
    let trunc = d.trunc();
    if trunc >= -9_223_372_036_854_775_808.0 && trunc < 9_223_372_036_854_775_808.0 {
        Value::Int(trunc as i64)
    } else {
        Value::error(EvalError::int_overflow())
    }
}

fn to_uint(value: &Value) -> Value {
    match value {
        Value::UInt(_) => value.clone(),
        Value::Int(i) => {
            if *i >= 0 {
                Value::UInt(*i as u64)
            } else {
                Value::error(EvalError::uint_overflow())
            }
        }
        Value::Double(d) => double_to_uint(*d),
        Value::String(s) => match s.parse::<u64>() {
            Ok(u) => Value::UInt(u),
            Err(_) => conversion_error(value, "uint"),
        },
        Value::Duration(d) => match u64::try_from(d.to_nanos()) {
            Ok(nanos) => Value::UInt(nanos),
            Err(_) => Value::error(EvalError::uint_overflow()),
        },
        _ => unsupported(value, "uint"),
    }
}

fn double_to_uint(d: f64) -> Value {
    if d.is_nan() {
        return Value::error(EvalError::uint_overflow());
    }
    let trunc = d.trunc();
    if trunc >= 0.0 && trunc < 18_446_744_073_709_551_616.0 {
        Value::UInt(trunc as u64)
    } else {
        Value::error(EvalError::uint_overflow())
    }
}

fn to_double(value: &Value) -> Value {
    match value {
        Value::Double(_) => value.clone(),
        Value::Int(i) => Value::Double(*i as f64),
        Value::UInt(u) => Value::Double(*u as f64),
        Value::String(s) => match s.parse::<f64>() {
            Ok(d) => Value::Double(d),
            Err(_) => conversion_error(value, "double"),
        },
        _ => unsupported(value, "double"),
    }
}

fn to_string(value: &Value) -> Value {
    match value {
        Value::String(_) => value.clone(),
        Value::Bool(b) => Value::string(b.to_string()),
        Value::Int(i) => Value::string(i.to_string()),
        Value::UInt(u) => Value::string(u.to_string()),
        Value::Double(d) => Value::string(d.to_string()),
        Value::Bytes(b) => match std::str::from_utf8(b) {
            Ok(s) => Value::string(s),
            Err(_) => Value::error(EvalError::invalid_argument(
                "invalid UTF-8 in bytes, cannot convert to string",
            )),
        },
        Value::Timestamp(ts) => Value::string(time::format_timestamp(ts)),
        Value::Duration(d) => Value::string(time::format_duration(d)),
        _ => unsupported(value, "string"),
    }
}

fn to_bytes(value: &Value) -> Value {
    match value {
        Value::Bytes(_) => value.clone(),
        Value::String(s) => Value::bytes(s.as_bytes().to_vec()),
        _ => unsupported(value, "bytes"),
    }
}

fn to_timestamp(value: &Value) -> Value {
    match value {
        Value::Timestamp(_) => value.clone(),
        Value::String(s) => match time::parse_timestamp(s) {
            Ok(ts) => Value::Timestamp(ts),
            Err(e) => Value::error(e),
        },
        Value::Int(seconds) => {
            let ts = Timestamp::from_seconds(*seconds);
            if ts.is_valid() {
                Value::Timestamp(ts)
            } else {
                Value::error(EvalError::timestamp_overflow())
            }
        }
        _ => unsupported(value, "timestamp"),
    }
}

fn to_duration(value: &Value) -> Value {
    match value {
        Value::Duration(_) => value.clone(),
        Value::String(s) => match time::parse_duration(s) {
            Ok(d) => Value::Duration(d),
            Err(e) => Value::error(e),
        },
        Value::Int(nanos) => {
            let d = Duration::from_nanos(*nanos);
            if d.is_valid() {
                Value::Duration(d)
            } else {
                Value::error(EvalError::duration_overflow())
            }
        }
        _ => unsupported(value, "duration"),
    }
}

// ==================== Native conversions ====================

impl TryFrom<&Value> for i64 {
    type Error = EvalError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value
            .as_int()
            .ok_or_else(|| EvalError::type_conversion(&value.type_name(), "int"))
    }
}

impl TryFrom<&Value> for u64 {
    type Error = EvalError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value
            .as_uint()
            .ok_or_else(|| EvalError::type_conversion(&value.type_name(), "uint"))
    }
}

impl TryFrom<&Value> for f64 {
    type Error = EvalError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value
            .as_double()
            .ok_or_else(|| EvalError::type_conversion(&value.type_name(), "double"))
    }
}

impl TryFrom<&Value> for bool {
    type Error = EvalError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value
            .as_bool()
            .ok_or_else(|| EvalError::type_conversion(&value.type_name(), "bool"))
    }
}

impl TryFrom<&Value> for String {
    type Error = EvalError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value
            .as_string()
            .map(str::to_string)
            .ok_or_else(|| EvalError::type_conversion(&value.type_name(), "string"))
    }
}

impl TryFrom<&Value> for Vec<u8> {
    type Error = EvalError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value
            .as_bytes()
            .map(<[u8]>::to_vec)
            .ok_or_else(|| EvalError::type_conversion(&value.type_name(), "bytes"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::error::EvalErrorKind;

    fn err_kind(v: &Value) -> EvalErrorKind {
        v.as_error().map(|e| e.kind).unwrap()
    }

    #[test]
    fn test_identity_conversions() {
        assert_eq!(convert_to_type(&Value::Int(5), "int"), Value::Int(5));
        assert_eq!(
            convert_to_type(&Value::string("x"), "string"),
            Value::string("x")
        );
    }

    #[test]
    fn test_to_type() {
        assert_eq!(
            convert_to_type(&Value::Int(5), "type"),
            Value::Type(crate::eval::value::TypeValue::int_type().clone())
        );
    }

    #[test]
    fn test_string_to_bool_is_strict() {
        assert_eq!(
            convert_to_type(&Value::string("true"), "bool"),
            Value::Bool(true)
        );
        assert_eq!(
            convert_to_type(&Value::string("false"), "bool"),
            Value::Bool(false)
        );
        assert!(convert_to_type(&Value::string("TRUE"), "bool").is_error());
        assert!(convert_to_type(&Value::string("1"), "bool").is_error());
    }

    #[test]
    fn test_numeric_conversions() {
        assert_eq!(convert_to_type(&Value::UInt(5), "int"), Value::Int(5));
        assert_eq!(convert_to_type(&Value::Int(5), "uint"), Value::UInt(5));
        assert_eq!(
            convert_to_type(&Value::Int(5), "double"),
            Value::Double(5.0)
        );
        assert_eq!(convert_to_type(&Value::Double(2.9), "int"), Value::Int(2));
        assert_eq!(
            convert_to_type(&Value::Double(-2.9), "int"),
            Value::Int(-2)
        );
    }

    #[test]
    fn test_numeric_range_errors() {
        assert_eq!(
            err_kind(&convert_to_type(&Value::UInt(u64::MAX), "int")),
            EvalErrorKind::Overflow
        );
        assert_eq!(
            err_kind(&convert_to_type(&Value::Int(-1), "uint")),
            EvalErrorKind::Overflow
        );
        assert_eq!(
            err_kind(&convert_to_type(&Value::Double(1e19), "int")),
            EvalErrorKind::Overflow
        );
        assert_eq!(
            err_kind(&convert_to_type(&Value::Double(f64::NAN), "int")),
            EvalErrorKind::Overflow
        );
        assert_eq!(
            err_kind(&convert_to_type(&Value::Double(-1.5), "uint")),
            EvalErrorKind::Overflow
        );
    }

    #[test]
    fn test_string_parsing() {
        assert_eq!(
            convert_to_type(&Value::string("-42"), "int"),
            Value::Int(-42)
        );
        assert_eq!(
            convert_to_type(&Value::string("42"), "uint"),
            Value::UInt(42)
        );
        assert_eq!(
            convert_to_type(&Value::string("1.5"), "double"),
            Value::Double(1.5)
        );
        assert!(convert_to_type(&Value::string("nope"), "int").is_error());
    }

    #[test]
    fn test_string_rendering() {
        assert_eq!(
            convert_to_type(&Value::Int(42), "string"),
            Value::string("42")
        );
        assert_eq!(
            convert_to_type(&Value::Bool(true), "string"),
            Value::string("true")
        );
        assert_eq!(
            convert_to_type(&Value::duration(90, 0), "string"),
            Value::string("90s")
        );
        assert_eq!(
            convert_to_type(&Value::timestamp(0, 0), "string"),
            Value::string("1970-01-01T00:00:00Z")
        );
    }

    #[test]
    fn test_bytes_string_roundtrip() {
        assert_eq!(
            convert_to_type(&Value::string("abc"), "bytes"),
            Value::bytes(b"abc".to_vec())
        );
        assert_eq!(
            convert_to_type(&Value::bytes(b"abc".to_vec()), "string"),
            Value::string("abc")
        );
        assert!(convert_to_type(&Value::bytes(vec![0xFFu8]), "string").is_error());
    }

    #[test]
    fn test_timestamp_conversions() {
        assert_eq!(
            convert_to_type(&Value::Int(60), "timestamp"),
            Value::timestamp(60, 0)
        );
        assert_eq!(
            convert_to_type(&Value::timestamp(60, 0), "int"),
            Value::Int(60)
        );
        assert_eq!(
            convert_to_type(&Value::string("1970-01-01T00:01:00Z"), "timestamp"),
            Value::timestamp(60, 0)
        );
    }

    #[test]
    fn test_duration_conversions() {
        assert_eq!(
            convert_to_type(&Value::string("90s"), "duration"),
            Value::duration(90, 0)
        );
        assert_eq!(
            convert_to_type(&Value::duration(1, 500_000_000), "int"),
            Value::Int(1_500_000_000)
        );
        assert_eq!(
            convert_to_type(&Value::duration(1, 0), "uint"),
            Value::UInt(1_000_000_000)
        );
        assert_eq!(
            err_kind(&convert_to_type(&Value::duration(-1, 0), "uint")),
            EvalErrorKind::Overflow
        );
    }

    #[test]
    fn test_unsupported_pairs() {
        assert_eq!(
            err_kind(&convert_to_type(&Value::Bool(true), "bytes")),
            EvalErrorKind::NoSuchOverload
        );
        assert_eq!(
            err_kind(&convert_to_type(&Value::list(vec![]), "int")),
            EvalErrorKind::NoSuchOverload
        );
    }

    #[test]
    fn test_native_conversions() {
        assert_eq!(i64::try_from(&Value::Int(5)).unwrap(), 5);
        assert_eq!(bool::try_from(&Value::Bool(true)).unwrap(), true);
        assert!(i64::try_from(&Value::string("5")).is_err());
        assert_eq!(String::try_from(&Value::string("s")).unwrap(), "s");
    }
}
