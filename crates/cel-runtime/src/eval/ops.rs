//! Operator semantics over `Value`.
//!
//! These functions implement the capability operations behind the standard
//! operators. They are strict over concrete operands; error and unknown
//! handling happens in the dispatch layer before they are invoked. All
//! failures are returned as `Value::Error`.

use std::cmp::Ordering;
use std::sync::Arc;

use regex::Regex;

use super::error::EvalError;
use super::value::{Duration, MapKey, Timestamp, Value};

fn no_such_overload(func: &str, args: &[&Value]) -> Value {
    let types: Vec<Arc<str>> = args.iter().map(|v| v.type_name()).collect();
    let names: Vec<&str> = types.iter().map(|t| t.as_ref()).collect();
    Value::error(EvalError::no_such_overload_for(func, &names))
}

// ==================== Arithmetic ====================

/// Addition (`_+_`). Concatenates strings, bytes, and lists.
pub fn add(a: &Value, b: &Value) -> Value {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => match x.checked_add(*y) {
            Some(v) => Value::Int(v),
            None => Value::error(EvalError::int_overflow()),
        },
        (Value::UInt(x), Value::UInt(y)) => match x.checked_add(*y) {
            Some(v) => Value::UInt(v),
            None => Value::error(EvalError::uint_overflow()),
        },
        (Value::Double(x), Value::Double(y)) => Value::Double(x + y),
        (Value::String(x), Value::String(y)) => {
            let mut s = String::with_capacity(x.len() + y.len());
            s.push_str(x);
            s.push_str(y);
            Value::string(s)
        }
        (Value::Bytes(x), Value::Bytes(y)) => {
            let mut bytes = Vec::with_capacity(x.len() + y.len());
            bytes.extend_from_slice(x);
            bytes.extend_from_slice(y);
            Value::bytes(bytes)
        }
        (Value::List(x), Value::List(y)) => {
            let mut elements = Vec::with_capacity(x.len() + y.len());
            elements.extend_from_slice(x);
            elements.extend_from_slice(y);
            Value::list(elements)
        }
        (Value::Timestamp(ts), Value::Duration(d)) | (Value::Duration(d), Value::Timestamp(ts)) => {
            timestamp_from_nanos(ts.to_nanos() + d.to_nanos())
        }
        (Value::Duration(x), Value::Duration(y)) => duration_from_nanos(x.to_nanos() + y.to_nanos()),
        _ => no_such_overload("_+_", &[a, b]),
    }
}

/// Subtraction (`_-_`).
pub fn subtract(a: &Value, b: &Value) -> Value {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => match x.checked_sub(*y) {
            Some(v) => Value::Int(v),
            None => Value::error(EvalError::int_overflow()),
        },
        (Value::UInt(x), Value::UInt(y)) => match x.checked_sub(*y) {
            Some(v) => Value::UInt(v),
            None => Value::error(EvalError::uint_overflow()),
        },
        (Value::Double(x), Value::Double(y)) => Value::Double(x - y),
        (Value::Timestamp(x), Value::Timestamp(y)) => {
            duration_from_nanos(x.to_nanos() - y.to_nanos())
        }
        (Value::Timestamp(ts), Value::Duration(d)) => {
            timestamp_from_nanos(ts.to_nanos() - d.to_nanos())
        }
        (Value::Duration(x), Value::Duration(y)) => duration_from_nanos(x.to_nanos() - y.to_nanos()),
        _ => no_such_overload("_-_", &[a, b]),
    }
}

/// Multiplication (`_*_`).
pub fn multiply(a: &Value, b: &Value) -> Value {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => match x.checked_mul(*y) {
            Some(v) => Value::Int(v),
            None => Value::error(EvalError::int_overflow()),
        },
        (Value::UInt(x), Value::UInt(y)) => match x.checked_mul(*y) {
            Some(v) => Value::UInt(v),
            None => Value::error(EvalError::uint_overflow()),
        },
        (Value::Double(x), Value::Double(y)) => Value::Double(x * y),
        _ => no_such_overload("_*_", &[a, b]),
    }
}

/// Division (`_/_`). Integer division by zero is an error; double division
/// follows IEEE 754.
pub fn divide(a: &Value, b: &Value) -> Value {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => {
            if *y == 0 {
                Value::error(EvalError::divide_by_zero())
            } else if *x == i64::MIN && *y == -1 {
                Value::error(EvalError::int_overflow())
            } else {
                Value::Int(x / y)
            }
        }
        (Value::UInt(x), Value::UInt(y)) => {
            if *y == 0 {
                Value::error(EvalError::divide_by_zero())
            } else {
                Value::UInt(x / y)
            }
        }
        (Value::Double(x), Value::Double(y)) => Value::Double(x / y),
        _ => no_such_overload("_/_", &[a, b]),
    }
}

/// Modulus (`_%_`). Defined for integers only.
pub fn modulo(a: &Value, b: &Value) -> Value {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => {
            if *y == 0 {
                Value::error(EvalError::modulus_by_zero())
            } else if *x == i64::MIN && *y == -1 {
                Value::error(EvalError::int_overflow())
            } else {
                Value::Int(x % y)
            }
        }
        (Value::UInt(x), Value::UInt(y)) => {
            if *y == 0 {
                Value::error(EvalError::modulus_by_zero())
            } else {
                Value::UInt(x % y)
            }
        }
        _ => no_such_overload("_%_", &[a, b]),
    }
}

/// Arithmetic negation (`-_`).
pub fn negate(a: &Value) -> Value {
    match a {
        Value::Int(x) => match x.checked_neg() {
            Some(v) => Value::Int(v),
            None => Value::error(EvalError::int_overflow()),
        },
        Value::Double(x) => Value::Double(-x),
        Value::Duration(d) => duration_from_nanos(-d.to_nanos()),
        _ => no_such_overload("-_", &[a]),
    }
}

fn timestamp_from_nanos(nanos: i128) -> Value {
    let ts = Timestamp::from_total_nanos(nanos);
    if ts.is_valid() {
        Value::Timestamp(ts)
    } else {
        Value::error(EvalError::timestamp_overflow())
    }
}

fn duration_from_nanos(nanos: i128) -> Value {
    let seconds = nanos / 1_000_000_000;
    if seconds.unsigned_abs() > super::value::MAX_DURATION_SECONDS as u128 {
        return Value::error(EvalError::duration_overflow());
    }
    Value::Duration(Duration::new(
        seconds as i64,
        (nanos % 1_000_000_000) as i32,
    ))
}

// ==================== Comparison ====================

/// Three-way comparison. Yields -1, 0, or 1 as `Value::Int`, or an error when
/// the operands are not ordered (mixed non-numeric kinds, NaN).
pub fn compare(a: &Value, b: &Value) -> Value {
    let ord = match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Int(x), Value::Int(y)) => x.cmp(y),
        (Value::UInt(x), Value::UInt(y)) => x.cmp(y),
        (Value::Double(x), Value::Double(y)) => match x.partial_cmp(y) {
            Some(ord) => ord,
            None => return nan_error(),
        },
        (Value::Int(x), Value::UInt(y)) => compare_int_uint(*x, *y),
        (Value::UInt(x), Value::Int(y)) => compare_int_uint(*y, *x).reverse(),
        (Value::Int(x), Value::Double(y)) => match compare_int_double(*x, *y) {
            Some(ord) => ord,
            None => return nan_error(),
        },
        (Value::Double(x), Value::Int(y)) => match compare_int_double(*y, *x) {
            Some(ord) => ord.reverse(),
            None => return nan_error(),
        },
        (Value::UInt(x), Value::Double(y)) => match compare_uint_double(*x, *y) {
            Some(ord) => ord,
            None => return nan_error(),
        },
        (Value::Double(x), Value::UInt(y)) => match compare_uint_double(*y, *x) {
            Some(ord) => ord.reverse(),
            None => return nan_error(),
        },
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bytes(x), Value::Bytes(y)) => x.cmp(y),
        (Value::Timestamp(x), Value::Timestamp(y)) => x.to_nanos().cmp(&y.to_nanos()),
        (Value::Duration(x), Value::Duration(y)) => x.to_nanos().cmp(&y.to_nanos()),
        _ => return no_such_overload("compare", &[a, b]),
    };
    ordering_value(ord)
}

fn ordering_value(ord: Ordering) -> Value {
    Value::Int(match ord {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    })
}

fn nan_error() -> Value {
    Value::error(EvalError::invalid_argument(
        "NaN values cannot be ordered",
    ))
}

fn compare_int_uint(i: i64, u: u64) -> Ordering {
    if i < 0 {
        Ordering::Less
    } else {
        (i as u64).cmp(&u)
    }
}

// Casting i64 to f64 loses precision near 2^63, so compare against the
// double's exact floor instead.
fn compare_int_double(i: i64, d: f64) -> Option<Ordering> {
    if d.is_nan() {
        return None;
    }
    if d >= 9_223_372_036_854_775_808.0 {
        return Some(Ordering::Less);
    }
    if d < -9_223_372_036_854_775_808.0 {
        return Some(Ordering::Greater);
    }
    let floor = d.floor();
    match (i as i128).cmp(&(floor as i128)) {
        Ordering::Equal if d > floor => Some(Ordering::Less),
        ord => Some(ord),
    }
}

fn compare_uint_double(u: u64, d: f64) -> Option<Ordering> {
    if d.is_nan() {
        return None;
    }
    if d >= 18_446_744_073_709_551_616.0 {
        return Some(Ordering::Less);
    }
    if d < 0.0 {
        return Some(Ordering::Greater);
    }
    let floor = d.floor();
    match (u as u128).cmp(&(floor as u128)) {
        Ordering::Equal if d > floor => Some(Ordering::Less),
        ord => Some(ord),
    }
}

// ==================== Collections ====================

/// Element count (`size`). Strings count Unicode code points.
pub fn size(a: &Value) -> Value {
    match a {
        Value::String(s) => Value::Int(s.chars().count() as i64),
        Value::Bytes(b) => Value::Int(b.len() as i64),
        Value::List(l) => Value::Int(l.len() as i64),
        Value::Map(m) => Value::Int(m.len() as i64),
        _ => no_such_overload("size", &[a]),
    }
}

/// Indexed access (`_[_]`). Lists take int or uint indexes; maps take any
/// legal key kind.
pub fn index(target: &Value, key: &Value) -> Value {
    match target {
        Value::List(list) => {
            let idx = match key {
                Value::Int(i) => *i,
                Value::UInt(u) if *u <= i64::MAX as u64 => *u as i64,
                Value::UInt(_) => {
                    return Value::error(EvalError::index_out_of_range(i64::MAX, list.len()))
                }
                _ => return no_such_overload("_[_]", &[target, key]),
            };
            if idx < 0 || idx as usize >= list.len() {
                return Value::error(EvalError::index_out_of_range(idx, list.len()));
            }
            list[idx as usize].clone()
        }
        Value::Map(map) => {
            let map_key = match MapKey::from_value(key) {
                Some(k) => k,
                None => return no_such_overload("_[_]", &[target, key]),
            };
            match map.get(&map_key) {
                Some(v) => v.clone(),
                None => Value::error(EvalError::no_such_key(&key.to_string())),
            }
        }
        Value::Object(obj) => obj.get(key),
        _ => no_such_overload("_[_]", &[target, key]),
    }
}

/// Membership test (`in`). Lists test element equality; maps test keys.
pub fn contains(collection: &Value, item: &Value) -> Value {
    match collection {
        Value::List(list) => {
            for element in list.iter() {
                if element == item {
                    return Value::Bool(true);
                }
            }
            Value::Bool(false)
        }
        Value::Map(map) => match MapKey::from_value(item) {
            Some(key) => Value::Bool(map.contains_key(&key)),
            None => Value::Bool(false),
        },
        _ => no_such_overload("@in", &[item, collection]),
    }
}

/// Field presence test backing `has()`.
pub fn is_set(target: &Value, field: &str) -> Value {
    match target {
        Value::Map(map) => Value::Bool(map.contains_key(&MapKey::String(field.into()))),
        Value::Object(obj) => obj.is_set(field),
        _ => no_such_overload("has", &[target]),
    }
}

// ==================== Strings ====================

/// Regular-expression match (`matches`). The pattern is unanchored.
pub fn matches(text: &str, pattern: &str) -> Value {
    match Regex::new(pattern) {
        Ok(re) => Value::Bool(re.is_match(text)),
        Err(e) => Value::error(EvalError::invalid_argument(format!(
            "invalid regular expression: {}",
            e
        ))),
    }
}
