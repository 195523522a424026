//! The standard function library.
//!
//! Operators are registered as singletons so one implementation covers every
//! argument combination, with declared overloads carrying the stable ids a
//! type checker pins into evaluation plans. The non-strict logic operators
//! short-circuit in value space: a definite answer on one side absorbs an
//! error or unknown on the other.

use once_cell::sync::Lazy;

use crate::eval::convert;
use crate::eval::error::EvalError;
use crate::eval::functions::{maybe_no_such_overload, Dispatcher, Singleton};
use crate::eval::ops;
use crate::eval::time::{self, TimestampComponent, TimezoneInfo};
use crate::eval::traits::Trait;
use crate::eval::value::Value;
use crate::operators;
use crate::overloads;
use crate::types::decls::{CelType, DeclError, FunctionDecl, OverloadDecl};

/// The shared standard dispatcher.
pub fn standard() -> &'static Dispatcher {
    static STANDARD: Lazy<Dispatcher> = Lazy::new(|| {
        build().expect("standard library declarations are well-formed")
    });
    &STANDARD
}

/// Build a fresh dispatcher holding the standard library.
pub fn build() -> Result<Dispatcher, DeclError> {
    let mut dispatcher = Dispatcher::new();
    for decl in declarations()? {
        dispatcher.register(decl)?;
    }
    Ok(dispatcher)
}

fn declarations() -> Result<Vec<FunctionDecl>, DeclError> {
    use CelType::*;

    let mut decls = vec![
        logical_and_decl()?,
        logical_or_decl()?,
        conditional_decl()?,
        logical_not_decl()?,
        not_strictly_false_decl()?,
        equals_decl()?,
        not_equals_decl()?,
        relational_decl(operators::LESS, &LESS_IDS, |o| o < 0)?,
        relational_decl(operators::LESS_EQUALS, &LESS_EQUALS_IDS, |o| o <= 0)?,
        relational_decl(operators::GREATER, &GREATER_IDS, |o| o > 0)?,
        relational_decl(operators::GREATER_EQUALS, &GREATER_EQUALS_IDS, |o| o >= 0)?,
        operator_decl(
            operators::ADD,
            Trait::Adder,
            ops::add,
            &[
                (overloads::ADD_INT64, Int, Int, Int),
                (overloads::ADD_UINT64, UInt, UInt, UInt),
                (overloads::ADD_DOUBLE, Double, Double, Double),
                (overloads::ADD_STRING, String, String, String),
                (overloads::ADD_BYTES, Bytes, Bytes, Bytes),
                (
                    overloads::ADD_LIST,
                    List(Box::new(Dyn)),
                    List(Box::new(Dyn)),
                    List(Box::new(Dyn)),
                ),
                (overloads::ADD_TIMESTAMP_DURATION, Timestamp, Duration, Timestamp),
                (overloads::ADD_DURATION_TIMESTAMP, Duration, Timestamp, Timestamp),
                (overloads::ADD_DURATION_DURATION, Duration, Duration, Duration),
            ],
        )?,
        operator_decl(
            operators::SUBTRACT,
            Trait::Subtractor,
            ops::subtract,
            &[
                (overloads::SUBTRACT_INT64, Int, Int, Int),
                (overloads::SUBTRACT_UINT64, UInt, UInt, UInt),
                (overloads::SUBTRACT_DOUBLE, Double, Double, Double),
                (
                    overloads::SUBTRACT_TIMESTAMP_TIMESTAMP,
                    Timestamp,
                    Timestamp,
                    Duration,
                ),
                (
                    overloads::SUBTRACT_TIMESTAMP_DURATION,
                    Timestamp,
                    Duration,
                    Timestamp,
                ),
                (overloads::SUBTRACT_DURATION_DURATION, Duration, Duration, Duration),
            ],
        )?,
        operator_decl(
            operators::MULTIPLY,
            Trait::Multiplier,
            ops::multiply,
            &[
                (overloads::MULTIPLY_INT64, Int, Int, Int),
                (overloads::MULTIPLY_UINT64, UInt, UInt, UInt),
                (overloads::MULTIPLY_DOUBLE, Double, Double, Double),
            ],
        )?,
        operator_decl(
            operators::DIVIDE,
            Trait::Divider,
            ops::divide,
            &[
                (overloads::DIVIDE_INT64, Int, Int, Int),
                (overloads::DIVIDE_UINT64, UInt, UInt, UInt),
                (overloads::DIVIDE_DOUBLE, Double, Double, Double),
            ],
        )?,
        operator_decl(
            operators::MODULO,
            Trait::Modder,
            ops::modulo,
            &[
                (overloads::MODULO_INT64, Int, Int, Int),
                (overloads::MODULO_UINT64, UInt, UInt, UInt),
            ],
        )?,
        negate_decl()?,
        index_decl()?,
        in_decl()?,
        size_decl()?,
        type_of_decl()?,
        dyn_decl()?,
        conversion_decl(
            "bool",
            "bool",
            Bool,
            &[
                (overloads::BOOL_TO_BOOL, Bool),
                (overloads::STRING_TO_BOOL, String),
            ],
        )?,
        conversion_decl(
            "int",
            "int",
            Int,
            &[
                (overloads::INT_TO_INT, Int),
                (overloads::UINT_TO_INT, UInt),
                (overloads::DOUBLE_TO_INT, Double),
                (overloads::STRING_TO_INT, String),
                (overloads::TIMESTAMP_TO_INT, Timestamp),
                (overloads::DURATION_TO_INT, Duration),
            ],
        )?,
        conversion_decl(
            "uint",
            "uint",
            UInt,
            &[
                (overloads::UINT_TO_UINT, UInt),
                (overloads::INT_TO_UINT, Int),
                (overloads::DOUBLE_TO_UINT, Double),
                (overloads::STRING_TO_UINT, String),
                (overloads::DURATION_TO_UINT, Duration),
            ],
        )?,
        conversion_decl(
            "double",
            "double",
            Double,
            &[
                (overloads::DOUBLE_TO_DOUBLE, Double),
                (overloads::INT_TO_DOUBLE, Int),
                (overloads::UINT_TO_DOUBLE, UInt),
                (overloads::STRING_TO_DOUBLE, String),
            ],
        )?,
        conversion_decl(
            "string",
            "string",
            String,
            &[
                (overloads::STRING_TO_STRING, String),
                (overloads::BOOL_TO_STRING, Bool),
                (overloads::INT_TO_STRING, Int),
                (overloads::UINT_TO_STRING, UInt),
                (overloads::DOUBLE_TO_STRING, Double),
                (overloads::BYTES_TO_STRING, Bytes),
                (overloads::TIMESTAMP_TO_STRING, Timestamp),
                (overloads::DURATION_TO_STRING, Duration),
            ],
        )?,
        conversion_decl(
            "bytes",
            "bytes",
            Bytes,
            &[
                (overloads::BYTES_TO_BYTES, Bytes),
                (overloads::STRING_TO_BYTES, String),
            ],
        )?,
        conversion_decl(
            "timestamp",
            "google.protobuf.Timestamp",
            Timestamp,
            &[
                (overloads::TIMESTAMP_TO_TIMESTAMP, Timestamp),
                (overloads::STRING_TO_TIMESTAMP, String),
                (overloads::INT_TO_TIMESTAMP, Int),
            ],
        )?,
        conversion_decl(
            "duration",
            "google.protobuf.Duration",
            Duration,
            &[
                (overloads::DURATION_TO_DURATION, Duration),
                (overloads::STRING_TO_DURATION, String),
                (overloads::INT_TO_DURATION, Int),
            ],
        )?,
        string_method_decl("contains", overloads::CONTAINS_STRING, |s, sub| {
            Value::Bool(s.contains(sub))
        })?,
        string_method_decl("startsWith", overloads::STARTS_WITH_STRING, |s, prefix| {
            Value::Bool(s.starts_with(prefix))
        })?,
        string_method_decl("endsWith", overloads::ENDS_WITH_STRING, |s, suffix| {
            Value::Bool(s.ends_with(suffix))
        })?,
        matches_decl()?,
    ];
    decls.extend(timestamp_accessor_decls()?);
    decls.extend(duration_accessor_decls()?);
    Ok(decls)
}

// ==================== Logic ====================

// false absorbs errors and unknowns on the other side.
fn logical_and(args: &[Value]) -> Value {
    let mut all_true = true;
    for arg in args {
        match arg.as_bool() {
            Some(false) => return Value::Bool(false),
            Some(true) => {}
            None => all_true = false,
        }
    }
    if all_true {
        Value::Bool(true)
    } else {
        maybe_no_such_overload(operators::LOGICAL_AND, args)
    }
}

fn logical_or(args: &[Value]) -> Value {
    let mut all_false = true;
    for arg in args {
        match arg.as_bool() {
            Some(true) => return Value::Bool(true),
            Some(false) => {}
            None => all_false = false,
        }
    }
    if all_false {
        Value::Bool(false)
    } else {
        maybe_no_such_overload(operators::LOGICAL_OR, args)
    }
}

fn conditional(args: &[Value]) -> Value {
    if args.len() != 3 {
        return maybe_no_such_overload(operators::CONDITIONAL, args);
    }
    match &args[0] {
        Value::Bool(true) => args[1].clone(),
        Value::Bool(false) => args[2].clone(),
        Value::Error(_) | Value::Unknown(_) => args[0].clone(),
        other => Value::error(EvalError::no_such_overload_for(
            operators::CONDITIONAL,
            &[other.type_name().as_ref()],
        )),
    }
}

fn logical_not(v: &Value) -> Value {
    match v.as_bool() {
        Some(b) => Value::Bool(!b),
        None => Value::error(EvalError::no_such_overload_for(
            operators::LOGICAL_NOT,
            &[v.type_name().as_ref()],
        )),
    }
}

// Comprehension guard: anything but a definite false keeps the loop going.
fn not_strictly_false(v: &Value) -> Value {
    match v.as_bool() {
        Some(false) => Value::Bool(false),
        _ => Value::Bool(true),
    }
}

fn logical_and_decl() -> Result<FunctionDecl, DeclError> {
    FunctionDecl::new(operators::LOGICAL_AND)
        .with_singleton(Singleton::function(logical_and).non_strict())?
        .with_overload(
            OverloadDecl::function(
                overloads::LOGICAL_AND,
                vec![CelType::Bool, CelType::Bool],
                CelType::Bool,
            )
            .non_strict()
            .with_function(logical_and),
        )
}

fn logical_or_decl() -> Result<FunctionDecl, DeclError> {
    FunctionDecl::new(operators::LOGICAL_OR)
        .with_singleton(Singleton::function(logical_or).non_strict())?
        .with_overload(
            OverloadDecl::function(
                overloads::LOGICAL_OR,
                vec![CelType::Bool, CelType::Bool],
                CelType::Bool,
            )
            .non_strict()
            .with_function(logical_or),
        )
}

fn conditional_decl() -> Result<FunctionDecl, DeclError> {
    FunctionDecl::new(operators::CONDITIONAL)
        .with_singleton(Singleton::function(conditional).non_strict())?
        .with_overload(
            OverloadDecl::function(
                overloads::CONDITIONAL,
                vec![
                    CelType::Bool,
                    CelType::TypeParam("T".into()),
                    CelType::TypeParam("T".into()),
                ],
                CelType::TypeParam("T".into()),
            )
            .non_strict()
            .with_function(conditional),
        )
}

fn logical_not_decl() -> Result<FunctionDecl, DeclError> {
    FunctionDecl::new(operators::LOGICAL_NOT)
        .with_singleton(Singleton::unary(logical_not))?
        .with_overload(
            OverloadDecl::function(overloads::LOGICAL_NOT, vec![CelType::Bool], CelType::Bool)
                .with_unary(logical_not),
        )
}

fn not_strictly_false_decl() -> Result<FunctionDecl, DeclError> {
    FunctionDecl::new(operators::NOT_STRICTLY_FALSE).with_overload(
        OverloadDecl::function(
            overloads::NOT_STRICTLY_FALSE,
            vec![CelType::Dyn],
            CelType::Bool,
        )
        .non_strict()
        .with_unary(not_strictly_false),
    )
}

// ==================== Equality and ordering ====================

fn equals_decl() -> Result<FunctionDecl, DeclError> {
    FunctionDecl::new(operators::EQUALS)
        .with_singleton(Singleton::binary(|a, b| a.equal(b)).non_strict())?
        .with_overload(
            OverloadDecl::function(
                overloads::EQUALS,
                vec![
                    CelType::TypeParam("T".into()),
                    CelType::TypeParam("T".into()),
                ],
                CelType::Bool,
            )
            .non_strict()
            .with_binary(|a, b| a.equal(b)),
        )
}

fn not_equals_decl() -> Result<FunctionDecl, DeclError> {
    fn not_equal(a: &Value, b: &Value) -> Value {
        match a.equal(b) {
            Value::Bool(eq) => Value::Bool(!eq),
            other => other,
        }
    }
    FunctionDecl::new(operators::NOT_EQUALS)
        .with_singleton(Singleton::binary(not_equal).non_strict())?
        .with_overload(
            OverloadDecl::function(
                overloads::NOT_EQUALS,
                vec![
                    CelType::TypeParam("T".into()),
                    CelType::TypeParam("T".into()),
                ],
                CelType::Bool,
            )
            .non_strict()
            .with_binary(not_equal),
        )
}

// The relational operators share one three-way comparison; a non-ordinal
// result (an error) passes through untouched.
fn relate(a: &Value, b: &Value, test: fn(i64) -> bool) -> Value {
    match ops::compare(a, b) {
        Value::Int(ordering) => Value::Bool(test(ordering)),
        other => other,
    }
}

// Published relational ids, in the shared signature order below.
const LESS_IDS: [&str; 14] = [
    overloads::LESS_BOOL,
    overloads::LESS_INT64,
    overloads::LESS_INT64_DOUBLE,
    overloads::LESS_INT64_UINT64,
    overloads::LESS_UINT64,
    overloads::LESS_UINT64_DOUBLE,
    overloads::LESS_UINT64_INT64,
    overloads::LESS_DOUBLE,
    overloads::LESS_DOUBLE_INT64,
    overloads::LESS_DOUBLE_UINT64,
    overloads::LESS_STRING,
    overloads::LESS_BYTES,
    overloads::LESS_TIMESTAMP,
    overloads::LESS_DURATION,
];

const LESS_EQUALS_IDS: [&str; 14] = [
    overloads::LESS_EQUALS_BOOL,
    overloads::LESS_EQUALS_INT64,
    overloads::LESS_EQUALS_INT64_DOUBLE,
    overloads::LESS_EQUALS_INT64_UINT64,
    overloads::LESS_EQUALS_UINT64,
    overloads::LESS_EQUALS_UINT64_DOUBLE,
    overloads::LESS_EQUALS_UINT64_INT64,
    overloads::LESS_EQUALS_DOUBLE,
    overloads::LESS_EQUALS_DOUBLE_INT64,
    overloads::LESS_EQUALS_DOUBLE_UINT64,
    overloads::LESS_EQUALS_STRING,
    overloads::LESS_EQUALS_BYTES,
    overloads::LESS_EQUALS_TIMESTAMP,
    overloads::LESS_EQUALS_DURATION,
];

const GREATER_IDS: [&str; 14] = [
    overloads::GREATER_BOOL,
    overloads::GREATER_INT64,
    overloads::GREATER_INT64_DOUBLE,
    overloads::GREATER_INT64_UINT64,
    overloads::GREATER_UINT64,
    overloads::GREATER_UINT64_DOUBLE,
    overloads::GREATER_UINT64_INT64,
    overloads::GREATER_DOUBLE,
    overloads::GREATER_DOUBLE_INT64,
    overloads::GREATER_DOUBLE_UINT64,
    overloads::GREATER_STRING,
    overloads::GREATER_BYTES,
    overloads::GREATER_TIMESTAMP,
    overloads::GREATER_DURATION,
];

const GREATER_EQUALS_IDS: [&str; 14] = [
    overloads::GREATER_EQUALS_BOOL,
    overloads::GREATER_EQUALS_INT64,
    overloads::GREATER_EQUALS_INT64_DOUBLE,
    overloads::GREATER_EQUALS_INT64_UINT64,
    overloads::GREATER_EQUALS_UINT64,
    overloads::GREATER_EQUALS_UINT64_DOUBLE,
    overloads::GREATER_EQUALS_UINT64_INT64,
    overloads::GREATER_EQUALS_DOUBLE,
    overloads::GREATER_EQUALS_DOUBLE_INT64,
    overloads::GREATER_EQUALS_DOUBLE_UINT64,
    overloads::GREATER_EQUALS_STRING,
    overloads::GREATER_EQUALS_BYTES,
    overloads::GREATER_EQUALS_TIMESTAMP,
    overloads::GREATER_EQUALS_DURATION,
];

fn relational_decl(
    name: &str,
    ids: &[&str; 14],
    test: fn(i64) -> bool,
) -> Result<FunctionDecl, DeclError> {
    use CelType::*;
    let signatures: [(CelType, CelType); 14] = [
        (Bool, Bool),
        (Int, Int),
        (Int, Double),
        (Int, UInt),
        (UInt, UInt),
        (UInt, Double),
        (UInt, Int),
        (Double, Double),
        (Double, Int),
        (Double, UInt),
        (String, String),
        (Bytes, Bytes),
        (Timestamp, Timestamp),
        (Duration, Duration),
    ];
    let mut decl = FunctionDecl::new(name).with_singleton(
        Singleton::binary(move |a, b| relate(a, b, test)).with_operand_trait(Trait::Comparer),
    )?;
    for (id, (lhs, rhs)) in ids.iter().zip(signatures) {
        decl = decl.with_overload(
            OverloadDecl::function(*id, vec![lhs, rhs], CelType::Bool)
                .with_binary(move |a, b| relate(a, b, test)),
        )?;
    }
    Ok(decl)
}

// ==================== Arithmetic ====================

fn operator_decl(
    name: &str,
    operand_trait: Trait,
    f: fn(&Value, &Value) -> Value,
    table: &[(&str, CelType, CelType, CelType)],
) -> Result<FunctionDecl, DeclError> {
    let mut decl = FunctionDecl::new(name)
        .with_singleton(Singleton::binary(move |a, b| f(a, b)).with_operand_trait(operand_trait))?;
    for (id, lhs, rhs, result) in table {
        decl = decl.with_overload(
            OverloadDecl::function(*id, vec![lhs.clone(), rhs.clone()], result.clone())
                .with_binary(move |a, b| f(a, b)),
        )?;
    }
    Ok(decl)
}

fn negate_decl() -> Result<FunctionDecl, DeclError> {
    FunctionDecl::new(operators::NEGATE)
        .with_singleton(Singleton::unary(|v| ops::negate(v)).with_operand_trait(Trait::Negater))?
        .with_overload(
            OverloadDecl::function(overloads::NEGATE_INT64, vec![CelType::Int], CelType::Int)
                .with_unary(|v| ops::negate(v)),
        )?
        .with_overload(
            OverloadDecl::function(
                overloads::NEGATE_DOUBLE,
                vec![CelType::Double],
                CelType::Double,
            )
            .with_unary(|v| ops::negate(v)),
        )
}

// ==================== Collections ====================

fn index_decl() -> Result<FunctionDecl, DeclError> {
    FunctionDecl::new(operators::INDEX)
        .with_singleton(Singleton::binary(|t, k| ops::index(t, k)).with_operand_trait(Trait::Indexer))?
        .with_overload(
            OverloadDecl::function(
                overloads::INDEX_LIST,
                vec![CelType::List(Box::new(CelType::Dyn)), CelType::Int],
                CelType::Dyn,
            )
            .with_binary(|t, k| ops::index(t, k)),
        )?
        .with_overload(
            OverloadDecl::function(
                overloads::INDEX_MAP,
                vec![
                    CelType::Map(Box::new(CelType::Dyn), Box::new(CelType::Dyn)),
                    CelType::Dyn,
                ],
                CelType::Dyn,
            )
            .with_binary(|t, k| ops::index(t, k)),
        )
}

fn in_decl() -> Result<FunctionDecl, DeclError> {
    // The collection is the second argument, so the Container trait is
    // checked inside the implementation rather than gated on args[0].
    fn member_of(item: &Value, collection: &Value) -> Value {
        ops::contains(collection, item)
    }
    FunctionDecl::new(operators::IN)
        .with_singleton(Singleton::binary(member_of))?
        .with_overload(
            OverloadDecl::function(
                overloads::IN_LIST,
                vec![CelType::Dyn, CelType::List(Box::new(CelType::Dyn))],
                CelType::Bool,
            )
            .with_binary(member_of),
        )?
        .with_overload(
            OverloadDecl::function(
                overloads::IN_MAP,
                vec![
                    CelType::Dyn,
                    CelType::Map(Box::new(CelType::Dyn), Box::new(CelType::Dyn)),
                ],
                CelType::Bool,
            )
            .with_binary(member_of),
        )
}

fn size_decl() -> Result<FunctionDecl, DeclError> {
    let global: [(&str, CelType); 4] = [
        (overloads::SIZE_STRING, CelType::String),
        (overloads::SIZE_BYTES, CelType::Bytes),
        (overloads::SIZE_LIST, CelType::List(Box::new(CelType::Dyn))),
        (
            overloads::SIZE_MAP,
            CelType::Map(Box::new(CelType::Dyn), Box::new(CelType::Dyn)),
        ),
    ];
    let member: [(&str, CelType); 4] = [
        (overloads::SIZE_STRING_INST, CelType::String),
        (overloads::SIZE_BYTES_INST, CelType::Bytes),
        (overloads::SIZE_LIST_INST, CelType::List(Box::new(CelType::Dyn))),
        (
            overloads::SIZE_MAP_INST,
            CelType::Map(Box::new(CelType::Dyn), Box::new(CelType::Dyn)),
        ),
    ];
    let mut decl = FunctionDecl::new("size")
        .with_singleton(Singleton::unary(|v| ops::size(v)).with_operand_trait(Trait::Sizer))?;
    for (id, param) in global {
        decl = decl.with_overload(
            OverloadDecl::function(id, vec![param], CelType::Int).with_unary(|v| ops::size(v)),
        )?;
    }
    for (id, param) in member {
        decl = decl.with_overload(
            OverloadDecl::method(id, vec![param], CelType::Int).with_unary(|v| ops::size(v)),
        )?;
    }
    Ok(decl)
}

// ==================== Conversions ====================

fn conversion_decl(
    name: &str,
    target: &'static str,
    result: CelType,
    table: &[(&str, CelType)],
) -> Result<FunctionDecl, DeclError> {
    let mut decl = FunctionDecl::new(name)
        .with_singleton(Singleton::unary(move |v| convert::convert_to_type(v, target)))?;
    for (id, param) in table {
        decl = decl.with_overload(
            OverloadDecl::function(*id, vec![param.clone()], result.clone())
                .with_unary(move |v| convert::convert_to_type(v, target)),
        )?;
    }
    Ok(decl)
}

fn type_of_decl() -> Result<FunctionDecl, DeclError> {
    FunctionDecl::new("type")
        .with_singleton(Singleton::unary(|v| Value::Type(v.type_value())))?
        .with_overload(
            OverloadDecl::function(overloads::TYPE_OF, vec![CelType::Dyn], CelType::Type)
                .with_unary(|v| Value::Type(v.type_value())),
        )
}

fn dyn_decl() -> Result<FunctionDecl, DeclError> {
    FunctionDecl::new("dyn")
        .with_singleton(Singleton::unary(|v| v.clone()))?
        .with_overload(
            OverloadDecl::function(overloads::TO_DYN, vec![CelType::Dyn], CelType::Dyn)
                .with_unary(|v| v.clone()),
        )
}

// ==================== Strings ====================

fn string_method_decl(
    name: &str,
    id: &str,
    f: fn(&str, &str) -> Value,
) -> Result<FunctionDecl, DeclError> {
    let decl = FunctionDecl::new(name).with_overload(
        OverloadDecl::method(id, vec![CelType::String, CelType::String], CelType::Bool)
            .with_binary(move |a, b| match (a.as_string(), b.as_string()) {
                (Some(x), Some(y)) => f(x, y),
                _ => Value::error(EvalError::no_such_overload()),
            }),
    )?;
    Ok(decl.without_type_guards())
}

fn regex_match(a: &Value, b: &Value) -> Value {
    match (a.as_string(), b.as_string()) {
        (Some(text), Some(pattern)) => ops::matches(text, pattern),
        _ => Value::error(EvalError::no_such_overload()),
    }
}

fn matches_decl() -> Result<FunctionDecl, DeclError> {
    FunctionDecl::new("matches")
        .with_singleton(Singleton::binary(regex_match).with_operand_trait(Trait::Matcher))?
        .with_overload(
            OverloadDecl::function(
                overloads::MATCHES,
                vec![CelType::String, CelType::String],
                CelType::Bool,
            )
            .with_binary(regex_match),
        )?
        .with_overload(
            OverloadDecl::method(
                overloads::MATCHES_STRING,
                vec![CelType::String, CelType::String],
                CelType::Bool,
            )
            .with_binary(regex_match),
        )
}

// ==================== Time accessors ====================

fn timestamp_get(v: &Value, tz: Option<&Value>, component: TimestampComponent) -> Value {
    let ts = match v.as_timestamp() {
        Some(ts) => ts,
        None => return Value::error(EvalError::no_such_overload()),
    };
    let zone = match tz {
        None => TimezoneInfo::Utc,
        Some(tz_value) => match tz_value.as_string() {
            Some(name) => match time::parse_timezone(name) {
                Ok(zone) => zone,
                Err(e) => return Value::error(e),
            },
            None => return Value::error(EvalError::no_such_overload()),
        },
    };
    match time::timestamp_component(&ts, component, &zone) {
        Ok(n) => Value::Int(n),
        Err(e) => Value::error(e),
    }
}

fn timestamp_accessor_decl(
    name: &str,
    id: &'static str,
    id_with_tz: &'static str,
    component: TimestampComponent,
) -> Result<FunctionDecl, DeclError> {
    FunctionDecl::new(name)
        .with_overload(
            OverloadDecl::method(id, vec![CelType::Timestamp], CelType::Int)
                .with_unary(move |v| timestamp_get(v, None, component)),
        )?
        .with_overload(
            OverloadDecl::method(
                id_with_tz,
                vec![CelType::Timestamp, CelType::String],
                CelType::Int,
            )
            .with_binary(move |v, tz| timestamp_get(v, Some(tz), component)),
        )
}

fn timestamp_accessor_decls() -> Result<Vec<FunctionDecl>, DeclError> {
    Ok(vec![
        timestamp_accessor_decl(
            "getFullYear",
            overloads::TIMESTAMP_TO_YEAR,
            overloads::TIMESTAMP_TO_YEAR_WITH_TZ,
            TimestampComponent::Year,
        )?,
        timestamp_accessor_decl(
            "getMonth",
            overloads::TIMESTAMP_TO_MONTH,
            overloads::TIMESTAMP_TO_MONTH_WITH_TZ,
            TimestampComponent::Month,
        )?,
        timestamp_accessor_decl(
            "getDayOfYear",
            overloads::TIMESTAMP_TO_DAY_OF_YEAR,
            overloads::TIMESTAMP_TO_DAY_OF_YEAR_WITH_TZ,
            TimestampComponent::DayOfYear,
        )?,
        timestamp_accessor_decl(
            "getDayOfMonth",
            overloads::TIMESTAMP_TO_DAY_OF_MONTH,
            overloads::TIMESTAMP_TO_DAY_OF_MONTH_WITH_TZ,
            TimestampComponent::DayOfMonth,
        )?,
        timestamp_accessor_decl(
            "getDate",
            overloads::TIMESTAMP_TO_DATE,
            overloads::TIMESTAMP_TO_DATE_WITH_TZ,
            TimestampComponent::Date,
        )?,
        timestamp_accessor_decl(
            "getDayOfWeek",
            overloads::TIMESTAMP_TO_DAY_OF_WEEK,
            overloads::TIMESTAMP_TO_DAY_OF_WEEK_WITH_TZ,
            TimestampComponent::DayOfWeek,
        )?,
        timestamp_accessor_decl(
            "getHours",
            overloads::TIMESTAMP_TO_HOURS,
            overloads::TIMESTAMP_TO_HOURS_WITH_TZ,
            TimestampComponent::Hours,
        )?,
        timestamp_accessor_decl(
            "getMinutes",
            overloads::TIMESTAMP_TO_MINUTES,
            overloads::TIMESTAMP_TO_MINUTES_WITH_TZ,
            TimestampComponent::Minutes,
        )?,
        timestamp_accessor_decl(
            "getSeconds",
            overloads::TIMESTAMP_TO_SECONDS,
            overloads::TIMESTAMP_TO_SECONDS_WITH_TZ,
            TimestampComponent::Seconds,
        )?,
        timestamp_accessor_decl(
            "getMilliseconds",
            overloads::TIMESTAMP_TO_MILLISECONDS,
            overloads::TIMESTAMP_TO_MILLISECONDS_WITH_TZ,
            TimestampComponent::Milliseconds,
        )?,
    ])
}

// Duration accessors return totals, unlike the calendar components above.
fn duration_total(v: &Value, nanos_per_unit: i128) -> Value {
    match v.as_duration() {
        Some(d) => Value::Int((d.to_nanos() / nanos_per_unit) as i64),
        None => Value::error(EvalError::no_such_overload()),
    }
}

fn duration_accessor_decls() -> Result<Vec<FunctionDecl>, DeclError> {
    let table: [(&str, &str, i128); 4] = [
        ("getHours", overloads::DURATION_TO_HOURS, 3_600_000_000_000),
        ("getMinutes", overloads::DURATION_TO_MINUTES, 60_000_000_000),
        ("getSeconds", overloads::DURATION_TO_SECONDS, 1_000_000_000),
        (
            "getMilliseconds",
            overloads::DURATION_TO_MILLISECONDS,
            1_000_000,
        ),
    ];
    table
        .into_iter()
        .map(|(name, id, nanos_per_unit)| {
            FunctionDecl::new(name).with_overload(
                OverloadDecl::method(id, vec![CelType::Duration], CelType::Int)
                    .with_unary(move |v| duration_total(v, nanos_per_unit)),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::error::EvalErrorKind;

    fn call(name: &str, args: &[Value]) -> Value {
        standard().dispatch(name, None, args)
    }

    #[test]
    fn test_arithmetic_dispatch() {
        assert_eq!(call("_+_", &[Value::Int(2), Value::Int(3)]), Value::Int(5));
        assert_eq!(
            call("_+_", &[Value::string("a"), Value::string("b")]),
            Value::string("ab")
        );
        assert_eq!(call("_*_", &[Value::UInt(2), Value::UInt(3)]), Value::UInt(6));
        assert_eq!(call("-_", &[Value::Int(5)]), Value::Int(-5));
        let out = call("_/_", &[Value::Int(1), Value::Int(0)]);
        assert_eq!(out.as_error().unwrap().kind, EvalErrorKind::DivideByZero);
    }

    #[test]
    fn test_mixed_numeric_arithmetic_rejected() {
        // Doubles carry the Adder trait, so the gate passes and the
        // implementation itself must reject the mixed pair.
        let out = call("_+_", &[Value::Double(1.0), Value::Int(1)]);
        assert_eq!(out.as_error().unwrap().kind, EvalErrorKind::NoSuchOverload);
        let out = call("_+_", &[Value::Int(1), Value::UInt(1)]);
        assert_eq!(out.as_error().unwrap().kind, EvalErrorKind::NoSuchOverload);
        let out = call("_*_", &[Value::UInt(2), Value::Double(3.0)]);
        assert_eq!(out.as_error().unwrap().kind, EvalErrorKind::NoSuchOverload);
    }

    #[test]
    fn test_pinned_overload() {
        let out = standard().dispatch("_+_", Some("add_int64"), &[Value::Int(1), Value::Int(2)]);
        assert_eq!(out, Value::Int(3));
        let out = standard().dispatch(
            "_+_",
            Some("add_int64"),
            &[Value::string("a"), Value::string("b")],
        );
        assert_eq!(out.as_error().unwrap().kind, EvalErrorKind::NoSuchOverload);
    }

    #[test]
    fn test_logical_and_absorbs_errors() {
        let err = Value::error(EvalError::divide_by_zero());
        assert_eq!(
            call("_&&_", &[Value::Bool(false), err.clone()]),
            Value::Bool(false)
        );
        assert_eq!(
            call("_&&_", &[err.clone(), Value::Bool(false)]),
            Value::Bool(false)
        );
        // No definite false, so the error wins.
        let out = call("_&&_", &[Value::Bool(true), err]);
        assert_eq!(out.as_error().unwrap().message, "divide by zero");
        assert_eq!(
            call("_&&_", &[Value::Bool(true), Value::Bool(true)]),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_logical_or_absorbs_errors() {
        let err = Value::error(EvalError::divide_by_zero());
        assert_eq!(
            call("_||_", &[err.clone(), Value::Bool(true)]),
            Value::Bool(true)
        );
        let out = call("_||_", &[err, Value::Bool(false)]);
        assert_eq!(out.as_error().unwrap().message, "divide by zero");
    }

    #[test]
    fn test_logical_and_unknowns() {
        let unk = Value::unknown(9);
        assert_eq!(
            call("_&&_", &[unk.clone(), Value::Bool(false)]),
            Value::Bool(false)
        );
        assert!(call("_&&_", &[unk, Value::Bool(true)]).is_unknown());
    }

    #[test]
    fn test_conditional() {
        assert_eq!(
            call("_?_:_", &[Value::Bool(true), Value::Int(1), Value::Int(2)]),
            Value::Int(1)
        );
        assert_eq!(
            call("_?_:_", &[Value::Bool(false), Value::Int(1), Value::Int(2)]),
            Value::Int(2)
        );
        // Only the selected branch's error matters; the condition's error
        // propagates ahead of either branch.
        let err = Value::error(EvalError::divide_by_zero());
        assert_eq!(
            call("_?_:_", &[Value::Bool(true), Value::Int(1), err.clone()]),
            Value::Int(1)
        );
        let out = call("_?_:_", &[err, Value::Int(1), Value::Int(2)]);
        assert!(out.is_error());
        let out = call("_?_:_", &[Value::Int(9), Value::Int(1), Value::Int(2)]);
        assert_eq!(out.as_error().unwrap().kind, EvalErrorKind::NoSuchOverload);
    }

    #[test]
    fn test_logical_not() {
        assert_eq!(call("!_", &[Value::Bool(true)]), Value::Bool(false));
        let out = call("!_", &[Value::Int(1)]);
        assert_eq!(out.as_error().unwrap().kind, EvalErrorKind::NoSuchOverload);
    }

    #[test]
    fn test_not_strictly_false() {
        let err = Value::error(EvalError::divide_by_zero());
        assert_eq!(call("@not_strictly_false", &[err]), Value::Bool(true));
        assert_eq!(
            call("@not_strictly_false", &[Value::Bool(false)]),
            Value::Bool(false)
        );
        assert_eq!(
            call("@not_strictly_false", &[Value::unknown(1)]),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_equality() {
        assert_eq!(
            call("_==_", &[Value::Int(1), Value::UInt(1)]),
            Value::Bool(true)
        );
        assert_eq!(
            call("_!=_", &[Value::Int(1), Value::Double(2.0)]),
            Value::Bool(true)
        );
        assert_eq!(
            call("_==_", &[Value::string("a"), Value::Int(1)]),
            Value::Bool(false)
        );
    }

    #[test]
    fn test_relational() {
        assert_eq!(
            call("_<_", &[Value::Int(1), Value::UInt(2)]),
            Value::Bool(true)
        );
        assert_eq!(
            call("_>=_", &[Value::Double(2.0), Value::Int(2)]),
            Value::Bool(true)
        );
        assert_eq!(
            call("_<=_", &[Value::string("a"), Value::string("b")]),
            Value::Bool(true)
        );
        // The comparison error passes through the relational wrapper raw.
        let out = call("_<_", &[Value::string("a"), Value::Int(1)]);
        assert_eq!(out.as_error().unwrap().kind, EvalErrorKind::NoSuchOverload);
        let out = call("_>_", &[Value::Double(f64::NAN), Value::Double(1.0)]);
        assert_eq!(out.as_error().unwrap().kind, EvalErrorKind::InvalidArgument);
    }

    #[test]
    fn test_relational_ids_registered() {
        let table = [
            (operators::LESS, &LESS_IDS),
            (operators::LESS_EQUALS, &LESS_EQUALS_IDS),
            (operators::GREATER, &GREATER_IDS),
            (operators::GREATER_EQUALS, &GREATER_EQUALS_IDS),
        ];
        for (name, ids) in table {
            let decl = standard().find(name).unwrap();
            for id in ids {
                assert!(decl.overload(id).is_some(), "{} missing {}", name, id);
            }
        }
        let out = standard().dispatch(
            operators::LESS,
            Some(overloads::LESS_INT64_DOUBLE),
            &[Value::Int(1), Value::Double(2.0)],
        );
        assert_eq!(out, Value::Bool(true));
    }

    #[test]
    fn test_index_and_in() {
        let list = Value::list(vec![Value::Int(10), Value::Int(20)]);
        assert_eq!(call("_[_]", &[list.clone(), Value::Int(0)]), Value::Int(10));
        assert_eq!(call("@in", &[Value::Int(20), list]), Value::Bool(true));
    }

    #[test]
    fn test_size_both_forms() {
        assert_eq!(call("size", &[Value::string("abc")]), Value::Int(3));
        let out = standard().dispatch("size", Some("string_size"), &[Value::string("abc")]);
        assert_eq!(out, Value::Int(3));
        // Strict calls forward an error argument unchanged.
        let err = Value::error(EvalError::divide_by_zero());
        assert_eq!(call("size", &[err.clone()]), err);
    }

    #[test]
    fn test_conversions() {
        assert_eq!(call("int", &[Value::string("42")]), Value::Int(42));
        assert_eq!(call("double", &[Value::Int(2)]), Value::Double(2.0));
        assert_eq!(
            call("string", &[Value::duration(90, 0)]),
            Value::string("90s")
        );
        assert_eq!(
            call("type", &[Value::Int(1)]),
            Value::Type(crate::eval::value::TypeValue::int_type().clone())
        );
        assert_eq!(call("dyn", &[Value::Int(1)]), Value::Int(1));
    }

    #[test]
    fn test_string_functions() {
        assert_eq!(
            call("contains", &[Value::string("hello"), Value::string("ell")]),
            Value::Bool(true)
        );
        assert_eq!(
            call("startsWith", &[Value::string("hello"), Value::string("he")]),
            Value::Bool(true)
        );
        assert_eq!(
            call("endsWith", &[Value::string("hello"), Value::string("lo")]),
            Value::Bool(true)
        );
        assert_eq!(
            call("matches", &[Value::string("hello"), Value::string("l+")]),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_timestamp_accessors() {
        let ts = Value::Timestamp(time::parse_timestamp("2023-06-15T23:30:00Z").unwrap());
        assert_eq!(call("getFullYear", &[ts.clone()]), Value::Int(2023));
        assert_eq!(call("getMonth", &[ts.clone()]), Value::Int(5));
        assert_eq!(
            call("getHours", &[ts.clone(), Value::string("+02:00")]),
            Value::Int(1)
        );
        let out = call("getHours", &[ts, Value::string("Nowhere/Invalid")]);
        assert_eq!(out.as_error().unwrap().kind, EvalErrorKind::InvalidArgument);
    }

    #[test]
    fn test_duration_accessors() {
        let d = Value::duration(3_725, 250_000_000);
        assert_eq!(call("getHours", &[d.clone()]), Value::Int(1));
        assert_eq!(call("getMinutes", &[d.clone()]), Value::Int(62));
        assert_eq!(call("getSeconds", &[d.clone()]), Value::Int(3_725));
        assert_eq!(call("getMilliseconds", &[d]), Value::Int(3_725_250));
    }

    #[test]
    fn test_unknown_function() {
        let out = call("frobnicate", &[Value::Int(1)]);
        assert_eq!(out.as_error().unwrap().kind, EvalErrorKind::UnknownFunction);
    }
}
