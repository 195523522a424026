//! Runtime values.
//!
//! `Value` is the tagged union every expression evaluates to. Errors and
//! unknowns are ordinary variants rather than exceptions, so they compare and
//! propagate through operators like any other operand.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;

use super::error::EvalError;
use super::traits::{Trait, TraitMask};

/// A CEL runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed 64-bit integer.
    Int(i64),
    /// Unsigned 64-bit integer.
    UInt(u64),
    /// 64-bit floating point.
    Double(f64),
    /// Unicode string (Arc for cheap cloning).
    String(Arc<str>),
    /// Byte sequence (Arc for cheap cloning).
    Bytes(Arc<[u8]>),
    /// List of values.
    List(Arc<[Value]>),
    /// Key-value map (BTreeMap for deterministic iteration).
    Map(Arc<ValueMap>),
    /// Timestamp (seconds and nanos since Unix epoch).
    Timestamp(Timestamp),
    /// Duration (seconds and nanos).
    Duration(Duration),
    /// A type as a first-class value.
    Type(TypeValue),
    /// Host-defined value participating in dispatch through `ObjectValue`.
    Object(Arc<dyn ObjectValue>),
    /// Sentinel for a value that was intentionally not computed.
    Unknown(Arc<Unknown>),
    /// Error value (evaluation errors propagate as values).
    Error(Arc<EvalError>),
}

/// A CEL timestamp value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    /// Seconds since Unix epoch.
    pub seconds: i64,
    /// Nanoseconds (0..999_999_999).
    pub nanos: i32,
}

/// Earliest representable timestamp second (0001-01-01T00:00:00Z).
pub const MIN_TIMESTAMP_SECONDS: i64 = -62_135_596_800;
/// Latest representable timestamp second (9999-12-31T23:59:59Z).
pub const MAX_TIMESTAMP_SECONDS: i64 = 253_402_300_799;

impl Timestamp {
    /// Create a new timestamp.
    pub fn new(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }

    /// Create a timestamp from seconds since Unix epoch.
    pub fn from_seconds(seconds: i64) -> Self {
        Self { seconds, nanos: 0 }
    }

    /// Total nanoseconds since epoch (i128 to avoid overflow).
    pub fn to_nanos(&self) -> i128 {
        self.seconds as i128 * 1_000_000_000 + self.nanos as i128
    }

    /// Build from total nanoseconds, normalizing nanos into 0..1e9.
    pub fn from_total_nanos(nanos: i128) -> Self {
        let seconds = nanos.div_euclid(1_000_000_000) as i64;
        let nanos = nanos.rem_euclid(1_000_000_000) as i32;
        Self { seconds, nanos }
    }

    /// True if the timestamp falls within year 0001..=9999.
    pub fn is_valid(&self) -> bool {
        (MIN_TIMESTAMP_SECONDS..=MAX_TIMESTAMP_SECONDS).contains(&self.seconds)
    }
}

/// A CEL duration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration {
    /// Seconds component.
    pub seconds: i64,
    /// Nanoseconds component, same sign as `seconds`.
    pub nanos: i32,
}

/// Largest representable duration magnitude in seconds (about 10000 years).
pub const MAX_DURATION_SECONDS: i64 = 315_576_000_000;

impl Duration {
    /// Create a new duration.
    pub fn new(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }

    /// Create a duration from whole seconds.
    pub fn from_seconds(seconds: i64) -> Self {
        Self { seconds, nanos: 0 }
    }

    /// Create a duration from total nanoseconds.
    pub fn from_nanos(nanos: i64) -> Self {
        Self {
            seconds: nanos / 1_000_000_000,
            nanos: (nanos % 1_000_000_000) as i32,
        }
    }

    /// Total nanoseconds (i128 to avoid overflow).
    pub fn to_nanos(&self) -> i128 {
        self.seconds as i128 * 1_000_000_000 + self.nanos as i128
    }

    /// True if the duration magnitude is within the representable range.
    pub fn is_valid(&self) -> bool {
        self.seconds.abs() <= MAX_DURATION_SECONDS
    }

    /// True if the duration is negative.
    pub fn is_negative(&self) -> bool {
        self.seconds < 0 || (self.seconds == 0 && self.nanos < 0)
    }
}

// ==================== Types ====================

/// A CEL type as a runtime value.
///
/// One instance exists per named type; the trait mask declares which
/// capability interfaces values of the type implement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeValue {
    /// The qualified type name.
    pub name: Arc<str>,
    /// Capabilities supported by values of this type.
    pub traits: TraitMask,
}

macro_rules! type_singleton {
    ($static_name:ident, $fn_name:ident, $name:expr, [$($trait:ident),*]) => {
        static $static_name: Lazy<TypeValue> = Lazy::new(|| {
            TypeValue::with_traits($name, TraitMask::of(&[$(Trait::$trait),*]))
        });

        impl TypeValue {
            pub fn $fn_name() -> &'static TypeValue {
                &$static_name
            }
        }
    };
}

type_singleton!(NULL_TYPE, null_type, "null_type", []);
type_singleton!(BOOL_TYPE, bool_type, "bool", [Comparer, Negater]);
type_singleton!(
    INT_TYPE,
    int_type,
    "int",
    [Adder, Comparer, Divider, Modder, Multiplier, Negater, Subtractor]
);
type_singleton!(
    UINT_TYPE,
    uint_type,
    "uint",
    [Adder, Comparer, Divider, Modder, Multiplier, Subtractor]
);
type_singleton!(
    DOUBLE_TYPE,
    double_type,
    "double",
    [Adder, Comparer, Divider, Multiplier, Negater, Subtractor]
);
type_singleton!(
    STRING_TYPE,
    string_type,
    "string",
    [Adder, Comparer, Matcher, Receiver, Sizer]
);
type_singleton!(BYTES_TYPE, bytes_type, "bytes", [Adder, Comparer, Sizer]);
type_singleton!(
    LIST_TYPE,
    list_type,
    "list",
    [Adder, Container, Indexer, Iterable, Sizer, Foldable]
);
type_singleton!(
    MAP_TYPE,
    map_type,
    "map",
    [Container, FieldTester, Indexer, Iterable, Sizer, Foldable]
);
type_singleton!(
    TIMESTAMP_TYPE,
    timestamp_type,
    "google.protobuf.Timestamp",
    [Adder, Comparer, Receiver, Subtractor]
);
type_singleton!(
    DURATION_TYPE,
    duration_type,
    "google.protobuf.Duration",
    [Adder, Comparer, Negater, Receiver, Subtractor]
);
type_singleton!(TYPE_TYPE, type_type, "type", []);
type_singleton!(ERROR_TYPE, error_type, "error", []);
type_singleton!(UNKNOWN_TYPE, unknown_type, "unknown", []);

impl TypeValue {
    /// Create a type with no capabilities.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            traits: TraitMask::EMPTY,
        }
    }

    /// Create a type with the given capability set.
    pub fn with_traits(name: impl Into<Arc<str>>, traits: TraitMask) -> Self {
        Self {
            name: name.into(),
            traits,
        }
    }

    /// Whether values of this type implement the given capability.
    pub fn has_trait(&self, t: Trait) -> bool {
        self.traits.contains(t)
    }

    /// The qualified type name.
    pub fn type_name(&self) -> &str {
        &self.name
    }
}

// ==================== Unknown ====================

/// A set of expression ids whose values were intentionally not computed.
///
/// Unknowns flow through strict operators like errors but remain
/// distinguishable in the final result.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Unknown {
    ids: Vec<i64>,
}

impl Unknown {
    /// An unknown for a single expression id.
    pub fn new(id: i64) -> Self {
        Self { ids: vec![id] }
    }

    /// The expression ids covered by this unknown.
    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    /// Merge two unknowns, deduplicating ids.
    pub fn merge(&self, other: &Unknown) -> Unknown {
        let mut ids = self.ids.clone();
        for id in &other.ids {
            if !ids.contains(id) {
                ids.push(*id);
            }
        }
        ids.sort_unstable();
        Unknown { ids }
    }
}

// ==================== Host objects ====================

/// Extension point for host-defined value types.
///
/// The built-in operations consult three hooks: Indexer routes through
/// `get`, FieldTester through `is_set`, and equality always goes through
/// `equals`. `receive` is the entry point for hosts that dispatch member
/// calls on object targets. Advertising any other capability trait does not
/// extend the built-in operators; it only opens the singleton gate, and the
/// operation still reports no-such-overload for the object.
pub trait ObjectValue: fmt::Debug + Send + Sync {
    /// The qualified type name of this object.
    fn type_name(&self) -> &str;

    /// Capabilities supported by this object.
    fn traits(&self) -> TraitMask {
        TraitMask::EMPTY
    }

    /// Equality against another value.
    fn equals(&self, other: &Value) -> Value;

    /// Indexed or field access (Indexer).
    fn get(&self, index: &Value) -> Value {
        let _ = index;
        Value::error(EvalError::no_such_overload())
    }

    /// Field presence test (FieldTester).
    fn is_set(&self, field: &str) -> Value {
        let _ = field;
        Value::error(EvalError::no_such_overload())
    }

    /// Receiver-style member call (Receiver).
    fn receive(&self, function: &str, overload_id: &str, args: &[Value]) -> Value {
        let _ = (function, overload_id, args);
        Value::error(EvalError::no_such_overload())
    }
}

// ==================== Maps ====================

/// A CEL map with heterogeneous keys.
#[derive(Debug, Clone, Default)]
pub struct ValueMap {
    entries: BTreeMap<MapKey, Value>,
}

/// A map key. CEL allows bool, int, uint, and string keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum MapKey {
    Bool(bool),
    Int(i64),
    UInt(u64),
    String(Arc<str>),
}

impl MapKey {
    /// Create a map key from a Value, if the value kind is a legal key.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(MapKey::Bool(*b)),
            Value::Int(i) => Some(MapKey::Int(*i)),
            Value::UInt(u) => Some(MapKey::UInt(*u)),
            Value::String(s) => Some(MapKey::String(s.clone())),
            _ => None,
        }
    }

    /// Convert back to a Value.
    pub fn to_value(&self) -> Value {
        match self {
            MapKey::Bool(b) => Value::Bool(*b),
            MapKey::Int(i) => Value::Int(*i),
            MapKey::UInt(u) => Value::UInt(*u),
            MapKey::String(s) => Value::String(s.clone()),
        }
    }

    /// The numerically-equal key of the other integer kind, if any.
    ///
    /// CEL treats `1` and `1u` as the same map key.
    fn numeric_twin(&self) -> Option<MapKey> {
        match self {
            MapKey::Int(i) if *i >= 0 => Some(MapKey::UInt(*i as u64)),
            MapKey::UInt(u) if *u <= i64::MAX as u64 => Some(MapKey::Int(*u as i64)),
            _ => None,
        }
    }
}

impl ValueMap {
    /// Create a new empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a map from an iterator of key-value pairs.
    pub fn from_entries(entries: impl IntoIterator<Item = (MapKey, Value)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Get a value by key, unifying numerically-equal int/uint keys.
    pub fn get(&self, key: &MapKey) -> Option<&Value> {
        self.entries.get(key).or_else(|| {
            key.numeric_twin()
                .and_then(|twin| self.entries.get(&twin))
        })
    }

    /// Insert a key-value pair.
    pub fn insert(&mut self, key: MapKey, value: Value) {
        self.entries.insert(key, value);
    }

    /// Check if a key exists, unifying numerically-equal int/uint keys.
    pub fn contains_key(&self, key: &MapKey) -> bool {
        self.get(key).is_some()
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries.
    pub fn iter(&self) -> impl Iterator<Item = (&MapKey, &Value)> {
        self.entries.iter()
    }

    /// Iterate over keys.
    pub fn keys(&self) -> impl Iterator<Item = &MapKey> {
        self.entries.keys()
    }

    /// Iterate over values.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }
}

// ==================== Value Constructors ====================

impl Value {
    /// Create a string value.
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::String(s.into())
    }

    /// Create a bytes value.
    pub fn bytes(b: impl Into<Arc<[u8]>>) -> Self {
        Value::Bytes(b.into())
    }

    /// Create a list value.
    pub fn list(elements: impl Into<Arc<[Value]>>) -> Self {
        Value::List(elements.into())
    }

    /// Create a map value.
    pub fn map(entries: impl IntoIterator<Item = (MapKey, Value)>) -> Self {
        Value::Map(Arc::new(ValueMap::from_entries(entries)))
    }

    /// Create a timestamp value.
    pub fn timestamp(seconds: i64, nanos: i32) -> Self {
        Value::Timestamp(Timestamp::new(seconds, nanos))
    }

    /// Create a duration value.
    pub fn duration(seconds: i64, nanos: i32) -> Self {
        Value::Duration(Duration::new(seconds, nanos))
    }

    /// Create an error value.
    pub fn error(err: impl Into<EvalError>) -> Self {
        Value::Error(Arc::new(err.into()))
    }

    /// Create an unknown value for the given expression id.
    pub fn unknown(id: i64) -> Self {
        Value::Unknown(Arc::new(Unknown::new(id)))
    }

    /// Wrap a host object.
    pub fn object(obj: Arc<dyn ObjectValue>) -> Self {
        Value::Object(obj)
    }
}

// ==================== Type Information ====================

impl Value {
    /// The runtime type of this value, trait mask included.
    pub fn type_value(&self) -> TypeValue {
        match self {
            Value::Null => TypeValue::null_type().clone(),
            Value::Bool(_) => TypeValue::bool_type().clone(),
            Value::Int(_) => TypeValue::int_type().clone(),
            Value::UInt(_) => TypeValue::uint_type().clone(),
            Value::Double(_) => TypeValue::double_type().clone(),
            Value::String(_) => TypeValue::string_type().clone(),
            Value::Bytes(_) => TypeValue::bytes_type().clone(),
            Value::List(_) => TypeValue::list_type().clone(),
            Value::Map(_) => TypeValue::map_type().clone(),
            Value::Timestamp(_) => TypeValue::timestamp_type().clone(),
            Value::Duration(_) => TypeValue::duration_type().clone(),
            Value::Type(_) => TypeValue::type_type().clone(),
            Value::Object(o) => TypeValue::with_traits(o.type_name().to_string(), o.traits()),
            Value::Unknown(_) => TypeValue::unknown_type().clone(),
            Value::Error(_) => TypeValue::error_type().clone(),
        }
    }

    /// Short type name for diagnostics.
    pub fn type_name(&self) -> Arc<str> {
        self.type_value().name
    }

    /// Check if this value is an error.
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Check if this value is an unknown.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown(_))
    }

    /// Check if this value is an error or unknown sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.is_error() || self.is_unknown()
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

// ==================== Value Accessors ====================

impl Value {
    /// Try to view as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to view as i64.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to view as u64.
    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Value::UInt(u) => Some(*u),
            _ => None,
        }
    }

    /// Try to view as f64.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Try to view as string slice.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to view as bytes slice.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Try to view as list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// Try to view as map.
    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Try to view as timestamp.
    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Try to view as duration.
    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Value::Duration(d) => Some(*d),
            _ => None,
        }
    }

    /// Try to view the error payload.
    pub fn as_error(&self) -> Option<&EvalError> {
        match self {
            Value::Error(e) => Some(e),
            _ => None,
        }
    }
}

// ==================== Equality ====================

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            // IEEE 754 semantics: NaN != NaN
            (Value::Double(a), Value::Double(b)) => a == b,
            // Numeric kinds compare across representations.
            (Value::Int(a), Value::UInt(b)) => *a >= 0 && *a as u64 == *b,
            (Value::UInt(a), Value::Int(b)) => *b >= 0 && *a == *b as u64,
            (Value::Int(a), Value::Double(b)) => int_double_eq(*a, *b),
            (Value::Double(a), Value::Int(b)) => int_double_eq(*b, *a),
            (Value::UInt(a), Value::Double(b)) => uint_double_eq(*a, *b),
            (Value::Double(a), Value::UInt(b)) => uint_double_eq(*b, *a),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => {
                if a.len() != b.len() {
                    return false;
                }
                a.iter().all(|(key, val_a)| match b.get(key) {
                    Some(val_b) => val_a == val_b,
                    None => false,
                })
            }
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::Duration(a), Value::Duration(b)) => a == b,
            (Value::Type(a), Value::Type(b)) => a.name == b.name,
            (Value::Unknown(a), Value::Unknown(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => {
                a.kind == b.kind && a.message == b.message
            }
            (Value::Object(a), b) => a.equals(b).as_bool().unwrap_or(false),
            (a, Value::Object(b)) => b.equals(a).as_bool().unwrap_or(false),
            _ => false,
        }
    }
}

fn int_double_eq(i: i64, d: f64) -> bool {
    d.fract() == 0.0 && d >= i64::MIN as f64 && d <= i64::MAX as f64 && d as i64 == i
}

fn uint_double_eq(u: u64, d: f64) -> bool {
    d.fract() == 0.0 && d >= 0.0 && d <= u64::MAX as f64 && d as u64 == u
}

impl Value {
    /// Equality as a CEL operation: error and unknown operands propagate,
    /// everything else yields a bool. Cross-kind comparison (outside the
    /// numeric kinds) is `false`, never an error.
    pub fn equal(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Error(e), _) | (_, Value::Error(e)) => Value::Error(e.clone()),
            (Value::Unknown(a), Value::Unknown(b)) => {
                Value::Unknown(Arc::new(a.merge(b)))
            }
            (Value::Unknown(u), _) | (_, Value::Unknown(u)) => Value::Unknown(u.clone()),
            _ => Value::Bool(self == other),
        }
    }
}

// ==================== Display ====================

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::UInt(v) => write!(f, "{}u", v),
            Value::Double(v) => {
                if v.is_nan() {
                    write!(f, "NaN")
                } else if v.is_infinite() {
                    if v.is_sign_positive() {
                        write!(f, "+infinity")
                    } else {
                        write!(f, "-infinity")
                    }
                } else if v.fract() == 0.0 {
                    write!(f, "{}.0", v)
                } else {
                    write!(f, "{}", v)
                }
            }
            Value::String(v) => write!(f, "\"{}\"", v),
            Value::Bytes(v) => write!(f, "b\"{}\"", String::from_utf8_lossy(v)),
            Value::List(v) => {
                write!(f, "[")?;
                for (i, elem) in v.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", elem)?;
                }
                write!(f, "]")
            }
            Value::Map(m) => {
                write!(f, "{{")?;
                for (i, (key, value)) in m.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key.to_value(), value)?;
                }
                write!(f, "}}")
            }
            Value::Timestamp(t) => {
                write!(f, "timestamp(\"{}\")", super::time::format_timestamp(t))
            }
            Value::Duration(d) => {
                write!(f, "duration(\"{}\")", super::time::format_duration(d))
            }
            Value::Type(t) => write!(f, "{}", t.name),
            Value::Object(o) => write!(f, "{}{{...}}", o.type_name()),
            Value::Unknown(u) => write!(f, "unknown({:?})", u.ids()),
            Value::Error(e) => write!(f, "error({})", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_equality() {
        assert_eq!(Value::Int(42), Value::Int(42));
        assert_ne!(Value::Int(42), Value::Int(43));
        assert_eq!(Value::string("hello"), Value::string("hello"));
        assert_ne!(Value::string("hello"), Value::Int(42));
    }

    #[test]
    fn test_cross_numeric_equality() {
        assert_eq!(Value::Int(42), Value::UInt(42));
        assert_eq!(Value::Int(42), Value::Double(42.0));
        assert_eq!(Value::UInt(42), Value::Double(42.0));
        assert_ne!(Value::Int(-1), Value::UInt(u64::MAX));
        assert_ne!(Value::Int(42), Value::Double(42.5));
        assert_ne!(Value::Double(f64::NAN), Value::Double(f64::NAN));
    }

    #[test]
    fn test_equal_propagates_sentinels() {
        let err = Value::error(EvalError::divide_by_zero());
        assert!(err.equal(&Value::Int(1)).is_error());
        assert!(Value::Int(1).equal(&err).is_error());

        let unk = Value::unknown(7);
        assert!(unk.equal(&Value::Int(1)).is_unknown());
    }

    #[test]
    fn test_equal_cross_kind_is_false() {
        assert_eq!(
            Value::string("1").equal(&Value::Int(1)),
            Value::Bool(false)
        );
        assert_eq!(Value::Null.equal(&Value::Bool(false)), Value::Bool(false));
    }

    #[test]
    fn test_type_traits() {
        assert!(TypeValue::int_type().has_trait(Trait::Adder));
        assert!(TypeValue::int_type().has_trait(Trait::Negater));
        assert!(!TypeValue::uint_type().has_trait(Trait::Negater));
        assert!(TypeValue::string_type().has_trait(Trait::Matcher));
        assert!(!TypeValue::bool_type().has_trait(Trait::Adder));
        assert!(TypeValue::list_type().has_trait(Trait::Container));
        assert!(TypeValue::map_type().has_trait(Trait::Indexer));
        assert!(TypeValue::error_type().traits.is_empty());
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Int(1).type_name().as_ref(), "int");
        assert_eq!(
            Value::timestamp(0, 0).type_name().as_ref(),
            "google.protobuf.Timestamp"
        );
        assert_eq!(Value::Null.type_name().as_ref(), "null_type");
    }

    #[test]
    fn test_map_numeric_key_unification() {
        let map = ValueMap::from_entries([(MapKey::Int(1), Value::string("one"))]);
        assert_eq!(map.get(&MapKey::UInt(1)), Some(&Value::string("one")));
        assert!(map.contains_key(&MapKey::UInt(1)));
        assert!(!map.contains_key(&MapKey::UInt(2)));
    }

    #[test]
    fn test_unknown_merge() {
        let a = Unknown::new(3);
        let b = Unknown::new(1);
        let merged = a.merge(&b);
        assert_eq!(merged.ids(), &[1, 3]);
        assert_eq!(merged.merge(&Unknown::new(3)).ids(), &[1, 3]);
    }

    #[test]
    fn test_timestamp_validity() {
        assert!(Timestamp::from_seconds(0).is_valid());
        assert!(Timestamp::from_seconds(MAX_TIMESTAMP_SECONDS).is_valid());
        assert!(!Timestamp::from_seconds(MAX_TIMESTAMP_SECONDS + 1).is_valid());
        assert!(!Timestamp::from_seconds(MIN_TIMESTAMP_SECONDS - 1).is_valid());
    }

    #[test]
    fn test_duration_nanos() {
        let d = Duration::from_nanos(1_500_000_000);
        assert_eq!(d.seconds, 1);
        assert_eq!(d.nanos, 500_000_000);
        assert_eq!(d.to_nanos(), 1_500_000_000);
        assert!(Duration::from_nanos(-500).is_negative());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Value::Null), "null");
        assert_eq!(format!("{}", Value::Int(42)), "42");
        assert_eq!(format!("{}", Value::UInt(42)), "42u");
        assert_eq!(format!("{}", Value::Double(5.0)), "5.0");
        assert_eq!(format!("{}", Value::string("hello")), "\"hello\"");
        assert_eq!(format!("{}", Value::Bool(true)), "true");
    }
}
