//! Function and overload declarations.
//!
//! A `FunctionDecl` names a function and carries its overloads. Each
//! `OverloadDecl` pairs a declared signature with an optional runtime
//! implementation; the dispatch engine selects among them by runtime argument
//! kinds, or bypasses selection entirely when the function binds a singleton.

use std::fmt;

use thiserror::Error;

use crate::eval::functions::{BinaryFn, FunctionFn, Singleton, UnaryFn};
use crate::eval::traits::Trait;
use crate::eval::value::Value;

/// A declaration-time type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CelType {
    Bool,
    Bytes,
    Double,
    Duration,
    /// Matches any runtime value.
    Dyn,
    Error,
    Int,
    List(Box<CelType>),
    Map(Box<CelType>, Box<CelType>),
    Null,
    String,
    Timestamp,
    Type,
    UInt,
    /// A generic type parameter; matches any runtime value.
    TypeParam(std::string::String),
}

impl CelType {
    /// Whether a runtime value inhabits this type.
    ///
    /// List and map element types are erased at runtime; only the outer kind
    /// is checked. `Dyn` and type parameters match everything, sentinels
    /// included.
    pub fn runtime_matches(&self, value: &Value) -> bool {
        match self {
            CelType::Dyn | CelType::TypeParam(_) => true,
            CelType::Bool => matches!(value, Value::Bool(_)),
            CelType::Bytes => matches!(value, Value::Bytes(_)),
            CelType::Double => matches!(value, Value::Double(_)),
            CelType::Duration => matches!(value, Value::Duration(_)),
            CelType::Error => value.is_error(),
            CelType::Int => matches!(value, Value::Int(_)),
            CelType::List(_) => matches!(value, Value::List(_)),
            CelType::Map(_, _) => matches!(value, Value::Map(_)),
            CelType::Null => value.is_null(),
            CelType::String => matches!(value, Value::String(_)),
            CelType::Timestamp => matches!(value, Value::Timestamp(_)),
            CelType::Type => matches!(value, Value::Type(_)),
            CelType::UInt => matches!(value, Value::UInt(_)),
        }
    }
}

impl fmt::Display for CelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CelType::Bool => write!(f, "bool"),
            CelType::Bytes => write!(f, "bytes"),
            CelType::Double => write!(f, "double"),
            CelType::Duration => write!(f, "google.protobuf.Duration"),
            CelType::Dyn => write!(f, "dyn"),
            CelType::Error => write!(f, "error"),
            CelType::Int => write!(f, "int"),
            CelType::List(elem) => write!(f, "list({})", elem),
            CelType::Map(key, value) => write!(f, "map({}, {})", key, value),
            CelType::Null => write!(f, "null_type"),
            CelType::String => write!(f, "string"),
            CelType::Timestamp => write!(f, "google.protobuf.Timestamp"),
            CelType::Type => write!(f, "type"),
            CelType::UInt => write!(f, "uint"),
            CelType::TypeParam(name) => write!(f, "{}", name),
        }
    }
}

/// Errors raised while assembling function declarations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeclError {
    #[error("overload collision on function '{function}': {id}")]
    OverloadCollision { function: String, id: String },
    #[error("overload '{id}' on function '{function}' has the same signature as '{existing}'")]
    SignatureOverlap {
        function: String,
        id: String,
        existing: String,
    },
    #[error("singleton already defined for function '{0}'")]
    SingletonRedefined(String),
}

// ==================== Overloads ====================

/// A single overload of a function: a signature plus optional implementation.
#[derive(Clone)]
pub struct OverloadDecl {
    /// Stable overload identifier, e.g. "add_int64".
    pub id: String,
    /// Parameter types. For member overloads the receiver is params[0].
    pub params: Vec<CelType>,
    /// Result type.
    pub result: CelType,
    /// Whether this is a receiver-style (member) overload.
    pub is_member: bool,
    /// Non-strict overloads receive error and unknown arguments unfiltered.
    pub non_strict: bool,
    /// Traits the first argument's type must carry.
    pub operand_traits: Vec<Trait>,
    /// Implementation for one-argument calls.
    pub unary: Option<UnaryFn>,
    /// Implementation for two-argument calls.
    pub binary: Option<BinaryFn>,
    /// Variadic implementation, used when no arity-specific one applies.
    pub function: Option<FunctionFn>,
}

impl OverloadDecl {
    /// Declare a global-function overload.
    pub fn function(id: impl Into<String>, params: Vec<CelType>, result: CelType) -> Self {
        Self {
            id: id.into(),
            params,
            result,
            is_member: false,
            non_strict: false,
            operand_traits: Vec::new(),
            unary: None,
            binary: None,
            function: None,
        }
    }

    /// Declare a receiver-style overload.
    pub fn method(id: impl Into<String>, params: Vec<CelType>, result: CelType) -> Self {
        Self {
            is_member: true,
            ..Self::function(id, params, result)
        }
    }

    /// Attach a unary implementation.
    pub fn with_unary(
        mut self,
        f: impl Fn(&Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.unary = Some(std::sync::Arc::new(f));
        self
    }

    /// Attach a binary implementation.
    pub fn with_binary(
        mut self,
        f: impl Fn(&Value, &Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.binary = Some(std::sync::Arc::new(f));
        self
    }

    /// Attach a variadic implementation.
    pub fn with_function(
        mut self,
        f: impl Fn(&[Value]) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.function = Some(std::sync::Arc::new(f));
        self
    }

    /// Mark the overload non-strict.
    pub fn non_strict(mut self) -> Self {
        self.non_strict = true;
        self
    }

    /// Require traits on the first argument's type.
    pub fn with_operand_traits(mut self, traits: Vec<Trait>) -> Self {
        self.operand_traits = traits;
        self
    }

    /// Whether the runtime argument kinds fit this overload's signature.
    pub fn signature_matches(&self, args: &[Value]) -> bool {
        self.params.len() == args.len()
            && self
                .params
                .iter()
                .zip(args)
                .all(|(param, arg)| param.runtime_matches(arg))
    }

    /// Whether any implementation is attached.
    pub fn has_impl(&self) -> bool {
        self.unary.is_some() || self.binary.is_some() || self.function.is_some()
    }
}

impl fmt::Debug for OverloadDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverloadDecl")
            .field("id", &self.id)
            .field("params", &self.params)
            .field("result", &self.result)
            .field("is_member", &self.is_member)
            .field("non_strict", &self.non_strict)
            .field("operand_traits", &self.operand_traits)
            .field("unary", &self.unary.is_some())
            .field("binary", &self.binary.is_some())
            .field("function", &self.function.is_some())
            .finish()
    }
}

// ==================== Functions ====================

/// A named function with its overloads and optional singleton implementation.
#[derive(Debug, Clone, Default)]
pub struct FunctionDecl {
    /// The function name, canonical operator id for operators.
    pub name: String,
    /// Declared overloads, kept in registration order.
    pub overloads: Vec<OverloadDecl>,
    /// A whole-function implementation that bypasses overload selection.
    pub singleton: Option<Singleton>,
    /// Skip runtime signature checks when an overload id is pinned.
    pub disable_type_guards: bool,
}

impl FunctionDecl {
    /// Create a declaration with no overloads.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add an overload, rejecting duplicate ids and duplicate signatures.
    pub fn with_overload(mut self, overload: OverloadDecl) -> Result<Self, DeclError> {
        if self.overloads.iter().any(|o| o.id == overload.id) {
            return Err(DeclError::OverloadCollision {
                function: self.name.clone(),
                id: overload.id,
            });
        }
        if let Some(existing) = self
            .overloads
            .iter()
            .find(|o| o.is_member == overload.is_member && o.params == overload.params)
        {
            return Err(DeclError::SignatureOverlap {
                function: self.name.clone(),
                id: overload.id,
                existing: existing.id.clone(),
            });
        }
        self.overloads.push(overload);
        Ok(self)
    }

    /// Bind a singleton implementation, rejecting redefinition.
    pub fn with_singleton(mut self, singleton: Singleton) -> Result<Self, DeclError> {
        if self.singleton.is_some() {
            return Err(DeclError::SingletonRedefined(self.name));
        }
        self.singleton = Some(singleton);
        Ok(self)
    }

    /// Disable runtime signature checks for pinned-overload dispatch.
    pub fn without_type_guards(mut self) -> Self {
        self.disable_type_guards = true;
        self
    }

    /// Merge another declaration of the same function into this one.
    pub fn merge(mut self, other: FunctionDecl) -> Result<Self, DeclError> {
        for overload in other.overloads {
            self = self.with_overload(overload)?;
        }
        if let Some(singleton) = other.singleton {
            self = self.with_singleton(singleton)?;
        }
        self.disable_type_guards |= other.disable_type_guards;
        Ok(self)
    }

    /// Find an overload by id.
    pub fn overload(&self, id: &str) -> Option<&OverloadDecl> {
        self.overloads.iter().find(|o| o.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_matches() {
        assert!(CelType::Int.runtime_matches(&Value::Int(1)));
        assert!(!CelType::Int.runtime_matches(&Value::UInt(1)));
        assert!(CelType::Dyn.runtime_matches(&Value::string("x")));
        assert!(CelType::TypeParam("T".into()).runtime_matches(&Value::Null));
        assert!(CelType::List(Box::new(CelType::Int)).runtime_matches(&Value::list(vec![])));
        assert!(!CelType::List(Box::new(CelType::Int)).runtime_matches(&Value::Int(1)));
    }

    #[test]
    fn test_type_display() {
        assert_eq!(CelType::Int.to_string(), "int");
        assert_eq!(
            CelType::List(Box::new(CelType::String)).to_string(),
            "list(string)"
        );
        assert_eq!(
            CelType::Map(Box::new(CelType::String), Box::new(CelType::Dyn)).to_string(),
            "map(string, dyn)"
        );
    }

    #[test]
    fn test_signature_matching() {
        let overload = OverloadDecl::function(
            "add_int64",
            vec![CelType::Int, CelType::Int],
            CelType::Int,
        );
        assert!(overload.signature_matches(&[Value::Int(1), Value::Int(2)]));
        assert!(!overload.signature_matches(&[Value::Int(1), Value::UInt(2)]));
        assert!(!overload.signature_matches(&[Value::Int(1)]));
    }

    #[test]
    fn test_overload_collision() {
        let decl = FunctionDecl::new("f")
            .with_overload(OverloadDecl::function("f_int", vec![CelType::Int], CelType::Int))
            .unwrap();
        let err = decl
            .with_overload(OverloadDecl::function("f_int", vec![CelType::UInt], CelType::UInt))
            .unwrap_err();
        assert_eq!(
            err,
            DeclError::OverloadCollision {
                function: "f".into(),
                id: "f_int".into()
            }
        );
    }

    #[test]
    fn test_signature_overlap() {
        let decl = FunctionDecl::new("f")
            .with_overload(OverloadDecl::function("f_int", vec![CelType::Int], CelType::Int))
            .unwrap();
        let err = decl
            .clone()
            .with_overload(OverloadDecl::function("f_int2", vec![CelType::Int], CelType::Int))
            .unwrap_err();
        assert_eq!(
            err,
            DeclError::SignatureOverlap {
                function: "f".into(),
                id: "f_int2".into(),
                existing: "f_int".into()
            }
        );
        // A member overload with the same parameters does not overlap.
        assert!(decl
            .with_overload(OverloadDecl::method("f_int_inst", vec![CelType::Int], CelType::Int))
            .is_ok());
    }

    #[test]
    fn test_merge() {
        let a = FunctionDecl::new("f")
            .with_overload(OverloadDecl::function("f_int", vec![CelType::Int], CelType::Int))
            .unwrap();
        let b = FunctionDecl::new("f")
            .with_overload(OverloadDecl::function("f_uint", vec![CelType::UInt], CelType::UInt))
            .unwrap();
        let merged = a.merge(b).unwrap();
        assert_eq!(merged.overloads.len(), 2);
        assert!(merged.overload("f_uint").is_some());
    }
}
