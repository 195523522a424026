//! Function dispatch.
//!
//! The `Dispatcher` routes a call to an implementation in three tiers: a
//! pinned overload id from a type-checked plan, a singleton bound to the
//! function as a whole, or the first declared overload whose signature fits
//! the runtime argument kinds. Strictness is enforced here: unless an
//! implementation opts out, error and unknown arguments short-circuit before
//! it runs.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::eval::error::EvalError;
use crate::eval::traits::Trait;
use crate::eval::value::{Unknown, Value};
use crate::types::decls::{DeclError, FunctionDecl, OverloadDecl};

/// A one-argument implementation.
pub type UnaryFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;
/// A two-argument implementation.
pub type BinaryFn = Arc<dyn Fn(&Value, &Value) -> Value + Send + Sync>;
/// A variadic implementation.
pub type FunctionFn = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

/// A whole-function implementation that bypasses overload selection.
#[derive(Clone, Default)]
pub struct Singleton {
    /// Trait the first argument's type must carry.
    pub operand_trait: Option<Trait>,
    /// Implementation for one-argument calls.
    pub unary: Option<UnaryFn>,
    /// Implementation for two-argument calls.
    pub binary: Option<BinaryFn>,
    /// Variadic implementation, used when no arity-specific one applies.
    pub function: Option<FunctionFn>,
    /// Non-strict singletons receive error and unknown arguments unfiltered.
    pub non_strict: bool,
}

impl Singleton {
    /// A strict unary singleton.
    pub fn unary(f: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        Self {
            unary: Some(Arc::new(f)),
            ..Self::default()
        }
    }

    /// A strict binary singleton.
    pub fn binary(f: impl Fn(&Value, &Value) -> Value + Send + Sync + 'static) -> Self {
        Self {
            binary: Some(Arc::new(f)),
            ..Self::default()
        }
    }

    /// A strict variadic singleton.
    pub fn function(f: impl Fn(&[Value]) -> Value + Send + Sync + 'static) -> Self {
        Self {
            function: Some(Arc::new(f)),
            ..Self::default()
        }
    }

    /// Gate invocation on a trait of the first argument's type.
    pub fn with_operand_trait(mut self, t: Trait) -> Self {
        self.operand_trait = Some(t);
        self
    }

    /// Let error and unknown arguments through to the implementation.
    pub fn non_strict(mut self) -> Self {
        self.non_strict = true;
        self
    }
}

impl fmt::Debug for Singleton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Singleton")
            .field("operand_trait", &self.operand_trait)
            .field("unary", &self.unary.is_some())
            .field("binary", &self.binary.is_some())
            .field("function", &self.function.is_some())
            .field("non_strict", &self.non_strict)
            .finish()
    }
}

// ==================== Strictness ====================

/// Sentinel propagation for strict calls: the first error argument wins,
/// otherwise all unknown arguments merge into one.
pub fn strict_sentinel(args: &[Value]) -> Option<Value> {
    let mut unknown: Option<Unknown> = None;
    for arg in args {
        match arg {
            Value::Error(_) => return Some(arg.clone()),
            Value::Unknown(u) => {
                unknown = Some(match unknown {
                    Some(acc) => acc.merge(u),
                    None => u.as_ref().clone(),
                });
            }
            _ => {}
        }
    }
    unknown.map(|u| Value::Unknown(Arc::new(u)))
}

fn no_such_overload_value(name: &str, args: &[Value]) -> Value {
    let types: Vec<Arc<str>> = args.iter().map(Value::type_name).collect();
    let names: Vec<&str> = types.iter().map(|t| t.as_ref()).collect();
    Value::error(EvalError::no_such_overload_for(name, &names))
}

/// The failure value for a call nothing matched: an error argument if there
/// is one, else merged unknowns, else a no-such-overload error.
pub fn maybe_no_such_overload(name: &str, args: &[Value]) -> Value {
    strict_sentinel(args).unwrap_or_else(|| no_such_overload_value(name, args))
}

// ==================== Dispatcher ====================

/// A registry of function declarations with runtime dispatch.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    functions: HashMap<String, FunctionDecl>,
}

impl Dispatcher {
    /// Create an empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a declaration, merging with an existing one of the same name.
    pub fn register(&mut self, decl: FunctionDecl) -> Result<(), DeclError> {
        let name = decl.name.clone();
        match self.functions.remove(&name) {
            Some(existing) => {
                self.functions.insert(name, existing.merge(decl)?);
            }
            None => {
                self.functions.insert(name, decl);
            }
        }
        Ok(())
    }

    /// Look up a declaration by name.
    pub fn find(&self, name: &str) -> Option<&FunctionDecl> {
        self.functions.get(name)
    }

    /// Iterate over registered function names.
    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    /// Invoke a function.
    ///
    /// `overload_id`, when given, pins the implementation to one overload and
    /// only checks its signature guard. Otherwise a singleton handles the
    /// whole call if one is bound, and declared overloads are tried in
    /// registration order as the fallback.
    pub fn dispatch(&self, name: &str, overload_id: Option<&str>, args: &[Value]) -> Value {
        let decl = match self.functions.get(name) {
            Some(decl) => decl,
            None => {
                return strict_sentinel(args)
                    .unwrap_or_else(|| Value::error(EvalError::unknown_function(name)))
            }
        };

        if let Some(id) = overload_id {
            if let Some(overload) = decl.overload(id) {
                if decl.disable_type_guards || overload.signature_matches(args) {
                    return invoke_overload(overload, name, args);
                }
            }
            return maybe_no_such_overload(name, args);
        }

        if let Some(singleton) = &decl.singleton {
            return invoke_singleton(singleton, name, args);
        }

        for overload in &decl.overloads {
            if overload.has_impl() && overload.signature_matches(args) {
                return invoke_overload(overload, name, args);
            }
        }
        maybe_no_such_overload(name, args)
    }
}

fn operand_traits_hold(traits: &[Trait], args: &[Value]) -> bool {
    traits.is_empty()
        || args
            .first()
            .map(|arg| {
                let tv = arg.type_value();
                traits.iter().all(|t| tv.has_trait(*t))
            })
            .unwrap_or(false)
}

fn invoke_overload(overload: &OverloadDecl, name: &str, args: &[Value]) -> Value {
    if !overload.non_strict {
        if let Some(sentinel) = strict_sentinel(args) {
            return sentinel;
        }
    }
    if !operand_traits_hold(&overload.operand_traits, args) {
        return no_such_overload_value(name, args);
    }
    if let ([a], Some(f)) = (args, &overload.unary) {
        return f(a);
    }
    if let ([a, b], Some(f)) = (args, &overload.binary) {
        return f(a, b);
    }
    match &overload.function {
        Some(f) => f(args),
        None => no_such_overload_value(name, args),
    }
}

fn invoke_singleton(singleton: &Singleton, name: &str, args: &[Value]) -> Value {
    if !singleton.non_strict {
        if let Some(sentinel) = strict_sentinel(args) {
            return sentinel;
        }
    }
    if let Some(required) = singleton.operand_trait {
        let holds = args
            .first()
            .map(|arg| arg.type_value().has_trait(required))
            .unwrap_or(false);
        if !holds {
            return no_such_overload_value(name, args);
        }
    }
    if let ([a], Some(f)) = (args, &singleton.unary) {
        return f(a);
    }
    if let ([a, b], Some(f)) = (args, &singleton.binary) {
        return f(a, b);
    }
    match &singleton.function {
        Some(f) => f(args),
        None => no_such_overload_value(name, args),
    }
}
