//! CEL expression runtime.
//!
//! The value model, trait-driven operator dispatch, the standard function
//! library, and a precedence-exact unparser. Evaluation failures are values:
//! errors and unknowns flow through operators and short-circuit only where
//! the language says they do.

pub mod ast;
pub mod eval;
pub mod numeric;
pub mod operators;
pub mod overloads;
pub mod state;
pub mod stdlib;
pub mod types;
pub mod unparser;

pub use ast::{Constant, Expr, ExprKind, SourceInfo};
pub use eval::{
    Dispatcher, Duration, EvalError, EvalErrorKind, MapKey, ObjectValue, Singleton, Timestamp,
    Trait, TraitMask, TypeValue, Unknown, Value, ValueMap,
};
pub use state::EvalState;
pub use types::{CelType, DeclError, FunctionDecl, OverloadDecl};
pub use unparser::{unparse, unparse_with_options, UnparseError, UnparserOptions};
