//! Declaration-time types for functions and overloads.

pub mod decls;

pub use decls::{CelType, DeclError, FunctionDecl, OverloadDecl};
