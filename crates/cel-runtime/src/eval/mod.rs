//! Evaluation runtime: values, operator semantics, and function dispatch.

pub mod convert;
pub mod error;
pub mod functions;
pub mod ops;
pub mod time;
pub mod traits;
pub mod value;

pub use error::{EvalError, EvalErrorKind};
pub use functions::{BinaryFn, Dispatcher, FunctionFn, Singleton, UnaryFn};
pub use traits::{Trait, TraitMask};
pub use value::{Duration, MapKey, ObjectValue, Timestamp, TypeValue, Unknown, Value, ValueMap};
