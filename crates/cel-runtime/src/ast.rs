//! Expression tree.
//!
//! Operators are calls to their canonical function names (`_+_`, `_?_:_`),
//! so one `Call` shape covers the whole language. Each node carries the
//! parser-assigned id used by macro side-tables and unknown tracking.

use std::collections::HashMap;

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// Parser-assigned node id; 0 for synthesized nodes.
    pub id: i64,
    pub kind: ExprKind,
}

/// The expression variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Const(Constant),
    Ident(String),
    Select {
        operand: Box<Expr>,
        field: String,
        /// True for the select synthesized by `has(...)`.
        test_only: bool,
    },
    Call {
        /// Receiver for member-style calls.
        target: Option<Box<Expr>>,
        function: String,
        args: Vec<Expr>,
    },
    List {
        elements: Vec<Expr>,
        /// Indices of elements written with the optional marker `?`.
        optional_indices: Vec<usize>,
    },
    Map {
        entries: Vec<MapEntry>,
    },
    Struct {
        type_name: String,
        fields: Vec<StructEntry>,
    },
    Comprehension(Box<Comprehension>),
}

/// A literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
}

/// One `key: value` entry of a map literal.
#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
    pub id: i64,
    pub key: Expr,
    pub value: Expr,
    /// True for entries written `?key: value`.
    pub optional: bool,
}

/// One `field: value` entry of a struct literal.
#[derive(Debug, Clone, PartialEq)]
pub struct StructEntry {
    pub id: i64,
    pub field: String,
    pub value: Expr,
    /// True for entries written `?field: value`.
    pub optional: bool,
}

/// The desugared form of a macro such as `all` or `exists`.
#[derive(Debug, Clone, PartialEq)]
pub struct Comprehension {
    pub iter_var: String,
    pub iter_range: Expr,
    pub accu_var: String,
    pub accu_init: Expr,
    pub loop_condition: Expr,
    pub loop_step: Expr,
    pub result: Expr,
}

impl Expr {
    pub fn new(id: i64, kind: ExprKind) -> Self {
        Self { id, kind }
    }

    pub fn null(id: i64) -> Self {
        Self::new(id, ExprKind::Const(Constant::Null))
    }

    pub fn bool(id: i64, v: bool) -> Self {
        Self::new(id, ExprKind::Const(Constant::Bool(v)))
    }

    pub fn int(id: i64, v: i64) -> Self {
        Self::new(id, ExprKind::Const(Constant::Int(v)))
    }

    pub fn uint(id: i64, v: u64) -> Self {
        Self::new(id, ExprKind::Const(Constant::UInt(v)))
    }

    pub fn double(id: i64, v: f64) -> Self {
        Self::new(id, ExprKind::Const(Constant::Double(v)))
    }

    pub fn string(id: i64, v: impl Into<String>) -> Self {
        Self::new(id, ExprKind::Const(Constant::String(v.into())))
    }

    pub fn bytes(id: i64, v: impl Into<Vec<u8>>) -> Self {
        Self::new(id, ExprKind::Const(Constant::Bytes(v.into())))
    }

    pub fn ident(id: i64, name: impl Into<String>) -> Self {
        Self::new(id, ExprKind::Ident(name.into()))
    }

    pub fn select(id: i64, operand: Expr, field: impl Into<String>) -> Self {
        Self::new(
            id,
            ExprKind::Select {
                operand: Box::new(operand),
                field: field.into(),
                test_only: false,
            },
        )
    }

    /// The select form produced by `has(operand.field)`.
    pub fn presence_test(id: i64, operand: Expr, field: impl Into<String>) -> Self {
        Self::new(
            id,
            ExprKind::Select {
                operand: Box::new(operand),
                field: field.into(),
                test_only: true,
            },
        )
    }

    pub fn call(id: i64, function: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::new(
            id,
            ExprKind::Call {
                target: None,
                function: function.into(),
                args,
            },
        )
    }

    pub fn member_call(
        id: i64,
        target: Expr,
        function: impl Into<String>,
        args: Vec<Expr>,
    ) -> Self {
        Self::new(
            id,
            ExprKind::Call {
                target: Some(Box::new(target)),
                function: function.into(),
                args,
            },
        )
    }

    pub fn list(id: i64, elements: Vec<Expr>) -> Self {
        Self::new(
            id,
            ExprKind::List {
                elements,
                optional_indices: Vec::new(),
            },
        )
    }

    pub fn map(id: i64, entries: Vec<MapEntry>) -> Self {
        Self::new(id, ExprKind::Map { entries })
    }

    pub fn struct_(id: i64, type_name: impl Into<String>, fields: Vec<StructEntry>) -> Self {
        Self::new(
            id,
            ExprKind::Struct {
                type_name: type_name.into(),
                fields,
            },
        )
    }

    pub fn comprehension(id: i64, comp: Comprehension) -> Self {
        Self::new(id, ExprKind::Comprehension(Box::new(comp)))
    }
}

/// Side information recorded by the parser.
#[derive(Debug, Clone, Default)]
pub struct SourceInfo {
    /// For each node replaced by macro expansion, the original call.
    /// Nodes inside these stored calls use id 0.
    macro_calls: HashMap<i64, Expr>,
}

impl SourceInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the pre-expansion call for a macro node.
    pub fn add_macro_call(&mut self, id: i64, call: Expr) {
        self.macro_calls.insert(id, call);
    }

    /// The pre-expansion call for a node, if it came from a macro.
    pub fn macro_call(&self, id: i64) -> Option<&Expr> {
        self.macro_calls.get(&id)
    }

    /// Whether any macro calls are recorded.
    pub fn has_macro_calls(&self) -> bool {
        !self.macro_calls.is_empty()
    }
}
