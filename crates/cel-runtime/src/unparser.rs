//! Expression-to-source rendering.
//!
//! Reconstructs a parseable CEL string from an expression tree, inserting
//! parentheses only where precedence demands them. Nodes that came from macro
//! expansion render as the original call recorded in `SourceInfo`.

use std::collections::HashSet;

use thiserror::Error;

use crate::ast::{Constant, Expr, ExprKind, SourceInfo};
use crate::operators;

/// Errors from unparsing or option construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnparseError {
    #[error("unsupported expression: {0}")]
    Unsupported(String),
    #[error("cannot unparse operator: {0}")]
    UnexpectedOperator(String),
    #[error("invalid unparser option: {0}")]
    InvalidOption(String),
}

/// Line-wrapping configuration.
#[derive(Debug, Clone)]
pub struct UnparserOptions {
    wrap_on_column: usize,
    operators_to_wrap_on: HashSet<String>,
    wrap_after_column_limit: bool,
}

impl Default for UnparserOptions {
    fn default() -> Self {
        Self {
            wrap_on_column: 80,
            operators_to_wrap_on: [operators::LOGICAL_AND, operators::LOGICAL_OR]
                .into_iter()
                .map(str::to_string)
                .collect(),
            wrap_after_column_limit: true,
        }
    }
}

impl UnparserOptions {
    /// Set the column at which wrappable operators break the line.
    pub fn with_wrap_on_column(mut self, column: usize) -> Result<Self, UnparseError> {
        if column < 1 {
            return Err(UnparseError::InvalidOption(
                "wrap column must be at least 1".into(),
            ));
        }
        self.wrap_on_column = column;
        Ok(self)
    }

    /// Set the operators eligible for wrapping. Each must be an operator
    /// taking at least two operands.
    pub fn with_operators_to_wrap_on(
        mut self,
        ops: impl IntoIterator<Item = String>,
    ) -> Result<Self, UnparseError> {
        let ops: HashSet<String> = ops.into_iter().collect();
        for op in &ops {
            if !operators::arity(op).is_some_and(|n| n >= 2) {
                return Err(UnparseError::InvalidOption(format!(
                    "cannot wrap on '{}'",
                    op
                )));
            }
        }
        self.operators_to_wrap_on = ops;
        Ok(self)
    }

    /// Place the line break after the operator (default) or before it.
    pub fn with_wrap_after_column_limit(mut self, after: bool) -> Self {
        self.wrap_after_column_limit = after;
        self
    }
}

/// Render an expression with default options.
pub fn unparse(expr: &Expr, info: &SourceInfo) -> Result<String, UnparseError> {
    unparse_with_options(expr, info, &UnparserOptions::default())
}

/// Render an expression with explicit options.
pub fn unparse_with_options(
    expr: &Expr,
    info: &SourceInfo,
    options: &UnparserOptions,
) -> Result<String, UnparseError> {
    let mut unparser = Unparser {
        buf: String::new(),
        info,
        options,
        last_wrapped_index: 0,
    };
    unparser.visit(expr)?;
    Ok(unparser.buf)
}

struct Unparser<'a> {
    buf: String,
    info: &'a SourceInfo,
    options: &'a UnparserOptions,
    last_wrapped_index: usize,
}

impl Unparser<'_> {
    fn visit(&mut self, expr: &Expr) -> Result<(), UnparseError> {
        // Macro-produced nodes render as the original call. Nodes inside the
        // stored call carry id 0, so the lookup cannot recurse onto itself.
        if expr.id != 0 {
            if let Some(call) = self.info.macro_call(expr.id).cloned() {
                return self.visit(&call);
            }
        }
        match &expr.kind {
            ExprKind::Const(c) => {
                self.visit_const(c);
                Ok(())
            }
            ExprKind::Ident(name) => {
                self.buf.push_str(name);
                Ok(())
            }
            ExprKind::Select {
                operand,
                field,
                test_only,
            } => self.visit_select(operand, field, *test_only),
            ExprKind::Call {
                target,
                function,
                args,
            } => self.visit_call(target.as_deref(), function, args),
            ExprKind::List {
                elements,
                optional_indices,
            } => self.visit_list(elements, optional_indices),
            ExprKind::Map { entries } => self.visit_map(entries),
            ExprKind::Struct { type_name, fields } => self.visit_struct(type_name, fields),
            ExprKind::Comprehension(_) => Err(UnparseError::Unsupported(
                "comprehension without a recorded macro call".into(),
            )),
        }
    }

    fn visit_call(
        &mut self,
        target: Option<&Expr>,
        function: &str,
        args: &[Expr],
    ) -> Result<(), UnparseError> {
        match function {
            operators::CONDITIONAL => return self.visit_ternary(args),
            operators::INDEX => return self.visit_index(args, "["),
            operators::OPT_INDEX => return self.visit_index(args, "[?"),
            operators::OPT_SELECT => return self.visit_opt_select(args),
            _ => {}
        }
        if args.len() == 2 {
            if let Some(token) = operators::find_reverse_binary(function) {
                return self.visit_binary(function, token, &args[0], &args[1]);
            }
        }
        if args.len() == 1 {
            if let Some(token) = operators::display_name(function) {
                if operators::arity(function) == Some(1) {
                    return self.visit_unary(token, &args[0]);
                }
            }
        }
        if operators::is_operator(function) {
            return Err(UnparseError::UnexpectedOperator(function.to_string()));
        }
        if let Some(target) = target {
            let nested = is_binary_or_ternary_operator(target);
            self.visit_maybe_nested(target, nested)?;
            self.buf.push('.');
        }
        self.buf.push_str(function);
        self.buf.push('(');
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.buf.push_str(", ");
            }
            self.visit(arg)?;
        }
        self.buf.push(')');
        Ok(())
    }

    fn visit_binary(
        &mut self,
        function: &str,
        token: &str,
        lhs: &Expr,
        rhs: &Expr,
    ) -> Result<(), UnparseError> {
        let lhs_paren = is_complex_operator_with_respect_to(function, lhs);
        let mut rhs_paren = is_complex_operator_with_respect_to(function, rhs);
        // Left-associative operators need parens around a same-precedence
        // right operand; && and || are associative so they do not.
        if !rhs_paren && is_left_recursive(function) {
            rhs_paren = is_same_precedence(function, rhs);
        }
        self.visit_maybe_nested(lhs, lhs_paren)?;
        self.buf.push(' ');
        if !self.write_operator_with_wrapping(function, token) {
            self.buf.push_str(token);
            self.buf.push(' ');
        }
        self.visit_maybe_nested(rhs, rhs_paren)
    }

    // Returns true when the operator was written with a line break.
    fn write_operator_with_wrapping(&mut self, function: &str, token: &str) -> bool {
        let wrappable = self.options.operators_to_wrap_on.contains(function);
        let line_length = self.buf.len() - self.last_wrapped_index + function.len();
        if wrappable && line_length >= self.options.wrap_on_column {
            self.last_wrapped_index = self.buf.len();
            if self.options.wrap_after_column_limit {
                self.buf.push_str(token);
                self.buf.push('\n');
            } else {
                self.buf.push('\n');
                self.buf.push_str(token);
                self.buf.push(' ');
            }
            return true;
        }
        false
    }

    fn visit_ternary(&mut self, args: &[Expr]) -> Result<(), UnparseError> {
        if args.len() != 3 {
            return Err(UnparseError::UnexpectedOperator(
                operators::CONDITIONAL.to_string(),
            ));
        }
        let nested = |e: &Expr| {
            is_same_precedence(operators::CONDITIONAL, e) || is_complex_operator(e)
        };
        self.visit_maybe_nested(&args[0], nested(&args[0]))?;
        self.buf.push_str(" ? ");
        self.visit_maybe_nested(&args[1], nested(&args[1]))?;
        self.buf.push_str(" : ");
        self.visit_maybe_nested(&args[2], nested(&args[2]))
    }

    fn visit_unary(&mut self, token: &str, operand: &Expr) -> Result<(), UnparseError> {
        self.buf.push_str(token);
        self.visit_maybe_nested(operand, is_complex_operator(operand))
    }

    fn visit_index(&mut self, args: &[Expr], open: &str) -> Result<(), UnparseError> {
        if args.len() != 2 {
            return Err(UnparseError::UnexpectedOperator(operators::INDEX.to_string()));
        }
        let nested = is_binary_or_ternary_operator(&args[0]);
        self.visit_maybe_nested(&args[0], nested)?;
        self.buf.push_str(open);
        self.visit(&args[1])?;
        self.buf.push(']');
        Ok(())
    }

    fn visit_opt_select(&mut self, args: &[Expr]) -> Result<(), UnparseError> {
        let field = match args.get(1).map(|e| &e.kind) {
            Some(ExprKind::Const(Constant::String(field))) => field.clone(),
            _ => {
                return Err(UnparseError::UnexpectedOperator(
                    operators::OPT_SELECT.to_string(),
                ))
            }
        };
        let nested = is_binary_or_ternary_operator(&args[0]);
        self.visit_maybe_nested(&args[0], nested)?;
        self.buf.push_str(".?");
        self.write_field(&field);
        Ok(())
    }

    fn visit_select(
        &mut self,
        operand: &Expr,
        field: &str,
        test_only: bool,
    ) -> Result<(), UnparseError> {
        if test_only {
            self.buf.push_str("has(");
        }
        let nested = !test_only && is_binary_or_ternary_operator(operand);
        self.visit_maybe_nested(operand, nested)?;
        self.buf.push('.');
        self.write_field(field);
        if test_only {
            self.buf.push(')');
        }
        Ok(())
    }

    fn visit_list(
        &mut self,
        elements: &[Expr],
        optional_indices: &[usize],
    ) -> Result<(), UnparseError> {
        self.buf.push('[');
        for (i, element) in elements.iter().enumerate() {
            if i > 0 {
                self.buf.push_str(", ");
            }
            if optional_indices.contains(&i) {
                self.buf.push('?');
            }
            self.visit(element)?;
        }
        self.buf.push(']');
        Ok(())
    }

    fn visit_map(&mut self, entries: &[crate::ast::MapEntry]) -> Result<(), UnparseError> {
        self.buf.push('{');
        for (i, entry) in entries.iter().enumerate() {
            if i > 0 {
                self.buf.push_str(", ");
            }
            if entry.optional {
                self.buf.push('?');
            }
            self.visit(&entry.key)?;
            self.buf.push_str(": ");
            self.visit(&entry.value)?;
        }
        self.buf.push('}');
        Ok(())
    }

    fn visit_struct(
        &mut self,
        type_name: &str,
        fields: &[crate::ast::StructEntry],
    ) -> Result<(), UnparseError> {
        self.buf.push_str(type_name);
        self.buf.push('{');
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                self.buf.push_str(", ");
            }
            if field.optional {
                self.buf.push('?');
            }
            self.write_field(&field.field);
            self.buf.push_str(": ");
            self.visit(&field.value)?;
        }
        self.buf.push('}');
        Ok(())
    }

    fn visit_maybe_nested(&mut self, expr: &Expr, nested: bool) -> Result<(), UnparseError> {
        if nested {
            self.buf.push('(');
        }
        self.visit(expr)?;
        if nested {
            self.buf.push(')');
        }
        Ok(())
    }

    fn visit_const(&mut self, c: &Constant) {
        match c {
            Constant::Null => self.buf.push_str("null"),
            Constant::Bool(b) => self.buf.push_str(if *b { "true" } else { "false" }),
            Constant::Int(i) => self.buf.push_str(&i.to_string()),
            Constant::UInt(u) => {
                self.buf.push_str(&u.to_string());
                self.buf.push('u');
            }
            Constant::Double(d) => {
                if d.is_finite() && d.fract() == 0.0 {
                    self.buf.push_str(&format!("{:.1}", d));
                } else {
                    self.buf.push_str(&d.to_string());
                }
            }
            Constant::String(s) => {
                self.buf.push('"');
                self.buf.push_str(&escape_string(s));
                self.buf.push('"');
            }
            Constant::Bytes(bytes) => {
                self.buf.push_str("b\"");
                for byte in bytes {
                    self.buf.push_str(&format!("\\{:03o}", byte));
                }
                self.buf.push('"');
            }
        }
    }

    // Field names that are not plain identifiers, or that collide with the
    // `in` keyword, are back-quoted.
    fn write_field(&mut self, field: &str) {
        if is_identifier(field) && field != "in" {
            self.buf.push_str(field);
        } else {
            self.buf.push('`');
            self.buf.push_str(field);
            self.buf.push('`');
        }
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

// A call with two or more operands; the only shape that can force parens.
fn is_complex_operator(expr: &Expr) -> bool {
    matches!(&expr.kind, ExprKind::Call { args, .. } if args.len() >= 2)
}

fn call_precedence(expr: &Expr) -> Option<u8> {
    match &expr.kind {
        ExprKind::Call { function, .. } => operators::precedence(function),
        _ => None,
    }
}

fn is_same_precedence(op: &str, expr: &Expr) -> bool {
    match (operators::precedence(op), call_precedence(expr)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

// True when the sub-expression binds looser than the surrounding operator.
fn is_complex_operator_with_respect_to(op: &str, expr: &Expr) -> bool {
    if !is_complex_operator(expr) {
        return false;
    }
    match (operators::precedence(op), call_precedence(expr)) {
        (Some(parent), Some(child)) => child < parent,
        _ => false,
    }
}

fn is_left_recursive(op: &str) -> bool {
    op != operators::LOGICAL_AND && op != operators::LOGICAL_OR
}

fn is_binary_or_ternary_operator(expr: &Expr) -> bool {
    if !is_complex_operator(expr) {
        return false;
    }
    let binary = match &expr.kind {
        ExprKind::Call { function, .. } => operators::find_reverse_binary(function).is_some(),
        _ => false,
    };
    binary || is_same_precedence(operators::CONDITIONAL, expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{MapEntry, StructEntry};
    use crate::operators as op;

    fn up(expr: &Expr) -> String {
        unparse(expr, &SourceInfo::new()).unwrap()
    }

    fn ident(name: &str) -> Expr {
        Expr::ident(1, name)
    }

    #[test]
    fn test_literals() {
        assert_eq!(up(&Expr::int(1, -3)), "-3");
        assert_eq!(up(&Expr::uint(1, 5)), "5u");
        assert_eq!(up(&Expr::double(1, 5.0)), "5.0");
        assert_eq!(up(&Expr::double(1, 1.5)), "1.5");
        assert_eq!(up(&Expr::bool(1, true)), "true");
        assert_eq!(up(&Expr::null(1)), "null");
        assert_eq!(up(&Expr::string(1, "a\"b\n")), r#""a\"b\n""#);
        assert_eq!(up(&Expr::bytes(1, vec![0u8, 255u8])), "b\"\\000\\377\"");
    }

    #[test]
    fn test_precedence_no_parens() {
        // a + b * c
        let e = Expr::call(
            1,
            op::ADD,
            vec![
                ident("a"),
                Expr::call(2, op::MULTIPLY, vec![ident("b"), ident("c")]),
            ],
        );
        assert_eq!(up(&e), "a + b * c");
    }

    #[test]
    fn test_precedence_left_parens() {
        // (a + b) * c
        let e = Expr::call(
            1,
            op::MULTIPLY,
            vec![
                Expr::call(2, op::ADD, vec![ident("a"), ident("b")]),
                ident("c"),
            ],
        );
        assert_eq!(up(&e), "(a + b) * c");
    }

    #[test]
    fn test_left_associative_right_parens() {
        // a - (b - c)
        let e = Expr::call(
            1,
            op::SUBTRACT,
            vec![
                ident("a"),
                Expr::call(2, op::SUBTRACT, vec![ident("b"), ident("c")]),
            ],
        );
        assert_eq!(up(&e), "a - (b - c)");

        // (a - b) - c needs no parens.
        let e = Expr::call(
            1,
            op::SUBTRACT,
            vec![
                Expr::call(2, op::SUBTRACT, vec![ident("a"), ident("b")]),
                ident("c"),
            ],
        );
        assert_eq!(up(&e), "a - b - c");
    }

    #[test]
    fn test_associative_logic_no_right_parens() {
        // a && (b && c) prints without parens.
        let e = Expr::call(
            1,
            op::LOGICAL_AND,
            vec![
                ident("a"),
                Expr::call(2, op::LOGICAL_AND, vec![ident("b"), ident("c")]),
            ],
        );
        assert_eq!(up(&e), "a && b && c");
    }

    #[test]
    fn test_and_or_mix() {
        let e = Expr::call(
            1,
            op::LOGICAL_OR,
            vec![
                Expr::call(2, op::LOGICAL_AND, vec![ident("a"), ident("b")]),
                ident("c"),
            ],
        );
        assert_eq!(up(&e), "a && b || c");

        let e = Expr::call(
            1,
            op::LOGICAL_AND,
            vec![
                Expr::call(2, op::LOGICAL_OR, vec![ident("a"), ident("b")]),
                ident("c"),
            ],
        );
        assert_eq!(up(&e), "(a || b) && c");
    }

    #[test]
    fn test_ternary() {
        let e = Expr::call(
            1,
            op::CONDITIONAL,
            vec![ident("a"), ident("b"), ident("c")],
        );
        assert_eq!(up(&e), "a ? b : c");

        // Binary operands of a conditional are parenthesized.
        let e = Expr::call(
            1,
            op::CONDITIONAL,
            vec![
                Expr::call(2, op::LESS, vec![ident("a"), ident("b")]),
                ident("x"),
                ident("y"),
            ],
        );
        assert_eq!(up(&e), "(a < b) ? x : y");
    }

    #[test]
    fn test_unary() {
        let e = Expr::call(1, op::LOGICAL_NOT, vec![ident("a")]);
        assert_eq!(up(&e), "!a");
        let e = Expr::call(
            1,
            op::NEGATE,
            vec![Expr::call(2, op::ADD, vec![ident("a"), ident("b")])],
        );
        assert_eq!(up(&e), "-(a + b)");
    }

    #[test]
    fn test_select_chain() {
        let e = Expr::select(3, Expr::select(2, ident("x"), "y"), "z");
        assert_eq!(up(&e), "x.y.z");
    }

    #[test]
    fn test_presence_test() {
        let e = Expr::presence_test(2, ident("a"), "b");
        assert_eq!(up(&e), "has(a.b)");
    }

    #[test]
    fn test_field_quoting() {
        assert_eq!(up(&Expr::select(2, ident("a"), "in")), "a.`in`");
        assert_eq!(up(&Expr::select(2, ident("a"), "odd-name")), "a.`odd-name`");
        assert_eq!(up(&Expr::select(2, ident("a"), "ok_name")), "a.ok_name");
    }

    #[test]
    fn test_index() {
        let e = Expr::call(1, op::INDEX, vec![ident("m"), Expr::string(2, "k")]);
        assert_eq!(up(&e), "m[\"k\"]");

        // A binary target is parenthesized.
        let e = Expr::call(
            1,
            op::INDEX,
            vec![
                Expr::call(2, op::ADD, vec![ident("a"), ident("b")]),
                Expr::int(3, 0),
            ],
        );
        assert_eq!(up(&e), "(a + b)[0]");
    }

    #[test]
    fn test_optional_syntax() {
        let e = Expr::call(1, op::OPT_INDEX, vec![ident("m"), Expr::string(2, "k")]);
        assert_eq!(up(&e), "m[?\"k\"]");

        let e = Expr::call(1, op::OPT_SELECT, vec![ident("a"), Expr::string(2, "b")]);
        assert_eq!(up(&e), "a.?b");

        let mut list = Expr::list(1, vec![ident("x")]);
        if let ExprKind::List {
            optional_indices, ..
        } = &mut list.kind
        {
            optional_indices.push(0);
        }
        assert_eq!(up(&list), "[?x]");
    }

    #[test]
    fn test_collections() {
        let e = Expr::list(1, vec![Expr::int(2, 1), Expr::int(3, 2)]);
        assert_eq!(up(&e), "[1, 2]");

        let e = Expr::map(
            1,
            vec![
                MapEntry {
                    id: 2,
                    key: Expr::string(3, "a"),
                    value: Expr::int(4, 1),
                    optional: false,
                },
                MapEntry {
                    id: 5,
                    key: Expr::string(6, "b"),
                    value: Expr::int(7, 2),
                    optional: true,
                },
            ],
        );
        assert_eq!(up(&e), "{\"a\": 1, ?\"b\": 2}");

        let e = Expr::struct_(
            1,
            "pkg.Msg",
            vec![StructEntry {
                id: 2,
                field: "f".into(),
                value: Expr::int(3, 1),
                optional: false,
            }],
        );
        assert_eq!(up(&e), "pkg.Msg{f: 1}");
    }

    #[test]
    fn test_calls() {
        let e = Expr::call(1, "size", vec![ident("x")]);
        assert_eq!(up(&e), "size(x)");

        let e = Expr::member_call(1, ident("s"), "contains", vec![Expr::string(2, "x")]);
        assert_eq!(up(&e), "s.contains(\"x\")");
    }

    #[test]
    fn test_plain_call_operand_needs_no_parens() {
        // A non-operator call with two arguments is not parenthesized even
        // though it has two operands.
        let e = Expr::call(
            1,
            op::ADD,
            vec![
                Expr::call(2, "max", vec![ident("a"), ident("b")]),
                ident("c"),
            ],
        );
        assert_eq!(up(&e), "max(a, b) + c");
    }

    #[test]
    fn test_macro_call_table() {
        let mut info = SourceInfo::new();
        info.add_macro_call(
            7,
            Expr::call(0, "has", vec![Expr::select(0, Expr::ident(0, "a"), "b")]),
        );
        // The node itself is some expanded form; the table supersedes it.
        let expanded = Expr::presence_test(7, Expr::ident(0, "a"), "b");
        assert_eq!(unparse(&expanded, &info).unwrap(), "has(a.b)");
    }

    #[test]
    fn test_comprehension_without_macro_is_unsupported() {
        let comp = crate::ast::Comprehension {
            iter_var: "x".into(),
            iter_range: Expr::list(2, vec![]),
            accu_var: "__result__".into(),
            accu_init: Expr::bool(3, true),
            loop_condition: Expr::bool(4, true),
            loop_step: Expr::bool(5, true),
            result: Expr::ident(6, "__result__"),
        };
        let e = Expr::comprehension(1, comp);
        assert!(matches!(
            unparse(&e, &SourceInfo::new()),
            Err(UnparseError::Unsupported(_))
        ));
    }

    #[test]
    fn test_wrapping_after_operator() {
        let opts = UnparserOptions::default()
            .with_wrap_on_column(10)
            .unwrap();
        let e = Expr::call(
            1,
            op::LOGICAL_AND,
            vec![ident("longident1"), ident("longident2")],
        );
        let out = unparse_with_options(&e, &SourceInfo::new(), &opts).unwrap();
        assert_eq!(out, "longident1 &&\nlongident2");
    }

    #[test]
    fn test_wrapping_before_operator() {
        let opts = UnparserOptions::default()
            .with_wrap_on_column(10)
            .unwrap()
            .with_wrap_after_column_limit(false);
        let e = Expr::call(
            1,
            op::LOGICAL_AND,
            vec![ident("longident1"), ident("longident2")],
        );
        let out = unparse_with_options(&e, &SourceInfo::new(), &opts).unwrap();
        assert_eq!(out, "longident1 \n&& longident2");
    }

    #[test]
    fn test_no_wrap_under_column() {
        let e = Expr::call(1, op::LOGICAL_AND, vec![ident("a"), ident("b")]);
        assert_eq!(up(&e), "a && b");
    }

    #[test]
    fn test_option_validation() {
        assert!(UnparserOptions::default().with_wrap_on_column(0).is_err());
        assert!(UnparserOptions::default()
            .with_operators_to_wrap_on(vec![op::LOGICAL_NOT.to_string()])
            .is_err());
        assert!(UnparserOptions::default()
            .with_operators_to_wrap_on(vec![op::CONDITIONAL.to_string()])
            .is_ok());
    }
}
