//! Canonical operator names and the operator table.
//!
//! Operators are dispatched as ordinary functions under mangled names
//! (`_+_`, `!_`, `_?_:_`, ...). This module maps between source tokens and
//! canonical names and records precedence and arity for the unparser.

/// Ternary conditional `_ ? _ : _`.
pub const CONDITIONAL: &str = "_?_:_";
/// Logical or `_ || _`.
pub const LOGICAL_OR: &str = "_||_";
/// Logical and `_ && _`.
pub const LOGICAL_AND: &str = "_&&_";
/// Logical not `!_`.
pub const LOGICAL_NOT: &str = "!_";
/// Comprehension loop-condition guard; true unless the argument is `false`.
pub const NOT_STRICTLY_FALSE: &str = "@not_strictly_false";
/// Equality `_ == _`.
pub const EQUALS: &str = "_==_";
/// Inequality `_ != _`.
pub const NOT_EQUALS: &str = "_!=_";
/// Less-than `_ < _`.
pub const LESS: &str = "_<_";
/// Less-or-equal `_ <= _`.
pub const LESS_EQUALS: &str = "_<=_";
/// Greater-than `_ > _`.
pub const GREATER: &str = "_>_";
/// Greater-or-equal `_ >= _`.
pub const GREATER_EQUALS: &str = "_>=_";
/// Membership `_ in _`.
pub const IN: &str = "@in";
/// Addition `_ + _`.
pub const ADD: &str = "_+_";
/// Subtraction `_ - _`.
pub const SUBTRACT: &str = "_-_";
/// Multiplication `_ * _`.
pub const MULTIPLY: &str = "_*_";
/// Division `_ / _`.
pub const DIVIDE: &str = "_/_";
/// Modulus `_ % _`.
pub const MODULO: &str = "_%_";
/// Arithmetic negation `-_`.
pub const NEGATE: &str = "-_";
/// Indexed access `_[_]`.
pub const INDEX: &str = "_[_]";
/// Optional indexed access `_[?_]`.
pub const OPT_INDEX: &str = "_[?_]";
/// Optional field selection `_?._`.
pub const OPT_SELECT: &str = "_?._";

/// Names parsed as macros rather than runtime functions.
pub const MACROS: [&str; 6] = ["has", "all", "exists", "exists_one", "map", "filter"];

/// Canonical name for a binary source token.
pub fn find(text: &str) -> Option<&'static str> {
    match text {
        "+" => Some(ADD),
        "-" => Some(SUBTRACT),
        "*" => Some(MULTIPLY),
        "/" => Some(DIVIDE),
        "%" => Some(MODULO),
        "==" => Some(EQUALS),
        "!=" => Some(NOT_EQUALS),
        "<" => Some(LESS),
        "<=" => Some(LESS_EQUALS),
        ">" => Some(GREATER),
        ">=" => Some(GREATER_EQUALS),
        "&&" => Some(LOGICAL_AND),
        "||" => Some(LOGICAL_OR),
        "in" => Some(IN),
        _ => None,
    }
}

/// Canonical name for a unary source token.
pub fn find_unary(text: &str) -> Option<&'static str> {
    match text {
        "!" => Some(LOGICAL_NOT),
        "-" => Some(NEGATE),
        _ => None,
    }
}

/// Source token for a canonical operator name, when one exists.
pub fn display_name(op: &str) -> Option<&'static str> {
    match op {
        ADD => Some("+"),
        SUBTRACT => Some("-"),
        MULTIPLY => Some("*"),
        DIVIDE => Some("/"),
        MODULO => Some("%"),
        EQUALS => Some("=="),
        NOT_EQUALS => Some("!="),
        LESS => Some("<"),
        LESS_EQUALS => Some("<="),
        GREATER => Some(">"),
        GREATER_EQUALS => Some(">="),
        LOGICAL_AND => Some("&&"),
        LOGICAL_OR => Some("||"),
        IN => Some("in"),
        LOGICAL_NOT => Some("!"),
        NEGATE => Some("-"),
        _ => None,
    }
}

/// Source token for a canonical name that displays as a binary operator.
pub fn find_reverse_binary(op: &str) -> Option<&'static str> {
    match op {
        LOGICAL_NOT | NEGATE => None,
        _ => display_name(op),
    }
}

/// Binding strength of an operator; lower binds looser. `None` for names
/// that are not operators.
pub fn precedence(op: &str) -> Option<u8> {
    match op {
        CONDITIONAL => Some(0),
        LOGICAL_OR => Some(1),
        LOGICAL_AND => Some(2),
        EQUALS | NOT_EQUALS | LESS | LESS_EQUALS | GREATER | GREATER_EQUALS | IN => Some(3),
        ADD | SUBTRACT => Some(4),
        MULTIPLY | DIVIDE | MODULO => Some(5),
        LOGICAL_NOT | NEGATE | NOT_STRICTLY_FALSE => Some(6),
        INDEX | OPT_INDEX | OPT_SELECT => Some(7),
        _ => None,
    }
}

/// Number of operands an operator takes.
pub fn arity(op: &str) -> Option<usize> {
    match op {
        CONDITIONAL => Some(3),
        LOGICAL_NOT | NEGATE | NOT_STRICTLY_FALSE => Some(1),
        _ if find_reverse_binary(op).is_some() || matches!(op, INDEX | OPT_INDEX | OPT_SELECT) => {
            Some(2)
        }
        _ => None,
    }
}

/// Whether a name is reserved for macro expansion.
pub fn is_macro(name: &str) -> bool {
    MACROS.contains(&name)
}

/// Whether a canonical name denotes an operator.
pub fn is_operator(op: &str) -> bool {
    precedence(op).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_roundtrip() {
        for token in ["+", "-", "*", "/", "%", "==", "!=", "<", "<=", ">", ">=", "&&", "||"] {
            let op = find(token).unwrap();
            assert_eq!(display_name(op), Some(token));
        }
        assert_eq!(find("in"), Some(IN));
        assert_eq!(find("?"), None);
    }

    #[test]
    fn test_find_unary() {
        assert_eq!(find_unary("!"), Some(LOGICAL_NOT));
        assert_eq!(find_unary("-"), Some(NEGATE));
        assert_eq!(find_unary("+"), None);
    }

    #[test]
    fn test_reverse_binary_excludes_unary() {
        assert_eq!(find_reverse_binary(ADD), Some("+"));
        assert_eq!(find_reverse_binary(IN), Some("in"));
        assert_eq!(find_reverse_binary(LOGICAL_NOT), None);
        assert_eq!(find_reverse_binary(NEGATE), None);
    }

    #[test]
    fn test_precedence_ordering() {
        let cond = precedence(CONDITIONAL).unwrap();
        let or = precedence(LOGICAL_OR).unwrap();
        let and = precedence(LOGICAL_AND).unwrap();
        let rel = precedence(EQUALS).unwrap();
        let add = precedence(ADD).unwrap();
        let mul = precedence(MULTIPLY).unwrap();
        let unary = precedence(NEGATE).unwrap();
        let index = precedence(INDEX).unwrap();
        assert!(cond < or && or < and && and < rel && rel < add);
        assert!(add < mul && mul < unary && unary < index);
        assert_eq!(precedence(EQUALS), precedence(IN));
        assert_eq!(precedence("size"), None);
    }

    #[test]
    fn test_arity() {
        assert_eq!(arity(CONDITIONAL), Some(3));
        assert_eq!(arity(ADD), Some(2));
        assert_eq!(arity(INDEX), Some(2));
        assert_eq!(arity(LOGICAL_NOT), Some(1));
        assert_eq!(arity("size"), None);
    }

    #[test]
    fn test_macros() {
        assert!(is_macro("has"));
        assert!(is_macro("exists_one"));
        assert!(!is_macro("size"));
    }
}
