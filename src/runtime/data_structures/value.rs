use std::fmt::{self, Display, Formatter};

use crate::runtime::error::{bad_argument, Result};

/// The dynamically-typed value carried on the data stack.  Every operation that needs to branch
/// on the kind of value on the stack matches on this enum directly, in the spirit of a classic
/// Forth's "everything is a cell" model but made explicit since Rust has no untyped cell.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    String(String),

    /// An index into the code segment, produced by `literal`/`'` and consumed by `execute`,
    /// `compile,`, and friends.
    CodeAddress(usize),
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "{}", v),
            Value::CodeAddress(v) => write!(f, "@{}", v),
        }
    }
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::CodeAddress(_) => "code-address",
        }
    }

    /// Narrows to an integer, or a bad-argument error naming `word` as the offender.
    pub fn as_int(&self, word: &str) -> Result<i64> {
        match self {
            Value::Int(v) => Ok(*v),
            other => bad_argument(word, format!("expected an integer, got {}", other.type_name())),
        }
    }
}

/// `-` promotion table: same numeric promotion as `add`, no string case (subtraction is not
/// defined on strings).
pub fn subtract(next: &Value, top: &Value) -> Result<Value> {
    match (next, top) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a - b)),
        (Value::Int(a), Value::Float(b)) => Ok(Value::Float(*a as f64 - b)),
        (Value::Float(a), Value::Int(b)) => Ok(Value::Float(a - *b as f64)),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a - b)),
        _ => bad_argument("-", format!("can't subtract {} from {}", top.type_name(), next.type_name())),
    }
}

/// `/` promotion table: integer division truncates; either operand a float promotes to float.
pub fn divide(next: &Value, top: &Value) -> Result<Value> {
    match (next, top) {
        (Value::Int(_), Value::Int(0)) => bad_argument("/", "division by zero"),
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a / b)),
        (Value::Int(a), Value::Float(b)) => Ok(Value::Float(*a as f64 / b)),
        (Value::Float(a), Value::Int(b)) => Ok(Value::Float(a / *b as f64)),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a / b)),
        _ => bad_argument("/", format!("can't divide {} by {}", next.type_name(), top.type_name())),
    }
}

/// `mod`: integer remainder only.
pub fn modulo(next: &Value, top: &Value) -> Result<Value> {
    match (next, top) {
        (Value::Int(_), Value::Int(0)) => bad_argument("mod", "division by zero"),
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a % b)),
        _ => bad_argument("mod", format!("can't compute {} mod {}", next.type_name(), top.type_name())),
    }
}

/// Ordering used by `< > <= >= = <>`. Numbers compare by value (mixed int/float promotes to
/// float); strings compare lexicographically; anything else is a bad argument.
pub fn compare(next: &Value, top: &Value, word: &str) -> Result<std::cmp::Ordering> {
    match (next, top) {
        (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
        (Value::Int(a), Value::Float(b)) => (*a as f64)
            .partial_cmp(b)
            .ok_or(())
            .or_else(|_| bad_argument(word, "unorderable float (NaN)")),
        (Value::Float(a), Value::Int(b)) => a
            .partial_cmp(&(*b as f64))
            .ok_or(())
            .or_else(|_| bad_argument(word, "unorderable float (NaN)")),
        (Value::Float(a), Value::Float(b)) => a
            .partial_cmp(b)
            .ok_or(())
            .or_else(|_| bad_argument(word, "unorderable float (NaN)")),
        (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
        _ => bad_argument(word, format!("can't compare {} and {}", next.type_name(), top.type_name())),
    }
}

/// Implements the `+` promotion table: int+int->int, (int|float)+(int|float) with either side
/// float promotes the whole thing to float, string+string concatenates as `b ++ a` (next then
/// top, matching the order the two operands were pushed), everything else is a bad argument.
///
/// `top` is the value that was on top of the stack (pushed last); `next` is the value beneath
/// it.  The result replaces both.
pub fn add(next: &Value, top: &Value) -> Result<Value> {
    match (next, top) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a + b)),
        (Value::Int(a), Value::Float(b)) => Ok(Value::Float(*a as f64 + b)),
        (Value::Float(a), Value::Int(b)) => Ok(Value::Float(a + *b as f64)),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a + b)),
        (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
        _ => bad_argument("+", format!("can't add {} and {}", next.type_name(), top.type_name())),
    }
}

/// Implements the `*` promotion table: int*int->int, (int|float)*(int|float) with either side
/// float promotes to float, int*string or string*int repeats the string, everything else is a
/// bad argument.
pub fn multiply(next: &Value, top: &Value) -> Result<Value> {
    match (next, top) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a * b)),
        (Value::Int(a), Value::Float(b)) => Ok(Value::Float(*a as f64 * b)),
        (Value::Float(a), Value::Int(b)) => Ok(Value::Float(a * *b as f64)),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a * b)),
        (Value::String(a), Value::Int(b)) => Ok(Value::String(repeat(a, *b))),
        (Value::Int(a), Value::String(b)) => Ok(Value::String(repeat(b, *a))),
        _ => bad_argument("*", format!("can't multiply {} and {}", next.type_name(), top.type_name())),
    }
}

fn repeat(s: &str, count: i64) -> String {
    if count <= 0 {
        String::new()
    } else {
        s.repeat(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adds_numbers_with_promotion() {
        assert_eq!(add(&Value::Int(2), &Value::Int(3)).unwrap(), Value::Int(5));
        assert_eq!(add(&Value::Int(2), &Value::Float(3.1)).unwrap(), Value::Float(5.1));
        assert_eq!(add(&Value::Float(2.0), &Value::Int(3)).unwrap(), Value::Float(5.0));
    }

    #[test]
    fn concatenates_strings_in_stack_order() {
        assert_eq!(
            add(&Value::String("foo".into()), &Value::String("bar".into())).unwrap(),
            Value::String("foobar".into())
        );
    }

    #[test]
    fn multiplies_strings_by_repetition() {
        assert_eq!(multiply(&Value::String("ab".into()), &Value::Int(3)).unwrap(), Value::String("ababab".into()));
        assert_eq!(multiply(&Value::Int(2), &Value::String("xy".into())).unwrap(), Value::String("xyxy".into()));
    }

    #[test]
    fn rejects_bad_combinations() {
        assert!(add(&Value::Int(1), &Value::String("x".into())).is_err());
        assert!(multiply(&Value::String("x".into()), &Value::String("y".into())).is_err());
    }
}
