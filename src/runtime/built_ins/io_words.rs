use std::rc::Rc;

use crate::runtime::built_ins::compiler_words::compile_value_literal;
use crate::runtime::data_structures::value::Value;
use crate::runtime::error::{bad_argument, Result};
use crate::runtime::interpreter::Interpreter;

/// Resolves a `read`/`skip` delimiter argument: either an integer Unicode scalar value, or a
/// one-character string.
fn delimiter_char(value: Value, word: &str) -> Result<char> {
    match value {
        Value::Int(v) => char::from_u32(v as u32).ok_or(()).or_else(|_| bad_argument(word, "not a valid Unicode scalar value")),
        Value::String(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => bad_argument(word, "delimiter must be a single character"),
            }
        }
        other => bad_argument(word, format!("expected an int or one-character string, got {}", other.type_name())),
    }
}

/// `read` ( delim -- str ): reads up to and including `delim` (any whitespace if `delim` is a
/// space), pushing what was read (without the delimiter). EOF before the delimiter is not an
/// error.
fn read(interp: &mut dyn Interpreter) -> Result<()> {
    let delim_value = interp.pop()?;
    let delim = delimiter_char(delim_value, "read")?;
    let text = interp.read_delimited(delim)?;
    interp.push(Value::String(text));
    Ok(())
}

/// `skip` ( delim -- ): as `read`, but discards what was read.
fn skip(interp: &mut dyn Interpreter) -> Result<()> {
    read(interp)?;
    interp.pop()?;
    Ok(())
}

/// `"` (immediate): reads to the next `"`, then either pushes the string (interpreting) or
/// compiles it as a literal (compiling).
fn open_quote(interp: &mut dyn Interpreter) -> Result<()> {
    let text = interp.read_delimited('"')?;
    if interp.is_compiling() {
        compile_value_literal(interp, Value::String(text));
    } else {
        interp.push(Value::String(text));
    }
    Ok(())
}

/// `chr` ( n -- str ): converts an integer Unicode scalar value to a one-character string.
fn chr(interp: &mut dyn Interpreter) -> Result<()> {
    let n = interp.pop()?.as_int("chr")?;
    let c = u32::try_from(n)
        .ok()
        .and_then(char::from_u32)
        .ok_or(())
        .or_else(|_| bad_argument("chr", "not a valid Unicode scalar value"))?;
    interp.push(Value::String(c.to_string()));
    Ok(())
}

/// `ord` ( str -- n ): the inverse of `chr`; the string must be exactly one character.
fn ord(interp: &mut dyn Interpreter) -> Result<()> {
    let value = interp.pop()?;
    let s = match value {
        Value::String(s) => s,
        other => return bad_argument("ord", format!("expected a string, got {}", other.type_name())),
    };
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => {
            interp.push(Value::Int(c as i64));
            Ok(())
        }
        _ => bad_argument("ord", "expected a one-character string"),
    }
}

/// `.` ( a -- ): pops and prints with a trailing space.
fn print_top(interp: &mut dyn Interpreter) -> Result<()> {
    let value = interp.pop()?;
    interp.write_out(&format!("{} ", value))
}

/// `type` ( a -- ): pops and prints with no trailing space.
fn print_str(interp: &mut dyn Interpreter) -> Result<()> {
    let value = interp.pop()?;
    interp.write_out(&format!("{}", value))
}

/// `cr` ( -- ): prints a newline.
fn print_cr(interp: &mut dyn Interpreter) -> Result<()> {
    interp.write_out("\n")
}

/// `.s` ( -- ): prints the whole data stack, one entry per line, numbered from the top, without
/// removing anything.
fn print_stack(interp: &mut dyn Interpreter) -> Result<()> {
    let depth = interp.stack_len();
    let mut values = Vec::with_capacity(depth);
    for _ in 0..depth {
        values.push(interp.pop()?);
    }
    for (i, value) in values.iter().rev().enumerate() {
        interp.write_out(&format!("{:2}: {}\n", depth - i, value))?;
    }
    for value in values.into_iter().rev() {
        interp.push(value);
    }
    Ok(())
}

pub fn register_io_words(interp: &mut dyn Interpreter) {
    interp.define_native("read", false, Rc::new(read));
    interp.define_native("skip", false, Rc::new(skip));
    interp.define_native("\"", true, Rc::new(open_quote));
    interp.define_native("chr", false, Rc::new(chr));
    interp.define_native("ord", false, Rc::new(ord));
    interp.define_native(".", false, Rc::new(print_top));
    interp.define_native("type", false, Rc::new(print_str));
    interp.define_native("cr", false, Rc::new(print_cr));
    interp.define_native(".s", false, Rc::new(print_stack));
}
