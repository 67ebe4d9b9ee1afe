use std::cmp::Ordering;
use std::rc::Rc;

use crate::runtime::data_structures::value::{self, Value};
use crate::runtime::error::Result;
use crate::runtime::interpreter::Interpreter;

/// Pops the top two values as `(next, top)` — `next` is beneath `top`, matching the order the
/// promotion tables in `value.rs` are written against (top operand is the one pushed last).
fn pop_pair(interp: &mut dyn Interpreter) -> Result<(Value, Value)> {
    let top = interp.pop()?;
    let next = interp.pop()?;
    Ok((next, top))
}

fn add(interp: &mut dyn Interpreter) -> Result<()> {
    let (next, top) = pop_pair(interp)?;
    interp.push(value::add(&next, &top)?);
    Ok(())
}

fn subtract(interp: &mut dyn Interpreter) -> Result<()> {
    let (next, top) = pop_pair(interp)?;
    interp.push(value::subtract(&next, &top)?);
    Ok(())
}

fn multiply(interp: &mut dyn Interpreter) -> Result<()> {
    let (next, top) = pop_pair(interp)?;
    interp.push(value::multiply(&next, &top)?);
    Ok(())
}

fn divide(interp: &mut dyn Interpreter) -> Result<()> {
    let (next, top) = pop_pair(interp)?;
    interp.push(value::divide(&next, &top)?);
    Ok(())
}

fn modulo(interp: &mut dyn Interpreter) -> Result<()> {
    let (next, top) = pop_pair(interp)?;
    interp.push(value::modulo(&next, &top)?);
    Ok(())
}

fn flag(result: bool) -> Value {
    Value::Int(if result { 1 } else { 0 })
}

fn make_comparison(word: &'static str, matches: fn(Ordering) -> bool) -> impl Fn(&mut dyn Interpreter) -> Result<()> {
    move |interp: &mut dyn Interpreter| {
        let (next, top) = pop_pair(interp)?;
        let ordering = value::compare(&next, &top, word)?;
        interp.push(flag(matches(ordering)));
        Ok(())
    }
}

/// `and`/`or`/`not` treat any non-zero `Int`/`Float` as true, matching `(bzr)`'s own notion of
/// "falsy". Boolean results are always `Int(1)`/`Int(0)`.
fn truthy(value: &Value, word: &str) -> Result<bool> {
    match value {
        Value::Int(v) => Ok(*v != 0),
        Value::Float(v) => Ok(*v != 0.0),
        other => crate::runtime::error::bad_argument(word, format!("expected a number, got {}", other.type_name())),
    }
}

fn and(interp: &mut dyn Interpreter) -> Result<()> {
    let (next, top) = pop_pair(interp)?;
    interp.push(flag(truthy(&next, "and")? && truthy(&top, "and")?));
    Ok(())
}

fn or(interp: &mut dyn Interpreter) -> Result<()> {
    let (next, top) = pop_pair(interp)?;
    interp.push(flag(truthy(&next, "or")? || truthy(&top, "or")?));
    Ok(())
}

fn not(interp: &mut dyn Interpreter) -> Result<()> {
    let top = interp.pop()?;
    interp.push(flag(!truthy(&top, "not")?));
    Ok(())
}

pub fn register_arithmetic_words(interp: &mut dyn Interpreter) {
    interp.define_native("+", false, Rc::new(add));
    interp.define_native("-", false, Rc::new(subtract));
    interp.define_native("*", false, Rc::new(multiply));
    interp.define_native("/", false, Rc::new(divide));
    interp.define_native("mod", false, Rc::new(modulo));

    interp.define_native("=", false, Rc::new(make_comparison("=", |o| o == Ordering::Equal)));
    interp.define_native("<>", false, Rc::new(make_comparison("<>", |o| o != Ordering::Equal)));
    interp.define_native("<", false, Rc::new(make_comparison("<", |o| o == Ordering::Less)));
    interp.define_native(">", false, Rc::new(make_comparison(">", |o| o == Ordering::Greater)));
    interp.define_native("<=", false, Rc::new(make_comparison("<=", |o| o != Ordering::Greater)));
    interp.define_native(">=", false, Rc::new(make_comparison(">=", |o| o != Ordering::Less)));

    interp.define_native("and", false, Rc::new(and));
    interp.define_native("or", false, Rc::new(or));
    interp.define_native("not", false, Rc::new(not));
}
