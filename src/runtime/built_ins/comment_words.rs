use std::rc::Rc;

use crate::runtime::data_structures::value::Value;
use crate::runtime::error::Result;
use crate::runtime::interpreter::Interpreter;

/// `(` (immediate): a paren comment runs to the next `)`, reusing `skip` to discard it.
fn paren_comment(interp: &mut dyn Interpreter) -> Result<()> {
    interp.push(Value::Int(')' as i64));
    interp.execute_word_named("skip")
}

/// `\` (immediate): a line comment runs to the next newline.
fn line_comment(interp: &mut dyn Interpreter) -> Result<()> {
    interp.push(Value::Int('\n' as i64));
    interp.execute_word_named("skip")
}

pub fn register_comment_words(interp: &mut dyn Interpreter) {
    interp.define_native("(", true, Rc::new(paren_comment));
    interp.define_native("\\", true, Rc::new(line_comment));
}
