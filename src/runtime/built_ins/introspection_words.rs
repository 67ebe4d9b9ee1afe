use std::rc::Rc;

use log::debug;

use crate::lang::code;
use crate::runtime::error::Result;
use crate::runtime::interpreter::Interpreter;

/// `debug.` ( -- ): prints a disassembly of the whole code segment, resolving cells back to word
/// names where possible.
fn debug_dot(interp: &mut dyn Interpreter) -> Result<()> {
    let text = code::disassemble(interp.codeseg(), |cell| interp.name_of(cell));
    interp.write_out(&text)
}

/// `mark` ( -- ): records the current word-table length as the rollback point for a later
/// `forget`.
fn mark(interp: &mut dyn Interpreter) -> Result<()> {
    interp.mark();
    debug!("mark set at word table length {}", interp.word_count());
    Ok(())
}

/// `forget` ( -- ): rolls the dictionary and word table back to the last `mark`. Code already
/// emitted for definitions made since the mark is left in place, dead but harmless, since
/// forgetting only removes the ability to look those words up by name.
fn forget(interp: &mut dyn Interpreter) -> Result<()> {
    let before = interp.word_count();
    interp.forget()?;
    debug!("forget: word table {} -> {}", before, interp.word_count());
    Ok(())
}

pub fn register_introspection_words(interp: &mut dyn Interpreter) {
    interp.define_native("debug.", false, Rc::new(debug_dot));
    interp.define_native("mark", false, Rc::new(mark));
    interp.define_native("forget", false, Rc::new(forget));
}
