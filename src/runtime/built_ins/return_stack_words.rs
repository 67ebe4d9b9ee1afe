use std::rc::Rc;

use crate::runtime::error::Result;
use crate::runtime::interpreter::Interpreter;

/// `>r` ( a -- ) ( r: -- a ): moves a value from the data stack to the return stack.
fn to_r(interp: &mut dyn Interpreter) -> Result<()> {
    let value = interp.pop()?;
    interp.rpush(value);
    Ok(())
}

/// `r>` ( -- a ) ( r: a -- ): moves a value from the return stack back to the data stack.
fn r_from(interp: &mut dyn Interpreter) -> Result<()> {
    let value = interp.rpop()?;
    interp.push(value);
    Ok(())
}

/// `r@` ( -- a ) ( r: a -- a ): copies the top of the return stack onto the data stack.
fn r_fetch(interp: &mut dyn Interpreter) -> Result<()> {
    let value = interp.rpop()?;
    interp.rpush(value.clone());
    interp.push(value);
    Ok(())
}

/// `rdrop` ( -- ) ( r: a -- ): discards the top of the return stack.
fn rdrop(interp: &mut dyn Interpreter) -> Result<()> {
    interp.rpop()?;
    Ok(())
}

pub fn register_return_stack_words(interp: &mut dyn Interpreter) {
    interp.define_native(">r", false, Rc::new(to_r));
    interp.define_native("r>", false, Rc::new(r_from));
    interp.define_native("r@", false, Rc::new(r_fetch));
    interp.define_native("rdrop", false, Rc::new(rdrop));
}
