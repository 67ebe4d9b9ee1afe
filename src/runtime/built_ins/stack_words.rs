use std::rc::Rc;

use crate::runtime::interpreter::Interpreter;
use crate::runtime::error::Result;

/// `dup` ( a -- a a )
fn dup(interp: &mut dyn Interpreter) -> Result<()> {
    let a = interp.pop()?;
    interp.push(a.clone());
    interp.push(a);
    Ok(())
}

/// `drop` ( a -- )
fn drop_word(interp: &mut dyn Interpreter) -> Result<()> {
    interp.pop()?;
    Ok(())
}

/// `swap` ( a b -- b a )
fn swap(interp: &mut dyn Interpreter) -> Result<()> {
    let b = interp.pop()?;
    let a = interp.pop()?;
    interp.push(b);
    interp.push(a);
    Ok(())
}

/// `over` ( a b -- a b a )
fn over(interp: &mut dyn Interpreter) -> Result<()> {
    let b = interp.pop()?;
    let a = interp.pop()?;
    interp.push(a.clone());
    interp.push(b);
    interp.push(a);
    Ok(())
}

/// `rot` ( a b c -- b c a )
fn rot(interp: &mut dyn Interpreter) -> Result<()> {
    let c = interp.pop()?;
    let b = interp.pop()?;
    let a = interp.pop()?;
    interp.push(b);
    interp.push(c);
    interp.push(a);
    Ok(())
}

/// `-rot` ( a b c -- c a b )
fn minus_rot(interp: &mut dyn Interpreter) -> Result<()> {
    let c = interp.pop()?;
    let b = interp.pop()?;
    let a = interp.pop()?;
    interp.push(c);
    interp.push(a);
    interp.push(b);
    Ok(())
}

/// `nip` ( a b -- b )
fn nip(interp: &mut dyn Interpreter) -> Result<()> {
    let b = interp.pop()?;
    interp.pop()?;
    interp.push(b);
    Ok(())
}

/// `tuck` ( a b -- b a b )
fn tuck(interp: &mut dyn Interpreter) -> Result<()> {
    let b = interp.pop()?;
    let a = interp.pop()?;
    interp.push(b.clone());
    interp.push(a);
    interp.push(b);
    Ok(())
}

pub fn register_stack_words(interp: &mut dyn Interpreter) {
    interp.define_native("dup", false, Rc::new(dup));
    interp.define_native("drop", false, Rc::new(drop_word));
    interp.define_native("swap", false, Rc::new(swap));
    interp.define_native("over", false, Rc::new(over));
    interp.define_native("rot", false, Rc::new(rot));
    interp.define_native("-rot", false, Rc::new(minus_rot));
    interp.define_native("nip", false, Rc::new(nip));
    interp.define_native("tuck", false, Rc::new(tuck));
}
