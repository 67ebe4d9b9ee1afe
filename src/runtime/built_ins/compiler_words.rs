use std::rc::Rc;

use crate::lang::code::{OP_COMPILE_COMMA, OP_LIT_INT, OP_LIT_UINT, OP_RET};
use crate::lang::tokenizing::{decode_literal, Literal};
use crate::runtime::data_structures::value::Value;
use crate::runtime::data_structures::word::WordHandler;
use crate::runtime::error::{bad_state, Result};
use crate::runtime::interpreter::Interpreter;

/// Compiles `value` as a literal into the code segment currently being built. Small integers
/// are encoded inline with `(lit-int)`/`(lit-uint)`; everything else (large integers, floats,
/// strings) gets an anonymous "pusher" word appended to the word table, and a single cell
/// referencing it is compiled instead. This is the sole mechanism by which large numbers,
/// floats and strings survive across the 16-bit code segment.
pub fn compile_value_literal(interp: &mut dyn Interpreter, value: Value) {
    if let Value::Int(v) = value {
        if (i16::MIN as i64..=i16::MAX as i64).contains(&v) {
            interp.emit(OP_LIT_INT);
            interp.emit(v as i16 as u16);
            return;
        }
        if (0..=u16::MAX as i64).contains(&v) {
            interp.emit(OP_LIT_UINT);
            interp.emit(v as u16);
            return;
        }
    }

    let index = create_pusher(interp, value);
    interp.emit(index);
}

/// Creates an anonymous word that, when run, pushes a clone of `value`. This is how the
/// compiler hands a `&mut dyn Interpreter`-shaped handler something to own without the word
/// table needing a dedicated `Word` constructor for literals.
fn create_pusher(interp: &mut dyn Interpreter, value: Value) -> u16 {
    let handler: WordHandler = Rc::new(move |interp: &mut dyn Interpreter| {
        interp.push(value.clone());
        Ok(())
    });
    interp.define_native("(pusher)", false, handler)
}

/// Entry point used once per session by `Vm::run`. Equivalent to calling the `[` word directly,
/// except it bypasses the dictionary lookup since there's no enclosing definition to return
/// control to. Runs the interpret loop to end of input.
pub fn enter_top_level(interp: &mut dyn Interpreter) -> Result<()> {
    if !interp.is_compiling() {
        return bad_state("run", "VM entered in an unexpected state");
    }
    interp.set_compiling(false);
    interpret_loop(interp)
}

/// `[` (immediate): switches into interpret mode by recursively invoking the outer interpreter.
/// Requires `compiling = true` to enter, which holds both at the very top level and whenever
/// `[` is used inside a word definition.
pub fn open_bracket(interp: &mut dyn Interpreter) -> Result<()> {
    if !interp.is_compiling() {
        return bad_state("[", "already interpreting");
    }
    interp.set_compiling(false);
    interpret_loop(interp)
}

/// `]`: sets `compiling = true`, which is the precondition `interpret_loop`'s caller is waiting
/// on, causing the recursive `interpret_loop` call that `[` started to return.
pub fn close_bracket(interp: &mut dyn Interpreter) -> Result<()> {
    if interp.is_compiling() {
        return bad_state("]", "not interpreting");
    }
    interp.set_compiling(true);
    Ok(())
}

/// `:`: require `compiling = false`, then flip to compiling and read the name of the new word.
pub fn colon(interp: &mut dyn Interpreter) -> Result<()> {
    if interp.is_compiling() {
        return bad_state(":", "already compiling");
    }
    interp.set_compiling(true);

    let name = interp
        .next_token()?
        .ok_or(())
        .or_else(|_| bad_state(":", "unexpected end of input reading the word's name"))?;

    interp.set_curname(name);
    interp.set_curdef(interp.codeseg().len());
    compile_loop(interp)
}

/// `;` (immediate): require `compiling = true`, emit the terminating `(ret)`, register the new
/// composite word, and flip back to interpreting.
pub fn semicolon(interp: &mut dyn Interpreter) -> Result<()> {
    if !interp.is_compiling() {
        return bad_state(";", "not compiling");
    }

    interp.emit(OP_RET);

    let start = interp.curdef();
    let name = interp.curname().to_string();
    interp.define_composite(&name, start, false);

    interp.set_compiling(false);
    Ok(())
}

/// `immediate`: flips the immediate flag on the most recently defined word.
pub fn make_immediate(interp: &mut dyn Interpreter) -> Result<()> {
    let count = interp.word_count();
    if count == 0 {
        return bad_state("immediate", "no word has been defined yet");
    }
    interp.set_immediate(count - 1);
    Ok(())
}

/// `literal` (immediate): pops a value at compile time and compiles it via
/// `compile_value_literal`. Used to splice a value computed inside a nested `[ ... ]` back into
/// the enclosing definition as a constant.
pub fn literal(interp: &mut dyn Interpreter) -> Result<()> {
    if !interp.is_compiling() {
        return bad_state("literal", "not compiling");
    }
    let value = interp.pop()?;
    compile_value_literal(interp, value);
    Ok(())
}

/// `postpone` (immediate): reads the next token at compile time. If it names an immediate word,
/// compiles a direct call to it, so it runs inside the *caller* of the word being compiled
/// rather than right now. If it names a non-immediate word, compiles the three-cell sequence
/// `(lit-uint) <idx> compile,` so that, when the enclosing word runs, it appends `<idx>` into
/// the **caller's caller**'s code — the classic two-level meta-compile.
pub fn postpone(interp: &mut dyn Interpreter) -> Result<()> {
    if !interp.is_compiling() {
        return bad_state("postpone", "not compiling");
    }

    let name = interp
        .next_token()?
        .ok_or(())
        .or_else(|_| bad_state("postpone", "unexpected end of input reading the word to postpone"))?;

    let index = interp
        .lookup(&name)
        .ok_or(())
        .or_else(|_| bad_state("postpone", format!("no such word: {}", name)))?;

    if interp.is_immediate(index) {
        interp.emit(index);
    } else {
        interp.emit(OP_LIT_UINT);
        interp.emit(index);
        interp.emit(OP_COMPILE_COMMA);
    }
    Ok(())
}

fn interpret_loop(interp: &mut dyn Interpreter) -> Result<()> {
    while !interp.is_compiling() {
        match interp.next_token()? {
            None => return Ok(()),
            Some(token) => interpret_token(interp, &token)?,
        }
    }
    Ok(())
}

fn interpret_token(interp: &mut dyn Interpreter, token: &str) -> Result<()> {
    if let Some(index) = interp.lookup(token) {
        return interp.execute_word_index(index);
    }

    push_decoded(interp, token);
    Ok(())
}

/// Pushes `token` decoded as a literal (int, float, or — if it decodes as neither — the raw
/// token text as a string literal, per the outer interpreter's "on failure the string itself is
/// pushed" rule).
fn push_decoded(interp: &mut dyn Interpreter, token: &str) {
    match decode_literal(token) {
        Some(Literal::Int(v)) => interp.push(Value::Int(v)),
        Some(Literal::Float(v)) => interp.push(Value::Float(v)),
        None => interp.push(Value::String(token.to_string())),
    }
}

fn compile_loop(interp: &mut dyn Interpreter) -> Result<()> {
    while interp.is_compiling() {
        match interp.next_token()? {
            None => return Ok(()),
            Some(token) => compile_token(interp, &token)?,
        }
    }
    Ok(())
}

fn compile_token(interp: &mut dyn Interpreter, token: &str) -> Result<()> {
    if let Some(index) = interp.lookup(token) {
        if interp.is_immediate(index) {
            return interp.execute_word_index(index);
        }
        interp.emit(index);
        return Ok(());
    }

    match decode_literal(token) {
        Some(Literal::Int(v)) => compile_value_literal(interp, Value::Int(v)),
        Some(Literal::Float(v)) => compile_value_literal(interp, Value::Float(v)),
        None => compile_value_literal(interp, Value::String(token.to_string())),
    }
    Ok(())
}

pub fn register_compiler_words(interp: &mut dyn Interpreter) {
    interp.define_native(":", false, Rc::new(colon));
    interp.define_native(";", true, Rc::new(semicolon));
    interp.define_native("[", true, Rc::new(open_bracket));
    interp.define_native("]", false, Rc::new(close_bracket));
    interp.define_native("immediate", false, Rc::new(make_immediate));
    interp.define_native("literal", true, Rc::new(literal));
    interp.define_native("postpone", true, Rc::new(postpone));
}
