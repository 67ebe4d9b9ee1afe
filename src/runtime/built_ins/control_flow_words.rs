use std::rc::Rc;

use log::debug;

use crate::lang::code::OP_BRANCH;
use crate::runtime::built_ins::compiler_words::compile_value_literal;
use crate::runtime::data_structures::value::Value;
use crate::runtime::error::{bad_state, Result};
use crate::runtime::interpreter::Interpreter;

/// Pops a fixup operand index left on the stack by `if`/`else`/`do`, or a bad-state error
/// naming `word` if the top of the stack isn't one.
fn pop_fixup(interp: &mut dyn Interpreter, word: &str) -> Result<usize> {
    match interp.pop()? {
        Value::CodeAddress(index) => Ok(index),
        other => bad_state(word, format!("expected a fixup address on the stack, found a {}", other.type_name())),
    }
}

/// `if` (immediate): emits `(bzr) <ffff>` and pushes the placeholder's operand index.
fn if_word(interp: &mut dyn Interpreter) -> Result<()> {
    interp.emit(crate::lang::code::OP_BZR);
    let operand = interp.emit(0xFFFF);
    interp.push(Value::CodeAddress(operand));
    Ok(())
}

/// `then` (immediate): pops the fixup `f` left by `if` or `else`, and patches cell `f` with the
/// forward distance `len(codeseg) - f`.
fn then_word(interp: &mut dyn Interpreter) -> Result<()> {
    let f = pop_fixup(interp, "then")?;
    let distance = interp.codeseg().len() - f;
    interp.patch(f, distance as u16);
    debug!("then: patched fixup at {} with distance {}", f, distance);
    Ok(())
}

/// `else` (immediate): emits `(branch) <ffff>` to jump past the else-branch once the then-branch
/// has run, immediately patches the `if`'s fixup to land here, and pushes its own fixup for the
/// upcoming `then`.
fn else_word(interp: &mut dyn Interpreter) -> Result<()> {
    interp.emit(OP_BRANCH);
    let operand = interp.emit(0xFFFF);
    then_word(interp)?;
    interp.push(Value::CodeAddress(operand));
    Ok(())
}

/// `recur` (immediate): emits `(branch) (curdef - len(codeseg) - 1)`, i.e. jump back to the
/// start of the definition currently being compiled.
fn recur(interp: &mut dyn Interpreter) -> Result<()> {
    let p = interp.codeseg().len();
    let distance = interp.curdef() as i64 - p as i64 - 1;
    interp.emit(OP_BRANCH);
    interp.emit(distance as i16 as u16);
    Ok(())
}

/// `(setup-do)`: pops `limit start` off the data stack (start on top) and pushes `start`
/// (index), `limit`, `direction` onto the return stack, in that order — so that `direction`
/// ends up topmost, `limit` beneath it, and `index` third from the top, matching `i`/`j`'s
/// "third-from-top"/"sixth-from-top" convention.
fn setup_do(interp: &mut dyn Interpreter) -> Result<()> {
    let start = interp.pop()?.as_int("do")?;
    let limit = interp.pop()?.as_int("do")?;

    let direction = if limit > start {
        1
    } else if limit < start {
        -1
    } else {
        0
    };

    interp.rpush(Value::Int(start));
    interp.rpush(Value::Int(limit));
    interp.rpush(Value::Int(direction));
    Ok(())
}

/// `(test-do)`: reads its own operand cell (the way `(bzr)` does) and decides, from the
/// direction/limit/index triple on the return stack, whether to branch past the loop body or
/// fall through into it.
fn test_do(interp: &mut dyn Interpreter) -> Result<()> {
    let direction = interp.rpop()?;
    let limit = interp.rpop()?;
    let index = interp.rpop()?;

    let direction_i = direction.as_int("do")?;
    let limit_i = limit.as_int("do")?;
    let index_i = index.as_int("do")?;

    interp.rpush(index);
    interp.rpush(limit);
    interp.rpush(direction);

    let finished = match direction_i {
        0 => true,
        1 => index_i >= limit_i,
        -1 => index_i <= limit_i,
        _ => return bad_state("do", "corrupt loop direction"),
    };

    let p = interp.ip();
    if finished {
        let offset = interp.cell_at(p + 1) as i16 as i64;
        let target = p as i64 + offset;
        if target < 0 {
            return bad_state("do", "branch target out of range");
        }
        interp.set_ip(target as usize);
    } else {
        interp.set_ip(p + 1);
    }
    Ok(())
}

/// `(perf-loop-plus)`: pops a step value off the data stack and adds it, in place, to the index
/// cell of the innermost do-loop's return-stack triple.
fn perf_loop_plus(interp: &mut dyn Interpreter) -> Result<()> {
    let step = interp.pop()?.as_int("loop")?;

    let direction = interp.rpop()?;
    let limit = interp.rpop()?;
    let index = interp.rpop()?.as_int("loop")?;

    interp.rpush(Value::Int(index + step));
    interp.rpush(limit);
    interp.rpush(direction);
    Ok(())
}

/// `i`: peeks the innermost loop's current index without disturbing the triple.
fn loop_index(interp: &mut dyn Interpreter) -> Result<()> {
    let direction = interp.rpop()?;
    let limit = interp.rpop()?;
    let index = interp.rpop()?;

    interp.rpush(index.clone());
    interp.rpush(limit);
    interp.rpush(direction);
    interp.push(index);
    Ok(())
}

/// `j`: peeks the enclosing loop's current index, reaching past the innermost loop's triple.
fn loop_index_outer(interp: &mut dyn Interpreter) -> Result<()> {
    let d1 = interp.rpop()?;
    let l1 = interp.rpop()?;
    let i1 = interp.rpop()?;
    let d2 = interp.rpop()?;
    let l2 = interp.rpop()?;
    let i2 = interp.rpop()?;

    interp.rpush(i2.clone());
    interp.rpush(l2);
    interp.rpush(d2);
    interp.rpush(i1);
    interp.rpush(l1);
    interp.rpush(d1);
    interp.push(i2);
    Ok(())
}

/// `do` (immediate): emits `(setup-do) (test-do) <ffff>` and pushes the test's fixup operand
/// index, to be patched by the matching `loop`/`+loop`.
fn do_word(interp: &mut dyn Interpreter) -> Result<()> {
    let setup_index = lookup_or_bad_state(interp, "(setup-do)", "do")?;
    let test_index = lookup_or_bad_state(interp, "(test-do)", "do")?;

    interp.emit(setup_index);
    interp.emit(test_index);
    let operand = interp.emit(0xFFFF);
    interp.push(Value::CodeAddress(operand));
    Ok(())
}

fn lookup_or_bad_state(interp: &mut dyn Interpreter, name: &str, word: &str) -> Result<u16> {
    interp
        .lookup(name)
        .ok_or(())
        .or_else(|_| bad_state(word, format!("{} is not defined", name)))
}

/// Shared close for `loop` and `+loop`. `loop` fabricates a default step of `+1` by compiling a
/// literal before `(perf-loop-plus)`; `+loop` leaves that to the user's own code (whatever value
/// is on top of the data stack when the closing sequence runs is consumed as the step).
fn close_do(interp: &mut dyn Interpreter, word: &str, user_supplied_step: bool) -> Result<()> {
    let f = pop_fixup(interp, word)?;
    let test_pos = f - 1;

    if !user_supplied_step {
        compile_value_literal(interp, Value::Int(1));
    }

    let perf_index = lookup_or_bad_state(interp, "(perf-loop-plus)", word)?;
    interp.emit(perf_index);

    let branch_pos = interp.codeseg().len();
    let distance = test_pos as i64 - branch_pos as i64 - 1;
    interp.emit(OP_BRANCH);
    interp.emit(distance as i16 as u16);

    // The loop-exit fixup must land here, on the first `rdrop`, so that exiting the loop falls
    // through all three `rdrop`s rather than jumping past them and leaving the direction/limit/
    // index triple stranded on the return stack underneath an enclosing loop's own triple.
    let cleanup_start = interp.codeseg().len();

    let rdrop_index = lookup_or_bad_state(interp, "rdrop", word)?;
    interp.emit(rdrop_index);
    interp.emit(rdrop_index);
    interp.emit(rdrop_index);

    interp.patch(f, (cleanup_start - f) as u16);
    debug!("{}: patched loop-exit fixup at {} with distance {}", word, f, cleanup_start - f);
    Ok(())
}

fn loop_word(interp: &mut dyn Interpreter) -> Result<()> {
    close_do(interp, "loop", false)
}

fn plus_loop_word(interp: &mut dyn Interpreter) -> Result<()> {
    close_do(interp, "+loop", true)
}

pub fn register_control_flow_words(interp: &mut dyn Interpreter) {
    interp.define_native("if", true, Rc::new(if_word));
    interp.define_native("then", true, Rc::new(then_word));
    interp.define_native("else", true, Rc::new(else_word));
    interp.define_native("recur", true, Rc::new(recur));

    interp.define_native("(setup-do)", false, Rc::new(setup_do));
    interp.define_native("(test-do)", false, Rc::new(test_do));
    interp.define_native("(perf-loop-plus)", false, Rc::new(perf_loop_plus));
    interp.define_native("do", true, Rc::new(do_word));
    interp.define_native("loop", true, Rc::new(loop_word));
    interp.define_native("+loop", true, Rc::new(plus_loop_word));
    interp.define_native("i", false, Rc::new(loop_index));
    interp.define_native("j", false, Rc::new(loop_index_outer));
}
