use std::io::Cursor;

use threadforth::runtime::built_ins;
use threadforth::runtime::data_structures::value::Value;
use threadforth::runtime::error::{ErrorKind, Result};
use threadforth::runtime::interpreter::vm::Vm;
use threadforth::runtime::interpreter::{CodeManagement, Interpreter, InterpreterStack, WordManagement};

/// A stripped-down description of an expected stack value, so test tables don't have to spell
/// out `Value::Int`/`Value::Float`/`Value::String` everywhere.
#[derive(Debug, Clone, PartialEq)]
pub enum Expect {
    Int(i64),
    Float(f64),
    Str(&'static str),
}

/// Builds a fresh VM with the whole built-in wordset registered, matching what `main` does
/// before reading its first token.
pub fn new_vm() -> Vm {
    let mut vm = Vm::new();
    built_ins::register_all(&mut vm);
    vm
}

/// Runs `source` to completion on a fresh VM and returns it for further inspection.
pub fn run(source: &str) -> Result<Vm> {
    let mut vm = new_vm();
    vm.set_source(Cursor::new(source.to_string()));
    vm.run()?;
    Ok(vm)
}

/// Drains the data stack bottom-to-top, so the result reads left-to-right the same way a
/// printed stack trace would, without needing a dedicated accessor on `Vm`.
pub fn drain_stack(vm: &mut Vm) -> Vec<Value> {
    let mut values = Vec::new();
    while vm.stack_len() > 0 {
        values.push(vm.pop().expect("stack_len said there was a value"));
    }
    values.reverse();
    values
}

/// Runs `source` and returns its final data stack, bottom-to-top.
pub fn run_and_collect(source: &str) -> Vec<Value> {
    let mut vm = run(source).unwrap_or_else(|err| panic!("unexpected error running {:?}: {}", source, err));
    drain_stack(&mut vm)
}

/// Runs `source` and asserts the final stack matches `expected`, compared value-by-value so
/// integers, floats, and strings are checked with their own semantics (floats by a tolerant
/// comparison, since the language makes no promise of an exact bit-for-bit float representation).
pub fn assert_stack(source: &str, expected: &[Expect]) {
    let actual = run_and_collect(source);
    assert_eq!(actual.len(), expected.len(), "stack depth mismatch for {:?}: got {:?}", source, actual);

    for (got, want) in actual.iter().zip(expected.iter()) {
        match (got, want) {
            (Value::Int(a), Expect::Int(b)) => assert_eq!(a, b, "for {:?}", source),
            (Value::Float(a), Expect::Float(b)) => assert!((a - b).abs() < 1e-9, "{} != {} for {:?}", a, b, source),
            (Value::String(a), Expect::Str(b)) => assert_eq!(a, b, "for {:?}", source),
            (a, b) => panic!("type mismatch for {:?}: got {:?}, wanted {:?}", source, a, b),
        }
    }
}

/// Runs `source` and asserts it fails with the given `ErrorKind`.
pub fn assert_error_kind(source: &str, kind: ErrorKind) {
    match run(source) {
        Ok(mut vm) => panic!("expected {:?} but {:?} succeeded with stack {:?}", kind, source, drain_stack(&mut vm)),
        Err(err) => assert_eq!(err.kind(), kind, "wrong error kind for {:?}: {}", source, err),
    }
}

#[allow(dead_code)]
pub fn word_count(vm: &Vm) -> u16 {
    vm.word_count()
}

#[allow(dead_code)]
pub fn codeseg_len(vm: &Vm) -> usize {
    vm.codeseg().len()
}
