//! Session-level invariants that need a running `Vm` (rather than a single function) to
//! observe: dictionary/codeseg stability, error recovery, case-insensitive lookup, literal
//! encoding boundaries, and branch-fixup arithmetic.

mod common;

use std::io::Cursor;

use common::{assert_stack, new_vm, Expect::*};
use test_case::test_case;
use threadforth::runtime::interpreter::{CodeManagement, InterpreterStack, WordManagement};

#[test]
fn a_phrase_that_defines_nothing_leaves_the_dictionary_and_codeseg_unchanged() {
    let mut vm = new_vm();
    let words_before = vm.word_count();
    let code_before = vm.codeseg().len();

    vm.set_source(Cursor::new("2 3 + dup swap drop"));
    vm.run().unwrap();

    assert_eq!(vm.word_count(), words_before);
    assert_eq!(vm.codeseg().len(), code_before);
}

#[test]
fn reset_state_after_an_error_leaves_both_stacks_empty_and_returns_to_interpreting() {
    let mut vm = new_vm();
    vm.set_source(Cursor::new("1 2 3 drop drop drop drop"));
    let err = vm.run().unwrap_err();
    assert_eq!(err.kind(), threadforth::runtime::error::ErrorKind::Underflow);

    vm.reset_state();
    assert_eq!(vm.stack_len(), 0);
    assert_eq!(vm.rstack_len(), 0);
    assert!(vm.is_compiling());
}

#[test]
fn dictionary_and_definitions_survive_an_error_and_reset() {
    let mut vm = new_vm();
    vm.set_source(Cursor::new(": double 2 * ; double"));
    let err = vm.run().unwrap_err();
    assert_eq!(err.kind(), threadforth::runtime::error::ErrorKind::Underflow);
    vm.reset_state();

    vm.set_source(Cursor::new("21 double"));
    vm.run().unwrap();
    assert_eq!(vm.pop().unwrap(), threadforth::runtime::data_structures::value::Value::Int(42));
}

#[test_case("DUP", "dup"; "all caps")]
#[test_case("Dup", "dup"; "mixed case")]
#[test_case("dUP", "dup"; "leading lower")]
fn case_insensitive_lookup_resolves_to_the_same_word(spelling: &str, canonical: &str) {
    let vm = new_vm();
    assert_eq!(vm.lookup(spelling), vm.lookup(canonical));
}

#[test_case(-32768; "minimum inline signed literal")]
#[test_case(32767; "maximum inline signed literal")]
#[test_case(32768; "minimum inline unsigned-only literal")]
#[test_case(65535; "maximum inline unsigned literal")]
#[test_case(-32769; "just below the inline range needs a pusher")]
#[test_case(65536; "just above the inline range needs a pusher")]
#[test_case(1_000_000; "large integer needs a pusher")]
fn compile_literal_round_trips_every_integer_in_the_compact_encoding_boundary(n: i64) {
    let source = format!(": pushit {} ; pushit", n);
    assert_stack(&source, &[Int(n)]);
}

#[test]
fn if_then_fixup_lands_exactly_on_the_cell_after_the_branch() {
    // A false condition must skip the consequent and land exactly on what follows `then`,
    // neither short (leaking into the consequent) nor long (eating the word's tail).
    assert_stack(": t1 1 if 42 then 7 ; t1", &[Int(42), Int(7)]);
    assert_stack(": t2 0 if 42 then 7 ; t2", &[Int(7)]);
}

#[test]
fn if_then_else_fixup_lands_exactly_on_the_cell_after_then() {
    // Same property with an `else` arm present: the `else` branch must itself jump clean over
    // the `then` arm rather than falling through into it.
    assert_stack(": t3 1 if 1 else 2 then 7 ; t3", &[Int(1), Int(7)]);
    assert_stack(": t4 0 if 1 else 2 then 7 ; t4", &[Int(2), Int(7)]);
}

#[test]
fn postpone_of_a_non_immediate_word_captures_its_index_into_the_callers_caller() {
    // `myadd` postpones `+` (not immediate) into *its own* body as `(lit-uint) <idx> compile,`.
    // That sequence only actually appends `+`'s index into a definition when it *runs* — and
    // since `myadd` is itself flagged immediate, it runs while `t` is being compiled, so the
    // index lands in `t`'s body, not `myadd`'s. `t`'s body ends up exactly `+`, nothing more.
    assert_stack(": myadd postpone + ; immediate : t 2 3 myadd ; t", &[Int(5)]);
}
