//! Boundary conditions: underflow, bad-state, and bad-argument errors at the edges of the
//! language's compiler and runtime.

mod common;

use common::assert_error_kind;
use test_case::test_case;
use threadforth::runtime::error::ErrorKind;

#[test_case("drop drop", ErrorKind::Underflow; "drop on empty stack underflows")]
#[test_case("1 over", ErrorKind::Underflow; "over with one element underflows")]
#[test_case("swap", ErrorKind::Underflow; "swap with no elements underflows")]
#[test_case("r> ", ErrorKind::Underflow; "r> on empty return stack underflows")]
#[test_case(";", ErrorKind::BadState; "semicolon while not compiling is bad state")]
#[test_case(": w [ [ ] ;", ErrorKind::BadState; "open bracket while already interpreting is bad state")]
#[test_case("literal", ErrorKind::BadState; "literal outside compile mode is bad state")]
#[test_case("postpone dup", ErrorKind::BadState; "postpone outside compile mode is bad state")]
#[test_case("1 \" x\" +", ErrorKind::BadArgument; "int plus string is bad argument in that order")]
#[test_case("\" x\" chr", ErrorKind::BadArgument; "chr on a non-int is bad argument")]
fn boundary(source: &str, kind: ErrorKind) {
    assert_error_kind(source, kind);
}

/// `:` itself is only ever *executed* while interpreting (it's not immediate, so inside an
/// ordinary definition it just gets compiled as a call, never run on the spot). The only way to
/// observe its "already compiling" guard is to have an *immediate* word call, at runtime, a
/// previously-compiled composite whose body invokes `:` — while that whole chain is itself
/// running as part of compiling some third word.
#[test]
fn colon_invoked_while_already_compiling_is_bad_state() {
    assert_error_kind(
        ": inner : ; : outer inner ; immediate : x outer ;",
        ErrorKind::BadState,
    );
}

/// `]`, like `:`, is only ever executed from interpret mode (it isn't immediate either, so a
/// bare `]` inside a definition just gets compiled as a call). The same caller's-caller-running
/// trick used for `:` above is needed to observe it firing while still compiling.
#[test]
fn close_bracket_invoked_while_already_compiling_is_bad_state() {
    assert_error_kind(
        ": inner2 ] ; : outer2 inner2 ; immediate : y outer2 ;",
        ErrorKind::BadState,
    );
}

#[test]
fn postpone_of_an_undefined_name_is_bad_state() {
    assert_error_kind(": w postpone nonexistent-word ;", ErrorKind::BadState);
}

#[test]
fn read_with_multi_character_string_delimiter_is_bad_argument() {
    assert_error_kind("\" ab\" read", ErrorKind::BadArgument);
}

#[test]
fn division_by_zero_is_bad_argument() {
    assert_error_kind("1 0 /", ErrorKind::BadArgument);
}
