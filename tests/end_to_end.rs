//! Input phrases run end to end against the final data stack they should leave behind.

mod common;

use common::{assert_stack, Expect::*};
use test_case::test_case;

#[test_case("2 3 +  2 3.1 +", &[Int(5), Float(5.1)]; "integer and float add")]
#[test_case("\" hi\" \"  there\" +", &[Str("hi there")]; "string concat in next-plus-top order")]
#[test_case("\" hi\" 3 *  3 \" yo\" *", &[Str("hihihi"), Str("yoyoyo")]; "string times int either order")]
#[test_case(": tst [ -5 10 * ] literal + ; 2 tst", &[Int(-48)]; "literal splices a compile-time computed constant")]
#[test_case(": tst [ 55 1000 * ] literal + ; 2 tst", &[Int(55002)]; "literal handles a value needing a pusher word")]
#[test_case(": TST 3 4 sWaP ; tst", &[Int(4), Int(3)]; "case insensitive definition and dispatch")]
#[test_case("1 2 3 nip 4 nip 5 nip", &[Int(1), Int(5)]; "repeated nip")]
#[test_case("2 3 4 rot", &[Int(3), Int(4), Int(2)]; "rot")]
#[test_case(": fact dup 1 > if dup 1 - recur * then ; 5 fact", &[Int(120)]; "recursive factorial via recur")]
#[test_case(": cnt 0 10 0 do dup 1 + loop ; cnt", &[Int(0), Int(1), Int(2), Int(3), Int(4), Int(5), Int(6), Int(7), Int(8), Int(9), Int(10)]; "do loop counts up")]
fn scenario(source: &str, expected: &[common::Expect]) {
    assert_stack(source, expected);
}

#[test]
fn string_round_trip_via_quote_word() {
    assert_stack("\" hello world\"", &[Str("hello world")]);
}

#[test]
fn string_round_trip_inside_a_definition() {
    assert_stack(": w \" hello world\" ; w", &[Str("hello world")]);
}

#[test]
fn chr_ord_round_trip() {
    assert_stack("65 chr ord", &[Int(65)]);
    assert_stack("955 chr ord", &[Int(955)]);
}

#[test]
fn plus_loop_with_explicit_step() {
    // 0 up to (not including) 9 stepping by 3: indices 0, 3, 6.
    assert_stack(": c3 0 9 0 do i 3 +loop ; c3", &[Int(0), Int(3), Int(6)]);
}

#[test]
fn nested_do_loops_i_and_j() {
    // outer j=0,1; inner i=0,1 each time -> pairs (j,i)
    assert_stack(
        ": pairs 2 0 do 2 0 do j i loop loop ; pairs",
        &[Int(0), Int(0), Int(0), Int(1), Int(1), Int(0), Int(1), Int(1)],
    );
}

#[test]
fn do_loop_with_limit_equal_start_does_not_run() {
    assert_stack(": never 5 5 do 99 loop ; 1 never", &[Int(1)]);
}

#[test]
fn paren_comment_is_skipped_during_interpretation() {
    assert_stack("1 ( this is a comment ) 2 +", &[Int(3)]);
}

#[test]
fn paren_comment_is_skipped_during_compilation() {
    assert_stack(": add2 ( n -- n+2 ) 2 + ; 3 add2", &[Int(5)]);
}

#[test]
fn line_comment_runs_to_end_of_line() {
    assert_stack("1 2 + \\ trailing remark, ignored entirely\n3 +", &[Int(6)]);
}

#[test]
fn mark_and_forget_round_trip_a_scratch_definition() {
    assert_stack(
        "mark : scratch 99 ; scratch forget : scratch 1 ; scratch",
        &[Int(99), Int(1)],
    );
}

#[test]
fn read_with_explicit_delimiter_stops_at_that_character() {
    // 41 is the code point for ')'; the token boundary after `read` already consumes the
    // separating whitespace, so the raw read starts right at "hi".
    assert_stack("41 read hi there)", &[Str("hi there")]);
}

#[test]
fn skip_discards_the_read_text() {
    assert_stack("1 41 skip hi there) 2 +", &[Int(3)]);
}
