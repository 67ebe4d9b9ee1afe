/// Words that perform I/O operations: `. .s type cr chr ord " read skip`.
pub mod io_words;

/// The compiler: `:` `;` `[` `]` `immediate` `literal` `postpone`, plus the shared
/// literal-compiling helper used by `do`/`loop`/`"`.
pub mod compiler_words;

/// `if`/`else`/`then`, `recur`, and the do-loop family (`do`/`loop`/`+loop`/`i`/`j`) and their
/// internal support words.
pub mod control_flow_words;

/// Data stack shuffling: `dup drop swap over rot -rot nip tuck`.
pub mod stack_words;

/// Return stack access: `>r r> r@ rdrop`.
pub mod return_stack_words;

/// Arithmetic, comparison and logic words.
pub mod arithmetic_words;

/// `(` and `\` comments.
pub mod comment_words;

/// `debug.`, `mark`, `forget`.
pub mod introspection_words;

use crate::runtime::interpreter::Interpreter;

/// Registers the whole built-in wordset on a freshly constructed VM. Called once, from `main`,
/// before the VM reads its first token.
pub fn register_all(interp: &mut dyn Interpreter) {
    compiler_words::register_compiler_words(interp);
    control_flow_words::register_control_flow_words(interp);
    stack_words::register_stack_words(interp);
    return_stack_words::register_return_stack_words(interp);
    arithmetic_words::register_arithmetic_words(interp);
    io_words::register_io_words(interp);
    comment_words::register_comment_words(interp);
    introspection_words::register_introspection_words(interp);
}
