/// Module for the managing source code and the generation of byte code.
pub mod lang;

/// Module for the runtime and the data structures used by the interpreter, as well as the
/// interpreter itself.
pub mod runtime;
