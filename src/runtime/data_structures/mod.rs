/// The Value enumeration: the dynamically-typed data held on the stack, plus the `+`/`*`
/// promotion rules.
pub mod value;

/// The flat, case-insensitive name-to-word-index dictionary, with mark/forget checkpointing.
pub mod dictionary;

/// The Word table: native word handlers and the bookkeeping (name, immediacy) that goes with
/// each dictionary entry.
pub mod word;
