use std::rc::Rc;

use crate::runtime::error::Result;
use crate::runtime::interpreter::Interpreter;

/// The executable behavior of a native word.  Composite (user-defined) words don't need a
/// distinct representation here: every composite word is given the *same* handler, a small
/// closure that captures the word's start index in the code segment and delegates to the inner
/// interpreter (see `Interpreter::execute_from`).  A plain `Rc<dyn Fn>` does the job on stable
/// Rust, without reaching for an unboxed-closure type that would need nightly `fn_traits`;
/// nothing here needs to inspect a composite word's identity beyond calling it.
pub type WordHandler = Rc<dyn Fn(&mut dyn Interpreter) -> Result<()>>;

/// A single entry in the word table.  `index` in the dictionary maps a name to a position in a
/// `Vec<Word>`; this struct is what lives at that position.
#[derive(Clone)]
pub struct Word {
    pub name: String,
    pub handler: WordHandler,
    pub immediate: bool,
}

impl Word {
    pub fn new(name: impl Into<String>, handler: WordHandler, immediate: bool) -> Self {
        Word {
            name: name.into(),
            handler,
            immediate,
        }
    }
}
