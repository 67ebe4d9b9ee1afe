/// The concrete virtual machine: data/return stacks, dictionary, word table, code segment, and
/// the inner/outer interpreter loops.
pub mod vm;

use crate::lang::code::CodeSegment;
use crate::runtime::data_structures::value::Value;
use crate::runtime::data_structures::word::WordHandler;
use crate::runtime::error::Result;

/// Data and return stack access.  Split out from the rest of the interpreter surface because
/// nearly every native word only needs this much.
pub trait InterpreterStack {
    fn push(&mut self, value: Value);
    fn pop(&mut self) -> Result<Value>;
    fn stack_len(&self) -> usize;

    fn rpush(&mut self, value: Value);
    fn rpop(&mut self) -> Result<Value>;
    fn rstack_len(&self) -> usize;
}

/// Access to the flat code segment: appending, patching, and reading cells, plus tracking of
/// the word currently being compiled (`curdef`/`curname`).
pub trait CodeManagement {
    fn codeseg(&self) -> &CodeSegment;
    fn emit(&mut self, cell: u16) -> usize;
    fn patch(&mut self, at: usize, value: u16);
    fn cell_at(&self, at: usize) -> u16;

    fn curdef(&self) -> usize;
    fn set_curdef(&mut self, index: usize);

    fn curname(&self) -> &str;
    fn set_curname(&mut self, name: String);

    /// The inner interpreter's instruction pointer. Exposed so that reserved-opcode and other
    /// operand-consuming words (`(lit-int)`, `(branch)`, `(test-do)`, ...) can read the cell
    /// that follows them and advance past it, the same way the reference interpreter's opcode
    /// handlers do.
    fn ip(&self) -> usize;
    fn set_ip(&mut self, ip: usize);

    /// Runs the inner interpreter starting at the given code segment index, until it reaches a
    /// `(ret)` at the top level of that invocation.
    fn execute_from(&mut self, start: usize) -> Result<()>;
}

/// Dictionary and word-table management: defining new words, looking them up, marking/forgetting
/// checkpoints, and executing a word by index or by name.
pub trait WordManagement {
    fn define_native(&mut self, name: &str, immediate: bool, handler: WordHandler) -> u16;
    fn define_composite(&mut self, name: &str, start: usize, immediate: bool) -> u16;

    fn lookup(&self, name: &str) -> Option<u16>;
    fn word_count(&self) -> u16;
    fn is_immediate(&self, index: u16) -> bool;
    fn set_immediate(&mut self, index: u16);
    fn name_of(&self, index: u16) -> Option<String>;

    /// Records the current word-table length as the point a later `forget` rolls back to.
    fn mark(&mut self);

    /// Rolls the dictionary and word table back to the last `mark`.  Leaves the code segment
    /// untouched, since composite words defined since the mark may still reference it.
    fn forget(&mut self) -> Result<()>;

    fn execute_word_index(&mut self, index: u16) -> Result<()>;
    fn execute_word_named(&mut self, name: &str) -> Result<()>;

    /// Whether the outer interpreter is currently compiling (`true`) or interpreting (`false`).
    fn is_compiling(&self) -> bool;
    fn set_compiling(&mut self, compiling: bool);
}

/// Output sink access, used by the I/O wordset (`.`, `.s`, `type`, `cr`).
pub trait InterpreterIo {
    fn write_out(&mut self, text: &str) -> Result<()>;
}

/// Access to the VM's input stream, used by the compiler words (`:`, `[`) to recursively drive
/// the outer interpreter, and by the I/O wordset (`"`, `read`, `skip`) to read past the normal
/// token boundary.
pub trait InterpreterInput {
    /// Reads the next whitespace-delimited token, or `None` at end of input.
    fn next_token(&mut self) -> Result<Option<String>>;

    /// Reads characters up to and including `delimiter` (a space delimiter means "any
    /// whitespace run"), returning what was read without the delimiter itself.  End of input
    /// before the delimiter is seen is not an error; the partial string is returned.
    fn read_delimited(&mut self, delimiter: char) -> Result<String>;
}

/// The union of everything a native word's handler can see and do.  Implemented by the concrete
/// `Vm` and passed around as `&mut dyn Interpreter` so built-in word modules don't need to know
/// about the concrete type.
pub trait Interpreter: InterpreterStack + CodeManagement + WordManagement + InterpreterIo + InterpreterInput {}

impl<T> Interpreter for T where T: InterpreterStack + CodeManagement + WordManagement + InterpreterIo + InterpreterInput {}
