use std::io::{Read, Write};
use std::rc::Rc;

use log::debug;

use crate::lang::code::{self, CodeSegment, OP_BRANCH, OP_BZR, OP_LIT_INT, OP_LIT_UINT, OP_RET};
use crate::lang::source_buffer::{RuneSource, SourceBuffer};
use crate::lang::tokenizing;
use crate::runtime::data_structures::dictionary::Dictionary;
use crate::runtime::data_structures::value::Value;
use crate::runtime::data_structures::word::{Word, WordHandler};
use crate::runtime::error::{bad_argument, bad_state, underflow, Result};
use crate::runtime::interpreter::{CodeManagement, Interpreter, InterpreterInput, InterpreterIo, InterpreterStack, WordManagement};

/// The concrete virtual machine.  Holds the data/return stacks, the dictionary and word table,
/// the flat code segment, the input source, and the bookkeeping the outer/inner interpreters
/// need.
pub struct Vm {
    words: Vec<Word>,
    dict: Dictionary,

    stack: Vec<Value>,
    rstack: Vec<Value>,

    codeseg: CodeSegment,
    ip: usize,
    curdef: usize,
    curname: String,
    marker: u16,

    compiling: bool,

    source: Box<dyn RuneSource>,
    sink: Box<dyn Write>,
}

impl Vm {
    /// Creates a VM with an empty dictionary and registers the six reserved opcodes at indices
    /// 0-5, in order, so that bytecode emitted elsewhere can rely on `lang::code`'s constants.
    /// The built-in wordset (stack, arithmetic, control-flow, I/O, ...) is not registered here;
    /// that's the caller's job, mirroring the reference interpreter where `main` registers each
    /// wordset module after constructing the VM.
    pub fn new() -> Self {
        let mut vm = Vm {
            words: Vec::new(),
            dict: Dictionary::new(),
            stack: Vec::new(),
            rstack: Vec::new(),
            codeseg: CodeSegment::new(),
            ip: 0,
            curdef: 0,
            curname: String::new(),
            marker: 0,
            compiling: true,
            source: Box::new(SourceBuffer::new(std::io::empty())),
            sink: Box::new(std::io::stdout()),
        };

        vm.define_native(code::RESERVED_WORD_NAMES[0], false, Rc::new(|_| Ok(())));
        vm.define_native(code::RESERVED_WORD_NAMES[1], false, Rc::new(Vm::lit_int_handler));
        vm.define_native(code::RESERVED_WORD_NAMES[2], false, Rc::new(Vm::lit_uint_handler));
        vm.define_native(code::RESERVED_WORD_NAMES[3], false, Rc::new(Vm::compile_comma_handler));
        vm.define_native(code::RESERVED_WORD_NAMES[4], false, Rc::new(Vm::branch_handler));
        vm.define_native(code::RESERVED_WORD_NAMES[5], false, Rc::new(Vm::bzr_handler));

        debug!("vm initialized with {} reserved words", vm.words.len());
        vm
    }

    pub fn with_sink(sink: Box<dyn Write>) -> Self {
        let mut vm = Self::new();
        vm.sink = sink;
        vm
    }

    /// Installs the input stream the outer interpreter reads tokens from. Replaces whatever
    /// source was previously installed; any partially-read token in flight is lost, which is
    /// only a concern if called mid-`run`, which nothing but tests should do.
    pub fn set_source<R: Read + 'static>(&mut self, source: R) {
        self.source = Box::new(SourceBuffer::new(source));
    }

    /// `(lit-int)`: the cell immediately after this opcode is a signed 16-bit literal; push it
    /// and advance past it.
    fn lit_int_handler(interp: &mut dyn Interpreter) -> Result<()> {
        let pos = interp.ip() + 1;
        let operand = interp.cell_at(pos) as i16 as i64;
        interp.push(Value::Int(operand));
        interp.set_ip(pos);
        Ok(())
    }

    /// `(lit-uint)`: as `(lit-int)`, but the operand cell is unsigned.
    fn lit_uint_handler(interp: &mut dyn Interpreter) -> Result<()> {
        let pos = interp.ip() + 1;
        let operand = interp.cell_at(pos) as i64;
        interp.push(Value::Int(operand));
        interp.set_ip(pos);
        Ok(())
    }

    /// `(branch)`: unconditional jump. The operand is a signed distance relative to this
    /// opcode's own position; the inner interpreter's uniform post-dispatch increment is what
    /// turns `ip = p + offset` into a landing on `p + offset + 1`.
    fn branch_handler(interp: &mut dyn Interpreter) -> Result<()> {
        let p = interp.ip();
        let offset = interp.cell_at(p + 1) as i16 as i64;
        let target = p as i64 + offset;
        if target < 0 {
            return bad_state("branch", "branch target out of range");
        }
        interp.set_ip(target as usize);
        Ok(())
    }

    /// `(bzr)`: pop a value; if it's numerically zero, branch like `(branch)`; otherwise skip
    /// past the operand cell and fall through.
    fn bzr_handler(interp: &mut dyn Interpreter) -> Result<()> {
        let condition = interp.pop()?;
        let is_zero = match condition {
            Value::Int(v) => v == 0,
            Value::Float(v) => v == 0.0,
            other => return bad_argument("if", format!("expected a number, got {}", other.type_name())),
        };

        let p = interp.ip();
        if is_zero {
            let offset = interp.cell_at(p + 1) as i16 as i64;
            let target = p as i64 + offset;
            if target < 0 {
                return bad_state("if", "branch target out of range");
            }
            interp.set_ip(target as usize);
        } else {
            interp.set_ip(p + 1);
        }
        Ok(())
    }

    /// `compile,` ( index -- ) pops a word index from the stack and appends it raw to the code
    /// segment of the word currently being compiled.
    fn compile_comma_handler(interp: &mut dyn Interpreter) -> Result<()> {
        let value = interp.pop()?;
        let index = match value {
            Value::Int(v) if v >= 0 && (v as u64) < interp.word_count() as u64 => v as u16,
            Value::Int(_) => return bad_argument("compile,", "word index out of range"),
            other => return bad_argument("compile,", format!("expected an integer word index, got {}", other.type_name())),
        };
        interp.emit(index);
        Ok(())
    }

    /// Runs the outer interpreter from wherever the source was left (EOF from a previous call
    /// resumes nowhere further; a fresh `set_source` starts over), writing output to the VM's
    /// sink, until end of input (success) or an error. Matches the reference driver's `Run`:
    /// one call processes input to completion or to the first error, it does not auto-recover.
    pub fn run(&mut self) -> Result<()> {
        self.compiling = true;
        crate::runtime::built_ins::compiler_words::enter_top_level(self)
    }

    /// Clears both stacks, returns to interpreting mode, and clears the in-progress
    /// definition bookkeeping.  Leaves the dictionary, word table, code segment and input
    /// stream intact so prior definitions survive an error and reading resumes where it left
    /// off.
    pub fn reset_state(&mut self) {
        self.stack.clear();
        self.rstack.clear();
        self.compiling = true;
        self.curdef = 0;
        self.curname.clear();
        self.ip = 0;
    }

    /// Test-only hook to put the marker past the end of the word table, the one state `mark`
    /// itself can never produce (it always records the *current* length), so that `forget`'s
    /// defensive bad-state check is actually exercised.
    #[cfg(test)]
    pub(crate) fn force_marker_past_end(&mut self, marker: u16) {
        self.marker = marker;
    }
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}

impl InterpreterStack for Vm {
    fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    fn pop(&mut self) -> Result<Value> {
        self.stack.pop().ok_or(()).or_else(|_| underflow("stack"))
    }

    fn stack_len(&self) -> usize {
        self.stack.len()
    }

    fn rpush(&mut self, value: Value) {
        self.rstack.push(value);
    }

    fn rpop(&mut self) -> Result<Value> {
        self.rstack.pop().ok_or(()).or_else(|_| underflow("return stack"))
    }

    fn rstack_len(&self) -> usize {
        self.rstack.len()
    }
}

impl CodeManagement for Vm {
    fn codeseg(&self) -> &CodeSegment {
        &self.codeseg
    }

    fn emit(&mut self, cell: u16) -> usize {
        code::emit(&mut self.codeseg, cell)
    }

    fn patch(&mut self, at: usize, value: u16) {
        code::patch(&mut self.codeseg, at, value)
    }

    fn cell_at(&self, at: usize) -> u16 {
        self.codeseg[at]
    }

    fn curdef(&self) -> usize {
        self.curdef
    }

    fn set_curdef(&mut self, index: usize) {
        self.curdef = index;
    }

    fn curname(&self) -> &str {
        &self.curname
    }

    fn set_curname(&mut self, name: String) {
        self.curname = name;
    }

    fn ip(&self) -> usize {
        self.ip
    }

    fn set_ip(&mut self, ip: usize) {
        self.ip = ip;
    }

    /// Dispatches `words[codeseg[ip]]` uniformly (even the reserved opcodes go through the same
    /// word-table call as any other primitive), incrementing `ip` by one after every dispatch.
    /// Operand-consuming words advance `ip` themselves first, so the net effect matches the
    /// reference interpreter's "run, then increment" convention exactly.
    fn execute_from(&mut self, start: usize) -> Result<()> {
        let saved_ip = self.ip;
        let saved_rstack_len = self.rstack.len();
        self.ip = start;

        loop {
            let cell = self.codeseg[self.ip];
            if cell == OP_RET {
                break;
            }

            self.execute_word_index(cell)?;
            self.ip += 1;
        }

        if self.rstack.len() < saved_rstack_len {
            return underflow("return stack");
        }
        self.rstack.truncate(saved_rstack_len);
        self.ip = saved_ip;
        Ok(())
    }
}

impl WordManagement for Vm {
    fn define_native(&mut self, name: &str, immediate: bool, handler: WordHandler) -> u16 {
        let index = self.words.len() as u16;
        self.words.push(Word::new(name, handler, immediate));
        self.dict.define(name, index);
        index
    }

    fn define_composite(&mut self, name: &str, start: usize, immediate: bool) -> u16 {
        let handler: WordHandler = Rc::new(move |interp: &mut dyn Interpreter| interp.execute_from(start));
        self.define_native(name, immediate, handler)
    }

    fn lookup(&self, name: &str) -> Option<u16> {
        self.dict.lookup(name)
    }

    fn word_count(&self) -> u16 {
        self.words.len() as u16
    }

    fn is_immediate(&self, index: u16) -> bool {
        self.words.get(index as usize).map(|w| w.immediate).unwrap_or(false)
    }

    fn set_immediate(&mut self, index: u16) {
        if let Some(word) = self.words.get_mut(index as usize) {
            word.immediate = true;
        }
    }

    fn name_of(&self, index: u16) -> Option<String> {
        self.dict.name_for(index)
    }

    fn mark(&mut self) {
        self.marker = self.words.len() as u16;
    }

    fn forget(&mut self) -> Result<()> {
        if (self.words.len() as u16) < self.marker {
            return bad_state("forget", "marker is past the end of the word table");
        }
        self.dict.forget(self.marker);
        self.words.truncate(self.marker as usize);
        Ok(())
    }

    fn execute_word_index(&mut self, index: u16) -> Result<()> {
        let word = self
            .words
            .get(index as usize)
            .ok_or(())
            .or_else(|_| bad_argument("execute", format!("no such word: {}", index)))?;
        let handler = word.handler.clone();
        handler(self)
    }

    fn execute_word_named(&mut self, name: &str) -> Result<()> {
        match self.lookup(name) {
            Some(index) => self.execute_word_index(index),
            None => bad_argument("execute", format!("word not found: {}", name)),
        }
    }

    fn is_compiling(&self) -> bool {
        self.compiling
    }

    fn set_compiling(&mut self, compiling: bool) {
        self.compiling = compiling;
    }
}

impl InterpreterIo for Vm {
    fn write_out(&mut self, text: &str) -> Result<()> {
        self.sink.write_all(text.as_bytes())?;
        self.sink.flush()?;
        Ok(())
    }
}

impl InterpreterInput for Vm {
    fn next_token(&mut self) -> Result<Option<String>> {
        Ok(tokenizing::next_token(&mut *self.source)?)
    }

    fn read_delimited(&mut self, delimiter: char) -> Result<String> {
        Ok(tokenizing::delimited_read(&mut *self.source, delimiter)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::error::ErrorKind;

    #[test]
    fn forget_past_end_of_word_table_is_bad_state() {
        let mut vm = Vm::new();
        vm.force_marker_past_end(vm.word_count() + 1);
        let err = vm.forget().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadState);
    }

    #[test]
    fn execute_from_restores_ip_and_rstack_depth() {
        let mut vm = Vm::new();
        vm.rpush(Value::Int(42));
        vm.set_ip(7);

        // A composite whose body is just `(ret)`.
        let start = vm.emit(OP_RET);
        vm.execute_from(start).unwrap();

        assert_eq!(vm.ip(), 7);
        assert_eq!(vm.rstack_len(), 1);
        assert_eq!(vm.rpop().unwrap(), Value::Int(42));
    }

    #[test]
    fn reset_state_clears_stacks_and_compile_bookkeeping_but_keeps_dictionary() {
        let mut vm = Vm::new();
        let words_before = vm.word_count();
        vm.push(Value::Int(1));
        vm.rpush(Value::Int(2));
        vm.set_compiling(false);
        vm.set_curdef(3);
        vm.set_curname("half-finished".to_string());
        vm.set_ip(9);

        vm.reset_state();

        assert_eq!(vm.stack_len(), 0);
        assert_eq!(vm.rstack_len(), 0);
        assert!(vm.is_compiling());
        assert_eq!(vm.curdef(), 0);
        assert_eq!(vm.curname(), "");
        assert_eq!(vm.ip(), 0);
        assert_eq!(vm.word_count(), words_before);
    }
}
