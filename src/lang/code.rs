/// The reserved opcodes.  These must occupy dictionary indices 0 through 5 in exactly this order
/// so that bytecode emitted by the compiler (which references word indices directly) lines up
/// with these constants before any other primitive is defined.
pub const OP_RET: u16 = 0;
pub const OP_LIT_INT: u16 = 1;
pub const OP_LIT_UINT: u16 = 2;
pub const OP_COMPILE_COMMA: u16 = 3;
pub const OP_BRANCH: u16 = 4;
pub const OP_BZR: u16 = 5;

/// The names bound to the reserved opcodes, in order, used to seed the dictionary and word table
/// before any other word is registered.
pub const RESERVED_WORD_NAMES: [&str; 6] = [
    "(ret)",
    "(lit-int)",
    "(lit-uint)",
    "compile,",
    "(branch)",
    "(bzr)",
];

/// The flat threaded-code segment.  Composite word bodies are stored here as runs of `u16`
/// cells: most cells are word indices (calls), but the six reserved opcodes above take one
/// operand cell immediately following them.
pub type CodeSegment = Vec<u16>;

/// Appends a cell to the code segment and returns the index it was written at.
pub fn emit(codeseg: &mut CodeSegment, cell: u16) -> usize {
    codeseg.push(cell);
    codeseg.len() - 1
}

/// Patches a previously emitted cell, used to fix up branch offsets once the target location is
/// known.
pub fn patch(codeseg: &mut CodeSegment, at: usize, value: u16) {
    codeseg[at] = value;
}

/// Renders a disassembly of `codeseg` for the `debug.` word: one line per cell, showing the raw
/// value and, where the cell matches a known word index, its name.
pub fn disassemble(codeseg: &CodeSegment, index_to_name: impl Fn(u16) -> Option<String>) -> String {
    let mut out = String::new();
    for (i, &cell) in codeseg.iter().enumerate() {
        match index_to_name(cell) {
            Some(name) => out.push_str(&format!("{:03}: {} ({})\n", i, cell, name)),
            None => out.push_str(&format!("{:03}: {} ({})\n", i, cell, cell as i16)),
        }
    }
    out
}
