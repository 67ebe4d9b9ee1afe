use std::{
    error::Error,
    fmt::{self, Debug, Display, Formatter},
    process::{ExitCode, Termination},
};

pub type Result<T> = std::result::Result<T, ScriptError>;

/// The three error categories this language distinguishes, plus the ordinary I/O failure that
/// can occur reading from stdin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Too few values were on the data or return stack for an operation to proceed.
    Underflow,

    /// A value was the wrong type, or otherwise an invalid operand, for an operation.
    BadArgument,

    /// The interpreter was in the wrong mode (compiling vs interpreting) or otherwise in an
    /// invalid state for the requested operation.
    BadState,

    /// Reading from the input stream failed.
    Io,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let text = match self {
            ErrorKind::Underflow => "underflow",
            ErrorKind::BadArgument => "bad argument",
            ErrorKind::BadState => "bad state",
            ErrorKind::Io => "I/O error",
        };
        write!(f, "{}", text)
    }
}

/// Any error that occurs during the execution of a script.
#[derive(Clone)]
pub struct ScriptError {
    kind: ErrorKind,
    message: String,
}

impl Error for ScriptError {}

/// When returned from main, convert the error result to an operating system exit code.
impl Termination for ScriptError {
    fn report(self) -> ExitCode {
        eprintln!("Error: {}", self);
        ExitCode::FAILURE
    }
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl Debug for ScriptError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl ScriptError {
    pub fn new(kind: ErrorKind, message: String) -> ScriptError {
        ScriptError { kind, message }
    }

    pub fn new_as_result<T>(kind: ErrorKind, message: String) -> Result<T> {
        Err(ScriptError::new(kind, message))
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &String {
        &self.message
    }
}

impl From<std::io::Error> for ScriptError {
    fn from(error: std::io::Error) -> ScriptError {
        ScriptError::new(ErrorKind::Io, format!("{}", error))
    }
}

pub fn underflow<T>(word: &str) -> Result<T> {
    ScriptError::new_as_result(ErrorKind::Underflow, format!("{}: stack underflow", word))
}

pub fn bad_argument<T>(word: &str, message: impl Into<String>) -> Result<T> {
    ScriptError::new_as_result(ErrorKind::BadArgument, format!("{}: {}", word, message.into()))
}

pub fn bad_state<T>(word: &str, message: impl Into<String>) -> Result<T> {
    ScriptError::new_as_result(ErrorKind::BadState, format!("{}: {}", word, message.into()))
}
