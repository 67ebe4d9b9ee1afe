use std::io::Read;

/// Type-erased access to a [`SourceBuffer`]'s rune stream.  The VM holds its input source as a
/// `Box<dyn RuneSource>` so that native word handlers (`:`, `[`, `"`, `read`, `skip`, ...),
/// which only see `&mut dyn Interpreter`, can still pull characters out of whatever concrete
/// `io::Read` the session was started with, without the VM itself being generic over `R`.
pub trait RuneSource {
    fn peek_next(&mut self) -> std::io::Result<Option<char>>;
    fn next_char(&mut self) -> std::io::Result<Option<char>>;
}

impl<R: Read> RuneSource for SourceBuffer<R> {
    fn peek_next(&mut self) -> std::io::Result<Option<char>> {
        SourceBuffer::peek_next(self)
    }

    fn next_char(&mut self) -> std::io::Result<Option<char>> {
        SourceBuffer::next_char(self)
    }
}

/// Streams characters one at a time out of any `io::Read`. Unlike a whole-string buffer this
/// lets the outer interpreter read token-at-a-time from stdin without knowing in advance where
/// input ends, which an interactive REPL requires.
pub struct SourceBuffer<R: Read> {
    bytes: std::io::Bytes<R>,
    current: Option<char>,
}

impl<R: Read> SourceBuffer<R> {
    pub fn new(source: R) -> Self {
        SourceBuffer {
            bytes: source.bytes(),
            current: None,
        }
    }

    /// Take a peek at the next character in the source without consuming it.
    pub fn peek_next(&mut self) -> std::io::Result<Option<char>> {
        if self.current.is_none() {
            self.current = self.read_char()?;
        }
        Ok(self.current)
    }

    /// Get and consume the next character in the source.
    pub fn next_char(&mut self) -> std::io::Result<Option<char>> {
        match self.current.take() {
            Some(c) => Ok(Some(c)),
            None => self.read_char(),
        }
    }

    /// Decodes the next UTF-8 scalar value from the byte stream, one to four bytes wide
    /// depending on the leading byte. Reading byte-at-a-time (rather than loading the whole
    /// input up front, as a whole-`&str` buffer would) is what lets the REPL consume stdin
    /// interactively without knowing in advance where input ends.
    fn read_char(&mut self) -> std::io::Result<Option<char>> {
        let first = match self.bytes.next() {
            None => return Ok(None),
            Some(byte) => byte?,
        };

        let extra = if first & 0x80 == 0x00 {
            0
        } else if first & 0xE0 == 0xC0 {
            1
        } else if first & 0xF0 == 0xE0 {
            2
        } else if first & 0xF8 == 0xF0 {
            3
        } else {
            return Ok(Some(char::REPLACEMENT_CHARACTER));
        };

        let mut buf = [0u8; 4];
        buf[0] = first;
        for slot in buf.iter_mut().take(extra + 1).skip(1) {
            *slot = match self.bytes.next() {
                Some(byte) => byte?,
                None => return Ok(Some(char::REPLACEMENT_CHARACTER)),
            };
        }

        match std::str::from_utf8(&buf[..=extra]) {
            Ok(s) => Ok(s.chars().next()),
            Err(_) => Ok(Some(char::REPLACEMENT_CHARACTER)),
        }
    }
}
