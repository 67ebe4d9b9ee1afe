use crate::lang::source_buffer::RuneSource;

/// Skip whitespace characters, leaving the buffer positioned at the next non-whitespace
/// character or at end of input.
pub fn eat_whitespace<S: RuneSource + ?Sized>(source: &mut S) -> std::io::Result<()> {
    while let Some(c) = source.peek_next()? {
        if !c.is_whitespace() {
            break;
        }
        source.next_char()?;
    }
    Ok(())
}

/// Read characters until `delimiter` is seen (consuming and discarding the delimiter), or until
/// end of input.  A space delimiter (`' '`) is treated specially: it means "any whitespace run",
/// matching the outer interpreter's ordinary word-breaking behavior.  EOF before the delimiter
/// is seen is not an error: the partial string read so far is returned.
pub fn delimited_read<S: RuneSource + ?Sized>(source: &mut S, delimiter: char) -> std::io::Result<String> {
    if delimiter == ' ' {
        return delimited_ws_read(source);
    }

    let mut text = String::new();
    while let Some(c) = source.next_char()? {
        if c == delimiter {
            break;
        }
        text.push(c);
    }
    Ok(text)
}

/// Read characters until any whitespace is seen (the whitespace is consumed but not included),
/// or until end of input.  Leading whitespace is not skipped; callers that want to skip leading
/// separators should call `eat_whitespace` first.
pub fn delimited_ws_read<S: RuneSource + ?Sized>(source: &mut S) -> std::io::Result<String> {
    let mut text = String::new();
    while let Some(c) = source.next_char()? {
        if c.is_whitespace() {
            break;
        }
        text.push(c);
    }
    Ok(text)
}

/// Read and return the next whitespace-delimited token from the source, skipping any leading
/// whitespace first.  Returns `None` at end of input with nothing left to return.
pub fn next_token<S: RuneSource + ?Sized>(source: &mut S) -> std::io::Result<Option<String>> {
    eat_whitespace(source)?;

    if source.peek_next()?.is_none() {
        return Ok(None);
    }

    let text = delimited_ws_read(source)?;
    if text.is_empty() {
        Ok(None)
    } else {
        Ok(Some(text))
    }
}

/// A decoded literal as recognized by `decode_literal`.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
}

/// Attempt to decode a token as a numeric literal.  Integers are tried first, then floats, with
/// no guard on the float parse: as in the original implementation's `decodeLiteral` (`strconv
/// .ParseFloat` called unconditionally once `Atoi` fails), this means `nan`/`inf`/`infinity`
/// (case-insensitively, optionally signed) decode as float literals rather than falling through
/// to a string/word lookup. Anything that doesn't parse as either is not a literal at all — it's
/// a word name, and the caller is responsible for looking it up in the dictionary instead.
pub fn decode_literal(text: &str) -> Option<Literal> {
    if let Ok(value) = text.parse::<i64>() {
        return Some(Literal::Int(value));
    }

    if let Ok(value) = text.parse::<f64>() {
        return Some(Literal::Float(value));
    }

    None
}
