//! Payload hooks and line-level input handling
//!
//! The codec never interprets payload bytes itself; everything between a
//! `[` and its `]` line is delegated to an externally supplied
//! [`PayloadCodec`].

use crate::error::{Error, Result};
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::marker::PhantomData;
use std::str::FromStr;

/// Externally supplied payload encode/decode hooks
///
/// `read_payload` is handed the line source right after a `[` token line
/// and consumes as many lines as it needs, **including the closing `]`
/// line**. `format_payload` renders a single-line, non-recursive form
/// and is used only by diagnostics.
pub trait PayloadCodec {
    type Value;

    /// Write the payload block contents at the given indentation level.
    fn write_payload(&self, value: &Self::Value, level: usize, out: &mut dyn Write)
        -> Result<()>;

    /// Read one payload back, consuming lines up to and including `]`.
    fn read_payload(&self, lines: &mut LineSource<'_>) -> Result<Self::Value>;

    /// Render the payload on a single line (diagnostics).
    fn format_payload(&self, value: &Self::Value, out: &mut dyn Write) -> Result<()>;
}

/// Line-at-a-time reader over a buffered input
///
/// Strips the trailing newline (and carriage return) from every line and
/// tracks a line number for error context.
pub struct LineSource<'a> {
    input: &'a mut dyn BufRead,
    line_no: usize,
}

impl<'a> LineSource<'a> {
    pub fn new(input: &'a mut dyn BufRead) -> Self {
        Self { input, line_no: 0 }
    }

    /// Next line of input, or `None` at end of input.
    pub fn next_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        self.line_no += 1;
        Ok(Some(line))
    }

    /// Number of lines read so far.
    pub fn line_number(&self) -> usize {
        self.line_no
    }
}

/// Check whether a line is exactly one structural token
///
/// A line counts as the token iff it equals the token after trimming
/// surrounding whitespace; anything else on the line makes it payload
/// content.
pub fn is_token(line: &str, token: char) -> bool {
    let trimmed = line.trim();
    trimmed.len() == token.len_utf8() && trimmed.starts_with(token)
}

pub(crate) fn indent(out: &mut dyn Write, level: usize) -> Result<()> {
    for _ in 0..level {
        write!(out, "\t")?;
    }
    Ok(())
}

/// One-line-per-value payload hooks for `Display + FromStr` types
///
/// Writes the value on a single indented line; reads one line back,
/// parses it, and consumes the closing `]` line.
pub struct TextPayload<V> {
    _marker: PhantomData<V>,
}

impl<V> TextPayload<V> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<V> Default for TextPayload<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Display + FromStr> PayloadCodec for TextPayload<V> {
    type Value = V;

    fn write_payload(&self, value: &V, level: usize, out: &mut dyn Write) -> Result<()> {
        indent(out, level)?;
        writeln!(out, "{}", value)?;
        Ok(())
    }

    fn read_payload(&self, lines: &mut LineSource<'_>) -> Result<V> {
        let line = lines
            .next_line()?
            .ok_or_else(|| Error::Payload("end of input inside payload block".into()))?;
        let value = line
            .trim()
            .parse()
            .map_err(|_| Error::Payload(format!("cannot parse payload line {:?}", line.trim())))?;

        let close = lines
            .next_line()?
            .ok_or_else(|| Error::Payload("payload block not closed".into()))?;
        if !is_token(&close, ']') {
            return Err(Error::Payload(format!(
                "expected ']' after payload, got {:?}",
                close.trim()
            )));
        }
        Ok(value)
    }

    fn format_payload(&self, value: &V, out: &mut dyn Write) -> Result<()> {
        write!(out, "{}", value)?;
        Ok(())
    }
}
