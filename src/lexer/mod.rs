
use std::io;

use super::error::{Error, Result};

pub(crate) const END_LINE: &[u8] = b"\r\n";

/// Default upper bound for a single logical line, terminator excluded.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 64 * 1024;

/// LineReader supplies successive logical SDP lines.
///
/// Lines are split on `\n`; a `\r` right before it is dropped. A final line
/// without terminator is still returned.
pub trait LineReader {
    /// Returns the next line, or `None` once the input is exhausted.
    fn next_line(&mut self) -> Result<Option<&str>>;
}

/// StrLines slices lines out of an in-memory document.
pub struct StrLines<'a> {
    rest: &'a str,
    max_line_length: usize,
}

impl<'a> StrLines<'a> {
    pub fn new(text: &'a str) -> Self {
        Self::with_max_line_length(text, DEFAULT_MAX_LINE_LENGTH)
    }

    pub fn with_max_line_length(text: &'a str, max_line_length: usize) -> Self {
        StrLines {
            rest: text,
            max_line_length,
        }
    }
}

impl LineReader for StrLines<'_> {
    fn next_line(&mut self) -> Result<Option<&str>> {
        if self.rest.is_empty() {
            return Ok(None);
        }
        let (line, rest) = match self.rest.find('\n') {
            Some(i) => (&self.rest[..i], &self.rest[i + 1..]),
            None => (self.rest, ""),
        };
        self.rest = rest;

        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.len() > self.max_line_length {
            return Err(Error::LineTooLong {
                max: self.max_line_length,
            });
        }
        Ok(Some(line))
    }
}

/// StreamLines reads lines incrementally from a buffered byte source.
pub struct StreamLines<R: io::BufRead> {
    reader: R,
    buf: Vec<u8>,
    max_line_length: usize,
}

impl<R: io::BufRead> StreamLines<R> {
    pub fn new(reader: R) -> Self {
        Self::with_max_line_length(reader, DEFAULT_MAX_LINE_LENGTH)
    }

    pub fn with_max_line_length(reader: R, max_line_length: usize) -> Self {
        StreamLines {
            reader,
            buf: Vec::with_capacity(256),
            max_line_length,
        }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    fn too_long(&self) -> Error {
        Error::LineTooLong {
            max: self.max_line_length,
        }
    }
}

impl<R: io::BufRead> LineReader for StreamLines<R> {
    fn next_line(&mut self) -> Result<Option<&str>> {
        self.buf.clear();
        let mut terminated = false;

        while !terminated {
            let available = match self.reader.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            if available.is_empty() {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                break;
            }

            let used = match available.iter().position(|&b| b == b'\n') {
                Some(i) => {
                    self.buf.extend_from_slice(&available[..i]);
                    terminated = true;
                    i + 1
                }
                None => {
                    self.buf.extend_from_slice(available);
                    available.len()
                }
            };
            self.reader.consume(used);

            // one extra byte for a '\r' that is stripped below
            if self.buf.len() > self.max_line_length + 1 {
                return Err(self.too_long());
            }
        }

        if self.buf.last() == Some(&b'\r') {
            self.buf.pop();
        }
        if self.buf.len() > self.max_line_length {
            return Err(self.too_long());
        }
        Ok(Some(std::str::from_utf8(&self.buf)?))
    }
}

/// Split selects how [`split_fields`] treats a value holding fewer
/// separators than requested.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Split {
    /// Too few fields is a decode error naming the line.
    Required,
    /// Too few fields are returned as they are.
    Optional,
}

/// split_fields splits `value` on `sep` into at most `n` fields. The last
/// field keeps the remainder of the value, separators included.
pub fn split_fields<'a>(
    line: &str,
    value: &'a str,
    sep: char,
    n: usize,
    mode: Split,
) -> Result<Vec<&'a str>> {
    let fields: Vec<&'a str> = value.splitn(n, sep).collect();
    if mode == Split::Required && fields.len() < n {
        return Err(Error::syntax(line));
    }
    Ok(fields)
}
