use std::fmt;
use std::io;

use crate::Result;

/// The output sink of a render, either a [`String`] or an [`io::Write`].
pub struct Formatter<'a> {
    buf: &'a mut (dyn fmt::Write + 'a),
}

/// Adapts an [`io::Write`] to [`fmt::Write`], keeping the first io error so
/// that it can be returned instead of the opaque [`fmt::Error`].
pub struct Writer<W> {
    writer: W,
    err: Option<io::Error>,
}

impl<'a> Formatter<'a> {
    pub fn with_string(buf: &'a mut String) -> Self {
        Self { buf }
    }

    pub fn with_writer<W>(buf: &'a mut Writer<W>) -> Self
    where
        W: io::Write,
    {
        Self { buf }
    }

    /// Write text to the output.
    #[inline]
    pub fn write(&mut self, s: &str) -> Result<()> {
        if !s.is_empty() {
            self.buf.write_str(s)?;
        }
        Ok(())
    }

    /// Write a tag back out verbatim with its delimiters.
    pub fn write_tag(&mut self, begin: &str, raw: &str, end: &str) -> Result<()> {
        self.write(begin)?;
        self.write(raw)?;
        self.write(end)
    }
}

impl<W> Writer<W>
where
    W: io::Write,
{
    pub fn new(writer: W) -> Self {
        Self { writer, err: None }
    }

    pub fn take_err(&mut self) -> Option<io::Error> {
        self.err.take()
    }
}

impl<W> fmt::Write for Writer<W>
where
    W: io::Write,
{
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.writer.write_all(s.as_bytes()).map_err(|e| {
            self.err = Some(e);
            fmt::Error
        })
    }
}
