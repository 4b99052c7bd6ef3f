use crate::escape::escape;
use std::fmt::{Result, Write};

/// Wraps the buffer that rendered output is written to.
///
/// Every evaluator spawned during one render writes through the same `Pipe`,
/// so fragments arrive in the order a depth first walk of the template
/// produces them.
pub struct Pipe<'buffer> {
    buffer: &'buffer mut (dyn Write + 'buffer),
}

impl<'buffer> Pipe<'buffer> {
    /// Create a new Pipe that writes to the given buffer.
    pub fn new(buffer: &'buffer mut (dyn Write + 'buffer)) -> Self {
        Self { buffer }
    }

    /// Write the given text to the buffer, HTML escaped when `quote` is true.
    ///
    /// The text is handed to the buffer as one fragment either way.
    pub fn write_text(&mut self, text: &str, quote: bool) -> Result {
        if quote {
            self.write_str(&escape(text))
        } else {
            self.write_str(text)
        }
    }
}

impl Write for Pipe<'_> {
    /// Empty fragments are dropped.
    #[inline]
    fn write_str(&mut self, s: &str) -> Result {
        if s.is_empty() {
            return Ok(());
        }
        self.buffer.write_str(s)
    }
}

/// A buffer that collects every fragment into a `String` and also hands
/// each one to a sink as it arrives.
pub struct Tee<'buffer, F> {
    buffer: &'buffer mut String,
    sink: F,
}

impl<'buffer, F> Tee<'buffer, F>
where
    F: FnMut(&str),
{
    /// Create a new Tee over the given buffer and sink.
    pub fn new(buffer: &'buffer mut String, sink: F) -> Self {
        Self { buffer, sink }
    }
}

impl<F> Write for Tee<'_, F>
where
    F: FnMut(&str),
{
    fn write_str(&mut self, s: &str) -> Result {
        (self.sink)(s);
        self.buffer.push_str(s);

        Ok(())
    }
}
