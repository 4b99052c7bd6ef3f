mod pointer;

pub use pointer::Pointer;

use std::fmt::{Debug, Formatter, Result};

const BLANK: &str = "";
const PIPE: &str = "|";
const EQUAL: &str = "=";
const HIGHLIGHT: &str = "^";

/// Describes a type that can be attached to an [`Error`][`super::Error`]
/// and used to print a visualization of where it happened.
pub trait Visual: Debug + Send + Sync {
    /// Display the visualization by writing to the given Formatter.
    ///
    /// `template` is the name of the template the visualization refers to,
    /// if known, and `help` is any help text attached to the error.
    fn display(
        &self,
        formatter: &mut Formatter<'_>,
        template: Option<&str>,
        help: Option<&str>,
    ) -> Result;
}

/// Return the zero indexed line containing the byte `offset`, along with the
/// display width of the text between the start of that line and `offset`.
fn get_line_and_column(source: &str, offset: usize) -> (usize, usize) {
    let offset = floor_boundary(source, offset);
    let before = &source[..offset];
    let line = before.matches('\n').count();
    let line_start = before.rfind('\n').map_or(0, |index| index + 1);

    (line, get_width(&before[line_start..]))
}

/// Move `offset` back until it lands on a character boundary within `source`.
fn floor_boundary(source: &str, offset: usize) -> usize {
    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }

    offset
}

/// Wrapper for UnicodeWidthStr::width.
fn get_width(s: &str) -> usize {
    unicode_width::UnicodeWidthStr::width(s)
}
