use std::{
    cmp::max,
    fmt::{Formatter, Result},
};

use super::{
    super::{RESET, YELLOW},
    {floor_boundary, get_line_and_column, get_width, Visual, BLANK, EQUAL, HIGHLIGHT, PIPE},
};
use crate::region::Region;

/// A type of [`Visual`] that points to a specific location within source text.
#[derive(Debug, PartialEq)]
pub struct Pointer {
    /// The line that the Pointer is pointing to, zero indexed.
    line: usize,
    /// The column that the Pointer is pointing to, zero indexed.
    column: usize,
    /// The display width of the text being highlighted.
    length: usize,
    /// The actual line of text that is being pointed to.
    text: String,
}

impl Pointer {
    /// Create a new Pointer over the given source text and [`Region`].
    ///
    /// Highlighting stops at the end of the line the `Region` begins on.
    pub fn new(source: &str, region: Region) -> Self {
        let (line, column) = get_line_and_column(source, region.begin);
        let text = source.lines().nth(line).unwrap_or_default().to_string();

        let begin = floor_boundary(source, region.begin);
        let end = floor_boundary(source, region.end.max(begin));
        let highlighted = source[begin..end].lines().next().unwrap_or_default();
        let length = max(1, get_width(highlighted));

        Self {
            line,
            column,
            length,
            text,
        }
    }
}

impl Visual for Pointer {
    fn display(
        &self,
        formatter: &mut Formatter<'_>,
        template: Option<&str>,
        help: Option<&str>,
    ) -> Result {
        let num = (self.line + 1).to_string();
        let col = self.column + 1;
        let pad = get_width(&num);
        let align = self.column + self.length;

        let name = template.unwrap_or("?");
        let text = &self.text;
        let underline = HIGHLIGHT.repeat(self.length);

        write!(
            formatter,
            "\n {BLANK:pad$}--> {name}:{num}:{col}\
             \n {BLANK:pad$} {PIPE}\
             \n {num:>} {PIPE} {text}\
             \n {BLANK:pad$} {PIPE} {YELLOW}{underline:>align$}{RESET}\
             \n {BLANK:pad$} {PIPE}\n",
        )?;

        if let Some(help) = help {
            writeln!(formatter, "{BLANK:pad$} {EQUAL} help: {help}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Pointer;
    use crate::region::Region;

    #[test]
    fn test_pointer_second_line() {
        let pointer = Pointer::new("hello\nthere {{ name }}!", Region::new(12..22));

        assert_eq!(
            pointer,
            Pointer {
                line: 1,
                column: 6,
                length: 10,
                text: "there {{ name }}!".to_string(),
            }
        );
    }

    #[test]
    fn test_pointer_end_of_source() {
        let source = "{{ name }}";
        let pointer = Pointer::new(source, Region::new(source.len()..source.len()));

        assert_eq!(pointer.line, 0);
        assert_eq!(pointer.column, 10);
        assert_eq!(pointer.length, 1);
    }
}
