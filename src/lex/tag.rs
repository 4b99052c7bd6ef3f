use crate::region::Region;
use std::fmt::Display;

/// The leading character of a tag body, which decides what the tag does.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Sigil {
    /// No sigil, an escaped value: `{{name}}`.
    Value,
    /// An unescaped value: `{{{name}}}` or `{{&name}}`.
    Unescaped,
    /// An iterating section: `{{#name}}`.
    Section,
    /// A section that is rendered once: `{{?name}}`.
    Boolean,
    /// A section that is rendered when its view has no content: `{{^name}}`.
    Inverted,
    /// A partial: `{{>name}}`.
    Partial,
    /// A delimiter switch: `{{=<% %>=}}`.
    Delimiters,
    /// A comment: `{{!text}}`.
    Comment,
    /// A section close: `{{/name}}`.
    Close,
}

impl Sigil {
    /// Return the [`Sigil`] that `char` stands for, if it is one.
    pub fn from_char(char: char) -> Option<Self> {
        let sigil = match char {
            '/' => Self::Close,
            '!' => Self::Comment,
            '=' => Self::Delimiters,
            '>' => Self::Partial,
            '?' => Self::Boolean,
            '#' => Self::Section,
            '^' => Self::Inverted,
            '{' | '&' => Self::Unescaped,
            _ => return None,
        };

        Some(sigil)
    }
}

impl Display for Sigil {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sigil::Value => write!(f, "value"),
            Sigil::Unescaped => write!(f, "unescaped value"),
            Sigil::Section => write!(f, "section (#)"),
            Sigil::Boolean => write!(f, "boolean section (?)"),
            Sigil::Inverted => write!(f, "inverted section (^)"),
            Sigil::Partial => write!(f, "partial (>)"),
            Sigil::Delimiters => write!(f, "delimiters (=)"),
            Sigil::Comment => write!(f, "comment (!)"),
            Sigil::Close => write!(f, "close (/)"),
        }
    }
}

/// One tag read by the [`Lexer`][`super::Lexer`].
#[derive(Debug, PartialEq, Clone)]
pub struct Tag {
    pub sigil: Sigil,
    /// The body without its sigil and trailing sentinel, whitespace runs
    /// collapsed to single spaces. Comment and close tags keep theirs raw.
    pub body: String,
    /// Where the whole tag sits in the source, delimiters included.
    pub region: Region,
}

/// Trim the ends of `text` and collapse inner whitespace runs to one space.
pub fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::{collapse, Sigil};

    #[test]
    fn test_from_char() {
        assert_eq!(Sigil::from_char('&'), Some(Sigil::Unescaped));
        assert_eq!(Sigil::from_char('{'), Some(Sigil::Unescaped));
        assert_eq!(Sigil::from_char('?'), Some(Sigil::Boolean));
        assert_eq!(Sigil::from_char('a'), None);
        assert_eq!(Sigil::from_char('.'), None);
    }

    #[test]
    fn test_collapse() {
        assert_eq!(collapse("  a \t b\n\nc  "), "a b c");
        assert_eq!(collapse(""), "");
    }
}
