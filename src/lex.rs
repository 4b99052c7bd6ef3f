pub mod tag;

use crate::{region::Region, syntax::Delimiters};
use regex::Regex;
use tag::{collapse, Sigil, Tag};

/// Reads tags out of one [`Region`] of a template.
///
/// The cursor only moves forward and never leaves the region. Searching is
/// stateless: every search starts from the cursor it is given.
pub struct Lexer<'source> {
    /// Reference to the source text.
    source: &'source str,
    /// Position within source, where the next search begins.
    cursor: usize,
    /// Tags must end at or before this position to be read.
    end: usize,
    delimiters: &'source Delimiters,
}

impl<'source> Lexer<'source> {
    /// Create a new [`Lexer`] over the given region of source.
    #[inline]
    pub fn new(source: &'source str, region: Region, delimiters: &'source Delimiters) -> Self {
        Self {
            source,
            cursor: region.begin,
            end: region.end,
            delimiters,
        }
    }

    /// Return the region of literal text before the next tag, and the tag.
    ///
    /// Returns `None` when no further tag lies entirely inside the region,
    /// leaving the cursor where it was.
    pub fn next(&mut self) -> Option<(Region, Tag)> {
        let source = self.source;
        let delimiters = self.delimiters;

        let captures = delimiters.tag().captures_at(source, self.cursor)?;
        let whole = captures.get(0)?;
        if !self.remaining().contains(Region::new(whole.range())) {
            return None;
        }

        let literal = Region::new(self.cursor..whole.start());
        self.cursor = whole.end();

        let body = captures.get(1).map_or("", |m| m.as_str());
        let tag = self.read(body, Region::new(whole.range()));

        Some((literal, tag))
    }

    /// Return the position of the cursor.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Return the end of the region the [`Lexer`] reads.
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Return the part of the region that has not been read yet.
    #[inline]
    pub fn remaining(&self) -> Region {
        Region::new(self.cursor..self.end)
    }

    /// Move the cursor forward to `position`, but never backward and never
    /// past the end of the region.
    #[inline]
    pub fn seek(&mut self, position: usize) {
        self.cursor = position.clamp(self.cursor, self.end);
    }

    /// Return the first match of `pattern` at or after the cursor, if it lies
    /// entirely within the region.
    pub fn find(&self, pattern: &Regex) -> Option<Region> {
        pattern
            .find_at(self.source, self.cursor)
            .map(|m| Region::new(m.range()))
            .filter(|found| self.remaining().contains(*found))
    }

    /// Build a [`Tag`] from the raw body of a tag that was just read.
    fn read(&mut self, body: &str, region: Region) -> Tag {
        let mut chars = body.chars();
        let first = chars.next();
        let sigil = first.and_then(Sigil::from_char).unwrap_or(Sigil::Value);
        let rest = chars.as_str();

        let body = match (sigil, first) {
            (Sigil::Value, _) => collapse(body),
            (Sigil::Comment | Sigil::Close, _) => rest.to_string(),
            (Sigil::Delimiters, _) => collapse(self.trim_trailing(rest, '=')),
            (Sigil::Unescaped, Some('{')) => collapse(self.trim_trailing(rest, '}')),
            _ => collapse(rest),
        };

        Tag {
            sigil,
            body,
            region,
        }
    }

    /// Remove the `sentinel` that pairs with the sigil from the end of `text`.
    ///
    /// When the sentinel is not inside the body it may sit right after the
    /// close delimiter that was matched, as in `{{{name}}}`, where the match
    /// ends before the last brace. The cursor then moves past it.
    fn trim_trailing<'a>(&mut self, text: &'a str, sentinel: char) -> &'a str {
        if let Some(stripped) = text.strip_suffix(sentinel) {
            return stripped;
        }

        let close = self.delimiters.close();
        let Some(begin) = self.cursor.checked_sub(close.len()) else {
            return text;
        };
        let end = self.cursor + sentinel.len_utf8();
        let trailing = end <= self.end
            && self
                .source
                .get(begin..end)
                .is_some_and(|window| window.strip_prefix(sentinel) == Some(close));
        if trailing {
            self.cursor = end;
        }

        text
    }
}
