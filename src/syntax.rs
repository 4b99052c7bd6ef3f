//! A template finds its tags with a pair of delimiters, `{{` and `}}` unless
//! the template switches them. This module defines [`Delimiters`], which
//! turns such a pair into the patterns the lexer and the section evaluator
//! search with.

use regex::Regex;
use std::{cell::RefCell, collections::HashMap, rc::Rc, sync::LazyLock};

const DEFAULT_OPEN: &str = "{{";
const DEFAULT_CLOSE: &str = "}}";

static DEFAULT: LazyLock<Delimiters> = LazyLock::new(|| {
    Delimiters::new(DEFAULT_OPEN, DEFAULT_CLOSE).expect("default delimiters must compile")
});

/// An open and close delimiter pair along with the compiled tag pattern.
#[derive(Debug, Clone)]
pub struct Delimiters {
    open: String,
    close: String,
    /// Matches one whole tag, capturing the body without the whitespace
    /// that surrounds it.
    tag: Regex,
}

impl Delimiters {
    /// Create a new pair of [`Delimiters`].
    ///
    /// A space inside either delimiter matches one or more whitespace
    /// characters. Returns `None` when either delimiter is empty.
    pub fn new(open: &str, close: &str) -> Option<Self> {
        if open.is_empty() || close.is_empty() {
            return None;
        }
        let tag = Regex::new(&format!(
            r"{}\s*((?s:.*?))\s*{}",
            quote(open),
            quote(close)
        ))
        .ok()?;

        Some(Self {
            open: open.to_string(),
            close: close.to_string(),
            tag,
        })
    }

    /// Return the closing delimiter.
    #[inline]
    pub fn close(&self) -> &str {
        &self.close
    }

    /// Return the pattern matching a single tag.
    #[inline]
    pub fn tag(&self) -> &Regex {
        &self.tag
    }

    /// Return a pattern matching the tag that closes the section named `id`,
    /// such as `{{/id}}`.
    pub fn section_end(&self, id: &str) -> Option<Regex> {
        Regex::new(&format!(
            r"{}\s*/\s*{}\s*{}",
            quote(&self.open),
            quote(id),
            quote(&self.close)
        ))
        .ok()
    }

    /// Return a pattern matching the tag that ends a delimiter switch to
    /// `pair`, written with these delimiters.
    ///
    /// Both `{{/<% %>}}` and a repeat of the switching tag, `{{=<% %>=}}`,
    /// are accepted.
    pub fn switch_end(&self, pair: &str) -> Option<Regex> {
        let pair = quote(pair);
        Regex::new(&format!(
            r"{open}\s*(?:/\s*{pair}|=\s*{pair}\s*=?)\s*{close}",
            open = quote(&self.open),
            close = quote(&self.close),
        ))
        .ok()
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        DEFAULT.clone()
    }
}

/// Identifies one compiled pattern within a [`Patterns`] cache.
#[derive(Debug, PartialEq, Eq, Hash)]
enum Key {
    Delimiters(String, String),
    SectionEnd { open: String, close: String, id: String },
    SwitchEnd { open: String, close: String, pair: String },
}

/// Caches every pattern compiled during one render.
///
/// Sections inside a loop ask for the same close pattern once per element,
/// and partials ask for the default delimiters once per inclusion. Each is
/// compiled on first use and shared through `Rc` afterwards, so a cached
/// `Regex` also keeps its search cache warm.
#[derive(Debug)]
pub struct Patterns {
    default: Rc<Delimiters>,
    delimiters: RefCell<HashMap<Key, Option<Rc<Delimiters>>>>,
    ends: RefCell<HashMap<Key, Option<Rc<Regex>>>>,
}

impl Patterns {
    /// Create a new, empty [`Patterns`] cache.
    pub fn new() -> Self {
        Self {
            default: Rc::new(Delimiters::default()),
            delimiters: RefCell::default(),
            ends: RefCell::default(),
        }
    }

    /// Return the default `{{` `}}` [`Delimiters`].
    #[inline]
    pub fn default_delimiters(&self) -> Rc<Delimiters> {
        Rc::clone(&self.default)
    }

    /// Return the [`Delimiters`] for `open` and `close`, see [`Delimiters::new`].
    pub fn delimiters(&self, open: &str, close: &str) -> Option<Rc<Delimiters>> {
        let key = Key::Delimiters(open.to_string(), close.to_string());

        self.delimiters
            .borrow_mut()
            .entry(key)
            .or_insert_with(|| Delimiters::new(open, close).map(Rc::new))
            .clone()
    }

    /// Return the pattern closing the section `id`, see [`Delimiters::section_end`].
    pub fn section_end(&self, delimiters: &Delimiters, id: &str) -> Option<Rc<Regex>> {
        let key = Key::SectionEnd {
            open: delimiters.open.clone(),
            close: delimiters.close.clone(),
            id: id.to_string(),
        };

        self.end(key, || delimiters.section_end(id))
    }

    /// Return the pattern ending a switch to `pair`, see [`Delimiters::switch_end`].
    pub fn switch_end(&self, delimiters: &Delimiters, pair: &str) -> Option<Rc<Regex>> {
        let key = Key::SwitchEnd {
            open: delimiters.open.clone(),
            close: delimiters.close.clone(),
            pair: pair.to_string(),
        };

        self.end(key, || delimiters.switch_end(pair))
    }

    fn end<F>(&self, key: Key, compile: F) -> Option<Rc<Regex>>
    where
        F: FnOnce() -> Option<Regex>,
    {
        self.ends
            .borrow_mut()
            .entry(key)
            .or_insert_with(|| compile().map(Rc::new))
            .clone()
    }

    /// Return the number of patterns compiled so far.
    #[cfg(test)]
    fn len(&self) -> usize {
        self.delimiters.borrow().len() + self.ends.borrow().len()
    }
}

impl Default for Patterns {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape text for literal use in a pattern, letting every space match a
/// run of whitespace.
fn quote(text: &str) -> String {
    regex::escape(text).replace(' ', r"\s+")
}
