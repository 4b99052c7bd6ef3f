use crate::log::{error_duplicate_partial, Error};
use std::collections::HashMap;

/// Provides storage for the named templates that `{{> name}}` includes.
///
/// A table is only read during rendering, so one table may serve any number
/// of renders at once.
#[derive(Debug, Default, Clone)]
pub struct Partials {
    data: HashMap<String, String>,
}

impl Partials {
    /// Create a new, empty [`Partials`] table.
    ///
    /// # Examples
    ///
    /// ```
    /// use vandyke::Partials;
    ///
    /// let partials = Partials::new();
    /// assert!(partials.is_empty());
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a named partial.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if a partial with the same name already exists.
    ///
    /// # Examples
    ///
    /// ```
    /// use vandyke::Partials;
    ///
    /// let mut partials = Partials::new();
    ///
    /// assert!(partials.insert("header", "Hi {{user}}").is_ok());
    /// assert!(partials.insert("header", "Hello {{user}}").is_err());
    /// ```
    pub fn insert<S, T>(&mut self, name: S, text: T) -> Result<(), Error>
    where
        S: Into<String>,
        T: Into<String>,
    {
        let name = name.into();
        if self.data.contains_key(&name) {
            return Err(error_duplicate_partial(&name));
        }
        self.data.insert(name, text.into());

        Ok(())
    }

    /// Insert a named partial, replacing any partial with the same name.
    #[inline]
    pub fn insert_must<S, T>(&mut self, name: S, text: T)
    where
        S: Into<String>,
        T: Into<String>,
    {
        self.data.insert(name.into(), text.into());
    }

    /// Insert a named partial.
    ///
    /// Returns the `Partials`, so additional methods may be chained.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if a partial with the same name already exists.
    #[inline]
    pub fn with<S, T>(mut self, name: S, text: T) -> Result<Self, Error>
    where
        S: Into<String>,
        T: Into<String>,
    {
        self.insert(name, text)?;

        Ok(self)
    }

    /// Insert a named partial, replacing any partial with the same name.
    ///
    /// Returns the `Partials`, so additional methods may be chained.
    ///
    /// # Examples
    ///
    /// ```
    /// use vandyke::Partials;
    ///
    /// let partials = Partials::new()
    ///     .with_must("header", "<h1>{{title}}</h1>")
    ///     .with_must("footer", "<p>{{copyright}}</p>");
    ///
    /// assert_eq!(partials.get("header"), Some("<h1>{{title}}</h1>"));
    /// ```
    #[inline]
    pub fn with_must<S, T>(mut self, name: S, text: T) -> Self
    where
        S: Into<String>,
        T: Into<String>,
    {
        self.insert_must(name, text);

        self
    }

    /// Return the text of the named partial, if any.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.data.get(name).map(String::as_str)
    }

    /// Return the stored name and text of the named partial, if any.
    #[inline]
    pub(crate) fn get_entry(&self, name: &str) -> Option<(&str, &str)> {
        self.data
            .get_key_value(name)
            .map(|(name, text)| (name.as_str(), text.as_str()))
    }

    /// Return the number of partials in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Return true if the table holds no partials.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
