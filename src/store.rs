use crate::{
    log::Error,
    view::{Mapping, View},
};
use serde::Serialize;
use std::sync::Arc;

/// Builds a [`View::Mapping`] one field at a time.
///
/// # Examples
///
/// ```
/// use vandyke::{render, Partials, Store, View};
///
/// let view = View::from(
///     Store::new()
///         .with_must("name", "taylor")
///         .with_must("tags", vec!["admin", "staff"]),
/// );
/// let output = render("{{name}}:{{#tags}} {{.}}{{/tags}}", &view, &Partials::new());
///
/// assert_eq!(output.unwrap(), "taylor: admin staff");
/// ```
#[derive(Debug, Default, Clone)]
pub struct Store {
    data: Mapping,
}

impl Store {
    /// Create a new, empty [`Store`].
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize the value and insert it under the given key.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the serialization fails.
    pub fn insert<S, T>(&mut self, key: S, value: T) -> Result<(), Error>
    where
        S: Into<String>,
        T: Serialize,
    {
        let view = View::from_serialize(&value)?;
        self.data.insert(key.into(), view);

        Ok(())
    }

    /// Serialize the value and insert it under the given key.
    ///
    /// # Panics
    ///
    /// Panics if the serialization fails.
    #[inline]
    pub fn insert_must<S, T>(&mut self, key: S, value: T)
    where
        S: Into<String>,
        T: Serialize,
    {
        if let Err(error) = self.insert(key, value) {
            panic!("{error}");
        }
    }

    /// Insert an already built [`View`], such as a callable, under the given key.
    #[inline]
    pub fn insert_view<S>(&mut self, key: S, view: View)
    where
        S: Into<String>,
    {
        self.data.insert(key.into(), view);
    }

    /// Serialize the value and insert it under the given key.
    ///
    /// Returns the `Store`, so additional methods may be chained.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the serialization fails.
    #[inline]
    pub fn with<S, T>(mut self, key: S, value: T) -> Result<Self, Error>
    where
        S: Into<String>,
        T: Serialize,
    {
        self.insert(key, value)?;

        Ok(self)
    }

    /// Serialize the value and insert it under the given key.
    ///
    /// Returns the `Store`, so additional methods may be chained.
    ///
    /// # Panics
    ///
    /// Panics if the serialization fails.
    #[inline]
    pub fn with_must<S, T>(mut self, key: S, value: T) -> Self
    where
        S: Into<String>,
        T: Serialize,
    {
        self.insert_must(key, value);

        self
    }

    /// Insert an already built [`View`] under the given key.
    ///
    /// Returns the `Store`, so additional methods may be chained.
    #[inline]
    pub fn with_view<S>(mut self, key: S, view: View) -> Self
    where
        S: Into<String>,
    {
        self.insert_view(key, view);

        self
    }

    /// Return the view stored under the given key, if any.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&View> {
        self.data.get(key)
    }
}

impl From<Store> for View {
    fn from(store: Store) -> Self {
        View::Mapping(Arc::new(store.data))
    }
}
