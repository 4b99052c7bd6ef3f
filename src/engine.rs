use crate::{
    log::Error,
    partials::Partials,
    pipe::Tee,
    render::render_into,
    view::View,
};
use std::fmt::Write;
use tracing::debug;

/// Facilitates rendering templates, and provides storage for partials.
///
/// An [`Engine`] is only read while rendering, so it may be shared by any
/// number of threads rendering at once.
#[derive(Debug, Default, Clone)]
pub struct Engine {
    /// Partials that this engine is aware of.
    partials: Partials,
    /// The deepest that sections, delimiter switches and partials may nest.
    max_depth: Option<usize>,
}

impl Engine {
    /// Create a new [`Engine`] with no partials and no depth limit.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given [`Partials`] table.
    ///
    /// Returns the [`Engine`], so additional methods may be chained.
    ///
    /// # Examples
    ///
    /// ```
    /// use vandyke::{Engine, Partials};
    ///
    /// let engine = Engine::new().with_partials(Partials::new().with_must("a", "b"));
    /// assert_eq!(engine.partials().get("a"), Some("b"));
    /// ```
    #[inline]
    pub fn with_partials(mut self, partials: Partials) -> Self {
        self.partials = partials;
        self
    }

    /// Limit how deeply sections, delimiter switches and partials may nest.
    ///
    /// Content nested deeper than the limit is skipped, which stops a partial
    /// that includes itself from recursing forever.
    ///
    /// Returns the [`Engine`], so additional methods may be chained.
    #[inline]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Return the [`Partials`] table.
    #[inline]
    pub fn partials(&self) -> &Partials {
        &self.partials
    }

    /// Return the [`Partials`] table, so partials may be added.
    #[inline]
    pub fn partials_mut(&mut self) -> &mut Partials {
        &mut self.partials
    }

    /// Render a template against the given [`View`].
    ///
    /// # Errors
    ///
    /// Rendering into a `String` does not fail. The `Result` is kept so that
    /// every render method reports errors the same way.
    ///
    /// # Examples
    ///
    /// ```
    /// use vandyke::{Engine, Store, View};
    ///
    /// let engine = Engine::new();
    /// let view = View::from(Store::new().with_must("name", "taylor"));
    ///
    /// assert_eq!(engine.render("hello, {{ name }}!", &view).unwrap(), "hello, taylor!");
    /// ```
    pub fn render(&self, template: &str, view: &View) -> Result<String, Error> {
        let mut buffer = String::with_capacity(template.len());
        self.render_to(template, view, &mut buffer)?;

        Ok(buffer)
    }

    /// Render a template, handing each fragment of output to `sink` as it is
    /// produced.
    ///
    /// Fragments arrive in document order and are never empty. The complete
    /// output is also returned.
    ///
    /// # Errors
    ///
    /// See [`Engine::render`].
    ///
    /// # Examples
    ///
    /// ```
    /// use vandyke::{Engine, Store, View};
    ///
    /// let view = View::from(Store::new().with_must("name", "taylor"));
    /// let mut fragments = Vec::new();
    /// let output = Engine::new()
    ///     .render_with("hi {{name}}!", &view, |fragment| fragments.push(fragment.to_string()))
    ///     .unwrap();
    ///
    /// assert_eq!(output, "hi taylor!");
    /// assert_eq!(fragments, vec!["hi ", "taylor", "!"]);
    /// ```
    pub fn render_with<F>(&self, template: &str, view: &View, sink: F) -> Result<String, Error>
    where
        F: FnMut(&str),
    {
        let mut buffer = String::with_capacity(template.len());
        self.render_to(template, view, &mut Tee::new(&mut buffer, sink))?;

        Ok(buffer)
    }

    /// Render a template into the given buffer.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] pointing at the part of the template that was
    /// being written when the buffer failed.
    pub fn render_to(&self, template: &str, view: &View, buffer: &mut dyn Write) -> Result<(), Error> {
        debug!(
            length = template.len(),
            partials = self.partials.len(),
            max_depth = ?self.max_depth,
            "rendering template"
        );

        render_into(template, view, &self.partials, self.max_depth, buffer)
    }
}
