use crate::view::View;
use std::{iter::successors, rc::Rc};

/// The stack of views a template is rendered against.
///
/// A [`Context`] is a handle to the innermost frame of a persistent, singly
/// linked stack. Pushing returns a new handle and leaves the old one intact,
/// so evaluators for sibling sections share every frame below their own.
#[derive(Clone, Default)]
pub struct Context {
    top: Option<Rc<Frame>>,
}

struct Frame {
    view: View,
    previous: Context,
}

impl Context {
    /// Create a new [`Context`] holding the given root view.
    #[inline]
    pub fn new(view: View) -> Self {
        Self::default().push(view)
    }

    /// Return a [`Context`] with `view` as its innermost frame.
    ///
    /// A view without content is never pushed, the current context is
    /// returned unchanged instead.
    pub fn push(&self, view: View) -> Self {
        if !view.has_content() {
            return self.clone();
        }

        Self {
            top: Some(Rc::new(Frame {
                view,
                previous: self.clone(),
            })),
        }
    }

    /// Return the views on the stack, innermost first.
    pub fn views(&self) -> impl Iterator<Item = &View> {
        successors(self.top.as_deref(), |frame| frame.previous.top.as_deref())
            .map(|frame| &frame.view)
    }

    /// Return the first view with content that `selector` refers to, searching
    /// frames from innermost to outermost.
    ///
    /// An empty selector refers to the view of each frame itself. When no
    /// frame produces content, a view of empty text is returned.
    pub fn resolve(&self, selector: &str) -> View {
        for view in self.views() {
            let candidate = if selector.is_empty() {
                view.clone()
            } else {
                view.lookup(selector)
            };
            if candidate.has_content() {
                return candidate;
            }
        }

        View::empty()
    }
}
