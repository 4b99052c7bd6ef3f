//! VanDyke - Template Engine
//!
//! Renders logic-less, mustache style templates against a [`View`]: values,
//! sections, inverted and boolean sections, partials and switchable
//! delimiters. Templates are interpreted directly from their text, there is
//! no separate compile step.
//!
//! ```
//! use vandyke::{render, Partials, View};
//! use serde_json::json;
//!
//! let view = View::from(json!({ "items": ["a", "b", "c"] }));
//! let output = render("{{#items}}<{{.}}>{{/items}}", &view, &Partials::new());
//!
//! assert_eq!(output.unwrap(), "<a><b><c>");
//! ```
mod context;
mod engine;
mod escape;
mod format;
mod lex;
mod log;
mod partials;
mod pipe;
mod region;
mod render;
mod store;
mod syntax;
mod view;

pub use engine::Engine;
pub use escape::escape;
pub use log::{Error, Pointer, Visual};
pub use partials::Partials;
pub use region::Region;
pub use render::render;
pub use store::Store;
pub use view::{Mapping, Resolver, Scalar, View};
