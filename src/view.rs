use crate::log::{error_serialize, Error};
use serde::Serialize;
use serde_json::{Number, Value};
use std::{collections::BTreeMap, fmt::Debug, sync::Arc};

/// The named fields of a [`View::Mapping`].
pub type Mapping = BTreeMap<String, View>;

/// The data a template is rendered against.
///
/// Views nest: a [`Mapping`] holds named views, a sequence holds ordered
/// views, and a [`Resolver`] produces views on demand for any selector.
/// Cloning a `View` never copies the data behind a mapping or sequence.
///
/// # Examples
///
/// ```
/// use vandyke::View;
/// use serde_json::json;
///
/// let view = View::from(json!({ "user": { "name": "taylor" } }));
///
/// assert_eq!(view.lookup("user.name"), View::from("taylor"));
/// assert!(!view.lookup("user.age").has_content());
/// ```
#[derive(Clone)]
pub enum View {
    /// Named fields.
    Mapping(Arc<Mapping>),
    /// Ordered, indexable elements.
    Sequence(Arc<Vec<View>>),
    /// A single primitive value.
    Scalar(Scalar),
    /// A resolver that owns the interpretation of every selector.
    Callable(Arc<dyn Resolver>),
}

/// A primitive [`View`].
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// The absent value.
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
}

/// Describes a type that resolves dotted selectors to views by itself.
///
/// A resolver receives the complete selector, `a.b.c` included, and decides
/// what it means. It always answers with another [`View`], never with text;
/// turning a view into text happens in exactly one place, the `Display`
/// implementation of `View`.
///
/// Any function matching the signature of `resolve` is a `Resolver`.
///
/// # Examples
///
/// ```
/// use vandyke::{render, Partials, View};
///
/// let shout = View::callable(|selector: &str| View::from(selector.to_uppercase()));
/// let output = render("{{ hello.world }}", &shout, &Partials::new());
///
/// assert_eq!(output.unwrap(), "HELLO.WORLD");
/// ```
pub trait Resolver: Send + Sync {
    /// Return the view that `selector` refers to.
    fn resolve(&self, selector: &str) -> View;

    /// Return the text this resolver stands for when it is substituted
    /// directly into a template.
    ///
    /// Resolvers are not text by default, so substituting one emits nothing.
    fn text(&self) -> Option<String> {
        None
    }
}

impl<F> Resolver for F
where
    F: Fn(&str) -> View + Send + Sync,
{
    fn resolve(&self, selector: &str) -> View {
        self(selector)
    }
}

impl View {
    /// Return the absent view.
    #[inline]
    pub fn null() -> Self {
        View::Scalar(Scalar::Null)
    }

    /// Return a view of empty text, the result of resolving a selector that
    /// matches nothing.
    #[inline]
    pub fn empty() -> Self {
        View::Scalar(Scalar::Text(String::new()))
    }

    /// Wrap a [`Resolver`] in a view.
    #[inline]
    pub fn callable<R>(resolver: R) -> Self
    where
        R: Resolver + 'static,
    {
        View::Callable(Arc::new(resolver))
    }

    /// Convert any serializable value into a view.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the serialization fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use vandyke::View;
    /// use std::collections::HashMap;
    ///
    /// let data = HashMap::from([("name", "taylor")]);
    /// let view = View::from_serialize(&data).unwrap();
    ///
    /// assert_eq!(view.lookup("name"), View::from("taylor"));
    /// ```
    pub fn from_serialize<T>(value: &T) -> Result<Self, Error>
    where
        T: Serialize + ?Sized,
    {
        serde_json::to_value(value)
            .map(View::from)
            .map_err(error_serialize)
    }

    /// Return true if the view has content.
    ///
    /// Empty text, zero, `false`, the absent value and empty sequences have
    /// no content. Mappings and resolvers expose no length and always have
    /// content.
    pub fn has_content(&self) -> bool {
        match self {
            View::Scalar(Scalar::Null) => false,
            View::Scalar(Scalar::Bool(bool)) => *bool,
            View::Scalar(Scalar::Number(number)) => number
                .as_f64()
                .map_or(true, |float| float != 0.0 && !float.is_nan()),
            View::Scalar(Scalar::Text(text)) => !text.is_empty(),
            View::Sequence(items) => !items.is_empty(),
            View::Mapping(_) | View::Callable(_) => true,
        }
    }

    /// Return the view that the dotted `selector` refers to within this view.
    ///
    /// A [`View::Callable`] is handed the whole selector. Any other view is
    /// walked one segment at a time: a segment names a field of a mapping, or
    /// the index of an element in a sequence. Empty segments are skipped, so
    /// `"."` refers to the view itself. The walk stops at the first segment
    /// that leads nowhere and the absent view is returned.
    pub fn lookup(&self, selector: &str) -> View {
        if let View::Callable(resolver) = self {
            return resolver.resolve(selector);
        }

        let mut current = self;
        for segment in selector.split('.').filter(|s| !s.is_empty()) {
            match current.get(segment) {
                Some(next) => current = next,
                None => return View::null(),
            }
        }

        current.clone()
    }

    /// Return the direct child of this view named by `segment`, if any.
    fn get(&self, segment: &str) -> Option<&View> {
        match self {
            View::Mapping(fields) => fields.get(segment),
            View::Sequence(items) => segment
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get(index)),
            _ => None,
        }
    }

    /// Return the elements of the view, if it is a sequence.
    pub fn as_sequence(&self) -> Option<&[View]> {
        match self {
            View::Sequence(items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

impl Debug for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            View::Mapping(fields) => f.debug_map().entries(fields.iter()).finish(),
            View::Sequence(items) => f.debug_list().entries(items.iter()).finish(),
            View::Scalar(scalar) => Debug::fmt(scalar, f),
            View::Callable(resolver) => {
                write!(f, "Callable({:p})", Arc::as_ptr(resolver) as *const ())
            }
        }
    }
}

impl PartialEq for View {
    /// Resolvers are equal only to themselves.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (View::Mapping(left), View::Mapping(right)) => left == right,
            (View::Sequence(left), View::Sequence(right)) => left == right,
            (View::Scalar(left), View::Scalar(right)) => left == right,
            (View::Callable(left), View::Callable(right)) => {
                Arc::as_ptr(left) as *const () == Arc::as_ptr(right) as *const ()
            }
            _ => false,
        }
    }
}

impl Default for View {
    fn default() -> Self {
        View::null()
    }
}

impl From<Value> for View {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => View::null(),
            Value::Bool(bool) => View::Scalar(Scalar::Bool(bool)),
            Value::Number(number) => View::Scalar(Scalar::Number(number)),
            Value::String(string) => View::Scalar(Scalar::Text(string)),
            Value::Array(array) => array.into_iter().map(View::from).collect(),
            Value::Object(object) => object
                .into_iter()
                .map(|(key, value)| (key, View::from(value)))
                .collect(),
        }
    }
}

impl From<Scalar> for View {
    fn from(value: Scalar) -> Self {
        View::Scalar(value)
    }
}

impl From<&str> for View {
    fn from(value: &str) -> Self {
        View::Scalar(Scalar::Text(value.to_string()))
    }
}

impl From<String> for View {
    fn from(value: String) -> Self {
        View::Scalar(Scalar::Text(value))
    }
}

impl From<bool> for View {
    fn from(value: bool) -> Self {
        View::Scalar(Scalar::Bool(value))
    }
}

macro_rules! view_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for View {
                fn from(value: $t) -> Self {
                    View::Scalar(Scalar::Number(Number::from(value)))
                }
            }
        )*
    };
}

view_from_integer!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl From<f64> for View {
    /// Non-finite floats become the absent view.
    fn from(value: f64) -> Self {
        Number::from_f64(value)
            .map(|number| View::Scalar(Scalar::Number(number)))
            .unwrap_or_default()
    }
}

impl<T> From<Vec<T>> for View
where
    T: Into<View>,
{
    fn from(value: Vec<T>) -> Self {
        value.into_iter().map(Into::into).collect()
    }
}

impl<T> From<Option<T>> for View
where
    T: Into<View>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

impl FromIterator<View> for View {
    /// Collect into a [`View::Sequence`].
    fn from_iter<I: IntoIterator<Item = View>>(iter: I) -> Self {
        View::Sequence(Arc::new(iter.into_iter().collect()))
    }
}

impl<K> FromIterator<(K, View)> for View
where
    K: Into<String>,
{
    /// Collect into a [`View::Mapping`].
    fn from_iter<I: IntoIterator<Item = (K, View)>>(iter: I) -> Self {
        View::Mapping(Arc::new(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        ))
    }
}
