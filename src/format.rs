use crate::view::{Scalar, View};
use std::fmt::{Display, Formatter, Result, Write};

/// The one place where a [`View`] becomes text.
///
/// - The absent value is empty text.
/// - Sequences are written as their elements separated by commas, with no
///   brackets or spaces, so nested sequences flatten into one list.
/// - Whole numbers are written without a fractional part, even when stored
///   as floats.
/// - Mappings are written as key/value pairs surrounded by curly braces.
/// - Resolvers are written as whatever [`Resolver::text`][`crate::Resolver::text`]
///   returns, or not at all.
impl Display for View {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write_view(f, self)
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(bool) => write!(f, "{bool}"),
            Scalar::Number(number) => match number.as_f64() {
                Some(float) if number.is_f64() && float.fract() == 0.0 && float.abs() < 1e21 => {
                    // Adding zero turns -0.0 into 0.
                    write!(f, "{:.0}", float + 0.0)
                }
                _ => write!(f, "{number}"),
            },
            Scalar::Text(text) => f.write_str(text),
        }
    }
}

/// Write the given [`View`] to the buffer.
fn write_view(buffer: &mut dyn Write, view: &View) -> Result {
    match view {
        View::Scalar(scalar) => write!(buffer, "{scalar}"),
        View::Sequence(items) => {
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    buffer.write_char(',')?;
                }
                write_view(buffer, item)?;
            }

            Ok(())
        }
        View::Mapping(fields) => {
            buffer.write_char('{')?;
            let mut iter = fields.iter();
            if let Some((key, value)) = iter.next() {
                write!(buffer, "{key}: ")?;
                write_view(buffer, value)?;
                for (key, value) in iter {
                    write!(buffer, ", {key}: ")?;
                    write_view(buffer, value)?;
                }
            }
            buffer.write_char('}')
        }
        View::Callable(resolver) => match resolver.text() {
            Some(text) => buffer.write_str(&text),
            None => Ok(()),
        },
    }
}

#[cfg(test)]
mod tests {
    use crate::view::View;
    use serde_json::json;

    #[test]
    fn test_scalars() {
        assert_eq!(View::null().to_string(), "");
        assert_eq!(View::from(true).to_string(), "true");
        assert_eq!(View::from(12).to_string(), "12");
        assert_eq!(View::from(1.5).to_string(), "1.5");
        assert_eq!(View::from("text").to_string(), "text");
    }

    #[test]
    fn test_sequence() {
        assert_eq!(View::from(json!([])).to_string(), "");
        assert_eq!(View::from(json!(["a", "b"])).to_string(), "a,b");
        assert_eq!(View::from(json!(["a", 1, null])).to_string(), "a,1,");
        assert_eq!(View::from(json!([[1, 2], [3], "x"])).to_string(), "1,2,3,x");
    }

    #[test]
    fn test_mapping() {
        let view = View::from(json!({ "b": [1, 2], "a": { "c": "d" } }));

        assert_eq!(view.to_string(), "{a: {c: d}, b: 1,2}");
    }

    #[test]
    fn test_whole_floats() {
        assert_eq!(View::from(json!(1.0)).to_string(), "1");
        assert_eq!(View::from(-3.0).to_string(), "-3");
        assert_eq!(View::from(-0.0).to_string(), "0");
        assert_eq!(View::from(2.25).to_string(), "2.25");
        assert_eq!(View::from(1e20).to_string(), "100000000000000000000");
        assert_eq!(View::from(1e21).to_string(), "1e21");
    }

    #[test]
    fn test_callable_without_text() {
        assert_eq!(View::callable(|_: &str| View::from("x")).to_string(), "");
    }
}
