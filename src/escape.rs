use std::borrow::Cow;

/// Escape text for insertion into HTML.
///
/// `&`, `"`, `<` and `>` are replaced with their entities in a single left
/// to right pass. Single quotes are left alone. Text that needs no escaping
/// is returned as-is without allocating.
///
/// # Examples
///
/// ```
/// use vandyke::escape;
///
/// assert_eq!(escape(r#"<&"'>"#), "&lt;&amp;&quot;'&gt;");
/// assert_eq!(escape("plain"), "plain");
/// ```
pub fn escape(text: &str) -> Cow<'_, str> {
    let Some(first) = text.find(['&', '"', '<', '>']) else {
        return Cow::Borrowed(text);
    };

    let mut buffer = String::with_capacity(text.len() + 8);
    buffer.push_str(&text[..first]);
    for char in text[first..].chars() {
        match char {
            '&' => buffer.push_str("&amp;"),
            '"' => buffer.push_str("&quot;"),
            '<' => buffer.push_str("&lt;"),
            '>' => buffer.push_str("&gt;"),
            _ => buffer.push(char),
        }
    }

    Cow::Owned(buffer)
}
