use crate::{
    context::Context,
    lex::{
        tag::{Sigil, Tag},
        Lexer,
    },
    log::{error_write, Error},
    partials::Partials,
    pipe::Pipe,
    region::Region,
    syntax::{Delimiters, Patterns},
    view::View,
};
use std::{fmt::Write, rc::Rc};
use tracing::{debug, trace, warn};

/// Render a template.
///
/// Provides a shortcut to render a template against a view and a table of
/// partials when no further configuration is needed. Create an
/// [`Engine`][`crate::Engine`] to limit recursion depth or to stream output.
///
/// Rendering does not fail because of the template or the data: names that
/// resolve to nothing, missing partials and malformed tags produce no output.
///
/// # Errors
///
/// Returns an [`Error`] only if writing the output fails, which does not
/// happen when rendering to a `String`.
///
/// # Examples
///
/// ```
/// use vandyke::{render, Partials, View};
/// use serde_json::json;
///
/// let partials = Partials::new().with_must("header", "Hi {{user}}");
/// let view = View::from(json!({ "user": "Sam" }));
///
/// assert_eq!(render("{{>header}}!", &view, &partials).unwrap(), "Hi Sam!");
/// ```
pub fn render(template: &str, view: &View, partials: &Partials) -> Result<String, Error> {
    let mut buffer = String::with_capacity(template.len());
    render_into(template, view, partials, None, &mut buffer)?;

    Ok(buffer)
}

/// Render a template into the given buffer.
pub(crate) fn render_into(
    template: &str,
    view: &View,
    partials: &Partials,
    max_depth: Option<usize>,
    buffer: &mut dyn Write,
) -> Result<(), Error> {
    let mut pipe = Pipe::new(buffer);
    let patterns = Patterns::new();
    let renderer = Renderer {
        source: template,
        name: None,
        delimiters: patterns.default_delimiters(),
        patterns: &patterns,
        context: Context::new(view.clone()),
        partials,
        max_depth,
        depth: 0,
    };
    renderer.render(Region::new(0..template.len()), &mut pipe)?;

    Ok(())
}

/// Evaluates one region of one template with one pair of delimiters and one
/// context.
///
/// Sections, delimiter switches and partials each spawn a child `Renderer`
/// for their own region. Children write to the same [`Pipe`] as their parent.
struct Renderer<'source> {
    /// The template being rendered.
    source: &'source str,
    /// The name of the partial being rendered, `None` for the top level.
    name: Option<&'source str>,
    delimiters: Rc<Delimiters>,
    /// Patterns compiled so far, shared by every renderer of one render.
    patterns: &'source Patterns,
    context: Context,
    partials: &'source Partials,
    max_depth: Option<usize>,
    /// How many renderers enclose this one.
    depth: usize,
}

impl<'source> Renderer<'source> {
    /// Render the given [`Region`] of the template.
    ///
    /// Returns the position where rendering stopped, which is always the end
    /// of the region.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if writing to the [`Pipe`] fails.
    fn render(&self, region: Region, pipe: &mut Pipe) -> Result<usize, Error> {
        let mut lexer = Lexer::new(self.source, region, &self.delimiters);

        while let Some((literal, tag)) = lexer.next() {
            self.write(pipe, &self.source[literal], literal, false)?;
            trace!(sigil = %tag.sigil, body = %tag.body, "rendering tag");

            match tag.sigil {
                Sigil::Close | Sigil::Comment => continue,
                Sigil::Delimiters => self.render_delimiters(&tag, &mut lexer, pipe)?,
                Sigil::Partial => self.render_partial(&tag, pipe)?,
                Sigil::Section => self.render_section(&tag, &mut lexer, pipe)?,
                Sigil::Boolean => self.render_boolean_section(&tag, &mut lexer, pipe)?,
                Sigil::Inverted => self.render_inverted_section(&tag, &mut lexer, pipe)?,
                Sigil::Unescaped => self.render_value(&tag, false, pipe)?,
                Sigil::Value => self.render_value(&tag, true, pipe)?,
            }
        }

        let rest = lexer.remaining();
        self.write(pipe, &self.source[rest], rest, false)?;

        Ok(rest.end)
    }

    /// Render a `{{#name}}` section: once per element when `name` resolves to
    /// a sequence, once with the whole view otherwise, never when it has no
    /// content.
    fn render_section(&self, tag: &Tag, lexer: &mut Lexer, pipe: &mut Pipe) -> Result<(), Error> {
        let (body, resume) = self.find_section_end(&tag.body, lexer);
        let view = self.context.resolve(&tag.body);

        if view.has_content() {
            if let Some(items) = view.as_sequence() {
                for item in items {
                    if let Some(child) = self.child(self.context.push(item.clone())) {
                        child.render(body, pipe)?;
                    }
                }
            } else if let Some(child) = self.child(self.context.push(view.clone())) {
                child.render(body, pipe)?;
            }
        }
        lexer.seek(resume);

        Ok(())
    }

    /// Render a `{{?name}}` section exactly once when `name` has content, with
    /// the whole view pushed even when it is a sequence.
    fn render_boolean_section(
        &self,
        tag: &Tag,
        lexer: &mut Lexer,
        pipe: &mut Pipe,
    ) -> Result<(), Error> {
        let (body, resume) = self.find_section_end(&tag.body, lexer);
        let view = self.context.resolve(&tag.body);

        if view.has_content() {
            if let Some(child) = self.child(self.context.push(view)) {
                child.render(body, pipe)?;
            }
        }
        lexer.seek(resume);

        Ok(())
    }

    /// Render a `{{^name}}` section when `name` has no content.
    ///
    /// The body is rendered by this same renderer, narrowed to the body.
    fn render_inverted_section(
        &self,
        tag: &Tag,
        lexer: &mut Lexer,
        pipe: &mut Pipe,
    ) -> Result<(), Error> {
        let (body, resume) = self.find_section_end(&tag.body, lexer);

        if !self.context.resolve(&tag.body).has_content() {
            self.render(body, pipe)?;
        }
        lexer.seek(resume);

        Ok(())
    }

    /// Return the region of a section body that starts at the cursor, and the
    /// position to resume at after the section.
    ///
    /// The first close tag for `id` ends the section, even if a section of the
    /// same name was opened inside it. Without a close tag the section runs
    /// to the end of the region.
    fn find_section_end(&self, id: &str, lexer: &Lexer) -> (Region, usize) {
        let end = self
            .patterns
            .section_end(&self.delimiters, id)
            .and_then(|pattern| lexer.find(&pattern));

        match end {
            Some(close) => (Region::new(lexer.cursor()..close.begin), close.end),
            None => {
                debug!(section = id, "section is not closed, it runs to the end of its region");
                (lexer.remaining(), lexer.end())
            }
        }
    }

    /// Switch delimiters for the text following a `{{=<% %>=}}` tag.
    ///
    /// The switch lasts until a tag written with the current delimiters that
    /// names the same pair, `{{/<% %>}}` or `{{=<% %>=}}`, or else to the end
    /// of the region. A body that is not exactly two delimiters is ignored.
    fn render_delimiters(
        &self,
        tag: &Tag,
        lexer: &mut Lexer,
        pipe: &mut Pipe,
    ) -> Result<(), Error> {
        let pair: Vec<&str> = tag.body.split(' ').collect();
        let [open, close] = pair.as_slice() else {
            debug!(body = %tag.body, "ignoring delimiter tag without exactly two delimiters");
            return Ok(());
        };
        let Some(delimiters) = self.patterns.delimiters(open, close) else {
            debug!(body = %tag.body, "ignoring unusable delimiters");
            return Ok(());
        };

        let end = self
            .patterns
            .switch_end(&self.delimiters, &tag.body)
            .and_then(|pattern| lexer.find(&pattern));
        let (body, resume) = match end {
            Some(marker) => (Region::new(lexer.cursor()..marker.begin), marker.end),
            None => {
                debug!(pair = %tag.body, "delimiter switch is not closed, it runs to the end of its region");
                (lexer.remaining(), lexer.end())
            }
        };

        let Some(mut child) = self.child(self.context.clone()) else {
            lexer.seek(resume);
            return Ok(());
        };
        child.delimiters = delimiters;
        let stopped = child.render(body, pipe)?;
        lexer.seek(if end.is_some() { resume } else { stopped });

        Ok(())
    }

    /// Render the partial named by a `{{>name}}` tag, as a template of its own
    /// with default delimiters.
    ///
    /// When `name` also resolves to a view with content, that view is pushed
    /// for the partial. A missing partial renders nothing.
    fn render_partial(&self, tag: &Tag, pipe: &mut Pipe) -> Result<(), Error> {
        let Some((name, text)) = self.partials.get_entry(&tag.body) else {
            debug!(partial = %tag.body, "partial not found");
            return Ok(());
        };

        let context = self.context.push(self.context.resolve(name));
        let Some(mut child) = self.child(context) else {
            return Ok(());
        };
        child.source = text;
        child.name = Some(name);
        child.delimiters = self.patterns.default_delimiters();
        child.render(Region::new(0..text.len()), pipe)?;

        Ok(())
    }

    /// Write the text of the view that a value tag resolves to.
    fn render_value(&self, tag: &Tag, quote: bool, pipe: &mut Pipe) -> Result<(), Error> {
        let text = self.context.resolve(&tag.body).to_string();

        self.write(pipe, &text, tag.region, quote)
    }

    /// Return a child [`Renderer`] that shares this one's template, delimiters
    /// and partials, but renders with the given context.
    ///
    /// Returns `None` when the child would be nested deeper than allowed.
    fn child(&self, context: Context) -> Option<Renderer<'source>> {
        let depth = self.depth + 1;
        if self.max_depth.is_some_and(|max| depth > max) {
            warn!(
                depth,
                partial = self.name.unwrap_or_default(),
                "maximum depth exceeded, skipping nested content"
            );
            return None;
        }

        Some(Renderer {
            source: self.source,
            name: self.name,
            delimiters: Rc::clone(&self.delimiters),
            patterns: self.patterns,
            context,
            partials: self.partials,
            max_depth: self.max_depth,
            depth,
        })
    }

    /// Write text produced by the given [`Region`] of the template.
    fn write(&self, pipe: &mut Pipe, text: &str, region: Region, quote: bool) -> Result<(), Error> {
        pipe.write_text(text, quote)
            .map_err(|_| error_write(self.source, region, self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::render;
    use crate::{partials::Partials, view::View, Store};
    use serde_json::json;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    fn helper_render(template: &str, view: serde_json::Value) -> String {
        render(template, &View::from(view), &Partials::new()).unwrap()
    }

    #[test]
    fn test_render_raw() {
        let text = "hello there, no tags { here } }}";

        assert_eq!(helper_render(text, json!({})), text);
        assert_eq!(helper_render("", json!({})), "");
    }

    #[test]
    fn test_render_value() {
        assert_eq!(
            helper_render("hello there, {{ name }}!", json!({ "name": "taylor" })),
            "hello there, taylor!"
        );
    }

    #[test]
    fn test_render_escaping() {
        let view = json!({ "name": "<&\"'>" });

        assert_eq!(helper_render("{{name}}", view.clone()), "&lt;&amp;&quot;'&gt;");
        assert_eq!(helper_render("{{{name}}}", view.clone()), "<&\"'>");
        assert_eq!(helper_render("{{& name}}", view), "<&\"'>");
    }

    #[test]
    fn test_render_missing_value() {
        assert_eq!(helper_render("[{{missing}}]", json!({})), "[]");
        assert_eq!(helper_render("[{{a.b.c}}]", json!({ "a": {} })), "[]");
    }

    #[test]
    fn test_render_falsy_values_are_empty() {
        let view = json!({ "zero": 0, "no": false, "none": null });

        assert_eq!(helper_render("[{{zero}}{{no}}{{none}}]", view), "[]");
    }

    #[test]
    fn test_render_dotted() {
        let view = json!({ "a": { "b": { "c": "deep" } } });

        assert_eq!(helper_render("{{a.b.c}}", view), "deep");
    }

    #[test]
    fn test_render_section_iterates() {
        let view = json!({ "items": ["a", "b", "c"] });

        assert_eq!(helper_render("{{#items}}{{.}}{{/items}}", view), "abc");
    }

    #[test]
    fn test_render_section_runs_body_once_per_element() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let view = View::callable(move |selector: &str| match selector {
            "items" => View::from(vec![1, 2, 3]),
            "tick" => {
                counter.fetch_add(1, Ordering::SeqCst);
                View::from("x")
            }
            _ => View::null(),
        });

        let output = render("{{#items}}{{.}}{{tick}}{{/items}}", &view, &Partials::new()).unwrap();
        assert_eq!(output, "1x2x3x");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_render_callable_inside_path_is_absent() {
        let view = View::from(
            Store::new().with_view("tick", View::callable(|_: &str| View::from("x"))),
        );

        assert_eq!(render("[{{tick.now}}]", &view, &Partials::new()).unwrap(), "[]");
    }

    #[test]
    fn test_render_section_callable_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let person = View::callable(move |selector: &str| {
            counter.fetch_add(1, Ordering::SeqCst);
            match selector {
                "name" => View::from("taylor"),
                _ => View::null(),
            }
        });
        let view = View::from(Store::new().with_view("person", person).with_must("title", "dr"));

        let output = render(
            "{{#person}}<{{title}} {{name}}>{{/person}}",
            &view,
            &Partials::new(),
        )
        .unwrap();

        assert_eq!(output, "<dr taylor>");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_render_nested_sections_in_loop() {
        let outer: Vec<_> = (1..=50).map(|i| json!({ "inner": [i, i + 1] })).collect();
        let view = json!({ "outer": outer });
        let expected: String = (1..=50).map(|i| format!("{i}{}", i + 1)).collect();

        assert_eq!(
            helper_render("{{#outer}}{{#inner}}{{.}}{{/inner}}{{/outer}}", view),
            expected
        );
    }

    #[test]
    fn test_render_section_element_fields() {
        let view = json!({ "people": [{ "name": "a" }, { "name": "b" }], "sep": "," });

        assert_eq!(
            helper_render("{{#people}}{{name}}{{sep}}{{/people}}", view),
            "a,b,"
        );
    }

    #[test]
    fn test_render_section_mapping_once() {
        let view = json!({ "person": { "name": "taylor" } });

        assert_eq!(
            helper_render("{{#person}}<{{name}}>{{/person}}", view),
            "<taylor>"
        );
    }

    #[test]
    fn test_render_section_without_content() {
        let view = json!({ "empty": [], "no": false, "blank": "" });

        assert_eq!(
            helper_render("a{{#empty}}X{{/empty}}{{#no}}Y{{/no}}{{#blank}}Z{{/blank}}{{#missing}}W{{/missing}}b", view),
            "ab"
        );
    }

    #[test]
    fn test_render_section_unclosed() {
        let view = json!({ "show": true, "hide": false });

        assert_eq!(helper_render("a{{#show}}b{{.}}", view.clone()), "abtrue");
        assert_eq!(helper_render("a{{#hide}}b", view), "a");
    }

    #[test]
    fn test_render_section_empty_elements_keep_parent_frame() {
        let view = json!({ "items": ["", "x"], "fallback": "root" });

        assert_eq!(
            helper_render("{{#items}}[{{fallback}}]{{/items}}", view),
            "[root][root]"
        );
    }

    #[test]
    fn test_render_nested_sections() {
        let view = json!({ "outer": [{ "inner": [1, 2] }, { "inner": [3] }] });

        assert_eq!(
            helper_render("{{#outer}}({{#inner}}{{.}}{{/inner}}){{/outer}}", view),
            "(12)(3)"
        );
    }

    #[test]
    fn test_render_same_name_nesting_closes_at_first() {
        let view = json!({ "a": true });

        assert_eq!(helper_render("{{#a}}1{{#a}}2{{/a}}3{{/a}}4", view), "1234");
    }

    #[test]
    fn test_render_boolean_section() {
        let view = json!({ "items": ["a", "b", "c"] });

        assert_eq!(helper_render("{{?items}}X{{/items}}", view.clone()), "X");
        assert_eq!(
            helper_render("{{?items}}{{items.1}}{{/items}}", view.clone()),
            "b"
        );
        assert_eq!(helper_render("{{?missing}}X{{/missing}}", view), "");
    }

    #[test]
    fn test_render_boolean_section_exposes_sequence() {
        let view = json!({ "items": ["a", "b"] });

        assert_eq!(helper_render("{{?items}}{{.}}{{/items}}", view.clone()), "a,b");
        assert_eq!(helper_render("{{items}}", view), "a,b");
    }

    #[test]
    fn test_render_inverted_section() {
        let view = json!({ "present": "yes", "list": [] });

        assert_eq!(
            helper_render("{{^missing}}fallback{{/missing}}", view.clone()),
            "fallback"
        );
        assert_eq!(helper_render("{{^list}}none{{/list}}", view.clone()), "none");
        assert_eq!(helper_render("{{^present}}fallback{{/present}}", view), "");
    }

    #[test]
    fn test_render_inverted_section_uses_same_context() {
        let view = json!({ "name": "taylor" });

        assert_eq!(
            helper_render("{{^missing}}hi {{name}}{{/missing}}!", view),
            "hi taylor!"
        );
    }

    #[test]
    fn test_render_inverted_section_unclosed() {
        assert_eq!(helper_render("a{{^missing}}b", json!({})), "ab");
    }

    #[test]
    fn test_render_comment_and_stray_close() {
        assert_eq!(
            helper_render("a{{! a comment }}b{{/nothing}}c", json!({})),
            "abc"
        );
    }

    #[test]
    fn test_render_partial() {
        let partials = Partials::new().with_must("header", "Hi {{user}}");
        let view = View::from(json!({ "user": "Sam" }));

        assert_eq!(render("{{>header}}", &view, &partials).unwrap(), "Hi Sam");
        assert_eq!(render("[{{>missing}}]", &view, &partials).unwrap(), "[]");
    }

    #[test]
    fn test_render_partial_pushes_named_view() {
        let partials = Partials::new().with_must("user", "{{name}} ({{role}})");
        let view = View::from(json!({ "user": { "name": "Sam" }, "role": "admin" }));

        assert_eq!(
            render("{{> user}}", &view, &partials).unwrap(),
            "Sam (admin)"
        );
    }

    #[test]
    fn test_render_partial_resets_delimiters() {
        let partials = Partials::new().with_must("inner", "{{name}}<%name%>");
        let view = View::from(json!({ "name": "x" }));

        assert_eq!(
            render("{{=<% %>=}}<%>inner%>", &view, &partials).unwrap(),
            "x<%name%>"
        );
    }

    #[test]
    fn test_render_partial_in_section() {
        let partials = Partials::new().with_must("item", "<li>{{.}}</li>");
        let view = View::from(json!({ "items": ["a", "b"] }));

        assert_eq!(
            render("{{#items}}{{>item}}{{/items}}", &view, &partials).unwrap(),
            "<li>a</li><li>b</li>"
        );
    }

    #[test]
    fn test_render_delimiters() {
        let view = json!({ "name": "taylor" });

        assert_eq!(
            helper_render("{{=<% %>=}}<%name%> {{name}}", view),
            "taylor {{name}}"
        );
    }

    #[test]
    fn test_render_delimiters_switch_back() {
        let view = json!({ "name": "taylor" });

        assert_eq!(
            helper_render("{{=<% %>=}}<% name %>{{/<% %>}} {{name}} <%name%>", view.clone()),
            "taylor taylor <%name%>"
        );
        assert_eq!(
            helper_render("{{=<% %>=}}<% name %>{{=<% %>=}} {{name}}", view),
            "taylor taylor"
        );
    }

    #[test]
    fn test_render_delimiters_sections() {
        let view = json!({ "items": [1, 2] });

        assert_eq!(
            helper_render("{{= | | =}}|#items|<|.|>|/items|", view),
            "<1><2>"
        );
    }

    #[test]
    fn test_render_invalid_delimiters() {
        let view = json!({ "name": "taylor" });

        assert_eq!(
            helper_render("a{{=onlyone=}}b{{name}}", view.clone()),
            "abtaylor"
        );
        assert_eq!(helper_render("{{=a b c=}}{{name}}", view), "taylor");
    }

    #[test]
    fn test_render_delimiters_in_section() {
        let view = json!({ "show": true, "name": "taylor" });

        assert_eq!(
            helper_render("{{#show}}{{=<% %>=}}<%name%>{{/show}}<%name%>", view),
            "taylor<%name%>"
        );
    }

    #[test]
    fn test_render_callable_view() {
        let view = View::callable(|selector: &str| match selector {
            "items" => View::from(vec!["x", "y"]),
            "" | "." => View::null(),
            other => View::from(other.replace('.', "/")),
        });

        assert_eq!(
            render("{{a.b}} {{#items}}{{.}}{{/items}}", &view, &Partials::new()).unwrap(),
            "a/b xy"
        );
    }

    #[test]
    fn test_render_callable_owns_dotted_selector() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let record = Arc::clone(&seen);
        let view = View::callable(move |selector: &str| {
            record.lock().unwrap().push(selector.to_string());
            View::null()
        });

        render("{{ a.b.c }}", &view, &Partials::new()).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["a.b.c".to_string()]);
    }
}
