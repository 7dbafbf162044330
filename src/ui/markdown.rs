//! Markdown rendering and HTML escaping for untrusted record content.

use pulldown_cmark::{Event, Parser, html};

/// Escape a string for interpolation into HTML text or attribute position.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render action prose as markdown.
///
/// Raw HTML embedded in the source is demoted to text; records come from an
/// external writer and never get to inject markup.
#[must_use]
pub fn render_markdown(source: &str) -> String {
    let parser = Parser::new(source).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::with_capacity(source.len());
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<img src="x" onerror='y'> & more"#),
            "&lt;img src=&quot;x&quot; onerror=&#39;y&#39;&gt; &amp; more"
        );
    }

    #[test]
    fn test_render_markdown_basic() {
        let html = render_markdown("some **bold** text");
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn test_render_markdown_demotes_raw_html() {
        let html = render_markdown("before <script>alert(1)</script> after");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
