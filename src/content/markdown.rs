use pulldown_cmark::{Options, Parser};

/// Markdown to HTML.
pub trait MarkdownRenderer {
    fn render(&self, markdown: &str) -> String;
}

/// GitHub-flavored CommonMark via `pulldown-cmark`: tables, strikethrough, task lists and
/// GFM blockquote tags. Raw HTML passes through.
#[derive(Clone, Copy, Debug, Default)]
pub struct CommonMarkRenderer;

impl CommonMarkRenderer {
    fn options() -> Options {
        Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TABLES
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM
    }
}

impl MarkdownRenderer for CommonMarkRenderer {
    fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, Self::options());
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        pulldown_cmark::html::push_html(&mut out, parser);
        out
    }
}

impl<F> MarkdownRenderer for F
where
    F: Fn(&str) -> String,
{
    fn render(&self, markdown: &str) -> String {
        self(markdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_images_rules_and_tables() {
        let html = CommonMarkRenderer.render(
            "![shot](img/a.png)\n\nSome *text*\n\n---\n\n| a | b |\n|---|---|\n| 1 | 2 |\n",
        );
        assert!(html.contains(r#"<p><img src="img/a.png" alt="shot" /></p>"#));
        assert!(html.contains("<em>text</em>"));
        assert!(html.contains("<hr />"));
        assert!(html.contains("<table>"));
    }

    #[test]
    fn closures_are_renderers() {
        let fake = |md: &str| format!("<p>{md}</p>");
        assert_eq!(fake.render("x"), "<p>x</p>");
    }
}
