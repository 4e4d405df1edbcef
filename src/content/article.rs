//! Visible text extraction from article HTML.

use scraper::{ElementRef, Html, Selector};

/// Containers tried in order; the first present one is used.
const CONTENT_CONTAINERS: &[&str] = &["main", "article", "body"];

const SKIPPED_ELEMENTS: &[&str] = &["script", "style"];

/// Elements that start a new line of text.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main",
    "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Extract the readable text of a page.
///
/// Script and style content is dropped, blank lines are removed and every
/// remaining line is trimmed.
pub fn extract_article_text(html: &str) -> String {
    let doc = Html::parse_document(html);

    let container = CONTENT_CONTAINERS.iter().find_map(|css| {
        let sel = Selector::parse(css).expect("static selector is valid");
        doc.select(&sel).next()
    });

    let Some(container) = container else {
        return String::new();
    };

    let mut raw = String::new();
    collect_text(container, &mut raw);
    normalize_lines(&raw)
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            let name = child_el.value().name();
            if SKIPPED_ELEMENTS.contains(&name) {
                continue;
            }
            let block = BLOCK_ELEMENTS.contains(&name);
            if block {
                out.push('\n');
            }
            collect_text(child_el, out);
            if block {
                out.push('\n');
            }
        }
    }
}

/// Trim every line and drop the empty ones.
pub fn normalize_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_main_over_body() {
        let html = r#"<html><body>
            <nav>Home | About</nav>
            <main><h1>Title</h1><p>First <b>bold</b> paragraph.</p></main>
            <footer>Copyright</footer>
        </body></html>"#;

        assert_eq!(extract_article_text(html), "Title\nFirst bold paragraph.");
    }

    #[test]
    fn test_article_then_body() {
        let html = "<html><body><div>Intro</div><article><p>Story</p></article></body></html>";
        assert_eq!(extract_article_text(html), "Story");

        let html = "<html><body><div>Only</div><div>Body</div></body></html>";
        assert_eq!(extract_article_text(html), "Only\nBody");
    }

    #[test]
    fn test_strips_script_and_style() {
        let html = r#"<html><head><style>p { color: red }</style></head><body>
            <script>var tracking = true;</script>
            <p>   Visible   </p>

            <style>.x{}</style>
        </body></html>"#;

        assert_eq!(extract_article_text(html), "Visible");
    }

    #[test]
    fn test_normalize_lines() {
        assert_eq!(normalize_lines("  a \n\n   \n b\t\n"), "a\nb");
    }
}
