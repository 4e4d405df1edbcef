//! Article metadata from HTML.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use scraper::{Html, Selector};

/// Where to look for a publication date, in priority order.
/// `None` reads the element text instead of an attribute.
const DATE_LOCATIONS: &[(&str, Option<&str>)] = &[
    (r#"meta[property="article:published_time"]"#, Some("content")),
    (r#"meta[property="og:published_time"]"#, Some("content")),
    (r#"meta[name="date"]"#, Some("content")),
    (r#"meta[name="pubdate"]"#, Some("content")),
    (r#"meta[name="publishdate"]"#, Some("content")),
    (r#"meta[name="DC.date.issued"]"#, Some("content")),
    (r#"meta[itemprop="datePublished"]"#, Some("content")),
    ("time[datetime]", Some("datetime")),
    ("time", None),
    (".published", None),
    (".post-date", None),
    (".entry-date", None),
    (".date", None),
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%d %b %Y"];

/// Metadata found in an article's HTML.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub published_date: Option<DateTime<Utc>>,
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

fn first_attr(doc: &Html, css: &str, attr: &str) -> Option<String> {
    doc.select(&selector(css))
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn first_text(doc: &Html, css: &str) -> Option<String> {
    doc.select(&selector(css))
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse title, description and publication date from a page.
pub fn parse_article_metadata(html: &str) -> ArticleMetadata {
    let doc = Html::parse_document(html);

    let title = first_text(&doc, "title")
        .or_else(|| first_attr(&doc, r#"meta[property="og:title"]"#, "content"));

    let description = first_attr(&doc, r#"meta[name="description"]"#, "content")
        .or_else(|| first_attr(&doc, r#"meta[property="og:description"]"#, "content"));

    ArticleMetadata {
        title,
        description,
        published_date: find_published_date(&doc),
    }
}

/// First location whose value parses wins; an unparseable value moves on
/// to the next location rather than to other matches of the same one.
fn find_published_date(doc: &Html) -> Option<DateTime<Utc>> {
    DATE_LOCATIONS.iter().find_map(|(css, attr)| {
        let value = match attr {
            Some(attr) => first_attr(doc, css, attr),
            None => first_text(doc, css),
        }?;
        parse_published_date(&value)
    })
}

/// Parse the date formats commonly found in article markup.
pub fn parse_published_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.and_utc());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(value, format) {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_article_metadata() {
        let html = r#"<html><head>
            <title> Building Small Tools </title>
            <meta name="description" content="Notes on tooling">
            <meta property="article:published_time" content="2024-03-05T10:30:00Z">
            </head><body><p>Hello</p></body></html>"#;

        let meta = parse_article_metadata(html);
        assert_eq!(meta.title.as_deref(), Some("Building Small Tools"));
        assert_eq!(meta.description.as_deref(), Some("Notes on tooling"));
        let date = meta.published_date.unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 3, 5));
    }

    #[test]
    fn test_unparseable_date_falls_through_to_next_location() {
        let html = r#"<html><head>
            <meta property="article:published_time" content="sometime last spring">
            </head><body><time datetime="2023-11-02">Nov 2</time></body></html>"#;

        let date = parse_article_metadata(html).published_date.unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2023, 11, 2));
    }

    #[test]
    fn test_css_class_date() {
        let html = r#"<html><body><span class="post-date">January 7, 2022</span></body></html>"#;
        let date = parse_article_metadata(html).published_date.unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2022, 1, 7));
    }

    #[test]
    fn test_missing_metadata() {
        let meta = parse_article_metadata("<html><body>no head</body></html>");
        assert_eq!(meta, ArticleMetadata::default());
    }

    #[test]
    fn test_parse_published_date_formats() {
        assert!(parse_published_date("2024-01-15T10:00:00+02:00").is_some());
        assert!(parse_published_date("2024-01-15T10:00:00+0000").is_some());
        assert!(parse_published_date("Mon, 15 Jan 2024 10:00:00 GMT").is_some());
        assert!(parse_published_date("2024-01-15").is_some());
        assert!(parse_published_date("15 January 2024").is_some());
        assert!(parse_published_date("yesterday").is_none());
    }
}
