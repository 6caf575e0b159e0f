use handlebars::Handlebars;
use semsort_common::{Result, SemsortError};
use semsort_vector::{Entry, RankedEntry};
use serde::Serialize;

const PAGE_TEMPLATE: &str = "index";

/// What the page shows
pub struct PageView<'a> {
    /// All entries, chronological
    pub entries: &'a [Entry],

    /// Similarity order; empty until a query is chosen
    pub ranked: &'a [RankedEntry],

    /// Selected query entry, if any
    pub query_id: Option<i64>,

    /// Embedding model in use
    pub embedding_model: &'a str,

    /// Sentence template for the compose form
    pub compose_template: &'a str,
}

#[derive(Serialize)]
struct PageData<'a> {
    embedding_model: &'a str,
    compose_template: &'a str,
    selected: String,
    entries: Vec<OriginalRow<'a>>,
    ranked: Vec<RankedRow<'a>>,
}

#[derive(Serialize)]
struct OriginalRow<'a> {
    id: i64,
    text: &'a str,
    is_query: bool,
}

#[derive(Serialize)]
struct RankedRow<'a> {
    text: &'a str,
    /// Formatted score; `None` marks the query row
    score: Option<String>,
}

impl<'a> From<&PageView<'a>> for PageData<'a> {
    fn from(view: &PageView<'a>) -> Self {
        Self {
            embedding_model: view.embedding_model,
            compose_template: view.compose_template,
            selected: view.query_id.map(|id| id.to_string()).unwrap_or_default(),
            entries: view
                .entries
                .iter()
                .map(|entry| OriginalRow {
                    id: entry.id,
                    text: &entry.text,
                    is_query: view.query_id == Some(entry.id),
                })
                .collect(),
            ranked: view
                .ranked
                .iter()
                .map(|row| RankedRow {
                    text: &row.text,
                    score: row.score.map(|score| format!("{:.3}", score)),
                })
                .collect(),
        }
    }
}

/// Handlebars registry holding the page template
pub struct PageRenderer {
    handlebars: Handlebars<'static>,
}

impl PageRenderer {
    /// Register the page template
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars
            .register_template_string(PAGE_TEMPLATE, include_str!("../templates/index.hbs"))
            .map_err(|e| SemsortError::internal(format!("Failed to register page template: {}", e)))?;

        Ok(Self { handlebars })
    }

    /// Render the whole page; text values are HTML-escaped by the template engine
    pub fn render(&self, view: &PageView<'_>) -> Result<String> {
        self.handlebars
            .render(PAGE_TEMPLATE, &PageData::from(view))
            .map_err(|e| SemsortError::internal(format!("Failed to render page: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(id: i64, text: &str) -> Entry {
        Entry {
            id,
            text: text.to_string(),
            embedding: vec![1.0],
            created_at: Utc::now(),
        }
    }

    fn view<'a>(entries: &'a [Entry], ranked: &'a [RankedEntry], query_id: Option<i64>) -> PageView<'a> {
        PageView {
            entries,
            ranked,
            query_id,
            embedding_model: "m",
            compose_template: "{first} {second}",
        }
    }

    #[test]
    fn test_empty_page_has_placeholders() {
        let html = PageRenderer::new().unwrap().render(&view(&[], &[], None)).unwrap();

        assert!(html.contains("No entries yet."));
        assert!(html.contains("Submit an entry or pick one"));
        assert!(html.contains("{first} {second}"));
        assert!(!html.contains("action=\"/select\""));
    }

    #[test]
    fn test_page_lists_entries_and_ranking() {
        let entries = vec![entry(1, "cats <3"), entry(2, "dogs")];
        let ranked = vec![
            RankedEntry::anchor(&entries[1]),
            RankedEntry::scored(&entries[0], 0.25),
        ];
        let html = PageRenderer::new()
            .unwrap()
            .render(&view(&entries, &ranked, Some(2)))
            .unwrap();

        assert!(html.contains("cats &lt;3"));
        assert!(!html.contains("cats <3"));
        assert!(html.contains("href=\"/query/1\""));
        assert!(html.contains("action=\"/delete/2\""));
        assert!(html.contains("<li class=\"query\"><a href=\"/query/2\">dogs</a>"));
        assert!(html.contains("<li class=\"query\">dogs <span class=\"score\">query</span></li>"));
        assert!(html.contains("<span class=\"score\">0.250</span>"));
        assert!(html.contains("value=\"2\""));
    }

    #[test]
    fn test_markup_in_text_is_escaped() {
        let entries = vec![entry(1, "<script>alert(\"x\")</script> & more")];
        let html = PageRenderer::new()
            .unwrap()
            .render(&view(&entries, &[], None))
            .unwrap();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; more"));
    }
}
