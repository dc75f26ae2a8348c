use minijinja::{context, Environment};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{RenderRecord, SessionState},
    services::ResultsView,
};

const PAGE_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>MovieFinder</title>
  <style>
    body { font-family: sans-serif; max-width: 42rem; margin: 2rem auto; padding: 0 1rem; }
    .notice { background: #fff4d6; padding: .5rem 1rem; }
    .error { background: #fde2e2; padding: .5rem 1rem; }
    .success { background: #e3f6e5; padding: .5rem 1rem; }
    .warning { color: #8a6d00; }
  </style>
</head>
<body>
  <h1>🎬 MovieFinder</h1>
  <p>Find movie ideas based on what you feel like watching. Simple, quick, and fun!</p>

  <form method="post" action="/find">
    {% if session_id %}<input type="hidden" name="session_id" value="{{ session_id }}">{% endif %}
    <label for="query">What kind of movie do you feel like watching?</label><br>
    <input type="text" id="query" name="query" value="{{ query }}" size="50">
    <button type="submit">Find Movies</button>
  </form>

  {% if notice %}<p class="notice">{{ notice }}</p>{% endif %}
  {% if error %}<p class="error">{{ error }}</p>{% endif %}

  {% if has_results %}
  <p class="success">🎬 Here are some movies you might enjoy:</p>
  {% for warning in warnings %}<p class="warning">{{ warning }}</p>
  {% endfor %}
  {% for record in records %}
  <section>
    <p><strong>{{ record.heading }}</strong></p>
    {% if record.poster_url %}<img src="{{ record.poster_url }}" width="150" alt="{{ record.heading }} poster">{% endif %}
    {% if record.description %}<p>{{ record.description }}</p>{% endif %}
  </section>
  <hr>
  {% endfor %}
  <form method="post" action="/more">
    <input type="hidden" name="session_id" value="{{ session_id }}">
    <button type="submit">Next Suggestions 🎞️</button>
  </form>
  {% endif %}
</body>
</html>
"#;

/// One recommendation as shown on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordView {
    pub heading: String,
    pub poster_url: Option<String>,
    pub description: Option<String>,
}

impl From<&RenderRecord> for RecordView {
    fn from(record: &RenderRecord) -> Self {
        Self {
            heading: record.heading(),
            poster_url: record.poster_url.clone(),
            description: record.description.clone(),
        }
    }
}

/// Everything the page needs to draw itself
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageView {
    pub session_id: Option<Uuid>,
    pub query: String,
    pub has_results: bool,
    pub records: Vec<RecordView>,
    pub warnings: Vec<String>,
    /// Validation feedback
    pub notice: Option<String>,
    pub error: Option<String>,
}

impl PageView {
    pub fn new(session_id: Uuid, state: &SessionState, results: &ResultsView) -> Self {
        Self {
            session_id: Some(session_id),
            query: state.current_query.clone(),
            has_results: state.has_results(),
            records: results.records.iter().map(RecordView::from).collect(),
            warnings: results.warnings.clone(),
            notice: None,
            error: None,
        }
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Renders the page for a view
pub fn render_page(page: &PageView) -> AppResult<String> {
    let mut env = Environment::new();
    env.add_template("index.html", PAGE_TEMPLATE)?;

    let html = env.get_template("index.html")?.render(context! {
        session_id => page.session_id,
        query => &page.query,
        has_results => page.has_results,
        records => &page.records,
        warnings => &page.warnings,
        notice => &page.notice,
        error => &page.error,
    })?;

    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, year: &str, poster: Option<&str>, description: Option<&str>) -> RenderRecord {
        RenderRecord {
            display_title: title.to_string(),
            year: year.to_string(),
            poster_url: poster.map(str::to_string),
            description: description.map(str::to_string),
        }
    }

    #[test]
    fn test_empty_page_has_form_only() {
        let html = render_page(&PageView::default()).unwrap();

        assert!(html.contains("Find Movies"));
        assert!(!html.contains("Next Suggestions"));
        assert!(!html.contains("name=\"session_id\""));
    }

    #[test]
    fn test_results_page() {
        let state = SessionState {
            last_result: Some("ignored".to_string()),
            seen_titles: Default::default(),
            current_query: "heists".to_string(),
        };
        let results = ResultsView {
            records: vec![
                record("Heat", "1995", Some("https://img.test/heat.jpg"), Some("Crime epic.")),
                record("Thief", "", None, None),
            ],
            warnings: vec!["Could not fetch info for: Thief".to_string()],
        };
        let id = Uuid::new_v4();

        let html = render_page(&PageView::new(id, &state, &results)).unwrap();

        assert!(html.contains("<strong>Heat (1995)</strong>"));
        assert!(html.contains("<strong>Thief</strong>"));
        // auto-escaping encodes `/` as `&#x2f;`; browsers decode it back
        assert!(html.contains("src=\"https:&#x2f;&#x2f;img.test&#x2f;heat.jpg\""));
        assert!(html.contains("Crime epic."));
        assert!(html.contains("Could not fetch info for: Thief"));
        assert!(html.contains("Next Suggestions"));
        assert!(html.contains(&id.to_string()));
        assert_eq!(html.matches("<hr>").count(), 2);
    }

    #[test]
    fn test_user_text_is_escaped() {
        let page = PageView {
            query: "<script>alert(1)</script>".to_string(),
            ..Default::default()
        }
        .with_notice("Please describe what kind of movie you want.");

        let html = render_page(&page).unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Please describe what kind of movie you want."));
    }
}
