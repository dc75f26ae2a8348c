use serde::Serialize;

/// Titles already shown in a session, kept in display order without duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeenTitles(Vec<String>);

impl SeenTitles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a title; returns false if it was already present
    pub fn insert(&mut self, title: &str) -> bool {
        if self.contains(title) {
            return false;
        }
        self.0.push(title.to_string());
        true
    }

    pub fn contains(&self, title: &str) -> bool {
        self.0.iter().any(|seen| seen == title)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for SeenTitles {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut seen = SeenTitles::new();
        for title in iter {
            seen.insert(title);
        }
        seen
    }
}

/// Per-session recommendation state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Raw text of the most recent successful recommendation request
    pub last_result: Option<String>,
    pub seen_titles: SeenTitles,
    pub current_query: String,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a request has succeeded and results can be shown
    pub fn has_results(&self) -> bool {
        self.last_result.is_some()
    }
}
