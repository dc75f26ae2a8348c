use serde::Serialize;

/// Separator between title and blurb in a recommendation line
pub const DESCRIPTION_SEPARATOR: &str = " - ";

/// A title extracted from recommendation text, before metadata lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMovie {
    /// Title used for the metadata search (year annotation removed)
    pub search_title: String,
    /// The cleaned recommendation line the title came from
    pub description_line: String,
}

impl ParsedMovie {
    /// The part of the line after the first separator, if any
    pub fn description(&self) -> Option<&str> {
        self.description_line
            .split_once(DESCRIPTION_SEPARATOR)
            .map(|(_, description)| description)
    }
}

/// Canonical movie metadata for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedMovie {
    pub display_title: String,
    /// Four-digit release year, or empty when unknown
    pub year: String,
    pub poster_url: Option<String>,
}

impl ResolvedMovie {
    /// Fallback used when no metadata is available
    pub fn unresolved(title: &str) -> Self {
        Self {
            display_title: title.to_string(),
            year: String::new(),
            poster_url: None,
        }
    }
}

/// One fully assembled recommendation, ready to show
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderRecord {
    pub display_title: String,
    pub year: String,
    pub poster_url: Option<String>,
    pub description: Option<String>,
}

impl RenderRecord {
    pub fn new(movie: ResolvedMovie, parsed: &ParsedMovie) -> Self {
        Self {
            display_title: movie.display_title,
            year: movie.year,
            poster_url: movie.poster_url,
            description: parsed.description().map(str::to_string),
        }
    }

    /// `Title (Year)`, or just the title when the year is unknown
    pub fn heading(&self) -> String {
        if self.year.is_empty() {
            self.display_title.clone()
        } else {
            format!("{} ({})", self.display_title, self.year)
        }
    }
}
