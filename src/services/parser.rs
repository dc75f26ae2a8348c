use std::sync::LazyLock;

use regex::Regex;

use crate::models::{ParsedMovie, DESCRIPTION_SEPARATOR};

/// Leading list numbering such as `1.` or `2)`
static ORDINAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[.)]\s*").expect("valid ordinal regex"));

/// A `(YYYY)` annotation at the end of a title
static TRAILING_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(\d{4}\)\s*$").expect("valid year regex"));

/// Bullet characters trimmed from both ends of a line
const BULLETS: &[char] = &['•', '-', '—', ' '];

/// Lines starting with these (case-insensitive) are chatter, not recommendations
const SKIPPED_PREFIXES: &[&str] = &["enjoy", "here"];

/// Extracts movie titles from recommendation text, in the order they appear.
///
/// Lines that yield no title (prose, blank lines, preamble) are dropped. Duplicates are kept.
pub fn parse_recommendations(text: &str) -> Vec<ParsedMovie> {
    text.lines().filter_map(parse_line).collect()
}

fn parse_line(raw: &str) -> Option<ParsedMovie> {
    let line = raw.trim();
    if line.is_empty() || is_chatter(line) {
        return None;
    }

    let line = ORDINAL.replace(line, "");
    let line = line.trim_matches(BULLETS);

    let candidate = match line.split_once(DESCRIPTION_SEPARATOR) {
        Some((title, _)) => title.trim(),
        None => line,
    };
    let search_title = TRAILING_YEAR.replace(candidate, "").trim().to_string();

    if search_title.is_empty() {
        return None;
    }

    Some(ParsedMovie {
        search_title,
        description_line: line.to_string(),
    })
}

fn is_chatter(line: &str) -> bool {
    let lower = line.to_lowercase();
    SKIPPED_PREFIXES
        .iter()
        .any(|prefix| lower.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(text: &str) -> Vec<String> {
        parse_recommendations(text)
            .into_iter()
            .map(|movie| movie.search_title)
            .collect()
    }

    #[test]
    fn test_well_formed_line() {
        let parsed = parse_recommendations("Heat (1995) - A detective hunts a master thief.");

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].search_title, "Heat");
        assert_eq!(
            parsed[0].description_line,
            "Heat (1995) - A detective hunts a master thief."
        );
        assert_eq!(
            parsed[0].description(),
            Some("A detective hunts a master thief.")
        );
    }

    #[test]
    fn test_preamble_and_postamble_skipped() {
        let text = "Here are some great movies for you:\n\
                    \n\
                    1. Heat (1995) - Crime epic.\n\
                    2. Ronin (1998) - Mercenaries and car chases.\n\
                    \n\
                    Enjoy your movie night!";

        assert_eq!(titles(text), vec!["Heat", "Ronin"]);
    }

    #[test]
    fn test_chatter_check_is_case_insensitive() {
        assert!(titles("HERE you go:\nENJOY!").is_empty());
    }

    #[test]
    fn test_ordinals_and_bullets_stripped() {
        let text = "1) Inception (2010) - Dreams within dreams.\n\
                    • Thief (1981) - A safecracker's last job.\n\
                    - Sexy Beast (2000) - A retired crook is pulled back in.\n\
                    — Rififi (1955) - The definitive heist.\n\
                    10. The Italian Job (1969) - Minis in Turin.";

        assert_eq!(
            titles(text),
            vec!["Inception", "Thief", "Sexy Beast", "Rififi", "The Italian Job"]
        );
    }

    #[test]
    fn test_description_line_keeps_year_but_not_bullets() {
        let parsed = parse_recommendations("3. • Heat (1995) - Crime epic. •");
        assert_eq!(parsed[0].description_line, "Heat (1995) - Crime epic.");
    }

    #[test]
    fn test_line_without_separator_uses_whole_line() {
        let parsed = parse_recommendations("Drive (2011)");

        assert_eq!(parsed[0].search_title, "Drive");
        assert_eq!(parsed[0].description(), None);
    }

    #[test]
    fn test_year_only_stripped_at_end_of_title() {
        assert_eq!(titles("2001: A Space Odyssey (1968) - Apes."), vec!["2001: A Space Odyssey"]);
        assert_eq!(titles("Blade Runner (1982) Final Cut - Rain."), vec!["Blade Runner (1982) Final Cut"]);
    }

    #[test]
    fn test_title_split_on_first_separator_only() {
        let parsed = parse_recommendations("Heat (1995) - Pacino - De Niro - Mann.");
        assert_eq!(parsed[0].search_title, "Heat");
        assert_eq!(parsed[0].description(), Some("Pacino - De Niro - Mann."));
    }

    #[test]
    fn test_never_emits_empty_titles() {
        let text = "1.\n•\n - \n(1999) - Only a year.\n- - -\n   \n\t";
        assert!(parse_recommendations(text).is_empty());
    }

    #[test]
    fn test_duplicates_preserved_in_order() {
        let text = "Heat (1995) - One.\nRonin (1998) - Two.\nHeat (1995) - Again.";
        assert_eq!(titles(text), vec!["Heat", "Ronin", "Heat"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(titles("Heat (1995) - A.\r\nRonin (1998) - B.\r\n"), vec!["Heat", "Ronin"]);
    }

    #[test]
    fn test_prose_reply_degrades_to_lines_as_titles() {
        let parsed = parse_recommendations("I think you would like a classic noir.");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].search_title, "I think you would like a classic noir.");
    }
}
