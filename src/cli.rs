//! One-shot recommendation query: reads a mood and prints the raw reply.

use std::io::{BufRead, Write};

use crate::services::{providers::TextGenerator, recommendations::request_recommendations};

pub const MOOD_PROMPT: &str = "What kind of movie do you feel like watching? ";
pub const RESULTS_HEADER: &str = "Here are some movies you might enjoy:";

/// Reads one line from `input`, asks for recommendations without exclusions and writes the
/// reply text to `out` as received.
pub async fn run(
    mut input: impl BufRead,
    mut out: impl Write,
    generator: &dyn TextGenerator,
) -> anyhow::Result<()> {
    write!(out, "{}", MOOD_PROMPT)?;
    out.flush()?;

    let mut mood = String::new();
    input.read_line(&mut mood)?;

    let recommendations = request_recommendations(generator, mood.trim(), &[]).await?;

    writeln!(out, "\n{}\n", RESULTS_HEADER)?;
    writeln!(out, "{}", recommendations)?;

    Ok(())
}
