//! Text pre-normalization helpers

use regex::Regex;
use std::sync::OnceLock;

/// Delimiter marker the upstream editor inserts around field headers
/// (`CARTEIRA DEMANDANTE :.: valor`); removing it leaves a plain colon.
const FIELD_MARKER: &str = ".:";

/// Pictographic ranges seen in upstream status labels: emoticons, misc
/// symbols and pictographs, transport symbols, regional indicators.
const EMOJI_CLASS: &str =
    "[\u{1F600}-\u{1F64F}\u{1F300}-\u{1F5FF}\u{1F680}-\u{1F6FF}\u{1F1E0}-\u{1F1FF}]+";

static EMOJI: OnceLock<Regex> = OnceLock::new();

fn emoji_pattern() -> &'static Regex {
    EMOJI.get_or_init(|| Regex::new(EMOJI_CLASS).expect("emoji character class compiles"))
}

/// Flatten a task description for extraction.
///
/// Newlines become spaces so values can span lines, and the `.:` marker
/// sequence is removed so `LABEL :.: value` reads as `LABEL : value`.
/// Missing text yields an empty string, never an error.
pub fn normalize_text(text: Option<&str>) -> String {
    match text {
        Some(t) => t.replace('\n', " ").replace(FIELD_MARKER, ""),
        None => String::new(),
    }
}

/// Remove pictographic characters from a status label.
pub fn strip_emoji(s: &str) -> String {
    emoji_pattern().replace_all(s, "").into_owned()
}
