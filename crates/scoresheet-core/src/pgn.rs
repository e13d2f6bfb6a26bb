//! Header and movetext extraction from model output, regex based.

use std::borrow::Cow;

use regex::Regex;

use crate::game_data::{GameHeaders, HEADER_KEYS};

/// Any `[Key "Value"]` tag pair.
const TAG_PATTERN: &str = r#"\[\w+\s+"[^"]*"\]"#;

/// Split a transcription into its canonical headers and the movetext section.
///
/// Every header is looked up on its own, so tag order in the input does not
/// matter. Absent or empty tags stay `"Unknown"`. Never fails.
pub fn extract_pgn_details(text: &str) -> (GameHeaders, String) {
    let mut headers = GameHeaders::default();

    for key in HEADER_KEYS {
        if let Some(value) = extract_header(text, key) {
            if let Some(slot) = headers.slot_mut(key) {
                *slot = value;
            }
        }
    }

    (headers, extract_movetext(text))
}

/// Extract the first value of a PGN header (e.g. White, WhiteElo).
pub fn extract_header(text: &str, header_name: &str) -> Option<String> {
    let pattern = format!(r#"\[{}\s+"([^"]+)"\]"#, regex::escape(header_name));
    let re = Regex::new(&pattern).ok()?;
    Some(re.captures(text)?.get(1)?.as_str().to_string())
}

/// Everything after the blank line that closes the header block, trimmed.
///
/// The blank line has to follow the final tag directly (only whitespace in
/// between). Without tags or without that boundary the movetext is empty.
/// Markdown fence lines around the answer are ignored.
pub fn extract_movetext(text: &str) -> String {
    let unfenced = strip_code_fences(text);
    let text = unfenced.as_ref();

    let Ok(tag_re) = Regex::new(TAG_PATTERN) else {
        return String::new();
    };
    let Some(last_tag) = tag_re.find_iter(text).last() else {
        return String::new();
    };

    let tail = &text[last_tag.end()..];
    let body = tail.trim_start();
    let gap = &tail[..tail.len() - body.len()];

    if gap.matches('\n').count() < 2 {
        return String::new();
    }
    body.trim_end().to_string()
}

/// Drop ```` ``` ```` / ```` ```pgn ```` lines. SAN never contains a backtick.
fn strip_code_fences(text: &str) -> Cow<'_, str> {
    if !text.contains("```") {
        return Cow::Borrowed(text);
    }
    let kept: Vec<&str> = text
        .lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect();
    Cow::Owned(kept.join("\n"))
}
