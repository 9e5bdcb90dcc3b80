use std::sync::OnceLock;

use regex::Regex;

use crate::domain::ExtractedPost;

/// How many leading lines `has_title` looks at.
const TITLE_SCAN_LINES: usize = 4;

fn marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // "title", "Titre", "العنوان" ... then anything up to the first colon.
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:title|titre|العنوان)[^:]*:(.*)$").expect("valid regex")
    })
}

/// Title value when `line` is a title marker line.
fn marker_value(line: &str) -> Option<String> {
    marker_re()
        .captures(line.trim())
        .map(|c| c[1].trim().to_string())
}

/// Split a message into title and body.
///
/// The first marker line wins: everything after its first colon is the title,
/// every later line (including ones that look like markers) is body. A message
/// without a marker, or whose marker has no value, yields an empty title.
pub fn extract_fields(content: &str) -> ExtractedPost {
    let mut lines = content.lines();

    let mut title = None;
    for line in lines.by_ref() {
        if let Some(value) = marker_value(line) {
            title = Some(value);
            break;
        }
    }

    let Some(title) = title.filter(|t| !t.is_empty()) else {
        return ExtractedPost::default();
    };

    let body = lines.collect::<Vec<_>>().join("\n").trim().to_string();
    ExtractedPost { title, body }
}

/// Cheap pre-check used for auto-sync: a non-empty title near the top.
pub fn has_title(content: &str) -> bool {
    content
        .lines()
        .take(TITLE_SCAN_LINES)
        .filter_map(marker_value)
        .any(|t| !t.is_empty())
}
