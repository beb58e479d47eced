/// Lowercases `segment`, maps anything outside `[a-z0-9-]` to `-`, collapses
/// hyphen runs and trims hyphens from both ends.
pub fn normalize_segment(segment: &str) -> String {
    let mut normalized = String::with_capacity(segment.len());
    for ch in segment.chars().flat_map(char::to_lowercase) {
        let ch = if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            ch
        } else {
            '-'
        };
        if ch == '-' && normalized.ends_with('-') {
            continue;
        }
        normalized.push(ch);
    }
    normalized.trim_matches('-').to_string()
}

/// Joins normalized path segments with `-`. Segments that normalize to
/// nothing are dropped so the result never carries doubled hyphens.
pub fn variable_name<S: AsRef<str>>(path: &[S]) -> String {
    path.iter()
        .map(|segment| normalize_segment(segment.as_ref()))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
