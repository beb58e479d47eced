//! `{Path/To/Token}` references embedded in token values.
//!
//! This is the only place that understands the curly-brace syntax. A
//! reference resolves to `var(--<kebab path>)`; braced fragments whose path
//! is empty or has an empty segment are left untouched so they can be
//! reported later by [`find_unresolved`], together with any unbalanced brace.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::naming::normalize_segment;

static BRACED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]*)\}").expect("braced fragment pattern"));

// Balanced fragment, then an unclosed `{` running to the next brace, then a
// stray `}`.
static LEFTOVER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{[^{}]*\}|\{[^{}]*|\}").expect("leftover template syntax pattern")
});

const PATH_SEPARATOR: char = '/';

/// Replaces every well-formed reference in `text` in place.
pub fn resolve_references(text: &str) -> String {
    BRACED_RE
        .replace_all(text, |caps: &Captures<'_>| match reference_target(&caps[1]) {
            Some(target) => format!("var(--{target})"),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Template syntax still present in `text`, in order of appearance: braced
/// fragments, unclosed `{...` tails and stray `}`.
pub fn find_unresolved(text: &str) -> Vec<&str> {
    LEFTOVER_RE.find_iter(text).map(|m| m.as_str()).collect()
}

fn reference_target(path: &str) -> Option<String> {
    let segments = path
        .split(PATH_SEPARATOR)
        .map(normalize_segment)
        .collect::<Vec<_>>();
    if segments.iter().any(String::is_empty) {
        return None;
    }
    Some(segments.join("-"))
}
