use std::sync::LazyLock;

use regex::Regex;

use super::TokenValue;

const DEFAULT_UNIT: &str = "px";
const TEXT_TYPE: &str = "text";
/// Path fragments of CSS properties that take bare numbers.
const UNITLESS_PATH_MARKERS: [&str; 3] = ["font-weight", "opacity", "z-index"];
const COLOR_PREFIXES: [&str; 4] = ["#", "rgb", "hsl", "var("];

static NUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)$").expect("numeric pattern"));

static UNIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^[+-]?(?:\d+(?:\.\d*)?|\.\d+)",
        r"(?:px|em|rem|%|ex|ch|cap|ic|lh|rlh|vw|vh|vi|vb|vmin|vmax|svw|svh|lvw|lvh|dvw|dvh",
        r"|cm|mm|q|in|pt|pc|fr|deg|grad|rad|turn|s|ms|hz|khz|dpi|dpcm|dppx|x)$",
    ))
    .expect("unit pattern")
});

/// Renders a primitive token value as CSS. `path` is the token's joined
/// variable name; it decides whether a bare number gets the default unit.
pub fn format_css_value(value: &TokenValue, type_hint: Option<&str>, path: &str) -> String {
    let text = value.to_string();
    if looks_like_color(&text) || UNIT_RE.is_match(&text) {
        return text;
    }
    if type_hint == Some(TEXT_TYPE) {
        return text;
    }
    if NUMERIC_RE.is_match(&text) && !is_unitless_path(path) {
        return format!("{text}{DEFAULT_UNIT}");
    }
    text
}

fn looks_like_color(text: &str) -> bool {
    let lowered = text.trim_start().to_ascii_lowercase();
    COLOR_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
}

fn is_unitless_path(path: &str) -> bool {
    let lowered = path.to_ascii_lowercase();
    UNITLESS_PATH_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}
