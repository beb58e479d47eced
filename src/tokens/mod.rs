//! Token document model.
//!
//! Raw JSON is decoded exactly once into [`TokenNode`] values; everything
//! downstream walks the typed tree and never looks at `serde_json::Value`.

use std::fmt;

use serde_json::{Map, Number, Value};
use thiserror::Error;

pub mod naming;
pub mod reference;
pub mod units;

pub use naming::{normalize_segment, variable_name};
pub use reference::{find_unresolved, resolve_references};
pub use units::format_css_value;

const META_SIGIL: char = '$';
const VALUE_KEY: &str = "$value";
const TYPE_KEY: &str = "$type";

pub type TokenResult<T> = std::result::Result<T, TokenError>;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to parse token document")]
    Parse(#[from] serde_json::Error),
    #[error("token document root must be a JSON object")]
    InvalidRoot,
    #[error("invalid token at {path}: {reason}")]
    InvalidLeaf { path: String, reason: &'static str },
    #[error("missing token section: {path}")]
    MissingSection { path: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Text(String),
    Number(Number),
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write_number(f, number),
        }
    }
}

// Integral floats print without the trailing `.0`.
fn write_number(f: &mut fmt::Formatter<'_>, number: &Number) -> fmt::Result {
    if number.is_i64() || number.is_u64() {
        return write!(f, "{number}");
    }
    match number.as_f64() {
        Some(value) if value.fract() == 0.0 && value.abs() < 1e15 => write!(f, "{}", value as i64),
        Some(value) => write!(f, "{value}"),
        None => write!(f, "{number}"),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenLeaf {
    pub value: TokenValue,
    pub type_hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenNode {
    Leaf(TokenLeaf),
    Branch(TokenGroup),
}

/// Ordered children of an intermediate node. Metadata keys are already gone.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TokenGroup {
    entries: Vec<(String, TokenNode)>,
}

impl TokenGroup {
    pub fn get(&self, key: &str) -> Option<&TokenNode> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, node)| node)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Depth-first pre-order walk over every leaf. Entries whose key
    /// satisfies `prune` are skipped, leaves and whole branches alike.
    pub fn walk<'a, P, V>(&'a self, prune: P, mut visit: V)
    where
        P: Fn(&str) -> bool,
        V: FnMut(&[&'a str], &'a TokenLeaf),
    {
        let mut path = Vec::new();
        self.walk_inner(&prune, &mut visit, &mut path);
    }

    fn walk_inner<'a, P, V>(&'a self, prune: &P, visit: &mut V, path: &mut Vec<&'a str>)
    where
        P: Fn(&str) -> bool,
        V: FnMut(&[&'a str], &'a TokenLeaf),
    {
        for (key, node) in &self.entries {
            path.push(key.as_str());
            if prune(key.as_str()) {
                tracing::debug!(path = %path.join("/"), "pruned token entry");
            } else {
                match node {
                    TokenNode::Leaf(leaf) => visit(path.as_slice(), leaf),
                    TokenNode::Branch(group) => group.walk_inner(prune, visit, path),
                }
            }
            path.pop();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TokenDocument {
    root: TokenGroup,
}

impl TokenDocument {
    pub fn parse(source: &str) -> TokenResult<Self> {
        let raw: Value = serde_json::from_str(source)?;
        Self::from_value(raw)
    }

    pub fn from_value(raw: Value) -> TokenResult<Self> {
        let Value::Object(map) = raw else {
            return Err(TokenError::InvalidRoot);
        };
        let root = decode_group(map, &mut Vec::new())?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &TokenGroup {
        &self.root
    }

    /// Follows `path` through nested branches. A leaf anywhere on the path
    /// yields `None`.
    pub fn section(&self, path: &[&str]) -> Option<&TokenGroup> {
        path.iter().try_fold(&self.root, |group, key| match group.get(key) {
            Some(TokenNode::Branch(child)) => Some(child),
            _ => None,
        })
    }
}

fn decode_group(map: Map<String, Value>, path: &mut Vec<String>) -> TokenResult<TokenGroup> {
    let mut entries = Vec::with_capacity(map.len());
    for (key, value) in map {
        if key.starts_with(META_SIGIL) {
            continue;
        }
        let Value::Object(child) = value else {
            tracing::debug!(key = %key, parent = %path.join("/"), "skipping non-object token entry");
            continue;
        };
        path.push(key);
        let node = decode_node(child, path);
        let key = path.pop().unwrap_or_default();
        entries.push((key, node?));
    }
    Ok(TokenGroup { entries })
}

fn decode_node(map: Map<String, Value>, path: &mut Vec<String>) -> TokenResult<TokenNode> {
    if map.contains_key(VALUE_KEY) {
        decode_leaf(&map, path).map(TokenNode::Leaf)
    } else {
        decode_group(map, path).map(TokenNode::Branch)
    }
}

fn decode_leaf(map: &Map<String, Value>, path: &[String]) -> TokenResult<TokenLeaf> {
    let value = match map.get(VALUE_KEY) {
        Some(Value::String(text)) => TokenValue::Text(text.clone()),
        Some(Value::Number(number)) => TokenValue::Number(number.clone()),
        _ => return Err(invalid_leaf(path, "$value must be a string or number")),
    };
    let type_hint = match map.get(TYPE_KEY) {
        None | Some(Value::Null) => None,
        Some(Value::String(hint)) => Some(hint.clone()),
        Some(_) => return Err(invalid_leaf(path, "$type must be a string")),
    };
    Ok(TokenLeaf { value, type_hint })
}

fn invalid_leaf(path: &[String], reason: &'static str) -> TokenError {
    TokenError::InvalidLeaf {
        path: path.join("/"),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_paths(group: &TokenGroup) -> Vec<String> {
        let mut paths = Vec::new();
        group.walk(|_| false, |path, _| paths.push(path.join("/")));
        paths
    }

    #[test]
    fn parse_decodes_leaves_and_branches() {
        let document = TokenDocument::parse(
            r##"{
                "Color": {
                    "Neutral": {
                        "950": { "$value": "#0A0A0A", "$type": "color" }
                    }
                },
                "Spacing": { "Base": { "4": { "$value": 16 } } }
            }"##,
        )
        .unwrap();

        let neutral = document.section(&["Color", "Neutral"]).unwrap();
        assert_eq!(
            neutral.get("950"),
            Some(&TokenNode::Leaf(TokenLeaf {
                value: TokenValue::Text("#0A0A0A".to_string()),
                type_hint: Some("color".to_string()),
            }))
        );
        assert_eq!(
            leaf_paths(document.root()),
            vec!["Color/Neutral/950", "Spacing/Base/4"]
        );
    }

    #[test]
    fn parse_skips_metadata_keys_at_every_level() {
        let document = TokenDocument::parse(
            r##"{
                "$themes": [],
                "$metadata": { "tokenSetOrder": ["Color"] },
                "Color": {
                    "$description": "palette",
                    "Red": { "$value": "#f00", "$description": "ignored" }
                }
            }"##,
        )
        .unwrap();

        assert_eq!(leaf_paths(document.root()), vec!["Color/Red"]);
    }

    #[test]
    fn parse_keeps_document_order() {
        let document =
            TokenDocument::parse(r##"{ "b": { "$value": 1 }, "a": { "$value": 2 } }"##).unwrap();
        assert_eq!(leaf_paths(document.root()), vec!["b", "a"]);
    }

    #[test]
    fn parse_ignores_stray_scalars_and_empty_groups() {
        let document =
            TokenDocument::parse(r##"{ "note": "hello", "Empty": {}, "Size": { "$value": 2 } }"##)
                .unwrap();
        assert_eq!(leaf_paths(document.root()), vec!["Size"]);
        assert!(matches!(
            document.root().get("Empty"),
            Some(TokenNode::Branch(group)) if group.is_empty()
        ));
    }

    #[test]
    fn parse_rejects_invalid_json() {
        let err = TokenDocument::parse("{ invalid ").unwrap_err();
        assert!(matches!(err, TokenError::Parse(_)));
    }

    #[test]
    fn parse_rejects_non_object_root() {
        let err = TokenDocument::parse("[1, 2]").unwrap_err();
        assert!(matches!(err, TokenError::InvalidRoot));
    }

    #[test]
    fn parse_rejects_unsupported_leaf_value_with_path() {
        let err = TokenDocument::parse(r##"{ "Shadow": { "Lg": { "$value": [1, 2] } } }"##)
            .unwrap_err();
        match err {
            TokenError::InvalidLeaf { path, .. } => assert_eq!(path, "Shadow/Lg"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_rejects_non_string_type() {
        let err = TokenDocument::parse(r##"{ "A": { "$value": 1, "$type": 3 } }"##).unwrap_err();
        assert!(matches!(err, TokenError::InvalidLeaf { .. }));
    }

    #[test]
    fn walk_prunes_matching_branches_and_leaves() {
        let document = TokenDocument::parse(
            r##"{
                "Color/Stroke": {
                    "Subtle": { "$value": "#ccc" },
                    "Semantic": { "Border": { "$value": "{Color/Stroke/Subtle}" } }
                },
                "Semantic": { "$value": "dropped" },
                "Size": { "Semantic": { "$value": 4 }, "Md": { "$value": 8 } }
            }"##,
        )
        .unwrap();

        let mut paths = Vec::new();
        document
            .root()
            .walk(|key| key == "Semantic", |path, _| paths.push(path.join("/")));
        assert_eq!(paths, vec!["Color/Stroke/Subtle", "Size/Md"]);
    }

    #[test]
    fn section_returns_none_for_missing_or_leaf_segments() {
        let document = TokenDocument::parse(
            r##"{ "Color/Stroke": { "Semantic": { "$value": "#000" } } }"##,
        )
        .unwrap();
        assert!(document.section(&["Color/Stroke"]).is_some());
        assert!(document.section(&["Color/Stroke", "Semantic"]).is_none());
        assert!(document.section(&["Missing"]).is_none());
    }

    #[test]
    fn numbers_render_without_trailing_zero_fraction() {
        let document = TokenDocument::parse(
            r##"{ "a": { "$value": 16.0 }, "b": { "$value": 1.5 }, "c": { "$value": -2 } }"##,
        )
        .unwrap();
        let mut rendered = Vec::new();
        document
            .root()
            .walk(|_| false, |_, leaf| rendered.push(leaf.value.to_string()));
        assert_eq!(rendered, vec!["16", "1.5", "-2"]);
    }
}
