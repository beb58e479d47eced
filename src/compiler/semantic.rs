use std::fmt;

use crate::tokens::{
    find_unresolved, resolve_references, variable_name, TokenDocument, TokenError, TokenResult,
};

use super::{Declaration, DeclarationSet};

/// Location of the semantic subtree: `document["Color/Stroke"]["Semantic"]`.
pub const SEMANTIC_SECTION: [&str; 2] = ["Color/Stroke", "Semantic"];
pub const SEMANTIC_NAME_PREFIX: &str = "semantic";

/// A declaration whose value still carries `{...}` after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidReference {
    pub name: String,
    pub value: String,
    pub source: String,
}

impl fmt::Display for InvalidReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SemanticOutput {
    pub declarations: DeclarationSet,
    pub invalid_references: Vec<InvalidReference>,
}

impl SemanticOutput {
    pub fn variable_count(&self) -> usize {
        self.declarations.len()
    }

    pub fn to_css(&self) -> String {
        self.declarations.to_css()
    }
}

/// Emits `--semantic-*` variables for the semantic subtree, resolving token
/// references to `var(...)`. Fails only when the subtree is missing.
pub fn compile_semantic(document: &TokenDocument) -> TokenResult<SemanticOutput> {
    let section = document
        .section(&SEMANTIC_SECTION)
        .ok_or_else(|| TokenError::MissingSection {
            path: SEMANTIC_SECTION.join("."),
        })?;
    if section.is_empty() {
        tracing::warn!(path = %SEMANTIC_SECTION.join("."), "semantic section has no tokens");
    }

    let mut declarations = DeclarationSet::default();
    section.walk(
        |_| false,
        |path, leaf| {
            let name = variable_name(path);
            if name.is_empty() {
                tracing::warn!(path = %path.join("/"), "semantic token path has no usable name; skipped");
                return;
            }
            let source = leaf.value.to_string();
            let value = resolve_references(&source);
            declarations.insert(
                Declaration::new(format!("--{SEMANTIC_NAME_PREFIX}-{name}"), value, source)
                    .with_comment(leaf.type_hint.clone()),
            );
        },
    );

    let invalid_references = collect_invalid_references(&declarations);
    tracing::debug!(
        count = declarations.len(),
        invalid = invalid_references.len(),
        "compiled semantic tokens"
    );
    Ok(SemanticOutput {
        declarations,
        invalid_references,
    })
}

fn collect_invalid_references(declarations: &DeclarationSet) -> Vec<InvalidReference> {
    declarations
        .iter()
        .filter_map(|declaration| {
            let fragments = find_unresolved(&declaration.value);
            if fragments.is_empty() {
                return None;
            }
            tracing::debug!(
                name = %declaration.name,
                unresolved = ?fragments,
                "semantic token has unresolved reference"
            );
            Some(InvalidReference {
                name: declaration.name.clone(),
                value: declaration.value.clone(),
                source: declaration.source.clone(),
            })
        })
        .collect()
}
