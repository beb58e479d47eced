use crate::tokens::{format_css_value, variable_name, TokenDocument};

use super::{Declaration, DeclarationSet};

/// Entries with this key hold aliases and are left to the semantic compiler.
pub const SEMANTIC_BRANCH: &str = "Semantic";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrimitiveOutput {
    pub declarations: DeclarationSet,
}

impl PrimitiveOutput {
    pub fn variable_count(&self) -> usize {
        self.declarations.len()
    }

    pub fn to_css(&self) -> String {
        self.declarations.to_css()
    }
}

/// Emits every leaf with no `Semantic` path segment, with its unit inferred.
pub fn compile_primitive(document: &TokenDocument) -> PrimitiveOutput {
    let mut declarations = DeclarationSet::default();
    document.root().walk(
        |key| key == SEMANTIC_BRANCH,
        |path, leaf| {
            let name = variable_name(path);
            if name.is_empty() {
                tracing::warn!(path = %path.join("/"), "token path has no usable name; skipped");
                return;
            }
            let value = format_css_value(&leaf.value, leaf.type_hint.as_deref(), &name);
            declarations.insert(Declaration::new(
                format!("--{name}"),
                value,
                leaf.value.to_string(),
            ));
        },
    );
    if declarations.is_empty() {
        tracing::warn!("token document has no primitive tokens");
    }
    tracing::debug!(count = declarations.len(), "compiled primitive tokens");
    PrimitiveOutput { declarations }
}
