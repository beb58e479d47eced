//! Turns a [`TokenDocument`](crate::tokens::TokenDocument) into a flat
//! `:root { ... }` block of CSS custom properties.

use std::collections::BTreeMap;

mod primitive;
mod semantic;

pub use primitive::{compile_primitive, PrimitiveOutput, SEMANTIC_BRANCH};
pub use semantic::{
    compile_semantic, InvalidReference, SemanticOutput, SEMANTIC_NAME_PREFIX, SEMANTIC_SECTION,
};

const INDENT: &str = "  ";

/// One emitted `--name: value;` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub value: String,
    /// Authored value before formatting or reference resolution.
    pub source: String,
    pub comment: Option<String>,
}

impl Declaration {
    pub fn new(name: impl Into<String>, value: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            source: source.into(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }

    pub fn render(&self) -> String {
        match &self.comment {
            Some(comment) => format!(
                "{INDENT}{}: {}; /* {} */",
                self.name,
                self.value,
                comment.replace("*/", "* /")
            ),
            None => format!("{INDENT}{}: {};", self.name, self.value),
        }
    }
}

/// Declarations keyed by property name. Iteration is ascending by name and a
/// repeated name replaces the earlier declaration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeclarationSet {
    entries: BTreeMap<String, Declaration>,
}

impl DeclarationSet {
    pub fn insert(&mut self, declaration: Declaration) {
        if let Some(previous) = self
            .entries
            .insert(declaration.name.clone(), declaration)
        {
            tracing::warn!(
                name = %previous.name,
                replaced = %previous.value,
                "duplicate CSS variable name; keeping the later token"
            );
        }
    }

    pub fn get(&self, name: &str) -> Option<&Declaration> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_css(&self) -> String {
        render_root_block(self.iter())
    }
}

pub fn render_root_block<'a>(declarations: impl IntoIterator<Item = &'a Declaration>) -> String {
    let mut css = String::from(":root {\n");
    for declaration in declarations {
        css.push_str(&declaration.render());
        css.push('\n');
    }
    css.push_str("}\n");
    css
}
