pub mod compiler;
pub mod config;
pub mod error;
pub mod logging;
pub mod overlay;
pub mod storage;
pub mod tokens;

use std::fmt;
use std::path::PathBuf;

use compiler::{compile_primitive, compile_semantic, InvalidReference};
use tokens::TokenDocument;

pub use config::BuildConfig;
pub use error::{AppError, AppResult};

/// What one compiler run produced, rendered as the CLI summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub output: PathBuf,
    pub variable_count: usize,
    pub invalid_references: Vec<InvalidReference>,
}

impl fmt::Display for BuildSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Generated {} CSS variables", self.variable_count)?;
        writeln!(f, "Saved to {}", self.output.display())?;
        if !self.invalid_references.is_empty() {
            writeln!(
                f,
                "Found {} invalid references:",
                self.invalid_references.len()
            )?;
            for reference in &self.invalid_references {
                writeln!(f, "  {reference}")?;
            }
        }
        Ok(())
    }
}

/// Reads the token file, emits every non-semantic token and writes the
/// primitive stylesheet.
pub fn build_primitive_tokens(config: &BuildConfig) -> AppResult<BuildSummary> {
    tracing::info!(input = %config.input.display(), "building primitive tokens");
    let source = storage::read_document(&config.input)?;
    let document = TokenDocument::parse(&source)?;

    let output = compile_primitive(&document);
    storage::write_stylesheet(&config.primitive_output, &output.to_css())?;

    tracing::info!(
        count = output.variable_count(),
        output = %config.primitive_output.display(),
        "primitive tokens written"
    );
    Ok(BuildSummary {
        output: config.primitive_output.clone(),
        variable_count: output.variable_count(),
        invalid_references: Vec::new(),
    })
}

/// Reads the token file, resolves the semantic subtree and writes the
/// semantic stylesheet. Unresolved references are returned, not fatal.
pub fn build_semantic_tokens(config: &BuildConfig) -> AppResult<BuildSummary> {
    tracing::info!(input = %config.input.display(), "building semantic tokens");
    let source = storage::read_document(&config.input)?;
    let document = TokenDocument::parse(&source)?;

    let output = compile_semantic(&document)?;
    storage::write_stylesheet(&config.semantic_output, &output.to_css())?;

    tracing::info!(
        count = output.variable_count(),
        invalid = output.invalid_references.len(),
        output = %config.semantic_output.display(),
        "semantic tokens written"
    );
    Ok(BuildSummary {
        output: config.semantic_output.clone(),
        variable_count: output.variable_count(),
        invalid_references: output.invalid_references,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    const TOKENS: &str = r##"{
        "Spacing": { "Base": { "4": { "$value": 16 } } },
        "Color": { "Neutral": { "950": { "$value": "#0a0a0a" } } },
        "Color/Stroke": {
            "Subtle": { "$value": "#e5e5e5" },
            "Semantic": {
                "Default": { "$value": "{Color/Neutral/950}", "$type": "color" },
                "Broken": { "$value": "{Color//Nope}" }
            }
        }
    }"##;

    fn fixture_root() -> PathBuf {
        let mut path = std::env::temp_dir();
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::SystemTime::UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        let pid = std::process::id();
        path.push(format!("tokencss-build-{pid}-{nanos}"));
        path
    }

    fn with_temp_root<F: FnOnce(&Path)>(f: F) {
        let root = fixture_root();
        fs::create_dir_all(&root).unwrap();
        f(&root);
        let _ = fs::remove_dir_all(&root);
    }

    fn write_tokens(config: &BuildConfig, contents: &str) {
        fs::create_dir_all(config.input.parent().unwrap()).unwrap();
        fs::write(&config.input, contents).unwrap();
    }

    #[test]
    fn build_primitive_tokens_writes_stylesheet() {
        with_temp_root(|root| {
            let config = BuildConfig::with_root(root);
            write_tokens(&config, TOKENS);

            let summary = build_primitive_tokens(&config).unwrap();
            assert_eq!(summary.variable_count, 3);
            assert_eq!(
                fs::read_to_string(&config.primitive_output).unwrap(),
                concat!(
                    ":root {\n",
                    "  --color-neutral-950: #0a0a0a;\n",
                    "  --color-stroke-subtle: #e5e5e5;\n",
                    "  --spacing-base-4: 16px;\n",
                    "}\n",
                )
            );
        });
    }

    #[test]
    fn build_semantic_tokens_reports_invalid_references() {
        with_temp_root(|root| {
            let config = BuildConfig::with_root(root);
            write_tokens(&config, TOKENS);

            let summary = build_semantic_tokens(&config).unwrap();
            assert_eq!(summary.variable_count, 2);
            assert_eq!(summary.invalid_references.len(), 1);
            assert_eq!(
                fs::read_to_string(&config.semantic_output).unwrap(),
                concat!(
                    ":root {\n",
                    "  --semantic-broken: {Color//Nope};\n",
                    "  --semantic-default: var(--color-neutral-950); /* color */\n",
                    "}\n",
                )
            );
            assert_eq!(
                summary.to_string(),
                format!(
                    "Generated 2 CSS variables\nSaved to {}\nFound 1 invalid references:\n  --semantic-broken: {{Color//Nope}}\n",
                    config.semantic_output.display()
                )
            );
        });
    }

    #[test]
    fn builds_are_byte_identical_across_runs() {
        with_temp_root(|root| {
            let config = BuildConfig::with_root(root);
            write_tokens(&config, TOKENS);

            build_primitive_tokens(&config).unwrap();
            let first = fs::read_to_string(&config.primitive_output).unwrap();
            build_primitive_tokens(&config).unwrap();
            assert_eq!(fs::read_to_string(&config.primitive_output).unwrap(), first);
        });
    }

    #[test]
    fn missing_input_is_fatal_and_writes_nothing() {
        with_temp_root(|root| {
            let config = BuildConfig::with_root(root);
            let err = build_primitive_tokens(&config).unwrap_err();
            assert!(matches!(
                err,
                AppError::Storage(storage::StorageError::MissingInput { .. })
            ));
            assert!(!config.primitive_output.exists());
        });
    }

    #[test]
    fn invalid_json_is_fatal() {
        with_temp_root(|root| {
            let config = BuildConfig::with_root(root);
            write_tokens(&config, "{ invalid ");
            let err = build_semantic_tokens(&config).unwrap_err();
            assert!(matches!(err, AppError::Token(tokens::TokenError::Parse(_))));
            assert!(!config.semantic_output.exists());
        });
    }

    #[test]
    fn missing_semantic_section_is_fatal_before_writing() {
        with_temp_root(|root| {
            let config = BuildConfig::with_root(root);
            write_tokens(&config, r##"{ "Color": { "Red": { "$value": "#f00" } } }"##);

            let err = build_semantic_tokens(&config).unwrap_err();
            assert!(matches!(
                err,
                AppError::Token(tokens::TokenError::MissingSection { .. })
            ));
            assert!(!config.semantic_output.exists());
            assert!(build_primitive_tokens(&config).is_ok());
        });
    }
}
