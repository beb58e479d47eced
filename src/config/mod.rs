use std::path::{Path, PathBuf};

use serde::Deserialize;

const ROOT_ENV: &str = "TOKENCSS_ROOT";
const CONFIG_FILE: &str = "tokencss.json";

const DEFAULT_INPUT: &str = "tokens/tokens.json";
const DEFAULT_PRIMITIVE_OUTPUT: &str = "src/styles/tokens.css";
const DEFAULT_SEMANTIC_OUTPUT: &str = "src/styles/semantic-tokens.css";

/// Optional path overrides from `tokencss.json`.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigOverrides {
    #[serde(default)]
    input: Option<PathBuf>,
    #[serde(default)]
    primitive_output: Option<PathBuf>,
    #[serde(default)]
    semantic_output: Option<PathBuf>,
}

/// Input and output locations for one build, already resolved against the
/// project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub input: PathBuf,
    pub primitive_output: PathBuf,
    pub semantic_output: PathBuf,
}

impl BuildConfig {
    pub fn with_root(root: &Path) -> Self {
        Self {
            input: root.join(DEFAULT_INPUT),
            primitive_output: root.join(DEFAULT_PRIMITIVE_OUTPUT),
            semantic_output: root.join(DEFAULT_SEMANTIC_OUTPUT),
        }
    }

    pub fn load() -> Self {
        let env_root = std::env::var_os(ROOT_ENV).map(PathBuf::from);
        let cwd = std::env::current_dir().ok();
        Self::load_from(&project_root(env_root.as_deref(), cwd.as_deref()))
    }

    /// Defaults under `root`, overridden by `root/tokencss.json` when it exists
    /// and parses. A broken config file only costs a warning.
    pub fn load_from(root: &Path) -> Self {
        let mut config = Self::with_root(root);
        let overrides = load_overrides(&root.join(CONFIG_FILE));
        if let Some(input) = overrides.input {
            config.input = root.join(input);
        }
        if let Some(output) = overrides.primitive_output {
            config.primitive_output = root.join(output);
        }
        if let Some(output) = overrides.semantic_output {
            config.semantic_output = root.join(output);
        }
        tracing::debug!(?config, "resolved build config");
        config
    }
}

fn load_overrides(path: &Path) -> ConfigOverrides {
    if !path.exists() {
        return ConfigOverrides::default();
    }
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse tokencss.json; using defaults");
            ConfigOverrides::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read tokencss.json; using defaults");
            ConfigOverrides::default()
        }
    }
}

pub(crate) fn project_root(env_root: Option<&Path>, cwd: Option<&Path>) -> PathBuf {
    if let Some(root) = env_root.filter(|path| !path.as_os_str().is_empty()) {
        return root.to_path_buf();
    }
    cwd.map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}
