// Evaluation configuration, loaded once at startup and passed by reference.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::info;

use crate::alignment::{Aligner, DEFAULT_MERGE_WINDOW};
use crate::error::{EvalError, Result};
use crate::postprocess::{RuleSet, RuleSetConfig};
use crate::scoring::Scorer;

/// Top-level configuration (TOML).
///
/// ```toml
/// merge_window = 2
///
/// [postprocessors.minimal]
/// only_when_unchanged = true
///
/// [[postprocessors.minimal.rules]]
/// name = "금새→금세"
/// pattern = "금새"
/// replacement = "금세"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Near-adjacent span merge window, in original-token positions
    pub merge_window: usize,
    /// Name-keyed post-processor registry
    pub postprocessors: BTreeMap<String, RuleSetConfig>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        let mut postprocessors = BTreeMap::new();
        postprocessors.insert("minimal".to_string(), RuleSet::minimal_config());
        Self {
            merge_window: DEFAULT_MERGE_WINDOW,
            postprocessors,
        }
    }
}

impl EvalConfig {
    /// Parse TOML; post-processors the file declares are added to the
    /// built-in registry, replacing a built-in entry of the same name.
    pub fn from_toml_str(content: &str, source: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(|e| EvalError::config(source, e))?;
        for (name, builtin) in Self::default().postprocessors {
            config.postprocessors.entry(name).or_insert(builtin);
        }
        Ok(config)
    }

    /// Load from a TOML file; fields the file omits keep their defaults.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| EvalError::io(format!("reading config {}", path.display()), e))?;
        let config = Self::from_toml_str(&content, &path.display().to_string())?;
        info!(
            path = %path.display(),
            merge_window = config.merge_window,
            postprocessors = config.postprocessors.len(),
            "Loaded evaluation config"
        );
        Ok(config)
    }

    /// Load from `path` when given, defaults otherwise.
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path).await,
            None => Ok(Self::default()),
        }
    }

    pub fn scorer(&self) -> Scorer {
        Scorer::new(Aligner::new(self.merge_window))
    }

    /// Compile the named post-processor from the registry.
    pub fn postprocessor(&self, name: &str) -> Result<RuleSet> {
        let config = self
            .postprocessors
            .get(name)
            .ok_or_else(|| EvalError::UnknownPostprocessor {
                name: name.to_string(),
                available: self.postprocessors.keys().cloned().collect(),
            })?;
        RuleSet::compile(config)
    }
}
