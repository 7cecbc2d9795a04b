// Rule-based post-processing of model outputs.
// WHY: rules run in declared order, each a plain pattern/replacement pair.

use regex_automata::meta::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::error::{EvalError, Result};
use crate::scoring::Sample;

/// One named rewrite as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub name: String,
    pub pattern: String,
    /// Replacement text; `$1` / `${name}` refer to capture groups
    pub replacement: String,
}

impl RuleConfig {
    pub fn new(name: &str, pattern: &str, replacement: &str) -> Self {
        Self {
            name: name.to_string(),
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
        }
    }
}

/// A named, ordered rule list plus its application guards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSetConfig {
    pub rules: Vec<RuleConfig>,
    /// Only rewrite when the model returned the original unchanged
    pub only_when_unchanged: bool,
    pub min_length_ratio: f64,
    pub max_length_ratio: f64,
}

impl Default for RuleSetConfig {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            only_when_unchanged: true,
            min_length_ratio: 0.6,
            max_length_ratio: 1.5,
        }
    }
}

/// Rewrite rejected by a guard; the caller picks the fallback text.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ProcessingError {
    /// Rewritten length over model-output length fell outside the allowed range
    #[error("length ratio {ratio:.2} outside guard range")]
    LengthGuard { ratio: f64 },
}

#[derive(Debug, Clone)]
struct Rule {
    name: String,
    regex: Regex,
    replacement: String,
}

impl Rule {
    fn compile(config: &RuleConfig) -> Result<Self> {
        let regex = Regex::new(&config.pattern).map_err(|e| EvalError::pattern(&config.name, e))?;
        Ok(Self {
            name: config.name.clone(),
            regex,
            replacement: config.replacement.clone(),
        })
    }

    /// Replace every non-overlapping match, expanding group references.
    fn replace_all(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for caps in self.regex.captures_iter(text) {
            let Some(m) = caps.get_match() else { continue };
            out.push_str(&text[last..m.start()]);
            caps.interpolate_string_into(text, &self.replacement, &mut out);
            last = m.end();
        }
        out.push_str(&text[last..]);
        out
    }
}

/// Compiled rule pipeline.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
    only_when_unchanged: bool,
    min_length_ratio: f64,
    max_length_ratio: f64,
}

impl RuleSet {
    pub fn compile(config: &RuleSetConfig) -> Result<Self> {
        let rules = config.rules.iter().map(Rule::compile).collect::<Result<Vec<_>>>()?;
        Ok(Self {
            rules,
            only_when_unchanged: config.only_when_unchanged,
            min_length_ratio: config.min_length_ratio,
            max_length_ratio: config.max_length_ratio,
        })
    }

    /// Conservative built-in rules with near-zero false-positive rates.
    pub fn minimal_config() -> RuleSetConfig {
        RuleSetConfig {
            rules: vec![
                RuleConfig::new("금새→금세", "금새", "금세"),
                RuleConfig::new("치않→지않", r"([가-힣]+)치\s+(않[가-힣]*)", "${1}지 ${2}"),
                RuleConfig::new("추측컨대→추측건대", "추측컨대", "추측건대"),
            ],
            ..RuleSetConfig::default()
        }
    }

    pub fn minimal() -> Result<Self> {
        Self::compile(&Self::minimal_config())
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.name.as_str())
    }

    /// Run every rule in order over `text`.
    pub fn apply(&self, text: &str) -> String {
        let mut current = text.to_string();
        for rule in &self.rules {
            let next = rule.replace_all(&current);
            if next != current {
                debug!(rule = %rule.name, "Rule rewrote text");
                current = next;
            }
        }
        current
    }

    /// Post-process one model output against its original sentence.
    ///
    /// Returns the model output untouched when the guards say the rules do
    /// not apply, the rewritten text when they do, and `Err` when the rewrite
    /// changes the length too much.
    pub fn process(&self, original: &str, model_output: &str) -> std::result::Result<String, ProcessingError> {
        if self.only_when_unchanged && original.trim() != model_output.trim() {
            return Ok(model_output.to_string());
        }

        let rewritten = self.apply(model_output);
        if rewritten.trim() == model_output.trim() {
            return Ok(model_output.to_string());
        }

        let base_len = model_output.chars().count();
        if base_len > 0 {
            let ratio = rewritten.chars().count() as f64 / base_len as f64;
            if ratio < self.min_length_ratio || ratio > self.max_length_ratio {
                return Err(ProcessingError::LengthGuard { ratio });
            }
        }

        Ok(rewritten)
    }

    /// [`RuleSet::process`], falling back to the original sentence when a
    /// guard rejects the rewrite.
    pub fn process_or_original(&self, original: &str, model_output: &str) -> String {
        self.process(original, model_output).unwrap_or_else(|e| {
            debug!(error = %e, "Rewrite rejected, keeping original");
            original.to_string()
        })
    }

    /// Rewrite every sample's prediction in place; returns how many changed.
    pub fn apply_to_predictions(&self, samples: &mut [Sample]) -> usize {
        let mut changed = 0;
        for sample in samples.iter_mut() {
            let processed = self.process_or_original(&sample.original, &sample.predicted);
            if processed != sample.predicted {
                sample.predicted = processed;
                changed += 1;
            }
        }
        info!(samples = samples.len(), changed, "Applied post-processing rules");
        changed
    }
}
