//! Execution context and compile options shared by every stage.
use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options that change how a grammar is compiled into a pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOptions {
    /// Match tokens regardless of letter case. Off by default.
    #[serde(default)]
    pub case_insensitive: bool,
}

impl CompileOptions {
    /// Read options from YAML. Absent keys take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, PipelineError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
            .map_err(|e| PipelineError::Config(format!("invalid compile options: {}", e)))
    }

    /// Load options from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    pub fn case_insensitive(mut self, on: bool) -> Self {
        self.case_insensitive = on;
        self
    }
}

#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub trace_id: String,
    pub options: CompileOptions,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self {
            trace_id: uuid::Uuid::new_v4().to_string(),
            options: CompileOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_yaml() {
        let opts = CompileOptions::from_yaml("case_insensitive: true\n").unwrap();
        assert!(opts.case_insensitive);
    }

    #[test]
    fn test_options_defaults() {
        assert_eq!(CompileOptions::from_yaml("").unwrap(), CompileOptions::default());
        assert_eq!(CompileOptions::from_yaml("{}").unwrap(), CompileOptions::default());
    }

    #[test]
    fn test_options_reject_garbage() {
        let err = CompileOptions::from_yaml("case_insensitive: [1, 2]").unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn test_context_trace_ids_are_unique() {
        let a = ExecutionContext::new();
        let b = ExecutionContext::new();
        assert_ne!(a.trace_id, b.trace_id);
        assert!(!a.options.case_insensitive);
    }
}
