//! Errors raised while building, preparing or compiling a grammar.
//!
//! None of these are recoverable: a grammar that produced one should not be
//! used for matching.
use grxml_core::PipelineError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("CHILD/{0}")]
    InvalidChild(String),

    #[error("CHILD/MODE: embedded grammars must have the same mode (expected {expected}, found {found})")]
    ModeMismatch { expected: String, found: String },

    #[error("REF/UNRESOLVED: no rule matches reference {0}")]
    UnresolvedReference(String),

    #[error("REF/CYCLE: {}", .0.join(" -> "))]
    CyclicReference(Vec<String>),

    #[error("ROOT/MISSING: a grammar must have a rule matching the root rule name {0:?}")]
    MissingRootRule(String),

    #[error("REF/UNINLINED: reference {0} reached the pattern compiler; inline the grammar first")]
    UninlinedReference(String),

    #[error("ATTR/{element}.{name}: invalid value {value:?}")]
    InvalidAttribute {
        element: String,
        name: String,
        value: String,
    },

    #[error("DOC/{0}")]
    Document(String),

    #[error("PATTERN/{0}")]
    Pattern(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl GrammarError {
    /// Structural violations of what a grammar may contain. Embedding a
    /// grammar of another mode counts as one.
    pub fn is_invalid_child(&self) -> bool {
        matches!(self, Self::InvalidChild(_) | Self::ModeMismatch { .. })
    }

    pub(crate) fn invalid_attribute(element: &str, name: &str, value: &str) -> Self {
        Self::InvalidAttribute {
            element: element.to_string(),
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

impl From<grxml_doc::ParseError> for GrammarError {
    fn from(err: grxml_doc::ParseError) -> Self {
        Self::Document(err.to_string())
    }
}
