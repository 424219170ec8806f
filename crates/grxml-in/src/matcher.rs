//! Utterance matching for GRXML grammars.
//!
//! Applies a compiled grammar pattern to an utterance. Confidence is a fixed
//! signal derived from the input mode: 1 for DTMF, 0 for voice.

use crate::compiler::{Pattern, Separator};
use crate::model::Mode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Result of matching an utterance against a grammar
#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult {
    /// The whole utterance is accepted by the grammar
    Match(Match),
    /// The utterance is not accepted
    NoMatch(NoMatch),
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Match(_))
    }

    pub fn into_match(self) -> Option<Match> {
        match self {
            MatchResult::Match(m) => Some(m),
            MatchResult::NoMatch(_) => None,
        }
    }
}

/// A successful match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub mode: Option<Mode>,
    /// 1 for DTMF grammars, 0 otherwise
    pub confidence: u8,
    /// The utterance exactly as given
    pub utterance: String,
    pub interpretation: Value,
}

/// Marker for an utterance the grammar does not accept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoMatch;

/// Derives the interpretation of an accepted utterance.
pub trait Interpret: Send + Sync {
    fn interpret(&self, utterance: &str) -> Value;
}

/// Interpretation is the utterance itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoInterpreter;

impl Interpret for EchoInterpreter {
    fn interpret(&self, utterance: &str) -> Value {
        Value::String(utterance.to_string())
    }
}

pub fn confidence_for(mode: Option<Mode>) -> u8 {
    match mode {
        Some(Mode::Dtmf) => 1,
        _ => 0,
    }
}

/// Compiled grammar ready for matching. Immutable; share it freely.
#[derive(Clone)]
pub struct CompiledGrammar {
    mode: Option<Mode>,
    pattern: Pattern,
    interpreter: Arc<dyn Interpret>,
}

impl CompiledGrammar {
    pub fn new(mode: Option<Mode>, pattern: Pattern) -> Self {
        Self {
            mode,
            pattern,
            interpreter: Arc::new(EchoInterpreter),
        }
    }

    /// Replace the default echo interpretation.
    pub fn with_interpreter(mut self, interpreter: impl Interpret + 'static) -> Self {
        self.interpreter = Arc::new(interpreter);
        self
    }

    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn match_utterance(&self, utterance: &str) -> MatchResult {
        match_text(utterance, self)
    }
}

impl fmt::Debug for CompiledGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledGrammar")
            .field("mode", &self.mode)
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

/// Match an utterance against a compiled grammar
pub fn match_text(utterance: &str, grammar: &CompiledGrammar) -> MatchResult {
    if grammar.pattern.is_empty() {
        tracing::debug!("grammar has no matchable content");
        return MatchResult::NoMatch(NoMatch);
    }

    let canonical = Separator::for_mode(grammar.mode).canonicalize(utterance);
    if !grammar.pattern.is_match(&canonical) {
        tracing::debug!(utterance, "no match");
        return MatchResult::NoMatch(NoMatch);
    }

    tracing::debug!(utterance, mode = ?grammar.mode, "match");
    MatchResult::Match(Match {
        mode: grammar.mode,
        confidence: confidence_for(grammar.mode),
        utterance: utterance.to_string(),
        interpretation: grammar.interpreter.interpret(utterance),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile_rule;
    use crate::model::Rule;
    use grxml_core::CompileOptions;
    use serde_json::json;

    fn hello_world(mode: Mode) -> CompiledGrammar {
        let rule = Rule::new("main").with_tokens(&["hello", "world"]);
        let pattern = compile_rule(Some(&rule), Some(mode), &CompileOptions::default()).unwrap();
        CompiledGrammar::new(Some(mode), pattern)
    }

    #[test]
    fn test_simple_match() {
        let grammar = hello_world(Mode::Voice);
        let result = grammar.match_utterance("hello world");

        if let MatchResult::Match(m) = result {
            assert_eq!(m.confidence, 0);
            assert_eq!(m.mode, Some(Mode::Voice));
            assert_eq!(m.utterance, "hello world");
            assert_eq!(m.interpretation, json!("hello world"));
        } else {
            panic!("Expected match");
        }
    }

    #[test]
    fn test_anchored() {
        let grammar = hello_world(Mode::Voice);
        assert_eq!(grammar.match_utterance("hello"), MatchResult::NoMatch(NoMatch));
        assert_eq!(
            grammar.match_utterance("hello world now"),
            MatchResult::NoMatch(NoMatch)
        );
        assert!(!grammar.match_utterance("oh hello world").is_match());
    }

    #[test]
    fn test_whitespace_in_utterance_is_canonicalized() {
        let grammar = hello_world(Mode::Voice);
        let m = grammar.match_utterance("  hello   world ").into_match().unwrap();
        assert_eq!(m.utterance, "  hello   world ");
    }

    #[test]
    fn test_dtmf_confidence() {
        let grammar = hello_world(Mode::Dtmf);
        let m = grammar.match_utterance("hello world").into_match().unwrap();
        assert_eq!(m.confidence, 1);
    }

    #[test]
    fn test_empty_pattern_never_matches() {
        let grammar = CompiledGrammar::new(None, Pattern::empty());
        assert!(!grammar.match_utterance("").is_match());
        assert!(!grammar.match_utterance("anything").is_match());
    }

    struct WordCount;

    impl Interpret for WordCount {
        fn interpret(&self, utterance: &str) -> Value {
            json!({ "words": utterance.split_whitespace().count() })
        }
    }

    #[test]
    fn test_custom_interpreter() {
        let grammar = hello_world(Mode::Voice).with_interpreter(WordCount);
        let m = grammar.match_utterance("hello world").into_match().unwrap();
        assert_eq!(m.interpretation, json!({ "words": 2 }));
    }

    #[test]
    fn test_compiled_grammar_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CompiledGrammar>();
    }
}
