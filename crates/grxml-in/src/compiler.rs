//! Compiles an inlined grammar into one anchored regular expression.
//!
//! Each node kind contributes a fragment; a rule body is the concatenation of
//! its fragments in document order. Voice grammars emit every word with a
//! leading space and match against the utterance rewritten as
//! `" " + words.join(" ")`, so optional and repeated items never produce
//! doubled separators. DTMF grammars emit bare keys and match against the
//! utterance with all whitespace removed.

use crate::error::GrammarError;
use crate::model::{Container, Element, GrammarNode, Mode, Repeat, Rule, Token};
use crate::tokenizer::split_tokens;
use grxml_core::CompileOptions;
use regex::{Regex, RegexBuilder};
use std::fmt;

/// Fragment that can never match (an empty character class).
const NEVER: &str = r"[^\x00-\x{10FFFF}]";

/// How adjacent words are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// Words separated by whitespace (voice and unset modes).
    Space,
    /// Keys pressed back to back (DTMF).
    Adjacent,
}

impl Separator {
    pub fn for_mode(mode: Option<Mode>) -> Self {
        match mode {
            Some(Mode::Dtmf) => Separator::Adjacent,
            Some(Mode::Voice) | None => Separator::Space,
        }
    }

    /// Rewrite an utterance into the form compiled patterns expect.
    pub fn canonicalize(&self, utterance: &str) -> String {
        match self {
            Separator::Space => utterance
                .split_whitespace()
                .fold(String::new(), |mut out, word| {
                    out.push(' ');
                    out.push_str(word);
                    out
                }),
            Separator::Adjacent => utterance.split_whitespace().collect(),
        }
    }
}

/// Compiled, anchored grammar pattern. The empty pattern matches nothing.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Option<Regex>,
}

impl Pattern {
    pub fn empty() -> Self {
        Self { regex: None }
    }

    pub fn is_empty(&self) -> bool {
        self.regex.is_none()
    }

    /// Regex source, or `""` for the empty pattern.
    pub fn as_str(&self) -> &str {
        self.regex.as_ref().map(Regex::as_str).unwrap_or("")
    }

    /// Test an already canonicalized utterance.
    pub fn is_match(&self, canonical: &str) -> bool {
        self.regex.as_ref().is_some_and(|re| re.is_match(canonical))
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-node contribution to the grammar pattern.
pub trait PatternFragment {
    fn pattern_fragment(&self, sep: Separator) -> Result<String, GrammarError>;
}

impl PatternFragment for Token {
    fn pattern_fragment(&self, sep: Separator) -> Result<String, GrammarError> {
        Ok(word_fragment(&self.text, sep))
    }
}

impl PatternFragment for GrammarNode {
    fn pattern_fragment(&self, sep: Separator) -> Result<String, GrammarError> {
        match self {
            GrammarNode::Literal(text) => Ok(split_tokens(text)
                .iter()
                .map(|t| word_fragment(t, sep))
                .collect()),
            GrammarNode::Token(token) => token.pattern_fragment(sep),
            GrammarNode::RuleRef(reference) => {
                Err(GrammarError::UninlinedReference(reference.uri.clone()))
            }
            GrammarNode::Tag(_) => Ok(String::new()),
            GrammarNode::Element(el) => el.pattern_fragment(sep),
        }
    }
}

impl PatternFragment for Element {
    fn pattern_fragment(&self, sep: Separator) -> Result<String, GrammarError> {
        match &self.container {
            Container::Item { repeat } => {
                let inner = sequence(&self.children, sep)?;
                Ok(match repeat {
                    Some(repeat) if !inner.is_empty() => {
                        format!("(?:{}){}", inner, quantifier(repeat))
                    }
                    _ => inner,
                })
            }
            Container::OneOf => {
                let alternatives = self
                    .children
                    .iter()
                    .filter(|child| !matches!(child, GrammarNode::Tag(_)))
                    .map(|child| child.pattern_fragment(sep))
                    .collect::<Result<Vec<_>, _>>()?;

                if alternatives.is_empty() {
                    Ok(NEVER.to_string())
                } else {
                    Ok(format!("(?:{})", alternatives.join("|")))
                }
            }
            Container::Opaque { .. } => sequence(&self.children, sep),
        }
    }
}

impl PatternFragment for Rule {
    fn pattern_fragment(&self, sep: Separator) -> Result<String, GrammarError> {
        sequence(&self.body, sep)
    }
}

fn sequence(nodes: &[GrammarNode], sep: Separator) -> Result<String, GrammarError> {
    nodes.iter().map(|node| node.pattern_fragment(sep)).collect()
}

fn word_fragment(text: &str, sep: Separator) -> String {
    let mut out = String::new();
    for word in text.split_whitespace() {
        if sep == Separator::Space {
            out.push(' ');
        }
        out.push_str(&regex::escape(word));
    }
    out
}

fn quantifier(repeat: &Repeat) -> String {
    match (repeat.min, repeat.max) {
        (0, Some(1)) => "?".to_string(),
        (0, None) => "*".to_string(),
        (1, None) => "+".to_string(),
        (min, None) => format!("{{{},}}", min),
        (min, Some(max)) if min == max => format!("{{{}}}", min),
        (min, Some(max)) => format!("{{{},{}}}", min, max),
    }
}

/// Compile `root` (the grammar's root rule, if any) into an anchored pattern.
///
/// A missing root rule or a body with no matchable content yields the empty
/// pattern rather than one that accepts the empty string.
pub fn compile_rule(
    root: Option<&Rule>,
    mode: Option<Mode>,
    options: &CompileOptions,
) -> Result<Pattern, GrammarError> {
    let Some(rule) = root else {
        return Ok(Pattern::empty());
    };

    let body = rule.pattern_fragment(Separator::for_mode(mode))?;
    if body.is_empty() {
        return Ok(Pattern::empty());
    }

    let source = format!("^{}$", body);
    let regex = RegexBuilder::new(&source)
        .case_insensitive(options.case_insensitive)
        .build()
        .map_err(|e| GrammarError::Pattern(e.to_string()))?;

    tracing::debug!(rule = %rule.id, pattern = %source, "compiled grammar pattern");
    Ok(Pattern { regex: Some(regex) })
}
