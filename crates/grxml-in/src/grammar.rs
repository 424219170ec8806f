//! The grammar façade.
//!
//! A [`Grammar`] owns its rules and top-level tags and orchestrates the
//! preparation passes and compilation:
//!
//! ```text
//! inline → normalize_whitespace → tokenize → compile → match
//! ```
//!
//! Every mutating pass has a non-mutating counterpart that clones first.

use crate::compiler::{compile_rule, Pattern};
use crate::error::GrammarError;
use crate::matcher::{CompiledGrammar, MatchResult};
use crate::model::{mode_label, Container, GrammarChild, GrammarNode, Mode, Rule, Tag};
use crate::{document, inline, normalizer, stages, tokenizer};
use grxml_core::{CompileOptions, ExecutionContext, PipelineReport};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Grammar {
    mode: Option<Mode>,
    language: Option<String>,
    base_uri: Option<String>,
    root: Option<String>,
    tag_format: Option<String>,
    children: Vec<GrammarChild>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a GRXML document.
    pub fn from_xml(xml: &str) -> Result<Self, GrammarError> {
        let element = grxml_doc::parse_document(xml)?;
        document::grammar_from_element(&element)
    }

    pub fn to_xml(&self) -> String {
        grxml_doc::serialize_document(&document::grammar_to_element(self))
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Add a rule. Rules are always valid grammar children.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.children.push(GrammarChild::Rule(rule));
        self
    }

    /// Input mode; `None` when the document does not declare one.
    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = Some(mode);
    }

    pub fn is_dtmf(&self) -> bool {
        self.mode == Some(Mode::Dtmf)
    }

    pub fn is_voice(&self) -> bool {
        self.mode == Some(Mode::Voice)
    }

    /// Id of the root rule.
    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    pub fn set_root(&mut self, root: impl Into<String>) {
        self.root = Some(root.into());
    }

    /// Content type of the grammar's `<tag>` elements.
    pub fn tag_format(&self) -> Option<&str> {
        self.tag_format.as_deref()
    }

    pub fn set_tag_format(&mut self, tag_format: impl Into<String>) {
        self.tag_format = Some(tag_format.into());
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = Some(language.into());
    }

    pub fn base_uri(&self) -> Option<&str> {
        self.base_uri.as_deref()
    }

    pub fn set_base_uri(&mut self, base_uri: impl Into<String>) {
        self.base_uri = Some(base_uri.into());
    }

    // ------------------------------------------------------------------
    // Content
    // ------------------------------------------------------------------

    pub fn children(&self) -> &[GrammarChild] {
        &self.children
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.children.iter().filter_map(|child| match child {
            GrammarChild::Rule(rule) => Some(rule),
            GrammarChild::Node(_) => None,
        })
    }

    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.children.iter().filter_map(|child| match child {
            GrammarChild::Node(GrammarNode::Tag(tag)) => Some(tag),
            _ => None,
        })
    }

    pub fn rule(&self, id: &str) -> Option<&Rule> {
        self.rules().find(|rule| rule.id == id)
    }

    pub fn root_rule(&self) -> Option<&Rule> {
        self.root.as_deref().and_then(|root| self.rule(root))
    }

    /// True when no root is declared, or the declared root exists.
    pub fn has_matching_root_rule(&self) -> bool {
        self.root.is_none() || self.root_rule().is_some()
    }

    pub fn assert_has_matching_root_rule(self) -> Result<Self, GrammarError> {
        match &self.root {
            Some(root) if self.root_rule().is_none() => {
                Err(GrammarError::MissingRootRule(root.clone()))
            }
            _ => Ok(self),
        }
    }

    /// Append a top-level child. Only rules, tags, text and elements outside
    /// the grammar vocabulary are accepted.
    pub fn append(&mut self, child: impl Into<GrammarChild>) -> Result<&mut Self, GrammarError> {
        let child = child.into();
        match &child {
            GrammarChild::Rule(_)
            | GrammarChild::Node(GrammarNode::Tag(_))
            | GrammarChild::Node(GrammarNode::Literal(_)) => {}
            GrammarChild::Node(GrammarNode::Element(el))
                if matches!(el.container, Container::Opaque { .. }) => {}
            GrammarChild::Node(other) => {
                return Err(GrammarError::InvalidChild(format!(
                    "a grammar can only accept rules and tags as children, got <{}>",
                    other.kind()
                )));
            }
        }
        self.children.push(child);
        Ok(self)
    }

    /// Merge another grammar's content into this one. Both grammars must
    /// declare the same mode.
    pub fn embed(&mut self, other: Grammar) -> Result<&mut Self, GrammarError> {
        if other.mode != self.mode {
            return Err(GrammarError::ModeMismatch {
                expected: mode_label(self.mode),
                found: mode_label(other.mode),
            });
        }
        for child in other.children {
            self.append(child)?;
        }
        Ok(self)
    }

    /// Parse a GRXML document and embed it.
    pub fn embed_document(&mut self, xml: &str) -> Result<&mut Self, GrammarError> {
        let other = Grammar::from_xml(xml)?;
        self.embed(other)
    }

    // ------------------------------------------------------------------
    // Passes
    // ------------------------------------------------------------------

    /// Inlined copy of this grammar.
    pub fn inline(&self) -> Result<Grammar, GrammarError> {
        let mut grammar = self.clone();
        grammar.inline_in_place()?;
        Ok(grammar)
    }

    /// Replace every rule reference with the referenced content and drop
    /// every rule but the root.
    pub fn inline_in_place(&mut self) -> Result<&mut Self, GrammarError> {
        inline::inline_children(&mut self.children, self.root.as_deref())?;
        Ok(self)
    }

    /// Split raw rule text into tokens.
    pub fn tokenize(&mut self) -> &mut Self {
        tokenizer::tokenize_children(&mut self.children);
        self
    }

    /// Collapse whitespace in the text of every descendant.
    pub fn normalize_whitespace(&mut self) -> &mut Self {
        normalizer::normalize_children(&mut self.children);
        self
    }

    /// Run inline → normalize → tokenize on this grammar. On failure the
    /// grammar is left as it was.
    pub fn prepare(&mut self, ctx: &ExecutionContext) -> Result<PipelineReport, GrammarError> {
        let (prepared, report) = self.prepared(ctx)?;
        *self = prepared;
        Ok(report)
    }

    /// Prepared copy of this grammar and the run report.
    pub fn prepared(&self, ctx: &ExecutionContext) -> Result<(Grammar, PipelineReport), GrammarError> {
        stages::standard_pipeline().run(self.clone(), ctx)
    }

    // ------------------------------------------------------------------
    // Compilation & matching
    // ------------------------------------------------------------------

    pub fn compile(&self, options: &CompileOptions) -> Result<CompiledGrammar, GrammarError> {
        let pattern = compile_rule(self.root_rule(), self.mode, options)?;
        Ok(CompiledGrammar::new(self.mode, pattern))
    }

    /// The compiled pattern with default options.
    pub fn to_regexp(&self) -> Result<Pattern, GrammarError> {
        compile_rule(self.root_rule(), self.mode, &CompileOptions::default())
    }

    /// Compile with default options and match once. Compile once with
    /// [`Grammar::compile`] to match repeatedly.
    pub fn match_utterance(&self, utterance: &str) -> Result<MatchResult, GrammarError> {
        Ok(self.compile(&CompileOptions::default())?.match_utterance(utterance))
    }
}

/// Grammars are identified by language, base URI, mode and root; rule
/// content does not take part.
impl PartialEq for Grammar {
    fn eq(&self, other: &Self) -> bool {
        self.language == other.language
            && self.base_uri == other.base_uri
            && self.mode == other.mode
            && self.root == other.root
    }
}
