//! Whitespace normalization for grammar text.
//!
//! Runs of whitespace collapse to one space and the ends are trimmed, in
//! raw text and in token content. Tags, references and element attributes
//! are not text content and stay as they are.

use crate::model::{GrammarChild, GrammarNode};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Multiple whitespace pattern
    static ref MULTI_SPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Collapse and trim whitespace.
pub fn normalize_text(text: &str) -> String {
    MULTI_SPACE.replace_all(text.trim(), " ").into_owned()
}

/// Normalize `nodes` recursively. Raw text that is left empty is removed.
pub fn normalize_nodes(nodes: &mut Vec<GrammarNode>) {
    nodes.retain_mut(|node| match node {
        GrammarNode::Literal(text) => {
            *text = normalize_text(text);
            !text.is_empty()
        }
        GrammarNode::Token(token) => {
            token.text = normalize_text(&token.text);
            true
        }
        GrammarNode::Element(el) => {
            normalize_nodes(&mut el.children);
            true
        }
        GrammarNode::RuleRef(_) | GrammarNode::Tag(_) => true,
    });
}

/// Normalize every descendant of a grammar. The grammar's own attributes
/// are not touched.
pub fn normalize_children(children: &mut Vec<GrammarChild>) {
    children.retain_mut(|child| match child {
        GrammarChild::Rule(rule) => {
            normalize_nodes(&mut rule.body);
            true
        }
        GrammarChild::Node(GrammarNode::Literal(text)) => {
            *text = normalize_text(text);
            !text.is_empty()
        }
        GrammarChild::Node(GrammarNode::Token(token)) => {
            token.text = normalize_text(&token.text);
            true
        }
        GrammarChild::Node(GrammarNode::Element(el)) => {
            normalize_nodes(&mut el.children);
            true
        }
        GrammarChild::Node(_) => true,
    });
}
