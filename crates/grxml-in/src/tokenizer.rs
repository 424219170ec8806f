//! Splits raw rule text into tokens.
//!
//! A double-quoted phrase becomes one token with the quotes stripped;
//! everything else is split on whitespace. Text already inside a `<token>`
//! is never split again, so tokenizing twice is the same as tokenizing once.

use crate::model::{GrammarChild, GrammarNode, Token};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// A quoted phrase. Non-greedy so `"a" x "b"` yields two phrases.
    static ref QUOTED_PHRASE: Regex = Regex::new(r#""[^"]*""#).unwrap();
}

/// Split text into token strings, keeping quoted phrases whole.
pub fn split_tokens(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut last = 0;

    for phrase in QUOTED_PHRASE.find_iter(text) {
        push_words(&mut tokens, &text[last..phrase.start()]);

        // Both quote characters are one byte wide.
        let inner = text[phrase.start() + 1..phrase.end() - 1].trim();
        if !inner.is_empty() {
            tokens.push(inner.to_string());
        }
        last = phrase.end();
    }
    push_words(&mut tokens, &text[last..]);

    tokens
}

fn push_words(tokens: &mut Vec<String>, segment: &str) {
    tokens.extend(segment.split_whitespace().map(str::to_string));
}

/// Replace every `Literal` in `nodes` (recursively) with its tokens.
pub fn tokenize_nodes(nodes: &mut Vec<GrammarNode>) {
    let mut out = Vec::with_capacity(nodes.len());

    for node in nodes.drain(..) {
        match node {
            GrammarNode::Literal(text) => out.extend(
                split_tokens(&text)
                    .into_iter()
                    .map(|t| GrammarNode::Token(Token::new(t))),
            ),
            GrammarNode::Element(mut el) => {
                tokenize_nodes(&mut el.children);
                out.push(GrammarNode::Element(el));
            }
            other => out.push(other),
        }
    }

    *nodes = out;
}

/// Tokenize rule bodies and the content of top-level passthrough elements.
/// Text directly under the grammar element is not rule content and is left
/// alone.
pub fn tokenize_children(children: &mut [GrammarChild]) {
    let mut tokenized = 0usize;
    for child in children.iter_mut() {
        match child {
            GrammarChild::Rule(rule) => {
                tokenize_nodes(&mut rule.body);
                tokenized += 1;
            }
            GrammarChild::Node(GrammarNode::Element(el)) => tokenize_nodes(&mut el.children),
            GrammarChild::Node(_) => {}
        }
    }
    tracing::debug!(rules = tokenized, "tokenized rule text");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Element;

    #[test]
    fn test_quoted_phrase_kept_whole() {
        assert_eq!(
            split_tokens(r#"He said "good morning" today"#),
            vec!["He", "said", "good morning", "today"]
        );
    }

    #[test]
    fn test_multiple_phrases() {
        assert_eq!(
            split_tokens(r#""New York" or "Los Angeles""#),
            vec!["New York", "or", "Los Angeles"]
        );
    }

    #[test]
    fn test_empty_segments_dropped() {
        assert!(split_tokens("   ").is_empty());
        assert!(split_tokens(r#""""#).is_empty());
        assert_eq!(split_tokens("  a \n\t b "), vec!["a", "b"]);
    }

    #[test]
    fn test_unbalanced_quote_is_a_word() {
        assert_eq!(split_tokens(r#"say "hi"#), vec!["say", "\"hi"]);
    }

    #[test]
    fn test_tokenize_nested_literals() {
        let mut nodes = vec![
            GrammarNode::literal("call"),
            Element::item(vec![GrammarNode::literal(r#""John Smith" now"#)]).into(),
            GrammarNode::tag("out = 1;"),
        ];
        tokenize_nodes(&mut nodes);

        assert_eq!(nodes[0], GrammarNode::token("call"));
        match &nodes[1] {
            GrammarNode::Element(el) => assert_eq!(
                el.children,
                vec![GrammarNode::token("John Smith"), GrammarNode::token("now")]
            ),
            other => panic!("expected item, got {:?}", other),
        }
        assert_eq!(nodes[2], GrammarNode::tag("out = 1;"));
    }

    #[test]
    fn test_tokens_are_not_resplit() {
        let mut nodes = vec![GrammarNode::token("good morning")];
        tokenize_nodes(&mut nodes);
        assert_eq!(nodes, vec![GrammarNode::token("good morning")]);
    }

    #[test]
    fn test_tokenize_is_idempotent() {
        let mut once = vec![GrammarNode::literal(r#"He said "good morning" today"#)];
        tokenize_nodes(&mut once);
        let mut twice = once.clone();
        tokenize_nodes(&mut twice);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 4);
    }
}
