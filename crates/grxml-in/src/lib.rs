//! GRXML-IN: SRGS grammar compiler and utterance matcher
//!
//! Reads GRXML (SRGS XML) grammars, inlines rule references, normalizes
//! and tokenizes rule text, compiles the root rule into one anchored regular
//! expression and matches utterances against it.
//!
//! # Example
//!
//! ```
//! use grxml_in::{parse, MatchResult};
//! use grxml_core::ExecutionContext;
//!
//! let mut grammar = parse(r##"
//!     <grammar xmlns="http://www.w3.org/2001/06/grammar" mode="voice" root="greet">
//!       <rule id="greet">hello <ruleref uri="#who"/></rule>
//!       <rule id="who"><one-of><item>world</item><item>there</item></one-of></rule>
//!     </grammar>"##).unwrap();
//!
//! grammar.prepare(&ExecutionContext::new()).unwrap();
//!
//! match grammar.match_utterance("hello there").unwrap() {
//!     MatchResult::Match(m) => assert_eq!(m.confidence, 0),
//!     MatchResult::NoMatch(_) => panic!("expected a match"),
//! }
//! ```

pub mod compiler;
pub mod document;
pub mod error;
pub mod grammar;
pub mod inline;
pub mod matcher;
pub mod model;
pub mod normalizer;
pub mod stages;
pub mod tokenizer;

pub use compiler::{Pattern, Separator};
pub use document::GRXML_NAMESPACE;
pub use error::GrammarError;
pub use grammar::Grammar;
pub use matcher::{CompiledGrammar, EchoInterpreter, Interpret, Match, MatchResult, NoMatch};
pub use model::{
    Container, Element, GrammarChild, GrammarNode, Mode, Repeat, Rule, RuleRef, Scope, Tag, Token,
};

/// Parse GRXML text into a grammar.
pub fn parse(xml: &str) -> Result<Grammar, GrammarError> {
    Grammar::from_xml(xml)
}
