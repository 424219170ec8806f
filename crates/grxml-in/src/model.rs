//! Typed grammar tree.
//!
//! Supports the SRGS XML element set the compiler understands:
//! - `<rule>` with `id` and `scope`
//! - `<token>`, `<ruleref>`, `<tag>`
//! - `<item>` with `repeat`, `<one-of>`
//! - anything else kept as an opaque passthrough element

use crate::error::GrammarError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Input mode of a grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Voice,
    Dtmf,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Voice => "voice",
            Mode::Dtmf => "dtmf",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "voice" => Ok(Mode::Voice),
            "dtmf" => Ok(Mode::Dtmf),
            other => Err(GrammarError::invalid_attribute("grammar", "mode", other)),
        }
    }
}

/// Human label for an optional mode, used in messages.
pub fn mode_label(mode: Option<Mode>) -> String {
    mode.map(|m| m.to_string()).unwrap_or_else(|| "unset".to_string())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Public,
    #[default]
    Private,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Public => "public",
            Scope::Private => "private",
        }
    }
}

impl FromStr for Scope {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Scope::Public),
            "private" => Ok(Scope::Private),
            other => Err(GrammarError::invalid_attribute("rule", "scope", other)),
        }
    }
}

/// Occurrence bounds of an `<item>`. `max: None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repeat {
    pub min: u32,
    pub max: Option<u32>,
}

impl Repeat {
    pub fn exactly(n: u32) -> Self {
        Self { min: n, max: Some(n) }
    }

    pub fn between(min: u32, max: u32) -> Self {
        Self { min, max: Some(max) }
    }

    pub fn at_least(min: u32) -> Self {
        Self { min, max: None }
    }

    pub fn optional() -> Self {
        Self::between(0, 1)
    }

    /// Parse the SRGS `repeat` forms `"n"`, `"n-m"` and `"n-"`.
    pub fn parse(value: &str) -> Result<Self, GrammarError> {
        let invalid = || GrammarError::invalid_attribute("item", "repeat", value);
        let number = |s: &str| s.trim().parse::<u32>().map_err(|_| invalid());

        let repeat = match value.split_once('-') {
            None => Self::exactly(number(value)?),
            Some((min, "")) => Self::at_least(number(min)?),
            Some((min, max)) => Self::between(number(min)?, number(max)?),
        };

        match repeat.max {
            Some(max) if max < repeat.min => Err(invalid()),
            _ => Ok(repeat),
        }
    }
}

impl fmt::Display for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "{}", self.min),
            Some(max) => write!(f, "{}-{}", self.min, max),
            None => write!(f, "{}-", self.min),
        }
    }
}

/// One word or quoted phrase, matched verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
}

impl Token {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Symbolic reference to a rule. Resolved by id lookup, never by pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRef {
    pub uri: String,
}

impl RuleRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }

    /// Reference to a rule of the same grammar.
    pub fn local(id: &str) -> Self {
        Self::new(format!("#{}", id))
    }

    /// Rule id for local (`#id`) references; `None` for external URIs.
    pub fn target_id(&self) -> Option<&str> {
        self.uri.strip_prefix('#').filter(|id| !id.is_empty())
    }
}

/// Semantic annotation; carried through but never matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub content: String,
}

impl Tag {
    pub fn new(content: impl Into<String>) -> Self {
        Self { content: content.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Container {
    Item { repeat: Option<Repeat> },
    OneOf,
    Opaque {
        name: String,
        attributes: Vec<(String, String)>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub container: Container,
    pub children: Vec<GrammarNode>,
}

impl Element {
    pub fn item(children: Vec<GrammarNode>) -> Self {
        Self {
            container: Container::Item { repeat: None },
            children,
        }
    }

    pub fn repeated(children: Vec<GrammarNode>, repeat: Repeat) -> Self {
        Self {
            container: Container::Item { repeat: Some(repeat) },
            children,
        }
    }

    pub fn one_of(children: Vec<GrammarNode>) -> Self {
        Self {
            container: Container::OneOf,
            children,
        }
    }

    pub fn opaque(name: impl Into<String>, children: Vec<GrammarNode>) -> Self {
        Self {
            container: Container::Opaque {
                name: name.into(),
                attributes: Vec::new(),
            },
            children,
        }
    }

    pub fn name(&self) -> &str {
        match &self.container {
            Container::Item { .. } => "item",
            Container::OneOf => "one-of",
            Container::Opaque { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrammarNode {
    /// Raw text not yet split into tokens.
    Literal(String),
    Token(Token),
    RuleRef(RuleRef),
    Tag(Tag),
    Element(Element),
}

impl GrammarNode {
    pub fn literal(text: impl Into<String>) -> Self {
        GrammarNode::Literal(text.into())
    }

    pub fn token(text: impl Into<String>) -> Self {
        GrammarNode::Token(Token::new(text))
    }

    pub fn rule_ref(id: &str) -> Self {
        GrammarNode::RuleRef(RuleRef::local(id))
    }

    pub fn tag(content: impl Into<String>) -> Self {
        GrammarNode::Tag(Tag::new(content))
    }

    pub fn kind(&self) -> &str {
        match self {
            GrammarNode::Literal(_) => "text",
            GrammarNode::Token(_) => "token",
            GrammarNode::RuleRef(_) => "ruleref",
            GrammarNode::Tag(_) => "tag",
            GrammarNode::Element(el) => el.name(),
        }
    }

    /// Visit this node and every descendant, parents first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a GrammarNode)) {
        visit(self);
        if let GrammarNode::Element(el) = self {
            for child in &el.children {
                child.walk(visit);
            }
        }
    }
}

impl From<Element> for GrammarNode {
    fn from(el: Element) -> Self {
        GrammarNode::Element(el)
    }
}

/// A named rule. Rules are only ever direct children of a grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    #[serde(default)]
    pub scope: Scope,
    pub body: Vec<GrammarNode>,
}

impl Rule {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            scope: Scope::default(),
            body: Vec::new(),
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_node(mut self, node: impl Into<GrammarNode>) -> Self {
        self.body.push(node.into());
        self
    }

    /// Append one token per word.
    pub fn with_tokens(mut self, words: &[&str]) -> Self {
        self.body.extend(words.iter().map(|w| GrammarNode::token(*w)));
        self
    }

    pub fn is_public(&self) -> bool {
        self.scope == Scope::Public
    }

    /// Visit every node of the body, parents first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a GrammarNode)) {
        for node in &self.body {
            node.walk(visit);
        }
    }

    pub fn has_rule_refs(&self) -> bool {
        let mut found = false;
        self.walk(&mut |node| found |= matches!(node, GrammarNode::RuleRef(_)));
        found
    }
}

/// Direct content of a grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrammarChild {
    Rule(Rule),
    Node(GrammarNode),
}

impl From<Rule> for GrammarChild {
    fn from(rule: Rule) -> Self {
        GrammarChild::Rule(rule)
    }
}

impl From<GrammarNode> for GrammarChild {
    fn from(node: GrammarNode) -> Self {
        GrammarChild::Node(node)
    }
}

impl From<Tag> for GrammarChild {
    fn from(tag: Tag) -> Self {
        GrammarChild::Node(GrammarNode::Tag(tag))
    }
}
