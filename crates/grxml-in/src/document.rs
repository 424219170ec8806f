//! Mapping between the generic XML tree and the typed grammar.

use crate::error::GrammarError;
use crate::grammar::Grammar;
use crate::model::{Container, Element, GrammarChild, GrammarNode, Repeat, Rule, RuleRef, Tag, Token};
use grxml_doc::{Element as XmlElement, Node as XmlNode};

/// SRGS grammar namespace.
pub const GRXML_NAMESPACE: &str = "http://www.w3.org/2001/06/grammar";

const SRGS_VERSION: &str = "1.0";

/// Build a grammar from a parsed `<grammar>` element.
pub fn grammar_from_element(root: &XmlElement) -> Result<Grammar, GrammarError> {
    if root.name != "grammar" {
        return Err(GrammarError::Document(format!(
            "expected <grammar> root element, found <{}>",
            root.name
        )));
    }
    if let Some(ns) = root.attr("xmlns") {
        if ns != GRXML_NAMESPACE {
            return Err(GrammarError::Document(format!("unknown grammar namespace {:?}", ns)));
        }
    }

    let mut grammar = Grammar::new();
    if let Some(mode) = root.attr("mode") {
        grammar.set_mode(mode.parse()?);
    }
    if let Some(lang) = root.attr("xml:lang") {
        grammar.set_language(lang);
    }
    if let Some(base) = root.attr("xml:base") {
        grammar.set_base_uri(base);
    }
    if let Some(id) = root.attr("root") {
        grammar.set_root(id);
    }
    if let Some(format) = root.attr("tag-format") {
        grammar.set_tag_format(format);
    }

    for node in &root.children {
        let child = match node {
            XmlNode::Text(text) => GrammarChild::Node(GrammarNode::literal(text.as_str())),
            XmlNode::Element(el) if el.name == "rule" => GrammarChild::Rule(rule_from_element(el)?),
            XmlNode::Element(el) => GrammarChild::Node(node_from_element(el)?),
        };
        grammar.append(child)?;
    }

    tracing::debug!(
        mode = ?grammar.mode(),
        root = grammar.root().unwrap_or("-"),
        rules = grammar.rules().count(),
        "read grammar document"
    );
    Ok(grammar)
}

fn rule_from_element(el: &XmlElement) -> Result<Rule, GrammarError> {
    let id = el
        .attr("id")
        .filter(|id| !id.is_empty())
        .ok_or_else(|| GrammarError::Document("<rule> requires an id".to_string()))?;

    let mut rule = Rule::new(id);
    if let Some(scope) = el.attr("scope") {
        rule.scope = scope.parse()?;
    }
    rule.body = nodes_from_children(&el.children)?;
    Ok(rule)
}

fn nodes_from_children(children: &[XmlNode]) -> Result<Vec<GrammarNode>, GrammarError> {
    children
        .iter()
        .map(|node| match node {
            XmlNode::Text(text) => Ok(GrammarNode::literal(text.as_str())),
            XmlNode::Element(el) => node_from_element(el),
        })
        .collect()
}

fn node_from_element(el: &XmlElement) -> Result<GrammarNode, GrammarError> {
    let node = match el.name.as_str() {
        "rule" => {
            return Err(GrammarError::InvalidChild(
                "<rule> may only appear directly under <grammar>".to_string(),
            ))
        }
        "token" => GrammarNode::Token(Token::new(el.text_content())),
        "tag" => GrammarNode::Tag(Tag::new(el.text_content())),
        "ruleref" => {
            let uri = el
                .attr("uri")
                .ok_or_else(|| GrammarError::Document("<ruleref> requires a uri".to_string()))?;
            GrammarNode::RuleRef(RuleRef::new(uri))
        }
        "item" => {
            let repeat = el.attr("repeat").map(Repeat::parse).transpose()?;
            GrammarNode::Element(Element {
                container: Container::Item { repeat },
                children: nodes_from_children(&el.children)?,
            })
        }
        "one-of" => GrammarNode::Element(Element::one_of(nodes_from_children(&el.children)?)),
        other => GrammarNode::Element(Element {
            container: Container::Opaque {
                name: other.to_string(),
                attributes: el.attributes.clone(),
            },
            children: nodes_from_children(&el.children)?,
        }),
    };
    Ok(node)
}

/// Render a grammar as a `<grammar>` element.
pub fn grammar_to_element(grammar: &Grammar) -> XmlElement {
    let mut root = XmlElement::new("grammar")
        .with_attr("xmlns", GRXML_NAMESPACE)
        .with_attr("version", SRGS_VERSION);

    if let Some(mode) = grammar.mode() {
        root.set_attr("mode", mode.as_str());
    }
    if let Some(lang) = grammar.language() {
        root.set_attr("xml:lang", lang);
    }
    if let Some(base) = grammar.base_uri() {
        root.set_attr("xml:base", base);
    }
    if let Some(id) = grammar.root() {
        root.set_attr("root", id);
    }
    if let Some(format) = grammar.tag_format() {
        root.set_attr("tag-format", format);
    }

    for child in grammar.children() {
        match child {
            GrammarChild::Rule(rule) => root.push(XmlNode::Element(rule_to_element(rule))),
            GrammarChild::Node(node) => root.push(node_to_xml(node)),
        }
    }
    root
}

fn rule_to_element(rule: &Rule) -> XmlElement {
    let mut el = XmlElement::new("rule")
        .with_attr("id", rule.id.as_str())
        .with_attr("scope", rule.scope.as_str());
    for node in &rule.body {
        el.push(node_to_xml(node));
    }
    el
}

fn node_to_xml(node: &GrammarNode) -> XmlNode {
    match node {
        GrammarNode::Literal(text) => XmlNode::Text(text.clone()),
        GrammarNode::Token(token) => XmlNode::Element(
            XmlElement::new("token").with_child(XmlNode::Text(token.text.clone())),
        ),
        GrammarNode::Tag(tag) => {
            XmlNode::Element(XmlElement::new("tag").with_child(XmlNode::Text(tag.content.clone())))
        }
        GrammarNode::RuleRef(reference) => {
            XmlNode::Element(XmlElement::new("ruleref").with_attr("uri", reference.uri.as_str()))
        }
        GrammarNode::Element(el) => {
            let mut out = XmlElement::new(el.name());
            match &el.container {
                Container::Item { repeat: Some(repeat) } => {
                    out.set_attr("repeat", repeat.to_string());
                }
                Container::Opaque { attributes, .. } => {
                    for (name, value) in attributes {
                        out.set_attr(name.as_str(), value.as_str());
                    }
                }
                Container::Item { repeat: None } | Container::OneOf => {}
            }
            for child in &el.children {
                out.push(node_to_xml(child));
            }
            XmlNode::Element(out)
        }
    }
}
