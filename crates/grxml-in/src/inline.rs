//! Rule reference inlining.
//!
//! Every `<ruleref>` in the root rule is replaced by a copy of the
//! referenced rule's body, expanded recursively so each call site gets its
//! own copy. Afterwards only the root rule remains at the top level.

use crate::error::GrammarError;
use crate::model::{Element, GrammarChild, GrammarNode, Rule, RuleRef};
use std::collections::{HashMap, HashSet};

/// Id → rule index over the top-level rules of one grammar.
pub struct RuleGraph<'g> {
    rules: HashMap<&'g str, &'g Rule>,
}

impl<'g> RuleGraph<'g> {
    pub fn new(children: &'g [GrammarChild]) -> Self {
        let mut rules = HashMap::new();
        for child in children {
            if let GrammarChild::Rule(rule) = child {
                // First definition wins.
                rules.entry(rule.id.as_str()).or_insert(rule);
            }
        }
        Self { rules }
    }

    pub fn get(&self, id: &str) -> Option<&'g Rule> {
        self.rules.get(id).copied()
    }

    pub fn resolve(&self, reference: &RuleRef) -> Result<&'g Rule, GrammarError> {
        reference
            .target_id()
            .and_then(|id| self.get(id))
            .ok_or_else(|| GrammarError::UnresolvedReference(reference.uri.clone()))
    }

    /// Verify that every reference reachable from `rule` resolves and that
    /// none of them loops back. Nothing is copied; rules already in
    /// `checked` are not walked again.
    pub fn check_rule(&self, rule: &'g Rule, checked: &mut HashSet<&'g str>) -> Result<(), GrammarError> {
        let mut stack = vec![rule.id.as_str()];
        self.check_nodes(&rule.body, &mut stack, checked)?;
        if self.get(&rule.id).is_some_and(|canonical| std::ptr::eq(canonical, rule)) {
            checked.insert(rule.id.as_str());
        }
        Ok(())
    }

    fn check_nodes(
        &self,
        nodes: &'g [GrammarNode],
        stack: &mut Vec<&'g str>,
        checked: &mut HashSet<&'g str>,
    ) -> Result<(), GrammarError> {
        for node in nodes {
            match node {
                GrammarNode::RuleRef(reference) => {
                    let target = self.resolve(reference)?;
                    let id = target.id.as_str();
                    if stack.contains(&id) {
                        let mut cycle: Vec<String> = stack.iter().map(|s| s.to_string()).collect();
                        cycle.push(id.to_string());
                        return Err(GrammarError::CyclicReference(cycle));
                    }
                    if checked.contains(id) {
                        continue;
                    }

                    stack.push(id);
                    self.check_nodes(&target.body, stack, checked)?;
                    stack.pop();
                    checked.insert(id);
                }
                GrammarNode::Element(el) => self.check_nodes(&el.children, stack, checked)?,
                _ => {}
            }
        }
        Ok(())
    }

    /// Body of `rule` with every reference replaced by the target's
    /// expanded body.
    pub fn expand_rule(&self, rule: &Rule) -> Result<Vec<GrammarNode>, GrammarError> {
        let mut stack = vec![rule.id.clone()];
        self.expand_nodes(&rule.body, &mut stack)
    }

    fn expand_nodes(
        &self,
        nodes: &[GrammarNode],
        stack: &mut Vec<String>,
    ) -> Result<Vec<GrammarNode>, GrammarError> {
        let mut out = Vec::with_capacity(nodes.len());

        for node in nodes {
            match node {
                GrammarNode::RuleRef(reference) => {
                    let target = self.resolve(reference)?;
                    if stack.iter().any(|id| *id == target.id) {
                        let mut cycle = stack.clone();
                        cycle.push(target.id.clone());
                        return Err(GrammarError::CyclicReference(cycle));
                    }

                    stack.push(target.id.clone());
                    let expanded = self.expand_nodes(&target.body, stack)?;
                    stack.pop();

                    tracing::trace!(rule = %target.id, nodes = expanded.len(), "inlined reference");
                    out.extend(expanded);
                }
                GrammarNode::Element(el) => out.push(GrammarNode::Element(Element {
                    container: el.container.clone(),
                    children: self.expand_nodes(&el.children, stack)?,
                })),
                other => out.push(other.clone()),
            }
        }

        Ok(out)
    }
}

/// Inline every reference of the root rule, then drop every other rule. All
/// rules are checked for unresolved and cyclic references first, but only
/// the root is expanded. With no root, no rule survives.
pub fn inline_children(
    children: &mut Vec<GrammarChild>,
    root: Option<&str>,
) -> Result<(), GrammarError> {
    let mut root_body = {
        let graph = RuleGraph::new(children);
        let mut checked = HashSet::new();
        for child in children.iter() {
            if let GrammarChild::Rule(rule) = child {
                graph.check_rule(rule, &mut checked)?;
            }
        }
        root.and_then(|id| graph.get(id))
            .map(|rule| graph.expand_rule(rule))
            .transpose()?
    };

    let before = children.len();
    children.retain_mut(|child| match child {
        GrammarChild::Rule(rule) if Some(rule.id.as_str()) == root => match root_body.take() {
            Some(body) => {
                rule.body = body;
                true
            }
            // A later rule reusing the root id.
            None => false,
        },
        GrammarChild::Rule(_) => false,
        GrammarChild::Node(_) => true,
    });

    tracing::debug!(
        root = root.unwrap_or("-"),
        removed = before - children.len(),
        "inlined rule references"
    );
    Ok(())
}
