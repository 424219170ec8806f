//! Integration tests for grxml-in against the sample grammars.
//!
//! Every test goes through the public API only: XML text in, prepared
//! grammar, compiled pattern, match results out.

use grxml_core::{CompileOptions, ExecutionContext};
use grxml_in::{parse, Grammar, GrammarError, GrammarNode, Match, MatchResult, Mode, Rule};
use serde_json::json;

/// Path to a grammar file under the workspace `grammars/` directory
fn grammar_path(name: &str) -> std::path::PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = std::path::Path::new(&manifest_dir).parent().unwrap().parent().unwrap();
    workspace_root.join("grammars").join(name)
}

fn load(name: &str) -> Grammar {
    let xml = std::fs::read_to_string(grammar_path(name)).unwrap();
    parse(&xml).unwrap()
}

fn prepared(name: &str) -> Grammar {
    let mut grammar = load(name);
    grammar.prepare(&ExecutionContext::new()).unwrap();
    grammar
}

fn expect_match(grammar: &Grammar, utterance: &str) -> Match {
    match grammar.match_utterance(utterance).unwrap() {
        MatchResult::Match(m) => m,
        MatchResult::NoMatch(_) => panic!("expected {:?} to match", utterance),
    }
}

fn count_rule_refs(grammar: &Grammar) -> usize {
    let mut refs = 0;
    for rule in grammar.rules() {
        rule.walk(&mut |node| {
            if matches!(node, GrammarNode::RuleRef(_)) {
                refs += 1;
            }
        });
    }
    refs
}

// =============================================================================
// Root rule
// =============================================================================

#[test]
fn test_sample_grammars_have_root_rules() {
    for name in ["pizza.grxml", "pin.grxml", "yes-no.grxml"] {
        let grammar = load(name).assert_has_matching_root_rule().unwrap();
        assert!(grammar.root_rule().unwrap().is_public());
    }
}

#[test]
fn test_missing_root_rule_is_reported() {
    let grammar = parse(r#"<grammar root="main"><rule id="other">x</rule></grammar>"#).unwrap();
    assert!(!grammar.has_matching_root_rule());
    assert_eq!(
        grammar.assert_has_matching_root_rule().unwrap_err(),
        GrammarError::MissingRootRule("main".to_string())
    );
}

// =============================================================================
// Inlining
// =============================================================================

#[test]
fn test_inline_leaves_only_root() {
    let grammar = load("pizza.grxml");
    assert_eq!(grammar.rules().count(), 4);
    assert!(count_rule_refs(&grammar) > 0);

    let inlined = grammar.inline().unwrap();
    let ids: Vec<_> = inlined.rules().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["order"]);
    assert_eq!(count_rule_refs(&inlined), 0);
}

#[test]
fn test_cyclic_grammar_is_rejected() {
    let grammar = parse(
        r##"<grammar root="a">
             <rule id="a">x <ruleref uri="#b"/></rule>
             <rule id="b">y <item repeat="0-1"><ruleref uri="#a"/></item></rule>
           </grammar>"##,
    )
    .unwrap();

    assert_eq!(
        grammar.inline().unwrap_err(),
        GrammarError::CyclicReference(vec!["a".into(), "b".into(), "a".into()])
    );
}

#[test]
fn test_duplicate_root_rule_inlines_once() {
    let grammar = parse(
        r#"<grammar root="main"><rule id="main">a</rule><rule id="main">b</rule></grammar>"#,
    )
    .unwrap();
    let mut inlined = grammar.inline().unwrap();
    inlined.tokenize();

    assert_eq!(inlined.rules().count(), 1);
    assert!(inlined.match_utterance("a").unwrap().is_match());
    assert!(!inlined.match_utterance("b").unwrap().is_match());
}

#[test]
fn test_compile_before_inline_fails() {
    let grammar = load("yes-no.grxml");
    assert!(matches!(
        grammar.compile(&CompileOptions::default()),
        Err(GrammarError::UninlinedReference(_))
    ));
}

// =============================================================================
// Matching
// =============================================================================

#[test]
fn test_voice_hello_world() {
    let mut grammar = Grammar::new()
        .with_mode(Mode::Voice)
        .with_root("main")
        .with_rule(Rule::new("main").with_node(GrammarNode::literal("hello world")));
    grammar.tokenize();

    let m = expect_match(&grammar, "hello world");
    assert_eq!(m.confidence, 0);
    assert_eq!(m.interpretation, json!("hello world"));
    assert!(!grammar.match_utterance("hello").unwrap().is_match());
    assert!(!grammar.match_utterance("hello world now").unwrap().is_match());
}

#[test]
fn test_pizza_orders() {
    let grammar = prepared("pizza.grxml");

    for utterance in [
        "pizza",
        "large pizza",
        "i would like medium thin crust pizza",
        "large pizza with cheese and mushrooms please",
        "thin crust pizza with green peppers",
        "small pizza with cheese and mushrooms and green peppers",
    ] {
        assert!(grammar.match_utterance(utterance).unwrap().is_match(), "{}", utterance);
    }

    for utterance in ["pizza with", "with cheese", "huge pizza", "pizza pizza", "i would like", ""] {
        assert!(!grammar.match_utterance(utterance).unwrap().is_match(), "{}", utterance);
    }
}

#[test]
fn test_pin_dtmf() {
    let grammar = prepared("pin.grxml");
    assert!(grammar.is_dtmf());

    let m = expect_match(&grammar, "1 2 3 4");
    assert_eq!(m.confidence, 1);
    assert_eq!(m.mode, Some(Mode::Dtmf));
    assert_eq!(m.utterance, "1 2 3 4");

    assert!(grammar.match_utterance("9876#").unwrap().is_match());
    assert!(!grammar.match_utterance("123").unwrap().is_match());
    assert!(!grammar.match_utterance("12345").unwrap().is_match());
    assert!(!grammar.match_utterance("12a4").unwrap().is_match());
}

#[test]
fn test_compiled_grammar_reused() {
    let grammar = prepared("yes-no.grxml");
    let compiled = grammar.compile(&CompileOptions::default()).unwrap();

    assert!(compiled.match_utterance("yeah").is_match());
    assert!(compiled.match_utterance("of course").is_match());
    assert!(compiled.match_utterance("nope").is_match());
    assert!(!compiled.match_utterance("maybe").is_match());
    assert!(!compiled.match_utterance("yes no").is_match());
}

#[test]
fn test_case_insensitive_compile() {
    let grammar = prepared("yes-no.grxml");
    let strict = grammar.compile(&CompileOptions::default()).unwrap();
    let relaxed = grammar
        .compile(&CompileOptions::default().case_insensitive(true))
        .unwrap();

    assert!(!strict.match_utterance("Of Course").is_match());
    assert!(relaxed.match_utterance("Of Course").is_match());
}

#[test]
fn test_empty_grammar_never_matches() {
    let grammar = parse(r#"<grammar xmlns="http://www.w3.org/2001/06/grammar"/>"#).unwrap();
    assert!(grammar.to_regexp().unwrap().is_empty());
    assert!(!grammar.match_utterance("").unwrap().is_match());
    assert!(!grammar.match_utterance("anything").unwrap().is_match());
}

#[test]
fn test_tags_do_not_affect_matching() {
    let grammar = prepared("pizza.grxml");
    let pattern = grammar.to_regexp().unwrap();
    assert!(!pattern.as_str().contains("out"));
}

// =============================================================================
// Embedding
// =============================================================================

#[test]
fn test_embed_same_mode() {
    let mut grammar = load("yes-no.grxml");
    grammar.embed(load("pizza.grxml")).unwrap();

    assert_eq!(grammar.root(), Some("answer"));
    for id in ["answer", "yes", "no", "order", "size", "pizza", "topping"] {
        assert!(grammar.rule(id).is_some(), "missing rule {}", id);
    }
}

#[test]
fn test_embed_document_different_mode() {
    let mut grammar = load("yes-no.grxml");
    let pin = std::fs::read_to_string(grammar_path("pin.grxml")).unwrap();

    let err = grammar.embed_document(&pin).unwrap_err();
    assert!(err.is_invalid_child());
    assert_eq!(grammar.rules().count(), 3);
}

// =============================================================================
// Pipeline report
// =============================================================================

#[test]
fn test_prepare_report() {
    let mut grammar = load("pizza.grxml");
    let ctx = ExecutionContext::new();
    let report = grammar.prepare(&ctx).unwrap();

    assert_eq!(report.trace_id, ctx.trace_id);
    assert_eq!(report.stages.len(), 3);
    assert!(report.stages.iter().all(|p| p.deterministic));
    assert!(report.output_hash().unwrap().starts_with("blake3:"));
}

#[test]
fn test_prepared_is_reproducible() {
    let grammar = load("pizza.grxml");
    let (a, first) = grammar.prepared(&ExecutionContext::new()).unwrap();
    let (b, second) = grammar.prepared(&ExecutionContext::new()).unwrap();

    assert_eq!(a.children(), b.children());
    assert_eq!(first.output_hash(), second.output_hash());
    assert_eq!(grammar.rules().count(), 4);
}

#[test]
fn test_prepared_grammar_survives_xml() {
    let grammar = prepared("pizza.grxml");
    let reread = parse(&grammar.to_xml()).unwrap();

    assert_eq!(reread, grammar);
    assert_eq!(reread.to_regexp().unwrap(), grammar.to_regexp().unwrap());
}
