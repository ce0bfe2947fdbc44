//! End-to-end document scenarios
//!
//! Each test replays a stylesheet in document order: every style rule is
//! registered as it appears, and each `@extend` inside it is registered with
//! the rule's selector as extended so far.

use weft_selector::{parse_selector, ComplexSelectorComponent, SelectorList, SimpleSelector, Span};

use crate::extender::Extender;

fn list(source: &str) -> SelectorList {
    parse_selector(source, "/test.scss").unwrap()
}

fn simple(source: &str) -> SimpleSelector {
    let list = list(source);
    match &list.components[0].components[0] {
        ComplexSelectorComponent::Compound(compound) => compound.components[0].clone(),
        ComplexSelectorComponent::Combinator(..) => panic!("expected a compound"),
    }
}

fn span() -> Span {
    Span::synthetic()
}

// .error { ... }
// .seriousError { @extend .error; }
#[test]
fn test_serious_error_extends_error() {
    let mut extender = Extender::new();
    let error = extender.add_selector(list(".error"), None).unwrap();
    let serious = extender.add_selector(list(".seriousError"), None).unwrap();
    extender
        .add_extension(&serious.clone_inner(), &simple(".error"), span(), None, false)
        .unwrap();
    assert_eq!(error.to_css_string(), ".error, .seriousError");
    assert_eq!(serious.to_css_string(), ".seriousError");
}

// .a .b { ... }
// .x .y { @extend .b; }
#[test]
fn test_descendant_extender_weaves_contexts() {
    let mut extender = Extender::new();
    let rule = extender.add_selector(list(".a .b"), None).unwrap();
    let other = extender.add_selector(list(".x .y"), None).unwrap();
    extender
        .add_extension(&other.clone_inner(), &simple(".b"), span(), None, false)
        .unwrap();
    assert_eq!(rule.to_css_string(), ".a .b, .a .x .y, .x .a .y");
}

// .b#y { ... }
// .a#x { @extend .b; }
//
// Unifying the extender into `.b#y` would require matching two different
// IDs at once, so only the original survives.
#[test]
fn test_conflicting_ids_leave_rule_unchanged() {
    let mut extender = Extender::new();
    let rule = extender.add_selector(list(".b#y"), None).unwrap();
    let other = extender.add_selector(list(".a#x"), None).unwrap();
    extender
        .add_extension(&other.clone_inner(), &simple(".b"), span(), None, false)
        .unwrap();
    assert_eq!(rule.to_css_string(), ".b#y");
}

// .a { ... }
// .b { @extend .a; }
// .c { @extend .b; }
#[test]
fn test_chained_extends_propagate() {
    let mut extender = Extender::new();
    let a = extender.add_selector(list(".a"), None).unwrap();
    let b = extender.add_selector(list(".b"), None).unwrap();
    extender
        .add_extension(&b.clone_inner(), &simple(".a"), span(), None, false)
        .unwrap();
    let c = extender.add_selector(list(".c"), None).unwrap();
    extender
        .add_extension(&c.clone_inner(), &simple(".b"), span(), None, false)
        .unwrap();
    assert_eq!(a.to_css_string(), ".a, .b, .c");
    assert_eq!(b.to_css_string(), ".b, .c");
    assert_eq!(c.to_css_string(), ".c");
}

// .c { @extend .a; }
// .a { @extend .b; }
// .b { @extend .c; }
//
// A full extension cycle terminates because every derived edge already in
// the registry is skipped, and every rule ends up matching all three
// classes.
#[test]
fn test_extension_cycle_terminates() {
    let mut extender = Extender::new();
    let c = extender.add_selector(list(".c"), None).unwrap();
    extender
        .add_extension(&c.clone_inner(), &simple(".a"), span(), None, false)
        .unwrap();
    let a = extender.add_selector(list(".a"), None).unwrap();
    extender
        .add_extension(&a.clone_inner(), &simple(".b"), span(), None, false)
        .unwrap();
    let b = extender.add_selector(list(".b"), None).unwrap();
    extender
        .add_extension(&b.clone_inner(), &simple(".c"), span(), None, false)
        .unwrap();
    assert_eq!(a.to_css_string(), ".a, .c, .b");
    assert_eq!(b.to_css_string(), ".b, .a, .c");
    assert_eq!(c.to_css_string(), ".c, .b, .a");
}

// :not(.b) { ... }
// .x { @extend .b; }
//
// `.x` now matches wherever `.b` does, so excluding `.b` must also exclude
// `.x`.
#[test]
fn test_extend_inside_negation() {
    let mut extender = Extender::new();
    let rule = extender.add_selector(list(":not(.b)"), None).unwrap();
    let other = extender.add_selector(list(".x"), None).unwrap();
    extender
        .add_extension(&other.clone_inner(), &simple(".b"), span(), None, false)
        .unwrap();
    assert_eq!(rule.to_css_string(), ":not(.b):not(.x)");
}

// :where(.b) { ... }
// :where(.c) { @extend .b; }
//
// The extender is itself a `:where`, so its contents hoist into the outer
// pseudo instead of nesting.
#[test]
fn test_where_extender_flattens_into_outer_where() {
    let mut extender = Extender::new();
    let rule = extender.add_selector(list(":where(.b)"), None).unwrap();
    let other = extender.add_selector(list(":where(.c)"), None).unwrap();
    extender
        .add_extension(&other.clone_inner(), &simple(".b"), span(), None, false)
        .unwrap();
    assert_eq!(rule.to_css_string(), ":where(.b, .c)");
}

// :not(.c) { ... }
// .x { @extend .b; }
#[test]
fn test_unrelated_negation_unchanged() {
    let mut extender = Extender::new();
    let rule = extender.add_selector(list(":not(.c)"), None).unwrap();
    let other = extender.add_selector(list(".x"), None).unwrap();
    extender
        .add_extension(&other.clone_inner(), &simple(".b"), span(), None, true)
        .unwrap();
    assert_eq!(rule.to_css_string(), ":not(.c)");
}

// a.b { ... }
// .x { @extend .b; }
//
// The extender unifies into the remaining simples of the compound.
#[test]
fn test_extender_unifies_into_compound() {
    let mut extender = Extender::new();
    let rule = extender.add_selector(list("a.b"), None).unwrap();
    let other = extender.add_selector(list(".x"), None).unwrap();
    extender
        .add_extension(&other.clone_inner(), &simple(".b"), span(), None, false)
        .unwrap();
    assert_eq!(rule.to_css_string(), "a.b, a.x");
}

// .a > .b { ... }
// .x { @extend .b; }
//
// Combinators in the extended rule are preserved in every woven result.
#[test]
fn test_child_combinator_preserved() {
    let mut extender = Extender::new();
    let rule = extender.add_selector(list(".a > .b"), None).unwrap();
    let other = extender.add_selector(list(".x"), None).unwrap();
    extender
        .add_extension(&other.clone_inner(), &simple(".b"), span(), None, false)
        .unwrap();
    assert_eq!(rule.to_css_string(), ".a > .b, .a > .x");
}
