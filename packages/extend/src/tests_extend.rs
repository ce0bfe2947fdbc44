use weft_selector::{parse_selector, ComplexSelectorComponent, MediaContext, SelectorList, SimpleSelector, Span};

use crate::error::ExtendError;
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

#[test]
fn test_one_shot_extend() {
    let result = Extender::extend(list(".a .b"), &list(".x .y"), &list(".b")).unwrap();
    assert_eq!(result.to_css_string(), ".a .b, .a .x .y, .x .a .y");
}

#[test]
fn test_one_shot_extend_leaves_unrelated_selector_alone() {
    let result = Extender::extend(list(".c"), &list(".x"), &list(".b")).unwrap();
    assert_eq!(result.to_css_string(), ".c");
}

#[test]
fn test_one_shot_replace_drops_original() {
    let result = Extender::replace(list(".b"), &list(".x"), &list(".b")).unwrap();
    assert_eq!(result.to_css_string(), ".x");
}

#[test]
fn test_one_shot_replace_weaves_context() {
    let result = Extender::replace(list(".a .b"), &list(".x .y"), &list(".b")).unwrap();
    assert_eq!(result.to_css_string(), ".a .x .y, .x .a .y");
}

#[test]
fn test_extend_rejects_complex_target() {
    let result = Extender::extend(list(".c"), &list(".x"), &list(".a .b"));
    assert!(matches!(
        result,
        Err(ExtendError::InvalidExtendTarget { .. })
    ));
}

#[test]
fn test_extend_requires_all_targets_in_compound() {
    // The compound target `.a.b` only applies where both simples match.
    let result = Extender::extend(list(".a"), &list(".x"), &list(".a.b")).unwrap();
    assert_eq!(result.to_css_string(), ".a");
}

#[test]
fn test_registry_extends_earlier_rule() {
    let mut extender = Extender::new();
    let rule = extender.add_selector(list(".a"), None).unwrap();
    let other = extender.add_selector(list(".b"), None).unwrap();
    extender
        .add_extension(&other.clone_inner(), &simple(".a"), span(), None, false)
        .unwrap();
    assert_eq!(rule.to_css_string(), ".a, .b");
    assert_eq!(other.to_css_string(), ".b");
}

#[test]
fn test_registry_extends_later_rule() {
    let mut extender = Extender::new();
    let other = extender.add_selector(list(".b"), None).unwrap();
    extender
        .add_extension(&other.clone_inner(), &simple(".a"), span(), None, false)
        .unwrap();
    let rule = extender.add_selector(list(".a"), None).unwrap();
    assert_eq!(rule.to_css_string(), ".a, .b");
}

#[test]
fn test_duplicate_extension_is_idempotent() {
    let mut extender = Extender::new();
    let rule = extender.add_selector(list(".a"), None).unwrap();
    let other = extender.add_selector(list(".b"), None).unwrap();
    extender
        .add_extension(&other.clone_inner(), &simple(".a"), span(), None, false)
        .unwrap();
    extender
        .add_extension(&other.clone_inner(), &simple(".a"), span(), None, false)
        .unwrap();
    assert_eq!(rule.to_css_string(), ".a, .b");
}

#[test]
fn test_unsatisfied_mandatory_extend_is_reported() {
    let mut extender = Extender::new();
    let rule = extender.add_selector(list(".b"), None).unwrap();
    extender
        .add_extension(&rule.clone_inner(), &simple(".a"), span(), None, false)
        .unwrap();
    let unsatisfied = extender.check_for_unsatisfied_extends().unwrap();
    assert_eq!(unsatisfied.target.to_string(), ".a");
    assert!(matches!(
        extender.assert_no_unsatisfied_extends(),
        Err(ExtendError::UnsatisfiedExtend { .. })
    ));
}

#[test]
fn test_optional_extend_may_be_unsatisfied() {
    let mut extender = Extender::new();
    let rule = extender.add_selector(list(".b"), None).unwrap();
    extender
        .add_extension(&rule.clone_inner(), &simple(".a"), span(), None, true)
        .unwrap();
    assert!(extender.check_for_unsatisfied_extends().is_none());
    assert!(extender.assert_no_unsatisfied_extends().is_ok());
}

#[test]
fn test_satisfied_extend_passes_check() {
    let mut extender = Extender::new();
    let _target = extender.add_selector(list(".a"), None).unwrap();
    let rule = extender.add_selector(list(".b"), None).unwrap();
    extender
        .add_extension(&rule.clone_inner(), &simple(".a"), span(), None, false)
        .unwrap();
    assert!(extender.check_for_unsatisfied_extends().is_none());
}

#[test]
fn test_mandatory_registration_upgrades_optional_edge() {
    let mut extender = Extender::new();
    let rule = extender.add_selector(list(".b"), None).unwrap();
    extender
        .add_extension(&rule.clone_inner(), &simple(".a"), span(), None, true)
        .unwrap();
    assert!(extender.check_for_unsatisfied_extends().is_none());
    extender
        .add_extension(&rule.clone_inner(), &simple(".a"), span(), None, false)
        .unwrap();
    assert!(extender.check_for_unsatisfied_extends().is_some());
}

#[test]
fn test_extend_across_media_contexts_fails() {
    let mut extender = Extender::new();
    let _rule = extender.add_selector(list(".a"), None).unwrap();
    let inner = extender
        .add_selector(list(".b"), Some(MediaContext("screen".into())))
        .unwrap();
    let result = extender.add_extension(
        &inner.clone_inner(),
        &simple(".a"),
        span(),
        Some(&MediaContext("screen".into())),
        false,
    );
    assert!(matches!(
        result,
        Err(ExtendError::IncompatibleMediaContext { .. })
    ));
}

#[test]
fn test_extend_within_same_media_context_succeeds() {
    let context = MediaContext("screen".into());
    let mut extender = Extender::new();
    let rule = extender
        .add_selector(list(".a"), Some(context.clone()))
        .unwrap();
    let inner = extender
        .add_selector(list(".b"), Some(context.clone()))
        .unwrap();
    extender
        .add_extension(
            &inner.clone_inner(),
            &simple(".a"),
            span(),
            Some(&context),
            false,
        )
        .unwrap();
    assert_eq!(rule.to_css_string(), ".a, .b");
}
