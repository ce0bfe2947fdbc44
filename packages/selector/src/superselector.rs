//! Superselector containment
//!
//! Selector A is a superselector of selector B when every element B matches
//! is also matched by A. This is a semantic relation computed structurally;
//! it is not symmetric and cannot be decided by hashing.

use crate::ast::*;

/// Pseudo-classes that match exactly what their selector argument matches
const SUBSELECTOR_PSEUDOS: &[&str] = &[
    "is",
    "matches",
    "any",
    "where",
    "nth-child",
    "nth-last-child",
];

impl SelectorList {
    pub fn is_super_selector(&self, other: &SelectorList) -> bool {
        list_is_super_selector(&self.components, &other.components)
    }
}

impl ComplexSelector {
    pub fn is_super_selector(&self, other: &ComplexSelector) -> bool {
        complex_is_super_selector(&self.components, &other.components)
    }
}

impl CompoundSelector {
    pub fn is_super_selector(&self, other: &CompoundSelector) -> bool {
        compound_is_super_selector(self, other, None)
    }
}

/// Whether every complex selector in `list2` is covered by some member of
/// `list1`
pub fn list_is_super_selector(list1: &[ComplexSelector], list2: &[ComplexSelector]) -> bool {
    list2.iter().all(|complex2| {
        list1
            .iter()
            .any(|complex1| complex_is_super_selector(&complex1.components, &complex2.components))
    })
}

/// Whether `complex1` matches a superset of the elements `complex2` matches,
/// walking both ancestor chains and requiring combinators to align
pub fn complex_is_super_selector(
    complex1: &[ComplexSelectorComponent],
    complex2: &[ComplexSelectorComponent],
) -> bool {
    // Selectors with trailing combinators are neither superselectors nor
    // subselectors.
    match complex1.last() {
        Some(ComplexSelectorComponent::Combinator(..)) | None => return false,
        _ => {}
    }
    match complex2.last() {
        Some(ComplexSelectorComponent::Combinator(..)) | None => return false,
        _ => {}
    }

    let mut i1 = 0;
    let mut i2 = 0;
    loop {
        let remaining1 = complex1.len() - i1;
        let remaining2 = complex2.len() - i2;
        if remaining1 == 0 || remaining2 == 0 {
            return false;
        }

        // More complex selectors are never superselectors of less complex
        // ones.
        if remaining1 > remaining2 {
            return false;
        }

        let compound1 = match &complex1[i1] {
            ComplexSelectorComponent::Compound(compound) => compound,
            ComplexSelectorComponent::Combinator(..) => return false,
        };
        if complex2[i2].is_combinator() {
            return false;
        }

        if remaining1 == 1 {
            let last = match complex2.last().and_then(ComplexSelectorComponent::as_compound) {
                Some(compound) => compound,
                None => return false,
            };
            return compound_is_super_selector(
                compound1,
                last,
                Some(&complex2[i2..complex2.len() - 1]),
            );
        }

        // Find the first position in complex2 at which compound1 covers a
        // compound of complex2.
        let mut after_super_selector = i2 + 1;
        while after_super_selector < complex2.len() {
            if let ComplexSelectorComponent::Compound(compound2) =
                &complex2[after_super_selector - 1]
            {
                let parents = if after_super_selector - 1 > i2 + 1 {
                    &complex2[i2 + 1..after_super_selector - 1]
                } else {
                    &[]
                };
                if compound_is_super_selector(compound1, compound2, Some(parents)) {
                    break;
                }
            }
            after_super_selector += 1;
        }
        if after_super_selector == complex2.len() {
            return false;
        }

        let component1 = &complex1[i1 + 1];
        let component2 = &complex2[after_super_selector];
        match (component1, component2) {
            (
                ComplexSelectorComponent::Combinator(combinator1),
                ComplexSelectorComponent::Combinator(combinator2),
            ) => {
                // `.a ~ .b` covers `.a + .b`; otherwise the combinators must
                // match exactly.
                if *combinator1 == Combinator::FollowingSibling {
                    if *combinator2 == Combinator::Child {
                        return false;
                    }
                } else if combinator1 != combinator2 {
                    return false;
                }

                // `.foo > .baz` is not a superselector of
                // `.foo > .bar > .baz` or `.foo > .bar .baz`.
                if remaining1 == 3 && remaining2 > 3 {
                    return false;
                }

                i1 += 2;
                i2 = after_super_selector + 1;
            }
            (_, ComplexSelectorComponent::Combinator(combinator2)) => {
                if *combinator2 != Combinator::Child {
                    return false;
                }
                i1 += 1;
                i2 = after_super_selector + 1;
            }
            (ComplexSelectorComponent::Combinator(..), _) => return false,
            _ => {
                i1 += 1;
                i2 = after_super_selector;
            }
        }
    }
}

/// Like [`complex_is_super_selector`], but with both chains treated as
/// parents of a shared base compound
pub fn complex_is_parent_super_selector(
    complex1: &[ComplexSelectorComponent],
    complex2: &[ComplexSelectorComponent],
) -> bool {
    if matches!(complex1.first(), Some(component) if component.is_combinator()) {
        return false;
    }
    if matches!(complex2.first(), Some(component) if component.is_combinator()) {
        return false;
    }
    if complex1.len() > complex2.len() {
        return false;
    }

    // A synthetic base that matches nothing else in either chain.
    let base = ComplexSelectorComponent::Compound(CompoundSelector::new(vec![
        SimpleSelector::Placeholder("<temp>".to_string()),
    ]));
    let mut with_base1 = complex1.to_vec();
    with_base1.push(base.clone());
    let mut with_base2 = complex2.to_vec();
    with_base2.push(base);
    complex_is_super_selector(&with_base1, &with_base2)
}

/// Whether `compound1` matches a superset of the elements `compound2`
/// matches
///
/// `parents` is the ancestor chain of `compound2`, consulted by
/// selector-valued pseudos such as `:is` whose argument may reach above the
/// compound itself.
pub fn compound_is_super_selector(
    compound1: &CompoundSelector,
    compound2: &CompoundSelector,
    parents: Option<&[ComplexSelectorComponent]>,
) -> bool {
    for simple1 in &compound1.components {
        match simple1 {
            SimpleSelector::Pseudo(pseudo) if pseudo.selector.is_some() => {
                if !selector_pseudo_is_super_selector(pseudo, compound2, parents) {
                    return false;
                }
            }
            _ => {
                if !simple_is_super_selector_of_compound(simple1, compound2) {
                    return false;
                }
            }
        }
    }

    // A pseudo-element in compound2 that compound1 does not share defeats
    // containment: `::before` narrows what an element matches.
    for simple2 in &compound2.components {
        if let SimpleSelector::Pseudo(pseudo) = simple2 {
            if pseudo.is_element()
                && pseudo.selector.is_none()
                && !simple_is_super_selector_of_compound(simple2, compound1)
            {
                return false;
            }
        }
    }

    true
}

/// Whether `simple` is matched by some member of `compound`
///
/// Exact equality counts; so does appearing in every branch of a
/// subselector pseudo like `:is(...)`.
fn simple_is_super_selector_of_compound(
    simple: &SimpleSelector,
    compound: &CompoundSelector,
) -> bool {
    compound.components.iter().any(|their_simple| {
        if simple == their_simple {
            return true;
        }

        if let SimpleSelector::Pseudo(pseudo) = their_simple {
            if let Some(selector) = &pseudo.selector {
                if SUBSELECTOR_PSEUDOS.contains(&pseudo.unprefixed_name()) {
                    return selector.components.iter().all(|complex| {
                        if complex.components.len() != 1 {
                            return false;
                        }
                        complex.components[0]
                            .as_compound()
                            .is_some_and(|compound| compound.components.contains(simple))
                    });
                }
            }
        }

        false
    })
}

/// The compatibility table for selector-valued pseudos
fn selector_pseudo_is_super_selector(
    pseudo1: &Pseudo,
    compound2: &CompoundSelector,
    parents: Option<&[ComplexSelectorComponent]>,
) -> bool {
    let selector1 = match &pseudo1.selector {
        Some(selector) => selector,
        None => return false,
    };

    match pseudo1.unprefixed_name() {
        "is" | "matches" | "any" | "where" => {
            selector_pseudos_named(compound2, &pseudo1.name, true).any(|pseudo2| {
                pseudo2
                    .selector
                    .as_deref()
                    .is_some_and(|selector2| selector1.is_super_selector(selector2))
            }) || selector1.components.iter().any(|complex1| {
                let mut chain: Vec<ComplexSelectorComponent> =
                    parents.map(<[_]>::to_vec).unwrap_or_default();
                chain.push(ComplexSelectorComponent::Compound(compound2.clone()));
                complex_is_super_selector(&complex1.components, &chain)
            })
        }

        "has" | "host" | "host-context" => {
            selector_pseudos_named(compound2, &pseudo1.name, true).any(|pseudo2| {
                pseudo2
                    .selector
                    .as_deref()
                    .is_some_and(|selector2| selector1.is_super_selector(selector2))
            })
        }

        "slotted" => selector_pseudos_named(compound2, &pseudo1.name, false).any(|pseudo2| {
            pseudo2
                .selector
                .as_deref()
                .is_some_and(|selector2| selector1.is_super_selector(selector2))
        }),

        "not" => selector1.components.iter().all(|complex| {
            compound2.components.iter().any(|simple2| match simple2 {
                SimpleSelector::Type(..) => {
                    let compound1 = complex.components.last().and_then(|component| component.as_compound());
                    compound1.is_some_and(|compound1| {
                        compound1.components.iter().any(|simple1| {
                            matches!(simple1, SimpleSelector::Type(..)) && simple1 != simple2
                        })
                    })
                }
                SimpleSelector::Id(..) => {
                    let compound1 = complex.components.last().and_then(|component| component.as_compound());
                    compound1.is_some_and(|compound1| {
                        compound1.components.iter().any(|simple1| {
                            matches!(simple1, SimpleSelector::Id(..)) && simple1 != simple2
                        })
                    })
                }
                SimpleSelector::Pseudo(pseudo2) => {
                    pseudo2.name == pseudo1.name
                        && pseudo2.selector.as_ref().is_some_and(|selector2| {
                            list_is_super_selector(
                                &selector2.components,
                                std::slice::from_ref(complex),
                            )
                        })
                }
                _ => false,
            })
        }),

        "current" => selector_pseudos_named(compound2, &pseudo1.name, true)
            .any(|pseudo2| pseudo1.selector == pseudo2.selector),

        "nth-child" | "nth-last-child" => compound2.components.iter().any(|simple2| {
            matches!(simple2, SimpleSelector::Pseudo(pseudo2)
                if pseudo2.name == pseudo1.name
                    && pseudo2.argument == pseudo1.argument
                    && pseudo2.selector.as_ref().is_some_and(|selector2| selector1.is_super_selector(selector2)))
        }),

        _ => false,
    }
}

/// Selector-valued pseudos in `compound` with the given name
fn selector_pseudos_named<'a>(
    compound: &'a CompoundSelector,
    name: &'a str,
    is_class: bool,
) -> impl Iterator<Item = &'a Pseudo> {
    compound.components.iter().filter_map(move |simple| match simple {
        SimpleSelector::Pseudo(pseudo)
            if pseudo.is_class == is_class && pseudo.selector.is_some() && pseudo.name == name =>
        {
            Some(pseudo)
        }
        _ => None,
    })
}
