//! Selector unification
//!
//! Combining two selector fragments into the selector(s) matching their
//! intersection. "No selector can match both" is an ordinary `None`/empty
//! outcome, never an error.

use crate::ast::*;
use crate::weave::weave;

impl SimpleSelector {
    /// Fold this selector into the member list of a compound selector
    ///
    /// Returns the members of a compound matching the intersection of `self`
    /// and `compound`, or `None` when nothing can match both.
    pub fn unify(&self, compound: &[SimpleSelector]) -> Option<Vec<SimpleSelector>> {
        match self {
            SimpleSelector::Type(..) | SimpleSelector::Universal(..) => {
                self.unify_universal_or_type(compound)
            }
            SimpleSelector::Id(..) => {
                // Two distinct IDs on one element is the one hard
                // impossibility that short-circuits every caller.
                let conflicting = compound
                    .iter()
                    .any(|simple| matches!(simple, SimpleSelector::Id(..)) && simple != self);
                if conflicting {
                    return None;
                }
                self.unify_default(compound)
            }
            SimpleSelector::Pseudo(pseudo) => pseudo.unify_into(self, compound),
            _ => self.unify_default(compound),
        }
    }

    /// Unification for everything without special rules: append, keeping
    /// pseudo selectors last
    fn unify_default(&self, compound: &[SimpleSelector]) -> Option<Vec<SimpleSelector>> {
        if compound.len() == 1 {
            if let SimpleSelector::Universal(..) = &compound[0] {
                return compound[0].unify(std::slice::from_ref(self));
            }
        }
        if compound.contains(self) {
            return Some(compound.to_vec());
        }

        let mut result = Vec::with_capacity(compound.len() + 1);
        let mut added_self = false;
        for simple in compound {
            if !added_self && matches!(simple, SimpleSelector::Pseudo(..)) {
                result.push(self.clone());
                added_self = true;
            }
            result.push(simple.clone());
        }
        if !added_self {
            result.push(self.clone());
        }
        Some(result)
    }

    /// Unification for type and universal selectors: at most one survives
    fn unify_universal_or_type(&self, compound: &[SimpleSelector]) -> Option<Vec<SimpleSelector>> {
        match compound.first() {
            Some(first @ SimpleSelector::Universal(..)) | Some(first @ SimpleSelector::Type(..)) => {
                let unified = unify_universal_and_element(self, first)?;
                let mut result = vec![unified];
                result.extend(compound.iter().skip(1).cloned());
                Some(result)
            }
            _ => {
                if let SimpleSelector::Universal(namespace) = self {
                    // A bare or wildcard-namespace universal adds nothing.
                    if matches!(namespace, Namespace::None | Namespace::Asterisk)
                        && !compound.is_empty()
                    {
                        return Some(compound.to_vec());
                    }
                }
                let mut result = vec![self.clone()];
                result.extend(compound.iter().cloned());
                Some(result)
            }
        }
    }
}

impl Pseudo {
    /// Unification for pseudo selectors
    ///
    /// A compound may carry at most one pseudo-element; pseudo-classes sort
    /// after everything else but before any pseudo-element.
    fn unify_into(
        &self,
        simple: &SimpleSelector,
        compound: &[SimpleSelector],
    ) -> Option<Vec<SimpleSelector>> {
        if compound.len() == 1 {
            if let SimpleSelector::Universal(..) = &compound[0] {
                return compound[0].unify(std::slice::from_ref(simple));
            }
        }
        if compound.contains(simple) {
            return Some(compound.to_vec());
        }

        let mut result = Vec::with_capacity(compound.len() + 1);
        let mut added_self = false;
        for other in compound {
            if matches!(other, SimpleSelector::Pseudo(other_pseudo) if other_pseudo.is_element()) {
                if self.is_element() {
                    return None;
                }
                result.push(simple.clone());
                added_self = true;
            }
            result.push(other.clone());
        }
        if !added_self {
            result.push(simple.clone());
        }
        Some(result)
    }
}

/// Unify two selectors that are each either universal or a type selector
///
/// Resolves names and namespaces together, permitting the `*|` wildcard on
/// either side.
fn unify_universal_and_element(
    selector1: &SimpleSelector,
    selector2: &SimpleSelector,
) -> Option<SimpleSelector> {
    let (namespace1, name1) = namespace_and_name(selector1)?;
    let (namespace2, name2) = namespace_and_name(selector2)?;

    let namespace = if namespace1 == namespace2 || namespace2.is_wildcard() {
        namespace1
    } else if namespace1.is_wildcard() {
        namespace2
    } else {
        return None;
    };

    let name = match (name1, name2) {
        (Some(name1), Some(name2)) => {
            if name1 != name2 {
                return None;
            }
            Some(name1)
        }
        (Some(name), None) | (None, Some(name)) => Some(name),
        (None, None) => None,
    };

    Some(match name {
        Some(ident) => SimpleSelector::Type(QualifiedName { ident, namespace }),
        None => SimpleSelector::Universal(namespace),
    })
}

fn namespace_and_name(selector: &SimpleSelector) -> Option<(Namespace, Option<String>)> {
    match selector {
        SimpleSelector::Universal(namespace) => Some((namespace.clone(), None)),
        SimpleSelector::Type(name) => Some((name.namespace.clone(), Some(name.ident.clone()))),
        _ => None,
    }
}

/// Unify two compound selectors into the compound matching their
/// intersection, or `None` when they cannot match the same element
pub fn unify_compound(
    compound1: &[SimpleSelector],
    compound2: &[SimpleSelector],
) -> Option<CompoundSelector> {
    let mut result = compound2.to_vec();
    for simple in compound1 {
        result = simple.unify(&result)?;
    }
    Some(CompoundSelector::new(result))
}

/// Unify a set of complex selectors that share a trailing target compound
///
/// Only the trailing compound of each input is unified; the unified base is
/// appended to the last input's parent prefix and the prefixes are woven
/// into every valid ordering. `None` means the bases cannot match one
/// element; an empty result means the parent chains cannot be interleaved.
pub fn unify_complex(
    complexes: &[Vec<ComplexSelectorComponent>],
) -> Option<Vec<Vec<ComplexSelectorComponent>>> {
    if complexes.len() == 1 {
        return Some(complexes.to_vec());
    }

    let mut unified_base: Option<Vec<SimpleSelector>> = None;
    for complex in complexes {
        let base = match complex.last() {
            Some(ComplexSelectorComponent::Compound(compound)) => compound,
            _ => return None,
        };
        match &mut unified_base {
            None => unified_base = Some(base.components.clone()),
            Some(existing) => {
                for simple in &base.components {
                    *existing = simple.unify(existing)?;
                }
            }
        }
    }

    let unified_base = unified_base?;
    let mut without_bases: Vec<Vec<ComplexSelectorComponent>> = complexes
        .iter()
        .map(|complex| complex[..complex.len() - 1].to_vec())
        .collect();
    without_bases
        .last_mut()?
        .push(ComplexSelectorComponent::Compound(CompoundSelector::new(
            unified_base,
        )));

    Some(weave(&without_bases))
}
