//! Parent weaving
//!
//! Interleaves the parent chains of complex selectors that share an element,
//! producing every ordering a browser could match without reordering either
//! chain against itself.

use std::collections::{HashSet, VecDeque};

use crate::ast::*;
use crate::lcs::{longest_common_subsequence, longest_common_subsequence_by};
use crate::permutate::permutate;
use crate::superselector::{complex_is_parent_super_selector, compound_is_super_selector};
use crate::unify::unify_compound;

type Component = ComplexSelectorComponent;

/// Expand a set of complex selectors into the complexes matching their
/// intersection
///
/// The first selector seeds the prefixes; each subsequent selector's parent
/// chain is woven into every prefix so far and its trailing compound is
/// appended verbatim. Returns the empty list when the chains cannot be
/// interleaved.
pub fn weave(complexes: &[Vec<Component>]) -> Vec<Vec<Component>> {
    let mut prefixes: Vec<Vec<Component>> = match complexes.first() {
        Some(first) => vec![first.clone()],
        None => return Vec::new(),
    };

    for complex in &complexes[1..] {
        let target = match complex.last() {
            Some(target) => target.clone(),
            None => continue,
        };
        if complex.len() == 1 {
            for prefix in &mut prefixes {
                prefix.push(target.clone());
            }
            continue;
        }

        let parents = &complex[..complex.len() - 1];
        let mut new_prefixes = Vec::new();
        for prefix in &prefixes {
            if let Some(parent_prefixes) = weave_parents(prefix, parents) {
                for mut parent_prefix in parent_prefixes {
                    parent_prefix.push(target.clone());
                    new_prefixes.push(parent_prefix);
                }
            }
        }
        prefixes = new_prefixes;
    }

    prefixes
}

/// Interleave two parent chains, preserving the relative order within each
///
/// Returns `None` when no element could have both ancestries, for example
/// when the chains end in incompatible combinators.
fn weave_parents(parents1: &[Component], parents2: &[Component]) -> Option<Vec<Vec<Component>>> {
    let mut queue1: VecDeque<Component> = parents1.iter().cloned().collect();
    let mut queue2: VecDeque<Component> = parents2.iter().cloned().collect();

    let initial_combinators = merge_initial_combinators(&mut queue1, &mut queue2)?;
    let mut final_combinators = VecDeque::new();
    if !merge_final_combinators(&mut queue1, &mut queue2, &mut final_combinators) {
        return None;
    }

    // At most one `:root` may appear in the output.
    match (first_if_root(&mut queue1), first_if_root(&mut queue2)) {
        (Some(root1), Some(root2)) => {
            let root = unify_compound(&root1.components, &root2.components)?;
            queue1.push_front(Component::Compound(root.clone()));
            queue2.push_front(Component::Compound(root));
        }
        (Some(root1), None) => queue2.push_front(Component::Compound(root1)),
        (None, Some(root2)) => queue1.push_front(Component::Compound(root2)),
        (None, None) => {}
    }

    let mut groups1 = group_selectors(queue1);
    let mut groups2 = group_selectors(queue2);
    let lcs = longest_common_subsequence_by(
        &groups2.iter().cloned().collect::<Vec<_>>(),
        &groups1.iter().cloned().collect::<Vec<_>>(),
        |group1, group2| {
            if group1 == group2 {
                return Some(group1.clone());
            }
            if !matches!(group1.first(), Some(Component::Compound(..)))
                || !matches!(group2.first(), Some(Component::Compound(..)))
            {
                return None;
            }
            if complex_is_parent_super_selector(group1, group2) {
                return Some(group2.clone());
            }
            if complex_is_parent_super_selector(group2, group1) {
                return Some(group1.clone());
            }
            if !must_unify(group1, group2) {
                return None;
            }
            let unified = crate::unify::unify_complex(&[group1.clone(), group2.clone()])?;
            if unified.len() == 1 {
                unified.into_iter().next()
            } else {
                None
            }
        },
    );

    let mut choices: Vec<Vec<Vec<Component>>> = vec![vec![initial_combinators
        .into_iter()
        .map(Component::Combinator)
        .collect()]];

    for group in lcs {
        let chunk_choices = chunks(&mut groups1, &mut groups2, |sequence| {
            match sequence.front() {
                Some(first) => complex_is_parent_super_selector(first, &group),
                None => true,
            }
        });
        choices.push(
            chunk_choices
                .into_iter()
                .map(|chunk| chunk.into_iter().flatten().collect())
                .collect(),
        );
        choices.push(vec![group]);
        groups1.pop_front();
        groups2.pop_front();
    }

    let trailing = chunks(&mut groups1, &mut groups2, |sequence| sequence.is_empty());
    choices.push(
        trailing
            .into_iter()
            .map(|chunk| chunk.into_iter().flatten().collect())
            .collect(),
    );
    choices.extend(final_combinators);

    let choices: Vec<Vec<Vec<Component>>> = choices
        .into_iter()
        .filter(|choice| !choice.is_empty())
        .collect();

    Some(
        permutate(&choices)
            .into_iter()
            .map(|path| path.into_iter().flatten().collect())
            .collect(),
    )
}

/// Pop leading combinators off both queues and merge them
///
/// One run must be a subsequence of the other; the longer run wins.
fn merge_initial_combinators(
    queue1: &mut VecDeque<Component>,
    queue2: &mut VecDeque<Component>,
) -> Option<Vec<Combinator>> {
    let mut combinators1 = Vec::new();
    while let Some(Component::Combinator(combinator)) = queue1.front() {
        combinators1.push(*combinator);
        queue1.pop_front();
    }
    let mut combinators2 = Vec::new();
    while let Some(Component::Combinator(combinator)) = queue2.front() {
        combinators2.push(*combinator);
        queue2.pop_front();
    }

    let lcs = longest_common_subsequence(&combinators1, &combinators2);
    if lcs == combinators1 {
        Some(combinators2)
    } else if lcs == combinators2 {
        Some(combinators1)
    } else {
        None
    }
}

/// Pop trailing combinators (and the compounds they bind) off both queues,
/// prepending merged alternatives onto `result`
///
/// Returns `false` when the trailing combinators are irreconcilable.
fn merge_final_combinators(
    queue1: &mut VecDeque<Component>,
    queue2: &mut VecDeque<Component>,
    result: &mut VecDeque<Vec<Vec<Component>>>,
) -> bool {
    if !matches!(queue1.back(), Some(Component::Combinator(..)))
        && !matches!(queue2.back(), Some(Component::Combinator(..)))
    {
        return true;
    }

    let mut combinators1 = Vec::new();
    while let Some(Component::Combinator(combinator)) = queue1.back() {
        combinators1.push(*combinator);
        queue1.pop_back();
    }
    let mut combinators2 = Vec::new();
    while let Some(Component::Combinator(combinator)) = queue2.back() {
        combinators2.push(*combinator);
        queue2.pop_back();
    }

    if combinators1.len() > 1 || combinators2.len() > 1 {
        // Consecutive combinators only merge when one run is a suffix of the
        // other, matching them in reverse.
        let lcs = longest_common_subsequence(&combinators1, &combinators2);
        if lcs == combinators1 {
            result.push_front(vec![combinators2
                .iter()
                .rev()
                .map(|combinator| Component::Combinator(*combinator))
                .collect()]);
        } else if lcs == combinators2 {
            result.push_front(vec![combinators1
                .iter()
                .rev()
                .map(|combinator| Component::Combinator(*combinator))
                .collect()]);
        } else {
            return false;
        }
        return true;
    }

    match (combinators1.first().copied(), combinators2.first().copied()) {
        (Some(combinator1), Some(combinator2)) => {
            let compound1 = match queue1.pop_back() {
                Some(Component::Compound(compound)) => compound,
                _ => return false,
            };
            let compound2 = match queue2.pop_back() {
                Some(Component::Compound(compound)) => compound,
                _ => return false,
            };

            match (combinator1, combinator2) {
                (Combinator::FollowingSibling, Combinator::FollowingSibling) => {
                    if compound_is_super_selector(&compound1, &compound2, None) {
                        result.push_front(vec![vec![
                            Component::Compound(compound2),
                            Component::Combinator(Combinator::FollowingSibling),
                        ]]);
                    } else if compound_is_super_selector(&compound2, &compound1, None) {
                        result.push_front(vec![vec![
                            Component::Compound(compound1),
                            Component::Combinator(Combinator::FollowingSibling),
                        ]]);
                    } else {
                        let mut alternatives = vec![
                            vec![
                                Component::Compound(compound1.clone()),
                                Component::Combinator(Combinator::FollowingSibling),
                                Component::Compound(compound2.clone()),
                                Component::Combinator(Combinator::FollowingSibling),
                            ],
                            vec![
                                Component::Compound(compound2.clone()),
                                Component::Combinator(Combinator::FollowingSibling),
                                Component::Compound(compound1.clone()),
                                Component::Combinator(Combinator::FollowingSibling),
                            ],
                        ];
                        if let Some(unified) =
                            unify_compound(&compound1.components, &compound2.components)
                        {
                            alternatives.push(vec![
                                Component::Compound(unified),
                                Component::Combinator(Combinator::FollowingSibling),
                            ]);
                        }
                        result.push_front(alternatives);
                    }
                }
                (Combinator::FollowingSibling, Combinator::NextSibling)
                | (Combinator::NextSibling, Combinator::FollowingSibling) => {
                    let (following, next) = if combinator1 == Combinator::FollowingSibling {
                        (compound1.clone(), compound2.clone())
                    } else {
                        (compound2.clone(), compound1.clone())
                    };
                    if compound_is_super_selector(&following, &next, None) {
                        result.push_front(vec![vec![
                            Component::Compound(next),
                            Component::Combinator(Combinator::NextSibling),
                        ]]);
                    } else {
                        let mut alternatives = vec![vec![
                            Component::Compound(following),
                            Component::Combinator(Combinator::FollowingSibling),
                            Component::Compound(next),
                            Component::Combinator(Combinator::NextSibling),
                        ]];
                        if let Some(unified) =
                            unify_compound(&compound1.components, &compound2.components)
                        {
                            alternatives.push(vec![
                                Component::Compound(unified),
                                Component::Combinator(Combinator::NextSibling),
                            ]);
                        }
                        result.push_front(alternatives);
                    }
                }
                (Combinator::Child, Combinator::NextSibling)
                | (Combinator::Child, Combinator::FollowingSibling) => {
                    result.push_front(vec![vec![
                        Component::Compound(compound2),
                        Component::Combinator(combinator2),
                    ]]);
                    queue1.push_back(Component::Compound(compound1));
                    queue1.push_back(Component::Combinator(Combinator::Child));
                }
                (Combinator::NextSibling, Combinator::Child)
                | (Combinator::FollowingSibling, Combinator::Child) => {
                    result.push_front(vec![vec![
                        Component::Compound(compound1),
                        Component::Combinator(combinator1),
                    ]]);
                    queue2.push_back(Component::Compound(compound2));
                    queue2.push_back(Component::Combinator(Combinator::Child));
                }
                (Combinator::Child, Combinator::Child)
                | (Combinator::NextSibling, Combinator::NextSibling) => {
                    let unified = match unify_compound(&compound1.components, &compound2.components)
                    {
                        Some(unified) => unified,
                        None => return false,
                    };
                    result.push_front(vec![vec![
                        Component::Compound(unified),
                        Component::Combinator(combinator1),
                    ]]);
                }
            }
            merge_final_combinators(queue1, queue2, result)
        }
        (Some(combinator1), None) => {
            if combinator1 == Combinator::Child {
                // `a > b` and `a b` both allow `a > b`.
                let redundant = matches!(
                    (queue1.back(), queue2.back()),
                    (
                        Some(Component::Compound(last1)),
                        Some(Component::Compound(last2)),
                    ) if compound_is_super_selector(last2, last1, None)
                );
                if redundant {
                    queue2.pop_back();
                }
            }
            match queue1.pop_back() {
                Some(component) => {
                    result.push_front(vec![vec![
                        component,
                        Component::Combinator(combinator1),
                    ]]);
                }
                None => return false,
            }
            merge_final_combinators(queue1, queue2, result)
        }
        (None, Some(combinator2)) => {
            if combinator2 == Combinator::Child {
                let redundant = matches!(
                    (queue1.back(), queue2.back()),
                    (
                        Some(Component::Compound(last1)),
                        Some(Component::Compound(last2)),
                    ) if compound_is_super_selector(last1, last2, None)
                );
                if redundant {
                    queue1.pop_back();
                }
            }
            match queue2.pop_back() {
                Some(component) => {
                    result.push_front(vec![vec![
                        component,
                        Component::Combinator(combinator2),
                    ]]);
                }
                None => return false,
            }
            merge_final_combinators(queue1, queue2, result)
        }
        (None, None) => true,
    }
}

/// Pop the leading compound if it contains `:root`
fn first_if_root(queue: &mut VecDeque<Component>) -> Option<CompoundSelector> {
    match queue.front() {
        Some(Component::Compound(compound)) if has_root(compound) => {
            match queue.pop_front() {
                Some(Component::Compound(compound)) => Some(compound),
                _ => None,
            }
        }
        _ => None,
    }
}

fn has_root(compound: &CompoundSelector) -> bool {
    compound.components.iter().any(|simple| {
        matches!(simple, SimpleSelector::Pseudo(pseudo)
            if pseudo.is_class && pseudo.unprefixed_name() == "root")
    })
}

/// Split a component sequence into groups such that combinators stay glued
/// to the compounds around them
///
/// A group boundary falls exactly where two compounds meet across a
/// descendant combinator.
fn group_selectors(queue: VecDeque<Component>) -> VecDeque<Vec<Component>> {
    let mut groups: VecDeque<Vec<Component>> = VecDeque::new();
    let mut iter = queue.into_iter().peekable();
    while let Some(first) = iter.next() {
        let mut group = vec![first];
        while let Some(next) = iter.peek() {
            let glued = next.is_combinator()
                || group
                    .last()
                    .map(Component::is_combinator)
                    .unwrap_or(false);
            if !glued {
                break;
            }
            group.push(iter.next().expect("peeked component"));
        }
        groups.push_back(group);
    }
    groups
}

/// Pop elements off both queues until `done`, returning the ways the two
/// chunks can be concatenated
///
/// Both relative orders are preserved; when both chunks are non-empty the
/// two concatenation orders are returned as alternatives.
fn chunks<T: Clone>(
    queue1: &mut VecDeque<T>,
    queue2: &mut VecDeque<T>,
    done: impl Fn(&VecDeque<T>) -> bool,
) -> Vec<Vec<T>> {
    let mut chunk1 = Vec::new();
    while !done(queue1) {
        match queue1.pop_front() {
            Some(element) => chunk1.push(element),
            None => break,
        }
    }
    let mut chunk2 = Vec::new();
    while !done(queue2) {
        match queue2.pop_front() {
            Some(element) => chunk2.push(element),
            None => break,
        }
    }

    match (chunk1.is_empty(), chunk2.is_empty()) {
        (true, true) => Vec::new(),
        (true, false) => vec![chunk2],
        (false, true) => vec![chunk1],
        (false, false) => {
            let mut order1 = chunk1.clone();
            order1.extend(chunk2.iter().cloned());
            let mut order2 = chunk2;
            order2.extend(chunk1);
            vec![order1, order2]
        }
    }
}

/// Whether merging two groups is required for correctness rather than merely
/// allowed
///
/// Groups must unify when they share a simple selector that can match at
/// most one element per document position: an ID or a pseudo-element.
fn must_unify(complex1: &[Component], complex2: &[Component]) -> bool {
    let unique: HashSet<&SimpleSelector> = complex1
        .iter()
        .filter_map(Component::as_compound)
        .flat_map(|compound| compound.components.iter())
        .filter(|simple| is_unique(simple))
        .collect();
    if unique.is_empty() {
        return false;
    }

    complex2
        .iter()
        .filter_map(Component::as_compound)
        .flat_map(|compound| compound.components.iter())
        .any(|simple| is_unique(simple) && unique.contains(simple))
}

fn is_unique(simple: &SimpleSelector) -> bool {
    match simple {
        SimpleSelector::Id(..) => true,
        SimpleSelector::Pseudo(pseudo) => pseudo.is_element(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_selector;

    fn components(source: &str) -> Vec<Component> {
        parse_selector(source, "/test.css")
            .expect("Failed to parse selector")
            .components
            .remove(0)
            .components
    }

    fn weave_strings(sources: &[&str]) -> Vec<String> {
        let complexes: Vec<Vec<Component>> =
            sources.iter().map(|source| components(source)).collect();
        weave(&complexes)
            .into_iter()
            .map(|result| ComplexSelector::new(result).to_string())
            .collect()
    }

    #[test]
    fn test_weave_single() {
        assert_eq!(weave_strings(&[".a .b"]), vec![".a .b"]);
    }

    #[test]
    fn test_weave_trailing_compound_appends() {
        assert_eq!(weave_strings(&[".a", ".b"]), vec![".a .b"]);
    }

    #[test]
    fn test_weave_disjoint_parents() {
        let results = weave_strings(&[".a .x", ".b .y"]);
        assert_eq!(results, vec![".a .x .b .y", ".b .a .x .y"]);
    }

    #[test]
    fn test_weave_shared_parent_collapses() {
        // Identical parents are not duplicated.
        let results = weave_strings(&[".a .x", ".a .y"]);
        assert!(results.contains(&".a .x .y".to_string()));
        assert!(!results.contains(&".a .a .x .y".to_string()));
    }

    #[test]
    fn test_weave_superselector_parent_kept_specific() {
        // `.a.b` matches a subset of `.a`, so only the tighter parent
        // survives at the shared position.
        let results = weave_strings(&[".a .x", ".a.b .y"]);
        assert!(results.contains(&".a.b .x .y".to_string()));
    }

    #[test]
    fn test_weave_second_child_chain_appends() {
        // The second chain's `>` binds to its own target, so it nests under
        // the first selector unchanged.
        let results = weave_strings(&[".a > .x", ".b > .y"]);
        assert_eq!(results, vec![".a > .x .b > .y"]);
    }

    fn parent_chain(source: &str) -> Vec<Component> {
        let mut chain = components(source);
        chain.pop();
        chain
    }

    #[test]
    fn test_weave_parents_child_combinators_unify() {
        // Trailing `>` on both chains forces the parents onto one element.
        let results =
            weave_parents(&parent_chain(".a > .x"), &parent_chain(".b > .x")).unwrap();
        let strings: Vec<String> = results
            .into_iter()
            .map(|result| ComplexSelector::new(result).to_string())
            .collect();
        assert_eq!(strings, vec![".b.a >"]);
    }

    #[test]
    fn test_weave_parents_conflicting_child_parents() {
        assert_eq!(
            weave_parents(&parent_chain("#a > .x"), &parent_chain("#b > .x")),
            None
        );
    }

    #[test]
    fn test_weave_parents_sibling_matrix() {
        // `~` against `+` keeps the `+` side adjacent, plus the unified form.
        let results =
            weave_parents(&parent_chain(".a ~ .x"), &parent_chain(".b + .x")).unwrap();
        let strings: Vec<String> = results
            .into_iter()
            .map(|result| ComplexSelector::new(result).to_string())
            .collect();
        assert!(strings.contains(&".a ~ .b +".to_string()));
        assert!(strings.contains(&".b.a +".to_string()));
    }

    #[test]
    fn test_weave_parents_following_siblings_commute() {
        let results =
            weave_parents(&parent_chain(".a ~ .x"), &parent_chain(".b ~ .x")).unwrap();
        let strings: Vec<String> = results
            .into_iter()
            .map(|result| ComplexSelector::new(result).to_string())
            .collect();
        assert!(strings.contains(&".a ~ .b ~".to_string()));
        assert!(strings.contains(&".b ~ .a ~".to_string()));
        assert!(strings.contains(&".b.a ~".to_string()));
    }

    #[test]
    fn test_weave_preserves_relative_order() {
        for result in weave_strings(&[".a .b .x", ".c .y"]) {
            let a = result.find(".a").unwrap();
            let b = result.find(".b").unwrap();
            assert!(a < b);
        }
    }

    #[test]
    fn test_group_selectors_boundaries() {
        let queue: VecDeque<Component> = components(".a > .b .c").into_iter().collect();
        let groups = group_selectors(queue);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 3);
        assert_eq!(groups[1].len(), 1);
    }

    #[test]
    fn test_must_unify_requires_shared_unique() {
        assert!(must_unify(&components("#a .b"), &components(".c #a")));
        assert!(!must_unify(&components("#a .b"), &components(".c #d")));
        assert!(!must_unify(&components(".a"), &components(".a")));
    }

    #[test]
    fn test_chunks_orders() {
        let mut queue1: VecDeque<i32> = vec![1, 2].into_iter().collect();
        let mut queue2: VecDeque<i32> = vec![3].into_iter().collect();
        let result = chunks(&mut queue1, &mut queue2, |queue| queue.is_empty());
        assert_eq!(result, vec![vec![1, 2, 3], vec![3, 1, 2]]);
    }
}
