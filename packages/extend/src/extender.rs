//! The `@extend` registry and orchestration
//!
//! Style rules and extend directives arrive interleaved in document order.
//! Each registered rule is run through every extension known so far, and
//! each new extension retroactively re-extends the rules and extensions
//! already registered, so the registry converges to the same result
//! regardless of source ordering.

use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, instrument};

use weft_selector::ast::Pseudo;
use weft_selector::permutate::{permutate, permutate_alt};
use weft_selector::unify::unify_complex;
use weft_selector::weave::weave;
use weft_selector::{
    ComplexSelector, ComplexSelectorComponent, CompoundSelector, MediaContext, SelectorList,
    SimpleSelector, Span,
};

use crate::error::{ExtendError, ExtendResult};
use crate::extended_selector::ExtendedSelector;
use crate::extension::{ExtendMode, Extension};

/// Extensions grouped by target, each an insertion-ordered map from extender
/// selector to its extension record
pub(crate) type ExtensionMap = IndexMap<SimpleSelector, IndexMap<ComplexSelector, Extension>>;

/// Trimming is quadratic; above this many candidates it is skipped outright.
/// A documented limitation: pathological inputs keep selectors that would
/// otherwise be trimmed.
const TRIM_CANDIDATE_LIMIT: usize = 100;

/// One alternative inside `extend_compound`'s option groups: either the
/// original simple selector(s) reassembled, or an extender pulled from the
/// registry.
#[derive(Debug, Clone)]
struct ExtenderEntry {
    selector: ComplexSelector,
    is_original: bool,
    /// The extension this entry came from, when it is not an original.
    source: Option<Extension>,
}

impl ExtenderEntry {
    fn assert_compatible_media_context(
        &self,
        media_context: Option<&MediaContext>,
    ) -> ExtendResult<()> {
        let extension = match &self.source {
            Some(extension) => extension,
            None => return Ok(()),
        };
        let expected = match &extension.media_context {
            Some(context) => context,
            None => return Ok(()),
        };
        if media_context == Some(expected) {
            return Ok(());
        }
        Err(ExtendError::incompatible_media_context(
            extension.span.clone(),
        ))
    }
}

/// The per-compilation extension registry
///
/// Owned by a single compilation and discarded with it.
#[derive(Debug, Default)]
pub struct Extender {
    /// Which registered rules contain each simple selector. When a simple
    /// selector later becomes an extend target, these rules are re-extended.
    selectors: IndexMap<SimpleSelector, IndexSet<ExtendedSelector>>,
    /// All registered extensions, by target.
    extensions: ExtensionMap,
    /// Extensions indexed by the simple selectors appearing in their
    /// extender, for extend-of-extend propagation.
    extensions_by_extender: IndexMap<SimpleSelector, Vec<Extension>>,
    /// Media context each rule was registered under. Rules defined at the
    /// top level have no entry.
    media_contexts: HashMap<ExtendedSelector, MediaContext>,
    /// Maximum specificity among the complex selectors each simple selector
    /// originally appeared in. Guards trimming.
    source_specificity: HashMap<SimpleSelector, i32>,
    /// Complex selectors that appeared in the source document. Never
    /// trimmed, never counted as redundant.
    originals: HashSet<ComplexSelector>,
}

impl Extender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend `list` so it additionally matches everything `targets` match,
    /// using `source`'s complex selectors as the extenders
    ///
    /// Every complex selector in `targets` must be a single compound, or
    /// this fails with [`ExtendError::InvalidExtendTarget`].
    pub fn extend(
        list: SelectorList,
        source: &SelectorList,
        targets: &SelectorList,
    ) -> ExtendResult<SelectorList> {
        Self::extend_or_replace(list, source, targets, ExtendMode::AllTargets)
    }

    /// Like [`Extender::extend`], but the original selectors are replaced
    /// rather than kept alongside the result
    pub fn replace(
        list: SelectorList,
        source: &SelectorList,
        targets: &SelectorList,
    ) -> ExtendResult<SelectorList> {
        Self::extend_or_replace(list, source, targets, ExtendMode::Replace)
    }

    fn extend_or_replace(
        list: SelectorList,
        source: &SelectorList,
        targets: &SelectorList,
        mode: ExtendMode,
    ) -> ExtendResult<SelectorList> {
        let span = list.span.clone();
        let mut extensions = ExtensionMap::default();
        for complex in &targets.components {
            let compound = match complex.components.as_slice() {
                [ComplexSelectorComponent::Compound(compound)] => compound,
                _ => return Err(ExtendError::invalid_extend_target(complex.to_string())),
            };
            for simple in &compound.components {
                let sources = extensions.entry(simple.clone()).or_default();
                for source_complex in &source.components {
                    sources.insert(
                        source_complex.clone(),
                        Extension::new(
                            source_complex.clone(),
                            simple.clone(),
                            span.clone(),
                            None,
                            false,
                        ),
                    );
                }
            }
        }

        let mut extender = Extender::new();
        if !list.is_invisible() {
            extender.originals.extend(list.components.iter().cloned());
        }
        extender.extend_list(&list, &extensions, None, mode)
    }

    /// Register a style rule's selector, extending it with everything known
    /// so far
    ///
    /// The returned handle is shared with the registry: extensions added
    /// later update it in place.
    #[instrument(level = "debug", skip_all, fields(selector = %list))]
    pub fn add_selector(
        &mut self,
        list: SelectorList,
        media_context: Option<MediaContext>,
    ) -> ExtendResult<ExtendedSelector> {
        if !list.is_invisible() {
            self.originals.extend(list.components.iter().cloned());
        }

        let extended = if self.extensions.is_empty() {
            list
        } else {
            let extensions = self.extensions.clone();
            self.extend_list(&list, &extensions, media_context.as_ref(), ExtendMode::Normal)?
        };
        debug!(extended = %extended, "registered style rule");

        let handle = ExtendedSelector::new(extended.clone());
        if let Some(context) = media_context {
            self.media_contexts.insert(handle.clone(), context);
        }
        self.register_selector(&extended, &handle);
        Ok(handle)
    }

    /// Register one `@extend` directive
    ///
    /// `extender_list` is the containing rule's current selector list; when
    /// that rule was itself extended earlier, the derived extenders carry
    /// the transitive extensions along. Rules and extensions already
    /// registered are retroactively re-extended.
    #[instrument(level = "debug", skip_all, fields(extender = %extender_list, target = %target))]
    pub fn add_extension(
        &mut self,
        extender_list: &SelectorList,
        target: &SimpleSelector,
        span: Span,
        media_context: Option<&MediaContext>,
        is_optional: bool,
    ) -> ExtendResult<()> {
        let selectors = self.selectors.get(target).cloned();
        let existing_extensions = self.extensions_by_extender.get(target).cloned();

        let mut new_extensions: Option<IndexMap<ComplexSelector, Extension>> = None;
        for complex in &extender_list.components {
            let extension = Extension::new(
                complex.clone(),
                target.clone(),
                span.clone(),
                media_context.cloned(),
                is_optional,
            );

            let sources = self.extensions.entry(target.clone()).or_default();
            if let Some(existing) = sources.get_mut(complex) {
                // The (extender, target) edge already exists; a mandatory
                // re-registration upgrades it, nothing else to do.
                if !is_optional {
                    existing.is_optional = false;
                }
                continue;
            }
            sources.insert(complex.clone(), extension.clone());

            for simple in simple_selectors_of(complex) {
                self.extensions_by_extender
                    .entry(simple.clone())
                    .or_default()
                    .push(extension.clone());
                self.source_specificity
                    .entry(simple)
                    .or_insert_with(|| complex.specificity());
            }

            if selectors.is_some() || existing_extensions.is_some() {
                new_extensions
                    .get_or_insert_with(IndexMap::new)
                    .insert(complex.clone(), extension);
            }
        }

        let new_extensions = match new_extensions {
            Some(new_extensions) => new_extensions,
            None => return Ok(()),
        };

        let mut new_extensions_by_target = ExtensionMap::default();
        new_extensions_by_target.insert(target.clone(), new_extensions);

        if let Some(existing) = existing_extensions {
            if let Some(additional) =
                self.extend_existing_extensions(existing, &new_extensions_by_target)?
            {
                for (additional_target, sources) in additional {
                    new_extensions_by_target
                        .entry(additional_target)
                        .or_default()
                        .extend(sources);
                }
            }
        }

        if let Some(selectors) = selectors {
            self.extend_existing_style_rules(selectors, &new_extensions_by_target)?;
        }

        Ok(())
    }

    /// The first mandatory extension whose target never appeared in any
    /// registered rule selector
    pub fn check_for_unsatisfied_extends(&self) -> Option<&Extension> {
        self.extensions
            .values()
            .flat_map(|sources| sources.values())
            .find(|extension| {
                !extension.is_optional && !self.selectors.contains_key(&extension.target)
            })
    }

    /// Error variant of [`Extender::check_for_unsatisfied_extends`], run
    /// after the whole document has been processed
    pub fn assert_no_unsatisfied_extends(&self) -> ExtendResult<()> {
        match self.check_for_unsatisfied_extends() {
            Some(extension) => Err(ExtendError::unsatisfied_extend(
                extension.target.to_string(),
                extension.span.clone(),
            )),
            None => Ok(()),
        }
    }

    fn register_selector(&mut self, list: &SelectorList, handle: &ExtendedSelector) {
        for complex in &list.components {
            for component in &complex.components {
                let compound = match component {
                    ComplexSelectorComponent::Compound(compound) => compound,
                    ComplexSelectorComponent::Combinator(..) => continue,
                };
                for simple in &compound.components {
                    self.selectors
                        .entry(simple.clone())
                        .or_default()
                        .insert(handle.clone());
                    if let SimpleSelector::Pseudo(pseudo) = simple {
                        if let Some(selector) = &pseudo.selector {
                            self.register_selector(selector, handle);
                        }
                    }
                }
            }
        }
    }

    /// Re-extend already-registered rules whose selectors contain a freshly
    /// extended target
    fn extend_existing_style_rules(
        &mut self,
        rules: IndexSet<ExtendedSelector>,
        extensions: &ExtensionMap,
    ) -> ExtendResult<()> {
        for rule in rules {
            let old_value = rule.clone_inner();
            let media_context = self.media_contexts.get(&rule).cloned();
            let new_value = self.extend_list(
                &old_value,
                extensions,
                media_context.as_ref(),
                ExtendMode::Normal,
            )?;
            if new_value == old_value {
                continue;
            }
            rule.set(new_value.clone());
            self.register_selector(&new_value, &rule);
        }
        Ok(())
    }

    /// Re-extend already-registered extensions whose extenders contain a
    /// freshly extended target, deriving new extensions from them
    ///
    /// Returns the derived extensions whose own targets are among the new
    /// extensions, so the caller can fold them into the same propagation
    /// pass. Termination relies on the registry deduplicating edges by
    /// value, not on a depth bound.
    fn extend_existing_extensions(
        &mut self,
        extensions: Vec<Extension>,
        new_extensions: &ExtensionMap,
    ) -> ExtendResult<Option<ExtensionMap>> {
        let mut additional: Option<ExtensionMap> = None;

        for extension in extensions {
            let selectors = match self.extend_complex(
                &extension.extender,
                new_extensions,
                extension.media_context.as_ref(),
                ExtendMode::Normal,
            )? {
                Some(selectors) => selectors,
                None => continue,
            };

            // The first result is the extender itself when extension kept it.
            let contains_extension = selectors.first() == Some(&extension.extender);
            let mut skipped_first = false;
            for complex in selectors {
                if contains_extension && !skipped_first {
                    skipped_first = true;
                    continue;
                }

                let with_extender = extension.with_extender(complex.clone());
                let sources = self.extensions.entry(extension.target.clone()).or_default();
                if let Some(existing) = sources.get_mut(&complex) {
                    if existing.is_optional && !with_extender.is_optional {
                        existing.is_optional = false;
                    }
                    continue;
                }
                sources.insert(complex.clone(), with_extender.clone());

                for component in &complex.components {
                    if let ComplexSelectorComponent::Compound(compound) = component {
                        for simple in &compound.components {
                            self.extensions_by_extender
                                .entry(simple.clone())
                                .or_default()
                                .push(with_extender.clone());
                        }
                    }
                }

                if new_extensions.contains_key(&extension.target) {
                    additional
                        .get_or_insert_with(ExtensionMap::default)
                        .entry(extension.target.clone())
                        .or_default()
                        .insert(complex, with_extender);
                }
            }

            // The extender itself may have been rewritten away, e.g. by
            // `:not` expansion; drop the stale edge.
            if !contains_extension {
                if let Some(sources) = self.extensions.get_mut(&extension.target) {
                    sources.shift_remove(&extension.extender);
                }
            }
        }

        Ok(additional)
    }

    fn extend_list(
        &mut self,
        list: &SelectorList,
        extensions: &ExtensionMap,
        media_context: Option<&MediaContext>,
        mode: ExtendMode,
    ) -> ExtendResult<SelectorList> {
        // Avoid allocating until at least one complex selector changes.
        let mut extended: Option<Vec<ComplexSelector>> = None;
        for (i, complex) in list.components.iter().enumerate() {
            match self.extend_complex(complex, extensions, media_context, mode)? {
                None => {
                    if let Some(extended) = &mut extended {
                        extended.push(complex.clone());
                    }
                }
                Some(result) => {
                    let extended =
                        extended.get_or_insert_with(|| list.components[..i].to_vec());
                    extended.extend(result);
                }
            }
        }

        match extended {
            None => Ok(list.clone()),
            Some(extended) => Ok(SelectorList::new(self.trim(extended), list.span.clone())),
        }
    }

    fn extend_complex(
        &mut self,
        complex: &ComplexSelector,
        extensions: &ExtensionMap,
        media_context: Option<&MediaContext>,
        mode: ExtendMode,
    ) -> ExtendResult<Option<Vec<ComplexSelector>>> {
        // Each compound position expands independently into a group of
        // alternatives; positions with no applicable extension stay single.
        let mut extended_not_expanded: Option<Vec<Vec<ComplexSelector>>> = None;
        for (i, component) in complex.components.iter().enumerate() {
            match component {
                ComplexSelectorComponent::Compound(compound) => {
                    match self.extend_compound(compound, extensions, media_context, mode)? {
                        None => {
                            if let Some(groups) = &mut extended_not_expanded {
                                groups.push(vec![ComplexSelector::with_line_feed(
                                    vec![component.clone()],
                                    complex.has_pre_line_feed,
                                )]);
                            }
                        }
                        Some(extended) => {
                            let groups = extended_not_expanded.get_or_insert_with(|| {
                                complex.components[..i]
                                    .iter()
                                    .map(|component| {
                                        vec![ComplexSelector::with_line_feed(
                                            vec![component.clone()],
                                            complex.has_pre_line_feed,
                                        )]
                                    })
                                    .collect()
                            });
                            groups.push(extended);
                        }
                    }
                }
                ComplexSelectorComponent::Combinator(..) => {
                    if let Some(groups) = &mut extended_not_expanded {
                        groups.push(vec![ComplexSelector::new(vec![component.clone()])]);
                    }
                }
            }
        }

        let extended_not_expanded = match extended_not_expanded {
            Some(groups) => groups,
            None => return Ok(None),
        };

        let mut first = true;
        let mut result = Vec::new();
        for path in permutate(&extended_not_expanded) {
            let woven = weave(
                &path
                    .iter()
                    .map(|input| input.components.clone())
                    .collect::<Vec<_>>(),
            );
            for components in woven {
                let line_feed = complex.has_pre_line_feed
                    || path.iter().any(|input| input.has_pre_line_feed);
                let output = ComplexSelector::with_line_feed(components, line_feed);

                // The first woven path reproduces the input selector; copies
                // of an original stay original.
                if first && self.originals.contains(complex) {
                    self.originals.insert(output.clone());
                }
                first = false;
                result.push(output);
            }
        }
        Ok(Some(result))
    }

    fn extend_compound(
        &mut self,
        compound: &CompoundSelector,
        extensions: &ExtensionMap,
        media_context: Option<&MediaContext>,
        mode: ExtendMode,
    ) -> ExtendResult<Option<Vec<ComplexSelector>>> {
        // Outside Normal mode every target in the compound must be matched,
        // so track which ones actually were.
        let mut targets_used = if mode == ExtendMode::Normal || extensions.len() < 2 {
            None
        } else {
            Some(HashSet::new())
        };

        let mut options: Option<Vec<Vec<ExtenderEntry>>> = None;
        for (i, simple) in compound.components.iter().enumerate() {
            match self.extend_simple(simple, extensions, media_context, mode, &mut targets_used)? {
                None => {
                    if let Some(options) = &mut options {
                        options.push(vec![self.extender_for_simple(simple)]);
                    }
                }
                Some(extended) => {
                    if options.is_none() {
                        let mut groups = Vec::new();
                        if i != 0 {
                            groups.push(vec![
                                self.extender_for_compound(&compound.components[..i])
                            ]);
                        }
                        options = Some(groups);
                    }
                    if let Some(options) = &mut options {
                        options.extend(extended);
                    }
                }
            }
        }

        let options = match options {
            Some(options) => options,
            None => return Ok(None),
        };

        // Fail closed: partial target coverage invalidates the compound.
        if let Some(used) = &targets_used {
            if used.len() != extensions.len() {
                return Ok(None);
            }
        }

        if options.len() == 1 {
            let mut result = Vec::new();
            for entry in &options[0] {
                entry.assert_compatible_media_context(media_context)?;
                result.push(entry.selector.clone());
            }
            return Ok(Some(result));
        }

        // Option groups are alternatives; any complete traversal works. The
        // grouped-by-leading-choice order keeps each simple selector's
        // variants adjacent, and its first path is still the all-first-
        // options one the `first` flag below relies on.
        let mut first = mode != ExtendMode::Replace;
        let mut result: Vec<ComplexSelector> = Vec::new();
        for path in permutate_alt(&options) {
            let complexes: Vec<Vec<ComplexSelectorComponent>> = if first {
                // The first path reassembles the original compound verbatim.
                // Unifying it instead could produce a true superselector of
                // the original.
                first = false;
                let mut members = Vec::new();
                for entry in &path {
                    if let Some(compound) = entry.selector.last_compound() {
                        members.extend(compound.components.iter().cloned());
                    }
                }
                vec![vec![ComplexSelectorComponent::Compound(
                    CompoundSelector::new(members),
                )]]
            } else {
                let mut to_unify: VecDeque<Vec<ComplexSelectorComponent>> = VecDeque::new();
                let mut originals: Option<Vec<SimpleSelector>> = None;
                for entry in &path {
                    if entry.is_original {
                        if let Some(compound) = entry.selector.last_compound() {
                            originals
                                .get_or_insert_with(Vec::new)
                                .extend(compound.components.iter().cloned());
                        }
                    } else {
                        to_unify.push_back(entry.selector.components.clone());
                    }
                }
                if let Some(originals) = originals {
                    to_unify.push_front(vec![ComplexSelectorComponent::Compound(
                        CompoundSelector::new(originals),
                    )]);
                }
                match unify_complex(&to_unify.into_iter().collect::<Vec<_>>()) {
                    Some(complexes) => complexes,
                    None => continue,
                }
            };

            let mut line_feed = false;
            for entry in &path {
                entry.assert_compatible_media_context(media_context)?;
                line_feed = line_feed || entry.selector.has_pre_line_feed;
            }
            for components in complexes {
                result.push(ComplexSelector::with_line_feed(components, line_feed));
            }
        }

        Ok(Some(result))
    }

    fn extend_simple(
        &mut self,
        simple: &SimpleSelector,
        extensions: &ExtensionMap,
        media_context: Option<&MediaContext>,
        mode: ExtendMode,
        targets_used: &mut Option<HashSet<SimpleSelector>>,
    ) -> ExtendResult<Option<Vec<Vec<ExtenderEntry>>>> {
        if let SimpleSelector::Pseudo(pseudo) = simple {
            if pseudo.selector.is_some() {
                if let Some(extended) =
                    self.extend_pseudo(pseudo, extensions, media_context, mode)?
                {
                    let mut groups = Vec::new();
                    for extended_pseudo in extended {
                        let simple = SimpleSelector::Pseudo(extended_pseudo);
                        let group = match self.without_pseudo(&simple, extensions, targets_used, mode)
                        {
                            Some(group) => group,
                            None => vec![self.extender_for_simple(&simple)],
                        };
                        groups.push(group);
                    }
                    return Ok(Some(groups));
                }
            }
        }

        Ok(self
            .without_pseudo(simple, extensions, targets_used, mode)
            .map(|group| vec![group]))
    }

    /// The option group for extending one simple selector directly, ignoring
    /// any nested selector pseudo
    fn without_pseudo(
        &self,
        simple: &SimpleSelector,
        extensions: &ExtensionMap,
        targets_used: &mut Option<HashSet<SimpleSelector>>,
        mode: ExtendMode,
    ) -> Option<Vec<ExtenderEntry>> {
        let extensions_for_simple = extensions.get(simple)?;
        if let Some(used) = targets_used {
            used.insert(simple.clone());
        }

        let mut group = Vec::with_capacity(extensions_for_simple.len() + 1);
        if mode != ExtendMode::Replace {
            group.push(self.extender_for_simple(simple));
        }
        for extension in extensions_for_simple.values() {
            group.push(ExtenderEntry {
                selector: extension.extender.clone(),
                is_original: false,
                source: Some(extension.clone()),
            });
        }
        Some(group)
    }

    /// Extend the selector list nested inside a selector pseudo, yielding
    /// the rewritten pseudo(s)
    fn extend_pseudo(
        &mut self,
        pseudo: &Pseudo,
        extensions: &ExtensionMap,
        media_context: Option<&MediaContext>,
        mode: ExtendMode,
    ) -> ExtendResult<Option<Vec<Pseudo>>> {
        let selector = match &pseudo.selector {
            Some(selector) => selector.as_ref(),
            None => return Ok(None),
        };
        let extended = self.extend_list(selector, extensions, media_context, mode)?;
        if extended == *selector {
            return Ok(None);
        }

        // `:not` with a single complex selector per branch parses on more
        // browsers, so complex results are dropped unless the original
        // already contained one or nothing else remains.
        let mut complexes: Vec<ComplexSelector> = extended.components.clone();
        if pseudo.unprefixed_name() == "not"
            && !selector.components.iter().any(|complex| complex.components.len() > 1)
            && extended.components.iter().any(|complex| complex.components.len() == 1)
        {
            complexes = extended
                .components
                .iter()
                .filter(|complex| complex.components.len() <= 1)
                .cloned()
                .collect();
        }

        let mut flattened: Vec<ComplexSelector> = Vec::new();
        for complex in complexes {
            let inner_pseudo = match complex.components.as_slice() {
                [ComplexSelectorComponent::Compound(compound)]
                    if compound.components.len() == 1 =>
                {
                    match &compound.components[0] {
                        SimpleSelector::Pseudo(inner) if inner.selector.is_some() => {
                            inner.clone()
                        }
                        _ => {
                            flattened.push(complex);
                            continue;
                        }
                    }
                }
                _ => {
                    flattened.push(complex);
                    continue;
                }
            };

            let inner_selector = match &inner_pseudo.selector {
                Some(selector) => selector.as_ref(),
                None => {
                    flattened.push(complex);
                    continue;
                }
            };

            match pseudo.unprefixed_name() {
                "not" => {
                    // A `:not` nested in a `:not` would have to be unified
                    // with the outer result to be correct; only `:is` and
                    // `:matches` contents can be hoisted directly.
                    if matches!(inner_pseudo.unprefixed_name(), "is" | "matches") {
                        flattened.extend(inner_selector.components.iter().cloned());
                    }
                }
                "is" | "matches" | "where" | "any" | "current" | "nth-child"
                | "nth-last-child" => {
                    if inner_pseudo.name == pseudo.name
                        && inner_pseudo.argument == pseudo.argument
                    {
                        flattened.extend(inner_selector.components.iter().cloned());
                    }
                }
                _ => flattened.push(complex),
            }
        }

        // Break a single-selector `:not` into one pseudo per branch for the
        // same browser-support reason.
        if pseudo.unprefixed_name() == "not" && selector.components.len() == 1 {
            let result: Vec<Pseudo> = flattened
                .into_iter()
                .map(|complex| {
                    pseudo.with_selector(SelectorList::new(
                        vec![complex],
                        extended.span.clone(),
                    ))
                })
                .collect();
            return Ok(if result.is_empty() { None } else { Some(result) });
        }

        Ok(Some(vec![pseudo.with_selector(SelectorList::new(
            flattened,
            extended.span.clone(),
        ))]))
    }

    fn extender_for_simple(&self, simple: &SimpleSelector) -> ExtenderEntry {
        ExtenderEntry {
            selector: ComplexSelector::new(vec![ComplexSelectorComponent::Compound(
                CompoundSelector::new(vec![simple.clone()]),
            )]),
            is_original: true,
            source: None,
        }
    }

    fn extender_for_compound(&self, simples: &[SimpleSelector]) -> ExtenderEntry {
        let compound = CompoundSelector::new(simples.to_vec());
        ExtenderEntry {
            selector: ComplexSelector::new(vec![ComplexSelectorComponent::Compound(compound)]),
            is_original: true,
            source: None,
        }
    }

    /// Maximum specificity among the sources the compound's simple selectors
    /// originally appeared in
    fn source_specificity_for(&self, compound: &CompoundSelector) -> i32 {
        compound
            .components
            .iter()
            .filter_map(|simple| self.source_specificity.get(simple))
            .copied()
            .max()
            .unwrap_or(0)
    }

    /// Remove selectors subsumed by another surviving selector of equal or
    /// greater specificity
    ///
    /// Originals are never removed; duplicate originals collapse to one.
    pub(crate) fn trim(&self, selectors: Vec<ComplexSelector>) -> Vec<ComplexSelector> {
        if selectors.len() > TRIM_CANDIDATE_LIMIT {
            return selectors;
        }

        let mut result: VecDeque<ComplexSelector> = VecDeque::new();
        let mut num_originals = 0;

        'outer: for i in (0..selectors.len()).rev() {
            let complex1 = &selectors[i];
            if self.originals.contains(complex1) {
                // A style rule that extends part of its own selector can
                // produce the same original twice.
                for j in 0..num_originals {
                    if result[j] == *complex1 {
                        if let Some(element) = result.remove(j) {
                            result.push_front(element);
                        }
                        continue 'outer;
                    }
                }
                num_originals += 1;
                result.push_front(complex1.clone());
                continue;
            }

            // To remove this selector, another must cover it at or above
            // the highest specificity of the sources that generated it.
            let mut max_specificity = 0;
            for component in &complex1.components {
                if let ComplexSelectorComponent::Compound(compound) = component {
                    max_specificity = max_specificity.max(self.source_specificity_for(compound));
                }
            }

            // Compare against survivors first so that of two identical
            // selectors exactly one is kept.
            if result.iter().any(|complex2| {
                complex2.specificity() >= max_specificity && complex2.is_super_selector(complex1)
            }) {
                continue;
            }
            if selectors[..i].iter().any(|complex2| {
                complex2.specificity() >= max_specificity && complex2.is_super_selector(complex1)
            }) {
                continue;
            }

            result.push_front(complex1.clone());
        }

        result.into_iter().collect()
    }
}

/// All simple selectors in a complex selector, including those nested in
/// selector pseudos
fn simple_selectors_of(complex: &ComplexSelector) -> Vec<SimpleSelector> {
    fn collect(complex: &ComplexSelector, out: &mut Vec<SimpleSelector>) {
        for component in &complex.components {
            if let ComplexSelectorComponent::Compound(compound) = component {
                for simple in &compound.components {
                    out.push(simple.clone());
                    if let SimpleSelector::Pseudo(pseudo) = simple {
                        if let Some(selector) = &pseudo.selector {
                            for inner in &selector.components {
                                collect(inner, out);
                            }
                        }
                    }
                }
            }
        }
    }

    let mut out = Vec::new();
    collect(complex, &mut out);
    out
}
