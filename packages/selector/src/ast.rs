use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Span information for source location tracking
///
/// Spans are opaque to the selector algebra: they are carried through for
/// diagnostics and never participate in selector equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub id: String,
}

impl Span {
    pub fn new(start: usize, end: usize, id: String) -> Self {
        Self { start, end, id }
    }

    /// A span for selectors built programmatically rather than parsed
    pub fn synthetic() -> Self {
        Self {
            start: 0,
            end: 0,
            id: String::new(),
        }
    }
}

/// Opaque media context token
///
/// The engine never interprets this beyond structural equality when checking
/// that an `@extend` does not cross media query boundaries. Its semantics
/// belong to the media query subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaContext(pub String);

impl MediaContext {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

/// Selector namespace, e.g. the `svg` in `svg|circle`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Namespace {
    /// No namespace separator was present
    None,
    /// An empty namespace: `|el`
    Empty,
    /// The wildcard namespace: `*|el`
    Asterisk,
    /// A concrete namespace: `ns|el`
    Other(String),
}

impl Namespace {
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Namespace::Asterisk)
    }
}

/// A namespaced element name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    pub ident: String,
    pub namespace: Namespace,
}

impl QualifiedName {
    pub fn new(ident: impl Into<String>) -> Self {
        Self {
            ident: ident.into(),
            namespace: Namespace::None,
        }
    }
}

/// Attribute selector comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeOp {
    /// `[attr]`
    Any,
    /// `[attr=value]`
    Equals,
    /// `[attr~=value]`
    Include,
    /// `[attr|=value]`
    Dash,
    /// `[attr^=value]`
    Prefix,
    /// `[attr$=value]`
    Suffix,
    /// `[attr*=value]`
    Contains,
}

/// An attribute selector, e.g. `[href^="https:" i]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    pub name: QualifiedName,
    pub op: AttributeOp,
    /// `None` iff `op` is [`AttributeOp::Any`]
    pub value: Option<String>,
    /// Case sensitivity modifier (`i` or `s`)
    pub modifier: Option<char>,
}

/// A pseudo-class or pseudo-element selector
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pseudo {
    pub name: String,
    /// Whether this is a pseudo-class (as opposed to a pseudo-element)
    pub is_class: bool,
    /// Whether this was written with a single colon. The legacy
    /// pseudo-elements (`:before` and friends) are syntactic classes but
    /// semantic elements.
    pub is_syntactic_class: bool,
    /// Raw (non-selector) argument text, e.g. the `2n+1` in `:nth-child(2n+1)`
    pub argument: Option<String>,
    /// Nested selector argument, e.g. the `a, b` in `:is(a, b)`
    pub selector: Option<Box<SelectorList>>,
}

impl Pseudo {
    pub fn is_element(&self) -> bool {
        !self.is_class
    }

    /// The pseudo's name with any vendor prefix removed
    ///
    /// `-moz-any` and `any` participate in the same compatibility rules.
    pub fn unprefixed_name(&self) -> &str {
        if let Some(stripped) = self.name.strip_prefix('-') {
            if let Some(idx) = stripped.find('-') {
                return &stripped[idx + 1..];
            }
        }
        &self.name
    }

    /// A copy of this pseudo with a different nested selector
    pub fn with_selector(&self, selector: SelectorList) -> Self {
        Self {
            selector: Some(Box::new(selector)),
            ..self.clone()
        }
    }

    pub fn is_invisible(&self) -> bool {
        match &self.selector {
            Some(selector) => self.name != "not" && selector.is_invisible(),
            None => false,
        }
    }
}

/// The smallest unit of a selector: matches one aspect of one element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum SimpleSelector {
    /// `*`, `ns|*`
    Universal(Namespace),
    /// `div`, `svg|circle`
    Type(QualifiedName),
    /// `.foo`
    Class(String),
    /// `#foo`
    Id(String),
    /// `[href]`, `[lang|=en]`
    Attribute(Attribute),
    /// `%foo`, which matches nothing and exists to be extended
    Placeholder(String),
    /// `:hover`, `::after`, `:is(a, b)`
    Pseudo(Pseudo),
}

impl SimpleSelector {
    pub fn is_invisible(&self) -> bool {
        match self {
            SimpleSelector::Placeholder(..) => true,
            SimpleSelector::Pseudo(pseudo) => pseudo.is_invisible(),
            _ => false,
        }
    }

    pub fn is_pseudo_element(&self) -> bool {
        matches!(self, SimpleSelector::Pseudo(pseudo) if pseudo.is_element())
    }
}

/// An ordered sequence of simple selectors that must all match one element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompoundSelector {
    pub components: Vec<SimpleSelector>,
    /// Whether this compound contains an explicit parent reference (`&`)
    pub has_real_parent: bool,
}

impl CompoundSelector {
    pub fn new(components: Vec<SimpleSelector>) -> Self {
        Self {
            components,
            has_real_parent: false,
        }
    }

    pub fn is_invisible(&self) -> bool {
        self.components.iter().any(SimpleSelector::is_invisible)
    }
}

/// A relational operator between two compound selectors
///
/// Descendant combination is implicit: it is the absence of a combinator
/// between two adjacent compounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Combinator {
    /// `>`
    Child,
    /// `+`
    NextSibling,
    /// `~`
    FollowingSibling,
}

/// One element of a complex selector: either a compound or a combinator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum ComplexSelectorComponent {
    Compound(CompoundSelector),
    Combinator(Combinator),
}

impl ComplexSelectorComponent {
    pub fn as_compound(&self) -> Option<&CompoundSelector> {
        match self {
            ComplexSelectorComponent::Compound(compound) => Some(compound),
            ComplexSelectorComponent::Combinator(..) => None,
        }
    }

    pub fn is_combinator(&self) -> bool {
        matches!(self, ComplexSelectorComponent::Combinator(..))
    }
}

/// An alternating sequence of compound selectors and combinators
///
/// Equality and hashing consider `components` only: `chroots` and
/// `has_pre_line_feed` are resolution/formatting hints that must not affect
/// registry deduplication or trimming.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplexSelector {
    pub components: Vec<ComplexSelectorComponent>,
    /// Already resolved against the parent selector; do not re-resolve
    pub chroots: bool,
    /// There was a line break before this selector in the source
    pub has_pre_line_feed: bool,
}

impl ComplexSelector {
    pub fn new(components: Vec<ComplexSelectorComponent>) -> Self {
        Self {
            components,
            chroots: false,
            has_pre_line_feed: false,
        }
    }

    pub fn with_line_feed(components: Vec<ComplexSelectorComponent>, has_pre_line_feed: bool) -> Self {
        Self {
            components,
            chroots: false,
            has_pre_line_feed,
        }
    }

    /// The trailing compound selector, if the selector does not end in a
    /// combinator
    pub fn last_compound(&self) -> Option<&CompoundSelector> {
        self.components.last().and_then(ComplexSelectorComponent::as_compound)
    }

    pub fn is_invisible(&self) -> bool {
        self.components
            .iter()
            .any(|component| matches!(component, ComplexSelectorComponent::Compound(compound) if compound.is_invisible()))
    }
}

impl PartialEq for ComplexSelector {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components
    }
}

impl Eq for ComplexSelector {}

impl Hash for ComplexSelector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.components.hash(state);
    }
}

/// A comma-separated union of complex selectors
///
/// Order matters for output determinism, but semantically the list is an OR.
/// Equality and hashing consider `components` only; the span is
/// diagnostics-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorList {
    pub components: Vec<ComplexSelector>,
    pub span: Span,
}

impl SelectorList {
    pub fn new(components: Vec<ComplexSelector>, span: Span) -> Self {
        Self { components, span }
    }

    /// A list matches nothing visible when every member is invisible
    pub fn is_invisible(&self) -> bool {
        self.components.iter().all(ComplexSelector::is_invisible)
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl PartialEq for SelectorList {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components
    }
}

impl Eq for SelectorList {}

impl Hash for SelectorList {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.components.hash(state);
    }
}
