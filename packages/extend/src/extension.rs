use serde::{Deserialize, Serialize};
use weft_selector::{ComplexSelector, MediaContext, SimpleSelector, Span};

/// How extension results relate to the input selector
///
/// Passed explicitly through the recursion rather than stored as mutable
/// state, so each call's behavior is locally auditable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtendMode {
    /// Extensions apply independently; the original selector is kept.
    Normal,
    /// Every target in a compound must be matched or the compound is left
    /// alone. The original selector is kept.
    AllTargets,
    /// Like [`ExtendMode::AllTargets`], but the original selector is dropped
    /// from the output.
    Replace,
}

/// One `@extend` edge: `extender` claims to also match wherever `target`
/// matches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extension {
    /// The selector being injected wherever `target` appears.
    pub extender: ComplexSelector,
    /// The simple selector being extended.
    pub target: SimpleSelector,
    /// Location of the `@extend` for diagnostics.
    pub span: Span,
    /// Media context the `@extend` appeared in, if any.
    pub media_context: Option<MediaContext>,
    /// Specificity of `extender` at registration time.
    pub specificity: i32,
    /// An optional extension whose target never matches is not an error.
    pub is_optional: bool,
}

impl Extension {
    pub fn new(
        extender: ComplexSelector,
        target: SimpleSelector,
        span: Span,
        media_context: Option<MediaContext>,
        is_optional: bool,
    ) -> Self {
        let specificity = extender.specificity();
        Self {
            extender,
            target,
            span,
            media_context,
            specificity,
            is_optional,
        }
    }

    /// A derived copy with a new extender selector, sharing the target and
    /// flags
    ///
    /// Used when the extender itself gets further extended.
    pub fn with_extender(&self, extender: ComplexSelector) -> Self {
        let specificity = extender.specificity();
        Self {
            extender,
            specificity,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_selector::parse_selector;

    fn complex(source: &str) -> ComplexSelector {
        parse_selector(source, "/test.scss").unwrap().components.remove(0)
    }

    fn simple(source: &str) -> SimpleSelector {
        match &complex(source).components[0] {
            weft_selector::ComplexSelectorComponent::Compound(compound) => {
                compound.components[0].clone()
            }
            _ => panic!("expected a compound"),
        }
    }

    #[test]
    fn test_specificity_captured_at_construction() {
        let extension = Extension::new(
            complex("#a .b"),
            simple(".c"),
            Span::synthetic(),
            None,
            false,
        );
        assert_eq!(extension.specificity, complex("#a .b").specificity());
    }

    #[test]
    fn test_with_extender_recomputes_specificity() {
        let extension = Extension::new(
            complex(".a"),
            simple(".c"),
            Span::synthetic(),
            None,
            true,
        );
        let derived = extension.with_extender(complex("#x.a"));
        assert_eq!(derived.specificity, complex("#x.a").specificity());
        assert_eq!(derived.target, extension.target);
        assert!(derived.is_optional);
    }
}
