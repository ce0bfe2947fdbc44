use crate::ast::{
    ComplexSelector, ComplexSelectorComponent, CompoundSelector, SimpleSelector,
};

/// Specificity contributed by an ID selector
pub const SPECIFICITY_ID: i32 = 1_000_000;

/// Specificity contributed by a class, attribute, or pseudo-class selector
pub const SPECIFICITY_CLASS: i32 = 1_000;

/// Specificity contributed by a type selector or pseudo-element
pub const SPECIFICITY_ELEMENT: i32 = 1;

impl SimpleSelector {
    /// The CSS precedence weight of this selector
    ///
    /// Universal selectors and bare placeholders contribute nothing. A
    /// placeholder only gains weight through whatever selector it is
    /// eventually extended by.
    pub fn specificity(&self) -> i32 {
        match self {
            SimpleSelector::Id(..) => SPECIFICITY_ID,
            SimpleSelector::Class(..) | SimpleSelector::Attribute(..) => SPECIFICITY_CLASS,
            SimpleSelector::Pseudo(pseudo) => {
                if pseudo.is_element() {
                    SPECIFICITY_ELEMENT
                } else {
                    SPECIFICITY_CLASS
                }
            }
            SimpleSelector::Type(..) => SPECIFICITY_ELEMENT,
            SimpleSelector::Universal(..) | SimpleSelector::Placeholder(..) => 0,
        }
    }
}

impl CompoundSelector {
    pub fn specificity(&self) -> i32 {
        self.components
            .iter()
            .map(SimpleSelector::specificity)
            .sum()
    }
}

impl ComplexSelector {
    /// Sum over compound components; combinators contribute nothing
    pub fn specificity(&self) -> i32 {
        self.components
            .iter()
            .map(|component| match component {
                ComplexSelectorComponent::Compound(compound) => compound.specificity(),
                ComplexSelectorComponent::Combinator(..) => 0,
            })
            .sum()
    }
}
