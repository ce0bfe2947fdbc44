use thiserror::Error;
use weft_selector::Span;

/// Errors that abort a compilation
///
/// A selector combination that cannot match anything is never an error; it
/// surfaces as an empty result inside the algebra. Only the cases below are
/// fatal.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExtendError {
    #[error("You may not @extend selectors across media queries")]
    IncompatibleMediaContext { span: Span },

    #[error("The target selector was not found: {target}")]
    UnsatisfiedExtend { target: String, span: Span },

    #[error("Can't extend complex selector {selector}")]
    InvalidExtendTarget { selector: String },
}

impl ExtendError {
    pub fn incompatible_media_context(span: Span) -> Self {
        ExtendError::IncompatibleMediaContext { span }
    }

    pub fn unsatisfied_extend(target: impl Into<String>, span: Span) -> Self {
        ExtendError::UnsatisfiedExtend {
            target: target.into(),
            span,
        }
    }

    pub fn invalid_extend_target(selector: impl Into<String>) -> Self {
        ExtendError::InvalidExtendTarget {
            selector: selector.into(),
        }
    }
}

pub type ExtendResult<T> = Result<T, ExtendError>;
