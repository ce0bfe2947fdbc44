//! Selector extension
//!
//! Implements `@extend` semantics on top of the selector algebra: a registry
//! of style rules and extensions that converges to the same output selectors
//! regardless of the order rules and extensions appear in, plus one-shot
//! `extend`/`replace` entry points that need no registry.

pub mod error;
pub mod extended_selector;
pub mod extender;
pub mod extension;

pub use error::{ExtendError, ExtendResult};
pub use extended_selector::ExtendedSelector;
pub use extender::Extender;
pub use extension::{ExtendMode, Extension};

#[cfg(test)]
mod tests_extend;
#[cfg(test)]
mod tests_scenarios;
