pub mod ast;
pub mod error;
pub mod id_generator;
pub mod lcs;
pub mod parser;
pub mod permutate;
pub mod serializer;
pub mod specificity;
pub mod superselector;
pub mod tokenizer;
pub mod unify;
pub mod weave;

pub use ast::{
    Attribute, AttributeOp, Combinator, ComplexSelector, ComplexSelectorComponent,
    CompoundSelector, MediaContext, Namespace, Pseudo, QualifiedName, SelectorList,
    SimpleSelector, Span,
};
pub use error::{ParseError, ParseResult};
pub use parser::parse_selector;
pub use superselector::{complex_is_parent_super_selector, complex_is_super_selector, list_is_super_selector};
pub use tokenizer::{tokenize, Token};
pub use unify::{unify_complex, unify_compound};
pub use weave::weave;
