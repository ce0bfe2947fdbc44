use std::cell::RefCell;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use weft_selector::SelectorList;

/// A registered style rule's selector, shared between the registry and the
/// caller
///
/// Extensions added after registration update the rule in place through this
/// handle. Equality and hashing are by identity: two rules with equal
/// selector text are still distinct rules.
#[derive(Debug, Clone)]
pub struct ExtendedSelector {
    inner: Rc<RefCell<SelectorList>>,
}

impl ExtendedSelector {
    pub fn new(list: SelectorList) -> Self {
        Self {
            inner: Rc::new(RefCell::new(list)),
        }
    }

    /// The rule's current selector list
    pub fn clone_inner(&self) -> SelectorList {
        self.inner.borrow().clone()
    }

    pub fn set(&self, list: SelectorList) {
        *self.inner.borrow_mut() = list;
    }

    /// Canonical CSS text of the current selector list
    pub fn to_css_string(&self) -> String {
        self.inner.borrow().to_css_string()
    }
}

impl PartialEq for ExtendedSelector {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for ExtendedSelector {}

impl Hash for ExtendedSelector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.inner) as usize).hash(state);
    }
}
