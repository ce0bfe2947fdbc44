use crate::ast::*;
use std::fmt;

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::None => Ok(()),
            Namespace::Empty => write!(f, "|"),
            Namespace::Asterisk => write!(f, "*|"),
            Namespace::Other(ns) => write!(f, "{}|", ns),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.namespace, self.ident)
    }
}

impl fmt::Display for AttributeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeOp::Any => Ok(()),
            AttributeOp::Equals => write!(f, "="),
            AttributeOp::Include => write!(f, "~="),
            AttributeOp::Dash => write!(f, "|="),
            AttributeOp::Prefix => write!(f, "^="),
            AttributeOp::Suffix => write!(f, "$="),
            AttributeOp::Contains => write!(f, "*="),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}", self.name)?;
        if let Some(value) = &self.value {
            write!(f, "{}\"{}\"", self.op, value)?;
            if let Some(modifier) = self.modifier {
                write!(f, " {}", modifier)?;
            }
        }
        write!(f, "]")
    }
}

impl fmt::Display for Pseudo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":")?;
        if self.is_element() && !self.is_syntactic_class {
            write!(f, ":")?;
        }
        write!(f, "{}", self.name)?;

        if self.argument.is_none() && self.selector.is_none() {
            return Ok(());
        }

        write!(f, "(")?;
        if let Some(argument) = &self.argument {
            write!(f, "{}", argument)?;
            if self.selector.is_some() {
                write!(f, " of ")?;
            }
        }
        if let Some(selector) = &self.selector {
            write!(f, "{}", selector)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimpleSelector::Universal(namespace) => write!(f, "{}*", namespace),
            SimpleSelector::Type(name) => write!(f, "{}", name),
            SimpleSelector::Class(name) => write!(f, ".{}", name),
            SimpleSelector::Id(name) => write!(f, "#{}", name),
            SimpleSelector::Placeholder(name) => write!(f, "%{}", name),
            SimpleSelector::Attribute(attribute) => write!(f, "{}", attribute),
            SimpleSelector::Pseudo(pseudo) => write!(f, "{}", pseudo),
        }
    }
}

impl fmt::Display for CompoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_real_parent {
            write!(f, "&")?;
        }
        for simple in &self.components {
            write!(f, "{}", simple)?;
        }
        Ok(())
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Combinator::Child => write!(f, ">"),
            Combinator::NextSibling => write!(f, "+"),
            Combinator::FollowingSibling => write!(f, "~"),
        }
    }
}

impl fmt::Display for ComplexSelectorComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComplexSelectorComponent::Compound(compound) => write!(f, "{}", compound),
            ComplexSelectorComponent::Combinator(combinator) => write!(f, "{}", combinator),
        }
    }
}

impl fmt::Display for ComplexSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, component) in self.components.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", component)?;
        }
        Ok(())
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, complex) in self.components.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
                if complex.has_pre_line_feed {
                    writeln!(f)?;
                } else {
                    write!(f, " ")?;
                }
            }
            write!(f, "{}", complex)?;
        }
        Ok(())
    }
}

impl SelectorList {
    /// Canonical CSS text for this selector list
    pub fn to_css_string(&self) -> String {
        self.to_string()
    }
}
