use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::id_generator::IdGenerator;
use crate::tokenizer::{tokenize, Token};
use std::ops::Range;

/// Pseudo-classes whose argument is itself a selector list
const SELECTOR_PSEUDO_CLASSES: &[&str] = &[
    "not",
    "is",
    "matches",
    "where",
    "any",
    "current",
    "has",
    "host",
    "host-context",
];

/// Pseudo-elements whose argument is a selector list
const SELECTOR_PSEUDO_ELEMENTS: &[&str] = &["slotted"];

/// Pseudo-elements that may be written with a single colon
const LEGACY_PSEUDO_ELEMENTS: &[&str] = &["before", "after", "first-line", "first-letter"];

/// Parse selector source text into a [`SelectorList`]
pub fn parse_selector(source: &str, path: &str) -> ParseResult<SelectorList> {
    SelectorParser::new(source, path).parse_list()
}

/// Parser for CSS selector text
pub struct SelectorParser<'src> {
    source: &'src str,
    path: String,
    tokens: Vec<(Token<'src>, Range<usize>)>,
    pos: usize,
    id_generator: IdGenerator,
}

impl<'src> SelectorParser<'src> {
    pub fn new(source: &'src str, path: &str) -> Self {
        Self {
            source,
            path: path.to_string(),
            tokens: tokenize(source),
            pos: 0,
            id_generator: IdGenerator::new(path),
        }
    }

    /// Parse a complete comma-separated selector list
    pub fn parse_list(mut self) -> ParseResult<SelectorList> {
        let start = self.current_pos();
        let mut components = Vec::new();

        let mut saw_newline = self.skip_whitespace();
        loop {
            let mut complex = self.parse_complex()?;
            complex.has_pre_line_feed = saw_newline;
            components.push(complex);

            self.skip_whitespace();
            if self.match_token(Token::Comma) {
                saw_newline = self.skip_whitespace();
                continue;
            }
            break;
        }

        if !self.is_at_end() {
            return Err(ParseError::unexpected_token(
                self.current_pos(),
                "end of selector",
                self.describe_peek(),
            ));
        }

        let end = self.current_pos();
        let id = self.id_generator.new_id();
        Ok(SelectorList::new(components, Span::new(start, end, id)))
    }

    /// Parse one complex selector: compounds joined by combinators, with
    /// whitespace acting as the descendant combinator
    fn parse_complex(&mut self) -> ParseResult<ComplexSelector> {
        let mut components: Vec<ComplexSelectorComponent> = Vec::new();

        loop {
            match self.peek_token() {
                Some(Token::Greater) => {
                    self.advance();
                    components.push(ComplexSelectorComponent::Combinator(Combinator::Child));
                    self.skip_whitespace();
                }
                Some(Token::Plus) => {
                    self.advance();
                    components.push(ComplexSelectorComponent::Combinator(Combinator::NextSibling));
                    self.skip_whitespace();
                }
                Some(Token::Tilde) => {
                    self.advance();
                    components.push(ComplexSelectorComponent::Combinator(
                        Combinator::FollowingSibling,
                    ));
                    self.skip_whitespace();
                }
                Some(token) if Self::starts_compound(&token) => {
                    components.push(ComplexSelectorComponent::Compound(self.parse_compound()?));

                    // Whitespace after a compound is the descendant
                    // combinator only if the complex selector continues.
                    if matches!(self.peek_token(), Some(Token::Whitespace(..))) {
                        if self.continues_complex_after_whitespace() {
                            self.skip_whitespace();
                        } else {
                            break;
                        }
                    }
                }
                _ => break,
            }
        }

        if components.is_empty() {
            return Err(ParseError::invalid_selector(
                self.current_pos(),
                "expected a selector",
            ));
        }

        Ok(ComplexSelector::new(components))
    }

    /// Parse a compound selector: simple selectors with no separator
    fn parse_compound(&mut self) -> ParseResult<CompoundSelector> {
        let mut compound = CompoundSelector::new(Vec::new());

        if self.match_token(Token::Ampersand) {
            compound.has_real_parent = true;
        }

        while let Some(token) = self.peek_token() {
            if !Self::starts_simple(&token) {
                break;
            }
            compound.components.push(self.parse_simple()?);
        }

        if compound.components.is_empty() && !compound.has_real_parent {
            return Err(ParseError::invalid_selector(
                self.current_pos(),
                "expected a simple selector",
            ));
        }

        Ok(compound)
    }

    fn parse_simple(&mut self) -> ParseResult<SimpleSelector> {
        match self.peek_token() {
            Some(Token::Dot) => {
                self.advance();
                Ok(SimpleSelector::Class(self.expect_ident()?))
            }
            Some(Token::Hash) => {
                self.advance();
                Ok(SimpleSelector::Id(self.expect_ident()?))
            }
            Some(Token::Percent) => {
                self.advance();
                Ok(SimpleSelector::Placeholder(self.expect_ident()?))
            }
            Some(Token::LBracket) => self.parse_attribute(),
            Some(Token::Colon) | Some(Token::DoubleColon) => self.parse_pseudo(),
            Some(Token::Star) => {
                self.advance();
                if self.check(Token::Pipe) {
                    self.advance();
                    if self.match_token(Token::Star) {
                        Ok(SimpleSelector::Universal(Namespace::Asterisk))
                    } else {
                        Ok(SimpleSelector::Type(QualifiedName {
                            ident: self.expect_ident()?,
                            namespace: Namespace::Asterisk,
                        }))
                    }
                } else {
                    Ok(SimpleSelector::Universal(Namespace::None))
                }
            }
            Some(Token::Pipe) => {
                self.advance();
                if self.match_token(Token::Star) {
                    Ok(SimpleSelector::Universal(Namespace::Empty))
                } else {
                    Ok(SimpleSelector::Type(QualifiedName {
                        ident: self.expect_ident()?,
                        namespace: Namespace::Empty,
                    }))
                }
            }
            Some(Token::Ident(name)) => {
                let name = name.to_string();
                self.advance();
                let has_namespace = self.check(Token::Pipe)
                    && matches!(
                        self.peek_ahead(1),
                        Some((Token::Ident(..), _)) | Some((Token::Star, _))
                    );
                if has_namespace {
                    self.advance(); // pipe
                    if self.match_token(Token::Star) {
                        Ok(SimpleSelector::Universal(Namespace::Other(name)))
                    } else {
                        Ok(SimpleSelector::Type(QualifiedName {
                            ident: self.expect_ident()?,
                            namespace: Namespace::Other(name),
                        }))
                    }
                } else {
                    Ok(SimpleSelector::Type(QualifiedName {
                        ident: name,
                        namespace: Namespace::None,
                    }))
                }
            }
            _ => Err(ParseError::unexpected_token(
                self.current_pos(),
                "simple selector",
                self.describe_peek(),
            )),
        }
    }

    /// Parse `[ns|name op value modifier]`
    fn parse_attribute(&mut self) -> ParseResult<SimpleSelector> {
        self.expect(Token::LBracket)?;
        self.skip_whitespace();

        let name = self.parse_attribute_name()?;
        self.skip_whitespace();

        let op = match self.peek_token() {
            Some(Token::RBracket) => AttributeOp::Any,
            Some(Token::Equals) => AttributeOp::Equals,
            Some(Token::IncludeMatch) => AttributeOp::Include,
            Some(Token::DashMatch) => AttributeOp::Dash,
            Some(Token::PrefixMatch) => AttributeOp::Prefix,
            Some(Token::SuffixMatch) => AttributeOp::Suffix,
            Some(Token::SubstringMatch) => AttributeOp::Contains,
            _ => {
                return Err(ParseError::unexpected_token(
                    self.current_pos(),
                    "attribute operator or ']'",
                    self.describe_peek(),
                ))
            }
        };

        let mut value = None;
        let mut modifier = None;
        if op != AttributeOp::Any {
            self.advance(); // operator
            self.skip_whitespace();
            value = Some(self.expect_attribute_value()?);
            self.skip_whitespace();
            if let Some(Token::Ident(flag)) = self.peek_token() {
                if flag.len() == 1 {
                    modifier = flag.chars().next();
                    self.advance();
                    self.skip_whitespace();
                }
            }
        }

        self.expect(Token::RBracket)?;
        Ok(SimpleSelector::Attribute(Attribute {
            name,
            op,
            value,
            modifier,
        }))
    }

    fn parse_attribute_name(&mut self) -> ParseResult<QualifiedName> {
        match self.peek_token() {
            Some(Token::Star) => {
                self.advance();
                self.expect(Token::Pipe)?;
                Ok(QualifiedName {
                    ident: self.expect_ident()?,
                    namespace: Namespace::Asterisk,
                })
            }
            Some(Token::Pipe) => {
                self.advance();
                Ok(QualifiedName {
                    ident: self.expect_ident()?,
                    namespace: Namespace::Empty,
                })
            }
            Some(Token::Ident(name)) => {
                let name = name.to_string();
                self.advance();
                if self.check(Token::Pipe) {
                    self.advance();
                    Ok(QualifiedName {
                        ident: self.expect_ident()?,
                        namespace: Namespace::Other(name),
                    })
                } else {
                    Ok(QualifiedName {
                        ident: name,
                        namespace: Namespace::None,
                    })
                }
            }
            _ => Err(ParseError::unexpected_token(
                self.current_pos(),
                "attribute name",
                self.describe_peek(),
            )),
        }
    }

    fn expect_attribute_value(&mut self) -> ParseResult<String> {
        match self.peek_token() {
            Some(Token::String(raw)) => {
                let unquoted = raw[1..raw.len() - 1].to_string();
                self.advance();
                Ok(unquoted)
            }
            Some(Token::Ident(value)) => {
                let value = value.to_string();
                self.advance();
                Ok(value)
            }
            _ => Err(ParseError::unexpected_token(
                self.current_pos(),
                "attribute value",
                self.describe_peek(),
            )),
        }
    }

    /// Parse `:name`, `::name`, `:name(...)`
    fn parse_pseudo(&mut self) -> ParseResult<SimpleSelector> {
        let is_element_syntax = self.check(Token::DoubleColon);
        self.advance(); // colon or double colon

        let name = self.expect_ident()?;
        let is_syntactic_class = !is_element_syntax;
        let is_class = !is_element_syntax && !LEGACY_PSEUDO_ELEMENTS.contains(&name.as_str());

        let mut pseudo = Pseudo {
            name,
            is_class,
            is_syntactic_class,
            argument: None,
            selector: None,
        };

        if self.match_token(Token::LParen) {
            let raw = self.raw_until_matching_rparen()?;
            let unprefixed = pseudo.unprefixed_name().to_string();

            if Self::is_selector_pseudo(&unprefixed, pseudo.is_class) {
                pseudo.selector = Some(Box::new(parse_selector(raw, &self.path)?));
            } else if unprefixed == "nth-child" || unprefixed == "nth-last-child" {
                // `:nth-child(2n+1 of .a, .b)` carries both an An+B argument
                // and a selector list
                if let Some((arg, rest)) = raw.split_once(" of ") {
                    pseudo.argument = Some(arg.trim().to_string());
                    pseudo.selector = Some(Box::new(parse_selector(rest, &self.path)?));
                } else {
                    pseudo.argument = Some(raw.trim().to_string());
                }
            } else {
                pseudo.argument = Some(raw.trim().to_string());
            }
        }

        Ok(SimpleSelector::Pseudo(pseudo))
    }

    /// Consume tokens through the matching `)` and return the raw source
    /// text between the parentheses
    fn raw_until_matching_rparen(&mut self) -> ParseResult<&'src str> {
        let start = match self.tokens.get(self.pos) {
            Some((_, span)) => span.start,
            None => return Err(ParseError::unexpected_eof(self.source.len())),
        };
        let mut end = start;
        let mut depth = 1usize;

        while self.pos < self.tokens.len() {
            let (token, span) = self.tokens[self.pos].clone();
            match token {
                Token::LParen => depth += 1,
                Token::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos += 1;
                        return Ok(&self.source[start..end]);
                    }
                }
                _ => {}
            }
            end = span.end;
            self.pos += 1;
        }

        Err(ParseError::unexpected_eof(self.source.len()))
    }

    fn is_selector_pseudo(unprefixed: &str, is_class: bool) -> bool {
        if is_class {
            SELECTOR_PSEUDO_CLASSES.contains(&unprefixed)
        } else {
            SELECTOR_PSEUDO_ELEMENTS.contains(&unprefixed)
        }
    }

    fn starts_compound(token: &Token) -> bool {
        matches!(token, Token::Ampersand) || Self::starts_simple(token)
    }

    fn starts_simple(token: &Token) -> bool {
        matches!(
            token,
            Token::Dot
                | Token::Hash
                | Token::Percent
                | Token::Colon
                | Token::DoubleColon
                | Token::Ident(..)
                | Token::Star
                | Token::Pipe
                | Token::LBracket
        )
    }

    /// Whether the complex selector continues past the whitespace at the
    /// current position (as opposed to ending at a comma or end of input)
    fn continues_complex_after_whitespace(&self) -> bool {
        let mut idx = self.pos;
        while idx < self.tokens.len() {
            match &self.tokens[idx].0 {
                Token::Whitespace(..) => idx += 1,
                Token::Comma => return false,
                _ => return true,
            }
        }
        false
    }

    /// Consume any whitespace tokens; returns whether a newline was seen
    fn skip_whitespace(&mut self) -> bool {
        let mut saw_newline = false;
        while let Some(Token::Whitespace(ws)) = self.peek_token() {
            saw_newline = saw_newline || ws.contains('\n');
            self.advance();
        }
        saw_newline
    }

    fn peek(&self) -> Option<&(Token<'src>, Range<usize>)> {
        self.tokens.get(self.pos)
    }

    fn peek_token(&self) -> Option<Token<'src>> {
        self.peek().map(|(token, _)| token.clone())
    }

    fn peek_ahead(&self, offset: usize) -> Option<&(Token<'src>, Range<usize>)> {
        self.tokens.get(self.pos + offset)
    }

    fn advance(&mut self) -> Option<&(Token<'src>, Range<usize>)> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn check(&self, token: Token) -> bool {
        match self.peek() {
            Some((t, _)) => std::mem::discriminant(t) == std::mem::discriminant(&token),
            None => false,
        }
    }

    fn match_token(&mut self, token: Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token) -> ParseResult<()> {
        if self.check(token.clone()) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::unexpected_token(
                self.current_pos(),
                token.to_string(),
                self.describe_peek(),
            ))
        }
    }

    fn expect_ident(&mut self) -> ParseResult<String> {
        match self.peek() {
            Some((Token::Ident(s), _)) => {
                let val = s.to_string();
                self.advance();
                Ok(val)
            }
            _ => Err(ParseError::unexpected_token(
                self.current_pos(),
                "identifier",
                self.describe_peek(),
            )),
        }
    }

    fn current_pos(&self) -> usize {
        match self.peek() {
            Some((_, span)) => span.start,
            None => self.source.len(),
        }
    }

    fn describe_peek(&self) -> String {
        match self.peek() {
            Some((token, _)) => token.to_string(),
            None => "end of selector".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> SelectorList {
        parse_selector(source, "/test.css").expect("Failed to parse selector")
    }

    #[test]
    fn test_parse_simple_class() {
        let list = parse(".error");
        assert_eq!(list.components.len(), 1);
        let compound = list.components[0].last_compound().unwrap();
        assert_eq!(
            compound.components,
            vec![SimpleSelector::Class("error".to_string())]
        );
    }

    #[test]
    fn test_parse_compound() {
        let list = parse("a.b#c%d");
        let compound = list.components[0].last_compound().unwrap();
        assert_eq!(compound.components.len(), 4);
        assert!(matches!(compound.components[0], SimpleSelector::Type(..)));
        assert!(matches!(compound.components[1], SimpleSelector::Class(..)));
        assert!(matches!(compound.components[2], SimpleSelector::Id(..)));
        assert!(matches!(
            compound.components[3],
            SimpleSelector::Placeholder(..)
        ));
    }

    #[test]
    fn test_parse_descendant() {
        let list = parse(".a .b");
        let complex = &list.components[0];
        assert_eq!(complex.components.len(), 2);
        assert!(complex.components.iter().all(|c| !c.is_combinator()));
    }

    #[test]
    fn test_parse_combinators() {
        let list = parse(".a > .b + .c ~ .d");
        let complex = &list.components[0];
        assert_eq!(complex.components.len(), 7);
        assert_eq!(
            complex.components[1],
            ComplexSelectorComponent::Combinator(Combinator::Child)
        );
        assert_eq!(
            complex.components[3],
            ComplexSelectorComponent::Combinator(Combinator::NextSibling)
        );
        assert_eq!(
            complex.components[5],
            ComplexSelectorComponent::Combinator(Combinator::FollowingSibling)
        );
    }

    #[test]
    fn test_parse_tight_combinators() {
        // No whitespace around the combinator
        let list = parse(".a>.b");
        assert_eq!(list.components[0].components.len(), 3);
    }

    #[test]
    fn test_parse_list() {
        let list = parse(".a, .b , .c");
        assert_eq!(list.components.len(), 3);
    }

    #[test]
    fn test_parse_line_feed_flag() {
        let list = parse(".a,\n.b");
        assert!(!list.components[0].has_pre_line_feed);
        assert!(list.components[1].has_pre_line_feed);
    }

    #[test]
    fn test_parse_attribute() {
        let list = parse("[href^=\"https\" i]");
        let compound = list.components[0].last_compound().unwrap();
        match &compound.components[0] {
            SimpleSelector::Attribute(attr) => {
                assert_eq!(attr.name.ident, "href");
                assert_eq!(attr.op, AttributeOp::Prefix);
                assert_eq!(attr.value.as_deref(), Some("https"));
                assert_eq!(attr.modifier, Some('i'));
            }
            other => panic!("Expected attribute selector, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_bare_attribute() {
        let list = parse("[disabled]");
        let compound = list.components[0].last_compound().unwrap();
        match &compound.components[0] {
            SimpleSelector::Attribute(attr) => {
                assert_eq!(attr.op, AttributeOp::Any);
                assert_eq!(attr.value, None);
            }
            other => panic!("Expected attribute selector, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_selector_pseudo() {
        let list = parse(":not(.a, .b)");
        let compound = list.components[0].last_compound().unwrap();
        match &compound.components[0] {
            SimpleSelector::Pseudo(pseudo) => {
                assert!(pseudo.is_class);
                let inner = pseudo.selector.as_ref().unwrap();
                assert_eq!(inner.components.len(), 2);
            }
            other => panic!("Expected pseudo selector, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_pseudo_element() {
        let list = parse("::after");
        let compound = list.components[0].last_compound().unwrap();
        match &compound.components[0] {
            SimpleSelector::Pseudo(pseudo) => {
                assert!(!pseudo.is_class);
                assert!(!pseudo.is_syntactic_class);
            }
            other => panic!("Expected pseudo selector, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_legacy_pseudo_element() {
        let list = parse(":before");
        let compound = list.components[0].last_compound().unwrap();
        match &compound.components[0] {
            SimpleSelector::Pseudo(pseudo) => {
                assert!(!pseudo.is_class);
                assert!(pseudo.is_syntactic_class);
            }
            other => panic!("Expected pseudo selector, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_nth_child_argument() {
        let list = parse(":nth-child(2n+1)");
        let compound = list.components[0].last_compound().unwrap();
        match &compound.components[0] {
            SimpleSelector::Pseudo(pseudo) => {
                assert_eq!(pseudo.argument.as_deref(), Some("2n+1"));
                assert!(pseudo.selector.is_none());
            }
            other => panic!("Expected pseudo selector, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_nth_child_of_selector() {
        let list = parse(":nth-child(2n of .a)");
        let compound = list.components[0].last_compound().unwrap();
        match &compound.components[0] {
            SimpleSelector::Pseudo(pseudo) => {
                assert_eq!(pseudo.argument.as_deref(), Some("2n"));
                assert!(pseudo.selector.is_some());
            }
            other => panic!("Expected pseudo selector, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_namespaces() {
        let list = parse("svg|circle");
        let compound = list.components[0].last_compound().unwrap();
        match &compound.components[0] {
            SimpleSelector::Type(name) => {
                assert_eq!(name.ident, "circle");
                assert_eq!(name.namespace, Namespace::Other("svg".to_string()));
            }
            other => panic!("Expected type selector, got {:?}", other),
        }

        let list = parse("*|a");
        let compound = list.components[0].last_compound().unwrap();
        match &compound.components[0] {
            SimpleSelector::Type(name) => assert_eq!(name.namespace, Namespace::Asterisk),
            other => panic!("Expected type selector, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_parent_reference() {
        let list = parse("&.a");
        let compound = list.components[0].last_compound().unwrap();
        assert!(compound.has_real_parent);
        assert_eq!(compound.components.len(), 1);
    }

    #[test]
    fn test_parse_leading_combinator() {
        // Transiently legal (nested rule context)
        let list = parse("> .a");
        assert!(list.components[0].components[0].is_combinator());
    }

    #[test]
    fn test_parse_error_on_garbage() {
        assert!(parse_selector(".a {", "/test.css").is_err());
        assert!(parse_selector("..a", "/test.css").is_err());
    }
}
