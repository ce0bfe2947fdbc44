use logos::Logos;
use std::fmt;

/// Token types for CSS selector text
///
/// Whitespace is not skipped: between two compound selectors it is the
/// descendant combinator, so the parser has to see it.
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token<'src> {
    #[regex(r"[ \t\r\n\x0c]+", |lex| lex.slice())]
    Whitespace(&'src str),

    #[token(",")]
    Comma,

    #[token(">")]
    Greater,

    #[token("+")]
    Plus,

    #[token("~=")]
    IncludeMatch,

    #[token("~")]
    Tilde,

    #[token("|=")]
    DashMatch,

    #[token("|")]
    Pipe,

    #[token("^=")]
    PrefixMatch,

    #[token("$=")]
    SuffixMatch,

    #[token("*=")]
    SubstringMatch,

    #[token("*")]
    Star,

    #[token("=")]
    Equals,

    #[token("&")]
    Ampersand,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("::")]
    DoubleColon,

    #[token(":")]
    Colon,

    #[token(".")]
    Dot,

    #[token("#")]
    Hash,

    #[token("%")]
    Percent,

    // Identifiers (including vendor prefixes like -moz-any)
    #[regex(r"-?-?[a-zA-Z_][a-zA-Z0-9_-]*", |lex| lex.slice())]
    Ident(&'src str),

    // String literals, either quote style
    #[regex(r#""([^"\\]|\\.)*""#, |lex| lex.slice())]
    #[regex(r"'([^'\\]|\\.)*'", |lex| lex.slice())]
    String(&'src str),

    /// Anything the lexer does not recognize. Kept (with its span) so that
    /// raw pseudo arguments like `2n+1` survive as source slices.
    Error,
}

impl<'src> fmt::Display for Token<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Whitespace(..) => write!(f, "whitespace"),
            Token::Comma => write!(f, ","),
            Token::Greater => write!(f, ">"),
            Token::Plus => write!(f, "+"),
            Token::Tilde => write!(f, "~"),
            Token::IncludeMatch => write!(f, "~="),
            Token::DashMatch => write!(f, "|="),
            Token::PrefixMatch => write!(f, "^="),
            Token::SuffixMatch => write!(f, "$="),
            Token::SubstringMatch => write!(f, "*="),
            Token::Pipe => write!(f, "|"),
            Token::Star => write!(f, "*"),
            Token::Equals => write!(f, "="),
            Token::Ampersand => write!(f, "&"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::DoubleColon => write!(f, "::"),
            Token::Colon => write!(f, ":"),
            Token::Dot => write!(f, "."),
            Token::Hash => write!(f, "#"),
            Token::Percent => write!(f, "%"),
            Token::Ident(s) => write!(f, "identifier '{}'", s),
            Token::String(s) => write!(f, "string {}", s),
            Token::Error => write!(f, "unrecognized character"),
        }
    }
}

/// Tokenize selector source text
pub fn tokenize(source: &str) -> Vec<(Token, std::ops::Range<usize>)> {
    Token::lexer(source)
        .spanned()
        .map(|(result, span)| (result.unwrap_or(Token::Error), span))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_tokens() {
        let tokens = tokenize(".a#b:hover");
        assert_eq!(tokens[0].0, Token::Dot);
        assert_eq!(tokens[1].0, Token::Ident("a"));
        assert_eq!(tokens[2].0, Token::Hash);
        assert_eq!(tokens[3].0, Token::Ident("b"));
        assert_eq!(tokens[4].0, Token::Colon);
        assert_eq!(tokens[5].0, Token::Ident("hover"));
    }

    #[test]
    fn test_whitespace_is_preserved() {
        let tokens = tokenize("a b");
        assert_eq!(tokens[0].0, Token::Ident("a"));
        assert_eq!(tokens[1].0, Token::Whitespace(" "));
        assert_eq!(tokens[2].0, Token::Ident("b"));
    }

    #[test]
    fn test_attribute_operators() {
        let tokens = tokenize("[href^=\"https\"]");
        assert_eq!(tokens[0].0, Token::LBracket);
        assert_eq!(tokens[1].0, Token::Ident("href"));
        assert_eq!(tokens[2].0, Token::PrefixMatch);
        assert_eq!(tokens[3].0, Token::String("\"https\""));
        assert_eq!(tokens[4].0, Token::RBracket);
    }

    #[test]
    fn test_double_colon_wins_over_colon() {
        let tokens = tokenize("::after");
        assert_eq!(tokens[0].0, Token::DoubleColon);
        assert_eq!(tokens[1].0, Token::Ident("after"));
    }

    #[test]
    fn test_unrecognized_input_becomes_error_token() {
        let tokens = tokenize("2n");
        assert_eq!(tokens[0].0, Token::Error);
    }
}
