//! Token definitions for marker bodies
//!
//! The text following a `svelte-` or `iter-` prefix is lexed with logos. Lexing stops at the
//! first character no token accepts (whitespace, quotes, `>` ...), which is where a marker ends.
use logos::Logos;
use std::ops::Range;

/// Tokens that may appear inside a marker
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum MarkerToken {
    // Path segment or binding variable name
    #[regex(r"[A-Za-z0-9_]+")]
    Ident,

    #[token("-")]
    Dash,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,

    // Type annotation including its braces, one level of nesting for `{k,v}` maps
    #[regex(r"\{([^{}]|\{[^{}]*\})*\}")]
    Annotation,
}

/// Lex a marker body up to the first character that is not part of any token.
pub fn lex_marker_body(source: &str) -> Vec<(MarkerToken, Range<usize>)> {
    MarkerToken::lexer(source)
        .spanned()
        .map_while(|(token, span)| token.ok().map(|token| (token, span)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<MarkerToken> {
        lex_marker_body(source).into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn test_reference_body() {
        assert_eq!(
            kinds("items-name-\">"),
            vec![
                MarkerToken::Ident,
                MarkerToken::Dash,
                MarkerToken::Ident,
                MarkerToken::Dash
            ]
        );
    }

    #[test]
    fn test_iteration_body() {
        assert_eq!(
            kinds("meta[k-v]-- other"),
            vec![
                MarkerToken::Ident,
                MarkerToken::OpenBracket,
                MarkerToken::Ident,
                MarkerToken::Dash,
                MarkerToken::Ident,
                MarkerToken::CloseBracket,
                MarkerToken::Dash,
                MarkerToken::Dash
            ]
        );
    }

    #[test]
    fn test_nested_annotation_is_one_token() {
        let tokens = lex_marker_body("scores{{string, int}}-");
        assert_eq!(tokens[1], (MarkerToken::Annotation, 6..21));
        assert_eq!(tokens[2].0, MarkerToken::Dash);
    }

    #[test]
    fn test_unclosed_annotation_stops_lexing() {
        assert_eq!(kinds("count{int-"), vec![MarkerToken::Ident]);
    }
}
