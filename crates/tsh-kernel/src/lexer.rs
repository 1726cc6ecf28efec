//! Lexer for tsh command lines.
//!
//! A line is a flat sequence of whitespace-separated words. Single quotes
//! group a run of characters, spaces included, into one word.

use std::fmt;
use std::ops::Range;

use logos::Logos;

/// Lexer failure.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LexerError {
    /// A `'` with no closing quote.
    #[default]
    UnterminatedQuote,
}

impl fmt::Display for LexerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexerError::UnterminatedQuote => write!(f, "unterminated quote"),
        }
    }
}

impl std::error::Error for LexerError {}

/// Tokens of a command line.
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(error = LexerError)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    /// `'...'` with the quotes stripped.
    #[regex(r"'[^']*'", lex_quoted)]
    Quoted(String),

    /// Any run of characters that are neither whitespace nor quotes.
    #[regex(r"[^ \t\r\n']+", |lex| lex.slice().to_string())]
    Word(String),
}

fn lex_quoted(lex: &mut logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    slice[1..slice.len() - 1].to_string()
}

/// A token with its byte range in the source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Range<usize>,
}

/// Split a line into tokens, or report the first lexer error.
pub fn tokenize(source: &str) -> Result<Vec<Spanned<Token>>, Spanned<LexerError>> {
    let mut tokens = Vec::new();
    for (result, span) in Token::lexer(source).spanned() {
        match result {
            Ok(value) => tokens.push(Spanned { value, span }),
            Err(value) => return Err(Spanned { value, span }),
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(source: &str) -> Vec<Token> {
        tokenize(source)
            .expect("should lex")
            .into_iter()
            .map(|t| t.value)
            .collect()
    }

    #[test]
    fn words_split_on_whitespace() {
        assert_eq!(
            values("  sleep\t5 \n"),
            vec![Token::Word("sleep".into()), Token::Word("5".into())]
        );
    }

    #[test]
    fn quotes_group_words() {
        assert_eq!(
            values("echo 'hello world'"),
            vec![Token::Word("echo".into()), Token::Quoted("hello world".into())]
        );
    }

    #[test]
    fn empty_quotes() {
        assert_eq!(values("''"), vec![Token::Quoted(String::new())]);
    }

    #[test]
    fn unterminated_quote_is_error() {
        let err = tokenize("echo 'oops").unwrap_err();
        assert_eq!(err.value, LexerError::UnterminatedQuote);
        assert_eq!(err.span.start, 5);
    }
}
