//! Command line parser: raw line to argument vector.
//!
//! A trailing unquoted `&` (either its own word or stuck to the last word)
//! requests background execution and is not part of the argument vector.

use crate::lexer::{tokenize, LexerError, Spanned, Token};

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedLine {
    /// Program name followed by its arguments.
    pub argv: Vec<String>,
    /// True when the line ended with `&`.
    pub background: bool,
}

impl ParsedLine {
    /// True when there is nothing to run.
    pub fn is_empty(&self) -> bool {
        self.argv.is_empty()
    }
}

/// Parse a raw command line.
pub fn parse_line(line: &str) -> Result<ParsedLine, Spanned<LexerError>> {
    let mut tokens = tokenize(line)?;
    let mut background = false;

    if let Some(Token::Word(last)) = tokens.last_mut().map(|t| &mut t.value) {
        if let Some(stripped) = last.strip_suffix('&') {
            background = true;
            if stripped.is_empty() {
                tokens.pop();
            } else {
                *last = stripped.to_string();
            }
        }
    }

    let argv = tokens
        .into_iter()
        .map(|t| match t.value {
            Token::Word(s) | Token::Quoted(s) => s,
        })
        .collect();

    Ok(ParsedLine { argv, background })
}
