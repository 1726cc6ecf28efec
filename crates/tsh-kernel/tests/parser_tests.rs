//! Command line parsing tests.

use rstest::rstest;
use tsh_kernel::lexer::LexerError;
use tsh_kernel::{parse_line, ParsedLine};

fn argv(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

#[rstest]
#[case("sleep 5", &["sleep", "5"], false)]
#[case("sleep 5 &", &["sleep", "5"], true)]
#[case("sleep 5&", &["sleep", "5"], true)]
#[case("  /bin/echo   a\tb  ", &["/bin/echo", "a", "b"], false)]
#[case("echo 'a b' c", &["echo", "a b", "c"], false)]
#[case("echo a&b", &["echo", "a&b"], false)]
#[case("echo '&'", &["echo", "&"], false)]
#[case("jobs\n", &["jobs"], false)]
fn parses(#[case] line: &str, #[case] words: &[&str], #[case] background: bool) {
    assert_eq!(
        parse_line(line).unwrap(),
        ParsedLine {
            argv: argv(words),
            background,
        }
    );
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("\n")]
fn empty_lines(#[case] line: &str) {
    let parsed = parse_line(line).unwrap();
    assert!(parsed.is_empty());
    assert!(!parsed.background);
}

#[test]
fn lone_ampersand_is_empty_background() {
    let parsed = parse_line("&").unwrap();
    assert!(parsed.is_empty());
    assert!(parsed.background);
}

#[test]
fn unterminated_quote() {
    let err = parse_line("echo 'abc").unwrap_err();
    assert_eq!(err.value, LexerError::UnterminatedQuote);
    assert_eq!(err.span.start, 5);
}
