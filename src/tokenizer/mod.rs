//! Tokenizer for shell input lines
//!
//! Splits one raw input line into at most `max_tokens` space-separated tokens.
//! Extra tokens past the limit are silently dropped.

/// A tokenized input line; `tokens[0]` is the command name
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TokenizedLine {
    pub tokens: Vec<String>,
}

impl TokenizedLine {
    /// Create a new tokenized line
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    /// Create an empty tokenized line
    pub fn empty() -> Self {
        Self { tokens: Vec::new() }
    }

    /// The command word, if the line has any tokens
    pub fn command(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }

    /// All tokens, argv-style (index 0 is the command)
    pub fn args(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Tokenize a raw input line.
///
/// Only the space character separates tokens; runs of spaces never produce an
/// empty token.
pub fn tokenize(line: &str, max_tokens: usize) -> TokenizedLine {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let line = line.strip_suffix('\r').unwrap_or(line);

    let tokens = line
        .split(' ')
        .filter(|piece| !piece.is_empty())
        .take(max_tokens)
        .map(str::to_string)
        .collect();

    TokenizedLine::new(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_TOKENS;
    use quickcheck::TestResult;

    #[test]
    fn test_tokenize_simple() {
        let line = tokenize("open 1 a.txt\n", MAX_TOKENS);
        assert_eq!(line.tokens, vec!["open", "1", "a.txt"]);
        assert_eq!(line.command(), Some("open"));
        assert_eq!(line.len(), 3);
    }

    #[test]
    fn test_tokenize_collapses_spaces() {
        let line = tokenize("  write   4  hello  ", MAX_TOKENS);
        assert_eq!(line.tokens, vec!["write", "4", "hello"]);
    }

    #[test]
    fn test_tokenize_crlf() {
        let line = tokenize("list\r\n", MAX_TOKENS);
        assert_eq!(line.tokens, vec!["list"]);
    }

    #[test]
    fn test_tokenize_tabs_are_not_separators() {
        let line = tokenize("ls\tdir", MAX_TOKENS);
        assert_eq!(line.tokens, vec!["ls\tdir"]);
    }

    #[test]
    fn test_tokenize_truncates_at_limit() {
        let line = tokenize("create 5 a b c d e", MAX_TOKENS);
        assert_eq!(line.tokens, vec!["create", "5", "a", "b", "c", "d"]);
    }

    #[test]
    fn test_tokenize_empty_line() {
        assert!(tokenize("", MAX_TOKENS).is_empty());
        assert!(tokenize("   \n", MAX_TOKENS).is_empty());
        assert_eq!(tokenize("\n", MAX_TOKENS), TokenizedLine::empty());
        assert_eq!(TokenizedLine::empty().command(), None);
    }

    // Property-Based Tests

    /// Tokens are never empty, never contain a space, and never exceed the limit
    #[test]
    fn prop_tokens_are_well_formed() {
        fn property(input: String, limit: u8) -> TestResult {
            if input.contains('\n') {
                return TestResult::discard();
            }
            let limit = limit as usize;
            let line = tokenize(&input, limit);
            TestResult::from_bool(
                line.len() <= limit
                    && line.tokens.iter().all(|t| !t.is_empty() && !t.contains(' ')),
            )
        }

        let mut qc = quickcheck::QuickCheck::new().tests(50);
        qc.quickcheck(property as fn(String, u8) -> TestResult);
    }
}
