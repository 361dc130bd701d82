use chumsky::Parser;

use crate::grammar_parser::rules;

#[cfg(test)]
mod invalid_notation_tests {
    use super::*;

    fn assert_rejected(input: &str, what: &str) {
        let result = rules().parse(input);
        for e in result.errors() {
            println!("Expected parse error ({}): {} at {}", what, e, e.span());
        }
        assert!(result.has_errors(), "Expected parser to fail on {}", what);
    }

    #[test]
    fn test_missing_arrow() {
        assert_rejected("S 'a' S 'b'", "a rule without ->");
    }

    #[test]
    fn test_unclosed_quote() {
        assert_rejected("S -> 'a S", "an unclosed terminal quote");
    }

    #[test]
    fn test_empty_terminal() {
        assert_rejected("S -> ''", "an empty terminal literal");
    }

    #[test]
    fn test_missing_lhs() {
        assert_rejected("-> 'a'", "a rule without a left-hand side");
    }

    #[test]
    fn test_stray_punctuation() {
        assert_rejected("S -> 'a' ? 'b'", "an unknown symbol form");
    }

    #[test]
    fn test_two_rules_on_one_line() {
        assert_rejected("S -> 'a' T -> 'b'", "two rules on one line");
    }
}
