use chumsky::Parser;
use thiserror::Error;

pub mod conversion;
pub mod forest;
pub mod grammar_parser;
pub mod lexer;
pub mod recognizer;

pub use forest::ParseTree;
pub use lexer::{LexError, LexRule, Lexer, ReservedWords, Token, TokenValue};
pub use recognizer::{Chart, Grammar, GrammarError, Production, Span, Symbol};

#[derive(Debug, Error)]
pub enum AmbiparseError {
    #[error("error(s) while parsing the grammar notation: {0}")]
    InvalidNotation(String),
    #[error(transparent)]
    Grammar(#[from] GrammarError),
    #[error(transparent)]
    Lex(#[from] LexError),
}

/// Knobs for a parse call. `enumerate_all` (the default) materializes every
/// distinct tree; turning it off stops after the first one, for callers that
/// only need membership plus a witness.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub enumerate_all: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            enumerate_all: true,
        }
    }
}

/// Every distinct parse tree whose yield is exactly `tokens` and whose root
/// is the grammar's start symbol. Empty when the sequence is not in the
/// language; that is rejection, not an error.
pub fn parse<'gr, 'inp>(
    grammar: &'gr Grammar<'gr>,
    tokens: &'inp [Token<'inp>],
) -> Vec<ParseTree<'gr, 'inp>> {
    parse_with(grammar, tokens, &ParseOptions::default())
}

pub fn parse_with<'gr, 'inp>(
    grammar: &'gr Grammar<'gr>,
    tokens: &'inp [Token<'inp>],
    options: &ParseOptions,
) -> Vec<ParseTree<'gr, 'inp>> {
    let mut chart = Chart::new(grammar, tokens);
    chart.recognize();
    let limit = if options.enumerate_all { None } else { Some(1) };
    chart.trees_up_to(limit)
}

/// Owns a grammar built from the textual notation and parses token
/// sequences against it. The grammar is read-only after construction, so one
/// engine can serve any number of parse calls.
pub struct Ambiparse<'gr> {
    grammar: Grammar<'gr>,
}

impl<'gr> Ambiparse<'gr> {
    pub fn from_grammar(notation: &'gr str) -> Result<Self, AmbiparseError> {
        let result = grammar_parser::rules().parse(notation);
        if result.has_errors() {
            let mut message = String::new();
            for e in result.errors() {
                message.push('\n');
                message.push_str(&format!("{} at {}", e, e.span()));
            }
            return Err(AmbiparseError::InvalidNotation(message));
        }
        let rules = match result.output() {
            Some(rules) => rules,
            None => return Err(AmbiparseError::InvalidNotation("no rules parsed".to_string())),
        };
        Ok(Self {
            grammar: Grammar::from_rules(rules)?,
        })
    }

    pub fn grammar(&self) -> &Grammar<'gr> {
        &self.grammar
    }

    pub fn parse<'inp>(&self, tokens: &'inp [Token<'inp>]) -> Vec<ParseTree<'_, 'inp>> {
        parse(&self.grammar, tokens)
    }

    pub fn parse_with<'inp>(
        &self,
        tokens: &'inp [Token<'inp>],
        options: &ParseOptions,
    ) -> Vec<ParseTree<'_, 'inp>> {
        parse_with(&self.grammar, tokens, options)
    }
}
