use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use regex::Regex;
use thiserror::Error;

/// Fatal scan failure: a character no productive rule recognises. Scanning
/// stops at the first offender, there is no recovery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unexpected character {character:?} on line {line}")]
pub struct LexError {
    pub character: char,
    pub line: usize,
}

#[derive(Debug, Clone)]
pub enum TokenValue<'inp> {
    Str(&'inp str),
    Int(i64),
    Float(f64),
}

impl PartialEq for TokenValue<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TokenValue::Str(a), TokenValue::Str(b)) => a == b,
            (TokenValue::Int(a), TokenValue::Int(b)) => a == b,
            (TokenValue::Float(a), TokenValue::Float(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Eq for TokenValue<'_> {}

impl Hash for TokenValue<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            TokenValue::Str(s) => {
                0u8.hash(state);
                s.hash(state);
            }
            TokenValue::Int(i) => {
                1u8.hash(state);
                i.hash(state);
            }
            TokenValue::Float(x) => {
                2u8.hash(state);
                x.to_bits().hash(state);
            }
        }
    }
}

impl fmt::Display for TokenValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValue::Str(s) => write!(f, "{}", s),
            TokenValue::Int(i) => write!(f, "{}", i),
            TokenValue::Float(x) => write!(f, "{}", x),
        }
    }
}

/// One scanned token. The parser only ever looks at `ty`; the value and the
/// position ride along for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token<'inp> {
    pub ty: &'inp str,
    pub value: TokenValue<'inp>,
    pub line: usize,
    pub column: usize,
}

impl<'inp> Token<'inp> {
    pub fn new(ty: &'inp str, value: TokenValue<'inp>, line: usize, column: usize) -> Self {
        Self {
            ty,
            value,
            line,
            column,
        }
    }
}

/// Reserved-word tables, injected so the scanner stays grammar-agnostic.
/// Words in `numeric_types` collapse to the single type `NUMTYPE`; words in
/// `keywords` and `other_types` become self-typed tokens.
#[derive(Debug, Clone, Default)]
pub struct ReservedWords {
    pub numeric_types: HashSet<String>,
    pub other_types: HashSet<String>,
    pub keywords: HashSet<String>,
}

impl ReservedWords {
    pub fn new(numeric_types: &[&str], other_types: &[&str], keywords: &[&str]) -> Self {
        fn set(words: &[&str]) -> HashSet<String> {
            words.iter().map(|w| w.to_string()).collect()
        }
        Self {
            numeric_types: set(numeric_types),
            other_types: set(other_types),
            keywords: set(keywords),
        }
    }
}

/// One scan rule. Rules are tried in declaration order at every position and
/// the first whose pattern matches wins; this is documented priority, not
/// maximal munch.
///
/// Four names carry built-in behaviour: `NUMBER` lexemes are classified as
/// integer or float, `ID` matches are re-typed through the reserved-word
/// tables, `SKIP` matches produce no token, and a `MISMATCH` match aborts
/// the scan.
#[derive(Debug, Clone)]
pub struct LexRule {
    pub name: &'static str,
    pub pattern: &'static str,
}

impl LexRule {
    pub fn new(name: &'static str, pattern: &'static str) -> Self {
        Self { name, pattern }
    }
}

pub struct Lexer {
    rules: Vec<LexRule>,
    reserved: ReservedWords,
    pattern: Regex,
}

impl Lexer {
    /// Compiles the rule list into one alternation of named groups. The
    /// regex engine's leftmost-first alternation is what keeps the rule
    /// priority order.
    pub fn new(rules: Vec<LexRule>, reserved: ReservedWords) -> Result<Self, regex::Error> {
        let alternation = rules
            .iter()
            .map(|r| format!("(?P<{}>{})", r.name, r.pattern))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&alternation)?;
        Ok(Self {
            rules,
            reserved,
            pattern,
        })
    }

    /// Scan `text` left to right into tokens. Pure function of its input:
    /// the same text always yields the same token sequence.
    pub fn tokenize<'inp>(&self, text: &'inp str) -> Result<Vec<Token<'inp>>, LexError> {
        let mut tokens = Vec::new();
        let mut line = 1;
        let mut line_start = 0;
        for caps in self.pattern.captures_iter(text) {
            let Some((name, m)) = self
                .rules
                .iter()
                .find_map(|r| caps.name(r.name).map(|m| (r.name, m)))
            else {
                continue;
            };
            let raw = m.as_str();
            let column = m.start() - line_start;
            match name {
                "SKIP" => {}
                "MISMATCH" => {
                    return Err(LexError {
                        character: raw.chars().next().unwrap_or('\u{fffd}'),
                        line,
                    });
                }
                "NUMBER" => tokens.push(Token::new("NUMBER", number_value(raw), line, column)),
                "ID" => {
                    let ty = self.classify_word(raw);
                    tokens.push(Token::new(ty, TokenValue::Str(raw), line, column));
                }
                _ => tokens.push(Token::new(name, TokenValue::Str(raw), line, column)),
            }
            if let Some(offset) = raw.rfind('\n') {
                line += raw.matches('\n').count();
                line_start = m.start() + offset + 1;
            }
        }
        Ok(tokens)
    }

    /// Reserved-word override for identifier matches. `Main` and `main` are
    /// self-typed independently of the tables.
    fn classify_word<'inp>(&self, word: &'inp str) -> &'inp str {
        if self.reserved.numeric_types.contains(word) {
            "NUMTYPE"
        } else if self.reserved.keywords.contains(word) {
            word
        } else if self.reserved.other_types.contains(word) {
            word
        } else if word == "Main" || word == "main" {
            word
        } else {
            "ID"
        }
    }
}

/// A lexeme with a decimal point is a float, otherwise an integer. A literal
/// too large for i64 keeps its raw text; the parser only inspects the type.
fn number_value(raw: &str) -> TokenValue<'_> {
    if raw.contains('.') {
        match raw.parse::<f64>() {
            Ok(x) => TokenValue::Float(x),
            Err(_) => TokenValue::Str(raw),
        }
    } else {
        match raw.parse::<i64>() {
            Ok(i) => TokenValue::Int(i),
            Err(_) => TokenValue::Str(raw),
        }
    }
}
