use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::lexer::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} - {})", self.start, self.end)
    }
}

/// A terminal is matched against a token's type name; a nonterminal against
/// other productions. The two namespaces are distinct even for equal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol<'gr> {
    Terminal(&'gr str),
    NonTerminal(&'gr str),
}

impl std::fmt::Display for Symbol<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Terminal(name) => write!(f, "'{}'", name),
            Symbol::NonTerminal(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Production<'gr> {
    pub lhs: &'gr str,
    pub rhs: Vec<Symbol<'gr>>,
}

#[derive(Debug, Clone)]
pub struct Grammar<'gr> {
    pub start: &'gr str,
    pub productions: Vec<Production<'gr>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("grammar defines no productions")]
    Empty,
    #[error("undefined nonterminal `{symbol}` in a production for `{lhs}`")]
    UndefinedNonTerminal { symbol: String, lhs: String },
}

impl<'gr> Grammar<'gr> {
    /// Every nonterminal used on a right-hand side must have at least one
    /// production of its own; terminals are self-declaring. Nonterminals
    /// that are defined but unreachable are allowed, they just never derive.
    pub fn new(
        start: &'gr str,
        productions: Vec<Production<'gr>>,
    ) -> Result<Self, GrammarError> {
        if productions.is_empty() {
            return Err(GrammarError::Empty);
        }
        let defined: HashSet<&str> = productions.iter().map(|p| p.lhs).collect();
        for prod in &productions {
            for sym in &prod.rhs {
                if let Symbol::NonTerminal(name) = sym {
                    if !defined.contains(name) {
                        return Err(GrammarError::UndefinedNonTerminal {
                            symbol: name.to_string(),
                            lhs: prod.lhs.to_string(),
                        });
                    }
                }
            }
        }
        Ok(Self { start, productions })
    }

    pub fn prods_for(&'_ self, name: &str) -> Vec<(usize, &Production<'gr>)> {
        self.productions
            .iter()
            .enumerate()
            .filter(|(_, p)| p.lhs == name)
            .collect()
    }
}

pub type EdgeId = usize;

/// A proven derivation: production `prod` derives exactly the tokens in
/// `span`, with `bounds[m] .. bounds[m + 1]` covering the m-th right-hand
/// side symbol. `bounds` is part of edge identity, so two different
/// partitions of the same span stay two distinct edges.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    pub prod: usize,
    pub span: Span,
    pub bounds: Vec<usize>,
}

impl Edge {
    pub fn child_span(&self, m: usize) -> Span {
        Span::new(self.bounds[m], self.bounds[m + 1])
    }
}

/// Span-indexed chart of derivation edges. Append-only: edges are inserted
/// during `recognize` and only read afterwards.
pub struct Chart<'gr, 'inp> {
    pub grammar: &'gr Grammar<'gr>,
    pub tokens: &'inp [Token<'inp>],
    pub(crate) edges: Vec<Edge>,
    by_symbol: HashMap<(usize, usize, &'gr str), Vec<EdgeId>>,
    seen: HashSet<Edge>,
}

impl<'gr, 'inp> Chart<'gr, 'inp> {
    pub fn new(grammar: &'gr Grammar<'gr>, tokens: &'inp [Token<'inp>]) -> Self {
        Self {
            grammar,
            tokens,
            edges: Vec::new(),
            by_symbol: HashMap::new(),
            seen: HashSet::new(),
        }
    }

    /// Fill the chart bottom-up, shortest spans first. Empty spans come
    /// first (length 0), which seeds every epsilon production at every
    /// input boundary before any longer span needs it.
    pub fn recognize(&mut self) {
        let n = self.tokens.len();
        let grammar = self.grammar;
        for len in 0..=n {
            for start in 0..=(n - len) {
                let end = start + len;
                // Same-span edges can feed each other (unit productions,
                // epsilon chains), so iterate the span to a fixed point.
                let mut changed = true;
                while changed {
                    changed = false;
                    for (prod_id, prod) in grammar.productions.iter().enumerate() {
                        let mut found = Vec::new();
                        let mut acc = vec![start];
                        self.partitions(&prod.rhs, start, end, &mut acc, &mut found);
                        for bounds in found {
                            let edge = Edge {
                                prod: prod_id,
                                span: Span::new(start, end),
                                bounds,
                            };
                            if self.insert(prod.lhs, edge) {
                                changed = true;
                            }
                        }
                    }
                }
            }
        }
    }

    /// Depth-first search over the ways to split `pos .. end` among the
    /// remaining right-hand-side symbols. `acc` holds the boundaries chosen
    /// so far, starting with the span start.
    fn partitions(
        &self,
        rhs: &[Symbol<'gr>],
        pos: usize,
        end: usize,
        acc: &mut Vec<usize>,
        out: &mut Vec<Vec<usize>>,
    ) {
        let depth = acc.len() - 1;
        if depth == rhs.len() {
            if pos == end {
                out.push(acc.clone());
            }
            return;
        }
        match &rhs[depth] {
            Symbol::Terminal(name) => {
                if pos < end && self.tokens[pos].ty == *name {
                    acc.push(pos + 1);
                    self.partitions(rhs, pos + 1, end, acc, out);
                    acc.pop();
                }
            }
            Symbol::NonTerminal(name) => {
                for next in pos..=end {
                    if self.by_symbol.contains_key(&(pos, next, *name)) {
                        acc.push(next);
                        self.partitions(rhs, next, end, acc, out);
                        acc.pop();
                    }
                }
            }
        }
    }

    /// Idempotent insertion keyed by the full edge (production + bounds).
    fn insert(&mut self, lhs: &'gr str, edge: Edge) -> bool {
        if self.seen.contains(&edge) {
            return false;
        }
        self.seen.insert(edge.clone());
        let id = self.edges.len();
        self.by_symbol
            .entry((edge.span.start, edge.span.end, lhs))
            .or_default()
            .push(id);
        self.edges.push(edge);
        true
    }

    /// All edges deriving `symbol` over exactly `start .. end`.
    pub fn edges_over(&self, start: usize, end: usize, symbol: &'gr str) -> &[EdgeId] {
        self.by_symbol
            .get(&(start, end, symbol))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn accepted(&self) -> bool {
        !self
            .edges_over(0, self.tokens.len(), self.grammar.start)
            .is_empty()
    }

    #[allow(dead_code)]
    pub fn print_chart(&self) {
        for edge in &self.edges {
            let prod = &self.grammar.productions[edge.prod];
            let rhs: Vec<String> = prod.rhs.iter().map(|s| s.to_string()).collect();
            println!(
                "{} {} -> {}  bounds {:?}",
                edge.span,
                prod.lhs,
                rhs.join(" "),
                edge.bounds
            );
        }
    }
}
