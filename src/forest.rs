use std::collections::HashSet;
use std::fmt;

use crate::lexer::Token;
use crate::recognizer::{Chart, EdgeId, Production, Symbol};

/// One concrete derivation. Internal nodes carry the production used (by
/// value for display and by index for identity, so two textually equal
/// productions still count as different derivations). An epsilon node is a
/// `Node` with no children.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParseTree<'gr, 'inp> {
    Leaf(Token<'inp>),
    Node {
        prod: usize,
        rule: Production<'gr>,
        children: Vec<ParseTree<'gr, 'inp>>,
    },
}

impl<'gr, 'inp> ParseTree<'gr, 'inp> {
    pub fn root_label(&self) -> &str {
        match self {
            ParseTree::Leaf(tok) => tok.ty,
            ParseTree::Node { rule, .. } => rule.lhs,
        }
    }

    pub fn children(&self) -> &[ParseTree<'gr, 'inp>] {
        match self {
            ParseTree::Leaf(_) => &[],
            ParseTree::Node { children, .. } => children,
        }
    }

    /// The yield: leaf tokens left to right.
    pub fn leaves(&self) -> Vec<&Token<'inp>> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'s>(&'s self, out: &mut Vec<&'s Token<'inp>>) {
        match self {
            ParseTree::Leaf(tok) => out.push(tok),
            ParseTree::Node { children, .. } => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
        }
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = "  ".repeat(depth);
        match self {
            ParseTree::Leaf(tok) => writeln!(f, "{}{}({})", pad, tok.ty, tok.value),
            ParseTree::Node { rule, children, .. } => {
                if children.is_empty() {
                    writeln!(f, "{}{} ε", pad, rule.lhs)
                } else {
                    writeln!(f, "{}{}", pad, rule.lhs)?;
                    for child in children {
                        child.write_indented(f, depth + 1)?;
                    }
                    Ok(())
                }
            }
        }
    }
}

impl fmt::Display for ParseTree<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

impl<'gr, 'inp> Chart<'gr, 'inp> {
    /// Every distinct parse tree for the start symbol over the whole input.
    pub fn trees(&self) -> Vec<ParseTree<'gr, 'inp>> {
        self.trees_up_to(None)
    }

    /// Like `trees`, stopping once `limit` distinct trees are collected.
    pub fn trees_up_to(&self, limit: Option<usize>) -> Vec<ParseTree<'gr, 'inp>> {
        let mut out = Vec::new();
        let mut distinct = HashSet::new();
        let roots = self.edges_over(0, self.tokens.len(), self.grammar.start);
        for &root in roots {
            let mut path = HashSet::new();
            for tree in self.expand(root, &mut path) {
                if distinct.insert(tree.clone()) {
                    out.push(tree);
                }
                if limit.is_some_and(|max| out.len() >= max) {
                    return out;
                }
            }
        }
        out
    }

    /// Materialize every tree an edge stands for. Where a child sub-span has
    /// several edges, the expansion branches and the children are combined
    /// as a cross product. `path` holds the edges currently being expanded:
    /// re-entering one would mean a derivation cycle (infinitely many
    /// trees), which is cut here.
    fn expand(
        &self,
        id: EdgeId,
        path: &mut HashSet<EdgeId>,
    ) -> Vec<ParseTree<'gr, 'inp>> {
        if !path.insert(id) {
            return Vec::new();
        }
        let edge = &self.edges[id];
        let prod = &self.grammar.productions[edge.prod];
        let mut slots: Vec<Vec<ParseTree<'gr, 'inp>>> = Vec::with_capacity(prod.rhs.len());
        for (m, sym) in prod.rhs.iter().enumerate() {
            let child = edge.child_span(m);
            match sym {
                Symbol::Terminal(_) => {
                    slots.push(vec![ParseTree::Leaf(self.tokens[child.start].clone())]);
                }
                Symbol::NonTerminal(name) => {
                    let mut options = Vec::new();
                    for &sub in self.edges_over(child.start, child.end, *name) {
                        options.extend(self.expand(sub, path));
                    }
                    slots.push(options);
                }
            }
        }
        path.remove(&id);
        cross(slots)
            .into_iter()
            .map(|children| ParseTree::Node {
                prod: edge.prod,
                rule: prod.clone(),
                children,
            })
            .collect()
    }
}

/// Cross product of the per-slot alternatives. An empty slot (a starved
/// cyclic child) empties the whole product.
fn cross<'gr, 'inp>(
    slots: Vec<Vec<ParseTree<'gr, 'inp>>>,
) -> Vec<Vec<ParseTree<'gr, 'inp>>> {
    let mut acc = vec![Vec::new()];
    for slot in &slots {
        let mut next = Vec::with_capacity(acc.len() * slot.len());
        for prefix in &acc {
            for option in slot {
                let mut row = prefix.clone();
                row.push(option.clone());
                next.push(row);
            }
        }
        acc = next;
    }
    acc
}

#[cfg(test)]
mod forest_tests {
    use super::*;
    use crate::lexer::TokenValue;
    use crate::recognizer::Grammar;

    fn tok(ty: &'static str) -> Token<'static> {
        Token::new(ty, TokenValue::Str(ty), 1, 0)
    }

    fn parse<'gr, 'inp>(
        grammar: &'gr Grammar<'gr>,
        tokens: &'inp [Token<'inp>],
    ) -> Vec<ParseTree<'gr, 'inp>> {
        let mut chart = Chart::new(grammar, tokens);
        chart.recognize();
        chart.trees()
    }

    fn grammar_from(text: &'static str) -> Grammar<'static> {
        use chumsky::Parser;
        let rules = crate::grammar_parser::rules()
            .parse(text)
            .into_output()
            .expect("notation should parse");
        Grammar::from_rules(&rules).expect("grammar should validate")
    }

    #[test]
    fn balanced_pairs_yield_one_tree() {
        let grammar = grammar_from("S -> 'a' S 'b' |");
        let tokens = [tok("a"), tok("a"), tok("b"), tok("b")];
        let trees = parse(&grammar, &tokens);
        assert_eq!(trees.len(), 1);
        let types: Vec<&str> = trees[0].leaves().iter().map(|t| t.ty).collect();
        assert_eq!(types, vec!["a", "a", "b", "b"]);
        assert_eq!(trees[0].root_label(), "S");
    }

    #[test]
    fn unbalanced_pairs_yield_no_tree() {
        let grammar = grammar_from("S -> 'a' S 'b' |");
        let tokens = [tok("a"), tok("b"), tok("b")];
        assert!(parse(&grammar, &tokens).is_empty());
    }

    #[test]
    fn duplicate_productions_are_distinct_derivations() {
        let grammar = grammar_from("A -> 'x' | 'x'");
        let tokens = [tok("x")];
        let trees = parse(&grammar, &tokens);
        assert_eq!(trees.len(), 2, "textually equal alternatives still count twice");
    }

    #[test]
    fn ambiguous_arithmetic_yields_both_associations() {
        let grammar = grammar_from("E -> E '+' E | 'n'");
        let tokens = [tok("n"), tok("+"), tok("n"), tok("+"), tok("n")];
        let trees = parse(&grammar, &tokens);
        assert_eq!(trees.len(), 2);
        for tree in &trees {
            let types: Vec<&str> = tree.leaves().iter().map(|t| t.ty).collect();
            assert_eq!(types, vec!["n", "+", "n", "+", "n"]);
        }
    }

    #[test]
    fn epsilon_chain_yields_the_acyclic_tree() {
        let grammar = grammar_from("A -> B\nB -> A |");
        let trees = parse(&grammar, &[]);
        assert_eq!(trees.len(), 1);
        assert_eq!(trees[0].root_label(), "A");
        assert!(trees[0].leaves().is_empty());
    }

    #[test]
    fn symmetric_epsilon_splits_are_distinct_trees() {
        // A -> B B, B -> 'x' | ε over one x: the x can sit in either slot.
        let grammar = grammar_from("A -> B B\nB -> 'x' |");
        let tokens = [tok("x")];
        let trees = parse(&grammar, &tokens);
        assert_eq!(trees.len(), 2);
    }

    #[test]
    fn repeated_enumeration_is_deterministic() {
        let grammar = grammar_from("E -> E '+' E | 'n'");
        let tokens = [tok("n"), tok("+"), tok("n"), tok("+"), tok("n")];
        let mut first = parse(&grammar, &tokens);
        let mut second = parse(&grammar, &tokens);
        first.sort_by_key(|t| t.to_string());
        second.sort_by_key(|t| t.to_string());
        assert_eq!(first, second);
    }

    #[test]
    fn first_tree_mode_stops_early() {
        let grammar = grammar_from("E -> E '+' E | 'n'");
        let tokens = [tok("n"), tok("+"), tok("n"), tok("+"), tok("n")];
        let mut chart = Chart::new(&grammar, &tokens);
        chart.recognize();
        assert_eq!(chart.trees_up_to(Some(1)).len(), 1);
    }

    #[test]
    fn pretty_print_includes_epsilon_marker() {
        let grammar = grammar_from("S -> 'a' S 'b' |");
        let tokens = [tok("a"), tok("b")];
        let trees = parse(&grammar, &tokens);
        assert_eq!(trees.len(), 1);
        let rendered = trees[0].to_string();
        assert!(rendered.contains("S ε"), "got:\n{}", rendered);
        assert!(rendered.contains("a(a)"), "got:\n{}", rendered);
    }
}
