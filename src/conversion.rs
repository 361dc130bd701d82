use crate::{
    grammar_parser::{self, Rule},
    recognizer::{self, Grammar, GrammarError, Production},
};

impl<'gr> From<&grammar_parser::Symbol<'gr>> for recognizer::Symbol<'gr> {
    fn from(sym: &grammar_parser::Symbol<'gr>) -> Self {
        match sym {
            grammar_parser::Symbol::Terminal(s) => recognizer::Symbol::Terminal(s.text),
            grammar_parser::Symbol::NonTerminal(s) => recognizer::Symbol::NonTerminal(s.text),
        }
    }
}

impl<'gr> Grammar<'gr> {
    /// Lower notation rules into a validated grammar. Each alternative
    /// becomes its own production; the start symbol is the first rule's
    /// left-hand side.
    pub fn from_rules(rules: &[Rule<'gr>]) -> Result<Self, GrammarError> {
        let start = rules.first().map(|r| r.lhs.text).ok_or(GrammarError::Empty)?;
        let mut productions = Vec::new();
        for rule in rules {
            for alternative in &rule.alternatives {
                productions.push(Production {
                    lhs: rule.lhs.text,
                    rhs: alternative.iter().map(Into::into).collect(),
                });
            }
        }
        Grammar::new(start, productions)
    }
}

#[cfg(test)]
mod conversion_tests {
    use chumsky::Parser;

    use crate::grammar_parser::rules;
    use crate::recognizer::{Grammar, GrammarError, Symbol};

    #[test]
    fn alternatives_flatten_into_productions() {
        let parsed = rules()
            .parse("S -> 'a' S 'b' |\nT -> S")
            .into_output()
            .expect("notation should parse");
        let grammar = Grammar::from_rules(&parsed).expect("grammar should validate");
        assert_eq!(grammar.start, "S");
        assert_eq!(grammar.productions.len(), 3);
        assert_eq!(grammar.prods_for("S").len(), 2);
        assert!(grammar.productions[1].rhs.is_empty());
        assert_eq!(
            grammar.productions[2].rhs,
            vec![Symbol::NonTerminal("S")]
        );
    }

    #[test]
    fn undefined_nonterminal_fails_lowering() {
        let parsed = rules()
            .parse("S -> Missing")
            .into_output()
            .expect("notation should parse");
        let err = Grammar::from_rules(&parsed).expect_err("lowering should fail");
        assert_eq!(
            err,
            GrammarError::UndefinedNonTerminal {
                symbol: "Missing".to_string(),
                lhs: "S".to_string(),
            }
        );
    }
}
