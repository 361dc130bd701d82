#[cfg(test)]
mod tests_rejections;

use chumsky::{
    prelude::*,
    text::{inline_whitespace, newline},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Str<'gr> {
    pub text: &'gr str,
    pub span: SimpleSpan,
}

impl<'gr> std::ops::Deref for Str<'gr> {
    type Target = &'gr str;
    fn deref(&self) -> &Self::Target {
        &self.text
    }
}

impl<'gr> AsRef<str> for Str<'gr> {
    fn as_ref(&self) -> &str {
        self.text
    }
}

impl<'gr> std::fmt::Display for Str<'gr> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.text.fmt(f)
    }
}

impl<'gr> Str<'gr> {
    pub fn new(text: &'gr str, span: SimpleSpan) -> Self {
        Self { text, span }
    }
}

impl<'gr> PartialEq<str> for Str<'gr> {
    fn eq(&self, other: &str) -> bool {
        self.text == other
    }
}

impl<'gr> PartialEq<&str> for Str<'gr> {
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}

/// Quoted text is a terminal, a bare identifier is a nonterminal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol<'gr> {
    Terminal(Str<'gr>),
    NonTerminal(Str<'gr>),
}

/// One notation line: `LHS -> sym sym | alt | `. An alternative with no
/// symbols is an epsilon production.
#[derive(Debug, Clone)]
pub struct Rule<'gr> {
    pub lhs: Str<'gr>,
    pub alternatives: Vec<Vec<Symbol<'gr>>>,
}

pub fn rules<'gr>() -> impl Parser<'gr, &'gr str, Vec<Rule<'gr>>, extra::Err<Rich<'gr, char>>> {
    rule()
        .padded_by(inline_whitespace())
        .separated_by(newline().repeated().at_least(1))
        .allow_trailing()
        .allow_leading()
        .collect()
}

fn rule<'gr>() -> impl Parser<'gr, &'gr str, Rule<'gr>, extra::Err<Rich<'gr, char>>> {
    ident()
        .then_ignore(just("->").padded_by(inline_whitespace()))
        .then(
            alternative()
                .separated_by(just('|').padded_by(inline_whitespace()))
                .collect(),
        )
        .map(|(lhs, alternatives)| Rule { lhs, alternatives })
}

fn alternative<'gr>() -> impl Parser<'gr, &'gr str, Vec<Symbol<'gr>>, extra::Err<Rich<'gr, char>>>
{
    symbol().padded_by(inline_whitespace()).repeated().collect()
}

fn symbol<'gr>() -> impl Parser<'gr, &'gr str, Symbol<'gr>, extra::Err<Rich<'gr, char>>> {
    choice((terminal(), ident().map(Symbol::NonTerminal)))
}

fn ident<'gr>() -> impl Parser<'gr, &'gr str, Str<'gr>, extra::Err<Rich<'gr, char>>> {
    text::ident().map_with(|s, extra| Str::new(s, extra.span()))
}

fn terminal<'gr>() -> impl Parser<'gr, &'gr str, Symbol<'gr>, extra::Err<Rich<'gr, char>>> {
    let single = just('\'')
        .ignore_then(
            any()
                .filter(|c: &char| *c != '\'' && *c != '\n')
                .repeated()
                .at_least(1)
                .to_slice(),
        )
        .then_ignore(just('\''));
    let double = just('"')
        .ignore_then(
            any()
                .filter(|c: &char| *c != '"' && *c != '\n')
                .repeated()
                .at_least(1)
                .to_slice(),
        )
        .then_ignore(just('"'));
    choice((single, double)).map_with(|s, extra| Symbol::Terminal(Str::new(s, extra.span())))
}
