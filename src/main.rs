use std::io::{self, Read};

use colored::*;

use ambiparse::{Ambiparse, LexRule, Lexer, ParseTree, ReservedWords};

/// Grammar for a tiny Java-like statement language. The first rule's
/// left-hand side is the start symbol.
const GRAMMAR: &str = "
Main -> 'public' 'static' 'void' 'main' 'L_PAR' 'R_PAR' Main_scope
Main_scope -> 'L_CUR' Scope 'R_CUR'

Scope -> Scope_prime | Statements
Scope_prime -> 'L_CUR' Statements 'R_CUR'

Statements -> Statement Statements_prime
Statements_prime -> Statements | Scope_prime |

Statement -> 'END' | Expression 'END' | Num_Assignment 'END' | String_Assignment 'END'

Expression -> Term Expression_prime
Expression_prime -> Operator Term Expression_prime | Comp_Operator Term Expression_prime |

Term -> 'L_PAR' Expression 'R_PAR' | 'NUMBER' | 'ID' | 'TRUE' | 'FALSE'

Comp_Operator -> 'AMPERSAND' 'AMPERSAND' | 'PIPE' 'PIPE' | 'ASSIGN' 'ASSIGN' | 'NOT' 'ASSIGN'
Comp_Operator -> 'MORE' | 'MORE' 'ASSIGN' | 'LESS' | 'LESS' 'ASSIGN'

Operator -> 'POW' | 'PLUS' | 'MINUS' | 'DIV' | 'MULT'

Num_Assignment -> 'NUMTYPE' 'ID' 'ASSIGN' Expression
String_Assignment -> 'String' 'ID' 'ASSIGN' String_like
String_like -> 'QUOT' Valid_Chars 'QUOT'

Valid_Chars -> Char Valid_Chars_prime
Valid_Chars_prime -> Valid_Chars |

Char -> 'ID'
";

/// Scan rules in priority order: operators and brackets first, then
/// literals and identifiers. Swapping this order changes which type wins on
/// single-character matches, so it stays fixed.
fn lex_rules() -> Vec<LexRule> {
    vec![
        LexRule::new("NOT", r"\!"),
        LexRule::new("PIPE", r"\|"),
        LexRule::new("AMPERSAND", r"\&"),
        LexRule::new("TRUE", r"true"),
        LexRule::new("FALSE", r"false"),
        LexRule::new("POW", r"\^"),
        LexRule::new("DIV", r"/"),
        LexRule::new("MULT", r"\*"),
        LexRule::new("MINUS", r"\-"),
        LexRule::new("PLUS", r"\+"),
        LexRule::new("QUOT", "\""),
        LexRule::new("DOT", r"\."),
        LexRule::new("L_BRKT", r"\["),
        LexRule::new("R_BRKT", r"\]"),
        LexRule::new("L_PAR", r"\("),
        LexRule::new("R_PAR", r"\)"),
        LexRule::new("L_CUR", r"\{"),
        LexRule::new("R_CUR", r"\}"),
        LexRule::new("NUMBER", r"\d+(\.\d*)?"),
        LexRule::new("ASSIGN", r"="),
        LexRule::new("LESS", r"<"),
        LexRule::new("MORE", r">"),
        LexRule::new("END", r";"),
        LexRule::new("ID", r"\$*[\$_a-zA-Z]+[\$_a-zA-Z\d]*\$*"),
        LexRule::new("SKIP", r"\s+"),
        LexRule::new("MISMATCH", r"."),
    ]
}

fn reserved_words() -> ReservedWords {
    ReservedWords::new(
        &["int", "double", "short", "float"],
        &["enum", "char", "String", "boolean"],
        &[
            "public",
            "static",
            "void",
            "main",
            "abstract",
            "continue",
            "for",
            "new",
            "switch",
            "assert",
            "default",
            "package",
            "synchronized",
            "do",
            "goto",
            "private",
            "this",
            "break",
            "implements",
            "throw",
            "byte",
            "import",
            "throws",
            "case",
            "instanceof",
            "return",
            "transient",
            "catch",
            "extends",
            "try",
            "final",
            "interface",
            "class",
            "finally",
            "strictfp",
            "volatile",
            "const",
            "native",
            "super",
            "while",
            "_",
        ],
    )
}

fn print_tree(tree: &ParseTree, indent: usize) {
    let pad = "  ".repeat(indent);
    match tree {
        ParseTree::Leaf(tok) => {
            println!("{}{} {}", pad, tok.ty.yellow(), tok.value.to_string().dimmed());
        }
        ParseTree::Node { rule, children, .. } => {
            if children.is_empty() {
                println!("{}{} {}", pad, rule.lhs.blue().bold(), "ε".dimmed());
            } else {
                println!("{}{}", pad, rule.lhs.blue().bold());
                for child in children {
                    print_tree(child, indent + 1);
                }
            }
        }
    }
}

fn main() {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .expect("Failed to read input");

    let engine = match Ambiparse::from_grammar(GRAMMAR) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("{} {}", "grammar error:".red().bold(), e);
            std::process::exit(2);
        }
    };

    let lexer = match Lexer::new(lex_rules(), reserved_words()) {
        Ok(lexer) => lexer,
        Err(e) => {
            eprintln!("{} {}", "lexer error:".red().bold(), e);
            std::process::exit(2);
        }
    };

    let tokens = match lexer.tokenize(&input) {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("{} {}", "lex error:".red().bold(), e);
            std::process::exit(1);
        }
    };

    let trees = engine.parse(&tokens);
    if trees.is_empty() {
        println!("{}", "rejected: no derivation covers the input".red());
        std::process::exit(1);
    }

    for (i, tree) in trees.iter().enumerate() {
        println!("{}", format!("---- tree {} ----", i + 1).bold());
        print_tree(tree, 0);
    }

    if trees.len() == 1 {
        println!("{}", "no ambiguity".green());
    } else {
        println!("{}", format!("{} distinct derivations", trees.len()).yellow());
    }
}
