//! Pattern text and its syntax tree
mod expression;
mod lexer;
mod parse;
mod pattern_error;

pub use expression::{pattern_text, ExprKind, Expression, Quantifier, Terminal};
pub use lexer::{lex, render, Lexeme};
pub use parse::parse_pattern;
pub use pattern_error::PatternError;
