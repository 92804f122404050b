use std::fmt;

use intern_all::{i, Tok};
use itertools::Itertools;

use super::{PatternError, Quantifier};
use crate::variables::VariableStore;

/// An atomic piece of pattern text
#[derive(Clone, Debug, PartialEq)]
pub enum Lexeme {
  /// `(` or `{`
  Open(char),
  /// `)` or `}`
  Close(char),
  /// `?`, `*` or `+`
  Quantifier(Quantifier),
  /// `!`
  Not,
  /// A run of whitespace; only significant inside `{ }`
  Space,
  /// `#`
  Boundary,
  /// `.`
  Wildcard,
  /// `[...]`, verbatim
  Bundle(String),
  /// Name of a defined macro
  Macro(Tok<String>),
  /// Any other segment symbol
  Symbol(String),
}
impl fmt::Display for Lexeme {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Open(c) | Self::Close(c) => write!(f, "{c}"),
      Self::Quantifier(q) => write!(f, "{q}"),
      Self::Not => write!(f, "!"),
      Self::Space => write!(f, " "),
      Self::Boundary => write!(f, "#"),
      Self::Wildcard => write!(f, "."),
      Self::Bundle(s) | Self::Symbol(s) => write!(f, "{s}"),
      Self::Macro(t) => write!(f, "{}", t.as_str()),
    }
  }
}

/// Reassemble lexemes for error messages
#[must_use]
pub fn render(lexemes: &[Lexeme]) -> String { lexemes.iter().join("") }

fn is_special(c: char) -> bool { "(){}[]?*+!#.".contains(c) || c.is_whitespace() }

/// Break pattern text into lexemes. Runs of ordinary characters are split by
/// the store's segmenter, so macro names and multi-character symbols stay
/// whole.
pub fn lex(text: &str, store: &VariableStore) -> Result<Vec<Lexeme>, PatternError> {
  let segmenter = store.segmenter();
  let mut out = Vec::new();
  let mut pos = 0;
  while let Some(c) = text[pos..].chars().next() {
    let lexeme = match c {
      '(' | '{' => Lexeme::Open(c),
      ')' | '}' => Lexeme::Close(c),
      '?' => Lexeme::Quantifier(Quantifier::Optional),
      '*' => Lexeme::Quantifier(Quantifier::Star),
      '+' => Lexeme::Quantifier(Quantifier::Plus),
      '!' => Lexeme::Not,
      '#' => Lexeme::Boundary,
      '.' => Lexeme::Wildcard,
      ']' => return Err(PatternError::UnmatchedBracket(text.trim().to_string())),
      '[' => {
        let len = (text[pos..].find(']'))
          .ok_or_else(|| PatternError::UnmatchedBracket(text.trim().to_string()))?;
        out.push(Lexeme::Bundle(text[pos..=pos + len].to_string()));
        pos += len + 1;
        continue;
      },
      c if c.is_whitespace() => {
        if !matches!(out.last(), None | Some(Lexeme::Space)) {
          out.push(Lexeme::Space);
        }
        pos += c.len_utf8();
        continue;
      },
      _ => {
        let end = text[pos..].find(is_special).map_or(text.len(), |e| pos + e);
        for sym in segmenter.split(&text[pos..end]) {
          out.push(if store.contains(sym) {
            Lexeme::Macro(i(sym))
          } else {
            Lexeme::Symbol(sym.to_string())
          });
        }
        pos = end;
        continue;
      },
    };
    out.push(lexeme);
    pos += c.len_utf8();
  }
  if out.last() == Some(&Lexeme::Space) {
    out.pop();
  }
  Ok(out)
}
