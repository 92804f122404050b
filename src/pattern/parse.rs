use std::sync::Arc;

use super::lexer::{lex, render, Lexeme};
use super::{ExprKind, Expression, PatternError, Quantifier, Terminal};
use crate::error::CompileResult;
use crate::model::FeatureModel;
use crate::variables::VariableStore;

/// Parse pattern text into a sequence of nodes. Macro names are recognized
/// from the store, symbols and bundles are resolved against its model.
pub fn parse_pattern(text: &str, store: &VariableStore) -> CompileResult<Vec<Expression>> {
  let lexemes = lex(text, store)?;
  parse_seq(&lexemes, store.model())
}

fn closer_of(open: char) -> char {
  match open {
    '{' => '}',
    _ => ')',
  }
}

/// Index of the bracket that opens the one at `close`
fn find_opener(lexemes: &[Lexeme], close: usize, closer: char) -> Result<usize, PatternError> {
  let mut depth = 0usize;
  for idx in (0..close).rev() {
    match &lexemes[idx] {
      Lexeme::Close(_) => depth += 1,
      Lexeme::Open(c) if depth == 0 => {
        return if closer_of(*c) == closer {
          Ok(idx)
        } else {
          Err(PatternError::UnmatchedBracket(render(&lexemes[idx..=close])))
        };
      },
      Lexeme::Open(_) => depth -= 1,
      _ => (),
    }
  }
  Err(PatternError::UnmatchedBracket(render(&lexemes[..=close])))
}

/// Split the inside of `{ }` on whitespace that isn't nested any deeper
fn alternatives(lexemes: &[Lexeme]) -> Vec<&[Lexeme]> {
  let mut out = Vec::new();
  let mut depth = 0usize;
  let mut last = 0;
  for (idx, lx) in lexemes.iter().enumerate() {
    match lx {
      Lexeme::Open(_) => depth += 1,
      Lexeme::Close(_) => depth = depth.saturating_sub(1),
      Lexeme::Space if depth == 0 => {
        out.push(&lexemes[last..idx]);
        last = idx + 1;
      },
      _ => (),
    }
  }
  out.push(&lexemes[last..]);
  out.retain(|alt| !alt.is_empty());
  out
}

fn bracketed(
  open: char,
  inner: &[Lexeme],
  whole: &[Lexeme],
  model: &Arc<FeatureModel>,
) -> CompileResult<ExprKind> {
  if open == '(' {
    return Ok(ExprKind::Group(parse_seq(inner, model)?));
  }
  let alts = alternatives(inner);
  if alts.is_empty() {
    return Err(PatternError::EmptyAlternation(render(whole)).into());
  }
  let alts = alts.into_iter().map(|alt| {
    let mut children = parse_seq(alt, model)?;
    Ok(match children.len() {
      1 => children.remove(0),
      _ => Expression::new(ExprKind::Group(children)),
    })
  });
  Ok(ExprKind::Alternation(alts.collect::<CompileResult<_>>()?))
}

/// The sequence is read from the right so that a quantifier is always seen
/// before the unit it belongs to, and a `!` right after it.
fn parse_seq(lexemes: &[Lexeme], model: &Arc<FeatureModel>) -> CompileResult<Vec<Expression>> {
  let dangling = || PatternError::DanglingMetachar(render(lexemes));
  let mut out = Vec::new();
  let mut pending: Option<Quantifier> = None;
  let mut idx = lexemes.len();
  while idx > 0 {
    idx -= 1;
    let (kind, start) = match &lexemes[idx] {
      Lexeme::Space => continue,
      Lexeme::Quantifier(q) => {
        if pending.replace(*q).is_some() {
          return Err(dangling().into());
        }
        continue;
      },
      Lexeme::Not => return Err(dangling().into()),
      Lexeme::Open(_) => return Err(PatternError::UnmatchedBracket(render(lexemes)).into()),
      Lexeme::Close(c) => {
        let open = find_opener(lexemes, idx, *c)?;
        let open_char = if *c == '}' { '{' } else { '(' };
        (bracketed(open_char, &lexemes[open + 1..idx], &lexemes[open..=idx], model)?, open)
      },
      Lexeme::Boundary => (ExprKind::Terminal(Terminal::Boundary), idx),
      Lexeme::Wildcard => (ExprKind::Terminal(Terminal::Wildcard), idx),
      Lexeme::Macro(name) => (ExprKind::Terminal(Terminal::Macro(name.clone())), idx),
      Lexeme::Symbol(s) => (ExprKind::Terminal(Terminal::Literal(model.resolve(s))), idx),
      Lexeme::Bundle(b) =>
        (ExprKind::Terminal(Terminal::Literal(model.resolve_bundle(b)?)), idx),
    };
    let mut expr = Expression::new(kind).quantified(pending.take().unwrap_or_default());
    idx = start;
    if idx > 0 && lexemes[idx - 1] == Lexeme::Not {
      expr = expr.negated();
      idx -= 1;
    }
    out.push(expr);
  }
  if pending.is_some() {
    return Err(dangling().into());
  }
  out.reverse();
  Ok(out)
}

#[cfg(test)]
mod test {
  use super::parse_pattern;
  use crate::error::{CompileError, ErrorKind};
  use crate::model::FeatureModel;
  use crate::pattern::{pattern_text, ExprKind, PatternError, Quantifier, Terminal};
  use crate::variables::VariableStore;

  fn store() -> VariableStore {
    let mut store = VariableStore::new(&FeatureModel::empty());
    store.add("V = a e i").unwrap();
    store
  }

  #[test]
  fn structure() {
    let store = store();
    let p = parse_pattern("#(ab)*{c Vd}!e?", &store).unwrap();
    assert_eq!(p.len(), 4);
    assert!(p[0].is_boundary());
    assert_eq!(p[1].quantifier, Quantifier::Star);
    assert!(matches!(&p[1].kind, ExprKind::Group(g) if g.len() == 2));
    let ExprKind::Alternation(alts) = &p[2].kind else { panic!("{:?}", p[2]) };
    assert_eq!(alts.len(), 2);
    assert!(matches!(&alts[1].kind, ExprKind::Group(g)
      if matches!(&g[0].kind, ExprKind::Terminal(Terminal::Macro(m)) if m.as_str() == "V")));
    assert!(p[3].negative);
    assert_eq!(p[3].quantifier, Quantifier::Optional);
    assert_eq!(pattern_text(&p), "#(ab)*{c Vd}!e?");
  }

  #[test]
  fn nested_alternation() {
    let p = parse_pattern("{a (b {c d})}+", &store()).unwrap();
    // the group spanning a whole alternative is redundant
    assert_eq!(pattern_text(&p), "{a b{c d}}+");
  }

  #[test]
  fn malformed() {
    let store = store();
    let cases = [
      ("(ab", "unclosed group"),
      ("ab)", "stray closer"),
      ("{a b)", "mismatched pair"),
      ("a**", "double quantifier"),
      ("*a", "leading quantifier"),
      ("a!", "trailing negation"),
      ("!", "bare negation"),
      ("{}", "empty alternation"),
      ("{ }", "blank alternation"),
    ];
    for (text, why) in cases {
      let err = parse_pattern(text, &store).expect_err(why);
      assert_eq!(err.kind(), ErrorKind::Pattern, "{why}");
    }
    assert_eq!(
      parse_pattern("x{}", &store).unwrap_err(),
      CompileError::Pattern(PatternError::EmptyAlternation("{}".to_string()))
    );
  }
}
