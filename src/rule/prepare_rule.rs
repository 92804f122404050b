use super::target::parse_target;
use super::{Change, Rule, RuleError};
use crate::condition::{top_level_words, Environment};
use crate::error::CompileResult;
use crate::machine::Label;
use crate::pattern::{lex, Lexeme};
use crate::variables::VariableStore;

/// Compile a source token into the labels of its elements. `0` has none and
/// matches the empty span.
fn parse_source(token: &str, store: &VariableStore) -> CompileResult<Vec<Label>> {
  if token == "0" {
    return Ok(Vec::new());
  }
  let model = store.model();
  let illegal = || RuleError::IllegalSource(token.to_string());
  (lex(token, store)?.into_iter())
    .map(|lexeme| match lexeme {
      Lexeme::Symbol(s) => Ok(Label::Literal(vec![model.resolve(&s)])),
      Lexeme::Bundle(b) => Ok(Label::Literal(vec![model.resolve_bundle(&b)?])),
      Lexeme::Wildcard => Ok(Label::Wildcard),
      Lexeme::Macro(name) => {
        let alts = store.alternatives(name.as_str())?;
        let alternatives = alts.iter().map(|s| s.as_slice().to_vec()).collect();
        Ok(Label::Macro { name, alternatives })
      },
      _ => Err(illegal().into()),
    })
    .collect()
}

/// Pair up source and target tokens. The sides must have the same length,
/// unless the target is a lone `0` which deletes every source.
fn pair_tokens<'a>(
  text: &str,
  sources: &[&'a str],
  targets: &[&'a str],
) -> Result<Vec<(&'a str, &'a str)>, RuleError> {
  if sources.is_empty() || targets.is_empty() {
    return Err(RuleError::EmptySide(text.to_string()));
  }
  let zeros = |side: &[&str]| side.iter().filter(|t| **t == "0").count();
  if 1 < zeros(sources) || 1 < zeros(targets) {
    return Err(RuleError::MultipleZeros(text.to_string()));
  }
  match targets {
    ["0"] => Ok(sources.iter().map(|s| (*s, "0")).collect()),
    _ if sources.len() == targets.len() =>
      Ok(sources.iter().copied().zip(targets.iter().copied()).collect()),
    _ => Err(RuleError::CountMismatch {
      rule: text.to_string(),
      source: sources.len(),
      target: targets.len(),
    }),
  }
}

impl Rule {
  /// Parse `sources > targets` with an optional `/ environment`. Macros are
  /// resolved from the store as it is now.
  pub fn parse(text: &str, store: &VariableStore) -> CompileResult<Self> {
    let text = text.trim();
    let (change, env) = text.split_once('/').unwrap_or((text, ""));
    let arrow = || RuleError::ArrowCount(text.to_string());
    if change.matches('>').count() != 1 {
      return Err(arrow().into());
    }
    let (src, tgt) = change.split_once('>').ok_or_else(arrow)?;
    let sources = top_level_words(src);
    let targets = top_level_words(tgt);
    let changes = (pair_tokens(text, &sources, &targets)?.into_iter())
      .map(|(source, target)| {
        let labels = parse_source(source, store)?;
        let items = parse_target(target, &labels, store)?;
        Ok(Change::new(labels, items, format!("{source} > {target}")))
      })
      .collect::<CompileResult<Vec<_>>>()?;
    let environment = Environment::parse(env, store)?;
    tracing::debug!(rule = text, changes = changes.len(), "compiled rule");
    Ok(Self::new(text.to_string(), store.model().clone(), changes, environment))
  }
}

#[cfg(test)]
mod test {
  use crate::error::{CompileError, ErrorKind};
  use crate::model::FeatureModel;
  use crate::rule::{Rule, RuleError};
  use crate::variables::VariableStore;

  fn store() -> VariableStore {
    let mut store = VariableStore::new(&FeatureModel::empty());
    store.add("C = p t k").unwrap();
    store.add("G = b d g").unwrap();
    store.add("N = m n").unwrap();
    store
  }

  #[test]
  fn shapes() {
    let store = store();
    let rule = Rule::parse(" a e > o o / C_ ", &store).unwrap();
    assert_eq!(rule.changes().len(), 2);
    assert_eq!(rule.text(), "a e > o o / C_");
    assert!(Rule::parse("a b > 0", &store).is_ok());
    assert!(Rule::parse("0 > e / #_", &store).is_ok());
    assert!(Rule::parse("C > $G1", &store).is_ok());
  }

  #[test]
  fn rejected() {
    let store = store();
    let cases: [(&str, ErrorKind); 12] = [
      ("a b", ErrorKind::Rule),
      ("a e > o", ErrorKind::Rule),
      ("a > b > c", ErrorKind::Rule),
      (" > b", ErrorKind::Rule),
      ("a b c > d e", ErrorKind::Rule),
      ("0 0 > a b", ErrorKind::Rule),
      ("a > $2", ErrorKind::Rule),
      ("a > $", ErrorKind::Rule),
      ("CN > $N1", ErrorKind::Rule),
      ("a > $Q1", ErrorKind::Pattern),
      ("a# > b", ErrorKind::Rule),
      ("a > b / c", ErrorKind::Pattern),
    ];
    for (text, kind) in cases {
      let err = Rule::parse(text, &store).expect_err(text);
      assert_eq!(err.kind(), kind, "{text}: {err}");
    }
    assert_eq!(
      Rule::parse("a b c > d e", &store).unwrap_err(),
      CompileError::Rule(RuleError::CountMismatch {
        rule: "a b c > d e".to_string(),
        source: 3,
        target: 2
      })
    );
  }

  #[test]
  fn bundles_may_contain_spaces() {
    let mut b = FeatureModel::builder();
    b.add_feature("x").unwrap().add_feature("y").unwrap();
    let store = VariableStore::new(&b.build());
    let rule = Rule::parse("[+x, -y] > a / _[ -x ]", &store).unwrap();
    assert_eq!(rule.changes().len(), 1);
    let rule = Rule::parse("[+x] [ -y] > a b", &store).unwrap();
    assert_eq!(rule.changes().len(), 2);
  }
}
