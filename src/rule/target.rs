use std::ops::Range;
use std::sync::Arc;

use crate::error::CompileResult;
use crate::machine::Label;
use crate::model::{Segment, Segmenter, Sequence};
use crate::pattern::PatternError;
use crate::rule::RuleError;
use crate::variables::VariableStore;

/// What one element of a source token consumed
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Capture {
  /// Span in the word
  pub range: Range<usize>,
  /// Index of the macro alternative, if the element was a macro
  pub alternative: Option<usize>,
}

/// One element of a target token
#[derive(Clone, Debug)]
pub enum TargetItem {
  /// A segment inserted as is
  Literal(Segment),
  /// `$n`, the segments of a source element
  Capture(usize),
  /// `$Gn`, the alternative of `G` parallel to the one the source element
  /// matched
  ClassCapture {
    /// Source element
    index: usize,
    /// Alternatives of `G`
    class: Arc<[Sequence]>,
  },
  /// A bundle, written over the source element at the same position
  Overwrite {
    /// Source element
    index: usize,
    /// Features to write
    bundle: Segment,
  },
}
impl TargetItem {
  /// Append the segments this element produces
  pub fn render(&self, word: &[Segment], captures: &[Capture], out: &mut Vec<Segment>) {
    match self {
      Self::Literal(seg) => out.push(seg.clone()),
      Self::Capture(index) => out.extend_from_slice(&word[captures[*index].range.clone()]),
      Self::ClassCapture { index, class } => {
        let cap = &captures[*index];
        match cap.alternative.and_then(|k| class.get(k)) {
          Some(alt) => out.extend(alt.iter().cloned()),
          None => out.extend_from_slice(&word[cap.range.clone()]),
        }
      },
      Self::Overwrite { index, bundle } => {
        let span = &word[captures[*index].range.clone()];
        out.extend(span.iter().map(|seg| seg.altered(bundle)))
      },
    }
  }
}

fn class_capture(
  token: &str,
  index: usize,
  name: &str,
  element: &Label,
  store: &VariableStore,
) -> CompileResult<TargetItem> {
  let class = store.alternatives(name)?;
  match element {
    Label::Macro { alternatives, .. } if alternatives.len() == class.len() =>
      Ok(TargetItem::ClassCapture { index, class }),
    _ => Err(RuleError::ClassMismatch(token.to_string()).into()),
  }
}

/// Parse a target token against the elements of its source token. `0`
/// produces nothing.
pub fn parse_target(
  token: &str,
  source: &[Label],
  store: &VariableStore,
) -> CompileResult<Vec<TargetItem>> {
  if token == "0" {
    return Ok(Vec::new());
  }
  let model = store.model();
  let segmenter = Segmenter::new(model);
  let bad_ref = || RuleError::BadBackReference(token.to_string());
  let mut items = Vec::new();
  let mut rest = token;
  while let Some(c) = rest.chars().next() {
    match c {
      '$' => {
        let after = &rest[1..];
        let class = store.names().filter(|n| after.starts_with(n)).max_by_key(|n| n.len());
        if class.is_none() {
          let letters = after.find(|c: char| !c.is_alphabetic()).unwrap_or(after.len());
          if letters > 0 {
            return Err(PatternError::UnknownMacro(after[..letters].to_string()).into());
          }
        }
        let after = &after[class.map_or(0, str::len)..];
        let digits = after.find(|c: char| !c.is_ascii_digit()).unwrap_or(after.len());
        let index = (after[..digits].parse::<usize>().ok())
          .and_then(|n| n.checked_sub(1))
          .filter(|i| *i < source.len())
          .ok_or_else(bad_ref)?;
        items.push(match class {
          None => TargetItem::Capture(index),
          Some(name) => class_capture(token, index, name, &source[index], store)?,
        });
        rest = &after[digits..];
      },
      '[' => {
        let len = (rest.find(']'))
          .ok_or_else(|| PatternError::UnmatchedBracket(token.to_string()))?;
        let bundle = model.resolve_bundle(&rest[..=len])?;
        let index = items.len();
        if index >= source.len() {
          return Err(bad_ref().into());
        }
        items.push(TargetItem::Overwrite { index, bundle });
        rest = &rest[len + 1..];
      },
      _ => {
        let end = rest.find(|c| c == '$' || c == '[').unwrap_or(rest.len());
        let symbols = segmenter.split(&rest[..end]).into_iter();
        items.extend(symbols.map(|s| TargetItem::Literal(model.resolve(s))));
        rest = &rest[end..];
      },
    }
  }
  Ok(items)
}
