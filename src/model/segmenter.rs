use std::sync::Arc;

use itertools::Itertools;
use unicode_segmentation::UnicodeSegmentation;

use super::{FeatureModel, Sequence};

/// Spacing modifier letters such as aspiration `ʰ` belong to the segment
/// before them
fn is_modifier(c: char) -> bool {
  matches!(c, '\u{02B0}'..='\u{02FF}' | '\u{1D2C}'..='\u{1D6A}' | '\u{207F}')
}

/// Splits text into segment symbols. Known multi-character symbols win over
/// single graphemes, longest first.
#[derive(Clone, Debug)]
pub struct Segmenter {
  model: Arc<FeatureModel>,
  symbols: Vec<String>,
}
impl Segmenter {
  /// Segmenter that knows the symbols of a model
  #[must_use]
  pub fn new(model: &Arc<FeatureModel>) -> Self {
    Self::with_symbols(model, std::iter::empty::<&str>())
  }

  /// Segmenter that also treats `extra` (typically macro names) as units
  #[must_use]
  pub fn with_symbols<S: AsRef<str>>(
    model: &Arc<FeatureModel>,
    extra: impl IntoIterator<Item = S>,
  ) -> Self {
    let symbols = (model.symbols().map(str::to_string))
      .chain(extra.into_iter().map(|s| s.as_ref().to_string()))
      .filter(|s| !s.is_empty())
      .sorted_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)))
      .dedup()
      .collect();
    Self { model: model.clone(), symbols }
  }

  /// Split into symbols, dropping whitespace
  #[must_use]
  pub fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
    let bounds = (text.grapheme_indices(true).map(|(i, _)| i))
      .chain([text.len()])
      .collect::<Vec<_>>();
    let mut out = Vec::new();
    let mut pos = 0;
    while pos < text.len() {
      let rest = &text[pos..];
      let known = self.symbols.iter().find(|s| {
        rest.starts_with(s.as_str()) && bounds.binary_search(&(pos + s.len())).is_ok()
      });
      let len = match known {
        Some(s) => s.len(),
        None => rest.graphemes(true).next().map_or(rest.len(), str::len),
      };
      let mut end = pos + len;
      while let Some(g) = text[end..].graphemes(true).next() {
        if !g.starts_with(is_modifier) {
          break;
        }
        end += g.len();
      }
      let piece = &text[pos..end];
      if !piece.trim().is_empty() {
        out.push(piece);
      }
      pos = end;
    }
    out
  }

  /// Resolve every symbol of the text against the model
  #[must_use]
  pub fn segment(&self, text: &str) -> Sequence {
    let segments = self.split(text).into_iter().map(|s| self.model.resolve(s)).collect();
    Sequence::from_parts(self.model.clone(), segments)
  }
}

#[cfg(test)]
mod test {
  use super::Segmenter;
  use crate::model::FeatureModel;

  #[test]
  fn modifiers_attach() {
    let seg = Segmenter::new(&FeatureModel::empty());
    assert_eq!(seg.split("∅-s-irentu-pʰen"), vec![
      "∅", "-", "s", "-", "i", "r", "e", "n", "t", "u", "-", "pʰ", "e", "n"
    ]);
  }

  #[test]
  fn longest_symbol_first() {
    let mut b = FeatureModel::builder();
    b.add_symbol("t", "[]").unwrap().add_symbol("ts", "[]").unwrap();
    let model = b.build();
    let seg = Segmenter::with_symbols(&model, ["tsh"]);
    assert_eq!(seg.split("tstshat"), vec!["ts", "tsh", "a", "t"]);
  }

  #[test]
  fn combining_marks_stay_whole() {
    let mut b = FeatureModel::builder();
    b.add_symbol("a", "[]").unwrap();
    let seg = Segmenter::new(&b.build());
    assert_eq!(seg.split("a\u{301}a"), vec!["a\u{301}", "a"]);
  }
}
