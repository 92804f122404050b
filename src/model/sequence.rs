use std::fmt;
use std::ops::{Index, Range};
use std::slice;
use std::sync::Arc;

use itertools::Itertools;

use super::{FeatureModel, ModelError, Segment};

/// Whether `prefix` matches `haystack` starting at `index`, segment by
/// segment under [Segment::matches]
#[must_use]
pub(crate) fn starts_with_at(
  haystack: &[Segment],
  index: usize,
  prefix: &[Segment],
) -> bool {
  (haystack.get(index..index + prefix.len()))
    .is_some_and(|window| window.iter().zip(prefix).all(|(a, b)| a.matches(b)))
}

/// An ordered, mutable run of segments sharing one model. Equality is
/// structural; use [Sequence::starts_with_at] and [Sequence::index_of] for
/// matching.
#[derive(Clone)]
pub struct Sequence {
  segments: Vec<Segment>,
  model: Arc<FeatureModel>,
}
impl Sequence {
  /// Empty sequence on a model
  #[must_use]
  pub fn new(model: &Arc<FeatureModel>) -> Self {
    Self { segments: Vec::new(), model: model.clone() }
  }

  /// Collect segments, checking that each belongs to `model`
  pub fn from_segments(
    model: &Arc<FeatureModel>,
    segments: impl IntoIterator<Item = Segment>,
  ) -> Result<Self, ModelError> {
    let mut seq = Self::new(model);
    for segment in segments {
      seq.push(segment)?;
    }
    Ok(seq)
  }

  pub(crate) fn from_parts(model: Arc<FeatureModel>, segments: Vec<Segment>) -> Self {
    debug_assert!(segments.iter().all(|s| Arc::ptr_eq(s.model(), &model)));
    Self { segments, model }
  }

  /// The model shared by every member
  #[must_use]
  pub fn model(&self) -> &Arc<FeatureModel> { &self.model }

  /// Number of segments
  #[must_use]
  pub fn len(&self) -> usize { self.segments.len() }

  /// Whether there are no segments
  #[must_use]
  pub fn is_empty(&self) -> bool { self.segments.is_empty() }

  /// Segment at a position
  #[must_use]
  pub fn get(&self, index: usize) -> Option<&Segment> { self.segments.get(index) }

  /// Iterate over the segments
  pub fn iter(&self) -> slice::Iter<'_, Segment> { self.segments.iter() }

  /// Borrow the segments
  #[must_use]
  pub fn as_slice(&self) -> &[Segment] { &self.segments }

  fn check(&self, model: &Arc<FeatureModel>, what: impl fmt::Display) -> Result<(), ModelError> {
    if Arc::ptr_eq(&self.model, model) {
      Ok(())
    } else {
      Err(ModelError::Mismatch(what.to_string()))
    }
  }

  /// Append a segment of the same model
  pub fn push(&mut self, segment: Segment) -> Result<(), ModelError> {
    self.check(segment.model(), &segment)?;
    self.segments.push(segment);
    Ok(())
  }

  /// Append every segment of another sequence of the same model
  pub fn append(&mut self, other: &Sequence) -> Result<(), ModelError> {
    self.check(other.model(), other)?;
    self.segments.extend(other.iter().cloned());
    Ok(())
  }

  /// Copy of the segments in `range`
  ///
  /// # Panics
  ///
  /// if the range is out of bounds, like slice indexing
  #[must_use]
  pub fn slice(&self, range: Range<usize>) -> Sequence {
    Self::from_parts(self.model.clone(), self.segments[range].to_vec())
  }

  /// Copy in reverse order
  #[must_use]
  pub fn reversed(&self) -> Sequence {
    Self::from_parts(self.model.clone(), self.segments.iter().rev().cloned().collect())
  }

  /// Copy with the word boundary appended
  #[must_use]
  pub fn with_boundary(&self) -> Sequence {
    let mut segments = self.segments.clone();
    segments.push(Segment::boundary(&self.model));
    Self::from_parts(self.model.clone(), segments)
  }

  /// Whether `prefix` matches this sequence at `index`
  #[must_use]
  pub fn starts_with_at(&self, index: usize, prefix: &[Segment]) -> bool {
    starts_with_at(&self.segments, index, prefix)
  }

  /// Position of the first match of `needle`
  #[must_use]
  pub fn index_of(&self, needle: &Sequence) -> Option<usize> {
    let last = self.len().checked_sub(needle.len())?;
    (0..=last).find(|i| self.starts_with_at(*i, needle.as_slice()))
  }

  /// Replace every non-overlapping match of `source`, left to right
  pub fn replace_all(&mut self, source: &Sequence, target: &Sequence) -> Result<(), ModelError> {
    self.check(source.model(), source)?;
    self.check(target.model(), target)?;
    if source.is_empty() {
      return Ok(());
    }
    let mut out = Vec::with_capacity(self.len());
    let mut idx = 0;
    while idx < self.len() {
      if self.starts_with_at(idx, source.as_slice()) {
        out.extend(target.iter().cloned());
        idx += source.len();
      } else {
        out.push(self.segments[idx].clone());
        idx += 1;
      }
    }
    self.segments = out;
    Ok(())
  }

  /// Substitute `replacement` for the segments in `range`
  pub fn splice(&mut self, range: Range<usize>, replacement: &Sequence) -> Result<(), ModelError> {
    self.check(replacement.model(), replacement)?;
    self.splice_segments(range, replacement.iter().cloned());
    Ok(())
  }

  pub(crate) fn splice_segments(
    &mut self,
    range: Range<usize>,
    replacement: impl IntoIterator<Item = Segment>,
  ) {
    self.segments.splice(range, replacement);
  }
}

impl PartialEq for Sequence {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.model, &other.model) && self.segments == other.segments
  }
}
impl Eq for Sequence {}
impl Index<usize> for Sequence {
  type Output = Segment;
  fn index(&self, index: usize) -> &Self::Output { &self.segments[index] }
}
impl<'a> IntoIterator for &'a Sequence {
  type Item = &'a Segment;
  type IntoIter = slice::Iter<'a, Segment>;
  fn into_iter(self) -> Self::IntoIter { self.segments.iter() }
}
impl fmt::Display for Sequence {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.segments.iter().map(Segment::symbol).join(""))
  }
}
impl fmt::Debug for Sequence {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Sequence({})", self.segments.iter().map(Segment::symbol).join(" "))
  }
}

#[cfg(test)]
mod test {
  use crate::model::{FeatureModel, Segmenter};

  #[test]
  fn search_and_splice() {
    let model = FeatureModel::empty();
    let seg = Segmenter::new(&model);
    let mut word = seg.segment("banana");
    assert_eq!(word.index_of(&seg.segment("an")), Some(1));
    assert_eq!(word.index_of(&seg.segment("x")), None);
    assert_eq!(word.index_of(&seg.segment("bananas")), None);
    word.replace_all(&seg.segment("an"), &seg.segment("o")).unwrap();
    assert_eq!(word.to_string(), "booa");
    word.splice(1..3, &seg.segment("ee")).unwrap();
    assert_eq!(word, seg.segment("beea"));
    assert_eq!(word.reversed().to_string(), "aeeb");
    assert_eq!(word.slice(1..3).to_string(), "ee");
    assert!(word.with_boundary().get(4).is_some_and(|s| s.is_boundary()));
  }

  #[test]
  fn models_must_agree() {
    let mut b = FeatureModel::builder();
    b.add_feature("voice").unwrap();
    let other = b.build();
    let mut word = Segmenter::new(&FeatureModel::empty()).segment("ab");
    assert!(word.push(other.resolve("a")).is_err());
    assert!(word.append(&Segmenter::new(&other).segment("x")).is_err());
  }
}
