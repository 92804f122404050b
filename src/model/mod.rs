//! Segments, sequences of segments and the feature model they are resolved
//! against
mod feature;
mod model_error;
mod segment;
mod segmenter;
mod sequence;

pub use feature::{FeatureModel, FeatureValue, ModelBuilder};
pub use model_error::ModelError;
pub use segment::{Segment, BOUNDARY, WILDCARD};
pub use segmenter::Segmenter;
pub(crate) use sequence::starts_with_at;
pub use sequence::Sequence;
