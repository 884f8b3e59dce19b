//! Heading detection and outline building.

pub mod classifier;
pub mod outline;

pub use classifier::HeadingClassifier;
pub use outline::{LevelMap, OutlineBuilder};

use crate::model::{Outline, StyledLine};
use crate::options::OutlineOptions;

/// Classify one document's lines and build its outline.
pub fn build_outline<I>(lines: I, options: &OutlineOptions) -> Outline
where
    I: IntoIterator<Item = StyledLine>,
{
    let candidates = HeadingClassifier::new(options.clone()).candidates(lines);
    log::debug!("{} heading candidates", candidates.len());
    OutlineBuilder::new(options.black_threshold).build(&candidates)
}
