//! Sprint aggregation.
//!
//! Issues are grouped into categories once per chart, then summarised per
//! platform against a single evaluation instant.

pub mod grouper;
pub mod summarizer;

pub use grouper::*;
pub use summarizer::*;
