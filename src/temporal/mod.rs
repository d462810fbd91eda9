/// Name-based detection of date/time columns.
pub mod classifier;
/// Timezone conversion of temporal columns.
pub mod normalizer;
/// Tolerant timestamp parsing.
pub mod parse;

pub use classifier::{DEFAULT_TEMPORAL_TRIGGERS, TemporalClassifier};
pub use normalizer::{TemporalNormalizer, normalize_temporal};
