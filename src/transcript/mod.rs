//! Transcript model: fetch, feature-table normalization and text export.

pub mod construction;
pub mod export;
pub mod types;

#[cfg(test)]
pub(crate) mod fixtures;

pub use construction::transcribe;
pub use types::{HgncPrefix, PopulateOptions, SequenceType, Transcript};
