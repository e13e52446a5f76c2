//! Commit analysis - turns raw commit text into a release decision

pub mod bump_classifier;

pub use bump_classifier::BumpClassifier;
