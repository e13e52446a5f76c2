//! Changelog rendering and merging

pub mod document;
pub mod render;

pub use document::{merge, Block, ChangelogDocument};
pub use render::{ChangelogRenderer, GroupedCommits, ReleaseInfo, RenderedSection};
