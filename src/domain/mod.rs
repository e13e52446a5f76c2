//! Domain logic - pure release rules independent of git and the filesystem

pub mod commit;
pub mod tag;
pub mod version;

pub use commit::CommitRecord;
pub use tag::{ReleaseRange, Tag, TagPattern};
pub use version::{validate_monotonic, Version, VersionBump};
