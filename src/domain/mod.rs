//! Domain logic - pure release types independent of VCS operations

pub mod channel;
pub mod commit;
pub mod prerelease;
pub mod tag;
pub mod version;

pub use channel::Channel;
pub use commit::{CommitRecord, ParsedCommit};
pub use prerelease::PreRelease;
pub use tag::TagPattern;
pub use version::{ReleaseType, Version};
