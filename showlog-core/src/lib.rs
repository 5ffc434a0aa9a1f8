#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod format;
pub mod pattern;

pub mod container {
    pub mod dirlog;
    pub mod layout;
    pub mod nukelog;
}

pub mod read {
    pub mod retrieve;
    pub mod reverse;
}

// Re-exports: stable API surface
pub use config::{Exclusions, Settings};
pub use container::dirlog::{DirEntry, DirStatus};
pub use container::layout::LayoutVariant;
pub use container::nukelog::{NukeEntry, NukeStatus};
pub use format::OutputFormat;
pub use read::retrieve::{Query, newest_dirs, newest_nukes, open_log};
pub use read::reverse::ReverseScanner;
