pub mod rootpath;
pub mod subdir;
pub mod wildcard;

pub use rootpath::matches_excluded_root;
pub use subdir::matches_excluded_subdir;
pub use wildcard::{any_wildcard_match, wildcard_match};
