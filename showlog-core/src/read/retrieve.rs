use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use tracing::{debug, trace};

use crate::config::Exclusions;
use crate::container::dirlog::{DirEntry, DirStatus, basename};
use crate::container::layout::LayoutVariant;
use crate::container::nukelog::{NukeEntry, NukeStatus};
use crate::error::{Result, ShowlogError};
use crate::pattern::any_wildcard_match;
use crate::read::reverse::ReverseScanner;

pub const DEFAULT_MAX_RESULTS: usize = 10;

/// What to pull out of a log; built once by the front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub max_results: usize,
    /// Ignore the record status entirely.
    pub search_mode: bool,
    /// Space-separated wildcard patterns, any of which may match. Raw bytes,
    /// compared against names exactly as the server stored them.
    pub patterns: Option<Vec<u8>>,
    /// Match against the whole dirname instead of its last component.
    pub match_full: bool,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            search_mode: false,
            patterns: None,
            match_full: false,
        }
    }
}

impl Query {
    pub fn limit(&self) -> usize {
        self.max_results.max(1)
    }

    pub fn matches_name(&self, dirname: &[u8]) -> bool {
        let Some(patterns) = self.patterns.as_deref() else {
            return true;
        };
        let subject = if self.match_full {
            dirname
        } else {
            basename(dirname)
        };
        any_wildcard_match(patterns, subject)
    }
}

/// Opens a log read-only, tagging failures with the log's name and path.
pub fn open_log(path: &Path, what: &'static str) -> Result<File> {
    File::open(path).map_err(|source| ShowlogError::Open {
        what,
        path: path.to_path_buf(),
        source,
    })
}

fn decoded<T>(res: Result<T>) -> Option<T> {
    match res {
        Ok(v) => Some(v),
        Err(e) => {
            debug!(error = %e, "undecodable record, ending scan");
            None
        }
    }
}

/// Newest dirlog entries that pass the status, exclusion and pattern filters.
pub fn newest_dirs<'q, F: Read + Seek + 'q>(
    f: F,
    variant: LayoutVariant,
    status: DirStatus,
    query: &'q Query,
    exclusions: &'q Exclusions,
) -> impl Iterator<Item = DirEntry> + 'q {
    ReverseScanner::new(f, variant.dir().size)
        .map_while(move |buf| decoded(DirEntry::decode(&buf, variant)))
        .filter(move |e| {
            let keep = query.search_mode || e.status == status;
            if !keep {
                trace!(
                    dirname = %String::from_utf8_lossy(&e.dirname),
                    status = e.status.raw(),
                    "skip: status"
                );
            }
            keep
        })
        .filter(move |e| {
            let excluded = exclusions.excludes(&e.dirname);
            if excluded {
                trace!(dirname = %String::from_utf8_lossy(&e.dirname), "skip: excluded");
            }
            !excluded
        })
        .filter(move |e| query.matches_name(&e.dirname))
        .take(query.limit())
}

/// Newest nukelog entries with `status` (any status in search mode) whose
/// dirname passes the pattern filter. Nukes are never exclusion-filtered.
pub fn newest_nukes<'q, F: Read + Seek + 'q>(
    f: F,
    variant: LayoutVariant,
    status: NukeStatus,
    query: &'q Query,
) -> impl Iterator<Item = NukeEntry> + 'q {
    ReverseScanner::new(f, variant.nuke().size)
        .map_while(move |buf| decoded(NukeEntry::decode(&buf, variant)))
        .filter(move |e| {
            let keep = query.search_mode || e.status == status;
            if !keep {
                trace!(
                    dirname = %String::from_utf8_lossy(&e.dirname),
                    status = e.status.raw(),
                    "skip: status"
                );
            }
            keep
        })
        .filter(move |e| query.matches_name(&e.dirname))
        .take(query.limit())
}
