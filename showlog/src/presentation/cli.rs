use clap::{ArgGroup, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

use showlog_core::config::DEFAULT_GLCONF;
use showlog_core::{OutputFormat, Query};

/// Command line of the `showlog` binary.
///
/// Exit codes: `-h`/`--help` and `-V` print to stdout and exit 0; usage errors
/// exit 2 (clap's convention). Older showlog builds exited 1 after printing
/// usage for `-h`, so scripts testing for 1 there must be updated.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Display the latest dirlog and nukelog entries in an easy-to-parse format",
    long_about = None
)]
#[command(group(
    ArgGroup::new("action")
        .required(true)
        .args(["newdirs", "nukes", "unnukes"])
))]
pub struct Cli {
    /// Display the latest dirlog entries
    #[arg(short = 'l', long = "newdirs")]
    pub newdirs: bool,

    /// Display the latest nukes from the nukelog
    #[arg(short = 'n', long = "nukes")]
    pub nukes: bool,

    /// Display the latest unnukes from the nukelog
    #[arg(short = 'u', long = "unnukes")]
    pub unnukes: bool,

    /// Match the full path rather than the base name
    #[arg(short = 'f', long = "full")]
    pub match_full: bool,

    /// Search mode: display all entries disregarding their status
    #[arg(short = 's', long = "search")]
    pub search_mode: bool,

    /// Maximum number of results to display (values below 1 mean 1)
    #[arg(short = 'm', long = "max", default_value_t = 10, allow_negative_numbers = true)]
    pub max_results: i64,

    /// Only matching entries; wildcards `?` and `*`, several patterns split by a space
    #[arg(short = 'p', long = "pattern")]
    pub pattern: Option<OsString>,

    /// Path to the glftpd configuration file
    #[arg(short = 'r', long = "config", default_value = DEFAULT_GLCONF)]
    pub config: PathBuf,

    /// Emit one JSON object per line instead of pipe-delimited fields
    #[arg(short = 'j', long = "json")]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    NewDirs,
    Nukes,
    Unnukes,
}

impl Cli {
    pub fn action(&self) -> Action {
        if self.newdirs {
            Action::NewDirs
        } else if self.nukes {
            Action::Nukes
        } else {
            Action::Unnukes
        }
    }

    pub fn query(&self) -> Query {
        Query {
            max_results: usize::try_from(self.max_results.max(1)).unwrap_or(usize::MAX),
            search_mode: self.search_mode,
            patterns: self.pattern.as_ref().map(|p| p.as_encoded_bytes().to_vec()),
            match_full: self.match_full,
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::JsonLines
        } else {
            OutputFormat::Pipe
        }
    }
}
