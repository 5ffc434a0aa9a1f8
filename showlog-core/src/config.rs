use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::pattern::{matches_excluded_root, matches_excluded_subdir};

pub const DEFAULT_GLCONF: &str = "/etc/glftpd.conf";
pub const DEFAULT_ROOTPATH: &str = "/glftpd";
pub const DEFAULT_DATAPATH: &str = "/ftp-data";

/// Space-separated roots whose directories never show up in dirlog output.
pub const GROUP_DIRS: &str = match option_env!("SHOWLOG_GROUP_DIRS") {
    Some(v) => v,
    None => "/site/groups/",
};

/// Comma-separated subdirectory name patterns hidden from dirlog output.
pub const SUBDIR_LIST: &str = match option_env!("SHOWLOG_SUBDIR_LIST") {
    Some(v) => v,
    None => "cd?1,disc?1,disk?1,dvd?1,codec,cover,covers,extra,extras,sample,subs,vobsub,vobsubs",
};

/// Server locations read from glftpd.conf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub rootpath: String,
    pub datapath: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rootpath: DEFAULT_ROOTPATH.to_string(),
            datapath: DEFAULT_DATAPATH.to_string(),
        }
    }
}

impl Settings {
    /// Loads `rootpath`/`datapath` from `config`, keeping defaults for anything
    /// missing. An unreadable file is not an error.
    pub fn load(config: &Path) -> Self {
        match File::open(config) {
            Ok(f) => Self::from_reader(BufReader::new(f)),
            Err(e) => {
                warn!(
                    "Unable to open the config file ({}), using default values: {e}",
                    config.display()
                );
                Self::default()
            }
        }
    }

    pub fn from_reader<R: BufRead>(mut r: R) -> Self {
        let mut settings = Self::default();
        let mut raw = Vec::with_capacity(256);
        loop {
            raw.clear();
            match r.read_until(b'\n', &mut raw) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!("config read stopped early: {e}");
                    break;
                }
            }
            let line = String::from_utf8_lossy(&raw);
            let Some((key, value)) = parse_line(&line) else {
                continue;
            };
            if key.eq_ignore_ascii_case("rootpath") {
                settings.rootpath = value;
            } else if key.eq_ignore_ascii_case("datapath") {
                settings.datapath = value;
            }
        }
        debug!(rootpath = %settings.rootpath, datapath = %settings.datapath, "settings loaded");
        settings
    }

    pub fn dirlog_path(&self) -> PathBuf {
        self.log_path("dirlog")
    }

    pub fn nukelog_path(&self) -> PathBuf {
        self.log_path("nukelog")
    }

    // Plain concatenation: datapath is absolute relative to the chroot in rootpath.
    fn log_path(&self, name: &str) -> PathBuf {
        PathBuf::from(format!("{}{}/logs/{name}", self.rootpath, self.datapath))
    }
}

/// Splits a config line into key and value after stripping comments and
/// collapsing whitespace. Non-printable bytes are dropped from both halves.
fn parse_line(line: &str) -> Option<(String, String)> {
    let line = line.split('#').next().unwrap_or_default();
    let collapsed = line.split_ascii_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }
    let (key, value) = collapsed.split_once(' ').unwrap_or((collapsed.as_str(), ""));
    let printable = |s: &str| -> String { s.chars().filter(|c| !c.is_control()).collect() };
    Some((printable(key), printable(value)))
}

/// Dirlog-only filters: excluded roots and noise subdirectories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusions {
    pub roots: String,
    pub subdirs: String,
}

impl Default for Exclusions {
    fn default() -> Self {
        Self {
            roots: GROUP_DIRS.to_string(),
            subdirs: SUBDIR_LIST.to_string(),
        }
    }
}

impl Exclusions {
    pub fn none() -> Self {
        Self {
            roots: String::new(),
            subdirs: String::new(),
        }
    }

    pub fn excludes(&self, dirname: &[u8]) -> bool {
        matches_excluded_root(&self.roots, dirname) || matches_excluded_subdir(&self.subdirs, dirname)
    }
}
