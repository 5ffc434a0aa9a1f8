use serde::{Serialize, Serializer};

use crate::container::layout::{
    DIRNAME_LEN, LayoutVariant, ensure_len, get_text, get_u16, get_wide, put_text, put_wide,
    serialize_text,
};
use crate::error::Result;

/// State of a directory as recorded in the dirlog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirStatus {
    NewDir,
    Nuke,
    Unnuke,
    Deleted,
    /// Stored value outside the known domain, kept as-is.
    Unknown(u16),
}

impl DirStatus {
    pub const fn from_raw(v: u16) -> Self {
        match v {
            0 => DirStatus::NewDir,
            1 => DirStatus::Nuke,
            2 => DirStatus::Unnuke,
            3 => DirStatus::Deleted,
            other => DirStatus::Unknown(other),
        }
    }

    pub const fn raw(self) -> u16 {
        match self {
            DirStatus::NewDir => 0,
            DirStatus::Nuke => 1,
            DirStatus::Unnuke => 2,
            DirStatus::Deleted => 3,
            DirStatus::Unknown(v) => v,
        }
    }
}

impl Serialize for DirStatus {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_u16(self.raw())
    }
}

/// One decoded dirlog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirEntry {
    pub status: DirStatus,
    /// Creation time, seconds since epoch.
    pub uptime: u32,
    pub uploader: u16,
    pub group: u16,
    pub files: u16,
    /// Signed so that a wrapped 1.32 counter keeps its sign.
    pub bytes: i64,
    /// Path bytes exactly as stored, without the NUL.
    #[serde(serialize_with = "serialize_text")]
    pub dirname: Vec<u8>,
}

impl DirEntry {
    pub fn decode(buf: &[u8], variant: LayoutVariant) -> Result<Self> {
        let l = variant.dir();
        ensure_len(buf, l.size, "dirlog")?;
        Ok(Self {
            status: DirStatus::from_raw(get_u16(buf, l.status)),
            uptime: get_wide(buf, l.uptime) as u32,
            uploader: get_u16(buf, l.uploader),
            group: get_u16(buf, l.group),
            files: get_u16(buf, l.files),
            bytes: get_wide(buf, l.bytes),
            dirname: get_text(buf, l.dirname, DIRNAME_LEN),
        })
    }

    /// Serialises the record in `variant`'s shape with zeroed padding.
    pub fn encode(&self, variant: LayoutVariant) -> Vec<u8> {
        let l = variant.dir();
        let mut buf = vec![0u8; l.size];
        buf[l.status..l.status + 2].copy_from_slice(&self.status.raw().to_ne_bytes());
        put_wide(&mut buf, l.uptime, i64::from(self.uptime));
        buf[l.uploader..l.uploader + 2].copy_from_slice(&self.uploader.to_ne_bytes());
        buf[l.group..l.group + 2].copy_from_slice(&self.group.to_ne_bytes());
        buf[l.files..l.files + 2].copy_from_slice(&self.files.to_ne_bytes());
        put_wide(&mut buf, l.bytes, self.bytes);
        put_text(&mut buf, l.dirname, DIRNAME_LEN, &self.dirname);
        buf
    }

    /// Final path component, or the whole name when it has no `/`.
    pub fn basename(&self) -> &[u8] {
        basename(&self.dirname)
    }
}

pub(crate) fn basename(path: &[u8]) -> &[u8] {
    match path.iter().rposition(|&b| b == b'/') {
        Some(i) => &path[i + 1..],
        None => path,
    }
}
