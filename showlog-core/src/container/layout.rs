use std::fmt;
use std::str::FromStr;

use serde::Serializer;

use crate::error::{Result, ShowlogError};

/// Raw `SHOWLOG_GLVERSION` seen by the compiler, if any.
pub const BUILD_GLVERSION: Option<&str> = option_env!("SHOWLOG_GLVERSION");

/// Layout baked in at build time. An unknown `SHOWLOG_GLVERSION` fails the build.
pub const BUILD_LAYOUT: LayoutVariant = match BUILD_GLVERSION {
    None => LayoutVariant::DEFAULT,
    Some(v) => match parse_glversion(v) {
        Some(layout) => layout,
        None => panic!("SHOWLOG_GLVERSION does not name a known glftpd build"),
    },
};

pub const DIRNAME_LEN: usize = 255;
pub const NAME_LEN: usize = 12;
pub const REASON_LEN: usize = 60;

/// Width of an integer field whose size changes between server builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    W32,
    /// Signed 32-bit, sign-extended on read.
    S32,
    W64,
}

impl Width {
    pub const fn bytes(self) -> usize {
        match self {
            Width::W32 | Width::S32 => 4,
            Width::W64 => 8,
        }
    }
}

/// Byte offsets of every field in a dirlog record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirLayout {
    pub size: usize,
    pub status: usize,
    pub uptime: (usize, Width),
    pub uploader: usize,
    pub group: usize,
    pub files: usize,
    /// `int32_t` on 1.32 builds, so a wrapped counter reads back negative.
    pub bytes: (usize, Width),
    pub dirname: usize,
}

/// Byte offsets of every field in a nukelog record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NukeLayout {
    pub size: usize,
    pub status: usize,
    pub nuketime: (usize, Width),
    pub nuker: usize,
    pub unnuker: usize,
    pub nukee: usize,
    pub mult: usize,
    pub bytes: usize,
    pub reason: usize,
    pub dirname: usize,
}

// 1.32 build: 4-byte packing, signed 32-bit byte counter.
const DIR_V13232: DirLayout = DirLayout {
    size: 284,
    status: 0,
    uptime: (4, Width::W32),
    uploader: 8,
    group: 10,
    files: 12,
    bytes: (16, Width::S32),
    dirname: 20,
};

// 2.0x 32-bit builds and the packed 64-bit build.
const DIR_PACKED: DirLayout = DirLayout {
    size: 288,
    status: 0,
    uptime: (4, Width::W32),
    uploader: 8,
    group: 10,
    files: 12,
    bytes: (16, Width::W64),
    dirname: 24,
};

// 2.01 64-bit build: natural alignment, 64-bit time_t, trailing list pointers.
const DIR_V20164: DirLayout = DirLayout {
    size: 304,
    status: 0,
    uptime: (8, Width::W64),
    uploader: 16,
    group: 18,
    files: 20,
    bytes: (24, Width::W64),
    dirname: 32,
};

const NUKE_PACKED: NukeLayout = NukeLayout {
    size: 376,
    status: 0,
    nuketime: (4, Width::W32),
    nuker: 8,
    unnuker: 20,
    nukee: 32,
    mult: 44,
    bytes: 48,
    reason: 52,
    dirname: 112,
};

const NUKE_V20164: NukeLayout = NukeLayout {
    size: 392,
    status: 0,
    nuketime: (8, Width::W64),
    nuker: 16,
    unnuker: 28,
    nukee: 40,
    mult: 52,
    bytes: 56,
    reason: 60,
    dirname: 120,
};

/// Server build whose on-disk record shapes are understood.
///
/// Only one variant is active per process; it is resolved once at startup and
/// passed down to the readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutVariant {
    V13232,
    V20032,
    V20132,
    V20164,
    V20232,
    V20264,
}

impl LayoutVariant {
    pub const DEFAULT: LayoutVariant = LayoutVariant::V20264;

    pub const ALL: [LayoutVariant; 6] = [
        LayoutVariant::V13232,
        LayoutVariant::V20032,
        LayoutVariant::V20132,
        LayoutVariant::V20164,
        LayoutVariant::V20232,
        LayoutVariant::V20264,
    ];

    /// Variant selected when the crate was built, or the default.
    pub const fn build_default() -> Self {
        BUILD_LAYOUT
    }

    pub const fn from_glversion(version: u32) -> Option<Self> {
        match version {
            13232 => Some(LayoutVariant::V13232),
            20032 => Some(LayoutVariant::V20032),
            20132 => Some(LayoutVariant::V20132),
            20164 => Some(LayoutVariant::V20164),
            20232 => Some(LayoutVariant::V20232),
            20264 => Some(LayoutVariant::V20264),
            _ => None,
        }
    }

    pub const fn glversion(self) -> u32 {
        match self {
            LayoutVariant::V13232 => 13232,
            LayoutVariant::V20032 => 20032,
            LayoutVariant::V20132 => 20132,
            LayoutVariant::V20164 => 20164,
            LayoutVariant::V20232 => 20232,
            LayoutVariant::V20264 => 20264,
        }
    }

    pub fn dir(self) -> &'static DirLayout {
        match self {
            LayoutVariant::V13232 => &DIR_V13232,
            LayoutVariant::V20164 => &DIR_V20164,
            _ => &DIR_PACKED,
        }
    }

    pub fn nuke(self) -> &'static NukeLayout {
        match self {
            LayoutVariant::V20164 => &NUKE_V20164,
            _ => &NUKE_PACKED,
        }
    }
}

impl Default for LayoutVariant {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for LayoutVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glversion())
    }
}

impl FromStr for LayoutVariant {
    type Err = ShowlogError;

    fn from_str(s: &str) -> Result<Self> {
        parse_glversion(s).ok_or_else(|| ShowlogError::UnknownLayout(s.to_string()))
    }
}

/// Decimal build number, surrounding blanks allowed. Usable in const context.
pub const fn parse_glversion(s: &str) -> Option<LayoutVariant> {
    let b = s.as_bytes();
    let (mut start, mut end) = (0, b.len());
    while start < end && b[start].is_ascii_whitespace() {
        start += 1;
    }
    while end > start && b[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    if start == end {
        return None;
    }
    let mut n: u32 = 0;
    let mut i = start;
    while i < end {
        if !b[i].is_ascii_digit() {
            return None;
        }
        n = match n.checked_mul(10) {
            Some(m) => match m.checked_add((b[i] - b'0') as u32) {
                Some(m) => m,
                None => return None,
            },
            None => return None,
        };
        i += 1;
    }
    LayoutVariant::from_glversion(n)
}

// Host byte order: the logs are written by a server on the same machine.

#[inline]
pub(crate) fn get_u16(buf: &[u8], off: usize) -> u16 {
    u16::from_ne_bytes([buf[off], buf[off + 1]])
}

#[inline]
pub(crate) fn get_u32(buf: &[u8], off: usize) -> u32 {
    u32::from_ne_bytes([buf[off], buf[off + 1], buf[off + 2], buf[off + 3]])
}

#[inline]
pub(crate) fn get_u64(buf: &[u8], off: usize) -> u64 {
    let mut b = [0u8; 8];
    b.copy_from_slice(&buf[off..off + 8]);
    u64::from_ne_bytes(b)
}

pub(crate) fn get_wide(buf: &[u8], (off, width): (usize, Width)) -> i64 {
    match width {
        Width::W32 => get_u32(buf, off) as i64,
        Width::S32 => get_u32(buf, off) as i32 as i64,
        Width::W64 => get_u64(buf, off) as i64,
    }
}

pub(crate) fn put_wide(buf: &mut [u8], (off, width): (usize, Width), v: i64) {
    match width {
        Width::W32 | Width::S32 => {
            buf[off..off + 4].copy_from_slice(&(v as u32).to_ne_bytes())
        }
        Width::W64 => buf[off..off + 8].copy_from_slice(&(v as u64).to_ne_bytes()),
    }
}

/// NUL-terminated fixed-width text field, bytes kept as stored.
pub(crate) fn get_text(buf: &[u8], off: usize, len: usize) -> Vec<u8> {
    let field = &buf[off..off + len];
    let end = field.iter().position(|&b| b == 0).unwrap_or(len);
    field[..end].to_vec()
}

/// Writes `s` truncated so that a terminating NUL always fits.
pub(crate) fn put_text(buf: &mut [u8], off: usize, len: usize, s: &[u8]) {
    let field = &mut buf[off..off + len];
    field.fill(0);
    let n = s.len().min(len - 1);
    field[..n].copy_from_slice(&s[..n]);
}

/// JSON has no byte strings; text fields go out as lossy UTF-8 there.
pub(crate) fn serialize_text<S: Serializer>(
    text: &[u8],
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&String::from_utf8_lossy(text))
}

pub(crate) fn ensure_len(buf: &[u8], need: usize, what: &str) -> Result<()> {
    if buf.len() < need {
        return Err(ShowlogError::Format(format!(
            "{what} record too short: got {} bytes, expected {need}",
            buf.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_fit_inside_records() {
        for v in LayoutVariant::ALL {
            let d = v.dir();
            assert!(d.dirname + DIRNAME_LEN <= d.size, "{v}");
            assert!(d.bytes.0 + d.bytes.1.bytes() <= d.dirname, "{v}");
            let n = v.nuke();
            assert!(n.dirname + DIRNAME_LEN <= n.size, "{v}");
            assert_eq!(n.reason + REASON_LEN, n.dirname, "{v}");
            assert_eq!(n.nuker + NAME_LEN, n.unnuker, "{v}");
        }
    }

    #[test]
    fn record_sizes_per_variant() {
        assert_eq!(LayoutVariant::V13232.dir().size, 284);
        assert_eq!(LayoutVariant::V20264.dir().size, 288);
        assert_eq!(LayoutVariant::V20032.dir().size, 288);
        assert_eq!(LayoutVariant::V20164.dir().size, 304);
        assert_eq!(LayoutVariant::V13232.nuke().size, 376);
        assert_eq!(LayoutVariant::V20164.nuke().size, 392);
    }

    #[test]
    fn parses_known_versions_only() {
        assert_eq!("20164".parse::<LayoutVariant>().unwrap(), LayoutVariant::V20164);
        assert_eq!(" 13232 ".parse::<LayoutVariant>().unwrap(), LayoutVariant::V13232);
        assert!(matches!(
            "20165".parse::<LayoutVariant>(),
            Err(ShowlogError::UnknownLayout(_))
        ));
        assert!("glftpd".parse::<LayoutVariant>().is_err());
    }

    #[test]
    fn const_parser_agrees_with_table() {
        const PARSED: Option<LayoutVariant> = parse_glversion("20164");
        assert_eq!(PARSED, Some(LayoutVariant::V20164));
        for v in LayoutVariant::ALL {
            assert_eq!(parse_glversion(&v.to_string()), Some(v));
        }
        assert_eq!(parse_glversion("20165"), None);
        assert_eq!(parse_glversion(""), None);
        assert_eq!(parse_glversion("  "), None);
        assert_eq!(parse_glversion("2016 4"), None);
        assert_eq!(parse_glversion("-20164"), None);
        assert_eq!(parse_glversion("99999999999"), None);
    }

    #[test]
    fn build_layout_is_a_known_variant() {
        assert!(LayoutVariant::ALL.contains(&LayoutVariant::build_default()));
        if BUILD_GLVERSION.is_none() {
            assert_eq!(BUILD_LAYOUT, LayoutVariant::V20264);
        }
    }

    #[test]
    fn signed_counter_sign_extends() {
        let mut buf = [0u8; 8];
        put_wide(&mut buf, (0, Width::S32), -2048);
        assert_eq!(get_wide(&buf, (0, Width::S32)), -2048);
        assert_eq!(get_wide(&buf, (0, Width::W32)), (-2048i32 as u32) as i64);
        put_wide(&mut buf, (0, Width::W64), 5_368_709_120);
        assert_eq!(get_wide(&buf, (0, Width::W64)), 5_368_709_120);
    }

    #[test]
    fn text_stops_at_nul() {
        let mut buf = [0u8; 8];
        put_text(&mut buf, 0, 8, b"abcdefghij");
        assert_eq!(&buf, b"abcdefg\0");
        assert_eq!(get_text(&buf, 0, 8), b"abcdefg");
        let raw = *b"abcdefgh";
        assert_eq!(get_text(&raw, 0, 8), b"abcdefgh");
        let latin1 = *b"Caf\xE9\0xyz";
        assert_eq!(get_text(&latin1, 0, 8), b"Caf\xE9");
    }
}
