use std::io::Write;

use serde::Serialize;

use crate::container::dirlog::DirEntry;
use crate::container::nukelog::NukeEntry;
use crate::error::{Result, ShowlogError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `a|b|c` lines for shell scripts.
    #[default]
    Pipe,
    /// One JSON object per line.
    JsonLines,
}

/// Dirlog sizes are stored in bytes; shown in kilobytes.
pub fn dir_kilobytes(bytes: i64) -> f64 {
    f64::from(bytes as f32) / 1024.0
}

/// Nukelog amounts are already stored in kilobyte-derived units and are
/// multiplied, not divided, on display.
pub fn nuke_kilobytes(bytes: f32) -> f64 {
    f64::from(bytes) * 1024.0
}

fn push_text(line: &mut Vec<u8>, text: &[u8]) {
    line.extend_from_slice(text);
    line.push(b'|');
}

/// `status|uptime|uploader|group|files|kilobytes|dirname`
///
/// Names are copied byte for byte, so the line is not necessarily UTF-8.
pub fn dir_line(e: &DirEntry) -> Vec<u8> {
    let mut line = format!(
        "{}|{}|{}|{}|{}|{:.0}|",
        e.status.raw(),
        e.uptime,
        e.uploader,
        e.group,
        e.files,
        dir_kilobytes(e.bytes),
    )
    .into_bytes();
    line.extend_from_slice(&e.dirname);
    line
}

/// `status|nuketime|nuker|unnuker|nukee|multiplier|reason|kilobytes|dirname`
pub fn nuke_line(e: &NukeEntry) -> Vec<u8> {
    let mut line = format!("{}|{}|", e.status.raw(), e.nuketime).into_bytes();
    push_text(&mut line, &e.nuker);
    push_text(&mut line, &e.unnuker);
    push_text(&mut line, &e.nukee);
    line.extend_from_slice(format!("{}|", e.multiplier).as_bytes());
    push_text(&mut line, &e.reason);
    line.extend_from_slice(format!("{:.0}|", nuke_kilobytes(e.bytes)).as_bytes());
    line.extend_from_slice(&e.dirname);
    line
}

#[derive(Serialize)]
struct WithKilobytes<'a, T: Serialize> {
    #[serde(flatten)]
    entry: &'a T,
    kilobytes: f64,
}

fn json_line<T: Serialize>(entry: &T, kilobytes: f64) -> Result<Vec<u8>> {
    serde_json::to_vec(&WithKilobytes {
        entry,
        kilobytes: kilobytes.round_ties_even(),
    })
    .map_err(|e| ShowlogError::Format(format!("json encode: {e}")))
}

fn write_line<W: Write>(out: &mut W, mut line: Vec<u8>) -> Result<()> {
    line.push(b'\n');
    out.write_all(&line)?;
    Ok(())
}

/// Writes every entry as one line; returns how many were written.
pub fn write_dirs<W: Write>(
    out: &mut W,
    entries: impl IntoIterator<Item = DirEntry>,
    fmt: OutputFormat,
) -> Result<usize> {
    let mut n = 0;
    for e in entries {
        let line = match fmt {
            OutputFormat::Pipe => dir_line(&e),
            OutputFormat::JsonLines => json_line(&e, dir_kilobytes(e.bytes))?,
        };
        write_line(out, line)?;
        n += 1;
    }
    Ok(n)
}

pub fn write_nukes<W: Write>(
    out: &mut W,
    entries: impl IntoIterator<Item = NukeEntry>,
    fmt: OutputFormat,
) -> Result<usize> {
    let mut n = 0;
    for e in entries {
        let line = match fmt {
            OutputFormat::Pipe => nuke_line(&e),
            OutputFormat::JsonLines => json_line(&e, nuke_kilobytes(e.bytes))?,
        };
        write_line(out, line)?;
        n += 1;
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::dirlog::DirStatus;
    use crate::container::nukelog::NukeStatus;

    fn dir_entry(bytes: i64) -> DirEntry {
        DirEntry {
            status: DirStatus::NewDir,
            uptime: 1_700_000_000,
            uploader: 12,
            group: 400,
            files: 31,
            bytes,
            dirname: "/site/incoming/Rel-GRP".into(),
        }
    }

    fn nuke_entry(bytes: f32) -> NukeEntry {
        NukeEntry {
            status: NukeStatus::Unnuked,
            nuketime: 1_650_000_000,
            nuker: "op".into(),
            unnuker: "op2".into(),
            nukee: "racer".into(),
            multiplier: 3,
            bytes,
            reason: "mislabeled".into(),
            dirname: "/site/incoming/Rel-GRP".into(),
        }
    }

    fn field(line: &[u8], n: usize) -> String {
        let raw = line.split(|&b| b == b'|').nth(n).unwrap();
        String::from_utf8_lossy(raw).into_owned()
    }

    #[test]
    fn dir_bytes_are_divided() {
        assert_eq!(
            dir_line(&dir_entry(2048)),
            b"0|1700000000|12|400|31|2|/site/incoming/Rel-GRP"
        );
        assert_eq!(field(&dir_line(&dir_entry(0)), 5), "0");
        // 1536 KiB + a bit rounds to nearest.
        assert_eq!(field(&dir_line(&dir_entry(1_573_000)), 5), "1536");
    }

    #[test]
    fn wrapped_counter_prints_negative() {
        assert_eq!(field(&dir_line(&dir_entry(-2048)), 5), "-2");
    }

    #[test]
    fn nuke_bytes_are_multiplied() {
        assert_eq!(
            nuke_line(&nuke_entry(2.0)),
            b"1|1650000000|op|op2|racer|3|mislabeled|2048|/site/incoming/Rel-GRP"
        );
        assert_eq!(field(&nuke_line(&nuke_entry(0.5)), 7), "512");
    }

    #[test]
    fn names_are_written_as_stored() {
        let mut e = dir_entry(1024);
        e.dirname = b"/site/x/Caf\xE9".to_vec();
        let mut out = Vec::new();
        write_dirs(&mut out, vec![e], OutputFormat::Pipe).unwrap();
        assert!(out.ends_with(b"|1|/site/x/Caf\xE9\n"), "{out:?}");

        let mut n = nuke_entry(1.0);
        n.nukee = b"r\xE4cer".to_vec();
        n.reason = b"d\xFCpe".to_vec();
        let mut out = Vec::new();
        write_nukes(&mut out, vec![n], OutputFormat::Pipe).unwrap();
        assert_eq!(
            out,
            b"1|1650000000|op|op2|r\xE4cer|3|d\xFCpe|1024|/site/incoming/Rel-GRP\n"
        );
    }

    #[test]
    fn writers_count_lines() {
        let mut out = Vec::new();
        let n = write_dirs(
            &mut out,
            vec![dir_entry(1024), dir_entry(4096)],
            OutputFormat::Pipe,
        )
        .unwrap();
        assert_eq!(n, 2);
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("|1|"));
        assert!(lines[1].contains("|4|"));
    }

    #[test]
    fn json_lines_carry_raw_and_scaled() {
        let mut out = Vec::new();
        write_nukes(&mut out, vec![nuke_entry(2.0)], OutputFormat::JsonLines).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(v["status"], 1);
        assert_eq!(v["nukee"], "racer");
        assert_eq!(v["bytes"], 2.0);
        assert_eq!(v["kilobytes"], 2048.0);

        let mut out = Vec::new();
        write_dirs(&mut out, vec![dir_entry(2048)], OutputFormat::JsonLines).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(v["kilobytes"], 2.0);
        assert_eq!(v["bytes"], 2048);
        assert_eq!(v["dirname"], "/site/incoming/Rel-GRP");
    }

    #[test]
    fn json_replaces_undecodable_bytes() {
        let mut e = dir_entry(0);
        e.dirname = b"/site/x/Caf\xE9".to_vec();
        let mut out = Vec::new();
        write_dirs(&mut out, vec![e], OutputFormat::JsonLines).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(v["dirname"], "/site/x/Caf\u{fffd}");
    }
}
