use serde::{Serialize, Serializer};

use crate::container::dirlog::basename;
use crate::container::layout::{
    DIRNAME_LEN, LayoutVariant, NAME_LEN, REASON_LEN, ensure_len, get_text, get_u16, get_u32,
    get_wide, put_text, put_wide, serialize_text,
};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NukeStatus {
    Nuked,
    Unnuked,
    Unknown(u16),
}

impl NukeStatus {
    pub const fn from_raw(v: u16) -> Self {
        match v {
            0 => NukeStatus::Nuked,
            1 => NukeStatus::Unnuked,
            other => NukeStatus::Unknown(other),
        }
    }

    pub const fn raw(self) -> u16 {
        match self {
            NukeStatus::Nuked => 0,
            NukeStatus::Unnuked => 1,
            NukeStatus::Unknown(v) => v,
        }
    }
}

impl Serialize for NukeStatus {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_u16(self.raw())
    }
}

/// One decoded nukelog record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NukeEntry {
    pub status: NukeStatus,
    pub nuketime: u32,
    #[serde(serialize_with = "serialize_text")]
    pub nuker: Vec<u8>,
    #[serde(serialize_with = "serialize_text")]
    pub unnuker: Vec<u8>,
    #[serde(serialize_with = "serialize_text")]
    pub nukee: Vec<u8>,
    pub multiplier: u16,
    /// Nuked amount as stored by the server (kilobyte units once scaled on output).
    pub bytes: f32,
    #[serde(serialize_with = "serialize_text")]
    pub reason: Vec<u8>,
    #[serde(serialize_with = "serialize_text")]
    pub dirname: Vec<u8>,
}

impl NukeEntry {
    pub fn decode(buf: &[u8], variant: LayoutVariant) -> Result<Self> {
        let l = variant.nuke();
        ensure_len(buf, l.size, "nukelog")?;
        Ok(Self {
            status: NukeStatus::from_raw(get_u16(buf, l.status)),
            nuketime: get_wide(buf, l.nuketime) as u32,
            nuker: get_text(buf, l.nuker, NAME_LEN),
            unnuker: get_text(buf, l.unnuker, NAME_LEN),
            nukee: get_text(buf, l.nukee, NAME_LEN),
            multiplier: get_u16(buf, l.mult),
            bytes: f32::from_bits(get_u32(buf, l.bytes)),
            reason: get_text(buf, l.reason, REASON_LEN),
            dirname: get_text(buf, l.dirname, DIRNAME_LEN),
        })
    }

    pub fn encode(&self, variant: LayoutVariant) -> Vec<u8> {
        let l = variant.nuke();
        let mut buf = vec![0u8; l.size];
        buf[l.status..l.status + 2].copy_from_slice(&self.status.raw().to_ne_bytes());
        put_wide(&mut buf, l.nuketime, i64::from(self.nuketime));
        put_text(&mut buf, l.nuker, NAME_LEN, &self.nuker);
        put_text(&mut buf, l.unnuker, NAME_LEN, &self.unnuker);
        put_text(&mut buf, l.nukee, NAME_LEN, &self.nukee);
        buf[l.mult..l.mult + 2].copy_from_slice(&self.multiplier.to_ne_bytes());
        buf[l.bytes..l.bytes + 4].copy_from_slice(&self.bytes.to_bits().to_ne_bytes());
        put_text(&mut buf, l.reason, REASON_LEN, &self.reason);
        put_text(&mut buf, l.dirname, DIRNAME_LEN, &self.dirname);
        buf
    }

    pub fn basename(&self) -> &[u8] {
        basename(&self.dirname)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NukeEntry {
        NukeEntry {
            status: NukeStatus::Unnuked,
            nuketime: 1_650_000_000,
            nuker: "siteop".into(),
            unnuker: "helper".into(),
            nukee: "racer".into(),
            multiplier: 3,
            bytes: 734_003.2,
            reason: "dupe.from.2019".into(),
            dirname: "/site/mp3/Artist-Album-2024-GRP".into(),
        }
    }

    #[test]
    fn decode_reverses_encode_on_every_layout() {
        let e = sample();
        for v in LayoutVariant::ALL {
            let buf = e.encode(v);
            assert_eq!(buf.len(), v.nuke().size);
            assert_eq!(NukeEntry::decode(&buf, v).unwrap(), e, "{v}");
        }
    }

    #[test]
    fn packed_offsets_match_server_struct() {
        let v = LayoutVariant::V20264;
        let mut raw = vec![0u8; v.nuke().size];
        raw[0..2].copy_from_slice(&0u16.to_ne_bytes());
        raw[4..8].copy_from_slice(&99u32.to_ne_bytes());
        raw[8..12].copy_from_slice(b"bob\0");
        raw[32..36].copy_from_slice(b"eve\0");
        raw[44..46].copy_from_slice(&5u16.to_ne_bytes());
        raw[48..52].copy_from_slice(&2.0f32.to_bits().to_ne_bytes());
        raw[52..56].copy_from_slice(b"bad\0");
        raw[112..119].copy_from_slice(b"/site/x");
        let e = NukeEntry::decode(&raw, v).unwrap();
        assert_eq!(e.status, NukeStatus::Nuked);
        assert_eq!(e.nuketime, 99);
        assert_eq!(e.nuker, b"bob");
        assert!(e.unnuker.is_empty());
        assert_eq!(e.nukee, b"eve");
        assert_eq!(e.multiplier, 5);
        assert_eq!(e.bytes, 2.0);
        assert_eq!(e.reason, b"bad");
        assert_eq!(e.dirname, b"/site/x");
        assert_eq!(e.basename(), b"x");
        assert_eq!(e.encode(v), raw);
    }

    #[test]
    fn short_buffer_is_rejected() {
        let v = LayoutVariant::V20164;
        assert!(NukeEntry::decode(&vec![0u8; 391], v).is_err());
        assert!(NukeEntry::decode(&vec![0u8; 392], v).is_ok());
    }
}
