//! Sample formats, numbered like `enum AVSampleFormat`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Encoding of one audio sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum SampleFormat {
    #[default]
    None = -1,
    U8 = 0,
    S16 = 1,
    S32 = 2,
    Flt = 3,
    Dbl = 4,
    U8P = 5,
    S16P = 6,
    S32P = 7,
    FltP = 8,
    DblP = 9,
    S64 = 10,
    S64P = 11,
}

impl SampleFormat {
    const ALL: [SampleFormat; 12] = [
        Self::U8,
        Self::S16,
        Self::S32,
        Self::Flt,
        Self::Dbl,
        Self::U8P,
        Self::S16P,
        Self::S32P,
        Self::FltP,
        Self::DblP,
        Self::S64,
        Self::S64P,
    ];

    /// Converts a native `AVSampleFormat` value.
    pub fn from_raw(raw: i32) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|f| *f as i32 == raw)
            .unwrap_or(Self::None)
    }

    /// Returns the native `AVSampleFormat` value.
    pub fn as_raw(self) -> i32 {
        self as i32
    }

    /// Bytes used by one sample of one channel.
    pub fn bytes_per_sample(self) -> usize {
        match self {
            Self::None => 0,
            Self::U8 | Self::U8P => 1,
            Self::S16 | Self::S16P => 2,
            Self::S32 | Self::S32P | Self::Flt | Self::FltP => 4,
            Self::Dbl | Self::DblP | Self::S64 | Self::S64P => 8,
        }
    }

    pub fn is_planar(self) -> bool {
        matches!(
            self,
            Self::U8P | Self::S16P | Self::S32P | Self::FltP | Self::DblP | Self::S64P
        )
    }

    /// The packed (interleaved) variant of this format.
    pub fn packed(self) -> Self {
        match self {
            Self::U8P => Self::U8,
            Self::S16P => Self::S16,
            Self::S32P => Self::S32,
            Self::FltP => Self::Flt,
            Self::DblP => Self::Dbl,
            Self::S64P => Self::S64,
            other => other,
        }
    }

    /// The planar variant of this format.
    pub fn planar(self) -> Self {
        match self {
            Self::U8 => Self::U8P,
            Self::S16 => Self::S16P,
            Self::S32 => Self::S32P,
            Self::Flt => Self::FltP,
            Self::Dbl => Self::DblP,
            Self::S64 => Self::S64P,
            other => other,
        }
    }

    /// Number of data planes for `channels` channels in this format.
    pub fn planes(self, channels: usize) -> usize {
        if self.is_planar() { channels } else { 1 }
    }

    /// Byte value a silent sample is made of.
    ///
    /// Unsigned 8-bit audio is centred on 0x80, everything else on zero.
    pub fn silence_byte(self) -> u8 {
        match self {
            Self::U8 | Self::U8P => 0x80,
            _ => 0,
        }
    }

    /// Short name as used by av_get_sample_fmt_name().
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::U8 => "u8",
            Self::S16 => "s16",
            Self::S32 => "s32",
            Self::Flt => "flt",
            Self::Dbl => "dbl",
            Self::U8P => "u8p",
            Self::S16P => "s16p",
            Self::S32P => "s32p",
            Self::FltP => "fltp",
            Self::DblP => "dblp",
            Self::S64 => "s64",
            Self::S64P => "s64p",
        }
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a sample format name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sample format {0:?}")]
pub struct ParseFormatError(String);

impl FromStr for SampleFormat {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::None.name() {
            return Ok(Self::None);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.name() == s)
            .ok_or_else(|| ParseFormatError(s.to_string()))
    }
}

impl Serialize for SampleFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for SampleFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_values() {
        assert_eq!(SampleFormat::S16.as_raw(), 1);
        assert_eq!(SampleFormat::FltP.as_raw(), 8);
        assert_eq!(SampleFormat::from_raw(11), SampleFormat::S64P);
        assert_eq!(SampleFormat::from_raw(42), SampleFormat::None);
        assert_eq!(SampleFormat::from_raw(-1), SampleFormat::None);
    }

    #[test]
    fn test_bytes_per_sample() {
        assert_eq!(SampleFormat::U8.bytes_per_sample(), 1);
        assert_eq!(SampleFormat::S16P.bytes_per_sample(), 2);
        assert_eq!(SampleFormat::Flt.bytes_per_sample(), 4);
        assert_eq!(SampleFormat::DblP.bytes_per_sample(), 8);
        assert_eq!(SampleFormat::None.bytes_per_sample(), 0);
    }

    #[test]
    fn test_planar_packed() {
        assert!(SampleFormat::FltP.is_planar());
        assert!(!SampleFormat::Flt.is_planar());
        assert_eq!(SampleFormat::FltP.packed(), SampleFormat::Flt);
        assert_eq!(SampleFormat::S16.planar(), SampleFormat::S16P);
        assert_eq!(SampleFormat::S16.planes(2), 1);
        assert_eq!(SampleFormat::S16P.planes(2), 2);
    }

    #[test]
    fn test_names() {
        assert_eq!("fltp".parse::<SampleFormat>().unwrap(), SampleFormat::FltP);
        assert_eq!("none".parse::<SampleFormat>().unwrap(), SampleFormat::None);
        assert!("float".parse::<SampleFormat>().is_err());
        assert_eq!(SampleFormat::S32.to_string(), "s32");
    }

    #[test]
    fn test_serde_none() {
        let json = serde_json::to_string(&SampleFormat::None).unwrap();
        assert_eq!(json, "\"none\"");
        let back: SampleFormat = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SampleFormat::None);
    }

    #[test]
    fn test_silence_byte() {
        assert_eq!(SampleFormat::U8.silence_byte(), 0x80);
        assert_eq!(SampleFormat::S16.silence_byte(), 0);
    }
}
