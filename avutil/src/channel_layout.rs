//! Channel layouts as libavutil `AV_CH_*` bitmasks.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A set of speaker positions, stored as the native 64-bit channel mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChannelLayout(u64);

impl ChannelLayout {
    pub const FRONT_LEFT: u64 = 0x1;
    pub const FRONT_RIGHT: u64 = 0x2;
    pub const FRONT_CENTER: u64 = 0x4;
    pub const LOW_FREQUENCY: u64 = 0x8;
    pub const BACK_LEFT: u64 = 0x10;
    pub const BACK_RIGHT: u64 = 0x20;
    pub const FRONT_LEFT_OF_CENTER: u64 = 0x40;
    pub const FRONT_RIGHT_OF_CENTER: u64 = 0x80;
    pub const BACK_CENTER: u64 = 0x100;
    pub const SIDE_LEFT: u64 = 0x200;
    pub const SIDE_RIGHT: u64 = 0x400;
    pub const TOP_CENTER: u64 = 0x800;

    pub const MONO: ChannelLayout = ChannelLayout(Self::FRONT_CENTER);
    pub const STEREO: ChannelLayout = ChannelLayout(Self::FRONT_LEFT | Self::FRONT_RIGHT);
    pub const LAYOUT_2POINT1: ChannelLayout = ChannelLayout(Self::STEREO.0 | Self::LOW_FREQUENCY);
    pub const SURROUND: ChannelLayout = ChannelLayout(Self::STEREO.0 | Self::FRONT_CENTER);
    pub const LAYOUT_3POINT1: ChannelLayout = ChannelLayout(Self::SURROUND.0 | Self::LOW_FREQUENCY);
    pub const LAYOUT_4POINT0: ChannelLayout = ChannelLayout(Self::SURROUND.0 | Self::BACK_CENTER);
    pub const QUAD: ChannelLayout =
        ChannelLayout(Self::STEREO.0 | Self::BACK_LEFT | Self::BACK_RIGHT);
    pub const LAYOUT_5POINT0: ChannelLayout =
        ChannelLayout(Self::SURROUND.0 | Self::SIDE_LEFT | Self::SIDE_RIGHT);
    pub const LAYOUT_5POINT1: ChannelLayout =
        ChannelLayout(Self::LAYOUT_5POINT0.0 | Self::LOW_FREQUENCY);
    pub const LAYOUT_5POINT0_BACK: ChannelLayout =
        ChannelLayout(Self::SURROUND.0 | Self::BACK_LEFT | Self::BACK_RIGHT);
    pub const LAYOUT_5POINT1_BACK: ChannelLayout =
        ChannelLayout(Self::LAYOUT_5POINT0_BACK.0 | Self::LOW_FREQUENCY);
    pub const LAYOUT_7POINT1: ChannelLayout =
        ChannelLayout(Self::LAYOUT_5POINT1.0 | Self::BACK_LEFT | Self::BACK_RIGHT);

    // Names follow av_get_channel_layout_string().
    const NAMED: &'static [(&'static str, ChannelLayout)] = &[
        ("mono", Self::MONO),
        ("stereo", Self::STEREO),
        ("2.1", Self::LAYOUT_2POINT1),
        ("3.0", Self::SURROUND),
        ("3.1", Self::LAYOUT_3POINT1),
        ("4.0", Self::LAYOUT_4POINT0),
        ("quad", Self::QUAD),
        ("5.0", Self::LAYOUT_5POINT0_BACK),
        ("5.0(side)", Self::LAYOUT_5POINT0),
        ("5.1", Self::LAYOUT_5POINT1_BACK),
        ("5.1(side)", Self::LAYOUT_5POINT1),
        ("7.1", Self::LAYOUT_7POINT1),
    ];

    /// Wraps a raw `AV_CH_*` mask.
    pub const fn from_mask(mask: u64) -> Self {
        Self(mask)
    }

    /// Returns the raw mask.
    pub const fn mask(self) -> u64 {
        self.0
    }

    /// Number of channels in the layout.
    pub const fn channels(self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Default layout for a channel count, like av_get_default_channel_layout().
    pub fn default_for(channels: usize) -> Option<Self> {
        match channels {
            1 => Some(Self::MONO),
            2 => Some(Self::STEREO),
            3 => Some(Self::SURROUND),
            4 => Some(Self::QUAD),
            5 => Some(Self::LAYOUT_5POINT0_BACK),
            6 => Some(Self::LAYOUT_5POINT1_BACK),
            8 => Some(Self::LAYOUT_7POINT1),
            _ => None,
        }
    }

    /// Returns the conventional name, if this is a well-known layout.
    pub fn name(self) -> Option<&'static str> {
        Self::NAMED
            .iter()
            .find(|(_, layout)| *layout == self)
            .map(|(name, _)| *name)
    }
}

impl From<u64> for ChannelLayout {
    fn from(mask: u64) -> Self {
        Self(mask)
    }
}

impl fmt::Display for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{:#x}", self.0),
        }
    }
}

/// Error returned when a channel layout string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown channel layout {0:?}")]
pub struct ParseLayoutError(String);

impl FromStr for ChannelLayout {
    type Err = ParseLayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((_, layout)) = Self::NAMED.iter().find(|(name, _)| *name == s) {
            return Ok(*layout);
        }
        if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            return u64::from_str_radix(hex, 16)
                .map(Self)
                .map_err(|_| ParseLayoutError(s.to_string()));
        }
        // "<n>c" picks the default layout for n channels.
        if let Some(n) = s.strip_suffix('c').and_then(|n| n.parse::<usize>().ok()) {
            return Self::default_for(n).ok_or_else(|| ParseLayoutError(s.to_string()));
        }
        Err(ParseLayoutError(s.to_string()))
    }
}

impl Serialize for ChannelLayout {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ChannelLayout {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LayoutVisitor;

        impl Visitor<'_> for LayoutVisitor {
            type Value = ChannelLayout;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a channel layout name, hex mask or integer mask")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(ChannelLayout(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                u64::try_from(v)
                    .map(ChannelLayout)
                    .map_err(|_| E::custom("negative channel mask"))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(LayoutVisitor)
    }
}
