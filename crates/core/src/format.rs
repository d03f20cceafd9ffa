use std::{fmt, num::NonZeroU32, str::FromStr};

use crate::registry::VideoFormat;

/// Four-character code tagging a raw pixel layout.
///
/// The packed `u32` uses the little-endian convention, so `I420` packs as
/// `'I' | '4' << 8 | '2' << 16 | '0' << 24`.
///
/// # Example
/// ```rust
/// use pixpack_core::prelude::FourCc;
///
/// let fcc = FourCc::new(*b"NV12");
/// assert_eq!(fcc.to_string(), "NV12");
/// assert_eq!(FourCc::from(fcc.to_u32()), fcc);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCc([u8; 4]);

impl FourCc {
    /// Construct from raw bytes.
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Raw bytes in code order.
    pub const fn bytes(self) -> [u8; 4] {
        self.0
    }

    /// Little-endian u32 encoding.
    pub const fn to_u32(self) -> u32 {
        u32::from_le_bytes(self.0)
    }

    /// Try to convert to a printable string.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }
}

impl From<u32> for FourCc {
    fn from(value: u32) -> Self {
        Self(value.to_le_bytes())
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(s) = self.as_str() {
            write!(f, "{s}")
        } else {
            write!(f, "0x{:08x}", self.to_u32())
        }
    }
}

impl FromStr for FourCc {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 4 {
            return Err("fourcc must be four ASCII bytes".into());
        }
        let mut arr = [0u8; 4];
        arr.copy_from_slice(bytes);
        Ok(FourCc(arr))
    }
}

/// Resolution of a frame.
///
/// # Example
/// ```rust
/// use pixpack_core::prelude::Resolution;
///
/// let res = Resolution::new(640, 480).unwrap();
/// assert_eq!(res.width.get(), 640);
/// assert!(Resolution::new(0, 480).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resolution {
    /// Width in pixels (non-zero).
    pub width: NonZeroU32,
    /// Height in pixels (non-zero).
    pub height: NonZeroU32,
}

impl Resolution {
    /// Create a resolution, returning `None` if width or height are zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Some(Self {
            width: NonZeroU32::new(width)?,
            height: NonZeroU32::new(height)?,
        })
    }

    /// Width as `usize`.
    pub fn width(&self) -> usize {
        self.width.get() as usize
    }

    /// Height as `usize`.
    pub fn height(&self) -> usize {
        self.height.get() as usize
    }
}

/// Pixel format plus resolution of a frame.
///
/// # Example
/// ```rust
/// use pixpack_core::prelude::{MediaFormat, Resolution, VideoFormat};
///
/// let fmt = MediaFormat::new(VideoFormat::Yuy2, Resolution::new(320, 240).unwrap());
/// assert_eq!(fmt.to_string(), "YUY2 320x240");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaFormat {
    pub format: VideoFormat,
    pub resolution: Resolution,
}

impl MediaFormat {
    pub fn new(format: VideoFormat, resolution: Resolution) -> Self {
        Self { format, resolution }
    }
}

impl fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}x{}",
            self.format,
            self.resolution.width,
            self.resolution.height
        )
    }
}

/// Chroma sample siting convention.
///
/// Pack routines accept a siting hint; it does not change their output today.
///
/// # Example
/// ```rust
/// use pixpack_core::prelude::ChromaSite;
///
/// assert_eq!(ChromaSite::from_string("mpeg2"), ChromaSite::Mpeg2);
/// assert_eq!(ChromaSite::Dv.as_str(), Some("dv"));
/// assert_eq!(ChromaSite::from_string("cosited"), ChromaSite::Unknown);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ChromaSite {
    #[default]
    Unknown,
    /// Chroma centered between luma samples both ways.
    Jpeg,
    /// Chroma cosited horizontally, centered vertically.
    Mpeg2,
    /// Chroma cosited with the top-left luma sample, alternating lines.
    Dv,
}

const CHROMA_SITES: [(&str, ChromaSite); 3] = [
    ("jpeg", ChromaSite::Jpeg),
    ("mpeg2", ChromaSite::Mpeg2),
    ("dv", ChromaSite::Dv),
];

impl ChromaSite {
    /// Parse a siting name; unknown names map to [`ChromaSite::Unknown`].
    pub fn from_string(s: &str) -> Self {
        CHROMA_SITES
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, site)| *site)
            .unwrap_or(ChromaSite::Unknown)
    }

    /// Canonical name, `None` for [`ChromaSite::Unknown`].
    pub fn as_str(self) -> Option<&'static str> {
        CHROMA_SITES
            .iter()
            .find(|(_, site)| *site == self)
            .map(|(name, _)| *name)
    }
}

/// Byte order of a pixel description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    /// Byte order of the running host.
    pub const fn native() -> Self {
        if cfg!(target_endian = "little") {
            Endianness::Little
        } else {
            Endianness::Big
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fourcc_parse_and_pack() {
        let fcc: FourCc = "YUV9".parse().unwrap();
        assert_eq!(fcc.to_u32(), u32::from_le_bytes(*b"YUV9"));
        assert!("YUV".parse::<FourCc>().is_err());
        assert_eq!(FourCc::from(0xff).to_string(), "0x000000ff");
    }

    #[test]
    fn chroma_site_names_round_trip() {
        for site in [ChromaSite::Jpeg, ChromaSite::Mpeg2, ChromaSite::Dv] {
            let name = site.as_str().unwrap();
            assert_eq!(ChromaSite::from_string(name), site);
        }
        assert_eq!(ChromaSite::Unknown.as_str(), None);
        assert_eq!(ChromaSite::from_string("JPEG"), ChromaSite::Unknown);
    }
}
