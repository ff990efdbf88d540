use std::fmt;

/// Four-character code as used for resource types and QuickTime codecs.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub const PICT: FourCC = FourCC(*b"PICT");
    pub const RAW_PICT: FourCC = FourCC(*b"pict");
    pub const JPEG: FourCC = FourCC(*b"jpeg");

    pub fn from_u32(value: u32) -> Self {
        Self(value.to_be_bytes())
    }

    pub fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("'")?;
        for &b in &self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        f.write_str("'")
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_u32() {
        assert_eq!(FourCC::JPEG.to_string(), "'jpeg'");
        assert_eq!(FourCC::from_u32(0x6A70_6567), FourCC::JPEG);
        assert_eq!(FourCC(*b"mj\x00g").to_string(), "'mj\\x00g'");
    }
}
