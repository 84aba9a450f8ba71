use std::fmt;

/// An RGBA color with 8-bit channels.
///
/// Generators pass colors as the packed integer `0xRRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn packed(self) -> i64 {
        (i64::from(self.r) << 24) | (i64::from(self.g) << 16) | (i64::from(self.b) << 8) | i64::from(self.a)
    }

    pub fn from_packed(value: i64) -> Self {
        let channel = |shift: u32| ((value >> shift) & 0xff) as u8;
        Self::rgba(channel(24), channel(16), channel(8), channel(0))
    }

    /// HLS lightness in `[0, 1]`.
    pub fn lum(self) -> f64 {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        (f64::from(max) + f64::from(min)) / 510.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}
