/// Straight-alpha RGBA color with channels in `[0, 1]`.
///
/// Scene objects carry colors as `#RRGGBB` strings; the renderer parses them into this type,
/// takes alpha from object opacity, and premultiplies right before writing vertices
/// (the batch pipeline blends premultiplied).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn black() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    #[inline]
    pub const fn white() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }

    fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Parses `#RRGGBB` (case-insensitive). Returns `None` for anything else.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().strip_prefix('#')?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::from_rgb8(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Replaces alpha, clamped to `[0, 1]`. NaN becomes 0.
    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        let a = if a.is_nan() { 0.0 } else { a.clamp(0.0, 1.0) };
        Self { a, ..self }
    }

    /// Premultiplied channels in vertex order `[r, g, b, a]`.
    #[inline]
    pub fn premultiplied(self) -> [f32; 4] {
        let a = self.a.clamp(0.0, 1.0);
        [
            self.r.clamp(0.0, 1.0) * a,
            self.g.clamp(0.0, 1.0) * a,
            self.b.clamp(0.0, 1.0) * a,
            a,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_digit_hex() {
        let c = Color::from_hex("#FF8000").unwrap();
        assert_eq!((c.r, c.b, c.a), (1.0, 0.0, 1.0));
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn parses_lowercase_and_surrounding_whitespace() {
        assert_eq!(Color::from_hex("  #00ff00 "), Some(Color::new(0.0, 1.0, 0.0, 1.0)));
    }

    #[test]
    fn rejects_malformed_hex() {
        for bad in ["", "#", "00ff00", "#00ff0", "#00ff000", "#gg0000", "red", "#ÿÿÿ"] {
            assert_eq!(Color::from_hex(bad), None, "{bad:?}");
        }
    }

    #[test]
    fn opacity_is_clamped() {
        assert_eq!(Color::white().with_alpha(3.0).a, 1.0);
        assert_eq!(Color::white().with_alpha(-1.0).a, 0.0);
        assert_eq!(Color::white().with_alpha(f32::NAN).a, 0.0);
    }

    #[test]
    fn premultiplied_scales_rgb_by_alpha() {
        assert_eq!(Color::new(1.0, 0.5, 0.0, 0.5).premultiplied(), [0.5, 0.25, 0.0, 0.5]);
    }
}
