use core::ops::{Add, Mul, Sub};

/// Point or extent in scene units or device pixels, depending on where it is used.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Per-axis multiply.
    #[inline]
    pub fn scale(self, sx: f32, sy: f32) -> Self {
        Self { x: self.x * sx, y: self.y * sy }
    }

    /// Rotation about the origin given a precomputed `sin_cos` pair. Clockwise on screen
    /// for positive angles, since +Y points down.
    #[inline]
    pub fn rotate(self, sin: f32, cos: f32) -> Self {
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    #[inline]
    pub fn into_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, o: Self) -> Self {
        Self { x: self.x + o.x, y: self.y + o.y }
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, o: Self) -> Self {
        Self { x: self.x - o.x, y: self.y - o.y }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, k: f32) -> Self {
        self.scale(k, k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_quarter_turn_points_down() {
        let (sin, cos) = core::f32::consts::FRAC_PI_2.sin_cos();
        let p = Vec2::new(2.0, 0.0).rotate(sin, cos);
        assert!(p.x.abs() < 1e-5 && (p.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn half_extent() {
        assert_eq!(Vec2::new(10.0, -4.0) * 0.5, Vec2::new(5.0, -2.0));
    }
}
