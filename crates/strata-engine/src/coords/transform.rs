use super::Vec2;

/// 3×3 affine transform, row-major, acting on column vectors `(x, y, 1)`.
///
/// Only the top two rows carry information; the last row is always `[0, 0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat3 {
    pub rows: [[f32; 3]; 3],
}

impl Mat3 {
    pub const IDENTITY: Mat3 = Mat3 {
        rows: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// Uniform scale followed by translation: `p' = p * scale + (tx, ty)`.
    #[inline]
    pub const fn scale_translate(scale: f32, tx: f32, ty: f32) -> Self {
        Self {
            rows: [[scale, 0.0, tx], [0.0, scale, ty], [0.0, 0.0, 1.0]],
        }
    }

    #[inline]
    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        let m = &self.rows;
        Vec2::new(
            m[0][0] * p.x + m[0][1] * p.y + m[0][2],
            m[1][0] * p.x + m[1][1] * p.y + m[1][2],
        )
    }

    /// Column-major layout padded to WGSL `mat3x3<f32>` uniform alignment
    /// (each column occupies 16 bytes).
    pub fn to_wgsl_columns(&self) -> [[f32; 4]; 3] {
        let m = &self.rows;
        [
            [m[0][0], m[1][0], m[2][0], 0.0],
            [m[0][1], m[1][1], m[2][1], 0.0],
            [m[0][2], m[1][2], m[2][2], 0.0],
        ]
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}
