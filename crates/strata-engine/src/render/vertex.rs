use bytemuck::{Pod, Zeroable};

/// Batch vertex: scene-space position, atlas UV, premultiplied color.
///
/// Untextured kinds use UV `(0, 0)` and are drawn with a 1×1 white texture bound, so the
/// fragment stage is a single `color * sample` for every kind.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub texcoord: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    /// Size of one vertex in bytes.
    pub const STRIDE: u64 = std::mem::size_of::<Vertex>() as u64;

    pub const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x2, // texcoord
        2 => Float32x4  // color
    ];

    #[inline]
    pub const fn new(position: [f32; 2], texcoord: [f32; 2], color: [f32; 4]) -> Self {
        Self { position, texcoord, color }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_is_tightly_packed() {
        assert_eq!(Vertex::STRIDE, 32);
    }
}
