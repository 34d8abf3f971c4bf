use std::sync::Arc;

use crate::coords::{Rect, Vec2};

use super::{Drawable, ObjectKind, ZIndex};

/// Stable, host-assigned object identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ObjectId(pub u64);

/// A frame's object snapshot.
///
/// Identity matters: the renderer skips a frame when it receives the very same allocation
/// again and nothing else changed. Hosts that edit objects must publish a new list.
pub type ObjectList = Arc<[RenderObject]>;

/// A drawable unit as handed to the renderer.
///
/// Geometry is in scene units. `position` is the top-left of the unscaled box; scale
/// stretches the box away from that corner and rotation (degrees, clockwise on screen)
/// turns the scaled box around its center.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderObject {
    pub id: ObjectId,
    pub drawable: Drawable,
    pub position: Vec2,
    pub size: Vec2,
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    /// 0 (transparent) ..= 1 (opaque).
    pub opacity: f32,
    pub visible: bool,
    pub z_index: ZIndex,
    /// `#RRGGBB`. Text uses it as glyph color; images ignore it.
    pub fill: String,
    /// `#RRGGBB`; `None` disables the stroke.
    pub stroke: Option<String>,
    pub stroke_width: f32,
}

impl RenderObject {
    /// Creates a visible, opaque, unrotated, unscaled object with a black fill.
    pub fn new(id: ObjectId, drawable: Drawable, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            id,
            drawable,
            position: Vec2::new(x, y),
            size: Vec2::new(width, height),
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            opacity: 1.0,
            visible: true,
            z_index: ZIndex::default(),
            fill: String::from("#000000"),
            stroke: None,
            stroke_width: 0.0,
        }
    }

    pub fn rectangle(id: u64, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(ObjectId(id), Drawable::Rectangle, x, y, width, height)
    }

    pub fn circle(id: u64, x: f32, y: f32, diameter: f32) -> Self {
        Self::new(ObjectId(id), Drawable::Circle, x, y, diameter, diameter)
    }

    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = fill.into();
        self
    }

    pub fn with_stroke(mut self, stroke: impl Into<String>, width: f32) -> Self {
        self.stroke = Some(stroke.into());
        self.stroke_width = width;
        self
    }

    pub fn with_z(mut self, z: i32) -> Self {
        self.z_index = ZIndex(z);
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_scale(mut self, scale_x: f32, scale_y: f32) -> Self {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[inline]
    pub fn kind(&self) -> ObjectKind {
        self.drawable.kind()
    }

    /// Size after per-axis scale. Components may be negative (mirrored objects).
    #[inline]
    pub fn scaled_size(&self) -> Vec2 {
        self.size.scale(self.scale_x, self.scale_y)
    }

    /// Axis-aligned box from position, size and scale.
    ///
    /// Rotation is not applied; the cull padding absorbs rotated overhang.
    #[inline]
    pub fn bounds(&self) -> Rect {
        let s = self.scaled_size();
        Rect::new(self.position.x, self.position.y, s.x, s.y).normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_apply_per_axis_scale() {
        let o = RenderObject::rectangle(1, 10.0, 20.0, 30.0, 40.0).with_scale(2.0, 0.5);
        assert_eq!(o.bounds(), Rect::new(10.0, 20.0, 60.0, 20.0));
    }

    #[test]
    fn bounds_ignore_rotation() {
        let o = RenderObject::rectangle(1, 0.0, 0.0, 100.0, 10.0).with_rotation(45.0);
        assert_eq!(o.bounds(), Rect::new(0.0, 0.0, 100.0, 10.0));
    }

    #[test]
    fn mirrored_scale_extends_left_of_position() {
        let o = RenderObject::rectangle(1, 50.0, 0.0, 10.0, 10.0).with_scale(-1.0, 1.0);
        assert_eq!(o.bounds(), Rect::new(40.0, 0.0, 10.0, 10.0));
    }
}
