use super::Vec2;

/// Axis-aligned box in scene units: `origin` is the top-left corner.
///
/// Boxes built from mirrored (negative) extents should go through [`Rect::normalized`]
/// before comparisons.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { origin: Vec2::new(x, y), size: Vec2::new(width, height) }
    }

    /// Box spanning two opposite corners, in either order.
    pub fn from_min_max(a: Vec2, b: Vec2) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self::new(x, y, a.x.max(b.x) - x, a.y.max(b.y) - y)
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    /// Same box with non-negative extents.
    pub fn normalized(self) -> Self {
        Self::from_min_max(self.min(), self.max())
    }

    /// Overlap over closed intervals. Shared edges count, so objects touching the view are
    /// kept by the culler.
    pub fn overlaps(self, other: Rect) -> bool {
        let (a, b) = (self.normalized(), other.normalized());
        let (a0, a1, b0, b1) = (a.min(), a.max(), b.min(), b.max());
        a0.x <= b1.x && b0.x <= a1.x && a0.y <= b1.y && b0.y <= a1.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(x, y, w, h)
    }

    #[test]
    fn corners_in_any_order() {
        let r = Rect::from_min_max(Vec2::new(5.0, 8.0), Vec2::new(1.0, 2.0));
        assert_eq!(r, rect(1.0, 2.0, 4.0, 6.0));
    }

    #[test]
    fn mirrored_extent_normalizes() {
        assert_eq!(rect(10.0, 10.0, -4.0, -3.0).normalized(), rect(6.0, 7.0, 4.0, 3.0));
    }

    #[test]
    fn shared_edge_overlaps() {
        assert!(rect(0.0, 0.0, 10.0, 10.0).overlaps(rect(10.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn contained_and_partial_overlap() {
        let view = rect(0.0, 0.0, 100.0, 100.0);
        assert!(view.overlaps(rect(10.0, 10.0, 1.0, 1.0)));
        assert!(view.overlaps(rect(90.0, -5.0, 50.0, 50.0)));
    }

    #[test]
    fn separated_boxes_do_not_overlap() {
        assert!(!rect(0.0, 0.0, 5.0, 5.0).overlaps(rect(0.0, 5.5, 5.0, 5.0)));
        assert!(!rect(0.0, 0.0, 5.0, 5.0).overlaps(rect(-20.0, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn mirrored_box_overlaps() {
        assert!(rect(10.0, 10.0, -5.0, -5.0).overlaps(rect(6.0, 6.0, 1.0, 1.0)));
    }
}
