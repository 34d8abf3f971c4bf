use crate::coords::Rect;
use crate::scene::RenderObject;

/// Keeps objects whose box touches the padded camera bounds.
///
/// Linear scan, no spatial index. The result is a list of indices into the frame's object
/// list, in input order; its allocation is reused across frames.
#[derive(Debug, Default)]
pub struct Culler {
    visible: Vec<u32>,
}

impl Culler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indices of the objects in `objects` that are visible and overlap `bounds`.
    pub fn cull(&mut self, objects: &[RenderObject], bounds: Rect) -> &[u32] {
        self.visible.clear();
        self.visible.extend(
            objects
                .iter()
                .enumerate()
                .filter(|(_, o)| o.visible && o.bounds().overlaps(bounds))
                .map(|(i, _)| i as u32),
        );
        &self.visible
    }

    /// Result of the last `cull`.
    #[inline]
    pub fn visible(&self) -> &[u32] {
        &self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::RenderObject;

    fn view() -> Rect {
        Rect::new(0.0, 0.0, 800.0, 600.0)
    }

    #[test]
    fn invisible_objects_never_survive() {
        let objects = [RenderObject::rectangle(1, 10.0, 10.0, 50.0, 50.0).with_visible(false)];
        assert!(Culler::new().cull(&objects, view()).is_empty());
    }

    #[test]
    fn outside_objects_are_dropped_and_intersecting_kept() {
        let objects = [
            RenderObject::rectangle(1, -500.0, 0.0, 100.0, 100.0),
            RenderObject::rectangle(2, 790.0, 590.0, 100.0, 100.0),
            RenderObject::rectangle(3, 2000.0, 2000.0, 10.0, 10.0),
            RenderObject::circle(4, 100.0, 100.0, 20.0),
        ];
        assert_eq!(Culler::new().cull(&objects, view()), &[1, 3]);
    }

    #[test]
    fn scale_is_part_of_the_box() {
        // 10 wide at x=-40 misses; scaled x5 it reaches into the view.
        let obj = RenderObject::rectangle(1, -40.0, 0.0, 10.0, 10.0);
        assert!(Culler::new().cull(&[obj.clone()], view()).is_empty());
        assert_eq!(Culler::new().cull(&[obj.with_scale(5.0, 1.0)], view()), &[0]);
    }

    #[test]
    fn output_preserves_input_order_and_buffer_is_reused() {
        let mut culler = Culler::new();
        let objects: Vec<_> =
            (0..10).map(|i| RenderObject::rectangle(i, i as f32 * 10.0, 0.0, 5.0, 5.0).with_z(10 - i as i32)).collect();
        assert_eq!(culler.cull(&objects, view()), &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert!(culler.cull(&objects[..2], Rect::new(1000.0, 1000.0, 1.0, 1.0)).is_empty());
        assert!(culler.visible().is_empty());
    }
}
