//! Batch compositor: z-sort, group by kind, emit vertices.
//!
//! Grouping is global per kind, so paint order across kinds is not preserved (a circle at
//! z = 0 can end up above a rectangle at z = 5). Within a kind z-order holds, ties broken by
//! list position. Groups come out in order of their first member in the sorted sequence.

mod emit;

use std::cell::Cell;

use crate::scene::{ObjectId, ObjectKind, RenderObject, SortKey};

use self::emit::{EMITTERS, EmitCtx, Emitted};
use super::{TextureId, TextureSource, Vertex};

/// One frame's geometry for a single drawable kind.
///
/// Owned by the compositor and cleared, not freed, between frames.
#[derive(Debug, Clone)]
pub struct GeometryBatch {
    kind: ObjectKind,
    vertices: Vec<Vertex>,
    objects: Vec<ObjectId>,
    skipped: u32,
    texture: Option<TextureId>,
}

impl GeometryBatch {
    fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            vertices: Vec::new(),
            objects: Vec::new(),
            skipped: 0,
            texture: None,
        }
    }

    fn clear(&mut self) {
        self.vertices.clear();
        self.objects.clear();
        self.skipped = 0;
        self.texture = None;
    }

    #[inline]
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Objects that contributed geometry, in draw order.
    #[inline]
    pub fn objects(&self) -> &[ObjectId] {
        &self.objects
    }

    /// Atlas sampled by this batch; `None` means the white texture.
    #[inline]
    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Turns the culled object set into at most one [`GeometryBatch`] per kind.
#[derive(Debug)]
pub struct BatchCompositor {
    circle_segments: u32,
    sorted: Vec<SortKey>,
    batches: [GeometryBatch; ObjectKind::COUNT],
    group_order: Vec<ObjectKind>,

    warned_color: bool,
    warned_texture: bool,
}

impl BatchCompositor {
    /// Circles get `circle_segments` fan triangles (at least 3).
    pub fn new(circle_segments: u32) -> Self {
        Self {
            circle_segments: circle_segments.max(3),
            sorted: Vec::new(),
            batches: ObjectKind::ALL.map(GeometryBatch::new),
            group_order: Vec::with_capacity(ObjectKind::COUNT),
            warned_color: false,
            warned_texture: false,
        }
    }

    /// Builds this frame's batches from `objects[i]` for each `i` in `visible`.
    ///
    /// Returns the number of non-empty batches (one draw each).
    pub fn compose(
        &mut self,
        objects: &[RenderObject],
        visible: &[u32],
        textures: &dyn TextureSource,
    ) -> usize {
        for batch in self.batches.iter_mut() {
            batch.clear();
        }
        self.group_order.clear();

        self.sorted.clear();
        self.sorted.extend(visible.iter().map(|&i| SortKey::new(objects[i as usize].z_index, i)));
        self.sorted.sort_unstable();

        let ctx = EmitCtx {
            textures,
            circle_segments: self.circle_segments,
            bad_color: Cell::new(false),
            missing_glyph: Cell::new(false),
        };
        let atlas = textures.atlas();

        for key in &self.sorted {
            let obj = &objects[key.index() as usize];
            let kind = obj.kind();
            if !self.group_order.contains(&kind) {
                self.group_order.push(kind);
            }

            let batch = &mut self.batches[kind.index()];
            match EMITTERS[kind.index()](obj, &ctx, &mut batch.vertices) {
                Emitted::Drawn => batch.objects.push(obj.id),
                Emitted::MissingTexture => batch.skipped += 1,
            }
            if kind.is_textured() {
                batch.texture = atlas;
            }
        }

        if ctx.bad_color.get() && !self.warned_color {
            self.warned_color = true;
            log::debug!("unparseable color string; drawing black instead");
        }
        let missing = ctx.missing_glyph.get() || self.skipped_objects() > 0;
        if missing && !self.warned_texture {
            self.warned_texture = true;
            log::debug!("texture region unavailable; affected objects or glyphs skipped");
        }

        self.groups().count()
    }

    /// Non-empty batches of the last `compose`, in emission order.
    pub fn groups(&self) -> impl Iterator<Item = &GeometryBatch> + '_ {
        self.group_order
            .iter()
            .map(|k| &self.batches[k.index()])
            .filter(|b| !b.is_empty())
    }

    /// Objects skipped during the last `compose`.
    pub fn skipped_objects(&self) -> u32 {
        self.batches.iter().map(|b| b.skipped).sum()
    }
}

impl Default for BatchCompositor {
    fn default() -> Self {
        Self::new(32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::NoTextures;
    use crate::scene::{Drawable, TextureKey};

    fn all(objects: &[RenderObject]) -> Vec<u32> {
        (0..objects.len() as u32).collect()
    }

    fn compose(c: &mut BatchCompositor, objects: &[RenderObject]) -> usize {
        c.compose(objects, &all(objects), &NoTextures)
    }

    #[test]
    fn one_group_per_kind() {
        let objects = [
            RenderObject::rectangle(1, 0.0, 0.0, 1.0, 1.0),
            RenderObject::circle(2, 0.0, 0.0, 1.0),
            RenderObject::rectangle(3, 0.0, 0.0, 1.0, 1.0),
            RenderObject::circle(4, 0.0, 0.0, 1.0),
        ];
        let mut c = BatchCompositor::default();
        assert_eq!(compose(&mut c, &objects), 2);
        let groups: Vec<_> = c.groups().map(|g| (g.kind(), g.objects().len())).collect();
        assert_eq!(groups, vec![(ObjectKind::Rectangle, 2), (ObjectKind::Circle, 2)]);
    }

    #[test]
    fn equal_z_keeps_input_order() {
        let objects: Vec<_> =
            (0..8).map(|i| RenderObject::rectangle(i, 0.0, 0.0, 1.0, 1.0).with_z(3)).collect();
        let mut c = BatchCompositor::default();
        compose(&mut c, &objects);
        let ids: Vec<u64> = c.groups().next().unwrap().objects().iter().map(|id| id.0).collect();
        assert_eq!(ids, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn sorts_by_z_within_a_kind() {
        let objects = [
            RenderObject::rectangle(1, 0.0, 0.0, 1.0, 1.0).with_z(5),
            RenderObject::rectangle(2, 0.0, 0.0, 1.0, 1.0).with_z(-1),
            RenderObject::rectangle(3, 0.0, 0.0, 1.0, 1.0).with_z(5),
            RenderObject::rectangle(4, 0.0, 0.0, 1.0, 1.0).with_z(0),
        ];
        let mut c = BatchCompositor::default();
        compose(&mut c, &objects);
        let ids: Vec<u64> = c.groups().next().unwrap().objects().iter().map(|id| id.0).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }

    #[test]
    fn groups_follow_first_appearance_after_sorting() {
        let objects = [
            RenderObject::rectangle(1, 0.0, 0.0, 1.0, 1.0).with_z(2),
            RenderObject::circle(2, 0.0, 0.0, 1.0).with_z(1),
        ];
        let mut c = BatchCompositor::default();
        compose(&mut c, &objects);
        let kinds: Vec<_> = c.groups().map(GeometryBatch::kind).collect();
        assert_eq!(kinds, vec![ObjectKind::Circle, ObjectKind::Rectangle]);
    }

    #[test]
    fn only_visible_indices_are_composed() {
        let objects = [
            RenderObject::rectangle(1, 0.0, 0.0, 1.0, 1.0),
            RenderObject::rectangle(2, 0.0, 0.0, 1.0, 1.0),
        ];
        let mut c = BatchCompositor::default();
        c.compose(&objects, &[1], &NoTextures);
        assert_eq!(c.groups().next().unwrap().objects(), &[ObjectId(2)]);
    }

    #[test]
    fn missing_textures_skip_objects_not_the_frame() {
        let objects = [
            RenderObject::new(ObjectId(1), Drawable::Image(TextureKey(1)), 0.0, 0.0, 4.0, 4.0),
            RenderObject::rectangle(2, 0.0, 0.0, 1.0, 1.0),
        ];
        let mut c = BatchCompositor::default();
        assert_eq!(compose(&mut c, &objects), 1);
        assert_eq!(c.skipped_objects(), 1);
        assert_eq!(c.groups().next().unwrap().kind(), ObjectKind::Rectangle);
    }

    #[test]
    fn batches_are_cleared_between_frames() {
        let objects = [RenderObject::rectangle(1, 0.0, 0.0, 1.0, 1.0)];
        let mut c = BatchCompositor::default();
        compose(&mut c, &objects);
        compose(&mut c, &objects);
        assert_eq!(c.groups().next().unwrap().vertex_count(), 6);
        assert_eq!(compose(&mut c, &[]), 0);
    }

    #[test]
    fn segment_count_has_a_floor() {
        let objects = [RenderObject::circle(1, 0.0, 0.0, 10.0)];
        let mut c = BatchCompositor::new(1);
        compose(&mut c, &objects);
        assert_eq!(c.groups().next().unwrap().vertex_count(), 9);
    }
}
