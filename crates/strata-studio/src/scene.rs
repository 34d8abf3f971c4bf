//! Synthetic scene used to exercise the renderer.

use strata_engine::coords::{Rect, Vec2};
use strata_engine::render::{AtlasMap, TextureId};
use strata_engine::scene::{
    Drawable, Glyph, GlyphRun, ObjectId, ObjectList, PathGeometry, RenderObject, TextureKey,
};

/// Scene extent in scene units; the camera wanders inside it.
pub const WORLD: Vec2 = Vec2::new(6000.0, 4000.0);

const CELL: u32 = 16;
pub const ATLAS_WIDTH: u32 = CELL * 4;
pub const ATLAS_HEIGHT: u32 = CELL;

const IMAGE_KEY: TextureKey = TextureKey(0);
const GLYPH_KEYS: [TextureKey; 3] = [TextureKey(1), TextureKey(2), TextureKey(3)];

/// Small deterministic generator (64-bit LCG, high bits out).
#[derive(Debug, Clone)]
struct Lcg(u64);

impl Lcg {
    fn next_u32(&mut self) -> u32 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 32) as u32
    }

    /// Uniform in `[0, 1)`.
    fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }

    fn color(&mut self) -> String {
        format!("#{:06X}", self.next_u32() & 0x00FF_FFFF)
    }
}

/// Opaque RGBA8 pixels for the demo atlas: a checkerboard image cell followed by three
/// block "glyph" cells.
pub fn atlas_pixels() -> Vec<u8> {
    let mut px = vec![0u8; (ATLAS_WIDTH * ATLAS_HEIGHT * 4) as usize];
    for y in 0..ATLAS_HEIGHT {
        for x in 0..ATLAS_WIDTH {
            let (cell, cx, cy) = (x / CELL, x % CELL, y % CELL);
            let on = match cell {
                0 => (cx / 4 + cy / 4) % 2 == 0,
                1 => true,
                2 => cy >= CELL / 2,
                _ => cx < 2 || cy < 2 || cx >= CELL - 2 || cy >= CELL - 2,
            };
            let (v, a) = match (on, cell) {
                (true, _) => (255, 255),
                (false, 0) => (64, 255),
                _ => (0, 0),
            };
            let i = ((y * ATLAS_WIDTH + x) * 4) as usize;
            px[i..i + 4].copy_from_slice(&[v, v, v, a]);
        }
    }
    px
}

/// Key -> UV table matching [`atlas_pixels`].
pub fn atlas_regions(atlas: TextureId) -> AtlasMap {
    let mut map = AtlasMap::new(atlas);
    let cell = CELL as f32;
    for (i, key) in std::iter::once(IMAGE_KEY).chain(GLYPH_KEYS).enumerate() {
        map.insert_pixels(key, Rect::new(i as f32 * cell, 0.0, cell, cell), ATLAS_WIDTH, ATLAS_HEIGHT);
    }
    map
}

/// A host-side scene: owns the objects, republishes a new list when it edits them.
pub struct DemoScene {
    objects: Vec<RenderObject>,
    list: ObjectList,
    rng: Lcg,
    frame: u64,
    mutate_every: u64,
}

impl DemoScene {
    pub fn new(count: usize, seed: u64) -> Self {
        let mut rng = Lcg(seed);
        let objects: Vec<_> = (0..count as u64).map(|id| random_object(&mut rng, id)).collect();
        let list: ObjectList = objects.clone().into();
        Self {
            objects,
            list,
            rng,
            frame: 0,
            mutate_every: 30,
        }
    }

    /// The currently published list.
    pub fn list(&self) -> &ObjectList {
        &self.list
    }

    /// Steps one frame. Every `mutate_every` frames about 1% of the objects drift and a
    /// new list is published; otherwise the same allocation is handed out again.
    pub fn advance(&mut self) -> ObjectList {
        self.frame += 1;
        if self.frame % self.mutate_every == 0 && !self.objects.is_empty() {
            let n = (self.objects.len() / 100).max(1);
            for _ in 0..n {
                let i = self.rng.next_u32() as usize % self.objects.len();
                let (dx, dy) = (self.rng.range(-20.0, 20.0), self.rng.range(-20.0, 20.0));
                let obj = &mut self.objects[i];
                obj.position = obj.position + Vec2::new(dx, dy);
                obj.rotation = (obj.rotation + 15.0) % 360.0;
            }
            self.list = self.objects.clone().into();
        }
        self.list.clone()
    }

    /// Camera `(x, y, zoom)` at `t` seconds: a slow Lissajous pan with a gentle zoom pulse.
    pub fn camera_at(t: f32) -> (f32, f32, f32) {
        let x = (WORLD.x * 0.5) * (1.0 + (t * 0.11).sin()) * 0.8;
        let y = (WORLD.y * 0.5) * (1.0 + (t * 0.07).cos()) * 0.8;
        let zoom = 1.0 + 0.25 * (t * 0.3).sin();
        (x, y, zoom)
    }
}

fn random_object(rng: &mut Lcg, id: u64) -> RenderObject {
    let x = rng.range(0.0, WORLD.x);
    let y = rng.range(0.0, WORLD.y);
    let size = rng.range(8.0, 64.0);
    let roll = rng.next_f32();

    let obj = if roll < 0.5 {
        let h = rng.range(8.0, 64.0);
        let mut r = RenderObject::rectangle(id, x, y, size, h).with_rotation(rng.range(0.0, 360.0));
        if rng.next_f32() < 0.3 {
            let stroke = rng.color();
            r = r.with_stroke(stroke, rng.range(1.0, 4.0));
        }
        r
    } else if roll < 0.8 {
        RenderObject::circle(id, x, y, size)
    } else if roll < 0.9 {
        let tri = vec![Vec2::new(0.0, size), Vec2::new(size * 0.5, 0.0), Vec2::new(size, size)];
        RenderObject::new(ObjectId(id), Drawable::Path(PathGeometry::new(tri)), x, y, size, size)
    } else if roll < 0.95 {
        let glyphs = (0..5)
            .map(|i| Glyph {
                key: GLYPH_KEYS[rng.next_u32() as usize % GLYPH_KEYS.len()],
                offset: Vec2::new(i as f32 * 10.0, 0.0),
                size: Vec2::new(9.0, 14.0),
            })
            .collect();
        RenderObject::new(ObjectId(id), Drawable::Text(GlyphRun::new(glyphs)), x, y, 50.0, 14.0)
    } else {
        RenderObject::new(ObjectId(id), Drawable::Image(IMAGE_KEY), x, y, size, size)
    };

    let fill = rng.color();
    obj.with_fill(fill)
        .with_z((rng.next_u32() % 8) as i32)
        .with_opacity(rng.range(0.5, 1.0))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use strata_engine::render::TextureSource;
    use strata_engine::scene::ObjectKind;

    use super::*;

    #[test]
    fn generation_is_deterministic() {
        let a = DemoScene::new(200, 42);
        let b = DemoScene::new(200, 42);
        assert_eq!(a.list()[..], b.list()[..]);
        assert_ne!(a.list()[..], DemoScene::new(200, 43).list()[..]);
    }

    #[test]
    fn scene_mixes_every_kind() {
        let scene = DemoScene::new(2_000, 7);
        for kind in ObjectKind::ALL {
            assert!(scene.list().iter().any(|o| o.kind() == kind), "no {}", kind.as_str());
        }
    }

    #[test]
    fn list_identity_changes_only_on_mutation_frames() {
        let mut scene = DemoScene::new(100, 1);
        let first = scene.advance();
        for _ in 2..30 {
            assert!(Arc::ptr_eq(&first, &scene.advance()));
        }
        assert!(!Arc::ptr_eq(&first, &scene.advance()));
    }

    #[test]
    fn atlas_layout_matches_regions() {
        assert_eq!(atlas_pixels().len(), (ATLAS_WIDTH * ATLAS_HEIGHT * 4) as usize);
        let map = atlas_regions(TextureId(1));
        assert_eq!(map.len(), 4);
        assert_eq!(map.resolve(TextureKey(1)), Some(Rect::new(0.25, 0.0, 0.25, 1.0)));
    }

    #[test]
    fn camera_zoom_stays_positive() {
        for i in 0..1000 {
            let (_, _, zoom) = DemoScene::camera_at(i as f32 * 0.37);
            assert!(zoom > 0.0);
        }
    }
}
