use std::collections::HashMap;

use crate::coords::Rect;
use crate::scene::TextureKey;

use super::TextureId;

/// Host-side texture/glyph provider.
///
/// Text and image batches sample a single atlas. `resolve` maps a key to its UV rectangle
/// inside that atlas (`0..=1` on both axes). Anything unresolved is skipped at emission.
pub trait TextureSource {
    fn atlas(&self) -> Option<TextureId>;
    fn resolve(&self, key: TextureKey) -> Option<Rect>;
}

/// Source with nothing in it; textured objects are skipped.
#[derive(Debug, Copy, Clone, Default)]
pub struct NoTextures;

impl TextureSource for NoTextures {
    fn atlas(&self) -> Option<TextureId> {
        None
    }

    fn resolve(&self, _key: TextureKey) -> Option<Rect> {
        None
    }
}

/// Atlas with a key -> UV table.
#[derive(Debug, Clone)]
pub struct AtlasMap {
    atlas: TextureId,
    regions: HashMap<TextureKey, Rect>,
}

impl AtlasMap {
    pub fn new(atlas: TextureId) -> Self {
        Self { atlas, regions: HashMap::new() }
    }

    /// Registers a region given in atlas pixels.
    pub fn insert_pixels(&mut self, key: TextureKey, px: Rect, atlas_width: u32, atlas_height: u32) {
        let (w, h) = (atlas_width.max(1) as f32, atlas_height.max(1) as f32);
        let uv = Rect::new(px.origin.x / w, px.origin.y / h, px.size.x / w, px.size.y / h);
        self.regions.insert(key, uv);
    }

    /// Registers a region given directly in UV space.
    pub fn insert_uv(&mut self, key: TextureKey, uv: Rect) {
        self.regions.insert(key, uv);
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl TextureSource for AtlasMap {
    fn atlas(&self) -> Option<TextureId> {
        Some(self.atlas)
    }

    fn resolve(&self, key: TextureKey) -> Option<Rect> {
        self.regions.get(&key).copied()
    }
}
