//! Scene object model.
//!
//! Responsibilities:
//! - describe drawable objects as hosts hand them to the renderer
//! - keep per-kind payloads inside a closed enum so dispatch is exhaustive
//! - provide deterministic ordering (z-index, then list position)
//!
//! The host owns and mutates objects. The renderer reads an [`ObjectList`] snapshot per
//! frame and keeps nothing but a weak identity handle to it.

mod drawable;
mod key;
mod object;
mod z_index;

pub use drawable::{Drawable, Glyph, GlyphRun, ObjectKind, PathGeometry, TextureKey};
pub use key::SortKey;
pub use object::{ObjectId, ObjectList, RenderObject};
pub use z_index::ZIndex;
