use crate::coords::Vec2;

/// Opaque reference to a texture region, resolved by the host's texture source.
///
/// The renderer never interprets the value; it only forwards it to
/// `render::TextureSource::resolve`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureKey(pub u64);

/// One positioned glyph of an already shaped text run.
///
/// `offset` and `size` are in the object's local, unscaled units (relative to its top-left).
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub key: TextureKey,
    pub offset: Vec2,
    pub size: Vec2,
}

/// Output of an external text shaper; drawn as one textured quad per glyph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphRun {
    pub glyphs: Vec<Glyph>,
}

impl GlyphRun {
    pub fn new(glyphs: Vec<Glyph>) -> Self {
        Self { glyphs }
    }
}

/// Pre-tessellated fill geometry for a path object.
///
/// `triangles` is a flat triangle list in local, unscaled units; a trailing partial
/// triangle is ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathGeometry {
    pub triangles: Vec<Vec2>,
}

impl PathGeometry {
    pub fn new(triangles: Vec<Vec2>) -> Self {
        Self { triangles }
    }
}

/// What an object draws, with its kind-specific payload.
///
/// The set is closed; the compositor dispatches on it exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum Drawable {
    Rectangle,
    /// Ellipse inscribed in the object's box (a circle when the box is square).
    Circle,
    Text(GlyphRun),
    Image(TextureKey),
    Path(PathGeometry),
}

impl Drawable {
    #[inline]
    pub fn kind(&self) -> ObjectKind {
        match self {
            Drawable::Rectangle => ObjectKind::Rectangle,
            Drawable::Circle => ObjectKind::Circle,
            Drawable::Text(_) => ObjectKind::Text,
            Drawable::Image(_) => ObjectKind::Image,
            Drawable::Path(_) => ObjectKind::Path,
        }
    }
}

/// Payload-free discriminant of [`Drawable`]; the batching key.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ObjectKind {
    Rectangle = 0,
    Circle = 1,
    Text = 2,
    Image = 3,
    Path = 4,
}

impl ObjectKind {
    pub const COUNT: usize = 5;

    pub const ALL: [ObjectKind; Self::COUNT] = [
        ObjectKind::Rectangle,
        ObjectKind::Circle,
        ObjectKind::Text,
        ObjectKind::Image,
        ObjectKind::Path,
    ];

    /// Dense index for per-kind tables.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Rectangle => "rectangle",
            ObjectKind::Circle => "circle",
            ObjectKind::Text => "text",
            ObjectKind::Image => "image",
            ObjectKind::Path => "path",
        }
    }

    /// Whether batches of this kind sample the host's atlas.
    #[inline]
    pub const fn is_textured(self) -> bool {
        matches!(self, ObjectKind::Text | ObjectKind::Image)
    }
}
