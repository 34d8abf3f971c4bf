//! Per-kind vertex emission.
//!
//! Every emitter appends triangle-list vertices for one object. Geometry is built in the
//! object's scaled local space (origin at `position`) and mapped through [`LocalFrame`],
//! which applies rotation about the scaled box center.

use std::cell::Cell;
use std::f32::consts::TAU;

use crate::coords::{Rect, Vec2};
use crate::paint::Color;
use crate::scene::{Drawable, ObjectKind, RenderObject};
use crate::render::{TextureSource, Vertex};

const NO_UV: [f32; 2] = [0.0, 0.0];

/// Result of emitting one object.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(super) enum Emitted {
    Drawn,
    /// Texture data was unavailable; the object contributed nothing.
    MissingTexture,
}

pub(super) struct EmitCtx<'a> {
    pub textures: &'a dyn TextureSource,
    pub circle_segments: u32,
    /// Set when a fill/stroke string failed to parse and black was used.
    pub bad_color: Cell<bool>,
    /// Set when a glyph was dropped for lack of a texture region.
    pub missing_glyph: Cell<bool>,
}

impl EmitCtx<'_> {
    fn color(&self, hex: &str, opacity: f32) -> [f32; 4] {
        let parsed = Color::from_hex(hex);
        if parsed.is_none() {
            self.bad_color.set(true);
        }
        parsed.unwrap_or_else(Color::black).with_alpha(opacity).premultiplied()
    }
}

pub(super) type EmitFn = fn(&RenderObject, &EmitCtx<'_>, &mut Vec<Vertex>) -> Emitted;

/// Indexed by [`ObjectKind::index`].
pub(super) const EMITTERS: [EmitFn; ObjectKind::COUNT] =
    [emit_rectangle, emit_circle, emit_text, emit_image, emit_path];

/// Object-local -> scene mapping.
#[derive(Debug, Copy, Clone)]
struct LocalFrame {
    origin: Vec2,
    scale: Vec2,
    center: Vec2,
    sin: f32,
    cos: f32,
}

impl LocalFrame {
    fn of(obj: &RenderObject) -> Self {
        let (sin, cos) = obj.rotation.to_radians().sin_cos();
        Self {
            origin: obj.position,
            scale: Vec2::new(obj.scale_x, obj.scale_y),
            center: obj.scaled_size() * 0.5,
            sin,
            cos,
        }
    }

    /// Maps a point given in scaled local units.
    #[inline]
    fn map_scaled(&self, p: Vec2) -> [f32; 2] {
        (self.origin + self.center + (p - self.center).rotate(self.sin, self.cos)).into_array()
    }

    /// Maps a point given in unscaled local units.
    #[inline]
    fn map(&self, p: Vec2) -> [f32; 2] {
        self.map_scaled(p.scale(self.scale.x, self.scale.y))
    }
}

/// Two triangles `(0, 1, 2)`, `(0, 2, 3)` over corners given clockwise from top-left.
fn push_quad(out: &mut Vec<Vertex>, p: [[f32; 2]; 4], uv: [[f32; 2]; 4], color: [f32; 4]) {
    for i in [0, 1, 2, 0, 2, 3] {
        out.push(Vertex::new(p[i], uv[i], color));
    }
}

fn push_solid_rect(out: &mut Vec<Vertex>, f: &LocalFrame, x0: f32, y0: f32, x1: f32, y1: f32, color: [f32; 4]) {
    let p = [
        f.map_scaled(Vec2::new(x0, y0)),
        f.map_scaled(Vec2::new(x1, y0)),
        f.map_scaled(Vec2::new(x1, y1)),
        f.map_scaled(Vec2::new(x0, y1)),
    ];
    push_quad(out, p, [NO_UV; 4], color);
}

fn uv_corners(uv: Rect) -> [[f32; 2]; 4] {
    let (min, max) = (uv.min(), uv.max());
    [[min.x, min.y], [max.x, min.y], [max.x, max.y], [min.x, max.y]]
}

fn stroke_of<'o>(obj: &'o RenderObject) -> Option<&'o str> {
    match obj.stroke.as_deref() {
        Some(s) if obj.stroke_width > 0.0 && obj.stroke_width.is_finite() => Some(s),
        _ => None,
    }
}

fn emit_rectangle(obj: &RenderObject, ctx: &EmitCtx<'_>, out: &mut Vec<Vertex>) -> Emitted {
    let f = LocalFrame::of(obj);
    let s = obj.scaled_size();
    let (x0, x1) = (s.x.min(0.0), s.x.max(0.0));
    let (y0, y1) = (s.y.min(0.0), s.y.max(0.0));

    push_solid_rect(out, &f, x0, y0, x1, y1, ctx.color(&obj.fill, obj.opacity));

    if let Some(stroke) = stroke_of(obj) {
        let color = ctx.color(stroke, obj.opacity);
        let h = obj.stroke_width * 0.5;
        let (cx, cy) = ((x0 + x1) * 0.5, (y0 + y1) * 0.5);

        // Outer edge grows by h, inner edge shrinks by h (collapsing onto the center).
        let (ox0, oy0, ox1, oy1) = (x0 - h, y0 - h, x1 + h, y1 + h);
        let (ix0, ix1) = if x1 - x0 > 2.0 * h { (x0 + h, x1 - h) } else { (cx, cx) };
        let (iy0, iy1) = if y1 - y0 > 2.0 * h { (y0 + h, y1 - h) } else { (cy, cy) };

        push_solid_rect(out, &f, ox0, oy0, ox1, iy0, color); // top
        push_solid_rect(out, &f, ox0, iy1, ox1, oy1, color); // bottom
        push_solid_rect(out, &f, ox0, iy0, ix0, iy1, color); // left
        push_solid_rect(out, &f, ix1, iy0, ox1, iy1, color); // right
    }

    Emitted::Drawn
}

fn emit_circle(obj: &RenderObject, ctx: &EmitCtx<'_>, out: &mut Vec<Vertex>) -> Emitted {
    let f = LocalFrame::of(obj);
    let s = obj.scaled_size();
    let center = s * 0.5;
    let (rx, ry) = (s.x.abs() * 0.5, s.y.abs() * 0.5);
    let n = ctx.circle_segments.max(3);

    let point = |i: u32, rx: f32, ry: f32| {
        let (sin, cos) = (TAU * i as f32 / n as f32).sin_cos();
        f.map_scaled(Vec2::new(center.x + rx * cos, center.y + ry * sin))
    };

    let fill = ctx.color(&obj.fill, obj.opacity);
    let c = f.map_scaled(center);
    for i in 0..n {
        out.push(Vertex::new(c, NO_UV, fill));
        out.push(Vertex::new(point(i, rx, ry), NO_UV, fill));
        out.push(Vertex::new(point(i + 1, rx, ry), NO_UV, fill));
    }

    if let Some(stroke) = stroke_of(obj) {
        let color = ctx.color(stroke, obj.opacity);
        let h = obj.stroke_width * 0.5;
        let (orx, ory) = (rx + h, ry + h);
        let (irx, iry) = ((rx - h).max(0.0), (ry - h).max(0.0));
        for i in 0..n {
            let p = [point(i, orx, ory), point(i + 1, orx, ory), point(i + 1, irx, iry), point(i, irx, iry)];
            push_quad(out, p, [NO_UV; 4], color);
        }
    }

    Emitted::Drawn
}

fn emit_text(obj: &RenderObject, ctx: &EmitCtx<'_>, out: &mut Vec<Vertex>) -> Emitted {
    let Drawable::Text(run) = &obj.drawable else { return Emitted::Drawn };
    if ctx.textures.atlas().is_none() {
        return Emitted::MissingTexture;
    }

    let f = LocalFrame::of(obj);
    let color = ctx.color(&obj.fill, obj.opacity);
    for glyph in &run.glyphs {
        let Some(uv) = ctx.textures.resolve(glyph.key) else {
            ctx.missing_glyph.set(true);
            continue;
        };
        let (o, s) = (glyph.offset, glyph.size);
        let p = [
            f.map(o),
            f.map(Vec2::new(o.x + s.x, o.y)),
            f.map(o + s),
            f.map(Vec2::new(o.x, o.y + s.y)),
        ];
        push_quad(out, p, uv_corners(uv), color);
    }

    Emitted::Drawn
}

fn emit_image(obj: &RenderObject, ctx: &EmitCtx<'_>, out: &mut Vec<Vertex>) -> Emitted {
    let Drawable::Image(key) = &obj.drawable else { return Emitted::Drawn };
    let uv = match (ctx.textures.atlas(), ctx.textures.resolve(*key)) {
        (Some(_), Some(uv)) => uv,
        _ => return Emitted::MissingTexture,
    };

    let f = LocalFrame::of(obj);
    let s = obj.size;
    let p = [
        f.map(Vec2::zero()),
        f.map(Vec2::new(s.x, 0.0)),
        f.map(s),
        f.map(Vec2::new(0.0, s.y)),
    ];
    push_quad(out, p, uv_corners(uv), Color::white().with_alpha(obj.opacity).premultiplied());

    Emitted::Drawn
}

fn emit_path(obj: &RenderObject, ctx: &EmitCtx<'_>, out: &mut Vec<Vertex>) -> Emitted {
    let Drawable::Path(geometry) = &obj.drawable else { return Emitted::Drawn };

    let f = LocalFrame::of(obj);
    let color = ctx.color(&obj.fill, obj.opacity);
    for tri in geometry.triangles.chunks_exact(3) {
        for &p in tri {
            out.push(Vertex::new(f.map(p), NO_UV, color));
        }
    }

    Emitted::Drawn
}
