use std::collections::HashMap;

use crate::paint::Color;

use super::{
    BufferId, DrawCall, ProgramDesc, ProgramId, RenderBackend, RenderError, SurfaceSize, TextureId,
};

/// A draw as seen by [`HeadlessBackend`], with the vertex bytes it consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub call: DrawCall,
    /// Frame index (0-based) the draw belongs to.
    pub frame: u64,
    /// Bytes of the bound buffer covering `call.vertex_count` vertices (empty when capture
    /// is off).
    pub vertex_bytes: Vec<u8>,
}

/// Backend that records instead of drawing.
///
/// Used as the test double for the renderer and for GPU-less benchmarking. Resource
/// lifetimes are tracked so leaks and double frees are observable.
#[derive(Debug)]
pub struct HeadlessBackend {
    surface: SurfaceSize,
    next_id: u32,

    programs: Vec<ProgramId>,
    buffers: HashMap<BufferId, Vec<u8>>,
    textures: HashMap<TextureId, (u32, u32)>,

    frames_begun: u64,
    frames_ended: u64,
    in_frame: bool,
    last_clear: Option<Color>,
    draws: Vec<DrawRecord>,

    fail_compile: Option<String>,
    fail_link: Option<String>,
    surface_available: bool,
    capture_vertices: bool,
    releases: u32,
}

impl HeadlessBackend {
    pub fn new(logical_width: f32, logical_height: f32, scale_factor: f32) -> Self {
        Self {
            surface: SurfaceSize::new(logical_width, logical_height, scale_factor),
            next_id: 1,
            programs: Vec::new(),
            buffers: HashMap::new(),
            textures: HashMap::new(),
            frames_begun: 0,
            frames_ended: 0,
            in_frame: false,
            last_clear: None,
            draws: Vec::new(),
            fail_compile: None,
            fail_link: None,
            surface_available: true,
            capture_vertices: true,
            releases: 0,
        }
    }

    /// Stops copying vertex bytes into draw records. For long benchmark runs.
    pub fn discard_vertex_data(mut self) -> Self {
        self.capture_vertices = false;
        self
    }

    /// Makes the next `create_program` fail at the compile stage.
    pub fn fail_shader_compilation(mut self, message: impl Into<String>) -> Self {
        self.fail_compile = Some(message.into());
        self
    }

    /// Makes the next `create_program` fail at the link stage.
    pub fn fail_program_link(mut self, message: impl Into<String>) -> Self {
        self.fail_link = Some(message.into());
        self
    }

    /// Simulates the surface provider changing size.
    pub fn set_surface_size(&mut self, size: SurfaceSize) {
        self.surface = size;
    }

    /// Simulates a lost/outdated surface: `begin_frame` returns `false` while unavailable.
    pub fn set_surface_available(&mut self, available: bool) {
        self.surface_available = available;
    }

    /// Every draw submitted so far, oldest first.
    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    pub fn draw_count(&self) -> usize {
        self.draws.len()
    }

    /// Draws submitted during frame `frame`.
    pub fn draws_in_frame(&self, frame: u64) -> impl Iterator<Item = &DrawRecord> + '_ {
        self.draws.iter().filter(move |d| d.frame == frame)
    }

    /// Frames that were begun and finished.
    pub fn frames_completed(&self) -> u64 {
        self.frames_ended
    }

    pub fn last_clear(&self) -> Option<Color> {
        self.last_clear
    }

    pub fn live_programs(&self) -> usize {
        self.programs.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    /// Times `release` was called.
    pub fn release_count(&self) -> u32 {
        self.releases
    }

    /// Allocated size of a live buffer.
    pub fn buffer_size(&self, buffer: BufferId) -> Option<usize> {
        self.buffers.get(&buffer).map(Vec::len)
    }

    fn next_handle(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }
}

impl RenderBackend for HeadlessBackend {
    fn surface_size(&self) -> SurfaceSize {
        self.surface
    }

    fn create_program(&mut self, desc: &ProgramDesc<'_>) -> Result<ProgramId, RenderError> {
        if let Some(msg) = self.fail_compile.take() {
            return Err(RenderError::ShaderCompilation(msg));
        }
        if desc.source.trim().is_empty() {
            return Err(RenderError::ShaderCompilation(format!("{}: empty source", desc.label)));
        }
        if let Some(msg) = self.fail_link.take() {
            return Err(RenderError::ProgramLink(msg));
        }
        for entry in [desc.vertex_entry, desc.fragment_entry] {
            if !desc.source.contains(&format!("fn {entry}(")) {
                return Err(RenderError::ProgramLink(format!(
                    "{}: entry point `{entry}` not found",
                    desc.label
                )));
            }
        }

        let id = ProgramId(self.next_handle());
        self.programs.push(id);
        Ok(id)
    }

    fn destroy_program(&mut self, program: ProgramId) {
        let before = self.programs.len();
        self.programs.retain(|&p| p != program);
        debug_assert!(self.programs.len() < before, "destroy of unknown program {program:?}");
    }

    fn create_vertex_buffer(&mut self, _label: &str, size: u64) -> BufferId {
        let id = BufferId(self.next_handle());
        self.buffers.insert(id, vec![0; size as usize]);
        id
    }

    fn write_vertex_buffer(&mut self, buffer: BufferId, data: &[u8]) {
        match self.buffers.get_mut(&buffer) {
            Some(storage) => {
                assert!(data.len() <= storage.len(), "write past end of {buffer:?}");
                storage[..data.len()].copy_from_slice(data);
            }
            None => panic!("write to unknown buffer {buffer:?}"),
        }
    }

    fn destroy_buffer(&mut self, buffer: BufferId) {
        let removed = self.buffers.remove(&buffer);
        debug_assert!(removed.is_some(), "destroy of unknown buffer {buffer:?}");
    }

    fn create_texture(&mut self, width: u32, height: u32, rgba: &[u8]) -> TextureId {
        assert_eq!(rgba.len(), width as usize * height as usize * 4, "texture data size");
        let id = TextureId(self.next_handle());
        self.textures.insert(id, (width, height));
        id
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        let removed = self.textures.remove(&texture);
        debug_assert!(removed.is_some(), "destroy of unknown texture {texture:?}");
    }

    fn begin_frame(&mut self, clear: Color) -> bool {
        assert!(!self.in_frame, "begin_frame while a frame is open");
        if !self.surface_available {
            return false;
        }
        self.in_frame = true;
        self.frames_begun += 1;
        self.last_clear = Some(clear);
        true
    }

    fn draw(&mut self, call: &DrawCall) {
        assert!(self.in_frame, "draw outside of a frame");
        assert!(self.programs.contains(&call.program), "draw with unknown program");
        if let Some(texture) = call.texture {
            assert!(self.textures.contains_key(&texture), "draw with unknown texture");
        }

        let len = call.vertex_count as usize * std::mem::size_of::<crate::render::Vertex>();
        let vertex_bytes = match self.buffers.get(&call.buffer) {
            Some(_) if !self.capture_vertices => Vec::new(),
            Some(storage) => storage[..len].to_vec(),
            None => panic!("draw with unknown buffer {:?}", call.buffer),
        };

        self.draws.push(DrawRecord {
            call: *call,
            frame: self.frames_begun - 1,
            vertex_bytes,
        });
    }

    fn end_frame(&mut self) {
        assert!(self.in_frame, "end_frame without begin_frame");
        self.in_frame = false;
        self.frames_ended += 1;
    }

    fn release(&mut self) {
        self.releases += 1;
        self.programs.clear();
        self.buffers.clear();
        self.textures.clear();
        self.in_frame = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(source: &str) -> ProgramDesc<'_> {
        ProgramDesc {
            label: "test",
            source,
            vertex_entry: "vs_main",
            fragment_entry: "fs_main",
            vertex_stride: 32,
            attributes: &[],
        }
    }

    const SRC: &str = "fn vs_main() {} fn fs_main() {}";

    #[test]
    fn injected_compile_failure_is_reported_once() {
        let mut b = HeadlessBackend::new(10.0, 10.0, 1.0).fail_shader_compilation("boom");
        assert_eq!(b.create_program(&desc(SRC)), Err(RenderError::ShaderCompilation("boom".into())));
        assert!(b.create_program(&desc(SRC)).is_ok());
    }

    #[test]
    fn missing_entry_point_fails_link() {
        let mut b = HeadlessBackend::new(10.0, 10.0, 1.0);
        let err = b.create_program(&desc("fn vs_main() {}")).unwrap_err();
        assert!(matches!(err, RenderError::ProgramLink(_)));
    }

    #[test]
    fn unavailable_surface_refuses_frames() {
        let mut b = HeadlessBackend::new(10.0, 10.0, 1.0);
        b.set_surface_available(false);
        assert!(!b.begin_frame(Color::black()));
        b.set_surface_available(true);
        assert!(b.begin_frame(Color::black()));
        b.end_frame();
        assert_eq!(b.frames_completed(), 1);
    }

    #[test]
    fn release_drops_every_live_resource() {
        let mut b = HeadlessBackend::new(10.0, 10.0, 1.0);
        b.create_vertex_buffer("vb", 64);
        b.create_texture(1, 1, &[255; 4]);
        b.release();
        assert_eq!((b.live_buffers(), b.live_textures(), b.release_count()), (0, 0, 1));
    }

    #[test]
    fn tracks_resource_lifetimes() {
        let mut b = HeadlessBackend::new(10.0, 10.0, 1.0);
        let buf = b.create_vertex_buffer("vb", 64);
        let tex = b.create_texture(1, 1, &[255; 4]);
        assert_eq!((b.live_buffers(), b.live_textures()), (1, 1));
        b.destroy_buffer(buf);
        b.destroy_texture(tex);
        assert_eq!((b.live_buffers(), b.live_textures()), (0, 0));
    }
}
