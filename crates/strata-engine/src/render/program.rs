use super::{ProgramDesc, ProgramId, RenderBackend, RenderError, Vertex};

const BATCH_SHADER: &str = include_str!("shaders/batch.wgsl");

/// Owns the single batch program every drawable kind is drawn with.
///
/// Compile/link happens once, at construction; failure means no renderer.
#[derive(Debug)]
pub struct ProgramManager {
    program: Option<ProgramId>,
}

impl ProgramManager {
    /// Description of the batch program: one WGSL module, interleaved [`Vertex`] input.
    pub fn batch_desc() -> ProgramDesc<'static> {
        ProgramDesc {
            label: "strata batch program",
            source: BATCH_SHADER,
            vertex_entry: "vs_main",
            fragment_entry: "fs_main",
            vertex_stride: Vertex::STRIDE,
            attributes: &Vertex::ATTRS,
        }
    }

    pub fn new<B: RenderBackend + ?Sized>(backend: &mut B) -> Result<Self, RenderError> {
        let program = backend.create_program(&Self::batch_desc())?;
        log::debug!("batch program ready ({program:?})");
        Ok(Self { program: Some(program) })
    }

    /// The linked program, or `None` once released.
    #[inline]
    pub fn program(&self) -> Option<ProgramId> {
        self.program
    }

    /// Destroys the program. Safe to call more than once.
    pub fn release<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) {
        if let Some(program) = self.program.take() {
            backend.destroy_program(program);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessBackend;

    #[test]
    fn batch_shader_declares_both_entry_points() {
        let desc = ProgramManager::batch_desc();
        assert!(desc.source.contains("fn vs_main("));
        assert!(desc.source.contains("fn fs_main("));
        assert_eq!(desc.attributes.len(), 3);
    }

    #[test]
    fn compile_failure_is_reported() {
        let mut backend = HeadlessBackend::new(100.0, 100.0, 1.0).fail_shader_compilation("bad token");
        let err = ProgramManager::new(&mut backend).unwrap_err();
        assert_eq!(err, RenderError::ShaderCompilation("bad token".into()));
        assert_eq!(backend.live_programs(), 0);
    }

    #[test]
    fn link_failure_is_reported() {
        let mut backend = HeadlessBackend::new(100.0, 100.0, 1.0).fail_program_link("mismatch");
        let err = ProgramManager::new(&mut backend).unwrap_err();
        assert!(matches!(err, RenderError::ProgramLink(_)));
    }

    #[test]
    fn release_is_idempotent() {
        let mut backend = HeadlessBackend::new(100.0, 100.0, 1.0);
        let mut pm = ProgramManager::new(&mut backend).unwrap();
        assert_eq!(backend.live_programs(), 1);
        pm.release(&mut backend);
        pm.release(&mut backend);
        assert_eq!(backend.live_programs(), 0);
        assert_eq!(pm.program(), None);
    }
}
