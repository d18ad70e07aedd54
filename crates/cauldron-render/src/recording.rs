//! CPU-only backend that records every call
//!
//! Used by tests to observe the GPU protocol without a device. Buffer storage
//! lives in a shared log so buffers can report their own release on drop.

use crate::backend::{BufferUsage, DrawCall, GpuBackend};
use crate::error::RenderError;
use crate::shader::{reflect_uniform_block, ProgramId, ShaderProgram, ShaderSource, UniformValue};
use crate::state::{BlendFactor, Capability, CullFace, DepthFunc, PipelineState, Viewport};
use crate::uniform_block::UniformBlockDescriptor;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// One recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub enum GpuCall {
    CreateBuffer {
        id: u64,
        usage: BufferUsage,
        size: usize,
    },
    WriteBuffer {
        id: u64,
        offset: usize,
        len: usize,
    },
    ReleaseBuffer(u64),
    CreateProgram(ProgramId),
    UseProgram(ProgramId),
    SetUniform {
        name: String,
        value: UniformValue,
    },
    Enable(Capability),
    Disable(Capability),
    BlendFunc(BlendFactor, BlendFactor),
    CullFace(CullFace),
    DepthMask(bool),
    DepthFunc(DepthFunc),
    Viewport(Viewport),
    DrawElements {
        program: Option<ProgramId>,
        index_count: u32,
        instance_count: u32,
        instanced: bool,
    },
}

#[derive(Default)]
struct Log {
    calls: Vec<GpuCall>,
    contents: HashMap<u64, Vec<u8>>,
    releases: HashMap<u64, u32>,
    created: usize,
    released: usize,
}

/// Buffer handle; dropping it records a release
pub struct RecordedBuffer {
    id: u64,
    log: Rc<RefCell<Log>>,
}

impl RecordedBuffer {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for RecordedBuffer {
    fn drop(&mut self) {
        let mut log = self.log.borrow_mut();
        log.contents.remove(&self.id);
        *log.releases.entry(self.id).or_default() += 1;
        log.released += 1;
        log.calls.push(GpuCall::ReleaseBuffer(self.id));
    }
}

impl std::fmt::Debug for RecordedBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RecordedBuffer({})", self.id)
    }
}

#[derive(Default)]
pub struct RecordingBackend {
    log: Rc<RefCell<Log>>,
    next_buffer: u64,
    next_program: u32,
    programs: HashMap<ProgramId, UniformBlockDescriptor>,
    current_program: Option<ProgramId>,
    uniforms: HashMap<(ProgramId, String), UniformValue>,
    warned: HashSet<(ProgramId, String)>,
    state: PipelineState,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every call recorded so far, including buffer releases
    pub fn calls(&self) -> Vec<GpuCall> {
        self.log.borrow().calls.clone()
    }

    pub fn clear_calls(&mut self) {
        self.log.borrow_mut().calls.clear();
    }

    pub fn draw_calls(&self) -> Vec<GpuCall> {
        self.log
            .borrow()
            .calls
            .iter()
            .filter(|c| matches!(c, GpuCall::DrawElements { .. }))
            .cloned()
            .collect()
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn current_program(&self) -> Option<ProgramId> {
        self.current_program
    }

    /// Last value set for `name` while `program` was bound
    pub fn uniform(&self, program: ProgramId, name: &str) -> Option<UniformValue> {
        self.uniforms.get(&(program, name.to_string())).copied()
    }

    /// Buffers created and not yet dropped
    pub fn live_buffers(&self) -> usize {
        let log = self.log.borrow();
        log.created - log.released
    }

    pub fn released_buffers(&self) -> usize {
        self.log.borrow().released
    }

    /// How many times buffer `id` has been released
    pub fn release_count(&self, id: u64) -> u32 {
        self.log.borrow().releases.get(&id).copied().unwrap_or(0)
    }

    pub fn buffer_contents(&self, buffer: &RecordedBuffer) -> Vec<u8> {
        self.log
            .borrow()
            .contents
            .get(&buffer.id)
            .cloned()
            .unwrap_or_default()
    }

    fn record(&self, call: GpuCall) {
        self.log.borrow_mut().calls.push(call);
    }
}

impl GpuBackend for RecordingBackend {
    type Buffer = RecordedBuffer;

    fn create_buffer(&mut self, usage: BufferUsage, size: usize, _label: &str) -> RecordedBuffer {
        let id = self.next_buffer;
        self.next_buffer += 1;
        {
            let mut log = self.log.borrow_mut();
            log.contents.insert(id, vec![0; size]);
            log.created += 1;
            log.calls.push(GpuCall::CreateBuffer { id, usage, size });
        }
        RecordedBuffer {
            id,
            log: Rc::clone(&self.log),
        }
    }

    fn write_buffer(&mut self, buffer: &RecordedBuffer, offset: usize, data: &[u8]) {
        let mut log = self.log.borrow_mut();
        if let Some(bytes) = log.contents.get_mut(&buffer.id) {
            let end = (offset + data.len()).min(bytes.len());
            if offset < end {
                bytes[offset..end].copy_from_slice(&data[..end - offset]);
            }
        }
        log.calls.push(GpuCall::WriteBuffer {
            id: buffer.id,
            offset,
            len: data.len(),
        });
    }

    fn buffer_size(&self, buffer: &RecordedBuffer) -> usize {
        self.log
            .borrow()
            .contents
            .get(&buffer.id)
            .map_or(0, Vec::len)
    }

    fn create_program(&mut self, source: &ShaderSource) -> Result<ShaderProgram, RenderError> {
        let uniforms = reflect_uniform_block(source)?;
        let id = ProgramId(self.next_program);
        self.next_program += 1;
        self.programs.insert(id, uniforms.clone());
        self.record(GpuCall::CreateProgram(id));
        Ok(ShaderProgram::new(id, source.label.clone(), uniforms))
    }

    fn use_program(&mut self, program: &ShaderProgram) {
        self.current_program = Some(program.id());
        self.record(GpuCall::UseProgram(program.id()));
    }

    fn set_uniform(&mut self, name: &str, value: &UniformValue) {
        self.record(GpuCall::SetUniform {
            name: name.to_string(),
            value: *value,
        });
        let Some(program) = self.current_program else {
            return;
        };
        let known = self
            .programs
            .get(&program)
            .is_some_and(|block| block.contains(name));
        if known {
            self.uniforms.insert((program, name.to_string()), *value);
        } else if self.warned.insert((program, name.to_string())) {
            tracing::warn!(?program, name, "uniform not found in program, ignoring");
        }
    }

    fn enable(&mut self, cap: Capability) {
        self.state.set_capability(cap, true);
        self.record(GpuCall::Enable(cap));
    }

    fn disable(&mut self, cap: Capability) {
        self.state.set_capability(cap, false);
        self.record(GpuCall::Disable(cap));
    }

    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.state.blend_src = src;
        self.state.blend_dst = dst;
        self.record(GpuCall::BlendFunc(src, dst));
    }

    fn cull_face(&mut self, mode: CullFace) {
        self.state.cull_face = mode;
        self.record(GpuCall::CullFace(mode));
    }

    fn depth_mask(&mut self, flag: bool) {
        self.state.depth_mask = flag;
        self.record(GpuCall::DepthMask(flag));
    }

    fn depth_func(&mut self, func: DepthFunc) {
        self.state.depth_func = func;
        self.record(GpuCall::DepthFunc(func));
    }

    fn viewport(&mut self, viewport: Viewport) {
        self.state.viewport = Some(viewport);
        self.record(GpuCall::Viewport(viewport));
    }

    fn draw_elements(&mut self, call: &DrawCall<'_, RecordedBuffer>) {
        self.record(GpuCall::DrawElements {
            program: self.current_program,
            index_count: call.descriptor.index_count,
            instance_count: 1,
            instanced: false,
        });
    }

    fn draw_elements_instanced(&mut self, call: &DrawCall<'_, RecordedBuffer>) {
        self.record(GpuCall::DrawElements {
            program: self.current_program,
            index_count: call.descriptor.index_count,
            instance_count: call.descriptor.instance_count,
            instanced: true,
        });
    }
}
