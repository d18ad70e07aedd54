//! `GpuBackend` on wgpu
//!
//! wgpu has no global state machine, so this backend keeps one: the current
//! `PipelineState` and bound program. Each draw resolves a cached render
//! pipeline for (program, state, topology, layout), snapshots the program's
//! uniform block into a per-frame uniform buffer slot, and records a draw op.
//! `end_frame` encodes one render pass and replays the ops in order.

use crate::backend::{BufferUsage, DrawCall, GpuBackend};
use crate::buffer::{AttributeFormat, AttributeLayout, ComponentType, IndexType, StepRate, Topology};
use crate::error::RenderError;
use crate::shader::{
    reflect_uniform_block, ProgramId, ShaderProgram, ShaderSource, UniformValue, FRAGMENT_ENTRY,
    VERTEX_ENTRY,
};
use crate::state::{BlendFactor, Capability, CullFace, DepthFunc, PipelineState, Viewport};
use crate::uniform_block::UniformBlockDescriptor;
use cauldron_core::Color;
use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::rc::Rc;
use std::sync::Arc;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// A vertex or index buffer. Dropping the handle releases the GPU storage
/// once no pending draw still references it.
pub struct WgpuBuffer {
    buffer: Rc<wgpu::Buffer>,
    size: usize,
}

impl WgpuBuffer {
    pub fn raw(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}

struct Program {
    module: wgpu::ShaderModule,
    uniforms: UniformBlockDescriptor,
    staging: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PipelineKey {
    program: ProgramId,
    blend: Option<(BlendFactor, BlendFactor)>,
    cull: Option<CullFace>,
    depth_write: bool,
    depth_compare: DepthFunc,
    topology: Topology,
    layout: AttributeLayout,
}

struct DrawOp {
    pipeline: usize,
    /// The program's uniform block as staged at draw time, within `frame_uniforms`
    uniforms: Range<usize>,
    vertex_buffer: Rc<wgpu::Buffer>,
    vertex_offsets: Vec<u64>,
    index_buffer: Rc<wgpu::Buffer>,
    index_format: wgpu::IndexFormat,
    index_count: u32,
    instance_count: u32,
    viewport: Option<[f32; 4]>,
}

pub struct WgpuBackend {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    color_format: wgpu::TextureFormat,
    target_size: (u32, u32),

    state: PipelineState,
    current_program: Option<ProgramId>,
    programs: HashMap<ProgramId, Program>,
    next_program: u32,
    warned: HashSet<(ProgramId, String)>,

    pipeline_layout: wgpu::PipelineLayout,
    uniform_layout: wgpu::BindGroupLayout,
    pipelines: Vec<wgpu::RenderPipeline>,
    pipeline_cache: HashMap<PipelineKey, usize>,

    uniform_slot: u64,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    bound_slot: u64,

    clear_color: Color,
    frame_uniforms: Vec<u8>,
    ops: Vec<DrawOp>,
}

impl WgpuBackend {
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        color_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Cauldron Uniform Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Cauldron Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });

        let uniform_slot = slot_size(0, device.limits().min_uniform_buffer_offset_alignment);
        let uniform_buffer = create_uniform_buffer(&device, uniform_slot * 64);
        let uniform_bind_group =
            create_uniform_bind_group(&device, &uniform_layout, &uniform_buffer, uniform_slot);

        tracing::info!(?color_format, width, height, "wgpu backend ready");

        Self {
            device,
            queue,
            color_format,
            target_size: (width.max(1), height.max(1)),
            state: PipelineState::default(),
            current_program: None,
            programs: HashMap::new(),
            next_program: 0,
            warned: HashSet::new(),
            pipeline_layout,
            uniform_layout,
            pipelines: Vec::new(),
            pipeline_cache: HashMap::new(),
            uniform_slot,
            uniform_buffer,
            uniform_bind_group,
            bound_slot: uniform_slot,
            clear_color: Color::BLACK,
            frame_uniforms: Vec::new(),
            ops: Vec::new(),
        }
    }

    /// Size of the render target, used to flip viewports to a top-left origin
    pub fn set_target_size(&mut self, width: u32, height: u32) {
        self.target_size = (width.max(1), height.max(1));
    }

    pub fn target_size(&self) -> (u32, u32) {
        self.target_size
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Start recording a frame that clears to `clear_color`
    pub fn begin_frame(&mut self, clear_color: Color) {
        self.clear_color = clear_color;
        self.frame_uniforms.clear();
        self.ops.clear();
    }

    /// Upload this frame's uniforms, encode one render pass, and submit it
    pub fn end_frame(&mut self, color_view: &wgpu::TextureView, depth_view: &wgpu::TextureView) {
        // Offsets come from the slot size at submit time, not at draw time
        let slot = self.uniform_slot;
        let packed = pack_uniform_slots(
            &self.frame_uniforms,
            self.ops.iter().map(|op| op.uniforms.clone()),
            slot as usize,
        );
        let required = (packed.len() as u64).max(slot);
        if required > self.uniform_buffer.size() || self.bound_slot != self.uniform_slot {
            let capacity = required.max(self.uniform_buffer.size()).next_power_of_two();
            self.uniform_buffer = create_uniform_buffer(&self.device, capacity);
            self.uniform_bind_group = create_uniform_bind_group(
                &self.device,
                &self.uniform_layout,
                &self.uniform_buffer,
                self.uniform_slot,
            );
            self.bound_slot = self.uniform_slot;
            tracing::debug!(capacity, "grew frame uniform buffer");
        }
        if !packed.is_empty() {
            self.queue.write_buffer(&self.uniform_buffer, 0, &packed);
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Cauldron Frame Encoder"),
            });

        {
            let c = self.clear_color;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Cauldron Frame Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: c.r as f64,
                            g: c.g as f64,
                            b: c.b as f64,
                            a: c.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let (w, h) = self.target_size;
            for (index, op) in self.ops.iter().enumerate() {
                let [x, y, vw, vh] = op.viewport.unwrap_or([0.0, 0.0, w as f32, h as f32]);
                pass.set_viewport(x, y, vw, vh, 0.0, 1.0);
                pass.set_pipeline(&self.pipelines[op.pipeline]);
                pass.set_bind_group(0, &self.uniform_bind_group, &[(index as u64 * slot) as u32]);
                for (slot, offset) in op.vertex_offsets.iter().enumerate() {
                    pass.set_vertex_buffer(slot as u32, op.vertex_buffer.slice(*offset..));
                }
                pass.set_index_buffer(op.index_buffer.slice(..), op.index_format);
                pass.draw_indexed(0..op.index_count, 0, 0..op.instance_count);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        self.ops.clear();
    }

    fn pipeline_for(&mut self, program: ProgramId, key: PipelineKey) -> Option<usize> {
        if let Some(&index) = self.pipeline_cache.get(&key) {
            return Some(index);
        }
        let module = &self.programs.get(&program)?.module;

        let attributes: Vec<[wgpu::VertexAttribute; 1]> = key
            .layout
            .iter()
            .map(|(slot, pointer)| {
                [wgpu::VertexAttribute {
                    format: vertex_format(pointer.format),
                    offset: 0,
                    shader_location: slot,
                }]
            })
            .collect();
        let buffers: Vec<wgpu::VertexBufferLayout> = key
            .layout
            .iter()
            .zip(&attributes)
            .map(|((_, pointer), attrs)| wgpu::VertexBufferLayout {
                array_stride: pointer.effective_stride() as u64,
                step_mode: match pointer.rate {
                    StepRate::PerVertex => wgpu::VertexStepMode::Vertex,
                    StepRate::PerInstance => wgpu::VertexStepMode::Instance,
                },
                attributes: attrs,
            })
            .collect();

        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Cauldron Technique Pipeline"),
                layout: Some(&self.pipeline_layout),
                vertex: wgpu::VertexState {
                    module,
                    entry_point: Some(VERTEX_ENTRY),
                    buffers: &buffers,
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module,
                    entry_point: Some(FRAGMENT_ENTRY),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.color_format,
                        blend: key.blend.map(|(src, dst)| blend_state(src, dst)),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: primitive_topology(key.topology),
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: key.cull.map(cull_mode),
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: key.depth_write,
                    depth_compare: compare_function(key.depth_compare),
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        let index = self.pipelines.len();
        self.pipelines.push(pipeline);
        self.pipeline_cache.insert(key, index);
        tracing::debug!(?program, index, "built render pipeline");
        Some(index)
    }

    fn record_draw(&mut self, call: &DrawCall<'_, WgpuBuffer>, instance_count: u32) {
        let descriptor = call.descriptor;
        if descriptor.index_count == 0 || instance_count == 0 {
            return;
        }
        let Some(program) = self.current_program else {
            tracing::warn!("draw issued with no program bound, skipping");
            return;
        };
        let viewport = match self.state.viewport {
            Some(v) => match flip_viewport(v, self.target_size) {
                Some(rect) => Some(rect),
                None => return,
            },
            None => None,
        };

        let key = PipelineKey {
            program,
            blend: self
                .state
                .blend_enabled
                .then_some((self.state.blend_src, self.state.blend_dst)),
            cull: self.state.cull_enabled.then_some(self.state.cull_face),
            depth_write: self.state.depth_test_enabled && self.state.depth_mask,
            depth_compare: if self.state.depth_test_enabled {
                self.state.depth_func
            } else {
                DepthFunc::Always
            },
            topology: descriptor.topology,
            layout: call.layout.clone(),
        };
        let Some(pipeline) = self.pipeline_for(program, key) else {
            return;
        };

        let Some(staging) = self.programs.get(&program).map(|p| &p.staging) else {
            return;
        };
        let start = self.frame_uniforms.len();
        self.frame_uniforms.extend_from_slice(staging);
        let uniforms = start..self.frame_uniforms.len();

        self.ops.push(DrawOp {
            pipeline,
            uniforms,
            vertex_buffer: Rc::clone(&call.vertex_buffer.buffer),
            vertex_offsets: call
                .layout
                .iter()
                .map(|(_, p)| p.byte_offset as u64)
                .collect(),
            index_buffer: Rc::clone(&call.index_buffer.buffer),
            index_format: index_format(descriptor.index_type),
            index_count: descriptor.index_count,
            instance_count,
            viewport,
        });
    }
}

impl GpuBackend for WgpuBackend {
    type Buffer = WgpuBuffer;

    fn create_buffer(&mut self, usage: BufferUsage, size: usize, label: &str) -> WgpuBuffer {
        let usage = match usage {
            BufferUsage::Vertex => wgpu::BufferUsages::VERTEX,
            BufferUsage::Index => wgpu::BufferUsages::INDEX,
        } | wgpu::BufferUsages::COPY_DST;
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: padded_len(size).max(wgpu::COPY_BUFFER_ALIGNMENT as usize) as u64,
            usage,
            mapped_at_creation: false,
        });
        WgpuBuffer {
            buffer: Rc::new(buffer),
            size,
        }
    }

    fn write_buffer(&mut self, buffer: &WgpuBuffer, offset: usize, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        if data.len() % wgpu::COPY_BUFFER_ALIGNMENT as usize == 0 {
            self.queue.write_buffer(&buffer.buffer, offset as u64, data);
        } else {
            let mut padded = data.to_vec();
            padded.resize(padded_len(data.len()), 0);
            self.queue.write_buffer(&buffer.buffer, offset as u64, &padded);
        }
    }

    fn buffer_size(&self, buffer: &WgpuBuffer) -> usize {
        buffer.size
    }

    fn create_program(&mut self, source: &ShaderSource) -> Result<ShaderProgram, RenderError> {
        let uniforms = reflect_uniform_block(source)?;
        let module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&source.label),
                source: wgpu::ShaderSource::Wgsl(source.wgsl.as_str().into()),
            });

        let id = ProgramId(self.next_program);
        self.next_program += 1;

        let alignment = self.device.limits().min_uniform_buffer_offset_alignment;
        self.uniform_slot = self.uniform_slot.max(slot_size(uniforms.aligned_size(16), alignment));

        self.programs.insert(
            id,
            Program {
                module,
                staging: vec![0; uniforms.size() as usize],
                uniforms: uniforms.clone(),
            },
        );
        tracing::info!(label = %source.label, ?id, uniform_bytes = uniforms.size(), "program created");
        Ok(ShaderProgram::new(id, source.label.clone(), uniforms))
    }

    fn use_program(&mut self, program: &ShaderProgram) {
        self.current_program = Some(program.id());
    }

    fn set_uniform(&mut self, name: &str, value: &UniformValue) {
        let Some(id) = self.current_program else {
            return;
        };
        let Some(program) = self.programs.get_mut(&id) else {
            return;
        };
        match program.uniforms.member(name) {
            Some(member) => {
                let bytes = value.as_bytes();
                let start = member.offset as usize;
                let len = bytes.len().min(member.size as usize);
                program.staging[start..start + len].copy_from_slice(&bytes[..len]);
            }
            None => {
                if self.warned.insert((id, name.to_string())) {
                    tracing::warn!(program = ?id, name, "uniform not found in program, ignoring");
                }
            }
        }
    }

    fn enable(&mut self, cap: Capability) {
        self.state.set_capability(cap, true);
    }

    fn disable(&mut self, cap: Capability) {
        self.state.set_capability(cap, false);
    }

    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.state.blend_src = src;
        self.state.blend_dst = dst;
    }

    fn cull_face(&mut self, mode: CullFace) {
        self.state.cull_face = mode;
    }

    fn depth_mask(&mut self, flag: bool) {
        self.state.depth_mask = flag;
    }

    fn depth_func(&mut self, func: DepthFunc) {
        self.state.depth_func = func;
    }

    fn viewport(&mut self, viewport: Viewport) {
        self.state.viewport = Some(viewport);
    }

    fn draw_elements(&mut self, call: &DrawCall<'_, WgpuBuffer>) {
        self.record_draw(call, 1);
    }

    fn draw_elements_instanced(&mut self, call: &DrawCall<'_, WgpuBuffer>) {
        self.record_draw(call, call.descriptor.instance_count);
    }
}

fn create_uniform_buffer(device: &wgpu::Device, size: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Cauldron Frame Uniforms"),
        size,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_uniform_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
    slot: u64,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Cauldron Uniform Bind Group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer,
                offset: 0,
                size: wgpu::BufferSize::new(slot),
            }),
        }],
    })
}

/// Per-draw uniform slot: a (16-byte aligned) block size rounded up to the
/// device's dynamic offset alignment
fn slot_size(block_size: u32, offset_alignment: u32) -> u64 {
    let align = offset_alignment.max(1);
    (block_size.max(16).div_ceil(align) * align) as u64
}

/// Copy each staged block into its own `slot`-sized region, in draw order
fn pack_uniform_slots(
    staged: &[u8],
    blocks: impl Iterator<Item = Range<usize>>,
    slot: usize,
) -> Vec<u8> {
    let mut packed = Vec::new();
    for block in blocks {
        let start = packed.len();
        packed.extend_from_slice(&staged[block]);
        packed.resize(start + slot, 0);
    }
    packed
}

fn padded_len(len: usize) -> usize {
    let align = wgpu::COPY_BUFFER_ALIGNMENT as usize;
    len.div_ceil(align) * align
}

/// Convert a bottom-left-origin viewport to wgpu's top-left origin, clamped
/// to the target. Returns `None` when nothing of it remains visible.
fn flip_viewport(viewport: Viewport, (target_w, target_h): (u32, u32)) -> Option<[f32; 4]> {
    let x0 = viewport.x.max(0) as i64;
    let y0 = viewport.y.max(0) as i64;
    let x1 = (viewport.x as i64 + viewport.width as i64).min(target_w as i64);
    let y1 = (viewport.y as i64 + viewport.height as i64).min(target_h as i64);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    let top = target_h as i64 - y1;
    Some([x0 as f32, top as f32, (x1 - x0) as f32, (y1 - y0) as f32])
}

fn blend_state(src: BlendFactor, dst: BlendFactor) -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: blend_factor(src),
        dst_factor: blend_factor(dst),
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState {
        color: component,
        alpha: component,
    }
}

fn blend_factor(factor: BlendFactor) -> wgpu::BlendFactor {
    match factor {
        BlendFactor::Zero => wgpu::BlendFactor::Zero,
        BlendFactor::One => wgpu::BlendFactor::One,
        BlendFactor::SrcAlpha => wgpu::BlendFactor::SrcAlpha,
        BlendFactor::OneMinusSrcAlpha => wgpu::BlendFactor::OneMinusSrcAlpha,
        BlendFactor::DstAlpha => wgpu::BlendFactor::DstAlpha,
        BlendFactor::OneMinusDstAlpha => wgpu::BlendFactor::OneMinusDstAlpha,
        BlendFactor::SrcColor => wgpu::BlendFactor::Src,
        BlendFactor::OneMinusSrcColor => wgpu::BlendFactor::OneMinusSrc,
    }
}

fn cull_mode(face: CullFace) -> wgpu::Face {
    match face {
        CullFace::Front => wgpu::Face::Front,
        CullFace::Back => wgpu::Face::Back,
    }
}

fn compare_function(func: DepthFunc) -> wgpu::CompareFunction {
    match func {
        DepthFunc::Never => wgpu::CompareFunction::Never,
        DepthFunc::Less => wgpu::CompareFunction::Less,
        DepthFunc::Equal => wgpu::CompareFunction::Equal,
        DepthFunc::LessEqual => wgpu::CompareFunction::LessEqual,
        DepthFunc::Greater => wgpu::CompareFunction::Greater,
        DepthFunc::NotEqual => wgpu::CompareFunction::NotEqual,
        DepthFunc::GreaterEqual => wgpu::CompareFunction::GreaterEqual,
        DepthFunc::Always => wgpu::CompareFunction::Always,
    }
}

fn primitive_topology(topology: Topology) -> wgpu::PrimitiveTopology {
    match topology {
        Topology::Triangles => wgpu::PrimitiveTopology::TriangleList,
    }
}

fn index_format(index_type: IndexType) -> wgpu::IndexFormat {
    match index_type {
        IndexType::U16 => wgpu::IndexFormat::Uint16,
        IndexType::U32 => wgpu::IndexFormat::Uint32,
    }
}

fn vertex_format(format: AttributeFormat) -> wgpu::VertexFormat {
    use wgpu::VertexFormat as F;
    match (format.component, format.components) {
        (ComponentType::F32, 1) => F::Float32,
        (ComponentType::F32, 2) => F::Float32x2,
        (ComponentType::F32, 3) => F::Float32x3,
        (ComponentType::F32, _) => F::Float32x4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_flips_to_top_left() {
        assert_eq!(
            flip_viewport(Viewport::full(800, 600), (800, 600)),
            Some([0.0, 0.0, 800.0, 600.0])
        );
        // bottom strip in GL coordinates ends up at the bottom of the target
        assert_eq!(
            flip_viewport(Viewport::new(0, 0, 800, 100), (800, 600)),
            Some([0.0, 500.0, 800.0, 100.0])
        );
    }

    #[test]
    fn viewport_is_clamped() {
        assert_eq!(
            flip_viewport(Viewport::new(-10, 0, 1000, 700), (800, 600)),
            Some([0.0, 0.0, 800.0, 600.0])
        );
        assert_eq!(flip_viewport(Viewport::new(900, 0, 10, 10), (800, 600)), None);
    }

    #[test]
    fn slot_sizes_respect_alignment() {
        assert_eq!(slot_size(0, 256), 256);
        assert_eq!(slot_size(96, 256), 256);
        assert_eq!(slot_size(300, 256), 512);
        assert_eq!(slot_size(100, 16), 112);
        let block = UniformBlockDescriptor::new("Uniforms", 100);
        assert_eq!(slot_size(block.aligned_size(16), 4), 112);
    }

    #[test]
    fn uniform_blocks_land_on_slot_boundaries() {
        let staged = [1u8, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
        let packed = pack_uniform_slots(&staged, [0..4, 4..12].into_iter(), 256);
        assert_eq!(packed.len(), 512);
        assert_eq!(&packed[..4], &[1, 2, 3, 4]);
        assert!(packed[4..256].iter().all(|&b| b == 0));
        assert_eq!(&packed[256..264], &[5, 6, 7, 8, 9, 10, 11, 12]);
    }

    #[test]
    fn slot_widened_mid_frame_realigns_earlier_draws() {
        // Blocks staged under a 256-byte slot, packed after a 512-byte program appeared
        let staged = vec![7u8; 208 + 300];
        let packed = pack_uniform_slots(&staged, [0..208, 208..508].into_iter(), 512);
        assert_eq!(packed.len(), 1024);
        assert_eq!(&packed[512..812], &staged[208..508]);
        assert!(packed[208..512].iter().all(|&b| b == 0));
    }

    #[test]
    fn index_data_padding() {
        assert_eq!(padded_len(6), 8);
        assert_eq!(padded_len(12), 12);
        assert_eq!(padded_len(0), 0);
    }

    #[test]
    fn attribute_formats() {
        assert_eq!(vertex_format(AttributeFormat::float(3)), wgpu::VertexFormat::Float32x3);
        assert_eq!(vertex_format(AttributeFormat::float(1)), wgpu::VertexFormat::Float32);
    }

    #[test]
    fn additive_blend_maps_factors() {
        let state = blend_state(BlendFactor::SrcAlpha, BlendFactor::One);
        assert_eq!(state.color.src_factor, wgpu::BlendFactor::SrcAlpha);
        assert_eq!(state.color.dst_factor, wgpu::BlendFactor::One);
        assert_eq!(state.alpha, state.color);
    }
}
