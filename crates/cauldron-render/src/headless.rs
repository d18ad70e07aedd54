//! Offscreen rendering for snapshots

use crate::context::{create_depth_texture, request_device};
use crate::error::RenderError;
use crate::wgpu_backend::WgpuBackend;
use std::sync::Arc;

const BYTES_PER_PIXEL: u32 = 4;

/// wgpu context that renders into an RGBA texture instead of a window surface
pub struct HeadlessContext {
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
    pub format: wgpu::TextureFormat,
    pub width: u32,
    pub height: u32,
    pub color_texture: wgpu::Texture,
    pub color_view: wgpu::TextureView,
    pub depth_texture: wgpu::Texture,
    pub depth_view: wgpu::TextureView,
}

impl HeadlessContext {
    pub async fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let (_, device, queue) = request_device(&instance, None, "Cauldron Headless Device").await?;

        let format = wgpu::TextureFormat::Rgba8UnormSrgb;
        let color_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Snapshot Target"),
            size: extent(width, height),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let color_view = color_texture.create_view(&Default::default());
        let (depth_texture, depth_view) = create_depth_texture(&device, width, height);

        tracing::debug!(width, height, ?format, "headless target ready");

        Ok(Self {
            device: Arc::new(device),
            queue: Arc::new(queue),
            format,
            width,
            height,
            color_texture,
            color_view,
            depth_texture,
            depth_view,
        })
    }

    /// Backend drawing into the offscreen target
    pub fn create_backend(&self) -> WgpuBackend {
        WgpuBackend::new(
            Arc::clone(&self.device),
            Arc::clone(&self.queue),
            self.format,
            self.width,
            self.height,
        )
    }

    /// Copy the color target back to the CPU as tightly packed RGBA rows
    pub async fn read_pixels(&self) -> Result<Vec<u8>, RenderError> {
        let row_bytes = self.width * BYTES_PER_PIXEL;
        let padded_row_bytes = padded_row_len(row_bytes);

        let readback = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Snapshot Readback"),
            size: u64::from(padded_row_bytes) * u64::from(self.height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Snapshot Copy"),
            });
        encoder.copy_texture_to_buffer(
            self.color_texture.as_image_copy(),
            wgpu::ImageCopyBuffer {
                buffer: &readback,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row_bytes),
                    rows_per_image: Some(self.height),
                },
            },
            extent(self.width, self.height),
        );
        self.queue.submit([encoder.finish()]);

        let slice = readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.device.poll(wgpu::Maintain::Wait);
        rx.recv()
            .map_err(|e| RenderError::BufferReadFailed(e.to_string()))?
            .map_err(|e| RenderError::BufferReadFailed(e.to_string()))?;

        let pixels = unpad_rows(&slice.get_mapped_range(), row_bytes, padded_row_bytes);
        readback.unmap();
        Ok(pixels)
    }
}

fn extent(width: u32, height: u32) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    }
}

/// Row pitch rounded up to wgpu's copy alignment
fn padded_row_len(row_bytes: u32) -> u32 {
    row_bytes.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT) * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT
}

fn unpad_rows(data: &[u8], row_bytes: u32, padded_row_bytes: u32) -> Vec<u8> {
    data.chunks(padded_row_bytes as usize)
        .flat_map(|row| &row[..row_bytes as usize])
        .copied()
        .collect()
}
