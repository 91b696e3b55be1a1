use anyhow::{Context, Result};
use glam::{Mat4, Vec3};
use std::sync::Arc;

use super::frustum;
use super::{Cascade, CascadeUniform};
use crate::config::ShadowSettings;

/// Builds one cascade's light-space transforms for a frustum slice.
pub fn compute_cascade(
    fov_y_radians: f32,
    aspect: f32,
    slice_near: f32,
    slice_far: f32,
    view: Mat4,
    light_direction: Vec3,
    z_multiplier: f32,
) -> Cascade {
    let projection = Mat4::perspective_rh_gl(fov_y_radians, aspect, slice_near, slice_far);
    let corners = frustum::frustum_corners_world(projection, view);
    let center = frustum::frustum_center(&corners);
    let light_view = frustum::light_view_matrix(center, light_direction);
    let (min, max) = frustum::light_space_bounds(light_view, &corners);
    let (min_z, max_z) = frustum::stretch_z_bounds(min.z, max.z, z_multiplier);
    let light_projection = Mat4::orthographic_rh(min.x, max.x, min.y, max.y, min_z, max_z);
    Cascade { near_z: slice_near, far_z: slice_far, light_view, light_projection }
}

/// Slices `[near, far]` into `count` contiguous cascades and fits each one.
/// Pure CPU work; no GPU state is touched.
pub fn compute_cascades(
    count: usize,
    fov_y_radians: f32,
    aspect: f32,
    near: f32,
    far: f32,
    view: Mat4,
    light_direction: Vec3,
    z_multiplier: f32,
) -> Vec<Cascade> {
    debug_assert!(count > 0, "cascade count must be non-zero");
    debug_assert!(fov_y_radians > 0.0, "fov must be positive");
    debug_assert!(aspect > 0.0, "aspect must be positive");
    debug_assert!(near < far, "near plane must sit in front of far plane");
    (0..count)
        .map(|index| {
            let (slice_near, slice_far) = frustum::slice_bounds(near, far, count, index);
            compute_cascade(
                fov_y_radians,
                aspect,
                slice_near,
                slice_far,
                view,
                light_direction,
                z_multiplier,
            )
        })
        .collect()
}

struct ShadowTargets {
    _texture: wgpu::Texture,
    array_view: wgpu::TextureView,
    layer_views: Vec<wgpu::TextureView>,
    sampler: wgpu::Sampler,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
}

impl ShadowTargets {
    fn create(device: &wgpu::Device, settings: &ShadowSettings) -> Self {
        let format = settings.format.to_wgpu();
        let layers = settings.cascade_count;
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Shadow Cascade Map"),
            size: wgpu::Extent3d {
                width: settings.width,
                height: settings.height,
                depth_or_array_layers: layers,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let array_view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("Shadow Cascade Array View"),
            format: Some(format),
            dimension: Some(wgpu::TextureViewDimension::D2Array),
            ..Default::default()
        });
        let layer_views = (0..layers)
            .map(|layer| {
                texture.create_view(&wgpu::TextureViewDescriptor {
                    label: Some("Shadow Cascade Layer View"),
                    format: Some(format),
                    dimension: Some(wgpu::TextureViewDimension::D2),
                    base_array_layer: layer,
                    array_layer_count: Some(1),
                    ..Default::default()
                })
            })
            .collect();
        let border_color = match settings.address_mode {
            crate::config::ShadowAddressMode::ClampToBorder => Some(settings.border_color.to_wgpu()),
            crate::config::ShadowAddressMode::ClampToEdge => None,
        };
        let address_mode = settings.address_mode.to_wgpu();
        let filter = settings.filter.to_wgpu();
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Shadow Cascade Sampler"),
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            address_mode_w: address_mode,
            mag_filter: filter,
            min_filter: filter,
            mipmap_filter: wgpu::FilterMode::Nearest,
            lod_min_clamp: 0.0,
            lod_max_clamp: 0.0,
            compare: Some(wgpu::CompareFunction::LessEqual),
            anisotropy_clamp: 1,
            border_color,
        });
        Self {
            _texture: texture,
            array_view,
            layer_views,
            sampler,
            width: settings.width,
            height: settings.height,
            format,
        }
    }
}

/// Owns the per-cascade shadow render targets and recomputes each cascade's
/// light-space transforms from the current camera and light state.
///
/// Single-threaded: `calculate_subfrustas` must complete before the write
/// passes begin, and both bind operations sequence on the render thread.
pub struct CascadeSet {
    settings: ShadowSettings,
    cascades: Vec<Cascade>,
    targets: ShadowTargets,
    uniform_buffer: wgpu::Buffer,
    sample_layout: Option<Arc<wgpu::BindGroupLayout>>,
    sample_bind_group: Option<wgpu::BindGroup>,
    dirty: bool,
}

impl CascadeSet {
    pub fn new(device: &wgpu::Device, settings: &ShadowSettings) -> Result<Self> {
        settings.validate().context("Invalid shadow settings")?;
        let targets = ShadowTargets::create(device, settings);
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Shadow Cascade Uniform Buffer"),
            size: std::mem::size_of::<CascadeUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Ok(Self {
            settings: settings.clone(),
            cascades: vec![Cascade::default(); settings.cascade_count as usize],
            targets,
            uniform_buffer,
            sample_layout: None,
            sample_bind_group: None,
            dirty: true,
        })
    }

    /// Reallocates the depth targets when a texture-affecting setting
    /// changed. Cheap no-op otherwise.
    pub fn sync_settings(&mut self, device: &wgpu::Device, settings: &ShadowSettings) -> Result<()> {
        settings.validate().context("Invalid shadow settings")?;
        let needs_recreate = settings.cascade_count != self.settings.cascade_count
            || settings.width != self.settings.width
            || settings.height != self.settings.height
            || settings.format != self.settings.format
            || settings.filter != self.settings.filter
            || settings.address_mode != self.settings.address_mode
            || settings.border_color != self.settings.border_color;
        if needs_recreate {
            eprintln!(
                "[shadow] Recreating shadow targets: {} cascades at {}x{}.",
                settings.cascade_count, settings.width, settings.height
            );
            self.targets = ShadowTargets::create(device, settings);
            self.cascades.resize(settings.cascade_count as usize, Cascade::default());
            self.sample_bind_group = None;
            self.dirty = true;
        }
        self.settings = settings.clone();
        Ok(())
    }

    /// Recomputes every cascade's `light_view`/`light_projection`/`far_z`
    /// from the current camera and light state. Pure CPU; call once per
    /// frame before the shadow write passes.
    pub fn calculate_subfrustas(
        &mut self,
        fov_y_radians: f32,
        aspect: f32,
        near: f32,
        far: f32,
        view: Mat4,
        light_direction: Vec3,
        z_multiplier: f32,
    ) {
        debug_assert!(light_direction.length_squared() > 1e-8, "light direction must be non-zero");
        self.cascades = compute_cascades(
            self.cascades.len(),
            fov_y_radians,
            aspect,
            near,
            far,
            view,
            light_direction,
            z_multiplier,
        );
        self.dirty = true;
    }

    /// Uploads the cascade table for the shading pass. Skipped when nothing
    /// changed since the last upload.
    pub fn upload(&mut self, queue: &wgpu::Queue) {
        if !self.dirty {
            return;
        }
        let uniform = CascadeUniform::from_cascades(&self.cascades);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
        self.dirty = false;
    }

    /// Begins a depth-only pass targeting the given cascade's layer of the
    /// shadow map, cleared to the far plane. The caller issues the scene
    /// draw calls with that cascade's light view/projection.
    pub fn bind_for_writing<'encoder>(
        &self,
        encoder: &'encoder mut wgpu::CommandEncoder,
        cascade_index: usize,
    ) -> wgpu::RenderPass<'encoder> {
        debug_assert!(
            cascade_index < self.cascades.len(),
            "cascade index {cascade_index} out of range 0..{}",
            self.cascades.len()
        );
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Shadow Cascade Pass"),
            color_attachments: &[],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.targets.layer_views[cascade_index],
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        })
    }

    /// Layout the shading pass binds the cascades with; invalidates any
    /// previously built bind group.
    pub fn set_sample_layout(&mut self, layout: Arc<wgpu::BindGroupLayout>) {
        self.sample_layout = Some(layout);
        self.sample_bind_group = None;
    }

    pub fn ensure_sample_bind_group(&mut self, device: &wgpu::Device) -> Result<()> {
        if self.sample_bind_group.is_some() {
            return Ok(());
        }
        let layout = self.sample_layout.as_ref().context("Shadow sample layout not set")?;
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Shadow Sample BG"),
            layout: layout.as_ref(),
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: self.uniform_buffer.as_entire_binding() },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&self.targets.array_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.targets.sampler),
                },
            ],
        });
        self.sample_bind_group = Some(bind_group);
        Ok(())
    }

    pub fn sample_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.sample_bind_group.as_ref()
    }

    /// Exposes every cascade (uniform table, depth array, comparison
    /// sampler) to the shading pass at the given bind group slot.
    pub fn bind_for_reading(&self, pass: &mut wgpu::RenderPass<'_>, group_index: u32) {
        debug_assert!(self.sample_bind_group.is_some(), "sample bind group not built");
        if let Some(bind_group) = self.sample_bind_group.as_ref() {
            pass.set_bind_group(group_index, bind_group, &[]);
        }
    }

    pub fn cascades(&self) -> &[Cascade] {
        &self.cascades
    }

    pub fn cascade_count(&self) -> usize {
        self.cascades.len()
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.targets.width, self.targets.height)
    }

    pub fn depth_format(&self) -> wgpu::TextureFormat {
        self.targets.format
    }
}
