use trackside_core::constants::{BAR_COUNT, NODE_COUNT, WAVE_POINT_COUNT};
use trackside_core::mesh::{self, LineVertex, MeshVertex};
use trackside_core::{BackendError, Camera, SceneFrame, SceneLayout, SceneSurface, Viewport};
use wasm_bindgen::JsValue;
use web_sys as web;
use wgpu::util::DeviceExt;

mod helpers;

use helpers::GpuMesh;

const SPHERE_SEGMENTS: u32 = 16;
// ground + bars + nodes + marker
const INSTANCE_COUNT: usize = 1 + BAR_COUNT + NODE_COUNT + 1;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
    ambient: [f32; 4],
    key_pos: [f32; 4],
    key_color: [f32; 4],
    fill_pos: [f32; 4],
    fill_color: [f32; 4],
    rim_dir: [f32; 4],
    rim_color: [f32; 4],
    fog_color: [f32; 4],
    fog_range: [f32; 4],
}

impl Globals {
    fn new(camera: &Camera, layout: &SceneLayout) -> Self {
        let l = &layout.lights;
        let scaled = |c: [f32; 3], k: f32| [c[0] * k, c[1] * k, c[2] * k, 0.0];
        let key = l.key.position;
        let fill = l.fill.position;
        let rim = l.rim_direction;
        let [fr, fg, fb] = layout.fog.color;
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            eye: camera.eye.extend(1.0).to_array(),
            ambient: scaled(l.ambient, l.ambient_intensity),
            key_pos: [key.x, key.y, key.z, l.key.range],
            key_color: scaled(l.key.color, l.key.intensity),
            fill_pos: [fill.x, fill.y, fill.z, l.fill.range],
            fill_color: scaled(l.fill.color, l.fill.intensity),
            rim_dir: [rim.x, rim.y, rim.z, 0.0],
            rim_color: scaled(l.rim_color, l.rim_intensity),
            fog_color: [fr, fg, fb, 1.0],
            fog_range: [layout.fog.near, layout.fog.far, 0.0, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct InstanceRaw {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    emissive: [f32; 4],
}

impl InstanceRaw {
    const ATTRIBS: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        2 => Float32x4, 3 => Float32x4, 4 => Float32x4, 5 => Float32x4,
        6 => Float32x4, 7 => Float32x4
    ];

    fn new(model: glam::Mat4, material: &trackside_core::Material) -> Self {
        let (color, emissive) = material.packed();
        Self {
            model: model.to_cols_array_2d(),
            color,
            emissive,
        }
    }
}

const MESH_ATTRIBS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
const LINE_ATTRIBS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];

/// WebGPU renderer for one mounted panel. Owns every buffer and texture it
/// creates and destroys them in [`SceneSurface::release`].
pub struct GpuState {
    canvas: web::HtmlCanvasElement,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    clear_color: wgpu::Color,
    needs_reconfigure: bool,
    released: bool,

    depth_tex: wgpu::Texture,
    depth_view: wgpu::TextureView,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    mesh_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,

    ground: GpuMesh,
    bar: GpuMesh,
    node: GpuMesh,
    marker: GpuMesh,
    instance_buffer: wgpu::Buffer,
    instances: Vec<InstanceRaw>,

    grid_buffer: wgpu::Buffer,
    grid_vertex_count: u32,
    line_buffer: wgpu::Buffer,
    lines: Vec<LineVertex>,

    layout: SceneLayout,
}

/// WebGPU is exposed as `navigator.gpu`; without it there is nothing to request.
fn webgpu_available() -> bool {
    web::window()
        .map(|w| w.navigator())
        .and_then(|nav| js_sys::Reflect::get(&nav, &JsValue::from_str("gpu")).ok())
        .is_some_and(|gpu| !gpu.is_undefined() && !gpu.is_null())
}

impl GpuState {
    pub async fn new(
        canvas: web::HtmlCanvasElement,
        viewport: Viewport,
        layout: SceneLayout,
    ) -> Result<Self, BackendError> {
        if !webgpu_available() {
            return Err(BackendError::NoAdapter);
        }
        let (width, height) = viewport.backing_size();
        canvas.set_width(width);
        canvas.set_height(height);

        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| BackendError::Surface(e.to_string()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(BackendError::NoAdapter)?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| BackendError::Device(e.to_string()))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| BackendError::Surface("no supported surface format".into()))?;
        // transparent canvas so the page shows through; opaque canvases clear to fog
        let alpha_mode = if caps
            .alpha_modes
            .contains(&wgpu::CompositeAlphaMode::PreMultiplied)
        {
            wgpu::CompositeAlphaMode::PreMultiplied
        } else {
            caps.alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto)
        };
        let clear_color = if alpha_mode == wgpu::CompositeAlphaMode::PreMultiplied {
            wgpu::Color::TRANSPARENT
        } else {
            let [r, g, b] = layout.fog.color;
            wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: 1.0,
            }
        };
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let (depth_tex, depth_view) = helpers::create_depth_texture(&device, width, height);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(trackside_core::SCENE_WGSL.into()),
        });
        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bg"),
            layout: &globals_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[&globals_bgl],
            push_constant_ranges: &[],
        });

        let mesh_buffers = [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<MeshVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &MESH_ATTRIBS,
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<InstanceRaw>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &InstanceRaw::ATTRIBS,
            },
        ];
        let mesh_pipeline = helpers::make_scene_pipeline(
            &device,
            "mesh_pipeline",
            &pipeline_layout,
            &shader,
            ("vs_mesh", "fs_mesh"),
            &mesh_buffers,
            wgpu::PrimitiveTopology::TriangleList,
            true,
            format,
        );
        let line_buffers = [wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &LINE_ATTRIBS,
        }];
        let line_pipeline = helpers::make_scene_pipeline(
            &device,
            "line_pipeline",
            &pipeline_layout,
            &shader,
            ("vs_line", "fs_line"),
            &line_buffers,
            wgpu::PrimitiveTopology::LineList,
            false,
            format,
        );

        let ground = GpuMesh::upload(
            &device,
            "ground_mesh",
            &mesh::disc(layout.ground.radius, layout.ground.segments),
        );
        let bar = GpuMesh::upload(&device, "bar_mesh", &mesh::cuboid(layout.bar_size));
        let node = GpuMesh::upload(
            &device,
            "node_mesh",
            &mesh::uv_sphere(layout.node_radius, SPHERE_SEGMENTS, SPHERE_SEGMENTS),
        );
        let marker = GpuMesh::upload(
            &device,
            "marker_mesh",
            &mesh::uv_sphere(layout.marker_radius, SPHERE_SEGMENTS, SPHERE_SEGMENTS),
        );
        let instance_buffer = helpers::vertex_buffer(
            &device,
            "instances",
            (INSTANCE_COUNT * std::mem::size_of::<InstanceRaw>()) as u64,
        );

        let grid = mesh::grid_lines(&layout.grid);
        let grid_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("grid_lines"),
            contents: bytemuck::cast_slice(&grid),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let line_capacity = layout
            .rings
            .iter()
            .map(|r| r.segments as usize * 2)
            .sum::<usize>()
            + (WAVE_POINT_COUNT - 1) * 2;
        let line_buffer = helpers::vertex_buffer(
            &device,
            "dynamic_lines",
            (line_capacity * std::mem::size_of::<LineVertex>()) as u64,
        );

        log::info!(
            "[gpu] ready format={:?} alpha={:?} {}x{}",
            format,
            alpha_mode,
            width,
            height
        );
        Ok(Self {
            canvas,
            surface,
            device,
            queue,
            config,
            clear_color,
            needs_reconfigure: false,
            released: false,
            depth_tex,
            depth_view,
            globals_buffer,
            globals_bind_group,
            mesh_pipeline,
            line_pipeline,
            ground,
            bar,
            node,
            marker,
            instance_buffer,
            instances: Vec::with_capacity(INSTANCE_COUNT),
            grid_buffer,
            grid_vertex_count: grid.len() as u32,
            line_buffer,
            lines: Vec::with_capacity(line_capacity),
            layout,
        })
    }

    fn fill_instances(&mut self, frame: &SceneFrame) {
        let layout = &self.layout;
        self.instances.clear();
        self.instances
            .push(InstanceRaw::new(layout.ground_transform(), &layout.ground.material));
        for (i, level) in frame.bar_levels.iter().enumerate() {
            self.instances.push(InstanceRaw::new(
                layout.bar_transform(i, *level),
                &layout.bar_material,
            ));
        }
        for (i, y) in frame.node_heights.iter().enumerate() {
            self.instances.push(InstanceRaw::new(
                layout.node_transform(i, *y),
                &layout.node_material,
            ));
        }
        self.instances.push(InstanceRaw::new(
            glam::Mat4::from_translation(frame.marker_position()),
            &layout.marker_material,
        ));
    }

    fn fill_lines(&mut self, frame: &SceneFrame) {
        let layout = &self.layout;
        self.lines.clear();
        for (i, ring) in layout.rings.iter().enumerate() {
            mesh::ring_lines(
                ring,
                layout.ring_transform(frame.ring_spin[i]),
                frame.ring_opacity[i],
                &mut self.lines,
            );
        }
        let [r, g, b] = layout.wave_color;
        mesh::polyline(&frame.wave, [r, g, b, layout.wave_opacity], &mut self.lines);
    }
}

impl SceneSurface for GpuState {
    type Error = wgpu::SurfaceError;

    fn resize(&mut self, viewport: &Viewport) {
        if self.released {
            return;
        }
        let (width, height) = viewport.backing_size();
        if width == self.config.width && height == self.config.height {
            return;
        }
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_tex.destroy();
        (self.depth_tex, self.depth_view) =
            helpers::create_depth_texture(&self.device, width, height);
        self.needs_reconfigure = false;
    }

    fn draw(&mut self, frame: &SceneFrame, camera: &Camera) -> Result<(), wgpu::SurfaceError> {
        if self.released {
            return Ok(());
        }
        if self.needs_reconfigure {
            self.surface.configure(&self.device, &self.config);
            self.needs_reconfigure = false;
        }
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("[gpu] surface lost, reconfiguring next frame");
                self.needs_reconfigure = true;
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::bytes_of(&Globals::new(camera, &self.layout)),
        );
        self.fill_instances(frame);
        self.queue
            .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&self.instances));
        self.fill_lines(frame);
        self.queue
            .write_buffer(&self.line_buffer, 0, bytemuck::cast_slice(&self.lines));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scene_encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.globals_bind_group, &[]);

            // solids first, instance ranges follow the order in fill_instances
            rpass.set_pipeline(&self.mesh_pipeline);
            rpass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            let bars_end = 1 + BAR_COUNT as u32;
            let nodes_end = bars_end + NODE_COUNT as u32;
            for (gpu_mesh, range) in [
                (&self.ground, 0..1),
                (&self.bar, 1..bars_end),
                (&self.node, bars_end..nodes_end),
                (&self.marker, nodes_end..nodes_end + 1),
            ] {
                rpass.set_vertex_buffer(0, gpu_mesh.vertices.slice(..));
                rpass.set_index_buffer(gpu_mesh.indices.slice(..), wgpu::IndexFormat::Uint16);
                rpass.draw_indexed(0..gpu_mesh.index_count, 0, range);
            }

            rpass.set_pipeline(&self.line_pipeline);
            rpass.set_vertex_buffer(0, self.grid_buffer.slice(..));
            rpass.draw(0..self.grid_vertex_count, 0..1);
            rpass.set_vertex_buffer(0, self.line_buffer.slice(..));
            rpass.draw(0..self.lines.len() as u32, 0..1);
        }
        self.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        for m in [&self.ground, &self.bar, &self.node, &self.marker] {
            m.destroy();
        }
        self.instance_buffer.destroy();
        self.grid_buffer.destroy();
        self.line_buffer.destroy();
        self.globals_buffer.destroy();
        self.depth_tex.destroy();
        self.device.destroy();
        log::info!("[gpu] released");
    }
}
