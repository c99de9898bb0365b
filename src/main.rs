use posegraph::animation::{KeyframeRole, SystemClock};
use posegraph::pose::{Axis, JointId};
use posegraph::render::{FigureRenderer, GpuContext};
use posegraph::scene::AttachmentKind;
use posegraph::status::StatusLevel;
use posegraph::studio::Studio;
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

const ORBIT_SENSITIVITY: f32 = 0.01;
const ZOOM_STEP: f32 = 0.1;

struct App {
    window: Option<Arc<Window>>,
    context: Option<GpuContext>,
    renderer: Option<FigureRenderer>,
    egui_ctx: egui::Context,
    egui_state: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
    studio: Studio,
    clock: SystemClock,
    selected_parent: String,
    mouse_pos: PhysicalPosition<f64>,
    mouse_pressed: bool,
}

impl App {
    fn new() -> Self {
        Self {
            window: None,
            context: None,
            renderer: None,
            egui_ctx: egui::Context::default(),
            egui_state: None,
            egui_renderer: None,
            studio: Studio::new(),
            clock: SystemClock::new(),
            selected_parent: "left_hand".to_string(),
            mouse_pos: PhysicalPosition::new(0.0, 0.0),
            mouse_pressed: false,
        }
    }

    fn render(&mut self) {
        let Some(window) = self.window.clone() else {
            return;
        };
        let (Some(context), Some(renderer), Some(egui_state), Some(egui_renderer)) = (
            self.context.as_ref(),
            self.renderer.as_ref(),
            self.egui_state.as_mut(),
            self.egui_renderer.as_mut(),
        ) else {
            return;
        };

        let output = match context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                return;
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        renderer.render(
            context,
            &view,
            self.studio.graph(),
            self.studio.camera(),
            self.studio.lighting(),
        );

        // UI frame on top of the scene.
        let raw_input = egui_state.take_egui_input(&window);
        let studio = &mut self.studio;
        let clock = &self.clock;
        let selected_parent = &mut self.selected_parent;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            egui::SidePanel::left("controls")
                .default_width(300.0)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        control_panel(ui, studio, clock, selected_parent);
                    });
                });
        });
        egui_state.handle_platform_output(&window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [context.config.width, context.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(&context.device, &context.queue, *id, delta);
        }

        let mut encoder = context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("UI Encoder"),
            });
        let buffers =
            egui_renderer.update_buffers(&context.device, &context.queue, &mut encoder, &primitives, &screen);
        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("UI Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            let mut render_pass = render_pass.forget_lifetime();
            egui_renderer.render(&mut render_pass, &primitives, &screen);
        }
        context
            .queue
            .submit(buffers.into_iter().chain(std::iter::once(encoder.finish())));

        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }

        output.present();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window_attrs = Window::default_attributes()
                .with_title("Pose Studio")
                .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

            let window = Arc::new(event_loop.create_window(window_attrs).unwrap());
            self.window = Some(window.clone());

            let context = pollster::block_on(GpuContext::new(window.clone()));
            self.studio.set_aspect(context.aspect_ratio());

            let renderer = FigureRenderer::new(&context);
            let egui_state = egui_winit::State::new(
                self.egui_ctx.clone(),
                egui::ViewportId::ROOT,
                &window,
                Some(window.scale_factor() as f32),
                None,
                None,
            );
            let egui_renderer =
                egui_wgpu::Renderer::new(&context.device, context.config.format, None, 1, false);

            self.context = Some(context);
            self.renderer = Some(renderer);
            self.egui_state = Some(egui_state);
            self.egui_renderer = Some(egui_renderer);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let consumed = match (&self.window, &mut self.egui_state) {
            (Some(window), Some(state)) => state.on_window_event(window, &event).consumed,
            _ => false,
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if !consumed && event.state == ElementState::Pressed {
                    if let PhysicalKey::Code(KeyCode::Escape) = event.physical_key {
                        event_loop.exit();
                    }
                }
            }
            WindowEvent::Resized(size) => {
                if let Some(context) = &mut self.context {
                    context.resize(size);
                    self.studio.set_aspect(context.aspect_ratio());
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.mouse_pressed = !consumed && state == ElementState::Pressed;
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let delta_x = position.x - self.mouse_pos.x;
                let delta_y = position.y - self.mouse_pos.y;
                self.mouse_pos = position;

                if self.mouse_pressed && !consumed {
                    self.studio.orbit_camera(
                        delta_x as f32 * ORBIT_SENSITIVITY,
                        -delta_y as f32 * ORBIT_SENSITIVITY,
                    );
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if !consumed {
                    let scroll = match delta {
                        MouseScrollDelta::LineDelta(_, y) => y,
                        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 50.0,
                    };
                    let scale = self.studio.camera().scale() + scroll * ZOOM_STEP;
                    self.studio.set_camera_scale(scale);
                }
            }
            WindowEvent::RedrawRequested => {
                self.studio.tick(&self.clock);
                self.render();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

fn control_panel(
    ui: &mut egui::Ui,
    studio: &mut Studio,
    clock: &SystemClock,
    selected_parent: &mut String,
) {
    ui.heading("Pose");
    if ui.button("Reset pose").clicked() {
        studio.reset_pose();
    }
    if ui.button("Running pose").clicked() {
        studio.apply_running_pose();
    }
    for joint in JointId::ALL {
        let config = joint.config();
        egui::CollapsingHeader::new(joint.node_name())
            .id_salt(joint.node_name())
            .show(ui, |ui| {
                for axis in Axis::ALL {
                    let Some((min, max)) = config.limits[axis.index()] else {
                        continue;
                    };
                    let mut value = studio.joint_rotation(joint)[axis.index()];
                    let slider = egui::Slider::new(&mut value, min..=max)
                        .text(format!("{axis:?}"))
                        .suffix("\u{b0}");
                    if ui.add(slider).changed() {
                        studio.set_joint_rotation(joint, axis, value);
                    }
                }
            });
    }

    ui.separator();
    ui.heading("Attachments");
    let mut parents: Vec<String> = JointId::ALL
        .iter()
        .map(|j| j.node_name().to_string())
        .collect();
    for id in studio.graph().attachments() {
        if let Some(name) = studio.graph().attachment_name(id) {
            parents.push(name.to_string());
        }
    }
    egui::ComboBox::from_label("Attach to")
        .selected_text(selected_parent.clone())
        .show_ui(ui, |ui| {
            for parent in &parents {
                ui.selectable_value(selected_parent, parent.clone(), parent);
            }
        });
    ui.horizontal(|ui| {
        if ui.button("Add ball").clicked() {
            studio.add_attachment(selected_parent, AttachmentKind::Ball);
        }
        if ui.button("Add stick").clicked() {
            studio.add_attachment(selected_parent, AttachmentKind::Stick);
        }
    });
    let attachment_rows: Vec<(posegraph::scene::AttachmentId, String)> = studio
        .graph()
        .attachments()
        .into_iter()
        .filter_map(|id| {
            studio
                .graph()
                .attachment_name(id)
                .map(|name| (id, name.to_string()))
        })
        .collect();
    for (id, name) in attachment_rows {
        ui.horizontal(|ui| {
            ui.label(&name);
            if ui.small_button("remove").clicked() {
                studio.remove_attachment(id);
            }
        });
    }
    if !studio.graph().attachments().is_empty() && ui.button("Remove all").clicked() {
        studio.remove_all_attachments();
    }

    ui.separator();
    ui.heading("Camera");
    let mut scale = studio.camera().scale();
    if ui
        .add(egui::Slider::new(&mut scale, 0.1..=3.0).text("Zoom"))
        .changed()
    {
        studio.set_camera_scale(scale);
    }
    ui.label("Drag to orbit, scroll to zoom");

    ui.separator();
    ui.heading("Lighting");
    let mut lighting = *studio.lighting();
    let mut changed = false;
    changed |= ui
        .add(egui::Slider::new(&mut lighting.position.x, -10.0..=10.0).text("Light X"))
        .changed();
    changed |= ui
        .add(egui::Slider::new(&mut lighting.position.y, -10.0..=10.0).text("Light Y"))
        .changed();
    changed |= ui
        .add(egui::Slider::new(&mut lighting.position.z, -10.0..=10.0).text("Light Z"))
        .changed();
    changed |= ui
        .add(egui::Slider::new(&mut lighting.shininess, 1.0..=128.0).text("Shininess"))
        .changed();
    if changed {
        studio.set_lighting(lighting);
    }

    ui.separator();
    ui.heading("Animation");
    ui.horizontal(|ui| {
        if ui.button("Add keyframe").clicked() {
            studio.add_keyframe();
        }
        let play_label = if studio.animation().is_playing() {
            "Pause"
        } else {
            "Play"
        };
        if ui.button(play_label).clicked() {
            studio.toggle_playback(clock);
        }
        if ui.button("Stop").clicked() {
            studio.stop_playback();
        }
    });
    let mut speed = studio.animation().playback_speed();
    if ui
        .add(egui::Slider::new(&mut speed, 0.1..=4.0).text("Speed"))
        .changed()
    {
        studio.set_playback_speed(speed);
    }

    struct KeyframeRow {
        id: u64,
        time_ms: f32,
        name: String,
        role: KeyframeRole,
    }
    let rows: Vec<KeyframeRow> = studio
        .animation()
        .keyframes()
        .iter()
        .map(|k| KeyframeRow {
            id: k.id,
            time_ms: k.time_ms,
            name: k.name.clone(),
            role: k.role,
        })
        .collect();
    for row in rows {
        ui.horizontal(|ui| {
            ui.label(&row.name);
            let mut time = row.time_ms;
            let drag = egui::DragValue::new(&mut time).speed(10.0).suffix(" ms");
            let editable = row.role != KeyframeRole::Start;
            if ui.add_enabled(editable, drag).changed() {
                match row.role {
                    KeyframeRole::End => studio.drag_timeline_end(time),
                    _ => studio.drag_keyframe(row.id, time),
                }
            }
            if row.role == KeyframeRole::Interior && ui.small_button("x").clicked() {
                studio.remove_keyframe(row.id);
            }
        });
    }
    if studio.animation().keyframe_count() > 0 && ui.button("Clear keyframes").clicked() {
        studio.clear_keyframes();
    }

    if let Some(status) = studio.status() {
        ui.separator();
        let color = match status.level {
            StatusLevel::Info => egui::Color32::LIGHT_BLUE,
            StatusLevel::Success => egui::Color32::LIGHT_GREEN,
            StatusLevel::Error => egui::Color32::LIGHT_RED,
        };
        ui.colored_label(color, &status.message);
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let event_loop = EventLoop::new().unwrap();
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app).unwrap();
}
