use glam::Vec2;

use crate::simulation::InputEvent;

/// Feeds pointer input to egui and renders its output into our render pass
pub struct EguiIntegration {
    pub ctx: egui::Context,
    raw_input: egui::RawInput,

    renderer: egui_wgpu::Renderer,
    clipped_shapes: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
}

impl EguiIntegration {
    pub fn new(device: &wgpu::Device, swapchain_format: wgpu::TextureFormat) -> Self {
        let renderer = egui_wgpu::Renderer::new(device, swapchain_format, None, 1);

        Self {
            ctx: egui::Context::default(),
            raw_input: egui::RawInput::default(),

            renderer,
            clipped_shapes: Vec::new(),
            textures_delta: egui::TexturesDelta::default(),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.raw_input.screen_rect = Some(egui::Rect::from_min_size(
            Default::default(),
            egui::Vec2::new(width as f32, height as f32),
        ));
    }

    /// Whether the pointer is over one of the overlay windows
    pub fn wants_pointer(&self) -> bool {
        self.ctx.is_pointer_over_area()
    }

    pub fn run<F: FnOnce(&egui::Context)>(&mut self, run_ui: F) {
        let raw_input = std::mem::take(&mut self.raw_input);
        self.ctx.begin_frame(raw_input);
        run_ui(&self.ctx);

        let output = self.ctx.end_frame();
        self.clipped_shapes = self.ctx.tessellate(output.shapes, output.pixels_per_point);
        self.textures_delta = output.textures_delta;
    }

    fn screen_descriptor(&self) -> egui_wgpu::ScreenDescriptor {
        let screen_rect = self.ctx.screen_rect();
        egui_wgpu::ScreenDescriptor {
            size_in_pixels: [screen_rect.width() as u32, screen_rect.height() as u32],
            pixels_per_point: self.ctx.pixels_per_point(),
        }
    }

    pub fn pre_render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        delta_time: f32,
    ) {
        self.raw_input.predicted_dt = delta_time;

        let screen_descriptor = self.screen_descriptor();
        self.renderer.update_buffers(
            device,
            queue,
            encoder,
            &self.clipped_shapes,
            &screen_descriptor,
        );

        for (id, delta) in &self.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }

        for id in &self.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }

    pub fn render<'a>(&'a mut self, rpass: &mut wgpu::RenderPass<'a>) {
        let screen_descriptor = self.screen_descriptor();
        self.renderer
            .render(rpass, &self.clipped_shapes, &screen_descriptor);
    }

    /// Forward a pointer or resize event to egui
    pub fn input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Resize { width, height } => self.resize(width, height),
            pointer => self.raw_input.events.extend(to_egui_event(pointer)),
        }
    }

    pub fn pointer_released(&mut self, position: Vec2) {
        self.raw_input
            .events
            .push(primary_button(position, false));
    }
}

fn primary_button(position: Vec2, pressed: bool) -> egui::Event {
    egui::Event::PointerButton {
        pos: egui::Pos2::new(position.x, position.y),
        button: egui::PointerButton::Primary,
        pressed,
        modifiers: egui::Modifiers::default(),
    }
}

fn to_egui_event(event: InputEvent) -> Option<egui::Event> {
    match event {
        InputEvent::Press(position) => Some(primary_button(position, true)),
        InputEvent::Move(position) => Some(egui::Event::PointerMoved(egui::Pos2::new(
            position.x, position.y,
        ))),
        InputEvent::Resize { .. } => None,
    }
}
