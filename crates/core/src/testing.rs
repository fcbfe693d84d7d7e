//! Recording GL fake for driver-free tests.
//!
//! `FakeGpu` logs every call, hands out integer handles, and keeps a
//! bottom-left-origin RGBA8 framebuffer. Clearing fills it with the clear
//! colour; a draw call runs the installed `paint` closure for every pixel in
//! GL window coordinates, standing in for the fragment shader.

use std::cell::RefCell;

use crate::error::RenderError;
use crate::gpu::{BufferTarget, Gpu, ShaderStage};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateShader(ShaderStage, u32),
    ShaderSource(u32),
    CompileShader(u32),
    CreateProgram(u32),
    AttachShader(u32, u32),
    LinkProgram(u32),
    UseProgram(u32),
    CreateBuffer(u32),
    BindBuffer(BufferTarget, u32),
    BufferData(BufferTarget, Vec<u8>),
    EnableVertexAttribArray(u32),
    VertexAttribPointer(u32, i32),
    CreateTexture(u32, i32, i32),
    CreateFramebuffer(u32),
    BindFramebuffer(u32),
    AttachColorTexture(u32),
    Viewport(i32, i32, i32, i32),
    ClearColor([f32; 4]),
    Clear,
    DrawTriangles(i32),
    Flush,
    Finish,
    ReadPixels(i32, i32),
}

type Paint = Box<dyn Fn(u32, u32) -> [u8; 4]>;

struct State {
    next_id: u32,
    calls: Vec<Call>,
    sources: Vec<String>,
    stages: Vec<(u32, ShaderStage)>,
    compile_failure: Option<(ShaderStage, String)>,
    link_failure: Option<String>,
    failing_call: Option<(&'static str, u32)>,
    attributes: Vec<String>,
    framebuffer_complete: bool,
    clear: [u8; 4],
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    paint: Option<Paint>,
}

pub struct FakeGpu {
    state: RefCell<State>,
}

impl FakeGpu {
    /// A fake whose framebuffer is `width`×`height` and whose linked
    /// programs expose `vert2d`.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            state: RefCell::new(State {
                next_id: 1,
                calls: Vec::new(),
                sources: Vec::new(),
                stages: Vec::new(),
                compile_failure: None,
                link_failure: None,
                failing_call: None,
                attributes: vec!["vert2d".to_string()],
                framebuffer_complete: true,
                clear: [0; 4],
                width,
                height,
                pixels: vec![0; width as usize * height as usize * 4],
                paint: None,
            }),
        }
    }

    /// Installs the per-pixel colour produced by the next draw call.
    /// Coordinates are GL window coordinates: `y == 0` is the bottom row.
    pub fn paint(&self, f: impl Fn(u32, u32) -> [u8; 4] + 'static) {
        self.state.borrow_mut().paint = Some(Box::new(f));
    }

    pub fn fail_compile(&self, stage: ShaderStage, log: &str) {
        self.state.borrow_mut().compile_failure = Some((stage, log.to_string()));
    }

    pub fn fail_link(&self, log: &str) {
        self.state.borrow_mut().link_failure = Some(log.to_string());
    }

    /// Makes the named GL call report `code` from `glGetError`.
    pub fn fail_call(&self, call: &'static str, code: u32) {
        self.state.borrow_mut().failing_call = Some((call, code));
    }

    /// Linked programs expose no attributes at all.
    pub fn drop_attributes(&self) {
        self.state.borrow_mut().attributes.clear();
    }

    pub fn incomplete_framebuffer(&self) {
        self.state.borrow_mut().framebuffer_complete = false;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn shader_sources(&self) -> Vec<String> {
        self.state.borrow().sources.clone()
    }

    fn record(&self, name: &'static str, call: Call) -> Result<(), RenderError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(call);
        match state.failing_call {
            Some((failing, code)) if failing == name => {
                Err(RenderError::GraphicsApi { call: name, code })
            }
            _ => Ok(()),
        }
    }

    fn next_id(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        id
    }

    fn stage_of(&self, shader: u32) -> Option<ShaderStage> {
        self.state
            .borrow()
            .stages
            .iter()
            .find(|(id, _)| *id == shader)
            .map(|(_, stage)| *stage)
    }
}

fn to_byte(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl Gpu for FakeGpu {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type Texture = u32;
    type Framebuffer = u32;

    fn create_shader(&self, stage: ShaderStage) -> Result<u32, RenderError> {
        let id = self.next_id();
        self.state.borrow_mut().stages.push((id, stage));
        self.record("glCreateShader", Call::CreateShader(stage, id))?;
        Ok(id)
    }

    fn shader_source(&self, shader: u32, source: &str) -> Result<(), RenderError> {
        self.state.borrow_mut().sources.push(source.to_string());
        self.record("glShaderSource", Call::ShaderSource(shader))
    }

    fn compile_shader(&self, shader: u32) -> Result<(), RenderError> {
        self.record("glCompileShader", Call::CompileShader(shader))
    }

    fn shader_compile_status(&self, shader: u32) -> Result<bool, RenderError> {
        let stage = self.stage_of(shader);
        let failing = self.state.borrow().compile_failure.as_ref().map(|(s, _)| *s);
        Ok(stage.is_none() || failing != stage)
    }

    fn shader_info_log(&self, _shader: u32) -> String {
        self.state
            .borrow()
            .compile_failure
            .as_ref()
            .map(|(_, log)| log.clone())
            .unwrap_or_default()
    }

    fn create_program(&self) -> Result<u32, RenderError> {
        let id = self.next_id();
        self.record("glCreateProgram", Call::CreateProgram(id))?;
        Ok(id)
    }

    fn attach_shader(&self, program: u32, shader: u32) -> Result<(), RenderError> {
        self.record("glAttachShader", Call::AttachShader(program, shader))
    }

    fn link_program(&self, program: u32) -> Result<(), RenderError> {
        self.record("glLinkProgram", Call::LinkProgram(program))
    }

    fn program_link_status(&self, _program: u32) -> Result<bool, RenderError> {
        Ok(self.state.borrow().link_failure.is_none())
    }

    fn program_info_log(&self, _program: u32) -> String {
        self.state.borrow().link_failure.clone().unwrap_or_default()
    }

    fn use_program(&self, program: u32) -> Result<(), RenderError> {
        self.record("glUseProgram", Call::UseProgram(program))
    }

    fn attrib_location(&self, _program: u32, name: &str) -> Option<u32> {
        self.state
            .borrow()
            .attributes
            .iter()
            .position(|a| a == name)
            .map(|i| i as u32)
    }

    fn create_buffer(&self) -> Result<u32, RenderError> {
        let id = self.next_id();
        self.record("glGenBuffers", Call::CreateBuffer(id))?;
        Ok(id)
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: u32) -> Result<(), RenderError> {
        self.record("glBindBuffer", Call::BindBuffer(target, buffer))
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8]) -> Result<(), RenderError> {
        self.record("glBufferData", Call::BufferData(target, data.to_vec()))
    }

    fn enable_vertex_attrib_array(&self, location: u32) -> Result<(), RenderError> {
        self.record(
            "glEnableVertexAttribArray",
            Call::EnableVertexAttribArray(location),
        )
    }

    fn vertex_attrib_pointer_f32(&self, location: u32, components: i32) -> Result<(), RenderError> {
        self.record(
            "glVertexAttribPointer",
            Call::VertexAttribPointer(location, components),
        )
    }

    fn create_rgba8_texture(&self, width: i32, height: i32) -> Result<u32, RenderError> {
        let id = self.next_id();
        self.record("glTexImage2D", Call::CreateTexture(id, width, height))?;
        Ok(id)
    }

    fn create_framebuffer(&self) -> Result<u32, RenderError> {
        let id = self.next_id();
        self.record("glGenFramebuffers", Call::CreateFramebuffer(id))?;
        Ok(id)
    }

    fn bind_framebuffer(&self, framebuffer: u32) -> Result<(), RenderError> {
        self.record("glBindFramebuffer", Call::BindFramebuffer(framebuffer))
    }

    fn attach_color_texture(&self, texture: u32) -> Result<(), RenderError> {
        self.record("glFramebufferTexture2D", Call::AttachColorTexture(texture))
    }

    fn framebuffer_complete(&self) -> Result<bool, RenderError> {
        Ok(self.state.borrow().framebuffer_complete)
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) -> Result<(), RenderError> {
        self.record("glViewport", Call::Viewport(x, y, width, height))
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) -> Result<(), RenderError> {
        self.state.borrow_mut().clear = [to_byte(r), to_byte(g), to_byte(b), to_byte(a)];
        self.record("glClearColor", Call::ClearColor([r, g, b, a]))
    }

    fn clear_color_buffer(&self) -> Result<(), RenderError> {
        {
            let mut state = self.state.borrow_mut();
            let clear = state.clear;
            for px in state.pixels.chunks_exact_mut(4) {
                px.copy_from_slice(&clear);
            }
        }
        self.record("glClear", Call::Clear)
    }

    fn draw_triangles_u8(&self, count: i32) -> Result<(), RenderError> {
        {
            let mut state = self.state.borrow_mut();
            if let Some(paint) = state.paint.take() {
                let width = state.width;
                for (i, px) in state.pixels.chunks_exact_mut(4).enumerate() {
                    let x = i as u32 % width;
                    let y = i as u32 / width;
                    px.copy_from_slice(&paint(x, y));
                }
                state.paint = Some(paint);
            }
        }
        self.record("glDrawElements", Call::DrawTriangles(count))
    }

    fn flush(&self) -> Result<(), RenderError> {
        self.record("glFlush", Call::Flush)
    }

    fn finish(&self) -> Result<(), RenderError> {
        self.record("glFinish", Call::Finish)
    }

    fn read_pixels_rgba8(&self, width: i32, height: i32, out: &mut [u8]) -> Result<(), RenderError> {
        self.record("glReadPixels", Call::ReadPixels(width, height))?;
        let state = self.state.borrow();
        let n = out.len().min(state.pixels.len());
        out[..n].copy_from_slice(&state.pixels[..n]);
        Ok(())
    }
}
