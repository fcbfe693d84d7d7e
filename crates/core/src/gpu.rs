//! The GL session threaded through every pipeline stage.
//!
//! [`Gpu`] is the narrow slice of OpenGL the pipeline uses. Every method is
//! one GL call followed by a `glGetError` check, so a failure surfaces as
//! `RenderError::GraphicsApi` naming the call. [`GlowGpu`] implements it over a
//! live `glow::Context`; tests implement it with a recording fake.

use crate::error::RenderError;

/// Shader stage passed to [`Gpu::create_shader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Lowercase stage name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

/// Buffer binding point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferTarget {
    /// `GL_ARRAY_BUFFER`
    Vertex,
    /// `GL_ELEMENT_ARRAY_BUFFER`
    Index,
}

/// Error-checked OpenGL operations used by the pipeline.
///
/// Handle types are associated so the real implementation can use glow's
/// native handles while fakes use plain integers.
pub trait Gpu {
    type Shader: Copy;
    type Program: Copy;
    type Buffer: Copy;
    type Texture: Copy;
    type Framebuffer: Copy;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, RenderError>;
    fn shader_source(&self, shader: Self::Shader, source: &str) -> Result<(), RenderError>;
    fn compile_shader(&self, shader: Self::Shader) -> Result<(), RenderError>;
    fn shader_compile_status(&self, shader: Self::Shader) -> Result<bool, RenderError>;
    fn shader_info_log(&self, shader: Self::Shader) -> String;

    fn create_program(&self) -> Result<Self::Program, RenderError>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader)
        -> Result<(), RenderError>;
    fn link_program(&self, program: Self::Program) -> Result<(), RenderError>;
    fn program_link_status(&self, program: Self::Program) -> Result<bool, RenderError>;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn use_program(&self, program: Self::Program) -> Result<(), RenderError>;
    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32>;

    fn create_buffer(&self) -> Result<Self::Buffer, RenderError>;
    fn bind_buffer(&self, target: BufferTarget, buffer: Self::Buffer) -> Result<(), RenderError>;
    /// Uploads `data` as `GL_STATIC_DRAW` to the buffer bound at `target`.
    fn buffer_data(&self, target: BufferTarget, data: &[u8]) -> Result<(), RenderError>;
    fn enable_vertex_attrib_array(&self, location: u32) -> Result<(), RenderError>;
    /// Tightly packed `f32` attribute with `components` per vertex at offset 0.
    fn vertex_attrib_pointer_f32(&self, location: u32, components: i32)
        -> Result<(), RenderError>;

    /// Allocates an empty RGBA8 texture with nearest filtering.
    fn create_rgba8_texture(&self, width: i32, height: i32)
        -> Result<Self::Texture, RenderError>;
    fn create_framebuffer(&self) -> Result<Self::Framebuffer, RenderError>;
    fn bind_framebuffer(&self, framebuffer: Self::Framebuffer) -> Result<(), RenderError>;
    /// Attaches `texture` as `GL_COLOR_ATTACHMENT0` of the bound framebuffer.
    fn attach_color_texture(&self, texture: Self::Texture) -> Result<(), RenderError>;
    /// Returns whether the bound framebuffer is complete.
    fn framebuffer_complete(&self) -> Result<bool, RenderError>;

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) -> Result<(), RenderError>;
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) -> Result<(), RenderError>;
    fn clear_color_buffer(&self) -> Result<(), RenderError>;
    /// `glDrawElements(GL_TRIANGLES, count, GL_UNSIGNED_BYTE, 0)`.
    fn draw_triangles_u8(&self, count: i32) -> Result<(), RenderError>;
    fn flush(&self) -> Result<(), RenderError>;
    fn finish(&self) -> Result<(), RenderError>;
    /// Reads an RGBA8 block with its origin at the bottom-left corner.
    fn read_pixels_rgba8(&self, width: i32, height: i32, out: &mut [u8])
        -> Result<(), RenderError>;
}

/// [`Gpu`] over a live `glow::Context`.
pub struct GlowGpu {
    gl: glow::Context,
}

impl GlowGpu {
    /// Wraps a context that is already current on this thread.
    pub fn new(gl: glow::Context) -> Self {
        Self { gl }
    }

    /// Loads GL entry points through `loader` and wraps the result.
    ///
    /// # Safety
    ///
    /// A GL context must be current on the calling thread and `loader` must
    /// return valid function pointers for it.
    #[allow(unsafe_code)]
    pub unsafe fn from_loader<F>(loader: F) -> Self
    where
        F: FnMut(&std::ffi::CStr) -> *const std::ffi::c_void,
    {
        // SAFETY: forwarded to the caller.
        let gl = unsafe { glow::Context::from_loader_function_cstr(loader) };
        Self::new(gl)
    }

    /// Fails with `GraphicsApi` if the previous call left an error behind.
    #[allow(unsafe_code)]
    fn check(&self, call: &'static str) -> Result<(), RenderError> {
        use glow::HasContext;

        // SAFETY: glGetError has no preconditions beyond a current context.
        let code = unsafe { self.gl.get_error() };
        if code == glow::NO_ERROR {
            Ok(())
        } else {
            log::debug!("{call}() raised 0x{code:04X}");
            Err(RenderError::GraphicsApi { call, code })
        }
    }

    /// Maps a glow object-creation failure to `GraphicsApi`, reading the
    /// pending error code when there is one.
    #[allow(unsafe_code)]
    fn creation_failed(&self, call: &'static str, reason: String) -> RenderError {
        use glow::HasContext;

        log::debug!("{call}() failed: {reason}");
        // SAFETY: glGetError has no preconditions beyond a current context.
        let code = unsafe { self.gl.get_error() };
        RenderError::GraphicsApi {
            call,
            code: creation_error_code(code),
        }
    }
}

/// Object creation can fail without a pending GL error; report those as
/// `GL_INVALID_OPERATION`.
fn creation_error_code(pending: u32) -> u32 {
    if pending == glow::NO_ERROR {
        glow::INVALID_OPERATION
    } else {
        pending
    }
}

fn buffer_target(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::Vertex => glow::ARRAY_BUFFER,
        BufferTarget::Index => glow::ELEMENT_ARRAY_BUFFER,
    }
}

// SAFETY (applies to every block below): glow exposes raw GL calls as unsafe.
// All handles passed in were produced by this same context, sizes are
// validated by the callers, and `read_pixels_rgba8` checks the slice length
// before handing it to the driver.
#[allow(unsafe_code)]
impl Gpu for GlowGpu {
    type Shader = glow::Shader;
    type Program = glow::Program;
    type Buffer = glow::Buffer;
    type Texture = glow::Texture;
    type Framebuffer = glow::Framebuffer;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, RenderError> {
        use glow::HasContext;

        let kind = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        let shader = unsafe { self.gl.create_shader(kind) }
            .map_err(|e| self.creation_failed("glCreateShader", e))?;
        self.check("glCreateShader")?;
        Ok(shader)
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) -> Result<(), RenderError> {
        use glow::HasContext;

        unsafe { self.gl.shader_source(shader, source) };
        self.check("glShaderSource")
    }

    fn compile_shader(&self, shader: Self::Shader) -> Result<(), RenderError> {
        use glow::HasContext;

        unsafe { self.gl.compile_shader(shader) };
        self.check("glCompileShader")
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> Result<bool, RenderError> {
        use glow::HasContext;

        let status = unsafe { self.gl.get_shader_compile_status(shader) };
        self.check("glGetShaderiv")?;
        Ok(status)
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        use glow::HasContext;

        unsafe { self.gl.get_shader_info_log(shader) }
    }

    fn create_program(&self) -> Result<Self::Program, RenderError> {
        use glow::HasContext;

        let program = unsafe { self.gl.create_program() }
            .map_err(|e| self.creation_failed("glCreateProgram", e))?;
        self.check("glCreateProgram")?;
        Ok(program)
    }

    fn attach_shader(
        &self,
        program: Self::Program,
        shader: Self::Shader,
    ) -> Result<(), RenderError> {
        use glow::HasContext;

        unsafe { self.gl.attach_shader(program, shader) };
        self.check("glAttachShader")
    }

    fn link_program(&self, program: Self::Program) -> Result<(), RenderError> {
        use glow::HasContext;

        unsafe { self.gl.link_program(program) };
        self.check("glLinkProgram")
    }

    fn program_link_status(&self, program: Self::Program) -> Result<bool, RenderError> {
        use glow::HasContext;

        let status = unsafe { self.gl.get_program_link_status(program) };
        self.check("glGetProgramiv")?;
        Ok(status)
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        use glow::HasContext;

        unsafe { self.gl.get_program_info_log(program) }
    }

    fn use_program(&self, program: Self::Program) -> Result<(), RenderError> {
        use glow::HasContext;

        unsafe { self.gl.use_program(Some(program)) };
        self.check("glUseProgram")
    }

    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32> {
        use glow::HasContext;

        unsafe { self.gl.get_attrib_location(program, name) }
    }

    fn create_buffer(&self) -> Result<Self::Buffer, RenderError> {
        use glow::HasContext;

        let buffer = unsafe { self.gl.create_buffer() }
            .map_err(|e| self.creation_failed("glGenBuffers", e))?;
        self.check("glGenBuffers")?;
        Ok(buffer)
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Self::Buffer) -> Result<(), RenderError> {
        use glow::HasContext;

        unsafe { self.gl.bind_buffer(buffer_target(target), Some(buffer)) };
        self.check("glBindBuffer")
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8]) -> Result<(), RenderError> {
        use glow::HasContext;

        unsafe {
            self.gl
                .buffer_data_u8_slice(buffer_target(target), data, glow::STATIC_DRAW)
        };
        self.check("glBufferData")
    }

    fn enable_vertex_attrib_array(&self, location: u32) -> Result<(), RenderError> {
        use glow::HasContext;

        unsafe { self.gl.enable_vertex_attrib_array(location) };
        self.check("glEnableVertexAttribArray")
    }

    fn vertex_attrib_pointer_f32(
        &self,
        location: u32,
        components: i32,
    ) -> Result<(), RenderError> {
        use glow::HasContext;

        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(location, components, glow::FLOAT, false, 0, 0)
        };
        self.check("glVertexAttribPointer")
    }

    fn create_rgba8_texture(
        &self,
        width: i32,
        height: i32,
    ) -> Result<Self::Texture, RenderError> {
        use glow::HasContext;

        let texture = unsafe { self.gl.create_texture() }
            .map_err(|e| self.creation_failed("glGenTextures", e))?;
        self.check("glGenTextures")?;

        unsafe { self.gl.bind_texture(glow::TEXTURE_2D, Some(texture)) };
        self.check("glBindTexture")?;

        for (pname, value) in [
            (glow::TEXTURE_MIN_FILTER, glow::NEAREST),
            (glow::TEXTURE_MAG_FILTER, glow::NEAREST),
            (glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE),
            (glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE),
        ] {
            unsafe {
                self.gl
                    .tex_parameter_i32(glow::TEXTURE_2D, pname, value as i32)
            };
            self.check("glTexParameteri")?;
        }

        unsafe {
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA8 as i32,
                width,
                height,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(None),
            )
        };
        self.check("glTexImage2D")?;

        Ok(texture)
    }

    fn create_framebuffer(&self) -> Result<Self::Framebuffer, RenderError> {
        use glow::HasContext;

        let fbo = unsafe { self.gl.create_framebuffer() }
            .map_err(|e| self.creation_failed("glGenFramebuffers", e))?;
        self.check("glGenFramebuffers")?;
        Ok(fbo)
    }

    fn bind_framebuffer(&self, framebuffer: Self::Framebuffer) -> Result<(), RenderError> {
        use glow::HasContext;

        unsafe {
            self.gl
                .bind_framebuffer(glow::FRAMEBUFFER, Some(framebuffer))
        };
        self.check("glBindFramebuffer")
    }

    fn attach_color_texture(&self, texture: Self::Texture) -> Result<(), RenderError> {
        use glow::HasContext;

        unsafe {
            self.gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_2D,
                Some(texture),
                0,
            )
        };
        self.check("glFramebufferTexture2D")
    }

    fn framebuffer_complete(&self) -> Result<bool, RenderError> {
        use glow::HasContext;

        let status = unsafe { self.gl.check_framebuffer_status(glow::FRAMEBUFFER) };
        self.check("glCheckFramebufferStatus")?;
        if status != glow::FRAMEBUFFER_COMPLETE {
            log::debug!("framebuffer incomplete: status 0x{status:04X}");
        }
        Ok(status == glow::FRAMEBUFFER_COMPLETE)
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) -> Result<(), RenderError> {
        use glow::HasContext;

        unsafe { self.gl.viewport(x, y, width, height) };
        self.check("glViewport")
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) -> Result<(), RenderError> {
        use glow::HasContext;

        unsafe { self.gl.clear_color(r, g, b, a) };
        self.check("glClearColor")
    }

    fn clear_color_buffer(&self) -> Result<(), RenderError> {
        use glow::HasContext;

        unsafe { self.gl.clear(glow::COLOR_BUFFER_BIT) };
        self.check("glClear")
    }

    fn draw_triangles_u8(&self, count: i32) -> Result<(), RenderError> {
        use glow::HasContext;

        unsafe {
            self.gl
                .draw_elements(glow::TRIANGLES, count, glow::UNSIGNED_BYTE, 0)
        };
        self.check("glDrawElements")
    }

    fn flush(&self) -> Result<(), RenderError> {
        use glow::HasContext;

        unsafe { self.gl.flush() };
        self.check("glFlush")
    }

    fn finish(&self) -> Result<(), RenderError> {
        use glow::HasContext;

        unsafe { self.gl.finish() };
        self.check("glFinish")
    }

    fn read_pixels_rgba8(
        &self,
        width: i32,
        height: i32,
        out: &mut [u8],
    ) -> Result<(), RenderError> {
        use glow::HasContext;

        let expected = width.max(0) as usize * height.max(0) as usize * 4;
        if out.len() != expected {
            return Err(RenderError::Usage(format!(
                "readback buffer holds {} bytes, expected {expected}",
                out.len()
            )));
        }

        unsafe { self.gl.pixel_store_i32(glow::PACK_ALIGNMENT, 1) };
        self.check("glPixelStorei")?;

        unsafe {
            self.gl.read_pixels(
                0,
                0,
                width,
                height,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelPackData::Slice(Some(out)),
            )
        };
        self.check("glReadPixels")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_stage_names() {
        assert_eq!(ShaderStage::Vertex.name(), "vertex");
        assert_eq!(ShaderStage::Fragment.name(), "fragment");
    }

    #[test]
    fn buffer_targets_map_to_gl_enums() {
        assert_eq!(buffer_target(BufferTarget::Vertex), glow::ARRAY_BUFFER);
        assert_eq!(
            buffer_target(BufferTarget::Index),
            glow::ELEMENT_ARRAY_BUFFER
        );
    }

    #[test]
    fn creation_failure_without_pending_error_is_invalid_operation() {
        assert_eq!(creation_error_code(glow::NO_ERROR), glow::INVALID_OPERATION);
    }

    #[test]
    fn creation_failure_keeps_pending_error() {
        assert_eq!(creation_error_code(glow::OUT_OF_MEMORY), glow::OUT_OF_MEMORY);
    }

    #[cfg(feature = "egl")]
    #[test]
    #[ignore = "requires GL context"]
    fn negative_viewport_is_reported_as_invalid_value() {
        use crate::context::{ContextProvider, EglContext};
        use crate::params::RenderParams;

        let context = EglContext::init(&RenderParams::default()).unwrap();
        let err = context.gpu().viewport(0, 0, -1, -1).unwrap_err();
        assert_eq!(
            err,
            RenderError::GraphicsApi {
                call: "glViewport",
                code: glow::INVALID_VALUE
            }
        );
        context.terminate();
    }
}
