//! OpenGL context on a hidden GLFW window.

use glfw::Context as _;

use super::ContextProvider;
use crate::error::RenderError;
use crate::gpu::GlowGpu;
use crate::params::RenderParams;

/// A current OpenGL context owned by an invisible GLFW window.
pub struct GlfwContext {
    gpu: GlowGpu,
    window: glfw::PWindow,
    _events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
    glfw: glfw::Glfw,
}

fn init_failed(reason: impl std::fmt::Display) -> RenderError {
    RenderError::ContextInit {
        backend: GlfwContext::NAME,
        reason: reason.to_string(),
    }
}

impl ContextProvider for GlfwContext {
    type Gpu = GlowGpu;

    const NAME: &'static str = "glfw";

    #[allow(unsafe_code)]
    fn init(params: &RenderParams) -> Result<Self, RenderError> {
        let mut glfw = glfw::init(glfw::log_errors).map_err(init_failed)?;

        glfw.window_hint(glfw::WindowHint::Visible(false));
        glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::OpenGl));

        let (mut window, events) = glfw
            .create_window(
                params.width,
                params.height,
                "getimage",
                glfw::WindowMode::Windowed,
            )
            .ok_or_else(|| init_failed("cannot create hidden window"))?;
        window.make_current();

        // SAFETY: the window's context was made current on this thread just
        // above and GLFW resolves entry points for it.
        let gpu = unsafe {
            GlowGpu::from_loader(|symbol| {
                window.get_proc_address(symbol.to_str().unwrap_or_default()) as *const _
            })
        };

        log::info!(
            "GLFW context ready on hidden {}x{} window",
            params.width,
            params.height
        );
        Ok(Self {
            gpu,
            window,
            _events: events,
            glfw,
        })
    }

    fn gpu(&self) -> &GlowGpu {
        &self.gpu
    }

    fn render(&mut self) -> Result<(), RenderError> {
        self.window.swap_buffers();
        Ok(())
    }

    fn terminate(self) {
        let Self {
            gpu,
            window,
            _events,
            glfw,
        } = self;
        drop(gpu);
        drop(window);
        drop(glfw);
        log::debug!("GLFW context terminated");
    }
}
