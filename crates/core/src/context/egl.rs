//! Surfaceless EGL context on the first enumerated EGL device.
//!
//! No window system is involved, so this works on headless machines. The
//! context has no default framebuffer; the pipeline renders into its own
//! offscreen target.

use glutin::api::egl::context::PossiblyCurrentContext;
use glutin::api::egl::device::Device;
use glutin::api::egl::display::Display;
use glutin::config::{ConfigSurfaceTypes, ConfigTemplateBuilder};
use glutin::context::{ContextApi, ContextAttributesBuilder, GlProfile};
use glutin::prelude::*;

use super::ContextProvider;
use crate::error::RenderError;
use crate::gpu::{GlowGpu, Gpu};
use crate::params::RenderParams;

/// A current, surfaceless OpenGL context created through EGL.
pub struct EglContext {
    gpu: GlowGpu,
    context: PossiblyCurrentContext,
    display: Display,
}

fn init_failed(reason: impl std::fmt::Display) -> RenderError {
    RenderError::ContextInit {
        backend: EglContext::NAME,
        reason: reason.to_string(),
    }
}

impl ContextProvider for EglContext {
    type Gpu = GlowGpu;

    const NAME: &'static str = "egl";

    #[allow(unsafe_code)]
    fn init(params: &RenderParams) -> Result<Self, RenderError> {
        let device = Device::query_devices()
            .map_err(init_failed)?
            .next()
            .ok_or_else(|| init_failed("no EGL device found"))?;
        log::debug!("using first enumerated EGL device");

        // SAFETY: no native display handle is passed; the display only
        // borrows the device for the duration of the call.
        let display = unsafe { Display::with_device(&device, None) }.map_err(init_failed)?;

        let template = ConfigTemplateBuilder::new()
            .with_alpha_size(8)
            .with_surface_type(ConfigSurfaceTypes::empty())
            .build();
        // SAFETY: the template holds no native window handle.
        let config = unsafe { display.find_configs(template) }
            .map_err(init_failed)?
            .next()
            .ok_or_else(|| init_failed("no surfaceless EGL config with 8-bit alpha"))?;

        let attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(None))
            .with_profile(GlProfile::Compatibility)
            .build(None);
        // SAFETY: the config comes from this display and no window handle is
        // attached to the attributes.
        let not_current =
            unsafe { display.create_context(&config, &attributes) }.map_err(init_failed)?;
        let context = not_current
            .make_current_surfaceless()
            .map_err(init_failed)?;

        // SAFETY: the context was made current on this thread just above, and
        // the display resolves entry points for it.
        let gpu = unsafe { GlowGpu::from_loader(|symbol| display.get_proc_address(symbol)) };

        log::info!(
            "EGL context ready for {}x{} offscreen rendering",
            params.width,
            params.height
        );
        Ok(Self {
            gpu,
            context,
            display,
        })
    }

    fn gpu(&self) -> &GlowGpu {
        &self.gpu
    }

    fn render(&mut self) -> Result<(), RenderError> {
        self.gpu.finish()
    }

    fn terminate(self) {
        let Self {
            gpu,
            context,
            display,
        } = self;
        drop(gpu);
        if let Err(e) = context.make_not_current() {
            log::warn!("failed to release EGL context: {e}");
        }
        drop(display);
        log::debug!("EGL context terminated");
    }
}
