//! EGL window surfaces for `ANativeWindow`s.

use khronos_egl as egl;
use log::{debug, warn};
use ndk::native_window::NativeWindow;

use crate::error::RenderError;
use crate::gl;
use crate::render::{ClearColor, FrameSurface, Renderer};

/// At least 8 bits per color channel, usable for on-screen windows.
const CONFIG_ATTRIBS: [egl::Int; 9] = [
    egl::SURFACE_TYPE,
    egl::WINDOW_BIT,
    egl::BLUE_SIZE,
    8,
    egl::GREEN_SIZE,
    8,
    egl::RED_SIZE,
    8,
    egl::NONE,
];

/// Creates [`EglSurface`]s against the default display.
#[derive(Debug, Default)]
pub struct EglRenderer;

impl Renderer for EglRenderer {
    type Window = NativeWindow;
    type Surface = EglSurface;

    fn create_surface(&mut self, window: &NativeWindow) -> Result<EglSurface, RenderError> {
        let egl = egl::Instance::new(egl::Static);
        let display =
            unsafe { egl.get_display(egl::DEFAULT_DISPLAY) }.ok_or(RenderError::NoDisplay)?;
        let (major, minor) = egl
            .initialize(display)
            .map_err(|err| RenderError::egl("eglInitialize", err))?;
        debug!("EGL {major}.{minor}");

        match bind_window(&egl, display, window) {
            Ok((surface, context)) => {
                let width = egl.query_surface(display, surface, egl::WIDTH);
                let height = egl.query_surface(display, surface, egl::HEIGHT);
                unsafe { gl::init_state() };
                Ok(EglSurface {
                    egl,
                    display,
                    surface,
                    context,
                    width: width.unwrap_or(0),
                    height: height.unwrap_or(0),
                })
            }
            Err(err) => {
                log_failure("eglTerminate", egl.terminate(display));
                Err(err)
            }
        }
    }
}

/// Picks the config, resizes the window buffers to match it and makes a new
/// surface and context current. Whatever was created is destroyed on failure.
fn bind_window(
    egl: &egl::Instance<egl::Static>,
    display: egl::Display,
    window: &NativeWindow,
) -> Result<(egl::Surface, egl::Context), RenderError> {
    let config = egl
        .choose_first_config(display, &CONFIG_ATTRIBS)
        .map_err(|err| RenderError::egl("eglChooseConfig", err))?
        .ok_or(RenderError::NoConfig)?;

    // NATIVE_VISUAL_ID is always accepted by ANativeWindow_setBuffersGeometry.
    let format = egl
        .get_config_attrib(display, config, egl::NATIVE_VISUAL_ID)
        .map_err(|err| RenderError::egl("eglGetConfigAttrib", err))?;
    let status =
        unsafe { ndk_sys::ANativeWindow_setBuffersGeometry(window.ptr().as_ptr(), 0, 0, format) };
    if status < 0 {
        warn!("ANativeWindow_setBuffersGeometry returned {status}");
    }

    let surface = unsafe {
        egl.create_window_surface(display, config, window.ptr().as_ptr().cast(), None)
    }
    .map_err(|err| RenderError::egl("eglCreateWindowSurface", err))?;

    let context = match egl.create_context(display, config, None, &[egl::NONE]) {
        Ok(context) => context,
        Err(err) => {
            log_failure("eglDestroySurface", egl.destroy_surface(display, surface));
            return Err(RenderError::egl("eglCreateContext", err));
        }
    };

    if let Err(err) = egl.make_current(display, Some(surface), Some(surface), Some(context)) {
        log_failure("eglDestroyContext", egl.destroy_context(display, context));
        log_failure("eglDestroySurface", egl.destroy_surface(display, surface));
        return Err(RenderError::egl("eglMakeCurrent", err));
    }
    Ok((surface, context))
}

/// A display connection with a current surface and context.
///
/// Dropping it releases the context and surface and terminates the display.
pub struct EglSurface {
    egl: egl::Instance<egl::Static>,
    display: egl::Display,
    surface: egl::Surface,
    context: egl::Context,
    width: i32,
    height: i32,
}

impl FrameSurface for EglSurface {
    fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn present(&mut self, color: ClearColor) -> Result<(), RenderError> {
        unsafe { gl::clear(color) };
        self.egl
            .swap_buffers(self.display, self.surface)
            .map_err(|err| RenderError::egl("eglSwapBuffers", err))
    }
}

impl Drop for EglSurface {
    fn drop(&mut self) {
        let steps = [
            ("eglMakeCurrent", self.egl.make_current(self.display, None, None, None)),
            ("eglDestroyContext", self.egl.destroy_context(self.display, self.context)),
            ("eglDestroySurface", self.egl.destroy_surface(self.display, self.surface)),
            ("eglTerminate", self.egl.terminate(self.display)),
        ];
        for (call, result) in steps {
            log_failure(call, result);
        }
    }
}

fn log_failure(call: &str, result: Result<(), egl::Error>) {
    if let Err(err) = result {
        warn!("{call} failed: {err}");
    }
}
