//! Rendering seam between the engine and the graphics backend.

use crate::error::RenderError;
use crate::state::SavedState;

/// Where the engine is in the window lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Displaying,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearColor {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl ClearColor {
    /// Red follows the pointer across the width, green the animation angle
    /// and blue the pointer down the height.
    pub fn for_state(state: &SavedState, width: i32, height: i32) -> Self {
        ClearColor {
            red: ratio(state.x, width),
            green: state.angle,
            blue: ratio(state.y, height),
            alpha: 1.0,
        }
    }
}

fn ratio(position: i32, extent: i32) -> f32 {
    if extent == 0 {
        0.0
    } else {
        position as f32 / extent as f32
    }
}

/// A live window surface. Every handle it owns is released when it is dropped.
pub trait FrameSurface {
    /// Width and height in pixels, as reported by the surface.
    fn size(&self) -> (i32, i32);

    /// Fills the whole frame with `color` and presents it.
    fn present(&mut self, color: ClearColor) -> Result<(), RenderError>;
}

/// Creates surfaces for native windows.
pub trait Renderer {
    type Window;
    type Surface: FrameSurface;

    fn create_surface(&mut self, window: &Self::Window) -> Result<Self::Surface, RenderError>;
}
