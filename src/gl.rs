//! The handful of OpenGL ES 1.x entry points the frame needs.

#![allow(non_snake_case)]

use crate::render::ClearColor;

pub const PERSPECTIVE_CORRECTION_HINT: u32 = 0x0C50;
pub const FASTEST: u32 = 0x1101;
pub const CULL_FACE: u32 = 0x0B44;
pub const SMOOTH: u32 = 0x1D01;
pub const DEPTH_TEST: u32 = 0x0B71;
pub const COLOR_BUFFER_BIT: u32 = 0x0000_4000;

#[link(name = "GLESv1_CM")]
extern "C" {
    fn glHint(target: u32, mode: u32);
    fn glEnable(cap: u32);
    fn glDisable(cap: u32);
    fn glShadeModel(mode: u32);
    fn glClearColor(red: f32, green: f32, blue: f32, alpha: f32);
    fn glClear(mask: u32);
}

/// Fixed pipeline state for a flat clear-only frame.
///
/// # Safety
///
/// A GL context must be current on the calling thread.
pub unsafe fn init_state() {
    glHint(PERSPECTIVE_CORRECTION_HINT, FASTEST);
    glEnable(CULL_FACE);
    glShadeModel(SMOOTH);
    glDisable(DEPTH_TEST);
}

/// # Safety
///
/// A GL context must be current on the calling thread.
pub unsafe fn clear(color: ClearColor) {
    glClearColor(color.red, color.green, color.blue, color.alpha);
    glClear(COLOR_BUFFER_BIT);
}
