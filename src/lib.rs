//! A `NativeActivity` that draws a flat-color frame, samples the
//! accelerometer and forwards received SMS broadcasts from Java.
//!
//! Everything that calls into the NDK, EGL or the JVM is only built for
//! Android. The engine, the dispatcher, the permission batching, the SMS
//! delivery rules and the JNI error mapping in [`bridge`] are plain Rust
//! behind small traits and run anywhere.

pub mod bridge;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod permissions;
pub mod render;
pub mod sensor;
pub mod sms;
pub mod state;

#[cfg(target_os = "android")]
mod activity;
#[cfg(target_os = "android")]
pub mod egl;
#[cfg(target_os = "android")]
mod gl;

#[cfg(test)]
mod testing;

pub use config::AppConfig;
pub use dispatch::{AppCommand, Dispatch, InputEvent, InputOutcome};
pub use engine::Engine;
pub use error::{BridgeError, RenderError, SmsError, StateError};
pub use render::{ClearColor, FrameSurface, Phase, Renderer};
pub use state::SavedState;
