//! Maps lifecycle commands and input events onto the engine.
//!
//! The event loop translates the glue's events into [`AppCommand`] and
//! [`InputEvent`] and hands them here together with the engine it owns.

use log::{debug, info, warn};

use crate::engine::Engine;
use crate::render::Renderer;
use crate::sensor::MotionSensor;
use crate::state::SavedState;

/// Lifecycle commands the engine reacts to.
#[derive(Debug)]
pub enum AppCommand<W> {
    InitWindow(W),
    TermWindow,
    GainedFocus,
    LostFocus,
    SaveState,
    /// Carries the blob stored by the last save-state, if the platform kept one.
    Resume(Option<Vec<u8>>),
    Destroy,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Coordinates of the first pointer.
    Motion { x: f32, y: f32 },
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Handled,
    Unhandled,
}

/// What the event loop has to do after a command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dispatch {
    Continue,
    /// Hand these bytes to the platform's state saver.
    Persist([u8; SavedState::SIZE]),
    Exit,
}

pub fn handle_command<R, S>(engine: &mut Engine<R, S>, command: AppCommand<R::Window>) -> Dispatch
where
    R: Renderer,
    S: MotionSensor,
{
    match command {
        AppCommand::SaveState => {
            let state = engine.state();
            debug!("Saving {state:?}");
            return Dispatch::Persist(state.to_bytes());
        }
        AppCommand::Resume(Some(blob)) => match SavedState::from_bytes(&blob) {
            Ok(state) => engine.restore(state),
            Err(err) => warn!("Ignoring saved state: {err}"),
        },
        AppCommand::Resume(None) => {}
        AppCommand::InitWindow(window) => {
            if engine.init_display(&window).is_ok() {
                engine.draw_frame();
            }
        }
        AppCommand::TermWindow => engine.term_display(),
        AppCommand::GainedFocus => engine.gain_focus(),
        AppCommand::LostFocus => engine.lose_focus(),
        AppCommand::Destroy => {
            info!("Destroy requested");
            engine.term_display();
            return Dispatch::Exit;
        }
        AppCommand::Other => {}
    }
    Dispatch::Continue
}

pub fn handle_input<R, S>(engine: &mut Engine<R, S>, event: InputEvent) -> InputOutcome
where
    R: Renderer,
    S: MotionSensor,
{
    match event {
        InputEvent::Motion { x, y } => {
            engine.set_pointer(x, y);
            InputOutcome::Handled
        }
        InputEvent::Other => InputOutcome::Unhandled,
    }
}

/// Runs after every poll of the event loop.
///
/// Drains the accelerometer, then advances one animation frame if the poll
/// returned without an event (`idle`), the loop is not exiting and the engine
/// is still animating. Returns whether a frame was advanced.
pub fn after_poll<R, S>(engine: &mut Engine<R, S>, idle: bool, exit: bool) -> bool
where
    R: Renderer,
    S: MotionSensor,
{
    engine.drain_sensor();
    if !idle || exit || !engine.is_animating() {
        return false;
    }
    engine.tick();
    true
}
