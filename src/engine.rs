//! Window, animation and sensor state owned by the event loop thread.

use std::time::Duration;

use log::{debug, error, info, warn};

use crate::config::AppConfig;
use crate::error::RenderError;
use crate::render::{ClearColor, FrameSurface, Phase, Renderer};
use crate::sensor::MotionSensor;
use crate::state::SavedState;

/// Application state shared by every event-loop callback.
///
/// Created once by the entry point and lent to the handlers; there is no
/// global instance.
pub struct Engine<R: Renderer, S> {
    renderer: R,
    surface: Option<R::Surface>,
    sensor: Option<S>,
    state: SavedState,
    width: i32,
    height: i32,
    animating: bool,
    phase: Phase,
    config: AppConfig,
}

impl<R: Renderer, S: MotionSensor> Engine<R, S> {
    /// Animation starts enabled; the surface is created on the first
    /// window-init command.
    pub fn new(renderer: R, sensor: Option<S>, config: AppConfig) -> Self {
        if sensor.is_none() {
            info!("No accelerometer available");
        }
        Engine {
            renderer,
            surface: None,
            sensor,
            state: SavedState::default(),
            width: 0,
            height: 0,
            animating: true,
            phase: Phase::Uninitialized,
            config,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> SavedState {
        self.state
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn surface(&self) -> Option<&R::Surface> {
        self.surface.as_ref()
    }

    pub fn viewport(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// How long the event loop may block: not at all while animating,
    /// otherwise until the next event.
    pub fn poll_timeout(&self) -> Option<Duration> {
        self.animating.then_some(Duration::ZERO)
    }

    /// Creates the window surface and resets the animation angle.
    ///
    /// Any previous surface is released first. On failure the engine is
    /// left without a surface.
    pub fn init_display(&mut self, window: &R::Window) -> Result<(), RenderError> {
        if self.surface.is_some() {
            self.term_display();
        }
        let surface = self.renderer.create_surface(window).map_err(|err| {
            warn!("Unable to initialize the display: {err}");
            err
        })?;
        let (width, height) = surface.size();
        self.surface = Some(surface);
        self.width = width;
        self.height = height;
        self.state.angle = 0.0;
        self.phase = Phase::Displaying;
        info!("Display ready, {width}x{height}");
        Ok(())
    }

    /// Presents one frame. Does nothing while there is no surface.
    pub fn draw_frame(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let color = ClearColor::for_state(&self.state, self.width, self.height);
        if let Err(err) = surface.present(color) {
            error!("Frame not presented: {err}");
        }
    }

    /// Releases the surface and every handle it owns, and stops animating.
    pub fn term_display(&mut self) {
        if self.surface.take().is_some() {
            self.phase = Phase::Terminated;
            info!("Display terminated");
        }
        self.animating = false;
    }

    /// Starts accelerometer sampling.
    pub fn gain_focus(&mut self) {
        let period = self.config.sensor_period;
        if let Some(sensor) = self.sensor.as_mut() {
            sensor.enable(period);
        }
    }

    /// Stops accelerometer sampling and animation, then draws once.
    pub fn lose_focus(&mut self) {
        if let Some(sensor) = self.sensor.as_mut() {
            sensor.disable();
        }
        self.animating = false;
        self.draw_frame();
    }

    /// One idle animation step.
    pub fn tick(&mut self) {
        if !self.animating {
            return;
        }
        self.state.advance(self.config.angle_step);
        self.draw_frame();
    }

    /// Logs every pending accelerometer sample and returns how many there were.
    pub fn drain_sensor(&mut self) -> usize {
        let Some(sensor) = self.sensor.as_mut() else {
            return 0;
        };
        let mut drained = 0;
        while let Some(sample) = sensor.next_sample() {
            info!(
                "accelerometer: x={} y={} z={}",
                sample.x, sample.y, sample.z
            );
            drained += 1;
        }
        drained
    }

    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.state.x = x as i32;
        self.state.y = y as i32;
        debug!("Pointer at {}, {}", self.state.x, self.state.y);
    }

    pub fn restore(&mut self, state: SavedState) {
        debug!("Restoring {state:?}");
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeRenderer, FakeSensor, Journal};

    fn engine(journal: &Journal) -> Engine<FakeRenderer, FakeSensor> {
        Engine::new(
            FakeRenderer::new(journal),
            Some(FakeSensor::new(journal)),
            AppConfig::default(),
        )
    }

    #[test]
    fn starts_uninitialized_and_animating() {
        let journal = Journal::default();
        let engine = engine(&journal);
        assert_eq!(engine.phase(), Phase::Uninitialized);
        assert!(engine.is_animating());
        assert!(engine.surface().is_none());
    }

    #[test]
    fn init_creates_surface_and_resets_angle() {
        let journal = Journal::default();
        let mut engine = engine(&journal);
        engine.restore(SavedState {
            angle: 0.7,
            x: 1,
            y: 2,
        });
        engine.init_display(&(720, 1280)).unwrap();
        assert_eq!(engine.phase(), Phase::Displaying);
        assert!(engine.surface().is_some());
        assert_eq!(engine.viewport(), (720, 1280));
        assert_eq!(engine.state().angle, 0.0);
        assert_eq!((engine.state().x, engine.state().y), (1, 2));
    }

    #[test]
    fn failed_init_leaves_no_surface() {
        let journal = Journal::default();
        let mut engine = Engine::new(
            FakeRenderer::failing(&journal),
            None::<FakeSensor>,
            AppConfig::default(),
        );
        assert!(engine.init_display(&(720, 1280)).is_err());
        assert_eq!(engine.phase(), Phase::Uninitialized);
        assert!(engine.surface().is_none());
        engine.draw_frame();
        assert!(journal.frames().is_empty());
    }

    #[test]
    fn term_releases_every_handle_and_stops_animation() {
        let journal = Journal::default();
        let mut engine = engine(&journal);
        engine.init_display(&(100, 100)).unwrap();
        engine.term_display();
        assert_eq!(engine.phase(), Phase::Terminated);
        assert!(engine.surface().is_none());
        assert!(!engine.is_animating());
        assert_eq!(journal.count("release"), 1);
    }

    #[test]
    fn reinit_releases_the_previous_surface() {
        let journal = Journal::default();
        let mut engine = engine(&journal);
        engine.init_display(&(100, 100)).unwrap();
        engine.init_display(&(200, 100)).unwrap();
        assert_eq!(journal.count("release"), 1);
        assert_eq!(engine.viewport(), (200, 100));
    }

    #[test]
    fn draw_uses_pointer_and_angle() {
        let journal = Journal::default();
        let mut engine = engine(&journal);
        engine.init_display(&(200, 400)).unwrap();
        engine.set_pointer(100.0, 100.0);
        engine.draw_frame();
        let frame = *journal.frames().last().unwrap();
        assert_eq!(frame.red, 0.5);
        assert_eq!(frame.green, 0.0);
        assert_eq!(frame.blue, 0.25);
    }

    #[test]
    fn tick_advances_angle_and_draws() {
        let journal = Journal::default();
        let mut engine = engine(&journal);
        engine.init_display(&(10, 10)).unwrap();
        engine.tick();
        engine.tick();
        assert!((engine.state().angle - 0.02).abs() < 1e-6);
        assert_eq!(journal.frames().len(), 2);
    }

    #[test]
    fn tick_is_idle_when_not_animating() {
        let journal = Journal::default();
        let mut engine = engine(&journal);
        engine.init_display(&(10, 10)).unwrap();
        engine.lose_focus();
        let frames = journal.frames().len();
        engine.tick();
        assert_eq!(engine.state().angle, 0.0);
        assert_eq!(journal.frames().len(), frames);
    }

    #[test]
    fn tick_uses_the_configured_angle_step() {
        let journal = Journal::default();
        let config = AppConfig {
            angle_step: 0.25,
            ..AppConfig::DEFAULT
        };
        let mut engine = Engine::new(FakeRenderer::new(&journal), None::<FakeSensor>, config);
        engine.init_display(&(10, 10)).unwrap();
        engine.tick();
        assert_eq!(engine.state().angle, 0.25);
    }

    #[test]
    fn poll_blocks_once_animation_stops() {
        let journal = Journal::default();
        let mut engine = engine(&journal);
        assert_eq!(engine.poll_timeout(), Some(Duration::ZERO));
        engine.init_display(&(10, 10)).unwrap();
        engine.lose_focus();
        assert_eq!(engine.poll_timeout(), None);
    }

    #[test]
    fn focus_toggles_the_sensor_at_sixty_hertz() {
        let journal = Journal::default();
        let mut engine = engine(&journal);
        engine.init_display(&(10, 10)).unwrap();
        engine.gain_focus();
        assert_eq!(journal.count("enable 16000us"), 1);
        engine.lose_focus();
        assert_eq!(journal.count("disable"), 1);
        assert!(!engine.is_animating());
        assert_eq!(journal.frames().len(), 1);
    }

    #[test]
    fn drain_consumes_pending_samples() {
        let journal = Journal::default();
        let mut sensor = FakeSensor::new(&journal);
        sensor.push(0.0, 9.8, 0.1);
        sensor.push(0.2, 9.7, 0.0);
        let mut engine = Engine::new(
            FakeRenderer::new(&journal),
            Some(sensor),
            AppConfig::default(),
        );
        assert_eq!(engine.drain_sensor(), 2);
        assert_eq!(engine.drain_sensor(), 0);
    }
}
