//! In-memory backends for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use crate::error::RenderError;
use crate::render::{ClearColor, FrameSurface, Renderer};
use crate::sensor::{Acceleration, MotionSensor};

#[derive(Default)]
struct Entries {
    events: Vec<String>,
    frames: Vec<ClearColor>,
}

/// Shared record of what the fakes were asked to do.
#[derive(Clone, Default)]
pub struct Journal(Rc<RefCell<Entries>>);

impl Journal {
    fn record(&self, event: impl Into<String>) {
        self.0.borrow_mut().events.push(event.into());
    }

    pub fn count(&self, event: &str) -> usize {
        self.0.borrow().events.iter().filter(|e| *e == event).count()
    }

    pub fn frames(&self) -> Vec<ClearColor> {
        self.0.borrow().frames.clone()
    }
}

/// Windows are just their pixel size.
pub struct FakeRenderer {
    journal: Journal,
    fail: bool,
}

impl FakeRenderer {
    pub fn new(journal: &Journal) -> Self {
        FakeRenderer {
            journal: journal.clone(),
            fail: false,
        }
    }

    pub fn failing(journal: &Journal) -> Self {
        FakeRenderer {
            journal: journal.clone(),
            fail: true,
        }
    }
}

impl Renderer for FakeRenderer {
    type Window = (i32, i32);
    type Surface = FakeSurface;

    fn create_surface(&mut self, window: &(i32, i32)) -> Result<FakeSurface, RenderError> {
        if self.fail {
            return Err(RenderError::egl("eglMakeCurrent", "EGL_BAD_MATCH"));
        }
        self.journal.record("create");
        Ok(FakeSurface {
            journal: self.journal.clone(),
            size: *window,
        })
    }
}

pub struct FakeSurface {
    journal: Journal,
    size: (i32, i32),
}

impl FrameSurface for FakeSurface {
    fn size(&self) -> (i32, i32) {
        self.size
    }

    fn present(&mut self, color: ClearColor) -> Result<(), RenderError> {
        self.journal.0.borrow_mut().frames.push(color);
        Ok(())
    }
}

impl Drop for FakeSurface {
    fn drop(&mut self) {
        self.journal.record("release");
    }
}

pub struct FakeSensor {
    journal: Journal,
    pending: VecDeque<Acceleration>,
}

impl FakeSensor {
    pub fn new(journal: &Journal) -> Self {
        FakeSensor {
            journal: journal.clone(),
            pending: VecDeque::new(),
        }
    }

    pub fn push(&mut self, x: f32, y: f32, z: f32) {
        self.pending.push_back(Acceleration { x, y, z });
    }
}

impl MotionSensor for FakeSensor {
    fn enable(&mut self, period: Duration) {
        self.journal
            .record(format!("enable {}us", period.as_micros()));
    }

    fn disable(&mut self) {
        self.journal.record("disable");
    }

    fn next_sample(&mut self) -> Option<Acceleration> {
        self.pending.pop_front()
    }
}
