//! The small record persisted across activity recreation.

use std::mem;

use crate::error::StateError;

/// Snapshot written on save-state requests and read back on resume.
///
/// The encoding is the in-memory layout of this struct in native byte order,
/// with no version tag.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SavedState {
    pub angle: f32,
    pub x: i32,
    pub y: i32,
}

impl SavedState {
    pub const SIZE: usize = mem::size_of::<SavedState>();

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[0..4].copy_from_slice(&self.angle.to_ne_bytes());
        out[4..8].copy_from_slice(&self.x.to_ne_bytes());
        out[8..12].copy_from_slice(&self.y.to_ne_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StateError> {
        let bytes: &[u8; Self::SIZE] = bytes.try_into().map_err(|_| StateError::Size {
            expected: Self::SIZE,
            found: bytes.len(),
        })?;
        let word = |i: usize| [bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]];
        Ok(SavedState {
            angle: f32::from_ne_bytes(word(0)),
            x: i32::from_ne_bytes(word(4)),
            y: i32::from_ne_bytes(word(8)),
        })
    }

    /// Advances the animation angle, wrapping to zero once it passes one.
    pub fn advance(&mut self, step: f32) {
        self.angle += step;
        if self.angle > 1.0 {
            self.angle = 0.0;
        }
    }
}
