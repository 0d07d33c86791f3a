//! Pixel-size types shared by the selector, the transform, and the session.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Resolution ───────────────────────────────────────────────────

/// A capture frame size reported by the camera, in sensor-native axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Pixel count, widened so large sensors cannot overflow.
    pub const fn area(self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub const fn is_degenerate(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// ── Viewport ─────────────────────────────────────────────────────

/// Current pixel size of the on-screen preview surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Taller than wide.
    pub const fn is_portrait(self) -> bool {
        self.height > self.width
    }

    pub const fn is_degenerate(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The viewport expressed in sensor-native (landscape) axes.
    ///
    /// Portrait viewports have their axes swapped; landscape and square
    /// viewports are returned unchanged.
    pub const fn sensor_aligned(self) -> Self {
        if self.is_portrait() {
            Self::new(self.height, self.width)
        } else {
            self
        }
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
