//! Preview-to-viewport affine transform.
//!
//! The camera delivers frames in sensor-native (landscape) axes while the
//! preview surface is laid out in display axes. [`compute_transform`]
//! builds the matrix that centers the frame, scales it to fill the
//! viewport (cropping the overflow), and corrects the sensor rotation.
//!
//! Matrices are always rebuilt from their inputs; nothing composes onto a
//! previously applied transform.

use std::fmt;

use crate::error::StreamError;
use crate::geometry::{Resolution, Viewport};

/// Fixed correction from the sensor's landscape-native orientation to a
/// portrait display, applied on top of the device rotation.
pub const SENSOR_ROTATION_CORRECTION: f32 = -90.0;

// ── TransformMatrix ──────────────────────────────────────────────

/// An immutable 3×3 affine matrix, row-major.
///
/// ```text
/// | sx  kx  tx |
/// | ky  sy  ty |
/// | 0   0   1  |
/// ```
///
/// Points map as `x' = sx·x + kx·y + tx`, `y' = ky·x + sy·y + ty`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformMatrix {
    values: [f32; 9],
}

impl Default for TransformMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TransformMatrix {
    pub const IDENTITY: Self = Self {
        values: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
    };

    /// The nine matrix entries in row-major order.
    pub fn values(&self) -> [f32; 9] {
        self.values
    }

    /// Map `(x, y)` through the matrix.
    pub fn map_point(&self, x: f32, y: f32) -> (f32, f32) {
        let v = &self.values;
        (v[0] * x + v[1] * y + v[2], v[3] * x + v[4] * y + v[5])
    }

    /// Matrix mapping `src` onto `dst`, stretching each axis independently.
    fn rect_to_rect(src: Rect, dst: Rect) -> Self {
        let sx = dst.width() / src.width();
        let sy = dst.height() / src.height();
        Self {
            values: [
                sx,
                0.0,
                dst.left - src.left * sx,
                0.0,
                sy,
                dst.top - src.top * sy,
                0.0,
                0.0,
                1.0,
            ],
        }
    }

    fn scale_about(scale: f32, cx: f32, cy: f32) -> Self {
        Self {
            values: [
                scale,
                0.0,
                cx - scale * cx,
                0.0,
                scale,
                cy - scale * cy,
                0.0,
                0.0,
                1.0,
            ],
        }
    }

    fn rotate_about(degrees: f32, cx: f32, cy: f32) -> Self {
        let (sin, cos) = sin_cos_degrees(degrees);
        Self {
            values: [
                cos,
                -sin,
                sin * cy + (1.0 - cos) * cx,
                sin,
                cos,
                -sin * cx + (1.0 - cos) * cy,
                0.0,
                0.0,
                1.0,
            ],
        }
    }

    /// `other · self`: apply `self` first, then `other`.
    fn post_concat(self, other: Self) -> Self {
        let a = &other.values;
        let b = &self.values;
        let mut out = [0.0f32; 9];
        for row in 0..3 {
            for col in 0..3 {
                out[row * 3 + col] = a[row * 3] * b[col]
                    + a[row * 3 + 1] * b[3 + col]
                    + a[row * 3 + 2] * b[6 + col];
            }
        }
        Self { values: out }
    }
}

impl fmt::Display for TransformMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = &self.values;
        write!(
            f,
            "[{}, {}, {}][{}, {}, {}][{}, {}, {}]",
            v[0], v[1], v[2], v[3], v[4], v[5], v[6], v[7], v[8]
        )
    }
}

/// Sine and cosine of `degrees`, exact at multiples of 90°.
fn sin_cos_degrees(degrees: f32) -> (f32, f32) {
    let normalized = degrees.rem_euclid(360.0);
    if normalized == 0.0 {
        (0.0, 1.0)
    } else if normalized == 90.0 {
        (1.0, 0.0)
    } else if normalized == 180.0 {
        (0.0, -1.0)
    } else if normalized == 270.0 {
        (-1.0, 0.0)
    } else {
        normalized.to_radians().sin_cos()
    }
}

// ── Rect ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct Rect {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

impl Rect {
    fn sized(width: f32, height: f32) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            right: width,
            bottom: height,
        }
    }

    fn width(&self) -> f32 {
        self.right - self.left
    }

    fn height(&self) -> f32 {
        self.bottom - self.top
    }

    fn center(&self) -> (f32, f32) {
        ((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }
}

// ── compute_transform ────────────────────────────────────────────

/// Build the transform that fits a `preview` frame into `viewport`.
///
/// 1. The preview rectangle is taken with its axes swapped and centered on
///    the viewport.
/// 2. The viewport is mapped onto that rectangle.
/// 3. A uniform scale about the center makes the swapped preview cover the
///    viewport on both axes (crop to fill, never letterbox).
/// 4. A rotation about the center by `rotation_degrees − 90°` corrects the
///    sensor orientation.
///
/// Fails with [`StreamError::DegenerateGeometry`] when any dimension is zero.
pub fn compute_transform(
    viewport: Viewport,
    preview: Resolution,
    rotation_degrees: f32,
) -> Result<TransformMatrix, StreamError> {
    if viewport.is_degenerate() || preview.is_degenerate() {
        return Err(StreamError::DegenerateGeometry { viewport, preview });
    }

    let view_w = viewport.width as f32;
    let view_h = viewport.height as f32;
    let preview_w = preview.width as f32;
    let preview_h = preview.height as f32;

    let view_rect = Rect::sized(view_w, view_h);
    let (cx, cy) = view_rect.center();

    let swapped = Rect::sized(preview_h, preview_w);
    let (px, py) = swapped.center();
    let preview_rect = swapped.offset(cx - px, cy - py);

    let scale = (view_w / preview_h).max(view_h / preview_w);

    let matrix = TransformMatrix::rect_to_rect(view_rect, preview_rect)
        .post_concat(TransformMatrix::scale_about(scale, cx, cy))
        .post_concat(TransformMatrix::rotate_about(
            rotation_degrees + SENSOR_ROTATION_CORRECTION,
            cx,
            cy,
        ));

    tracing::trace!(%viewport, %preview, rotation_degrees, scale, %matrix, "computed preview transform");
    Ok(matrix)
}
