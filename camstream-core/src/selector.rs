//! Preview-resolution selection.
//!
//! Picks the capture size that fills the viewport with the least
//! surplus, comparing in sensor-native axes.

use crate::error::StreamError;
use crate::geometry::{Resolution, Viewport};

/// Choose a preview resolution for `viewport` from `supported`.
///
/// A candidate covers the viewport when both of its dimensions reach the
/// viewport's (portrait viewports are swapped into landscape axes first).
/// The smallest covering candidate by area wins; equal areas resolve to
/// the earliest entry. When nothing covers, the first entry is returned.
///
/// The result is always an element of `supported`.
pub fn select_preview_size(
    supported: &[Resolution],
    viewport: Viewport,
) -> Result<Resolution, StreamError> {
    let first = *supported.first().ok_or(StreamError::EmptyResolutionSet)?;
    let target = viewport.sensor_aligned();

    let best = supported
        .iter()
        .copied()
        .filter(|r| covers(*r, target))
        .fold(None, |best: Option<Resolution>, r| match best {
            // Incumbent wins ties.
            Some(b) if b.area() <= r.area() => Some(b),
            _ => Some(r),
        });

    match best {
        Some(r) => Ok(r),
        None => {
            tracing::debug!(%viewport, fallback = %first, "no supported resolution covers viewport");
            Ok(first)
        }
    }
}

fn covers(candidate: Resolution, target: Viewport) -> bool {
    candidate.width >= target.width && candidate.height >= target.height
}
