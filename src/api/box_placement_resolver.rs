use std::ops::{Deref, DerefMut};

use tracing::trace;

use crate::render::{Backend, NdcRect, PadFrame, PrimitiveId};

use super::legend_layout_builder::BoxSize;

/// Share of one tick length kept free between a box and the axis frame.
pub const MARGIN_TICK_FRACTION: f64 = 0.9;

/// Tick lengths of the active pad as fractions of the axis rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickLengths {
    /// Length of the ticks on the x axis (vertical extent).
    pub x: f64,
    /// Length of the ticks on the y axis (horizontal extent).
    pub y: f64,
}

/// Upper-left corner of a placed box in NDC.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxAnchor {
    pub x: f64,
    pub y: f64,
    /// No free space was found and the corner fallback was used.
    pub fallback: bool,
}

impl BoxAnchor {
    #[must_use]
    pub fn rect(self, size: BoxSize) -> NdcRect {
        NdcRect::new(self.x, self.y - size.height, self.x + size.width, self.y)
    }
}

/// Temporary exclusion rectangles, removed from the backend on drop.
struct ExclusionGuard<'a, B: Backend + ?Sized> {
    backend: &'a mut B,
    ids: Vec<PrimitiveId>,
}

impl<'a, B: Backend + ?Sized> ExclusionGuard<'a, B> {
    fn new(backend: &'a mut B, rects: &[NdcRect]) -> Self {
        let ids = rects.iter().map(|rect| backend.add_exclusion(*rect)).collect();
        Self { backend, ids }
    }
}

impl<B: Backend + ?Sized> Deref for ExclusionGuard<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        self.backend
    }
}

impl<B: Backend + ?Sized> DerefMut for ExclusionGuard<'_, B> {
    fn deref_mut(&mut self) -> &mut B {
        self.backend
    }
}

impl<B: Backend + ?Sized> Drop for ExclusionGuard<'_, B> {
    fn drop(&mut self) {
        for id in self.ids.drain(..) {
            self.backend.remove_primitive(id);
        }
    }
}

/// Free space kept around a box: 90% of one tick length, in NDC.
#[must_use]
pub fn placement_margins(frame: &PadFrame, ticks: TickLengths) -> (f64, f64) {
    (
        MARGIN_TICK_FRACTION * ticks.y * frame.axis.width(),
        MARGIN_TICK_FRACTION * ticks.x * frame.axis.height(),
    )
}

/// Tick bands along the four pad edges.
fn tick_bands(frame: &PadFrame, ticks: TickLengths) -> [NdcRect; 4] {
    let axis = frame.axis;
    let band_x = ticks.y * axis.width();
    let band_y = ticks.x * axis.height();
    [
        NdcRect::new(0.0, 0.0, 1.0, axis.y1 + band_y),
        NdcRect::new(0.0, axis.y2 - band_y, 1.0, 1.0),
        NdcRect::new(0.0, 0.0, axis.x1 + band_x, 1.0),
        NdcRect::new(axis.x2 - band_x, 0.0, 1.0, 1.0),
    ]
}

/// Corner position used when nothing fits: just inside the upper-left of the
/// axis rectangle.
#[must_use]
pub fn fallback_anchor(frame: &PadFrame, (margin_x, margin_y): (f64, f64)) -> BoxAnchor {
    let inset = 1.0 + 1.0 / MARGIN_TICK_FRACTION;
    BoxAnchor {
        x: frame.axis.x1 + inset * margin_x,
        y: frame.axis.y2 - inset * margin_y,
        fallback: true,
    }
}

/// Finds a collision-free spot for a box of `size` in the active pad.
///
/// The tick bands are excluded for the duration of the search. A fit is
/// searched for the box inflated by the margin on both sides and the box is
/// centered in it.
pub fn place_box<B: Backend + ?Sized>(backend: &mut B, size: BoxSize, ticks: TickLengths) -> BoxAnchor {
    let frame = backend.pad_frame();
    let (margin_x, margin_y) = placement_margins(&frame, ticks);
    let found = {
        let guard = ExclusionGuard::new(backend, &tick_bands(&frame, ticks));
        guard.find_free_box(size.width + 2.0 * margin_x, size.height + 2.0 * margin_y)
    };
    match found {
        Some(free) => {
            trace!(x = free.x1, y = free.y1, "box placed in free space");
            BoxAnchor {
                x: free.x1 + margin_x,
                y: free.y1 + margin_y + size.height,
                fallback: false,
            }
        }
        None => fallback_anchor(&frame, (margin_x, margin_y)),
    }
}

/// Explicit box position converted to NDC.
#[must_use]
pub fn explicit_anchor(frame: &PadFrame, x: f64, y: f64, user_coordinates: bool) -> BoxAnchor {
    let (x, y) = if user_coordinates {
        frame.user_to_ndc(x, y)
    } else {
        (x, y)
    };
    BoxAnchor {
        x,
        y,
        fallback: false,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{BoxSize, TickLengths, place_box};
    use crate::core::Layout;
    use crate::render::{Backend, NdcRect, PadSpec, RecordingBackend};

    fn backend() -> RecordingBackend {
        let mut backend = RecordingBackend::new();
        backend
            .create_pad(&PadSpec {
                id: 1,
                position: NdcRect::unit(),
                margin_top: 0.05,
                margin_bottom: 0.1,
                margin_left: 0.1,
                margin_right: 0.05,
                fill: Layout::default(),
                frame: Default::default(),
                palette: None,
            })
            .expect("pad");
        backend
    }

    #[test]
    fn exclusions_are_removed_after_search() {
        let mut backend = backend();
        let ticks = TickLengths { x: 0.03, y: 0.03 };
        let anchor = place_box(&mut backend, BoxSize { width: 0.2, height: 0.1 }, ticks);
        assert!(!anchor.fallback);
        assert_eq!(backend.primitive_count(), 0);
        // top tick band ends at 0.95 - 0.03 * 0.85
        assert!(anchor.y <= 0.95 - 0.03 * 0.85 - 0.9 * 0.03 * 0.85 + 1e-9);
    }

    #[test]
    fn covered_pad_uses_corner_fallback() {
        let mut backend = backend();
        backend.add_exclusion(NdcRect::unit());
        let ticks = TickLengths { x: 0.03, y: 0.03 };
        let anchor = place_box(&mut backend, BoxSize { width: 0.2, height: 0.1 }, ticks);
        assert!(anchor.fallback);
        let margin_x = 0.9 * 0.03 * 0.85;
        let margin_y = 0.9 * 0.03 * 0.85;
        let inset = 1.0 + 1.0 / 0.9;
        assert_relative_eq!(anchor.x, 0.1 + inset * margin_x, epsilon = 1e-12);
        assert_relative_eq!(anchor.y, 0.95 - inset * margin_y, epsilon = 1e-12);
        assert_eq!(backend.primitive_count(), 1);
    }
}
