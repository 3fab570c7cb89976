//! Dirty region tracking for partial redraws.
//!
//! Tracks which regions of the screen must be recomposed before the next
//! flip. Rectangles are clamped to the surface and kept in arrival order;
//! overlapping rectangles are not merged, so a pixel may be recomposed more
//! than once per frame.

use core::mem;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::trace;

use crate::geometry::{Point, Rect, Size};

#[derive(Debug, Default)]
struct Pending {
    rects: Vec<Rect>,
    surface_size: Size,
}

/// Thread-safe queue of dirty rectangles.
///
/// [`invalidate`](Self::invalidate) may be called from any thread while the
/// compositor thread calls [`drain_all`](Self::drain_all); both take the same
/// internal lock.
#[derive(Debug, Default)]
pub struct DirtyRegionTracker {
    pending: Mutex<Pending>,
}

impl DirtyRegionTracker {
    /// Create a tracker for a surface of `surface_size`.
    #[must_use]
    pub fn new(surface_size: Size) -> Self {
        Self {
            pending: Mutex::new(Pending {
                rects: Vec::new(),
                surface_size,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark a region dirty; `None` marks the whole surface.
    ///
    /// The rectangle is clamped to the surface first. Returns `false` when
    /// nothing of it lies on the surface, in which case nothing is queued.
    pub fn invalidate(&self, rect: Option<Rect>) -> bool {
        let mut pending = self.lock();
        let bounds = pending.surface_size;
        let clamped = match rect {
            None => Some(Rect::from_origin_size(Point::default(), bounds))
                .filter(|full| !full.is_empty()),
            Some(rect) => rect.clamp_to(bounds),
        };
        let Some(clamped) = clamped else {
            trace!(target: "display::damage", "dropping off-surface rect {rect:?}");
            return false;
        };
        pending.rects.push(clamped);
        true
    }

    /// Take every queued rectangle, oldest first, leaving the queue empty.
    #[must_use]
    pub fn drain_all(&self) -> Vec<Rect> {
        mem::take(&mut self.lock().rects)
    }

    /// Change the surface size used for clamping.
    ///
    /// Queued rectangles are clamped to the new size; those left empty are
    /// dropped.
    pub fn resize(&self, surface_size: Size) {
        let mut pending = self.lock();
        pending.surface_size = surface_size;
        pending.rects = mem::take(&mut pending.rects)
            .into_iter()
            .filter_map(|rect| rect.clamp_to(surface_size))
            .collect();
    }

    /// Drop every queued rectangle.
    pub fn clear(&self) {
        self.lock().rects.clear();
    }

    /// Surface size used for clamping.
    #[must_use]
    pub fn surface_size(&self) -> Size {
        self.lock().surface_size
    }

    /// Number of queued rectangles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().rects.len()
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().rects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    /// Test that invalidating everything yields one full-surface rectangle.
    ///
    /// # Panics
    /// Panics if the drained list is not exactly the surface rectangle.
    #[test]
    fn invalidate_all() {
        let tracker = DirtyRegionTracker::new(Size::new(800, 600));
        assert!(tracker.invalidate(None));
        assert_eq!(tracker.drain_all(), vec![Rect::new(0, 0, 800, 600)]);
        assert!(tracker.is_empty());
    }

    /// Test that rectangles are clamped, kept in order and never merged.
    ///
    /// # Panics
    /// Panics if clamping, ordering or the count is wrong.
    #[test]
    fn clamps_without_merging() {
        let tracker = DirtyRegionTracker::new(Size::new(800, 600));
        assert!(tracker.invalidate(Some(Rect::new(-50, 580, 100, 100))));
        assert!(tracker.invalidate(Some(Rect::new(0, 0, 100, 100))));
        assert!(tracker.invalidate(Some(Rect::new(50, 50, 100, 100))));
        assert!(!tracker.invalidate(Some(Rect::new(1000, 0, 5, 5))));
        assert_eq!(
            tracker.drain_all(),
            vec![
                Rect::new(0, 580, 50, 20),
                Rect::new(0, 0, 100, 100),
                Rect::new(50, 50, 100, 100),
            ]
        );
    }

    /// Test that a zero-sized surface queues nothing.
    ///
    /// # Panics
    /// Panics if a rectangle is queued.
    #[test]
    fn empty_surface_queues_nothing() {
        let tracker = DirtyRegionTracker::default();
        assert!(!tracker.invalidate(None));
        tracker.resize(Size::new(10, 10));
        assert!(tracker.invalidate(None));
        assert_eq!(tracker.len(), 1);
    }

    /// Test that shrinking the surface re-clamps queued rectangles.
    ///
    /// # Panics
    /// Panics if a drained rectangle lies outside the new surface.
    #[test]
    fn resize_reclamps_pending() {
        let tracker = DirtyRegionTracker::new(Size::new(800, 600));
        assert!(tracker.invalidate(None));
        assert!(tracker.invalidate(Some(Rect::new(100, 100, 10, 10))));
        assert!(tracker.invalidate(Some(Rect::new(2, 3, 10, 10))));
        tracker.resize(Size::new(4, 4));

        let drained = tracker.drain_all();
        assert_eq!(drained, vec![Rect::new(0, 0, 4, 4), Rect::new(2, 3, 2, 1)]);
        assert!(
            drained
                .iter()
                .all(|rect| rect.right() <= 4 && rect.bottom() <= 4)
        );
    }

    /// Test that clearing empties the queue but keeps the surface size.
    ///
    /// # Panics
    /// Panics if rectangles survive or the size changes.
    #[test]
    fn clear_drops_pending() {
        let tracker = DirtyRegionTracker::new(Size::new(10, 10));
        assert!(tracker.invalidate(None));
        tracker.clear();
        assert!(tracker.is_empty());
        assert_eq!(tracker.surface_size(), Size::new(10, 10));
    }

    /// Test that concurrent invalidations are all observed by drains.
    ///
    /// # Panics
    /// Panics if a rectangle is lost.
    #[test]
    fn concurrent_invalidate_and_drain() {
        let tracker = Arc::new(DirtyRegionTracker::new(Size::new(100, 100)));
        let writers: Vec<_> = (0..4)
            .map(|_| {
                let shared = Arc::clone(&tracker);
                thread::spawn(move || {
                    for offset in 0..250 {
                        shared.invalidate(Some(Rect::new(offset % 100, 0, 1, 1)));
                    }
                })
            })
            .collect();

        let mut seen = 0;
        while writers.iter().any(|writer| !writer.is_finished()) {
            seen += tracker.drain_all().len();
        }
        for writer in writers {
            assert!(matches!(writer.join(), Ok(())));
        }
        seen += tracker.drain_all().len();
        assert_eq!(seen, 1000);
    }
}
