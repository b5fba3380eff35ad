//! MaxRects free-space bookkeeping for a single page.
//!
//! A bin tracks the maximal free rectangles left over after each placement,
//! following Jukka Jylänki's "A Thousand Ways to Pack the Bin" survey.
//! Placing an item splits every intersecting free rectangle into up to four
//! remainder strips, and the free list is kept minimal: no entry is ever
//! contained in another.

use std::mem;

use crate::geometry::Rect;
use crate::heuristics::{self, PlacementCandidate};
use crate::types::Heuristic;

#[derive(Debug)]
pub(crate) struct MaxRectsBin {
    width: u32,
    height: u32,
    free: Vec<Rect>,
    used: Vec<Rect>,
}

impl MaxRectsBin {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            free: Vec::new(),
            used: Vec::new(),
        }
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Sets the nominal page dimensions without touching the current
    /// contents. Callers are expected to `reset` before packing at the new
    /// size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Clears all placements, making the whole page one free rectangle.
    pub fn reset(&mut self) {
        self.used.clear();
        self.free.clear();
        self.free.push(Rect::new(0, 0, self.width, self.height));
    }

    /// Adds a free rectangle while keeping the free list minimal. The
    /// candidate is dropped if an existing entry already covers it, and
    /// existing entries covered by the candidate are removed.
    fn insert_free(&mut self, rect: Rect) {
        let mut i = 0;
        while i < self.free.len() {
            let existing = self.free[i];

            if !rect.overlaps(&existing) {
                i += 1;
                continue;
            }
            if existing.contains(&rect) {
                // The candidate adds no new free space.
                return;
            }
            if rect.contains(&existing) {
                self.free.remove(i);
                continue;
            }

            i += 1;
        }

        self.free.push(rect);
    }

    /// Commits a placement: splits every free rectangle against it, then
    /// records it in the used list.
    pub fn place(&mut self, rect: Rect) {
        let old_free = mem::take(&mut self.free);
        for free in old_free {
            self.split_free_rect(free, &rect);
        }

        self.used.push(rect);
    }

    /// Splits one free rectangle against a placed rectangle, inserting up to
    /// four remainder strips. Free rectangles the placement doesn't touch are
    /// reinserted whole.
    fn split_free_rect(&mut self, free: Rect, used: &Rect) {
        if !free.overlaps(used) {
            self.insert_free(free);
            return;
        }

        if used.x < free.right() && used.right() > free.x {
            // Strip above the placed rectangle.
            if used.y > free.y && used.y < free.bottom() {
                self.insert_free(Rect::new(free.x, free.y, free.w, used.y - free.y));
            }
            // Strip below it.
            if used.bottom() < free.bottom() {
                self.insert_free(Rect::new(
                    free.x,
                    used.bottom(),
                    free.w,
                    free.bottom() - used.bottom(),
                ));
            }
        }

        if used.y < free.bottom() && used.bottom() > free.y {
            // Strip to the left of the placed rectangle.
            if used.x > free.x && used.x < free.right() {
                self.insert_free(Rect::new(free.x, free.y, used.x - free.x, free.h));
            }
            // Strip to the right.
            if used.right() < free.right() {
                self.insert_free(Rect::new(
                    used.right(),
                    free.y,
                    free.right() - used.right(),
                    free.h,
                ));
            }
        }
    }

    /// Evaluates every free rectangle for a `width` by `height` item, in both
    /// orientations when rotation is allowed, and folds the result into
    /// `best`. Only the `matched` flag is reset here; the accumulated scores
    /// survive across calls so a driver can compare candidates for several
    /// different items against each other.
    pub fn choose_best(
        &self,
        best: &mut PlacementCandidate,
        width: u32,
        height: u32,
        method: Heuristic,
        allow_rotation: bool,
    ) {
        best.matched = false;

        for free in &self.free {
            if free.w >= width && free.h >= height {
                self.score(best, free, width, height, method);
            }
            if allow_rotation && free.w >= height && free.h >= width {
                self.score(best, free, height, width, method);
            }
        }
    }

    fn score(
        &self,
        best: &mut PlacementCandidate,
        free: &Rect,
        width: u32,
        height: u32,
        method: Heuristic,
    ) {
        match method {
            Heuristic::BestAreaFit => heuristics::best_area_fit(best, free, width, height),
            Heuristic::ContactPoint => heuristics::contact_point(
                best,
                free,
                width,
                height,
                &self.used,
                (self.width, self.height),
            ),
            Heuristic::BottomLeft => heuristics::bottom_left(best, free, width, height),
            Heuristic::BestLongSideFit => heuristics::best_long_side_fit(best, free, width, height),
            Heuristic::BestShortSideFit => {
                heuristics::best_short_side_fit(best, free, width, height)
            }
            Heuristic::Automatic => unreachable!("automatic is expanded before placement"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn assert_minimal(bin: &MaxRectsBin) {
        for (i, a) in bin.free.iter().enumerate() {
            for (j, b) in bin.free.iter().enumerate() {
                if i != j {
                    assert!(!a.contains(b), "free rect {:?} contains {:?}", a, b);
                }
            }
        }
    }

    #[test]
    fn reset_restores_a_single_free_rect() {
        let mut bin = MaxRectsBin::new(64, 32);
        bin.reset();
        bin.place(Rect::new(0, 0, 10, 10));

        bin.reset();
        assert_eq!(bin.free, vec![Rect::new(0, 0, 64, 32)]);
        assert!(bin.used.is_empty());
    }

    #[test]
    fn corner_placement_splits_into_two_strips() {
        let mut bin = MaxRectsBin::new(128, 128);
        bin.reset();
        bin.place(Rect::new(0, 0, 100, 100));

        assert_eq!(
            bin.free,
            vec![Rect::new(0, 100, 128, 28), Rect::new(100, 0, 28, 128)]
        );
        assert_eq!(bin.used, vec![Rect::new(0, 0, 100, 100)]);
    }

    #[test]
    fn interior_placement_splits_into_four_strips() {
        let mut bin = MaxRectsBin::new(100, 100);
        bin.reset();
        bin.place(Rect::new(40, 40, 20, 20));

        assert_eq!(bin.free.len(), 4);
        assert_minimal(&bin);

        // Each strip spans the full bin along one axis.
        assert!(bin.free.contains(&Rect::new(0, 0, 100, 40)));
        assert!(bin.free.contains(&Rect::new(0, 60, 100, 40)));
        assert!(bin.free.contains(&Rect::new(0, 0, 40, 100)));
        assert!(bin.free.contains(&Rect::new(60, 0, 40, 100)));
    }

    #[test]
    fn free_list_stays_minimal_across_placements() {
        let mut bin = MaxRectsBin::new(256, 256);
        bin.reset();

        for rect in [
            Rect::new(0, 0, 100, 40),
            Rect::new(100, 0, 60, 60),
            Rect::new(0, 40, 40, 100),
            Rect::new(160, 0, 96, 30),
            Rect::new(40, 60, 50, 50),
        ]
        .iter()
        {
            bin.place(*rect);
            assert_minimal(&bin);
        }

        // Placed area is carved out of every free rectangle.
        for free in &bin.free {
            for used in &bin.used {
                assert!(!free.overlaps(used));
            }
        }
    }

    #[test]
    fn choose_best_respects_the_rotation_flag() {
        let mut bin = MaxRectsBin::new(40, 10);
        bin.reset();

        let mut best = PlacementCandidate::new();
        bin.choose_best(&mut best, 8, 30, Heuristic::BestShortSideFit, false);
        assert!(!best.matched);

        bin.choose_best(&mut best, 8, 30, Heuristic::BestShortSideFit, true);
        assert!(best.matched);
        assert_eq!((best.w, best.h), (30, 8));
    }

    #[test]
    fn choose_best_accumulates_scores_across_items() {
        let mut bin = MaxRectsBin::new(64, 64);
        bin.reset();
        bin.place(Rect::new(0, 0, 60, 60));

        // Only a 4-wide and a 4-tall strip remain. The first item fits
        // snugly; the second item also fits but scores worse, so it must
        // not steal the candidate.
        let mut best = PlacementCandidate::new();
        bin.choose_best(&mut best, 4, 60, Heuristic::BestShortSideFit, false);
        assert!(best.matched);
        let snug = (best.x, best.y, best.w, best.h);

        bin.choose_best(&mut best, 2, 10, Heuristic::BestShortSideFit, false);
        assert!(!best.matched);
        assert_eq!((best.x, best.y, best.w, best.h), snug);
    }
}
