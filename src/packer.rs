//! The packing pipeline: greedy single-page filling, page-size search, and
//! the multi-page entry point.

use crate::error::PackError;
use crate::geometry::Rect;
use crate::heuristics::PlacementCandidate;
use crate::maxrects::MaxRectsBin;
use crate::types::{Heuristic, InputItem, OutputItem, PackOutput, Page};

/// The page size the growth search starts from.
const START_SIZE: u32 = 32;

/// Packs rectangles onto one or more fixed-maximum-size pages using the
/// MaxRects algorithm.
///
/// Pages start small and grow toward the configured maximum size as needed;
/// items that cannot share a page with the rest spill onto new pages, and
/// items that cannot fit any page at all are reported back unplaced.
pub struct MaxRectsPacker {
    max_size: (u32, u32),
    method: Heuristic,
    allow_rotation: bool,
}

impl MaxRectsPacker {
    pub fn new() -> Self {
        Self {
            max_size: (1024, 1024),
            method: Heuristic::Automatic,
            allow_rotation: true,
        }
    }

    /// The largest page size the packer may produce.
    pub fn max_size(mut self, max_size: (u32, u32)) -> Self {
        self.max_size = max_size;
        self
    }

    /// The placement heuristic to use. The default, `Heuristic::Automatic`,
    /// tries every concrete heuristic and keeps the best page.
    pub fn method(mut self, method: Heuristic) -> Self {
        self.method = method;
        self
    }

    /// Whether items may be turned 90 degrees when that fits better.
    /// Defaults to `true`.
    pub fn allow_rotation(mut self, allow_rotation: bool) -> Self {
        self.allow_rotation = allow_rotation;
        self
    }

    /// Computes a packing solution.
    ///
    /// Accepts anything that can turn into an iterator of `InputItem`. The
    /// call fails up front if any item has a zero-sized axis or the maximum
    /// page size is zero; items that are merely too large for the maximum
    /// page size come back in the output's not-packed list.
    pub fn pack<P, I>(&self, items: I) -> Result<PackOutput<P>, PackError>
    where
        I: IntoIterator<Item = InputItem<P>>,
    {
        let items: Vec<InputItem<P>> = items.into_iter().collect();

        let (max_w, max_h) = self.max_size;
        if max_w == 0 || max_h == 0 {
            return Err(PackError::InvalidMaxSize {
                width: max_w,
                height: max_h,
            });
        }

        for (index, item) in items.iter().enumerate() {
            let (width, height) = item.size();
            if width == 0 || height == 0 {
                return Err(PackError::InvalidItemSize {
                    index,
                    width,
                    height,
                });
            }
        }

        log::trace!("Packing {} items", items.len());

        let mut not_packed = Vec::new();
        let mut remaining = Vec::new();

        for item in items {
            let footprint = item.footprint();
            if fits_page(footprint, self.max_size, self.allow_rotation) {
                remaining.push(PendingItem { footprint, item });
            } else {
                log::trace!(
                    "Item of size {:?} cannot fit a {}x{} page in any orientation",
                    item.size(),
                    max_w,
                    max_h
                );
                not_packed.push(item);
            }
        }

        let mut pages = Vec::new();

        while !remaining.is_empty() {
            let attempt = pack_page(&remaining, self.method, self.allow_rotation, self.max_size);

            let mut placed = Vec::new();
            let mut next_remaining = Vec::new();
            for (pending, placement) in remaining.into_iter().zip(&attempt.placements) {
                if placement.packed {
                    placed.push(finalize(pending, placement));
                } else {
                    next_remaining.push(pending);
                }
            }

            if placed.is_empty() {
                // Cannot happen: every remaining piece fits an empty page of
                // the maximum size on its own. Bail out instead of spinning.
                log::warn!(
                    "A page placed no items; reporting {} items as not packed",
                    next_remaining.len()
                );
                not_packed.extend(next_remaining.into_iter().map(|pending| pending.item));
                break;
            }

            log::trace!(
                "Packed {} items onto a {}x{} page using {}",
                placed.len(),
                attempt.size.0,
                attempt.size.1,
                attempt.method
            );

            pages.push(Page {
                size: attempt.size,
                method: attempt.method,
                items: placed,
            });
            remaining = next_remaining;
        }

        log::trace!(
            "Finished packing into {} pages with {} items too large to place",
            pages.len(),
            not_packed.len()
        );

        Ok(PackOutput {
            pages,
            not_packed,
            method: self.method,
            allow_rotation: self.allow_rotation,
        })
    }
}

/// An input that survived validation, paired with its padded footprint.
struct PendingItem<P> {
    footprint: (u32, u32),
    item: InputItem<P>,
}

/// Where one piece ended up within a single page attempt.
#[derive(Debug, Clone, Copy, Default)]
struct Placement {
    x: u32,
    y: u32,
    packed: bool,
    rotated: bool,
}

/// The outcome of packing one page at one size with one heuristic.
struct PageAttempt {
    size: (u32, u32),
    method: Heuristic,
    placements: Vec<Placement>,
    stats: TryPackStats,
}

#[derive(Debug, Clone, Copy)]
struct TryPackStats {
    packed_count: usize,
    packed_area: u64,
    bounds_area: u64,
    all_packed: bool,
}

fn fits_page(footprint: (u32, u32), max_size: (u32, u32), allow_rotation: bool) -> bool {
    let upright = footprint.0 <= max_size.0 && footprint.1 <= max_size.1;
    let turned = footprint.1 <= max_size.0 && footprint.0 <= max_size.1;

    upright || (allow_rotation && turned)
}

/// Converts a committed placement back into caller coordinates, subtracting
/// the padding out of the footprint again.
fn finalize<P>(pending: PendingItem<P>, placement: &Placement) -> OutputItem<P> {
    let padding = pending.item.padding();
    let (width, height) = pending.item.size();
    let (out_w, out_h) = if placement.rotated {
        (height, width)
    } else {
        (width, height)
    };

    OutputItem {
        rect: Rect::new(placement.x + padding, placement.y + padding, out_w, out_h),
        rotated: placement.rotated,
        payload: pending.item.into_payload(),
    }
}

/// One growth step: double one axis while swapping roles, which walks a
/// roughly square power-of-two progression without overshooting the needed
/// area by more than 2x. Steps are clamped to the maximum size; once the
/// clamped alternating step stops gaining area, the remaining room on a
/// single axis is consumed directly. Returns the input unchanged when the
/// page cannot grow further.
fn grow(size: (u32, u32), max_size: (u32, u32)) -> (u32, u32) {
    let area = |(w, h): (u32, u32)| u64::from(w) * u64::from(h);

    let swapped = (
        size.1.saturating_mul(2).min(max_size.0),
        size.0.min(max_size.1),
    );
    if area(swapped) > area(size) {
        return swapped;
    }

    if size.0 < max_size.0 {
        return (size.0.saturating_mul(2).min(max_size.0), size.1);
    }
    if size.1 < max_size.1 {
        return (size.0, size.1.saturating_mul(2).min(max_size.1));
    }

    size
}

/// Runs the growth search for one page: starts from an area-based size
/// estimate, packs at each size, and grows until everything fits or the page
/// cannot get any bigger. The final (possibly partial) attempt is returned.
fn pack_page<P>(
    pending: &[PendingItem<P>],
    method: Heuristic,
    allow_rotation: bool,
    max_size: (u32, u32),
) -> PageAttempt {
    let total_area: u64 = pending
        .iter()
        .map(|p| u64::from(p.footprint.0) * u64::from(p.footprint.1))
        .sum();

    // Jump ahead until the page could hold the total requested area, so the
    // growth loop starts near the right size instead of at the minimum.
    let mut size = (START_SIZE.min(max_size.0), START_SIZE.min(max_size.1));
    loop {
        if total_area <= u64::from(size.0) * u64::from(size.1) {
            break;
        }
        let next = grow(size, max_size);
        if next == size {
            break;
        }
        size = next;
    }

    let mut bin = MaxRectsBin::new(size.0, size.1);
    loop {
        bin.resize(size.0, size.1);
        let attempt = try_methods(&mut bin, pending, method, allow_rotation);
        if attempt.stats.all_packed {
            return attempt;
        }

        let next = grow(size, max_size);
        if next == size {
            // The page is as large as it may get; keep the partial result.
            return attempt;
        }

        log::trace!(
            "{} of {} items fit a {}x{} page, growing to {}x{}",
            attempt.stats.packed_count,
            pending.len(),
            size.0,
            size.1,
            next.0,
            next.1
        );
        size = next;
    }
}

/// Packs once with the configured heuristic, or once per concrete heuristic
/// in automatic mode. Automatic keeps the best attempt: full success first,
/// then higher fill of the running bounding box, then the smaller bounding
/// box; ties keep the earlier heuristic.
fn try_methods<P>(
    bin: &mut MaxRectsBin,
    pending: &[PendingItem<P>],
    method: Heuristic,
    allow_rotation: bool,
) -> PageAttempt {
    if method != Heuristic::Automatic {
        return run_method(bin, pending, method, allow_rotation);
    }

    let mut best = run_method(bin, pending, Heuristic::ALL[0], allow_rotation);
    for &candidate in &Heuristic::ALL[1..] {
        let attempt = run_method(bin, pending, candidate, allow_rotation);
        if better_attempt(&attempt.stats, &best.stats) {
            best = attempt;
        }
    }

    best
}

fn run_method<P>(
    bin: &mut MaxRectsBin,
    pending: &[PendingItem<P>],
    method: Heuristic,
    allow_rotation: bool,
) -> PageAttempt {
    let (placements, stats) = try_pack(bin, pending, method, allow_rotation);
    PageAttempt {
        size: bin.size(),
        method,
        placements,
        stats,
    }
}

/// Whether `new` beats `current` under the page comparator.
fn better_attempt(new: &TryPackStats, current: &TryPackStats) -> bool {
    if new.all_packed != current.all_packed {
        return new.all_packed;
    }

    // Compare packed_area / bounds_area fill ratios without leaving integers.
    let new_fill = u128::from(new.packed_area) * u128::from(current.bounds_area);
    let current_fill = u128::from(current.packed_area) * u128::from(new.bounds_area);
    if new_fill != current_fill {
        return new_fill > current_fill;
    }

    new.bounds_area < current.bounds_area
}

/// Fills one page greedily: every round scores all still-unpacked pieces
/// against the current free list and commits the single best candidate, so
/// placement order is chosen globally rather than first-fit. Stops early
/// once nothing else fits. Worst case O(pieces^2 x free rectangles), which
/// is fine for sprite-atlas piece counts.
fn try_pack<P>(
    bin: &mut MaxRectsBin,
    pending: &[PendingItem<P>],
    method: Heuristic,
    allow_rotation: bool,
) -> (Vec<Placement>, TryPackStats) {
    bin.reset();
    let mut placements = vec![Placement::default(); pending.len()];

    let mut packed_count = 0;
    let mut packed_area = 0;
    let mut bounds = (0, 0);

    for _ in 0..pending.len() {
        let mut best = PlacementCandidate::new();
        let mut winner = None;

        for (index, piece) in pending.iter().enumerate() {
            if placements[index].packed {
                continue;
            }

            let (width, height) = piece.footprint;
            bin.choose_best(&mut best, width, height, method, allow_rotation);
            if best.matched {
                winner = Some(index);
            }
        }

        let index = match winner {
            Some(index) => index,
            // Nothing else fits at this page size.
            None => break,
        };

        let rect = Rect::new(best.x, best.y, best.w, best.h);
        bin.place(rect);

        placements[index] = Placement {
            x: best.x,
            y: best.y,
            packed: true,
            rotated: best.w != pending[index].footprint.0,
        };

        packed_count += 1;
        packed_area += rect.area();
        bounds = (bounds.0.max(rect.right()), bounds.1.max(rect.bottom()));
    }

    let stats = TryPackStats {
        packed_count,
        packed_area,
        bounds_area: u64::from(bounds.0) * u64::from(bounds.1),
        all_packed: packed_count == pending.len(),
    };

    (placements, stats)
}
