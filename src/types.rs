use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// The scoring rule used to decide where the next item goes.
///
/// All of the concrete rules come from the MaxRects family: each one ranks
/// every (free rectangle, orientation) combination and the packer commits the
/// best-ranked placement. `Automatic` tries every concrete rule and keeps
/// whichever produced the best page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heuristic {
    /// Try every concrete heuristic and keep the best outcome.
    Automatic,

    /// Prefer the free rectangle that wastes the least area.
    BestAreaFit,

    /// Prefer placements touching the page border and other items along the
    /// longest combined edge.
    ContactPoint,

    /// Prefer the placement with the lowest resulting top edge, then the
    /// leftmost.
    BottomLeft,

    /// Prefer the free rectangle whose longer leftover side is smallest.
    BestLongSideFit,

    /// Prefer the free rectangle whose shorter leftover side is smallest.
    BestShortSideFit,
}

impl Heuristic {
    /// Every concrete heuristic, in the order automatic mode tries them.
    pub const ALL: [Heuristic; 5] = [
        Heuristic::BestAreaFit,
        Heuristic::ContactPoint,
        Heuristic::BottomLeft,
        Heuristic::BestLongSideFit,
        Heuristic::BestShortSideFit,
    ];
}

impl Default for Heuristic {
    fn default() -> Self {
        Heuristic::Automatic
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Heuristic::Automatic => "automatic",
            Heuristic::BestAreaFit => "best-area-fit",
            Heuristic::ContactPoint => "contact-point",
            Heuristic::BottomLeft => "bottom-left",
            Heuristic::BestLongSideFit => "best-long-side-fit",
            Heuristic::BestShortSideFit => "best-short-side-fit",
        };

        f.write_str(name)
    }
}

impl FromStr for Heuristic {
    type Err = String;

    fn from_str(value: &str) -> Result<Heuristic, Self::Err> {
        match value {
            "automatic" => Ok(Heuristic::Automatic),
            "best-area-fit" => Ok(Heuristic::BestAreaFit),
            "contact-point" => Ok(Heuristic::ContactPoint),
            "bottom-left" => Ok(Heuristic::BottomLeft),
            "best-long-side-fit" => Ok(Heuristic::BestLongSideFit),
            "best-short-side-fit" => Ok(Heuristic::BestShortSideFit),

            _ => Err(String::from(
                "Invalid packing method. Valid options are 'automatic', \
                 'best-area-fit', 'contact-point', 'bottom-left', \
                 'best-long-side-fit', and 'best-short-side-fit'.",
            )),
        }
    }
}

/// An input to the packing routines.
///
/// `InputItem` is a 2D size, an optional padding, and a caller-supplied
/// payload. The payload travels through the packer untouched and comes back
/// attached to the resulting placement, so consumers can use it to associate
/// the packing results back to the application's own objects. Callers that
/// don't need one can pass `()`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InputItem<P> {
    pub(crate) size: (u32, u32),
    pub(crate) padding: u32,
    pub(crate) payload: P,
}

impl<P> InputItem<P> {
    #[inline]
    pub fn new(size: (u32, u32), payload: P) -> Self {
        Self {
            size,
            padding: 0,
            payload,
        }
    }

    /// Reserves `padding` extra pixels on every side of the item while it is
    /// being placed. The padding is subtracted back out of the reported
    /// rectangle, so it is invisible to the caller except as separation
    /// between neighbors.
    #[inline]
    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    #[inline]
    pub fn padding(&self) -> u32 {
        self.padding
    }

    #[inline]
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Consumes the item, returning its payload.
    #[inline]
    pub fn into_payload(self) -> P {
        self.payload
    }

    /// The size of the item with padding applied on every side.
    pub(crate) fn footprint(&self) -> (u32, u32) {
        (
            self.size.0.saturating_add(self.padding.saturating_mul(2)),
            self.size.1.saturating_add(self.padding.saturating_mul(2)),
        )
    }
}

/// An item that was placed onto one of the output pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputItem<P> {
    pub(crate) rect: Rect,
    pub(crate) rotated: bool,
    pub(crate) payload: P,
}

impl<P> OutputItem<P> {
    /// Top-left corner of the item on its page, padding excluded.
    #[inline]
    pub fn position(&self) -> (u32, u32) {
        (self.rect.x, self.rect.y)
    }

    /// Size of the item as it must be copied onto the page. If the item was
    /// rotated this is the original size with the axes swapped.
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.rect.w, self.rect.h)
    }

    #[inline]
    pub fn min(&self) -> (u32, u32) {
        (self.rect.x, self.rect.y)
    }

    #[inline]
    pub fn max(&self) -> (u32, u32) {
        (self.rect.right(), self.rect.bottom())
    }

    /// Whether the item was placed turned 90 degrees.
    #[inline]
    pub fn rotated(&self) -> bool {
        self.rotated
    }

    #[inline]
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Consumes the item, returning its payload.
    #[inline]
    pub fn into_payload(self) -> P {
        self.payload
    }
}

/// One packed page and the items placed onto it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<P> {
    pub(crate) size: (u32, u32),
    pub(crate) method: Heuristic,
    pub(crate) items: Vec<OutputItem<P>>,
}

impl<P> Page<P> {
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// The heuristic that produced this page. When the packer runs with
    /// `Heuristic::Automatic`, this reports which concrete method won.
    #[inline]
    pub fn method(&self) -> Heuristic {
        self.method
    }

    #[inline]
    pub fn items(&self) -> &[OutputItem<P>] {
        &self.items
    }

    /// Consumes the page, returning the items placed onto it.
    #[inline]
    pub fn into_items(self) -> Vec<OutputItem<P>> {
        self.items
    }

    /// The fraction of the page area covered by item content. Padding does
    /// not count as coverage.
    pub fn occupancy(&self) -> f64 {
        let page_area = u64::from(self.size.0) * u64::from(self.size.1);
        if page_area == 0 {
            return 0.0;
        }

        let covered: u64 = self.items.iter().map(|item| item.rect.area()).sum();
        covered as f64 / page_area as f64
    }
}

/// The results from running the packer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackOutput<P> {
    pub(crate) pages: Vec<Page<P>>,
    pub(crate) not_packed: Vec<InputItem<P>>,
    pub(crate) method: Heuristic,
    pub(crate) allow_rotation: bool,
}

impl<P> PackOutput<P> {
    #[inline]
    pub fn pages(&self) -> &[Page<P>] {
        &self.pages
    }

    /// Items whose padded footprint exceeds the maximum page size in every
    /// allowed orientation. They are reported here instead of being placed;
    /// they never block other items from packing.
    #[inline]
    pub fn not_packed(&self) -> &[InputItem<P>] {
        &self.not_packed
    }

    /// The method the packer was configured with, which may be
    /// `Heuristic::Automatic`. Each page reports the concrete method that
    /// produced it.
    #[inline]
    pub fn method(&self) -> Heuristic {
        self.method
    }

    #[inline]
    pub fn allow_rotation(&self) -> bool {
        self.allow_rotation
    }

    /// Consumes the output, returning the pages and the not-packed items.
    pub fn into_parts(self) -> (Vec<Page<P>>, Vec<InputItem<P>>) {
        (self.pages, self.not_packed)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn heuristic_names_round_trip() {
        let all = [
            Heuristic::Automatic,
            Heuristic::BestAreaFit,
            Heuristic::ContactPoint,
            Heuristic::BottomLeft,
            Heuristic::BestLongSideFit,
            Heuristic::BestShortSideFit,
        ];

        for &method in &all {
            let parsed: Heuristic = method.to_string().parse().unwrap();
            assert_eq!(parsed, method);
        }

        assert!("shelf".parse::<Heuristic>().is_err());
    }

    #[test]
    fn footprint_expands_both_axes() {
        let item = InputItem::new((10, 4), ()).with_padding(3);

        assert_eq!(item.footprint(), (16, 10));
        assert_eq!(item.size(), (10, 4));
        assert_eq!(item.padding(), 3);
    }

    #[test]
    fn occupancy_counts_item_content() {
        let page = Page {
            size: (32, 32),
            method: Heuristic::BottomLeft,
            items: vec![
                OutputItem {
                    rect: Rect::new(1, 1, 2, 1),
                    rotated: false,
                    payload: (),
                },
                OutputItem {
                    rect: Rect::new(5, 1, 4, 2),
                    rotated: false,
                    payload: (),
                },
            ],
        };

        let expected = 10.0 / 1024.0;
        assert!((page.occupancy() - expected).abs() < 1e-12);
    }
}
