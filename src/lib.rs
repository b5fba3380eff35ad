//! Packmax is a small library for packing rectangles onto fixed-maximum-size
//! pages. It was built for sprite atlas pipelines: an export toolchain hands
//! the packer its sprites' bounding boxes, then copies pixels around using
//! the returned placements.
//!
//! Free space is tracked with the MaxRects model. The packer supports five
//! placement heuristics (plus an automatic mode that tries them all and
//! keeps the best page), 90 degree rotation, and per-item padding. Pages
//! start small and double toward the configured maximum size, and items
//! that cannot share a page with the rest spill onto new pages.
//!
//! ## Example
//! ```
//! use packmax::{InputItem, MaxRectsPacker};
//!
//! // First, transform the rectangles you want to pack into the Packmax
//! // InputItem type. The payload travels through the packer untouched, so
//! // any handle that lets you find your own objects again works here.
//! let my_items = vec![
//!     InputItem::new((128, 64), "hero"),
//!     InputItem::new((64, 64), "tile").with_padding(2),
//!     InputItem::new((1, 300), "gradient"),
//! ];
//!
//! // Construct a packer and configure it with your constraints.
//! let packer = MaxRectsPacker::new().max_size((512, 512));
//!
//! // Compute a solution.
//! let output = packer.pack(my_items)?;
//!
//! for page in output.pages() {
//!     for item in page.items() {
//!         println!("{}: {:?} at {:?}", item.payload(), item.size(), item.position());
//!     }
//! }
//! # Ok::<(), packmax::PackError>(())
//! ```

mod error;
mod geometry;
mod heuristics;
mod maxrects;
mod packer;
mod types;

pub use error::*;
pub use packer::*;
pub use types::*;
