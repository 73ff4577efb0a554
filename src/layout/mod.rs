//! Utilities for measuring and arranging content within a label or page.
//!
//! Text is wrapped and measured by a single routine, [`layout_text`], which is
//! used both to size text elements while editing and to produce the lines that are
//! drawn into a [`RenderTree`](crate::RenderTree). Measuring and drawing therefore
//! always agree line for line.
//!
//! # Example
//!
//! ```
//! use label_sheet::layout::{measure, FixedPitch};
//! use label_sheet::Px;
//!
//! let metrics = FixedPitch { em_advance: 0.5 };
//! // every glyph is 5px wide at 10px
//! let size = measure(&metrics, "aaaa bbbb", Px(10.0), Some(Px(40.0)), true);
//! assert_eq!(size.width, Px(20.0));
//! // two lines at 1.2x line height
//! assert!((*size.height - 24.0).abs() < 1e-4);
//! ```

mod margins;
mod text;

pub use margins::*;
pub use text::*;
