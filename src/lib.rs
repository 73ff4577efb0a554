//! Design printable labels and export them as paginated PDFs.
//!
//! A label is a [LabelTemplate] (physical size, padding, spacing and border) with
//! four [Elements]: a QR code and three lines of text. While a label is edited,
//! [resolve_position] keeps each element inside the padded area and away from its
//! siblings. For export, a [LabelBatch] of instances is [plan]ned onto pages,
//! either one label per page or tiled in a grid, and an [Exporter] rasterizes every
//! label through injected [QrEncoder] and [Rasterizer] implementations before
//! placing it into a [PageSink], usually the built-in PDF [Document].
//!
//! ```
//! use label_sheet::*;
//!
//! let template = LabelTemplate::default();
//! let mut elements = Elements::default();
//!
//! // drag the product name onto the company name; it is moved out of the way
//! let target = elements.company_name.position;
//! let resolution = elements.move_element(ElementSlot::ProductName, target, &template);
//! assert_ne!(resolution.placement, Placement::Requested);
//!
//! // a 100x50mm label fits one column of five rows on A4
//! let labels = LabelBatch::generate(12, &template, &elements, "ACME", "", 8, &mut UuidV4);
//! let mode = ExportMode::GridPerPage(PageGeometry::default());
//! let pages = plan(labels.as_slice(), &mode).unwrap();
//! assert_eq!(pages.len(), 3);
//! assert_eq!(pages[2].cells.len(), 2);
//! ```

mod backend;
pub use backend::*;

mod batch;
pub use batch::*;

mod colour;
pub use colour::*;

mod config;
pub use config::*;

mod constraint;
pub use constraint::*;

mod document;
pub use document::*;

mod error;
pub use error::*;

mod export;
pub use export::*;

mod font;
pub use font::*;

mod image;
pub use self::image::*;

mod info;
pub use info::*;

/// Utility functions and structures to measure and wrap text and describe page margins
pub mod layout;

mod page;
pub use page::*;

/// Page sizes and orientation
pub mod pagesize;

mod paginate;
pub use paginate::*;

mod rect;
pub use rect::*;

pub(crate) mod refs;

mod render;
pub use render::*;

mod template;
pub use template::*;

mod units;
pub use units::*;
