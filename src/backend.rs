//! Capabilities the exporter depends on but does not implement itself: QR
//! encoding, rasterizing a [RenderTree] into pixels, and accepting finished page
//! images. They are injected when an [Exporter](crate::Exporter) is built so that
//! the layout and pagination code can be exercised without any real rendering.

use crate::render::RenderTree;
use crate::units::Pt;
use crate::{LabelError, RasterError};

/// Raster images exchanged between collaborators
pub type Bitmap = image::DynamicImage;

/// QR error correction level
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum ErrorCorrection {
    Low,
    Medium,
    Quartile,
    /// Recovers from roughly 30% damage; always used for labels
    #[default]
    High,
}

/// Turns a payload into a square QR code image
pub trait QrEncoder {
    /// Encode `payload` into a bitmap `edge` pixels on each side
    fn encode(
        &self,
        payload: &str,
        edge: u32,
        level: ErrorCorrection,
    ) -> Result<Bitmap, RasterError>;
}

/// Draws a [RenderTree] onto an offscreen surface.
///
/// Surfaces are scoped to one label: the exporter acquires one, rasterizes into it
/// and hands it back through [Rasterizer::release_surface] whether or not the
/// rasterization succeeded.
pub trait Rasterizer {
    type Surface;

    /// Create a surface of `width` × `height` device pixels
    fn acquire_surface(&mut self, width: u32, height: u32) -> Result<Self::Surface, RasterError>;

    /// Draw `tree` scaled up by `supersample`, returning a bitmap of the surface's size
    fn rasterize(
        &mut self,
        surface: &mut Self::Surface,
        tree: &RenderTree,
        supersample: f32,
    ) -> Result<Bitmap, RasterError>;

    fn release_surface(&mut self, surface: Self::Surface);
}

/// Receives pages and the label images placed on them. Coordinates are in points
/// from the top-left corner of the current page.
pub trait PageSink {
    /// Start a new page; subsequent images are placed on it
    fn add_page(&mut self, width: Pt, height: Pt) -> Result<(), LabelError>;

    /// Stretch `bitmap` into the box at (`x`, `y`) of size `width` × `height`
    fn place_image(
        &mut self,
        bitmap: Bitmap,
        x: Pt,
        y: Pt,
        width: Pt,
        height: Pt,
    ) -> Result<(), LabelError>;

    /// Serialize everything received so far
    fn finish(self) -> Result<Vec<u8>, LabelError>
    where
        Self: Sized;
}
