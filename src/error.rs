use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum LabelError {
    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsingError(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    /// [image] failed to encode or decode a bitmap
    Image(#[from] image::ImageError),

    #[error(transparent)]
    /// [serde_json] failed to read or write configuration
    Json(#[from] serde_json::Error),

    #[error("page order refers to a page that is not in the document")]
    /// The document's page order and page arena are out of sync
    PageMissing,

    #[error("an image was placed before any page was added")]
    /// [PageSink::place_image](crate::PageSink::place_image) was called on an empty document
    NoCurrentPage,

    #[error(transparent)]
    /// The labels cannot be laid out on the requested pages
    Layout(#[from] LayoutError),

    #[error(transparent)]
    /// An external rendering collaborator failed; this aborts the whole export
    Raster(#[from] RasterError),
}

/// Layouts that cannot be satisfied. These are reported instead of producing blank
/// pages or partial grids.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("a page fits {columns} column(s) and {rows} row(s) of labels; one of each is needed")]
    Unsatisfiable { columns: usize, rows: usize },

    #[error("labels this small would put {columns} x {rows} cells on a page")]
    TooManyCells { columns: f32, rows: f32 },
}

/// Failures reported by the rasterizer or QR encoder collaborators
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RasterError {
    #[error("could not acquire a render surface: {0}")]
    Surface(String),

    #[error("rasterization failed: {0}")]
    Rasterize(String),

    #[error("QR encoding failed: {0}")]
    QrEncode(String),
}
