mod pdf;

use image::RgbaImage;
use thiserror::Error;

use crate::types::PositionedFragment;

pub use pdf::LopdfDecoder;

/// Errors reported by a document decoder.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Invalid PDF: {0}")]
    Malformed(String),

    #[error("Page {0} not found")]
    PageNotFound(usize),

    #[error("Page {page}: {message}")]
    Page { page: usize, message: String },

    #[error("This decoder cannot rasterize pages")]
    RenderUnsupported,

    #[error("Rendering page {page} failed: {message}")]
    Render { page: usize, message: String },
}

/// Opens raw document bytes.
pub trait DocumentDecoder {
    fn open(&self, data: &[u8]) -> Result<Box<dyn DecodedDocument>, DecodeError>;
}

/// A decoded document. Dropping it releases the whole handle.
///
/// Page numbers are 1-based.
pub trait DecodedDocument {
    fn page_count(&self) -> usize;

    /// Text runs of a page in content-stream order.
    fn fragments(&mut self, page: usize) -> Result<Vec<PositionedFragment>, DecodeError>;

    /// Rasterize a page at `scale` times its natural size.
    fn render(&mut self, page: usize, scale: f32) -> Result<RgbaImage, DecodeError>;

    /// Free per-page caches once a page is finished.
    fn release_page(&mut self, _page: usize) {}
}
